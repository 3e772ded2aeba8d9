//! Pod, Node, and host priority type definitions
//!
//! These mirror the JSON the cluster scheduler sends to and expects back from a
//! priority extender. Only the fields the extender reads are modelled; everything
//! else in the payload is ignored on decode.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ExtenderError, ExtenderResult};

/// Lists marshalled from nil slices arrive as `null`
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Object metadata shared by pods and nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Object name
    #[serde(default)]
    pub name: String,
    /// Namespace, empty for cluster-scoped objects
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

/// A container inside a pod
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Container name
    #[serde(default)]
    pub name: String,
    /// Image reference (e.g., "nginx:1.7.9")
    #[serde(default)]
    pub image: String,
}

impl Container {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodSpec {
    /// Containers in declaration order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub containers: Vec<Container>,
}

/// The workload unit being scheduled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
}

impl Pod {
    /// Create a pod running the given images, one container per image
    pub fn with_images<I, S>(name: impl Into<String>, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let containers = images
            .into_iter()
            .enumerate()
            .map(|(i, image)| Container::new(format!("c{}", i), image))
            .collect();
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: String::new(),
            },
            spec: PodSpec { containers },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn containers(&self) -> &[Container] {
        &self.spec.containers
    }
}

/// An image cached on a node, possibly known under several names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerImage {
    /// Names (tags and digests) the image is known by
    #[serde(default, deserialize_with = "null_as_empty")]
    pub names: Vec<String>,
    /// Image size in bytes
    #[serde(default)]
    pub size_bytes: i64,
}

impl ContainerImage {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            size_bytes: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    /// Images reported present on the node
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<ContainerImage>,
}

/// A candidate node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: NodeStatus,
}

impl Node {
    /// Create a node reporting the given images
    pub fn with_images(name: impl Into<String>, images: Vec<ContainerImage>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: String::new(),
            },
            status: NodeStatus { images },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn images(&self) -> &[ContainerImage] {
        &self.status.images
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeList {
    #[serde(rename = "Items", alias = "items", deserialize_with = "null_as_empty")]
    pub items: Vec<Node>,
}

/// Arguments the scheduler posts to an extender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtenderArgs {
    /// Pod being scheduled
    #[serde(rename = "Pod", alias = "pod")]
    pub pod: Pod,
    /// Candidate nodes
    #[serde(rename = "Nodes", alias = "nodes")]
    pub nodes: NodeList,
    /// Candidate node names, sent instead of full nodes by node-cache-capable
    /// extenders. Accepted but unused.
    #[serde(
        rename = "NodeNames",
        alias = "nodenames",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub node_names: Option<Vec<String>>,
}

impl ExtenderArgs {
    pub fn new(pod: Pod, nodes: Vec<Node>) -> Self {
        Self {
            pod,
            nodes: NodeList { items: nodes },
            node_names: None,
        }
    }

    /// Decode a request body
    pub fn decode(body: &[u8]) -> ExtenderResult<Self> {
        if body.is_empty() {
            return Err(ExtenderError::EmptyRequest);
        }
        serde_json::from_slice(body).map_err(|e| ExtenderError::Decode(e.to_string()))
    }
}

/// Score of a single host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPriority {
    /// Node name
    #[serde(rename = "Host")]
    pub host: String,
    /// Score, higher is better
    #[serde(rename = "Score")]
    pub score: i64,
}

impl HostPriority {
    pub fn new(host: impl Into<String>, score: i64) -> Self {
        Self {
            host: host.into(),
            score,
        }
    }
}

/// Scores returned to the scheduler, one per candidate node
pub type HostPriorityList = Vec<HostPriority>;

/// Encode a host priority list as a response body
pub fn encode_priorities(list: &[HostPriority]) -> ExtenderResult<Vec<u8>> {
    serde_json::to_vec(list).map_err(|e| ExtenderError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARGS: &str = r#"{
        "Pod": {
            "metadata": {"name": "web-0", "namespace": "default", "uid": "abc"},
            "spec": {"containers": [{"name": "web", "image": "nginx:1.7.9", "ports": []}]}
        },
        "Nodes": {"Items": [
            {
                "metadata": {"name": "node-a"},
                "status": {"images": [
                    {"names": ["docker.io/library/nginx@sha256:0d17", "docker.io/library/nginx:1.7.9"], "sizeBytes": 109357355}
                ]}
            },
            {"metadata": {"name": "node-b"}, "status": {}}
        ]},
        "NodeNames": null
    }"#;

    #[test]
    fn test_decode_extender_args() {
        let args = ExtenderArgs::decode(ARGS.as_bytes()).unwrap();
        assert_eq!(args.pod.name(), "web-0");
        assert_eq!(args.pod.metadata.namespace, "default");
        assert_eq!(args.pod.containers()[0].image, "nginx:1.7.9");
        assert_eq!(args.nodes.items.len(), 2);
        assert_eq!(args.nodes.items[0].images()[0].names.len(), 2);
        assert_eq!(args.nodes.items[0].images()[0].size_bytes, 109357355);
        assert!(args.nodes.items[1].images().is_empty());
    }

    #[test]
    fn test_decode_empty_body() {
        let err = ExtenderArgs::decode(b"").unwrap_err();
        assert!(matches!(err, ExtenderError::EmptyRequest));
    }

    #[test]
    fn test_decode_missing_pod() {
        let err = ExtenderArgs::decode(br#"{"Nodes": {"Items": []}}"#).unwrap_err();
        assert!(matches!(err, ExtenderError::Decode(_)));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = ExtenderArgs::decode(b"{\"Pod\": ").unwrap_err();
        assert!(matches!(err, ExtenderError::Decode(_)));
    }

    #[test]
    fn test_decode_lowercase_list_keys() {
        let body = br#"{
            "pod": {"spec": {"containers": [{"image": "nginx"}]}},
            "nodes": {"metadata": {}, "items": [{"metadata": {"name": "A"}}]},
            "nodenames": null
        }"#;
        let args = ExtenderArgs::decode(body).unwrap();
        assert_eq!(args.pod.containers()[0].image, "nginx");
        assert_eq!(args.nodes.items.len(), 1);
        assert_eq!(args.nodes.items[0].name(), "A");
    }

    #[test]
    fn test_decode_missing_items() {
        let err = ExtenderArgs::decode(br#"{"Pod": {}, "Nodes": {}}"#).unwrap_err();
        assert!(matches!(err, ExtenderError::Decode(_)));
    }

    #[test]
    fn test_decode_null_lists_as_empty() {
        let body = br#"{
            "Pod": {"metadata": {"name": "p"}, "spec": {"containers": null}},
            "Nodes": {"Items": [
                {"metadata": {"name": "A"}, "status": {"images": [{"names": null, "sizeBytes": 1}]}},
                {"metadata": {"name": "B"}, "status": {"images": null}}
            ]}
        }"#;
        let args = ExtenderArgs::decode(body).unwrap();
        assert!(args.pod.containers().is_empty());
        assert!(args.nodes.items[0].images()[0].names.is_empty());
        assert!(args.nodes.items[1].images().is_empty());

        let nulls = ExtenderArgs::decode(br#"{"Pod": {}, "Nodes": {"Items": null}}"#).unwrap();
        assert!(nulls.nodes.items.is_empty());
    }

    #[test]
    fn test_encode_priorities_wire_shape() {
        let list = vec![HostPriority::new("node-a", 1), HostPriority::new("node-b", 0)];
        let body = encode_priorities(&list).unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"[{"Host":"node-a","Score":1},{"Host":"node-b","Score":0}]"#
        );
    }

    #[test]
    fn test_args_serialize_roundtrip_shape() {
        let args = ExtenderArgs::new(
            Pod::with_images("p", ["redis"]),
            vec![Node::with_images("n", vec![ContainerImage::new(["redis:6"])])],
        );
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["Nodes"]["Items"][0]["metadata"]["name"], "n");
        assert_eq!(value["Pod"]["spec"]["containers"][0]["image"], "redis");
        assert!(value.get("NodeNames").is_none());
    }
}
