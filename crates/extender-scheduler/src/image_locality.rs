//! Image locality priority
//!
//! Scores a node by how many of the pod's container images it already has cached,
//! so the scheduler can prefer nodes that skip image pulls.
//!
//! A container matches when any name of any node image *contains* the container's
//! image reference. Node names usually carry a registry, tag or digest the pod's
//! reference lacks (`nginx` vs `docker.io/library/nginx:latest`). The containment
//! check also matches unrelated images sharing a substring (`nginx` in
//! `my-nginx-fork:latest`); callers weight scores with that in mind, so the rule
//! must stay as is.

use extender_core::{ExtenderResult, HostPriority, HostPriorityList, Node, Pod};
use tracing::trace;

use crate::priority::PriorityFunction;

/// Priority counting the pod's images already present on each node
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLocalityPriority;

impl ImageLocalityPriority {
    pub const NAME: &'static str = "image_score";
}

impl PriorityFunction for ImageLocalityPriority {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn prioritize(&self, pod: &Pod, nodes: &[Node]) -> ExtenderResult<HostPriorityList> {
        Ok(nodes
            .iter()
            .map(|node| {
                let score = node_image_score(pod, node);
                trace!(
                    node = %node.name(),
                    pod = %pod.name(),
                    score,
                    "Node priority score"
                );
                HostPriority::new(node.name(), i64::from(score))
            })
            .collect())
    }
}

/// Number of the pod's containers whose image is cached on the node
pub fn node_image_score(pod: &Pod, node: &Node) -> u32 {
    let images = node.images();
    if images.is_empty() {
        return 0;
    }

    let mut count = 0;
    for container in pod.containers() {
        let matched = images
            .iter()
            .flat_map(|image| image.names.iter())
            .find(|name| name.contains(container.image.as_str()));

        if let Some(name) = matched {
            trace!(
                node_image = %name,
                container_image = %container.image,
                node = %node.name(),
                "Node image matches container image"
            );
            count += 1;
        }
    }
    count
}
