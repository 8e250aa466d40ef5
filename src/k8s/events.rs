//! Scanning cluster events for SCC admission denials

use k8s_openapi::api::core::v1::Event;

/// Message fragment the SCC admission plugin emits when no constraint admits a pod
pub const SCC_DENIAL_MARKER: &str = "unable to validate against any security context constraint";

/// The parts of an event needed to summarise it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterEvent {
    pub message: String,
    pub kind: String,
    pub api_version: String,
    pub name: String,
    pub namespace: String,
    pub count: i32,
}

impl ClusterEvent {
    pub fn is_scc_denial(&self) -> bool {
        self.message.contains(SCC_DENIAL_MARKER)
    }

    /// One-line summary, e.g.
    /// `<message> for ReplicaSet.apps/v1/router-1 -n default happened 3 times`
    pub fn summary(&self) -> String {
        format!(
            "{} for {}.{}/{} -n {} happened {} times",
            self.message, self.kind, self.api_version, self.name, self.namespace, self.count
        )
    }
}

impl From<&Event> for ClusterEvent {
    fn from(event: &Event) -> Self {
        let involved = &event.involved_object;
        Self {
            message: event.message.clone().unwrap_or_default(),
            kind: involved.kind.clone().unwrap_or_default(),
            api_version: involved.api_version.clone().unwrap_or_default(),
            name: involved.name.clone().unwrap_or_default(),
            namespace: involved.namespace.clone().unwrap_or_default(),
            count: event.count.unwrap_or(0),
        }
    }
}

/// Summaries of every SCC denial in `events`, in input order
pub fn scc_denials(events: &[ClusterEvent]) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.is_scc_denial())
        .map(ClusterEvent::summary)
        .collect()
}
