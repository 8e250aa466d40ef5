//! Kubernetes operations

pub mod client;
pub mod events;
pub mod kube_client;
pub mod kubectl;
pub mod scc;

#[cfg(test)]
pub mod fake;

pub use client::{ClusterClient, ClusterError, ServiceProbe};
pub use events::ClusterEvent;
pub use kube_client::KubeClusterClient;
pub use scc::SecurityContextConstraints;
