//! Cluster API seam used by the add-on installers

use crate::k8s::events::ClusterEvent;
use crate::k8s::scc::SecurityContextConstraints;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} \"{name}\" already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("{kind} \"{name}\" was modified concurrently: {message}")]
    Conflict {
        kind: &'static str,
        name: String,
        message: String,
    },

    #[error("access to {kind} \"{name}\" denied: {message}")]
    Forbidden {
        kind: &'static str,
        name: String,
        message: String,
    },

    #[error("{kind} \"{name}\" has no resourceVersion, refusing unconditional update")]
    MissingResourceVersion { kind: &'static str, name: String },

    #[error("failed to load cluster configuration: {0}")]
    Config(String),

    #[error("failed to start client runtime")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Api(#[from] kube::Error),
}

impl ClusterError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClusterError::Conflict { .. })
    }
}

/// Outcome of looking a service up by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceProbe {
    Found,
    NotFound,
}

/// CRUD-style verbs the installers need from the cluster
///
/// All calls block until the API server answers.
pub trait ClusterClient {
    /// Look up a service; a missing service is `Ok(ServiceProbe::NotFound)`.
    fn probe_service(&self, namespace: &str, name: &str) -> Result<ServiceProbe, ClusterError>;

    fn create_service_account(&self, namespace: &str, name: &str) -> Result<(), ClusterError>;

    fn get_scc(&self, name: &str) -> Result<SecurityContextConstraints, ClusterError>;

    /// Replace an SCC, conditional on the `resourceVersion` it carries
    fn update_scc(
        &self,
        scc: &SecurityContextConstraints,
    ) -> Result<SecurityContextConstraints, ClusterError>;

    /// Events across all namespaces
    fn list_events(&self) -> Result<Vec<ClusterEvent>, ClusterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = ClusterError::NotFound {
            kind: "Service",
            name: "router".to_string(),
        };
        assert!(!err.is_conflict());
        assert_eq!(err.to_string(), "Service \"router\" not found");

        let err = ClusterError::Conflict {
            kind: "SecurityContextConstraints",
            name: "privileged".to_string(),
            message: "the object has been modified".to_string(),
        };
        assert!(err.is_conflict());
    }
}
