//! Errors returned by the add-on installers

use crate::install::delegate::DelegateError;
use crate::k8s::ClusterError;
use thiserror::Error;

/// Locally detected failures carry a short message plus the cause; delegate
/// and I/O failures are passed through untouched.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("error retrieving {what}")]
    Lookup { what: String, source: ClusterError },

    #[error("cannot create {name} service account")]
    ServiceAccount { name: String, source: ClusterError },

    #[error("cannot retrieve {scc} SCC")]
    SccRead { scc: String, source: ClusterError },

    #[error("cannot update {scc} SCC")]
    SccUpdate { scc: String, source: ClusterError },

    #[error("cannot create {name} cert")]
    ServerCert { name: String, source: DelegateError },

    #[error(transparent)]
    Delegate(#[from] DelegateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InstallError {
    /// The cluster error underneath, if any
    pub fn cluster_cause(&self) -> Option<&ClusterError> {
        match self {
            InstallError::Lookup { source, .. }
            | InstallError::ServiceAccount { source, .. }
            | InstallError::SccRead { source, .. }
            | InstallError::SccUpdate { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_wrapped_errors_keep_cause() {
        let err = InstallError::SccUpdate {
            scc: "privileged".to_string(),
            source: ClusterError::Conflict {
                kind: "SecurityContextConstraints",
                name: "privileged".to_string(),
                message: "the object has been modified".to_string(),
            },
        };
        assert_eq!(err.to_string(), "cannot update privileged SCC");
        assert!(err.source().is_some());
        assert!(err.cluster_cause().is_some_and(ClusterError::is_conflict));
    }

    #[test]
    fn test_io_errors_pass_through() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "router.key: no such file");
        let err = InstallError::from(io);
        assert_eq!(err.to_string(), "router.key: no such file");
        assert!(err.cluster_cause().is_none());
    }
}
