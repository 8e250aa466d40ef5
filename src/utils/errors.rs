//! Error reports with actionable suggestions

use crate::install::InstallError;
use crate::install::delegate::DelegateError;
use crate::k8s::ClusterError;
use colored::Colorize;

/// An error message plus hints on how to get past it
#[derive(Debug)]
pub struct ErrorReport {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    /// Add a suggestion to the report
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Display the error with suggestions
    pub fn display(&self) {
        crate::log_error!("{}", self.message);
        eprintln!("{} {}", "error:".red().bold(), self.message);

        if !self.suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggestions:".yellow().bold());
            for suggestion in &self.suggestions {
                eprintln!("  {} {}", "→".blue(), suggestion);
            }
        }
    }

    /// Build a report for an error coming out of a command
    pub fn from_error(err: &anyhow::Error) -> Self {
        let report = Self::new(format!("{:#}", err));

        if let Some(install) = err.downcast_ref::<InstallError>() {
            return report.with_install_hints(install);
        }
        if let Some(cluster) = err.downcast_ref::<ClusterError>() {
            return report.with_cluster_hints(cluster);
        }

        report.suggest("Run with -vv for more details")
    }

    fn with_install_hints(self, err: &InstallError) -> Self {
        match err {
            InstallError::ServiceAccount {
                name,
                source: ClusterError::AlreadyExists { .. },
            } => self
                .suggest(format!(
                    "A previous install left the '{}' service account behind",
                    name
                ))
                .suggest(format!(
                    "Remove it with: oc delete serviceaccount {} -n default",
                    name
                )),
            InstallError::SccUpdate {
                source: ClusterError::Conflict { .. },
                ..
            } => self
                .suggest("Another client modified the SCC while it was being updated")
                .suggest("Re-run the install; the router service does not exist yet"),
            InstallError::ServerCert { .. } => self
                .suggest("Check that ca.crt, ca.key and ca.serial.txt exist under <config-dir>/master")
                .suggest("Pass --config-dir if the master configuration lives elsewhere"),
            InstallError::Delegate(DelegateError::Spawn { .. }) => self
                .suggest("Ensure the oc binary is installed and in your PATH")
                .suggest("Run 'addonctl check prereqs'"),
            InstallError::Io(_) => {
                self.suggest("Verify the master configuration directory is writable")
            }
            other => match other.cluster_cause() {
                Some(cause) => self.with_cluster_hints(cause),
                None => self.suggest("Run with -vv to see the admin command output"),
            },
        }
    }

    fn with_cluster_hints(self, err: &ClusterError) -> Self {
        match err {
            ClusterError::Forbidden { .. } => self
                .suggest("Verify you have cluster-admin permissions")
                .suggest("Use --kubeconfig <config-dir>/master/admin.kubeconfig"),
            ClusterError::Config(_) => self
                .suggest("Set KUBECONFIG or pass --kubeconfig")
                .suggest("Verify the cluster is running"),
            _ => self.suggest("Check that the cluster API is reachable"),
        }
    }
}
