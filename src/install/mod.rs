//! Add-on installation
//!
//! Each installer follows the same shape: probe for the add-on's service and
//! stop if it is already there, provision whatever the add-on needs, then hand
//! the actual object creation to an admin command delegate.

pub mod bundle;
pub mod delegate;
pub mod dns;
pub mod error;
pub mod registry;
pub mod router;

use crate::config::{ImageTemplate, Settings};
use crate::k8s::{ClusterClient, ServiceProbe};
use crate::utils::DryRun;
use std::fmt;
use std::path::PathBuf;

pub use delegate::{AdminCommands, CertSigner, OcAdm};
pub use error::InstallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonKind {
    Registry,
    Router,
}

impl fmt::Display for AddonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddonKind::Registry => f.write_str("registry"),
            AddonKind::Router => f.write_str("router"),
        }
    }
}

/// One install invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonRequest {
    pub kind: AddonKind,
    pub image_tag: String,
    pub config_dir: PathBuf,
    /// Only used by the router; falls back to `defaults.host_ip`
    pub host_ip: Option<String>,
}

/// Installs add-ons against one cluster
pub struct Installer<'a> {
    client: &'a dyn ClusterClient,
    admin: &'a dyn AdminCommands,
    signer: &'a dyn CertSigner,
    settings: &'a Settings,
    dry_run: DryRun,
}

impl<'a> Installer<'a> {
    pub fn new(
        client: &'a dyn ClusterClient,
        admin: &'a dyn AdminCommands,
        signer: &'a dyn CertSigner,
        settings: &'a Settings,
    ) -> Self {
        Self {
            client,
            admin,
            signer,
            settings,
            dry_run: DryRun::disabled(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: DryRun) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn install(&self, request: &AddonRequest) -> Result<(), InstallError> {
        match request.kind {
            AddonKind::Registry => self.install_registry(&request.image_tag, &request.config_dir),
            AddonKind::Router => {
                let host_ip = request
                    .host_ip
                    .as_deref()
                    .unwrap_or(&self.settings.defaults.host_ip);
                self.install_router(&request.image_tag, &request.config_dir, host_ip)
            }
        }
    }

    fn image_template(&self, tag: &str) -> ImageTemplate {
        ImageTemplate::for_tag(&self.settings.defaults.image_prefix, tag)
    }

    fn namespace(&self) -> &str {
        &self.settings.defaults.namespace
    }

    /// Whether `service` already exists; any failure other than not-found is
    /// fatal and reported as "error retrieving `what`"
    fn service_exists(&self, service: &str, what: &str) -> Result<bool, InstallError> {
        match self.client.probe_service(self.namespace(), service) {
            Ok(ServiceProbe::Found) => Ok(true),
            Ok(ServiceProbe::NotFound) => Ok(false),
            Err(source) => Err(InstallError::Lookup {
                what: what.to_string(),
                source,
            }),
        }
    }
}
