//! Well-known files under the master configuration directory

use std::path::{Path, PathBuf};

/// Files the router install reads and writes inside `<config_dir>/master`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterPaths {
    dir: PathBuf,
}

impl MasterPaths {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            dir: config_dir.join("master"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cluster root CA certificate
    pub fn ca_cert(&self) -> PathBuf {
        self.dir.join("ca.crt")
    }

    pub fn ca_key(&self) -> PathBuf {
        self.dir.join("ca.key")
    }

    pub fn ca_serial(&self) -> PathBuf {
        self.dir.join("ca.serial.txt")
    }

    pub fn router_cert(&self) -> PathBuf {
        self.dir.join("router.crt")
    }

    pub fn router_key(&self) -> PathBuf {
        self.dir.join("router.key")
    }

    /// Combined cert + key + CA used as the router's default certificate
    pub fn router_bundle(&self) -> PathBuf {
        self.dir.join("router.pem")
    }

    pub fn admin_kubeconfig(&self) -> PathBuf {
        self.dir.join("admin.kubeconfig")
    }

    /// Signer material that must exist before a router cert can be issued
    pub fn signer_files(&self) -> [PathBuf; 3] {
        [self.ca_cert(), self.ca_key(), self.ca_serial()]
    }
}
