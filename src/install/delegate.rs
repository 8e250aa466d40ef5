//! Admin command delegates: registry, router and server certificate creation
//!
//! The installers only decide *what* to create; the actual object generation
//! is left to `oc adm`. Each delegate takes a typed configuration and an
//! output sink that receives whatever the command printed.

use crate::config::ImageTemplate;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DelegateError {
    #[error("failed to run {command}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to capture {command} output")]
    Output {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Options for `oc adm registry`
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    pub name: String,
    /// Registry component type, substituted into the image template
    pub component: String,
    pub images: ImageTemplate,
    pub ports: String,
    pub replicas: u32,
    pub labels: String,
    pub volume: String,
    pub service_account: String,
}

impl RegistryConfig {
    pub fn args(&self) -> Vec<String> {
        vec![
            "registry".to_string(),
            self.name.clone(),
            format!("--type={}", self.component),
            format!("--images={}", self.images),
            format!("--ports={}", self.ports),
            format!("--replicas={}", self.replicas),
            format!("--labels={}", self.labels),
            format!("--volume={}", self.volume),
            format!("--service-account={}", self.service_account),
        ]
    }
}

/// Options for `oc adm router`
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    pub name: String,
    pub component: String,
    pub images: ImageTemplate,
    pub ports: String,
    pub replicas: u32,
    pub labels: String,
    /// Kubeconfig the router uses to watch routes
    pub credentials: PathBuf,
    /// Combined cert/key/CA served for routes without their own certificate
    pub default_certificate: PathBuf,
    pub stats_port: u16,
    pub stats_username: String,
    pub host_network: bool,
    pub host_ports: bool,
    pub service_account: String,
}

impl RouterConfig {
    pub fn args(&self) -> Vec<String> {
        vec![
            "router".to_string(),
            self.name.clone(),
            format!("--type={}", self.component),
            format!("--images={}", self.images),
            format!("--ports={}", self.ports),
            format!("--replicas={}", self.replicas),
            format!("--labels={}", self.labels),
            format!("--credentials={}", self.credentials.display()),
            format!("--default-cert={}", self.default_certificate.display()),
            format!("--stats-port={}", self.stats_port),
            format!("--stats-user={}", self.stats_username),
            format!("--host-network={}", self.host_network),
            format!("--host-ports={}", self.host_ports),
            format!("--service-account={}", self.service_account),
        ]
    }
}

/// Options for `oc adm ca create-server-cert`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerCertOptions {
    pub signer_cert: PathBuf,
    pub signer_key: PathBuf,
    pub signer_serial: PathBuf,
    pub hostnames: Vec<String>,
    pub cert: PathBuf,
    pub key: PathBuf,
    pub overwrite: bool,
}

impl ServerCertOptions {
    pub fn args(&self) -> Vec<String> {
        vec![
            "ca".to_string(),
            "create-server-cert".to_string(),
            format!("--signer-cert={}", self.signer_cert.display()),
            format!("--signer-key={}", self.signer_key.display()),
            format!("--signer-serial={}", self.signer_serial.display()),
            format!("--hostnames={}", self.hostnames.join(",")),
            format!("--cert={}", self.cert.display()),
            format!("--key={}", self.key.display()),
            format!("--overwrite={}", self.overwrite),
        ]
    }
}

/// Registry and router creation
pub trait AdminCommands {
    fn create_registry(
        &self,
        config: &RegistryConfig,
        out: &mut dyn Write,
    ) -> Result<(), DelegateError>;

    fn create_router(&self, config: &RouterConfig, out: &mut dyn Write) -> Result<(), DelegateError>;
}

/// Leaf certificate issuance from the cluster CA
pub trait CertSigner {
    fn create_server_cert(
        &self,
        options: &ServerCertOptions,
        out: &mut dyn Write,
    ) -> Result<(), DelegateError>;
}

/// Delegates backed by the `oc` binary
#[derive(Debug, Clone)]
pub struct OcAdm {
    binary: String,
    kubeconfig: Option<PathBuf>,
}

impl OcAdm {
    pub fn new(binary: impl Into<String>, kubeconfig: Option<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig,
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("adm").args(args);
        if let Some(kc) = &self.kubeconfig {
            cmd.arg(format!("--config={}", kc.display()));
        }
        cmd
    }

    /// Run `oc adm <args>`, copying stdout and stderr into `out`
    fn run(&self, args: &[String], out: &mut dyn Write) -> Result<(), DelegateError> {
        let command = format!(
            "{} adm {}",
            self.binary,
            args.iter()
                .take_while(|a| !a.starts_with("--"))
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        );
        tracing::debug!(command = %command, ?args, "running admin command");

        let output = self
            .command(args)
            .output()
            .map_err(|source| DelegateError::Spawn {
                command: command.clone(),
                source,
            })?;

        out.write_all(&output.stdout)
            .and_then(|_| out.write_all(&output.stderr))
            .map_err(|source| DelegateError::Output {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DelegateError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl AdminCommands for OcAdm {
    fn create_registry(
        &self,
        config: &RegistryConfig,
        out: &mut dyn Write,
    ) -> Result<(), DelegateError> {
        self.run(&config.args(), out)
    }

    fn create_router(&self, config: &RouterConfig, out: &mut dyn Write) -> Result<(), DelegateError> {
        self.run(&config.args(), out)
    }
}

impl CertSigner for OcAdm {
    fn create_server_cert(
        &self,
        options: &ServerCertOptions,
        out: &mut dyn Write,
    ) -> Result<(), DelegateError> {
        self.run(&options.args(), out)
    }
}
