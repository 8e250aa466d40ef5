//! Configuration file support for addonctl

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub behavior: Behavior,

    #[serde(default)]
    pub registry: RegistrySettings,

    #[serde(default)]
    pub router: RouterSettings,
}

/// Default values shared by every add-on
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Defaults {
    /// Server configuration directory; signer material lives in `<config_dir>/master`
    #[serde(default = "default_config_dir")]
    pub config_dir: String,

    /// Namespace the add-on services and service accounts live in
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Image name prefix, `-${component}:<tag>` is appended
    #[serde(default = "default_image_prefix")]
    pub image_prefix: String,

    #[serde(default = "default_image_tag")]
    pub image_tag: String,

    /// Host IP used for the router hostname when none is given
    #[serde(default = "default_host_ip")]
    pub host_ip: String,

    /// Wildcard DNS suffix appended to the host IP
    #[serde(default = "default_wildcard_domain")]
    pub wildcard_domain: String,

    /// Path or name of the `oc` binary
    #[serde(default = "default_oc_binary")]
    pub oc_binary: String,
}

/// Behavior settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Behavior {
    #[serde(default = "default_true")]
    pub show_progress: bool,

    #[serde(default = "default_true")]
    pub preflight: bool,
}

/// Registry installation defaults
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegistrySettings {
    /// Service probed to decide whether the registry is installed
    #[serde(default = "default_registry_service")]
    pub service: String,

    #[serde(default = "default_registry_name")]
    pub name: String,

    #[serde(default = "default_registry_type")]
    pub component: String,

    #[serde(default = "default_registry_ports")]
    pub ports: String,

    #[serde(default = "default_replicas")]
    pub replicas: u32,

    #[serde(default = "default_registry_labels")]
    pub labels: String,

    #[serde(default = "default_registry_volume")]
    pub volume: String,

    #[serde(default = "default_registry_service_account")]
    pub service_account: String,
}

/// Router installation defaults
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RouterSettings {
    #[serde(default = "default_router_name")]
    pub service: String,

    #[serde(default = "default_router_name")]
    pub name: String,

    #[serde(default = "default_router_type")]
    pub component: String,

    #[serde(default = "default_router_ports")]
    pub ports: String,

    #[serde(default = "default_replicas")]
    pub replicas: u32,

    #[serde(default = "default_router_labels")]
    pub labels: String,

    #[serde(default = "default_stats_port")]
    pub stats_port: u16,

    #[serde(default = "default_stats_username")]
    pub stats_username: String,

    #[serde(default = "default_true")]
    pub host_network: bool,

    #[serde(default = "default_true")]
    pub host_ports: bool,

    #[serde(default = "default_router_name")]
    pub service_account: String,

    /// SCC the router service account is granted
    #[serde(default = "default_privileged_scc")]
    pub scc: String,
}

// Default value functions
fn default_config_dir() -> String {
    "/var/lib/origin/openshift.local.config".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_image_prefix() -> String {
    "openshift/origin".to_string()
}

fn default_image_tag() -> String {
    "latest".to_string()
}

fn default_host_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_wildcard_domain() -> String {
    "xip.io".to_string()
}

fn default_oc_binary() -> String {
    "oc".to_string()
}

fn default_true() -> bool {
    true
}

fn default_replicas() -> u32 {
    1
}

fn default_registry_service() -> String {
    "docker-registry".to_string()
}

fn default_registry_name() -> String {
    "registry".to_string()
}

fn default_registry_type() -> String {
    "docker-registry".to_string()
}

fn default_registry_ports() -> String {
    "5000".to_string()
}

fn default_registry_labels() -> String {
    "docker-registry=default".to_string()
}

fn default_registry_volume() -> String {
    "/registry".to_string()
}

fn default_registry_service_account() -> String {
    "registry".to_string()
}

fn default_router_name() -> String {
    "router".to_string()
}

fn default_router_type() -> String {
    "haproxy-router".to_string()
}

fn default_router_ports() -> String {
    "80:80,443:443".to_string()
}

fn default_router_labels() -> String {
    "router=<name>".to_string()
}

fn default_stats_port() -> u16 {
    1936
}

fn default_stats_username() -> String {
    "admin".to_string()
}

fn default_privileged_scc() -> String {
    "privileged".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            namespace: default_namespace(),
            image_prefix: default_image_prefix(),
            image_tag: default_image_tag(),
            host_ip: default_host_ip(),
            wildcard_domain: default_wildcard_domain(),
            oc_binary: default_oc_binary(),
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            show_progress: default_true(),
            preflight: default_true(),
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            service: default_registry_service(),
            name: default_registry_name(),
            component: default_registry_type(),
            ports: default_registry_ports(),
            replicas: default_replicas(),
            labels: default_registry_labels(),
            volume: default_registry_volume(),
            service_account: default_registry_service_account(),
        }
    }
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            service: default_router_name(),
            name: default_router_name(),
            component: default_router_type(),
            ports: default_router_ports(),
            replicas: default_replicas(),
            labels: default_router_labels(),
            stats_port: default_stats_port(),
            stats_username: default_stats_username(),
            host_network: default_true(),
            host_ports: default_true(),
            service_account: default_router_name(),
            scc: default_privileged_scc(),
        }
    }
}

impl Settings {
    /// Load settings from file or return defaults
    pub fn load() -> Self {
        match Self::find_config_file() {
            Some(path) => match Self::load_from_file(&path) {
                Ok(settings) => settings,
                Err(e) => {
                    crate::log_warn!("{:#}, using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .addonctl.toml in current directory
    /// 2. ~/.config/addonctl/config.toml (XDG config directory)
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(".addonctl.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("addonctl").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Generate example config file content
    pub fn example_config() -> Result<String> {
        let header = "# addonctl configuration file\n\
                      # Place this file at ~/.config/addonctl/config.toml or .addonctl.toml in your working directory\n\n";

        let body =
            toml::to_string_pretty(&Settings::default()).context("Failed to serialize settings")?;

        Ok(format!("{}{}", header, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.defaults.namespace, "default");
        assert_eq!(settings.registry.service, "docker-registry");
        assert_eq!(settings.registry.ports, "5000");
        assert_eq!(settings.router.ports, "80:80,443:443");
        assert_eq!(settings.router.stats_port, 1936);
        assert_eq!(settings.router.scc, "privileged");
        assert!(settings.router.host_network);
    }

    #[test]
    fn test_partial_override() {
        let toml_str = r#"
[defaults]
image_prefix = "registry.local:5000/origin"
wildcard_domain = "nip.io"

[router]
replicas = 2
stats_username = "ops"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.defaults.image_prefix, "registry.local:5000/origin");
        assert_eq!(settings.defaults.wildcard_domain, "nip.io");
        assert_eq!(settings.defaults.namespace, "default");
        assert_eq!(settings.router.replicas, 2);
        assert_eq!(settings.router.stats_username, "ops");
        assert_eq!(settings.router.stats_port, 1936);
        assert_eq!(settings.registry.replicas, 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        writeln!(temp, "[registry]\nvolume = \"/data/registry\"").unwrap();

        let settings = Settings::load_from_file(temp.path()).unwrap();
        assert_eq!(settings.registry.volume, "/data/registry");
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        writeln!(temp, "[router\nreplicas = ").unwrap();

        assert!(Settings::load_from_file(temp.path()).is_err());
    }

    #[test]
    fn test_example_config_round_trips() {
        let example = Settings::example_config().unwrap();
        assert!(example.contains("addonctl configuration"));
        assert!(example.contains("[registry]"));
        assert!(example.contains("[router]"));

        let parsed: Settings = toml::from_str(&example).unwrap();
        assert_eq!(parsed.router.labels, "router=<name>");
    }
}
