//! Integrated image registry installation

use crate::install::delegate::RegistryConfig;
use crate::install::{InstallError, Installer};
use crate::utils::logger::log_command_output;
use std::path::Path;

impl Installer<'_> {
    /// Install the registry unless its service already exists
    pub fn install_registry(&self, image_tag: &str, config_dir: &Path) -> Result<(), InstallError> {
        let registry = &self.settings.registry;

        if self.service_exists(&registry.service, "docker registry service")? {
            crate::log_info!(
                "{} service already exists in {}, skipping registry installation",
                registry.service,
                self.namespace()
            );
            return Ok(());
        }

        let config = self.registry_config(image_tag);
        crate::log_info!(
            "Installing registry {} with images {}",
            config.name,
            config.images
        );
        tracing::debug!(config_dir = %config_dir.display(), ?config, "registry configuration");

        if self.dry_run.is_enabled() {
            self.dry_run.log_actions(&[format!(
                "oc adm {}",
                config.args().join(" ")
            )]);
            return Ok(());
        }

        let mut output = Vec::new();
        let result = self.admin.create_registry(&config, &mut output);
        log_command_output("Registry", &output);
        result?;

        crate::log_info!("Registry installed");
        Ok(())
    }

    pub fn registry_config(&self, image_tag: &str) -> RegistryConfig {
        let registry = &self.settings.registry;
        RegistryConfig {
            name: registry.name.clone(),
            component: registry.component.clone(),
            images: self.image_template(image_tag),
            ports: registry.ports.clone(),
            replicas: registry.replicas,
            labels: registry.labels.clone(),
            volume: registry.volume.clone(),
            service_account: registry.service_account.clone(),
        }
    }
}
