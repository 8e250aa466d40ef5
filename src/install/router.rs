//! Default router installation

use crate::install::bundle::concatenate;
use crate::install::delegate::{RouterConfig, ServerCertOptions};
use crate::install::{InstallError, Installer};
use crate::k8s::scc::service_account_username;
use crate::utils::MasterPaths;
use crate::utils::logger::log_command_output;
use std::path::Path;

impl Installer<'_> {
    /// Install the router unless its service already exists.
    ///
    /// Creates the router service account, grants it the privileged SCC,
    /// issues a wildcard certificate for `<host_ip>.<wildcard_domain>` and
    /// bundles it with its key and the CA before running the router command.
    /// Nothing is rolled back when a later step fails.
    pub fn install_router(
        &self,
        image_tag: &str,
        config_dir: &Path,
        host_ip: &str,
    ) -> Result<(), InstallError> {
        let router = &self.settings.router;

        if self.service_exists(&router.service, "router service")? {
            crate::log_info!(
                "{} service already exists in {}, skipping router installation",
                router.service,
                self.namespace()
            );
            return Ok(());
        }

        let master = MasterPaths::new(config_dir);
        let cert_options = self.router_cert_options(&master, host_ip);
        let config = self.router_config(&master, image_tag);

        if self.dry_run.is_enabled() {
            self.dry_run.log_actions(&[
                format!(
                    "create service account {}/{}",
                    self.namespace(),
                    router.service_account
                ),
                format!(
                    "add {} to SCC {}",
                    service_account_username(self.namespace(), &router.service_account),
                    router.scc
                ),
                format!("oc adm {}", cert_options.args().join(" ")),
                format!("write trust bundle {}", master.router_bundle().display()),
                format!("oc adm {}", config.args().join(" ")),
            ]);
            return Ok(());
        }

        crate::log_info!(
            "Creating service account {}/{}",
            self.namespace(),
            router.service_account
        );
        self.client
            .create_service_account(self.namespace(), &router.service_account)
            .map_err(|source| InstallError::ServiceAccount {
                name: router.service_account.clone(),
                source,
            })?;

        self.grant_router_scc()?;

        crate::log_info!("Creating router certificate for {}", cert_options.hostnames.join(","));
        let mut output = Vec::new();
        let result = self.signer.create_server_cert(&cert_options, &mut output);
        log_command_output("Create server cert", &output);
        result.map_err(|source| InstallError::ServerCert {
            name: router.name.clone(),
            source,
        })?;

        concatenate(
            &master.router_bundle(),
            &[master.router_cert(), master.router_key(), master.ca_cert()],
        )?;
        tracing::debug!(bundle = %master.router_bundle().display(), "wrote router trust bundle");

        crate::log_info!("Installing router {} with images {}", config.name, config.images);
        let mut output = Vec::new();
        let result = self.admin.create_router(&config, &mut output);
        log_command_output("Router", &output);
        result?;

        crate::log_info!("Router installed");
        Ok(())
    }

    /// Add the router service account to the configured SCC.
    ///
    /// The replace carries the resourceVersion that was read, so a concurrent
    /// writer makes this fail instead of silently losing its grant.
    fn grant_router_scc(&self) -> Result<(), InstallError> {
        let router = &self.settings.router;

        let mut scc = self
            .client
            .get_scc(&router.scc)
            .map_err(|source| InstallError::SccRead {
                scc: router.scc.clone(),
                source,
            })?;

        let user = service_account_username(self.namespace(), &router.service_account);
        if scc.grant_user(&user) {
            crate::log_info!("Adding {} to SCC {}", user, router.scc);
        } else {
            crate::log_warn!("{} is already listed in SCC {}", user, router.scc);
            crate::log_info!("Updating SCC {}", router.scc);
        }

        self.client
            .update_scc(&scc)
            .map_err(|source| InstallError::SccUpdate {
                scc: router.scc.clone(),
                source,
            })?;

        Ok(())
    }

    pub fn router_cert_options(&self, master: &MasterPaths, host_ip: &str) -> ServerCertOptions {
        ServerCertOptions {
            signer_cert: master.ca_cert(),
            signer_key: master.ca_key(),
            signer_serial: master.ca_serial(),
            hostnames: vec![format!(
                "{}.{}",
                host_ip, self.settings.defaults.wildcard_domain
            )],
            cert: master.router_cert(),
            key: master.router_key(),
            overwrite: true,
        }
    }

    pub fn router_config(&self, master: &MasterPaths, image_tag: &str) -> RouterConfig {
        let router = &self.settings.router;
        RouterConfig {
            name: router.name.clone(),
            component: router.component.clone(),
            images: self.image_template(image_tag),
            ports: router.ports.clone(),
            replicas: router.replicas,
            labels: router.labels.clone(),
            credentials: master.admin_kubeconfig(),
            default_certificate: master.router_bundle(),
            stats_port: router.stats_port,
            stats_username: router.stats_username.clone(),
            host_network: router.host_network,
            host_ports: router.host_ports,
            service_account: router.service_account.clone(),
        }
    }
}
