//! Install command implementations

use crate::config::Settings;
use crate::install::{self, AddonKind, AddonRequest, Installer, OcAdm};
use crate::k8s::KubeClusterClient;
use crate::utils::preflight::PreflightChecker;
use crate::utils::{DryRun, MasterPaths, progress};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

/// Flags shared by every `install` subcommand
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub kubeconfig: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
    pub image_tag: Option<String>,
    pub host_ip: Option<String>,
    pub skip_preflight: bool,
    pub dry_run: DryRun,
}

impl InstallOptions {
    fn request(&self, kind: AddonKind, settings: &Settings) -> AddonRequest {
        AddonRequest {
            kind,
            image_tag: self
                .image_tag
                .clone()
                .unwrap_or_else(|| settings.defaults.image_tag.clone()),
            config_dir: self
                .config_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(&settings.defaults.config_dir)),
            host_ip: self.host_ip.clone(),
        }
    }
}

/// Install one or more of the registry and router add-ons
pub fn install_addons(kinds: &[AddonKind], options: &InstallOptions) -> Result<()> {
    let settings = Settings::load();

    if settings.behavior.preflight && !options.skip_preflight {
        run_preflight(kinds, options, &settings)?;
    }

    let client = KubeClusterClient::connect(options.kubeconfig.as_deref())
        .context("Failed to connect to the cluster")?;
    let oc = OcAdm::new(&settings.defaults.oc_binary, options.kubeconfig.clone());
    let installer = Installer::new(&client, &oc, &oc, &settings).with_dry_run(options.dry_run);

    for kind in kinds {
        let request = options.request(*kind, &settings);
        progress::with_spinner_result(
            settings.behavior.show_progress && !options.dry_run.is_enabled(),
            &format!("Installing {}...", kind),
            &format!("{} ready", kind),
            || installer.install(&request),
        )
        .with_context(|| format!("Failed to install {}", kind))?;
    }

    Ok(())
}

/// Apply the DNS daemon set
pub fn install_dns(options: &InstallOptions) -> Result<()> {
    let settings = Settings::load();

    progress::with_spinner_result(
        settings.behavior.show_progress && !options.dry_run.is_enabled(),
        "Installing DNS...",
        "dns ready",
        || install::dns::install(options.kubeconfig.as_deref(), options.dry_run),
    )
}

fn run_preflight(kinds: &[AddonKind], options: &InstallOptions, settings: &Settings) -> Result<()> {
    crate::log_info!("Running preflight checks...");

    let mut checker = PreflightChecker::new();
    checker.check_oc(&settings.defaults.oc_binary);

    if kinds.contains(&AddonKind::Router) {
        let config_dir = options
            .config_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.defaults.config_dir));
        checker.check_master_dir(&MasterPaths::new(&config_dir));
    }

    if !checker.display_results() {
        bail!("Preflight checks failed (use --skip-preflight to bypass)");
    }
    Ok(())
}
