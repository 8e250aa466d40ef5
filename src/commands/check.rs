//! Check command implementations

use crate::config::Settings;
use crate::k8s::events::scc_denials;
use crate::k8s::{ClusterClient, KubeClusterClient};
use crate::utils::{CommonPrereqs, Prerequisite};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::path::Path;

/// Verify the tools the installers shell out to
pub fn prereqs() -> Result<()> {
    crate::log_info!("Checking prerequisites...");

    let settings = Settings::load();
    let oc = CommonPrereqs::oc(&settings.defaults.oc_binary);
    let kubectl = CommonPrereqs::kubectl();

    let (found, missing) = CommonPrereqs::check_all(&[&oc as &dyn Prerequisite, &kubectl]);

    for name in &found {
        println!("  {} {}", "✓".green(), name);
    }
    for (name, hint) in &missing {
        println!("  {} {} ({})", "✗".red(), name, hint);
    }

    if !missing.is_empty() {
        bail!("{} required tool(s) missing", missing.len());
    }

    crate::log_info!("All prerequisites satisfied");
    Ok(())
}

/// List SCC admission denials recorded as cluster events
pub fn scc_denials_command(kubeconfig: Option<&Path>, strict: bool) -> Result<()> {
    let client =
        KubeClusterClient::connect(kubeconfig).context("Failed to connect to the cluster")?;
    report_scc_denials(&client, strict).map(|_| ())
}

/// Denials are reported as warnings unless `strict` is set, in which case any
/// denial fails the check
pub fn report_scc_denials(client: &dyn ClusterClient, strict: bool) -> Result<Vec<String>> {
    let events = client.list_events().context("Failed to list events")?;
    let denials = scc_denials(&events);

    if denials.is_empty() {
        crate::log_info!("No SCC denials found in {} event(s)", events.len());
        return Ok(denials);
    }

    for denial in &denials {
        println!("  {} {}", "⚠".yellow(), denial);
    }
    crate::log_warn!("Found {} SCC denial(s)", denials.len());

    if strict {
        bail!("{} pod(s) were denied by security context constraints", denials.len());
    }
    Ok(denials)
}
