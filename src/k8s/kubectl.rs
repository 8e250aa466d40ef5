//! Kubectl wrapper utilities, used where a manifest is applied verbatim

use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

fn kubectl(kubeconfig: Option<&Path>) -> Command {
    let mut cmd = Command::new("kubectl");
    if let Some(kc) = kubeconfig {
        cmd.env("KUBECONFIG", kc);
    }
    cmd
}

/// Whether `kubectl get <resource> <name>` finds the object.
///
/// Only a NotFound answer from the server means absent; any other failure
/// (unreachable cluster, forbidden, bad kubeconfig) is an error.
pub fn resource_exists(
    resource: &str,
    name: &str,
    namespace: Option<&str>,
    kubeconfig: Option<&Path>,
) -> Result<bool> {
    let mut args = vec!["get", resource, name];
    if let Some(ns) = namespace {
        args.push("-n");
        args.push(ns);
    }

    let output = kubectl(kubeconfig)
        .args(&args)
        .output()
        .context("Failed to run kubectl command")?;

    if output.status.success() {
        return Ok(true);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if is_not_found(&stderr) {
        return Ok(false);
    }

    Err(anyhow!(
        "kubectl command failed: {}\n{}",
        args.join(" "),
        stderr.trim()
    ))
}

/// kubectl reports a missing object as `Error from server (NotFound): ...`
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("(NotFound)")
}

/// Apply a YAML manifest from string
pub fn apply_yaml(yaml: &str, kubeconfig: Option<&Path>) -> Result<()> {
    let mut child = kubectl(kubeconfig)
        .args(["apply", "-f", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .context("Failed to spawn kubectl apply")?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(yaml.as_bytes())
            .context("Failed to write YAML to kubectl")?;
    }

    let status = child.wait().context("Failed to wait for kubectl apply")?;

    if !status.success() {
        return Err(anyhow!("kubectl apply failed"));
    }

    Ok(())
}
