//! DNS daemon set, applied verbatim from the bundled manifest

use crate::k8s::kubectl;
use crate::utils::DryRun;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DNS_MANIFEST: &str = include_str!("../../manifests/dns-daemonset.yaml");
pub const DNS_NAMESPACE: &str = "openshift-dns";
pub const DNS_DAEMONSET: &str = "dns-default";

/// Apply the DNS manifest unless the daemon set is already present
pub fn install(kubeconfig: Option<&Path>, dry_run: DryRun) -> Result<()> {
    let exists =
        kubectl::resource_exists("daemonset", DNS_DAEMONSET, Some(DNS_NAMESPACE), kubeconfig)
            .context("Failed to look up DNS daemon set")?;
    if exists {
        crate::log_info!(
            "daemonset/{} already exists in {}, skipping DNS installation",
            DNS_DAEMONSET,
            DNS_NAMESPACE
        );
        return Ok(());
    }

    let objects = manifest_objects()?;
    crate::log_info!("Installing DNS daemon set {}/{}...", DNS_NAMESPACE, DNS_DAEMONSET);
    tracing::debug!(?objects, "DNS manifest");

    dry_run.log_actions(&objects);
    dry_run.exec_unless("kubectl apply -f - (manifests/dns-daemonset.yaml)", || {
        kubectl::apply_yaml(DNS_MANIFEST, kubeconfig).context("Failed to apply DNS manifest")
    })?;

    crate::log_info!("DNS daemon set applied");
    Ok(())
}

/// `Kind/name` of every object in the manifest, in document order
pub fn manifest_objects() -> Result<Vec<String>> {
    serde_yaml::Deserializer::from_str(DNS_MANIFEST)
        .map(|doc| {
            let value = serde_yaml::Value::deserialize(doc).context("Invalid DNS manifest")?;
            Ok(format!(
                "{}/{}",
                value["kind"].as_str().unwrap_or_default(),
                value["metadata"]["name"].as_str().unwrap_or_default()
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::DaemonSet;
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

    fn documents() -> Vec<serde_yaml::Value> {
        serde_yaml::Deserializer::from_str(DNS_MANIFEST)
            .map(|doc| serde_yaml::Value::deserialize(doc).unwrap())
            .collect()
    }

    fn daemonset() -> DaemonSet {
        let doc = documents()
            .into_iter()
            .find(|d| d["kind"] == "DaemonSet")
            .unwrap();
        serde_yaml::from_value(doc).unwrap()
    }

    #[test]
    fn test_manifest_parses() {
        let kinds: Vec<String> = documents()
            .iter()
            .map(|d| d["kind"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, ["Namespace", "ServiceAccount", "ConfigMap", "DaemonSet"]);
    }

    #[test]
    fn test_lookup_failure_stops_install() {
        let err = install(Some(Path::new("/nonexistent/kubeconfig")), DryRun::enabled()).unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to look up DNS daemon set"));
    }

    #[test]
    fn test_manifest_objects() {
        assert_eq!(
            manifest_objects().unwrap(),
            [
                "Namespace/openshift-dns",
                "ServiceAccount/dns",
                "ConfigMap/dns-default",
                "DaemonSet/dns-default"
            ]
        );
    }

    #[test]
    fn test_rolling_update_budget() {
        let ds = daemonset();
        assert_eq!(ds.metadata.name.as_deref(), Some(DNS_DAEMONSET));
        assert_eq!(ds.metadata.namespace.as_deref(), Some(DNS_NAMESPACE));

        let strategy = ds.spec.unwrap().update_strategy.unwrap();
        assert_eq!(strategy.type_.as_deref(), Some("RollingUpdate"));
        assert_eq!(
            strategy.rolling_update.unwrap().max_unavailable,
            Some(IntOrString::String("10%".to_string()))
        );
    }

    #[test]
    fn test_one_pod_per_node() {
        let spec = daemonset().spec.unwrap();
        let selector = spec.selector.match_labels.unwrap();
        let pod_spec = spec.template.spec.unwrap();

        let anti = pod_spec
            .affinity
            .unwrap()
            .pod_anti_affinity
            .unwrap()
            .required_during_scheduling_ignored_during_execution
            .unwrap();
        assert_eq!(anti.len(), 1);
        assert_eq!(anti[0].topology_key, "kubernetes.io/hostname");
        assert_eq!(
            anti[0].label_selector.as_ref().unwrap().match_labels.as_ref(),
            Some(&selector)
        );
    }
}
