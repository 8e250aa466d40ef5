//! `ClusterClient` backed by kube-rs
//!
//! The installers are synchronous, so the client owns a current-thread tokio
//! runtime and blocks on each request.

use crate::k8s::client::{ClusterClient, ClusterError, ServiceProbe};
use crate::k8s::events::ClusterEvent;
use crate::k8s::scc::{SCC_KIND, SecurityContextConstraints};
use k8s_openapi::api::core::v1::{Event, Service, ServiceAccount};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;
use tokio::runtime::Runtime;

pub struct KubeClusterClient {
    runtime: Runtime,
    client: Client,
}

impl KubeClusterClient {
    /// Connect using an explicit kubeconfig, or infer (KUBECONFIG, ~/.kube/config, in-cluster)
    pub fn connect(kubeconfig: Option<&Path>) -> Result<Self, ClusterError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClusterError::Runtime)?;

        let client = runtime.block_on(async {
            let config = match kubeconfig {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "loading kubeconfig");
                    let kc = Kubeconfig::read_from(path)
                        .map_err(|e| ClusterError::Config(e.to_string()))?;
                    Config::from_custom_kubeconfig(kc, &KubeConfigOptions::default())
                        .await
                        .map_err(|e| ClusterError::Config(e.to_string()))?
                }
                None => Config::infer()
                    .await
                    .map_err(|e| ClusterError::Config(e.to_string()))?,
            };
            Client::try_from(config).map_err(ClusterError::from)
        })?;

        Ok(Self { runtime, client })
    }
}

/// Map API status codes onto the error kinds callers branch on
fn classify(err: kube::Error, kind: &'static str, name: &str) -> ClusterError {
    match err {
        kube::Error::Api(e) if e.code == 404 => ClusterError::NotFound {
            kind,
            name: name.to_string(),
        },
        kube::Error::Api(e) if e.code == 409 && e.reason == "AlreadyExists" => {
            ClusterError::AlreadyExists {
                kind,
                name: name.to_string(),
            }
        }
        kube::Error::Api(e) if e.code == 409 => ClusterError::Conflict {
            kind,
            name: name.to_string(),
            message: e.message.clone(),
        },
        kube::Error::Api(e) if e.code == 403 => ClusterError::Forbidden {
            kind,
            name: name.to_string(),
            message: e.message.clone(),
        },
        other => ClusterError::Api(other),
    }
}

impl ClusterClient for KubeClusterClient {
    fn probe_service(&self, namespace: &str, name: &str) -> Result<ServiceProbe, ClusterError> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        match self.runtime.block_on(api.get(name)) {
            Ok(_) => Ok(ServiceProbe::Found),
            Err(kube::Error::Api(e)) if e.code == 404 => Ok(ServiceProbe::NotFound),
            Err(e) => Err(classify(e, "Service", name)),
        }
    }

    fn create_service_account(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        let api: Api<ServiceAccount> = Api::namespaced(self.client.clone(), namespace);
        let sa = ServiceAccount {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        self.runtime
            .block_on(api.create(&PostParams::default(), &sa))
            .map_err(|e| classify(e, "ServiceAccount", name))?;

        tracing::debug!(namespace, name, "created service account");
        Ok(())
    }

    fn get_scc(&self, name: &str) -> Result<SecurityContextConstraints, ClusterError> {
        let api: Api<SecurityContextConstraints> = Api::all(self.client.clone());
        self.runtime
            .block_on(api.get(name))
            .map_err(|e| classify(e, SCC_KIND, name))
    }

    fn update_scc(
        &self,
        scc: &SecurityContextConstraints,
    ) -> Result<SecurityContextConstraints, ClusterError> {
        let name = scc.name();
        if scc.metadata.resource_version.is_none() {
            return Err(ClusterError::MissingResourceVersion {
                kind: SCC_KIND,
                name: name.to_string(),
            });
        }

        // The API server rejects the replace with 409 when resourceVersion is stale
        let api: Api<SecurityContextConstraints> = Api::all(self.client.clone());
        self.runtime
            .block_on(api.replace(name, &PostParams::default(), scc))
            .map_err(|e| classify(e, SCC_KIND, name))
    }

    fn list_events(&self) -> Result<Vec<ClusterEvent>, ClusterError> {
        let api: Api<Event> = Api::all(self.client.clone());
        let events = self
            .runtime
            .block_on(api.list(&ListParams::default()))
            .map_err(|e| classify(e, "Event", ""))?;

        Ok(events.items.iter().map(ClusterEvent::from).collect())
    }
}
