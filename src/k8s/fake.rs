//! In-memory `ClusterClient` that records every call

use crate::k8s::client::{ClusterClient, ClusterError, ServiceProbe};
use crate::k8s::events::ClusterEvent;
use crate::k8s::scc::{SCC_KIND, SecurityContextConstraints};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ProbeService(String, String),
    CreateServiceAccount(String, String),
    GetScc(String),
    UpdateScc(String),
    ListEvents,
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::CreateServiceAccount(..) | Call::UpdateScc(_))
    }
}

/// Verbs that can be made to fail with `Forbidden`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verb {
    ProbeService,
    CreateServiceAccount,
    GetScc,
    UpdateScc,
    ListEvents,
}

#[derive(Default)]
pub struct FakeClusterClient {
    services: BTreeSet<(String, String)>,
    service_accounts: RefCell<BTreeSet<(String, String)>>,
    sccs: RefCell<BTreeMap<String, SecurityContextConstraints>>,
    events: Vec<ClusterEvent>,
    failing: BTreeSet<Verb>,
    /// Bump the stored SCC between read and write, as a racing writer would
    race_scc_update: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeClusterClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, namespace: &str, name: &str) -> Self {
        self.services
            .insert((namespace.to_string(), name.to_string()));
        self
    }

    pub fn with_service_account(self, namespace: &str, name: &str) -> Self {
        self.service_accounts
            .borrow_mut()
            .insert((namespace.to_string(), name.to_string()));
        self
    }

    pub fn with_scc(self, mut scc: SecurityContextConstraints) -> Self {
        if scc.metadata.resource_version.is_none() {
            scc.metadata.resource_version = Some("1".to_string());
        }
        self.sccs
            .borrow_mut()
            .insert(scc.name().to_string(), scc);
        self
    }

    pub fn with_events(mut self, events: Vec<ClusterEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn failing(mut self, verb: Verb) -> Self {
        self.failing.insert(verb);
        self
    }

    pub fn racing_scc_update(mut self) -> Self {
        self.race_scc_update = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> usize {
        self.calls.borrow().iter().filter(|c| c.is_mutation()).count()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matcher(c)).count()
    }

    pub fn scc(&self, name: &str) -> Option<SecurityContextConstraints> {
        self.sccs.borrow().get(name).cloned()
    }

    pub fn has_service_account(&self, namespace: &str, name: &str) -> bool {
        self.service_accounts
            .borrow()
            .contains(&(namespace.to_string(), name.to_string()))
    }

    fn check(&self, verb: Verb, kind: &'static str, name: &str) -> Result<(), ClusterError> {
        if self.failing.contains(&verb) {
            return Err(ClusterError::Forbidden {
                kind,
                name: name.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl ClusterClient for FakeClusterClient {
    fn probe_service(&self, namespace: &str, name: &str) -> Result<ServiceProbe, ClusterError> {
        self.calls
            .borrow_mut()
            .push(Call::ProbeService(namespace.to_string(), name.to_string()));
        self.check(Verb::ProbeService, "Service", name)?;

        if self
            .services
            .contains(&(namespace.to_string(), name.to_string()))
        {
            Ok(ServiceProbe::Found)
        } else {
            Ok(ServiceProbe::NotFound)
        }
    }

    fn create_service_account(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.calls
            .borrow_mut()
            .push(Call::CreateServiceAccount(namespace.to_string(), name.to_string()));
        self.check(Verb::CreateServiceAccount, "ServiceAccount", name)?;

        let inserted = self
            .service_accounts
            .borrow_mut()
            .insert((namespace.to_string(), name.to_string()));
        if !inserted {
            return Err(ClusterError::AlreadyExists {
                kind: "ServiceAccount",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn get_scc(&self, name: &str) -> Result<SecurityContextConstraints, ClusterError> {
        self.calls.borrow_mut().push(Call::GetScc(name.to_string()));
        self.check(Verb::GetScc, SCC_KIND, name)?;

        let scc = self
            .sccs
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::NotFound {
                kind: SCC_KIND,
                name: name.to_string(),
            })?;

        if self.race_scc_update {
            let mut sccs = self.sccs.borrow_mut();
            if let Some(stored) = sccs.get_mut(name) {
                stored.grant_user("system:serviceaccount:kube-system:racer");
                stored.metadata.resource_version = Some("racer".to_string());
            }
        }

        Ok(scc)
    }

    fn update_scc(
        &self,
        scc: &SecurityContextConstraints,
    ) -> Result<SecurityContextConstraints, ClusterError> {
        let name = scc.name().to_string();
        self.calls.borrow_mut().push(Call::UpdateScc(name.clone()));
        self.check(Verb::UpdateScc, SCC_KIND, &name)?;

        let mut sccs = self.sccs.borrow_mut();
        let stored = sccs.get_mut(&name).ok_or_else(|| ClusterError::NotFound {
            kind: SCC_KIND,
            name: name.clone(),
        })?;

        if stored.metadata.resource_version != scc.metadata.resource_version {
            return Err(ClusterError::Conflict {
                kind: SCC_KIND,
                name,
                message: "the object has been modified".to_string(),
            });
        }

        let next = stored
            .metadata
            .resource_version
            .as_deref()
            .and_then(|rv| rv.parse::<u64>().ok())
            .map_or(1, |rv| rv + 1);
        let mut updated = scc.clone();
        updated.metadata.resource_version = Some(next.to_string());
        *stored = updated.clone();
        Ok(updated)
    }

    fn list_events(&self) -> Result<Vec<ClusterEvent>, ClusterError> {
        self.calls.borrow_mut().push(Call::ListEvents);
        self.check(Verb::ListEvents, "Event", "")?;
        Ok(self.events.clone())
    }
}
