//! SecurityContextConstraints resource (security.openshift.io/v1)

use k8s_openapi::ClusterResourceScope;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const SCC_GROUP: &str = "security.openshift.io";
pub const SCC_VERSION: &str = "v1";
pub const SCC_KIND: &str = "SecurityContextConstraints";

/// Username the API server assigns to a service account
pub fn service_account_username(namespace: &str, name: &str) -> String {
    format!("system:serviceaccount:{}:{}", namespace, name)
}

/// SCC object with only the fields the installer touches typed out.
///
/// Everything else (`apiVersion`, `kind`, `allowPrivilegedContainer`, ...) is
/// kept in `other` so a replace writes back exactly what was read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityContextConstraints {
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,

    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl SecurityContextConstraints {
    pub fn new(name: &str) -> Self {
        let mut other = BTreeMap::new();
        other.insert(
            "apiVersion".to_string(),
            Value::String(format!("{}/{}", SCC_GROUP, SCC_VERSION)),
        );
        other.insert("kind".to_string(), Value::String(SCC_KIND.to_string()));
        Self {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            users: None,
            other,
        }
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users = Some(users.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn users(&self) -> &[String] {
        self.users.as_deref().unwrap_or_default()
    }

    /// Append `user` to the authorized users unless already listed.
    ///
    /// Returns whether the list changed. Existing entries are never removed or
    /// reordered.
    pub fn grant_user(&mut self, user: &str) -> bool {
        let users = self.users.get_or_insert_with(Vec::new);
        if users.iter().any(|u| u == user) {
            return false;
        }
        users.push(user.to_string());
        true
    }
}

impl Resource for SecurityContextConstraints {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(SCC_KIND)
    }

    fn group(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(SCC_GROUP)
    }

    fn version(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(SCC_VERSION)
    }

    fn plural(_: &()) -> Cow<'_, str> {
        Cow::Borrowed("securitycontextconstraints")
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_service_account_username() {
        assert_eq!(
            service_account_username("default", "router"),
            "system:serviceaccount:default:router"
        );
    }

    #[test]
    fn test_grant_keeps_existing_users() {
        let mut scc = SecurityContextConstraints::new("privileged")
            .with_users(["system:admin", "system:serviceaccount:openshift-infra:build-controller"]);
        let before: BTreeSet<String> = scc.users().iter().cloned().collect();

        assert!(scc.grant_user("system:serviceaccount:default:router"));

        let after: BTreeSet<String> = scc.users().iter().cloned().collect();
        assert!(after.is_superset(&before));
        assert!(after.contains("system:serviceaccount:default:router"));
        assert_eq!(scc.users().len(), 3);
    }

    #[test]
    fn test_grant_is_not_duplicated() {
        let mut scc = SecurityContextConstraints::new("privileged")
            .with_users(["system:serviceaccount:default:router"]);

        assert!(!scc.grant_user("system:serviceaccount:default:router"));
        assert_eq!(scc.users().len(), 1);
    }

    #[test]
    fn test_grant_on_null_users() {
        let mut scc: SecurityContextConstraints = serde_json::from_str(
            r#"{"apiVersion":"security.openshift.io/v1","kind":"SecurityContextConstraints",
                "metadata":{"name":"privileged","resourceVersion":"41"},"users":null}"#,
        )
        .unwrap();
        assert!(scc.users().is_empty());

        assert!(scc.grant_user("system:serviceaccount:default:router"));
        assert_eq!(scc.users(), ["system:serviceaccount:default:router"]);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = r#"{
            "apiVersion": "security.openshift.io/v1",
            "kind": "SecurityContextConstraints",
            "metadata": {"name": "privileged", "resourceVersion": "7"},
            "allowPrivilegedContainer": true,
            "allowHostNetwork": true,
            "groups": ["system:cluster-admins"],
            "users": ["system:admin"]
        }"#;
        let mut scc: SecurityContextConstraints = serde_json::from_str(raw).unwrap();
        scc.grant_user("system:serviceaccount:default:router");

        let value = serde_json::to_value(&scc).unwrap();
        assert_eq!(value["allowPrivilegedContainer"], Value::Bool(true));
        assert_eq!(value["groups"][0], "system:cluster-admins");
        assert_eq!(value["kind"], SCC_KIND);
        assert_eq!(value["metadata"]["resourceVersion"], "7");
        assert_eq!(value["users"][1], "system:serviceaccount:default:router");
    }

    #[test]
    fn test_resource_metadata() {
        assert_eq!(SecurityContextConstraints::api_version(&()), "security.openshift.io/v1");
        assert_eq!(
            SecurityContextConstraints::plural(&()),
            "securitycontextconstraints"
        );
    }
}
