use fresh_container_base::consts::DEFAULT_CHECK_INTERVAL_MINUTES;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of a `FreshContainerMonitor`.
///
/// Field names keep the snake case wire format of the existing resources.
#[derive(CustomResource, Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "infrastructure.fresh-container-operator.suse.com",
    version = "v1alpha1",
    kind = "FreshContainerMonitor",
    namespaced,
    status = "FreshContainerMonitorStatus",
    shortname = "fcm",
    printcolumn = r#"{"name":"Server","type":"string","jsonPath":".spec.fresh_container_server_url"}"#,
    printcolumn = r#"{"name":"Interval","type":"integer","jsonPath":".spec.check_interval_minutes"}"#
)]
pub struct FreshContainerMonitorSpec {
    /// Full URL of the fresh container server.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fresh_container_server_url: String,

    /// Minutes between two checks of the same deployment.
    #[serde(default = "default_check_interval_minutes")]
    pub check_interval_minutes: i64,
}

impl Default for FreshContainerMonitorSpec {
    fn default() -> Self {
        Self {
            fresh_container_server_url: String::new(),
            check_interval_minutes: default_check_interval_minutes(),
        }
    }
}

/// Observed state of a `FreshContainerMonitor`; nothing is reported yet.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
pub struct FreshContainerMonitorStatus {}

const fn default_check_interval_minutes() -> i64 { DEFAULT_CHECK_INTERVAL_MINUTES }

#[cfg(test)]
mod tests {
    use kube::CustomResourceExt;

    use super::*;

    #[test]
    fn test_crd_identity() {
        let crd = FreshContainerMonitor::crd();
        assert_eq!(
            crd.metadata.name.as_deref(),
            Some("freshcontainermonitors.infrastructure.fresh-container-operator.suse.com")
        );
        assert_eq!(crd.spec.scope, "Namespaced");
        assert_eq!(crd.spec.names.short_names, Some(vec!["fcm".to_string()]));
    }

    #[test]
    fn test_spec_defaults() {
        let spec: FreshContainerMonitorSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec, FreshContainerMonitorSpec::default());
        assert_eq!(spec.check_interval_minutes, 10);

        let spec: FreshContainerMonitorSpec = serde_json::from_str(
            r#"{"fresh_container_server_url":"http://oracle:8080","check_interval_minutes":30}"#,
        )
        .unwrap();
        assert_eq!(spec.fresh_container_server_url, "http://oracle:8080");
        assert_eq!(spec.check_interval_minutes, 30);
    }
}
