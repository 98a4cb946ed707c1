/// Minutes between two checks of the same deployment when a monitor does not
/// declare a positive interval.
pub const DEFAULT_CHECK_INTERVAL_MINUTES: i64 = 10;

pub mod k8s {
    pub mod labels {
        use std::sync::LazyLock;

        use crate::PROJECT_NAME;

        /// `"true"` when at least one container of the deployment was found to
        /// be stale during the most recent completed check.
        pub static HAS_OUTDATED_CONTAINERS: LazyLock<String> =
            LazyLock::new(|| format!("{PROJECT_NAME}.hasOutdatedContainers"));
    }

    pub mod annotations {
        use std::sync::LazyLock;

        use crate::PROJECT_NAME;

        /// Pod template annotation prefix; the suffix names the container the
        /// version constraint applies to.
        pub static CONSTRAINT_PREFIX: LazyLock<String> =
            LazyLock::new(|| format!("{PROJECT_NAME}.constraint/"));

        /// Deployment annotation prefix holding the newest compliant tag of a
        /// stale container.
        pub static NEXT_TAG_PREFIX: LazyLock<String> =
            LazyLock::new(|| format!("{PROJECT_NAME}.nextTag/"));

        /// RFC3339 timestamp of the last completed check.
        pub static LAST_CHECKED: LazyLock<String> =
            LazyLock::new(|| format!("{PROJECT_NAME}.lastChecked"));

        /// Opt-in flag allowing the operator to rewrite container images.
        pub static AUTOPILOT: LazyLock<String> =
            LazyLock::new(|| format!("{PROJECT_NAME}.autopilot"));

        #[must_use]
        pub fn constraint_key(container_name: &str) -> String {
            format!("{}{container_name}", *CONSTRAINT_PREFIX)
        }

        #[must_use]
        pub fn next_tag_key(container_name: &str) -> String {
            format!("{}{container_name}", *NEXT_TAG_PREFIX)
        }
    }
}
