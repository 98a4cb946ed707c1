use std::collections::BTreeMap;

use fresh_container_base::consts::k8s::{annotations, labels};
use k8s_openapi::api::{apps::v1::Deployment, core::v1::Container};
use kube::ResourceExt;

pub trait DeploymentExt {
    /// Annotations of the pod template, where constraints are declared.
    fn template_annotations(&self) -> Option<&BTreeMap<String, String>>;

    fn containers(&self) -> &[Container];

    /// Points the first container named `container_name` at `image`.
    ///
    /// Returns `false` when no container has that name.
    fn set_container_image(&mut self, container_name: &str, image: &str) -> bool;

    fn last_checked(&self) -> Option<&str>;

    fn has_outdated_containers(&self) -> Option<&str>;

    /// Newest compliant tags recorded for stale containers, keyed by container
    /// name.
    fn next_tags(&self) -> BTreeMap<&str, &str>;
}

impl DeploymentExt for Deployment {
    fn template_annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.spec.as_ref()?.template.metadata.as_ref()?.annotations.as_ref()
    }

    fn containers(&self) -> &[Container] {
        self.spec
            .as_ref()
            .and_then(|spec| spec.template.spec.as_ref())
            .map(|pod_spec| pod_spec.containers.as_slice())
            .unwrap_or_default()
    }

    fn set_container_image(&mut self, container_name: &str, image: &str) -> bool {
        let container = self
            .spec
            .as_mut()
            .and_then(|spec| spec.template.spec.as_mut())
            .and_then(|pod_spec| {
                pod_spec.containers.iter_mut().find(|container| container.name == container_name)
            });

        match container {
            Some(container) => {
                container.image = Some(image.to_string());
                true
            }
            None => false,
        }
    }

    fn last_checked(&self) -> Option<&str> {
        self.annotations().get(annotations::LAST_CHECKED.as_str()).map(String::as_str)
    }

    fn has_outdated_containers(&self) -> Option<&str> {
        self.labels().get(labels::HAS_OUTDATED_CONTAINERS.as_str()).map(String::as_str)
    }

    fn next_tags(&self) -> BTreeMap<&str, &str> {
        self.annotations()
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(annotations::NEXT_TAG_PREFIX.as_str())
                    .map(|container_name| (container_name, value.as_str()))
            })
            .collect()
    }
}
