use chrono::{DateTime, SecondsFormat, Utc};
use fresh_container_base::consts::k8s::{annotations, labels};
use k8s_openapi::api::apps::v1::Deployment;
use kube::ResourceExt;

use crate::{ext::DeploymentExt, reconciler::evaluator::Verdicts};

/// What [`apply_verdicts`] changed on a deployment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ApplyReport {
    /// Containers found stale in this pass.
    pub stale_containers: Vec<String>,

    /// Containers whose image has been rewritten.
    pub updated_containers: Vec<String>,
}

impl ApplyReport {
    #[must_use]
    pub fn has_outdated_containers(&self) -> bool { !self.stale_containers.is_empty() }
}

/// Whether the deployment opted in to automatic image updates.
///
/// Read from the live object on every call; a missing or malformed flag means
/// no.
#[must_use]
pub fn is_autopilot_enabled(deployment: &Deployment) -> bool {
    deployment
        .annotations()
        .get(annotations::AUTOPILOT.as_str())
        .map(String::as_str)
        .and_then(parse_bool)
        .unwrap_or(false)
}

/// Records `verdicts` into `deployment`, rewriting images when autopilot is
/// enabled, and stamps the check time.
///
/// `verdicts` must not be empty, an inconclusive pass leaves the deployment
/// untouched.
pub fn apply_verdicts(
    deployment: &mut Deployment,
    verdicts: &Verdicts,
    now: DateTime<Utc>,
) -> ApplyReport {
    let allow_update = is_autopilot_enabled(deployment);
    let mut report = ApplyReport::default();

    for (container_name, evaluation) in verdicts {
        let next_tag_key = annotations::next_tag_key(container_name);

        if !evaluation.stale {
            let _removed = deployment.annotations_mut().remove(&next_tag_key);
            continue;
        }

        report.stale_containers.push(container_name.clone());
        let _prev = deployment
            .annotations_mut()
            .insert(next_tag_key, evaluation.next_version.clone());

        if !allow_update {
            continue;
        }

        let new_image = evaluation.next_image();
        if deployment.set_container_image(container_name, &new_image) {
            tracing::info!(
                deployment = %deployment.name_any(),
                namespace = %deployment.namespace().unwrap_or_default(),
                old_image = %evaluation.current_image(),
                new_image = %new_image,
                constraint = %evaluation.constraint,
                "Scheduling update of container image"
            );
            report.updated_containers.push(container_name.clone());
        } else {
            tracing::warn!(
                deployment = %deployment.name_any(),
                namespace = %deployment.namespace().unwrap_or_default(),
                container = %container_name,
                "Container vanished before its image could be updated"
            );
        }
    }

    let _prev = deployment.labels_mut().insert(
        labels::HAS_OUTDATED_CONTAINERS.to_string(),
        report.has_outdated_containers().to_string(),
    );
    let _prev = deployment.annotations_mut().insert(
        annotations::LAST_CHECKED.to_string(),
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
    );

    report
}

/// Accepts the literals understood by Go's `strconv.ParseBool`, which is how
/// operators are used to writing this flag.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
