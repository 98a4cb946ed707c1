use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Container;

use crate::{
    oracle::{Error as OracleError, ImageUpgradeEvaluation, Oracle, Readiness},
    reconciler::constraints::Constraints,
};

/// Conclusive evaluations of one pass keyed by container name.
pub type Verdicts = BTreeMap<String, ImageUpgradeEvaluation>;

/// Queries `oracle` once for every container that has a constraint.
///
/// Containers whose query fails, or whose evaluation is still pending, are
/// left out of the returned verdicts; their siblings are still evaluated.
pub async fn evaluate_containers<O>(
    oracle: &O,
    containers: &[Container],
    constraints: &Constraints,
) -> Verdicts
where
    O: Oracle,
{
    let mut verdicts = Verdicts::new();

    for container in containers {
        let Some(constraint) = constraints.get(&container.name) else {
            continue;
        };
        let Some(image) = container.image.as_deref().filter(|image| !image.is_empty()) else {
            tracing::warn!(
                container = %container.name,
                constraint = %constraint,
                "Container has a constraint but no image, skipping"
            );
            continue;
        };

        match evaluate(oracle, image, constraint).await {
            Ok(Readiness::Ready(evaluation)) => {
                let _prev = verdicts.insert(container.name.clone(), evaluation);
            }
            Ok(Readiness::Pending) => {
                tracing::debug!(image, constraint = %constraint, "Constraint evaluation is not ready yet");
            }
            Err(err @ OracleError::SendRequest { .. }) => {
                tracing::error!(image, constraint = %constraint, "Constraint evaluation failed: {err}");
            }
            Err(err) => {
                tracing::error!(
                    image,
                    constraint = %constraint,
                    "Constraint response: cannot determine status: {err}"
                );
            }
        }
    }

    verdicts
}

async fn evaluate<O>(oracle: &O, image: &str, constraint: &str) -> Result<Readiness, OracleError>
where
    O: Oracle,
{
    oracle.eval_upgrade(image, constraint).await?.readiness()
}
