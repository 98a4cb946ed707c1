//! Freshness checks of deployments.
//!
//! A pass walks every deployment once: the throttle gate decides whether the
//! deployment is due, the constraints declared on its pod template select the
//! containers to evaluate, the oracle is queried for each of them, and the
//! conclusive verdicts are written back onto the deployment.

mod applier;
mod constraints;
mod controller;
mod error;
mod evaluator;
mod store;
#[cfg(test)]
pub mod testing;
mod throttle;

use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::Deployment;
use kube::ResourceExt;

pub use self::{
    applier::is_autopilot_enabled,
    constraints::{ConstraintLookup, extract as extract_constraints},
    controller::{Context, run as run_controller},
    error::Error,
    store::DeploymentStore,
    throttle::CheckInterval,
};
use self::{
    applier::{ApplyReport, apply_verdicts},
    evaluator::evaluate_containers,
    throttle::is_checked_recently,
};
use crate::{ext::DeploymentExt, oracle::Oracle};

/// What happened to one deployment during a pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Checked less than one interval ago.
    Throttled,

    /// The pod template declares no constraint.
    NoConstraints,

    /// No container got a conclusive verdict; nothing was written so the next
    /// pass tries again.
    Inconclusive,

    /// Verdicts were recorded and the deployment was written back.
    Persisted(ApplyReport),
}

/// Counters of one pass over all deployments.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PassSummary {
    pub inspected: usize,
    pub throttled: usize,
    pub without_constraints: usize,
    pub inconclusive: usize,
    pub persisted: usize,
    pub outdated: usize,
    pub failed: usize,
}

impl PassSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Throttled => self.throttled += 1,
            Outcome::NoConstraints => self.without_constraints += 1,
            Outcome::Inconclusive => self.inconclusive += 1,
            Outcome::Persisted(report) => {
                self.persisted += 1;
                if report.has_outdated_containers() {
                    self.outdated += 1;
                }
            }
        }
    }
}

/// Runs freshness passes for one monitor configuration.
#[derive(Debug)]
pub struct Reconciler<O, S> {
    oracle: O,
    store: S,
    interval: CheckInterval,
}

impl<O, S> Reconciler<O, S>
where
    O: Oracle + Sync,
    S: DeploymentStore + Sync,
{
    pub const fn new(oracle: O, store: S, interval: CheckInterval) -> Self {
        Self { oracle, store, interval }
    }

    /// Inspects every deployment, one after the other.
    ///
    /// A failure on one deployment is logged and counted, the remaining
    /// deployments are still inspected.
    ///
    /// # Errors
    ///
    /// Fails only when the deployments cannot be listed.
    pub async fn run_pass(&self, now: DateTime<Utc>) -> Result<PassSummary, Error> {
        let deployments = self.store.list_deployments().await.inspect_err(|err| {
            tracing::error!("Cannot list deployments: {err}");
        })?;

        let mut summary = PassSummary::default();
        for mut deployment in deployments {
            summary.inspected += 1;
            match self.reconcile_deployment(&mut deployment, now).await {
                Ok(outcome) => summary.record(&outcome),
                Err(err) => {
                    tracing::error!(
                        deployment = %deployment.name_any(),
                        namespace = %deployment.namespace().unwrap_or_default(),
                        "Something went wrong while saving evaluation results into the \
                         deployment object: {err}"
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Checks a single deployment and persists the verdicts, if any.
    ///
    /// # Errors
    ///
    /// Fails when the updated deployment cannot be written back.
    pub async fn reconcile_deployment(
        &self,
        deployment: &mut Deployment,
        now: DateTime<Utc>,
    ) -> Result<Outcome, Error> {
        if is_checked_recently(deployment.last_checked(), self.interval, now) {
            return Ok(Outcome::Throttled);
        }

        let constraints =
            match extract_constraints(deployment.template_annotations().into_iter().flatten()) {
                ConstraintLookup::Found(constraints) => constraints,
                ConstraintLookup::NoConstraints => return Ok(Outcome::NoConstraints),
            };

        let verdicts =
            evaluate_containers(&self.oracle, deployment.containers(), &constraints).await;
        if verdicts.is_empty() {
            return Ok(Outcome::Inconclusive);
        }

        for (container_name, evaluation) in verdicts.iter().filter(|(_, eval)| eval.stale) {
            tracing::info!(
                deployment = %deployment.name_any(),
                namespace = %deployment.namespace().unwrap_or_default(),
                container = %container_name,
                image = %evaluation.image,
                constraint = %evaluation.constraint,
                next_tag = %evaluation.next_version,
                "Deployment container can be updated"
            );
        }

        let report = apply_verdicts(deployment, &verdicts, now);
        let _updated = self.store.replace_deployment(deployment).await?;
        if !report.updated_containers.is_empty() {
            tracing::info!(
                deployment = %deployment.name_any(),
                namespace = %deployment.namespace().unwrap_or_default(),
                containers = ?report.updated_containers,
                "Updated container images"
            );
        }

        Ok(Outcome::Persisted(report))
    }
}
