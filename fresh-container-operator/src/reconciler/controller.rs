use std::{sync::Arc, time::Duration};

use chrono::Utc;
use futures::StreamExt;
use kube::{
    Api, ResourceExt,
    runtime::{Controller, controller::Action, watcher},
};
use snafu::ResultExt;

use crate::{
    crd::FreshContainerMonitor,
    oracle::OracleClient,
    reconciler::{CheckInterval, Error, Reconciler, error},
};

/// State shared by every reconciliation of the controller.
#[derive(Clone)]
pub struct Context {
    pub kube_client: kube::Client,

    pub http_client: reqwest::Client,

    /// Delay before the next pass of a monitor.
    pub requeue_interval: Duration,

    /// Delay before a failed pass is retried.
    pub error_requeue_interval: Duration,
}

async fn reconcile(monitor: Arc<FreshContainerMonitor>, ctx: Arc<Context>) -> Result<Action, Error> {
    let namespace = monitor.namespace().unwrap_or_default();
    let name = monitor.name_any();

    let api = Api::<FreshContainerMonitor>::namespaced(ctx.kube_client.clone(), &namespace);
    let Some(monitor) = api
        .get_opt(&name)
        .await
        .with_context(|_| error::GetMonitorSnafu {
            namespace: namespace.clone(),
            name: name.clone(),
        })?
    else {
        tracing::debug!(monitor = %name, namespace = %namespace, "Monitor is gone");
        return Ok(Action::await_change());
    };

    let oracle =
        OracleClient::new(ctx.http_client.clone(), &monitor.spec.fresh_container_server_url)?;
    let interval = CheckInterval::from_minutes(monitor.spec.check_interval_minutes);

    tracing::debug!(monitor = %name, namespace = %namespace, "Starting freshness pass");
    let summary =
        Reconciler::new(oracle, ctx.kube_client.clone(), interval).run_pass(Utc::now()).await?;
    tracing::info!(
        monitor = %name,
        namespace = %namespace,
        inspected = summary.inspected,
        throttled = summary.throttled,
        without_constraints = summary.without_constraints,
        inconclusive = summary.inconclusive,
        persisted = summary.persisted,
        outdated = summary.outdated,
        failed = summary.failed,
        "Freshness pass finished"
    );

    Ok(Action::requeue(ctx.requeue_interval))
}

fn error_policy(monitor: Arc<FreshContainerMonitor>, err: &Error, ctx: Arc<Context>) -> Action {
    tracing::error!(
        monitor = %monitor.name_any(),
        namespace = %monitor.namespace().unwrap_or_default(),
        "Failed to reconcile monitor: {err}"
    );
    Action::requeue(ctx.error_requeue_interval)
}

/// Watches every `FreshContainerMonitor` and runs a freshness pass for each of
/// them until `shutdown_signal` resolves.
pub async fn run<F>(ctx: Context, shutdown_signal: F)
where
    F: Future<Output = ()> + Send + Sync + 'static,
{
    let api = Api::<FreshContainerMonitor>::all(ctx.kube_client.clone());

    tracing::info!("Starting controller of FreshContainerMonitor");
    Controller::new(api, watcher::Config::default())
        .graceful_shutdown_on(shutdown_signal)
        .run(reconcile, error_policy, Arc::new(ctx))
        .for_each(|result| async move {
            match result {
                Ok((object, _action)) => {
                    tracing::debug!(monitor = %object.name, "Reconciled monitor");
                }
                Err(err) => tracing::warn!("Controller event: {err}"),
            }
        })
        .await;
    tracing::info!("Controller of FreshContainerMonitor stopped");
}
