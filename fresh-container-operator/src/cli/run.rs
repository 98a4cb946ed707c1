use std::time::Duration;

use clap::Args;
use sigfinn::{ExitStatus, LifecycleManager};
use tokio::sync::oneshot;

use crate::{
    cli::Error,
    config::Config,
    oracle::OracleClient,
    reconciler::{self, Context},
};

#[derive(Args, Clone, Default)]
pub struct RunCommand {
    #[arg(
        long = "requeue-interval-seconds",
        help = "Seconds to wait before a monitor is reconciled again. Overrides the configuration \
                file."
    )]
    pub requeue_interval_seconds: Option<u64>,

    #[arg(
        long = "error-requeue-interval-seconds",
        help = "Seconds to wait before a failed reconciliation is retried. Overrides the \
                configuration file."
    )]
    pub error_requeue_interval_seconds: Option<u64>,
}

impl RunCommand {
    /// Runs the controller until SIGINT or SIGTERM is received.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built or the controller task
    /// reports an error.
    pub async fn run(self, kube_client: kube::Client, config: Config) -> Result<(), Error> {
        let Self { requeue_interval_seconds, error_requeue_interval_seconds } = self;

        let ctx = Context {
            kube_client,
            http_client: OracleClient::default_http_client()?,
            requeue_interval: requeue_interval_seconds
                .map_or_else(|| config.requeue_interval(), Duration::from_secs),
            error_requeue_interval: error_requeue_interval_seconds
                .map_or_else(|| config.error_requeue_interval(), Duration::from_secs),
        };

        let lifecycle_manager = LifecycleManager::<Error>::new();
        let _handle = lifecycle_manager.spawn("controller", move |shutdown_signal| async move {
            let (stop_sender, stop_receiver) = oneshot::channel::<()>();
            let controller = reconciler::run_controller(ctx, async move {
                let _unused = stop_receiver.await;
            });
            tokio::pin!(controller);

            tokio::select! {
                () = &mut controller => {}
                () = shutdown_signal => {
                    tracing::info!("Shutting down controller");
                    let _unused = stop_sender.send(());
                    controller.await;
                }
            }

            ExitStatus::Success
        });

        tracing::info!("Operator started. Use Ctrl+C to stop.");

        if let Ok(Err(err)) = lifecycle_manager.serve().await {
            tracing::error!("{err}");
            Err(err)
        } else {
            Ok(())
        }
    }
}
