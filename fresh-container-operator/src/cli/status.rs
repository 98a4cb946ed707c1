use clap::Args;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{Api, api::ListParams};
use snafu::ResultExt;
use tokio::io::AsyncWriteExt;

use crate::{
    cli::error::{self, Error},
    ui::table::DeploymentListExt,
};

/// Shows the freshness state recorded on deployments.
#[derive(Args, Clone)]
pub struct StatusCommand {
    #[arg(
        short,
        long,
        help = "Kubernetes namespace to inspect. Deployments of all namespaces are shown when \
                omitted."
    )]
    pub namespace: Option<String>,
}

impl StatusCommand {
    pub async fn run(self, kube_client: kube::Client) -> Result<(), Error> {
        let Self { namespace } = self;

        let deployments = match namespace {
            Some(namespace) => Api::<Deployment>::namespaced(kube_client, &namespace)
                .list(&ListParams::default())
                .await
                .context(error::ListDeploymentsWithNamespaceSnafu { namespace })?,
            None => Api::<Deployment>::all(kube_client)
                .list(&ListParams::default())
                .await
                .context(error::ListDeploymentsSnafu)?,
        };

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(deployments.items.render_table().as_bytes())
            .await
            .context(error::WriteStdoutSnafu)?;
        stdout.write_u8(b'\n').await.context(error::WriteStdoutSnafu)
    }
}
