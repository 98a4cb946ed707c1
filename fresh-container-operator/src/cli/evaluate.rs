use clap::Args;
use snafu::ResultExt;
use tokio::io::AsyncWriteExt;

use crate::{
    cli::error::{self, Error},
    oracle::{Oracle, OracleClient},
    ui::table::ReadinessExt,
};

/// Asks a fresh container server about a single image.
#[derive(Args, Clone)]
pub struct EvaluateCommand {
    #[arg(
        short = 's',
        long = "server",
        env = "FRESH_CONTAINER_SERVER_URL",
        help = "Full URL of the fresh container server."
    )]
    pub server_url: String,

    #[arg(short, long, help = "Image reference to evaluate, e.g. registry.example.com/app:1.0.")]
    pub image: String,

    #[arg(long, help = "Version constraint the next tag must satisfy, e.g. \">= 1.2, < 2\".")]
    pub constraint: String,
}

impl EvaluateCommand {
    pub async fn run(self) -> Result<(), Error> {
        let Self { server_url, image, constraint } = self;

        let oracle = OracleClient::new(OracleClient::default_http_client()?, &server_url)?;
        let readiness = oracle.eval_upgrade(&image, &constraint).await?.readiness()?;

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(readiness.render_table().as_bytes())
            .await
            .context(error::WriteStdoutSnafu)?;
        stdout.write_u8(b'\n').await.context(error::WriteStdoutSnafu)
    }
}
