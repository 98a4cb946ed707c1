//! Client of the fresh container server, the oracle that tells whether a
//! newer tag satisfying a version constraint exists for an image.

mod error;
mod response;

use snafu::{OptionExt, ResultExt};
use url::Url;

pub use self::{
    error::Error,
    response::{EvalUpgradeResponse, ImageUpgradeEvaluation, Readiness},
};

const CHECK_PATH: &str = "api/v1/check";

/// Something able to evaluate whether an image can be upgraded within a
/// constraint.
pub trait Oracle {
    fn eval_upgrade(
        &self,
        image: &str,
        constraint: &str,
    ) -> impl Future<Output = Result<EvalUpgradeResponse, Error>> + Send;
}

/// HTTP client for one fresh container server.
#[derive(Clone, Debug)]
pub struct OracleClient {
    http_client: reqwest::Client,
    check_url: Url,
}

impl OracleClient {
    /// Creates a client for the server reachable at `server_url`.
    ///
    /// The HTTP client is shared so that monitors pointing at the same server
    /// reuse connections.
    ///
    /// # Errors
    ///
    /// Fails when `server_url` is empty or is not an absolute URL.
    pub fn new(http_client: reqwest::Client, server_url: &str) -> Result<Self, Error> {
        let server_url = Some(server_url.trim())
            .filter(|url| !url.is_empty())
            .context(error::MissingServerUrlSnafu)?;

        // Joining is relative to the last path segment, make it a directory.
        let base = if server_url.ends_with('/') {
            server_url.to_string()
        } else {
            format!("{server_url}/")
        };
        let check_url = Url::parse(&base)
            .and_then(|base| base.join(CHECK_PATH))
            .with_context(|_| error::InvalidServerUrlSnafu { url: server_url.to_string() })?;

        Ok(Self { http_client, check_url })
    }

    /// Builds the HTTP client shared by every [`OracleClient`].
    ///
    /// No request timeout is set, the transport defaults apply.
    ///
    /// # Errors
    ///
    /// Fails when the TLS backend cannot be initialized.
    pub fn default_http_client() -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(format!(
                "{}/{}",
                fresh_container_base::CLI_PROGRAM_NAME,
                fresh_container_base::PROJECT_VERSION
            ))
            .build()
            .context(error::BuildHttpClientSnafu)
    }

    #[cfg(test)]
    pub const fn check_url(&self) -> &Url { &self.check_url }
}

impl Oracle for OracleClient {
    async fn eval_upgrade(
        &self,
        image: &str,
        constraint: &str,
    ) -> Result<EvalUpgradeResponse, Error> {
        let response = self
            .http_client
            .get(self.check_url.clone())
            .query(&[("image", image), ("constraint", constraint)])
            .send()
            .await
            .with_context(|_| error::SendRequestSnafu {
                image: image.to_string(),
                constraint: constraint.to_string(),
            })?;

        let status = response.status();
        let body = response.bytes().await.context(error::ReadResponseSnafu)?;
        tracing::debug!(image, constraint, %status, "Received fresh container server response");

        Ok(EvalUpgradeResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_client() -> reqwest::Client { OracleClient::default_http_client().unwrap() }

    #[test]
    fn test_check_url_joins_base_path() {
        let client = OracleClient::new(http_client(), "http://oracle.local:8080/fresh").unwrap();
        assert_eq!(client.check_url().as_str(), "http://oracle.local:8080/fresh/api/v1/check");

        let client = OracleClient::new(http_client(), "http://oracle.local/").unwrap();
        assert_eq!(client.check_url().as_str(), "http://oracle.local/api/v1/check");
    }

    #[test]
    fn test_rejects_missing_or_invalid_url() {
        assert!(matches!(OracleClient::new(http_client(), "  "), Err(Error::MissingServerUrl)));
        assert!(matches!(
            OracleClient::new(http_client(), "not a url"),
            Err(Error::InvalidServerUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_eval_upgrade_sends_image_and_constraint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/check")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("image".into(), "registry/app:1.0".into()),
                mockito::Matcher::UrlEncoded("constraint".into(), ">= 1.0, < 2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"image":"registry/app","constraint":">= 1.0, < 2","current_version":"1.0","next_version":"1.3","stale":true}"#,
            )
            .create_async()
            .await;

        let client = OracleClient::new(http_client(), &server.url()).unwrap();
        let response = client.eval_upgrade("registry/app:1.0", ">= 1.0, < 2").await.unwrap();
        mock.assert_async().await;

        let Readiness::Ready(evaluation) = response.readiness().unwrap() else {
            panic!("expected a ready response");
        };
        assert_eq!(evaluation.next_version, "1.3");
        assert!(evaluation.stale);
    }

    #[tokio::test]
    async fn test_eval_upgrade_pending() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/check")
            .match_query(mockito::Matcher::Any)
            .with_status(202)
            .create_async()
            .await;

        let client = OracleClient::new(http_client(), &server.url()).unwrap();
        let response = client.eval_upgrade("registry/app:1.0", "^1").await.unwrap();
        assert_eq!(response.readiness().unwrap(), Readiness::Pending);
    }

    #[tokio::test]
    async fn test_eval_upgrade_transport_failure() {
        // Nothing listens on the discard port.
        let client = OracleClient::new(http_client(), "http://127.0.0.1:9").unwrap();
        let err = client.eval_upgrade("registry/app:1.0", "^1").await.unwrap_err();
        assert!(matches!(err, Error::SendRequest { .. }));
    }
}
