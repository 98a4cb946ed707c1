//! Defines the error types for the freshness oracle client.

use reqwest::StatusCode;
use snafu::Snafu;

/// Represents the possible errors of a query against the freshness oracle.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The configured oracle address is not a usable base URL.
    #[snafu(display("Invalid fresh container server URL '{url}', error: {source}"))]
    InvalidServerUrl { url: String, source: url::ParseError },

    /// The oracle address is missing from the monitor.
    #[snafu(display("No fresh container server URL is configured"))]
    MissingServerUrl,

    #[snafu(display("Failed to build HTTP client, error: {source}"))]
    BuildHttpClient { source: reqwest::Error },

    /// The request never produced an HTTP response.
    #[snafu(display(
        "Failed to query fresh container server for image {image} with constraint \
         '{constraint}', error: {source}"
    ))]
    SendRequest { image: String, constraint: String, source: reqwest::Error },

    #[snafu(display("Failed to read fresh container server response, error: {source}"))]
    ReadResponse { source: reqwest::Error },

    /// The oracle answered with a status that is neither ready nor pending.
    #[snafu(display("Cannot determine evaluation status from HTTP {status}: {body}"))]
    UnexpectedStatus { status: StatusCode, body: String },

    /// The oracle claimed to be ready but its body is not an evaluation.
    #[snafu(display("Cannot decode evaluation response, error: {source}"))]
    DecodeEvaluation { source: serde_json::Error },
}
