use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::oracle::{Error, error};

/// The oracle's conclusive answer for one image and one constraint.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ImageUpgradeEvaluation {
    /// Image repository without the tag, e.g. `docker.io/library/nginx`.
    pub image: String,

    pub constraint: String,

    #[serde(default)]
    pub current_version: String,

    /// Newest tag satisfying the constraint.
    #[serde(default)]
    pub next_version: String,

    /// Whether `next_version` is newer than `current_version`.
    #[serde(default)]
    pub stale: bool,
}

impl ImageUpgradeEvaluation {
    /// Image reference pointing at the newest compliant tag.
    #[must_use]
    pub fn next_image(&self) -> String { format!("{}:{}", self.image, self.next_version) }

    #[must_use]
    pub fn current_image(&self) -> String { format!("{}:{}", self.image, self.current_version) }
}

/// Outcome of classifying an oracle response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Readiness {
    /// A conclusive evaluation is available.
    Ready(ImageUpgradeEvaluation),

    /// The oracle accepted the query but is still gathering the image tags.
    Pending,
}

/// Raw answer of the oracle, classified lazily by [`Self::readiness`].
#[derive(Clone, Debug)]
pub struct EvalUpgradeResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl EvalUpgradeResponse {
    #[must_use]
    pub const fn new(status: StatusCode, body: Vec<u8>) -> Self { Self { status, body } }

    /// Classifies the response.
    ///
    /// # Errors
    ///
    /// Fails when the status is neither `200 OK` nor `202 Accepted`, or when a
    /// `200 OK` body does not decode into an [`ImageUpgradeEvaluation`].
    pub fn readiness(&self) -> Result<Readiness, Error> {
        match self.status {
            StatusCode::OK => serde_json::from_slice(&self.body)
                .map(Readiness::Ready)
                .context(error::DecodeEvaluationSnafu),
            StatusCode::ACCEPTED => Ok(Readiness::Pending),
            status => Err(Error::UnexpectedStatus {
                status,
                body: String::from_utf8_lossy(&self.body).trim().to_string(),
            }),
        }
    }
}
