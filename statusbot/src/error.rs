use reqwest::StatusCode;
use thiserror::Error;

use statusbot_core::ContractError;

/// Everything that can go wrong inside one polling cycle.
///
/// The loop controller catches this exactly once per cycle and decides
/// per-kind whether the failure is forwarded to the operator chat.
/// Transport-layer kinds (`Request`, `UnexpectedHttpStatus`, `Decode`)
/// stay distinguishable from data-contract kinds (`Contract`).
#[derive(Debug, Error)]
pub enum PollError {
    /// Network-level failure before any HTTP status was obtained.
    #[error("request to the homework API failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The API answered with something other than 200 OK.
    #[error("unexpected HTTP status from the homework API: {0}")]
    UnexpectedHttpStatus(StatusCode),

    /// The response body could not be decoded as JSON.
    #[error("failed to decode the homework API response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The decoded body violates the documented response shape.
    #[error(transparent)]
    Contract(#[from] ContractError),
}
