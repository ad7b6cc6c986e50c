use thiserror::Error;

/// Data-contract violations in the homework API response.
///
/// These are distinct from transport-level failures: the request
/// itself succeeded, but the body does not match the documented
/// shape. The loop controller matches on the variants to decide which
/// failures reach the operator chat.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    /// The response, or a field inside it, has the wrong JSON shape.
    #[error("malformed API response: {0}")]
    MalformedResponse(&'static str),

    /// The `homeworks` key is absent from the response object.
    ///
    /// Kept as its own kind so the loop can recognise this known API
    /// quirk and keep it out of the alert channel.
    #[error("API response has no `homeworks` key")]
    MissingHomeworksKey,

    /// A submission record is missing its `homework_name`.
    #[error("submission record has no `homework_name`")]
    MissingHomeworkName,

    /// A submission carries a status outside the known enumeration.
    #[error("unknown submission status: {0:?}")]
    UnknownStatus(String),
}
