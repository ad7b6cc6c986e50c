use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ContractError;

/// Review status of a homework submission.
///
/// Closed enumeration: anything else coming over the wire is a
/// data-contract violation, not a new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn parse(raw: &str) -> Result<Self, ContractError> {
        match raw {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(ContractError::UnknownStatus(other.to_string())),
        }
    }

    /// Fixed human-readable verdict sentence for this status.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Message rendered for a cycle whose fetch window held no submissions.
pub const NO_NEW_STATUS_MESSAGE: &str = "No new homework statuses.";

/// Validate the decoded API body and extract the submission list.
///
/// Empty is a valid result. The three failure kinds are deliberately
/// distinct so an operator can tell an API contract break (missing or
/// mistyped `homeworks`) from a quiet lull in submissions.
pub fn extract_homeworks(body: &Value) -> Result<&[Value], ContractError> {
    let object = body.as_object().ok_or(ContractError::MalformedResponse(
        "response body is not a JSON object",
    ))?;

    let homeworks = object
        .get("homeworks")
        .ok_or(ContractError::MissingHomeworksKey)?;

    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ContractError::MalformedResponse("`homeworks` is not an array"))
}

/// Render the notification for a single submission record.
pub fn render_status_change(homework: &Value) -> Result<String, ContractError> {
    let name = homework
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(ContractError::MissingHomeworkName)?;

    let status = match homework.get("status").and_then(Value::as_str) {
        Some(raw) => HomeworkStatus::parse(raw)?,
        None => return Err(ContractError::UnknownStatus("<missing>".to_string())),
    };

    Ok(format!(
        "Status changed for submission \"{}\". {}",
        name,
        status.verdict()
    ))
}

/// Derive the cycle's message from the validated submission list.
///
/// The API returns submissions newest-first, so only the head is
/// inspected. An empty list is a quiet cycle, not an error.
pub fn render_update(homeworks: &[Value]) -> Result<String, ContractError> {
    match homeworks.first() {
        Some(newest) => render_status_change(newest),
        None => Ok(NO_NEW_STATUS_MESSAGE.to_string()),
    }
}
