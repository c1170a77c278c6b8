use std::fmt;

use serde_json::Value;

use crate::error::PollError;

// Domain data structures shared across modules.

/// Review state reported by the homework API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Sentence shown to the student for this status.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub homework_name: String,
    pub status: HomeworkStatus,
}

impl HomeworkRecord {
    /// Reads the two fields the bot cares about; everything else in the
    /// record is ignored.
    pub fn from_value(raw: &Value) -> Result<Self, PollError> {
        let homework_name = raw
            .get("homework_name")
            .and_then(Value::as_str)
            .ok_or_else(|| PollError::schema("homework record has no `homework_name`"))?;
        let status = raw
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| PollError::schema("homework record has no `status`"))?;
        let status = HomeworkStatus::parse(status)
            .ok_or_else(|| PollError::schema(format!("unknown homework status `{status}`")))?;

        Ok(Self {
            homework_name: homework_name.to_owned(),
            status,
        })
    }

    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.homework_name,
            self.status.verdict()
        )
    }
}

/// Validated body of a status poll. Individual records are checked later by
/// [`parse_status`].
#[derive(Clone, Debug)]
pub struct PollResponse {
    pub homeworks: Vec<Value>,
    pub current_date: i64,
}

/// Builds the chat message for a single homework record.
pub fn parse_status(record: &Value) -> Result<String, PollError> {
    HomeworkRecord::from_value(record).map(|record| record.message())
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_status_formats_every_verdict() {
        let cases = [
            (
                "approved",
                "Изменился статус проверки работы \"X\". Работа проверена: ревьюеру всё понравилось. Ура!",
            ),
            (
                "reviewing",
                "Изменился статус проверки работы \"X\". Работа взята на проверку ревьюером.",
            ),
            (
                "rejected",
                "Изменился статус проверки работы \"X\". Работа проверена: у ревьюера есть замечания.",
            ),
        ];
        for (status, expected) in cases {
            let record = json!({ "homework_name": "X", "status": status });
            assert_eq!(parse_status(&record).expect("known status"), expected);
        }
    }

    #[test]
    fn parse_status_rejects_unknown_status() {
        let record = json!({ "status": "unknown_status", "homework_name": "X" });
        assert!(matches!(parse_status(&record), Err(PollError::Schema(_))));
    }

    #[test]
    fn parse_status_requires_both_fields() {
        assert!(matches!(
            parse_status(&json!({ "status": "approved" })),
            Err(PollError::Schema(_))
        ));
        assert!(matches!(
            parse_status(&json!({ "homework_name": "X" })),
            Err(PollError::Schema(_))
        ));
    }

    #[test]
    fn record_ignores_extra_fields() {
        let record = HomeworkRecord::from_value(&json!({
            "id": 124,
            "homework_name": "user__hw_python_oop.zip",
            "reviewer_comment": "Всё нравится",
            "status": "reviewing",
            "lesson_name": "Итоговый проект",
        }))
        .expect("valid record");
        assert_eq!(record.homework_name, "user__hw_python_oop.zip");
        assert_eq!(record.status, HomeworkStatus::Reviewing);
    }
}
