use reqwest::{
    StatusCode,
    blocking::Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde_json::Value;
use tracing::debug;

use crate::{config::Config, domain::PollResponse, error::PollError};

const USER_AGENT_HEADER: &str = "homework-bot/0.1";

/// Anything that can answer "what changed since `from_date`".
pub trait HomeworkSource {
    fn fetch(&self, from_date: i64) -> Result<Value, PollError>;
}

pub fn build_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT_HEADER)
        .timeout(config.request_timeout)
        .build()
}

pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.practicum_token.clone(),
        }
    }
}

impl HomeworkSource for PracticumClient {
    fn fetch(&self, from_date: i64) -> Result<Value, PollError> {
        debug!(from_date, endpoint = %self.endpoint, "requesting homework statuses");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("from_date", from_date)])
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .send()
            .map_err(PollError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PollError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(PollError::Network)?;
        serde_json::from_slice(&body).map_err(|err| {
            PollError::schema(format!("response body is not valid JSON: {err}"))
        })
    }
}

/// Checks the overall shape of a poll answer. Records themselves are left
/// untouched.
pub fn check_response(raw: Value) -> Result<PollResponse, PollError> {
    let mut body = match raw {
        Value::Object(body) => body,
        other => {
            return Err(PollError::schema(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            )));
        }
    };

    let homeworks = match body.remove("homeworks") {
        None => return Err(PollError::schema("response has no `homeworks` key")),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(PollError::schema(format!(
                "`homeworks` must be a list, got {}",
                kind_of(&other)
            )));
        }
    };

    let current_date = match body.get("current_date") {
        None => return Err(PollError::schema("response has no `current_date` key")),
        Some(value) => value.as_i64().ok_or_else(|| {
            PollError::schema(format!(
                "`current_date` must be an integer, got {}",
                kind_of(value)
            ))
        })?,
    };

    Ok(PollResponse {
        homeworks,
        current_date,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
