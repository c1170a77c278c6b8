use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Delivery channel for chat messages.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), NotifyError>;
}

pub struct TelegramBot {
    client: Client,
    send_url: String,
    chat_id: String,
}

impl TelegramBot {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                config.telegram_api_url, config.telegram_token
            ),
            chat_id: config.telegram_chat_id.clone(),
        }
    }
}

impl Notifier for TelegramBot {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        let reply: SendMessageReply = self
            .client
            .post(&self.send_url)
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .map_err(|err| NotifyError::Http(err.without_url()))?
            .json()
            .map_err(|err| NotifyError::Http(err.without_url()))?;

        if reply.ok {
            Ok(())
        } else {
            Err(NotifyError::Rejected(
                reply
                    .description
                    .unwrap_or_else(|| "no description".to_owned()),
            ))
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Telegram request failed: {0}")]
    Http(reqwest::Error),
    #[error("Telegram rejected the message: {0}")]
    Rejected(String),
}

// Request / response payloads ------------------------------------------------

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageReply {
    ok: bool,
    description: Option<String>,
}
