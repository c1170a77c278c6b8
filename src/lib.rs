//! Homework review watcher
//!
//! Polls the homework status API, compares the newest review status with the
//! one seen before and reports changes to a Telegram chat.

pub mod config;
pub mod domain;
pub mod error;
pub mod poller;
pub mod practicum;
pub mod telegram;

#[cfg(test)]
mod test_support;
