//! Poll loop
//!
//! Drives fetch -> validate -> notify-on-change -> sleep forever. Every error
//! raised inside a cycle is logged, reported to the chat once per distinct
//! message, and the loop keeps going.

use std::{thread, time::Duration};

use chrono::{Local, TimeDelta};
use tracing::{debug, error, info};

use crate::{
    domain::{HomeworkRecord, HomeworkStatus},
    error::PollError,
    practicum::{self, HomeworkSource},
    telegram::Notifier,
};

/// What a single cycle ended with.
#[derive(Debug)]
pub enum CycleOutcome {
    NoUpdates,
    Unchanged(HomeworkStatus),
    Notified(HomeworkStatus),
    /// The status changed but the chat could not be reached; the change is
    /// picked up again next cycle.
    Undelivered(HomeworkStatus),
    Failed(PollError),
}

/// State carried between cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerState {
    pub cursor: i64,
    pub last_status: Option<HomeworkStatus>,
    pub last_failure: Option<String>,
}

impl PollerState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_status: None,
            last_failure: None,
        }
    }
}

pub struct Poller<S, N> {
    source: S,
    notifier: N,
    retry_period: Duration,
    state: PollerState,
}

impl<S: HomeworkSource, N: Notifier> Poller<S, N> {
    pub fn new(source: S, notifier: N, retry_period: Duration, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            state: PollerState::new(cursor),
        }
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    /// Runs cycles until the process is killed.
    pub fn run(&mut self) -> ! {
        info!(
            "Starting homework poller (interval: {:?}, from_date: {})",
            self.retry_period, self.state.cursor
        );

        loop {
            self.run_cycle();

            let next = TimeDelta::from_std(self.retry_period)
                .ok()
                .and_then(|delta| Local::now().checked_add_signed(delta));
            if let Some(next) = next {
                debug!("Next poll at {}", next.format("%Y-%m-%d %H:%M:%S"));
            }
            thread::sleep(self.retry_period);
        }
    }

    /// Performs one fetch/validate/notify pass and applies failure handling.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let outcome = match self.poll_once() {
            Ok(outcome) => {
                self.state.last_failure = None;
                outcome
            }
            Err(err) => {
                self.report_failure(&err);
                CycleOutcome::Failed(err)
            }
        };
        debug!(cursor = self.state.cursor, ?outcome, "poll cycle finished");
        outcome
    }

    fn poll_once(&mut self) -> Result<CycleOutcome, PollError> {
        let raw = self.source.fetch(self.state.cursor)?;
        let response = practicum::check_response(raw)?;
        self.state.cursor = response.current_date;

        let Some(latest) = response.homeworks.first() else {
            debug!("No homework updates since last poll");
            return Ok(CycleOutcome::NoUpdates);
        };

        let record = HomeworkRecord::from_value(latest)?;
        if self.state.last_status == Some(record.status) {
            debug!(status = %record.status, "Homework status unchanged");
            return Ok(CycleOutcome::Unchanged(record.status));
        }

        info!(
            homework = %record.homework_name,
            status = %record.status,
            "Homework status changed"
        );
        if !self.notify(&record.message()) {
            return Ok(CycleOutcome::Undelivered(record.status));
        }
        self.state.last_status = Some(record.status);
        Ok(CycleOutcome::Notified(record.status))
    }

    fn report_failure(&mut self, err: &PollError) {
        error!("Poll cycle failed: {}", err);

        let message = format!("Сбой в работе программы: {err}");
        if self.state.last_failure.as_deref() == Some(message.as_str()) {
            debug!("Failure already reported, not sending it again");
            return;
        }
        if self.notify(&message) {
            self.state.last_failure = Some(message);
        }
    }

    /// Best-effort delivery: failures are logged and swallowed.
    fn notify(&self, text: &str) -> bool {
        match self.notifier.send(text) {
            Ok(()) => {
                debug!("Message delivered: {}", text);
                true
            }
            Err(err) => {
                error!("Failed to deliver message: {}", err);
                false
            }
        }
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
