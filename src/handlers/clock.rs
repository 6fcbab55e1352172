//! Date and time replies
//!
//! Both handlers read local wall-clock time through a [`Clock`] so tests can
//! pin the instant.

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

use super::IntentHandler;
use crate::error::{HandlerError, HandlerResult};
use crate::intent::IntentMatch;

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%A, %B %d, %Y";

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub struct TimeHandler {
    clock: Arc<dyn Clock>,
}

impl TimeHandler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl IntentHandler for TimeHandler {
    fn name(&self) -> &str {
        "time"
    }

    async fn handle(&self, _intent: &IntentMatch) -> HandlerResult<String> {
        Ok(format!(
            "The current time is {}.",
            self.clock.now().format(TIME_FORMAT)
        ))
    }

    // No failure path
    fn recover(&self, error: &HandlerError) -> String {
        error.to_string()
    }
}

pub struct DateHandler {
    clock: Arc<dyn Clock>,
}

impl DateHandler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl IntentHandler for DateHandler {
    fn name(&self) -> &str {
        "date"
    }

    async fn handle(&self, _intent: &IntentMatch) -> HandlerResult<String> {
        Ok(format!(
            "Today's date is {}.",
            self.clock.now().format(DATE_FORMAT)
        ))
    }

    fn recover(&self, error: &HandlerError) -> String {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed(h: u32, m: u32, s: u32) -> Arc<dyn Clock> {
        let instant = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap();
        Arc::new(FixedClock(instant))
    }

    #[tokio::test]
    async fn test_time_is_24_hour() {
        let handler = TimeHandler::new(fixed(21, 7, 3));
        let reply = handler.handle(&IntentMatch::default()).await.unwrap();
        assert_eq!(reply, "The current time is 21:07:03.");
    }

    #[tokio::test]
    async fn test_date_format() {
        let handler = DateHandler::new(fixed(9, 0, 0));
        let reply = handler.handle(&IntentMatch::default()).await.unwrap();
        assert_eq!(reply, "Today's date is Friday, January 05, 2024.");
    }

    #[tokio::test]
    async fn test_same_instant_same_reply() {
        let clock = fixed(12, 30, 45);
        let time = TimeHandler::new(clock.clone());
        let date = DateHandler::new(clock);
        let intent = IntentMatch::default();

        assert_eq!(
            time.handle(&intent).await.unwrap(),
            time.handle(&intent).await.unwrap()
        );
        assert_eq!(
            date.handle(&intent).await.unwrap(),
            date.handle(&intent).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_system_clock_reply_shape() {
        let handler = TimeHandler::new(Arc::new(SystemClock));
        let reply = handler.handle(&IntentMatch::default()).await.unwrap();
        let time = reply
            .strip_prefix("The current time is ")
            .and_then(|r| r.strip_suffix('.'))
            .unwrap();
        assert_eq!(time.len(), 8);
        assert_eq!(time.matches(':').count(), 2);
    }
}
