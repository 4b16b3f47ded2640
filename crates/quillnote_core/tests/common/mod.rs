#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use quillnote_core::{Clock, NoteDraft};
use std::cell::Cell;

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;

/// Clock that advances one second per reading.
pub struct StepClock {
    next: Cell<DateTime<Utc>>,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            next: Cell::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.next.get();
        self.next.set(now + Duration::seconds(1));
        now
    }
}

pub fn draft(title: &str) -> NoteDraft {
    NoteDraft::new(title, format!("body of {title}"))
}
