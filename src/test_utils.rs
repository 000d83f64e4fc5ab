//! Shared test fixtures
//!
//! A recording platform stub and small builders for domain types, so tests
//! assert dispatch behavior deterministically without a real OS surface.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::platform::NotifyPlatform;
use crate::types::{Appointment, FamilyMember, Gender, PermissionState};

/// Parse an RFC 3339 timestamp for test fixtures.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid test timestamp")
        .with_timezone(&Utc)
}

pub fn sample_appointment(
    id: &str,
    member_id: &str,
    date: &str,
    reminder_offset: Option<i64>,
) -> Appointment {
    Appointment {
        id: id.to_string(),
        member_id: member_id.to_string(),
        title: "Checkup".to_string(),
        date: ts(date),
        doctor: "Dr. Chen".to_string(),
        location: "Downtown Clinic".to_string(),
        notes: None,
        reminder_offset,
    }
}

pub fn sample_member(id: &str, name: &str) -> FamilyMember {
    FamilyMember {
        id: id.to_string(),
        name: name.to_string(),
        age: 34,
        gender: Gender::Other,
        relation: "Self".to_string(),
        avatar_url: format!("https://example.com/avatars/{}.png", id),
    }
}

/// Scriptable notification platform that records every `show` call.
pub struct StubPlatform {
    query_state: Mutex<PermissionState>,
    request_outcome: Mutex<PermissionState>,
    request_count: Mutex<usize>,
    focused: Mutex<bool>,
    shown: Mutex<Vec<(String, String)>>,
}

impl StubPlatform {
    pub fn new(query_state: PermissionState) -> Self {
        Self {
            query_state: Mutex::new(query_state),
            request_outcome: Mutex::new(PermissionState::Denied),
            request_count: Mutex::new(0),
            focused: Mutex::new(false),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn set_query_state(&self, state: PermissionState) {
        *self.query_state.lock().unwrap() = state;
    }

    pub fn set_request_outcome(&self, state: PermissionState) {
        *self.request_outcome.lock().unwrap() = state;
    }

    pub fn set_focus(&self, focused: bool) {
        *self.focused.lock().unwrap() = focused;
    }

    pub fn request_count(&self) -> usize {
        *self.request_count.lock().unwrap()
    }

    /// `(title, message)` pairs shown natively, in call order.
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

impl NotifyPlatform for StubPlatform {
    fn query_permission(&self) -> PermissionState {
        *self.query_state.lock().unwrap()
    }

    fn request_permission(&self) -> PermissionState {
        *self.request_count.lock().unwrap() += 1;
        let outcome = *self.request_outcome.lock().unwrap();
        *self.query_state.lock().unwrap() = outcome;
        outcome
    }

    fn show(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    fn has_focus(&self) -> bool {
        *self.focused.lock().unwrap()
    }
}
