//! Reminder evaluation
//!
//! Pure decision logic, separated from the ticker so it can be driven with
//! synthetic timestamps in tests. A reminder becomes due at
//! `date - reminder_offset` and stays observable for a fixed window; a
//! window that passes without a tick is permanently missed. There is no
//! catch-up pass after a long suspension.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::types::Appointment;

/// Appointment identifiers already notified this session.
///
/// Monotone: entries are never removed while the engine runs. Reset only by
/// constructing a fresh engine.
pub type ShownSet = HashSet<String>;

/// Produce the appointments whose reminder fires this tick.
///
/// Each due appointment is inserted into `shown` before it is yielded, so a
/// re-entrant pass over the same collection cannot duplicate it. Collection
/// order is preserved; no additional sort is applied.
///
/// Appointments are skipped, without entering `shown`, when:
/// - `reminder_offset` is absent,
/// - the offset is negative (malformed data),
/// - the reminder time is unrepresentable (offset arithmetic overflow).
pub fn due_reminders(
    now: DateTime<Utc>,
    appointments: &[Appointment],
    shown: &mut ShownSet,
    window_mins: i64,
) -> Vec<Appointment> {
    let mut due = Vec::new();

    for appointment in appointments {
        let Some(offset) = appointment.reminder_offset else {
            continue;
        };

        if shown.contains(&appointment.id) {
            continue;
        }

        if offset < 0 {
            log::debug!(
                "Skipping appointment {} with negative reminder offset {}",
                appointment.id,
                offset
            );
            continue;
        }

        let Some(reminder_time) = appointment
            .date
            .checked_sub_signed(Duration::minutes(offset))
        else {
            log::debug!(
                "Skipping appointment {}: reminder time not representable",
                appointment.id
            );
            continue;
        };

        let Some(window_end) = reminder_time.checked_add_signed(Duration::minutes(window_mins))
        else {
            continue;
        };

        if now >= reminder_time && now < window_end {
            shown.insert(appointment.id.clone());
            due.push(appointment.clone());
        }
    }

    due
}
