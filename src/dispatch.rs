//! Notification dispatch
//!
//! Turns due reminders and fresh insights into in-app notifications and,
//! when permission allows and the app is in the background, native ones.
//! The dispatcher performs no deduplication of its own: the ShownSet and the
//! insight dedup upstream already guarantee each notification is constructed
//! at most once.

use chrono::{DateTime, Utc};

use crate::platform::PermissionGate;
use crate::types::{AIInsight, AppNotification, Appointment};

/// Fallback display name when the owning member is not in the store snapshot.
const UNKNOWN_MEMBER: &str = "Someone";

/// Build the in-app notification for a due appointment reminder.
pub fn reminder_notification(
    appointment: &Appointment,
    member_name: Option<&str>,
    now: DateTime<Utc>,
) -> AppNotification {
    let name = member_name.unwrap_or(UNKNOWN_MEMBER);
    AppNotification {
        id: appointment.id.clone(),
        title: format!("Reminder: {}", appointment.title),
        message: format!(
            "{} has an appointment at {}.",
            name,
            appointment.date.format("%H:%M")
        ),
        timestamp: now,
    }
}

/// Build the in-app notification for a newly created insight.
pub fn insight_notification(
    insight: &AIInsight,
    member_name: Option<&str>,
    now: DateTime<Utc>,
) -> AppNotification {
    let name = member_name.unwrap_or(UNKNOWN_MEMBER);
    AppNotification {
        id: insight.id.clone(),
        title: format!("New Insight for {}", name),
        message: insight.description.clone(),
        timestamp: now,
    }
}

/// Holds the in-app notification list and the native-dispatch gate.
pub struct NotificationDispatcher {
    notifications: Vec<AppNotification>,
    gate: PermissionGate,
}

impl NotificationDispatcher {
    pub fn new(gate: PermissionGate) -> Self {
        Self {
            notifications: Vec::new(),
            gate,
        }
    }

    /// Emit a notification: prepend to the in-app list, then show natively
    /// when permission is granted and the app is not focused.
    pub fn dispatch(&mut self, notification: AppNotification) {
        log::info!(
            "Notification {}: {}",
            notification.id,
            notification.title
        );

        if self.gate.native_dispatch_allowed() {
            self.gate.show(&notification.title, &notification.message);
        }

        self.notifications.insert(0, notification);
    }

    /// Remove one notification by id. No-op when absent; never touches the
    /// ShownSet, insight dedup, or permission state.
    pub fn dismiss(&mut self, id: &str) {
        self.notifications.retain(|n| n.id != id);
    }

    /// Current in-app list, newest first.
    pub fn notifications(&self) -> &[AppNotification] {
        &self.notifications
    }

    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::platform::NotifyPlatform;
    use crate::test_utils::{sample_appointment, ts, StubPlatform};
    use crate::types::PermissionState;

    fn dispatcher_over(platform: &Arc<StubPlatform>) -> NotificationDispatcher {
        NotificationDispatcher::new(PermissionGate::new(Some(
            platform.clone() as Arc<dyn NotifyPlatform>
        )))
    }

    fn note(id: &str) -> AppNotification {
        AppNotification {
            id: id.to_string(),
            title: format!("title {}", id),
            message: "message".to_string(),
            timestamp: ts("2024-01-01T10:00:00Z"),
        }
    }

    #[test]
    fn test_dispatch_prepends_newest_first() {
        let mut dispatcher = NotificationDispatcher::new(PermissionGate::new(None));
        dispatcher.dispatch(note("n1"));
        dispatcher.dispatch(note("n2"));

        let list = dispatcher.notifications();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "n2");
        assert_eq!(list[1].id, "n1");
    }

    #[test]
    fn test_dismiss_removes_only_target() {
        let mut dispatcher = NotificationDispatcher::new(PermissionGate::new(None));
        dispatcher.dispatch(note("n1"));
        dispatcher.dispatch(note("n2"));

        dispatcher.dismiss("n1");
        assert_eq!(dispatcher.notifications().len(), 1);
        assert_eq!(dispatcher.notifications()[0].id, "n2");

        // Absent id is a no-op
        dispatcher.dismiss("missing");
        assert_eq!(dispatcher.notifications().len(), 1);
    }

    #[test]
    fn test_native_show_when_granted_and_unfocused() {
        let platform = Arc::new(StubPlatform::new(PermissionState::Granted));
        platform.set_focus(false);
        let mut dispatcher = dispatcher_over(&platform);

        dispatcher.dispatch(note("n1"));
        let shown = platform.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "title n1");
    }

    #[test]
    fn test_no_native_show_while_focused() {
        let platform = Arc::new(StubPlatform::new(PermissionState::Granted));
        platform.set_focus(true);
        let mut dispatcher = dispatcher_over(&platform);

        dispatcher.dispatch(note("n1"));
        assert!(platform.shown().is_empty());
        // In-app delivery is unaffected
        assert_eq!(dispatcher.notifications().len(), 1);
    }

    #[test]
    fn test_no_native_show_without_permission() {
        let platform = Arc::new(StubPlatform::new(PermissionState::Unrequested));
        platform.set_focus(false);
        let mut dispatcher = dispatcher_over(&platform);

        dispatcher.dispatch(note("n1"));
        assert!(platform.shown().is_empty());
        assert_eq!(dispatcher.notifications().len(), 1);
    }

    #[test]
    fn test_reminder_notification_format() {
        let appointment = sample_appointment("a1", "m1", "2024-01-01T10:00:00Z", Some(30));
        let note = reminder_notification(&appointment, Some("Sarah"), ts("2024-01-01T09:31:00Z"));

        assert_eq!(note.id, "a1");
        assert_eq!(note.title, "Reminder: Checkup");
        assert_eq!(note.message, "Sarah has an appointment at 10:00.");
    }

    #[test]
    fn test_reminder_notification_unknown_member() {
        let appointment = sample_appointment("a1", "ghost", "2024-01-01T10:00:00Z", Some(30));
        let note = reminder_notification(&appointment, None, ts("2024-01-01T09:31:00Z"));
        assert!(note.message.starts_with("Someone has an appointment"));
    }
}
