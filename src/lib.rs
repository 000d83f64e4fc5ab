//! KinWell notification engine
//!
//! Background reminder and insight engine for the KinWell family
//! health-record manager. A periodic ticker scans the appointment store for
//! due reminders (each fires exactly once per session), opportunistically
//! samples health insights, and dispatches both to an in-app notification
//! list and, permission allowing, to the native OS notification surface.

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod insight;
pub mod platform;
pub mod reminder;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use engine::NotificationEngine;
pub use error::EngineError;
pub use platform::NotifyPlatform;
pub use store::HealthStore;
pub use types::{
    AIInsight, AppNotification, Appointment, EngineConfig, FamilyMember, PermissionState,
};
