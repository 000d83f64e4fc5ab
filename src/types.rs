use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// =============================================================================
// Domain types
// =============================================================================

/// A scheduled appointment for a family member.
///
/// Immutable for the engine's purposes: edits happen in the record manager,
/// and the engine re-reads the store snapshot on every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub member_id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub doctor: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Minutes before `date` at which a reminder becomes due.
    /// Appointments without an offset never produce a reminder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A member of the family whose health is tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub relation: String,
    pub avatar_url: String,
}

/// An in-app notification produced by the engine.
///
/// The id is reused from the triggering appointment or insight, so the
/// at-most-once reminder invariant is observable on the notification list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppNotification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Category of a generated health insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightCategory {
    #[serde(rename = "Positive Trend")]
    PositiveTrend,
    Observation,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
}

/// A generated observation about a family member's health data.
///
/// Deduplicated by `(member_id, title)` for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIInsight {
    pub id: String,
    pub member_id: String,
    pub title: String,
    pub description: String,
    pub category: InsightCategory,
    pub date: DateTime<Utc>,
}

/// OS notification permission as seen by the engine.
///
/// `Unrequested` is the initial state; the only transition the engine itself
/// performs is `Unrequested -> Granted | Denied` via an explicit request.
/// The user may change permission externally, which the engine observes by
/// re-querying the platform, but the engine never downgrades the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Unrequested,
    Granted,
    Denied,
}

// =============================================================================
// Engine configuration
// =============================================================================

/// Configuration stored in ~/.kinwell/config.json
///
/// Every field has a serde default matching the reference behavior, so a
/// missing or partial file yields a working engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Period of the evaluation pass, in seconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// Width of the reminder firing window, in minutes. A reminder whose
    /// window passed without a tick is permanently missed.
    #[serde(default = "default_reminder_window")]
    pub reminder_window_mins: i64,
    /// Per-tick probability of proposing a new insight.
    #[serde(default = "default_insight_probability")]
    pub insight_probability: f64,
}

fn default_tick_interval() -> u64 {
    60
}

fn default_reminder_window() -> i64 {
    5
}

fn default_insight_probability() -> f64 {
    0.05
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval(),
            reminder_window_mins: default_reminder_window(),
            insight_probability: default_insight_probability(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.tick_interval_secs == 0 {
            return Err(EngineError::ConfigurationError(
                "tickIntervalSecs must be positive".to_string(),
            ));
        }
        if self.reminder_window_mins <= 0 {
            return Err(EngineError::ConfigurationError(
                "reminderWindowMins must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.insight_probability) {
            return Err(EngineError::ConfigurationError(format!(
                "insightProbability must be within [0, 1], got {}",
                self.insight_probability
            )));
        }
        Ok(())
    }
}

/// Get the canonical config file path (~/.kinwell/config.json)
pub fn config_path() -> Result<PathBuf, EngineError> {
    let home = dirs::home_dir()
        .ok_or_else(|| EngineError::ConfigurationError("Could not find home directory".into()))?;
    Ok(home.join(".kinwell").join("config.json"))
}

/// Load configuration from ~/.kinwell/config.json, defaulting when absent.
pub fn load_config() -> Result<EngineConfig, EngineError> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(EngineConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config: EngineConfig = serde_json::from_str(&content)?;
    config.validate()?;

    Ok(config)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval_secs, 60);
        assert_eq!(config.reminder_window_mins, 5);
        assert!((config.insight_probability - 0.05).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"tickIntervalSecs": 30}"#).unwrap();
        assert_eq!(config.tick_interval_secs, 30);
        assert_eq!(config.reminder_window_mins, 5);
    }

    #[test]
    fn test_config_rejects_zero_tick() {
        let config = EngineConfig {
            tick_interval_secs: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_probability_out_of_range() {
        let config = EngineConfig {
            insight_probability: 1.5,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            insight_probability: -0.1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_insight_category_wire_names() {
        let json = serde_json::to_string(&InsightCategory::PositiveTrend).unwrap();
        assert_eq!(json, r#""Positive Trend""#);
        let json = serde_json::to_string(&InsightCategory::NeedsAttention).unwrap();
        assert_eq!(json, r#""Needs Attention""#);
    }

    #[test]
    fn test_appointment_camel_case_wire_format() {
        let json = r#"{
            "id": "a1",
            "memberId": "m1",
            "title": "Annual Physical",
            "date": "2024-01-01T10:00:00Z",
            "doctor": "Dr. Chen",
            "location": "Downtown Clinic",
            "reminderOffset": 30
        }"#;
        let app: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(app.member_id, "m1");
        assert_eq!(app.reminder_offset, Some(30));
        assert!(app.notes.is_none());
    }
}
