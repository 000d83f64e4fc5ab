//! Demo runner for the KinWell notification engine.
//!
//! Seeds an in-memory store with a family and a couple of appointments whose
//! reminders come due shortly after launch, wires a console notification
//! platform, and runs the engine until ctrl-c.

use std::sync::Arc;

use chrono::{Duration, Utc};
use log::info;

use kinwell::platform::NotifyPlatform;
use kinwell::store::MemoryStore;
use kinwell::types::{load_config, Appointment, FamilyMember, Gender, PermissionState};
use kinwell::NotificationEngine;

/// Console stand-in for the OS notification surface.
struct ConsolePlatform;

impl NotifyPlatform for ConsolePlatform {
    fn query_permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn request_permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn show(&self, title: &str, message: &str) {
        info!("[native] {}: {}", title, message);
    }

    fn has_focus(&self) -> bool {
        false
    }
}

fn seed_store() -> MemoryStore {
    let store = MemoryStore::new();
    let now = Utc::now();

    store.add_member(FamilyMember {
        id: "m1".to_string(),
        name: "Sarah".to_string(),
        age: 38,
        gender: Gender::Female,
        relation: "Self".to_string(),
        avatar_url: "https://picsum.photos/seed/Sarah/200".to_string(),
    });
    store.add_member(FamilyMember {
        id: "m2".to_string(),
        name: "Leo".to_string(),
        age: 9,
        gender: Gender::Male,
        relation: "Son".to_string(),
        avatar_url: "https://picsum.photos/seed/Leo/200".to_string(),
    });

    // Reminder comes due two minutes after launch (offset 30, appointment in 32)
    store.add_appointment(Appointment {
        id: "a1".to_string(),
        member_id: "m1".to_string(),
        title: "Annual Physical".to_string(),
        date: now + Duration::minutes(32),
        doctor: "Dr. Chen".to_string(),
        location: "Downtown Clinic".to_string(),
        notes: None,
        reminder_offset: Some(30),
    });
    store.add_appointment(Appointment {
        id: "a2".to_string(),
        member_id: "m2".to_string(),
        title: "Dental Cleaning".to_string(),
        date: now + Duration::minutes(20),
        doctor: "Dr. Patel".to_string(),
        location: "Smile Dental".to_string(),
        notes: Some("Bring insurance card".to_string()),
        reminder_offset: Some(15),
    });

    store
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    info!(
        "Loaded config: tick {}s, window {}m, insight probability {}",
        config.tick_interval_secs, config.reminder_window_mins, config.insight_probability
    );

    let store = Arc::new(seed_store());
    let platform: Arc<dyn NotifyPlatform> = Arc::new(ConsolePlatform);

    let engine = NotificationEngine::new(config, store, Some(platform))?;

    let permission = engine.request_permission();
    info!("Notification permission: {:?}", permission);

    engine.start();
    info!("Engine running; press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;

    engine.stop();
    info!(
        "Shutting down with {} notification(s) in the list",
        engine.notifications().len()
    );

    Ok(())
}
