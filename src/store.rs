//! Read access to the family health data store
//!
//! Persistence and CRUD live in the record manager; the engine only needs a
//! snapshot of appointments and members at the start of each tick. The trait
//! seam keeps the evaluation logic independent of where the data lives.

use std::sync::Mutex;

use crate::types::{Appointment, FamilyMember};

/// Snapshot read access to appointments and family members.
///
/// Implementations must return the latest state on every call; the engine
/// never caches a snapshot across ticks.
pub trait HealthStore: Send + Sync {
    fn appointments(&self) -> Vec<Appointment>;
    fn family_members(&self) -> Vec<FamilyMember>;
}

/// In-memory store backing the demo binary and tests.
#[derive(Default)]
pub struct MemoryStore {
    appointments: Mutex<Vec<Appointment>>,
    members: Mutex<Vec<FamilyMember>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_appointment(&self, appointment: Appointment) {
        if let Ok(mut guard) = self.appointments.lock() {
            guard.push(appointment);
        }
    }

    pub fn add_member(&self, member: FamilyMember) {
        if let Ok(mut guard) = self.members.lock() {
            guard.push(member);
        }
    }
}

impl HealthStore for MemoryStore {
    fn appointments(&self) -> Vec<Appointment> {
        self.appointments
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn family_members(&self) -> Vec<FamilyMember> {
        self.members
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}
