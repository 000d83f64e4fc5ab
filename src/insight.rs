//! Opportunistic insight sampling
//!
//! Once per tick, with a small fixed probability, the sampler proposes a
//! generic observation for a uniformly chosen family member. The proposal is
//! rejected if an insight with the same `(member_id, title)` pair already
//! exists, so repeated sampling never duplicates. This stream is explicitly
//! best-effort; real analysis of health data is delegated to the on-demand
//! text-generation collaborator elsewhere in the system.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use uuid::Uuid;

use crate::types::{AIInsight, FamilyMember, InsightCategory};

/// Title of the generic observation the sampler proposes.
/// Deterministic so the dedup key is stable per member.
pub const OBSERVATION_TITLE: &str = "New Health Observation";

/// Stochastic proposer of health observations.
pub struct InsightSampler {
    probability: f64,
    rng: Box<dyn RngCore + Send>,
}

impl InsightSampler {
    pub fn new(probability: f64) -> Self {
        Self::with_rng(probability, Box::new(StdRng::from_os_rng()))
    }

    /// Construct with an injected RNG so tests control the draws.
    pub fn with_rng(probability: f64, rng: Box<dyn RngCore + Send>) -> Self {
        Self { probability, rng }
    }

    /// Run one sampling pass.
    ///
    /// Returns a new insight when the draw succeeds, a member exists, and the
    /// `(member_id, title)` pair is not already present in `existing`.
    pub fn sample(
        &mut self,
        members: &[FamilyMember],
        existing: &[AIInsight],
        now: DateTime<Utc>,
    ) -> Option<AIInsight> {
        if members.is_empty() {
            return None;
        }

        if !self.rng.random_bool(self.probability) {
            return None;
        }

        let member = &members[self.rng.random_range(0..members.len())];

        let duplicate = existing
            .iter()
            .any(|i| i.member_id == member.id && i.title == OBSERVATION_TITLE);
        if duplicate {
            return None;
        }

        Some(AIInsight {
            id: format!("insight_{}", Uuid::new_v4()),
            member_id: member.id.clone(),
            title: OBSERVATION_TITLE.to_string(),
            description: format!(
                "A new trend has been observed in {}'s recent health data.",
                member.name
            ),
            category: InsightCategory::Observation,
            date: now,
        })
    }
}
