//! The notification engine
//!
//! Owns all session state (ShownSet, insight list, notification list) and
//! drives one evaluation pass per tick: scan appointments for due reminders,
//! then run one insight sampling draw. Everything in a pass is synchronous,
//! so ticks never overlap and no state mutation can partially fail.
//!
//! The periodic wiring lives here; the evaluation itself is `tick_at`, which
//! takes an explicit timestamp so tests drive it directly.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::dispatch::{insight_notification, reminder_notification, NotificationDispatcher};
use crate::error::EngineError;
use crate::insight::InsightSampler;
use crate::platform::{NotifyPlatform, PermissionGate};
use crate::reminder::{due_reminders, ShownSet};
use crate::store::HealthStore;
use crate::types::{AIInsight, AppNotification, EngineConfig, FamilyMember, PermissionState};

/// Session state owned exclusively by the engine.
struct EngineState {
    shown: ShownSet,
    insights: Vec<AIInsight>,
    sampler: InsightSampler,
    dispatcher: NotificationDispatcher,
}

/// Shared core: configuration, store handle, and the state mutex.
/// Cloned into the ticker task so the engine handle itself stays plain.
struct EngineCore {
    config: EngineConfig,
    store: Arc<dyn HealthStore>,
    state: Mutex<EngineState>,
}

/// Handle to the running ticker task.
struct TickerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Reminder and insight notification engine.
///
/// Constructed once per session with empty state; `stop` tears the ticker
/// down deterministically and may be called repeatedly.
pub struct NotificationEngine {
    core: Arc<EngineCore>,
    ticker: Mutex<Option<TickerHandle>>,
}

impl NotificationEngine {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn HealthStore>,
        platform: Option<Arc<dyn NotifyPlatform>>,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let sampler = InsightSampler::new(config.insight_probability);
        Ok(Self::assemble(config, store, platform, sampler))
    }

    /// Construct with an injected sampler, for deterministic tests.
    pub fn with_sampler(
        config: EngineConfig,
        store: Arc<dyn HealthStore>,
        platform: Option<Arc<dyn NotifyPlatform>>,
        sampler: InsightSampler,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::assemble(config, store, platform, sampler))
    }

    fn assemble(
        config: EngineConfig,
        store: Arc<dyn HealthStore>,
        platform: Option<Arc<dyn NotifyPlatform>>,
        sampler: InsightSampler,
    ) -> Self {
        let gate = PermissionGate::new(platform);
        Self {
            core: Arc::new(EngineCore {
                config,
                store,
                state: Mutex::new(EngineState {
                    shown: ShownSet::new(),
                    insights: Vec::new(),
                    sampler,
                    dispatcher: NotificationDispatcher::new(gate),
                }),
            }),
            ticker: Mutex::new(None),
        }
    }

    /// Start the periodic ticker. No-op if already running.
    pub fn start(&self) {
        let Ok(mut guard) = self.ticker.lock() else {
            log::warn!("Ticker lock unavailable; engine not started");
            return;
        };

        if guard.is_some() {
            log::warn!("Engine already running; start ignored");
            return;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let core = Arc::clone(&self.core);
        let period = Duration::from_secs(self.core.config.tick_interval_secs);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick resolves immediately; the reference
            // behavior is to wait one full period before the first pass.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = interval.tick() => core.tick_at(Utc::now()),
                }
            }
        });

        log::info!(
            "Notification engine started (tick every {}s)",
            self.core.config.tick_interval_secs
        );
        *guard = Some(TickerHandle { shutdown, task });
    }

    /// Stop the ticker and release the timer. Idempotent.
    pub fn stop(&self) {
        let handle = match self.ticker.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };

        if let Some(TickerHandle { shutdown, task }) = handle {
            let _ = shutdown.send(true);
            task.abort();
            log::info!("Notification engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Run one evaluation pass at the given time.
    pub fn tick_at(&self, now: DateTime<Utc>) {
        self.core.tick_at(now);
    }

    /// In-app notification list, newest first.
    pub fn notifications(&self) -> Vec<AppNotification> {
        self.core
            .state
            .lock()
            .map(|state| state.dispatcher.notifications().to_vec())
            .unwrap_or_default()
    }

    /// Insights generated this session, newest first.
    pub fn insights(&self) -> Vec<AIInsight> {
        self.core
            .state
            .lock()
            .map(|state| state.insights.clone())
            .unwrap_or_default()
    }

    /// Remove one in-app notification by id. No-op when absent.
    pub fn dismiss(&self, id: &str) {
        if let Ok(mut state) = self.core.state.lock() {
            state.dispatcher.dismiss(id);
        }
    }

    /// Attempt to upgrade notification permission; returns the result.
    pub fn request_permission(&self) -> PermissionState {
        self.core
            .state
            .lock()
            .map(|state| state.dispatcher.gate().request())
            .unwrap_or(PermissionState::Unrequested)
    }

    /// Current notification permission.
    pub fn permission(&self) -> PermissionState {
        self.core
            .state
            .lock()
            .map(|state| state.dispatcher.gate().current())
            .unwrap_or(PermissionState::Unrequested)
    }
}

impl Drop for NotificationEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl EngineCore {
    /// One evaluation pass: re-read the store snapshot, emit reminders for
    /// newly due appointments, then run one insight sampling draw.
    fn tick_at(&self, now: DateTime<Utc>) {
        let appointments = self.store.appointments();
        let members = self.store.family_members();

        let Ok(mut state) = self.state.lock() else {
            log::warn!("Engine state lock unavailable; skipping tick");
            return;
        };
        let EngineState {
            shown,
            insights,
            sampler,
            dispatcher,
        } = &mut *state;

        let due = due_reminders(now, &appointments, shown, self.config.reminder_window_mins);
        for appointment in due {
            let member_name = member_name(&members, &appointment.member_id);
            dispatcher.dispatch(reminder_notification(&appointment, member_name, now));
        }

        if let Some(insight) = sampler.sample(&members, insights, now) {
            let member_name = member_name(&members, &insight.member_id);
            dispatcher.dispatch(insight_notification(&insight, member_name, now));
            insights.insert(0, insight);
        }
    }
}

fn member_name<'a>(members: &'a [FamilyMember], member_id: &str) -> Option<&'a str> {
    members
        .iter()
        .find(|m| m.id == member_id)
        .map(|m| m.name.as_str())
}
