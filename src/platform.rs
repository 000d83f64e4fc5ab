//! OS notification capability and permission tracking
//!
//! The platform surface (permission prompt, native notification, focus
//! query) is injected as a trait so the engine runs identically under a real
//! desktop shell, a headless demo, or a test stub. All capability calls are
//! infallible by contract: a platform that cannot deliver simply drops the
//! notification.

use std::sync::{Arc, Mutex};

use crate::types::PermissionState;

/// Injected OS notification capability.
pub trait NotifyPlatform: Send + Sync {
    /// Current permission as the OS reports it.
    fn query_permission(&self) -> PermissionState;

    /// Prompt the user for permission and return the outcome.
    fn request_permission(&self) -> PermissionState;

    /// Show a native notification. Fire-and-forget, best-effort.
    fn show(&self, title: &str, message: &str);

    /// Whether the application is the focused/foreground surface.
    /// Native notifications are suppressed while the app has focus.
    fn has_focus(&self) -> bool;
}

/// Tracks OS notification permission and gates native dispatch.
///
/// With no platform available the gate stays at `Unrequested` and native
/// dispatch is never attempted; in-app notifications are unaffected.
pub struct PermissionGate {
    platform: Option<Arc<dyn NotifyPlatform>>,
    state: Mutex<PermissionState>,
}

impl PermissionGate {
    pub fn new(platform: Option<Arc<dyn NotifyPlatform>>) -> Self {
        let initial = platform
            .as_deref()
            .map(|p| p.query_permission())
            .unwrap_or(PermissionState::Unrequested);

        Self {
            platform,
            state: Mutex::new(initial),
        }
    }

    /// Current permission state.
    ///
    /// Re-queries the platform so a grant made in OS settings is observed,
    /// but never regresses a terminal Granted/Denied state to Unrequested.
    pub fn current(&self) -> PermissionState {
        let Some(platform) = self.platform.as_deref() else {
            return PermissionState::Unrequested;
        };

        let queried = platform.query_permission();

        match self.state.lock() {
            Ok(mut state) => {
                if *state == PermissionState::Unrequested {
                    *state = queried;
                }
                *state
            }
            Err(_) => queried,
        }
    }

    /// Attempt the `Unrequested -> Granted | Denied` transition.
    ///
    /// No-op when already resolved or when no platform is available; returns
    /// the resulting state either way.
    pub fn request(&self) -> PermissionState {
        let Some(platform) = self.platform.as_deref() else {
            log::info!("Notification platform unavailable; permission stays unrequested");
            return PermissionState::Unrequested;
        };

        match self.state.lock() {
            Ok(mut state) => {
                if *state == PermissionState::Unrequested {
                    let result = platform.request_permission();
                    log::info!("Notification permission request resolved: {:?}", result);
                    *state = result;
                }
                *state
            }
            Err(_) => PermissionState::Unrequested,
        }
    }

    /// Whether a native notification should be shown right now.
    pub fn native_dispatch_allowed(&self) -> bool {
        let Some(platform) = self.platform.as_deref() else {
            return false;
        };
        self.current() == PermissionState::Granted && !platform.has_focus()
    }

    /// Show a native notification, if a platform is present.
    pub fn show(&self, title: &str, message: &str) {
        if let Some(platform) = self.platform.as_deref() {
            platform.show(title, message);
        }
    }
}
