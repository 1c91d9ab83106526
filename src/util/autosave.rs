use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::autosave_conf::AutosaveConfig;

pub const LEAVE_WARNING: &str = "You have unsaved changes. Are you sure you want to leave?";

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Save failed: {0}")]
    Failed(String),
}

/// The write performed when a debounced save fires.
#[async_trait]
pub trait SaveOperation: Send + Sync {
    async fn save(&self) -> Result<(), SaveError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutosaveSnapshot {
    pub status: SaveStatus,
    pub has_unsaved_changes: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub confirm_before_leave: bool,
}

struct AutosaveState {
    status: SaveStatus,
    has_unsaved_changes: bool,
    last_saved_at: Option<DateTime<Utc>>,
    // bumped on every mark_dirty, lets a finished save tell whether newer edits exist
    edits: u64,
    // bumped whenever the scheduled save is replaced or cancelled
    generation: u64,
    pending_save: Option<JoinHandle<()>>,
    pending_reset: Option<JoinHandle<()>>,
}

struct Shared {
    config: AutosaveConfig,
    operation: Arc<dyn SaveOperation>,
    state: Mutex<AutosaveState>,
    // serialises overlapping saves
    save_lock: tokio::sync::Mutex<()>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, AutosaveState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn run_save(self: &Arc<Self>) {
        self.lock_state().status = SaveStatus::Saving;
        let _in_flight = self.save_lock.lock().await;

        let edits_at_start = {
            let mut state = self.lock_state();
            state.status = SaveStatus::Saving;
            if let Some(reset) = state.pending_reset.take() {
                reset.abort();
            }
            state.edits
        };

        debug!("Autosave started");
        let result = self.operation.save().await;

        let mut state = self.lock_state();
        match result {
            Ok(()) => {
                state.last_saved_at = Some(Utc::now());
                if state.edits != edits_at_start {
                    // newer edits are still pending their own save
                    state.status = SaveStatus::Idle;
                    state.has_unsaved_changes = true;
                    info!("Autosave completed, newer edits pending");
                    return;
                }
                state.status = SaveStatus::Saved;
                state.has_unsaved_changes = false;

                let shared = Arc::clone(self);
                let reset_after = self.config.saved_reset();
                state.pending_reset = Some(tokio::spawn(async move {
                    tokio::time::sleep(reset_after).await;
                    let mut state = shared.lock_state();
                    if state.status == SaveStatus::Saved {
                        state.status = SaveStatus::Idle;
                    }
                    state.pending_reset = None;
                }));
                info!("Autosave completed");
            }
            Err(e) => {
                state.status = SaveStatus::Error;
                error!(error = %e, "Autosave failed");
            }
        }
    }
}

/// Debounced save scheduler. Owns its timers; dropping it cancels them.
pub struct AutosaveController {
    shared: Arc<Shared>,
}

impl AutosaveController {
    pub fn new(config: AutosaveConfig, operation: Arc<dyn SaveOperation>) -> Self {
        AutosaveController {
            shared: Arc::new(Shared {
                config,
                operation,
                state: Mutex::new(AutosaveState {
                    status: SaveStatus::Idle,
                    has_unsaved_changes: false,
                    last_saved_at: None,
                    edits: 0,
                    generation: 0,
                    pending_save: None,
                    pending_reset: None,
                }),
                save_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.config.enabled
    }

    /// Records an edit and pushes the deferred save back to `delay` from now.
    /// Must be called from within a tokio runtime.
    pub fn mark_dirty(&self) {
        if !self.shared.config.enabled {
            return;
        }

        let mut state = self.shared.lock_state();
        state.has_unsaved_changes = true;
        state.status = SaveStatus::Idle;
        state.edits += 1;
        if let Some(reset) = state.pending_reset.take() {
            reset.abort();
        }
        if let Some(pending) = state.pending_save.take() {
            pending.abort();
        }
        state.generation += 1;

        let generation = state.generation;
        let shared = Arc::clone(&self.shared);
        let delay = self.shared.config.delay();
        state.pending_save = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = shared.lock_state();
                if state.generation != generation {
                    return;
                }
                // detach so a later mark_dirty cannot abort the save in flight
                state.pending_save = None;
            }
            shared.run_save().await;
        }));
        debug!(edits = state.edits, "Autosave scheduled");
    }

    /// Saves immediately, replacing any scheduled save.
    pub async fn trigger_save(&self) {
        if !self.shared.config.enabled {
            return;
        }
        {
            let mut state = self.shared.lock_state();
            if let Some(pending) = state.pending_save.take() {
                pending.abort();
            }
            state.generation += 1;
        }
        self.shared.run_save().await;
    }

    pub fn status(&self) -> SaveStatus {
        self.shared.lock_state().status
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.shared.lock_state().has_unsaved_changes
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.shared.lock_state().last_saved_at
    }

    /// Whether the host should ask the user before leaving the page.
    pub fn should_confirm_leave(&self) -> bool {
        self.has_unsaved_changes()
    }

    pub fn leave_warning(&self) -> Option<&'static str> {
        self.should_confirm_leave().then_some(LEAVE_WARNING)
    }

    pub fn snapshot(&self) -> AutosaveSnapshot {
        let state = self.shared.lock_state();
        AutosaveSnapshot {
            status: state.status,
            has_unsaved_changes: state.has_unsaved_changes,
            last_saved_at: state.last_saved_at,
            confirm_before_leave: state.has_unsaved_changes,
        }
    }

    /// Cancels the scheduled save and the saved-to-idle reset.
    pub fn teardown(&self) {
        let mut state = self.shared.lock_state();
        state.generation += 1;
        if let Some(pending) = state.pending_save.take() {
            pending.abort();
        }
        if let Some(reset) = state.pending_reset.take() {
            reset.abort();
        }
    }
}

impl Drop for AutosaveController {
    fn drop(&mut self) {
        self.teardown();
    }
}
