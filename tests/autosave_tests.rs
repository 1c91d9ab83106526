use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use voltline_backend::config::AutosaveConfig;
use voltline_backend::util::autosave::{AutosaveController, SaveError, SaveOperation, SaveStatus, LEAVE_WARNING};

#[derive(Default)]
struct RecordingSave {
    calls: AtomicUsize,
    fail: AtomicBool,
    latency: Duration,
}

impl RecordingSave {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SaveOperation for RecordingSave {
    async fn save(&self) -> Result<(), SaveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(SaveError::Failed("disk full".to_string()));
        }
        Ok(())
    }
}

fn config() -> AutosaveConfig {
    AutosaveConfig { enabled: true, delay_ms: 5000, saved_reset_ms: 2000 }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[tokio::test(start_paused = true)]
async fn test_five_edits_save_once_after_last() {
    let op = Arc::new(RecordingSave::default());
    let controller = AutosaveController::new(config(), op.clone());

    for _ in 0..5 {
        controller.mark_dirty();
        tokio::time::sleep(ms(1000)).await;
    }
    // last edit was 1s ago
    assert!(controller.has_unsaved_changes());
    tokio::time::sleep(ms(3900)).await;
    assert_eq!(op.calls(), 0);

    tokio::time::sleep(ms(200)).await;
    assert_eq!(op.calls(), 1);
    assert_eq!(controller.status(), SaveStatus::Saved);
    assert!(!controller.has_unsaved_changes());
    assert!(controller.last_saved_at().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_saved_returns_to_idle() {
    let op = Arc::new(RecordingSave::default());
    let controller = AutosaveController::new(config(), op.clone());

    controller.mark_dirty();
    tokio::time::sleep(ms(5100)).await;
    assert_eq!(controller.status(), SaveStatus::Saved);

    tokio::time::sleep(ms(1800)).await;
    assert_eq!(controller.status(), SaveStatus::Saved);
    tokio::time::sleep(ms(300)).await;
    assert_eq!(controller.status(), SaveStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_reports_error() {
    let op = Arc::new(RecordingSave::default());
    op.fail.store(true, Ordering::SeqCst);
    let controller = AutosaveController::new(config(), op.clone());

    controller.mark_dirty();
    tokio::time::sleep(ms(5100)).await;
    assert_eq!(op.calls(), 1);
    assert_eq!(controller.status(), SaveStatus::Error);
    assert!(controller.has_unsaved_changes());
    assert_eq!(controller.leave_warning(), Some(LEAVE_WARNING));

    // no automatic retry
    tokio::time::sleep(ms(30_000)).await;
    assert_eq!(op.calls(), 1);

    controller.mark_dirty();
    assert_eq!(controller.status(), SaveStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_controller_does_nothing() {
    let op = Arc::new(RecordingSave::default());
    let controller = AutosaveController::new(AutosaveConfig { enabled: false, ..config() }, op.clone());

    controller.mark_dirty();
    controller.trigger_save().await;
    tokio::time::sleep(ms(10_000)).await;

    assert_eq!(op.calls(), 0);
    assert!(!controller.has_unsaved_changes());
    assert!(!controller.should_confirm_leave());
    assert_eq!(controller.status(), SaveStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_save() {
    let op = Arc::new(RecordingSave::default());
    let controller = AutosaveController::new(config(), op.clone());

    controller.mark_dirty();
    tokio::time::sleep(ms(1000)).await;
    controller.teardown();
    tokio::time::sleep(ms(10_000)).await;

    assert_eq!(op.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_save() {
    let op = Arc::new(RecordingSave::default());
    {
        let controller = AutosaveController::new(config(), op.clone());
        controller.mark_dirty();
    }
    tokio::time::sleep(ms(10_000)).await;
    assert_eq!(op.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_manual_save_replaces_scheduled_one() {
    let op = Arc::new(RecordingSave::default());
    let controller = AutosaveController::new(config(), op.clone());

    controller.mark_dirty();
    controller.trigger_save().await;
    assert_eq!(op.calls(), 1);
    assert_eq!(controller.status(), SaveStatus::Saved);

    tokio::time::sleep(ms(10_000)).await;
    assert_eq!(op.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_edit_during_save_keeps_changes_unsaved() {
    let op = Arc::new(RecordingSave { latency: ms(1000), ..Default::default() });
    let controller = AutosaveController::new(config(), op.clone());

    controller.mark_dirty();
    tokio::time::sleep(ms(5500)).await;
    assert_eq!(controller.status(), SaveStatus::Saving);

    // arrives while the first save is in flight
    controller.mark_dirty();
    tokio::time::sleep(ms(600)).await;
    assert_eq!(op.calls(), 1);
    assert!(controller.has_unsaved_changes());
    // the finished save must not report "saved" over the newer edit
    assert_eq!(controller.status(), SaveStatus::Idle);
    assert!(controller.last_saved_at().is_some());

    // follow-up save starts 5s after the second edit and takes 1s
    tokio::time::sleep(ms(6000)).await;
    assert_eq!(op.calls(), 2);
    assert!(!controller.has_unsaved_changes());
    assert_eq!(controller.status(), SaveStatus::Saved);
    assert_eq!(controller.leave_warning(), None);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_tracks_leave_guard() {
    let op = Arc::new(RecordingSave::default());
    let controller = AutosaveController::new(config(), op.clone());

    assert!(!controller.snapshot().confirm_before_leave);
    controller.mark_dirty();
    let snapshot = controller.snapshot();
    assert!(snapshot.has_unsaved_changes);
    assert!(snapshot.confirm_before_leave);
    assert_eq!(snapshot.status, SaveStatus::Idle);
}
