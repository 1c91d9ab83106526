//! Exit-intent detection for the public site.
//!
//! The host feeds page events in with a timestamp measured from activation;
//! the detector decides whether the visitor is about to leave. All state is
//! owned by the detector instance and the callback runs at most once.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitIntentConfig {
    /// Nothing is detected before this much time has passed since activation.
    pub arm_delay: Duration,
    /// Pointer must leave within this many pixels of the top edge.
    pub top_edge_px: f64,
    /// Vertical pointer velocity (px/ms) must be below this to count as upward.
    pub upward_velocity_threshold: f64,
    /// Consecutive upward scroll reversals tolerated before triggering.
    pub scroll_reversal_limit: u32,
    /// Upward scrolls this close to the top are ignored.
    pub scroll_min_offset_px: f64,
    pub inactivity_timeout: Duration,
    /// Inactivity only counts on viewports narrower than this.
    pub mobile_breakpoint_px: f64,
}

impl Default for ExitIntentConfig {
    fn default() -> Self {
        ExitIntentConfig {
            arm_delay: Duration::from_millis(3000),
            top_edge_px: 50.0,
            upward_velocity_threshold: -0.1,
            scroll_reversal_limit: 3,
            scroll_min_offset_px: 100.0,
            inactivity_timeout: Duration::from_millis(30_000),
            mobile_breakpoint_px: 768.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    PointerMove { y: f64 },
    PointerLeave { y: f64 },
    Scroll { position: f64 },
    TouchStart,
    Resize { width: f64 },
    /// Periodic timer check, used for the inactivity rule.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitTrigger {
    PointerExit,
    ScrollReversal,
    Inactivity,
}

pub type ExitCallback = Box<dyn FnOnce(ExitTrigger) + Send>;

pub struct ExitIntentDetector {
    config: ExitIntentConfig,
    on_exit: Option<ExitCallback>,
    triggered: bool,
    viewport_width: f64,
    last_pointer: Option<(Duration, f64)>,
    pointer_velocity: f64,
    last_scroll: f64,
    scroll_reversals: u32,
    last_activity: Duration,
}

impl ExitIntentDetector {
    pub fn new(config: ExitIntentConfig, viewport_width: f64, on_exit: ExitCallback) -> Self {
        let last_activity = config.arm_delay;
        ExitIntentDetector {
            config,
            on_exit: Some(on_exit),
            triggered: false,
            viewport_width,
            last_pointer: None,
            pointer_velocity: 0.0,
            last_scroll: 0.0,
            scroll_reversals: 0,
            last_activity,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// False once triggered or torn down.
    pub fn is_listening(&self) -> bool {
        self.on_exit.is_some()
    }

    pub fn is_armed(&self, at: Duration) -> bool {
        at >= self.config.arm_delay
    }

    fn is_mobile(&self) -> bool {
        self.viewport_width < self.config.mobile_breakpoint_px
    }

    /// When the host should next send a `Tick`, if ever.
    pub fn next_deadline(&self) -> Option<Duration> {
        if !self.is_listening() {
            return None;
        }
        if self.is_mobile() {
            Some(self.last_activity + self.config.inactivity_timeout)
        } else {
            None
        }
    }

    /// Single entry point for every page event. Returns the trigger when this
    /// event is the one that fired the callback.
    pub fn dispatch(&mut self, at: Duration, event: PageEvent) -> Option<ExitTrigger> {
        if !self.is_listening() {
            return None;
        }

        // pointer and viewport tracking run before arming so the first
        // armed leave sees the real velocity
        match event {
            PageEvent::PointerMove { y } => self.track_pointer(at, y),
            PageEvent::Resize { width } => self.viewport_width = width,
            _ => {}
        }
        if !self.is_armed(at) {
            return None;
        }

        let trigger = match event {
            PageEvent::PointerMove { .. } | PageEvent::TouchStart => {
                self.last_activity = at;
                None
            }
            PageEvent::PointerLeave { y } => {
                let upward = self.pointer_velocity < self.config.upward_velocity_threshold;
                (y <= self.config.top_edge_px && upward).then_some(ExitTrigger::PointerExit)
            }
            PageEvent::Scroll { position } => self.track_scroll(position),
            PageEvent::Resize { .. } => None,
            PageEvent::Tick => {
                let idle = at.saturating_sub(self.last_activity);
                (self.is_mobile() && idle >= self.config.inactivity_timeout)
                    .then_some(ExitTrigger::Inactivity)
            }
        };

        if let Some(trigger) = trigger {
            self.fire(trigger);
        }
        trigger
    }

    fn track_pointer(&mut self, at: Duration, y: f64) {
        if let Some((last_at, last_y)) = self.last_pointer {
            let elapsed_ms = at.saturating_sub(last_at).as_secs_f64() * 1000.0;
            let dy = y - last_y;
            self.pointer_velocity = if elapsed_ms > 0.0 { dy / elapsed_ms } else { dy };
        }
        self.last_pointer = Some((at, y));
    }

    fn track_scroll(&mut self, position: f64) -> Option<ExitTrigger> {
        if position < self.last_scroll && position > self.config.scroll_min_offset_px {
            self.scroll_reversals += 1;
        } else if position > self.last_scroll {
            self.scroll_reversals = 0;
        }
        self.last_scroll = position;

        (self.scroll_reversals > self.config.scroll_reversal_limit)
            .then_some(ExitTrigger::ScrollReversal)
    }

    fn fire(&mut self, trigger: ExitTrigger) {
        if self.triggered {
            return;
        }
        self.triggered = true;
        debug!(?trigger, "Exit intent detected");
        if let Some(callback) = self.on_exit.take() {
            callback(trigger);
        }
    }

    /// Stops listening without firing.
    pub fn teardown(&mut self) {
        self.on_exit = None;
    }
}
