//! Dwell-to-reveal tooltip over Focus link lines.
//!
//! A new hovered link re-arms a single-shot timer; the tooltip shows when the
//! timer fires, at the latest pointer position. While the same link stays
//! hovered and the tooltip is up, it follows the pointer. Leaving every link
//! or calling [`HoverTracker::cancel`] drops the timer and hides the tooltip.

use foundation::math::Vec2;
use foundation::time::Millis;
use runtime::timer::{TimerId, TimerQueue};

/// Link currently under the pointer, as reported by the caller's hit test.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinkHit {
    pub link: usize,
    pub distance_mpc: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    /// Top-left corner in viewport pixels.
    pub left_px: f64,
    pub top_px: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Reveal {
    link: usize,
    distance_mpc: Option<f64>,
}

pub fn distance_text(mpc: f64) -> String {
    format!("Distance: {mpc:.3} Mpc")
}

pub struct HoverTracker {
    delay_ms: u64,
    offset_px: f64,
    hovered: Option<usize>,
    pending: Option<TimerId>,
    timers: TimerQueue<Reveal>,
    pointer_px: Vec2,
    tooltip: Option<Tooltip>,
}

impl HoverTracker {
    pub fn new(delay_ms: u64, offset_px: f64) -> Self {
        Self {
            delay_ms,
            offset_px,
            hovered: None,
            pending: None,
            timers: TimerQueue::new(),
            pointer_px: Vec2::default(),
            tooltip: None,
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some_and(|id| self.timers.is_pending(id))
    }

    /// When the pending reveal is due, if one is armed.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    fn hide(&mut self) {
        self.tooltip = None;
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
    }

    /// Forgets the hovered link, drops any pending reveal and hides the
    /// tooltip.
    pub fn cancel(&mut self) {
        self.hovered = None;
        self.hide();
    }

    pub fn on_pointer_move(&mut self, now: Millis, hit: Option<LinkHit>, pointer_px: Vec2) {
        self.pointer_px = pointer_px;
        let Some(hit) = hit else {
            self.cancel();
            return;
        };

        if self.hovered == Some(hit.link) {
            let (left, top) = self.anchor();
            if let Some(t) = self.tooltip.as_mut() {
                t.left_px = left;
                t.top_px = top;
            }
            return;
        }

        self.hide();
        self.hovered = Some(hit.link);
        self.pending = Some(self.timers.schedule(
            now,
            self.delay_ms,
            Reveal {
                link: hit.link,
                distance_mpc: hit.distance_mpc,
            },
        ));
    }

    /// Fires due reveals. Returns `true` if a tooltip became visible.
    pub fn poll(&mut self, now: Millis) -> bool {
        let mut shown = false;
        for reveal in self.timers.take_due(now) {
            self.pending = None;
            if self.hovered != Some(reveal.link) {
                continue;
            }
            let Some(mpc) = reveal.distance_mpc else {
                continue;
            };
            let (left_px, top_px) = self.anchor();
            self.tooltip = Some(Tooltip {
                text: distance_text(mpc),
                left_px,
                top_px,
            });
            shown = true;
        }
        shown
    }

    fn anchor(&self) -> (f64, f64) {
        (self.pointer_px.x + self.offset_px, self.pointer_px.y + self.offset_px)
    }
}
