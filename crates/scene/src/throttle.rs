//! Rate limiting for pointer-move painting
//!
//! Leading edge: the first move after a quiet interval paints immediately.
//! Trailing edge: the latest suppressed move is kept and delivered by
//! [`PaintThrottle::poll`] once the interval has passed.

use std::time::{Duration, Instant};

use glam::Vec3;

/// Coalesces pointer moves to at most one paint per interval
#[derive(Debug, Clone)]
pub struct PaintThrottle {
    interval: Duration,
    last_fire: Option<Instant>,
    pending: Option<Vec3>,
}

impl PaintThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer a move. Returns the point if it should be painted now.
    pub fn offer(&mut self, point: Vec3, now: Instant) -> Option<Vec3> {
        if self.ready(now) {
            self.fire(now);
            Some(point)
        } else {
            self.pending = Some(point);
            None
        }
    }

    /// Deliver the pending trailing move if the interval has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<Vec3> {
        if self.pending.is_none() || !self.ready(now) {
            return None;
        }
        let point = self.pending.take();
        self.last_fire = Some(now);
        point
    }

    /// Record a paint that bypassed the throttle (e.g. pointer down)
    pub fn mark(&mut self, now: Instant) {
        self.fire(now);
    }

    /// Forget timing and drop any pending move
    pub fn reset(&mut self) {
        self.last_fire = None;
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last_fire {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    fn fire(&mut self, now: Instant) {
        self.last_fire = Some(now);
        self.pending = None;
    }
}
