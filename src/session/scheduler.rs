//! Render scheduling.
//!
//! Every buffer edit marks the preview dirty. The scheduler decides when a
//! dirty preview actually re-renders: immediately on each edit, or after a
//! quiet period so bursts of keystrokes coalesce into a single render.
//!
//! The scheduler never sleeps or spawns anything. Callers pass the current
//! instant into [`RenderScheduler::mark_dirty`] and [`RenderScheduler::poll`],
//! which keeps behavior deterministic under test.

use std::time::{Duration, Instant};

/// Decides when a dirty preview is due for a render.
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    window: Duration,
    dirty: bool,
    deadline: Option<Instant>,
}

impl RenderScheduler {
    /// Scheduler that makes every edit due immediately.
    pub fn immediate() -> Self {
        RenderScheduler {
            window: Duration::ZERO,
            dirty: false,
            deadline: None,
        }
    }

    /// Scheduler that waits for `window` of quiet after the last edit.
    ///
    /// Each new edit pushes the deadline back, so a steady stream of edits
    /// renders once, after the stream stops.
    pub fn debounced(window: Duration) -> Self {
        RenderScheduler {
            window,
            dirty: false,
            deadline: None,
        }
    }

    /// The configured quiet window. Zero means immediate.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// True while an edit is waiting to be rendered.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Records an edit at `now` and moves the render deadline to
    /// `now + window`.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty = true;
        self.deadline = Some(now + self.window);
    }

    /// Returns true exactly once per dirty period, when the deadline has
    /// passed. A `true` return consumes the dirty flag; the caller must
    /// render.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.dirty = false;
                self.deadline = None;
                true
            }
            Some(_) => false,
            // Dirty without a deadline cannot happen through the public
            // API, but render rather than stall if it does.
            None => {
                self.dirty = false;
                true
            }
        }
    }

    /// Consumes the dirty flag regardless of the deadline. Returns whether
    /// a render is owed.
    pub fn flush(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        self.deadline = None;
        was_dirty
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        RenderScheduler::immediate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_mode_fires_on_same_instant() {
        let mut scheduler = RenderScheduler::immediate();
        let now = Instant::now();

        assert!(!scheduler.poll(now));
        scheduler.mark_dirty(now);
        assert!(scheduler.is_dirty());
        assert!(scheduler.poll(now));
        assert!(!scheduler.is_dirty());
        assert!(!scheduler.poll(now));
    }

    #[test]
    fn test_debounce_waits_for_quiet_window() {
        let mut scheduler = RenderScheduler::debounced(Duration::from_millis(300));
        let start = Instant::now();

        scheduler.mark_dirty(start);
        assert!(!scheduler.poll(start));
        assert!(!scheduler.poll(start + Duration::from_millis(299)));
        assert!(scheduler.poll(start + Duration::from_millis(300)));
    }

    #[test]
    fn test_each_edit_pushes_deadline_back() {
        let mut scheduler = RenderScheduler::debounced(Duration::from_millis(100));
        let start = Instant::now();

        scheduler.mark_dirty(start);
        scheduler.mark_dirty(start + Duration::from_millis(80));
        scheduler.mark_dirty(start + Duration::from_millis(160));

        // First deadline has long passed, but the latest edit moved it.
        assert!(!scheduler.poll(start + Duration::from_millis(200)));
        assert!(scheduler.poll(start + Duration::from_millis(260)));
    }

    #[test]
    fn test_burst_of_edits_renders_once() {
        let mut scheduler = RenderScheduler::debounced(Duration::from_millis(50));
        let start = Instant::now();

        for i in 0..10 {
            scheduler.mark_dirty(start + Duration::from_millis(i));
        }

        let mut renders = 0;
        for i in 0..200 {
            if scheduler.poll(start + Duration::from_millis(i)) {
                renders += 1;
            }
        }
        assert_eq!(renders, 1);
    }

    #[test]
    fn test_flush_consumes_pending_edit() {
        let mut scheduler = RenderScheduler::debounced(Duration::from_secs(60));
        let now = Instant::now();

        assert!(!scheduler.flush());
        scheduler.mark_dirty(now);
        assert!(scheduler.flush());
        assert!(!scheduler.is_dirty());
        assert!(!scheduler.poll(now + Duration::from_secs(120)));
    }
}
