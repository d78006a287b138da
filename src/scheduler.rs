//! Fixed-period playback driver.
//!
//! [`Scheduler`] turns clock polls into a number of due steps, so the host's
//! render loop (or a test with a synthetic clock) decides when time passes.
//! It never sleeps and never spawns a thread.

use std::time::{Duration, Instant};

/// Decides how many steps are due each time the host polls.
///
/// Semantics follow an interval timer: after a resume the first step comes
/// one full period later, and pausing discards the pending tick. Only the
/// pending tick is ever lost; steps that already ran are untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    period: Duration,
    playing: bool,
    next_due: Option<Instant>,
}

impl Scheduler {
    /// Creates a paused scheduler firing every `period`.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "Scheduler period must be non-zero.");
        Self {
            period,
            playing: false,
            next_due: None,
        }
    }

    /// Starts or stops playback. Stopping discards the pending tick, so a
    /// later resume always waits a full period before its first step.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        if !playing {
            self.next_due = None;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns how many steps are due at `now`.
    ///
    /// While paused this returns zero and changes nothing. The first poll
    /// after a resume arms the timer one period ahead and returns zero. A
    /// late poll catches up: one step per whole period elapsed since the
    /// last due time.
    pub fn poll(&mut self, now: Instant) -> usize {
        if !self.playing {
            return 0;
        }
        let mut due = match self.next_due {
            Some(due) => due,
            None => {
                self.next_due = Some(now + self.period);
                return 0;
            }
        };
        let mut n = 0;
        while due <= now {
            n += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        n
    }
}
