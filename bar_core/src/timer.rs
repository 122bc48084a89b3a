use serde::Serialize;

/// Cancellable countdown polled once per scheduling tick.
///
/// The countdown only advances while `advance` is called, so pausing the
/// scheduler pauses every outstanding timer. Expiry is reported as the
/// return value of `advance` — exactly once, on the tick the deadline
/// passes — never as an asynchronous callback. Once `cancel` returns the
/// countdown can never fire, even if the deadline was about to lapse.
#[derive(Debug, Clone, Serialize)]
pub struct Countdown {
    remaining: f32,
    cancelled: bool,
    fired: bool,
}

impl Countdown {
    pub fn start(duration: f32) -> Self {
        Countdown {
            remaining: duration,
            cancelled: false,
            fired: false,
        }
    }

    /// Advances the countdown by `dt` seconds. Returns `true` on the single
    /// tick where the countdown naturally expires; `false` forever after,
    /// and always `false` once cancelled.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.cancelled || self.fired {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.fired = true;
            return true;
        }
        false
    }

    /// Stops the countdown. Safe to call repeatedly or after firing.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::Countdown;

    #[test]
    fn fires_exactly_once_at_deadline() {
        let mut countdown = Countdown::start(1.0);
        assert!(!countdown.advance(0.5));
        assert!(countdown.advance(0.5));
        assert!(countdown.has_fired());
        // Ticking past the deadline never produces a second edge.
        assert!(!countdown.advance(10.0));
    }

    #[test]
    fn cancel_before_deadline_suppresses_fire() {
        let mut countdown = Countdown::start(1.0);
        assert!(!countdown.advance(0.9));
        countdown.cancel();
        assert!(!countdown.advance(0.2));
        assert!(!countdown.has_fired());
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let mut countdown = Countdown::start(0.1);
        assert!(countdown.advance(0.2));
        countdown.cancel();
        countdown.cancel();
        assert!(countdown.has_fired());
        assert!(countdown.is_cancelled());
    }

    #[test]
    fn countdown_holds_still_between_ticks() {
        let mut countdown = Countdown::start(2.0);
        countdown.advance(0.5);
        let before = countdown.remaining();
        // No advance call, no progress.
        assert!((countdown.remaining() - before).abs() < f32::EPSILON);
        countdown.advance(0.5);
        assert!((countdown.remaining() - 1.0).abs() < 1e-5);
    }
}
