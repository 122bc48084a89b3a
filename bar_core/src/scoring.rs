use std::{cell::Cell, cell::RefCell, rc::Rc};

/// Boundary through which the scheduler reports scoring adjustments.
///
/// Fire-and-forget: the scheduler never reads the running total back and
/// may call this zero or more times per actor lifecycle.
pub trait ScoringSink {
    fn add_delta(&self, amount: i32);
}

/// Running anxiety total clamped to `0..=max`, the shape the bar's HUD
/// expects.
pub struct AnxietyMeter {
    value: Cell<i32>,
    max: i32,
}

impl AnxietyMeter {
    pub fn new(max: i32) -> Self {
        AnxietyMeter {
            value: Cell::new(0),
            max,
        }
    }

    pub fn value(&self) -> i32 {
        self.value.get()
    }
}

impl ScoringSink for AnxietyMeter {
    fn add_delta(&self, amount: i32) {
        let next = (self.value.get() + amount).clamp(0, self.max);
        self.value.set(next);
    }
}

/// Sink that records every delta for later inspection.
#[derive(Clone, Default)]
pub struct RecordingSink {
    deltas: Rc<RefCell<Vec<i32>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deltas(&self) -> Vec<i32> {
        self.deltas.borrow().clone()
    }
}

impl ScoringSink for RecordingSink {
    fn add_delta(&self, amount: i32) {
        self.deltas.borrow_mut().push(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_clamps_to_bounds() {
        let meter = AnxietyMeter::new(100);
        meter.add_delta(250);
        assert_eq!(meter.value(), 100);
        meter.add_delta(-500);
        assert_eq!(meter.value(), 0);
        meter.add_delta(5);
        assert_eq!(meter.value(), 5);
    }

    #[test]
    fn recording_sink_keeps_every_delta() {
        let sink = RecordingSink::new();
        sink.add_delta(5);
        sink.add_delta(-2);
        assert_eq!(sink.deltas(), vec![5, -2]);
    }
}
