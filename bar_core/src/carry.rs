use std::{cell::RefCell, rc::Rc};

use serde::Serialize;

/// What the coffee subsystem reports about a held cup. The scheduler only
/// cares that a cup exists; the composition rides along for logging.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CupContents {
    pub has_milk: bool,
    pub has_sugar: bool,
}

/// Boundary into the coffee subsystem: "is the player carrying a drink, and
/// of what composition". The scheduler decides the second-interaction
/// outcome from this alone.
pub trait CarriedItemProbe {
    fn carried_cup(&self) -> Option<CupContents>;

    /// Hands the drink over. Called only after `carried_cup` returned
    /// `Some`; consuming an empty hand is a no-op.
    fn consume_carried_item(&self);
}

/// Shared handle onto the single cup the player can hold.
#[derive(Clone, Default)]
pub struct HandHeldCup {
    cup: Rc<RefCell<Option<CupContents>>>,
}

impl HandHeldCup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&self, contents: CupContents) {
        *self.cup.borrow_mut() = Some(contents);
    }

    pub fn drop_cup(&self) {
        *self.cup.borrow_mut() = None;
    }
}

impl CarriedItemProbe for HandHeldCup {
    fn carried_cup(&self) -> Option<CupContents> {
        *self.cup.borrow()
    }

    fn consume_carried_item(&self) {
        *self.cup.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_clears_the_cup() {
        let hand = HandHeldCup::new();
        assert!(hand.carried_cup().is_none());
        hand.hold(CupContents {
            has_milk: true,
            has_sugar: false,
        });
        assert!(hand.carried_cup().is_some());
        hand.consume_carried_item();
        assert!(hand.carried_cup().is_none());
        // Consuming again stays a no-op.
        hand.consume_carried_item();
        assert!(hand.carried_cup().is_none());
    }
}
