//! Behaviour scheduler for the bar's customers.
//!
//! The crate drives one NPC through a multi-stage errand: spawn, walk to
//! the waiting point, wait for a first interaction, walk to a free table,
//! wait (with a timeout) to be served, then return to spawn and despawn.
//! Everything advances on one cooperative per-frame tick — no threads, no
//! locks — and the collaborators the scheduler cannot own (scoring, the
//! coffee subsystem) come in as narrow trait boundaries.

pub mod actor;
pub mod carry;
pub mod config;
pub mod coordinator;
pub mod destinations;
pub mod error;
pub mod events;
pub mod scoring;
pub mod timer;
pub mod types;

pub use actor::{ActorId, ActorState};
pub use carry::{CarriedItemProbe, CupContents, HandHeldCup};
pub use config::{DestinationSpec, ErrandConfig};
pub use coordinator::{ErrandCoordinator, InteractionSignal};
pub use destinations::{DestinationPool, DestinationSlot, SlotId};
pub use error::ConfigError;
pub use events::EventLog;
pub use scoring::{AnxietyMeter, RecordingSink, ScoringSink};
pub use timer::Countdown;
pub use types::Vec3;
