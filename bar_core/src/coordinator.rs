use std::collections::VecDeque;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::actor::{ActorId, ActorRecord, ActorState, TickContext};
use crate::carry::CarriedItemProbe;
use crate::config::ErrandConfig;
use crate::destinations::DestinationPool;
use crate::error::ConfigError;
use crate::events::EventLog;
use crate::scoring::ScoringSink;
use crate::types::Vec3;

/// One "interact now" press from the input layer, consumed once. `target`
/// pins the press to a specific actor; `None` routes it to whichever actor
/// is active (with the single-actor policy those are the same thing —
/// nearest-actor scoping by radius lives in the input layer).
#[derive(Debug, Default, Copy, Clone)]
pub struct InteractionSignal {
    pub target: Option<ActorId>,
}

impl InteractionSignal {
    pub fn broadcast() -> Self {
        Self::default()
    }

    pub fn aimed_at(target: ActorId) -> Self {
        InteractionSignal {
            target: Some(target),
        }
    }
}

/// Owns the scenario: destination pool, RNG, event log, and at most one
/// live actor. The per-actor ownership model would carry several actors,
/// but the shipped policy is one at a time, so spawn requests while an
/// errand is running are refused.
///
/// External collaborators come in at construction time and are handed to
/// the actor on every tick — the actor never does ambient lookups.
pub struct ErrandCoordinator {
    config: ErrandConfig,
    pool: DestinationPool,
    rng: SmallRng,
    events: EventLog,
    sink: Rc<dyn ScoringSink>,
    probe: Rc<dyn CarriedItemProbe>,
    active: Option<ActorRecord>,
    pending_signals: VecDeque<InteractionSignal>,
    next_actor_id: u32,
}

impl ErrandCoordinator {
    pub fn new(
        config: ErrandConfig,
        seed: u64,
        sink: Rc<dyn ScoringSink>,
        probe: Rc<dyn CarriedItemProbe>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = DestinationPool::from_specs(&config.destinations);
        Ok(ErrandCoordinator {
            config,
            pool,
            rng: SmallRng::seed_from_u64(seed),
            events: EventLog::new(),
            sink,
            probe,
            active: None,
            pending_signals: VecDeque::new(),
            next_actor_id: 1,
        })
    }

    /// Starts a new errand. Refused (with a logged warning) while another
    /// actor is still live.
    pub fn spawn(&mut self) -> Option<ActorId> {
        if let Some(actor) = self.active.as_ref() {
            if !actor.state().is_terminal() {
                self.events.push(format!("npc.spawn.blocked {}", actor.id()));
                return None;
            }
            // A terminal record that has not been reclaimed yet just needs
            // dropping before the next customer walks in.
            self.reclaim();
        }
        let id = ActorId(self.next_actor_id);
        self.next_actor_id += 1;
        let record = ActorRecord::spawn(id, &self.config, &mut self.events);
        self.active = Some(record);
        Some(id)
    }

    /// Force-destroys `id`, running the full cleanup path (countdown
    /// cancelled, slot released) regardless of errand stage.
    pub fn despawn(&mut self, id: ActorId) {
        let Some(actor) = self.active.as_mut() else {
            return;
        };
        if actor.id() != id {
            return;
        }
        let mut ctx = TickContext {
            config: &self.config,
            pool: &mut self.pool,
            rng: &mut self.rng,
            sink: self.sink.as_ref(),
            probe: self.probe.as_ref(),
            events: &mut self.events,
        };
        actor.force_despawn(&mut ctx);
        self.reclaim();
    }

    /// Buffers a press for delivery on the next `tick`. Signals queued
    /// while no actor is live are consumed without effect.
    pub fn queue_interaction(&mut self, signal: InteractionSignal) {
        self.pending_signals.push_back(signal);
    }

    /// One scheduling tick: the active actor advances (movement, arrival,
    /// countdown) first, then queued presses are delivered in order, so a
    /// same-tick arrival+press resolves as "arrived, then interacted".
    pub fn tick(&mut self, dt: f32) {
        if let Some(actor) = self.active.as_mut() {
            let mut ctx = TickContext {
                config: &self.config,
                pool: &mut self.pool,
                rng: &mut self.rng,
                sink: self.sink.as_ref(),
                probe: self.probe.as_ref(),
                events: &mut self.events,
            };
            actor.tick(dt, &mut ctx);
            while let Some(signal) = self.pending_signals.pop_front() {
                if actor.state().is_terminal() {
                    break;
                }
                match signal.target {
                    Some(target) if target != actor.id() => {
                        ctx.events.push(format!("signal.dropped {target}"));
                    }
                    _ => actor.interact(&mut ctx),
                }
            }
        } else {
            self.pending_signals.clear();
        }
        self.reclaim();
    }

    /// Drops the active record once it has gone terminal, freeing the
    /// single-actor policy for the next spawn.
    fn reclaim(&mut self) {
        let terminal = self
            .active
            .as_ref()
            .map(|actor| actor.state().is_terminal())
            .unwrap_or(false);
        if terminal {
            if let Some(actor) = self.active.take() {
                self.events.push(format!("npc.reclaim {}", actor.id()));
            }
            self.pending_signals.clear();
        }
    }

    pub fn active_actor(&self) -> Option<ActorId> {
        self.active.as_ref().map(|actor| actor.id())
    }

    pub fn actor_state(&self, id: ActorId) -> Option<ActorState> {
        self.active
            .as_ref()
            .filter(|actor| actor.id() == id)
            .map(|actor| actor.state())
    }

    pub fn actor_position(&self, id: ActorId) -> Option<Vec3> {
        self.active
            .as_ref()
            .filter(|actor| actor.id() == id)
            .map(|actor| actor.position())
    }

    pub fn actor_yaw(&self, id: ActorId) -> Option<f32> {
        self.active
            .as_ref()
            .filter(|actor| actor.id() == id)
            .map(|actor| actor.yaw())
    }

    pub fn config(&self) -> &ErrandConfig {
        &self.config
    }

    pub fn pool(&self) -> &DestinationPool {
        &self.pool
    }

    pub fn events(&self) -> &[String] {
        self.events.entries()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.events
    }
}
