use std::fmt;

use rand::rngs::SmallRng;
use serde::Serialize;

use crate::carry::CarriedItemProbe;
use crate::config::ErrandConfig;
use crate::destinations::{DestinationPool, SlotId};
use crate::events::EventLog;
use crate::scoring::ScoringSink;
use crate::timer::Countdown;
use crate::types::{turn_toward, Vec3};

/// Stable handle for one spawned NPC.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errand stages, in the order a well-behaved customer walks them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorState {
    NotSpawned,
    MovingToWaitingPoint,
    WaitingForFirstInteraction,
    MovingToRandomDestination,
    WaitingForSecondInteraction,
    ReturningToSpawn,
    Despawned,
}

impl ActorState {
    pub fn label(&self) -> &'static str {
        match self {
            ActorState::NotSpawned => "not_spawned",
            ActorState::MovingToWaitingPoint => "moving_to_waiting_point",
            ActorState::WaitingForFirstInteraction => "waiting_for_first_interaction",
            ActorState::MovingToRandomDestination => "moving_to_random_destination",
            ActorState::WaitingForSecondInteraction => "waiting_for_second_interaction",
            ActorState::ReturningToSpawn => "returning_to_spawn",
            ActorState::Despawned => "despawned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ActorState::Despawned)
    }
}

/// Everything a state transition may touch besides the actor itself. The
/// coordinator owns all of these and lends them out for the duration of one
/// tick, so acquire/release on the pool stay plain sequential calls.
pub(crate) struct TickContext<'a> {
    pub config: &'a ErrandConfig,
    pub pool: &'a mut DestinationPool,
    pub rng: &'a mut SmallRng,
    pub sink: &'a dyn ScoringSink,
    pub probe: &'a dyn CarriedItemProbe,
    pub events: &'a mut EventLog,
}

/// Per-actor record: FSM state plus the resources the actor currently owns
/// (one optional slot, one optional countdown). Mutated exclusively by its
/// own state machine.
#[derive(Debug)]
pub struct ActorRecord {
    id: ActorId,
    state: ActorState,
    position: Vec3,
    yaw: f32,
    assigned_slot: Option<SlotId>,
    can_interact: bool,
    countdown: Option<Countdown>,
}

impl ActorRecord {
    /// Snaps a fresh record to the spawn point and starts it walking.
    pub(crate) fn spawn(id: ActorId, config: &ErrandConfig, events: &mut EventLog) -> Self {
        let position = config.spawn_point;
        let yaw = position.yaw_to(config.waiting_point).unwrap_or(0.0);
        events.push(format!("npc.spawn {id}"));
        events.push(format!(
            "npc.state {id} {}",
            ActorState::MovingToWaitingPoint.label()
        ));
        ActorRecord {
            id,
            state: ActorState::MovingToWaitingPoint,
            position,
            yaw,
            assigned_slot: None,
            can_interact: false,
            countdown: None,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn assigned_slot(&self) -> Option<SlotId> {
        self.assigned_slot
    }

    pub fn can_interact(&self) -> bool {
        self.can_interact
    }

    /// One scheduling tick: movement, arrival checks, and countdown expiry.
    /// Interaction signals are delivered separately (and afterwards) by the
    /// coordinator, so a same-tick arrival+press always reads as "arrived,
    /// then interacted".
    pub(crate) fn tick(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        match self.state {
            ActorState::NotSpawned | ActorState::Despawned => {}
            ActorState::MovingToWaitingPoint => {
                if self.advance_toward(ctx.config.waiting_point, dt, ctx.config) {
                    self.can_interact = true;
                    self.set_state(ActorState::WaitingForFirstInteraction, ctx.events);
                }
            }
            ActorState::WaitingForFirstInteraction => {
                // Parked until a signal arrives.
            }
            ActorState::MovingToRandomDestination => {
                let target = self
                    .assigned_slot
                    .and_then(|slot| ctx.pool.position(slot));
                let Some(target) = target else {
                    return;
                };
                if self.advance_toward(target, dt, ctx.config) {
                    self.can_interact = true;
                    self.countdown = Some(Countdown::start(
                        ctx.config.second_interaction_timeout,
                    ));
                    ctx.events.push(format!(
                        "timer.start {} {:.1}",
                        self.id, ctx.config.second_interaction_timeout
                    ));
                    self.set_state(ActorState::WaitingForSecondInteraction, ctx.events);
                }
            }
            ActorState::WaitingForSecondInteraction => {
                let expired = self
                    .countdown
                    .as_mut()
                    .map(|countdown| countdown.advance(dt))
                    .unwrap_or(false);
                if expired {
                    self.on_timeout(ctx);
                }
            }
            ActorState::ReturningToSpawn => {
                if self.advance_toward(ctx.config.spawn_point, dt, ctx.config) {
                    self.set_state(ActorState::Despawned, ctx.events);
                }
            }
        }
    }

    /// Handles one interaction press aimed at this actor.
    pub(crate) fn interact(&mut self, ctx: &mut TickContext<'_>) {
        if !self.can_interact {
            ctx.events.push(format!("npc.interact.ignored {}", self.id));
            return;
        }
        match self.state {
            ActorState::WaitingForFirstInteraction => {
                match ctx.pool.try_acquire(self.id, ctx.rng) {
                    Some(slot) => {
                        self.assigned_slot = Some(slot);
                        self.can_interact = false;
                        ctx.events.push(format!("pool.acquire {slot} {}", self.id));
                        self.set_state(ActorState::MovingToRandomDestination, ctx.events);
                    }
                    None => {
                        // Every table taken: drop the press and keep waiting.
                        ctx.events.push(format!("pool.full {}", self.id));
                    }
                }
            }
            ActorState::WaitingForSecondInteraction => match ctx.probe.carried_cup() {
                Some(contents) => {
                    self.cancel_countdown(ctx.events);
                    ctx.probe.consume_carried_item();
                    ctx.events.push(format!(
                        "npc.serve {} milk={} sugar={}",
                        self.id, contents.has_milk, contents.has_sugar
                    ));
                    self.release_slot(ctx);
                    self.can_interact = false;
                    self.set_state(ActorState::ReturningToSpawn, ctx.events);
                }
                None => {
                    // Keep the countdown running and stay interactable.
                    ctx.events
                        .push(format!("npc.interact.empty_handed {}", self.id));
                }
            },
            _ => {
                ctx.events.push(format!("npc.interact.ignored {}", self.id));
            }
        }
    }

    /// Forced teardown from any state: the countdown is cancelled and a
    /// held slot returned before the record goes terminal.
    pub(crate) fn force_despawn(&mut self, ctx: &mut TickContext<'_>) {
        self.cancel_countdown(ctx.events);
        self.release_slot(ctx);
        self.can_interact = false;
        ctx.events.push(format!("npc.despawn.forced {}", self.id));
        self.set_state(ActorState::Despawned, ctx.events);
    }

    fn on_timeout(&mut self, ctx: &mut TickContext<'_>) {
        ctx.events.push(format!("timer.expired {}", self.id));
        // Slot back first, then the penalty; the countdown already went
        // inert by firing, so nothing here can fire it again.
        self.release_slot(ctx);
        self.countdown = None;
        ctx.sink.add_delta(ctx.config.timeout_penalty);
        ctx.events.push(format!(
            "score.delta {} {}",
            self.id, ctx.config.timeout_penalty
        ));
        self.can_interact = false;
        self.set_state(ActorState::ReturningToSpawn, ctx.events);
    }

    /// Steps toward `target` by `move_speed * dt` (never overshooting) and
    /// turns the heading at the configured rate. Returns true once the
    /// remaining distance drops below the arrival epsilon.
    fn advance_toward(&mut self, target: Vec3, dt: f32, config: &ErrandConfig) -> bool {
        let distance = self.position.distance(target);
        if distance < config.arrival_epsilon {
            return true;
        }
        if let Some(direction) = self.position.direction_to(target) {
            let step = (config.move_speed * dt).min(distance);
            self.position.x += direction.x * step;
            self.position.y += direction.y * step;
            self.position.z += direction.z * step;
            if let Some(heading) = self.position.yaw_to(target) {
                self.yaw = turn_toward(self.yaw, heading, config.rotation_speed * dt);
            }
        }
        self.position.distance(target) < config.arrival_epsilon
    }

    fn set_state(&mut self, next: ActorState, events: &mut EventLog) {
        self.state = next;
        events.push(format!("npc.state {} {}", self.id, next.label()));
    }

    fn cancel_countdown(&mut self, events: &mut EventLog) {
        if let Some(countdown) = self.countdown.as_mut() {
            if !countdown.has_fired() && !countdown.is_cancelled() {
                countdown.cancel();
                events.push(format!("timer.cancel {}", self.id));
            }
        }
        self.countdown = None;
    }

    fn release_slot(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(slot) = self.assigned_slot.take() {
            ctx.pool.release(slot, self.id);
            ctx.events.push(format!("pool.release {slot} {}", self.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carry::HandHeldCup;
    use crate::destinations::DestinationPool;
    use crate::scoring::RecordingSink;
    use rand::SeedableRng;

    struct Harness {
        config: ErrandConfig,
        pool: DestinationPool,
        rng: SmallRng,
        sink: RecordingSink,
        hand: HandHeldCup,
        events: EventLog,
    }

    impl Harness {
        fn new() -> Self {
            let config = ErrandConfig::default();
            let pool = DestinationPool::from_specs(&config.destinations);
            Harness {
                config,
                pool,
                rng: SmallRng::seed_from_u64(11),
                sink: RecordingSink::new(),
                hand: HandHeldCup::new(),
                events: EventLog::new(),
            }
        }

        fn ctx(&mut self) -> TickContext<'_> {
            TickContext {
                config: &self.config,
                pool: &mut self.pool,
                rng: &mut self.rng,
                sink: &self.sink,
                probe: &self.hand,
                events: &mut self.events,
            }
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn tick_until(
        actor: &mut ActorRecord,
        harness: &mut Harness,
        state: ActorState,
        max_ticks: u32,
    ) {
        for _ in 0..max_ticks {
            if actor.state() == state {
                return;
            }
            actor.tick(DT, &mut harness.ctx());
        }
        panic!(
            "actor never reached {:?} (stuck in {:?})",
            state,
            actor.state()
        );
    }

    #[test]
    fn walks_to_waiting_point_and_becomes_eligible() {
        let mut harness = Harness::new();
        let mut actor = ActorRecord::spawn(ActorId(1), &harness.config, &mut harness.events);
        assert_eq!(actor.state(), ActorState::MovingToWaitingPoint);
        assert!(!actor.can_interact());

        tick_until(
            &mut actor,
            &mut harness,
            ActorState::WaitingForFirstInteraction,
            2_000,
        );
        assert!(actor.can_interact());
        let distance = actor.position().distance(harness.config.waiting_point);
        assert!(distance < harness.config.arrival_epsilon);
    }

    #[test]
    fn arrival_epsilon_is_respected_mid_walk() {
        let mut harness = Harness::new();
        let mut actor = ActorRecord::spawn(ActorId(1), &harness.config, &mut harness.events);
        // One tick moves 3.0/60 = 0.05 units; the spawn point is 8 units
        // out, so the actor must still be travelling.
        actor.tick(DT, &mut harness.ctx());
        assert_eq!(actor.state(), ActorState::MovingToWaitingPoint);
    }

    #[test]
    fn first_interaction_acquires_a_slot() {
        let mut harness = Harness::new();
        let mut actor = ActorRecord::spawn(ActorId(1), &harness.config, &mut harness.events);
        tick_until(
            &mut actor,
            &mut harness,
            ActorState::WaitingForFirstInteraction,
            2_000,
        );

        actor.interact(&mut harness.ctx());
        assert_eq!(actor.state(), ActorState::MovingToRandomDestination);
        let slot = actor.assigned_slot().expect("slot assigned");
        assert_eq!(harness.pool.occupant(slot), Some(ActorId(1)));
    }

    #[test]
    fn first_interaction_with_full_pool_drops_the_press() {
        let mut harness = Harness::new();
        // Saturate the pool with phantom holders.
        for holder in 10..13 {
            harness
                .pool
                .try_acquire(ActorId(holder), &mut harness.rng)
                .expect("free slot");
        }
        let mut actor = ActorRecord::spawn(ActorId(1), &harness.config, &mut harness.events);
        tick_until(
            &mut actor,
            &mut harness,
            ActorState::WaitingForFirstInteraction,
            2_000,
        );

        actor.interact(&mut harness.ctx());
        assert_eq!(actor.state(), ActorState::WaitingForFirstInteraction);
        assert!(actor.can_interact(), "press is dropped, eligibility stays");
        assert!(actor.assigned_slot().is_none());
    }

    #[test]
    fn ineligible_press_is_ignored() {
        let mut harness = Harness::new();
        let mut actor = ActorRecord::spawn(ActorId(1), &harness.config, &mut harness.events);
        actor.interact(&mut harness.ctx());
        assert_eq!(actor.state(), ActorState::MovingToWaitingPoint);
        assert_eq!(harness.events.count_matching("npc.interact.ignored"), 1);
    }

    #[test]
    fn empty_handed_second_interaction_keeps_countdown_running() {
        let mut harness = Harness::new();
        let mut actor = ActorRecord::spawn(ActorId(1), &harness.config, &mut harness.events);
        tick_until(
            &mut actor,
            &mut harness,
            ActorState::WaitingForFirstInteraction,
            2_000,
        );
        actor.interact(&mut harness.ctx());
        tick_until(
            &mut actor,
            &mut harness,
            ActorState::WaitingForSecondInteraction,
            2_000,
        );

        actor.interact(&mut harness.ctx());
        assert_eq!(actor.state(), ActorState::WaitingForSecondInteraction);
        assert!(actor.can_interact());

        // The countdown kept running and eventually lands the penalty.
        for _ in 0..((harness.config.second_interaction_timeout / DT) as u32 + 2) {
            actor.tick(DT, &mut harness.ctx());
        }
        assert_eq!(actor.state(), ActorState::ReturningToSpawn);
        assert_eq!(harness.sink.deltas(), vec![harness.config.timeout_penalty]);
    }
}
