use std::fs;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use bar_core::{
    ActorState, AnxietyMeter, CupContents, ErrandConfig, ErrandCoordinator, HandHeldCup,
    InteractionSignal,
};
use serde::Serialize;

use crate::cli::Args;

const TICK_SECONDS: f32 = 1.0 / 60.0;
const ANXIETY_CAP: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScenarioSlug {
    /// Hand over a finished drink before the countdown lapses.
    Served,
    /// Let the customer wait unserved until the countdown fires.
    Timeout,
    /// Force-despawn the customer mid-wait.
    Abort,
}

impl ScenarioSlug {
    fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "served" => Some(ScenarioSlug::Served),
            "timeout" => Some(ScenarioSlug::Timeout),
            "abort" => Some(ScenarioSlug::Abort),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ScenarioSlug::Served => "served",
            ScenarioSlug::Timeout => "timeout",
            ScenarioSlug::Abort => "abort",
        }
    }
}

#[derive(Clone)]
pub struct ScenarioOptions {
    slug: ScenarioSlug,
}

impl ScenarioOptions {
    pub fn parse(value: &str) -> Result<Self> {
        let slug = ScenarioSlug::from_str(value)
            .ok_or_else(|| anyhow!("unknown scenario: {} (try served, timeout, abort)", value))?;
        Ok(Self { slug })
    }
}

#[derive(Serialize)]
struct TraceSample {
    tick: u32,
    state: ActorState,
    position: [f32; 3],
    yaw: f32,
}

#[derive(Serialize)]
struct EventLogManifest<'a> {
    scenario: &'static str,
    anxiety: i32,
    events: &'a [String],
}

pub fn execute(args: Args) -> Result<()> {
    let options = ScenarioOptions::parse(&args.scenario)?;

    let config = match args.config.as_ref() {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("reading errand config from {}", path.display()))?;
            serde_json::from_str::<ErrandConfig>(&data)
                .with_context(|| format!("parsing errand config from {}", path.display()))?
        }
        None => ErrandConfig::default(),
    };

    let meter = Rc::new(AnxietyMeter::new(ANXIETY_CAP));
    let hand = HandHeldCup::new();
    let mut coordinator = ErrandCoordinator::new(
        config,
        args.seed,
        meter.clone(),
        Rc::new(hand.clone()),
    )
    .context("starting errand scenario")?;

    let id = coordinator
        .spawn()
        .ok_or_else(|| anyhow!("coordinator refused the opening spawn"))?;

    let mut samples: Vec<TraceSample> = Vec::new();
    let mut first_press_sent = false;
    let mut second_action_done = false;

    let mut tick: u32 = 0;
    while coordinator.active_actor().is_some() {
        tick += 1;
        if tick > args.max_ticks {
            bail!("scenario did not finish within {} ticks", args.max_ticks);
        }

        coordinator.tick(TICK_SECONDS);

        match coordinator.actor_state(id) {
            Some(ActorState::WaitingForFirstInteraction) if !first_press_sent => {
                first_press_sent = true;
                coordinator.queue_interaction(InteractionSignal::broadcast());
            }
            Some(ActorState::WaitingForSecondInteraction) if !second_action_done => {
                second_action_done = true;
                match options.slug {
                    ScenarioSlug::Served => {
                        hand.hold(CupContents {
                            has_milk: true,
                            has_sugar: true,
                        });
                        coordinator.queue_interaction(InteractionSignal::broadcast());
                    }
                    ScenarioSlug::Timeout => {}
                    ScenarioSlug::Abort => coordinator.despawn(id),
                }
            }
            _ => {}
        }

        if let (Some(state), Some(position), Some(yaw)) = (
            coordinator.actor_state(id),
            coordinator.actor_position(id),
            coordinator.actor_yaw(id),
        ) {
            samples.push(TraceSample {
                tick,
                state,
                position: [position.x, position.y, position.z],
                yaw,
            });
        }
    }

    println!(
        "Scenario '{}' finished after {} ticks (anxiety: {})",
        options.slug.label(),
        tick,
        meter.value()
    );

    if let Some(path) = args.trace_log_json.as_ref() {
        let json =
            serde_json::to_string_pretty(&samples).context("serializing trace log to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing trace log to {}", path.display()))?;
        println!("Saved trace log to {}", path.display());
    }

    if let Some(path) = args.event_log_json.as_ref() {
        let manifest = EventLogManifest {
            scenario: options.slug.label(),
            anxiety: meter.value(),
            events: coordinator.events(),
        };
        let json =
            serde_json::to_string_pretty(&manifest).context("serializing event log to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing event log to {}", path.display()))?;
        println!("Saved event log to {}", path.display());
    }

    Ok(())
}
