//! Simulation domain — the tick engine and the user-action handlers.
//!
//! A repeating timer drives `advance_tick` once per interval; user intents
//! arrive as events and are applied between ticks. Both paths take the Farm
//! resource mutably, so the Bevy schedule guarantees they never overlap.

use bevy::prelude::*;

use crate::shared::*;

mod actions;
mod automation;
mod tick;

pub use automation::{run_automation, AutomationReport};
pub use tick::{advance_tick, TickOutcome};

/// Repeating timer that fires one simulation tick per interval.
#[derive(Resource, Debug)]
pub struct TickTimer(pub Timer);

impl Default for TickTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(TICK_INTERVAL_SECS, TimerMode::Repeating))
    }
}

pub struct SimPlugin;

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TickTimer>()
            // The tick keeps running while the shop overlay is open — idle
            // progress is the point of the game.
            .add_systems(
                Update,
                (
                    run_simulation,
                    actions::handle_plant_requests,
                    actions::handle_water_requests,
                    actions::handle_harvest_requests,
                    actions::handle_new_game,
                )
                    .run_if(in_state(GameState::Playing).or(in_state(GameState::Shop))),
            );
    }
}

/// Drives the tick timer. A long frame can owe several ticks; each one is
/// applied as its own complete `advance_tick` call.
fn run_simulation(
    time: Res<Time>,
    mut timer: ResMut<TickTimer>,
    mut farm: ResMut<Farm>,
    registry: Res<CropRegistry>,
    mut completed: EventWriter<TickCompletedEvent>,
) {
    timer.0.tick(time.delta());

    let mut rng = rand::thread_rng();
    for _ in 0..timer.0.times_finished_this_tick() {
        let outcome = advance_tick(&mut farm, &registry, &mut rng);

        if outcome.infections > 0 {
            info!(
                "[Sim] Tick {}: {} plot(s) newly infected",
                outcome.tick, outcome.infections
            );
        }
        if outcome.auto_harvested > 0 {
            info!(
                "[Sim] Tick {}: automation harvested {} plot(s) for {}c",
                outcome.tick, outcome.auto_harvested, outcome.income
            );
        }

        completed.send(TickCompletedEvent {
            tick: outcome.tick,
            infections: outcome.infections,
            watered: outcome.watered,
            auto_planted: outcome.auto_planted,
            auto_harvested: outcome.auto_harvested,
            income: outcome.income,
        });
    }
}
