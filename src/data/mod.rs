//! Data layer — populates the crop registry at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the CropRegistry
//! from the hard-coded game-design data in `crops`, then transitions the
//! game into GameState::Playing. No other domain needs to seed the
//! registry, and every domain can safely read it once GameState has
//! advanced past Loading.

pub mod crops;

use bevy::prelude::*;

use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates the registry and then transitions to
/// Playing. The save plugin restores the farm earlier, during Startup, so
/// by the first Playing frame both registry and farm are in place.
fn load_all_data(
    mut crop_registry: ResMut<CropRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    crops::populate_crops(&mut crop_registry);
    info!("  Crops loaded: {}", crop_registry.crops.len());

    info!("DataPlugin: registry populated. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}
