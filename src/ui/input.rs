//! Input translation — clicks and keys become user-intent events.
//!
//! With a crop armed, clicking a plot plants it; otherwise a mature plot
//! gets a harvest attempt and anything else planted gets a splash of
//! water.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::shared::*;

use super::render::tile_index_at;

/// The crop the player armed for planting (keys 1/2/3). Cleared by the
/// next plot click.
#[derive(Resource, Debug, Default)]
pub struct SelectedCrop(pub Option<CropId>);

pub fn keyboard_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut selected: ResMut<SelectedCrop>,
    mut water_all: EventWriter<WaterAllEvent>,
    mut harvest_all: EventWriter<HarvestAllEvent>,
    mut save_requests: EventWriter<SaveRequestEvent>,
    mut new_game: EventWriter<NewGameEvent>,
    mut next_state: ResMut<NextState<GameState>>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for (key, crop_id) in [
        (KeyCode::Digit1, "cenoura"),
        (KeyCode::Digit2, "milho"),
        (KeyCode::Digit3, "batata"),
    ] {
        if keys.just_pressed(key) {
            selected.0 = Some(crop_id.to_string());
            toasts.send(ToastEvent {
                message: format!("Selecione um terreno para plantar {}.", crop_id),
                duration_secs: 2.0,
            });
        }
    }

    if keys.just_pressed(KeyCode::KeyA) {
        water_all.send(WaterAllEvent);
    }
    if keys.just_pressed(KeyCode::KeyC) {
        harvest_all.send(HarvestAllEvent);
    }
    if keys.just_pressed(KeyCode::KeyB) {
        next_state.set(GameState::Shop);
    }
    if keys.just_pressed(KeyCode::F5) {
        save_requests.send(SaveRequestEvent);
    }
    if keys.just_pressed(KeyCode::F2) {
        new_game.send(NewGameEvent);
    }
}

pub fn plot_click_input(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    farm: Res<Farm>,
    registry: Res<CropRegistry>,
    mut selected: ResMut<SelectedCrop>,
    mut plant_events: EventWriter<PlantCropEvent>,
    mut water_events: EventWriter<WaterPlotEvent>,
    mut harvest_events: EventWriter<HarvestPlotEvent>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };
    let Some(index) = tile_index_at(world_pos, farm.rows(), farm.cols()) else {
        return;
    };

    if let Some(crop_id) = selected.0.take() {
        plant_events.send(PlantCropEvent { index, crop_id });
        return;
    }

    let Some(plot) = farm.plot(index) else {
        return;
    };
    if plot.is_fallow() {
        return;
    }
    // Mature plots (even infected ones) get a harvest attempt; the rest get
    // watered.
    if farm.is_mature(index, &registry) {
        harvest_events.send(HarvestPlotEvent { index });
    } else {
        water_events.send(WaterPlotEvent { index });
    }
}
