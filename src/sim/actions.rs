//! Handlers for user intents — plant, water, harvest, purchase, new game.
//!
//! Each handler applies one event type to the farm and turns the outcome
//! into player feedback. Recoverable failures (occupied plot, not enough
//! coins) become toasts; caller bugs (bad index, unknown crop) are logged.

use bevy::prelude::*;

use crate::shared::*;

/// Turn a farm error into the toast text the player sees. `None` means the
/// error is a caller bug that should be logged instead of shown.
fn toast_text(err: &FarmError) -> Option<String> {
    match err {
        FarmError::PlotOccupied => Some("Este terreno já está ocupado.".to_string()),
        FarmError::InsufficientFunds { needed, .. } => {
            Some(format!("Você não tem dinheiro suficiente ({needed}c)."))
        }
        FarmError::UnknownCrop(_) | FarmError::IndexOutOfRange { .. } => None,
    }
}

pub fn handle_plant_requests(
    mut plant_events: EventReader<PlantCropEvent>,
    mut farm: ResMut<Farm>,
    registry: Res<CropRegistry>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for event in plant_events.read() {
        match farm.plant_at(event.index, &event.crop_id, &registry) {
            Ok(()) => {
                info!(
                    "[Sim] Planted {} on plot {}. Coins left: {}",
                    event.crop_id, event.index, farm.coins
                );
            }
            Err(err) => match toast_text(&err) {
                Some(message) => {
                    toasts.send(ToastEvent {
                        message,
                        duration_secs: 2.5,
                    });
                }
                None => warn!("[Sim] Rejected plant request {:?}: {}", event, err),
            },
        }
    }
}

pub fn handle_water_requests(
    mut water_events: EventReader<WaterPlotEvent>,
    mut water_all_events: EventReader<WaterAllEvent>,
    mut farm: ResMut<Farm>,
) {
    for event in water_events.read() {
        if let Err(err) = farm.water_at(event.index) {
            warn!("[Sim] Rejected water request {:?}: {}", event, err);
        }
    }
    for _ in water_all_events.read() {
        let watered = farm.water_all();
        info!("[Sim] Watered {} plots", watered);
    }
}

pub fn handle_harvest_requests(
    mut harvest_events: EventReader<HarvestPlotEvent>,
    mut harvest_all_events: EventReader<HarvestAllEvent>,
    mut farm: ResMut<Farm>,
    registry: Res<CropRegistry>,
    mut toasts: EventWriter<ToastEvent>,
) {
    let mut rng = rand::thread_rng();

    for event in harvest_events.read() {
        match farm.harvest_at(event.index, &registry, &mut rng) {
            Ok(Some(harvest)) => {
                toasts.send(ToastEvent {
                    message: format!("+{}c ({})", harvest.coins, harvest.crop),
                    duration_secs: 2.0,
                });
            }
            Ok(None) => {
                // Not ready, or an infected plot failed its roll. Either way
                // a normal outcome — tell the player, change nothing.
                toasts.send(ToastEvent {
                    message: "A colheita falhou.".to_string(),
                    duration_secs: 2.0,
                });
            }
            Err(err) => warn!("[Sim] Rejected harvest request {:?}: {}", event, err),
        }
    }

    for _ in harvest_all_events.read() {
        let summary = farm.harvest_all(&registry, &mut rng);
        if summary.plots == 0 {
            toasts.send(ToastEvent {
                message: "Nenhuma planta está pronta ainda.".to_string(),
                duration_secs: 2.5,
            });
        } else {
            toasts.send(ToastEvent {
                message: format!("Colheu {} plantas: +{}c", summary.plots, summary.coins),
                duration_secs: 2.5,
            });
        }
    }
}

pub fn handle_new_game(
    mut new_game_events: EventReader<NewGameEvent>,
    mut farm: ResMut<Farm>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for _ in new_game_events.read() {
        *farm = Farm::default();
        info!("[Sim] New game started");
        toasts.send(ToastEvent {
            message: "Nova fazenda iniciada.".to_string(),
            duration_secs: 2.5,
        });
    }
}
