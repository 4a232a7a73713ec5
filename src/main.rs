mod data;
mod economy;
mod save;
mod shared;
mod sim;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Fazendinha".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<Farm>()
        .init_resource::<CropRegistry>()
        // The persistence port: where snapshots live for this process.
        .insert_resource(save::SaveSettings::default())
        // Events
        .add_event::<PlantCropEvent>()
        .add_event::<WaterPlotEvent>()
        .add_event::<WaterAllEvent>()
        .add_event::<HarvestPlotEvent>()
        .add_event::<HarvestAllEvent>()
        .add_event::<BuyAutomationEvent>()
        .add_event::<TickCompletedEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        .add_event::<NewGameEvent>()
        .add_event::<ToastEvent>()
        // Domain plugins
        .add_plugins(data::DataPlugin)
        .add_plugins(sim::SimPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(save::SavePlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
