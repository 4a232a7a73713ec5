//! Presentation shell — grid rendering, HUD, toasts, shop overlay, input.
//!
//! Everything here is replaceable chrome: it reads the farm through the
//! RNG-free display accessors and writes to it only by sending the shared
//! user-intent events.

mod hud;
mod input;
pub mod render;
mod shop;
mod toast;

use bevy::prelude::*;

use crate::shared::*;

pub use input::SelectedCrop;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedCrop>();

        // ─── TOASTS — container lives for the whole session ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(
            Update,
            (
                toast::handle_toast_events,
                toast::update_toasts,
                toast::wire_save_toasts,
            ),
        );

        // ─── GRID + HUD — visible during Playing ───
        app.add_systems(
            OnEnter(GameState::Playing),
            (render::spawn_grid, hud::spawn_hud),
        );
        app.add_systems(
            OnExit(GameState::Playing),
            (render::despawn_grid, hud::despawn_hud),
        );
        app.add_systems(
            Update,
            (
                render::sync_tile_colors,
                render::sync_tile_labels,
                hud::update_coins_display,
                hud::update_ticks_display,
                hud::update_autos_display,
                hud::update_selected_display,
                input::keyboard_input,
                input::plot_click_input,
            )
                .run_if(in_state(GameState::Playing)),
        );

        // ─── SHOP OVERLAY ───
        app.add_systems(OnEnter(GameState::Shop), shop::spawn_shop_screen);
        app.add_systems(OnExit(GameState::Shop), shop::despawn_shop_screen);
        app.add_systems(
            Update,
            (shop::update_shop_display, shop::shop_navigation)
                .run_if(in_state(GameState::Shop)),
        );
    }
}
