//! Visual synchronisation — keep the plot grid sprites in sync with the farm.
//!
//! Each plot is a flat-colored tile with a two-line label, the placeholder
//! look until a sprite atlas lands. Colors follow the farm's RNG-free
//! display classification, so an infected mature plot never flickers.

use bevy::prelude::*;

use crate::shared::*;

/// Horizontal shift of the grid centre, leaving room for the HUD panel on
/// the right.
const GRID_OFFSET_X: f32 = -120.0;

const STEP: f32 = TILE_SIZE + TILE_GAP;

/// Marker component for plot tile entities managed by the ui domain.
#[derive(Component, Debug, Clone)]
pub struct PlotTile {
    pub index: usize,
}

/// Marker for the label child of a plot tile.
#[derive(Component, Debug, Clone)]
pub struct PlotLabel {
    pub index: usize,
}

/// World-space centre of the tile at (row, col).
pub fn tile_translation(row: usize, col: usize, rows: usize, cols: usize) -> Vec3 {
    let x = (col as f32 - (cols as f32 - 1.0) / 2.0) * STEP + GRID_OFFSET_X;
    let y = ((rows as f32 - 1.0) / 2.0 - row as f32) * STEP;
    Vec3::new(x, y, 1.0)
}

/// Inverse of `tile_translation`: which plot (if any) is under a
/// world-space point. Points in the gaps between tiles miss.
pub fn tile_index_at(world: Vec2, rows: usize, cols: usize) -> Option<usize> {
    for row in 0..rows {
        for col in 0..cols {
            let centre = tile_translation(row, col, rows, cols);
            let half = TILE_SIZE / 2.0;
            if (world.x - centre.x).abs() <= half && (world.y - centre.y).abs() <= half {
                return Some(row * cols + col);
            }
        }
    }
    None
}

/// Tile colour for a display state: light green fallow, pale yellow
/// growing, gold ready, red infected.
pub fn plot_color(display: &PlotDisplay) -> Color {
    match display {
        PlotDisplay::Fallow => Color::srgb(0.56, 0.82, 0.56),
        PlotDisplay::Growing { .. } => Color::srgb(0.97, 0.94, 0.65),
        PlotDisplay::Infected { .. } => Color::srgb(0.84, 0.25, 0.21),
        PlotDisplay::Ready { .. } => Color::srgb(1.0, 0.83, 0.25),
    }
}

/// Two-line tile label for a display state.
pub fn plot_label(display: &PlotDisplay) -> String {
    match display {
        PlotDisplay::Fallow => String::new(),
        PlotDisplay::Growing { name, percent } => format!("{}\n{}%", name, percent),
        PlotDisplay::Infected { name } => format!("{}\ndoente", name),
        PlotDisplay::Ready { name } => format!("{}\npronta", name),
    }
}

/// Spawn one tile entity (plus label child) per plot.
pub fn spawn_grid(mut commands: Commands, farm: Res<Farm>) {
    let rows = farm.rows();
    let cols = farm.cols();
    for row in 0..rows {
        for col in 0..cols {
            let index = farm.index_of(row, col);
            commands
                .spawn((
                    Sprite {
                        color: plot_color(&PlotDisplay::Fallow),
                        custom_size: Some(Vec2::splat(TILE_SIZE)),
                        ..default()
                    },
                    Transform::from_translation(tile_translation(row, col, rows, cols)),
                    PlotTile { index },
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Text2d::new(""),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.15, 0.15, 0.15)),
                        TextLayout::new_with_justify(JustifyText::Center),
                        Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
                        PlotLabel { index },
                    ));
                });
        }
    }
}

pub fn despawn_grid(mut commands: Commands, tiles: Query<Entity, With<PlotTile>>) {
    for entity in &tiles {
        commands.entity(entity).despawn_recursive();
    }
}

/// Update tile colours from farm state.
pub fn sync_tile_colors(
    farm: Res<Farm>,
    registry: Res<CropRegistry>,
    mut tiles: Query<(&PlotTile, &mut Sprite)>,
) {
    for (tile, mut sprite) in tiles.iter_mut() {
        if let Some(display) = farm.display_state(tile.index, &registry) {
            sprite.color = plot_color(&display);
        }
    }
}

/// Update tile labels from farm state.
pub fn sync_tile_labels(
    farm: Res<Farm>,
    registry: Res<CropRegistry>,
    mut labels: Query<(&PlotLabel, &mut Text2d)>,
) {
    for (label, mut text) in labels.iter_mut() {
        if let Some(display) = farm.display_state(label.index, &registry) {
            let wanted = plot_label(&display);
            if text.0 != wanted {
                text.0 = wanted;
            }
        }
    }
}
