//! HUD — the side panel with coins, tick count, automation status, and the
//! key reference.

use bevy::prelude::*;

use crate::economy::format_coins;
use crate::shared::*;

use super::input::SelectedCrop;

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudCoinsText;

#[derive(Component)]
pub struct HudTicksText;

#[derive(Component)]
pub struct HudAutosText;

#[derive(Component)]
pub struct HudSelectedText;

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                right: Val::Px(0.0),
                width: Val::Px(240.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.07, 0.1, 0.07, 0.85)),
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Fazendinha"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.85, 0.5)),
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                HudCoinsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                HudTicksText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.75, 0.85, 0.75)),
                HudAutosText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.6)),
                HudSelectedText,
            ));
            parent.spawn((
                Text::new(
                    "1/2/3  plantar cenoura/milho/batata\n\
                     clique  regar / colher\n\
                     A  regar tudo\n\
                     C  colher tudo\n\
                     B  loja\n\
                     F5  salvar\n\
                     F2  novo jogo",
                ),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
            ));
        });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn update_coins_display(farm: Res<Farm>, mut query: Query<&mut Text, With<HudCoinsText>>) {
    for mut text in query.iter_mut() {
        text.0 = format!("Coins: {}", format_coins(farm.coins));
    }
}

pub fn update_ticks_display(farm: Res<Farm>, mut query: Query<&mut Text, With<HudTicksText>>) {
    for mut text in query.iter_mut() {
        text.0 = format!("Ticks: {}", farm.tick_count);
    }
}

pub fn update_autos_display(farm: Res<Farm>, mut query: Query<&mut Text, With<HudAutosText>>) {
    for mut text in query.iter_mut() {
        let mut lines = String::from("Autos:");
        for kind in AutomationKind::ALL {
            let mark = if farm.autos.is_enabled(kind) {
                "sim"
            } else {
                "não"
            };
            lines.push_str(&format!("\n  {}: {}", kind.shop_key(), mark));
        }
        text.0 = lines;
    }
}

pub fn update_selected_display(
    selected: Res<SelectedCrop>,
    mut query: Query<&mut Text, With<HudSelectedText>>,
) {
    for mut text in query.iter_mut() {
        text.0 = match &selected.0 {
            Some(crop_id) => format!("Plantando: {}", crop_id),
            None => String::new(),
        };
    }
}
