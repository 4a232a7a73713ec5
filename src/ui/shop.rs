//! Shop overlay — the three automations, keyboard-driven.

use bevy::prelude::*;

use crate::economy::format_coins;
use crate::shared::*;

#[derive(Component)]
pub struct ShopScreenRoot;

#[derive(Component)]
pub struct ShopCoinsText;

#[derive(Component)]
pub struct ShopListItem {
    pub index: usize,
}

/// Cursor position within the automation list.
#[derive(Resource, Debug, Default)]
pub struct ShopUiState {
    pub cursor: usize,
}

pub fn spawn_shop_screen(mut commands: Commands) {
    commands.insert_resource(ShopUiState::default());

    commands
        .spawn((
            ShopScreenRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loja da Fazenda"),
                TextFont {
                    font_size: 26.0,
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
                ShopCoinsText,
            ));
            for (index, _) in AutomationKind::ALL.iter().enumerate() {
                parent.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    ShopListItem { index },
                ));
            }
            parent.spawn((
                Text::new("setas: navegar   Enter: comprar   Esc: fechar"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
            ));
        });
}

pub fn despawn_shop_screen(mut commands: Commands, query: Query<Entity, With<ShopScreenRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<ShopUiState>();
}

pub fn update_shop_display(
    farm: Res<Farm>,
    ui_state: Option<Res<ShopUiState>>,
    mut coins_query: Query<&mut Text, (With<ShopCoinsText>, Without<ShopListItem>)>,
    mut items_query: Query<(&ShopListItem, &mut Text, &mut TextColor)>,
) {
    let Some(ui_state) = ui_state else {
        return;
    };

    for mut text in coins_query.iter_mut() {
        text.0 = format!("Coins atuais: {}", format_coins(farm.coins));
    }

    for (item, mut text, mut color) in items_query.iter_mut() {
        let kind = AutomationKind::ALL[item.index];
        let owned = if farm.autos.is_enabled(kind) {
            "  [ativo]"
        } else {
            ""
        };
        let marker = if item.index == ui_state.cursor {
            "> "
        } else {
            "  "
        };
        text.0 = format!(
            "{}{} ({}){}",
            marker,
            kind.display_name(),
            format_coins(kind.cost()),
            owned
        );
        color.0 = if item.index == ui_state.cursor {
            Color::srgb(1.0, 0.9, 0.4)
        } else {
            Color::WHITE
        };
    }
}

pub fn shop_navigation(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut ui_state: Option<ResMut<ShopUiState>>,
    mut buy_events: EventWriter<BuyAutomationEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(ref mut ui_state) = ui_state else {
        return;
    };

    let max_items = AutomationKind::ALL.len();
    if keyboard.just_pressed(KeyCode::ArrowDown) && ui_state.cursor + 1 < max_items {
        ui_state.cursor += 1;
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) && ui_state.cursor > 0 {
        ui_state.cursor -= 1;
    }

    if keyboard.just_pressed(KeyCode::Enter) {
        buy_events.send(BuyAutomationEvent {
            kind: AutomationKind::ALL[ui_state.cursor],
        });
    }

    if keyboard.just_pressed(KeyCode::Escape) || keyboard.just_pressed(KeyCode::KeyB) {
        next_state.set(GameState::Playing);
    }
}
