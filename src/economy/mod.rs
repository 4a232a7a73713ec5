//! Economy domain — the automation shop and coin display helpers.
//!
//! The shop sells exactly three automations (watering, planting,
//! harvesting) at fixed prices. Purchases go through
//! `Farm::purchase_automation`, which checks funds atomically; the
//! established quirk that re-buying an owned automation charges again is
//! kept and covered by a test in `shared`.

use bevy::prelude::*;

use crate::shared::*;

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_automation_purchases
                .run_if(in_state(GameState::Playing).or(in_state(GameState::Shop))),
        );
    }
}

pub fn handle_automation_purchases(
    mut buy_events: EventReader<BuyAutomationEvent>,
    mut farm: ResMut<Farm>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for event in buy_events.read() {
        let kind = event.kind;
        match farm.purchase_automation(kind, kind.cost()) {
            Ok(()) => {
                info!(
                    "[Economy] Bought {} for {}. New balance: {}",
                    kind.shop_key(),
                    format_coins(kind.cost()),
                    format_coins(farm.coins)
                );
                toasts.send(ToastEvent {
                    message: format!("{} ativado!", kind.display_name()),
                    duration_secs: 2.5,
                });
            }
            Err(FarmError::InsufficientFunds { needed, available }) => {
                info!(
                    "[Economy] Purchase of {} rejected: need {}, have {}",
                    kind.shop_key(),
                    format_coins(needed),
                    format_coins(available)
                );
                toasts.send(ToastEvent {
                    message: "Dinheiro insuficiente.".to_string(),
                    duration_secs: 2.5,
                });
            }
            Err(err) => warn!("[Economy] Purchase of {} failed: {}", kind.shop_key(), err),
        }
    }
}

/// Format a coin amount as a display string (e.g. "1,234c").
pub fn format_coins(amount: u32) -> String {
    let s = amount.to_string();
    let mut result = String::new();
    let digits: Vec<char> = s.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }
    result.push('c');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coins() {
        assert_eq!(format_coins(0), "0c");
        assert_eq!(format_coins(50), "50c");
        assert_eq!(format_coins(1234), "1,234c");
        assert_eq!(format_coins(100000), "100,000c");
    }

    #[test]
    fn shop_prices_match_the_catalog() {
        assert_eq!(AutomationKind::Watering.cost(), 100);
        assert_eq!(AutomationKind::Planting.cost(), 150);
        assert_eq!(AutomationKind::Harvesting.cost(), 200);
    }
}
