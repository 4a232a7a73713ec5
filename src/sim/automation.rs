//! The purchasable automation passes that run inside each tick.
//!
//! Order is fixed by resource dependency: watering first (so a crop planted
//! this tick still needs its own water next tick), planting second (fallow
//! plots get filled while coins allow), harvesting last (newly planted
//! crops are never harvestable, so it only ever touches mature plots).

use rand::Rng;

use crate::shared::*;

/// What the automation phase did during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutomationReport {
    pub watered: u32,
    pub planted: u32,
    pub harvested: u32,
    pub income: u32,
}

/// Run every enabled automation against the farm, in watering → planting →
/// harvesting order.
pub fn run_automation(
    farm: &mut Farm,
    registry: &CropRegistry,
    rng: &mut impl Rng,
) -> AutomationReport {
    let mut report = AutomationReport::default();

    if farm.autos.watering {
        report.watered = farm.water_all() as u32;
    }

    if farm.autos.planting {
        report.planted = auto_plant(farm, registry);
    }

    if farm.autos.harvesting {
        let summary = farm.harvest_all(registry, rng);
        report.harvested = summary.plots;
        report.income = summary.coins;
    }

    report
}

/// Plant the starter crop on every fallow plot while funds allow. Running
/// out of coins mid-pass is the expected steady state — the pass stops
/// quietly rather than erroring.
fn auto_plant(farm: &mut Farm, registry: &CropRegistry) -> u32 {
    let Some(starter) = registry.starter_crop() else {
        return 0;
    };
    let crop_id = starter.id.clone();
    let seed_price = starter.seed_price;

    let mut planted = 0;
    for index in 0..farm.plot_count() {
        if farm.coins < seed_price {
            break;
        }
        let fallow = farm.plot(index).map(Plot::is_fallow).unwrap_or(false);
        if fallow && farm.plant_at(index, &crop_id, registry).is_ok() {
            planted += 1;
        }
    }
    planted
}
