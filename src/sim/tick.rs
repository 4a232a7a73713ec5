//! The tick state machine — one call advances the whole farm by one step.

use rand::Rng;

use crate::shared::*;

use super::automation::run_automation;

/// Everything that happened during one tick, for logging and notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Value of `Farm::tick_count` after the tick.
    pub tick: u64,
    pub infections: u32,
    pub watered: u32,
    pub auto_planted: u32,
    pub auto_harvested: u32,
    pub income: u32,
}

/// Advance the farm by exactly one tick.
///
/// Phase order is part of the contract:
/// 1. growth — every planted plot ages by one;
/// 2. infection — each planted plot rolls independently;
/// 3. automation — watering, then planting, then harvesting;
/// 4. bookkeeping — the tick counter increments.
///
/// The call is synchronous and never partially applied: the caller holds
/// exclusive access to the farm for its whole duration. Persistence is the
/// caller's business (the driving system emits `TickCompletedEvent`).
pub fn advance_tick(farm: &mut Farm, registry: &CropRegistry, rng: &mut impl Rng) -> TickOutcome {
    for plot in farm.plots_mut() {
        plot.age_one_tick();
    }

    let mut infections = 0;
    for plot in farm.plots_mut() {
        if plot.roll_infection(INFECTION_CHANCE_PER_TICK, rng) {
            infections += 1;
        }
    }

    let report = run_automation(farm, registry, rng);

    farm.tick_count += 1;

    TickOutcome {
        tick: farm.tick_count,
        infections,
        watered: report.watered,
        auto_planted: report.planted,
        auto_harvested: report.harvested,
        income: report.income,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn registry() -> CropRegistry {
        let mut registry = CropRegistry::default();
        crate::data::crops::populate_crops(&mut registry);
        registry
    }

    fn rng_never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn rng_always() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn tick_count_increments_regardless_of_automation() {
        let registry = registry();
        let mut farm = Farm::default();
        for expected in 1..=10 {
            let outcome = advance_tick(&mut farm, &registry, &mut rng_never());
            assert_eq!(outcome.tick, expected);
        }
        assert_eq!(farm.tick_count, 10);

        farm.autos = Automations {
            watering: true,
            planting: true,
            harvesting: true,
        };
        farm.coins = 0;
        advance_tick(&mut farm, &registry, &mut rng_never());
        assert_eq!(farm.tick_count, 11);
    }

    #[test]
    fn growth_phase_ages_planted_plots_only() {
        let registry = registry();
        let mut farm = Farm::default();
        farm.plant_at(0, "cenoura", &registry).unwrap();

        advance_tick(&mut farm, &registry, &mut rng_never());
        assert_eq!(farm.plot(0).unwrap().age, 1);
        assert_eq!(farm.plot(1).unwrap().age, 0);
    }

    #[test]
    fn infection_phase_reports_new_infections() {
        let registry = registry();
        let mut farm = Farm::default();
        farm.plant_at(0, "cenoura", &registry).unwrap();
        farm.plant_at(1, "milho", &registry).unwrap();

        let outcome = advance_tick(&mut farm, &registry, &mut rng_always());
        assert_eq!(outcome.infections, 2);
        assert!(farm.plot(0).unwrap().infected);
        assert!(farm.plot(1).unwrap().infected);

        // Already infected — nothing new to report.
        let outcome = advance_tick(&mut farm, &registry, &mut rng_always());
        assert_eq!(outcome.infections, 0);
    }

    #[test]
    fn deterministic_growth_path_for_cenoura() {
        // growth_ticks=8, water_need=2: eight ticks plus two waterings make
        // the plot harvestable when no infection interferes.
        let registry = registry();
        let mut farm = Farm::default();
        farm.plant_at(0, "cenoura", &registry).unwrap();
        farm.water_at(0).unwrap();
        farm.water_at(0).unwrap();
        for _ in 0..8 {
            advance_tick(&mut farm, &registry, &mut rng_never());
        }
        assert!(farm
            .plot(0)
            .unwrap()
            .is_ready_to_harvest(&registry, &mut rng_never()));
    }

    #[test]
    fn planting_automation_with_no_funds_is_inert() {
        let registry = registry();
        let mut farm = Farm::default();
        farm.autos.planting = true;
        farm.coins = 3; // below every seed price

        for _ in 0..5 {
            let outcome = advance_tick(&mut farm, &registry, &mut rng_never());
            assert_eq!(outcome.auto_planted, 0);
        }
        assert_eq!(farm.coins, 3);
        assert!(farm.plots().iter().all(Plot::is_fallow));
    }

    #[test]
    fn full_automation_reaches_harvest_without_user_input() {
        let registry = registry();
        let mut farm = Farm::default();
        farm.autos = Automations {
            watering: true,
            planting: true,
            harvesting: true,
        };

        // Ticks 1..9: plots get planted on tick 1 and watered every tick.
        // Cenoura needs 8 growth ticks, so by tick 9 the first plots mature
        // and the harvester starts collecting.
        let mut harvested_total = 0;
        for _ in 0..12 {
            let outcome = advance_tick(&mut farm, &registry, &mut rng_never());
            harvested_total += outcome.auto_harvested;
        }
        assert!(harvested_total > 0, "automation should complete the cycle");
        assert!(farm.coins > 0);
        assert_eq!(farm.tick_count, 12);
    }
}
