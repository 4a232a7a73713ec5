//! Shared types, resources, events, and states for Fazendinha.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Shop,
}

// ═══════════════════════════════════════════════════════════════════════
// CROP CATALOG
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every crop in the game.
/// Using string IDs for data-driven flexibility.
pub type CropId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropDef {
    pub id: CropId,
    pub name: String,
    /// Ticks from planting until the crop can be harvested.
    pub growth_ticks: u32,
    /// Coins credited when the crop is harvested.
    pub sell_price: u32,
    /// Minimum accumulated water units before harvest is possible.
    pub water_need: u32,
    /// Coins deducted when the crop is planted.
    pub seed_price: u32,
}

/// Registry of crop definitions. Populated once during `GameState::Loading`
/// by the data plugin and never written afterwards, so it is safe to read
/// from any system without further coordination.
#[derive(Resource, Debug, Clone, Default)]
pub struct CropRegistry {
    pub crops: HashMap<CropId, CropDef>,
}

impl CropRegistry {
    pub fn lookup(&self, id: &str) -> Result<&CropDef, FarmError> {
        self.crops
            .get(id)
            .ok_or_else(|| FarmError::UnknownCrop(id.to_string()))
    }

    /// The fixed default crop for planting automation: cheapest seed,
    /// ties broken by id so the choice is stable.
    pub fn starter_crop(&self) -> Option<&CropDef> {
        self.crops
            .values()
            .min_by_key(|def| (def.seed_price, def.id.clone()))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

/// Everything that can go wrong when mutating the farm. `UnknownCrop` and
/// `IndexOutOfRange` indicate caller bugs; the other two are ordinary
/// user-facing outcomes surfaced as notifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FarmError {
    #[error("unknown crop '{0}'")]
    UnknownCrop(CropId),
    #[error("plot index {index} out of range (farm has {len} plots)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("plot is already occupied")]
    PlotOccupied,
    #[error("not enough coins: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },
}

// ═══════════════════════════════════════════════════════════════════════
// PLOT
// ═══════════════════════════════════════════════════════════════════════

/// Chance per tick that a planted, healthy plot becomes infected.
pub const INFECTION_CHANCE_PER_TICK: f64 = 0.01;

/// Chance that a harvest-readiness check fails on an infected plot.
/// Re-rolled on every check — see `Plot::is_ready_to_harvest`.
pub const INFECTED_HARVEST_FAIL_CHANCE: f64 = 0.4;

/// One grid cell of farmland. `age` and `water` are meaningful only while
/// a crop is planted; clearing the plot resets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    pub crop: Option<CropId>,
    pub age: u32,
    pub water: u32,
    pub infected: bool,
}

impl Plot {
    pub fn is_fallow(&self) -> bool {
        self.crop.is_none()
    }

    /// Plant a crop. The caller validates the id against the registry and
    /// pays for the seed; the plot only guards its own occupancy.
    pub fn plant(&mut self, crop_id: impl Into<CropId>) -> Result<(), FarmError> {
        if !self.is_fallow() {
            return Err(FarmError::PlotOccupied);
        }
        self.crop = Some(crop_id.into());
        self.age = 0;
        self.water = 0;
        self.infected = false;
        Ok(())
    }

    /// Watering is unbounded and permitted on fallow plots — the counter is
    /// reset on the next planting anyway.
    pub fn apply_water(&mut self, amount: u32) {
        self.water += amount;
    }

    pub fn age_one_tick(&mut self) {
        if !self.is_fallow() {
            self.age += 1;
        }
    }

    /// Roll for a new infection. Returns whether the plot newly became
    /// infected; already-infected and fallow plots never roll.
    pub fn roll_infection(&mut self, probability: f64, rng: &mut impl Rng) -> bool {
        if self.is_fallow() || self.infected {
            return false;
        }
        if rng.gen::<f64>() < probability {
            self.infected = true;
            return true;
        }
        false
    }

    /// Whether a harvest attempt would succeed right now.
    ///
    /// The infection penalty is re-rolled on EVERY call, so a single "not
    /// ready" answer for an infected, otherwise-mature plot is not durable:
    /// asking again may succeed. Callers that need a stable classification
    /// for rendering should use `Farm::display_state` instead.
    pub fn is_ready_to_harvest(&self, registry: &CropRegistry, rng: &mut impl Rng) -> bool {
        let Some(crop_id) = &self.crop else {
            return false;
        };
        let Ok(def) = registry.lookup(crop_id) else {
            return false;
        };
        self.age >= def.growth_ticks
            && self.water >= def.water_need
            && !(self.infected && rng.gen::<f64>() < INFECTED_HARVEST_FAIL_CHANCE)
    }

    /// Reset to fallow.
    pub fn clear(&mut self) {
        self.crop = None;
        self.age = 0;
        self.water = 0;
        self.infected = false;
    }

    /// Growth progress for display, capped at 100.
    pub fn growth_percent(&self, def: &CropDef) -> u32 {
        if def.growth_ticks == 0 {
            return 100;
        }
        (self.age * 100 / def.growth_ticks).min(100)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// AUTOMATION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutomationKind {
    Watering,
    Planting,
    Harvesting,
}

impl AutomationKind {
    pub const ALL: [AutomationKind; 3] = [
        AutomationKind::Watering,
        AutomationKind::Planting,
        AutomationKind::Harvesting,
    ];

    /// Stable key used in the shop and in save files.
    pub fn shop_key(&self) -> &'static str {
        match self {
            AutomationKind::Watering => "regador",
            AutomationKind::Planting => "plantador",
            AutomationKind::Harvesting => "colhedor",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AutomationKind::Watering => "Regador Automático",
            AutomationKind::Planting => "Plantador Automático",
            AutomationKind::Harvesting => "Colhedor Automático",
        }
    }

    /// Coins required to unlock this automation in the shop.
    pub fn cost(&self) -> u32 {
        match self {
            AutomationKind::Watering => 100,
            AutomationKind::Planting => 150,
            AutomationKind::Harvesting => 200,
        }
    }
}

/// The three purchasable automation toggles. Serialized under the shop
/// keys (`regador`/`plantador`/`colhedor`) so save files keep a stable
/// field layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automations {
    #[serde(rename = "regador")]
    pub watering: bool,
    #[serde(rename = "plantador")]
    pub planting: bool,
    #[serde(rename = "colhedor")]
    pub harvesting: bool,
}

impl Automations {
    pub fn is_enabled(&self, kind: AutomationKind) -> bool {
        match kind {
            AutomationKind::Watering => self.watering,
            AutomationKind::Planting => self.planting,
            AutomationKind::Harvesting => self.harvesting,
        }
    }

    pub fn enable(&mut self, kind: AutomationKind) {
        match kind {
            AutomationKind::Watering => self.watering = true,
            AutomationKind::Planting => self.planting = true,
            AutomationKind::Harvesting => self.harvesting = true,
        }
    }
}

/// Reserved upgrade tiers for each automation. Persisted and passed through
/// unchanged; no logic reads them yet.
pub fn default_upgrade_levels() -> HashMap<String, u32> {
    let mut levels = HashMap::new();
    for kind in AutomationKind::ALL {
        levels.insert(format!("{}_level", kind.shop_key()), 0);
    }
    levels
}

// ═══════════════════════════════════════════════════════════════════════
// FARM
// ═══════════════════════════════════════════════════════════════════════

pub const DEFAULT_ROWS: usize = 5;
pub const DEFAULT_COLS: usize = 5;
pub const STARTING_COINS: u32 = 50;

/// A successful harvest of a single plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    pub crop: CropId,
    pub coins: u32,
}

/// Aggregate result of a harvest-all pass. Zero plots is a normal outcome
/// ("nothing ready yet"), not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub plots: u32,
    pub coins: u32,
}

/// Stable, RNG-free classification of a plot for rendering. An infected
/// mature plot always classifies `Infected` — the display never flickers
/// even though harvest attempts on it re-roll the failure chance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotDisplay {
    Fallow,
    Growing { name: String, percent: u32 },
    Infected { name: String },
    Ready { name: String },
}

/// The whole farm: grid of plots, coin balance, automation toggles, and the
/// elapsed-tick counter. Owned exclusively by the Bevy world as a resource;
/// the schedule serializes every system that takes it mutably, so tick
/// processing and user actions never interleave.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Farm {
    rows: usize,
    cols: usize,
    plots: Vec<Plot>,
    pub coins: u32,
    pub autos: Automations,
    pub upgrade_levels: HashMap<String, u32>,
    pub tick_count: u64,
}

impl Default for Farm {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Farm {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            plots: vec![Plot::default(); rows * cols],
            coins: STARTING_COINS,
            autos: Automations::default(),
            upgrade_levels: default_upgrade_levels(),
            tick_count: 0,
        }
    }

    /// Rebuild a farm from persisted parts. Fails if the plot list does not
    /// match the grid dimensions.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        rows: usize,
        cols: usize,
        plots: Vec<Plot>,
        coins: u32,
        autos: Automations,
        upgrade_levels: HashMap<String, u32>,
        tick_count: u64,
    ) -> Option<Self> {
        if rows == 0 || cols == 0 || plots.len() != rows * cols {
            return None;
        }
        Some(Self {
            rows,
            cols,
            plots,
            coins,
            autos,
            upgrade_levels,
            tick_count,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }

    pub fn plot(&self, index: usize) -> Option<&Plot> {
        self.plots.get(index)
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn plot_mut(&mut self, index: usize) -> Result<&mut Plot, FarmError> {
        let len = self.plots.len();
        self.plots
            .get_mut(index)
            .ok_or(FarmError::IndexOutOfRange { index, len })
    }

    /// Plant `crop_id` at `index`, paying its seed price. Checks index,
    /// occupancy, catalog, funds — in that order — and mutates nothing on
    /// failure.
    pub fn plant_at(
        &mut self,
        index: usize,
        crop_id: &str,
        registry: &CropRegistry,
    ) -> Result<(), FarmError> {
        let available = self.coins;
        let seed_price = {
            let plot = self.plot_mut(index)?;
            if !plot.is_fallow() {
                return Err(FarmError::PlotOccupied);
            }
            registry.lookup(crop_id)?.seed_price
        };
        if available < seed_price {
            return Err(FarmError::InsufficientFunds {
                needed: seed_price,
                available,
            });
        }
        self.plot_mut(index)?.plant(crop_id)?;
        self.coins -= seed_price;
        Ok(())
    }

    /// Water a single plot. Fallow plots are allowed (the water counter is
    /// reset on the next planting).
    pub fn water_at(&mut self, index: usize) -> Result<(), FarmError> {
        self.plot_mut(index)?.apply_water(1);
        Ok(())
    }

    /// Water every planted plot; fallow plots are skipped. Returns the
    /// number of plots watered.
    pub fn water_all(&mut self) -> usize {
        let mut watered = 0;
        for plot in &mut self.plots {
            if !plot.is_fallow() {
                plot.apply_water(1);
                watered += 1;
            }
        }
        watered
    }

    /// Attempt to harvest one plot. `Ok(None)` means "not ready" — a normal
    /// outcome with no state change. On success the plot returns to fallow
    /// and the crop's sell price is credited.
    pub fn harvest_at(
        &mut self,
        index: usize,
        registry: &CropRegistry,
        rng: &mut impl Rng,
    ) -> Result<Option<Harvest>, FarmError> {
        let (crop_id, sell_price) = {
            let plot = self.plot_mut(index)?;
            if !plot.is_ready_to_harvest(registry, rng) {
                return Ok(None);
            }
            let Some(crop_id) = plot.crop.clone() else {
                return Ok(None);
            };
            let sell_price = registry.lookup(&crop_id)?.sell_price;
            plot.clear();
            (crop_id, sell_price)
        };
        self.coins += sell_price;
        Ok(Some(Harvest {
            crop: crop_id,
            coins: sell_price,
        }))
    }

    /// Harvest every ready plot. Zero harvested is the expected steady state
    /// when nothing is mature yet.
    pub fn harvest_all(&mut self, registry: &CropRegistry, rng: &mut impl Rng) -> HarvestSummary {
        let mut summary = HarvestSummary::default();
        for index in 0..self.plots.len() {
            if let Ok(Some(harvest)) = self.harvest_at(index, registry, rng) {
                summary.plots += 1;
                summary.coins += harvest.coins;
            }
        }
        summary
    }

    /// Buy an automation. Re-purchasing an owned automation charges again
    /// with no further effect — established behavior, kept deliberately
    /// (see the repurchase test).
    pub fn purchase_automation(
        &mut self,
        kind: AutomationKind,
        cost: u32,
    ) -> Result<(), FarmError> {
        if self.coins < cost {
            return Err(FarmError::InsufficientFunds {
                needed: cost,
                available: self.coins,
            });
        }
        self.coins -= cost;
        self.autos.enable(kind);
        Ok(())
    }

    /// Whether the plot's age and water thresholds are met, ignoring
    /// infection. Deterministic — used by the display classification and by
    /// the input layer to decide whether a click is a harvest attempt.
    pub fn is_mature(&self, index: usize, registry: &CropRegistry) -> bool {
        let Some(plot) = self.plots.get(index) else {
            return false;
        };
        let Some(crop_id) = &plot.crop else {
            return false;
        };
        let Ok(def) = registry.lookup(crop_id) else {
            return false;
        };
        plot.age >= def.growth_ticks && plot.water >= def.water_need
    }

    /// RNG-free display classification of a plot.
    pub fn display_state(&self, index: usize, registry: &CropRegistry) -> Option<PlotDisplay> {
        let plot = self.plots.get(index)?;
        let Some(crop_id) = &plot.crop else {
            return Some(PlotDisplay::Fallow);
        };
        let Ok(def) = registry.lookup(crop_id) else {
            // Planted id missing from the registry — render as bare dirt.
            return Some(PlotDisplay::Fallow);
        };
        let name = def.name.clone();
        if plot.infected {
            return Some(PlotDisplay::Infected { name });
        }
        if plot.age >= def.growth_ticks && plot.water >= def.water_need {
            return Some(PlotDisplay::Ready { name });
        }
        Some(PlotDisplay::Growing {
            percent: plot.growth_percent(def),
            name,
        })
    }

    /// Iterate mutably over all plots. Used by the simulation's growth and
    /// infection phases.
    pub fn plots_mut(&mut self) -> impl Iterator<Item = &mut Plot> {
        self.plots.iter_mut()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// User intent: plant a crop on a specific plot.
#[derive(Event, Debug, Clone)]
pub struct PlantCropEvent {
    pub index: usize,
    pub crop_id: CropId,
}

/// User intent: water a specific plot.
#[derive(Event, Debug, Clone)]
pub struct WaterPlotEvent {
    pub index: usize,
}

/// User intent: water every planted plot.
#[derive(Event, Debug, Clone)]
pub struct WaterAllEvent;

/// User intent: attempt a harvest on a specific plot.
#[derive(Event, Debug, Clone)]
pub struct HarvestPlotEvent {
    pub index: usize,
}

/// User intent: harvest every ready plot.
#[derive(Event, Debug, Clone)]
pub struct HarvestAllEvent;

/// User intent: buy an automation from the shop.
#[derive(Event, Debug, Clone)]
pub struct BuyAutomationEvent {
    pub kind: AutomationKind,
}

/// Fired by the simulation after every completed tick. The save plugin
/// listens to this as its persistence hook.
#[derive(Event, Debug, Clone)]
pub struct TickCompletedEvent {
    pub tick: u64,
    pub infections: u32,
    pub watered: u32,
    pub auto_planted: u32,
    pub auto_harvested: u32,
    pub income: u32,
}

/// Request a manual save of the current farm.
#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent;

/// Result of a save attempt (manual or autosave).
#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

/// Reset the farm to a fresh default game.
#[derive(Event, Debug, Clone)]
pub struct NewGameEvent;

/// Toast notification for player feedback.
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

/// Seconds between simulation ticks.
pub const TICK_INTERVAL_SECS: f32 = 1.0;

pub const TILE_SIZE: f32 = 64.0;
pub const TILE_GAP: f32 = 6.0;
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 600.0;

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
