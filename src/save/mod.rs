//! Persistence — snapshot the farm to JSON and restore it at startup.
//!
//! The storage location is an explicit `SaveSettings` resource injected at
//! app build, not a module-level constant, so tests and embedders can point
//! the game anywhere. The snapshot itself is a plain serializable record
//! with no knowledge of the storage mechanism.
//!
//! Load policy: a missing, unreadable, or invalid snapshot silently yields
//! a fresh default farm. Save failures are surfaced (`SaveCompleteEvent`
//! plus a warning) — losing a save is worth telling the player about.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::*;

pub const SAVE_VERSION: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════
// SNAPSHOT DTO
// ═══════════════════════════════════════════════════════════════════════

/// The persisted form of the whole farm: `autos` under the shop keys, the
/// reserved `upgrades` map passed through untouched, and a version field
/// for future migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmSnapshot {
    #[serde(default)]
    pub version: u32,
    pub rows: usize,
    pub cols: usize,
    pub plots: Vec<Plot>,
    pub coins: u32,
    pub autos: Automations,
    pub upgrades: HashMap<String, u32>,
    pub tick_count: u64,
}

impl FarmSnapshot {
    pub fn capture(farm: &Farm) -> Self {
        Self {
            version: SAVE_VERSION,
            rows: farm.rows(),
            cols: farm.cols(),
            plots: farm.plots().to_vec(),
            coins: farm.coins,
            autos: farm.autos,
            upgrades: farm.upgrade_levels.clone(),
            tick_count: farm.tick_count,
        }
    }

    /// Validate and convert back into a farm. `None` means the snapshot is
    /// structurally inconsistent and must be discarded.
    pub fn into_farm(self) -> Option<Farm> {
        Farm::from_parts(
            self.rows,
            self.cols,
            self.plots,
            self.coins,
            self.autos,
            self.upgrades,
            self.tick_count,
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SETTINGS — the persistence port
// ═══════════════════════════════════════════════════════════════════════

/// Where the snapshot lives. Inserted explicitly in `main` (or by a test)
/// so nothing in the simulation depends on an ambient global path.
#[derive(Resource, Debug, Clone)]
pub struct SaveSettings {
    pub path: PathBuf,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fazendinha_save.json"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILE I/O
// ═══════════════════════════════════════════════════════════════════════

fn write_snapshot(path: &Path, snapshot: &FarmSnapshot) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Could not create save directory: {}", e))?;
        }
    }

    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| format!("Serialization failed: {}", e))?;

    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, path).map_err(|e| format!("Rename failed: {}", e))?;

    Ok(())
}

/// Read the snapshot and rebuild the farm, or fall back to a fresh default
/// farm. Every failure mode — no file, unreadable file, bad JSON, fields
/// that don't hang together — takes the fallback path.
pub fn restore_or_default(path: &Path) -> Farm {
    if !path.exists() {
        info!("[Save] No snapshot at {} — starting fresh", path.display());
        return Farm::default();
    }
    let farm = fs::read_to_string(path)
        .ok()
        .and_then(|json| serde_json::from_str::<FarmSnapshot>(&json).ok())
        .and_then(FarmSnapshot::into_farm);
    match farm {
        Some(farm) => {
            info!(
                "[Save] Restored farm from {} (tick {}, {})",
                path.display(),
                farm.tick_count,
                crate::economy::format_coins(farm.coins)
            );
            farm
        }
        None => {
            warn!(
                "[Save] Snapshot at {} is unreadable or invalid — starting fresh",
                path.display()
            );
            Farm::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, restore_farm_on_startup).add_systems(
            Update,
            (handle_save_requests, autosave_on_tick)
                .run_if(in_state(GameState::Playing).or(in_state(GameState::Shop))),
        );
    }
}

/// Replace the default farm with the persisted one before the first
/// Playing frame. Runs in Startup, ahead of the Loading state transition.
fn restore_farm_on_startup(settings: Res<SaveSettings>, mut farm: ResMut<Farm>) {
    *farm = restore_or_default(&settings.path);
}

fn handle_save_requests(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    settings: Res<SaveSettings>,
    farm: Res<Farm>,
) {
    for _ in save_events.read() {
        let snapshot = FarmSnapshot::capture(&farm);
        match write_snapshot(&settings.path, &snapshot) {
            Ok(()) => {
                info!("[Save] Saved to {}", settings.path.display());
                complete_events.send(SaveCompleteEvent {
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Save to {} FAILED: {}", settings.path.display(), e);
                complete_events.send(SaveCompleteEvent {
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

/// Autosave after every completed tick. The farm is read in the same
/// exclusive access window, so the snapshot is always consistent.
fn autosave_on_tick(
    mut tick_events: EventReader<TickCompletedEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
) {
    if tick_events.read().next().is_some() {
        save_writer.send(SaveRequestEvent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_farm() -> Farm {
        let mut registry = CropRegistry::default();
        crate::data::crops::populate_crops(&mut registry);
        let mut farm = Farm::default();
        farm.plant_at(3, "milho", &registry).unwrap();
        farm.water_at(3).unwrap();
        farm.autos.watering = true;
        farm.tick_count = 42;
        farm
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let farm = sample_farm();
        let snapshot = FarmSnapshot::capture(&farm);
        let json = serde_json::to_string_pretty(&snapshot).unwrap();

        // The established field layout must survive.
        assert!(json.contains("\"regador\": true"));
        assert!(json.contains("\"regador_level\": 0"));

        let restored: FarmSnapshot = serde_json::from_str(&json).unwrap();
        let restored = restored.into_farm().unwrap();
        assert_eq!(restored, farm);
    }

    #[test]
    fn inconsistent_snapshot_is_rejected() {
        let farm = sample_farm();
        let mut snapshot = FarmSnapshot::capture(&farm);
        snapshot.plots.pop();
        assert!(snapshot.into_farm().is_none());

        let mut snapshot = FarmSnapshot::capture(&farm);
        snapshot.rows = 0;
        snapshot.plots.clear();
        assert!(snapshot.into_farm().is_none());
    }

    #[test]
    fn restore_falls_back_on_missing_or_corrupt_files() {
        let dir = std::env::temp_dir().join("fazendinha_save_tests");
        fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("does_not_exist.json");
        assert_eq!(restore_or_default(&missing), Farm::default());

        let corrupt = dir.join("corrupt.json");
        fs::write(&corrupt, "{ not json ").unwrap();
        assert_eq!(restore_or_default(&corrupt), Farm::default());
        fs::remove_file(&corrupt).unwrap();
    }

    #[test]
    fn write_then_restore_preserves_the_farm() {
        let dir = std::env::temp_dir().join("fazendinha_save_tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("roundtrip_{}.json", std::process::id()));

        let farm = sample_farm();
        write_snapshot(&path, &FarmSnapshot::capture(&farm)).unwrap();
        assert_eq!(restore_or_default(&path), farm);
        fs::remove_file(&path).unwrap();
    }
}
