//! Save/Load - versioned JSON blob deep-merged over defaults on load.
//! The world grid has no persisted form of its own: it is rebuilt from
//! terrain rules plus the building/crop lists recorded here.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, ObjectiveKind};
use crate::constants::{CROP_STAGES, FRIENDSHIP_MAX, xp_for_level};
use crate::world::WorldGrid;

const SAVE_VERSION: u32 = 1;

// ============================================================================
// SAVE FORMAT STRUCTS
// ============================================================================

/// A placed building: the save list and the grid are two projections of the
/// same fact and must always change together.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BuildingSave {
    pub id: String,
    pub tile_x: i32,
    pub tile_y: i32,
    pub level: i64,
}

/// A planted crop. Growth is due-time driven: stage `s` completes at
/// `planted_at + (s + 1) * grow_time / 3` on the accumulated play clock.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CropSave {
    pub tile_x: i32,
    pub tile_y: i32,
    pub kind: String,
    pub stage: u8,
    pub watered: bool,
    pub planted_at: f64,
    pub grow_time: f32,
}

impl CropSave {
    /// Seconds one growth stage takes.
    pub fn stage_len(&self) -> f64 {
        self.grow_time as f64 / CROP_STAGES as f64
    }

    /// Play-clock instant the next stage promotion is due.
    pub fn next_due(&self) -> f64 {
        self.planted_at + (self.stage as f64 + 1.0) * self.stage_len()
    }

    pub fn ready(&self) -> bool {
        self.stage >= CROP_STAGES
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DailyTask {
    pub kind: ObjectiveKind,
    pub target: String,
    pub count: i64,
    pub progress: i64,
    pub completed: bool,
    pub text: String,
    pub reward_coins: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Stats {
    #[serde(default)]
    pub crops_harvested: i64,
    #[serde(default)]
    pub fish_caught: i64,
    #[serde(default)]
    pub rocks_smashed: i64,
    #[serde(default)]
    pub buildings_placed: i64,
    #[serde(default)]
    pub quests_completed: i64,
    #[serde(default)]
    pub gifts_given: i64,
    #[serde(default)]
    pub npcs_talked_to: i64,
}

/// Arena records carried across runs.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ArenaStats {
    #[serde(default)]
    pub high_score: i64,
    #[serde(default)]
    pub max_wave: i64,
    #[serde(default)]
    pub total_kills: i64,
}

/// The whole persisted player record.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SaveData {
    pub version: u32,
    pub coins: i64,
    pub xp: i64,
    pub level: i64,
    pub inventory: BTreeMap<String, i64>,
    pub buildings: Vec<BuildingSave>,
    pub crops: Vec<CropSave>,
    pub friendship: BTreeMap<String, i64>,
    pub quests_active: Vec<String>,
    pub quests_completed: Vec<String>,
    pub quest_progress: BTreeMap<String, BTreeMap<String, i64>>,
    pub talked_today: Vec<String>,
    pub daily_tasks: Vec<DailyTask>,
    /// Calendar day (days since epoch) the dailies were drawn for.
    pub daily_date: Option<i64>,
    pub day_time: f32,
    /// Accumulated play-clock seconds across all sessions. Crop due times
    /// live on this axis so growth survives save/load.
    pub total_play_time: f64,
    pub last_save_time: f64,
    pub stats: Stats,
    #[serde(default)]
    pub arena: ArenaStats,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            coins: 200,
            xp: 0,
            level: 1,
            inventory: BTreeMap::from([
                ("seed_wheat".to_string(), 10),
                ("seed_carrot".to_string(), 5),
                ("wood".to_string(), 20),
                ("stone".to_string(), 15),
            ]),
            buildings: Vec::new(),
            crops: Vec::new(),
            friendship: catalog::CHARACTERS
                .iter()
                .map(|c| (c.id.to_string(), 0))
                .collect(),
            quests_active: vec!["main_welcome".to_string()],
            quests_completed: Vec::new(),
            quest_progress: BTreeMap::new(),
            talked_today: Vec::new(),
            daily_tasks: Vec::new(),
            daily_date: None,
            day_time: 0.0,
            total_play_time: 0.0,
            last_save_time: 0.0,
            stats: Stats::default(),
            arena: ArenaStats::default(),
        }
    }
}

// ============================================================================
// INVENTORY / ECONOMY HELPERS
// ============================================================================

impl SaveData {
    pub fn add_item(&mut self, id: &str, count: i64) {
        *self.inventory.entry(id.to_string()).or_insert(0) += count;
    }

    /// Remove `count` of an item. False (and no change) when short.
    pub fn remove_item(&mut self, id: &str, count: i64) -> bool {
        match self.inventory.get_mut(id) {
            Some(have) if *have >= count => {
                *have -= count;
                if *have <= 0 {
                    self.inventory.remove(id);
                }
                true
            }
            _ => false,
        }
    }

    pub fn has_item(&self, id: &str, count: i64) -> bool {
        self.inventory.get(id).copied().unwrap_or(0) >= count
    }

    pub fn add_coins(&mut self, amount: i64) {
        self.coins += amount;
    }

    /// Spend coins. False (and no change) on overdraft.
    pub fn spend_coins(&mut self, amount: i64) -> bool {
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }

    /// Grant XP and apply any level-ups. Returns levels gained.
    pub fn add_xp(&mut self, amount: i64) -> i64 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= xp_for_level(self.level) {
            self.xp -= xp_for_level(self.level);
            self.level += 1;
            gained += 1;
        }
        gained
    }

    pub fn add_friendship(&mut self, npc: &str, amount: i64) {
        let entry = self.friendship.entry(npc.to_string()).or_insert(0);
        *entry = (*entry + amount).min(FRIENDSHIP_MAX);
    }

    pub fn friendship_with(&self, npc: &str) -> i64 {
        self.friendship.get(npc).copied().unwrap_or(0)
    }

    /// Index of the building whose footprint covers `(x, y)`.
    pub fn building_at(&self, x: i32, y: i32) -> Option<usize> {
        self.buildings.iter().position(|b| {
            catalog::building(&b.id).is_some_and(|def| {
                x >= b.tile_x
                    && x < b.tile_x + def.tile_w
                    && y >= b.tile_y
                    && y < b.tile_y + def.tile_h
            })
        })
    }

    pub fn crop_at(&self, x: i32, y: i32) -> Option<usize> {
        self.crops
            .iter()
            .position(|c| c.tile_x == x && c.tile_y == y)
    }
}

// ============================================================================
// CLOCK HELPERS
// ============================================================================

/// Wall-clock seconds since the epoch.
pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Calendar day number (days since epoch), for daily-task rollover.
pub fn epoch_day() -> i64 {
    (now_secs() / 86_400.0) as i64
}

// ============================================================================
// DEEP MERGE
// ============================================================================

/// Merge `overlay` into `base`, field by field: nested objects recurse,
/// arrays and scalars replace wholesale. Fields missing from the overlay
/// keep their defaults, which is how newer save fields acquire values
/// without discarding player progress.
fn deep_merge(base: &mut serde_json::Value, overlay: serde_json::Value) {
    use serde_json::Value;
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let nested = value.is_object()
                    && base_map.get(&key).is_some_and(|slot| slot.is_object());
                if nested {
                    if let Some(slot) = base_map.get_mut(&key) {
                        deep_merge(slot, value);
                    }
                } else {
                    base_map.insert(key, value);
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Parse raw save JSON and merge it over pristine defaults.
pub fn merge_into_defaults(raw: &str) -> Result<SaveData, String> {
    let overlay: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("parse save: {e}"))?;
    let mut base = serde_json::to_value(SaveData::default())
        .map_err(|e| format!("serialize defaults: {e}"))?;
    deep_merge(&mut base, overlay);
    let data: SaveData =
        serde_json::from_value(base).map_err(|e| format!("deserialize save: {e}"))?;
    if data.version > SAVE_VERSION {
        return Err(format!("save version {} > supported {SAVE_VERSION}", data.version));
    }
    Ok(data)
}

// ============================================================================
// SAVE PATH + IO
// ============================================================================

fn save_dir() -> Option<PathBuf> {
    let home = std::env::var("USERPROFILE")
        .or_else(|_| std::env::var("HOME"))
        .ok()?;
    let dir = PathBuf::from(home).join("Documents").join("Moonvale");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

fn save_path() -> Option<PathBuf> {
    save_dir().map(|d| d.join("save.json"))
}

/// Stamp the save time and write the blob to a specific path.
pub fn write_save_to(data: &mut SaveData, path: &std::path::Path) -> Result<(), String> {
    data.last_save_time = now_secs();
    let json = serde_json::to_string(data).map_err(|e| format!("serialize: {e}"))?;
    std::fs::write(path, json).map_err(|e| format!("write {}: {e}", path.display()))?;
    Ok(())
}

/// Write the blob to the default save location.
pub fn write_save(data: &mut SaveData) -> Result<(), String> {
    let path = save_path().ok_or("cannot determine save directory")?;
    write_save_to(data, &path)?;
    info!("Game saved to {}", path.display());
    Ok(())
}

/// Read and merge a save file. Errors describe the failing step.
pub fn read_save_from(path: &std::path::Path) -> Result<SaveData, String> {
    let raw =
        std::fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    merge_into_defaults(&raw)
}

/// Load the default save location, falling back to pristine defaults on any
/// failure. A missing file is a normal first launch, not an error.
pub fn load_or_default() -> SaveData {
    let Some(path) = save_path() else {
        warn!("No home directory; starting with a fresh save");
        return SaveData::default();
    };
    if !path.exists() {
        return SaveData::default();
    }
    match read_save_from(&path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Load failed ({e}); starting with a fresh save");
            SaveData::default()
        }
    }
}

/// Delete the save file and return pristine defaults.
pub fn reset_save() -> SaveData {
    if let Some(path) = save_path() {
        let _ = std::fs::remove_file(path);
    }
    SaveData::default()
}

// ============================================================================
// GRID RECONCILIATION
// ============================================================================

/// Rebuild the occupancy grid from a save blob.
///
/// Order matters: terrain and NPC footprints first, then buildings, then
/// crops, so dynamic placements are not clobbered by static regeneration.
pub fn rebuild_grid(save: &SaveData, grid: &mut WorldGrid) {
    grid.build_terrain(&catalog::npc_tiles());

    for b in &save.buildings {
        match catalog::building(&b.id) {
            Some(def) => grid.place_building(b.tile_x, b.tile_y, def.tile_w, def.tile_h),
            None => warn!("Save references unknown building '{}'; skipped", b.id),
        }
    }
    for c in &save.crops {
        grid.place_crop(c.tile_x, c.tile_y);
    }

    info!(
        "World rebuilt: {} buildings, {} crops replayed",
        save.buildings.len(),
        save.crops.len()
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Tile;

    #[test]
    fn defaults_are_a_playable_start() {
        let save = SaveData::default();
        assert_eq!(save.coins, 200);
        assert_eq!(save.level, 1);
        assert!(save.has_item("seed_wheat", 10));
        assert_eq!(save.quests_active, vec!["main_welcome".to_string()]);
        assert_eq!(save.friendship.len(), catalog::CHARACTERS.len());
    }

    #[test]
    fn inventory_helpers() {
        let mut save = SaveData::default();
        save.add_item("wheat", 3);
        assert!(save.has_item("wheat", 3));
        assert!(!save.remove_item("wheat", 4));
        assert!(save.remove_item("wheat", 3));
        // Emptied entries disappear entirely.
        assert!(!save.inventory.contains_key("wheat"));
    }

    #[test]
    fn coins_refuse_overdraft() {
        let mut save = SaveData::default();
        assert!(!save.spend_coins(201));
        assert_eq!(save.coins, 200);
        assert!(save.spend_coins(200));
        assert_eq!(save.coins, 0);
    }

    #[test]
    fn xp_levels_up_at_threshold() {
        let mut save = SaveData::default();
        assert_eq!(save.add_xp(99), 0);
        assert_eq!(save.level, 1);
        assert_eq!(save.add_xp(1), 1);
        assert_eq!(save.level, 2);
        assert_eq!(save.xp, 0);
        // Level 2 -> 3 needs 200; the leftover 250 is short of the 300 for 3 -> 4.
        assert_eq!(save.add_xp(450), 1);
        assert_eq!(save.level, 3);
        assert_eq!(save.xp, 250);
    }

    #[test]
    fn friendship_caps() {
        let mut save = SaveData::default();
        save.add_friendship("luna", 7);
        save.add_friendship("luna", 7);
        assert_eq!(save.friendship_with("luna"), FRIENDSHIP_MAX);
    }

    #[test]
    fn merge_scalar_and_nested() {
        let merged = merge_into_defaults(
            r#"{
                "coins": 999,
                "stats": { "fish_caught": 7 },
                "inventory": { "wood": 1 }
            }"#,
        )
        .unwrap();
        assert_eq!(merged.coins, 999);
        assert_eq!(merged.stats.fish_caught, 7);
        // Untouched nested fields keep defaults.
        assert_eq!(merged.stats.crops_harvested, 0);
        // Nested maps merge key-by-key: the default seeds survive.
        assert_eq!(merged.inventory.get("wood"), Some(&1));
        assert_eq!(merged.inventory.get("seed_wheat"), Some(&10));
        assert_eq!(merged.level, 1);
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let merged = merge_into_defaults(r#"{ "quests_active": ["main_fishing"] }"#).unwrap();
        assert_eq!(merged.quests_active, vec!["main_fishing".to_string()]);
    }

    #[test]
    fn merge_tolerates_unknown_fields() {
        let merged =
            merge_into_defaults(r#"{ "coins": 5, "some_future_field": { "x": 1 } }"#).unwrap();
        assert_eq!(merged.coins, 5);
    }

    #[test]
    fn merge_rejects_corrupt_json_and_newer_versions() {
        assert!(merge_into_defaults("{not json").is_err());
        assert!(merge_into_defaults(r#"{ "version": 99 }"#).is_err());
    }

    #[test]
    fn save_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut save = SaveData::default();
        save.coins = 1234;
        save.buildings.push(BuildingSave {
            id: "cottage".to_string(),
            tile_x: 5,
            tile_y: 5,
            level: 1,
        });
        write_save_to(&mut save, &path).unwrap();
        assert!(save.last_save_time > 0.0);

        let loaded = read_save_from(&path).unwrap();
        assert_eq!(loaded.coins, 1234);
        assert_eq!(loaded.buildings, save.buildings);
    }

    #[test]
    fn crop_due_times() {
        let crop = CropSave {
            tile_x: 3,
            tile_y: 16,
            kind: "wheat".to_string(),
            stage: 0,
            watered: false,
            planted_at: 100.0,
            grow_time: 30.0,
        };
        assert_eq!(crop.stage_len(), 10.0);
        assert_eq!(crop.next_due(), 110.0);
        assert!(!crop.ready());
    }

    #[test]
    fn rebuild_replays_buildings_then_crops() {
        let mut save = SaveData::default();
        save.buildings.push(BuildingSave {
            id: "cottage".to_string(),
            tile_x: 5,
            tile_y: 15,
            level: 1,
        });
        save.crops.push(CropSave {
            tile_x: 3,
            tile_y: 16,
            kind: "wheat".to_string(),
            stage: 1,
            watered: false,
            planted_at: 0.0,
            grow_time: 30.0,
        });

        let mut grid = WorldGrid::default();
        rebuild_grid(&save, &mut grid);

        // Cottage is 3x3 anchored at (5, 15), inside the farm zone.
        for dy in 0..3 {
            for dx in 0..3 {
                assert_eq!(grid.get(5 + dx, 15 + dy), Tile::Building);
            }
        }
        assert_eq!(grid.get(3, 16), Tile::Crop);

        // Nothing outside the replayed footprints differs from a bare rebuild.
        let mut bare = WorldGrid::default();
        bare.build_terrain(&catalog::npc_tiles());
        for y in 0..crate::constants::MAP_ROWS {
            for x in 0..crate::constants::MAP_COLS {
                let in_building =
                    (5..8).contains(&x) && (15..18).contains(&y);
                let is_crop = x == 3 && y == 16;
                if !in_building && !is_crop {
                    assert_eq!(grid.get(x, y), bare.get(x, y), "cell ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn building_footprint_lookup() {
        let mut save = SaveData::default();
        save.buildings.push(BuildingSave {
            id: "cottage".to_string(),
            tile_x: 5,
            tile_y: 5,
            level: 1,
        });
        assert_eq!(save.building_at(5, 5), Some(0));
        assert_eq!(save.building_at(7, 7), Some(0));
        assert_eq!(save.building_at(8, 5), None);
    }
}
