//! Farming systems - planting, watering, due-time growth, harvest.

use bevy::prelude::*;
use rand::Rng;

use crate::catalog::{self, ObjectiveKind};
use crate::constants::{HARVEST_MAX, HARVEST_MIN, HARVEST_XP, WATER_GROWTH_BONUS};
use crate::messages::{HarvestCropMsg, NoticeMsg, PlantCropMsg, ProgressMsg, WaterCropMsg};
use crate::resources::{EventLog, GameClock, LogKind, Profile};
use crate::save::CropSave;
use crate::world::{Tile, WorldGrid, Zone, zone_at};

/// Plant a seed on empty farm soil. Consumes the seed, records the crop in
/// the save list and marks the grid cell; the two always change together.
pub fn plant_system(
    mut requests: MessageReader<PlantCropMsg>,
    mut grid: ResMut<WorldGrid>,
    mut profile: ResMut<Profile>,
    clock: Res<GameClock>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for request in requests.read() {
        let (x, y) = (request.tile_x, request.tile_y);
        let Some((grows, grow_secs)) = catalog::seed(&request.seed) else {
            warn!("plant request with non-seed '{}'", request.seed);
            continue;
        };
        if zone_at(x, y) != Some(Zone::Farm) {
            notices.write(NoticeMsg::new("Crops only grow on farm soil!"));
            continue;
        }
        if grid.get(x, y) != Tile::Empty {
            notices.write(NoticeMsg::new("That spot is taken!"));
            continue;
        }
        if !profile.data.remove_item(&request.seed, 1) {
            notices.write(NoticeMsg::new("No seeds! Buy some at the shop"));
            continue;
        }

        profile.data.crops.push(CropSave {
            tile_x: x,
            tile_y: y,
            kind: grows.to_string(),
            stage: 0,
            watered: false,
            planted_at: clock.total_play,
            grow_time: grow_secs,
        });
        grid.place_crop(x, y);

        let name = catalog::item(grows).map(|d| d.name).unwrap_or(grows);
        notices.write(NoticeMsg::new(format!("Planted {name}!")));
    }
}

/// Water a growing crop: skips a quarter of the current stage. Watering a
/// ready or already-watered crop does nothing.
pub fn water_system(
    mut requests: MessageReader<WaterCropMsg>,
    mut profile: ResMut<Profile>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for request in requests.read() {
        let Some(idx) = profile.data.crop_at(request.tile_x, request.tile_y) else {
            continue;
        };
        let crop = &mut profile.data.crops[idx];
        if crop.ready() || crop.watered {
            continue;
        }
        crop.watered = true;
        // Pull the due time forward by shifting the planting instant.
        let boost = crop.stage_len() * WATER_GROWTH_BONUS;
        crop.planted_at -= boost;
        notices.write(NoticeMsg::new("Watered!"));
    }
}

/// Promote crop stages whose due time has passed. Stages are due-time
/// driven off the play clock; nothing mutates crops from timer callbacks.
pub fn growth_system(clock: Res<GameClock>, mut profile: ResMut<Profile>) {
    for crop in &mut profile.data.crops {
        while !crop.ready() && clock.total_play >= crop.next_due() {
            crop.stage += 1;
            crop.watered = false;
        }
    }
}

/// Harvest a ready crop: 1-3 produce, XP, quest progress, cell cleared.
pub fn harvest_system(
    mut requests: MessageReader<HarvestCropMsg>,
    mut grid: ResMut<WorldGrid>,
    mut profile: ResMut<Profile>,
    clock: Res<GameClock>,
    mut log: ResMut<EventLog>,
    mut progress: MessageWriter<ProgressMsg>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for request in requests.read() {
        let Some(idx) = profile.data.crop_at(request.tile_x, request.tile_y) else {
            continue;
        };
        if !profile.data.crops[idx].ready() {
            notices.write(NoticeMsg::new("Still growing..."));
            continue;
        }

        let crop = profile.data.crops.remove(idx);
        grid.remove_crop(crop.tile_x, crop.tile_y);

        let amount = rand::rng().random_range(HARVEST_MIN..=HARVEST_MAX);
        profile.data.add_item(&crop.kind, amount);
        profile.data.stats.crops_harvested += amount;
        if profile.data.add_xp(HARVEST_XP) > 0 {
            let level = profile.data.level;
            log.push(LogKind::LevelUp, &clock, format!("Reached level {level}"));
            notices.write(NoticeMsg::new(format!("Level up! Now level {level}")));
        }

        progress.write(ProgressMsg::new(ObjectiveKind::Harvest, crop.kind.clone()));
        progress.write(ProgressMsg::new(ObjectiveKind::Collect, crop.kind.clone()));

        let name = catalog::item(&crop.kind)
            .map(|d| d.name)
            .unwrap_or(crop.kind.as_str());
        notices.write(NoticeMsg::new(format!("Harvested {amount}x {name}!")));
    }
}
