//! Gathering systems - foraging, fishing casts, mine rocks.
//! The timing/skill half of the minigames is presentation; only the loot
//! resolution lives here.

use bevy::prelude::*;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::{
    self, FISH_TABLE, FISH_TABLE_PERFECT, FORAGE_TABLE, ORE_TABLE, ObjectiveKind, weighted_pick,
};
use crate::constants::{FORAGE_CHANCE, ORE_XP};
use crate::messages::{CastLineMsg, ForageMsg, NoticeMsg, ProgressMsg, SmashRockMsg};
use crate::resources::{Avatar, Profile};
use crate::world::{Zone, WorldGrid, near_zone, zone_at};

/// Rummage the forest floor. Each table entry shows up independently; one of
/// the successes is picked at random. Often finds nothing.
pub fn forage_system(
    mut requests: MessageReader<ForageMsg>,
    grid: Res<WorldGrid>,
    avatar: Res<Avatar>,
    mut profile: ResMut<Profile>,
    mut progress: MessageWriter<ProgressMsg>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    let mut rng = rand::rng();
    for _ in requests.read() {
        let (x, y) = grid.world_to_tile(avatar.pos);
        if zone_at(x, y) != Some(Zone::Forest) {
            continue;
        }

        let found: Vec<_> = FORAGE_TABLE
            .iter()
            .copied()
            .filter(|_| rng.random_bool(FORAGE_CHANCE))
            .collect();
        let Some(&id) = found.choose(&mut rng) else {
            notices.write(NoticeMsg::new("Nothing here..."));
            continue;
        };

        profile.data.add_item(id, 1);
        progress.write(ProgressMsg::new(ObjectiveKind::Collect, id));
        let name = catalog::item(id).map(|d| d.name).unwrap_or(id);
        notices.write(NoticeMsg::new(format!("Found {name}!")));
    }
}

/// Resolve one fishing cast at the lake shore.
pub fn fishing_system(
    mut requests: MessageReader<CastLineMsg>,
    grid: Res<WorldGrid>,
    avatar: Res<Avatar>,
    mut profile: ResMut<Profile>,
    mut progress: MessageWriter<ProgressMsg>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    let mut rng = rand::rng();
    for request in requests.read() {
        let (x, y) = grid.world_to_tile(avatar.pos);
        if !near_zone(x, y, Zone::Lake, 2) {
            notices.write(NoticeMsg::new("There's no water to fish here"));
            continue;
        }

        let table = if request.perfect { FISH_TABLE_PERFECT } else { FISH_TABLE };
        let id = weighted_pick(table, &mut rng);
        profile.data.add_item(id, 1);
        profile.data.stats.fish_caught += 1;

        progress.write(ProgressMsg::new(ObjectiveKind::Fish, id));
        progress.write(ProgressMsg::new(ObjectiveKind::Collect, id));
        let name = catalog::item(id).map(|d| d.name).unwrap_or(id);
        notices.write(NoticeMsg::new(format!("Caught a {name}!")));
    }
}

/// Resolve one broken rock in the mine.
pub fn mining_system(
    mut requests: MessageReader<SmashRockMsg>,
    grid: Res<WorldGrid>,
    avatar: Res<Avatar>,
    mut profile: ResMut<Profile>,
    mut progress: MessageWriter<ProgressMsg>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    let mut rng = rand::rng();
    for _ in requests.read() {
        let (x, y) = grid.world_to_tile(avatar.pos);
        if zone_at(x, y) != Some(Zone::Mine) {
            continue;
        }

        let id = weighted_pick(ORE_TABLE, &mut rng);
        profile.data.add_item(id, 1);
        profile.data.stats.rocks_smashed += 1;
        profile.data.add_xp(ORE_XP);

        progress.write(ProgressMsg::new(ObjectiveKind::Mine, id));
        progress.write(ProgressMsg::new(ObjectiveKind::Collect, id));
        let name = catalog::item(id).map(|d| d.name).unwrap_or(id);
        notices.write(NoticeMsg::new(format!("Got {name}!")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_message::<ForageMsg>()
            .add_message::<CastLineMsg>()
            .add_message::<SmashRockMsg>()
            .add_message::<ProgressMsg>()
            .add_message::<NoticeMsg>()
            .init_resource::<WorldGrid>()
            .init_resource::<Avatar>()
            .init_resource::<Profile>()
            .add_systems(Update, (forage_system, fishing_system, mining_system));
        app.world_mut()
            .resource_mut::<WorldGrid>()
            .build_terrain(&[]);
        app
    }

    fn stand_at(app: &mut App, x: i32, y: i32) {
        let pos = app.world().resource::<WorldGrid>().tile_to_world(x, y);
        app.world_mut().resource_mut::<Avatar>().pos = pos;
    }

    #[test]
    fn fishing_requires_the_lake_shore() {
        let mut app = test_app();
        stand_at(&mut app, 25, 20); // village
        app.world_mut().write_message(CastLineMsg { perfect: false });
        app.update();
        assert_eq!(app.world().resource::<Profile>().data.stats.fish_caught, 0);

        stand_at(&mut app, 14, 29); // one tile above the lake zone
        app.world_mut().write_message(CastLineMsg { perfect: false });
        app.update();
        let profile = app.world().resource::<Profile>();
        assert_eq!(profile.data.stats.fish_caught, 1);
        // Exactly one fish of some kind landed in the inventory.
        let fish: i64 = FISH_TABLE
            .iter()
            .map(|(id, _)| profile.data.inventory.get(*id).copied().unwrap_or(0))
            .sum();
        assert_eq!(fish, 1);
    }

    #[test]
    fn mining_rolls_ore_and_xp() {
        let mut app = test_app();
        stand_at(&mut app, 5, 5); // mine zone
        for _ in 0..3 {
            app.world_mut().write_message(SmashRockMsg);
            app.update();
        }
        let profile = app.world().resource::<Profile>();
        assert_eq!(profile.data.stats.rocks_smashed, 3);
        assert_eq!(profile.data.xp, 3 * ORE_XP);
        let ores: i64 = ORE_TABLE
            .iter()
            .map(|(id, _)| profile.data.inventory.get(*id).copied().unwrap_or(0))
            .sum();
        // Default inventory already holds 15 stone.
        assert_eq!(ores, 15 + 3);
    }

    #[test]
    fn foraging_only_works_in_the_forest() {
        let mut app = test_app();
        stand_at(&mut app, 25, 20);
        let before = app.world().resource::<Profile>().data.inventory.clone();
        app.world_mut().write_message(ForageMsg);
        app.update();
        assert_eq!(app.world().resource::<Profile>().data.inventory, before);
    }
}
