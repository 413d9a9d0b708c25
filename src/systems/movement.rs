//! Movement systems - tap-to-move resolution and path following.

use bevy::prelude::*;

use crate::constants::{PLAYER_SPEED, TILE_SIZE, WORLD_H, WORLD_W};
use crate::messages::MoveToMsg;
use crate::resources::Avatar;
use crate::world::WorldGrid;

/// Resolve move requests into a waypoint path.
///
/// The tapped point is clamped into the map and snapped to its tile. When
/// that tile is blocked, the move retargets to the nearest walkable tile
/// within the search radius, matching how taps on trees or water still walk
/// the avatar up to them. Unreachable targets cancel the move.
pub fn move_request_system(
    mut requests: MessageReader<MoveToMsg>,
    grid: Res<WorldGrid>,
    mut avatar: ResMut<Avatar>,
) {
    for request in requests.read() {
        let target = Vec2::new(
            request.target.x.clamp(TILE_SIZE, WORLD_W - TILE_SIZE),
            request.target.y.clamp(TILE_SIZE, WORLD_H - TILE_SIZE),
        );

        let (tx, ty) = grid.world_to_tile(target);
        let Some(goal) = grid.nearest_walkable(tx, ty) else {
            debug!("move request to ({tx}, {ty}) has no walkable tile nearby");
            avatar.path.clear();
            continue;
        };

        let from = grid.world_to_tile(avatar.pos);
        let Some(path) = grid.find_path(from, goal) else {
            debug!("no route from {from:?} to {goal:?}");
            avatar.path.clear();
            continue;
        };

        // Skip the tile the avatar already stands on.
        avatar.path = path
            .into_iter()
            .skip(1)
            .map(|(x, y)| grid.tile_to_world(x, y))
            .collect();
    }
}

/// Advance the avatar along its waypoint path at walking speed.
pub fn movement_system(time: Res<Time>, mut avatar: ResMut<Avatar>) {
    let mut budget = PLAYER_SPEED * time.delta_secs();
    while budget > 0.0 {
        let Some(&next) = avatar.path.first() else {
            break;
        };
        let to_next = next - avatar.pos;
        let dist = to_next.length();
        if dist <= budget {
            avatar.pos = next;
            avatar.path.remove(0);
            budget -= dist;
        } else {
            avatar.pos += to_next / dist * budget;
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Tile;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_message::<MoveToMsg>()
            .init_resource::<WorldGrid>()
            .init_resource::<Avatar>()
            .add_systems(Update, move_request_system);
        app
    }

    #[test]
    fn tap_resolves_to_path() {
        let mut app = test_app();
        {
            let mut grid = app.world_mut().resource_mut::<WorldGrid>();
            grid.build_terrain(&[]);
        }
        let avatar_pos = app.world().resource::<Avatar>().pos;
        let target = avatar_pos + Vec2::new(TILE_SIZE * 3.0, 0.0);
        app.world_mut().write_message(MoveToMsg { target });
        app.update();

        let avatar = app.world().resource::<Avatar>();
        assert!(avatar.moving());
        assert_eq!(*avatar.path.last().unwrap(), target);
    }

    #[test]
    fn tap_on_blocked_tile_walks_to_neighbor() {
        let mut app = test_app();
        let blocked = (28, 20);
        {
            let mut grid = app.world_mut().resource_mut::<WorldGrid>();
            grid.build_terrain(&[]);
            grid.set(blocked.0, blocked.1, Tile::Blocked);
        }
        let target = app
            .world()
            .resource::<WorldGrid>()
            .tile_to_world(blocked.0, blocked.1);
        app.world_mut().write_message(MoveToMsg { target });
        app.update();

        let avatar = app.world().resource::<Avatar>();
        assert!(avatar.moving());
        let grid = app.world().resource::<WorldGrid>();
        let end = grid.world_to_tile(*avatar.path.last().unwrap());
        assert_ne!(end, blocked);
        assert!(grid.is_walkable(end.0, end.1));
    }
}
