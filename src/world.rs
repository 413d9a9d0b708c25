//! World Grid - tile occupancy index for the valley map.
//! Terrain classification, walkability / placement queries, coordinate
//! transforms, and tap-to-move path resolution.

use bevy::prelude::*;

use crate::constants::{MAP_COLS, MAP_ROWS, TILE_SIZE, WALKABLE_SEARCH_RADIUS};

// ============================================================================
// TILES
// ============================================================================

/// Occupancy tag for one grid cell.
///
/// Terrain tags (`Water`, `Blocked`, `Path`) are written once at world-build
/// time and never touched by gameplay; planting/building only ever toggles a
/// cell between `Empty` and `Crop`/`Building`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tile {
    #[default]
    Empty,
    Blocked,
    Building,
    Crop,
    Water,
    Path,
}

impl Tile {
    /// True if the avatar may stand on / move through this cell.
    pub fn walkable(self) -> bool {
        matches!(self, Tile::Empty | Tile::Crop | Tile::Path)
    }

    /// True if a building or crop footprint may cover this cell.
    pub fn placeable(self) -> bool {
        matches!(self, Tile::Empty | Tile::Path)
    }
}

// ============================================================================
// ZONES
// ============================================================================

/// Named map regions. Terrain is derived from these rectangles alone, so the
/// classification is reproducible on every load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Village,
    Farm,
    Forest,
    Mine,
    Lake,
}

/// Zone bounds in tile coordinates.
#[derive(Clone, Copy, Debug)]
pub struct ZoneRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ZoneRect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

pub const ZONES: [(Zone, ZoneRect); 5] = [
    (Zone::Village, ZoneRect { x: 18, y: 14, w: 14, h: 12 }),
    (Zone::Farm, ZoneRect { x: 2, y: 14, w: 14, h: 14 }),
    (Zone::Forest, ZoneRect { x: 33, y: 2, w: 15, h: 18 }),
    (Zone::Mine, ZoneRect { x: 2, y: 2, w: 14, h: 10 }),
    (Zone::Lake, ZoneRect { x: 14, y: 30, w: 22, h: 9 }),
];

impl Zone {
    pub fn rect(self) -> ZoneRect {
        ZONES
            .iter()
            .find(|(z, _)| *z == self)
            .map(|(_, r)| *r)
            .unwrap_or(ZoneRect { x: 0, y: 0, w: 0, h: 0 })
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Village => "Village Center",
            Zone::Farm => "Farm",
            Zone::Forest => "Enchanted Forest",
            Zone::Mine => "Crystal Mine",
            Zone::Lake => "Moonlight Lake",
        }
    }
}

/// Which named zone a tile belongs to, if any.
pub fn zone_at(x: i32, y: i32) -> Option<Zone> {
    ZONES
        .iter()
        .find(|(_, r)| r.contains(x, y))
        .map(|(z, _)| *z)
}

/// True if the tile is inside `zone` grown by `range` tiles on every side.
/// Used for "stand at the lake shore" style proximity checks.
pub fn near_zone(x: i32, y: i32, zone: Zone, range: i32) -> bool {
    let r = zone.rect();
    x >= r.x - range && x < r.x + r.w + range && y >= r.y - range && y < r.y + r.h + range
}

// ============================================================================
// TERRAIN CLASSIFICATION
// ============================================================================

/// Static terrain tag for a tile, computed from the zone rules alone.
///
/// Pure in `(x, y)`: no randomness and no history, so replaying it on load
/// reproduces the exact same map before dynamic placements go back on top.
pub fn terrain_tile(x: i32, y: i32) -> Tile {
    // Lake: organic shape via normalized distance from the zone center.
    let lz = Zone::Lake.rect();
    if lz.contains(x, y) {
        let cx = lz.x as f32 + lz.w as f32 / 2.0;
        let cy = lz.y as f32 + lz.h as f32 / 2.0;
        let dx = (x as f32 - cx) / (lz.w as f32 / 2.0);
        let dy = (y as f32 - cy) / (lz.h as f32 / 2.0);
        if dx * dx + dy * dy < 0.7 {
            return Tile::Water;
        }
        // Sand ring stays walkable.
    }

    // Mine: scattered rock outcrops.
    let mz = Zone::Mine.rect();
    if mz.contains(x, y) {
        if (x + y) % 7 == 0 || (x * y + x) % 11 == 0 {
            return Tile::Blocked;
        }
        return Tile::Empty;
    }

    // Farm: open soil.
    if Zone::Farm.rect().contains(x, y) {
        return Tile::Empty;
    }

    // Forest: tree density from a fixed hash-like rule.
    let fz = Zone::Forest.rect();
    if fz.contains(x, y) {
        if (x * 7 + y * 13) % 5 == 0 {
            return Tile::Blocked;
        }
        return Tile::Empty;
    }

    // Village: main cross streets plus the central plaza.
    let vz = Zone::Village.rect();
    if vz.contains(x, y) {
        if x == vz.x + vz.w / 2 || y == vz.y + vz.h / 2 {
            return Tile::Path;
        }
        if (x - (vz.x + vz.w / 2)).abs() <= 2 && (y - (vz.y + vz.h / 2)).abs() <= 2 {
            return Tile::Path;
        }
        return Tile::Empty;
    }

    // Connecting paths between zones.
    if y == 20 && (16..35).contains(&x) {
        return Tile::Path;
    }
    if x == 25 && (12..32).contains(&y) {
        return Tile::Path;
    }
    if x == 16 && (4..20).contains(&y) {
        return Tile::Path;
    }
    if y == 12 && (25..35).contains(&x) {
        return Tile::Path;
    }

    Tile::Empty
}

// ============================================================================
// WORLD GRID
// ============================================================================

/// Tile-occupancy index for the whole map.
///
/// Fixed 50x40, rebuilt from terrain rules + save data at session start and
/// mutated only by synchronous player actions afterwards.
#[derive(Resource)]
pub struct WorldGrid {
    tiles: Vec<Tile>,
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self {
            tiles: vec![Tile::Empty; (MAP_COLS * MAP_ROWS) as usize],
        }
    }
}

impl WorldGrid {
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < MAP_COLS && y >= 0 && y < MAP_ROWS
    }

    /// Write a tag. Out-of-bounds writes are silently ignored; callers
    /// routinely iterate a little past the map edge.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[(y * MAP_COLS + x) as usize] = tile;
        }
    }

    /// Read a tag. Everything outside the map reads as `Blocked`, so
    /// out-of-bounds is impassable and unplaceable without a special case.
    pub fn get(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[(y * MAP_COLS + x) as usize]
        } else {
            Tile::Blocked
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).walkable()
    }

    /// True if every cell of the `w x h` footprint anchored at `(x, y)` can
    /// take a placement. Checked by callers before `place_building`.
    pub fn can_place(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        for dy in 0..h {
            for dx in 0..w {
                if !self.get(x + dx, y + dy).placeable() {
                    return false;
                }
            }
        }
        true
    }

    /// Mark a footprint as occupied by a building. Does not re-validate;
    /// the single-writer action loop guarantees `can_place` still holds.
    pub fn place_building(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.fill(x, y, w, h, Tile::Building);
    }

    pub fn remove_building(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.fill(x, y, w, h, Tile::Empty);
    }

    pub fn place_crop(&mut self, x: i32, y: i32) {
        self.set(x, y, Tile::Crop);
    }

    pub fn remove_crop(&mut self, x: i32, y: i32) {
        self.set(x, y, Tile::Empty);
    }

    fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, tile: Tile) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, tile);
            }
        }
    }

    /// Tile coords -> world position (center of the cell).
    pub fn tile_to_world(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            x as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            y as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }

    /// World position -> tile coords (floored quotient).
    pub fn world_to_tile(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / TILE_SIZE).floor() as i32,
            (pos.y / TILE_SIZE).floor() as i32,
        )
    }

    /// Regenerate static terrain for every cell, then block the fixed NPC
    /// footprints. Must run before dynamic placements are replayed so they
    /// are not clobbered.
    pub fn build_terrain(&mut self, npc_tiles: &[(i32, i32)]) {
        for y in 0..MAP_ROWS {
            for x in 0..MAP_COLS {
                self.set(x, y, terrain_tile(x, y));
            }
        }
        for &(x, y) in npc_tiles {
            self.set(x, y, Tile::Blocked);
        }
    }

    /// Nearest walkable tile to `(x, y)`, scanning outward ring by ring up
    /// to the search radius. Returns the tile itself when already walkable.
    pub fn nearest_walkable(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if self.is_walkable(x, y) {
            return Some((x, y));
        }
        for r in 1..=WALKABLE_SEARCH_RADIUS {
            for dy in -r..=r {
                for dx in -r..=r {
                    if self.is_walkable(x + dx, y + dy) {
                        return Some((x + dx, y + dy));
                    }
                }
            }
        }
        None
    }

    /// A* route over walkable cells (4-connected, unit cost). `None` when the
    /// target is unreachable or not walkable.
    pub fn find_path(&self, from: (i32, i32), to: (i32, i32)) -> Option<Vec<(i32, i32)>> {
        use pathfinding::prelude::astar;

        if !self.is_walkable(to.0, to.1) {
            return None;
        }
        let result = astar(
            &from,
            |&(x, y)| {
                [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                    .into_iter()
                    .filter(|&(nx, ny)| self.is_walkable(nx, ny))
                    .map(|p| (p, 1u32))
                    .collect::<Vec<_>>()
            },
            |&(x, y)| ((x - to.0).abs() + (y - to.1).abs()) as u32,
            |&p| p == to,
        );
        result.map(|(path, _)| path)
    }
}

// ============================================================================
// TESTS
// ============================================================================
