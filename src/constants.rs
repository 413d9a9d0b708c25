//! Constants - Tuning parameters for the valley and arena simulations

// ============================================================================
// WORLD GRID
// ============================================================================

/// Tile edge length in world units.
pub const TILE_SIZE: f32 = 32.0;

/// Map dimensions in tiles.
pub const MAP_COLS: i32 = 50;
pub const MAP_ROWS: i32 = 40;

/// World dimensions in world units (1600 x 1280).
pub const WORLD_W: f32 = MAP_COLS as f32 * TILE_SIZE;
pub const WORLD_H: f32 = MAP_ROWS as f32 * TILE_SIZE;

/// Player spawn tile.
pub const PLAYER_START: (i32, i32) = (25, 20);

/// Avatar walk speed in world units per second.
pub const PLAYER_SPEED: f32 = 120.0;

/// Ring radius searched for a walkable fallback tile on tap-to-move.
pub const WALKABLE_SEARCH_RADIUS: i32 = 3;

// ============================================================================
// DAY / NIGHT CYCLE
// ============================================================================

/// One full in-game day in real seconds.
pub const DAY_SECONDS: f32 = 300.0;

/// Daily tasks drawn each morning.
pub const DAILY_TASK_COUNT: usize = 3;

// ============================================================================
// FARMING
// ============================================================================

/// Growth stages a crop passes through. Stage 3 = ready to harvest.
pub const CROP_STAGES: u8 = 3;

/// Fraction of the current stage skipped when a crop is watered.
pub const WATER_GROWTH_BONUS: f64 = 0.25;

/// Harvest yield range (inclusive).
pub const HARVEST_MIN: i64 = 1;
pub const HARVEST_MAX: i64 = 3;

/// XP granted per harvest and per mined ore.
pub const HARVEST_XP: i64 = 5;
pub const ORE_XP: i64 = 4;

// ============================================================================
// PROGRESSION
// ============================================================================

/// XP needed to advance from `level` to `level + 1`.
pub fn xp_for_level(level: i64) -> i64 {
    level * 100
}

/// Friendship hearts cap per NPC.
pub const FRIENDSHIP_MAX: i64 = 10;

/// Friendship gained from a favorite / ordinary gift.
pub const GIFT_FAVORITE_BONUS: i64 = 2;
pub const GIFT_BONUS: i64 = 1;

/// Friendship level required before a character quest unlocks.
pub const CHARACTER_QUEST_FRIENDSHIP: i64 = 3;

/// Chance for each forage table entry to turn up in one sweep.
pub const FORAGE_CHANCE: f64 = 0.3;

/// Coin refund fraction when demolishing a building.
pub const DEMOLISH_REFUND: f64 = 0.5;

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Real seconds between autosaves.
pub const AUTOSAVE_SECONDS: f32 = 30.0;

// ============================================================================
// ARENA
// ============================================================================

/// Arena playfield in world units (portrait phone layout).
pub const ARENA_W: f32 = 400.0;
pub const ARENA_H: f32 = 720.0;

/// Inset from the arena edge where enemies spawn and the player is clamped.
pub const ARENA_PAD: f32 = 40.0;

pub const ARENA_PLAYER_HP: f32 = 100.0;
pub const ARENA_PLAYER_SPEED: f32 = 150.0;

/// Seconds of invincibility after taking a hit.
pub const INVINCIBLE_SECONDS: f64 = 1.0;

/// Combo multiplier cap and decay window in seconds.
pub const COMBO_MAX: i64 = 5;
pub const COMBO_DECAY_SECONDS: f64 = 2.0;

/// Spell projectile lifetime in seconds.
pub const SPELL_LIFETIME: f64 = 2.0;

/// Collision radii for spell-vs-enemy and enemy-vs-player checks.
pub const SPELL_HIT_RADIUS: f32 = 18.0;
pub const PLAYER_HIT_RADIUS: f32 = 20.0;

/// Chance a kill drops a spell pickup, and how long it lingers.
pub const PICKUP_CHANCE: f64 = 0.15;
pub const PICKUP_LIFETIME: f64 = 10.0;
pub const PICKUP_RADIUS: f32 = 16.0;

/// Delay before the first wave and between waves.
pub const WAVE_FIRST_DELAY: f64 = 1.0;
pub const WAVE_BREATHER: f64 = 3.0;
