//! ECS Components - arena entities (enemies, spell projectiles, pickups).
//! The valley has no per-entity state; its world lives in resources.

use bevy::prelude::*;

use crate::catalog::{EnemyKind, SpellKind};

/// Position in arena space. There is no transform hierarchy or renderer;
/// plain coordinates are all the simulation needs.
#[derive(Component, Clone, Copy, Debug)]
pub struct Pos(pub Vec2);

#[derive(Component, Clone, Copy, Debug)]
pub struct Hp(pub f32);

#[derive(Component, Clone, Copy, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
}

/// A spell projectile in flight.
#[derive(Component, Clone, Copy, Debug)]
pub struct Spell {
    pub kind: SpellKind,
    pub vel: Vec2,
    /// Run-clock instant the projectile fizzles.
    pub expires_at: f64,
}

/// A dropped spell pickup.
#[derive(Component, Clone, Copy, Debug)]
pub struct Pickup {
    pub spell: SpellKind,
    pub expires_at: f64,
}

/// Marks an enemy killed this frame; scoring and despawn happen in the
/// death system after all hits are applied.
#[derive(Component)]
pub struct Dead;
