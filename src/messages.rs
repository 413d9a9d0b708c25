//! ECS Messages - discrete player actions from the presentation layer, plus
//! the internal progress/notification traffic between systems.
//!
//! Each message is handled to completion within one update pass: no grid
//! write can interleave between a `can_place` check and its matching
//! `place_building` mutation.

use bevy::prelude::*;

use crate::catalog::ObjectiveKind;

// ============================================================================
// VALLEY ACTIONS
// ============================================================================

/// Tap-to-move request in world coordinates.
#[derive(Message, Clone)]
pub struct MoveToMsg {
    pub target: Vec2,
}

#[derive(Message, Clone)]
pub struct PlantCropMsg {
    pub tile_x: i32,
    pub tile_y: i32,
    pub seed: String,
}

#[derive(Message, Clone)]
pub struct WaterCropMsg {
    pub tile_x: i32,
    pub tile_y: i32,
}

#[derive(Message, Clone)]
pub struct HarvestCropMsg {
    pub tile_x: i32,
    pub tile_y: i32,
}

#[derive(Message, Clone)]
pub struct PlaceBuildingMsg {
    pub building: String,
    pub tile_x: i32,
    pub tile_y: i32,
}

#[derive(Message, Clone)]
pub struct DemolishBuildingMsg {
    pub tile_x: i32,
    pub tile_y: i32,
}

#[derive(Message, Clone)]
pub struct TalkMsg {
    pub npc: String,
}

#[derive(Message, Clone)]
pub struct GiftMsg {
    pub npc: String,
    pub item: String,
}

/// Rummage the forest floor around the avatar.
#[derive(Message, Clone)]
pub struct ForageMsg;

/// One fishing cast at the lake. `perfect` = the timing bar landed in the
/// sweet spot, shifting the odds toward rare fish.
#[derive(Message, Clone)]
pub struct CastLineMsg {
    pub perfect: bool,
}

/// One rock broken in the mine.
#[derive(Message, Clone)]
pub struct SmashRockMsg;

/// Craft a recipe at its station building.
#[derive(Message, Clone)]
pub struct CraftMsg {
    pub recipe: String,
}

#[derive(Message, Clone)]
pub struct BuyMsg {
    pub item: String,
    pub count: i64,
}

#[derive(Message, Clone)]
pub struct SellMsg {
    pub item: String,
    pub count: i64,
}

// ============================================================================
// ARENA ACTIONS
// ============================================================================

/// Fire the currently equipped spell.
#[derive(Message, Clone)]
pub struct CastSpellMsg;

// ============================================================================
// INTERNAL TRAFFIC
// ============================================================================

/// Emitted by action handlers whenever something quest-countable happened;
/// consumed by the quest/daily-task systems in the same update pass.
#[derive(Message, Clone)]
pub struct ProgressMsg {
    pub kind: ObjectiveKind,
    pub target: String,
}

impl ProgressMsg {
    pub fn new(kind: ObjectiveKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }
}

/// User-facing notification text. The presentation layer drains these.
#[derive(Message, Clone)]
pub struct NoticeMsg {
    pub text: String,
}

impl NoticeMsg {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
