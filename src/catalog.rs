//! Catalog - closed, typed definition tables for items, recipes, buildings,
//! characters, quests, daily tasks, waves, spells, and enemies.
//!
//! Every id used anywhere in the tables is cross-checked once at startup by
//! [`validate`], so gameplay lookups can trust the data instead of littering
//! optional-chaining fallbacks through the session code.

use std::sync::LazyLock;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::world::Zone;

pub type ItemId = &'static str;
pub type NpcId = &'static str;
pub type QuestId = &'static str;
pub type BuildingId = &'static str;

// ============================================================================
// ITEMS
// ============================================================================

/// Item category, one variant per kind of thing the valley produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemKind {
    /// Plantable. `grows` is the produce item, `grow_secs` full growth time.
    Seed { grows: ItemId, grow_secs: f32 },
    Crop,
    Fish,
    Ore,
    Gem,
    Material,
    Food,
    Gift,
    Tool,
}

pub struct ItemDef {
    pub id: ItemId,
    pub name: &'static str,
    pub kind: ItemKind,
    /// Base sell value in coins.
    pub value: i64,
}

pub const ITEMS: &[ItemDef] = &[
    // Seeds
    ItemDef { id: "seed_wheat", name: "Wheat Seeds", kind: ItemKind::Seed { grows: "wheat", grow_secs: 30.0 }, value: 5 },
    ItemDef { id: "seed_carrot", name: "Carrot Seeds", kind: ItemKind::Seed { grows: "carrot", grow_secs: 45.0 }, value: 8 },
    ItemDef { id: "seed_pumpkin", name: "Pumpkin Seeds", kind: ItemKind::Seed { grows: "pumpkin", grow_secs: 60.0 }, value: 15 },
    ItemDef { id: "seed_starberry", name: "Starberry Seeds", kind: ItemKind::Seed { grows: "starberry", grow_secs: 90.0 }, value: 25 },
    ItemDef { id: "seed_moonflower", name: "Moonflower Seeds", kind: ItemKind::Seed { grows: "moonflower", grow_secs: 120.0 }, value: 40 },
    // Crops
    ItemDef { id: "wheat", name: "Wheat", kind: ItemKind::Crop, value: 12 },
    ItemDef { id: "carrot", name: "Carrot", kind: ItemKind::Crop, value: 18 },
    ItemDef { id: "pumpkin", name: "Pumpkin", kind: ItemKind::Crop, value: 30 },
    ItemDef { id: "starberry", name: "Starberry", kind: ItemKind::Crop, value: 50 },
    ItemDef { id: "moonflower", name: "Moonflower", kind: ItemKind::Crop, value: 80 },
    // Fish
    ItemDef { id: "fish_common", name: "Silverscale", kind: ItemKind::Fish, value: 15 },
    ItemDef { id: "fish_bass", name: "Valley Bass", kind: ItemKind::Fish, value: 25 },
    ItemDef { id: "fish_golden", name: "Golden Koi", kind: ItemKind::Fish, value: 60 },
    ItemDef { id: "fish_rainbow", name: "Rainbow Trout", kind: ItemKind::Fish, value: 100 },
    ItemDef { id: "fish_shimmer", name: "Shimmer-Fin", kind: ItemKind::Fish, value: 250 },
    // Ores & gems
    ItemDef { id: "stone", name: "Stone", kind: ItemKind::Ore, value: 3 },
    ItemDef { id: "iron", name: "Iron Ore", kind: ItemKind::Ore, value: 10 },
    ItemDef { id: "crystal", name: "Crystal", kind: ItemKind::Gem, value: 50 },
    ItemDef { id: "amethyst", name: "Amethyst", kind: ItemKind::Gem, value: 80 },
    ItemDef { id: "ruby", name: "Ruby", kind: ItemKind::Gem, value: 120 },
    // Materials / foraged
    ItemDef { id: "wood", name: "Wood", kind: ItemKind::Material, value: 3 },
    ItemDef { id: "mushroom", name: "Forest Mushroom", kind: ItemKind::Material, value: 8 },
    ItemDef { id: "herb", name: "Healing Herb", kind: ItemKind::Material, value: 12 },
    ItemDef { id: "berry", name: "Wild Berry", kind: ItemKind::Material, value: 6 },
    // Cooked / crafted
    ItemDef { id: "food_bread", name: "Fresh Bread", kind: ItemKind::Food, value: 20 },
    ItemDef { id: "food_pie", name: "Berry Pie", kind: ItemKind::Food, value: 45 },
    ItemDef { id: "food_stew", name: "Hearty Stew", kind: ItemKind::Food, value: 55 },
    ItemDef { id: "potion_heal", name: "Healing Potion", kind: ItemKind::Food, value: 35 },
    // Special
    ItemDef { id: "book", name: "Ancient Tome", kind: ItemKind::Gift, value: 100 },
    ItemDef { id: "dreamlight", name: "Dreamlight Shard", kind: ItemKind::Gem, value: 200 },
];

static ITEM_INDEX: LazyLock<HashMap<&'static str, &'static ItemDef>> =
    LazyLock::new(|| ITEMS.iter().map(|d| (d.id, d)).collect());

/// Item lookup by id.
pub fn item(id: &str) -> Option<&'static ItemDef> {
    ITEM_INDEX.get(id).copied()
}

/// Seed lookup: produce id + full growth time, `None` for non-seeds.
pub fn seed(id: &str) -> Option<(ItemId, f32)> {
    match item(id)?.kind {
        ItemKind::Seed { grows, grow_secs } => Some((grows, grow_secs)),
        _ => None,
    }
}

// ============================================================================
// SHOP
// ============================================================================

pub struct ShopEntry {
    pub item: ItemId,
    pub price: i64,
    pub stock: i64,
}

pub const SHOP: &[ShopEntry] = &[
    ShopEntry { item: "seed_wheat", price: 10, stock: 99 },
    ShopEntry { item: "seed_carrot", price: 15, stock: 99 },
    ShopEntry { item: "seed_pumpkin", price: 30, stock: 99 },
    ShopEntry { item: "seed_starberry", price: 50, stock: 10 },
    ShopEntry { item: "seed_moonflower", price: 80, stock: 5 },
    ShopEntry { item: "wood", price: 5, stock: 99 },
    ShopEntry { item: "stone", price: 5, stock: 99 },
];

/// Shop price for an item, `None` if the shop does not sell it.
pub fn shop_price(id: &str) -> Option<i64> {
    SHOP.iter().find(|e| e.item == id).map(|e| e.price)
}

// ============================================================================
// RECIPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Station {
    Bakery,
    Blacksmith,
}

pub struct RecipeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub station: Station,
    pub ingredients: &'static [(ItemId, i64)],
    pub result: (ItemId, i64),
    /// NPC whose friendship gates this recipe, and the level required.
    pub unlock: (NpcId, i64),
}

pub const RECIPES: &[RecipeDef] = &[
    RecipeDef {
        id: "food_bread", name: "Fresh Bread", station: Station::Bakery,
        ingredients: &[("wheat", 3)], result: ("food_bread", 1), unlock: ("ember", 0),
    },
    RecipeDef {
        id: "food_pie", name: "Berry Pie", station: Station::Bakery,
        ingredients: &[("wheat", 2), ("berry", 3)], result: ("food_pie", 1), unlock: ("ember", 3),
    },
    RecipeDef {
        id: "food_stew", name: "Hearty Stew", station: Station::Bakery,
        ingredients: &[("carrot", 2), ("mushroom", 2), ("herb", 1)], result: ("food_stew", 1), unlock: ("ember", 6),
    },
    RecipeDef {
        id: "potion_heal", name: "Healing Potion", station: Station::Blacksmith,
        ingredients: &[("herb", 3), ("moonflower", 1)], result: ("potion_heal", 1), unlock: ("luna", 3),
    },
    RecipeDef {
        id: "iron_refined", name: "Refined Iron", station: Station::Blacksmith,
        ingredients: &[("iron", 3), ("stone", 2)], result: ("iron", 5), unlock: ("flint", 0),
    },
];

pub fn recipe(id: &str) -> Option<&'static RecipeDef> {
    RECIPES.iter().find(|r| r.id == id)
}

// ============================================================================
// BUILDINGS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildingCategory {
    House,
    Shop,
    Decoration,
}

/// One upgrade tier: coin cost plus material costs.
pub struct BuildingLevel {
    pub coins: i64,
    pub materials: &'static [(ItemId, i64)],
    pub bonus: &'static str,
}

pub struct BuildingDef {
    pub id: BuildingId,
    pub name: &'static str,
    pub category: BuildingCategory,
    pub tile_w: i32,
    pub tile_h: i32,
    pub levels: [BuildingLevel; 3],
}

pub const BUILDINGS: &[BuildingDef] = &[
    BuildingDef {
        id: "cottage", name: "Cottage", category: BuildingCategory::House, tile_w: 3, tile_h: 3,
        levels: [
            BuildingLevel { coins: 100, materials: &[("wood", 10), ("stone", 5)], bonus: "Attracts visitors" },
            BuildingLevel { coins: 300, materials: &[("wood", 20), ("stone", 15), ("iron", 5)], bonus: "Daily coin income +5" },
            BuildingLevel { coins: 800, materials: &[("wood", 40), ("stone", 30), ("crystal", 5)], bonus: "Daily coin income +15" },
        ],
    },
    BuildingDef {
        id: "bakery", name: "Bakery", category: BuildingCategory::Shop, tile_w: 3, tile_h: 3,
        levels: [
            BuildingLevel { coins: 200, materials: &[("wood", 15), ("stone", 10)], bonus: "Unlock baking recipes" },
            BuildingLevel { coins: 500, materials: &[("wood", 30), ("stone", 20), ("iron", 10)], bonus: "Faster baking" },
            BuildingLevel { coins: 1200, materials: &[("wood", 50), ("stone", 40), ("crystal", 10)], bonus: "Rare recipes unlocked" },
        ],
    },
    BuildingDef {
        id: "library", name: "Library", category: BuildingCategory::Shop, tile_w: 3, tile_h: 3,
        levels: [
            BuildingLevel { coins: 250, materials: &[("wood", 20), ("stone", 15)], bonus: "Unlock enchantments" },
            BuildingLevel { coins: 600, materials: &[("wood", 35), ("stone", 30), ("crystal", 5)], bonus: "XP boost +10%" },
            BuildingLevel { coins: 1500, materials: &[("wood", 60), ("stone", 50), ("crystal", 15)], bonus: "XP boost +25%" },
        ],
    },
    BuildingDef {
        id: "blacksmith", name: "Blacksmith", category: BuildingCategory::Shop, tile_w: 3, tile_h: 2,
        levels: [
            BuildingLevel { coins: 300, materials: &[("wood", 10), ("stone", 20), ("iron", 10)], bonus: "Unlock crafting" },
            BuildingLevel { coins: 700, materials: &[("wood", 20), ("stone", 40), ("iron", 25)], bonus: "Better tools" },
            BuildingLevel { coins: 1800, materials: &[("wood", 40), ("stone", 60), ("iron", 50), ("crystal", 10)], bonus: "Master crafting" },
        ],
    },
    BuildingDef {
        id: "garden_arch", name: "Garden Arch", category: BuildingCategory::Decoration, tile_w: 2, tile_h: 1,
        levels: [
            BuildingLevel { coins: 50, materials: &[("wood", 5)], bonus: "Beauty +2" },
            BuildingLevel { coins: 150, materials: &[("wood", 10), ("iron", 3)], bonus: "Beauty +5" },
            BuildingLevel { coins: 400, materials: &[("wood", 20), ("crystal", 3)], bonus: "Beauty +10" },
        ],
    },
    BuildingDef {
        id: "fountain", name: "Fountain", category: BuildingCategory::Decoration, tile_w: 2, tile_h: 2,
        levels: [
            BuildingLevel { coins: 150, materials: &[("stone", 15)], bonus: "Beauty +5" },
            BuildingLevel { coins: 400, materials: &[("stone", 30), ("iron", 10)], bonus: "Beauty +10, daily gems" },
            BuildingLevel { coins: 1000, materials: &[("stone", 50), ("crystal", 10)], bonus: "Beauty +20, wish coins" },
        ],
    },
    BuildingDef {
        id: "lamp_post", name: "Lamp Post", category: BuildingCategory::Decoration, tile_w: 1, tile_h: 1,
        levels: [
            BuildingLevel { coins: 30, materials: &[("iron", 3)], bonus: "Light radius 3" },
            BuildingLevel { coins: 80, materials: &[("iron", 8), ("crystal", 1)], bonus: "Light radius 5" },
            BuildingLevel { coins: 200, materials: &[("iron", 15), ("crystal", 5)], bonus: "Light radius 8, sparkles" },
        ],
    },
    BuildingDef {
        id: "flower_bed", name: "Flower Bed", category: BuildingCategory::Decoration, tile_w: 2, tile_h: 1,
        levels: [
            BuildingLevel { coins: 25, materials: &[("wood", 3)], bonus: "Beauty +1" },
            BuildingLevel { coins: 60, materials: &[("wood", 6)], bonus: "Beauty +3" },
            BuildingLevel { coins: 150, materials: &[("wood", 12), ("crystal", 2)], bonus: "Beauty +6, butterflies" },
        ],
    },
    BuildingDef {
        id: "fence", name: "Fence", category: BuildingCategory::Decoration, tile_w: 1, tile_h: 1,
        levels: [
            BuildingLevel { coins: 10, materials: &[("wood", 2)], bonus: "" },
            BuildingLevel { coins: 30, materials: &[("wood", 5), ("iron", 1)], bonus: "Sturdier look" },
            BuildingLevel { coins: 80, materials: &[("wood", 10), ("iron", 5)], bonus: "Ornamental" },
        ],
    },
    BuildingDef {
        id: "well", name: "Wishing Well", category: BuildingCategory::Decoration, tile_w: 1, tile_h: 1,
        levels: [
            BuildingLevel { coins: 100, materials: &[("stone", 10)], bonus: "Daily wish" },
            BuildingLevel { coins: 300, materials: &[("stone", 25), ("iron", 5)], bonus: "Better wishes" },
            BuildingLevel { coins: 800, materials: &[("stone", 50), ("crystal", 10)], bonus: "Legendary wishes" },
        ],
    },
];

static BUILDING_INDEX: LazyLock<HashMap<&'static str, &'static BuildingDef>> =
    LazyLock::new(|| BUILDINGS.iter().map(|d| (d.id, d)).collect());

pub fn building(id: &str) -> Option<&'static BuildingDef> {
    BUILDING_INDEX.get(id).copied()
}

// ============================================================================
// CHARACTERS
// ============================================================================

pub struct CharacterDef {
    pub id: NpcId,
    pub name: &'static str,
    pub title: &'static str,
    /// Fixed tile, permanently blocked on the grid.
    pub tile: (i32, i32),
    pub zone: Zone,
    /// Favorite gifts (double friendship).
    pub gifts: [ItemId; 3],
}

pub const CHARACTERS: &[CharacterDef] = &[
    CharacterDef { id: "luna", name: "Luna", title: "Moonlight Fairy", tile: (24, 17), zone: Zone::Village, gifts: ["moonflower", "crystal", "starberry"] },
    CharacterDef { id: "bramble", name: "Bramble", title: "Forest Gnome", tile: (8, 18), zone: Zone::Farm, gifts: ["pumpkin", "wheat", "carrot"] },
    CharacterDef { id: "ember", name: "Ember", title: "Fire Spirit", tile: (22, 15), zone: Zone::Village, gifts: ["wheat", "starberry", "iron"] },
    CharacterDef { id: "coral", name: "Coral", title: "Water Nymph", tile: (25, 33), zone: Zone::Lake, gifts: ["moonflower", "crystal", "fish_rainbow"] },
    CharacterDef { id: "flint", name: "Flint", title: "Dwarf Miner", tile: (8, 6), zone: Zone::Mine, gifts: ["iron", "stone", "food_pie"] },
    CharacterDef { id: "sage", name: "Sage", title: "Owl Wizard", tile: (28, 19), zone: Zone::Village, gifts: ["crystal", "moonflower", "book"] },
    CharacterDef { id: "willow", name: "Willow", title: "Elf Ranger", tile: (40, 10), zone: Zone::Forest, gifts: ["wood", "herb", "starberry"] },
    CharacterDef { id: "pip", name: "Pip", title: "Mushroom Sprite", tile: (37, 14), zone: Zone::Forest, gifts: ["mushroom", "herb", "carrot"] },
];

pub fn character(id: &str) -> Option<&'static CharacterDef> {
    CHARACTERS.iter().find(|c| c.id == id)
}

/// All fixed NPC tiles, for terrain rebuild.
pub fn npc_tiles() -> Vec<(i32, i32)> {
    CHARACTERS.iter().map(|c| c.tile).collect()
}

// ============================================================================
// QUESTS
// ============================================================================

/// What a quest objective counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Talk,
    Harvest,
    Build,
    Fish,
    Mine,
    Collect,
}

pub struct Objective {
    pub kind: ObjectiveKind,
    /// Specific id, or "any".
    pub target: &'static str,
    pub count: i64,
    pub text: &'static str,
}

pub struct Reward {
    pub coins: i64,
    pub items: &'static [(ItemId, i64)],
    pub friendship: &'static [(NpcId, i64)],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestKind {
    Main,
    Character,
}

pub struct QuestDef {
    pub id: QuestId,
    pub kind: QuestKind,
    /// Character quests: the NPC who offers it.
    pub character: Option<NpcId>,
    pub friendship_req: i64,
    pub title: &'static str,
    pub description: &'static str,
    pub objectives: &'static [Objective],
    pub reward: Reward,
    pub next: Option<QuestId>,
}

pub const QUESTS: &[QuestDef] = &[
    QuestDef {
        id: "main_welcome", kind: QuestKind::Main, character: None, friendship_req: 0,
        title: "Welcome to the Valley",
        description: "Talk to Luna to learn about the valley.",
        objectives: &[Objective { kind: ObjectiveKind::Talk, target: "luna", count: 1, text: "Talk to Luna" }],
        reward: Reward { coins: 50, items: &[("seed_wheat", 5)], friendship: &[] },
        next: Some("main_first_crop"),
    },
    QuestDef {
        id: "main_first_crop", kind: QuestKind::Main, character: None, friendship_req: 0,
        title: "Green Thumb",
        description: "Plant and harvest your first crop.",
        objectives: &[Objective { kind: ObjectiveKind::Harvest, target: "any", count: 1, text: "Harvest a crop" }],
        reward: Reward { coins: 100, items: &[("seed_carrot", 5)], friendship: &[] },
        next: Some("main_meet_all"),
    },
    QuestDef {
        id: "main_meet_all", kind: QuestKind::Main, character: None, friendship_req: 0,
        title: "Meet the Neighbors",
        description: "Introduce yourself to all valley residents.",
        objectives: &[
            Objective { kind: ObjectiveKind::Talk, target: "bramble", count: 1, text: "Talk to Bramble" },
            Objective { kind: ObjectiveKind::Talk, target: "ember", count: 1, text: "Talk to Ember" },
            Objective { kind: ObjectiveKind::Talk, target: "coral", count: 1, text: "Talk to Coral" },
            Objective { kind: ObjectiveKind::Talk, target: "flint", count: 1, text: "Talk to Flint" },
            Objective { kind: ObjectiveKind::Talk, target: "sage", count: 1, text: "Talk to Sage" },
        ],
        reward: Reward { coins: 200, items: &[("wood", 20), ("stone", 15)], friendship: &[] },
        next: Some("main_first_building"),
    },
    QuestDef {
        id: "main_first_building", kind: QuestKind::Main, character: None, friendship_req: 0,
        title: "Home Sweet Home",
        description: "Build your first cottage in the village.",
        objectives: &[Objective { kind: ObjectiveKind::Build, target: "cottage", count: 1, text: "Build a Cottage" }],
        reward: Reward { coins: 300, items: &[("iron", 10)], friendship: &[] },
        next: Some("main_fishing"),
    },
    QuestDef {
        id: "main_fishing", kind: QuestKind::Main, character: None, friendship_req: 0,
        title: "Gone Fishing",
        description: "Visit Coral at the lake and catch your first fish.",
        objectives: &[
            Objective { kind: ObjectiveKind::Talk, target: "coral", count: 1, text: "Talk to Coral" },
            Objective { kind: ObjectiveKind::Fish, target: "any", count: 1, text: "Catch a fish" },
        ],
        reward: Reward { coins: 150, items: &[("seed_starberry", 3)], friendship: &[] },
        next: Some("main_mining"),
    },
    QuestDef {
        id: "main_mining", kind: QuestKind::Main, character: None, friendship_req: 0,
        title: "Dig Deep",
        description: "Visit Flint at the mine and gather some ore.",
        objectives: &[
            Objective { kind: ObjectiveKind::Talk, target: "flint", count: 1, text: "Talk to Flint" },
            Objective { kind: ObjectiveKind::Mine, target: "any", count: 3, text: "Mine 3 rocks" },
        ],
        reward: Reward { coins: 200, items: &[("crystal", 3)], friendship: &[] },
        next: None,
    },
    QuestDef {
        id: "char_bramble_garden", kind: QuestKind::Character, character: Some("bramble"), friendship_req: 3,
        title: "Bramble's Garden Challenge",
        description: "Bramble wants you to prove your farming skills.",
        objectives: &[
            Objective { kind: ObjectiveKind::Harvest, target: "wheat", count: 5, text: "Harvest 5 wheat" },
            Objective { kind: ObjectiveKind::Harvest, target: "carrot", count: 3, text: "Harvest 3 carrots" },
        ],
        reward: Reward { coins: 200, items: &[("seed_pumpkin", 5)], friendship: &[("bramble", 2)] },
        next: None,
    },
    QuestDef {
        id: "char_ember_bake", kind: QuestKind::Character, character: Some("ember"), friendship_req: 3,
        title: "Ember's Special Order",
        description: "Ember needs ingredients for a new recipe!",
        objectives: &[
            Objective { kind: ObjectiveKind::Collect, target: "wheat", count: 10, text: "Gather 10 wheat" },
            Objective { kind: ObjectiveKind::Collect, target: "starberry", count: 3, text: "Gather 3 starberries" },
        ],
        reward: Reward { coins: 350, items: &[("food_pie", 3)], friendship: &[("ember", 2)] },
        next: None,
    },
    QuestDef {
        id: "char_coral_fish", kind: QuestKind::Character, character: Some("coral"), friendship_req: 3,
        title: "Coral's Fish Collection",
        description: "Coral wants to study different fish species.",
        objectives: &[Objective { kind: ObjectiveKind::Fish, target: "any", count: 5, text: "Catch 5 fish" }],
        reward: Reward { coins: 250, items: &[("crystal", 5)], friendship: &[("coral", 2)] },
        next: None,
    },
    QuestDef {
        id: "char_flint_ore", kind: QuestKind::Character, character: Some("flint"), friendship_req: 3,
        title: "Flint's Iron Rush",
        description: "Flint needs iron for an important project.",
        objectives: &[Objective { kind: ObjectiveKind::Mine, target: "any", count: 10, text: "Mine 10 rocks" }],
        reward: Reward { coins: 300, items: &[("iron", 15), ("amethyst", 2)], friendship: &[("flint", 2)] },
        next: None,
    },
];

static QUEST_INDEX: LazyLock<HashMap<&'static str, &'static QuestDef>> =
    LazyLock::new(|| QUESTS.iter().map(|d| (d.id, d)).collect());

pub fn quest(id: &str) -> Option<&'static QuestDef> {
    QUEST_INDEX.get(id).copied()
}

// ============================================================================
// DAILY TASKS
// ============================================================================

pub struct DailyTaskDef {
    pub kind: ObjectiveKind,
    pub target: &'static str,
    pub count: i64,
    pub text: &'static str,
    pub reward_coins: i64,
}

pub const DAILY_TASKS: &[DailyTaskDef] = &[
    DailyTaskDef { kind: ObjectiveKind::Harvest, target: "any", count: 5, text: "Harvest 5 crops", reward_coins: 50 },
    DailyTaskDef { kind: ObjectiveKind::Fish, target: "any", count: 2, text: "Catch 2 fish", reward_coins: 40 },
    DailyTaskDef { kind: ObjectiveKind::Talk, target: "any", count: 3, text: "Talk to 3 NPCs", reward_coins: 30 },
    DailyTaskDef { kind: ObjectiveKind::Mine, target: "any", count: 3, text: "Mine 3 rocks", reward_coins: 40 },
    DailyTaskDef { kind: ObjectiveKind::Build, target: "any", count: 1, text: "Place a building", reward_coins: 60 },
];

// ============================================================================
// LOOT TABLES
// ============================================================================

/// Foraged in the forest: each entry rolls independently, one success is
/// picked uniformly.
pub const FORAGE_TABLE: &[ItemId] = &["mushroom", "herb", "berry", "wood"];

/// Weighted fish odds for a normal cast.
pub const FISH_TABLE: &[(ItemId, u32)] = &[
    ("fish_common", 50),
    ("fish_bass", 30),
    ("fish_golden", 15),
    ("fish_rainbow", 4),
    ("fish_shimmer", 1),
];

/// Odds for a perfectly timed cast, shifted toward rare fish.
pub const FISH_TABLE_PERFECT: &[(ItemId, u32)] = &[
    ("fish_common", 20),
    ("fish_bass", 30),
    ("fish_golden", 25),
    ("fish_rainbow", 15),
    ("fish_shimmer", 10),
];

/// What breaks out of a mine rock.
pub const ORE_TABLE: &[(ItemId, u32)] = &[
    ("stone", 50),
    ("iron", 30),
    ("crystal", 10),
    ("amethyst", 7),
    ("ruby", 3),
];

/// Pick an id from a weighted table.
pub fn weighted_pick<R: rand::Rng>(table: &[(ItemId, u32)], rng: &mut R) -> ItemId {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total.max(1));
    for &(id, w) in table {
        if roll < w {
            return id;
        }
        roll -= w;
    }
    table.last().map(|(id, _)| *id).unwrap_or("stone")
}

// ============================================================================
// ARENA: SPELLS, ENEMIES, WAVES
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpellKind {
    #[default]
    Fire,
    Ice,
    Lightning,
}

pub struct SpellDef {
    pub kind: SpellKind,
    pub name: &'static str,
    pub damage: f32,
    /// Projectile speed, world units per second.
    pub speed: f32,
    /// Seconds between casts.
    pub cooldown: f64,
}

pub const SPELLS: &[SpellDef] = &[
    SpellDef { kind: SpellKind::Fire, name: "Emberbolt", damage: 25.0, speed: 300.0, cooldown: 0.4 },
    SpellDef { kind: SpellKind::Ice, name: "Frost Shard", damage: 20.0, speed: 260.0, cooldown: 0.3 },
    SpellDef { kind: SpellKind::Lightning, name: "Stormlance", damage: 35.0, speed: 380.0, cooldown: 0.6 },
];

pub fn spell(kind: SpellKind) -> &'static SpellDef {
    // SPELLS covers every variant; the fallback is unreachable.
    SPELLS.iter().find(|s| s.kind == kind).unwrap_or(&SPELLS[0])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Wisp,
    Knight,
    Wraith,
    Boss,
}

pub struct EnemyDef {
    pub kind: EnemyKind,
    pub name: &'static str,
    pub hp: f32,
    pub speed: f32,
    /// Contact damage to the player.
    pub damage: f32,
    pub score: i64,
}

pub const ENEMIES: &[EnemyDef] = &[
    EnemyDef { kind: EnemyKind::Wisp, name: "Shadow Wisp", hp: 20.0, speed: 60.0, damage: 5.0, score: 10 },
    EnemyDef { kind: EnemyKind::Knight, name: "Corrupted Knight", hp: 60.0, speed: 45.0, damage: 12.0, score: 25 },
    EnemyDef { kind: EnemyKind::Wraith, name: "Wraith Hunter", hp: 35.0, speed: 80.0, damage: 8.0, score: 20 },
    EnemyDef { kind: EnemyKind::Boss, name: "Shadow Sovereign", hp: 400.0, speed: 35.0, damage: 20.0, score: 200 },
];

pub fn enemy(kind: EnemyKind) -> &'static EnemyDef {
    ENEMIES.iter().find(|e| e.kind == kind).unwrap_or(&ENEMIES[0])
}

/// One spawn group within a wave.
#[derive(Clone, Copy, Debug)]
pub struct WaveGroup {
    pub enemy: EnemyKind,
    pub count: u32,
    /// Seconds after wave start before this group begins spawning.
    pub delay: f64,
}

/// Resolved wave description, scripted or generated.
#[derive(Clone, Debug)]
pub struct WaveSpec {
    pub wave: u32,
    pub intro: String,
    pub groups: Vec<WaveGroup>,
    /// Seconds between consecutive spawns within a group.
    pub spawn_interval: f64,
    pub boss: bool,
}

struct ScriptedWave {
    intro: &'static str,
    groups: &'static [WaveGroup],
    spawn_interval: f64,
    boss: bool,
}

const SCRIPTED_WAVES: &[ScriptedWave] = &[
    ScriptedWave {
        intro: "Shadow Wisps emerge from the void...",
        groups: &[WaveGroup { enemy: EnemyKind::Wisp, count: 5, delay: 1.0 }],
        spawn_interval: 2.0, boss: false,
    },
    ScriptedWave {
        intro: "More shadows gather. Stay vigilant.",
        groups: &[WaveGroup { enemy: EnemyKind::Wisp, count: 8, delay: 0.8 }],
        spawn_interval: 1.5, boss: false,
    },
    ScriptedWave {
        intro: "Corrupted Knights rise — once protectors, now cursed",
        groups: &[
            WaveGroup { enemy: EnemyKind::Wisp, count: 4, delay: 1.0 },
            WaveGroup { enemy: EnemyKind::Knight, count: 2, delay: 2.0 },
        ],
        spawn_interval: 1.8, boss: false,
    },
    ScriptedWave {
        intro: "The corruption spreads. Dark forces converge.",
        groups: &[
            WaveGroup { enemy: EnemyKind::Wisp, count: 6, delay: 0.8 },
            WaveGroup { enemy: EnemyKind::Knight, count: 3, delay: 1.5 },
        ],
        spawn_interval: 1.5, boss: false,
    },
    ScriptedWave {
        intro: "The Wraith Lord sends his hunters...",
        groups: &[
            WaveGroup { enemy: EnemyKind::Wisp, count: 4, delay: 1.0 },
            WaveGroup { enemy: EnemyKind::Knight, count: 2, delay: 1.5 },
            WaveGroup { enemy: EnemyKind::Wraith, count: 3, delay: 2.0 },
        ],
        spawn_interval: 1.4, boss: false,
    },
    ScriptedWave {
        intro: "An ancient evil stirs. Prepare yourself!",
        groups: &[
            WaveGroup { enemy: EnemyKind::Wisp, count: 8, delay: 0.6 },
            WaveGroup { enemy: EnemyKind::Wraith, count: 4, delay: 1.0 },
        ],
        spawn_interval: 1.2, boss: false,
    },
    ScriptedWave {
        intro: "The wards weaken further. Hold fast!",
        groups: &[
            WaveGroup { enemy: EnemyKind::Knight, count: 5, delay: 1.2 },
            WaveGroup { enemy: EnemyKind::Wraith, count: 5, delay: 1.0 },
        ],
        spawn_interval: 1.1, boss: false,
    },
    ScriptedWave {
        intro: "Shadows multiply. The void hungers.",
        groups: &[
            WaveGroup { enemy: EnemyKind::Wisp, count: 10, delay: 0.5 },
            WaveGroup { enemy: EnemyKind::Knight, count: 3, delay: 1.5 },
            WaveGroup { enemy: EnemyKind::Wraith, count: 4, delay: 1.2 },
        ],
        spawn_interval: 1.0, boss: false,
    },
    ScriptedWave {
        intro: "Something powerful approaches...",
        groups: &[
            WaveGroup { enemy: EnemyKind::Wisp, count: 6, delay: 0.8 },
            WaveGroup { enemy: EnemyKind::Knight, count: 4, delay: 1.2 },
            WaveGroup { enemy: EnemyKind::Wraith, count: 6, delay: 1.0 },
        ],
        spawn_interval: 0.9, boss: false,
    },
    ScriptedWave {
        intro: "THE SHADOW SOVEREIGN AWAKENS!",
        groups: &[
            WaveGroup { enemy: EnemyKind::Boss, count: 1, delay: 0.0 },
            WaveGroup { enemy: EnemyKind::Wisp, count: 4, delay: 3.0 },
        ],
        spawn_interval: 2.0, boss: true,
    },
];

/// Wave description for wave `n` (1-based). Waves past the scripted ten use
/// a deterministic difficulty ramp.
pub fn wave_spec(n: u32) -> WaveSpec {
    if n >= 1 && (n as usize) <= SCRIPTED_WAVES.len() {
        let s = &SCRIPTED_WAVES[(n - 1) as usize];
        return WaveSpec {
            wave: n,
            intro: s.intro.to_string(),
            groups: s.groups.to_vec(),
            spawn_interval: s.spawn_interval,
            boss: s.boss,
        };
    }

    let difficulty = (n.saturating_sub(10) / 5 + 1) as i64;
    let base = 5 + difficulty * 2;
    let mut groups = vec![
        WaveGroup { enemy: EnemyKind::Wisp, count: base as u32, delay: 0.5 },
        WaveGroup { enemy: EnemyKind::Knight, count: (base as f64 * 0.4) as u32, delay: 1.0 },
        WaveGroup { enemy: EnemyKind::Wraith, count: (base as f64 * 0.3) as u32, delay: 0.8 },
    ];
    let boss = n % 5 == 0;
    if boss {
        groups.push(WaveGroup { enemy: EnemyKind::Boss, count: 1, delay: 0.0 });
    }
    WaveSpec {
        wave: n,
        intro: format!("Wave {n}: The darkness intensifies..."),
        groups,
        spawn_interval: (1.0 - difficulty as f64 * 0.05).max(0.6),
        boss,
    }
}

/// Total enemies a wave will spawn.
pub fn wave_enemy_count(spec: &WaveSpec) -> u32 {
    spec.groups.iter().map(|g| g.count).sum()
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Cross-check every id reference in the tables. Returns the first dangling
/// reference as an error. Run once at startup; gameplay code relies on it.
pub fn validate() -> Result<(), String> {
    let mut seen = HashMap::new();
    for def in ITEMS {
        if seen.insert(def.id, ()).is_some() {
            return Err(format!("duplicate item id '{}'", def.id));
        }
        if let ItemKind::Seed { grows, .. } = def.kind {
            match item(grows) {
                Some(produce) if produce.kind == ItemKind::Crop => {}
                Some(_) => return Err(format!("seed '{}' grows non-crop '{grows}'", def.id)),
                None => return Err(format!("seed '{}' grows unknown item '{grows}'", def.id)),
            }
        }
    }

    for entry in SHOP {
        if item(entry.item).is_none() {
            return Err(format!("shop sells unknown item '{}'", entry.item));
        }
    }

    for recipe in RECIPES {
        for (id, _) in recipe.ingredients {
            if item(id).is_none() {
                return Err(format!("recipe '{}' needs unknown item '{id}'", recipe.id));
            }
        }
        if item(recipe.result.0).is_none() {
            return Err(format!("recipe '{}' makes unknown item '{}'", recipe.id, recipe.result.0));
        }
        if character(recipe.unlock.0).is_none() {
            return Err(format!("recipe '{}' gated on unknown npc '{}'", recipe.id, recipe.unlock.0));
        }
    }

    for bld in BUILDINGS {
        if bld.tile_w <= 0 || bld.tile_h <= 0 {
            return Err(format!("building '{}' has an empty footprint", bld.id));
        }
        for level in &bld.levels {
            for (id, _) in level.materials {
                if item(id).is_none() {
                    return Err(format!("building '{}' costs unknown item '{id}'", bld.id));
                }
            }
        }
    }

    for ch in CHARACTERS {
        for gift in &ch.gifts {
            if item(gift).is_none() {
                return Err(format!("character '{}' favors unknown item '{gift}'", ch.id));
            }
        }
    }

    for q in QUESTS {
        for obj in q.objectives {
            let ok = match obj.kind {
                ObjectiveKind::Talk => obj.target == "any" || character(obj.target).is_some(),
                ObjectiveKind::Build => obj.target == "any" || building(obj.target).is_some(),
                ObjectiveKind::Harvest | ObjectiveKind::Collect => {
                    obj.target == "any" || item(obj.target).is_some()
                }
                ObjectiveKind::Fish | ObjectiveKind::Mine => true,
            };
            if !ok {
                return Err(format!("quest '{}' targets unknown '{}'", q.id, obj.target));
            }
        }
        for (id, _) in q.reward.items {
            if item(id).is_none() {
                return Err(format!("quest '{}' rewards unknown item '{id}'", q.id));
            }
        }
        for (npc, _) in q.reward.friendship {
            if character(npc).is_none() {
                return Err(format!("quest '{}' rewards unknown npc '{npc}'", q.id));
            }
        }
        if let Some(next) = q.next {
            if quest(next).is_none() {
                return Err(format!("quest '{}' chains to unknown quest '{next}'", q.id));
            }
        }
        if let Some(npc) = q.character {
            if character(npc).is_none() {
                return Err(format!("quest '{}' belongs to unknown npc '{npc}'", q.id));
            }
        }
    }

    for table in [FISH_TABLE, FISH_TABLE_PERFECT, ORE_TABLE] {
        for (id, _) in table {
            if item(id).is_none() {
                return Err(format!("loot table references unknown item '{id}'"));
            }
        }
    }
    for id in FORAGE_TABLE {
        if item(id).is_none() {
            return Err(format!("forage table references unknown item '{id}'"));
        }
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_validate() {
        assert_eq!(validate(), Ok(()));
    }

    #[test]
    fn item_lookup() {
        assert_eq!(item("wheat").unwrap().value, 12);
        assert!(item("nonsense").is_none());
        assert_eq!(seed("seed_wheat"), Some(("wheat", 30.0)));
        assert_eq!(seed("wheat"), None);
    }

    #[test]
    fn main_quest_chain_terminates() {
        let mut current = quest("main_welcome");
        let mut hops = 0;
        while let Some(q) = current {
            hops += 1;
            assert!(hops <= QUESTS.len(), "quest chain loops");
            current = q.next.and_then(quest);
        }
        assert_eq!(hops, 6);
    }

    #[test]
    fn character_quests_are_gated() {
        for q in QUESTS.iter().filter(|q| q.kind == QuestKind::Character) {
            assert!(q.character.is_some());
            assert!(q.friendship_req > 0);
        }
    }

    #[test]
    fn scripted_waves_match_table() {
        let w1 = wave_spec(1);
        assert_eq!(wave_enemy_count(&w1), 5);
        assert!(!w1.boss);
        let w10 = wave_spec(10);
        assert!(w10.boss);
        assert!(w10.groups.iter().any(|g| g.enemy == EnemyKind::Boss));
    }

    #[test]
    fn endless_waves_ramp() {
        // Wave 15: difficulty 2 => 9 wisps, 3 knights, 2 wraiths + boss.
        let w = wave_spec(15);
        assert!(w.boss);
        assert_eq!(w.groups[0].count, 9);
        assert_eq!(w.groups[1].count, 3);
        assert_eq!(w.groups[2].count, 2);
        assert!((w.spawn_interval - 0.9).abs() < 1e-9);

        // Interval bottoms out at 0.6.
        let deep = wave_spec(100);
        assert!((deep.spawn_interval - 0.6).abs() < 1e-9);
        // Non-multiples of five get no boss.
        assert!(!wave_spec(13).boss);
    }

    #[test]
    fn weighted_pick_respects_table() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let id = weighted_pick(ORE_TABLE, &mut rng);
            assert!(ORE_TABLE.iter().any(|(t, _)| *t == id));
        }
    }

    #[test]
    fn npc_tiles_are_distinct() {
        let tiles = npc_tiles();
        for (i, a) in tiles.iter().enumerate() {
            for b in &tiles[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
