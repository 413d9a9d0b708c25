//! Moonvale - headless game-logic core for a cozy valley sim and a
//! wave-survival arena, built on Bevy ECS.
//!
//! The presentation layer (rendering, input gestures, audio) is an external
//! collaborator: it sends the messages in [`messages`] and reads the
//! resources in [`resources`] / [`arena`] to draw whatever it likes.

// ============================================================================
// MODULES
// ============================================================================

pub mod arena;
pub mod catalog;
pub mod components;
pub mod constants;
pub mod messages;
pub mod resources;
pub mod save;
pub mod settings;
pub mod systems;
pub mod world;

// ============================================================================
// IMPORTS
// ============================================================================

use bevy::prelude::*;

use arena::*;
use messages::*;
use resources::*;
use settings::UserSettings;
use systems::*;
use world::WorldGrid;

// ============================================================================
// APP STATES
// ============================================================================

/// Which game (if any) is running.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Menu,
    Valley,
    Arena,
}

/// Valley update phases. Chained: action handlers finish before quest
/// progress is applied, which finishes before the clock-driven systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Step {
    Actions,
    Progress,
    Tick,
}

// ============================================================================
// BEVY APP - wires resources, messages, and systems
// ============================================================================

/// Build the simulation core into `app`. The caller supplies the platform
/// plugins (schedule runner, log, states).
pub fn build_app(app: &mut App) {
    app.init_state::<AppState>()
        // Valley actions
        .add_message::<MoveToMsg>()
        .add_message::<PlantCropMsg>()
        .add_message::<WaterCropMsg>()
        .add_message::<HarvestCropMsg>()
        .add_message::<PlaceBuildingMsg>()
        .add_message::<DemolishBuildingMsg>()
        .add_message::<TalkMsg>()
        .add_message::<GiftMsg>()
        .add_message::<ForageMsg>()
        .add_message::<CastLineMsg>()
        .add_message::<SmashRockMsg>()
        .add_message::<CraftMsg>()
        .add_message::<BuyMsg>()
        .add_message::<SellMsg>()
        // Arena actions
        .add_message::<CastSpellMsg>()
        // Internal traffic
        .add_message::<ProgressMsg>()
        .add_message::<NoticeMsg>()
        // Resources
        .init_resource::<WorldGrid>()
        .init_resource::<Profile>()
        .init_resource::<GameClock>()
        .init_resource::<Avatar>()
        .init_resource::<EventLog>()
        .init_resource::<AutosaveTimer>()
        .init_resource::<UserSettings>()
        .init_resource::<ArenaState>()
        .init_resource::<ArenaInput>()
        // Startup
        .add_systems(Startup, validate_catalog_system)
        // Valley
        .configure_sets(Update, (Step::Actions, Step::Progress, Step::Tick).chain())
        .add_systems(OnEnter(AppState::Valley), enter_valley_system)
        .add_systems(OnExit(AppState::Valley), exit_valley_system)
        .add_systems(
            Update,
            (
                move_request_system,
                movement_system,
                plant_system,
                water_system,
                harvest_system,
                place_building_system,
                demolish_building_system,
                talk_system,
                gift_system,
                forage_system,
                fishing_system,
                mining_system,
                craft_system,
                buy_system,
                sell_system,
            )
                .in_set(Step::Actions)
                .run_if(in_state(AppState::Valley)),
        )
        .add_systems(
            Update,
            (quest_progress_system, character_quest_unlock_system)
                .in_set(Step::Progress)
                .run_if(in_state(AppState::Valley)),
        )
        .add_systems(
            Update,
            (clock_system, growth_system, daily_rollover_system, autosave_system)
                .in_set(Step::Tick)
                .run_if(in_state(AppState::Valley)),
        )
        // Arena
        .add_systems(OnEnter(AppState::Arena), reset_arena_system)
        .add_systems(OnExit(AppState::Arena), exit_arena_system)
        .add_systems(
            Update,
            (
                arena_clock_system,
                wave_system,
                spawn_system,
                player_move_system,
                chase_system,
                cast_system,
                spell_move_system,
                spell_hit_system,
                enemy_death_system,
                combo_decay_system,
                pickup_system,
                player_damage_system,
            )
                .chain()
                .run_if(in_state(AppState::Arena)),
        )
        // Headless echo of user-facing notices
        .add_systems(Update, echo_notices_system);
}

// ============================================================================
// LIFECYCLE SYSTEMS
// ============================================================================

/// Cross-check the data tables once at startup.
fn validate_catalog_system() {
    match catalog::validate() {
        Ok(()) => info!(
            "Catalog validated: {} items, {} buildings, {} quests, {} characters",
            catalog::ITEMS.len(),
            catalog::BUILDINGS.len(),
            catalog::QUESTS.len(),
            catalog::CHARACTERS.len(),
        ),
        Err(e) => error!("Catalog validation failed: {e}"),
    }
}

/// Load the save and reconstruct the world session from it.
fn enter_valley_system(
    mut profile: ResMut<Profile>,
    mut grid: ResMut<WorldGrid>,
    mut clock: ResMut<GameClock>,
    mut avatar: ResMut<Avatar>,
) {
    profile.data = save::load_or_default();
    *clock = GameClock {
        day_time: profile.data.day_time,
        day: 0,
        total_play: profile.data.total_play_time,
        paused: false,
    };
    *avatar = Avatar::default();
    save::rebuild_grid(&profile.data, &mut grid);
}

/// Persist on the way out of the valley.
fn exit_valley_system(mut profile: ResMut<Profile>, clock: Res<GameClock>) {
    collect_clock(&mut profile, &clock);
    if let Err(e) = save::write_save(&mut profile.data) {
        warn!("Save on exit failed: {e}");
    }
}

/// Surface notices in headless runs; a real frontend renders them instead.
fn echo_notices_system(mut notices: MessageReader<NoticeMsg>, settings: Res<UserSettings>) {
    for notice in notices.read() {
        if settings.log_notices {
            info!("{}", notice.text);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
