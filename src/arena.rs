//! Arena - the wave-survival run: spawn scheduling, chase movement, spell
//! projectiles, combo scoring, pickups, and run-over bookkeeping.
//!
//! The arena is entity-based where the valley is resource-based: enemies,
//! projectiles, and pickups are short-lived ECS entities.

use bevy::prelude::*;
use hashbrown::HashMap;
use rand::Rng;

use crate::catalog::{self, EnemyKind, SpellKind, WaveSpec, wave_enemy_count, wave_spec};
use crate::components::{Dead, Enemy, Hp, Pickup, Pos, Spell};
use crate::constants::*;
use crate::messages::{CastSpellMsg, NoticeMsg};
use crate::resources::Profile;
use crate::save;

// ============================================================================
// RESOURCES
// ============================================================================

/// Normalized movement input from the presentation layer.
#[derive(Resource, Default)]
pub struct ArenaInput {
    pub dir: Vec2,
}

/// One scheduled enemy spawn.
#[derive(Clone, Copy, Debug)]
pub struct PendingSpawn {
    /// Run-clock instant the spawn fires.
    pub at: f64,
    pub enemy: EnemyKind,
}

/// All mutable state of one arena run.
#[derive(Resource)]
pub struct ArenaState {
    /// Run clock in seconds. Everything below is scheduled against it.
    pub elapsed: f64,
    /// Delta of the current frame, captured once per tick for the movement
    /// and combat systems.
    pub dt: f32,
    pub survival_secs: f64,

    pub score: i64,
    pub wave: u32,
    pub kills: i64,
    pub combo: i64,
    pub combo_deadline: f64,

    pub player_pos: Vec2,
    pub player_hp: f32,
    pub facing: Vec2,
    pub invincible_until: f64,

    pub current_spell: SpellKind,
    pub next_cast_at: f64,
    pub spell_casts: HashMap<SpellKind, i64>,

    pub wave_in_progress: bool,
    pub enemies_remaining: u32,
    pub pending: Vec<PendingSpawn>,
    pub next_wave_at: f64,

    pub game_over: bool,
}

impl Default for ArenaState {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            dt: 0.0,
            survival_secs: 0.0,
            score: 0,
            wave: 1,
            kills: 0,
            combo: 0,
            combo_deadline: 0.0,
            player_pos: Vec2::new(ARENA_W / 2.0, ARENA_H / 2.0),
            player_hp: ARENA_PLAYER_HP,
            facing: Vec2::new(0.0, -1.0),
            invincible_until: 0.0,
            current_spell: SpellKind::Fire,
            next_cast_at: 0.0,
            spell_casts: HashMap::new(),
            wave_in_progress: false,
            enemies_remaining: 0,
            pending: Vec::new(),
            next_wave_at: WAVE_FIRST_DELAY,
            game_over: false,
        }
    }
}

// ============================================================================
// SCHEDULING / SCORING HELPERS
// ============================================================================

/// Expand a wave description into absolute spawn instants. Spawns within a
/// group are `spawn_interval` apart, offset by the group's delay.
pub fn schedule_wave(spec: &WaveSpec, start: f64) -> Vec<PendingSpawn> {
    let mut pending = Vec::new();
    for group in &spec.groups {
        for i in 0..group.count {
            pending.push(PendingSpawn {
                at: start + group.delay + i as f64 * spec.spawn_interval,
                enemy: group.enemy,
            });
        }
    }
    pending
}

/// Score a kill: combo grows, the multiplier is capped, the decay window
/// restarts. Returns the points awarded.
pub fn apply_kill(state: &mut ArenaState, kind: EnemyKind) -> i64 {
    state.combo += 1;
    state.kills += 1;
    state.combo_deadline = state.elapsed + COMBO_DECAY_SECONDS;
    let gained = catalog::enemy(kind).score * state.combo.min(COMBO_MAX);
    state.score += gained;
    gained
}

/// Random point on one of the four arena edges.
fn edge_spawn_pos<R: Rng>(rng: &mut R) -> Vec2 {
    let pad = ARENA_PAD + 20.0;
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(pad..ARENA_W - pad), pad),
        1 => Vec2::new(ARENA_W - pad, rng.random_range(pad..ARENA_H - pad)),
        2 => Vec2::new(rng.random_range(pad..ARENA_W - pad), ARENA_H - pad),
        _ => Vec2::new(pad, rng.random_range(pad..ARENA_H - pad)),
    }
}

// ============================================================================
// SYSTEMS
// ============================================================================

/// Advance the run clock and capture this frame's delta.
pub fn arena_clock_system(time: Res<Time>, mut state: ResMut<ArenaState>) {
    if state.game_over {
        state.dt = 0.0;
        return;
    }
    state.dt = time.delta_secs();
    state.elapsed += state.dt as f64;
    state.survival_secs += state.dt as f64;
}

/// Start the next wave once its time arrives. Spawns begin after the intro
/// banner has had a moment on screen.
pub fn wave_system(mut state: ResMut<ArenaState>, mut notices: MessageWriter<NoticeMsg>) {
    if state.game_over || state.wave_in_progress || state.elapsed < state.next_wave_at {
        return;
    }
    let spec = wave_spec(state.wave);
    state.enemies_remaining = wave_enemy_count(&spec);
    state.pending = schedule_wave(&spec, state.elapsed + 2.0);
    state.wave_in_progress = true;
    info!("Wave {} begins: {} enemies", spec.wave, state.enemies_remaining);
    notices.write(NoticeMsg::new(spec.intro));
}

/// Fire due spawns from the schedule.
pub fn spawn_system(mut state: ResMut<ArenaState>, mut commands: Commands) {
    if state.game_over {
        return;
    }
    let mut rng = rand::rng();
    let elapsed = state.elapsed;
    let mut due = Vec::new();
    state.pending.retain(|p| {
        if p.at <= elapsed {
            due.push(*p);
            false
        } else {
            true
        }
    });
    for spawn in due {
        let def = catalog::enemy(spawn.enemy);
        commands.spawn((
            Enemy { kind: spawn.enemy },
            Hp(def.hp),
            Pos(edge_spawn_pos(&mut rng)),
        ));
    }
}

/// Move the player from input, clamped inside the arena walls.
pub fn player_move_system(input: Res<ArenaInput>, mut state: ResMut<ArenaState>) {
    if state.game_over {
        return;
    }
    let dir = input.dir.normalize_or_zero();
    if dir != Vec2::ZERO {
        state.facing = dir;
    }
    let step = dir * ARENA_PLAYER_SPEED * state.dt;
    let pos = state.player_pos + step;
    state.player_pos = Vec2::new(
        pos.x.clamp(ARENA_PAD + 20.0, ARENA_W - ARENA_PAD - 20.0),
        pos.y.clamp(ARENA_PAD + 20.0, ARENA_H - ARENA_PAD - 20.0),
    );
}

/// Enemies chase the player in a straight line at their kind's speed.
pub fn chase_system(state: Res<ArenaState>, mut enemies: Query<(&mut Pos, &Enemy)>) {
    if state.game_over {
        return;
    }
    for (mut pos, enemy) in &mut enemies {
        let def = catalog::enemy(enemy.kind);
        let to_player = state.player_pos - pos.0;
        if to_player.length_squared() > 1.0 {
            pos.0 += to_player.normalize() * def.speed * state.dt;
        }
    }
}

/// Cast the equipped spell toward the nearest enemy (or the facing
/// direction when the field is empty), subject to its cooldown.
pub fn cast_system(
    mut casts: MessageReader<CastSpellMsg>,
    mut state: ResMut<ArenaState>,
    enemies: Query<&Pos, (With<Enemy>, Without<Dead>)>,
    mut commands: Commands,
) {
    for _ in casts.read() {
        if state.game_over || state.elapsed < state.next_cast_at {
            continue;
        }
        let def = catalog::spell(state.current_spell);
        state.next_cast_at = state.elapsed + def.cooldown;
        let current_spell = state.current_spell;
        *state.spell_casts.entry(current_spell).or_insert(0) += 1;

        let nearest = enemies
            .iter()
            .map(|p| p.0)
            .min_by(|a, b| {
                let da = a.distance_squared(state.player_pos);
                let db = b.distance_squared(state.player_pos);
                da.total_cmp(&db)
            });
        let dir = match nearest {
            Some(target) if target != state.player_pos => {
                (target - state.player_pos).normalize()
            }
            _ => state.facing.normalize_or_zero(),
        };

        commands.spawn((
            Spell {
                kind: state.current_spell,
                vel: dir * def.speed,
                expires_at: state.elapsed + SPELL_LIFETIME,
            },
            Pos(state.player_pos),
        ));
    }
}

/// Fly projectiles and cull expired or escaped ones.
pub fn spell_move_system(
    state: Res<ArenaState>,
    mut spells: Query<(Entity, &mut Pos, &Spell)>,
    mut commands: Commands,
) {
    for (entity, mut pos, spell) in &mut spells {
        pos.0 += spell.vel * state.dt;
        let out = pos.0.x < 0.0 || pos.0.x > ARENA_W || pos.0.y < 0.0 || pos.0.y > ARENA_H;
        if out || spell.expires_at <= state.elapsed {
            commands.entity(entity).despawn();
        }
    }
}

/// Apply projectile hits. A projectile is spent on its first hit; an enemy
/// dropping to zero HP is marked dead for the death system.
pub fn spell_hit_system(
    spells: Query<(Entity, &Pos, &Spell)>,
    mut enemies: Query<(Entity, &Pos, &mut Hp), (With<Enemy>, Without<Dead>)>,
    mut commands: Commands,
) {
    for (spell_entity, spell_pos, spell) in &spells {
        let hit = enemies.iter_mut().find(|(_, pos, _)| {
            pos.0.distance_squared(spell_pos.0) <= SPELL_HIT_RADIUS * SPELL_HIT_RADIUS
        });
        let Some((enemy_entity, _, mut hp)) = hit else {
            continue;
        };
        hp.0 -= catalog::spell(spell.kind).damage;
        commands.entity(spell_entity).despawn();
        if hp.0 <= 0.0 {
            commands.entity(enemy_entity).insert(Dead);
        }
    }
}

/// Score kills, roll pickups, and close out the wave when the schedule is
/// exhausted and the field is clear.
pub fn enemy_death_system(
    mut state: ResMut<ArenaState>,
    dead: Query<(Entity, &Pos, &Enemy), With<Dead>>,
    mut commands: Commands,
    mut notices: MessageWriter<NoticeMsg>,
) {
    let mut rng = rand::rng();
    for (entity, pos, enemy) in &dead {
        commands.entity(entity).despawn();
        apply_kill(&mut state, enemy.kind);
        state.enemies_remaining = state.enemies_remaining.saturating_sub(1);

        if rng.random_bool(PICKUP_CHANCE) {
            let spell = match rng.random_range(0..3) {
                0 => SpellKind::Fire,
                1 => SpellKind::Ice,
                _ => SpellKind::Lightning,
            };
            commands.spawn((
                Pickup {
                    spell,
                    expires_at: state.elapsed + PICKUP_LIFETIME,
                },
                Pos(pos.0),
            ));
        }
    }

    if state.wave_in_progress && state.enemies_remaining == 0 && state.pending.is_empty() {
        state.wave_in_progress = false;
        state.wave += 1;
        state.next_wave_at = state.elapsed + WAVE_BREATHER;
        notices.write(NoticeMsg::new("Wave cleared! Catch your breath..."));
    }
}

/// Reset the combo once the decay window lapses without a kill.
pub fn combo_decay_system(mut state: ResMut<ArenaState>) {
    if state.combo > 0 && state.elapsed >= state.combo_deadline {
        state.combo = 0;
    }
}

/// Expire stale pickups and collect the ones the player walks over.
pub fn pickup_system(
    mut state: ResMut<ArenaState>,
    pickups: Query<(Entity, &Pos, &Pickup)>,
    mut commands: Commands,
    mut notices: MessageWriter<NoticeMsg>,
) {
    for (entity, pos, pickup) in &pickups {
        if pickup.expires_at <= state.elapsed {
            commands.entity(entity).despawn();
            continue;
        }
        if pos.0.distance_squared(state.player_pos) <= PICKUP_RADIUS * PICKUP_RADIUS {
            state.current_spell = pickup.spell;
            commands.entity(entity).despawn();
            notices.write(NoticeMsg::new(format!(
                "{}!",
                catalog::spell(pickup.spell).name
            )));
        }
    }
}

/// Contact damage with an invincibility window; at zero HP the run ends and
/// the records fold into the profile.
pub fn player_damage_system(
    mut state: ResMut<ArenaState>,
    enemies: Query<(&Pos, &Enemy), Without<Dead>>,
    mut profile: ResMut<Profile>,
    mut notices: MessageWriter<NoticeMsg>,
) {
    if state.game_over || state.elapsed < state.invincible_until {
        return;
    }
    let hit = enemies.iter().find(|(pos, _)| {
        pos.0.distance_squared(state.player_pos) <= PLAYER_HIT_RADIUS * PLAYER_HIT_RADIUS
    });
    let Some((_, enemy)) = hit else { return };

    state.player_hp -= catalog::enemy(enemy.kind).damage;
    state.invincible_until = state.elapsed + INVINCIBLE_SECONDS;

    if state.player_hp <= 0.0 {
        state.game_over = true;
        let arena = &mut profile.data.arena;
        arena.high_score = arena.high_score.max(state.score);
        arena.max_wave = arena.max_wave.max(state.wave as i64);
        arena.total_kills += state.kills;
        info!(
            "Run over: wave {}, score {}, {} kills, {:.0}s survived",
            state.wave, state.score, state.kills, state.survival_secs
        );
        notices.write(NoticeMsg::new("The shadows overwhelm you..."));
    }
}

// ============================================================================
// SESSION RESET / EXIT
// ============================================================================

/// Fresh run state; clears any leftover arena entities.
pub fn reset_arena_system(
    mut state: ResMut<ArenaState>,
    mut input: ResMut<ArenaInput>,
    leftovers: Query<Entity, Or<(With<Enemy>, With<Spell>, With<Pickup>)>>,
    mut commands: Commands,
) {
    *state = ArenaState::default();
    input.dir = Vec2::ZERO;
    for entity in &leftovers {
        commands.entity(entity).despawn();
    }
}

/// Persist the records when leaving the arena.
pub fn exit_arena_system(mut profile: ResMut<Profile>) {
    if let Err(e) = save::write_save(&mut profile.data) {
        warn!("Failed to save arena records: {e}");
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Harness without the clock system: tests drive `elapsed`/`dt` by hand.
    fn test_app() -> App {
        let mut app = App::new();
        app.add_message::<CastSpellMsg>()
            .add_message::<NoticeMsg>()
            .init_resource::<ArenaState>()
            .init_resource::<ArenaInput>()
            .init_resource::<Profile>()
            .add_systems(
                Update,
                (
                    wave_system,
                    spawn_system,
                    cast_system,
                    spell_move_system,
                    spell_hit_system,
                    enemy_death_system,
                    combo_decay_system,
                    pickup_system,
                    player_damage_system,
                )
                    .chain(),
            );
        app
    }

    fn state(app: &App) -> &ArenaState {
        app.world().resource::<ArenaState>()
    }

    fn set_elapsed(app: &mut App, t: f64) {
        app.world_mut().resource_mut::<ArenaState>().elapsed = t;
    }

    fn enemy_count(app: &mut App) -> usize {
        let mut query = app.world_mut().query_filtered::<(), With<Enemy>>();
        query.iter(app.world()).count()
    }

    #[test]
    fn schedule_expands_groups() {
        let spec = wave_spec(1); // 5 wisps, delay 1.0, interval 2.0
        let pending = schedule_wave(&spec, 10.0);
        assert_eq!(pending.len(), 5);
        assert_eq!(pending[0].at, 11.0);
        assert_eq!(pending[4].at, 19.0);
        assert!(pending.iter().all(|p| p.enemy == EnemyKind::Wisp));
    }

    #[test]
    fn combo_multiplier_caps_and_decays() {
        let mut st = ArenaState::default();
        let base = catalog::enemy(EnemyKind::Wisp).score;
        // Seven quick kills: multipliers 1,2,3,4,5,5,5.
        let mut expected = 0;
        for i in 1..=7i64 {
            let gained = apply_kill(&mut st, EnemyKind::Wisp);
            expected += base * i.min(COMBO_MAX);
            assert_eq!(gained, base * i.min(COMBO_MAX));
        }
        assert_eq!(st.score, expected);
        assert_eq!(st.kills, 7);

        // Window lapses: combo resets.
        st.elapsed = st.combo_deadline + 0.1;
        let mut app = test_app();
        *app.world_mut().resource_mut::<ArenaState>() = st;
        app.update();
        assert_eq!(state(&app).combo, 0);
    }

    #[test]
    fn wave_starts_and_spawns_on_schedule() {
        let mut app = test_app();
        // Before the first-wave delay nothing happens.
        app.update();
        assert!(!state(&app).wave_in_progress);

        set_elapsed(&mut app, WAVE_FIRST_DELAY);
        app.update();
        assert!(state(&app).wave_in_progress);
        assert_eq!(state(&app).enemies_remaining, 5);
        assert_eq!(state(&app).pending.len(), 5);
        assert_eq!(enemy_count(&mut app), 0);

        // Move past the whole spawn schedule: all five appear.
        set_elapsed(&mut app, 60.0);
        app.update();
        assert_eq!(enemy_count(&mut app), 5);
        assert!(state(&app).pending.is_empty());
    }

    #[test]
    fn cast_hits_kill_and_complete_the_wave() {
        let mut app = test_app();
        // Hand-build a one-enemy wave in progress.
        {
            let mut st = app.world_mut().resource_mut::<ArenaState>();
            st.wave_in_progress = true;
            st.enemies_remaining = 1;
            st.elapsed = 10.0;
        }
        let player = state(&app).player_pos;
        app.world_mut().spawn((
            Enemy { kind: EnemyKind::Wisp },
            Hp(catalog::enemy(EnemyKind::Wisp).hp),
            Pos(player + Vec2::new(10.0, 0.0)),
        ));

        // One fire bolt (25 dmg) kills a 20 hp wisp at point-blank range.
        app.world_mut().write_message(CastSpellMsg);
        app.update();

        assert_eq!(enemy_count(&mut app), 0);
        let st = state(&app);
        assert_eq!(st.kills, 1);
        assert_eq!(st.score, catalog::enemy(EnemyKind::Wisp).score);
        assert_eq!(st.spell_casts.get(&SpellKind::Fire), Some(&1));
        // Wave closed out and the next one queued after the breather.
        assert!(!st.wave_in_progress);
        assert_eq!(st.wave, 2);
        assert_eq!(st.next_wave_at, 10.0 + WAVE_BREATHER);
    }

    #[test]
    fn cast_cooldown_limits_fire_rate() {
        let mut app = test_app();
        set_elapsed(&mut app, 5.0);
        app.world_mut().write_message(CastSpellMsg);
        app.update();
        app.world_mut().write_message(CastSpellMsg);
        app.update(); // still inside the cooldown window
        assert_eq!(state(&app).spell_casts.get(&SpellKind::Fire), Some(&1));
    }

    #[test]
    fn contact_damage_respects_invincibility() {
        let mut app = test_app();
        set_elapsed(&mut app, 5.0);
        let player = state(&app).player_pos;
        app.world_mut().spawn((
            Enemy { kind: EnemyKind::Knight },
            Hp(catalog::enemy(EnemyKind::Knight).hp),
            Pos(player),
        ));

        app.update();
        let hp_after_one = state(&app).player_hp;
        assert_eq!(hp_after_one, ARENA_PLAYER_HP - catalog::enemy(EnemyKind::Knight).damage);

        // Same window: no second hit.
        app.update();
        assert_eq!(state(&app).player_hp, hp_after_one);

        // Past the window: hit lands again.
        set_elapsed(&mut app, 5.0 + INVINCIBLE_SECONDS);
        app.update();
        assert!(state(&app).player_hp < hp_after_one);
    }

    #[test]
    fn run_over_merges_records_into_profile() {
        let mut app = test_app();
        {
            let mut st = app.world_mut().resource_mut::<ArenaState>();
            st.elapsed = 30.0;
            st.player_hp = 1.0;
            st.score = 750;
            st.wave = 6;
            st.kills = 42;
        }
        let player = state(&app).player_pos;
        app.world_mut().spawn((
            Enemy { kind: EnemyKind::Wisp },
            Hp(catalog::enemy(EnemyKind::Wisp).hp),
            Pos(player),
        ));
        app.update();

        let st = state(&app);
        assert!(st.game_over);
        let arena = &app.world().resource::<Profile>().data.arena;
        assert_eq!(arena.high_score, 750);
        assert_eq!(arena.max_wave, 6);
        assert_eq!(arena.total_kills, 42);
    }

    #[test]
    fn pickups_swap_the_equipped_spell() {
        let mut app = test_app();
        set_elapsed(&mut app, 5.0);
        let player = state(&app).player_pos;
        app.world_mut().spawn((
            Pickup { spell: SpellKind::Lightning, expires_at: 100.0 },
            Pos(player),
        ));
        app.update();
        assert_eq!(state(&app).current_spell, SpellKind::Lightning);

        // Expired pickups vanish without effect.
        app.world_mut().spawn((
            Pickup { spell: SpellKind::Ice, expires_at: 1.0 },
            Pos(player),
        ));
        app.update();
        assert_eq!(state(&app).current_spell, SpellKind::Lightning);
    }
}
