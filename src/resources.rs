//! ECS Resources - shared session state for the valley and its clock.

use bevy::prelude::*;

use crate::constants::{AUTOSAVE_SECONDS, DAY_SECONDS, PLAYER_START, TILE_SIZE};
use crate::save::SaveData;

// ============================================================================
// PLAYER PROFILE
// ============================================================================

/// The loaded save blob, owned by the app and passed into systems explicitly.
/// Persistence is an explicit load/save pair on this resource; there is no
/// ambient global.
#[derive(Resource, Default)]
pub struct Profile {
    pub data: SaveData,
}

// ============================================================================
// GAME CLOCK
// ============================================================================

/// Quarter of the in-game day, for presentation tinting and dialogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayPhase {
    Dawn,
    Day,
    Dusk,
    Night,
}

/// In-game time. `total_play` is the accumulated play clock crops schedule
/// their growth against; it persists across sessions via the save blob.
#[derive(Resource)]
pub struct GameClock {
    pub day_time: f32,
    pub day: u32,
    pub total_play: f64,
    pub paused: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            day_time: 0.0,
            day: 0,
            total_play: 0.0,
            paused: false,
        }
    }
}

impl GameClock {
    pub fn phase(&self) -> DayPhase {
        let quarter = DAY_SECONDS / 4.0;
        match self.day_time {
            t if t < quarter => DayPhase::Dawn,
            t if t < quarter * 2.0 => DayPhase::Day,
            t if t < quarter * 3.0 => DayPhase::Dusk,
            _ => DayPhase::Night,
        }
    }
}

// ============================================================================
// AVATAR
// ============================================================================

/// The valley avatar: a position plus the remaining tap-to-move waypoints.
#[derive(Resource)]
pub struct Avatar {
    pub pos: Vec2,
    pub path: Vec<Vec2>,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                PLAYER_START.0 as f32 * TILE_SIZE + TILE_SIZE / 2.0,
                PLAYER_START.1 as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            ),
            path: Vec::new(),
        }
    }
}

impl Avatar {
    pub fn moving(&self) -> bool {
        !self.path.is_empty()
    }
}

// ============================================================================
// EVENT LOG
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
    Action,
    Quest,
    LevelUp,
    Build,
    Arena,
    System,
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub kind: LogKind,
    pub day: u32,
    pub day_time: f32,
    pub text: String,
}

/// Rolling log of notable gameplay events, for the presentation layer.
#[derive(Resource, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

const LOG_CAP: usize = 100;

impl EventLog {
    pub fn push(&mut self, kind: LogKind, clock: &GameClock, text: impl Into<String>) {
        self.entries.push(LogEntry {
            kind,
            day: clock.day,
            day_time: clock.day_time,
            text: text.into(),
        });
        if self.entries.len() > LOG_CAP {
            let overflow = self.entries.len() - LOG_CAP;
            self.entries.drain(..overflow);
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

// ============================================================================
// AUTOSAVE
// ============================================================================

#[derive(Resource)]
pub struct AutosaveTimer(pub Timer);

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(AUTOSAVE_SECONDS, TimerMode::Repeating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_phase_quarters() {
        let mut clock = GameClock::default();
        assert_eq!(clock.phase(), DayPhase::Dawn);
        clock.day_time = DAY_SECONDS * 0.3;
        assert_eq!(clock.phase(), DayPhase::Day);
        clock.day_time = DAY_SECONDS * 0.6;
        assert_eq!(clock.phase(), DayPhase::Dusk);
        clock.day_time = DAY_SECONDS * 0.9;
        assert_eq!(clock.phase(), DayPhase::Night);
    }

    #[test]
    fn event_log_caps() {
        let clock = GameClock::default();
        let mut log = EventLog::default();
        for i in 0..150 {
            log.push(LogKind::Action, &clock, format!("event {i}"));
        }
        assert_eq!(log.entries().len(), LOG_CAP);
        assert_eq!(log.entries()[0].text, "event 50");
    }
}
