//! Autosave system - periodic write of the save blob.

use bevy::prelude::*;

use crate::resources::{AutosaveTimer, GameClock, Profile};
use crate::save;

/// Fold the live clock back into the blob before it hits disk.
pub fn collect_clock(profile: &mut Profile, clock: &GameClock) {
    profile.data.day_time = clock.day_time;
    profile.data.total_play_time = clock.total_play;
}

/// Write the save every autosave interval. Failures are logged and retried
/// at the next tick; the session keeps running either way.
pub fn autosave_system(
    time: Res<Time>,
    mut timer: ResMut<AutosaveTimer>,
    mut profile: ResMut<Profile>,
    clock: Res<GameClock>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    collect_clock(&mut profile, &clock);
    if let Err(e) = save::write_save(&mut profile.data) {
        warn!("Autosave failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_folds_clock_into_blob() {
        let mut profile = Profile::default();
        let clock = GameClock {
            day_time: 123.0,
            day: 4,
            total_play: 987.5,
            paused: false,
        };
        collect_clock(&mut profile, &clock);
        assert_eq!(profile.data.day_time, 123.0);
        assert_eq!(profile.data.total_play_time, 987.5);
    }
}
