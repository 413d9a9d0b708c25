//! Moonvale - headless runner. Loads the save, enters the valley session,
//! and simulates at 60 ticks per second until interrupted.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use moonvale::AppState;
use moonvale::resources::AutosaveTimer;
use moonvale::settings;

fn main() {
    let user_settings = settings::load_settings();
    // Persist defaults on first run so the file is there to edit.
    settings::save_settings(&user_settings);

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
    )
    .add_plugins(LogPlugin::default())
    .add_plugins(StatesPlugin);

    moonvale::build_app(&mut app);

    app.insert_resource(AutosaveTimer(Timer::from_seconds(
        user_settings.autosave_seconds,
        TimerMode::Repeating,
    )))
    .insert_resource(user_settings)
    .add_systems(Startup, startup_system);

    app.run();
}

/// Log build info and drop straight into the valley session.
fn startup_system(mut next_state: ResMut<NextState<AppState>>) {
    info!(
        "moonvale {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("BUILD_COMMIT").unwrap_or("unknown"),
        option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
    );
    next_state.set(AppState::Valley);
}
