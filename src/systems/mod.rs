//! Bevy ECS Systems - valley session logic.

mod autosave;
mod building;
mod clock;
mod economy;
mod farming;
mod gather;
mod movement;
mod quests;
mod social;

pub use autosave::*;
pub use building::*;
pub use clock::*;
pub use economy::*;
pub use farming::*;
pub use gather::*;
pub use movement::*;
pub use quests::*;
pub use social::*;
