//! Engine-independent progression and combat loop for a top-down survival
//! shooter: spawning, damage resolution, experience and level-ups, boss
//! escalation and powerups, driven one frame at a time.

pub mod combat;
pub mod compute;
pub mod entities;
pub mod error;
pub mod motion;
pub mod progression;
pub mod spawn;
pub mod tuning;
pub mod util;

pub use combat::{resolve_contact, Contact};
pub use compute::{init_state, step};
pub use entities::RunState;
pub use error::SimError;
pub use progression::submit_upgrade;
pub use tuning::Tuning;
