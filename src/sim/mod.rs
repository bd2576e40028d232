//! Heart-catching simulation
//!
//! All gameplay logic lives here. This module must stay host-agnostic:
//! - One `step` per display refresh
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{Basket, GamePhase, GameState, Heart};
pub use tick::{FrameReport, TickInput, step};
