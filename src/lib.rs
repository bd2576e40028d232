//! Heart Gift - a catch-the-hearts gift page
//!
//! Core modules:
//! - `sim`: Heart-catching mini-game (spawner, collisions, score, win)
//! - `flow`: Page state machine and the timer scheduler that sequences it
//! - `passcode`: Six-cell numeric gate
//! - `quiz`: Fixed-question quiz engine
//! - `cards`: Card catalog loaded from embedded JSON
//! - `app`: Session context tying everything to a presentation port
//! - `port`: The presentation port and an in-memory recorder
//! - `render`: Draw commands for one game frame
//! - `platform`: HTML markup and the browser binding (wasm32)

pub mod app;
pub mod cards;
pub mod decoy;
pub mod flow;
pub mod input;
pub mod passcode;
pub mod platform;
pub mod port;
pub mod quiz;
pub mod render;
pub mod settings;
pub mod sim;

pub use app::{App, HostRequest};
pub use cards::{Card, CardBody, Catalog, CatalogError};
pub use settings::Settings;

/// Product constants
pub mod consts {
    /// Hearts to catch before the gift unlocks
    pub const TARGET_SCORE: u32 = 2;

    /// Basket dimensions (canvas pixels)
    pub const BASKET_WIDTH: f32 = 120.0;
    pub const BASKET_HEIGHT: f32 = 60.0;
    /// Gap between the basket bottom and the canvas bottom
    pub const BASKET_BOTTOM_MARGIN: f32 = 20.0;
    /// Horizontal movement per frame while an arrow key is held
    pub const BASKET_KEY_SPEED: f32 = 8.0;

    /// Hearts spawn this far above the visible area
    pub const HEART_SPAWN_Y: f32 = -40.0;
    /// Hearts never spawn closer than this to the right edge
    pub const HEART_SPAWN_MARGIN: f32 = 40.0;
    /// Fall speed range (px/frame)
    pub const HEART_SPEED_MIN: f32 = 6.0;
    pub const HEART_SPEED_MAX: f32 = 7.0;
    /// Visual size range (px)
    pub const HEART_SIZE_MIN: f32 = 30.0;
    pub const HEART_SIZE_MAX: f32 = 40.0;
    /// Spin per frame (degrees)
    pub const HEART_SPIN_PER_FRAME: f32 = 2.0;

    /// Spawn interval while the game runs
    pub const SPAWN_INTERVAL_MS: u64 = 1200;
    /// Pause between the winning catch and the gift page
    pub const WIN_DELAY_MS: u64 = 1000;
    /// Settle time before the gift opening animation restarts
    pub const GIFT_SETTLE_MS: u64 = 100;
    /// Length of the gift opening animation
    pub const GIFT_OPENING_MS: u64 = 5000;

    /// The gate secret. Compared client-side, not a security boundary.
    pub const PASSCODE: &str = "251025";
    /// Number of digit cells
    pub const PASSCODE_LEN: usize = 6;
    /// Delay between the last digit and verification
    pub const VERIFY_SETTLE_MS: u64 = 200;
    /// Delay between a correct passcode and the cards page
    pub const UNLOCK_DELAY_MS: u64 = 800;
    /// Delay before a rejected attempt is cleared
    pub const REJECT_RESET_MS: u64 = 600;

    /// Delay between answering a question and moving on
    pub const QUIZ_ADVANCE_MS: u64 = 1500;
    /// Percentage needed for the middle summary band
    pub const QUIZ_GOOD_PERCENT: u32 = 60;

    /// Decoy button keeps this far from the viewport edges
    pub const DECOY_EDGE_MARGIN: f32 = 40.0;
}

/// Clamp `value` into `[0, max]`, pinning to 0 when `max` is negative.
///
/// `f32::clamp` panics on an inverted range, which happens whenever the
/// canvas is narrower than the basket.
#[inline]
pub fn clamp_span(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}
