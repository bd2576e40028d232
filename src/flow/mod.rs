//! Page navigation and timed transitions
//!
//! `pages` holds the mutually exclusive page markers, `schedule` the
//! virtual-clock queue every delayed transition goes through, and `Reveal`
//! names the stages of the gift opening sequence.

pub mod pages;
pub mod schedule;

pub use pages::{PageId, PageRegistry};
pub use schedule::{Millis, Scheduler};

/// Stages of the gift opening sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reveal {
    /// Gift page not entered yet
    #[default]
    Closed,
    /// Container reset, waiting to restart the animation
    Settling,
    /// Opening animation playing
    Opening,
    /// Animation finished, passcode page shown
    Revealed,
}

/// Named timer events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Spawn interval elapsed
    SpawnHeart,
    /// Win delay elapsed, show the gift page
    ShowGift,
    /// Settle delay elapsed, start the opening animation
    OpenGift,
    /// Opening animation finished
    GiftOpened,
    /// Settle delay after the last digit or a full paste
    VerifyPasscode,
    /// Correct passcode, show the cards
    Unlock,
    /// Clear a rejected attempt
    ResetGate,
    /// Move past the answered quiz question
    QuizAdvance,
}
