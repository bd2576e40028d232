//! Per-frame simulation step
//!
//! Advances one display refresh: basket movement, heart fall, catches,
//! misses and the win condition.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Held-key input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// ArrowLeft held
    pub left: bool,
    /// ArrowRight held
    pub right: bool,
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Last positions of hearts caught this frame (for the catch flourish)
    pub caught: Vec<Vec2>,
    /// Hearts that fell past the bottom edge this frame
    pub missed: u32,
    /// The target score was reached this frame
    pub won: bool,
}

impl FrameReport {
    pub fn scored(&self) -> bool {
        !self.caught.is_empty()
    }
}

/// Advance the game by one frame.
///
/// Hearts are visited newest first so removal never disturbs the ones still
/// to be processed. Reaching the target stops the frame immediately; hearts
/// not yet visited are left untouched.
pub fn step(state: &mut GameState, input: &TickInput) -> FrameReport {
    let mut report = FrameReport::default();
    if state.phase != GamePhase::Running {
        return report;
    }

    if input.left {
        state.basket.pos.x -= BASKET_KEY_SPEED;
    }
    if input.right {
        state.basket.pos.x += BASKET_KEY_SPEED;
    }
    state.basket.clamp_to(state.width);

    let basket = state.basket.rect();
    let mut i = state.hearts.len();
    while i > 0 {
        i -= 1;

        let heart = &mut state.hearts[i];
        heart.pos.y += heart.speed;
        heart.rotation = (heart.rotation + HEART_SPIN_PER_FRAME) % 360.0;

        if heart.rect().overlaps(&basket) {
            let heart = state.hearts.remove(i);
            state.score += 1;
            report.caught.push(heart.pos);

            if state.score >= state.target_score {
                state.phase = GamePhase::Won;
                report.won = true;
                log::info!("Target reached with score {}", state.score);
                return report;
            }
            continue;
        }

        if heart.pos.y > state.height {
            state.hearts.remove(i);
            report.missed += 1;
        }
    }

    report
}
