//! Frame composition
//!
//! Turns game state into an immediate-mode command list. Pure: the web
//! painter (or a test) decides what the commands mean in pixels.

use glam::Vec2;

use crate::sim::{FrameReport, GameState};

/// Basket colors
pub const BASKET_FILL: &str = "#ec4899";
pub const BASKET_HANDLE: &str = "#be185d";
pub const BASKET_WEAVE: &str = "#f472b6";

/// Glyphs
pub const HEART_GLYPH: &str = "💕";
pub const FLOURISH_GLYPH: &str = "💖";
pub const FLOURISH_SIZE: f32 = 40.0;

/// One immediate-mode draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    /// Wipe the whole canvas
    Clear { width: f32, height: f32 },
    /// Heart glyph centered at `center`, rotated by `rotation` radians
    Heart { center: Vec2, size: f32, rotation: f32 },
    /// Catch sparkle at a heart's last position
    Flourish { pos: Vec2 },
    /// Basket with its top-left corner at `pos`
    Basket { pos: Vec2, width: f32, height: f32 },
}

/// Commands for one frame.
///
/// Hearts are drawn in the same newest-first order the step visits them,
/// then catch flourishes, then the basket on top.
pub fn compose(state: &GameState, report: &FrameReport, flourishes: bool) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(state.hearts.len() + report.caught.len() + 2);
    cmds.push(DrawCmd::Clear {
        width: state.width,
        height: state.height,
    });

    cmds.extend(state.hearts.iter().rev().map(|h| DrawCmd::Heart {
        center: h.center(),
        size: h.size,
        rotation: h.rotation.to_radians(),
    }));

    if flourishes {
        cmds.extend(report.caught.iter().map(|&pos| DrawCmd::Flourish { pos }));
    }

    cmds.push(DrawCmd::Basket {
        pos: state.basket.pos,
        width: state.basket.width,
        height: state.basket.height,
    });
    cmds
}
