//! The landing page's runaway "not now" button
//!
//! Whenever the pointer reaches it, the button jumps to a random offset from
//! the viewport center.

use glam::Vec2;
use rand::Rng;

use crate::consts::DECOY_EDGE_MARGIN;

/// Random offset from the viewport center for a button of `button` size
pub fn escape_offset<R: Rng>(rng: &mut R, viewport: Vec2, button: Vec2) -> Vec2 {
    let span = (viewport - button - Vec2::splat(DECOY_EDGE_MARGIN)).max(Vec2::ZERO);
    let roll = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
    roll * span - viewport / 2.0 + Vec2::splat(DECOY_EDGE_MARGIN / 2.0)
}
