//! Game state and core simulation types
//!
//! One `GameState` lives for one game session: created when the game page
//! is entered, frozen once the target score is reached.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::clamp_span;
use crate::consts::*;

/// Current phase of the mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Hearts falling, frames scheduled
    Running,
    /// Target reached; no further frames or spawns
    Won,
}

/// The player-controlled catch rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Basket {
    /// Basket centered horizontally and anchored near the bottom
    pub fn centered(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                canvas_width / 2.0 - BASKET_WIDTH / 2.0,
                Self::anchor_y(canvas_height),
            ),
            width: BASKET_WIDTH,
            height: BASKET_HEIGHT,
        }
    }

    /// Vertical anchor for a canvas of the given height
    pub fn anchor_y(canvas_height: f32) -> f32 {
        canvas_height - BASKET_HEIGHT - BASKET_BOTTOM_MARGIN
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    /// Keep the basket inside `[0, canvas_width]`
    pub fn clamp_to(&mut self, canvas_width: f32) {
        self.pos.x = clamp_span(self.pos.x, canvas_width - self.width);
    }

    /// Center the basket under a pointer x coordinate
    pub fn follow(&mut self, pointer_x: f32, canvas_width: f32) {
        self.pos.x = pointer_x - self.width / 2.0;
        self.clamp_to(canvas_width);
    }
}

/// A falling heart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heart {
    pub id: u32,
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    /// Fall speed (px/frame)
    pub speed: f32,
    /// Side of the bounding square (px)
    pub size: f32,
    /// Rotation in degrees
    pub rotation: f32,
}

impl Heart {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the spawner RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    /// Hearts caught so far
    pub score: u32,
    /// Win threshold
    pub target_score: u32,
    /// Canvas drawing-buffer size
    pub width: f32,
    pub height: f32,
    pub basket: Basket,
    /// Live hearts in spawn order
    pub hearts: Vec<Heart>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Start a session on a canvas of the given size
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            seed,
            phase: GamePhase::Running,
            score: 0,
            target_score: TARGET_SCORE,
            width,
            height,
            basket: Basket::centered(width, height),
            hearts: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one heart above the visible area.
    ///
    /// Returns `false` (and spawns nothing) once the session is won or the
    /// score has reached the target.
    pub fn spawn_heart(&mut self) -> bool {
        if !self.is_running() || self.score >= self.target_score {
            return false;
        }

        let span = (self.width - HEART_SPAWN_MARGIN).max(0.0);
        let x = self.rng.random::<f32>() * span;
        let speed = self.rng.random_range(HEART_SPEED_MIN..HEART_SPEED_MAX);
        let size = self.rng.random_range(HEART_SIZE_MIN..HEART_SIZE_MAX);
        let rotation = self.rng.random_range(0.0..360.0);

        let id = self.next_entity_id();
        self.hearts.push(Heart {
            id,
            pos: Vec2::new(x, HEART_SPAWN_Y),
            speed,
            size,
            rotation,
        });
        true
    }

    /// Resynchronize to a new canvas size.
    ///
    /// The basket keeps its proportional horizontal placement; its vertical
    /// anchor is recomputed from the new height.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.width > 0.0 {
            self.basket.pos.x = self.basket.pos.x / self.width * width;
        }
        self.basket.pos.y = Basket::anchor_y(height);
        self.width = width;
        self.height = height;
    }

    /// Love meter fill, 0.0..=1.0
    pub fn progress(&self) -> f32 {
        if self.target_score == 0 {
            return 1.0;
        }
        (self.score as f32 / self.target_score as f32).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_layout() {
        let state = GameState::new(7, 800.0, 600.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.target_score, TARGET_SCORE);
        assert!(state.hearts.is_empty());
        assert_eq!(state.basket.pos, Vec2::new(340.0, 520.0));
    }

    #[test]
    fn test_spawn_ranges() {
        let mut state = GameState::new(42, 500.0, 700.0);
        for _ in 0..200 {
            assert!(state.spawn_heart());
        }
        for heart in &state.hearts {
            assert!(heart.pos.x >= 0.0 && heart.pos.x < 460.0);
            assert_eq!(heart.pos.y, HEART_SPAWN_Y);
            assert!((HEART_SPEED_MIN..HEART_SPEED_MAX).contains(&heart.speed));
            assert!((HEART_SIZE_MIN..HEART_SIZE_MAX).contains(&heart.size));
            assert!((0.0..360.0).contains(&heart.rotation));
        }
        // Spawn order is append order
        assert!(state.hearts.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_progress_fill() {
        let mut state = GameState::new(5, 400.0, 400.0);
        state.target_score = 4;
        assert_eq!(state.progress(), 0.0);
        state.score = 2;
        assert_eq!(state.progress(), 0.5);
        state.score = 9;
        assert_eq!(state.progress(), 1.0);
        state.target_score = 0;
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_spawn_blocked_after_win() {
        let mut state = GameState::new(1, 400.0, 400.0);
        state.score = state.target_score;
        assert!(!state.spawn_heart());

        let mut state = GameState::new(1, 400.0, 400.0);
        state.phase = GamePhase::Won;
        assert!(!state.spawn_heart());
        assert!(state.hearts.is_empty());
    }

    #[test]
    fn test_same_seed_same_hearts() {
        let mut a = GameState::new(99, 640.0, 480.0);
        let mut b = GameState::new(99, 640.0, 480.0);
        for _ in 0..10 {
            a.spawn_heart();
            b.spawn_heart();
        }
        assert_eq!(a.hearts, b.hearts);
    }

    #[test]
    fn test_basket_follow_clamps() {
        let mut basket = Basket::centered(300.0, 300.0);
        basket.follow(10.0, 300.0);
        assert_eq!(basket.pos.x, 0.0);
        basket.follow(299.0, 300.0);
        assert_eq!(basket.pos.x, 180.0);
        // Canvas narrower than the basket pins it to the left edge
        basket.follow(40.0, 80.0);
        assert_eq!(basket.pos.x, 0.0);
    }

    #[test]
    fn test_resize_rescales_basket() {
        let mut state = GameState::new(3, 800.0, 600.0);
        state.basket.pos.x = 200.0;
        state.resize(400.0, 900.0);
        assert_eq!(state.basket.pos.x, 100.0);
        assert_eq!(state.basket.pos.y, 900.0 - BASKET_HEIGHT - BASKET_BOTTOM_MARGIN);
        assert_eq!((state.width, state.height), (400.0, 900.0));
    }
}
