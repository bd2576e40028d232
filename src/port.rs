//! Presentation port
//!
//! Everything the app needs from a display surface. The browser binding
//! implements it over the DOM and a 2D canvas; `Recorder` implements it in
//! memory for tests and headless runs.

use std::collections::HashMap;

use glam::Vec2;

use crate::cards::StoryBlock;
use crate::flow::PageId;
use crate::quiz::{Feedback, QuestionView, Summary};
use crate::render::DrawCmd;

/// Gate status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateStatus {
    #[default]
    Idle,
    Success,
    Error,
}

pub trait Presenter {
    /// Add or remove the active marker on a page container
    fn set_page_active(&mut self, page: PageId, active: bool);
    /// Reset viewport scroll to the origin
    fn scroll_to_origin(&mut self);
    /// Toggle the gift opening animation
    fn set_gift_opening(&mut self, active: bool);

    /// Layout size of the game canvas host, `None` when there is no canvas
    fn canvas_size(&self) -> Option<Vec2>;
    /// Resize the canvas drawing buffer
    fn set_canvas_size(&mut self, size: Vec2);
    /// Execute one frame of draw commands
    fn draw(&mut self, commands: &[DrawCmd]);
    /// Update the love meter; `fill` is already capped to 0.0..=1.0
    fn set_progress(&mut self, score: u32, target: u32, fill: f32);

    fn set_cell(&mut self, index: usize, value: &str);
    fn focus_cell(&mut self, index: usize);
    fn set_gate_status(&mut self, status: GateStatus);
    /// Red borders plus (optionally) the shake on the gate card
    fn set_gate_alarm(&mut self, on: bool, shake: bool);

    fn show_question(&mut self, view: &QuestionView<'_>);
    /// Disable options and color the correct / chosen ones
    fn mark_answer(&mut self, feedback: &Feedback);
    fn show_summary(&mut self, summary: &Summary);

    fn show_story(&mut self, blocks: &[StoryBlock]);

    /// Move the decoy button by `offset` from the viewport center
    fn move_decoy(&mut self, offset: Vec2);
}

/// In-memory presenter that records the latest state of every surface
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub canvas: Option<Vec2>,
    pub pages: HashMap<PageId, bool>,
    pub scrolls: u32,
    pub gift_opening: bool,
    pub frames: u32,
    pub last_frame: Vec<DrawCmd>,
    pub progress: (u32, u32),
    pub meter_fill: f32,
    pub cells: [String; crate::consts::PASSCODE_LEN],
    pub focused: Option<usize>,
    pub gate_status: GateStatus,
    pub gate_alarm: bool,
    pub shaking: bool,
    /// (number, total, prompt) of the question on screen
    pub question: Option<(usize, usize, String)>,
    pub marked: Option<Feedback>,
    pub summary: Option<Summary>,
    pub story_blocks: usize,
    pub decoy: Option<Vec2>,
}

impl Recorder {
    /// Recorder with a canvas host of the given size
    pub fn with_canvas(width: f32, height: f32) -> Self {
        Self {
            canvas: Some(Vec2::new(width, height)),
            ..Self::default()
        }
    }

    /// Pages currently carrying the active marker
    pub fn active_pages(&self) -> Vec<PageId> {
        self.pages
            .iter()
            .filter(|(_, a)| **a)
            .map(|(p, _)| *p)
            .collect()
    }

    pub fn cell_values(&self) -> Vec<&str> {
        self.cells.iter().map(String::as_str).collect()
    }
}

impl Presenter for Recorder {
    fn set_page_active(&mut self, page: PageId, active: bool) {
        self.pages.insert(page, active);
    }

    fn scroll_to_origin(&mut self) {
        self.scrolls += 1;
    }

    fn set_gift_opening(&mut self, active: bool) {
        self.gift_opening = active;
    }

    fn canvas_size(&self) -> Option<Vec2> {
        self.canvas
    }

    fn set_canvas_size(&mut self, size: Vec2) {
        self.canvas = Some(size);
    }

    fn draw(&mut self, commands: &[DrawCmd]) {
        self.frames += 1;
        self.last_frame = commands.to_vec();
    }

    fn set_progress(&mut self, score: u32, target: u32, fill: f32) {
        self.progress = (score, target);
        self.meter_fill = fill;
    }

    fn set_cell(&mut self, index: usize, value: &str) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value.to_string();
        }
    }

    fn focus_cell(&mut self, index: usize) {
        self.focused = Some(index);
    }

    fn set_gate_status(&mut self, status: GateStatus) {
        self.gate_status = status;
    }

    fn set_gate_alarm(&mut self, on: bool, shake: bool) {
        self.gate_alarm = on;
        self.shaking = on && shake;
    }

    fn show_question(&mut self, view: &QuestionView<'_>) {
        self.question = Some((view.number, view.total, view.question.question.clone()));
        self.marked = None;
        self.summary = None;
    }

    fn mark_answer(&mut self, feedback: &Feedback) {
        self.marked = Some(*feedback);
    }

    fn show_summary(&mut self, summary: &Summary) {
        self.question = None;
        self.summary = Some(*summary);
    }

    fn show_story(&mut self, blocks: &[StoryBlock]) {
        self.story_blocks = blocks.len();
    }

    fn move_decoy(&mut self, offset: Vec2) {
        self.decoy = Some(offset);
    }
}
