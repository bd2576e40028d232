//! Session context
//!
//! `App` owns every component of one page session and is the only place
//! where they meet: input from the host comes in through its methods,
//! visible effects go out through the `Presenter`, and every delayed
//! transition is a `Timer` on its scheduler. The host drives time by
//! calling `advance` and services `HostRequest`s (animation frames,
//! listener attach/detach).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::cards::{CardBody, Catalog};
use crate::consts::*;
use crate::decoy;
use crate::flow::{Millis, PageId, PageRegistry, Reveal, Scheduler, Timer};
use crate::input::{InputTracker, Key};
use crate::passcode::{CellOutcome, PasscodeGate, PasteOutcome, Verdict};
use crate::port::{GateStatus, Presenter};
use crate::quiz::{QuizEngine, Step};
use crate::render;
use crate::settings::Settings;
use crate::sim::{GameState, step};

/// Something only the host can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Call `App::frame` on the next display refresh
    Frame,
    /// Start delivering keyboard, pointer and touch events
    AttachGameInput,
    /// Stop delivering them
    DetachGameInput,
}

/// One page session
pub struct App<P: Presenter> {
    presenter: P,
    settings: Settings,
    catalog: Catalog,
    pages: PageRegistry,
    timers: Scheduler<Timer>,
    requests: Vec<HostRequest>,
    rng: Pcg32,

    game: Option<GameState>,
    input: InputTracker,
    input_attached: bool,

    reveal: Reveal,
    gate: PasscodeGate,

    /// Catalog index of the open quiz and its progress
    quiz: Option<(usize, QuizEngine)>,
}

impl<P: Presenter> App<P> {
    pub fn new(presenter: P, settings: Settings, catalog: Catalog) -> Self {
        let seed = settings.seed.unwrap_or_default();
        let pages = PageRegistry::new(catalog.len());
        log::info!("Session seed {seed}, {} cards", catalog.len());
        Self {
            presenter,
            settings,
            catalog,
            pages,
            timers: Scheduler::new(),
            requests: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            game: None,
            input: InputTracker::default(),
            input_attached: false,
            reveal: Reveal::Closed,
            gate: PasscodeGate::new(),
            quiz: None,
        }
    }

    /// Show the landing page
    pub fn boot(&mut self) {
        self.show_page(PageId::Landing);
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_page(&self) -> Option<PageId> {
        self.pages.active()
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn gate(&self) -> &PasscodeGate {
        &self.gate
    }

    pub fn quiz(&self) -> Option<&QuizEngine> {
        self.quiz.as_ref().map(|(_, engine)| engine)
    }

    pub fn reveal(&self) -> Reveal {
        self.reveal
    }

    // ---------------------------------------------------------------------
    // Host driving
    // ---------------------------------------------------------------------

    pub fn now(&self) -> Millis {
        self.timers.now()
    }

    /// Move the clock to `now` and fire every timer that came due.
    ///
    /// The clock visits each deadline on the way, so timers armed while
    /// firing count from their own firing time.
    pub fn advance(&mut self, now: Millis) {
        while let Some(due) = self.timers.next_deadline().filter(|d| *d <= now) {
            self.timers.set_now(due);
            while let Some(timer) = self.timers.pop_due() {
                log::trace!("Timer {timer:?} at {due}");
                self.on_timer(timer);
            }
        }
        self.timers.set_now(now);
    }

    /// When the host should next call `advance`
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// Take pending host requests
    pub fn drain_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn is_timer_pending(&self, timer: Timer) -> bool {
        self.timers.is_pending(|t| *t == timer)
    }

    fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::SpawnHeart => {
                if let Some(game) = self.game.as_mut().filter(|g| g.is_running()) {
                    game.spawn_heart();
                    self.timers.schedule(SPAWN_INTERVAL_MS, Timer::SpawnHeart);
                }
            }
            Timer::ShowGift => self.show_page(PageId::Gift),
            Timer::OpenGift => {
                if self.reveal == Reveal::Settling {
                    self.reveal = Reveal::Opening;
                    self.presenter.set_gift_opening(true);
                    self.timers.schedule(GIFT_OPENING_MS, Timer::GiftOpened);
                }
            }
            Timer::GiftOpened => {
                if self.reveal == Reveal::Opening {
                    self.reveal = Reveal::Revealed;
                    self.show_passcode();
                }
            }
            Timer::VerifyPasscode => self.verify_passcode(),
            Timer::Unlock => self.show_page(PageId::Cards),
            Timer::ResetGate => self.reset_gate(),
            Timer::QuizAdvance => self.advance_quiz(),
        }
    }

    // ---------------------------------------------------------------------
    // Pages
    // ---------------------------------------------------------------------

    /// Make `id` the only visible page and scroll to the top
    pub fn show_page(&mut self, id: PageId) {
        let previous = self.pages.active();
        if !self.pages.activate(id) {
            log::warn!("No page registered as {id}");
            return;
        }

        for page in self.pages.ids() {
            self.presenter.set_page_active(page, false);
        }
        self.presenter.set_page_active(id, true);
        self.presenter.scroll_to_origin();
        log::info!("Page {} -> {id}", previous.map_or("none".to_string(), |p| p.to_string()));

        if let Some((card, _)) = &self.quiz
            && id != PageId::Card(*card)
        {
            self.timers.cancel_where(|t| *t == Timer::QuizAdvance);
        }

        if id == PageId::Gift {
            // Restart the reveal from scratch so it never plays twice over itself
            self.timers
                .cancel_where(|t| matches!(t, Timer::OpenGift | Timer::GiftOpened));
            self.reveal = Reveal::Settling;
            self.presenter.set_gift_opening(false);
            self.timers.schedule(GIFT_SETTLE_MS, Timer::OpenGift);
        }
    }

    // ---------------------------------------------------------------------
    // Mini-game
    // ---------------------------------------------------------------------

    /// Landing page "play" pressed
    pub fn start_game(&mut self) {
        self.show_page(PageId::Game);

        let Some(size) = self.presenter.canvas_size() else {
            log::warn!("No game canvas; game not started");
            return;
        };
        self.presenter.set_canvas_size(size);

        let seed = self.rng.random::<u64>();
        let game = GameState::new(seed, size.x, size.y);
        self.presenter
            .set_progress(game.score, game.target_score, game.progress());
        self.game = Some(game);
        self.input.clear();
        log::info!("Game started on {}x{} canvas, seed {seed}", size.x, size.y);

        if !self.input_attached {
            self.input_attached = true;
            self.requests.push(HostRequest::AttachGameInput);
        }

        self.timers
            .cancel_where(|t| matches!(t, Timer::SpawnHeart | Timer::ShowGift));
        self.timers.schedule(SPAWN_INTERVAL_MS, Timer::SpawnHeart);

        self.run_frame();
    }

    /// Animation frame callback. A frame arriving after the win is a no-op.
    pub fn frame(&mut self) {
        self.run_frame();
    }

    fn run_frame(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if !game.is_running() {
            return;
        }

        let report = step(game, &self.input.tick_input());
        let commands = render::compose(game, &report, !self.settings.reduced_motion);
        self.presenter.draw(&commands);
        if report.scored() {
            self.presenter
                .set_progress(game.score, game.target_score, game.progress());
        }

        if report.won {
            self.win();
        } else {
            self.requests.push(HostRequest::Frame);
        }
    }

    fn win(&mut self) {
        log::info!("Game won");
        self.detach_input();
        self.timers.cancel_where(|t| *t == Timer::SpawnHeart);
        self.timers.schedule(WIN_DELAY_MS, Timer::ShowGift);
    }

    fn detach_input(&mut self) {
        self.input.clear();
        if self.input_attached {
            self.input_attached = false;
            self.requests.push(HostRequest::DetachGameInput);
        }
    }

    fn running_game(&mut self) -> Option<&mut GameState> {
        if !self.input_attached {
            return None;
        }
        self.game.as_mut().filter(|g| g.is_running())
    }

    pub fn key_down(&mut self, key: Key) {
        if self.running_game().is_some() {
            self.input.key_down(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    /// Pointer or touch moved to canvas-relative `x`
    pub fn pointer_moved(&mut self, x: f32) {
        let Some(game) = self.running_game() else {
            return;
        };
        let width = game.width;
        game.basket.follow(x, width);
    }

    /// Viewport resized; resync the canvas while a game runs
    pub fn resize(&mut self) {
        let Some(size) = self.presenter.canvas_size() else {
            return;
        };
        let Some(game) = self.game.as_mut().filter(|g| g.is_running()) else {
            return;
        };
        self.presenter.set_canvas_size(size);
        game.resize(size.x, size.y);
        log::debug!("Canvas resized to {}x{}", size.x, size.y);
    }

    // ---------------------------------------------------------------------
    // Passcode gate
    // ---------------------------------------------------------------------

    fn show_passcode(&mut self) {
        self.show_page(PageId::Passcode);
        self.timers.cancel_where(|t| {
            matches!(t, Timer::VerifyPasscode | Timer::ResetGate | Timer::Unlock)
        });
        self.gate = PasscodeGate::new();
        self.sync_cells();
        self.presenter.set_gate_status(GateStatus::Idle);
        self.presenter.set_gate_alarm(false, false);
        self.presenter.focus_cell(0);
    }

    fn sync_cells(&mut self) {
        for i in 0..PASSCODE_LEN {
            self.presenter.set_cell(i, &self.gate.cell_text(i));
        }
    }

    /// Cell `index` now holds `value`
    pub fn cell_input(&mut self, index: usize, value: &str) {
        match self.gate.input(index, value) {
            CellOutcome::Rejected => self.presenter.set_cell(index, ""),
            CellOutcome::Accepted { focus, verify } => {
                self.presenter.set_cell(index, value);
                if let Some(next) = focus {
                    self.presenter.focus_cell(next);
                }
                if verify {
                    self.timers.schedule(VERIFY_SETTLE_MS, Timer::VerifyPasscode);
                }
            }
        }
    }

    /// Backspace pressed in cell `index`
    pub fn cell_backspace(&mut self, index: usize) {
        if let Some(prev) = self.gate.backspace(index) {
            self.presenter.focus_cell(prev);
        }
    }

    /// Text pasted while cell `index` had focus
    pub fn cell_paste(&mut self, index: usize, text: &str) {
        match self.gate.paste(index, text) {
            PasteOutcome::Rejected => log::debug!("Paste ignored"),
            PasteOutcome::Complete => {
                self.sync_cells();
                self.timers.schedule(VERIFY_SETTLE_MS, Timer::VerifyPasscode);
            }
            PasteOutcome::Partial { focus } => {
                self.sync_cells();
                if let Some(next) = focus {
                    self.presenter.focus_cell(next);
                }
            }
        }
    }

    fn verify_passcode(&mut self) {
        match self.gate.verify() {
            Verdict::Incomplete => {}
            Verdict::Accepted => {
                log::info!("Passcode accepted");
                self.presenter.set_gate_status(GateStatus::Success);
                self.timers.schedule(UNLOCK_DELAY_MS, Timer::Unlock);
            }
            Verdict::Rejected => {
                log::info!("Passcode rejected");
                self.presenter.set_gate_status(GateStatus::Error);
                self.presenter
                    .set_gate_alarm(true, !self.settings.reduced_motion);
                self.timers.cancel_where(|t| *t == Timer::ResetGate);
                self.timers.schedule(REJECT_RESET_MS, Timer::ResetGate);
            }
        }
    }

    fn reset_gate(&mut self) {
        self.gate.clear();
        self.sync_cells();
        self.presenter.set_gate_alarm(false, false);
        self.presenter.set_gate_status(GateStatus::Idle);
        self.presenter.focus_cell(0);
    }

    // ---------------------------------------------------------------------
    // Cards
    // ---------------------------------------------------------------------

    /// Open card `index`, preparing its content first
    pub fn open_card(&mut self, index: usize) {
        let Some(card) = self.catalog.get(index) else {
            log::warn!("No card {index}");
            return;
        };

        match &card.body {
            CardBody::Quiz { quiz } => {
                self.timers.cancel_where(|t| *t == Timer::QuizAdvance);
                let engine = QuizEngine::new(quiz.clone());
                if let Some(view) = engine.current() {
                    self.presenter.show_question(&view);
                }
                self.quiz = Some((index, engine));
            }
            CardBody::Memory { story } => self.presenter.show_story(story),
            CardBody::Text { .. } => {}
        }

        self.show_page(PageId::Card(index));
    }

    pub fn back_to_cards(&mut self) {
        self.show_page(PageId::Cards);
    }

    /// Quiz option `choice` clicked
    pub fn select_answer(&mut self, choice: usize) {
        let Some((_, engine)) = self.quiz.as_mut() else {
            return;
        };
        let Some(feedback) = engine.select(choice) else {
            return;
        };
        self.presenter.mark_answer(&feedback);
        self.timers.schedule(QUIZ_ADVANCE_MS, Timer::QuizAdvance);
    }

    fn advance_quiz(&mut self) {
        let Some((_, engine)) = self.quiz.as_mut() else {
            return;
        };
        match engine.advance() {
            Step::Question(view) => self.presenter.show_question(&view),
            Step::Finished(summary) => {
                log::info!("Quiz finished {}/{}", summary.correct, summary.total);
                self.presenter.show_summary(&summary);
            }
        }
    }

    pub fn retry_quiz(&mut self) {
        let Some((_, engine)) = self.quiz.as_mut() else {
            return;
        };
        self.timers.cancel_where(|t| *t == Timer::QuizAdvance);
        engine.reset();
        if let Some(view) = engine.current() {
            self.presenter.show_question(&view);
        }
    }

    // ---------------------------------------------------------------------
    // Decoy
    // ---------------------------------------------------------------------

    /// The pointer reached the decoy button
    pub fn dodge_decoy(&mut self, viewport: Vec2, button: Vec2) {
        let offset = decoy::escape_offset(&mut self.rng, viewport, button);
        self.presenter.move_decoy(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Recorder;

    fn app() -> App<Recorder> {
        let settings = Settings {
            seed: Some(7),
            ..Settings::default()
        };
        let mut app = App::new(
            Recorder::with_canvas(400.0, 600.0),
            settings,
            Catalog::builtin().unwrap(),
        );
        app.boot();
        app
    }

    #[test]
    fn test_boot_shows_landing() {
        let app = app();
        assert_eq!(app.active_page(), Some(PageId::Landing));
        assert_eq!(app.presenter().active_pages(), vec![PageId::Landing]);
    }

    #[test]
    fn test_start_game_requests_input_and_frame() {
        let mut app = app();
        app.start_game();
        assert_eq!(
            app.drain_requests(),
            vec![HostRequest::AttachGameInput, HostRequest::Frame]
        );
        assert_eq!(app.presenter().frames, 1);
        assert_eq!(app.presenter().progress, (0, TARGET_SCORE));
        assert_eq!(app.presenter().meter_fill, 0.0);
        assert_eq!(app.next_deadline(), Some(SPAWN_INTERVAL_MS));
    }

    #[test]
    fn test_start_game_without_canvas() {
        let mut app = App::new(
            Recorder::default(),
            Settings::default(),
            Catalog::builtin().unwrap(),
        );
        app.start_game();
        assert_eq!(app.active_page(), Some(PageId::Game));
        assert!(app.game().is_none());
        assert!(app.drain_requests().is_empty());
    }

    #[test]
    fn test_spawn_timer_repeats() {
        let mut app = app();
        app.start_game();
        app.advance(SPAWN_INTERVAL_MS * 3);
        assert_eq!(app.game().unwrap().hearts.len(), 3);
        assert_eq!(app.next_deadline(), Some(SPAWN_INTERVAL_MS * 4));
    }

    #[test]
    fn test_keys_ignored_when_detached() {
        let mut app = app();
        app.key_down(Key::Right);
        app.start_game();
        let x = app.game().unwrap().basket.pos.x;
        app.frame();
        assert_eq!(app.game().unwrap().basket.pos.x, x);

        app.key_down(Key::Right);
        app.frame();
        assert_eq!(app.game().unwrap().basket.pos.x, x + BASKET_KEY_SPEED);
    }

    #[test]
    fn test_unknown_card_is_ignored() {
        let mut app = app();
        app.open_card(99);
        assert_eq!(app.active_page(), Some(PageId::Landing));
    }

    #[test]
    fn test_decoy_moves() {
        let mut app = app();
        app.dodge_decoy(Vec2::new(800.0, 600.0), Vec2::new(120.0, 40.0));
        assert!(app.presenter().decoy.is_some());
    }
}
