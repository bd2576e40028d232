//! Heart Gift entry point
//!
//! On the web this boots the page binding. Natively there is no display,
//! so it plays one scripted session headless and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    use heart_gift::{Catalog, Settings};

    console_error_panic_hook::set_once();
    let mut settings = Settings::load();
    let _ = console_log::init_with_level(settings.level());
    log::info!("Heart gift starting...");

    let catalog = Catalog::builtin().map_err(|e| {
        log::error!("Card catalog rejected: {e}");
        JsValue::from_str(&e.to_string())
    })?;

    if settings.seed.is_none() {
        settings.seed = Some(js_sys::Date::now() as u64);
    }
    heart_gift::platform::web::run(settings, catalog)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Heart gift (native) starting...");
    log::info!("Native mode has no display - build for wasm32 to get the page");

    match headless::run() {
        Ok(report) => println!("\n✓ Headless session finished: {report}"),
        Err(e) => {
            log::error!("Headless session failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

/// Scripted session against the recording presenter
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use heart_gift::consts::*;
    use heart_gift::flow::{Millis, PageId};
    use heart_gift::port::Recorder;
    use heart_gift::{App, Catalog, HostRequest, Settings};

    const FRAME_MS: Millis = 16;
    const MAX_FRAMES: u32 = 20_000;

    struct Session {
        app: App<Recorder>,
        now: Millis,
    }

    impl Session {
        fn wait(&mut self, ms: Millis) {
            self.now += ms;
            self.app.advance(self.now);
        }

        fn expect_page(&self, page: PageId) -> Result<(), String> {
            match self.app.active_page() {
                Some(p) if p == page => Ok(()),
                other => Err(format!("expected {page}, on {other:?}")),
            }
        }

        /// Steer under the lowest heart until the game is won
        fn play(&mut self) -> Result<u32, String> {
            self.app.start_game();
            let mut frames = 0;
            while frames < MAX_FRAMES {
                let wants_frame = self
                    .app
                    .drain_requests()
                    .contains(&HostRequest::Frame);
                if !wants_frame {
                    break;
                }
                self.wait(FRAME_MS);
                let lowest = self.app.game().and_then(|g| {
                    g.hearts
                        .iter()
                        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                        .map(|h| h.center().x)
                });
                if let Some(x) = lowest {
                    self.app.pointer_moved(x);
                }
                self.app.frame();
                frames += 1;
            }

            match self.app.game() {
                Some(g) if !g.is_running() => Ok(frames),
                _ => Err(format!("game not won after {frames} frames")),
            }
        }

        fn unlock(&mut self) -> Result<(), String> {
            self.wait(WIN_DELAY_MS + GIFT_SETTLE_MS + GIFT_OPENING_MS);
            self.expect_page(PageId::Passcode)?;

            // One wrong attempt first
            self.app.cell_paste(0, "123456");
            self.wait(VERIFY_SETTLE_MS + REJECT_RESET_MS);
            self.expect_page(PageId::Passcode)?;

            for (i, digit) in PASSCODE.chars().enumerate() {
                self.app.cell_input(i, &digit.to_string());
            }
            self.wait(VERIFY_SETTLE_MS + UNLOCK_DELAY_MS);
            self.expect_page(PageId::Cards)
        }

        fn quiz(&mut self) -> Result<String, String> {
            let card = self
                .app
                .catalog()
                .quiz_card()
                .ok_or("catalog has no quiz")?;
            self.app.open_card(card);

            let total = self.app.quiz().map_or(0, |q| q.total());
            for _ in 0..total {
                let correct = self
                    .app
                    .quiz()
                    .and_then(|q| q.current())
                    .map(|view| view.question.correct)
                    .ok_or("quiz ended early")?;
                self.app.select_answer(correct);
                self.wait(QUIZ_ADVANCE_MS);
            }

            let summary = self
                .app
                .presenter()
                .summary
                .ok_or("quiz shows no summary")?;
            self.app.back_to_cards();
            Ok(format!(
                "{}/{} ({})",
                summary.correct,
                summary.total,
                summary.band.message()
            ))
        }
    }

    pub fn run() -> Result<String, Box<dyn Error>> {
        let settings = Settings {
            seed: Some(2025),
            ..Settings::default()
        };
        let mut session = Session {
            app: App::new(Recorder::with_canvas(400.0, 600.0), settings, Catalog::builtin()?),
            now: 0,
        };
        session.app.boot();

        let frames = session.play()?;
        log::info!("Caught {TARGET_SCORE} hearts in {frames} frames");
        session.unlock()?;
        let result = session.quiz()?;
        session.expect_page(PageId::Cards)?;

        Ok(format!("won in {frames} frames, quiz {result}"))
    }
}
