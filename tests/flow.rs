//! Whole-session tests driving `App` through the recording presenter

use glam::Vec2;
use proptest::prelude::*;

use heart_gift::consts::*;
use heart_gift::flow::{PageId, Reveal, Timer};
use heart_gift::input::Key;
use heart_gift::port::{GateStatus, Recorder};
use heart_gift::quiz::Band;
use heart_gift::sim::Heart;
use heart_gift::{App, Catalog, HostRequest, Settings};

fn app_with(settings: Settings) -> App<Recorder> {
    let mut app = App::new(
        Recorder::with_canvas(400.0, 600.0),
        settings,
        Catalog::builtin().unwrap(),
    );
    app.boot();
    app
}

fn app() -> App<Recorder> {
    app_with(Settings {
        seed: Some(99),
        ..Settings::default()
    })
}

/// Drop a heart straight onto the basket and run one frame
fn catch_one(app: &mut App<Recorder>) {
    let game = app.game_mut().unwrap();
    let rim = game.basket.rect().min;
    game.hearts.push(Heart {
        id: 1000 + game.score,
        pos: Vec2::new(rim.x, rim.y - 5.0),
        speed: 6.0,
        size: 30.0,
        rotation: 0.0,
    });
    app.frame();
}

fn win(app: &mut App<Recorder>) {
    app.start_game();
    for _ in 0..TARGET_SCORE {
        catch_one(app);
    }
}

fn to_passcode(app: &mut App<Recorder>) {
    win(app);
    let now = app.now();
    app.advance(now + WIN_DELAY_MS + GIFT_SETTLE_MS + GIFT_OPENING_MS);
    assert_eq!(app.active_page(), Some(PageId::Passcode));
}

fn type_code(app: &mut App<Recorder>, code: &str) {
    for (i, c) in code.chars().enumerate() {
        app.cell_input(i, &c.to_string());
    }
}

fn wait(app: &mut App<Recorder>, ms: u64) {
    let now = app.now();
    app.advance(now + ms);
}

#[test]
fn test_full_session() {
    let mut app = app();
    assert_eq!(app.active_page(), Some(PageId::Landing));

    win(&mut app);
    assert_eq!(app.presenter().progress, (TARGET_SCORE, TARGET_SCORE));
    assert_eq!(app.presenter().meter_fill, 1.0);
    assert_eq!(app.active_page(), Some(PageId::Game));

    wait(&mut app, WIN_DELAY_MS);
    assert_eq!(app.active_page(), Some(PageId::Gift));
    assert_eq!(app.reveal(), Reveal::Settling);
    assert!(!app.presenter().gift_opening);

    wait(&mut app, GIFT_SETTLE_MS);
    assert_eq!(app.reveal(), Reveal::Opening);
    assert!(app.presenter().gift_opening);

    wait(&mut app, GIFT_OPENING_MS);
    assert_eq!(app.reveal(), Reveal::Revealed);
    assert_eq!(app.active_page(), Some(PageId::Passcode));
    assert_eq!(app.presenter().focused, Some(0));

    type_code(&mut app, PASSCODE);
    wait(&mut app, VERIFY_SETTLE_MS);
    assert_eq!(app.presenter().gate_status, GateStatus::Success);
    assert_eq!(app.active_page(), Some(PageId::Passcode));

    wait(&mut app, UNLOCK_DELAY_MS);
    assert_eq!(app.active_page(), Some(PageId::Cards));
    assert_eq!(app.presenter().active_pages(), vec![PageId::Cards]);
}

#[test]
fn test_win_detaches_input_and_stops_frames() {
    let mut app = app();
    win(&mut app);

    let requests = app.drain_requests();
    assert_eq!(requests.first(), Some(&HostRequest::AttachGameInput));
    assert_eq!(requests.last(), Some(&HostRequest::DetachGameInput));
    assert!(!app.game().unwrap().is_running());

    let frames = app.presenter().frames;
    app.frame();
    app.key_down(Key::Left);
    app.pointer_moved(0.0);
    assert_eq!(app.presenter().frames, frames);
    assert!(app.drain_requests().is_empty());
    assert!(!app.is_timer_pending(Timer::SpawnHeart));
}

#[test]
fn test_frames_continue_until_win() {
    let mut app = app();
    app.start_game();
    catch_one(&mut app);
    assert_eq!(app.presenter().progress, (1, TARGET_SCORE));
    assert_eq!(app.presenter().meter_fill, 1.0 / TARGET_SCORE as f32);
    assert_eq!(app.drain_requests().last(), Some(&HostRequest::Frame));
}

#[test]
fn test_deadline_steady_between_spawns() {
    let mut app = app();
    app.start_game();
    let first = app.next_deadline();
    assert_eq!(first, Some(SPAWN_INTERVAL_MS));

    // Frames and pointer moves leave the pending timeout alone
    for i in 0..(SPAWN_INTERVAL_MS / 16 - 1) {
        wait(&mut app, 16);
        app.pointer_moved(i as f32);
        app.frame();
        assert_eq!(app.next_deadline(), first);
    }

    wait(&mut app, 16);
    assert_eq!(app.next_deadline(), Some(2 * SPAWN_INTERVAL_MS));
}

#[test]
fn test_missed_heart_does_not_score() {
    let mut app = app();
    app.start_game();
    let game = app.game_mut().unwrap();
    let height = game.height;
    game.hearts.push(Heart {
        id: 1,
        pos: Vec2::new(0.0, height - 1.0),
        speed: 6.0,
        size: 30.0,
        rotation: 0.0,
    });
    game.basket.pos.x = 300.0;
    app.frame();
    assert!(app.game().unwrap().hearts.is_empty());
    assert_eq!(app.game().unwrap().score, 0);
}

#[test]
fn test_wrong_code_rejects_then_resets() {
    let mut app = app();
    to_passcode(&mut app);

    type_code(&mut app, "123456");
    wait(&mut app, VERIFY_SETTLE_MS);
    assert_eq!(app.presenter().gate_status, GateStatus::Error);
    assert!(app.presenter().gate_alarm);
    assert!(app.presenter().shaking);

    wait(&mut app, REJECT_RESET_MS);
    assert_eq!(app.presenter().gate_status, GateStatus::Idle);
    assert!(!app.presenter().gate_alarm);
    assert_eq!(app.presenter().cell_values(), vec![""; PASSCODE_LEN]);
    assert_eq!(app.presenter().focused, Some(0));
    assert_eq!(app.active_page(), Some(PageId::Passcode));
}

#[test]
fn test_reduced_motion_skips_shake_and_flourish() {
    let mut app = app_with(Settings {
        seed: Some(3),
        reduced_motion: true,
        ..Settings::default()
    });
    app.start_game();
    catch_one(&mut app);
    assert!(
        !app.presenter()
            .last_frame
            .iter()
            .any(|c| matches!(c, heart_gift::render::DrawCmd::Flourish { .. }))
    );
    catch_one(&mut app);

    wait(&mut app, WIN_DELAY_MS + GIFT_SETTLE_MS + GIFT_OPENING_MS);
    type_code(&mut app, "000000");
    wait(&mut app, VERIFY_SETTLE_MS);
    assert!(app.presenter().gate_alarm);
    assert!(!app.presenter().shaking);
}

#[test]
fn test_paste_fills_and_verifies() {
    let mut app = app();
    to_passcode(&mut app);

    app.cell_paste(0, PASSCODE);
    assert_eq!(app.presenter().cell_values(), vec!["2", "5", "1", "0", "2", "5"]);
    wait(&mut app, VERIFY_SETTLE_MS + UNLOCK_DELAY_MS);
    assert_eq!(app.active_page(), Some(PageId::Cards));
}

#[test]
fn test_full_paste_into_later_cell_waits_for_the_rest() {
    let mut app = app();
    to_passcode(&mut app);

    app.cell_paste(2, PASSCODE);
    assert_eq!(app.presenter().cell_values(), vec!["", "", "2", "5", "1", "0"]);
    wait(&mut app, VERIFY_SETTLE_MS + UNLOCK_DELAY_MS);
    assert_eq!(app.presenter().gate_status, GateStatus::Idle);
    assert_eq!(app.active_page(), Some(PageId::Passcode));

    // Filling the gap and retyping the last cell verifies the shifted code
    app.cell_input(0, "2");
    app.cell_input(1, "5");
    app.cell_input(5, "5");
    wait(&mut app, VERIFY_SETTLE_MS);
    assert_eq!(app.presenter().gate_status, GateStatus::Error);
}

#[test]
fn test_bad_paste_changes_nothing() {
    let mut app = app();
    to_passcode(&mut app);

    app.cell_input(0, "9");
    app.cell_paste(0, "12a456");
    assert_eq!(app.presenter().cell_values(), vec!["9", "", "", "", "", ""]);
    assert!(!app.is_timer_pending(Timer::VerifyPasscode));
}

#[test]
fn test_partial_paste_focuses_next_cell() {
    let mut app = app();
    to_passcode(&mut app);

    app.cell_paste(0, "251");
    assert_eq!(app.presenter().focused, Some(3));
    assert!(!app.is_timer_pending(Timer::VerifyPasscode));
}

#[test]
fn test_non_digit_cell_is_cleared() {
    let mut app = app();
    to_passcode(&mut app);

    app.cell_input(0, "x");
    assert_eq!(app.presenter().cells[0], "");
    assert_eq!(app.presenter().focused, Some(0));

    app.cell_input(0, "2");
    assert_eq!(app.presenter().focused, Some(1));
}

#[test]
fn test_backspace_on_empty_cell_moves_back() {
    let mut app = app();
    to_passcode(&mut app);

    app.cell_input(0, "2");
    app.cell_backspace(1);
    assert_eq!(app.presenter().focused, Some(0));
}

#[test]
fn test_quiz_all_correct() {
    let mut app = app();
    let card = app.catalog().quiz_card().unwrap();
    app.open_card(card);
    assert_eq!(app.active_page(), Some(PageId::Card(card)));

    let total = app.quiz().unwrap().total();
    assert_eq!(app.presenter().question.as_ref().map(|q| (q.0, q.1)), Some((1, total)));

    for _ in 0..total {
        let correct = app.quiz().unwrap().current().unwrap().question.correct;
        app.select_answer(correct);
        // Second click on the same question is ignored
        app.select_answer(correct);
        assert!(app.presenter().marked.unwrap().is_correct());
        wait(&mut app, QUIZ_ADVANCE_MS);
    }

    let summary = app.presenter().summary.unwrap();
    assert_eq!(summary.correct, total);
    assert_eq!(summary.band, Band::Perfect);
}

#[test]
fn test_quiz_retry_and_leave() {
    let mut app = app();
    let card = app.catalog().quiz_card().unwrap();
    app.open_card(card);

    app.select_answer(0);
    app.back_to_cards();
    assert!(!app.is_timer_pending(Timer::QuizAdvance));
    wait(&mut app, QUIZ_ADVANCE_MS);
    assert_eq!(app.presenter().question.as_ref().unwrap().0, 1);

    app.open_card(card);
    assert_eq!(app.quiz().unwrap().correct_so_far(), 0);
    app.select_answer(0);
    app.retry_quiz();
    assert!(!app.quiz().unwrap().is_answered());
    assert!(app.presenter().marked.is_none());
}

#[test]
fn test_memory_card_renders_story() {
    let mut app = app();
    let memory = app
        .catalog()
        .iter()
        .position(|c| matches!(c.body, heart_gift::CardBody::Memory { .. }))
        .unwrap();
    app.open_card(memory);
    assert!(app.presenter().story_blocks > 0);
    assert_eq!(app.active_page(), Some(PageId::Card(memory)));
}

#[test]
fn test_gift_reentry_restarts_reveal() {
    let mut app = app();
    app.show_page(PageId::Gift);
    wait(&mut app, GIFT_SETTLE_MS + 1000);
    app.show_page(PageId::Gift);
    assert_eq!(app.reveal(), Reveal::Settling);
    assert!(!app.is_timer_pending(Timer::GiftOpened));

    wait(&mut app, GIFT_SETTLE_MS + GIFT_OPENING_MS - 1);
    assert_eq!(app.active_page(), Some(PageId::Gift));
    wait(&mut app, 1);
    assert_eq!(app.active_page(), Some(PageId::Passcode));
}

#[test]
fn test_resize_keeps_basket_ratio() {
    let mut app = app();
    app.start_game();
    app.pointer_moved(100.0);
    let before = {
        let g = app.game().unwrap();
        g.basket.pos.x / g.width
    };

    app.presenter_mut().canvas = Some(Vec2::new(800.0, 500.0));
    app.resize();

    let g = app.game().unwrap();
    assert_eq!(g.width, 800.0);
    assert!((g.basket.pos.x / g.width - before).abs() < 1e-5);
    assert_eq!(g.basket.pos.y, 500.0 - BASKET_HEIGHT - BASKET_BOTTOM_MARGIN);
}

#[test]
fn test_restart_resets_score() {
    let mut app = app();
    app.start_game();
    catch_one(&mut app);
    app.start_game();
    assert_eq!(app.game().unwrap().score, 0);
    assert_eq!(app.presenter().progress, (0, TARGET_SCORE));
}

proptest! {
    #[test]
    fn prop_exactly_one_active_page(picks in prop::collection::vec(0usize..9, 1..30)) {
        let mut app = app();
        let cards = app.catalog().len();
        for pick in picks {
            let page = match pick {
                0 => PageId::Landing,
                1 => PageId::Game,
                2 => PageId::Gift,
                3 => PageId::Passcode,
                4 => PageId::Cards,
                n => PageId::Card((n - 5) % cards),
            };
            app.show_page(page);
            prop_assert_eq!(app.presenter().active_pages(), vec![page]);
            prop_assert_eq!(app.active_page(), Some(page));
        }
    }

    #[test]
    fn prop_only_the_secret_unlocks(code in "[0-9]{6}") {
        let mut app = app();
        to_passcode(&mut app);
        type_code(&mut app, &code);
        wait(&mut app, VERIFY_SETTLE_MS + UNLOCK_DELAY_MS + REJECT_RESET_MS);
        let unlocked = app.active_page() == Some(PageId::Cards);
        prop_assert_eq!(unlocked, code == PASSCODE);
    }
}
