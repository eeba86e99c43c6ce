mod common;

use common::{scored, shape, RecordingBoard, RecordingKeyboard, Reply, ScriptedServer};
use srordle::board::{BoardModel, RowRender};
use srordle::client::GuessResponse;
use srordle::engine::{GameOutcome, Phase, SubmitOutcome, TurnEngine};
use srordle::keyboard::{KeyIntent, KeyboardModel};
use srordle::model::{GameShape, LetterStatus, SrordleAnswer, WORD_LENGTH};

type Engine = TurnEngine<BoardModel, KeyboardModel>;

fn started(shape: GameShape, past: Vec<SrordleAnswer>, remaining: u32, total: u32) -> Engine {
    let mut e = TurnEngine::new(BoardModel::new(), KeyboardModel::new(), -18000);
    e.start(shape, past, remaining, total).unwrap();
    e
}

async fn type_and_submit(e: &mut Engine, server: &ScriptedServer, word: &str) -> SubmitOutcome {
    for ch in word.chars() {
        e.dispatch(KeyIntent::Letter(ch), server).await;
    }
    e.submit_guess(server).await
}

#[test]
fn row_length_tracks_shaped_rows_without_overrides() {
    let shapes = [
        shape(&["TTTTTFF", "FTTTTFF", "TTTFTTT"]),
        shape(&["TTFFFFF", "TTTTTTT"]),
        shape(&["FFFTFFF"]),
    ];
    for s in shapes {
        for made in 0..s.len() {
            let history: Vec<_> = (0..made)
                .map(|_| scored("ab", LetterStatus::NotInWord, false))
                .collect();
            let expected = s.row(made).unwrap().active_slots();
            let e = started(s.clone(), history, 2, 2);
            assert_eq!(e.current_row_length(), expected, "shape {:?} after {}", s, made);
        }
    }
}

#[test]
fn row_length_is_full_past_the_table_or_when_armed() {
    let s = shape(&["TTTTTFF"]);
    let e = started(s.clone(), vec![scored("apple", LetterStatus::NotInWord, false)], 2, 2);
    assert_eq!(e.current_row_length(), WORD_LENGTH);

    let mut e = started(s, vec![], 2, 2);
    e.toggle_override_request();
    assert_eq!(e.current_row_length(), WORD_LENGTH);
}

#[test]
fn five_letter_first_row_scenario() {
    let e = started(shape(&["TTTTTFF"]), vec![], 2, 2);
    assert_eq!(e.current_row_length(), 5);
}

#[tokio::test]
async fn apple_scenario_renders_returned_statuses() {
    let server = ScriptedServer::new(shape(&["TTTTTFF"]), 2, "mailbox");
    server.queue(Reply::Response(GuessResponse {
        answer: Some(vec![
            srordle::model::LetterAnswer::new("a", LetterStatus::WrongPosition),
            srordle::model::LetterAnswer::new("p", LetterStatus::NotInWord),
            srordle::model::LetterAnswer::new("p", LetterStatus::NotInWord),
            srordle::model::LetterAnswer::new("l", LetterStatus::WrongPosition),
            srordle::model::LetterAnswer::new("e", LetterStatus::NotInWord),
        ]),
        won: Some(false),
        ..Default::default()
    }));
    let mut e = started(shape(&["TTTTTFF"]), vec![], 2, 2);

    let outcome = type_and_submit(&mut e, &server, "apple").await;
    assert_eq!(outcome, SubmitOutcome::Accepted);
    assert_eq!(e.history().len(), 1);
    assert!(e.buffer().is_empty());

    let RowRender::Past(cells) = e.board().row(0) else {
        panic!("row 0 should show the scored guess");
    };
    let statuses: Vec<_> = cells.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![
            LetterStatus::WrongPosition,
            LetterStatus::NotInWord,
            LetterStatus::NotInWord,
            LetterStatus::WrongPosition,
            LetterStatus::NotInWord,
            LetterStatus::PositionNotUsed,
            LetterStatus::PositionNotUsed,
        ]
    );
    assert_eq!(e.keyboard().status_of('a'), LetterStatus::WrongPosition);
    assert_eq!(e.keyboard().status_of('z'), LetterStatus::Untried);
}

#[test]
fn arm_and_disarm_scenario() {
    let mut e = started(shape(&["TTTTTFF"]), vec![], 2, 2);
    for ch in "app".chars() {
        e.add_letter(ch);
    }
    e.toggle_override_request();
    assert_eq!(e.remaining_full_attempts(), 1);
    assert!(e.buffer().is_empty());
    assert_eq!(e.current_row_length(), 7);

    e.toggle_override_request();
    assert_eq!(e.remaining_full_attempts(), 2);
    assert!(e.buffer().is_empty());
}

#[test]
fn counter_never_goes_negative() {
    let mut e = started(shape(&["TTTTTFF"]), vec![], 1, 2);
    for _ in 0..5 {
        e.toggle_override_request();
        e.toggle_override_request();
    }
    assert_eq!(e.remaining_full_attempts(), 1);

    e.toggle_override_request();
    assert_eq!(e.remaining_full_attempts(), 0);
    e.toggle_override_request();
    e.toggle_override_request();
    assert!(e.is_override_armed());
    assert_eq!(e.remaining_full_attempts(), 0);
}

#[tokio::test]
async fn server_error_scenario_leaves_engine_active() {
    let server = ScriptedServer::new(shape(&["TTTTTFF"]), 2, "mailbox");
    server.queue_error("word not allowed");
    let mut e = started(shape(&["TTTTTFF"]), vec![], 2, 2);

    let outcome = type_and_submit(&mut e, &server, "qqqqq").await;
    assert_eq!(outcome, SubmitOutcome::Rejected("word not allowed".into()));
    assert_eq!(e.buffer().iter().collect::<String>(), "qqqqq");
    assert!(e.history().is_empty());
    assert!(!e.is_override_armed());
    assert_eq!(e.phase(), Phase::Active);
}

#[tokio::test]
async fn timeout_is_reported_and_retryable() {
    let server = ScriptedServer::new(shape(&["TTTTTFF"]), 2, "mailbox");
    server.queue(Reply::Timeout);
    let mut e = started(shape(&["TTTTTFF"]), vec![], 2, 2);

    let outcome = type_and_submit(&mut e, &server, "apple").await;
    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    assert_eq!(e.buffer().len(), 5);

    assert_eq!(e.submit_guess(&server).await, SubmitOutcome::Accepted);
    assert_eq!(server.requests().len(), 2);
    assert_eq!(server.requests()[0], server.requests()[1]);
}

#[tokio::test]
async fn last_row_scenario_is_a_loss() {
    // len(S) + total - 1 guesses already made.
    let past = vec![
        scored("apple", LetterStatus::NotInWord, false),
        scored("cabbage", LetterStatus::NotInWord, true),
    ];
    let server = ScriptedServer::new(shape(&["TTTTTFF"]), 2, "mailbox");
    let mut e = started(shape(&["TTTTTFF"]), past, 1, 2);

    let outcome = type_and_submit(&mut e, &server, "zillion").await;
    assert_eq!(outcome, SubmitOutcome::Lost);
    assert_eq!(e.phase(), Phase::GameOver(GameOutcome::Lost));
    assert_eq!(e.history().len(), 3);
}

#[tokio::test]
async fn game_over_exactly_at_the_budget() {
    let s = shape(&["TTTTTFF", "TTTTFFF"]);
    let server = ScriptedServer::new(s.clone(), 1, "mailbox");
    let mut e = started(s, vec![], 1, 1);

    assert_eq!(type_and_submit(&mut e, &server, "queen").await, SubmitOutcome::Accepted);
    assert_eq!(type_and_submit(&mut e, &server, "jump").await, SubmitOutcome::Accepted);
    assert_eq!(e.phase(), Phase::Active);
    assert_eq!(type_and_submit(&mut e, &server, "jukebox").await, SubmitOutcome::Lost);

    // Frozen afterwards.
    e.add_letter('a');
    assert!(e.buffer().is_empty());
    assert_eq!(e.submit_guess(&server).await, SubmitOutcome::Ignored);
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn win_on_an_override_row() {
    let s = shape(&["TTTTTFF"]);
    let server = ScriptedServer::new(s.clone(), 2, "mailbox");
    let mut e = started(s, vec![], 2, 2);

    e.toggle_override_request();
    let outcome = type_and_submit(&mut e, &server, "mailbox").await;
    assert_eq!(outcome, SubmitOutcome::Won);
    assert_eq!(e.phase(), Phase::GameOver(GameOutcome::Won));
    assert!(e.history()[0].requested_full);
    assert!(matches!(e.board().row(1), RowRender::Blank));
}

#[tokio::test]
async fn guess_index_skips_override_guesses() {
    let s = shape(&["TTTTTFF", "FTTTTFF"]);
    let server = ScriptedServer::new(s.clone(), 2, "mailbox");
    let mut e = started(s, vec![], 2, 2);

    type_and_submit(&mut e, &server, "apple").await;
    e.toggle_override_request();
    type_and_submit(&mut e, &server, "cabbage").await;
    type_and_submit(&mut e, &server, "pear").await;

    let sent: Vec<_> = server
        .requests()
        .iter()
        .map(|r| (r.guess.clone(), r.guess_index, r.use_full, r.tz_offset))
        .collect();
    assert_eq!(
        sent,
        vec![
            ("apple".to_string(), 0, false, -18000),
            ("cabbage".to_string(), 1, true, -18000),
            ("pear".to_string(), 1, false, -18000),
        ]
    );
}

#[test]
fn board_port_sees_toggle_as_clear_then_flag() {
    let mut e = TurnEngine::new(RecordingBoard::default(), RecordingKeyboard::default(), 0);
    e.start(shape(&["TTTTTFF"]), vec![scored("apple", LetterStatus::NotInWord, false)], 2, 2)
        .unwrap();
    e.add_letter('m');
    e.toggle_override_request();

    assert_eq!(
        e.board().calls,
        vec![
            "shape 1",
            "past 1",
            "buffer \"m\"",
            "buffer \"\"",
            "requested_full true",
        ]
    );
    assert_eq!(e.keyboard().guesses, 1);
}

#[tokio::test]
async fn board_port_sees_guess_then_reset() {
    let server = ScriptedServer::new(shape(&["TTFFFFF"]), 2, "mailbox");
    let mut e = TurnEngine::new(RecordingBoard::default(), RecordingKeyboard::default(), 0);
    e.start(shape(&["TTFFFFF"]), vec![], 2, 2).unwrap();
    e.toggle_override_request();
    for ch in "mailbox".chars() {
        e.add_letter(ch);
    }
    e.submit_guess(&server).await;

    let tail: Vec<_> = e.board().calls.iter().rev().take(3).rev().cloned().collect();
    assert_eq!(
        tail,
        vec!["add 7 full=true", "buffer \"\"", "requested_full false"]
    );
    assert_eq!(e.keyboard().guesses, 1);
}

#[test]
fn restored_full_history_starts_game_over() {
    let past = vec![
        scored("apple", LetterStatus::NotInWord, false),
        scored("cabbage", LetterStatus::NotInWord, true),
        scored("zillion", LetterStatus::NotInWord, true),
    ];
    let e = started(shape(&["TTTTTFF"]), past, 0, 2);
    assert_eq!(e.phase(), Phase::GameOver(GameOutcome::Lost));
}
