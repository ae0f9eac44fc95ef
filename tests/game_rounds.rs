mod common;

use std::collections::HashSet;

use quiz_server::config::GameSettings;
use quiz_server::db::models::PendingOrder;
use quiz_server::db::{AnswerRepo, Backend, GameRepo, QuestionRepo};
use quiz_server::service::GameManager;

use common::{answer, question};

#[tokio::test]
async fn batch_is_served_until_exhausted() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    common::seed_questions(&mut *session, 6).await;

    let settings = GameSettings::default();
    let mut game = GameManager::new(&mut *session, &settings);
    let started = game.start(42, None).await.unwrap();
    assert!(started.player_id.is_some());
    assert_eq!(started.rounds, 5);

    let mut seen = HashSet::new();
    for _ in 0..5 {
        let next = game.next_question(42).await.unwrap().expect("pending round");
        assert!(seen.insert(next.question.id), "question served twice");
        let outcome = game
            .submit(42, next.question.id, next.answers[0].id)
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.is_correct);
    }
    assert!(game.next_question(42).await.unwrap().is_none());
    assert_eq!(game.score(42).await.unwrap(), Some(5));
}

#[tokio::test]
async fn ensure_player_is_idempotent() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();

    let first = session.ensure_player(7).await.unwrap().unwrap();
    let second = session.ensure_player(7).await.unwrap().unwrap();
    assert_eq!(first.tg_id, 7);
    assert_eq!(first.score, 0);
    assert_eq!(first, second);
    assert_eq!(session.score_of(7).await.unwrap(), Some(0));
}

#[tokio::test]
async fn short_supply_yields_smaller_batch() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    common::seed_questions(&mut *session, 2).await;
    session.add_question(&question("retired", false)).await.unwrap();

    session.ensure_player(1).await.unwrap();
    assert_eq!(session.create_round_batch(1, 3).await.unwrap(), 2);
    // Everything is already pending for this player.
    assert_eq!(session.create_round_batch(1, 3).await.unwrap(), 0);
}

#[tokio::test]
async fn wrong_answer_keeps_score_and_consumes_round() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    let id = session.add_question(&question("2+2?", true)).await.unwrap();
    let four = session.add_answer(&answer(id, "4", true)).await.unwrap();
    let five = session.add_answer(&answer(id, "5", false)).await.unwrap();

    let settings = GameSettings::default();
    let mut game = GameManager::new(&mut *session, &settings);
    game.start(3, Some(1)).await.unwrap();

    let outcome = game.submit(3, id, five).await.unwrap().unwrap();
    assert!(!outcome.is_correct);
    assert_eq!(outcome.score, Some(0));
    assert!(game.next_question(3).await.unwrap().is_none());

    // A new batch clears the answered round and serves the question again.
    let restarted = game.start(3, Some(1)).await.unwrap();
    assert_eq!(restarted.rounds, 1);
    let outcome = game.submit(3, id, four).await.unwrap().unwrap();
    assert!(outcome.is_correct);
    assert_eq!(outcome.score, Some(1));

    assert!(game.submit(3, id + 50, four).await.unwrap().is_none());
}

#[tokio::test]
async fn answered_rounds_are_purged() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    let ids = common::seed_questions(&mut *session, 3).await;

    session.ensure_player(5).await.unwrap();
    assert_eq!(session.create_round_batch(5, 3).await.unwrap(), 3);
    assert_eq!(session.mark_answered(ids[0], 5).await.unwrap(), 1);
    assert_eq!(session.mark_answered(ids[1], 5).await.unwrap(), 1);

    assert_eq!(session.delete_answered_rounds(5).await.unwrap(), 2);
    assert_eq!(session.delete_answered_rounds(5).await.unwrap(), 0);
    assert_eq!(
        session.next_pending_question(5, PendingOrder::Oldest).await.unwrap(),
        Some(ids[2])
    );
}

#[tokio::test]
async fn pending_order_picks_oldest_or_newest_round() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    common::seed_questions(&mut *session, 2).await;

    session.ensure_player(9).await.unwrap();
    session.create_round_batch(9, 2).await.unwrap();

    let oldest = session.next_pending_question(9, PendingOrder::Oldest).await.unwrap();
    let newest = session.next_pending_question(9, PendingOrder::Newest).await.unwrap();
    assert!(oldest.is_some() && newest.is_some());
    assert_ne!(oldest, newest);
}

#[tokio::test]
async fn rounds_need_a_registered_player() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    common::seed_questions(&mut *session, 1).await;

    let err = session.create_round_batch(404, 1).await.unwrap_err();
    assert!(err.is_constraint(), "got {err:?}");
}

#[tokio::test]
async fn unknown_player_has_no_score() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();

    assert_eq!(session.score_of(11).await.unwrap(), None);
    assert_eq!(session.increment_score(11).await.unwrap(), None);
    assert!(session.ensure_player(11).await.unwrap().is_some());
    assert_eq!(session.increment_score(11).await.unwrap(), Some(1));
    assert_eq!(session.increment_score(11).await.unwrap(), Some(2));
}

#[tokio::test]
async fn replayed_answer_scores_once() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    let id = session.add_question(&question("2+2?", true)).await.unwrap();
    let four = session.add_answer(&answer(id, "4", true)).await.unwrap();

    let settings = GameSettings::default();
    let mut game = GameManager::new(&mut *session, &settings);
    game.start(3, Some(1)).await.unwrap();

    let first = game.submit(3, id, four).await.unwrap().unwrap();
    assert_eq!(first.score, Some(1));
    for _ in 0..3 {
        let again = game.submit(3, id, four).await.unwrap().unwrap();
        assert!(again.is_correct);
        assert_eq!(again.score, Some(1));
    }
    assert_eq!(game.score(3).await.unwrap(), Some(1));
}

#[tokio::test]
async fn question_outside_the_batch_does_not_score() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    let ids = common::seed_questions(&mut *session, 1).await;
    let right = session.answers_for_question(ids[0]).await.unwrap()[0].id;

    // Registered, but never handed a round.
    session.ensure_player(8).await.unwrap();
    assert_eq!(session.mark_answered(ids[0], 8).await.unwrap(), 0);

    let settings = GameSettings::default();
    let outcome = GameManager::new(&mut *session, &settings)
        .submit(8, ids[0], right)
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.is_correct);
    assert_eq!(outcome.score, Some(0));
}

#[tokio::test]
async fn answered_round_is_not_marked_twice() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    let ids = common::seed_questions(&mut *session, 1).await;

    session.ensure_player(6).await.unwrap();
    session.create_round_batch(6, 1).await.unwrap();
    assert_eq!(session.mark_answered(ids[0], 6).await.unwrap(), 1);
    assert_eq!(session.mark_answered(ids[0], 6).await.unwrap(), 0);
}
