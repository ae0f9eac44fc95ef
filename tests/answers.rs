mod common;

use quiz_server::db::{AnswerRepo, Backend, QuestionRepo, Session};
use quiz_server::error::QuizError;
use quiz_server::service::AnswersManager;

use common::{answer, question};

#[tokio::test]
async fn answers_are_listed_per_question() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    let id = session.add_question(&question("2+2?", true)).await.unwrap();
    let four = session.add_answer(&answer(id, "4", true)).await.unwrap();
    let five = session.add_answer(&answer(id, "5", false)).await.unwrap();

    let all = session.answers_for_question(id).await.unwrap();
    assert_eq!(all.iter().map(|a| a.id).collect::<Vec<_>>(), [four, five]);

    let correct = session.correct_answers_for_question(id).await.unwrap();
    assert_eq!(correct.len(), 1);
    assert_eq!(correct[0].id, four);
    assert_eq!(correct[0].text.as_deref(), Some("4"));
}

#[tokio::test]
async fn answer_for_missing_question_is_rejected() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();

    let err = AnswersManager::new(&mut *session)
        .add_answer(&answer(9999, "orphan", true))
        .await
        .unwrap_err();
    match err {
        QuizError::AnswerNotAdded { detail } => assert!(!detail.is_empty()),
        other => panic!("unexpected error: {other:?}"),
    }

    // The failed insert must not poison the rest of the transaction.
    let id = session.add_question(&question("still works", true)).await.unwrap();
    session.add_answer(&answer(id, "yes", true)).await.unwrap();
    session.commit().await.unwrap();

    let mut session = db.backend.begin().await.unwrap();
    assert_eq!(session.answers_for_question(id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_and_remove_answer() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    let id = session.add_question(&question("colour of the sky", true)).await.unwrap();

    let mut answers = AnswersManager::new(&mut *session);
    let blue = answers.add_answer(&answer(id, "blue", true)).await.unwrap();

    let found = answers.get_answer(blue).await.unwrap().unwrap();
    assert_eq!(found.question_id, id);
    assert!(found.correct);

    assert_eq!(answers.remove_answer(blue).await.unwrap(), 1);
    assert!(answers.get_answer(blue).await.unwrap().is_none());
    assert_eq!(answers.remove_answer(blue).await.unwrap(), 0);
    assert!(answers.answers_for_question(id).await.unwrap().is_empty());
}
