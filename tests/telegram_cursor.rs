mod common;

use quiz_server::db::{Backend, Session, TelegramCursorRepo};

#[tokio::test]
async fn cursor_starts_empty_and_keeps_latest_value() {
    let db = common::sqlite().await;
    let mut session = db.backend.begin().await.unwrap();
    assert_eq!(session.last_update_id().await.unwrap(), None);

    session.set_last_update_id(10).await.unwrap();
    session.set_last_update_id(12).await.unwrap();
    session.commit().await.unwrap();

    let mut session = db.backend.begin().await.unwrap();
    assert_eq!(session.last_update_id().await.unwrap(), Some(12));

    // Overwrites even when the new id is lower.
    session.set_last_update_id(5).await.unwrap();
    assert_eq!(session.last_update_id().await.unwrap(), Some(5));
}
