mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};

use quiz_server::config::GameSettings;
use quiz_server::http::{self, AppState};

fn state(db: &common::TestDb, api_key: Option<&str>) -> AppState {
    AppState {
        backend: db.backend.clone(),
        game: GameSettings::default(),
        api_key: api_key.map(str::to_string),
    }
}

#[actix_web::test]
async fn question_and_answer_crud() {
    let db = common::sqlite().await;
    let app = test::init_service(App::new().configure(http::configure(state(&db, None)))).await;

    let req = test::TestRequest::post()
        .uri("/v1/question")
        .set_json(json!({ "text": "2+2?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let qid = body["created"].as_i64().unwrap();

    let mut answer_ids = Vec::new();
    for (text, correct) in [("4", true), ("5", false)] {
        let req = test::TestRequest::post()
            .uri("/v1/answer")
            .set_json(json!({ "text": text, "correct": correct, "question_id": qid }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        answer_ids.push(body["created"].as_i64().unwrap());
    }

    let req = test::TestRequest::get().uri("/v1/quiz?active=true").to_request();
    let quiz: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(quiz.as_array().unwrap().len(), 1);
    assert_eq!(quiz[0]["id"], qid);
    assert_eq!(quiz[0]["answers"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/question/{qid}/answers"))
        .to_request();
    let answers: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(answers.as_array().unwrap().len(), 2);

    let req = test::TestRequest::post()
        .uri(&format!("/v1/submit-answer?question_id={qid}&answer_id={}", answer_ids[0]))
        .to_request();
    let verdict: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(verdict["is_correct"], true);

    let req = test::TestRequest::patch()
        .uri(&format!("/v1/question/{qid}"))
        .set_json(json!({ "text": "two plus two?" }))
        .to_request();
    let edited: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(edited["edited"]["text"], "two plus two?");

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/answer/{}", answer_ids[1]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/answer/{}", answer_ids[1]))
        .to_request();
    let gone: Value = test::call_and_read_body_json(&app, req).await;
    assert!(gone.is_null());

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/question/{qid}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/question/{qid}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn answer_for_unknown_question_is_bad_request() {
    let db = common::sqlite().await;
    let app = test::init_service(App::new().configure(http::configure(state(&db, None)))).await;

    let req = test::TestRequest::post()
        .uri("/v1/answer")
        .set_json(json!({ "text": "orphan", "question_id": 12345 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].as_str().unwrap().starts_with("answer not added"));

    let req = test::TestRequest::post()
        .uri("/v1/submit-answer?question_id=12345&answer_id=1")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn negative_paging_is_bad_request() {
    let db = common::sqlite().await;
    let app = test::init_service(App::new().configure(http::configure(state(&db, None)))).await;

    for text in ["one", "two", "three"] {
        let req = test::TestRequest::post()
            .uri("/v1/question")
            .set_json(json!({ "text": text }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    for uri in [
        "/v1/questions?active=true&limit=-1",
        "/v1/quiz?active=true&limit=-1",
        "/v1/quiz?active=true&offset=-2",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().contains("must be >= 0"));
    }

    let req = test::TestRequest::get()
        .uri("/v1/questions?active=true&limit=2")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn replayed_game_answer_does_not_score_again() {
    let db = common::sqlite().await;
    let app = test::init_service(App::new().configure(http::configure(state(&db, None)))).await;

    let req = test::TestRequest::post()
        .uri("/v1/question")
        .set_json(json!({ "text": "largest planet?" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let qid = body["created"].as_i64().unwrap();
    let req = test::TestRequest::post()
        .uri("/v1/answer")
        .set_json(json!({ "text": "Jupiter", "correct": true, "question_id": qid }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let jupiter = body["created"].as_i64().unwrap();

    let req = test::TestRequest::post().uri("/v1/game/5/start").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/v1/game/5/answer")
            .set_json(json!({ "question_id": qid, "answer_id": jupiter }))
            .to_request();
        let outcome: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(outcome["is_correct"], true);
        assert_eq!(outcome["score"], 1);
    }
}

#[actix_web::test]
async fn game_routes_require_the_api_key() {
    let db = common::sqlite().await;
    let app = test::init_service(
        App::new().configure(http::configure(state(&db, Some("letmein")))),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/question")
        .set_json(json!({ "text": "capital of Italy?" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let qid = body["created"].as_i64().unwrap();
    let req = test::TestRequest::post()
        .uri("/v1/answer")
        .set_json(json!({ "text": "Rome", "correct": true, "question_id": qid }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rome = body["created"].as_i64().unwrap();

    let req = test::TestRequest::post().uri("/v1/game/77/start").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/v1/game/77/start")
        .insert_header(("X-Api-Key", "wrong"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/v1/game/77/start?amount=3")
        .insert_header(("X-Api-Key", "letmein"))
        .to_request();
    let started: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(started["rounds"], 1);

    let req = test::TestRequest::get()
        .uri("/v1/game/77/next")
        .insert_header(("X-Api-Key", "letmein"))
        .to_request();
    let next: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(next["id"], qid);

    let req = test::TestRequest::post()
        .uri("/v1/game/77/answer")
        .insert_header(("X-Api-Key", "letmein"))
        .set_json(json!({ "question_id": qid, "answer_id": rome }))
        .to_request();
    let outcome: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(outcome["is_correct"], true);
    assert_eq!(outcome["score"], 1);

    let req = test::TestRequest::get()
        .uri("/v1/game/77/next")
        .insert_header(("X-Api-Key", "letmein"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/v1/game/77/score")
        .insert_header(("X-Api-Key", "letmein"))
        .to_request();
    let score: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(score["score"], 1);

    let req = test::TestRequest::post()
        .uri("/v1/game/77/start?amount=0")
        .insert_header(("X-Api-Key", "letmein"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn telegram_cursor_over_http() {
    let db = common::sqlite().await;
    let app = test::init_service(App::new().configure(http::configure(state(&db, None)))).await;

    let req = test::TestRequest::get().uri("/v1/tg/update").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["last_update_id"].is_null());

    let req = test::TestRequest::put()
        .uri("/v1/tg/update")
        .set_json(json!({ "update_id": 981 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/v1/tg/update").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["last_update_id"], 981);
}

#[actix_web::test]
async fn users_over_http() {
    let db = common::sqlite().await;
    let app = test::init_service(App::new().configure(http::configure(state(&db, None)))).await;
    let creds = json!({ "username": "carol", "password": "pa55" });

    let req = test::TestRequest::post().uri("/v1/users").set_json(&creds).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post().uri("/v1/users").set_json(&creds).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/v1/users/verify")
        .set_json(&creds)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["valid"], true);

    let req = test::TestRequest::get().uri("/v1/users").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["username"], "carol");
    assert!(listed[0].get("password").is_none());
}

#[actix_web::test]
async fn health_probe_pings_the_database() {
    let db = common::sqlite().await;
    let app = test::init_service(App::new().configure(http::configure(state(&db, None)))).await;

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "ok");
}
