//! HTTP gateway tests against a mock content API.

use eksplosa_core::gateway::{LevelFilter, QuestionFilter};
use eksplosa_core::storage::config::ApiConfig;
use eksplosa_core::{ApiClient, Catalog, CoreError, DataGateway, MemoryStore, QuizEngine, QuizParams};
use mockito::Matcher;

fn client(server: &mockito::Server) -> ApiClient {
    ApiClient::from_config(&ApiConfig {
        base_url: format!("{}/api", server.url()),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn levels_are_filtered_by_language() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/levels")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("filters[bahasa][id][$eq]".into(), "3".into()),
            Matcher::UrlEncoded("populate".into(), "*".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data":[
                {"id":11,"attributes":{"level":2,"topik":"Keluarga","bahasa":{"data":{"id":3}}}},
                {"id":10,"attributes":{"level":1,"topik":null,"bahasa":{"data":{"id":3}}}}
            ]}"#,
        )
        .create_async()
        .await;

    let levels = client(&server)
        .levels(LevelFilter::Language("3".into()))
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].id, "11");
    assert_eq!(levels[0].language_id.as_deref(), Some("3"));
    assert_eq!(levels[1].topic_label(), "Percakapan sehari-hari");
}

#[tokio::test]
async fn flat_entries_decode_too() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/soals")
        .match_query(Matcher::UrlEncoded(
            "filters[level][id][$eq]".into(),
            "10".into(),
        ))
        .with_status(200)
        .with_body(
            r#"{"data":[{"id":5,"pertanyaan":"Aku sedang makan","tipe":"A",
                "pilihan":["nedha","Aku","lagi"],"jawaban_benar":"Aku lagi nedha","level":10}]}"#,
        )
        .create_async()
        .await;

    let questions = client(&server)
        .questions(QuestionFilter::Level("10".into()))
        .await
        .unwrap();
    assert_eq!(questions[0].id, "5");
    assert_eq!(questions[0].level_id.as_deref(), Some("10"));
    assert_eq!(questions[0].answer_len(), 3);
}

#[tokio::test]
async fn server_error_is_network_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/provinsis")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let err = client(&server).provinces().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(
        err.to_string(),
        "Error fetching /provinsis: HTTP error! status: 500"
    );
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/provinsis")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client(&server).provinces().await.unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }));
}

#[tokio::test]
async fn missing_language_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/bahasas/99")
        .with_status(404)
        .create_async()
        .await;

    let err = client(&server).language("99").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { kind: "language", .. }));
}

#[tokio::test]
async fn catalog_reads_nested_provinces() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/provinsis")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"data":[{"id":1,"attributes":{"nama":"Jawa Barat","slug":"jawa-barat",
                "bahasas":{"data":[{"id":3,"attributes":{"nama":"Sunda"}}]}}}]}"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/bahasas")
        .match_query(Matcher::UrlEncoded(
            "filters[provinsi][id][$eq]".into(),
            "1".into(),
        ))
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let api = client(&server);
    let detail = Catalog::new(&api).province_detail("jawa-barat").await.unwrap();
    assert_eq!(detail.province.name, "Jawa Barat");
    assert_eq!(detail.languages[0].name, "Sunda");
    assert_eq!(detail.fun_fact_heading(), "Fakta Menarik Provinsi Jawa Barat");
}

#[tokio::test]
async fn quiz_initialization_surfaces_network_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/levels")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let mut quiz = QuizEngine::new(Box::new(client(&server)), Box::new(MemoryStore::new()));
    let err = quiz
        .initialize(&QuizParams::new("3", "1"))
        .await
        .unwrap_err();
    assert!(err.is_network());
    assert!(quiz.session().is_none());
}
