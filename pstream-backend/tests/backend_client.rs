//! Integration tests for the backend HTTP clients, against a mock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pstream_backend::{
    BackendClient, BackendError, ChallengeProof, HttpSubtitleCatalog, HttpTranslator,
    LoginRequest,
};
use pstream_core::identity::{encrypt_data, Keys};
use pstream_core::models::ScrapeMedia;
use pstream_core::player::{CaptionTranslator, SubtitleCatalog};

fn login_response_body() -> serde_json::Value {
    json!({
        "user": { "id": "user-1", "publicKey": "pk" },
        "session": { "id": "session-1", "user": "user-1", "device": "iv.ct.tag" },
        "token": "bearer-token"
    })
}

#[tokio::test]
async fn test_meta_unescapes_free_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "1.4.1",
            "name": "Bob\\'s backend",
            "description": "It\\'s self-hosted",
            "hasCaptcha": false
        })))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let meta = client.meta().await.unwrap();

    assert_eq!(meta.name, "Bob's backend");
    assert_eq!(meta.description.as_deref(), Some("It's self-hosted"));
    assert!(!meta.has_captcha);
}

#[tokio::test]
async fn test_login_challenge_ceremony() {
    let keys = Keys::from_mnemonic("correct horse battery staple");
    let challenge = "challenge-code-123";

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/start"))
        .and(body_partial_json(json!({ "publicKey": keys.public_key_base64url() })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "challenge": challenge })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login/complete"))
        .and(body_partial_json(json!({
            "publicKey": keys.public_key_base64url(),
            "challenge": { "code": challenge }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response_body()))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let issued = client
        .get_login_challenge(&keys.public_key_base64url())
        .await
        .unwrap();
    assert_eq!(issued, challenge);

    let device = encrypt_data("Living Room TV", keys.seed()).unwrap();
    let response = client
        .login(&LoginRequest {
            public_key: keys.public_key_base64url(),
            challenge: ChallengeProof {
                code: issued.clone(),
                signature: keys.sign_challenge(&issued),
            },
            device,
        })
        .await
        .unwrap();

    assert_eq!(response.token, "bearer-token");
    assert_eq!(response.session.id, "session-1");
}

#[tokio::test]
async fn test_credential_rejection_forces_logout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let err = client.current_user("stale-token").await.unwrap_err();
    assert!(matches!(err, BackendError::ForceLogout));
}

#[tokio::test]
async fn test_server_errors_are_not_force_logout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let err = client.current_user("token").await.unwrap_err();
    assert!(matches!(err, BackendError::Http { .. }));
}

#[tokio::test]
async fn test_register_challenge_carries_captcha_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register/start"))
        .and(body_partial_json(json!({ "captchaToken": "captcha-abc" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "challenge": "reg-challenge" })),
        )
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let challenge = client
        .get_register_challenge(Some("captcha-abc"))
        .await
        .unwrap();
    assert_eq!(challenge, "reg-challenge");
}

#[tokio::test]
async fn test_subtitle_catalog_maps_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("id", "1399"))
        .and(query_param("season", "1"))
        .and(query_param("episode", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "42",
                "url": "https://subs.example.com/42.srt",
                "language": "en",
                "isHearingImpaired": true,
                "source": "opensubtitles"
            }
        ])))
        .mount(&server)
        .await;

    let media = ScrapeMedia::Show {
        tmdb_id: "1399".to_string(),
        title: "Show".to_string(),
        release_year: 2011,
        imdb_id: None,
        season: pstream_core::models::SeasonRef {
            number: 1,
            tmdb_id: "s1".to_string(),
            title: "Season 1".to_string(),
        },
        episode: pstream_core::models::EpisodeRef {
            number: 3,
            tmdb_id: "e3".to_string(),
            title: "Episode 3".to_string(),
        },
    };

    let catalog = HttpSubtitleCatalog::new("wyzie", server.uri());
    let items = catalog.search(&media).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "wyzie-42");
    assert_eq!(items[0].language, "en");
    assert!(items[0].hearing_impaired);
    assert_eq!(items[0].provider.as_deref(), Some("opensubtitles"));
}

#[tokio::test]
async fn test_translator_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(json!({ "q": "Hello there.", "target": "de" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "translatedText": "Hallo." })),
        )
        .mount(&server)
        .await;

    let translator = HttpTranslator::new(server.uri());
    let translated = translator.translate("Hello there.", "de").await.unwrap();
    assert_eq!(translated, "Hallo.");
}
