use kgs_api::{Api, ArchivesQuery, Body, HttpClient};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn api_for(server: &MockServer) -> Api {
    let client = HttpClient::builder()
        .endpoint(format!("{}/api", server.uri()))
        .user_agent("kgs-api-tests")
        .build()
        .unwrap();
    Api::with_fetcher(client)
}

#[tokio::test]
async fn fetches_and_unwraps_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/top100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": {"players": [{"position": 1, "name": "foo", "rank": "9d"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = api_for(&server).top100().await;
    let response = reply.exchange.response.as_ref().unwrap();
    assert!(response.is_success());
    assert_eq!(response.content_type(), "application/json");
    assert_eq!(reply.exchange.request.url, format!("{}/api/top100", server.uri()));

    let top100 = reply.content.unwrap();
    assert!(top100.as_paginated().is_none());
    assert_eq!(top100.players[0].rank.as_deref(), Some("9d"));
}

#[tokio::test]
async fn follows_relative_and_absolute_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/archives/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": {"user": "bob", "games": []},
            "link": {"prev": "archives/bob/2014/4"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/archives/bob/2014/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": {"user": "bob", "year": 2014, "month": 4, "games": []},
            "link": {"prev": format!("{}/api/archives/bob/2014/3", server.uri())}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/archives/bob/2014/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": {"user": "bob", "year": 2014, "month": 3, "games": [{
                "black": [{"name": "bob", "rank": "2d"}],
                "white": [{"name": "eve", "rank": "1d"}]
            }]}
        })))
        .mount(&server)
        .await;

    let latest = api_for(&server).latest_rank("bob").await.unwrap();
    assert_eq!(latest.rank.as_deref(), Some("2d"));
    assert_eq!(latest.requests, 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn non_ok_status_has_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/archives/bob"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not Found"})))
        .expect(2)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let reply = api.archives(&ArchivesQuery::user("bob")).await.unwrap();
    assert!(reply.content.is_none());
    let response = reply.exchange.response.unwrap();
    assert!(response.is_client_error());
    assert_eq!(response.body, Body::Text(r#"{"error":"Not Found"}"#.into()));

    let latest = api_for(&server).latest_rank("bob").await;
    assert!(latest.unwrap().rank.is_none());
}

#[tokio::test]
async fn failed_status_keeps_response_even_with_bad_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/archives/bob"))
        .respond_with(
            ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "application/json"),
        )
        .mount(&server)
        .await;

    let latest = api_for(&server).latest_rank("bob").await.unwrap();
    assert!(latest.rank.is_none());
    assert_eq!(latest.exchange.status().map(|s| s.as_u16()), Some(502));
    let response = latest.exchange.response.unwrap();
    assert!(response.is_server_error());
    assert_eq!(response.content_type(), "application/json");
    assert_eq!(response.body, Body::Text("<html>Bad Gateway</html>".into()));
}

#[tokio::test]
async fn non_json_body_is_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tournaments"))
        .respond_with(ResponseTemplate::new(200).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let reply = api_for(&server).tournament_list(None).await.unwrap();
    assert!(reply.content.is_none());
    let response = reply.exchange.response.unwrap();
    assert_eq!(response.body, Body::Text("maintenance".into()));
}

#[tokio::test]
async fn malformed_json_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tournament/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"content\":", "application/json"),
        )
        .mount(&server)
        .await;

    let reply = api_for(&server).tournament(1).await.unwrap();
    assert!(reply.content.is_none());
    assert!(reply.exchange.response.unwrap_err().is_decode());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let api = Api::with_fetcher(
        HttpClient::builder()
            .endpoint("http://127.0.0.1:9/api")
            .build()
            .unwrap(),
    );
    let reply = api.top100().await;
    assert!(reply.content.is_none());
    assert!(reply.exchange.response.unwrap_err().is_transport());
}
