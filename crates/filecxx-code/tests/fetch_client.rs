//! Code page client against a mock HTTP server.

use std::time::Duration;

use filecxx_code::{CodeError, CodePageClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_PATH: &str = "/en_US/activation_code.html";

fn client_for(server: &MockServer) -> CodePageClient {
    CodePageClient::new(&format!("{}{PAGE_PATH}", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn sends_filecxx_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .and(header("user-agent", "filecxx/2.82"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<pre id=\"codes\"></pre>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server).fetch().await.unwrap();
    assert_eq!(body, "<pre id=\"codes\"></pre>");
}

#[tokio::test]
async fn server_error_is_a_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).fetch().await.unwrap_err();
    assert!(matches!(err, CodeError::Network(_)));
}

#[tokio::test]
async fn not_found_is_a_network_failure() {
    let server = MockServer::start().await;

    let err = client_for(&server).fetch().await.unwrap_err();
    assert!(matches!(err, CodeError::Network(_)));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = CodePageClient::new(
        &format!("{}{PAGE_PATH}", server.uri()),
        Duration::from_millis(200),
    )
    .unwrap();
    assert!(client.fetch().await.is_err());
}
