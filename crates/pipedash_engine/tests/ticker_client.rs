use pipedash_engine::{ClientSettings, FailureKind, HttpClient, TickerDirectory};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    HttpClient::new(settings).expect("client")
}

#[tokio::test]
async fn lists_tickers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tickers": ["AAPL", "MSFT"]
        })))
        .mount(&server)
        .await;

    let tickers = client_for(&server).list_tickers().await.expect("list ok");
    assert_eq!(tickers, vec!["AAPL".to_string(), "MSFT".to_string()]);
}

#[tokio::test]
async fn add_posts_symbol_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tickers"))
        .and(body_json(serde_json::json!({ "symbol": "AAPL" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).add_ticker("AAPL").await.expect("add ok");
}

#[tokio::test]
async fn remove_deletes_by_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tickers/AAPL"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .remove_ticker("AAPL")
        .await
        .expect("remove ok");
}

#[tokio::test]
async fn remove_surfaces_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tickers/TSLA"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).remove_ticker("TSLA").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}
