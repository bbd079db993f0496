//! Deeplink calls against a local one-shot HTTP listener, asserting what goes over the wire.

use coupang_partners::signing::signature;
use coupang_partners::{PartnersClient, PartnersError, PartnersOptions, DEEPLINK_PATH};
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

const ORIGINAL_URL: &str = "https://www.coupang.com/vp/products/7654321?itemId=1";

struct CapturedRequest {
    method: String,
    path: String,
    /// Lowercased header names
    headers: HashMap<String, String>,
    body: String,
}

/// Accept one connection, capture the request, answer with `status` and `body`
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            raw.extend_from_slice(&chunk[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos;
            }
        };

        let head = String::from_utf8(raw[..head_end].to_vec()).unwrap();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap().split(' ');
        let method = request_line.next().unwrap().to_string();
        let path = request_line.next().unwrap().to_string();
        let headers: HashMap<String, String> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
            .collect();

        let content_length: usize = headers
            .get("content-length")
            .map(|v| v.parse().unwrap())
            .unwrap_or(0);
        let mut body_bytes = raw[head_end + 4..].to_vec();
        while body_bytes.len() < content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body was complete");
            body_bytes.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            if status == 200 { "OK" } else { "Error" },
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        CapturedRequest {
            method,
            path,
            headers,
            body: String::from_utf8(body_bytes).unwrap(),
        }
    });

    (base_url, handle)
}

fn client(base_url: String) -> PartnersClient {
    // Loopback only; ignore any proxy configured in the environment
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    let options = PartnersOptions {
        base_url,
        access_key: "ACCESS".into(),
        secret_key: "test-secret".into(),
        partner_id: "gift-sub".into(),
    };
    PartnersClient::with_client(http, options)
}

#[tokio::test]
async fn deeplink_request_follows_the_wire_contract() {
    let (base_url, server) = serve_once(
        200,
        r#"{"rCode":"0","rMessage":"","data":[{"originalUrl":"x","shortenUrl":"https://link.coupang.com/a/bXyZ"}]}"#,
    )
    .await;

    let short = client(base_url).create_deeplink(ORIGINAL_URL).await.unwrap();
    let request = server.await.unwrap();

    assert_eq!(short, "https://link.coupang.com/a/bXyZ");
    assert_eq!(request.method, "POST");
    // Trailing slash on the base URL does not double up
    assert_eq!(request.path, DEEPLINK_PATH);
    assert!(request.headers["content-type"].starts_with("application/json"));
    assert!(Uuid::parse_str(&request.headers["x-request-id"]).is_ok());

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "coupangUrls": [ORIGINAL_URL], "subId": "gift-sub" })
    );

    // Authorization: CEA algorithm=HmacSHA256, access-key=.., signed-date=.., signature=..
    let auth = &request.headers["authorization"];
    let fields: HashMap<&str, &str> = auth
        .strip_prefix("CEA ")
        .unwrap()
        .split(", ")
        .filter_map(|pair| pair.split_once('='))
        .collect();
    assert_eq!(fields["algorithm"], "HmacSHA256");
    assert_eq!(fields["access-key"], "ACCESS");

    let signed_date = fields["signed-date"];
    assert_eq!(signed_date.len(), "250301T093005Z".len());
    assert!(signed_date.ends_with('Z'));
    let expected = signature("test-secret", signed_date, "POST", DEEPLINK_PATH, "").unwrap();
    assert_eq!(fields["signature"], expected);
}

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    let (base_url, server) = serve_once(503, r#"{"message":"throttled"}"#).await;

    let err = client(base_url)
        .create_deeplink(ORIGINAL_URL)
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        PartnersError::Api { status, message } => {
            assert_eq!(status, 503);
            assert!(message.contains("throttled"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn rejected_envelope_with_null_data_keeps_code() {
    let (base_url, server) =
        serve_once(200, r#"{"rCode":"400","rMessage":"Invalid subId","data":null}"#).await;

    let err = client(base_url)
        .create_deeplink(ORIGINAL_URL)
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        PartnersError::Rejected { code, message } => {
            assert_eq!(code, "400");
            assert_eq!(message, "Invalid subId");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
