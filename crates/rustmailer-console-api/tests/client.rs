//! Integration tests for the REST client.
//!
//! These tests run a canned HTTP server on a local socket: each accepted
//! connection reads one request, records it, and answers with the next
//! prepared response.

#![allow(clippy::unwrap_used)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use rustmailer_console_api::types::{
    EventType, ListMessagesQuery, LogicOperator, SearchExpr, SearchRequest, VrlScriptTestRequest,
};
use rustmailer_console_api::{ApiClient, Error};

/// A request as seen by the canned server.
#[derive(Debug)]
struct RecordedRequest {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Local server answering with prepared `(status, body)` pairs in order.
struct CannedServer {
    base_url: String,
    requests: mpsc::UnboundedReceiver<RecordedRequest>,
}

impl CannedServer {
    async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, requests) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                tx.send(request).unwrap();

                let reply = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        Self { base_url, requests }
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url)
            .unwrap()
            .with_access_token("root-token")
    }

    async fn next_request(&mut self) -> RecordedRequest {
        self.requests.recv().await.unwrap()
    }
}

async fn read_request(stream: &mut TcpStream) -> RecordedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap().to_string();
    let target = parts.next().unwrap().to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key == "content-length")
        .map_or(0, |(_, value)| value.parse::<usize>().unwrap());

    let body_start = header_end + 4;
    while buffer.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body was complete");
        buffer.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buffer[body_start..body_start + content_length]).to_string();

    RecordedRequest {
        method,
        target,
        headers,
        body,
    }
}

#[tokio::test]
async fn test_list_accounts_sends_bearer_token() {
    let mut server = CannedServer::start(vec![(
        200,
        r#"{"current_page":1,"page_size":10,"total_items":1,"total_pages":1,
            "items":[{"id":7,"email":"ops@example.com","name":"Ops","enabled":true}]}"#,
    )])
    .await;

    let accounts = server.client().list_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, 7);
    assert_eq!(accounts[0].label(), "Ops <ops@example.com>");

    let request = server.next_request().await;
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/api/v1/list-accounts");
    assert_eq!(request.header("authorization"), Some("Bearer root-token"));
}

#[tokio::test]
async fn test_list_messages_encodes_cursor_query() {
    let mut server = CannedServer::start(vec![(
        200,
        r#"{"total_items":42,"items":[{"id":"e1","uid":10,"mailbox_name":"INBOX"}],
            "next_page_token":"tok-2"}"#,
    )])
    .await;

    let page = server
        .client()
        .list_messages(
            3,
            &ListMessagesQuery {
                mailbox: "INBOX".into(),
                next_page_token: Some("tok-1".into()),
                page_size: 20,
                remote: true,
                desc: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total_items, 42);
    assert_eq!(page.items[0].uid, 10);
    assert_eq!(page.next_page_token.as_deref(), Some("tok-2"));

    let request = server.next_request().await;
    assert!(request.target.starts_with("/api/v1/list-messages/3?"));
    assert!(request.target.contains("mailbox=INBOX"));
    assert!(request.target.contains("next_page_token=tok-1"));
    assert!(request.target.contains("page_size=20"));
    assert!(request.target.contains("remote=true"));
}

#[tokio::test]
async fn test_search_posts_expression_tree() {
    let mut server = CannedServer::start(vec![(200, r#"{"total_items":0,"items":[]}"#)]).await;

    let search = SearchExpr::Logic {
        operator: LogicOperator::Or,
        children: vec![
            SearchExpr::condition("from", "a@x.com"),
            SearchExpr::not(SearchExpr::condition("flag", "Seen")),
        ],
    };
    let page = server
        .client()
        .search_messages(
            1,
            &SearchRequest {
                search,
                mailbox: Some("INBOX".into()),
                next_page_token: None,
                page_size: 10,
                desc: true,
            },
        )
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert!(page.next_page_token.is_none());

    let request = server.next_request().await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/v1/search-messages/1");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["search"]["type"], "Logic");
    assert_eq!(body["search"]["operator"], "OR");
    assert_eq!(body["search"]["children"][1]["operator"], "Not");
    assert!(body.get("next_page_token").is_none());
}

#[tokio::test]
async fn test_unauthorized_maps_to_dedicated_error() {
    let server = CannedServer::start(vec![(401, r#"{"message":"invalid token"}"#)]).await;

    let err = server.client().validate_token().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_forbidden_is_an_ordinary_api_error() {
    let server = CannedServer::start(vec![(403, r#"{"message":"permission denied"}"#)]).await;

    let err = server.client().get_account(3).await.unwrap_err();
    assert!(!err.is_unauthorized());
    assert!(matches!(err, Error::Api { status: 403, ref message } if message == "permission denied"));
}

#[tokio::test]
async fn test_server_error_keeps_message_and_code() {
    let server = CannedServer::start(vec![(
        400,
        r#"{"message":"proxy url is invalid","code":10020}"#,
    )])
    .await;

    let err = server
        .client()
        .create_proxy(&rustmailer_console_api::types::ProxyRequest {
            url: "ftp://nope".into(),
        })
        .await
        .unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "proxy url is invalid (code 10020)");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_verbatim() {
    let server = CannedServer::start(vec![(404, "not found\n")]).await;

    let err = server.client().get_account(99).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 404, ref message } if message == "not found"));
}

#[tokio::test]
async fn test_reset_root_token_unquotes_body() {
    let mut server = CannedServer::start(vec![(200, r#""fresh-token""#)]).await;

    let token = server.client().reset_root_token().await.unwrap();
    assert_eq!(token, "fresh-token");
    assert_eq!(server.next_request().await.target, "/api/v1/reset-root-token");
}

#[tokio::test]
async fn test_delete_uses_delete_method() {
    let mut server = CannedServer::start(vec![(200, "")]).await;

    server.client().delete_account(5).await.unwrap();
    let request = server.next_request().await;
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.target, "/api/v1/account/5");
}

#[tokio::test]
async fn test_vrl_resolve_returns_script_error() {
    let server = CannedServer::start(vec![(
        200,
        r#"{"result":null,"error":"function call error for \"parse_json\""}"#,
    )])
    .await;

    let result = server
        .client()
        .resolve_vrl_script(&VrlScriptTestRequest {
            program: ". = parse_json!(.body)".into(),
            event: Some(serde_json::json!({"event_type": EventType::EmailAddedToFolder})),
        })
        .await
        .unwrap();
    assert!(result.result.is_none());
    assert!(result.error.unwrap().contains("parse_json"));
}
