//! End-to-end tests driving the relay and chat client against a local stub
//! endpoint speaking raw HTTP over a TCP listener.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use parlor::chat::{ChatClient, ChatConfig, Role, Surface, TranscriptEntry};
use parlor::{Backend, Relay};

/// Serves each canned response to one connection, in order, and reports the
/// captured request (start line, headers, and body) over the channel.
async fn spawn_stub(responses: Vec<String>) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        for response in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut socket).await;
            let _ = tx.send(request);
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    (format!("http://{addr}/"), rx)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if request_complete(&buf) {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// True once the header block and `content-length` bytes of body are in.
fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let headers = &text[..split];
    let body_len = text.len() - (split + 4);
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    body_len >= content_length
}

fn json_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn relay_for(base_url: &str) -> Relay {
    Relay::with_options(Some(base_url.to_string()), Some(Duration::from_secs(5))).unwrap()
}

/// Surface that swallows every signal; assertions read the client state.
struct NullSurface;

impl Surface for NullSurface {
    fn append_entry(&mut self, _entry: &TranscriptEntry) {}
    fn clear_input(&mut self) {}
    fn set_send_enabled(&mut self, _enabled: bool) {}
    fn focus_input(&mut self) {}
}

#[tokio::test]
async fn session_flows_into_chat_request() {
    let (base_url, mut requests) = spawn_stub(vec![
        json_response("200 OK", r#"{"session_id": "abc123"}"#),
        json_response("200 OK", r#"{"response": "hi there"}"#),
    ])
    .await;

    let mut client = ChatClient::new(relay_for(&base_url), ChatConfig::new());
    let mut surface = NullSurface;

    client.acquire_session(&mut surface).await.unwrap();
    assert_eq!(client.session_id(), Some("abc123"));

    client.send_message("hello", &mut surface).await;

    let session_request = requests.recv().await.unwrap();
    assert!(session_request.starts_with("POST /generate-session HTTP/1.1"));

    let chat_request = requests.recv().await.unwrap();
    assert!(chat_request.starts_with("POST /chat HTTP/1.1"));
    assert!(chat_request.ends_with(r#"{"session_id":"abc123","message":"hello"}"#));

    let roles: Vec<Role> = client.transcript().iter().map(|e| e.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(client.transcript()[1].text, "hi there");
}

#[tokio::test]
async fn server_detail_shown_on_error() {
    let (base_url, _requests) = spawn_stub(vec![
        json_response("200 OK", r#"{"session_id": "abc123"}"#),
        json_response("500 Internal Server Error", r#"{"detail": "rate limited"}"#),
    ])
    .await;

    let mut client = ChatClient::new(relay_for(&base_url), ChatConfig::new());
    let mut surface = NullSurface;

    client.acquire_session(&mut surface).await.unwrap();
    client.send_message("hello", &mut surface).await;

    let last = client.transcript().last().unwrap();
    assert_eq!(last.role, Role::Error);
    assert!(last.text.contains("rate limited"));
    assert!(!client.is_disabled());
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_status() {
    let (base_url, _requests) = spawn_stub(vec![
        json_response("200 OK", r#"{"session_id": "abc123"}"#),
        json_response("500 Internal Server Error", "<h1>boom</h1>"),
    ])
    .await;

    let mut client = ChatClient::new(relay_for(&base_url), ChatConfig::new());
    let mut surface = NullSurface;

    client.acquire_session(&mut surface).await.unwrap();
    client.send_message("hello", &mut surface).await;

    let last = client.transcript().last().unwrap();
    assert_eq!(last.role, Role::Error);
    assert!(last.text.contains("500"));
}

#[tokio::test]
async fn failed_session_acquisition_disables_sends() {
    let (base_url, mut requests) = spawn_stub(vec![json_response(
        "500 Internal Server Error",
        r#"{"detail": "database down"}"#,
    )])
    .await;

    let mut client = ChatClient::new(relay_for(&base_url), ChatConfig::new());
    let mut surface = NullSurface;

    assert!(client.acquire_session(&mut surface).await.is_err());
    assert!(client.is_disabled());
    assert_eq!(client.transcript().len(), 1);
    assert_eq!(client.transcript()[0].role, Role::Error);
    assert!(client.transcript()[0].text.contains("database down"));

    // The session request was the only one on the wire; a later submission
    // must not produce another.
    let _ = requests.recv().await.unwrap();
    client.send_message("hello", &mut surface).await;
    assert_eq!(client.transcript().len(), 1);
    assert!(requests.try_recv().is_err());
}

#[tokio::test]
async fn connection_refused_is_a_transport_failure() {
    // Bind to grab a free port, then drop the listener so nothing answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let relay = relay_for(&base_url);
    let err = relay.generate_session().await.unwrap_err();
    assert!(err.is_transport());

    let mut client = ChatClient::new(relay, ChatConfig::new());
    let mut surface = NullSurface;
    assert!(client.acquire_session(&mut surface).await.is_err());
    assert!(client.is_disabled());
    assert_eq!(client.transcript().len(), 1);
    assert_eq!(client.transcript()[0].role, Role::Error);
}
