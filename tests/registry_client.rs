//! Transport-level tests for the registry client.
//!
//! Each test binds a one-shot TCP server that answers a single scripted
//! HTTP response and hands back the raw request it received, so the
//! assertions cover the real wire traffic: multipart field names, the 422
//! message pass-through, the login error mapping and the bearer-token
//! refresh from the `jwt-token` header.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use tournament_uploader::config::settings::RegistrySettings;
use tournament_uploader::domain::SourceFile;
use tournament_uploader::http::ApiError;
use tournament_uploader::registry::{RegistryApi, RegistryClient};

/// Serve exactly one request with the given raw response; resolves to the
/// raw request once it has been fully read.
async fn serve_once(raw_response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(raw_response.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        request
    });
    (base_url, handle)
}

/// Read headers plus a content-length delimited body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(end) = header_end(&data) {
            if data.len() - (end + 4) >= declared_length(&data[..end]) {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|window| window == b"\r\n\r\n")
}

fn declared_length(headers: &[u8]) -> usize {
    String::from_utf8_lossy(headers)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

fn response(status: &str, extra_headers: &[(&str, &str)], body: &str) -> String {
    let mut raw = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
        body.len()
    );
    for (name, value) in extra_headers {
        raw.push_str(&format!("{name}: {value}\r\n"));
    }
    raw.push_str("\r\n");
    raw.push_str(body);
    raw
}

fn make_client(base_url: &str) -> RegistryClient {
    let settings = RegistrySettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    RegistryClient::new(&settings, None).unwrap()
}

#[tokio::test]
async fn multipart_upload_carries_the_identifier_and_extension() {
    let (base_url, server) = serve_once(response("200 OK", &[], "true")).await;
    let client = make_client(&base_url);
    let file = SourceFile {
        name: "spring-open.tour".to_string(),
        bytes: vec![1, 2, 3],
        extension: "fast".to_string(),
    };

    let accepted = client.upload_file(&file, "spring-open-2024").await.unwrap();

    assert!(accepted);
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /uploadFile"));
    assert!(request.contains("name=\"tournamentFile\""));
    assert!(request.contains("filename=\"spring-open.tour\""));
    assert!(request.contains("name=\"userIdentifier\""));
    assert!(request.contains("spring-open-2024"));
    assert!(request.contains("name=\"extension\""));
    assert!(request.contains("fast"));
}

#[tokio::test]
async fn validation_message_passes_through_verbatim() {
    let (base_url, server) = serve_once(response(
        "422 Unprocessable Entity",
        &[],
        r#"{"message":"tournament name is already taken"}"#,
    ))
    .await;
    let client = make_client(&base_url);

    let error = client.search_players(&[]).await.unwrap_err();

    match error {
        ApiError::Validation(message) => {
            assert_eq!(message, "tournament name is already taken");
        }
        other => panic!("unexpected error: {other}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn validation_response_without_a_message_maps_to_the_generic_error() {
    let (base_url, server) =
        serve_once(response("422 Unprocessable Entity", &[], "{}")).await;
    let client = make_client(&base_url);

    let error = client.search_players(&[]).await.unwrap_err();

    match error {
        ApiError::Request { command, status } => {
            assert_eq!(command, "searchPlayers");
            assert_eq!(status.as_u16(), 422);
        }
        other => panic!("unexpected error: {other}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn failed_request_names_the_operation() {
    let (base_url, server) =
        serve_once(response("500 Internal Server Error", &[], "{}")).await;
    let client = make_client(&base_url);

    let error = client.search_players(&[]).await.unwrap_err();

    match error {
        ApiError::Request { command, status } => {
            assert_eq!(command, "searchPlayers");
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("unexpected error: {other}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn login_retains_the_refreshed_token() {
    let (base_url, server) = serve_once(response(
        "200 OK",
        &[("jwt-token", "tok-123")],
        r#"{"id":"user-1"}"#,
    ))
    .await;
    let client = make_client(&base_url);

    let user_id = client.login("anna@example.com", "secret").await.unwrap();

    assert_eq!(user_id, "user-1");
    assert_eq!(client.token().await.as_deref(), Some("tok-123"));
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /login"));
    assert!(request.contains("anna@example.com"));
}

#[tokio::test]
async fn rejected_credentials_map_to_the_wrong_credentials_error() {
    let (base_url, server) = serve_once(response("401 Unauthorized", &[], "{}")).await;
    let client = make_client(&base_url);

    let error = client.login("anna@example.com", "wrong").await.unwrap_err();

    assert!(matches!(error, ApiError::WrongCredentials));
    server.await.unwrap();
}

#[tokio::test]
async fn login_without_a_token_header_fails() {
    let (base_url, server) =
        serve_once(response("200 OK", &[], r#"{"id":"user-1"}"#)).await;
    let client = make_client(&base_url);

    let error = client.login("anna@example.com", "secret").await.unwrap_err();

    assert!(matches!(error, ApiError::MissingAuthToken));
    server.await.unwrap();
}
