//! reqwest 클라이언트 통합 테스트 - 로컬 TCP 서버로 응답 흉내
//!
//! `cargo test -p tablero-api --test http_client`

use serde_json::{json, Value};
use std::time::Duration;
use tablero_api::{ApiError, DashboardApi, HttpClient};
use tablero_foundation::ApiConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// 받은 요청 (요청 줄 + 본문)
#[derive(Debug)]
struct Captured {
    request_line: String,
    body: String,
}

/// 요청 하나를 받고 고정 응답을 보낸 뒤 종료하는 서버
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        Captured {
            request_line: headers.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
        }
    });

    (base_url, handle)
}

fn api(base_url: &str) -> DashboardApi {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    DashboardApi::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_get_list() {
    let (base_url, server) = serve_once("200 OK", r#"[{"alias":"jefe1"},{"alias":"jefe2"}]"#).await;

    let jefes = api(&base_url).obtener_lista_jefes().await;
    assert_eq!(jefes.len(), 2);
    assert_eq!(jefes[0]["alias"], "jefe1");

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("GET /api/obtenerListaJefes "));
}

#[tokio::test]
async fn test_post_body_and_data_wrapper() {
    let (base_url, server) = serve_once("200 OK", r#"{"data":[{"id":1}]}"#).await;

    let justs = api(&base_url).obtener_justs_por_super("G7", "Jefe").await;
    assert_eq!(justs, vec![json!({"id": 1})]);

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /api/obtenerJustsPorSuper "));
    let body: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body, json!({"grupo": "G7", "cargo": "Jefe"}));
}

#[tokio::test]
async fn test_put_encuesta() {
    let (base_url, server) = serve_once("200 OK", r#"{"updated":true}"#).await;

    let result = api(&base_url).try_actualizar_encuesta("15", "activa").await.unwrap();
    assert_eq!(result, json!({"updated": true}));

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("PUT /api/encuesta/15 "));
    let body: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body, json!({"surveyState": "activa"}));
}

#[tokio::test]
async fn test_non_2xx_status() {
    let (base_url, server) = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;

    let err = api(&base_url).try_obtener_pruebas("3").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    server.await.unwrap();

    let (base_url, server) = serve_once("404 Not Found", "{}").await;
    assert!(api(&base_url).obtener_pruebas("3").await.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let (base_url, server) = serve_once("200 OK", "<html>").await;

    let err = api(&base_url).try_obtener_lista_jefes().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn test_connection_refused_falls_back() {
    // 바인딩 후 바로 닫아서 연결 거부되는 포트 확보
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let api = DashboardApi::new(std::sync::Arc::new(client));

    assert!(api.obtener_solicitudes_calendario_jefes().await.is_empty());
    let err = api.try_obtener_solicitudes_calendario_jefes().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
