use serde_json::{json, Value};
use text_analyzer_client::{
    error::AnalysisError,
    models::{AnalyzeRequest, ComparisonRequest, GeminiRequest, Preset},
    AnalysisBackend, AnalysisClient,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

const COMPARE: &str = include_str!("fixtures/compare.json");
const GEMINI: &str = include_str!("fixtures/gemini.json");
const NLTK: &str = include_str!("fixtures/nltk.json");

/// A raw HTTP request as seen by the server.
struct Captured {
    head: String,
    body: String,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.head.lines().find_map(|line| {
            line.to_ascii_lowercase()
                .strip_prefix(&prefix)
                .map(|value| value.trim().to_string())
        })
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|value| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }

    let end = header_end(&buf).unwrap();
    Captured {
        head: String::from_utf8(buf[..end].to_vec()).unwrap(),
        body: String::from_utf8(buf[end + 4..].to_vec()).unwrap(),
    }
}

/// Serves exactly one request with the given status and JSON body.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        captured
    });

    (format!("http://{addr}"), handle)
}

#[tokio::test]
async fn compare_posts_json_and_decodes_both_analyzers() {
    let (base_url, server) = serve_once("200 OK", COMPARE).await;
    let client = AnalysisClient::new(format!("{base_url}/"));

    let request = ComparisonRequest {
        text: "Il gatto dorme sul divano.".to_string(),
        filter_short_words: true,
        min_word_length: 4,
        ai_config: Preset::Creative.parameters(),
    };
    let response = client.compare(&request).await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(captured.request_line(), "POST /api/compare HTTP/1.1");
    assert_eq!(
        captured.header("content-type").as_deref(),
        Some("application/json")
    );
    assert_eq!(
        captured.json(),
        json!({
            "text": "Il gatto dorme sul divano.",
            "filter_short_words": true,
            "min_word_length": 4,
            "ai_config": {
                "temperature": 1.0,
                "top_p": 1.0,
                "top_k": 64,
                "max_output_tokens": 8192,
                "candidate_count": 1
            }
        })
    );

    assert_eq!(response.nltk.statistics.total_words.as_u64(), Some(80));
    assert_eq!(response.gemini.source.as_deref(), Some("gemini"));
    assert_eq!(response.differences.unwrap().agreement, "Alta");
}

#[tokio::test]
async fn gemini_analysis_hits_its_endpoint() {
    let (base_url, server) = serve_once("200 OK", GEMINI).await;
    let client = AnalysisClient::new(base_url);

    let request = GeminiRequest {
        text: "Testo".to_string(),
        ai_config: Preset::Deterministic.parameters().without_max_output_tokens(),
    };
    let response = client.analyze_gemini(&request).await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(captured.request_line(), "POST /api/analyze-gemini HTTP/1.1");
    assert!(captured.json()["ai_config"].get("max_output_tokens").is_none());
    assert_eq!(response.suggestions.len(), 2);
}

#[tokio::test]
async fn nltk_analysis_hits_its_endpoint() {
    let (base_url, server) = serve_once("200 OK", NLTK).await;
    let client = AnalysisClient::new(base_url);

    let request = AnalyzeRequest {
        text: "Testo".to_string(),
        filter_short_words: false,
        min_word_length: 3,
    };
    let response = client.analyze(&request).await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(captured.request_line(), "POST /api/analyze HTTP/1.1");
    assert_eq!(captured.json()["min_word_length"], json!(3));
    assert_eq!(response.most_common_words.len(), 3);
}

#[tokio::test]
async fn bad_request_with_error_body_is_an_api_error() {
    let (base_url, server) = serve_once("400 BAD REQUEST", r#"{"error": "Testo vuoto"}"#).await;
    let client = AnalysisClient::new(base_url);

    let request = GeminiRequest {
        text: "x".to_string(),
        ai_config: Preset::Balanced.parameters(),
    };
    let result = client.analyze_gemini(&request).await;
    server.await.unwrap();

    match result {
        Err(AnalysisError::Api { message, .. }) => assert_eq!(message, "Testo vuoto"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn health_uses_get() {
    let (base_url, server) =
        serve_once("200 OK", r#"{"status": "ok", "message": "API is running"}"#).await;
    let client = AnalysisClient::new(base_url);

    let status = client.health().await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(captured.request_line(), "GET /api/health HTTP/1.1");
    assert_eq!(status.status, "ok");
    assert_eq!(status.message, "API is running");
}

#[tokio::test]
async fn unreachable_backend_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AnalysisClient::new(format!("http://{addr}"));
    let result = client.health().await;
    assert!(matches!(result, Err(AnalysisError::RequestError(_))));
}
