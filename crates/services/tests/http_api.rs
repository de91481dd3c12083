use std::sync::{Arc, Mutex};
use std::time::Duration;

use quiz_core::model::{AnswerSheet, Topic};
use quiz_services::{
    HttpQuizApi, ProviderError, QuestionProvider, QuizApiConfig, SubmissionService, SubmitError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Minimal HTTP/1.1 server answering each connection with the next scripted response.
struct FakeServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    async fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                recorded.lock().unwrap().push(request);
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        Self { base_url, requests }
    }

    fn api(&self) -> HttpQuizApi {
        HttpQuizApi::new(QuizApiConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let body_len = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_lowercase()
}

fn response(status: &str, extra_headers: &[&str], body: &str) -> String {
    let mut head = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
        body.len()
    );
    for header in extra_headers {
        head.push_str(header);
        head.push_str("\r\n");
    }
    format!("{head}\r\n{body}")
}

const QUESTIONS: &str =
    r#"{"questions":[{"question_text":"Which gas?","options":["CO2","O2"],"correct_answer":"CO2"}]}"#;

fn general() -> Topic {
    Topic::new("general").unwrap()
}

fn sheet() -> AnswerSheet {
    AnswerSheet::new(vec![Some("CO2".into())])
}

#[tokio::test]
async fn session_cookie_is_sent_back_on_submit() {
    let server = FakeServer::start(vec![
        response("200 OK", &["set-cookie: session=abc; Path=/"], QUESTIONS),
        response("200 OK", &[], r#"{"score":1,"total":1,"points_earned":10}"#),
    ])
    .await;
    let api = server.api();

    let questions = api.fetch_questions(&general()).await.unwrap();
    assert_eq!(questions.len(), 1);
    let result = api.submit(&sheet()).await.unwrap();
    assert_eq!((result.score, result.total), (1, 1));
    assert_eq!(result.points_earned, Some(10));

    let requests = server.requests();
    assert!(requests[0].starts_with("post /generate_quiz "));
    assert!(requests[0].contains(r#"{"topic":"general"}"#));
    assert!(requests[1].starts_with("post /submit_quiz "));
    assert!(requests[1].contains("cookie: session=abc"), "{}", requests[1]);
    assert!(requests[1].contains(r#"{"answers":["co2"]}"#));
}

#[tokio::test]
async fn provider_error_body_maps_to_rejected() {
    let server = FakeServer::start(vec![response(
        "500 Internal Server Error",
        &[],
        r#"{"error":"Failed to generate quiz for this topic."}"#,
    )])
    .await;

    let err = server.api().fetch_questions(&general()).await.unwrap_err();
    assert!(
        matches!(&err, ProviderError::Rejected(message) if message == "Failed to generate quiz for this topic."),
        "{err:?}"
    );
}

#[tokio::test]
async fn provider_status_without_error_body_maps_to_http_status() {
    let server = FakeServer::start(vec![response("502 Bad Gateway", &[], "upstream down")]).await;

    let err = server.api().fetch_questions(&general()).await.unwrap_err();
    assert!(
        matches!(err, ProviderError::HttpStatus(status) if status.as_u16() == 502),
        "{err:?}"
    );
}

#[tokio::test]
async fn provider_success_with_malformed_body_is_http_error() {
    let server = FakeServer::start(vec![response("200 OK", &[], "<html>oops</html>")]).await;

    let err = server.api().fetch_questions(&general()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)), "{err:?}");
}

#[tokio::test]
async fn submit_error_body_maps_to_rejected() {
    let server = FakeServer::start(vec![response(
        "500 Internal Server Error",
        &[],
        r#"{"error":"Database not connected."}"#,
    )])
    .await;

    let err = server.api().submit(&sheet()).await.unwrap_err();
    assert!(
        matches!(&err, SubmitError::Rejected(message) if message == "Database not connected."),
        "{err:?}"
    );
}

#[tokio::test]
async fn submit_status_without_error_body_maps_to_http_status() {
    let server = FakeServer::start(vec![response("401 Unauthorized", &[], "")]).await;

    let err = server.api().submit(&sheet()).await.unwrap_err();
    assert!(
        matches!(err, SubmitError::HttpStatus(status) if status.as_u16() == 401),
        "{err:?}"
    );
}

#[tokio::test]
async fn submit_success_with_malformed_body_is_http_error() {
    let server = FakeServer::start(vec![response("200 OK", &[], "not json")]).await;

    let err = server.api().submit(&sheet()).await.unwrap_err();
    assert!(matches!(err, SubmitError::Http(_)), "{err:?}");
}
