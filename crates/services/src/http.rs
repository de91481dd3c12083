use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use quiz_core::model::{AnswerSheet, Question, QuizResult, Topic};

use crate::error::{ProviderError, SubmitError};
use crate::provider::{QuestionProvider, SubmissionService};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for QuizApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl QuizApiConfig {
    /// Read `QUIZ_API_URL` and `QUIZ_API_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("QUIZ_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = env::var("QUIZ_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Self { base_url, timeout }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// HTTP client for the quiz generation and scoring endpoints.
///
/// The scoring endpoint grades against the quiz stored in the server-side
/// session, so the client keeps cookies between the two calls.
#[derive(Clone)]
pub struct HttpQuizApi {
    client: Client,
    config: QuizApiConfig,
}

impl HttpQuizApi {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: QuizApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl QuestionProvider for HttpQuizApi {
    async fn fetch_questions(&self, topic: &Topic) -> Result<Vec<Question>, ProviderError> {
        let url = self.config.endpoint("generate_quiz");
        tracing::debug!(%url, %topic, "requesting question set");

        let response = self
            .client
            .post(url)
            .json(&GenerateRequest {
                topic: topic.as_str(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(match error_message(response).await {
                Some(message) => ProviderError::Rejected(message),
                None => ProviderError::HttpStatus(status),
            });
        }

        let body: GenerateResponse = response.json().await?;
        body.into_questions()
    }
}

#[async_trait]
impl SubmissionService for HttpQuizApi {
    async fn submit(&self, answers: &AnswerSheet) -> Result<QuizResult, SubmitError> {
        let url = self.config.endpoint("submit_quiz");
        tracing::debug!(%url, slots = answers.len(), "submitting answers");

        let response = self
            .client
            .post(url)
            .json(&SubmitRequest { answers })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(match error_message(response).await {
                Some(message) => SubmitError::Rejected(message),
                None => SubmitError::HttpStatus(status),
            });
        }

        Ok(response.json().await?)
    }
}

async fn error_message(response: Response) -> Option<String> {
    let body: ErrorResponse = response.json().await.ok()?;
    let message = body.error.trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    questions: Vec<WireQuestion>,
}

impl GenerateResponse {
    fn into_questions(self) -> Result<Vec<Question>, ProviderError> {
        self.questions
            .into_iter()
            .enumerate()
            .map(|(index, wire)| {
                Question::new(wire.question_text, wire.options)
                    .map_err(|source| ProviderError::InvalidQuestion { index, source })
            })
            .collect()
    }
}

/// One generated question. Any `correct_answer` field is ignored.
#[derive(Debug, Deserialize)]
struct WireQuestion {
    question_text: String,
    #[serde(default)]
    options: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    answers: &'a AnswerSheet,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionError;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = QuizApiConfig {
            base_url: "http://quiz.local/".into(),
            ..QuizApiConfig::default()
        };
        assert_eq!(config.endpoint("submit_quiz"), "http://quiz.local/submit_quiz");
    }

    #[test]
    fn generate_response_ignores_correct_answer() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"questions":[
                {"question_text":"Which gas?","options":["CO2","O2"],"correct_answer":"CO2"},
                {"question_text":"Which bin?","options":["Green","Blue","Red"]}
            ]}"#,
        )
        .unwrap();

        let questions = body.into_questions().unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options(), ["CO2", "O2"]);
        assert_eq!(questions[1].prompt(), "Which bin?");
    }

    #[test]
    fn question_without_options_fails_the_load() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"questions":[
                {"question_text":"Fine","options":["A"]},
                {"question_text":"Broken","options":[]}
            ]}"#,
        )
        .unwrap();

        let err = body.into_questions().unwrap_err();
        assert!(matches!(
            err,
            ProviderError::InvalidQuestion {
                index: 1,
                source: QuestionError::NoOptions
            }
        ));
    }

    #[test]
    fn missing_questions_key_is_an_empty_set() {
        let body: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(body.into_questions().unwrap().is_empty());
    }

    #[test]
    fn submit_request_keeps_nulls_in_order() {
        let sheet = AnswerSheet::new(vec![Some("A".into()), None, Some("C".into())]);
        let json = serde_json::to_string(&SubmitRequest { answers: &sheet }).unwrap();
        assert_eq!(json, r#"{"answers":["A",null,"C"]}"#);
    }
}
