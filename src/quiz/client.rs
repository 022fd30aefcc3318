use log::{debug, warn};
use reqwest::Client;

use crate::quiz::{ErrorResponse, Question, QuizError, QuizRequest, QuizResponse};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/generate-quiz";

/// Talks to the quiz generation API.
pub struct QuizClient {
    http: Client,
    endpoint: String,
}

impl QuizClient {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one generate request and returns the questions in the order the API produced them.
    pub async fn generate(&self, request: &QuizRequest) -> Result<Vec<Question>, QuizError> {
        debug!(
            "POST {} topics={:?} type={} difficulty={} num_questions={}",
            self.endpoint, request.topics, request.kind, request.difficulty, request.num_questions
        );

        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error = serde_json::from_slice::<ErrorResponse>(&body).unwrap_or_default();
            if let Some(details) = &error.details {
                warn!("Quiz API rejected the request ({}): {}", status, details);
            }
            return Err(QuizError::Http(
                error
                    .error
                    .filter(|msg| !msg.trim().is_empty())
                    .unwrap_or_else(|| "Request failed".to_string()),
            ));
        }

        let parsed: QuizResponse = serde_json::from_slice(&body)?;
        if let Some(warning) = &parsed.warning {
            warn!(
                "Quiz API warning: {} ({})",
                warning,
                parsed.db_error.as_deref().unwrap_or("no details")
            );
        }
        debug!(
            "Quiz API answered {} with {:?} questions in {}",
            status,
            parsed.count,
            parsed.processing_time.as_deref().unwrap_or("?")
        );

        match parsed.questions {
            Some(questions) if !questions.is_empty() => Ok(questions),
            _ => Err(QuizError::EmptyResult),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> QuizRequest {
        QuizRequest {
            topics: vec!["a".to_string(), "b".to_string()],
            kind: "mcq".to_string(),
            difficulty: "easy".to_string(),
            num_questions: 3,
        }
    }

    #[tokio::test]
    async fn posts_json_and_returns_questions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate-quiz")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "topics": ["a", "b"],
                "type": "mcq",
                "difficulty": "easy",
                "num_questions": 3
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"questions":["Q1 text", {"text":"Q2 text"}]}"#)
            .create_async()
            .await;

        let client = QuizClient::with_endpoint(format!("{}/api/generate-quiz", server.url()));
        let questions = client.generate(&request()).await.unwrap();

        mock.assert_async().await;
        let texts = questions.iter().map(Question::text).collect::<Vec<_>>();
        assert_eq!(texts, ["Q1 text", "Q2 text"]);
    }

    #[tokio::test]
    async fn error_status_uses_error_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate-quiz")
            .with_status(500)
            .with_body(r#"{"error":"backend down"}"#)
            .create_async()
            .await;

        let client = QuizClient::with_endpoint(format!("{}/api/generate-quiz", server.url()));
        let err = client.generate(&request()).await.unwrap_err();

        assert!(matches!(&err, QuizError::Http(msg) if msg == "backend down"));
    }

    #[tokio::test]
    async fn error_status_without_message_is_generic() {
        for body in ["<html>Bad Gateway</html>", r#"{"error":""}"#, r#"{"details":{}}"#] {
            let mut server = mockito::Server::new_async().await;
            let _mock = server
                .mock("POST", "/api/generate-quiz")
                .with_status(502)
                .with_body(body)
                .create_async()
                .await;

            let client = QuizClient::with_endpoint(format!("{}/api/generate-quiz", server.url()));
            let err = client.generate(&request()).await.unwrap_err();

            assert_eq!(
                err.user_message(),
                "Failed to generate quiz: Request failed",
                "body {}",
                body
            );
        }
    }

    #[tokio::test]
    async fn empty_or_missing_questions_fail() {
        for body in [r#"{"questions":[]}"#, r#"{"success":true}"#] {
            let mut server = mockito::Server::new_async().await;
            let _mock = server
                .mock("POST", "/api/generate-quiz")
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;

            let client = QuizClient::with_endpoint(format!("{}/api/generate-quiz", server.url()));
            let err = client.generate(&request()).await.unwrap_err();

            assert!(matches!(err, QuizError::EmptyResult), "body {}", body);
        }
    }

    #[tokio::test]
    async fn partial_success_still_returns_questions() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate-quiz")
            .with_status(207)
            .with_body(
                r#"{"success":true,"questions":["only one"],"count":1,"warning":"Questions generated but not saved","db_error":"Database unavailable"}"#,
            )
            .create_async()
            .await;

        let client = QuizClient::with_endpoint(format!("{}/api/generate-quiz", server.url()));
        let questions = client.generate(&request()).await.unwrap();

        assert_eq!(questions, vec![Question::Plain("only one".to_string())]);
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate-quiz")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = QuizClient::with_endpoint(format!("{}/api/generate-quiz", server.url()));
        let err = client.generate(&request()).await.unwrap_err();

        assert!(matches!(err, QuizError::Decode(_)));
    }
}
