use crate::rest_api::GenerateContentRequest;
use anyhow::{Context, Error, Result};
use log::debug;
use reqwest::blocking::{Client, Request};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request(&self, body: &GenerateContentRequest) -> Result<Request> {
        self.http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .build()
            .with_context(|| format!("Invalid request to {}", self.endpoint()))
    }

    /// Sends the request and returns the response body as is, so it can be cached verbatim.
    pub fn generate_content(&self, body: &GenerateContentRequest) -> Result<String> {
        let request = self.build_request(body)?;
        debug!("POST {}", request.url());
        let response = self
            .http
            .execute(request)
            .with_context(|| format!("Request to {} failed", self.endpoint()))?;
        let status = response.status();
        let text = response
            .text()
            .context("Failed to read generateContent response")?;
        if !status.is_success() {
            return Err(Error::msg(format!("Gemini API returned {status}: {text}")));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_targets_model_endpoint() {
        let client = GeminiClient::new("secret", "gemini-test", "http://localhost:9/v1beta/");
        let body = GenerateContentRequest::json_prompt("system", "prompt");
        let request = client.build_request(&body).unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:9/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(request.method(), "POST");
        assert_eq!(request.headers()[API_KEY_HEADER], "secret");
        assert_eq!(request.headers()["content-type"], "application/json");

        let sent = request.body().and_then(|b| b.as_bytes()).unwrap();
        let decoded: GenerateContentRequest = serde_json::from_slice(sent).unwrap();
        assert_eq!(decoded, body);
    }
}
