//! The Gemini-backed receipt analyzer.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};

use crate::{Error, receipt::ReceiptAnalyzer};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The models to try, in order. The first one that responds wins; the next
/// is tried when a model is unavailable or over quota.
const MODELS: [&str; 2] = ["gemini-2.0-flash-exp", "gemini-1.5-flash"];

const PROMPT: &str = "Analyze this receipt image and extract the following \
    as JSON with keys place, date, amount and items: the merchant name, the \
    purchase date in YYYY-MM-DD format, the total amount as a number, and \
    the purchased items as an array of objects with name and price. Respond \
    with only the JSON object.";

/// Extracts receipt fields by sending the image to the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiAnalyzer {
    /// Create an analyzer that talks to the public Gemini API.
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Create an analyzer against a different API root, e.g. a local test
    /// server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn generate(&self, model: &str, api_key: &str, body: &Value) -> Result<Value, Error> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|error| Error::ReceiptAnalysis(error.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();

            return Err(Error::ReceiptAnalysis(format!(
                "{model} responded with {status}: {detail}"
            )));
        }

        response
            .json()
            .await
            .map_err(|error| Error::ReceiptAnalysis(error.to_string()))
    }
}

impl Default for GeminiAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, api_key: &str, image: &[u8], mime_type: &str) -> Result<Value, Error> {
        let body = json!({
            "contents": [{
                "parts": [
                    {"text": PROMPT},
                    {"inline_data": {
                        "mime_type": mime_type,
                        "data": STANDARD.encode(image),
                    }},
                ],
            }],
        });

        let mut last_error = Error::ReceiptAnalysis("no models configured".to_owned());

        for model in MODELS {
            match self.generate(model, api_key, &body).await {
                Ok(response) => {
                    let text = response_text(&response)?;

                    return extract_json(&text);
                }
                Err(error) => {
                    tracing::warn!("receipt analysis with {model} failed: {error}");
                    last_error = error;
                }
            }
        }

        Err(last_error)
    }
}

/// Pull the generated text out of a Gemini response envelope.
fn response_text(response: &Value) -> Result<String, Error> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::UnparseableResponse(response.to_string()))
}

/// Parse the model's reply as JSON, stripping a Markdown code fence if one
/// wraps it and falling back to the outermost brace pair.
fn extract_json(text: &str) -> Result<Value, Error> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
        && let Ok(value) = serde_json::from_str(&trimmed[start..=end])
    {
        return Ok(value);
    }

    Err(Error::UnparseableResponse(text.to_owned()))
}
