use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{RecognitionConfig, Result, ServiceError};

const PROMPT: &str = "Identify the object in this doodle in a single word, then rate your \
     confidence between 0 and 1. Reply exactly as: <word> <confidence>";

const PUNCTUATION: &[char] = &['.', ',', '!', '?', ':', ';', '"', '\'', '*', '(', ')'];

/// What a recognizer made of a drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    #[serde(rename = "result")]
    pub guess: String,
    pub confidence: f64,
}

#[async_trait]
pub trait DoodleRecognizer: Send + Sync {
    /// Guess what a PNG drawing depicts.
    async fn recognize(&self, image_png: &[u8]) -> Result<Recognition>;
}

/// Decodes client payloads and hands them to a recognizer.
pub struct RecognitionService {
    recognizer: Arc<dyn DoodleRecognizer>,
}

impl RecognitionService {
    pub fn new(recognizer: Arc<dyn DoodleRecognizer>) -> Self {
        Self { recognizer }
    }

    /// `image` is base64, optionally wrapped in a `data:image/png;base64,` URL.
    pub async fn recognize(&self, image: &str) -> Result<Recognition> {
        let bytes = decode_image(image)?;
        let recognition = self.recognizer.recognize(&bytes).await?;

        tracing::debug!(
            guess = %recognition.guess,
            confidence = recognition.confidence,
            "Doodle recognized"
        );

        Ok(recognition)
    }
}

pub fn decode_image(image: &str) -> Result<Vec<u8>> {
    let payload = match image.split_once("base64,") {
        Some((_, data)) => data,
        None => image,
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(ServiceError::Validation("Image must not be empty".to_string()));
    }

    STANDARD
        .decode(payload)
        .map_err(|e| ServiceError::Validation(format!("Image is not valid base64: {}", e)))
}

/// Turn a free-text model reply into a one-word guess and a confidence.
pub fn parse_reply(reply: &str) -> Result<Recognition> {
    let mut words = reply.split_whitespace();

    let guess = words
        .next()
        .map(|word| word.trim_matches(PUNCTUATION).to_lowercase())
        .filter(|word| !word.is_empty())
        .ok_or_else(|| ServiceError::Recognition("Empty reply from recognizer".to_string()))?;

    let confidence = words
        .filter_map(|word| word.trim_matches(PUNCTUATION).parse::<f64>().ok())
        .find(|value| (0.0..=1.0).contains(value))
        .unwrap_or(0.0);

    Ok(Recognition { guess, confidence })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Gemini `generateContent` over REST.
pub struct GeminiRecognizer {
    client: reqwest::Client,
    config: RecognitionConfig,
}

impl GeminiRecognizer {
    pub fn new(config: RecognitionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl DoodleRecognizer for GeminiRecognizer {
    async fn recognize(&self, image_png: &[u8]) -> Result<Recognition> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": PROMPT },
                    { "inline_data": { "mime_type": "image/png", "data": STANDARD.encode(image_png) } }
                ]
            }]
        });

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Recognition(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceError::Recognition(format!(
                "Recognizer returned {}: {}",
                status, text
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Recognition(format!("Malformed response: {}", e)))?;

        let text = reply
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or_else(|| ServiceError::Recognition("Response had no text".to_string()))?;

        parse_reply(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRecognizer;

    #[async_trait]
    impl DoodleRecognizer for FixedRecognizer {
        async fn recognize(&self, image_png: &[u8]) -> Result<Recognition> {
            Ok(Recognition {
                guess: format!("{}-bytes", image_png.len()),
                confidence: 1.0,
            })
        }
    }

    #[test]
    fn test_parse_reply_takes_first_word() {
        let recognition = parse_reply("Cat. 0.92").unwrap();
        assert_eq!(recognition.guess, "cat");
        assert_eq!(recognition.confidence, 0.92);
    }

    #[test]
    fn test_parse_reply_without_confidence() {
        let recognition = parse_reply("  House!\n").unwrap();
        assert_eq!(recognition.guess, "house");
        assert_eq!(recognition.confidence, 0.0);
    }

    #[test]
    fn test_parse_reply_ignores_out_of_range_numbers() {
        let recognition = parse_reply("tree 85 0.4").unwrap();
        assert_eq!(recognition.confidence, 0.4);
    }

    #[test]
    fn test_parse_reply_empty_is_error() {
        assert!(matches!(parse_reply("   "), Err(ServiceError::Recognition(_))));
        assert!(parse_reply("...").is_err());
    }

    #[test]
    fn test_decode_image_strips_data_url() {
        let plain = decode_image("aGVsbG8=").unwrap();
        let wrapped = decode_image("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(plain, b"hello");
        assert_eq!(wrapped, plain);
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        assert!(matches!(decode_image("not base64!!"), Err(ServiceError::Validation(_))));
        assert!(matches!(decode_image(""), Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_service_passes_decoded_bytes() {
        let service = RecognitionService::new(Arc::new(FixedRecognizer));
        let recognition = service.recognize("data:image/png;base64,aGVsbG8=").await.unwrap();
        assert_eq!(recognition.guess, "5-bytes");
    }
}
