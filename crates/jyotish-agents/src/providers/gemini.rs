use super::{ChatMessage, GenerationConfig, LlmProvider, LlmRequest, LlmResponse, Usage};
use async_trait::async_trait;
use jyotish_common::{Error, Result};
use jyotish_config::{DEFAULT_GEMINI_MODEL, GeminiConfig};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const NO_RESPONSE: &str = "No response from Gemini";

/// Google Generative Language API provider.
///
/// A 404 for a non-default model is retried once against
/// [`DEFAULT_GEMINI_MODEL`] with the same body; if that also fails the
/// original 404 is reported.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Gemini models use `:generateContent`; older text models use `:generateText`.
    pub fn endpoint_url(&self, model: &str) -> String {
        let model = model_id(model);
        let method = if model.to_ascii_lowercase().starts_with("gemini-") {
            "generateContent"
        } else {
            "generateText"
        };
        format!("{}/{}:{}", self.base_url, model, method)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Chat("GEMINI_API_KEY environment variable is not set".into()))
    }

    async fn post(&self, model: &str, body: &GeminiRequest) -> Result<reqwest::Response> {
        let api_key = self.api_key()?;
        self.client
            .post(self.endpoint_url(model))
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(transport_error)
    }

    /// One retry against the default model. `None` means the original error stands.
    async fn try_fallback(&self, body: &GeminiRequest) -> Option<LlmResponse> {
        let response = match self.post(DEFAULT_GEMINI_MODEL, body).await {
            Ok(response) => response,
            Err(e) => {
                warn!("fallback to {} failed: {}", DEFAULT_GEMINI_MODEL, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "fallback to {} failed with status {}",
                DEFAULT_GEMINI_MODEL,
                response.status()
            );
            return None;
        }

        match parse_response(response, DEFAULT_GEMINI_MODEL).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!("fallback to {} returned no usable text: {}", DEFAULT_GEMINI_MODEL, e);
                None
            }
        }
    }

    /// List the models visible to the configured key.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let api_key = self.api_key()?;
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("key", api_key.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(&self.base_url)
                .query(&query)
                .send()
                .await
                .map_err(transport_error)?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let text = response.text().await.unwrap_or_default();
                return Err(Error::Chat(format!("Gemini API error: {status} - {text}")));
            }

            let page: ModelList = response
                .json()
                .await
                .map_err(|e| {
                    Error::Chat(format!("Failed to parse Gemini model list: {}", e.without_url()))
                })?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        self.api_key()?;
        let model = model_id(&request.model);
        let body = GeminiRequest::from_request(request);

        info!("using model={} url={}", model, self.endpoint_url(model));
        let response = self.post(model, &body).await?;

        let status = response.status();
        if status.is_success() {
            return parse_response(response, model).await;
        }

        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            if model != DEFAULT_GEMINI_MODEL {
                warn!("model {} failed, retrying with {}", model, DEFAULT_GEMINI_MODEL);
                if let Some(reply) = self.try_fallback(&body).await {
                    info!("using fallback model {} after 404 from {}", DEFAULT_GEMINI_MODEL, model);
                    return Ok(reply);
                }
            }

            return Err(Error::Chat(format!(
                "Gemini API error: 404 - {text}. The model \"{model}\" was not found for API \
                 version v1beta or is not supported for generateContent. Set GEMINI_MODEL to a \
                 supported model or run `jyotish models` to see available models."
            )));
        }

        Err(Error::Chat(format!(
            "Gemini API error: {} - {}",
            status.as_u16(),
            text
        )))
    }

    async fn health_check(&self) -> Result<bool> {
        let Ok(api_key) = self.api_key() else {
            return Ok(false);
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", api_key), ("pageSize", "1")])
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

/// Model name without the `models/` prefix the listing endpoint reports.
fn model_id(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

/// The request URL carries `?key=`, so it never goes into the message.
fn transport_error(e: reqwest::Error) -> Error {
    Error::Chat(format!("Gemini request failed: {}", e.without_url()))
}

async fn parse_response(response: reqwest::Response, model: &str) -> Result<LlmResponse> {
    let parsed: GeminiResponse = response
        .json()
        .await
        .map_err(|e| Error::Chat(format!("Failed to parse Gemini response: {}", e.without_url())))?;

    let candidate = parsed.candidates.into_iter().next();
    let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
    let text = candidate
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::Chat(NO_RESPONSE.to_string()))?;

    Ok(LlmResponse {
        text,
        model: parsed.model_version.unwrap_or_else(|| model.to_string()),
        usage: parsed.usage_metadata.map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        }),
        finish_reason,
    })
}

// Request Types
#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

impl GeminiRequest {
    fn from_request(request: &LlmRequest) -> Self {
        Self {
            system_instruction: request.system.as_ref().map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: text.clone() }],
            }),
            contents: request.messages.iter().map(GeminiContent::from).collect(),
            generation_config: request.generation.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart>,
}

impl From<&ChatMessage> for GeminiContent {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: Some(msg.role.as_str()),
            parts: vec![GeminiPart {
                text: msg.content.clone(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    top_p: f64,
}

impl From<GenerationConfig> for GeminiGenerationConfig {
    fn from(config: GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            top_p: config.top_p,
        }
    }
}

// Response Types
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

/// Entry from the models listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ChatRole;
    use serde_json::json;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(&GeminiConfig {
            api_key: Some("key".to_string()),
            base_url: "https://example.test/v1beta/models/".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn gemini_models_use_generate_content() {
        let p = provider();
        assert_eq!(
            p.endpoint_url("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            p.endpoint_url("Gemini-1.5-Pro"),
            "https://example.test/v1beta/models/Gemini-1.5-Pro:generateContent"
        );
        assert_eq!(
            p.endpoint_url("models/gemini-2.0-flash"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn model_id_drops_listing_prefix() {
        assert_eq!(model_id("models/gemini-2.5-flash"), DEFAULT_GEMINI_MODEL);
        assert_eq!(model_id("gemini-1.5-pro"), "gemini-1.5-pro");
    }

    #[test]
    fn other_models_use_generate_text() {
        assert_eq!(
            provider().endpoint_url("text-bison-001"),
            "https://example.test/v1beta/models/text-bison-001:generateText"
        );
    }

    #[test]
    fn request_body_has_wire_field_names() {
        let request = LlmRequest {
            model: "gemini-2.5-flash".to_string(),
            messages: vec![
                ChatMessage::user("hello"),
                ChatMessage {
                    role: ChatRole::Model,
                    content: "namaste".to_string(),
                },
            ],
            system: Some("persona".to_string()),
            generation: GenerationConfig::default(),
        };

        let body = serde_json::to_value(GeminiRequest::from_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "system_instruction": {"parts": [{"text": "persona"}]},
                "contents": [
                    {"role": "user", "parts": [{"text": "hello"}]},
                    {"role": "model", "parts": [{"text": "namaste"}]},
                ],
                "generationConfig": {
                    "temperature": 0.85,
                    "maxOutputTokens": 1500,
                    "topP": 0.95,
                },
            })
        );
    }

    #[test]
    fn model_info_reports_generate_content_support() {
        let info: ModelInfo = serde_json::from_value(json!({
            "name": "models/gemini-2.5-flash",
            "displayName": "Gemini 2.5 Flash",
            "supportedGenerationMethods": ["generateContent", "countTokens"],
        }))
        .unwrap();
        assert!(info.supports_generate_content());
        assert_eq!(info.display_name.as_deref(), Some("Gemini 2.5 Flash"));
    }
}
