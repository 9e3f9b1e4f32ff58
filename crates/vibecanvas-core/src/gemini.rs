use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{ImageError, MetadataError};
use crate::vibe::{VibeMetadata, PNG_DATA_URI_PREFIX};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text of the first candidate, `None` if it has no text parts
    fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Instruction sent with the metadata request
pub fn metadata_prompt(vibe: &str) -> String {
    format!(
        "Based on the mood or vibe description: \"{}\", generate a cohesive artistic title, \
         a short poetic description, and a hex-code color palette (5 colors).",
        vibe
    )
}

/// Prompt sent with the image request, built from the vibe and its metadata
pub fn image_prompt(vibe: &str, metadata: &VibeMetadata) -> String {
    format!(
        "An abstract artistic masterpiece representing the theme: \"{}\".\n\
         The mood is {}.\n\
         The primary colors are {}.\n\
         Original user vibe: {}.\n\
         High definition, fine art style, minimalist but expressive.",
        metadata.title,
        metadata.description,
        metadata.palette.join(", "),
        vibe
    )
}

fn metadata_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "palette": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["title", "description", "palette"]
    })
}

fn user_content(prompt: String) -> Vec<Content> {
    vec![Content {
        role: "user".to_string(),
        parts: vec![TextPart { text: prompt }],
    }]
}

fn metadata_request(vibe: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: user_content(metadata_prompt(vibe)),
        generation_config: GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(metadata_schema()),
            ..Default::default()
        },
    }
}

fn image_request(vibe: &str, metadata: &VibeMetadata) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: user_content(image_prompt(vibe, metadata)),
        generation_config: GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: "1:1".to_string(),
            }),
            ..Default::default()
        },
    }
}

/// Parse the model's text output as metadata. Missing text counts as `{}`.
fn parse_metadata(text: Option<&str>) -> Result<VibeMetadata, MetadataError> {
    serde_json::from_str(text.unwrap_or("{}")).map_err(|e| MetadataError::Parse(e.to_string()))
}

/// Find the first inline image part and wrap it as a PNG data URI
fn extract_image_url(response: &GenerateContentResponse) -> Result<String, ImageError> {
    response
        .first_parts()
        .iter()
        .filter_map(|p| p.inline_data.as_ref())
        .find(|inline| !inline.data.is_empty())
        .map(|inline| {
            if let Some(mime) = inline.mime_type.as_deref().filter(|m| *m != "image/png") {
                debug!("Inline image is {}, labelling it image/png", mime);
            }
            format!("{}{}", PNG_DATA_URI_PREFIX, inline.data)
        })
        .ok_or(ImageError::NoImageData)
}

/// Thin client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    text_model: String,
    image_model: String,
    strict_palette: bool,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            strict_palette: false,
        }
    }

    /// Build a client from configuration. The key comes from
    /// `Config::resolve_api_key` (environment first).
    pub fn from_config(config: &Config) -> Self {
        let mut client = Self::new(&config.resolve_api_key());
        if let Some(base) = config.api_base.as_deref() {
            client = client.with_api_base(base);
        }
        if let Some(model) = &config.text_model {
            client.text_model = model.clone();
        }
        if let Some(model) = &config.image_model {
            client.image_model = model.clone();
        }
        client.strict_palette = config.strict_palette.unwrap_or(false);
        client
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    /// POST a request; returns the status code and raw body.
    ///
    /// Transport errors come back without their URL so they can be logged.
    async fn post(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<(reqwest::StatusCode, String), reqwest::Error> {
        let url = self.endpoint(model);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        Ok((status, body))
    }

    pub async fn generate_metadata(&self, vibe: &str) -> Result<VibeMetadata, MetadataError> {
        info!("Requesting vibe metadata from {}", self.text_model);

        let (status, body) = self.post(&self.text_model, &metadata_request(vibe)).await?;
        if !status.is_success() {
            return Err(MetadataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| MetadataError::Parse(e.to_string()))?;
        let metadata = parse_metadata(response.text().as_deref())?;

        if self.strict_palette && !metadata.has_strict_palette() {
            return Err(MetadataError::Parse(format!(
                "expected 5 #RRGGBB colors, got {:?}",
                metadata.palette
            )));
        }

        Ok(metadata)
    }

    pub async fn generate_image(
        &self,
        vibe: &str,
        metadata: &VibeMetadata,
    ) -> Result<String, ImageError> {
        info!("Requesting vibe image from {}", self.image_model);

        let (status, body) = self
            .post(&self.image_model, &image_request(vibe, metadata))
            .await?;
        if !status.is_success() {
            return Err(ImageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!("Unreadable image response: {}", e);
                return Err(ImageError::NoImageData);
            }
        };
        extract_image_url(&response)
    }
}
