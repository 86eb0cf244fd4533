// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AdError;

/// External text-to-image service an ad is generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[default]
    #[serde(rename = "stability")]
    Stability,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Stability, Provider::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Stability => "stability",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Stability => "Stability AI",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI DALL-E 3 (₹14/image)",
            Provider::Stability => "Stability AI (₹3.30/image)",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "stability" => Ok(Provider::Stability),
            other => Err(AdError::InvalidProvider(other.to_string())),
        }
    }
}

/// Normalized output of a generation call.
///
/// Serializes as the bare string so it can be handed to an `<img src>` as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageReference {
    Url(String),
    DataUri(String),
}

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

impl ImageReference {
    pub fn png_base64(payload: &str) -> Self {
        ImageReference::DataUri(format!("{}{}", PNG_DATA_URI_PREFIX, payload))
    }

    /// `(mime, base64 payload)` of a data URI; `None` for URLs.
    pub fn data_uri_parts(&self) -> Option<(&str, &str)> {
        match self {
            ImageReference::Url(_) => None,
            ImageReference::DataUri(uri) => uri
                .strip_prefix("data:")
                .and_then(|rest| rest.split_once(";base64,")),
        }
    }

    /// Shape check only: a non-empty http(s) URL, or a data URI with a non-empty payload.
    pub fn is_well_formed(&self) -> bool {
        match self {
            ImageReference::Url(url) => {
                url.starts_with("https://") || url.starts_with("http://")
            }
            ImageReference::DataUri(_) => self
                .data_uri_parts()
                .is_some_and(|(mime, payload)| mime.starts_with("image/") && !payload.is_empty()),
        }
    }
}

impl From<String> for ImageReference {
    fn from(value: String) -> Self {
        if value.starts_with("data:") {
            ImageReference::DataUri(value)
        } else {
            ImageReference::Url(value)
        }
    }
}

impl From<ImageReference> for String {
    fn from(value: ImageReference) -> Self {
        match value {
            ImageReference::Url(s) | ImageReference::DataUri(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAdRecord {
    pub id: String,
    pub image_url: ImageReference,
    pub prompt: String,
    pub style: String,
    pub mood: String,
    pub created_at: DateTime<Utc>,
    pub originating_product: ProductDescriptor,
    pub provider: Provider,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub total_ads: usize,
    pub credits_used: usize,
    pub credits_remaining: usize,
    pub credit_ceiling: usize,
    pub favorite_style: Option<String>,
    pub total_downloads: usize,
    pub recent_activity: Vec<GeneratedAdRecord>,
    pub low_credits: bool,
    pub credits_exhausted: bool,
}

// Request / response bodies

/// Keeps an explicit `null` apart from an absent field: absent is `None`,
/// `null` is `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub provider: Option<Option<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_url: ImageReference,
}

#[derive(Debug, Deserialize)]
pub struct CreateAdRequest {
    pub description: Option<String>,
    pub style: Option<String>,
    pub mood: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub provider: Option<Option<String>>,
}

pub const DEFAULT_STYLE: &str = "modern";
pub const DEFAULT_MOOD: &str = "energetic";

pub const STYLES: &[(&str, &str)] = &[
    ("modern", "Modern & Minimal"),
    ("vintage", "Vintage & Classic"),
    ("bold", "Bold & Colorful"),
    ("elegant", "Elegant & Luxury"),
    ("playful", "Playful & Fun"),
];

pub const MOODS: &[(&str, &str)] = &[
    ("energetic", "Energetic & Dynamic"),
    ("calm", "Calm & Peaceful"),
    ("professional", "Professional & Trust"),
    ("exciting", "Exciting & Adventurous"),
    ("cozy", "Cozy & Comfortable"),
];

#[derive(Debug, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GenerationOptions {
    pub styles: Vec<OptionEntry>,
    pub moods: Vec<OptionEntry>,
    pub providers: Vec<OptionEntry>,
}

impl GenerationOptions {
    pub fn catalog() -> Self {
        let entries = |pairs: &[(&'static str, &'static str)]| {
            pairs
                .iter()
                .map(|&(value, label)| OptionEntry { value, label })
                .collect()
        };

        Self {
            styles: entries(STYLES),
            moods: entries(MOODS),
            providers: Provider::ALL
                .iter()
                .map(|p| OptionEntry {
                    value: p.as_str(),
                    label: p.label(),
                })
                .collect(),
        }
    }
}
