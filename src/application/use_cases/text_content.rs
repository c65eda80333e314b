use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::CACHE_CONTROL;
use tracing::debug;

static BLANK_LINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").unwrap());

/// Splits plain text into paragraphs.
///
/// Blank lines separate paragraphs; text without any blank line is split on
/// single line breaks instead. Blocks are trimmed and empty ones dropped.
pub fn to_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let cleaned = normalized.trim();
    if cleaned.is_empty() {
        return Vec::new();
    }

    let blocks: Vec<&str> = if cleaned.contains("\n\n") {
        BLANK_LINES_PATTERN.split(cleaned).collect()
    } else {
        cleaned.split('\n').collect()
    };

    blocks
        .into_iter()
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetches optional plain-text content for the static pages.
pub struct TextAssetLoader {
    client: reqwest::Client,
}

impl TextAssetLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Paragraphs of the text file at `url`, or nothing when it cannot be loaded.
    pub async fn load_paragraphs(&self, url: &str) -> Vec<String> {
        let response = match self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("Skipping text asset {}: {}", url, e);
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            debug!("Skipping text asset {}: HTTP {}", url, response.status());
            return Vec::new();
        }

        match response.text().await {
            Ok(text) => to_paragraphs(&text),
            Err(e) => {
                debug!("Skipping text asset {}: {}", url, e);
                Vec::new()
            }
        }
    }
}
