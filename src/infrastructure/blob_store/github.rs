use super::{BlobStore, BlobStoreFactory, StoredBlob};
use crate::domain::error::{AppError, Result};
use crate::domain::store_config::StoreConfig;
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    size: u64,
}

impl ContentsResponse {
    /// Files over 1 MB come back with `encoding: "none"` and no content. Reading
    /// those as empty would rewrite the file from scratch.
    fn into_blob(self) -> Result<StoredBlob> {
        if let Some(encoding) = self.encoding.as_deref() {
            if encoding != "base64" {
                return Err(AppError::UpstreamError(format!(
                    "GitHub GET returned unsupported encoding: {}",
                    encoding
                )));
            }
        }

        let encoded = self.content.unwrap_or_default();
        if encoded.trim().is_empty() && self.size > 0 {
            return Err(AppError::UpstreamError(format!(
                "GitHub GET returned no content for a {} byte file",
                self.size
            )));
        }

        Ok(StoredBlob::Present {
            version: self.sha,
            content: decode_content(&encoded)?,
        })
    }
}

#[derive(Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// GitHub Contents API client bound to one repository and branch.
pub struct GitHubContentsClient {
    client: reqwest::Client,
    api_base_url: String,
    user_agent: String,
    config: StoreConfig,
}

impl GitHubContentsClient {
    pub fn new(
        client: reqwest::Client,
        api_base_url: &str,
        user_agent: &str,
        config: StoreConfig,
    ) -> Self {
        Self {
            client,
            api_base_url: api_base_url.to_string(),
            user_agent: user_agent.to_string(),
            config,
        }
    }

    /// `{base}/repos/{owner}/{repo}/contents/{path}` with every segment percent-encoded.
    fn contents_url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            AppError::ConfigurationError(format!("Invalid GitHub API base URL: {}", e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::ConfigurationError(format!(
                    "Invalid GitHub API base URL: {}",
                    self.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "repos",
                self.config.owner.as_str(),
                self.config.repo.as_str(),
                "contents",
            ])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(AUTHORIZATION, format!("token {}", self.config.token))
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, GITHUB_ACCEPT)
    }
}

#[async_trait]
impl BlobStore for GitHubContentsClient {
    async fn fetch(&self, path: &str) -> Result<StoredBlob> {
        let mut url = self.contents_url(path)?;
        url.query_pairs_mut().append_pair("ref", &self.config.branch);

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("GitHub GET failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(StoredBlob::Missing);
        }
        if !status.is_success() {
            return Err(AppError::UpstreamError(format!(
                "GitHub GET failed: {}",
                status.as_u16()
            )));
        }

        let body: ContentsResponse = response.json().await.map_err(|e| {
            AppError::UpstreamError(format!("GitHub GET returned invalid JSON: {}", e))
        })?;

        body.into_blob()
    }

    async fn store(
        &self,
        path: &str,
        content: &str,
        version: Option<&str>,
        message: &str,
    ) -> Result<()> {
        let url = self.contents_url(path)?;
        let body = PutContentsRequest {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content.as_bytes()),
            branch: &self.config.branch,
            sha: version,
        };

        let response = self
            .authorize(self.client.put(url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("GitHub PUT failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError(format!(
                "GitHub PUT failed: {} {}",
                status.as_u16(),
                text
            )));
        }

        Ok(())
    }
}

/// GitHub wraps base64 content at 60 columns; whitespace is dropped before decoding.
fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| {
            AppError::UpstreamError(format!("GitHub GET returned invalid content: {}", e))
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Shares one connection pool across requests.
pub struct GitHubStoreFactory {
    client: reqwest::Client,
    api_base_url: String,
    user_agent: String,
}

impl GitHubStoreFactory {
    pub fn new(client: reqwest::Client, api_base_url: &str, user_agent: &str) -> Self {
        Self {
            client,
            api_base_url: api_base_url.to_string(),
            user_agent: user_agent.to_string(),
        }
    }
}

impl BlobStoreFactory for GitHubStoreFactory {
    fn connect(&self, config: &StoreConfig) -> Box<dyn BlobStore> {
        Box::new(GitHubContentsClient::new(
            self.client.clone(),
            &self.api_base_url,
            &self.user_agent,
            config.clone(),
        ))
    }
}
