use std::time::Duration;

use base64::Engine as _;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ACCEPT_VALUE: &str = "application/vnd.github+json";
const USER_AGENT_VALUE: &str = "storyshelf/0.1";

/// One entry of a repository directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
}

/// One hit of a repository code search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub path: String,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
struct ContentsFile {
    content: String,
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchHit>,
}

/// Read-only client for the GitHub REST API, bound to a single repository
/// and ref. Requests are sent with an optional bearer token; there is no
/// retry policy, a single failure propagates to the caller.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    owner: String,
    repo: String,
    reference: String,
}

impl GithubClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            reference: reference.to_owned(),
        })
    }

    /// List the entries of a directory inside the repository.
    pub async fn list_dir(&self, path: &str) -> Result<Vec<RepoEntry>> {
        let response = self.get_contents(path).await?;
        Ok(response.json().await?)
    }

    /// Fetch a single file and decode it to text. The contents endpoint
    /// delivers the payload base64-encoded with embedded line breaks; the
    /// whole payload is decoded to bytes first and only then interpreted as
    /// UTF-8, so multi-byte text survives the transport encoding.
    pub async fn fetch_file(&self, path: &str) -> Result<String> {
        let response = self.get_contents(path).await?;
        let file: ContentsFile = response.json().await?;
        if file.encoding != "base64" {
            return Err(Error::UnexpectedEncoding {
                path: path.to_owned(),
                encoding: file.encoding,
            });
        }
        decode_base64_text(&file.content)
    }

    /// Full-text code search over the repository's Markdown files. The
    /// keyword is passed through to the search grammar unmodified.
    pub async fn search_code(&self, keyword: &str, per_page: u32) -> Result<Vec<SearchHit>> {
        let query = format!("{keyword} repo:{}/{} extension:md", self.owner, self.repo);
        let per_page = per_page.to_string();
        let url = format!("{}/search/code", self.base_url);

        let response = self
            .get(&url, &[("q", query.as_str()), ("per_page", per_page.as_str())])
            .await?;
        let response = Self::error_for_status(response).await?;
        let results: SearchResponse = response.json().await?;
        Ok(results.items)
    }

    async fn get_contents(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!(
            "{}/repos/{}/{}/contents/{path}",
            self.base_url, self.owner, self.repo
        );
        let response = self.get(&url, &[("ref", self.reference.as_str())]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::PathNotFound(path.to_owned()));
        }
        Self::error_for_status(response).await
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<reqwest::Response> {
        let mut request = self
            .http
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, ACCEPT_VALUE)
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await?;
        let message = parse_error_message(&raw).unwrap_or(raw);
        Err(Error::Github {
            status: status.as_u16(),
            message,
        })
    }
}

/// GitHub error bodies carry a top-level `message` field.
fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    Some(value.get("message")?.as_str()?.to_owned())
}

fn decode_base64_text(payload: &str) -> Result<String> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(compact.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}
