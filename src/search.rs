use serde::Serialize;
use url::Url;

use crate::error::Result;
use crate::github::GithubClient;

const SEARCH_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub path: String,
    pub download_url: String,
}

/// Search the repository's Markdown stories for a keyword and point each hit
/// at its raw-content URL.
pub async fn search_stories(client: &GithubClient, keyword: &str) -> Result<Vec<SearchResult>> {
    let hits = client.search_code(keyword, SEARCH_PAGE_SIZE).await?;
    Ok(hits
        .into_iter()
        .map(|hit| SearchResult {
            download_url: raw_download_url(&hit.html_url),
            name: hit.name,
            path: hit.path,
        })
        .collect())
}

/// Search hits carry web-view URLs (`…/blob/{ref}/{path}`); the raw file
/// lives at the same path with `raw` in place of the first `blob` segment.
/// URLs that do not parse or have no `blob` segment pass through unchanged.
fn raw_download_url(html_url: &str) -> String {
    let Ok(mut url) = Url::parse(html_url) else {
        return html_url.to_owned();
    };
    let Some(segments) = url.path_segments() else {
        return html_url.to_owned();
    };

    let mut segments: Vec<String> = segments.map(str::to_owned).collect();
    let Some(blob) = segments.iter_mut().find(|segment| segment.as_str() == "blob") else {
        return html_url.to_owned();
    };
    *blob = "raw".to_owned();

    url.set_path(&segments.join("/"));
    url.to_string()
}
