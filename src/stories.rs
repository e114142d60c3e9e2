use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::github::GithubClient;
use crate::images::{self, ImageManifest, PagedImageManifest};
use crate::topics::{self, Topic};

/// Stories live under `kids/{folder}/fa` in the repository.
const STORY_SUBDIR: &str = "fa";

/// A Markdown story as it appears in a topic listing.
#[derive(Debug, Clone, Serialize)]
pub struct StoryListEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
    pub images: ImageManifest,
    pub topic: &'static str,
    #[serde(rename = "topicSlug")]
    pub topic_slug: &'static str,
}

/// A paged JSON story, content included, with per-page prompts removed.
#[derive(Debug, Clone, Serialize)]
pub struct PagedStory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
    pub images: PagedImageManifest,
    pub topic: &'static str,
    #[serde(rename = "topicSlug")]
    pub topic_slug: &'static str,
    pub content: Value,
}

/// A single story's decoded text plus its expected images.
#[derive(Debug, Clone, Serialize)]
pub struct StoryContent {
    pub content: String,
    pub images: ImageManifest,
}

pub fn story_dir(topic: &Topic) -> String {
    format!("kids/{}/{STORY_SUBDIR}", topic.folder)
}

/// List one topic's Markdown stories.
pub async fn list_topic_stories(
    client: &GithubClient,
    slug: &str,
) -> Result<Vec<StoryListEntry>> {
    let topic = topics::find(slug).ok_or_else(|| Error::TopicNotFound(slug.to_owned()))?;
    stories_in(client, topic).await
}

/// List every topic's Markdown stories, in registry order. Topics are
/// fetched one after another; the first failure aborts the whole listing.
pub async fn list_all_stories(client: &GithubClient) -> Result<Vec<StoryListEntry>> {
    let mut all = Vec::new();
    for topic in topics::all() {
        let mut entries = stories_in(client, topic).await?;
        all.append(&mut entries);
    }
    Ok(all)
}

/// List one topic's paged JSON stories, content included.
pub async fn list_topic_paged(client: &GithubClient, slug: &str) -> Result<Vec<PagedStory>> {
    let topic = topics::find(slug).ok_or_else(|| Error::TopicNotFound(slug.to_owned()))?;
    paged_in(client, topic).await
}

/// List every topic's paged JSON stories, in registry order.
pub async fn list_all_paged(client: &GithubClient) -> Result<Vec<PagedStory>> {
    let mut all = Vec::new();
    for topic in topics::all() {
        let mut entries = paged_in(client, topic).await?;
        all.append(&mut entries);
    }
    Ok(all)
}

/// Fetch one story's text and derive its image manifest.
pub async fn fetch_story(
    client: &GithubClient,
    slug: &str,
    story_id: &str,
) -> Result<StoryContent> {
    let topic = topics::find(slug).ok_or_else(|| Error::TopicNotFound(slug.to_owned()))?;
    let file_name = format!("{story_id}.md");
    let path = format!("{}/{file_name}", story_dir(topic));

    let content = match client.fetch_file(&path).await {
        Ok(content) => content,
        Err(Error::PathNotFound(_)) => {
            return Err(Error::StoryNotFound {
                topic: slug.to_owned(),
                story: story_id.to_owned(),
            });
        }
        Err(err) => return Err(err),
    };

    Ok(StoryContent {
        content,
        images: images::single_image_manifest(&file_name),
    })
}

async fn stories_in(client: &GithubClient, topic: &'static Topic) -> Result<Vec<StoryListEntry>> {
    let entries = client.list_dir(&story_dir(topic)).await?;
    Ok(entries
        .into_iter()
        .filter(|entry| entry.name.ends_with(".md"))
        .map(|entry| {
            let images = images::single_image_manifest(&entry.name);
            StoryListEntry {
                name: entry.name,
                kind: entry.kind,
                download_url: entry.download_url,
                images,
                topic: topic.name,
                topic_slug: topic.slug,
            }
        })
        .collect())
}

async fn paged_in(client: &GithubClient, topic: &'static Topic) -> Result<Vec<PagedStory>> {
    let entries = client.list_dir(&story_dir(topic)).await?;
    let mut stories = Vec::new();

    for entry in entries {
        if !entry.name.ends_with(".json") {
            continue;
        }

        let raw = client.fetch_file(&entry.path).await?;
        let mut content: Value = serde_json::from_str(&raw).map_err(|source| {
            Error::MalformedStory {
                path: entry.path.clone(),
                source,
            }
        })?;
        redact_image_prompts(&mut content);

        let images = images::paged_image_manifest(&entry.name);
        stories.push(PagedStory {
            name: entry.name,
            kind: entry.kind,
            download_url: entry.download_url,
            images,
            topic: topic.name,
            topic_slug: topic.slug,
            content,
        });
    }

    Ok(stories)
}

/// The per-page `image_prompt` field is generation-internal and must never
/// reach a response.
fn redact_image_prompts(content: &mut Value) {
    let Some(pages) = content.get_mut("pages").and_then(Value::as_array_mut) else {
        return;
    };
    for page in pages {
        if let Some(object) = page.as_object_mut() {
            object.remove("image_prompt");
        }
    }
}
