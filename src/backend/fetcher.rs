use super::config::Config;
use super::error::FetchError;
use super::types::Post;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;

#[async_trait]
pub trait Fetch: Send + Sync {
    /// Returns the latest posts found at a profile's listing endpoint.
    async fn fetch(&self, listing_url: &str) -> Result<Vec<Post>, FetchError>;
}

pub struct RedditFetcher {
    client: reqwest::Client,
    base_url: String,
    max_posts: usize,
}

impl RedditFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_posts: config.max_posts,
        })
    }
}

#[async_trait]
impl Fetch for RedditFetcher {
    async fn fetch(&self, listing_url: &str) -> Result<Vec<Post>, FetchError> {
        let response = self.client.get(listing_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let html = response.text().await?;
        let posts = extract_posts(&html, &self.base_url, self.max_posts);
        log::debug!("fetched {} posts from {listing_url}", posts.len());
        Ok(posts)
    }
}

/// Extracts up to `limit` posts from a rendered profile listing, in page order.
///
/// Each post is an `a[slot="full-post-link"]` anchor; its title lives in a
/// nested `faceplate-screen-reader-content` element. Anchors without a title
/// or an href are skipped.
pub fn extract_posts(html: &str, base_url: &str, limit: usize) -> Vec<Post> {
    let document = Html::parse_document(html);
    let link_selector =
        Selector::parse(r#"a[slot="full-post-link"]"#).expect("invalid link selector");
    let title_selector =
        Selector::parse("faceplate-screen-reader-content").expect("invalid title selector");

    document
        .select(&link_selector)
        .filter_map(|link| {
            let title = link
                .select(&title_selector)
                .next()
                .map(|el| el.text().collect::<String>())?;
            let title = title.trim();
            if title.is_empty() {
                return None;
            }
            let href = link.value().attr("href")?;
            let url = if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{base_url}{href}")
            };
            Some(Post::new(title, url))
        })
        .take(limit)
        .collect()
}
