use async_trait::async_trait;
use nd_core::{Error, FeedConfig, FeedSource, RawEntry, Result};
use reqwest::Client;
use url::Url;

/// Keyword search against a Google News style `/rss/search` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleNewsSource {
    client: Client,
    config: FeedConfig,
}

impl GoogleNewsSource {
    pub fn new(config: FeedConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn search_url(&self, keyword: &str) -> Result<Url> {
        build_search_url(&self.config, keyword)
    }
}

/// `<base>/rss/search?q=<keyword>&hl=<lang>&gl=<region>&ceid=<region>:<lang>`
pub fn build_search_url(config: &FeedConfig, keyword: &str) -> Result<Url> {
    let endpoint = format!("{}/rss/search", config.search_base.trim_end_matches('/'));
    let ceid = config.ceid();
    Url::parse_with_params(
        &endpoint,
        &[
            ("q", keyword),
            ("hl", config.language.as_str()),
            ("gl", config.region.as_str()),
            ("ceid", ceid.as_str()),
        ],
    )
    .map_err(|e| Error::InvalidUrl(format!("{}: {}", endpoint, e)))
}

/// Parses an RSS 2.0 document into raw entries, keeping feed order.
pub fn parse_channel(keyword: &str, body: &[u8]) -> Result<Vec<RawEntry>> {
    let channel = rss::Channel::read_from(body).map_err(|e| Error::MalformedFeed {
        keyword: keyword.to_string(),
        reason: e.to_string(),
    })?;

    Ok(channel.items().iter().map(raw_entry).collect())
}

fn raw_entry(item: &rss::Item) -> RawEntry {
    RawEntry {
        title: item.title().map(str::to_string),
        link: item.link().map(str::to_string),
        published: item.pub_date().map(str::to_string),
        source: item.source().and_then(|s| s.title()).map(str::to_string),
        description: item.description().map(str::to_string),
    }
}

#[async_trait]
impl FeedSource for GoogleNewsSource {
    fn name(&self) -> &str {
        "Google News"
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<RawEntry>> {
        let url = self.search_url(keyword)?;
        tracing::debug!("🌐 GET {}", url);

        let unavailable = |reason: String| Error::SourceUnavailable {
            keyword: keyword.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("search returned HTTP {}", status)));
        }

        let body = response.bytes().await.map_err(|e| unavailable(e.to_string()))?;
        parse_channel(keyword, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>"호텔 매각" - Google 뉴스</title>
    <link>https://news.google.com/search?q=%ED%98%B8%ED%85%94</link>
    <description>Google 뉴스</description>
    <item>
      <title>샌즈 호텔 매각 추진 - 매일경제</title>
      <link>https://news.google.com/rss/articles/CBMiA1</link>
      <guid isPermaLink="false">CBMiA1</guid>
      <pubDate>Mon, 05 Feb 2024 00:00:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/rss/articles/CBMiA1"&gt;샌즈 호텔 매각 추진&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;매일경제&lt;/font&gt;</description>
      <source url="https://www.mk.co.kr">매일경제</source>
    </item>
    <item>
      <title>리조트 분양 시작</title>
      <link>https://example.com/2</link>
    </item>
  </channel>
</rss>"##;

    #[test]
    fn test_build_search_url_encodes_keyword() {
        let url = build_search_url(&FeedConfig::default(), "호텔 리모델링 & 매각").unwrap();
        assert_eq!(url.host_str(), Some("news.google.com"));
        assert_eq!(url.path(), "/rss/search");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("q".to_string(), "호텔 리모델링 & 매각".to_string()));
        assert_eq!(pairs[1], ("hl".to_string(), "ko".to_string()));
        assert_eq!(pairs[2], ("gl".to_string(), "KR".to_string()));
        assert_eq!(pairs[3], ("ceid".to_string(), "KR:ko".to_string()));
        assert!(url.as_str().is_ascii());
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_build_search_url_respects_base() {
        let config = FeedConfig::new().with_search_base("http://localhost:8080/");
        let url = build_search_url(&config, "x").unwrap();
        assert!(url.as_str().starts_with("http://localhost:8080/rss/search?q=x"));
    }

    #[test]
    fn test_parse_channel() {
        let entries = parse_channel("호텔 매각", FEED.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.title.as_deref(), Some("샌즈 호텔 매각 추진 - 매일경제"));
        assert_eq!(first.link.as_deref(), Some("https://news.google.com/rss/articles/CBMiA1"));
        assert_eq!(first.published.as_deref(), Some("Mon, 05 Feb 2024 00:00:00 GMT"));
        assert_eq!(first.source.as_deref(), Some("매일경제"));
        assert!(first.description.as_deref().unwrap().contains("<a href"));

        let second = &entries[1];
        assert_eq!(second.title.as_deref(), Some("리조트 분양 시작"));
        assert!(second.published.is_none());
        assert!(second.source.is_none());
        assert!(second.description.is_none());
    }

    #[test]
    fn test_parse_channel_rejects_garbage() {
        let err = parse_channel("kw", b"<html><body>blocked</body></html>").unwrap_err();
        assert!(matches!(err, Error::MalformedFeed { ref keyword, .. } if keyword == "kw"));
    }

    #[tokio::test]
    async fn test_unreachable_source_reports_keyword() {
        let config = FeedConfig::new().with_search_base("http://127.0.0.1:9");
        let source = GoogleNewsSource::new(config).unwrap();
        let err = source.fetch("호텔").await.unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { ref keyword, .. } if keyword == "호텔"));
    }
}
