use crate::error::ResolverError;
use crate::registry::{ChannelIdentity, ChannelRecord, ChannelRegistry};
use crate::resolver::{PlatformResolver, Resolution, Resolver};
use crate::utils::meta_property_required;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const PROXY_BASE: &str = "https://pwn.sh/tools/streamapi.py";

/// Resolves Twitch live channels through a third-party resolution proxy
/// that returns one playback URL per resolution label.
#[derive(Debug)]
pub struct Twitch {
    base: Resolver,
    /// Resolution proxy endpoint, overridable so tests can point it at a
    /// local server.
    pub proxy_base: String,
}

impl Twitch {
    pub fn new(platform_url: String, client: Client) -> Self {
        Self {
            base: Resolver::new("Twitch", platform_url, client),
            proxy_base: PROXY_BASE.to_string(),
        }
    }
}

/// Numeric rank of a resolution label: the leading digits, so `1080p60`
/// outranks `720p`. Labels without a numeric prefix (`audio_only`) rank
/// lowest.
fn resolution_rank(label: &str) -> u32 {
    let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

fn best_resolution_url(urls: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    urls.iter()
        .filter_map(|(label, value)| value.as_str().map(|url| (resolution_rank(label), url)))
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, url)| url.to_string())
}

#[async_trait]
impl PlatformResolver for Twitch {
    fn resolver(&self) -> &Resolver {
        &self.base
    }

    async fn resolve(
        &self,
        identity: &ChannelIdentity,
        registry: &mut ChannelRegistry,
    ) -> Result<Resolution, ResolverError> {
        let response = self.base.get(&self.base.url).send().await?;
        if !response.status().is_success() {
            debug!(status = %response.status(), url = %self.base.url, "channel page fetch failed");
            return Ok(Resolution::Offline);
        }
        let body = response.text().await?;

        let title = meta_property_required(&body, "og:title")?;
        let title = title.split('-').next().unwrap_or_default().trim().to_string();
        let description = meta_property_required(&body, "og:description")?;
        let image_url = meta_property_required(&body, "og:image")?;
        // The record is kept even when the proxy rejects the channel below;
        // the guide still lists a rejected-but-known channel.
        registry.push(ChannelRecord::new(identity, title, description, image_url));

        // One proxy query answers both "is it live" and the per-resolution
        // URL map. The success flag is a textual sentinel, not a boolean.
        let proxy: serde_json::Value = self
            .base
            .get(&self.proxy_base)
            .query(&[("url", self.base.url.as_str())])
            .send()
            .await?
            .json()
            .await?;

        if proxy["success"].as_str() == Some("false") {
            debug!(url = %self.base.url, "resolution proxy rejected the channel");
            return Ok(Resolution::Offline);
        }

        let urls = proxy["urls"]
            .as_object()
            .ok_or(ResolverError::MissingField("urls"))?;
        let best = best_resolution_url(urls).ok_or(ResolverError::MissingField("urls"))?;
        debug!(url = %self.base.url, stream = %best, "selected max resolution");

        Ok(Resolution::Live(best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client {
        crate::default_client(Duration::from_secs(5))
    }

    fn identity() -> ChannelIdentity {
        ChannelIdentity {
            name: "Streamer".to_string(),
            id: "streamer.example".to_string(),
            category: "Gaming".to_string(),
        }
    }

    const CHANNEL_PAGE: &str = concat!(
        r#"<html><head>"#,
        r#"<meta property="og:title" content="Streamer - Twitch">"#,
        r#"<meta property="og:description" content="Playing something">"#,
        r#"<meta property="og:image" content="https://img.example/streamer.jpg">"#,
        r#"</head></html>"#,
    );

    #[test]
    fn labels_rank_by_leading_digits() {
        assert_eq!(resolution_rank("1080p60"), 1080);
        assert_eq!(resolution_rank("720p"), 720);
        assert_eq!(resolution_rank("160p"), 160);
        assert_eq!(resolution_rank("audio_only"), 0);
    }

    #[test]
    fn best_url_is_the_highest_ranked_label() {
        let urls = serde_json::json!({
            "audio_only": "https://t.example/audio",
            "160p": "https://t.example/160",
            "1080p60": "https://t.example/1080",
            "720p60": "https://t.example/720",
        });
        let urls = urls.as_object().unwrap();
        assert_eq!(
            best_resolution_url(urls),
            Some("https://t.example/1080".to_string())
        );
    }

    #[tokio::test]
    async fn offline_page_degrades_without_a_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resolver = Twitch::new(format!("{}/streamer", server.uri()), client());
        let mut registry = ChannelRegistry::new();
        let resolution = resolver.resolve(&identity(), &mut registry).await.unwrap();

        assert_eq!(resolution, Resolution::Offline);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn rejected_channel_degrades_but_keeps_its_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/streamer"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHANNEL_PAGE))
            .mount(&server)
            .await;
        // Exactly one proxy query; the success flag and the URL map come
        // from the same response.
        Mock::given(method("GET"))
            .and(path("/proxy"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": "false"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut resolver = Twitch::new(format!("{}/streamer", server.uri()), client());
        resolver.proxy_base = format!("{}/proxy", server.uri());
        let mut registry = ChannelRegistry::new();
        let resolution = resolver.resolve(&identity(), &mut registry).await.unwrap();

        assert_eq!(resolution, Resolution::Offline);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.records()[0].title, "Streamer");
    }

    #[tokio::test]
    async fn live_channel_yields_max_resolution_stream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/streamer"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHANNEL_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/proxy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": "true",
                "urls": {
                    "160p": "https://t.example/160",
                    "720p60": "https://t.example/720",
                    "1080p60": "https://t.example/1080",
                    "audio_only": "https://t.example/audio",
                },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut resolver = Twitch::new(format!("{}/streamer", server.uri()), client());
        resolver.proxy_base = format!("{}/proxy", server.uri());
        let mut registry = ChannelRegistry::new();
        let resolution = resolver.resolve(&identity(), &mut registry).await.unwrap();

        assert_eq!(
            resolution,
            Resolution::Live("https://t.example/1080".to_string())
        );
        assert_eq!(registry.len(), 1);
    }
}
