use crate::error::ResolverError;
use crate::registry::{ChannelIdentity, ChannelRecord, ChannelRegistry};
use crate::resolver::{PlatformResolver, Resolution, Resolver};
use crate::utils::meta_property_required;
use async_trait::async_trait;
use m3u8_rs::Playlist;
use reqwest::Client;
use tracing::debug;
use url::Url;

const METADATA_BASE: &str = "https://www.dailymotion.com/player/metadata/video";

/// Resolves Dailymotion live channels through the player metadata endpoint
/// and picks the highest-bandwidth variant of the auto-quality manifest.
#[derive(Debug)]
pub struct Dailymotion {
    base: Resolver,
    /// Metadata endpoint prefix, overridable so tests can point it at a
    /// local server.
    pub metadata_base: String,
}

impl Dailymotion {
    pub fn new(platform_url: String, client: Client) -> Self {
        Self {
            base: Resolver::new("Dailymotion", platform_url, client),
            metadata_base: METADATA_BASE.to_string(),
        }
    }

    /// The video id sits at a fixed position on channel URLs:
    /// `https://www.dailymotion.com/video/{id}`.
    fn video_id(&self) -> Result<String, ResolverError> {
        let url =
            Url::parse(&self.base.url).map_err(|_| ResolverError::InvalidUrl(self.base.url.clone()))?;
        url.path_segments()
            .and_then(|mut segments| segments.nth(1))
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ResolverError::InvalidUrl(self.base.url.clone()))
    }
}

/// Pick the highest-bandwidth variant of a master playlist and strip any
/// trailing `#` fragment from its URI.
fn select_best_variant(manifest: &[u8]) -> Result<String, ResolverError> {
    let playlist = m3u8_rs::parse_playlist_res(manifest)
        .map_err(|e| ResolverError::Manifest(e.to_string()))?;

    let master = match playlist {
        Playlist::MasterPlaylist(master) => master,
        Playlist::MediaPlaylist(_) => {
            return Err(ResolverError::Manifest(
                "expected a master playlist".to_string(),
            ));
        }
    };

    let best = master
        .variants
        .into_iter()
        .max_by_key(|variant| variant.bandwidth)
        .ok_or_else(|| ResolverError::Manifest("no variants listed".to_string()))?;

    let uri = best.uri.split('#').next().unwrap_or_default();
    Ok(uri.to_string())
}

#[async_trait]
impl PlatformResolver for Dailymotion {
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

        // Page titles read "Channel - watch live"; only the part before the
        // separator names the channel.
        let title = meta_property_required(&body, "og:title")?;
        let title = title.split('-').next().unwrap_or_default().trim().to_string();
        let description = meta_property_required(&body, "og:description")?;
        let image_url = meta_property_required(&body, "og:image")?;
        registry.push(ChannelRecord::new(identity, title, description, image_url));

        let video_id = self.video_id()?;
        let metadata_url = format!("{}/{}", self.metadata_base, video_id);
        let metadata: serde_json::Value =
            self.base.get(&metadata_url).send().await?.json().await?;
        let manifest_url = metadata["qualities"]["auto"][0]["url"]
            .as_str()
            .ok_or(ResolverError::MissingField("qualities.auto[0].url"))?;

        let manifest = self.base.get(manifest_url).send().await?.bytes().await?;
        let best = select_best_variant(&manifest)?;
        debug!(url = %self.base.url, stream = %best, "selected best variant");

        Ok(Resolution::Live(best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MASTER_MANIFEST: &str = concat!(
        "#EXTM3U\n",
        "#EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=500,RESOLUTION=426x240\n",
        "https://dm.example/a.m3u8#cell=core\n",
        "#EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=1200,RESOLUTION=1280x720\n",
        "https://dm.example/b.m3u8#cell=core\n",
        "#EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=900,RESOLUTION=854x480\n",
        "https://dm.example/c.m3u8#cell=core\n",
    );

    fn client() -> Client {
        crate::default_client(Duration::from_secs(5))
    }

    fn identity() -> ChannelIdentity {
        ChannelIdentity {
            name: "Sports One".to_string(),
            id: "sports1.example".to_string(),
            category: "Sports".to_string(),
        }
    }

    const CHANNEL_PAGE: &str = concat!(
        r#"<html><head>"#,
        r#"<meta property="og:title" content="Sports One - live 24/7">"#,
        r#"<meta property="og:description" content="All sports, all day">"#,
        r#"<meta property="og:image" content="https://img.example/sports.jpg">"#,
        r#"</head></html>"#,
    );

    #[test]
    fn best_variant_is_max_bandwidth() {
        let best = select_best_variant(MASTER_MANIFEST.as_bytes()).unwrap();
        assert_eq!(best, "https://dm.example/b.m3u8");
    }

    #[test]
    fn media_playlist_is_rejected() {
        let manifest = "#EXTM3U\n#EXT-X-TARGETDURATION:6\n#EXTINF:6.0,\nseg0.ts\n";
        let err = select_best_variant(manifest.as_bytes()).unwrap_err();
        assert!(matches!(err, ResolverError::Manifest(_)));
    }

    #[test]
    fn video_id_is_the_second_path_segment() {
        let resolver = Dailymotion::new(
            "https://www.dailymotion.com/video/x8abcd".to_string(),
            client(),
        );
        assert_eq!(resolver.video_id().unwrap(), "x8abcd");
    }

    #[tokio::test]
    async fn offline_page_degrades_without_a_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resolver = Dailymotion::new(format!("{}/video/x8abcd", server.uri()), client());
        let mut registry = ChannelRegistry::new();
        let resolution = resolver.resolve(&identity(), &mut registry).await.unwrap();

        assert_eq!(resolution, Resolution::Offline);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn resolves_best_quality_stream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/video/x8abcd"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHANNEL_PAGE))
            .mount(&server)
            .await;
        let metadata = serde_json::json!({
            "qualities": {
                "auto": [{
                    "type": "application/x-mpegURL",
                    "url": format!("{}/manifest/auto.m3u8", server.uri()),
                }],
            },
        });
        Mock::given(method("GET"))
            .and(path("/metadata/x8abcd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&metadata))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/manifest/auto.m3u8"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MASTER_MANIFEST))
            .mount(&server)
            .await;

        let mut resolver = Dailymotion::new(format!("{}/video/x8abcd", server.uri()), client());
        resolver.metadata_base = format!("{}/metadata", server.uri());
        let mut registry = ChannelRegistry::new();
        let resolution = resolver.resolve(&identity(), &mut registry).await.unwrap();

        assert_eq!(
            resolution,
            Resolution::Live("https://dm.example/b.m3u8".to_string())
        );
        let records = registry.records();
        assert_eq!(records.len(), 1);
        // Title is cut at the separator and trimmed.
        assert_eq!(records[0].title, "Sports One");
        assert_eq!(records[0].description, "All sports, all day");
    }

    #[tokio::test]
    async fn missing_manifest_field_is_a_hard_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/video/x8abcd"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHANNEL_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/metadata/x8abcd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "qualities": {},
            })))
            .mount(&server)
            .await;

        let mut resolver = Dailymotion::new(format!("{}/video/x8abcd", server.uri()), client());
        resolver.metadata_base = format!("{}/metadata", server.uri());
        let mut registry = ChannelRegistry::new();
        let err = resolver.resolve(&identity(), &mut registry).await.unwrap_err();

        assert!(matches!(
            err,
            ResolverError::MissingField("qualities.auto[0].url")
        ));
    }
}
