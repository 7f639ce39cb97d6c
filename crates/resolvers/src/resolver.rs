use crate::default::DEFAULT_UA;
use crate::error::ResolverError;
use crate::registry::{ChannelIdentity, ChannelRegistry};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};

/// Fixed placeholder substituted whenever resolution cannot produce a live
/// playback URL.
pub const FALLBACK_URL: &str =
    "https://github.com/ExperiencersInternational/tvsetup/raw/main/staticch/no_stream_2.mp4";

/// Outcome of a single resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A live playback URL was extracted from the platform.
    Live(String),
    /// The channel is not currently live, or the upstream rejected the
    /// request; callers substitute [`FALLBACK_URL`].
    Offline,
}

/// Base resolver shared by all platform variants: the channel URL, the
/// shared HTTP client and a set of browser-like default headers.
#[derive(Debug, Clone)]
pub struct Resolver {
    pub url: String,
    pub platform_name: String,
    pub client: Client,
    headers: HeaderMap,
}

impl Resolver {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        url: S2,
        client: Client,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        Self {
            platform_name: platform_name.into(),
            url: url.into(),
            client,
            headers,
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url).headers(self.headers.clone())
    }
}

/// One resolution attempt per configured channel URL.
///
/// Implementations append at most one record to the registry per call and
/// never fail for a plain "stream offline" condition; that degrades to
/// [`Resolution::Offline`]. Structural mismatches in the upstream response
/// (a missing metadata tag, an unexpected manifest shape) are hard errors
/// that abort the run.
#[async_trait]
pub trait PlatformResolver: Send + Sync + std::fmt::Debug {
    fn resolver(&self) -> &Resolver;

    fn platform_name(&self) -> &str {
        &self.resolver().platform_name
    }

    async fn resolve(
        &self,
        identity: &ChannelIdentity,
        registry: &mut ChannelRegistry,
    ) -> Result<Resolution, ResolverError>;
}
