use crate::error::ResolverError;
use crate::platforms::{Dailymotion, Twitch, Youtube};
use crate::resolver::PlatformResolver;
use reqwest::Client;
use url::Url;

// A type alias for a thread-safe constructor function.
type ResolverConstructor = fn(String, Client) -> Box<dyn PlatformResolver>;

struct PlatformEntry {
    host: &'static str,
    constructor: ResolverConstructor,
}

// Static platform table. Dispatch is by exact host match; the lineup format
// pins the canonical `www.` hosts.
static PLATFORMS: &[PlatformEntry] = &[
    PlatformEntry {
        host: "www.youtube.com",
        constructor: |url, client| Box::new(Youtube::new(url, client)) as Box<dyn PlatformResolver>,
    },
    PlatformEntry {
        host: "www.dailymotion.com",
        constructor: |url, client| {
            Box::new(Dailymotion::new(url, client)) as Box<dyn PlatformResolver>
        },
    },
    PlatformEntry {
        host: "www.twitch.tv",
        constructor: |url, client| Box::new(Twitch::new(url, client)) as Box<dyn PlatformResolver>,
    },
];

/// A factory for creating platform-specific resolvers.
pub struct ResolverFactory {
    client: Client,
}

impl ResolverFactory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn create_resolver(&self, url: &str) -> Result<Box<dyn PlatformResolver>, ResolverError> {
        let parsed = Url::parse(url).map_err(|_| ResolverError::InvalidUrl(url.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ResolverError::InvalidUrl(url.to_string()))?;

        for platform in PLATFORMS {
            if platform.host == host {
                return Ok((platform.constructor)(url.to_string(), self.client.clone()));
            }
        }

        Err(ResolverError::UnsupportedPlatform(host.to_string()))
    }
}
