use crate::error::ResolverError;
use crate::registry::{ChannelIdentity, ChannelRecord, ChannelRegistry};
use crate::resolver::{PlatformResolver, Resolution, Resolver};
use crate::utils::meta_property_required;
use async_trait::async_trait;
use memchr::memmem;
use reqwest::Client;
use tracing::debug;

const M3U8_MARKER: &[u8] = b".m3u8";
const URL_MARKER: &[u8] = b"https://";

// Reverse-scan window policy: start 100 bytes behind the manifest marker and
// widen in 5-byte steps until the scheme shows up, up to a fixed cap.
const SCAN_INITIAL: usize = 100;
const SCAN_STEP: usize = 5;
const SCAN_MAX: usize = 4096;

/// Resolves YouTube live channels by scanning the raw watch page for the
/// HLS manifest URL embedded in the player configuration.
#[derive(Debug)]
pub struct Youtube {
    base: Resolver,
}

impl Youtube {
    pub fn new(platform_url: String, client: Client) -> Self {
        // Watch URLs carry playlist/tracking parameters after `&`; the page
        // only needs the part up to the first one.
        let url = match platform_url.split_once('&') {
            Some((head, _)) => head.to_string(),
            None => platform_url,
        };
        Self {
            base: Resolver::new("YouTube", url, client),
        }
    }
}

/// Locate the live playback URL inside a raw page body: anchor on the first
/// `.m3u8` occurrence, then scan backward in widening windows for the
/// closest preceding `https://`. Returns `None` when the body has no
/// manifest marker or the scheme is further back than the scan cap.
fn locate_playback_url(body: &str) -> Option<&str> {
    let bytes = body.as_bytes();
    let end = memmem::find(bytes, M3U8_MARKER)? + M3U8_MARKER.len();

    let mut lookback = SCAN_INITIAL;
    loop {
        let window_start = end.saturating_sub(lookback);
        let window = &bytes[window_start..end];
        if let Some(offset) = memmem::find(window, URL_MARKER) {
            // Both boundaries sit on ASCII marker text, so the slice is
            // valid UTF-8 whenever the body is.
            return std::str::from_utf8(&window[offset..]).ok();
        }
        if window_start == 0 || lookback >= SCAN_MAX {
            return None;
        }
        lookback += SCAN_STEP;
    }
}

#[async_trait]
impl PlatformResolver for Youtube {
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

        let Some(playback_url) = locate_playback_url(&body) else {
            debug!(url = %self.base.url, "no live manifest on channel page");
            return Ok(Resolution::Offline);
        };
        let playback_url = playback_url.to_string();

        let title = meta_property_required(&body, "og:title")?;
        let description = meta_property_required(&body, "og:description")?;
        let image_url = meta_property_required(&body, "og:image")?;
        registry.push(ChannelRecord::new(identity, title, description, image_url));

        Ok(Resolution::Live(playback_url))
    }
}
