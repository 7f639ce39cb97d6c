//! M3U playlist line formatting for the primary output stream.

use crate::lineup::ChannelMeta;

/// Published location of the guide document, advertised in the playlist
/// header so players can pair the two artifacts.
pub const EPG_URL: &str = "https://raw.githubusercontent.com/MIFNtechnology/GetM3u8/main/epg.xml";

pub fn header_line() -> String {
    format!("#EXTM3U tvg-url=\"{EPG_URL}\"")
}

pub fn extinf_line(meta: &ChannelMeta) -> String {
    format!(
        "#EXTINF:-1 tvg-id=\"{}\" tvg-name=\"{}\" group-title=\"{}\" tvg-logo=\"{}\", {}",
        meta.identity.id, meta.identity.name, meta.identity.category, meta.logo, meta.identity.name
    )
}
