use std::sync::LazyLock;

use regex::Regex;

use crate::error::ResolverError;

static META_PROPERTY_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\b[^>]*\bproperty=["']([^"']+)["'][^>]*\bcontent=["']([^"']*)["']"#).unwrap()
});
static META_CONTENT_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\b[^>]*\bcontent=["']([^"']*)["'][^>]*\bproperty=["']([^"']+)["']"#).unwrap()
});

/// Look up an OpenGraph `<meta>` tag by property name, tolerating either
/// attribute order.
pub(crate) fn meta_property(body: &str, property: &str) -> Option<String> {
    for caps in META_PROPERTY_CONTENT.captures_iter(body) {
        if &caps[1] == property {
            return Some(decode_entities(&caps[2]));
        }
    }
    for caps in META_CONTENT_PROPERTY.captures_iter(body) {
        if &caps[2] == property {
            return Some(decode_entities(&caps[1]));
        }
    }
    None
}

/// Required-tag variant: absence is a structural defect of the page, not an
/// offline condition.
pub(crate) fn meta_property_required(
    body: &str,
    property: &'static str,
) -> Result<String, ResolverError> {
    meta_property(body, property).ok_or(ResolverError::MissingMetadata(property))
}

/// Minimal entity decoding for attribute values; page titles routinely carry
/// `&amp;` and `&#39;`. `&amp;` must go last so it cannot re-trigger the
/// other replacements.
fn decode_entities(input: &str) -> String {
    input
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
