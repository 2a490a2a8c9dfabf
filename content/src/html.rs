//! HTML escaping and URL allow-listing.
//!
//! Every string that reaches a [`crate::NormalizedDocument`] passes through
//! [`escape`], either as text content or as an attribute value. Link and media
//! targets additionally pass through [`safe_href`] / [`safe_media_url`].

use std::borrow::Cow;

use url::Url;

/// Escape `& < > " '` for use in text content or a double-quoted attribute.
///
/// Returns `Cow::Borrowed` when nothing needs escaping.
#[must_use]
pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Escape text and turn newlines into `<br>`.
#[must_use]
pub fn escape_multiline(input: &str) -> String {
    let escaped = escape(input);
    if escaped.contains('\n') {
        escaped.replace("\r\n", "\n").replace('\n', "<br>")
    } else {
        escaped.into_owned()
    }
}

/// Link target if it is safe to emit as an anchor `href`.
///
/// Accepts absolute `http`, `https`, `mailto` and `tel` URLs, site-relative
/// paths (`/blog/x`) and fragments (`#top`). Everything else is rejected.
#[must_use]
pub fn safe_href(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('#') {
        return Some(trimmed);
    }
    if let Some(path) = trimmed.strip_prefix('/') {
        return is_site_relative(path).then_some(trimmed);
    }
    let parsed = Url::parse(trimmed).ok()?;
    matches!(parsed.scheme(), "http" | "https" | "mailto" | "tel").then_some(trimmed)
}

/// Browsers drop tabs and newlines from URLs and read `\` as `/`, so
/// `/\host` and `/\t/host` both resolve to a protocol-relative `//host`.
fn is_site_relative(path: &str) -> bool {
    !path.starts_with(['/', '\\']) && !path.chars().any(|c| c.is_ascii_control())
}

/// Image or bookmark target if it is an absolute `http`/`https` URL.
#[must_use]
pub fn safe_media_url(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).ok()?;
    let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
    (matches!(parsed.scheme(), "http" | "https") && has_host).then_some(trimmed)
}

/// Restrict a code language label to characters safe inside a class name.
#[must_use]
pub fn language_class(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | '0'..='9' | '+' | '#' | '-' | '_' => Some(c),
            ' ' => Some('-'),
            _ => None,
        })
        .collect();
    if cleaned.is_empty() || cleaned == "plain-text" {
        "plaintext".to_string()
    } else {
        cleaned
    }
}
