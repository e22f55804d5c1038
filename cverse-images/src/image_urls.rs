//! Image URL checks and sizing
//!
//! Used by the manual selection endpoints: a chosen URL must answer a HEAD
//! request with an `image/*` content type, and provider URLs are rewritten
//! to the width the caller asks for.

use serde::Serialize;
use tracing::debug;

/// Result of a HEAD request against an image URL
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageCheck {
    /// Request completed with a 2xx status
    pub ok: bool,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

impl ImageCheck {
    pub fn is_image(&self) -> bool {
        self.ok
            && self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// HEAD `url`; network failures yield a default (not ok) check
pub async fn check_image(http_client: &reqwest::Client, url: &str) -> ImageCheck {
    let response = match http_client.head(url).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(url = %url, error = %e, "Image check failed");
            return ImageCheck::default();
        }
    };

    let headers = response.headers();
    let content_type = headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let content_length = headers
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    ImageCheck {
        ok: response.status().is_success(),
        content_type,
        content_length,
    }
}

/// True iff `url` answers HEAD with 2xx and an `image/*` content type
pub async fn validate_image_url(http_client: &reqwest::Client, url: &str) -> bool {
    check_image(http_client, url).await.is_image()
}

/// Rewrite a provider URL for the requested width; unknown hosts are unchanged
pub fn sized_image_url(url: &str, width: u32) -> String {
    if url.contains("ui-avatars.com") {
        replace_number_after(url, "size=", width)
    } else if url.contains("dicebear.com") {
        format!("{}&size={}", url, width)
    } else if url.contains("tmdb.org") {
        replace_number_after(url, "/w", width)
    } else if url.contains("wikimedia.org") {
        if url.contains("width=") {
            replace_number_after(url, "width=", width)
        } else if url.contains('?') {
            format!("{}&width={}", url, width)
        } else {
            format!("{}?width={}", url, width)
        }
    } else {
        url.to_string()
    }
}

/// Replace the digits following the first `marker` that is followed by digits
fn replace_number_after(url: &str, marker: &str, value: u32) -> String {
    let mut search_from = 0;
    while let Some(offset) = url[search_from..].find(marker) {
        let digits_start = search_from + offset + marker.len();
        let digits_len = url[digits_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits_len > 0 {
            return format!(
                "{}{}{}",
                &url[..digits_start],
                value,
                &url[digits_start + digits_len..]
            );
        }
        search_from = digits_start;
    }
    url.to_string()
}
