//! Bounded plain-text page fetch.
//!
//! The fetcher is infallible by contract: network failures, HTTP errors, and
//! unreadable bodies all come back as a short explanatory string, so callers
//! can treat whatever it returns as research text.

use async_trait::async_trait;

use crate::error::Result;

/// Page fetch collaborator: URL in, bounded plain text out.
///
/// Never fails; failures are reported in-band as explanatory text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, strip markup, and truncate to `max_chars` characters.
    async fn fetch(&self, url: &str, max_chars: usize) -> String;
}

/// HTTP fetcher with HTML stripping.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Create a fetcher with a bounded request timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("prospect/0.1")
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, max_chars: usize) -> String {
        tracing::debug!(%url, "fetching page");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return format!("Could not fetch {url}: {e}"),
        };

        let status = response.status();
        if !status.is_success() {
            return format!("Could not fetch {url}: HTTP {status}");
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return format!("Could not read {url}: {e}"),
        };

        let text = if content_type.contains("html") || body.trim_start().starts_with('<') {
            strip_html_tags(&body)
        } else {
            body
        };

        truncate_chars(&text, max_chars).to_string()
    }
}

/// Basic HTML tag stripping using regex.
fn strip_html_tags(html: &str) -> String {
    // Remove script and style blocks entirely
    let re_script = regex::Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    let cleaned = re_script.replace_all(html, "");
    let re_style = regex::Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    let cleaned = re_style.replace_all(&cleaned, "");

    // Remove HTML tags
    let re_tags = regex::Regex::new(r"<[^>]+>").unwrap();
    let text = re_tags.replace_all(&cleaned, " ");

    // Decode common HTML entities
    let text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");

    // Collapse runs of whitespace
    let re_whitespace = regex::Regex::new(r"\s{2,}").unwrap();
    re_whitespace.replace_all(text.trim(), " ").to_string()
}

/// Truncate at a character (not byte) boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_scripts_and_entities() {
        let html = "<html><head><style>p{color:red}</style>\
                    <script>alert('x')</script></head>\
                    <body><h1>Acme&nbsp;Corp</h1><p>Developer   tools &amp; more</p></body></html>";
        let text = strip_html_tags(html);
        assert_eq!(text, "Acme Corp Developer tools & more");
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
