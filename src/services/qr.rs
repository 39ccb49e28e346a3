use crate::utils::encoding::encode_uri_component;

/// A request for a square QR image rendered by the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImageRequest {
    base_url: String,
    size: u32,
    text: String,
}

impl QrImageRequest {
    /// Returns `None` when `text` is empty or whitespace only. Non-blank text
    /// is sent untrimmed.
    pub fn for_input(base_url: &str, size: u32, text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }

        Some(Self {
            base_url: base_url.to_string(),
            size,
            text: text.to_string(),
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn url(&self) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}size={}x{}&data={}",
            self.base_url,
            separator,
            self.size,
            self.size,
            encode_uri_component(&self.text)
        )
    }
}
