use std::fmt;
use std::path::PathBuf;

use url::Url;

#[derive(Clone)]
pub struct Options {
    pub api_key: String,
    pub api_url: Url,
    pub thumbnail_host: Url,
    pub output_dir: PathBuf,
    pub show_banner: bool,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Options")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url.as_str())
            .field("thumbnail_host", &self.thumbnail_host.as_str())
            .field("output_dir", &self.output_dir)
            .field("show_banner", &self.show_banner)
            .finish()
    }
}

#[cfg(test)]
impl Options {
    pub fn for_tests(api_key: &str, output_dir: impl Into<PathBuf>) -> Self {
        use crate::youtube::{metadata::DEFAULT_API_URL, thumbnail::DEFAULT_THUMBNAIL_HOST};

        Self {
            api_key: api_key.to_string(),
            api_url: Url::parse(DEFAULT_API_URL).unwrap(),
            thumbnail_host: Url::parse(DEFAULT_THUMBNAIL_HOST).unwrap(),
            output_dir: output_dir.into(),
            show_banner: false,
        }
    }
}
