use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?youtu(?:be\.com/(?:watch\?v=|v/|embed/|shorts/)|\.be/)([a-zA-Z0-9_-]{11})").unwrap()
});

/// An 11 character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Find the identifier in a free-form URL string.
    ///
    /// Accepts the short link, `watch?v=`, `v/`, `embed/` and `shorts/`
    /// shapes, with or without scheme and `www.`. The match is not anchored
    /// so surrounding text is ignored, and the identifier is taken as-is.
    pub fn extract(input: &str) -> Option<Self> {
        VIDEO_ID_RE
            .captures(input)
            .and_then(|captures| captures.get(1))
            .map(|id| Self(id.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
