use url::Url;

use crate::download::HttpClient;
use crate::options::Options;
use crate::youtube::video_id::VideoId;

pub const DEFAULT_THUMBNAIL_HOST: &str = "https://img.youtube.com";

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The HEAD request answered with something other than 200.
    Unavailable(u16),
    /// The HEAD request never got an answer.
    Unreachable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailSelection {
    MaxResolution(Url),
    Fallback { url: Url, reason: FallbackReason },
}

impl ThumbnailSelection {
    pub fn url(&self) -> &Url {
        match self {
            ThumbnailSelection::MaxResolution(url) => url,
            ThumbnailSelection::Fallback { url, .. } => url,
        }
    }
}

/// `<host>/vi/<id>/maxresdefault.jpg`, keeping any path already on the host.
pub fn max_resolution_url(options: &Options, video_id: &VideoId) -> Result<Url, url::ParseError> {
    let mut base = options.thumbnail_host.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&format!("vi/{}/maxresdefault.jpg", video_id))
}

/// Prefer `maxresdefault.jpg` when a HEAD request for it returns 200,
/// otherwise settle for `fallback`. Never fails.
pub async fn resolve_thumbnail(
    http: &dyn HttpClient,
    options: &Options,
    video_id: &VideoId,
    fallback: &Url,
) -> ThumbnailSelection {
    let fallback_with = |reason| ThumbnailSelection::Fallback {
        url: fallback.clone(),
        reason,
    };

    let max_url = match max_resolution_url(options, video_id) {
        Ok(url) => url,
        Err(err) => {
            tracing::error!("Error building max resolution thumbnail URL for {}: {}", video_id, err);
            return fallback_with(FallbackReason::Unreachable);
        }
    };

    match http.head_status(&max_url).await {
        Ok(200) => {
            tracing::info!("Max resolution thumbnail available for {}. Using {}", video_id, max_url);
            ThumbnailSelection::MaxResolution(max_url)
        }
        Ok(status) => {
            tracing::info!(
                "Max resolution thumbnail not available (status {}). Fallback used.",
                status
            );
            fallback_with(FallbackReason::Unavailable(status))
        }
        Err(err) => {
            tracing::error!("Error checking max resolution thumbnail: {}", err);
            fallback_with(FallbackReason::Unreachable)
        }
    }
}
