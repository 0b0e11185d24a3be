use serde::Deserialize;
use url::Url;

use crate::download::HttpClient;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::youtube::video_id::VideoId;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// What the session shows and downloads for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    /// The `high` thumbnail, which every video has.
    pub thumbnail_url: Url,
    /// Raw ISO 8601 duration, e.g. `PT3M33S`.
    pub duration: String,
}

#[derive(Deserialize, Debug)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    snippet: Snippet,
    content_details: ContentDetails,
}

#[derive(Deserialize, Debug)]
struct Snippet {
    title: String,
    description: String,
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Debug)]
struct Thumbnails {
    high: Thumbnail,
}

#[derive(Deserialize, Debug)]
struct Thumbnail {
    url: String,
}

#[derive(Deserialize, Debug)]
struct ContentDetails {
    duration: String,
}

pub fn metadata_url(options: &Options, video_id: &VideoId) -> Url {
    let mut url = options.api_url.clone();
    url.query_pairs_mut()
        .append_pair("key", &options.api_key)
        .append_pair("part", "snippet,contentDetails")
        .append_pair("id", video_id.as_str());
    url
}

fn parse_response(video_id: &VideoId, body: &str) -> Result<VideoMetadata> {
    let response: VideoListResponse = serde_json::from_str(body)?;

    let video = match response.items.into_iter().next() {
        Some(video) => video,
        None => return Err(Error::NotFound(video_id.to_string())),
    };

    Ok(VideoMetadata {
        title: video.snippet.title,
        description: video.snippet.description,
        thumbnail_url: Url::parse(&video.snippet.thumbnails.high.url)?,
        duration: video.content_details.duration,
    })
}

/// One request to the videos endpoint, no retries.
///
/// An empty `items` list is [`Error::NotFound`]; transport failures and
/// bodies missing any of the expected fields are errors as well. Every
/// failure is logged here before it is returned.
pub async fn fetch_video_details(
    http: &dyn HttpClient,
    options: &Options,
    video_id: &VideoId,
) -> Result<VideoMetadata> {
    let url = metadata_url(options, video_id);

    let result = match http.get_text(&url).await {
        Ok(body) => parse_response(video_id, &body),
        Err(err) => Err(err),
    };

    match &result {
        Ok(_) => tracing::debug!("Fetched details for video ID {}", video_id),
        Err(Error::NotFound(_)) => tracing::warn!("No data found for video ID {}.", video_id),
        Err(err) if err.is_network() => {
            tracing::error!("Network error fetching details for {}: {}", video_id, err)
        }
        Err(err) => tracing::error!("Unexpected error fetching details for {}: {}", video_id, err),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{capture_logs, video_list_json, FakeHttp};

    fn video_id() -> VideoId {
        VideoId::extract("https://youtu.be/dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn request_carries_key_part_and_id() {
        let options = Options::for_tests("secret", "thumbnails");
        let url = metadata_url(&options, &video_id());

        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
        assert_eq!(url.path(), "/youtube/v3/videos");
        assert_eq!(
            pairs,
            vec![
                ("key".to_string(), "secret".to_string()),
                ("part".to_string(), "snippet,contentDetails".to_string()),
                ("id".to_string(), "dQw4w9WgXcQ".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn extracts_the_expected_fields() {
        let options = Options::for_tests("secret", "thumbnails");
        let body = video_list_json("Example", "PT3M33S");
        let http = FakeHttp::new().with_text(metadata_url(&options, &video_id()).as_str(), &body);

        let details = fetch_video_details(&http, &options, &video_id()).await.unwrap();

        assert_eq!(details.title, "Example");
        assert_eq!(details.description, "Description of Example");
        assert_eq!(details.duration, "PT3M33S");
        assert_eq!(
            details.thumbnail_url.as_str(),
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
        assert_eq!(http.calls().len(), 1);
    }

    #[tokio::test]
    async fn empty_or_missing_items_is_not_found() {
        let options = Options::for_tests("secret", "thumbnails");
        let url = metadata_url(&options, &video_id());

        for body in [r#"{"items": []}"#, r#"{"kind": "youtube#videoListResponse"}"#] {
            let (sink, _guard) = capture_logs();
            let http = FakeHttp::new().with_text(url.as_str(), body);

            let err = fetch_video_details(&http, &options, &video_id()).await.unwrap_err();

            assert!(matches!(err, Error::NotFound(ref id) if id == "dQw4w9WgXcQ"));
            assert!(sink.contents().contains("WARN"));
            assert!(sink.contents().contains("No data found for video ID dQw4w9WgXcQ."));
        }
    }

    #[tokio::test]
    async fn malformed_bodies_are_errors() {
        let options = Options::for_tests("secret", "thumbnails");
        let url = metadata_url(&options, &video_id());
        let bodies = [
            "not json",
            r#"{"items": [{"snippet": {"title": "t"}}]}"#,
            r#"{"items": [{"snippet": {"title": "t", "description": "d", "thumbnails": {"high": {"url": "nope"}}}, "contentDetails": {"duration": "PT1S"}}]}"#,
        ];

        for body in bodies {
            let (sink, _guard) = capture_logs();
            let http = FakeHttp::new().with_text(url.as_str(), body);

            let err = fetch_video_details(&http, &options, &video_id()).await.unwrap_err();

            assert!(!err.is_network(), "{}", body);
            assert!(sink.contents().contains("Unexpected error fetching details for dQw4w9WgXcQ"));
        }
    }

    #[tokio::test]
    async fn transport_failures_are_logged_as_network_errors() {
        let (sink, _guard) = capture_logs();
        let options = Options::for_tests("secret", "thumbnails");
        let http = FakeHttp::new();

        let err = fetch_video_details(&http, &options, &video_id()).await.unwrap_err();

        assert!(matches!(err, Error::Status { status: 404, .. }));
        assert!(sink.contents().contains("ERROR"));
        assert!(sink.contents().contains("Network error fetching details for dQw4w9WgXcQ"));
    }
}
