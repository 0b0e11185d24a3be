pub mod file;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use url::Url;

use crate::error::{Error, Result};

pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// The three request shapes the downloader needs: a text body, a bodiless
/// HEAD and a streamed body.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and return the body, failing on a non-success status.
    async fn get_text(&self, url: &Url) -> Result<String>;

    /// HEAD `url` and return the raw status code.
    async fn head_status(&self, url: &Url) -> Result<u16>;

    /// GET `url` and hand back the body as it arrives, failing on a
    /// non-success status.
    async fn get_stream(&self, url: &Url) -> Result<ByteStream>;
}

/// `url` without its query string, which may carry the API key.
pub fn display_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

fn network_error(err: reqwest::Error) -> Error {
    Error::Network(err.without_url())
}

pub struct DownloadClient {
    client: reqwest::Client,
}

impl DownloadClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response> {
        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(err) => {
                let err = network_error(err);
                tracing::debug!("GET {} failed: {}", display_url(url), err);
                return Err(err);
            }
        };

        if !response.status().is_success() {
            return Err(Error::Status {
                url: display_url(url),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl HttpClient for DownloadClient {
    async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self.get(url).await?;
        response.text().await.map_err(network_error)
    }

    async fn head_status(&self, url: &Url) -> Result<u16> {
        let response = self
            .client
            .head(url.as_str())
            .send()
            .await
            .map_err(network_error)?;
        Ok(response.status().as_u16())
    }

    async fn get_stream(&self, url: &Url) -> Result<ByteStream> {
        let response = self.get(url).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(network_error))
            .boxed())
    }
}
