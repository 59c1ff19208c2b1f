use async_trait::async_trait;
use mn_core::Result;
use reqwest::Client;
use tracing::debug;

use crate::config::CrawlConfig;

/// Turns a URL into a page body. The crawl loop only talks to this trait.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mn_core::Error;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tfbd/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body>新民</body></html>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();
        let body = fetcher.fetch(&format!("{}/tfbd/", server.url())).await.unwrap();

        assert!(body.contains("新民"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
