use async_trait::async_trait;
use reqwest::{header, Url};
use tracing::debug;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::Fetcher;

/// reqwestでSSIポータルからHTMLを取得するフェッチャー
///
/// 1回のリクエストにつき1回だけ試行する（リトライなし）。
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
    mode: String,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScraperError::ClientInit(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            mode: config.mode.clone(),
        })
    }

    /// `codigo` と `tipo` を付与したページURL
    pub fn project_url(&self, cui: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("codigo", cui)
            .append_pair("tipo", &self.mode);
        url
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, cui: &str) -> Result<String, ScraperError> {
        let url = self.project_url(cui);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        debug!("取得完了: CUI={}, {}bytes", cui, body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;
    use crate::config::DEFAULT_USER_AGENT;

    #[test]
    fn test_project_url() {
        let fetcher = HttpFetcher::new(&ScraperConfig::default()).unwrap();
        let url = fetcher.project_url("2345678");

        assert_eq!(url.host_str(), Some("ofi5.mef.gob.pe"));
        assert_eq!(url.path(), "/ssi/Ssi/Index");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("codigo".to_string(), "2345678".to_string()),
                ("tipo".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_project_url_encodes_cui() {
        let fetcher = HttpFetcher::new(&ScraperConfig::default()).unwrap();
        let url = fetcher.project_url("12 34&tipo=9");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].1, "12 34&tipo=9");
        assert_eq!(pairs[1].1, "2");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ScraperConfig::new().with_base_url("not a url");
        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidUrl(_)));
    }

    /// ヘッダー終端までリクエストを読む
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    async fn local_config(listener: &TcpListener) -> ScraperConfig {
        let addr = listener.local_addr().unwrap();
        ScraperConfig::new().with_base_url(format!("http://{}/ssi/Ssi/Index", addr))
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent_and_query() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let fetcher = HttpFetcher::new(&local_config(&listener).await).unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let body = "<html>ok</html>";
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            request
        });

        let html = fetcher.fetch("2345678").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(html, "<html>ok</html>");
        let request_line = request.lines().next().unwrap();
        assert_eq!(request_line, "GET /ssi/Ssi/Index?codigo=2345678&tipo=2 HTTP/1.1");
        let user_agent = request
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("user-agent").then(|| value.trim().to_string())
            })
            .expect("User-Agent header missing");
        assert_eq!(user_agent, DEFAULT_USER_AGENT);
        assert!(user_agent.starts_with("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = local_config(&listener)
            .await
            .with_timeout(Duration::from_millis(200));
        let fetcher = HttpFetcher::new(&config).unwrap();

        // 接続を受け付けるが応答しない
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(stream);
        });

        let err = fetcher.fetch("2345678").await.unwrap_err();
        server.abort();

        assert!(matches!(&err, ScraperError::Fetch(e) if e.is_timeout()), "{:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let fetcher = HttpFetcher::new(&local_config(&listener).await).unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            stream
                .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
        });

        let err = fetcher.fetch("2345678").await.unwrap_err();
        assert!(
            matches!(&err, ScraperError::Fetch(e) if e.status() == Some(reqwest::StatusCode::SERVICE_UNAVAILABLE)),
            "{:?}",
            err
        );
    }

    #[tokio::test]
    #[ignore] // 実環境テスト用: cargo test test_fetch_live -- --ignored --nocapture
    async fn test_fetch_live() {
        let cui = std::env::var("SSI_CUI").expect("SSI_CUI not set");
        let fetcher = HttpFetcher::new(&ScraperConfig::default()).unwrap();
        let html = fetcher.fetch(&cui).await.expect("fetch failed");
        assert!(!html.is_empty());
    }
}
