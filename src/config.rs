use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://ofi5.mef.gob.pe/ssi/Ssi/Index";
pub const DEFAULT_MODE: &str = "2";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 3000;

/// プロジェクトページ上の要素を特定するセレクタ
///
/// ページのHTML構造は外部サイト側の都合で変わるため、コードに埋め込まず設定として持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors {
    /// プロジェクト名を保持する要素
    pub project_name: String,
    /// 年度別実績テーブル
    pub annual_table: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            project_name: "#td_nominv".to_string(),
            annual_table: "#tb_anual".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    /// `tipo` クエリパラメータ
    pub mode: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub selectors: PageSelectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: DEFAULT_MODE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            selectors: PageSelectors::default(),
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_selectors(mut self, selectors: PageSelectors) -> Self {
        self.selectors = selectors;
        self
    }
}

/// HTTPサーバー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl ServerConfig {
    /// 環境変数 `PORT` から読み込む
    pub fn from_env() -> Self {
        Self::from_port_var(std::env::var("PORT").ok().as_deref())
    }

    fn from_port_var(value: Option<&str>) -> Self {
        let port = match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORTの値が不正です: {:?}。{} を使用します", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
        };
        Self { port }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
