use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::board::{FilterKey, SortKey, Theme};

/// MLB pitcher strikeout projection board
#[derive(Parser, Debug, Clone)]
#[command(name = "strikeout-board", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:3000")]
    pub dashboard_addr: String,

    /// Projection API endpoint serving today's games
    #[arg(
        long,
        env = "GAMES_API_URL",
        default_value = "http://localhost:8000/api/games/today"
    )]
    pub games_api_url: String,

    /// Serve the built-in demo slate instead of calling the projection API
    #[arg(long, env = "MOCK_SLATE", default_value = "false")]
    pub mock: bool,

    /// HTTP timeout for the slate request in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Initial sort: confidence | strikeouts | pitcher | time
    #[arg(long, env = "DEFAULT_SORT", default_value = "confidence")]
    pub default_sort: String,

    /// Initial filter: all | elite | high-confidence
    #[arg(long, env = "DEFAULT_FILTER", default_value = "all")]
    pub default_filter: String,

    /// Start the dashboard in the light theme
    #[arg(long, env = "LIGHT_THEME", default_value = "false")]
    pub light_theme: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.listen_addr()?;
        if !self.mock {
            let url = url::Url::parse(&self.games_api_url)
                .map_err(|e| anyhow::anyhow!("games_api_url is not a valid URL: {}", e))?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("games_api_url must be http or https, got {}", url.scheme());
            }
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        self.dashboard_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("dashboard_addr {:?}: {}", self.dashboard_addr, e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sort(&self) -> SortKey {
        SortKey::from_name(&self.default_sort)
    }

    pub fn filter(&self) -> FilterKey {
        FilterKey::from_name(&self.default_filter)
    }

    pub fn theme(&self) -> Theme {
        if self.light_theme {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}
