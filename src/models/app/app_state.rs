use crate::config::Config;
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("siteaudit/", env!("CARGO_PKG_VERSION")))
            .timeout(config.probe_timeout)
            .build()?;
        Ok(AppState {
            config,
            http_client,
        })
    }
}
