use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::{error::FetchError, identifier::Doi};

/// Anything that can turn a DOI into the raw metadata of one work.
pub trait MetadataSource {
    fn fetch(&self, doi: &Doi<'_>) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// DOI resolver the DOI path is appended to.
    pub base: Url,
    pub user_agent: String,
    pub timeout_connect: Duration,
    pub timeout_global: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            base: Url::parse("https://doi.org/").expect("static URL"),
            user_agent: concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
                " (+https://doi.org)"
            )
            .to_owned(),
            timeout_connect: Duration::from_secs(5),
            timeout_global: Duration::from_secs(10),
        }
    }
}

/// Fetches CSL JSON from a DOI resolver via content negotiation.
pub struct HttpResolver {
    agent: ureq::Agent,
    config: ResolverConfig,
}

impl HttpResolver {
    pub fn new(config: ResolverConfig) -> Self {
        let cfg = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(config.timeout_connect))
            .timeout_global(Some(config.timeout_global))
            .build();
        HttpResolver {
            agent: ureq::Agent::new_with_config(cfg),
            config,
        }
    }
}

impl MetadataSource for HttpResolver {
    fn fetch(&self, doi: &Doi<'_>) -> Result<Value, FetchError> {
        let url = doi.to_url(&self.config.base)?;
        tracing::debug!(%url, "requesting metadata");

        let mut res = self
            .agent
            .get(url.as_str())
            .header(
                "Accept",
                "application/vnd.citationstyles.csl+json, application/json",
            )
            .header("User-Agent", &self.config.user_agent)
            .call()?;

        let status = res.status();
        tracing::debug!(status = status.as_u16(), "resolver responded");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = res.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}
