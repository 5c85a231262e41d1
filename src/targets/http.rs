use std::time::Duration;

use bytes::Bytes;
use log::{info, warn};

use super::{Site, TargetError};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest prefix of an error response body kept for logging.
const BODY_SNIPPET_CHARS: usize = 256;

pub fn default_user_agent() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// HTTP client bound to one site; every request goes to `site.url` + path.
#[derive(Debug, Clone)]
pub struct Client {
    site: Site,
    inner: reqwest::Client,
}

impl Client {
    pub fn new(site: Site, timeout: Duration) -> Result<Self, TargetError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Client { site, inner })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Issues a single GET against `path`, returning the raw body of a 2xx
    /// response.
    pub async fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<Bytes, TargetError> {
        let url = format!("{}{}", self.site.url, path);

        let mut req = self
            .inner
            .get(&url)
            .query(query)
            .header(reqwest::header::USER_AGENT, &self.site.user_agent);
        if let Some(auth) = self.site.credentials() {
            req = req.basic_auth(&auth.username, Some(&auth.password));
        }
        let req = req.build()?;

        info!("Fetching {}", req.url());

        let resp = match self.inner.execute(req).await {
            Ok(resp) => resp,
            Err(err) => {
                warn!("Request to {} failed: {}", url, err);
                return Err(err.into());
            }
        };

        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            let body = snippet(&body);
            warn!("Error status from {}: {}: {}", url, status.as_u16(), body);
            return Err(TargetError::Status { status, body });
        }

        Ok(body)
    }
}

fn snippet(body: &[u8]) -> String {
    let body = String::from_utf8_lossy(body);
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.into_owned(),
    }
}
