pub mod http;

pub use http::Client;

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
    pub enabled: bool,
}

/// The monitored WordPress site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub url: String,
    pub user_agent: String,
    pub auth: Option<BasicAuth>,
}

impl Site {
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Site {
            url: url.trim_end_matches('/').to_owned(),
            user_agent: http::default_user_agent(),
            auth: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_auth(mut self, auth: BasicAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Value of the `instance` label on every exported gauge.
    pub fn describe(&self) -> &str {
        &self.url
    }

    fn credentials(&self) -> Option<&BasicAuth> {
        self.auth.as_ref().filter(|a| a.enabled)
    }
}
