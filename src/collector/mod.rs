use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use metrics::{gauge, increment_counter};

use crate::parsers::{self, SENTINEL};
use crate::targets::{self, Client, Site};

mod snapshot;

pub use snapshot::{Sample, Snapshot};

/// Page size requested from paginated endpoints.
pub const PER_PAGE: u32 = 100;

/// How far back windowed endpoints look on every scrape.
pub const LOOKBACK_MINUTES: i64 = 30;

pub const INSTANCE_LABEL: &str = "instance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
}

impl MetricDescriptor {
    pub fn labels(&self) -> &'static [&'static str] {
        &[INSTANCE_LABEL]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    PerPage,
    /// Lower time bound, sent as the named parameter.
    Since(&'static str),
}

#[derive(Debug)]
pub struct Binding {
    pub resource: &'static str,
    pub path: &'static str,
    pub query: &'static [Query],
    pub descriptor: MetricDescriptor,
}

impl Binding {
    pub fn query_pairs(&self, since: &str) -> Vec<(&'static str, String)> {
        self.query
            .iter()
            .map(|q| match q {
                Query::PerPage => ("per_page", PER_PAGE.to_string()),
                Query::Since(param) => (*param, since.to_owned()),
            })
            .collect()
    }
}

const fn binding(
    resource: &'static str,
    path: &'static str,
    query: &'static [Query],
    name: &'static str,
    help: &'static str,
) -> Binding {
    Binding {
        resource,
        path,
        query,
        descriptor: MetricDescriptor { name, help },
    }
}

// https://developer.wordpress.org/rest-api/reference/
// https://woocommerce.github.io/woocommerce-rest-api-docs/#list-all-orders
pub static BINDINGS: [Binding; 11] = [
    binding(
        "categories",
        "/wp-json/wp/v2/categories",
        &[],
        "wordpress_category_count",
        "WordPress category count",
    ),
    binding(
        "posts",
        "/wp-json/wp/v2/posts",
        &[Query::Since("date")],
        "wordpress_post_count",
        "WordPress posts count",
    ),
    binding(
        "tags",
        "/wp-json/wp/v2/tags",
        &[],
        "wordpress_tag_count",
        "WordPress tags count",
    ),
    binding(
        "pages",
        "/wp-json/wp/v2/pages",
        &[Query::PerPage, Query::Since("date")],
        "wordpress_page_count",
        "WordPress pages count",
    ),
    binding(
        "comments",
        "/wp-json/wp/v2/comments",
        &[Query::Since("date")],
        "wordpress_comment_count",
        "WordPress comments count",
    ),
    binding(
        "media",
        "/wp-json/wp/v2/media",
        &[Query::PerPage, Query::Since("date")],
        "wordpress_media_count",
        "WordPress media files count",
    ),
    binding(
        "users",
        "/wp-json/wp/v2/users",
        &[Query::PerPage],
        "wordpress_user_count",
        "WordPress users count",
    ),
    binding(
        "taxonomies",
        "/wp-json/wp/v2/taxonomies",
        &[],
        "wordpress_taxonomies_count",
        "WordPress taxonomy count",
    ),
    binding(
        "themes",
        "/wp-json/wp/v2/themes",
        &[],
        "wordpress_theme_count",
        "WordPress theme count",
    ),
    binding(
        "plugins",
        "/wp-json/wp/v2/plugins",
        &[],
        "wordpress_plugin_count",
        "WordPress plugin count",
    ),
    binding(
        "orders",
        "/wp-json/wc/v3/orders",
        &[Query::PerPage, Query::Since("after")],
        "woocommerce_order_count",
        "WooCommerce order count",
    ),
];

/// Lower bound of the time window for a scrape started at `now`.
pub fn window_start(now: DateTime<Utc>) -> String {
    (now - chrono::Duration::minutes(LOOKBACK_MINUTES)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, thiserror::Error)]
enum CollectError {
    #[error(transparent)]
    Target(#[from] targets::TargetError),
    #[error(transparent)]
    Parse(#[from] parsers::ParseError),
}

pub struct Collector {
    client: Client,
    bindings: &'static [Binding],
}

impl Collector {
    pub fn new(client: Client) -> Self {
        Collector {
            client,
            bindings: &BINDINGS,
        }
    }

    pub fn site(&self) -> &Site {
        self.client.site()
    }

    /// Every gauge this collector can emit, regardless of scrape outcome.
    pub fn describe(&self) -> Vec<&'static MetricDescriptor> {
        self.bindings.iter().map(|b| &b.descriptor).collect()
    }

    pub async fn scrape(&self) -> Snapshot {
        self.scrape_at(Utc::now()).await
    }

    /// Fetches and counts every binding in order. A failing binding is
    /// reported as [`SENTINEL`] and never stops the remaining fetches.
    pub async fn scrape_at(&self, now: DateTime<Utc>) -> Snapshot {
        let started = Instant::now();
        let since = window_start(now);
        let mut snapshot = Snapshot::new(self.site().describe(), self.bindings.len());

        for binding in self.bindings {
            let count = match self.count(binding, &since).await {
                Ok(count) => {
                    increment_counter!(crate::FETCH_SUCCESSES, "resource" => binding.resource);
                    count
                }
                Err(err) => {
                    increment_counter!(crate::FETCH_FAILURES, "resource" => binding.resource);
                    warn!("Failed counting {}, error: {}", binding.resource, err);
                    SENTINEL
                }
            };
            snapshot.push(binding, count);
        }

        gauge!(crate::SCRAPE_DURATION, started.elapsed().as_secs_f64());
        snapshot
    }

    async fn count(&self, binding: &Binding, since: &str) -> Result<i64, CollectError> {
        let body = self
            .client
            .fetch(binding.path, &binding.query_pairs(since))
            .await?;
        Ok(parsers::json::count(&body)?)
    }
}
