pub mod collector;
pub mod config;
pub mod log_filter;
pub mod parsers;
pub mod targets;

use std::sync::Arc;

use log::info;
use metrics::{describe_counter, describe_gauge, Unit};

use collector::{Collector, Snapshot};

const FETCH_FAILURES: &str = "wordpress_exporter_fetch_failures_total";
const FETCH_SUCCESSES: &str = "wordpress_exporter_fetch_successes_total";
const SCRAPE_DURATION: &str = "wordpress_exporter_scrape_duration_seconds";

pub fn init_metrics(collector: &Collector) {
    for descriptor in collector.describe() {
        describe_gauge!(descriptor.name, descriptor.help);
    }

    describe_counter!(FETCH_FAILURES, "Number of failed endpoint fetches");
    describe_counter!(FETCH_SUCCESSES, "Number of succeeded endpoint fetches");
    describe_gauge!(
        SCRAPE_DURATION,
        Unit::Seconds,
        "Duration of the last scrape of the site"
    );
}

/// Cheaply cloneable handle shared by the HTTP handlers.
#[derive(Clone)]
pub struct WordpressMetrics {
    collector: Arc<Collector>,
}

impl WordpressMetrics {
    pub fn new(collector: Collector) -> Self {
        info!(
            "Monitoring {}, auth: {}",
            collector.site().describe(),
            collector.site().auth.as_ref().map_or(false, |a| a.enabled)
        );
        WordpressMetrics {
            collector: Arc::new(collector),
        }
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// Scrapes the site and publishes the result to the recorder.
    pub async fn collect(&self) -> Snapshot {
        let snapshot = self.collector.scrape().await;
        snapshot.record();
        snapshot
    }
}
