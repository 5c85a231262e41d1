use tracing::{metadata::LevelFilter, Level, Metadata};
use tracing_subscriber::layer::{Context, Filter};

/// Only lets through events from this crate and the tower-http response log.
pub struct LogFilter {
    level: Level,
}

impl LogFilter {
    pub fn new(level: Level) -> Self {
        LogFilter { level }
    }

    fn allows_target(target: &str) -> bool {
        target.starts_with("wordpress_exporter") || target.starts_with("tower_http::trace::on_response")
    }
}

impl<S> Filter<S> for LogFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.level() <= &self.level && Self::allows_target(meta.target())
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(LevelFilter::from(self.level))
    }
}
