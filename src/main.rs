use axum::{routing::get, Extension, Router};
use clap::Parser;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use wordpress_exporter::{collector::Collector, log_filter::LogFilter, targets, WordpressMetrics};

#[derive(Parser)]
struct Opts {
    #[clap(short, long, default_value = "config.yaml")]
    config: String,

    #[clap(short, long, default_value = "127.0.0.1:9090")]
    address: String,

    #[clap(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();

    let level: Level = opts.log_level.parse().expect("invalid log level");
    tracing_subscriber::registry()
        .with(tracing_logfmt::layer().with_filter(LogFilter::new(level)))
        .init();

    let prometheus_handler = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install recorder");

    let config = wordpress_exporter::config::parse(&opts.config).expect("could not load config");
    let client =
        targets::Client::new(config.site, config.timeout).expect("could not build http client");
    let collector = Collector::new(client);
    wordpress_exporter::init_metrics(&collector);
    let metrics = WordpressMetrics::new(collector);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(collect_metrics))
        .layer(Extension(metrics))
        .layer(Extension(prometheus_handler))
        .layer(TraceLayer::new_for_http());

    let addr = opts.address.parse().expect("could not parse address");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .expect("web server terminated");
}

async fn healthz() -> &'static str {
    "OK"
}

async fn collect_metrics(
    metrics: Extension<WordpressMetrics>,
    prometheus_handler: Extension<PrometheusHandle>,
) -> String {
    metrics.collect().await;
    prometheus_handler.render()
}
