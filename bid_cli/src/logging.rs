//! Tracing subscriber setup for the CLI.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for JSON output.
pub fn init_logging(env: Environment, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match env {
        Environment::Dev => "bid_core=info,bid_cli=debug,warn".into(),
        Environment::Prod => "bid_core=info,bid_cli=info,warn".into(),
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    if json {
        tracing_subscriber::registry().with(filter).with(fmt_layer.json()).init();
    } else {
        tracing_subscriber::registry().with(filter).with(fmt_layer.compact()).init();
    }

    tracing::debug!("Logging initialized for {:?} environment", env);
}
