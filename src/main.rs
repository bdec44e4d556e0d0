mod airing;
mod app;
mod config;
mod display;
mod error;
mod history;
mod ipc;
mod live;
mod marquee;
mod snapshot;
mod sparkline;
mod surface;
mod theme;
mod util;
mod views;

use tracing_subscriber::prelude::*;

fn init_tracer() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();
}

fn main() -> Result<(), iced_layershell::Error> {
    init_tracer();
    app::run()
}
