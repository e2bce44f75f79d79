#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use tokio::sync::mpsc;
use tokio::task;
use yansi::Paint;

use crate::application::cli;
use crate::application::panel;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::ContextSourceName;
use crate::domain::models::Event;
use crate::domain::services::relay::RelayService;
use crate::infrastructure::contexts::ContextSourceManager;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "sidellm has failed with the following error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    process::exit(1);
}

#[tokio::main]
async fn main() {
    let debug_log_dir = env::var("SIDELLM_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap()
            .join("sidellm")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("sidellm")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let ready_res = cli::parse().await;
    if let Err(ready_err) = ready_res {
        handle_error(ready_err);
        return;
    }
    if !ready_res.unwrap() {
        process::exit(0);
    }

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        let source = ContextSourceName::parse(&Config::get(ConfigKey::ContextSource))
            .unwrap_or(ContextSourceName::None);

        return RelayService::start(ContextSourceManager::get(source), event_tx, &mut action_rx)
            .await;
    });

    let panel_future = panel::start(action_tx, event_rx);

    let res = tokio::select!(
        res = background_futures.join_next() => res.unwrap().unwrap(),
        res = panel_future => res,
    );

    if res.is_err() {
        handle_error(res.unwrap_err());
    }

    process::exit(0);
}
