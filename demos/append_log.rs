//! Pipes stdin lines into a blob sink configured from the environment.
//!
//! ```bash
//! export BLOB_SINK_ACCOUNT_NAME=acct
//! export BLOB_SINK_ACCOUNT_KEY=...
//! export BLOB_SINK_CONTAINER_NAME=logs
//! export BLOB_SINK_BLOB_NAME=out.txt
//! export BLOB_SINK_APPEND_ONLY=true
//! cargo run --example append_log
//! ```

use blob_sink::{
    config::Config,
    runtime::{self, Message},
    sink::Sink,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().expect("blob sink settings");
    let sink = Sink::initialize(&config).await;

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(Message::new(line)).await.is_err() {
                break;
            }
        }
    });

    runtime::run(&sink, rx).await;
}
