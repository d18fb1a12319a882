//! # Blob Sink
//!
//! A single-purpose message-to-storage bridge: messages arriving on one
//! inbound channel have their text payload written to a single Azure Storage
//! blob. The blob is either treated as append-only (each payload is appended,
//! followed by a newline) or as a block blob that each payload fully
//! overwrites.
//!
//! The sink resolves its blob handle once at startup and reuses it for every
//! write. Initialization failures do not abort the process: the sink starts
//! degraded, every write reports [`errors::WriteError::NotInitialized`], and
//! the provided [`runtime::run`] loop logs failures and keeps consuming.
//!
//! ```rust,no_run
//! use blob_sink::{config::Config, runtime::{self, Message}, sink::Sink};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("blob sink settings");
//!     let sink = Sink::initialize(&config).await;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     tx.send(Message::new("hello".to_string())).await.unwrap();
//!     drop(tx);
//!
//!     runtime::run(&sink, rx).await;
//! }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod sink;

pub use config::Config;
pub use sink::Sink;
