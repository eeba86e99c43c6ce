//! # Srordle - shaped-row Wordle client engine
//!
//! Srordle is a daily word game on a seven-column board. Each row has a shape: a
//! mask saying which columns take letters, so row one may want a five-letter
//! word and row two a four-letter word starting in column two. A limited number
//! of times per day the player may override the shape and guess a full
//! seven-letter word.
//!
//! This crate is the client side: the turn state machine, local progress
//! storage, the board and keyboard projections, and an HTTP client for the game
//! server that does all scoring.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use srordle::client::HttpGameServer;
//! use srordle::config::Config;
//! use srordle::session::Session;
//! use srordle::storage::{AnyStore, GameDate, ProgressStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("srordle.toml").await?;
//!     let server = HttpGameServer::new(&config.server)?;
//!     let store = AnyStore::open(&config.storage.backend, &config.storage.data_dir)?;
//!     let mut session =
//!         Session::open(server, ProgressStore::new(store), GameDate::today()).await?;
//!     session.handle_line("apple").await;
//!     print!("{}", session.paint(config.display.color));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`model`] - letter statuses, row shapes and scored guesses
//! - [`engine`] - the turn engine, its view ports and events
//! - [`board`] / [`keyboard`] - projections of engine state for display
//! - [`storage`] - day-keyed saved progress over memory, file or sled backends
//! - [`client`] - wire types and the game server client
//! - [`session`] - wiring for one day's game
//! - [`config`] - TOML configuration
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │  Key intents    │ ──▶ │  Turn engine    │ ──▶ board / keyboard views
//! └─────────────────┘     └─────────────────┘
//!                            │          │ events
//!                  GameServer│          ▼
//!                            │   progress store, override panel, notices
//!                            ▼
//!                      scoring server
//! ```

pub mod board;
pub mod client;
pub mod color;
pub mod config;
pub mod engine;
pub mod keyboard;
pub mod logutil;
pub mod model;
pub mod session;
pub mod storage;
