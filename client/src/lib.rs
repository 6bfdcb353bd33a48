//! # Game Client Library
//!
//! Terminal client for the player guessing game. The server owns every game;
//! this crate only sends requests and prints what comes back.
//!
//! ## Module Organization
//!
//! ### Input Module (`input`)
//! Parses typed lines into [`input::Command`]s.
//!
//! ### Network Module (`network`)
//! - UDP socket management and packet (de)serialization
//! - Request ids so late replies to abandoned requests are ignored
//! - Reply timeouts, and server error packets surfaced as typed errors
//!
//! ### Rendering Module (`rendering`)
//! Text tables for search results and per-attribute feedback. Target values
//! stay hidden until the game is over.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::GameClient;
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), client::network::ClientError> {
//! let mut client = GameClient::new("127.0.0.1:8080", Duration::from_secs(10)).await?;
//! client.start_game().await?;
//!
//! let candidates = client.search("lebron", None).await?;
//! if let Some(player) = candidates.first() {
//!     let outcome = client.guess(player.id).await?;
//!     println!("{}", client::rendering::render_outcome(&outcome, None));
//! }
//! # Ok(())
//! # }
//! ```

pub mod input;
pub mod network;
pub mod rendering;
