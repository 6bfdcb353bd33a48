//! # Player Guessing Game Server Library
//!
//! This library provides the authoritative server for the player guessing
//! game. The server hides a target player from the roster, accepts guesses
//! from clients and answers each one with per-attribute feedback until the
//! target is found or the guess budget runs out.
//!
//! ## Core Responsibilities
//!
//! ### Roster Resolution
//! Player records come from a live upstream provider when it answers in
//! time, and from a static on-disk snapshot otherwise. Callers see one
//! contract and never learn which tier served a request.
//!
//! ### Session Authority
//! The server owns every game session. Clients only ever send a session id
//! and a guessed player id; the target stays on the server until the game
//! ends.
//!
//! ### Feedback
//! Each guess is compared attribute by attribute against the target using
//! the shared comparison engine, so the client can render exactly what the
//! server decided.
//!
//! ## Module Organization
//!
//! ### Roster Module (`roster`)
//! - Live HTTP source and snapshot source behind one trait
//! - Timeout-bounded fallback and process-lifetime memoization
//! - Name search and uniform random target selection
//!
//! ### Session Module (`session`)
//! - Session allocation and the Active/Won/Lost state machine
//! - Duplicate guess rejection and per-session serialization
//!
//! ### Game Module (`game`)
//! - The orchestrator request handlers call: start, guess, search, inspect
//!
//! ### Network Module (`network`)
//! - UDP socket management and packet (de)serialization
//! - One task per request, a single sender task for replies
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ResolverConfig;
//! use server::game::GameOrchestrator;
//! use server::network::Server;
//! use server::roster::RosterResolver;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = RosterResolver::from_config(&ResolverConfig::default());
//!     let game = Arc::new(GameOrchestrator::with_defaults(Arc::new(resolver)));
//!
//!     let mut server = Server::new("127.0.0.1:8080", game, Duration::from_secs(60)).await?;
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod network;
pub mod roster;
pub mod session;
