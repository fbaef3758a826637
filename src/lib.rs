//! # Pong Arena
//!
//! Single-elimination tournament engine for the Pong Arena gaming platform.
//!
//! This library manages the full bracket lifecycle: player registration into
//! a bounded bracket, randomized round-1 pairing, match result recording,
//! round advancement, and completion detection. The surrounding platform
//! (HTTP routes, authentication, the Pong game itself) lives outside this
//! crate and talks to the engine through [`tournament::TournamentEngine`].
//!
//! ## Architecture
//!
//! Every mutating operation is one transaction against PostgreSQL; the
//! tournament row is locked for the duration, so concurrent registrations
//! and concurrent result submissions serialize per tournament without any
//! application-level locking. Notifications go through an injected
//! [`events::NotificationSink`] strictly after commit - a slow or failing
//! sink can never block or roll back engine state.
//!
//! ## Core Modules
//!
//! - [`tournament`]: the engine, bracket logic, models, and error taxonomy
//! - [`events`]: notification sink trait and bundled sink implementations
//! - [`db`]: connection pool construction and configuration
//!
//! ## Example
//!
//! ```no_run
//! use pong_arena::{Database, LogSink, TournamentEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let engine = TournamentEngine::new(Arc::new(db.pool().clone()), Arc::new(LogSink));
//!
//!     let t = engine.create_tournament("Lunch Bracket", None, 4, None).await?;
//!     engine.register_player(t.id, "ada", None).await?;
//!     Ok(())
//! }
//! ```

/// Connection pool construction and configuration.
pub mod db;
pub use db::{Database, DatabaseConfig};

/// Tournament event broadcasting.
pub mod events;
pub use events::{LogSink, NotificationSink, NullSink, RecordingSink, TournamentEvent};

/// The tournament engine, bracket logic, models, and errors.
pub mod tournament;
pub use tournament::{
    JoinCheck, JoinRefusal, Match, MatchStatus, Participant, Tournament, TournamentDetails,
    TournamentEngine, TournamentError, TournamentResult, TournamentStatus,
};
