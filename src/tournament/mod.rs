//! Single-elimination tournament module.
//!
//! This module provides the tournament engine:
//! - Tournament creation and registration admission control
//! - Bracket generation with randomized round-1 pairings
//! - Match result recording
//! - Round advancement and completion detection
//! - Read-only query surface (details, listings, next match)
//!
//! ## Example
//!
//! ```no_run
//! use pong_arena::db::Database;
//! use pong_arena::events::LogSink;
//! use pong_arena::tournament::TournamentEngine;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let engine = TournamentEngine::new(Arc::new(db.pool().clone()), Arc::new(LogSink));
//!
//!     let tournament = engine
//!         .create_tournament("Friday Night Pong", None, 8, None)
//!         .await?;
//!     engine.register_player(tournament.id, "paddle_queen", None).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod bracket;
pub mod engine;
pub mod errors;
pub mod models;

pub use bracket::{Pairing, RoundOutcome};
pub use engine::TournamentEngine;
pub use errors::{TournamentError, TournamentResult};
pub use models::{
    JoinCheck, JoinRefusal, Match, MatchId, MatchStatus, Participant, ParticipantId, Tournament,
    TournamentDetails, TournamentId, TournamentStatus,
};
