//! Tournament event broadcasting.
//!
//! The engine announces registrations, newly pending matches, and
//! tournament completion through an injected [`NotificationSink`].
//! Delivery is fire-and-forget: sinks are called strictly after the
//! owning transaction commits and cannot fail an engine operation.

use crate::tournament::models::{ParticipantId, TournamentId};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

/// Broadcast payloads emitted by the tournament engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TournamentEvent {
    /// A player was admitted into the bracket
    PlayerRegistered {
        alias: String,
        registered: i64,
        capacity: i32,
    },
    /// The bracket was generated and play began
    TournamentStarted { match_count: usize },
    /// A newly pending match is ready to play
    MatchAnnounced {
        round: i32,
        match_number: i32,
        player1_alias: String,
        player2_alias: String,
    },
    /// The bracket closed with a winner
    TournamentFinished {
        winner_id: ParticipantId,
        winner_alias: String,
    },
}

/// Event-broadcast interface consumed by the engine
///
/// Implementations must not block on delivery; the engine never awaits an
/// acknowledgement and a failing sink must not affect committed state.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Announce one event for one tournament
    async fn broadcast(&self, tournament_id: TournamentId, event: TournamentEvent);
}

/// Sink that discards every event
pub struct NullSink;

#[async_trait]
impl NotificationSink for NullSink {
    async fn broadcast(&self, _tournament_id: TournamentId, _event: TournamentEvent) {}
}

/// Sink that renders events through the `log` facade
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn broadcast(&self, tournament_id: TournamentId, event: TournamentEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => log::info!("tournament {tournament_id} event: {payload}"),
            Err(_) => log::info!("tournament {tournament_id} event: {event:?}"),
        }
    }
}

/// Sink that records events in memory, for tests and diagnostics
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(TournamentId, TournamentEvent)>>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the events recorded so far
    pub async fn recorded(&self) -> Vec<(TournamentId, TournamentEvent)> {
        self.events.lock().await.clone()
    }

    /// Drain and return the events recorded so far
    pub async fn take(&self) -> Vec<(TournamentId, TournamentEvent)> {
        std::mem::take(&mut *self.events.lock().await)
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn broadcast(&self, tournament_id: TournamentId, event: TournamentEvent) {
        self.events.lock().await.push((tournament_id, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = TournamentEvent::PlayerRegistered {
            alias: "A".to_string(),
            registered: 3,
            capacity: 4,
        };

        let value = serde_json::to_value(&event).expect("serializable event");
        assert_eq!(value["event"], "player_registered");
        assert_eq!(value["alias"], "A");
        assert_eq!(value["registered"], 3);
        assert_eq!(value["capacity"], 4);
    }

    #[tokio::test]
    async fn test_recording_sink_collects_in_order() {
        let sink = RecordingSink::new();

        sink.broadcast(1, TournamentEvent::TournamentStarted { match_count: 2 })
            .await;
        sink.broadcast(
            1,
            TournamentEvent::TournamentFinished {
                winner_id: 9,
                winner_alias: "A".to_string(),
            },
        )
        .await;

        let events = sink.take().await;
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].1,
            TournamentEvent::TournamentStarted { match_count: 2 }
        );

        // Drained: nothing left behind.
        assert!(sink.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_null_sink_accepts_events() {
        NullSink
            .broadcast(1, TournamentEvent::TournamentStarted { match_count: 1 })
            .await;
    }
}
