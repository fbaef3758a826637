//! Tournament data models for single-elimination brackets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tournament ID type
pub type TournamentId = i64;

/// Participant ID type
pub type ParticipantId = i64;

/// Match ID type
pub type MatchId = i64;

/// Tournament lifecycle status
///
/// The status only moves forward: `Registration -> InProgress -> Finished`,
/// or `Registration -> Cancelled`. Tournaments are never hard-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting registrations
    Registration,
    /// Bracket generated, matches being played
    InProgress,
    /// Tournament finished with a winner
    Finished,
    /// Tournament cancelled before play began
    Cancelled,
}

impl TournamentStatus {
    /// TEXT representation stored in the `tournaments.status` column
    pub fn as_db_str(self) -> &'static str {
        match self {
            TournamentStatus::Registration => "registration",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Finished => "finished",
            TournamentStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the stored TEXT representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "registration" => Some(TournamentStatus::Registration),
            "in_progress" => Some(TournamentStatus::InProgress),
            "finished" => Some(TournamentStatus::Finished),
            "cancelled" => Some(TournamentStatus::Cancelled),
            _ => None,
        }
    }
}

/// Match lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Awaiting a result
    Pending,
    /// Result recorded
    Finished,
}

impl MatchStatus {
    /// TEXT representation stored in the `tournament_matches.status` column
    pub fn as_db_str(self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Finished => "finished",
        }
    }

    /// Parse the stored TEXT representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MatchStatus::Pending),
            "finished" => Some(MatchStatus::Finished),
            _ => None,
        }
    }
}

/// Tournament record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Tournament ID
    pub id: TournamentId,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Maximum player capacity, fixed at creation
    pub max_players: i32,
    /// Lifecycle status
    pub status: TournamentStatus,
    /// User who created the tournament, if any
    pub created_by: Option<i64>,
    /// Winning participant once finished
    pub winner_id: Option<ParticipantId>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Started at timestamp
    pub started_at: Option<DateTime<Utc>>,
    /// Finished (or cancelled) at timestamp
    pub finished_at: Option<DateTime<Utc>>,
}

/// Tournament participant
///
/// Participants may be alias-only: `user_id` is optional and the alias is
/// unique within its tournament, not globally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,
    /// Owning tournament
    pub tournament_id: TournamentId,
    /// Backing account, if the participant is not anonymous
    pub user_id: Option<i64>,
    /// Display alias, unique per tournament
    pub alias: String,
    /// Admission-time order number, never renumbered
    pub registration_order: i32,
    /// Set once the participant loses a match
    pub eliminated: bool,
    /// Registered at timestamp
    pub registered_at: DateTime<Utc>,
}

/// Bracket match
///
/// Both player slots are always filled; a bye is the absence of a match,
/// never a one-sided row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    /// Match ID
    pub id: MatchId,
    /// Owning tournament
    pub tournament_id: TournamentId,
    /// Round number, 1-based
    pub round_number: i32,
    /// Match number within the round, 1-based and dense
    pub match_number: i32,
    /// First participant
    pub player1_id: ParticipantId,
    /// Second participant
    pub player2_id: ParticipantId,
    /// Winner once finished; always one of the two players
    pub winner_id: Option<ParticipantId>,
    /// First participant's score
    pub player1_score: i32,
    /// Second participant's score
    pub player2_score: i32,
    /// Lifecycle status
    pub status: MatchStatus,
    /// Created at timestamp
    pub started_at: DateTime<Utc>,
    /// Result-recorded timestamp
    pub finished_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Whether the given participant plays in this match
    pub fn involves(&self, participant_id: ParticipantId) -> bool {
        self.player1_id == participant_id || self.player2_id == participant_id
    }
}

/// Full read model for one tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentDetails {
    /// The tournament record
    pub tournament: Tournament,
    /// Participants in registration order
    pub participants: Vec<Participant>,
    /// Matches in `(round, match_number)` order
    pub matches: Vec<Match>,
}

/// Reason a candidate alias may not join right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRefusal {
    /// No such tournament
    TournamentNotFound,
    /// Tournament is past registration
    RegistrationClosed,
    /// Alias already used within the tournament
    AliasTaken,
    /// Bracket is at capacity
    TournamentFull,
}

/// Result of a non-mutating admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCheck {
    /// Whether a registration attempt would currently be admitted
    pub allowed: bool,
    /// Refusal reason when not allowed
    pub reason: Option<JoinRefusal>,
}

impl JoinCheck {
    /// Admission would succeed
    pub fn granted() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// Admission would be refused for the given reason
    pub fn refused(reason: JoinRefusal) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_status_db_round_trip() {
        for status in [
            TournamentStatus::Registration,
            TournamentStatus::InProgress,
            TournamentStatus::Finished,
            TournamentStatus::Cancelled,
        ] {
            assert_eq!(TournamentStatus::parse(status.as_db_str()), Some(status));
        }
        assert_eq!(TournamentStatus::parse("running"), None);
    }

    #[test]
    fn test_match_status_db_round_trip() {
        for status in [MatchStatus::Pending, MatchStatus::Finished] {
            assert_eq!(MatchStatus::parse(status.as_db_str()), Some(status));
        }
        assert_eq!(MatchStatus::parse(""), None);
    }

    #[test]
    fn test_match_involves() {
        let m = Match {
            id: 1,
            tournament_id: 1,
            round_number: 1,
            match_number: 1,
            player1_id: 10,
            player2_id: 11,
            winner_id: None,
            player1_score: 0,
            player2_score: 0,
            status: MatchStatus::Pending,
            started_at: Utc::now(),
            finished_at: None,
        };

        assert!(m.involves(10));
        assert!(m.involves(11));
        assert!(!m.involves(12));
    }

    #[test]
    fn test_join_check_constructors() {
        let granted = JoinCheck::granted();
        assert!(granted.allowed);
        assert_eq!(granted.reason, None);

        let refused = JoinCheck::refused(JoinRefusal::TournamentFull);
        assert!(!refused.allowed);
        assert_eq!(refused.reason, Some(JoinRefusal::TournamentFull));
    }
}
