//! Tournament engine: admission control, bracket generation, result
//! recording, and round advancement.
//!
//! Every mutating operation is one transaction against the store. The
//! tournament row is taken `FOR UPDATE` at the start of the transaction, so
//! concurrent registrations and concurrent result submissions for the same
//! tournament serialize on that row lock. Notifications are buffered during
//! the transaction and broadcast strictly after commit.

use super::bracket::{self, Pairing, RoundOutcome};
use super::errors::{TournamentError, TournamentResult};
use super::models::{
    JoinCheck, JoinRefusal, Match, MatchId, MatchStatus, Participant, ParticipantId, Tournament,
    TournamentDetails, TournamentId, TournamentStatus,
};
use crate::events::{NotificationSink, TournamentEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Minimum number of registered participants required to start a bracket
const MIN_PLAYERS: usize = 2;

/// Tournament engine
#[derive(Clone)]
pub struct TournamentEngine {
    pool: Arc<PgPool>,
    sink: Arc<dyn NotificationSink>,
    rng: Arc<Mutex<StdRng>>,
}

impl TournamentEngine {
    /// Create a new engine with an OS-seeded shuffle generator
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `sink` - Notification sink for post-commit broadcasts
    pub fn new(pool: Arc<PgPool>, sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_rng(pool, sink, StdRng::from_os_rng())
    }

    /// Create a new engine with an explicit shuffle generator
    ///
    /// Seeding the generator makes bracket generation reproducible, which
    /// tests rely on; production uses [`TournamentEngine::new`].
    pub fn with_rng(pool: Arc<PgPool>, sink: Arc<dyn NotificationSink>, rng: StdRng) -> Self {
        Self {
            pool,
            sink,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Create a new tournament in `registration` status
    ///
    /// # Errors
    ///
    /// * `InvalidName` - empty display name
    /// * `InvalidCapacity` - capacity below 2
    pub async fn create_tournament(
        &self,
        name: &str,
        description: Option<&str>,
        max_players: i32,
        created_by: Option<i64>,
    ) -> TournamentResult<Tournament> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidName);
        }
        if max_players < MIN_PLAYERS as i32 {
            return Err(TournamentError::InvalidCapacity(max_players));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO tournaments (name, description, max_players, status, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, max_players, status, created_by, winner_id,
                      created_at, started_at, finished_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(max_players)
        .bind(TournamentStatus::Registration.as_db_str())
        .bind(created_by)
        .fetch_one(self.pool.as_ref())
        .await?;

        let tournament = map_tournament(&row);
        log::info!(
            "Created tournament {} '{}' (capacity {})",
            tournament.id,
            tournament.name,
            max_players
        );

        Ok(tournament)
    }

    /// Register a player into a tournament
    ///
    /// Admission checks and the insert run in one transaction, with the
    /// tournament row locked: concurrent callers racing on the last slot or
    /// the same alias serialize here instead of both passing the checks.
    ///
    /// # Errors
    ///
    /// * `TournamentNotFound` - no such tournament
    /// * `RegistrationClosed` - tournament past registration
    /// * `DuplicateAlias` - alias used within this tournament
    /// * `TournamentFull` - bracket at capacity
    pub async fn register_player(
        &self,
        tournament_id: TournamentId,
        alias: &str,
        user_id: Option<i64>,
    ) -> TournamentResult<Participant> {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(TournamentError::InvalidAlias);
        }

        let mut tx = self.pool.begin().await?;

        let (status, max_players) = lock_tournament(&mut tx, tournament_id).await?;
        if status != TournamentStatus::Registration {
            return Err(TournamentError::RegistrationClosed(tournament_id));
        }

        let taken = sqlx::query(
            "SELECT id FROM tournament_participants WHERE tournament_id = $1 AND alias = $2",
        )
        .bind(tournament_id)
        .bind(alias)
        .fetch_optional(&mut *tx)
        .await?;
        if taken.is_some() {
            return Err(TournamentError::DuplicateAlias(alias.to_string()));
        }

        let count = participant_count(&mut tx, tournament_id).await?;
        if count >= max_players as i64 {
            return Err(TournamentError::TournamentFull {
                capacity: max_players,
            });
        }

        let row = sqlx::query(
            r#"
            INSERT INTO tournament_participants (tournament_id, user_id, alias, registration_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tournament_id, user_id, alias, registration_order, eliminated,
                      registered_at
            "#,
        )
        .bind(tournament_id)
        .bind(user_id)
        .bind(alias)
        .bind((count + 1) as i32)
        .fetch_one(&mut *tx)
        .await?;

        let participant = map_participant(&row);
        tx.commit().await?;

        log::info!(
            "Registered '{}' into tournament {} ({}/{})",
            participant.alias,
            tournament_id,
            count + 1,
            max_players
        );
        self.sink
            .broadcast(
                tournament_id,
                TournamentEvent::PlayerRegistered {
                    alias: participant.alias.clone(),
                    registered: count + 1,
                    capacity: max_players,
                },
            )
            .await;

        Ok(participant)
    }

    /// Check whether a candidate alias may currently join, without mutating
    ///
    /// Mirrors the admission checks of [`TournamentEngine::register_player`];
    /// the answer is advisory and can be stale by the time a registration is
    /// attempted.
    pub async fn can_join(
        &self,
        tournament_id: TournamentId,
        alias: &str,
    ) -> TournamentResult<JoinCheck> {
        let row = sqlx::query("SELECT status, max_players FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        let Some(row) = row else {
            return Ok(JoinCheck::refused(JoinRefusal::TournamentNotFound));
        };

        let status = parse_status(&row);
        if status != TournamentStatus::Registration {
            return Ok(JoinCheck::refused(JoinRefusal::RegistrationClosed));
        }

        let taken = sqlx::query(
            "SELECT id FROM tournament_participants WHERE tournament_id = $1 AND alias = $2",
        )
        .bind(tournament_id)
        .bind(alias.trim())
        .fetch_optional(self.pool.as_ref())
        .await?;
        if taken.is_some() {
            return Ok(JoinCheck::refused(JoinRefusal::AliasTaken));
        }

        let count = sqlx::query(
            "SELECT COUNT(*) AS count FROM tournament_participants WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_one(self.pool.as_ref())
        .await?
        .get::<i64, _>("count");
        let max_players: i32 = row.get("max_players");
        if count >= max_players as i64 {
            return Ok(JoinCheck::refused(JoinRefusal::TournamentFull));
        }

        Ok(JoinCheck::granted())
    }

    /// Start a tournament: generate round 1 and flip to `in_progress`
    ///
    /// Participants are shuffled with the engine's generator and paired
    /// consecutively; an odd leftover entrant gets a first-round bye and is
    /// folded back in at advancement.
    ///
    /// # Errors
    ///
    /// * `TournamentNotFound` - no such tournament
    /// * `InvalidStatus` - tournament not in `registration`
    /// * `InsufficientPlayers` - fewer than 2 registered
    pub async fn start_tournament(&self, tournament_id: TournamentId) -> TournamentResult<()> {
        let mut tx = self.pool.begin().await?;

        let (status, _) = lock_tournament(&mut tx, tournament_id).await?;
        if status != TournamentStatus::Registration {
            return Err(TournamentError::InvalidStatus {
                expected: TournamentStatus::Registration,
                actual: status,
            });
        }

        let participants = participants_in_order(&mut tx, tournament_id).await?;
        if participants.len() < MIN_PLAYERS {
            return Err(TournamentError::InsufficientPlayers {
                needed: MIN_PLAYERS,
                current: participants.len(),
            });
        }

        let entrants: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
        let (pairs, bye) = {
            let mut rng = self.rng.lock().await;
            bracket::pair_shuffled(entrants, &mut *rng)
        };

        insert_round_matches(&mut tx, tournament_id, 1, &pairs).await?;
        if let Some(idle) = bye {
            log::debug!(
                "Tournament {}: participant {} receives a first-round bye",
                tournament_id,
                idle
            );
        }

        sqlx::query("UPDATE tournaments SET status = $1, started_at = NOW() WHERE id = $2")
            .bind(TournamentStatus::InProgress.as_db_str())
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!(
            "Started tournament {} with {} round-1 matches",
            tournament_id,
            pairs.len()
        );
        self.sink
            .broadcast(
                tournament_id,
                TournamentEvent::TournamentStarted {
                    match_count: pairs.len(),
                },
            )
            .await;
        if let Some(&(p1, p2)) = pairs.first() {
            self.sink
                .broadcast(
                    tournament_id,
                    TournamentEvent::MatchAnnounced {
                        round: 1,
                        match_number: 1,
                        player1_alias: alias_of(&participants, p1),
                        player2_alias: alias_of(&participants, p2),
                    },
                )
                .await;
        }

        Ok(())
    }

    /// Record the outcome of one pending match
    ///
    /// The declared winner must agree with the scores; mismatches are
    /// rejected, never corrected. Round advancement runs inside the same
    /// transaction, so "is the round complete" never races another result
    /// submission for the same tournament.
    ///
    /// # Errors
    ///
    /// * `InvalidScore` - tied or negative scores
    /// * `MatchNotFound` - no such match
    /// * `MatchAlreadyFinished` - result already recorded
    /// * `WinnerMismatch` - declared winner is not the higher-scoring player
    pub async fn record_match_result(
        &self,
        match_id: MatchId,
        winner_id: ParticipantId,
        score1: i32,
        score2: i32,
    ) -> TournamentResult<()> {
        if score1 < 0 || score2 < 0 || score1 == score2 {
            return Err(TournamentError::InvalidScore {
                player1: score1,
                player2: score2,
            });
        }

        let mut tx = self.pool.begin().await?;

        // Resolve the owning tournament first, then take its row lock; the
        // match row itself is only mutated under that lock.
        let row = sqlx::query("SELECT tournament_id FROM tournament_matches WHERE id = $1")
            .bind(match_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let tournament_id: TournamentId = row.get("tournament_id");

        lock_tournament(&mut tx, tournament_id).await?;

        let row = sqlx::query(
            r#"
            SELECT id, tournament_id, round_number, match_number, player1_id, player2_id,
                   winner_id, player1_score, player2_score, status, started_at, finished_at
            FROM tournament_matches
            WHERE id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(TournamentError::MatchNotFound(match_id))?;
        let m = map_match(&row);

        if m.status == MatchStatus::Finished {
            return Err(TournamentError::MatchAlreadyFinished(match_id));
        }

        let higher = if score1 > score2 {
            m.player1_id
        } else {
            m.player2_id
        };
        if winner_id != higher {
            return Err(TournamentError::WinnerMismatch {
                declared: winner_id,
                player1: score1,
                player2: score2,
            });
        }
        let loser = if winner_id == m.player1_id {
            m.player2_id
        } else {
            m.player1_id
        };

        sqlx::query(
            r#"
            UPDATE tournament_matches
            SET status = $1, winner_id = $2, player1_score = $3, player2_score = $4,
                finished_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(MatchStatus::Finished.as_db_str())
        .bind(winner_id)
        .bind(score1)
        .bind(score2)
        .bind(match_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE tournament_participants SET eliminated = TRUE WHERE id = $1")
            .bind(loser)
            .execute(&mut *tx)
            .await?;

        let events = self
            .advance_round(&mut tx, tournament_id, m.round_number)
            .await?;

        tx.commit().await?;

        log::info!(
            "Match {} finished: winner {} ({}-{})",
            match_id,
            winner_id,
            score1,
            score2
        );
        for event in events {
            self.sink.broadcast(tournament_id, event).await;
        }

        Ok(())
    }

    /// Cancel a tournament that has not started
    ///
    /// # Errors
    ///
    /// * `TournamentNotFound` - no such tournament
    /// * `InvalidStatus` - play already began or tournament already closed
    pub async fn cancel_tournament(&self, tournament_id: TournamentId) -> TournamentResult<()> {
        let mut tx = self.pool.begin().await?;

        let (status, _) = lock_tournament(&mut tx, tournament_id).await?;
        if status != TournamentStatus::Registration {
            return Err(TournamentError::InvalidStatus {
                expected: TournamentStatus::Registration,
                actual: status,
            });
        }

        sqlx::query("UPDATE tournaments SET status = $1, finished_at = NOW() WHERE id = $2")
            .bind(TournamentStatus::Cancelled.as_db_str())
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        log::info!("Cancelled tournament {}", tournament_id);

        Ok(())
    }

    /// Get one tournament record
    pub async fn get_tournament(&self, tournament_id: TournamentId) -> TournamentResult<Tournament> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, max_players, status, created_by, winner_id,
                   created_at, started_at, finished_at
            FROM tournaments
            WHERE id = $1
            "#,
        )
        .bind(tournament_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;

        Ok(map_tournament(&row))
    }

    /// Get a tournament with its participants and matches
    pub async fn get_tournament_details(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<TournamentDetails> {
        let tournament = self.get_tournament(tournament_id).await?;

        let participants = sqlx::query(
            r#"
            SELECT id, tournament_id, user_id, alias, registration_order, eliminated,
                   registered_at
            FROM tournament_participants
            WHERE tournament_id = $1
            ORDER BY registration_order
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?
        .iter()
        .map(map_participant)
        .collect();

        let matches = sqlx::query(
            r#"
            SELECT id, tournament_id, round_number, match_number, player1_id, player2_id,
                   winner_id, player1_score, player2_score, status, started_at, finished_at
            FROM tournament_matches
            WHERE tournament_id = $1
            ORDER BY round_number, match_number
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?
        .iter()
        .map(map_match)
        .collect();

        Ok(TournamentDetails {
            tournament,
            participants,
            matches,
        })
    }

    /// List tournaments, newest first, optionally filtered by status
    pub async fn list_tournaments(
        &self,
        status_filter: Option<TournamentStatus>,
    ) -> TournamentResult<Vec<Tournament>> {
        let rows = match status_filter {
            Some(status) => {
                sqlx::query(
                    r#"
                    SELECT id, name, description, max_players, status, created_by, winner_id,
                           created_at, started_at, finished_at
                    FROM tournaments
                    WHERE status = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(status.as_db_str())
                .fetch_all(self.pool.as_ref())
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, name, description, max_players, status, created_by, winner_id,
                           created_at, started_at, finished_at
                    FROM tournaments
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(self.pool.as_ref())
                .await?
            }
        };

        Ok(rows.iter().map(map_tournament).collect())
    }

    /// Get the next match to play: the pending match with the lowest
    /// `(round, match_number)`, or `None` once the bracket has no pending
    /// matches
    pub async fn get_next_match(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<Option<Match>> {
        // Distinguish "no pending match" from "no such tournament".
        sqlx::query("SELECT id FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(TournamentError::TournamentNotFound(tournament_id))?;

        let row = sqlx::query(
            r#"
            SELECT id, tournament_id, round_number, match_number, player1_id, player2_id,
                   winner_id, player1_score, player2_score, status, started_at, finished_at
            FROM tournament_matches
            WHERE tournament_id = $1 AND status = $2
            ORDER BY round_number, match_number
            LIMIT 1
            "#,
        )
        .bind(tournament_id)
        .bind(MatchStatus::Pending.as_db_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.as_ref().map(map_match))
    }

    /// Advance the bracket after a result, inside the caller's transaction
    ///
    /// If the round still has pending matches this is a no-op. Once all are
    /// finished, the survivors either crown a champion or become the next
    /// round's pairings. Returns the events to broadcast after commit.
    async fn advance_round(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tournament_id: TournamentId,
        round: i32,
    ) -> TournamentResult<Vec<TournamentEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, tournament_id, round_number, match_number, player1_id, player2_id,
                   winner_id, player1_score, player2_score, status, started_at, finished_at
            FROM tournament_matches
            WHERE tournament_id = $1 AND round_number = $2
            ORDER BY match_number
            "#,
        )
        .bind(tournament_id)
        .bind(round)
        .fetch_all(&mut **tx)
        .await?;
        let matches: Vec<Match> = rows.iter().map(map_match).collect();

        if matches.iter().any(|m| m.status == MatchStatus::Pending) {
            log::debug!(
                "Tournament {} round {} still open after result",
                tournament_id,
                round
            );
            return Ok(Vec::new());
        }

        let participants = participants_in_order(tx, tournament_id).await?;

        // Winners in match-number order, then active participants who had no
        // match this round (bye survivors, in registration order).
        let mut survivors: Vec<ParticipantId> =
            matches.iter().filter_map(|m| m.winner_id).collect();
        let playing: HashSet<ParticipantId> = matches
            .iter()
            .flat_map(|m| [m.player1_id, m.player2_id])
            .collect();
        survivors.extend(
            participants
                .iter()
                .filter(|p| !p.eliminated && !playing.contains(&p.id))
                .map(|p| p.id),
        );

        match bracket::advance(&survivors) {
            None => {
                log::warn!(
                    "Tournament {} round {} closed with no survivors",
                    tournament_id,
                    round
                );
                Ok(Vec::new())
            }
            Some(RoundOutcome::Champion(winner)) => {
                sqlx::query(
                    r#"
                    UPDATE tournaments
                    SET status = $1, winner_id = $2, finished_at = NOW()
                    WHERE id = $3
                    "#,
                )
                .bind(TournamentStatus::Finished.as_db_str())
                .bind(winner)
                .bind(tournament_id)
                .execute(&mut **tx)
                .await?;

                log::info!(
                    "Tournament {} finished, winner {} after round {}",
                    tournament_id,
                    winner,
                    round
                );
                Ok(vec![TournamentEvent::TournamentFinished {
                    winner_id: winner,
                    winner_alias: alias_of(&participants, winner),
                }])
            }
            Some(RoundOutcome::NextRound { pairs, bye }) => {
                let next_round = round + 1;
                insert_round_matches(tx, tournament_id, next_round, &pairs).await?;
                if let Some(idle) = bye {
                    log::debug!(
                        "Tournament {}: participant {} receives a round-{} bye",
                        tournament_id,
                        idle,
                        next_round
                    );
                }

                log::info!(
                    "Tournament {} round {} complete, generated {} round-{} matches",
                    tournament_id,
                    round,
                    pairs.len(),
                    next_round
                );
                let mut events = Vec::new();
                if let Some(&(p1, p2)) = pairs.first() {
                    events.push(TournamentEvent::MatchAnnounced {
                        round: next_round,
                        match_number: 1,
                        player1_alias: alias_of(&participants, p1),
                        player2_alias: alias_of(&participants, p2),
                    });
                }
                Ok(events)
            }
        }
    }
}

/// Lock a tournament row for the duration of the transaction
///
/// Returns the status and capacity read under the lock.
async fn lock_tournament(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: TournamentId,
) -> TournamentResult<(TournamentStatus, i32)> {
    let row = sqlx::query("SELECT status, max_players FROM tournaments WHERE id = $1 FOR UPDATE")
        .bind(tournament_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;

    Ok((parse_status(&row), row.get("max_players")))
}

async fn participant_count(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: TournamentId,
) -> TournamentResult<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM tournament_participants WHERE tournament_id = $1",
    )
    .bind(tournament_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(row.get("count"))
}

async fn participants_in_order(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: TournamentId,
) -> TournamentResult<Vec<Participant>> {
    let rows = sqlx::query(
        r#"
        SELECT id, tournament_id, user_id, alias, registration_order, eliminated, registered_at
        FROM tournament_participants
        WHERE tournament_id = $1
        ORDER BY registration_order
        "#,
    )
    .bind(tournament_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.iter().map(map_participant).collect())
}

async fn insert_round_matches(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: TournamentId,
    round: i32,
    pairs: &[Pairing],
) -> TournamentResult<()> {
    for (index, &(player1, player2)) in pairs.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO tournament_matches
                (tournament_id, round_number, match_number, player1_id, player2_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(tournament_id)
        .bind(round)
        .bind((index + 1) as i32)
        .bind(player1)
        .bind(player2)
        .bind(MatchStatus::Pending.as_db_str())
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

fn alias_of(participants: &[Participant], id: ParticipantId) -> String {
    participants
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.alias.clone())
        .unwrap_or_default()
}

fn parse_status(row: &PgRow) -> TournamentStatus {
    TournamentStatus::parse(&row.get::<String, _>("status"))
        .unwrap_or(TournamentStatus::Registration)
}

fn map_tournament(row: &PgRow) -> Tournament {
    Tournament {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        max_players: row.get("max_players"),
        status: parse_status(row),
        created_by: row.get("created_by"),
        winner_id: row.get("winner_id"),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        started_at: row
            .get::<Option<chrono::NaiveDateTime>, _>("started_at")
            .map(|dt| dt.and_utc()),
        finished_at: row
            .get::<Option<chrono::NaiveDateTime>, _>("finished_at")
            .map(|dt| dt.and_utc()),
    }
}

fn map_participant(row: &PgRow) -> Participant {
    Participant {
        id: row.get("id"),
        tournament_id: row.get("tournament_id"),
        user_id: row.get("user_id"),
        alias: row.get("alias"),
        registration_order: row.get("registration_order"),
        eliminated: row.get("eliminated"),
        registered_at: row
            .get::<chrono::NaiveDateTime, _>("registered_at")
            .and_utc(),
    }
}

fn map_match(row: &PgRow) -> Match {
    Match {
        id: row.get("id"),
        tournament_id: row.get("tournament_id"),
        round_number: row.get("round_number"),
        match_number: row.get("match_number"),
        player1_id: row.get("player1_id"),
        player2_id: row.get("player2_id"),
        winner_id: row.get("winner_id"),
        player1_score: row.get("player1_score"),
        player2_score: row.get("player2_score"),
        status: MatchStatus::parse(&row.get::<String, _>("status"))
            .unwrap_or(MatchStatus::Pending),
        started_at: row.get::<chrono::NaiveDateTime, _>("started_at").and_utc(),
        finished_at: row
            .get::<Option<chrono::NaiveDateTime>, _>("finished_at")
            .map(|dt| dt.and_utc()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use sqlx::postgres::PgPoolOptions;

    // A lazy pool never connects; these tests only exercise validation that
    // runs before any query is issued.
    fn engine() -> TournamentEngine {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/pong_arena_unreachable")
            .expect("lazy pool");
        TournamentEngine::with_rng(
            Arc::new(pool),
            Arc::new(NullSink),
            StdRng::seed_from_u64(0),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let result = engine().create_tournament("   ", None, 4, None).await;
        assert!(matches!(result, Err(TournamentError::InvalidName)));
    }

    #[tokio::test]
    async fn test_create_rejects_capacity_below_two() {
        for capacity in [-1, 0, 1] {
            let result = engine()
                .create_tournament("Friday Pong", None, capacity, None)
                .await;
            assert!(matches!(
                result,
                Err(TournamentError::InvalidCapacity(c)) if c == capacity
            ));
        }
    }

    #[tokio::test]
    async fn test_register_rejects_empty_alias() {
        let result = engine().register_player(1, "  ", None).await;
        assert!(matches!(result, Err(TournamentError::InvalidAlias)));
    }

    #[tokio::test]
    async fn test_record_result_rejects_tie() {
        let result = engine().record_match_result(1, 1, 7, 7).await;
        assert!(matches!(
            result,
            Err(TournamentError::InvalidScore {
                player1: 7,
                player2: 7
            })
        ));
    }

    #[tokio::test]
    async fn test_record_result_rejects_negative_score() {
        let result = engine().record_match_result(1, 1, -1, 5).await;
        assert!(matches!(result, Err(TournamentError::InvalidScore { .. })));
    }
}
