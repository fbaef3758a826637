//! Pure pairing and round-advancement decisions.
//!
//! Nothing in this module touches the database; the engine feeds it
//! participant IDs and persists whatever it decides. Keeping the decisions
//! pure makes bracket behavior reproducible under a seeded generator.

use super::models::ParticipantId;
use rand::Rng;
use rand::seq::SliceRandom;

/// One round-N pairing: `(player1, player2)` in match-number order.
pub type Pairing = (ParticipantId, ParticipantId);

/// Shuffle entrants and pair consecutive elements.
///
/// Used for round 1 only; fairness comes from the shuffle, not seeding by
/// skill. An odd leftover entrant receives no match this round and is
/// returned as the bye.
pub fn pair_shuffled<R: Rng + ?Sized>(
    mut entrants: Vec<ParticipantId>,
    rng: &mut R,
) -> (Vec<Pairing>, Option<ParticipantId>) {
    entrants.shuffle(rng);
    pair_in_order(&entrants)
}

/// Pair consecutive elements `(0,1), (2,3), ...` without reshuffling.
///
/// Used for rounds after the first, where the input is the survivor list in
/// winner order.
pub fn pair_in_order(entrants: &[ParticipantId]) -> (Vec<Pairing>, Option<ParticipantId>) {
    let mut pairs = Vec::with_capacity(entrants.len() / 2);
    let mut chunks = entrants.chunks_exact(2);
    for chunk in &mut chunks {
        pairs.push((chunk[0], chunk[1]));
    }
    let bye = chunks.remainder().first().copied();
    (pairs, bye)
}

/// What happens once a round has fully closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// One survivor remains; the tournament is over.
    Champion(ParticipantId),
    /// More than one survivor; these are the next round's matches.
    NextRound {
        pairs: Vec<Pairing>,
        bye: Option<ParticipantId>,
    },
}

/// Decide the follow-up to a closed round.
///
/// `survivors` is the winners in match-number order, followed by any bye
/// survivors. Returns `None` for an empty survivor list, which a consistent
/// bracket never produces.
pub fn advance(survivors: &[ParticipantId]) -> Option<RoundOutcome> {
    match survivors {
        [] => None,
        [champion] => Some(RoundOutcome::Champion(*champion)),
        _ => {
            let (pairs, bye) = pair_in_order(survivors);
            Some(RoundOutcome::NextRound { pairs, bye })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pair_in_order_even() {
        let (pairs, bye) = pair_in_order(&[1, 2, 3, 4]);
        assert_eq!(pairs, vec![(1, 2), (3, 4)]);
        assert_eq!(bye, None);
    }

    #[test]
    fn test_pair_in_order_odd_leaves_bye() {
        let (pairs, bye) = pair_in_order(&[1, 2, 3, 4, 5]);
        assert_eq!(pairs, vec![(1, 2), (3, 4)]);
        assert_eq!(bye, Some(5));
    }

    #[test]
    fn test_pair_in_order_two_entrants() {
        let (pairs, bye) = pair_in_order(&[7, 9]);
        assert_eq!(pairs, vec![(7, 9)]);
        assert_eq!(bye, None);
    }

    #[test]
    fn test_pair_shuffled_covers_every_entrant_once() {
        let entrants: Vec<i64> = (1..=9).collect();
        let mut rng = StdRng::seed_from_u64(17);

        let (pairs, bye) = pair_shuffled(entrants.clone(), &mut rng);
        assert_eq!(pairs.len(), 4);
        assert!(bye.is_some());

        let mut seen: Vec<i64> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        seen.extend(bye);
        seen.sort_unstable();
        assert_eq!(seen, entrants);
    }

    #[test]
    fn test_pair_shuffled_is_reproducible_under_seed() {
        let entrants: Vec<i64> = (1..=8).collect();

        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(
            pair_shuffled(entrants.clone(), &mut rng1),
            pair_shuffled(entrants, &mut rng2)
        );
    }

    #[test]
    fn test_advance_single_survivor_is_champion() {
        assert_eq!(advance(&[3]), Some(RoundOutcome::Champion(3)));
    }

    #[test]
    fn test_advance_empty_is_none() {
        assert_eq!(advance(&[]), None);
    }

    #[test]
    fn test_advance_pairs_in_winner_order() {
        let outcome = advance(&[5, 2, 8, 1]).expect("non-empty survivors");
        assert_eq!(
            outcome,
            RoundOutcome::NextRound {
                pairs: vec![(5, 2), (8, 1)],
                bye: None,
            }
        );
    }

    #[test]
    fn test_advance_odd_survivors_fold_bye_in() {
        let outcome = advance(&[4, 6, 9]).expect("non-empty survivors");
        assert_eq!(
            outcome,
            RoundOutcome::NextRound {
                pairs: vec![(4, 6)],
                bye: Some(9),
            }
        );
    }
}
