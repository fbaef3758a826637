//! Property tests for the pure bracket logic.
//!
//! These drive pairing and advancement through full simulated tournaments
//! without touching the database.

use pong_arena::tournament::bracket::{self, RoundOutcome};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Play a whole tournament: round 1 is shuffled, later rounds pair
/// survivors in winner order, and player1 always wins. Returns the champion
/// and the total number of matches played.
fn simulate_tournament(entrants: Vec<i64>, seed: u64) -> (i64, usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (mut pairs, mut bye) = bracket::pair_shuffled(entrants, &mut rng);
    let mut matches_played = 0;

    loop {
        matches_played += pairs.len();

        let mut survivors: Vec<i64> = pairs.iter().map(|&(p1, _)| p1).collect();
        survivors.extend(bye);

        match bracket::advance(&survivors).expect("survivors never empty") {
            RoundOutcome::Champion(winner) => return (winner, matches_played),
            RoundOutcome::NextRound {
                pairs: next_pairs,
                bye: next_bye,
            } => {
                pairs = next_pairs;
                bye = next_bye;
            }
        }
    }
}

proptest! {
    #[test]
    fn round_one_has_floor_half_matches_and_parity_byes(
        n in 2usize..=64,
        seed in any::<u64>(),
    ) {
        let entrants: Vec<i64> = (1..=n as i64).collect();
        let mut rng = StdRng::seed_from_u64(seed);

        let (pairs, bye) = bracket::pair_shuffled(entrants.clone(), &mut rng);

        prop_assert_eq!(pairs.len(), n / 2);
        prop_assert_eq!(bye.iter().count(), n % 2);

        // Every entrant appears exactly once across pairs and the bye.
        let mut seen: Vec<i64> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        seen.extend(bye);
        seen.sort_unstable();
        prop_assert_eq!(seen, entrants);
    }

    #[test]
    fn same_seed_generates_same_bracket(n in 2usize..=64, seed in any::<u64>()) {
        let entrants: Vec<i64> = (1..=n as i64).collect();

        let mut rng1 = StdRng::seed_from_u64(seed);
        let mut rng2 = StdRng::seed_from_u64(seed);

        prop_assert_eq!(
            bracket::pair_shuffled(entrants.clone(), &mut rng1),
            bracket::pair_shuffled(entrants, &mut rng2)
        );
    }

    #[test]
    fn advancement_pairs_half_the_survivors(w in 2usize..=32) {
        let survivors: Vec<i64> = (1..=w as i64).collect();

        match bracket::advance(&survivors).expect("non-empty survivors") {
            RoundOutcome::Champion(_) => prop_assert!(false, "more than one survivor"),
            RoundOutcome::NextRound { pairs, bye } => {
                prop_assert_eq!(pairs.len(), w / 2);
                prop_assert_eq!(bye.iter().count(), w % 2);
            }
        }
    }

    #[test]
    fn every_tournament_ends_with_one_champion_after_n_minus_one_matches(
        n in 2usize..=64,
        seed in any::<u64>(),
    ) {
        let entrants: Vec<i64> = (1..=n as i64).collect();

        let (champion, matches_played) = simulate_tournament(entrants.clone(), seed);

        // Strict elimination: every match removes exactly one player.
        prop_assert_eq!(matches_played, n - 1);
        prop_assert!(entrants.contains(&champion));
    }
}

#[test]
fn two_entrants_play_exactly_one_match() {
    let (champion, matches_played) = simulate_tournament(vec![1, 2], 7);
    assert_eq!(matches_played, 1);
    assert!([1, 2].contains(&champion));
}

#[test]
fn five_entrants_take_three_rounds_with_byes() {
    // 5 players: 2 matches + bye, then 1 match + bye, then the final.
    let entrants: Vec<i64> = (1..=5).collect();
    let mut rng = StdRng::seed_from_u64(11);

    let (round1, bye1) = bracket::pair_shuffled(entrants, &mut rng);
    assert_eq!(round1.len(), 2);
    assert!(bye1.is_some());

    let mut survivors: Vec<i64> = round1.iter().map(|&(p1, _)| p1).collect();
    survivors.extend(bye1);
    let outcome = bracket::advance(&survivors).expect("three survivors");
    let RoundOutcome::NextRound { pairs: round2, bye: bye2 } = outcome else {
        panic!("three survivors cannot crown a champion");
    };
    assert_eq!(round2.len(), 1);
    assert!(bye2.is_some());

    let mut survivors: Vec<i64> = round2.iter().map(|&(p1, _)| p1).collect();
    survivors.extend(bye2);
    let outcome = bracket::advance(&survivors).expect("two survivors");
    let RoundOutcome::NextRound { pairs: round3, bye: bye3 } = outcome else {
        panic!("two survivors cannot crown a champion");
    };
    assert_eq!(round3.len(), 1);
    assert_eq!(bye3, None);

    let survivors = vec![round3[0].0];
    assert_eq!(
        bracket::advance(&survivors),
        Some(RoundOutcome::Champion(round3[0].0))
    );
}
