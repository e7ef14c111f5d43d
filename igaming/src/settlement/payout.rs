//! Pure ranking and payout computation.
//!
//! Both functions are deterministic: identical bets always yield identical
//! placements and prizes.

use super::models::{Participant, Payout, PayoutSchedule};
use crate::ledger::PlayerId;
use crate::money;
use crate::wager::Bet;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Aggregate bets per player and order them by placement
///
/// Higher total wagered ranks first; ties go to the earlier first bet, then to
/// the lower player ID.
pub fn rank_participants(bets: &[Bet]) -> Vec<Participant> {
    let mut by_player: BTreeMap<PlayerId, Participant> = BTreeMap::new();

    for bet in bets {
        by_player
            .entry(bet.player_id)
            .and_modify(|p| {
                p.total_wagered += bet.amount;
                p.first_bet_at = p.first_bet_at.min(bet.created_at);
            })
            .or_insert_with(|| Participant {
                player_id: bet.player_id,
                total_wagered: bet.amount,
                first_bet_at: bet.created_at,
            });
    }

    let mut participants: Vec<Participant> = by_player.into_values().collect();
    participants.sort_by(|a, b| {
        b.total_wagered
            .cmp(&a.total_wagered)
            .then(a.first_bet_at.cmp(&b.first_bet_at))
            .then(a.player_id.cmp(&b.player_id))
    });
    participants
}

/// Assign placements 1..=N and the prize for each
///
/// Each prize is `prize_pool * fraction`, truncated to cents. Whatever the
/// truncation leaves over stays unpaid, so the prizes never sum above the pool.
pub fn compute_payouts(
    prize_pool: Decimal,
    schedule: &PayoutSchedule,
    ranked: &[Participant],
) -> Vec<Payout> {
    ranked
        .iter()
        .enumerate()
        .map(|(index, participant)| {
            let placement = index + 1;
            Payout {
                player_id: participant.player_id,
                placement: placement as i32,
                total_wagered: participant.total_wagered,
                prize_amount: money::truncate(prize_pool * schedule.fraction_for(placement)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn bet(id: i64, player_id: PlayerId, amount: Decimal, at: DateTime<Utc>) -> Bet {
        Bet {
            id,
            player_id,
            tournament_id: 1,
            amount,
            created_at: at,
        }
    }

    #[test]
    fn test_three_player_payout() {
        let t0 = Utc::now();
        let bets = vec![
            bet(1, 10, dec!(10), t0),
            bet(2, 20, dec!(20), t0 + Duration::seconds(1)),
            bet(3, 30, dec!(30), t0 + Duration::seconds(2)),
        ];

        let ranked = rank_participants(&bets);
        let payouts = compute_payouts(dec!(1200), &PayoutSchedule::standard(), &ranked);

        let summary: Vec<(PlayerId, i32, Decimal)> = payouts
            .iter()
            .map(|p| (p.player_id, p.placement, p.prize_amount))
            .collect();
        assert_eq!(
            summary,
            vec![(30, 1, dec!(600)), (20, 2, dec!(360)), (10, 3, dec!(240))]
        );
    }

    #[test]
    fn test_bets_aggregate_per_player() {
        let t0 = Utc::now();
        let bets = vec![
            bet(1, 1, dec!(25), t0),
            bet(2, 2, dec!(40), t0 + Duration::seconds(1)),
            bet(3, 1, dec!(25), t0 + Duration::seconds(2)),
        ];

        let ranked = rank_participants(&bets);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].player_id, 1);
        assert_eq!(ranked[0].total_wagered, dec!(50));
        assert_eq!(ranked[0].first_bet_at, t0);
    }

    #[test]
    fn test_ties_go_to_earliest_bet_then_lowest_id() {
        let t0 = Utc::now();
        let bets = vec![
            bet(1, 9, dec!(50), t0 + Duration::seconds(5)),
            bet(2, 7, dec!(50), t0),
            bet(3, 3, dec!(50), t0 + Duration::seconds(5)),
        ];

        let order: Vec<PlayerId> = rank_participants(&bets)
            .iter()
            .map(|p| p.player_id)
            .collect();
        assert_eq!(order, vec![7, 3, 9]);
    }

    #[test]
    fn test_placements_beyond_schedule_get_nothing() {
        let t0 = Utc::now();
        let bets: Vec<Bet> = (1..=5)
            .map(|i| bet(i, i, Decimal::from(i), t0 + Duration::seconds(i)))
            .collect();

        let payouts = compute_payouts(
            dec!(100),
            &PayoutSchedule::winner_takes_all(),
            &rank_participants(&bets),
        );
        assert_eq!(payouts.len(), 5);
        assert_eq!(payouts[0].player_id, 5);
        assert_eq!(payouts[0].prize_amount, dec!(100));
        assert!(payouts[1..].iter().all(|p| p.prize_amount.is_zero()));
        assert_eq!(
            payouts.iter().map(|p| p.placement).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_uneven_split_truncates() {
        let schedule =
            PayoutSchedule::new(vec![dec!(0.3333), dec!(0.3333), dec!(0.3333)]).unwrap();
        let t0 = Utc::now();
        let bets = vec![
            bet(1, 1, dec!(3), t0),
            bet(2, 2, dec!(2), t0),
            bet(3, 3, dec!(1), t0),
        ];

        let payouts = compute_payouts(dec!(100.01), &schedule, &rank_participants(&bets));
        for payout in &payouts {
            assert_eq!(payout.prize_amount, dec!(33.33));
        }
    }

    #[test]
    fn test_no_bets_no_participants() {
        assert!(rank_participants(&[]).is_empty());
        assert!(compute_payouts(dec!(10), &PayoutSchedule::standard(), &[]).is_empty());
    }

    fn arb_bets() -> impl Strategy<Value = Vec<Bet>> {
        prop::collection::vec((1i64..20, 1i64..100_000, 0i64..3_600), 1..60).prop_map(|raw| {
            let t0 = DateTime::<Utc>::UNIX_EPOCH;
            raw.into_iter()
                .enumerate()
                .map(|(i, (player, cents, secs))| {
                    bet(
                        i as i64 + 1,
                        player,
                        Decimal::new(cents, 2),
                        t0 + Duration::seconds(secs),
                    )
                })
                .collect()
        })
    }

    fn arb_schedule() -> impl Strategy<Value = PayoutSchedule> {
        prop::collection::vec(0u32..=100, 1..8).prop_map(|weights| {
            let total: u32 = weights.iter().sum::<u32>().max(1);
            let fractions = weights
                .iter()
                .map(|w| money::truncate(Decimal::from(*w) / Decimal::from(total)))
                .collect();
            PayoutSchedule::new(fractions).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_prizes_never_exceed_pool(
            bets in arb_bets(),
            schedule in arb_schedule(),
            pool_cents in 1i64..100_000_000,
        ) {
            let pool = Decimal::new(pool_cents, 2);
            let payouts = compute_payouts(pool, &schedule, &rank_participants(&bets));
            let paid: Decimal = payouts.iter().map(|p| p.prize_amount).sum();
            prop_assert!(paid <= pool);
            prop_assert!(payouts.iter().all(|p| p.prize_amount >= Decimal::ZERO));
            prop_assert!(payouts.iter().all(|p| money::has_money_scale(p.prize_amount)));
        }

        #[test]
        fn prop_one_placement_per_player(bets in arb_bets()) {
            let ranked = rank_participants(&bets);
            let mut ids: Vec<PlayerId> = ranked.iter().map(|p| p.player_id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), ranked.len());

            let wagered: Decimal = ranked.iter().map(|p| p.total_wagered).sum();
            let staked: Decimal = bets.iter().map(|b| b.amount).sum();
            prop_assert_eq!(wagered, staked);
        }

        #[test]
        fn prop_ranking_is_order_independent(bets in arb_bets()) {
            let mut reversed = bets.clone();
            reversed.reverse();
            prop_assert_eq!(rank_participants(&bets), rank_participants(&reversed));
        }

        #[test]
        fn prop_totals_descend(bets in arb_bets()) {
            let ranked = rank_participants(&bets);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].total_wagered >= pair[1].total_wagered);
            }
        }
    }
}
