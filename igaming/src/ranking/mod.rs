//! Ranking view: a read-only leaderboard over player balances.

use crate::ledger::{Ledger, LedgerResult, Player, PlayerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub balance: Decimal,
    /// Dense rank starting at 1
    pub rank: u32,
}

/// Dense-rank players by balance
///
/// Equal balances share a rank and the next distinct balance takes the next
/// integer. Ties are listed by player ID.
pub fn dense_rank(mut players: Vec<Player>) -> Vec<RankingEntry> {
    players.sort_by(|a, b| b.balance.cmp(&a.balance).then(a.id.cmp(&b.id)));

    let mut rank = 0;
    let mut previous: Option<Decimal> = None;
    players
        .into_iter()
        .map(|player| {
            if previous != Some(player.balance) {
                rank += 1;
                previous = Some(player.balance);
            }
            RankingEntry {
                player_id: player.id,
                player_name: player.name,
                balance: player.balance,
                rank,
            }
        })
        .collect()
}

/// Leaderboard reader
#[derive(Clone)]
pub struct RankingView {
    ledger: Ledger,
}

impl RankingView {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// All players ordered by balance, highest first, with dense ranks
    pub async fn get_rankings(&self) -> LedgerResult<Vec<RankingEntry>> {
        let players = self.ledger.players_by_balance().await?;
        Ok(dense_rank(players))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn player(id: PlayerId, balance: Decimal) -> Player {
        let now = Utc::now();
        Player {
            id,
            name: format!("player{id}"),
            email: format!("player{id}@example.com"),
            balance,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_dense_rank_with_ties() {
        let ranked = dense_rank(vec![
            player(4, dec!(50)),
            player(1, dec!(100)),
            player(3, dec!(100)),
            player(2, dec!(75)),
            player(5, dec!(50)),
        ]);

        let rows: Vec<(PlayerId, u32)> = ranked.iter().map(|e| (e.player_id, e.rank)).collect();
        assert_eq!(rows, vec![(1, 1), (3, 1), (2, 2), (4, 3), (5, 3)]);
        assert_eq!(ranked[0].player_name, "player1");
    }

    #[test]
    fn test_scale_does_not_split_ties() {
        let ranked = dense_rank(vec![player(1, dec!(10.00)), player(2, dec!(10))]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 1);
    }

    #[test]
    fn test_empty() {
        assert!(dense_rank(Vec::new()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_ranks_are_dense(balances in prop::collection::vec(0i64..50, 0..40)) {
            let players: Vec<Player> = balances
                .iter()
                .enumerate()
                .map(|(i, b)| player(i as PlayerId + 1, Decimal::from(*b)))
                .collect();
            let ranked = dense_rank(players);

            if let Some(first) = ranked.first() {
                prop_assert_eq!(first.rank, 1);
            }
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].balance >= pair[1].balance);
                if pair[0].balance == pair[1].balance {
                    prop_assert_eq!(pair[0].rank, pair[1].rank);
                    prop_assert!(pair[0].player_id < pair[1].player_id);
                } else {
                    prop_assert_eq!(pair[0].rank + 1, pair[1].rank);
                }
            }
        }
    }
}
