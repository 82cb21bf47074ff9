use crate::domain::model::{LottoTicket, WinningStatistics, VALID_WINNING_RANKS};

/// Aggregates winning statistics over `tickets` in a single pass.
///
/// Every game counts toward `total_games_played`; only games on checked
/// tickets count toward the checked/winning figures.
pub fn calculate_statistics(tickets: &[LottoTicket]) -> WinningStatistics {
    if tickets.is_empty() {
        return WinningStatistics::empty();
    }

    let mut stats = WinningStatistics::empty();
    stats.total_tickets = tickets.len();

    for ticket in tickets {
        stats.total_games_played += ticket.games.len();

        if !ticket.is_checked {
            continue;
        }

        for game in &ticket.games {
            stats.checked_games_count += 1;

            if VALID_WINNING_RANKS.contains(&game.winning_rank) {
                stats.winning_games_count += 1;
                *stats.rank_breakdown.entry(game.winning_rank).or_insert(0) += 1;
            }
        }
    }

    // 沒有已對獎的注就維持 0，避免除以零
    if stats.checked_games_count > 0 {
        stats.winning_rate =
            (stats.winning_games_count as f32 / stats.checked_games_count as f32) * 100.0;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GameType, LottoGame};
    use chrono::NaiveDate;

    fn game(rank: i32) -> LottoGame {
        LottoGame {
            game_id: 0,
            label: "A".to_string(),
            numbers: vec![1, 2, 3, 4, 5, 6],
            game_type: GameType::Auto,
            winning_rank: rank,
        }
    }

    fn ticket(is_checked: bool, ranks: &[i32]) -> LottoTicket {
        LottoTicket {
            ticket_id: 0,
            round: 1100,
            registered_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            is_checked,
            games: ranks.iter().map(|&rank| game(rank)).collect(),
            qr_url: None,
        }
    }

    #[test]
    fn test_empty_tickets_return_empty_statistics() {
        assert_eq!(calculate_statistics(&[]), WinningStatistics::empty());
    }

    #[test]
    fn test_unchecked_tickets_only_count_games_played() {
        let stats = calculate_statistics(&[ticket(false, &[1, 2, 0])]);

        assert_eq!(stats.total_tickets, 1);
        assert_eq!(stats.total_games_played, 3);
        assert_eq!(stats.checked_games_count, 0);
        assert_eq!(stats.winning_games_count, 0);
        assert_eq!(stats.winning_rate, 0.0);
        assert!(!stats.has_data());
    }

    #[test]
    fn test_mixed_tickets() {
        let tickets = vec![
            ticket(true, &[1, 5, 0, 0]),
            ticket(true, &[0, 5, 0, 0]),
            ticket(false, &[3, 3]),
        ];

        let stats = calculate_statistics(&tickets);

        assert_eq!(stats.total_tickets, 3);
        assert_eq!(stats.total_games_played, 10);
        assert_eq!(stats.checked_games_count, 8);
        assert_eq!(stats.winning_games_count, 3);
        assert!((stats.winning_rate - 37.5).abs() < f32::EPSILON);
        assert_eq!(stats.formatted_winning_rate(), "37.5%");
        assert_eq!(stats.rank_breakdown[&1], 1);
        assert_eq!(stats.rank_breakdown[&3], 0);
        assert_eq!(stats.rank_breakdown[&5], 2);
        assert_eq!(stats.rank_breakdown.len(), 5);
    }

    #[test]
    fn test_out_of_range_ranks_are_not_wins() {
        let stats = calculate_statistics(&[ticket(true, &[6, -1, 0])]);
        assert_eq!(stats.checked_games_count, 3);
        assert_eq!(stats.winning_games_count, 0);
        assert!(!stats.has_wins());
    }
}
