use crate::domain::model::{LottoResult, LottoTicket, WinningCheckResult};
use crate::utils::error::{LottoError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    None,
}

impl Rank {
    pub fn as_number(&self) -> i32 {
        match self {
            Rank::First => 1,
            Rank::Second => 2,
            Rank::Third => 3,
            Rank::Fourth => 4,
            Rank::Fifth => 5,
            Rank::None => 0,
        }
    }

    pub fn from_number(rank: i32) -> Self {
        match rank {
            1 => Rank::First,
            2 => Rank::Second,
            3 => Rank::Third,
            4 => Rank::Fourth,
            5 => Rank::Fifth,
            _ => Rank::None,
        }
    }
}

/// 頭獎 6 個，二獎 5 個 + 特別號，三獎 5 個，四獎 4 個，五獎 3 個
pub fn rank_for(matched_count: usize, bonus_matched: bool) -> Rank {
    match (matched_count, bonus_matched) {
        (6, _) => Rank::First,
        (5, true) => Rank::Second,
        (5, false) => Rank::Third,
        (4, _) => Rank::Fourth,
        (3, _) => Rank::Fifth,
        _ => Rank::None,
    }
}

pub fn check_winning(result: &LottoResult, user_numbers: &[i32]) -> WinningCheckResult {
    let matched_numbers: Vec<i32> = user_numbers
        .iter()
        .copied()
        .filter(|number| result.numbers.contains(number))
        .collect();
    let bonus_matched = user_numbers.contains(&result.bonus_number);
    let rank = rank_for(matched_numbers.len(), bonus_matched);

    WinningCheckResult {
        round: result.round,
        user_numbers: user_numbers.to_vec(),
        winning_numbers: result.numbers.clone(),
        bonus_number: result.bonus_number,
        matched_numbers,
        bonus_matched,
        rank: rank.as_number(),
    }
}

/// Ranks every game of `ticket` against `result` and returns the checked
/// ticket. The input ticket is left untouched.
pub fn check_ticket(ticket: &LottoTicket, result: &LottoResult) -> Result<LottoTicket> {
    if ticket.round != result.round {
        return Err(LottoError::RoundMismatch {
            ticket_round: ticket.round,
            draw_round: result.round,
        });
    }

    let mut checked = ticket.clone();
    for game in &mut checked.games {
        let outcome = check_winning(result, &game.numbers);
        tracing::debug!(
            "Ticket {} game {}: matched {:?}, bonus {}, rank {}",
            ticket.ticket_id,
            game.label,
            outcome.matched_numbers,
            outcome.bonus_matched,
            outcome.rank
        );
        game.winning_rank = outcome.rank;
    }
    checked.is_checked = true;

    Ok(checked)
}
