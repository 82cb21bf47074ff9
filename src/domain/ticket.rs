use crate::utils::error::{LottoError, Result};
use crate::utils::validation::{validate_game_numbers, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一張彩券: 期數 + 各注號碼
///
/// Constructed once and never mutated. Game order and the order of numbers
/// inside each game are kept exactly as given; nothing is sorted or
/// deduplicated. Equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketInfo {
    round: i32,
    games: Vec<Vec<i32>>,
}

impl TicketInfo {
    pub fn new(round: i32, games: Vec<Vec<i32>>) -> Self {
        Self { round, games }
    }

    pub fn round(&self) -> i32 {
        self.round
    }

    pub fn games(&self) -> &[Vec<i32>] {
        &self.games
    }

    /// Positional destructuring into `(round, games)`.
    pub fn into_parts(self) -> (i32, Vec<Vec<i32>>) {
        (self.round, self.games)
    }

    /// Returns a new record, overriding whichever fields are `Some`.
    pub fn copy(&self, round: Option<i32>, games: Option<Vec<Vec<i32>>>) -> Self {
        Self {
            round: round.unwrap_or(self.round),
            games: games.unwrap_or_else(|| self.games.clone()),
        }
    }

    pub fn with_round(&self, round: i32) -> Self {
        self.copy(Some(round), None)
    }

    pub fn with_games(&self, games: Vec<Vec<i32>>) -> Self {
        self.copy(None, Some(games))
    }
}

impl From<TicketInfo> for (i32, Vec<Vec<i32>>) {
    fn from(info: TicketInfo) -> Self {
        info.into_parts()
    }
}

impl fmt::Display for TicketInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TicketInfo(round={}, games={:?})", self.round, self.games)
    }
}

// 不在 new() 裡檢查，呼叫端需要時自己 validate()
impl Validate for TicketInfo {
    fn validate(&self) -> Result<()> {
        if self.round < 1 {
            return Err(LottoError::InvalidInput {
                field: "round".to_string(),
                reason: format!("round must be at least 1, got {}", self.round),
            });
        }

        for (index, game) in self.games.iter().enumerate() {
            validate_game_numbers(&format!("games[{}]", index), game)?;
        }

        Ok(())
    }
}
