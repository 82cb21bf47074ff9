use crate::domain::ticket::TicketInfo;
use crate::utils::error::LottoError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// 每張彩券上各注的標籤順序
pub const GAME_LABELS: [&str; 5] = ["A", "B", "C", "D", "E"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameType {
    #[default]
    Auto,
    Manual,
}

impl GameType {
    pub fn code(&self) -> &'static str {
        match self {
            GameType::Auto => "A",
            GameType::Manual => "B",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameType::Auto => "자동",
            GameType::Manual => "수동",
        }
    }

    /// 不認得的代碼一律當成自動
    pub fn from_code(code: &str) -> Self {
        match code {
            "B" => GameType::Manual,
            _ => GameType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LottoGame {
    pub game_id: i64,
    pub label: String,
    pub numbers: Vec<i32>,
    pub game_type: GameType,
    /// 0 = 未中獎或尚未對獎
    pub winning_rank: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LottoTicket {
    pub ticket_id: i64,
    pub round: i32,
    pub registered_at: NaiveDateTime,
    pub is_checked: bool,
    pub games: Vec<LottoGame>,
    pub qr_url: Option<String>,
}

impl LottoTicket {
    /// Builds an unsaved ticket from a decoded ticket record. Games are
    /// labelled A, B, C... in the record's order and are all automatic.
    pub fn from_info(info: &TicketInfo, registered_at: NaiveDateTime) -> Self {
        Self::from_info_with_types(info, registered_at, &[])
    }

    /// Like [`LottoTicket::from_info`], with the game type of each game
    /// given by position. Games past the end of `game_types` are automatic.
    /// 手動選號的號碼會排序
    pub fn from_info_with_types(
        info: &TicketInfo,
        registered_at: NaiveDateTime,
        game_types: &[GameType],
    ) -> Self {
        let games = info
            .games()
            .iter()
            .enumerate()
            .map(|(index, numbers)| {
                let game_type = game_types.get(index).copied().unwrap_or_default();
                let mut numbers = numbers.clone();
                if game_type == GameType::Manual {
                    numbers.sort_unstable();
                }

                LottoGame {
                    game_id: 0,
                    label: GAME_LABELS
                        .get(index)
                        .map(|label| label.to_string())
                        .unwrap_or_else(|| (index + 1).to_string()),
                    numbers,
                    game_type,
                    winning_rank: 0,
                }
            })
            .collect();

        Self {
            ticket_id: 0,
            round: info.round(),
            registered_at,
            is_checked: false,
            games,
            qr_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TicketSortType {
    #[default]
    RegisteredDateDesc,
    RegisteredDateAsc,
    RoundDesc,
    RoundAsc,
}

impl TicketSortType {
    pub fn all() -> &'static [TicketSortType] {
        &[
            TicketSortType::RegisteredDateDesc,
            TicketSortType::RegisteredDateAsc,
            TicketSortType::RoundDesc,
            TicketSortType::RoundAsc,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketSortType::RegisteredDateDesc => "registered-date-desc",
            TicketSortType::RegisteredDateAsc => "registered-date-asc",
            TicketSortType::RoundDesc => "round-desc",
            TicketSortType::RoundAsc => "round-asc",
        }
    }

    /// 依排序方式重新排列; 期數排序時同期以登錄時間新到舊
    pub fn sort(&self, tickets: &mut [LottoTicket]) {
        match self {
            TicketSortType::RegisteredDateDesc => {
                tickets.sort_by(|a, b| b.registered_at.cmp(&a.registered_at))
            }
            TicketSortType::RegisteredDateAsc => {
                tickets.sort_by(|a, b| a.registered_at.cmp(&b.registered_at))
            }
            TicketSortType::RoundDesc => tickets.sort_by(|a, b| {
                b.round
                    .cmp(&a.round)
                    .then_with(|| b.registered_at.cmp(&a.registered_at))
            }),
            TicketSortType::RoundAsc => tickets.sort_by(|a, b| {
                a.round
                    .cmp(&b.round)
                    .then_with(|| b.registered_at.cmp(&a.registered_at))
            }),
        }
    }
}

impl fmt::Display for TicketSortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketSortType {
    type Err = LottoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketSortType::all()
            .iter()
            .copied()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| LottoError::InvalidConfigValueError {
                field: "sort".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unsupported sort. Valid values: {}",
                    TicketSortType::all()
                        .iter()
                        .map(|sort| sort.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstPrizeInfo {
    pub win_amount: i64,
    pub winner_count: i32,
    pub total_sales_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LottoResult {
    pub round: i32,
    pub draw_date: NaiveDate,
    /// 由小到大排序
    pub numbers: Vec<i32>,
    pub bonus_number: i32,
    pub first_prize: FirstPrizeInfo,
}

impl LottoResult {
    pub fn new(
        round: i32,
        draw_date: NaiveDate,
        mut numbers: Vec<i32>,
        bonus_number: i32,
        first_prize: FirstPrizeInfo,
    ) -> Self {
        numbers.sort_unstable();
        Self {
            round,
            draw_date,
            numbers,
            bonus_number,
            first_prize,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningCheckResult {
    pub round: i32,
    pub user_numbers: Vec<i32>,
    pub winning_numbers: Vec<i32>,
    pub bonus_number: i32,
    pub matched_numbers: Vec<i32>,
    pub bonus_matched: bool,
    pub rank: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyncResult {
    pub success_count: usize,
    pub failed_count: usize,
    pub total_count: usize,
}

impl SyncResult {
    pub fn is_full_success(&self) -> bool {
        self.failed_count == 0
    }

    pub fn is_partial_success(&self) -> bool {
        self.success_count > 0 && self.failed_count > 0
    }

    pub fn is_full_failure(&self) -> bool {
        self.success_count == 0 && self.total_count > 0
    }
}

/// Ranks that count as a win (1st through 5th prize).
pub const VALID_WINNING_RANKS: RangeInclusive<i32> = 1..=5;

/// Winning statistics aggregated over every ticket in the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinningStatistics {
    /// Games across all tickets, checked or not.
    pub total_games_played: usize,
    /// Games on tickets whose draw has been checked.
    pub checked_games_count: usize,
    /// Checked games ranked 1 through 5.
    pub winning_games_count: usize,
    /// Percentage (0-100) of checked games that won.
    pub winning_rate: f32,
    /// Wins per rank; always holds every key in [`VALID_WINNING_RANKS`].
    pub rank_breakdown: BTreeMap<i32, usize>,
    pub total_tickets: usize,
}

impl WinningStatistics {
    pub fn empty() -> Self {
        Self {
            total_games_played: 0,
            checked_games_count: 0,
            winning_games_count: 0,
            winning_rate: 0.0,
            rank_breakdown: VALID_WINNING_RANKS.map(|rank| (rank, 0)).collect(),
            total_tickets: 0,
        }
    }

    /// One decimal place with a `%` suffix, e.g. `"12.5%"`.
    pub fn formatted_winning_rate(&self) -> String {
        format!("{:.1}%", self.winning_rate)
    }

    pub fn has_data(&self) -> bool {
        self.checked_games_count > 0
    }

    pub fn has_wins(&self) -> bool {
        self.winning_games_count > 0
    }
}
