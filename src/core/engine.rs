use crate::core::checker::check_ticket;
use crate::core::draw_calendar::{current_draw_number, kst_now, upcoming_draw_round};
use crate::core::statistics::calculate_statistics;
use crate::core::sync::ResultSyncer;
use crate::core::ticket_book::{TicketBook, TICKETS_FILE};
use crate::domain::model::{GameType, LottoTicket, SyncResult, WinningStatistics};
use crate::domain::ports::{ConfigProvider, DrawSource, Storage};
use crate::domain::ticket::TicketInfo;
use crate::utils::error::{LottoError, Result};
use crate::utils::validation::{validate_range, Validate};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub const REPORT_JSON: &str = "report.json";
pub const REPORT_CSV: &str = "report.csv";

/// 匯入檔的一筆: 彩券內容 + (可選) 每注的選號方式代碼與 QR 網址
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketImport {
    #[serde(flatten)]
    pub info: TicketInfo,
    /// "A" 自動 / "B" 手動，依注的順序；沒給的當自動
    #[serde(default)]
    pub game_types: Vec<String>,
    #[serde(default)]
    pub qr_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub ticket_id: i64,
    pub round: i32,
    pub label: String,
    pub game_type: String,
    pub game_type_name: String,
    pub numbers: String,
    pub is_checked: bool,
    pub winning_rank: i32,
}

#[derive(Debug, Clone, Serialize)]
struct Report<'a> {
    generated_at: NaiveDateTime,
    current_round: i32,
    statistics: &'a WinningStatistics,
    games: &'a [ReportRow],
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub current_round: i32,
    pub checked_tickets: usize,
    pub sync: Option<SyncResult>,
    pub statistics: WinningStatistics,
}

pub struct LottoEngine<S: Storage + Clone, D: DrawSource, C: ConfigProvider> {
    storage: S,
    source: Arc<D>,
    config: C,
}

impl<S: Storage + Clone, D: DrawSource + 'static, C: ConfigProvider> LottoEngine<S, D, C> {
    pub fn new(storage: S, source: D, config: C) -> Self {
        Self {
            storage,
            source: Arc::new(source),
            config,
        }
    }

    /// Registers every ticket in a JSON array of [`TicketImport`] documents.
    ///
    /// Tickets that fail validation or whose QR url is already registered
    /// are logged and skipped. Returns how many were added.
    pub async fn import_tickets(&self, data: &[u8], registered_at: NaiveDateTime) -> Result<usize> {
        let imports: Vec<TicketImport> = serde_json::from_slice(data)?;
        let mut book = TicketBook::load(&self.storage, TICKETS_FILE).await?;
        let mut imported = 0;

        for import in imports {
            if let Err(e) = import.info.validate() {
                tracing::warn!("⚠️ Skipping {}: {}", import.info, e);
                continue;
            }

            let game_types: Vec<GameType> = import
                .game_types
                .iter()
                .map(|code| GameType::from_code(code))
                .collect();

            match book.register(&import.info, &game_types, registered_at, import.qr_url) {
                Ok(ticket_id) => {
                    tracing::info!("🎫 Registered ticket {} for round {}", ticket_id, import.info.round());
                    imported += 1;
                }
                Err(e @ LottoError::DuplicateTicket { .. }) => {
                    tracing::warn!("⚠️ {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        book.save(&self.storage, TICKETS_FILE).await?;
        Ok(imported)
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.run_at(kst_now()).await
    }

    /// Syncs draw results, checks every unchecked ticket whose draw has
    /// happened, then writes the JSON and CSV reports.
    pub async fn run_at(&self, now: NaiveDateTime) -> Result<RunSummary> {
        tracing::info!("Starting lotto check run...");

        let current_round = match self.config.current_round() {
            Some(round) => {
                validate_range("current_round", round, 1, upcoming_draw_round(now))?;
                round
            }
            None => current_draw_number(now),
        };
        tracing::info!("Current draw round: {}", current_round);

        let mut book = TicketBook::load(&self.storage, TICKETS_FILE).await?;
        tracing::info!("Loaded {} tickets", book.len());

        let mut syncer = ResultSyncer::open(
            self.storage.clone(),
            Arc::clone(&self.source),
            self.config.batch_size(),
        )
        .await?;

        let sync = if self.config.sync_enabled() {
            Some(syncer.sync_all(current_round).await?)
        } else {
            None
        };

        let mut checked_tickets = 0;
        for ticket in book.unchecked() {
            if ticket.round > current_round {
                tracing::debug!("Ticket {} round {} not drawn yet", ticket.ticket_id, ticket.round);
                continue;
            }

            let result = match syncer.get_result(ticket.round).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("⚠️ Cannot check ticket {}: {}", ticket.ticket_id, e);
                    continue;
                }
            };

            let checked = match check_ticket(&ticket, &result) {
                Ok(checked) => checked,
                Err(e) => {
                    tracing::warn!("⚠️ Cannot check ticket {}: {}", ticket.ticket_id, e);
                    continue;
                }
            };
            for game in checked.games.iter().filter(|g| g.winning_rank > 0) {
                tracing::info!(
                    "🎉 Ticket {} game {} won rank {} in round {}",
                    checked.ticket_id,
                    game.label,
                    game.winning_rank,
                    checked.round
                );
            }
            book.replace(checked)?;
            checked_tickets += 1;
        }

        book.save(&self.storage, TICKETS_FILE).await?;
        tracing::info!("Checked {} tickets", checked_tickets);

        let tickets = book.all(self.config.sort_type());
        let statistics = calculate_statistics(&tickets);
        let rows = report_rows(&tickets);

        self.write_reports(now, current_round, &statistics, &rows).await?;

        let output_path = Path::new(self.config.data_path())
            .join(REPORT_JSON)
            .to_string_lossy()
            .to_string();
        tracing::info!("Report saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            current_round,
            checked_tickets,
            sync,
            statistics,
        })
    }

    async fn write_reports(
        &self,
        now: NaiveDateTime,
        current_round: i32,
        statistics: &WinningStatistics,
        rows: &[ReportRow],
    ) -> Result<()> {
        let report = Report {
            generated_at: now,
            current_round,
            statistics,
            games: rows,
        };
        let json = serde_json::to_vec_pretty(&report)?;
        self.storage.write_file(REPORT_JSON, &json).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        let csv_data = writer.into_inner().map_err(|e| e.into_error())?;
        self.storage.write_file(REPORT_CSV, &csv_data).await?;

        Ok(())
    }
}

/// 每一注一列
pub fn report_rows(tickets: &[LottoTicket]) -> Vec<ReportRow> {
    tickets
        .iter()
        .flat_map(|ticket| {
            ticket.games.iter().map(move |game| ReportRow {
                ticket_id: ticket.ticket_id,
                round: ticket.round,
                label: game.label.clone(),
                game_type: game.game_type.code().to_string(),
                game_type_name: game.game_type.display_name().to_string(),
                numbers: game
                    .numbers
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
                is_checked: ticket.is_checked,
                winning_rank: game.winning_rank,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FirstPrizeInfo, LottoResult, TicketSortType};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).await.ok_or_else(|| LottoError::NotFound {
                entity: "file".to_string(),
                id: path.to_string(),
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn exists(&self, path: &str) -> bool {
            self.files.lock().await.contains_key(path)
        }
    }

    struct FixedSource;

    #[async_trait]
    impl DrawSource for FixedSource {
        async fn fetch_draw(&self, round: i32) -> Result<LottoResult> {
            if round > 1101 {
                return Err(LottoError::DrawNotAvailable { round });
            }
            Ok(LottoResult::new(
                round,
                NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
                vec![1, 7, 13, 30, 36, 44],
                9,
                FirstPrizeInfo {
                    win_amount: 2_590_128_375,
                    winner_count: 11,
                    total_sales_amount: 118_628_811_000,
                },
            ))
        }
    }

    struct TestConfig {
        sync: bool,
    }

    impl ConfigProvider for TestConfig {
        fn api_endpoint(&self) -> &str {
            "http://localhost"
        }
        fn data_path(&self) -> &str {
            "./data"
        }
        fn current_round(&self) -> Option<i32> {
            None
        }
        fn sync_enabled(&self) -> bool {
            self.sync
        }
        fn batch_size(&self) -> usize {
            50
        }
        fn request_timeout_seconds(&self) -> u64 {
            5
        }
        fn sort_type(&self) -> TicketSortType {
            TicketSortType::RoundAsc
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 8)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    const IMPORT: &str = r#"[
        {"round": 1101, "games": [[1, 7, 13, 30, 36, 9], [1, 7, 13, 2, 3, 4]], "qr_url": "qr-1"},
        {"round": 1102, "games": [[1, 2, 3, 4, 5, 6]]},
        {"round": 1101, "games": [[1, 2, 3]]},
        {"round": 1101, "games": [[10, 11, 12, 14, 15, 16]], "qr_url": "qr-1"}
    ]"#;

    #[tokio::test]
    async fn test_import_skips_invalid_and_duplicates() {
        let storage = MockStorage::default();
        let engine = LottoEngine::new(storage.clone(), FixedSource, TestConfig { sync: false });

        let imported = engine.import_tickets(IMPORT.as_bytes(), now()).await.unwrap();

        assert_eq!(imported, 2);
        let book = TicketBook::load(&storage, TICKETS_FILE).await.unwrap();
        assert_eq!(book.len(), 2);
    }

    #[tokio::test]
    async fn test_run_checks_drawn_tickets_only() {
        let storage = MockStorage::default();
        let engine = LottoEngine::new(storage.clone(), FixedSource, TestConfig { sync: false });
        engine.import_tickets(IMPORT.as_bytes(), now()).await.unwrap();

        let summary = engine.run_at(now()).await.unwrap();

        assert_eq!(summary.current_round, 1101);
        assert_eq!(summary.checked_tickets, 1);
        assert!(summary.sync.is_none());
        assert_eq!(summary.statistics.total_tickets, 2);
        assert_eq!(summary.statistics.total_games_played, 3);
        assert_eq!(summary.statistics.checked_games_count, 2);
        // 5 個 + 特別號 = 二獎, 3 個 = 五獎
        assert_eq!(summary.statistics.rank_breakdown[&2], 1);
        assert_eq!(summary.statistics.rank_breakdown[&5], 1);
        assert_eq!(summary.statistics.formatted_winning_rate(), "100.0%");

        let csv = String::from_utf8(storage.get_file(REPORT_CSV).await.unwrap()).unwrap();
        assert!(csv.starts_with(
            "ticket_id,round,label,game_type,game_type_name,numbers,is_checked,winning_rank"
        ));
        assert!(csv.contains("1,1101,A,A,자동,1 7 13 30 36 9,true,2"));
        assert!(storage.get_file(REPORT_JSON).await.is_some());
    }

    #[tokio::test]
    async fn test_second_run_does_not_recheck() {
        let storage = MockStorage::default();
        let engine = LottoEngine::new(storage.clone(), FixedSource, TestConfig { sync: false });
        engine.import_tickets(IMPORT.as_bytes(), now()).await.unwrap();

        engine.run_at(now()).await.unwrap();
        let second = engine.run_at(now()).await.unwrap();

        assert_eq!(second.checked_tickets, 0);
        assert_eq!(second.statistics.winning_games_count, 2);
    }

    #[tokio::test]
    async fn test_import_manual_games() {
        let storage = MockStorage::default();
        let engine = LottoEngine::new(storage.clone(), FixedSource, TestConfig { sync: false });
        let data = r#"[
            {"round": 1101, "games": [[44, 36, 30, 13, 7, 1], [2, 3, 4, 5, 6, 8]], "game_types": ["B"]}
        ]"#;

        assert_eq!(engine.import_tickets(data.as_bytes(), now()).await.unwrap(), 1);
        let summary = engine.run_at(now()).await.unwrap();
        assert_eq!(summary.statistics.rank_breakdown[&1], 1);

        let book = TicketBook::load(&storage, TICKETS_FILE).await.unwrap();
        let ticket = &book.all(TicketSortType::RoundAsc)[0];
        assert_eq!(ticket.games[0].game_type, GameType::Manual);
        assert_eq!(ticket.games[0].numbers, vec![1, 7, 13, 30, 36, 44]);
        assert_eq!(ticket.games[1].game_type, GameType::Auto);

        let csv = String::from_utf8(storage.get_file(REPORT_CSV).await.unwrap()).unwrap();
        assert!(csv.contains("1,1101,A,B,수동,1 7 13 30 36 44,true,1"));
    }

    /// 1100 期回傳錯的期數
    struct WrongRoundSource;

    #[async_trait]
    impl DrawSource for WrongRoundSource {
        async fn fetch_draw(&self, round: i32) -> Result<LottoResult> {
            let reported = if round == 1100 { 0 } else { round };
            FixedSource.fetch_draw(1101).await.map(|mut result| {
                result.round = reported;
                result
            })
        }
    }

    #[tokio::test]
    async fn test_run_continues_after_ticket_check_fails() {
        let storage = MockStorage::default();
        let engine = LottoEngine::new(storage.clone(), WrongRoundSource, TestConfig { sync: false });
        let data = r#"[
            {"round": 1100, "games": [[1, 7, 13, 30, 36, 44]]},
            {"round": 1101, "games": [[1, 7, 13, 30, 36, 44]]}
        ]"#;
        engine.import_tickets(data.as_bytes(), now()).await.unwrap();

        let summary = engine.run_at(now()).await.unwrap();

        assert_eq!(summary.checked_tickets, 1);
        assert!(storage.get_file(REPORT_JSON).await.is_some());
        let book = TicketBook::load(&storage, TICKETS_FILE).await.unwrap();
        assert_eq!(book.unchecked().len(), 1);
        assert_eq!(book.unchecked()[0].round, 1100);
    }

    struct FixedRoundConfig(i32);

    impl ConfigProvider for FixedRoundConfig {
        fn api_endpoint(&self) -> &str {
            "http://localhost"
        }
        fn data_path(&self) -> &str {
            "./data"
        }
        fn current_round(&self) -> Option<i32> {
            Some(self.0)
        }
        fn sync_enabled(&self) -> bool {
            true
        }
        fn batch_size(&self) -> usize {
            50
        }
        fn request_timeout_seconds(&self) -> u64 {
            5
        }
        fn sort_type(&self) -> TicketSortType {
            TicketSortType::RoundAsc
        }
    }

    #[tokio::test]
    async fn test_run_rejects_round_beyond_upcoming_draw() {
        let storage = MockStorage::default();
        let engine = LottoEngine::new(storage.clone(), FixedSource, FixedRoundConfig(2_000_000_000));

        let err = engine.run_at(now()).await.unwrap_err();

        assert!(matches!(err, LottoError::InvalidConfigValueError { .. }));
        assert!(storage.get_file(REPORT_JSON).await.is_none());
    }

    #[test]
    fn test_report_rows_one_per_game() {
        let info = TicketInfo::new(1101, vec![vec![1, 2, 3, 4, 5, 6], vec![7, 8, 9, 10, 11, 12]]);
        let ticket = LottoTicket::from_info(&info, now());

        let rows = report_rows(&[ticket]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].label, "B");
        assert_eq!(rows[1].numbers, "7 8 9 10 11 12");
    }
}
