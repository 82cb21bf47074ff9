use clap::Parser;
use lotto_assist::core::draw_calendar::{format_draw_date, kst_now, next_draw_datetime};
use lotto_assist::core::ConfigProvider;
use lotto_assist::utils::error::{ErrorSeverity, LottoError};
use lotto_assist::utils::{logger, validation::Validate};
use lotto_assist::{CliConfig, HttpDrawSource, LocalStorage, LottoEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(if config.verbose { "debug" } else { "info" });

    tracing::info!("Starting lotto-assist CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let import = config.import.clone();
    let storage = LocalStorage::new(config.data_path.clone());
    let source = HttpDrawSource::new(config.api_endpoint(), config.request_timeout_seconds())?;
    let engine = LottoEngine::new(storage, source, config);

    if let Some(import_path) = import {
        tracing::info!("📥 Importing tickets from: {}", import_path);
        let data = std::fs::read(&import_path)?;
        match engine.import_tickets(&data, kst_now()).await {
            Ok(count) => println!("🎫 Imported {} tickets", count),
            Err(e) => exit_with(e),
        }
    }

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Check run completed successfully!");
            println!("✅ Checked {} tickets (round {})", summary.checked_tickets, summary.current_round);
            if let Some(sync) = summary.sync {
                println!(
                    "🔄 Synced {}/{} draws ({} failed)",
                    sync.success_count, sync.total_count, sync.failed_count
                );
            }

            let stats = &summary.statistics;
            if stats.has_data() {
                println!(
                    "📊 {} of {} checked games won ({})",
                    stats.winning_games_count,
                    stats.checked_games_count,
                    stats.formatted_winning_rate()
                );
                for (rank, count) in &stats.rank_breakdown {
                    println!("   Rank {}: {}", rank, count);
                }
            } else {
                println!("📊 No checked games yet");
            }

            let next_draw = next_draw_datetime(kst_now());
            println!("📅 Next draw: {} 20:45 KST", format_draw_date(next_draw.date()));
            println!("📁 Report saved to: {}", summary.output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: LottoError) {
    tracing::error!(
        "❌ Check run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
