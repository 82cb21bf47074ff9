use clap::Parser;
use lotto_assist::core::draw_calendar::{
    current_draw_number, draw_date_by_number, format_draw_date, kst_now, time_until_next_draw,
    upcoming_draw_round,
};
use lotto_assist::core::ConfigProvider;
use lotto_assist::utils::error::ErrorSeverity;
use lotto_assist::utils::{logger, validation::Validate};
use lotto_assist::{HttpDrawSource, LocalStorage, LottoEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-lotto")]
#[command(about = "Lotto ticket checker with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "lotto-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the sync setting from config
    #[arg(long)]
    sync: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let level = if args.verbose { "debug" } else { config.log_level() };
    if config.json_logging() {
        logger::init_json_logger(level);
    } else {
        logger::init_cli_logger(level);
    }

    tracing::info!("🚀 Starting TOML-based lotto checker");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(sync) = args.sync {
        config
            .sync
            .get_or_insert(lotto_assist::config::toml_config::SyncConfig {
                enabled: None,
                batch_size: None,
                current_round: None,
            })
            .enabled = Some(sync);
        tracing::info!("🔧 Sync overridden to: {}", sync);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let import_file = config.import_file().map(str::to_string);
    let storage = LocalStorage::new(config.data_path().to_string());
    let source = HttpDrawSource::new(config.api_endpoint(), config.request_timeout_seconds())?;
    let engine = LottoEngine::new(storage, source, config);

    if let Some(path) = import_file {
        let data = std::fs::read(&path)?;
        let count = engine.import_tickets(&data, kst_now()).await?;
        tracing::info!("🎫 Imported {} tickets from {}", count, path);
    }

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Check run completed successfully!");
            println!("✅ Checked {} tickets", summary.checked_tickets);
            println!(
                "📊 Winning rate: {} over {} checked games",
                summary.statistics.formatted_winning_rate(),
                summary.statistics.checked_games_count
            );
            println!("📁 Report saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Check run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,      // 警告，但成功
                ErrorSeverity::Medium => 2,   // 重試錯誤
                ErrorSeverity::High => 1,     // 處理錯誤
                ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Source: {}", config.api_endpoint());
    println!("  Data: {}", config.data_path());
    println!("  Sync: {}", config.sync_enabled());
    println!("  Batch Size: {}", config.batch_size());
    println!("  Sort: {}", config.sort_type());

    if let Some(round) = config.current_round() {
        println!("  Current Round (override): {}", round);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    let now = kst_now();
    let current_round = config
        .current_round()
        .unwrap_or_else(|| current_draw_number(now));

    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📅 Draw Calendar:");
    match draw_date_by_number(current_round) {
        Some(date) => println!(
            "  Latest drawn round: {} ({})",
            current_round,
            format_draw_date(date)
        ),
        None => println!("  Latest drawn round: {} (outside the draw calendar)", current_round),
    }
    println!("  Upcoming round: {}", upcoming_draw_round(now));
    let remaining = time_until_next_draw(now);
    println!(
        "  Next draw in: {}h {}m",
        remaining.num_hours(),
        remaining.num_minutes() % 60
    );

    println!();
    println!("📡 Data Source:");
    println!("  Endpoint: {}", config.api_endpoint());
    println!("  Timeout: {}s", config.request_timeout_seconds());

    println!();
    println!("💾 Storage:");
    println!("  Path: {}", config.data_path());
    if let Some(import_file) = config.import_file() {
        println!("  Import: {}", import_file);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
