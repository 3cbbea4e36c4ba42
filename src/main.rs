use clap::Parser;
use reelfolio::config::{AppConfig, Command};
use reelfolio::utils::error::ErrorSeverity;
use reelfolio::utils::logger;
use reelfolio::{
    CategoryFilter, CliConfig, FileStore, MediaFile, PortfolioStore, ReelError,
    Uploader,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    match run(cli.command, &config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
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
            Ok(())
        }
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<(), ReelError> {
    let backend = FileStore::new(config.data_dir());
    let mut store = PortfolioStore::load_with_key(backend, config.storage.key.clone()).await?;

    match command {
        Command::List { category } => {
            let filter: CategoryFilter = category.parse()?;
            for project in store.filter_by_category(filter) {
                let star = if project.is_featured() { "★" } else { " " };
                println!(
                    "{} {:>14}  {:<8} {} ({})",
                    star,
                    project.id,
                    project.category.as_str(),
                    project.title,
                    project.client
                );
            }
        }
        Command::Upload { path } => {
            let file = MediaFile::from_path(&path).await?;
            let uploader = Uploader::new(config.upload_settings());
            let mut handle = uploader.start(file)?;

            let mut last_percent = None;
            while let Some(event) = handle.next_event().await {
                if let Some(percent) = event.percent() {
                    if last_percent != Some(percent) {
                        tracing::debug!("Upload progress: {}%", percent);
                        last_percent = Some(percent);
                    }
                }
                if event.is_terminal() {
                    break;
                }
            }

            let project = handle.finish().await?;
            let added = store.append(vec![project]).await?;
            for project in added {
                println!("✅ Added '{}' as #{}", project.title, project.id);
            }
        }
        Command::Import { file } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let report = store.merge_str(&text).await?;
            println!(
                "📥 Imported {} projects ({} already present)",
                report.added, report.skipped
            );
        }
        Command::Export { .. } => {
            let path = store.export_to_dir(&config.export_dir()).await?;
            println!("📁 Exported to: {}", path.display());
        }
    }

    store.close().await?;
    Ok(())
}
