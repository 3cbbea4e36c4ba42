use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "reelfolio")]
#[command(about = "Manage the studio's portfolio video collection")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override storage.data_dir")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List projects, optionally restricted to one category
    List {
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Upload a video file and add it to the portfolio
    Upload { path: PathBuf },
    /// Merge projects from a JSON export
    Import { file: PathBuf },
    /// Write the portfolio to a dated JSON file
    Export {
        #[arg(long)]
        out: Option<String>,
    },
}

impl CliConfig {
    /// 合併設定檔與命令列參數
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Command::Export { out: Some(out) } = &self.command {
            config.export.output_dir = out.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
