//! Command-line entry point: deliver the currently valid File Centipede activation code.

mod logging;
mod platform;

use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use filecxx_code::config::{resolve_key_path, resolve_keys_path, resolve_page_url};
use filecxx_code::fetch::DEFAULT_TIMEOUT_SECS;
use filecxx_code::{AutomationTarget, DeliveryMode, PageLanguage, RefreshPolicy, RunConfig};

use crate::platform::SystemDesktop;

#[derive(Parser)]
#[command(
    name = "filecxx-code",
    about = "FileCxx Automatic Activation Code",
    version
)]
struct Cli {
    /// Enable automatic mode (type the code into the activation window).
    #[arg(short, long)]
    automatic: bool,

    /// Enable logging and specify the log file name.
    #[arg(short, long, value_name = "FILENAME")]
    log: Option<PathBuf>,

    /// Language edition of the code page (en_US, zh_CN, zh_TW, ru_RU, ko_KR).
    #[arg(long, default_value = "en_US")]
    lang: PageLanguage,

    /// Fetch the codes from this URL instead of the language page.
    #[arg(long)]
    url: Option<String>,

    /// Path of the saved code list.
    #[arg(long, value_name = "PATH")]
    keys_file: Option<String>,

    /// Path the selected code is written to in manual mode.
    #[arg(long, value_name = "PATH")]
    key_file: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Ask before overwriting an existing code list.
    #[arg(long)]
    confirm_refresh: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            page_url: resolve_page_url(self.url.as_deref(), self.lang),
            timeout: Duration::from_secs(self.timeout_secs),
            refresh: if self.confirm_refresh {
                RefreshPolicy::Prompt
            } else {
                RefreshPolicy::Always
            },
            delivery: if self.automatic {
                DeliveryMode::Automatic
            } else {
                DeliveryMode::Manual
            },
            keys_path: resolve_keys_path(self.keys_file.as_deref()),
            key_path: resolve_key_path(self.key_file.as_deref()),
            target: AutomationTarget::default(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "filecxx-code", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(log_file) = &cli.log {
        logging::init_file_logging(log_file)?;
    }

    let config = cli.run_config();
    tracing::debug!("Run configuration: {config:?}");

    let desktop = SystemDesktop::new();
    let outcome = filecxx_code::run(&config, &desktop, chrono::Utc::now()).await?;
    tracing::info!("Run finished: {outcome:?}");
    desktop.release_clipboard();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::parse_from([
            "filecxx-code",
            "-a",
            "--lang",
            "zh_TW",
            "--keys-file",
            "cache/keys.json",
            "--key-file",
            "out.txt",
            "--confirm-refresh",
        ]);
        let config = cli.run_config();

        assert_eq!(config.delivery, DeliveryMode::Automatic);
        assert_eq!(config.refresh, RefreshPolicy::Prompt);
        assert_eq!(config.keys_path, PathBuf::from("cache/keys.json"));
        assert_eq!(config.key_path, PathBuf::from("out.txt"));
        assert!(cli.log.is_none());
    }

    #[test]
    fn test_defaults_are_manual_and_silent() {
        let cli = Cli::parse_from(["filecxx-code"]);
        let config = cli.run_config();

        assert_eq!(config.delivery, DeliveryMode::Manual);
        assert_eq!(config.refresh, RefreshPolicy::Always);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(cli.log.is_none());
    }

    #[test]
    fn test_log_flag_takes_a_filename() {
        let cli = Cli::parse_from(["filecxx-code", "-l", "run.log"]);
        assert_eq!(cli.log, Some(PathBuf::from("run.log")));
    }
}
