use std::time::Duration;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use playlist_shuffler::{cli, config, error, success, utils};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with Spotify and shuffle the configured playlists
    Shuffle(ShuffleOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ShuffleOptions {
    /// Playlist id, URI or link to shuffle; can be repeated (overrides SHUFFLE_PLAYLIST_IDS)
    #[clap(
        long = "playlist",
        value_parser = parse_playlist,
        action = ArgAction::Append,
        num_args = 1
    )]
    playlists: Vec<String>,

    /// Print the login URL instead of opening a browser
    #[clap(long)]
    no_browser: bool,

    /// Seconds between checks for the end of the run
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval: Option<u64>,

    /// Seconds to wait for the Spotify login before giving up
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    login_timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn parse_playlist(value: &str) -> Result<String, String> {
    utils::parse_playlist_id(value).ok_or_else(|| format!("'{}' is not a valid playlist id", value))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Shuffle(opt) => {
            if let Err(e) = config::load_env().await {
                error!("Cannot load environment. Err: {}", e);
            }

            let mut settings = match config::Settings::from_env() {
                Ok(settings) => settings,
                Err(e) => error!("{}", e),
            };
            if !opt.playlists.is_empty() {
                settings.playlist_ids = opt.playlists;
            }
            if let Some(secs) = opt.poll_interval {
                settings.poll_interval = Duration::from_secs(secs);
            }
            if let Some(secs) = opt.login_timeout {
                settings.login_timeout = Duration::from_secs(secs);
            }

            match cli::shuffle(settings, opt.no_browser).await {
                Ok(reports) => {
                    cli::print_reports(&reports);
                    success!("Shuffled {} playlist(s).", reports.len());
                }
                Err(e) => error!("{}", e),
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
