use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use randrecs::{
    cli,
    config::{self, Settings},
    error,
};

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
    /// Run the web service
    Serve,

    /// Connect a Spotify account
    Auth,

    /// Generate the recommendation playlist once
    Generate(GenerateOptions),

    /// Show what the cache holds
    Info,

    /// Drop cached data so it is fetched again
    Reset(ResetOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// Overwrite the playlist instead of appending to it
    #[clap(long)]
    pub replace: bool,

    /// Do not seed from recently played tracks (currently unsupported)
    #[clap(long)]
    pub no_history: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ResetOptions {
    /// Forget the saved albums
    #[clap(long)]
    pub albums: bool,

    /// Forget the recently played tracks
    #[clap(long)]
    pub history: bool,

    /// Forget the managed playlist, a new one is created next time
    #[clap(long)]
    pub playlist: bool,

    /// Everything above plus recommendations and templates
    #[clap(long)]
    pub all: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    match cli.command {
        Command::Serve => cli::serve(settings).await,
        Command::Auth => cli::auth(settings).await,
        Command::Generate(opt) => cli::generate(settings, opt.replace, !opt.no_history).await,
        Command::Info => cli::info(settings).await,
        Command::Reset(opt) => {
            cli::reset(
                settings,
                cli::ResetTargets {
                    albums: opt.albums,
                    history: opt.history,
                    playlist: opt.playlist,
                    all: opt.all,
                },
            )
            .await
        }
        Command::Completions(_) => {}
    }
}
