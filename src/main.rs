use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlwatch::{cli, config, error, logging};

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
    /// Refresh the token and check for new releases periodically until Ctrl-C
    Run,

    /// Check all tracked artists for new releases once
    Check,

    /// Handle tracked artists
    Artists(ArtistsOptions),

    /// Search artists, albums and tracks
    Search(SearchOptions),

    /// Show details of an artist, album or track
    #[command(subcommand)]
    Lookup(LookupSubcommand),

    /// Handle Spotify client credentials
    #[command(subcommand)]
    Credentials(CredentialsSubcommand),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsOptions {
    /// Subcommands under `artists`, lists tracked artists when omitted
    #[command(subcommand)]
    pub command: Option<ArtistsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ArtistsSubcommand {
    /// List tracked artists
    List,

    /// Start tracking an artist
    Add(ArtistsAddOpts),

    /// Stop tracking an artist
    Remove(ArtistIdOpt),
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsAddOpts {
    /// Spotify artist id
    pub id: String,

    /// Add without looking the artist up first
    #[clap(long)]
    pub no_verify: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistIdOpt {
    /// Spotify artist id
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search query
    #[clap(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LookupSubcommand {
    /// Artist with its latest albums and singles
    Artist(LookupIdOpt),

    /// Album with its tracks
    Album(LookupIdOpt),

    /// Single track
    Track(LookupIdOpt),
}

#[derive(Parser, Debug, Clone)]
pub struct LookupIdOpt {
    /// Spotify id
    pub id: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CredentialsSubcommand {
    /// Validate and store a client id and secret
    Set(CredentialsSetOpts),

    /// Request a token with the configured credentials
    Verify,
}

#[derive(Parser, Debug, Clone)]
pub struct CredentialsSetOpts {
    #[clap(long)]
    pub client_id: String,

    #[clap(long)]
    pub client_secret: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let level = match cli.command {
        Command::Run => logging::DAEMON_LEVEL,
        _ => logging::QUIET_LEVEL,
    };
    logging::init(level);

    match cli.command {
        Command::Run => cli::run().await,
        Command::Check => cli::check().await,
        Command::Artists(opt) => match opt.command {
            Some(ArtistsSubcommand::Add(a)) => cli::add_artist(a.id, a.no_verify).await,
            Some(ArtistsSubcommand::Remove(r)) => cli::remove_artist(r.id).await,
            Some(ArtistsSubcommand::List) | None => cli::list_artists().await,
        },
        Command::Search(opt) => cli::search(opt.query.join(" ")).await,
        Command::Lookup(l) => match l {
            LookupSubcommand::Artist(o) => cli::lookup_artist(o.id).await,
            LookupSubcommand::Album(o) => cli::lookup_album(o.id).await,
            LookupSubcommand::Track(o) => cli::lookup_track(o.id).await,
        },
        Command::Credentials(c) => match c {
            CredentialsSubcommand::Set(s) => cli::set_credentials(s.client_id, s.client_secret).await,
            CredentialsSubcommand::Verify => cli::verify_credentials().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
