use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotify_tools::{
    cli,
    config::{self, Config},
    error,
    management::TokenCache,
    spotify::Gateway,
    tools::ToolRegistry,
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
    /// Authorize with Spotify API
    Auth(AuthOptions),

    /// Remove the cached token
    Logout,

    /// List available tools
    Tools(ToolsOptions),

    /// Invoke a tool and print its JSON response
    Call(CallOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Run the browser authorization even if a valid token is cached
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ToolsOptions {
    /// Print name, description and input schema of every tool as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CallOptions {
    /// Tool name, e.g. search_tracks
    pub tool: String,

    /// Tool argument as key=value; can be repeated
    #[clap(short = 'a', long = "arg", value_parser = cli::parse_key_value)]
    pub args: Vec<(String, String)>,

    /// Tool arguments as a JSON object
    #[clap(long = "args")]
    pub args_json: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

fn registry() -> ToolRegistry {
    let config = load_config();
    let cache = TokenCache::new(config.cache_path.clone());
    ToolRegistry::new(Gateway::from_config(config, cache))
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => {
            let registry = registry();
            cli::auth(registry.gateway().authenticator(), opt.force).await
        }
        Command::Logout => {
            let registry = registry();
            cli::logout(registry.gateway().authenticator()).await
        }
        Command::Tools(opt) => cli::list_tools(opt.json),
        Command::Call(opt) => {
            let registry = registry();
            cli::call(&registry, &opt.tool, opt.args, opt.args_json).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
