// ABOUTME: Main entry point for the lecture-deck program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand, ValueEnum};
use lecture_deck::{Config, Deck, Presenter, TerminalSurface, WatchConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the deck as a single HTML page
    Build(BuildArgs),

    /// Present the deck interactively in the terminal
    Present(DeckArgs),

    /// Print sections, slide counts and slide titles
    Outline(DeckArgs),

    /// Rebuild the deck on changes, optionally serving it over HTTP
    Watch(WatchArgs),
}

#[derive(Args)]
struct DeckArgs {
    /// Directory of Markdown sections
    #[arg(short, long)]
    input: PathBuf,

    /// Weight at which a section heading starts a new slide
    #[arg(long)]
    threshold: Option<u32>,

    /// Section to show first
    #[arg(long)]
    start: Option<String>,

    /// Deck title
    #[arg(long)]
    title: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceMode {
    Embed,
    Link,
}

#[derive(Args)]
struct ResourceArgs {
    /// CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Option<Vec<String>>,

    /// Mode for local CSS/JS: embed the content or link to it
    #[arg(long, value_enum)]
    mode: Option<ResourceMode>,

    /// Fetch remote CSS/JS and inline it for a self-contained page
    #[arg(long)]
    inline_remote: bool,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    deck: DeckArgs,

    #[command(flatten)]
    resources: ResourceArgs,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    deck: DeckArgs,

    #[command(flatten)]
    resources: ResourceArgs,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// Serve the output directory over HTTP
    #[arg(long)]
    serve: bool,

    /// Address to bind the server to
    #[arg(long)]
    host: Option<String>,

    /// Port for the server
    #[arg(long)]
    port: Option<u16>,

    /// Debounce time for file changes in milliseconds
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
}

fn deck_config(config: &Config, args: &DeckArgs) -> lecture_deck::DeckConfig {
    config.get_deck_config(args.title.clone(), args.start.clone(), args.threshold)
}

fn html_options(config: &Config, args: &ResourceArgs) -> lecture_deck::HtmlOptions {
    config.get_html_options(
        args.css.clone(),
        args.js.clone(),
        args.mode.map(|mode| matches!(mode, ResourceMode::Embed)),
        args.inline_remote,
    )
}

fn run(command: &Commands, config: &Config) -> lecture_deck::Result<()> {
    match command {
        Commands::Build(args) => {
            println!("Executing build command...");
            let deck = lecture_deck::generate_deck_file(
                &args.deck.input,
                &args.output,
                &deck_config(config, &args.deck),
                &html_options(config, &args.resources),
            )?;
            println!(
                "Deck built successfully: {} sections -> {:?}",
                deck.registry.len(),
                args.output
            );
            Ok(())
        }
        Commands::Present(args) => {
            let deck = Deck::load(&args.input, &deck_config(config, args))?;
            let state = deck.navigation();
            let mut presenter = Presenter::new(deck.registry, state, TerminalSurface::new());
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            lecture_deck::run_session(&mut presenter, stdin.lock(), &mut stdout)
        }
        Commands::Outline(args) => {
            let deck = Deck::load(&args.input, &deck_config(config, args))?;
            println!("{}", deck.title);
            for section in deck.registry.sections() {
                println!(
                    "{} ({}): {} slides",
                    section.label,
                    section.id,
                    section.slide_count()
                );
                for (i, title) in section.titles().iter().enumerate() {
                    println!("  {:>3}. {}", i + 1, title);
                }
            }
            Ok(())
        }
        Commands::Watch(args) => {
            println!("Executing watch command...");
            let watch_config = WatchConfig {
                content_dir: args.deck.input.clone(),
                html_output: args.output.clone(),
                deck: deck_config(config, &args.deck),
                html: html_options(config, &args.resources),
                debounce_ms: args.debounce_ms,
                serve: args.serve,
                host: args.host.clone().unwrap_or_else(|| config.host.clone()),
                port: args.port.unwrap_or(config.port),
            };
            lecture_deck::watch_content(watch_config)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::from_env();

    let result = match &cli.command {
        Some(command) => run(command, &config),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
