//! Set Counter CLI
//!
//! Reads a decklist from a file or stdin and prints per-set counts and
//! exclusive cards, or serves the web UI with `--web-port`.

use clap::Parser;
use set_counter::{
    format_report, io, Engine, EngineConfig, PrintResolver, ScryfallClient, ScryfallConfig,
};
use std::path::PathBuf;
use std::sync::Arc;

/// MTG set counter - which sets hold the cards of your decklist
#[derive(Parser, Debug)]
#[command(name = "set_counter")]
#[command(version, about, long_about = None)]
struct Args {
    /// Decklist file with one `[quantity] name` per line (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Maximum number of card lookups in flight
    #[arg(short, long, default_value_t = set_counter::config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Timeout for a single card lookup, in seconds
    #[arg(long, default_value_t = set_counter::config::DEFAULT_LOOKUP_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Scryfall API base URL
    #[arg(long, default_value = set_counter::config::DEFAULT_SCRYFALL_URL)]
    api_base: String,

    /// Resolve printings from a JSON fixture instead of Scryfall
    #[arg(long)]
    prints_file: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// List the member cards of every set
    #[arg(long, default_value_t = false)]
    show_cards: bool,

    /// Serve the web UI on this port instead of running once
    #[arg(long)]
    web_port: Option<u16>,
}

fn build_resolver(args: &Args) -> set_counter::Result<Arc<dyn PrintResolver>> {
    let resolver: Arc<dyn PrintResolver> = match &args.prints_file {
        Some(path) => Arc::new(io::load_prints_file(path)?),
        None => {
            let config = ScryfallConfig::with_base_url(&args.api_base);
            log::info!("Using Scryfall at {}", config.base_url);
            Arc::new(ScryfallClient::new(&config)?)
        }
    };
    Ok(resolver)
}

async fn run(args: Args) -> set_counter::Result<()> {
    let config = EngineConfig::new(args.concurrency, args.timeout_secs)?;
    let engine = Engine::new(build_resolver(&args)?, config);

    if let Some(port) = args.web_port {
        return set_counter::web::serve(Arc::new(engine), port).await;
    }

    let text = match &args.input {
        Some(path) => io::read_decklist(path)?,
        None => io::read_decklist_from(std::io::stdin().lock())?,
    };

    let report = engine.run(&text).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report, args.show_cards));
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Set RUST_LOG to control the log level, e.g. RUST_LOG=set_counter=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
