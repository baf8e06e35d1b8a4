//! Attune CLI
//!
//! Usage:
//!   attune --text "your text here"            # Single reply
//!   attune --interactive                      # Interactive mode
//!   attune --serve                            # HTTP API server
//!   attune --text "text" --json               # JSON output
//!   attune --text "text" --lexicon -0.6       # Supply a precomputed score

use clap::Parser;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use attune::core::{run_server, CascadeOrchestrator, GeneratorConfig, SentimentAnalyzer};
use attune::types::{Reply, SentimentSignal};
use attune::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "attune",
    version = VERSION,
    about = "Attune - Supportive replies from text and sentiment",
    long_about = "Attune produces a short, supportive reply to an emotional disclosure.\n\n\
                  Replies come from the first stage that answers:\n  \
                  CONTEXTUAL  - Crisis, topic, emotion and keyword rules\n  \
                  GENERATIVE  - Language-model candidate that passes the filters\n  \
                  TEMPLATE    - Technique pools, then sentiment-bucketed templates\n\n\
                  Generation is enabled with --generator-url or ATTUNE_GENERATOR_URL\n\
                  (an Ollama-compatible server). ATTUNE_TEST_MODE=true disables it."
)]
struct Args {
    /// Text to respond to (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Interactive mode - read lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:5001)
    #[arg(long, default_value = "127.0.0.1:5001")]
    addr: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show sentiment and extracted details
    #[arg(long)]
    verbose: bool,

    /// Precomputed lexicon score in [-1, 1] (skips the built-in lexicon)
    #[arg(long, allow_hyphen_values = true)]
    lexicon: Option<f64>,

    /// Precomputed categorical label in {-1, 0, 1}
    #[arg(long, allow_hyphen_values = true)]
    label: Option<i8>,

    /// Seed for template selection
    #[arg(long)]
    seed: Option<u64>,

    /// Base URL of the generation server (overrides ATTUNE_GENERATOR_URL)
    #[arg(long)]
    generator_url: Option<String>,

    /// Model name for the generation server (overrides ATTUNE_GENERATOR_MODEL)
    #[arg(long)]
    generator_model: Option<String>,

    /// Never attempt generation
    #[arg(long)]
    no_generator: bool,
}

impl Args {
    fn generator_config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::from_env();
        if let Some(url) = &self.generator_url {
            config.url = Some(url.clone());
        }
        if let Some(model) = &self.generator_model {
            config.model = model.clone();
        }
        if self.no_generator {
            config.url = None;
        }
        config
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let cascade = CascadeOrchestrator::from_config(&args.generator_config());
    let analyzer = SentimentAnalyzer::default();

    if args.serve {
        run_serve(&args, cascade, analyzer);
    } else if args.interactive {
        run_interactive(&args, &cascade, &analyzer);
    } else if let Some(ref text) = args.text {
        run_single(text, &args, &cascade, &analyzer);
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args, &cascade, &analyzer);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attune=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Signal for the text, with any precomputed values taking precedence
fn signal_for(text: &str, args: &Args, analyzer: &SentimentAnalyzer) -> SentimentSignal {
    let computed = analyzer.analyze(text);
    SentimentSignal::new(
        args.lexicon.unwrap_or(computed.lexicon_score),
        args.label.unwrap_or(computed.categorical_label),
    )
}

/// Run single reply
fn run_single(text: &str, args: &Args, cascade: &CascadeOrchestrator, analyzer: &SentimentAnalyzer) {
    let signal = signal_for(text, args, analyzer);
    let reply = cascade.respond(signal, text, &mut args.rng());
    print_reply(&reply, args);
}

/// Run interactive mode
fn run_interactive(args: &Args, cascade: &CascadeOrchestrator, analyzer: &SentimentAnalyzer) {
    print_header("Interactive", args.no_color);
    println!("Share what's on your mind and press Enter. Type 'quit' to exit.");
    println!();

    let mut rng = args.rng();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", "> ".bold());
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }

        let signal = signal_for(text, args, analyzer);
        let reply = cascade.respond(signal, text, &mut rng);
        print_reply(&reply, args);
        println!();
    }
}

fn print_reply(reply: &Reply, args: &Args) {
    if args.json {
        match serde_json::to_string_pretty(reply) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize reply: {}", e),
        }
    } else if args.verbose {
        print_verbose(reply);
    } else if args.no_color {
        println!("{}", reply.to_parseable_string());
    } else {
        println!("{}", reply.to_terminal_string());
    }
}

fn print_verbose(reply: &Reply) {
    let color = reply.bucket.color();
    let line = "----------------------------------------".color(color);
    println!("{}", line);
    println!(
        "lexicon = {:+.4} | label = {:+} | bucket = {}",
        reply.signal.lexicon_score,
        reply.signal.categorical_label,
        reply.bucket.to_string().color(color),
    );
    println!(
        "topic = {} | emotion = {} | time = {}",
        reply.details.topic_or("-"),
        reply.details.emotion_or("-"),
        reply.details.time_or("-"),
    );
    match reply.quality {
        Some(q) => println!("provenance = {} | quality = {}", reply.provenance.code(), q),
        None => println!("provenance = {}", reply.provenance.code()),
    }
    println!("{}", line);
    println!("{}", reply.text.bold());
}

fn print_header(mode: &str, no_color: bool) {
    let title = format!("  Attune v{} - {}", VERSION, mode);
    println!("========================================");
    if no_color {
        println!("{}", title);
    } else {
        println!("{}", title.bold());
    }
    println!("========================================");
    println!();
}

/// Run HTTP API server
fn run_serve(args: &Args, cascade: CascadeOrchestrator, analyzer: SentimentAnalyzer) {
    print_header("API Server", args.no_color);

    // Generation uses a blocking client, so the runtime is only built here
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_server(&args.addr, Arc::new(cascade), analyzer)) {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
