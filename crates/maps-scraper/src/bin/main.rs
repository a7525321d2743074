use clap::Parser;
use maps_scraper::{chunk_blocks, LogStatus, Scraper, DEFAULT_MAX_MESSAGE_LEN};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "maps-scraper")]
#[command(about = "Lists active Conflict of Nations maps")]
#[command(version)]
struct Cli {
    /// Config file to run
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,

    /// Parse saved page text instead of launching a browser
    #[arg(long, value_name = "FILE")]
    text_file: Option<PathBuf>,

    /// Print extracted records as JSON
    #[arg(long)]
    json: bool,

    /// Maximum characters per printed message
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_LEN)]
    max_len: usize,
}

#[tokio::main]
async fn main() -> maps_scraper::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let params = maps_scraper::Params::from_args(&cli.params)?.with_env();
    let mut config = maps_scraper::Config::load_with_params(&cli.config, &params)?;

    if cli.check {
        println!("Config valid: {}", config.name);
        println!("  Target: {}", config.target.url);
        println!("  Steps: {}", config.steps.len());
        for step in &config.steps {
            println!("    - {}", step.name());
        }
        println!("  Wait strategy: {:?}", config.wait.strategy);
        println!("  Text scope: {}", config.extract.scope);
        if !config.params.is_empty() {
            println!("  Parameters: {}", config.params.len());
            for (name, def) in &config.params {
                let req = if def.required { " (required)" } else { "" };
                let desc = def.description.as_deref().unwrap_or("");
                println!("    - {}{}: {}", name, req, desc);
            }
        }
        return Ok(());
    }

    if cli.headless {
        config.browser.headless = true;
    }

    let scraper = Scraper::new(config);

    let (records, blocks) = match cli.text_file {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)?;
            let summary = scraper.summarize(&maps_scraper::split_lines(&text));
            (Some(summary.records), summary.blocks)
        }
        None if cli.json => match scraper.scrape(&LogStatus).await {
            Ok(lines) => {
                let summary = scraper.summarize(&lines);
                (Some(summary.records), summary.blocks)
            }
            Err(e) => {
                eprintln!("✗ Failed: {}", e);
                std::process::exit(1);
            }
        },
        None => (None, scraper.check(&LogStatus).await),
    };

    if cli.json {
        let records = records.unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for (i, message) in chunk_blocks(&blocks, cli.max_len).iter().enumerate() {
        if i > 0 {
            println!("\n----------");
        }
        println!("{}", message);
    }

    Ok(())
}
