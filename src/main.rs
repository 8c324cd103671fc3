use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use logflux::ingest::parse_record;
use logflux::{Output, WriteOutcome};
use logflux_core::config::Config;
use logflux_sinks::{LineSink, MemorySink};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "logflux", about = "logflux — structured logs to time-series points")]
struct Cli {
    /// Config file layered over the built-in defaults
    /// (default: $XDG_CONFIG_HOME/logflux/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides the level).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read NDJSON records and print line protocol to stdout.
    Run {
        /// Input file; stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Records per write.
        #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
        batch_size: u32,
    },
    /// Compile the configured rules and report what they do.
    Check,
    /// Print the configuration schema as JSON.
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&Config::schema())?);
            Ok(())
        }
        Command::Check => {
            let config = load_config(cli.config.as_deref())?;
            check(&config)
        }
        Command::Run { input, batch_size } => {
            let config = load_config(cli.config.as_deref())?;
            let batch_size = batch_size as usize;
            match input {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("opening {}", path.display()))?;
                    run(&config, BufReader::new(file), batch_size).await
                }
                None => run(&config, BufReader::new(tokio::io::stdin()), batch_size).await,
            }
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    Config::load(path).context("loading configuration")
}

fn check(config: &Config) -> anyhow::Result<()> {
    let output = Output::new(&config.output, &config.rules, MemorySink::new())
        .context("compiling rules")?;
    let rules = output.rules();
    println!("measurement: {}", output.measurement());
    println!("filters:     {}", rules.filters().len());
    println!("tags:        {}", rules.tags().len());
    println!("fields:      {}", rules.fields().len());
    if rules.fields().is_empty() {
        println!("warning: no fields configured; every point would be empty");
    }
    Ok(())
}

async fn run<R>(config: &Config, reader: R, batch_size: usize) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let output = Output::launch(&config.output, &config.rules, LineSink::new(std::io::stdout()))
        .context("starting output")?;

    let mut lines = reader.lines();
    let mut pending = Vec::with_capacity(batch_size);
    let mut line_no = 0usize;
    let mut written = 0usize;

    while let Some(line) = lines.next_line().await.context("reading input")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(&line) {
            Ok(record) => pending.push(record),
            Err(err) => tracing::warn!(line = line_no, error = %err, "skipping input line"),
        }
        if pending.len() >= batch_size {
            written += flush(&output, &mut pending)?;
        }
    }
    written += flush(&output, &mut pending)?;

    output.stop().context("stopping output")?;
    tracing::info!(lines = line_no, points = written, "input exhausted");
    Ok(())
}

fn flush(
    output: &Output<LineSink<std::io::Stdout>>,
    pending: &mut Vec<logflux_core::Record>,
) -> anyhow::Result<usize> {
    if pending.is_empty() {
        return Ok(0);
    }
    let outcome = output.write_batch(pending.iter())?;
    pending.clear();
    Ok(match outcome {
        WriteOutcome::Written(n) => n,
        WriteOutcome::Dropped | WriteOutcome::Inactive => 0,
    })
}
