use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use findyml::config::{Config, OutputFormat};
use findyml::file::loader::load_yaml_from_stdin;
use findyml::find::{format_hit, FileError, FindOptions, Hit, QueryEngine};

/// findyml - find keys in YAML files by dotted path
#[derive(Parser)]
#[command(name = "findyml")]
#[command(version)]
#[command(about = "Find YAML keys by dotted path, following aliases and merge keys", long_about = None)]
struct Cli {
    /// [PATH] QUERY. PATH defaults to the current directory; "-" reads stdin
    #[arg(num_args = 1..=2, required = true, value_names = ["PATH", "QUERY"])]
    args: Vec<String>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Only report terminal nodes
    #[arg(short, long)]
    leaves: bool,

    /// Do not print the lines of aliases traversed
    #[arg(long)]
    no_alias_chain: bool,

    /// File extension to search; repeatable (default: yml)
    #[arg(short, long = "ext", value_name = "EXT")]
    extensions: Vec<String>,
}

impl Cli {
    /// Splits the positional arguments into (path, query).
    fn target(&self) -> (&str, &str) {
        match self.args.as_slice() {
            [query] => (".", query.as_str()),
            [path, query] => (path.as_str(), query.as_str()),
            _ => unreachable!("clap enforces one or two positional arguments"),
        }
    }

    /// Applies command-line overrides on top of the config file.
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.leaves {
            config.leaves_only = true;
        }
        if self.no_alias_chain {
            config.show_alias_chain = false;
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions.clone();
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "findyml=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = cli.merge_into(Config::load());
    let (path, query) = cli.target();

    let engine = match QueryEngine::new(query) {
        Ok(engine) => engine.with_options(FindOptions::from(&config)),
        Err(err) => {
            eprintln!("{}", err);
            return Ok(ExitCode::from(2));
        }
    };

    let mut printer = Printer::new(&config);

    if path == "-" {
        let source = load_yaml_from_stdin().context("Failed to read stdin")?;
        match engine.search_source(Path::new("-"), &source) {
            Ok(hits) => {
                for hit in &hits {
                    printer.hit(hit)?;
                }
            }
            Err(err) => printer.failure(&err),
        }
    } else {
        for result in engine.find(Path::new(path))? {
            match result {
                Ok(hit) => printer.hit(&hit)?,
                Err(err) => printer.failure(&err),
            }
        }
    }

    Ok(if printer.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Writes hits to stdout and file failures to stderr.
struct Printer {
    out: io::StdoutLock<'static>,
    format: OutputFormat,
    show_alias_chain: bool,
    failed: bool,
}

impl Printer {
    fn new(config: &Config) -> Self {
        Self {
            out: io::stdout().lock(),
            format: config.format,
            show_alias_chain: config.show_alias_chain,
            failed: false,
        }
    }

    fn hit(&mut self, hit: &Hit) -> Result<()> {
        let line = format_hit(hit, self.format, self.show_alias_chain)?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn failure(&mut self, err: &FileError) {
        if err.is_skippable() {
            eprintln!("Skipping {} due to parse error", err.path().display());
        } else {
            self.failed = true;
            eprintln!("Error: {}", err);
        }
    }
}
