use clap::Parser;
use cnobi_driver::{Config, Driver, Unrecognized};
use miette::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cnobi")]
#[command(author, version, about = "Translate a ninja build file into a C initializer")]
struct Cli {
    /// Root ninja file
    input: PathBuf,

    /// Output C file (default: input with its extension replaced by `_ninja.c`)
    output: Option<PathBuf>,

    /// Print the parsed manifest
    #[arg(short, long)]
    display: bool,

    /// Fail on unrecognized statements instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Do not copy manifest.h next to the output
    #[arg(long)]
    no_header: bool,

    /// Configuration file (default: cnobi.toml next to the input, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log more detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::discover(self.input.parent().unwrap_or(Path::new("")))?,
        };
        if self.strict {
            config.parser.unrecognized = Unrecognized::Error;
        }
        if self.no_header {
            config.output.copy_header = false;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let driver = Driver::with_config(cli.load_config()?);
    let parsed = driver.parse_file(&cli.input)?;
    for warning in &parsed.warnings {
        eprintln!("{:?}", warning.to_report(&parsed.sources));
    }

    if cli.display {
        print!("{}", parsed.manifest);
        if cli.output.is_none() {
            return Ok(());
        }
    }

    let translation = driver.emit(&parsed, &cli.input, cli.output.as_deref())?;
    for warning in &translation.warnings {
        eprintln!("{:?}", warning.to_report(&parsed.sources));
    }
    println!("Generated {}", translation.output.display());
    if let Some(header) = &translation.header {
        let dir = header.parent().unwrap_or(Path::new(""));
        let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
        println!("Copied manifest.h to {}", dir.display());
    }

    Ok(())
}
