//! Formwork CLI
//!
//! Usage:
//!   formwork [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>    Layout configuration (TOML format)
//!   -f, --format <FORMAT>  Output format: svg or text [default: svg]
//!   -d, --debug            Label controls with their names
//!   -h, --help             Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use formwork::{layout_description, render_svg, render_text, LayoutConfig, RenderError, SvgConfig};

#[derive(Parser)]
#[command(name = "formwork")]
#[command(about = "Lay out a form described in TOML")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Debug mode: label controls with their names
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Text,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.input.is_none() && io::stdin().is_terminal() {
        eprintln!("Reading form description from stdin (pass a FILE or --help for usage)");
    }

    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let form = match layout_description(&source, &config) {
        Ok(form) => form,
        Err(RenderError::Description(e)) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match cli.format {
        Format::Svg => {
            let svg_config = SvgConfig::default().with_debug(cli.debug);
            println!("{}", render_svg(&form, &svg_config));
        }
        Format::Text => println!("{}", render_text(&form)),
    }
}
