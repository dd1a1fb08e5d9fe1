//! code39-tags - Code 39 barcodes and price tags from the command line.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use code39_tags::logging::{init_logging, LoggingConfig};
use code39_tags::{
    barcode_svg, build_epl_job, build_sheet_svg, encode, verify_table, Catalog, PrintLayout,
    TagConfig,
};

/// Code 39 barcodes and retail price tags
#[derive(Parser, Debug)]
#[command(name = "code39-tags", author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how a SKU is sanitized and encoded
    Encode {
        sku: String,
    },

    /// Render one barcode as SVG
    Svg {
        sku: String,

        #[arg(long, default_value_t = 200.0)]
        width: f64,

        #[arg(long, default_value_t = 60.0)]
        height: f64,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render a printable SVG sheet of price tags
    Sheet {
        /// TOML catalog with [[tag]] entries
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// Tags per row: 2 or 4
        #[arg(long, default_value = "4")]
        layout: PrintLayout,

        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Build an EPL2 print job, one label per tag
    Epl {
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// TrueType font for name and price lines
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<TagConfig> {
    match path {
        Some(p) => TagConfig::load(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(TagConfig::default()),
    }
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    init_logging(LoggingConfig { env_filter: None, default_level });

    if let Err(e) = verify_table() {
        log::error!("Code 39 table check failed: {e}");
    }

    match cli.command {
        Command::Encode { sku } => {
            let encoded = encode(&sku);
            println!("label:    {:?}", encoded.label);
            println!("framed:   {}", encoded.framed());
            println!("symbols:  {}", encoded.char_count);
            println!("elements: {}", encoded.elements.len());
            println!("bars:     {}", encoded.bar_count());
            println!("pattern:  {}", encoded.pattern_string());
        }
        Command::Svg { sku, width, height, output } => {
            let svg = barcode_svg(&sku, width, height).context("rendering barcode")?;
            write_output(output.as_deref(), svg.as_bytes())?;
        }
        Command::Sheet { catalog, layout, config, output } => {
            let config = load_config(config.as_deref())?;
            let catalog = load_catalog(&catalog)?;
            let svg = build_sheet_svg(&catalog.tags, layout, &config).context("building tag sheet")?;
            write_output(output.as_deref(), svg.as_bytes())?;
        }
        Command::Epl { catalog, font, config, output } => {
            let config = load_config(config.as_deref())?;
            let catalog = load_catalog(&catalog)?;
            let font_bytes = font
                .as_deref()
                .map(|p| fs::read(p).with_context(|| format!("reading font {}", p.display())))
                .transpose()?;
            let job = build_epl_job(&catalog.tags, font_bytes.as_deref(), &config)
                .context("building EPL job")?;
            fs::write(&output, &job).with_context(|| format!("writing {}", output.display()))?;
            log::info!("wrote {} labels to {}", catalog.tags.len(), output.display());
        }
    }

    Ok(())
}
