use clap::Parser;
use simple_index::config::{self, IndexerConfig};
use simple_index::descriptions::DescriptionMap;
use simple_index::generate::{self, IndexContext};
use simple_index::output;
use simple_index::templates::TemplateContent;
use simple_index::types::{DEFAULT_OUTPUT_FILE, RenderOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-index")]
#[command(version, about = "Generate Apache-autoindex-style index.html listings")]
#[command(long_about = "\
Generate Apache-autoindex-style index.html listings

Writes an index.html into TOP_DIR listing its entries with descriptions,
sizes and modification times. With --recursive every subdirectory gets
its own listing too.

Skipped entries:
  - the output file itself
  - names starting with '.' or '_'
  - names containing any ignore substring from the config
  - entries the current user cannot write (symlinks excepted)

Inputs (relative to the working directory, all optional):
  .indexer.toml           Configuration (see --gen-config)
  .htaccess               AddDescription \"<text>\" <name> lines
  _includes/header.html   Emitted before the listing
  _includes/indexer.svg   Icon symbol sheet
  _includes/footer1.html  Emitted after the listing")]
struct Cli {
    /// Top folder from which to start generating listings
    #[arg(default_value = ".")]
    top_dir: PathBuf,

    /// Only include entries matching this glob, e.g. "*.py"
    #[arg(short, long)]
    filter: Option<String>,

    /// Name of the generated listing file
    #[arg(short, long, value_name = "FILENAME", default_value = DEFAULT_OUTPUT_FILE)]
    output_file: String,

    /// Recursively process nested directories
    #[arg(short, long)]
    recursive: bool,

    /// Log every processed entry (slow on large trees and slow terminals)
    #[arg(short, long)]
    verbose: bool,

    /// Config file [default: ./.indexer.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a stock config with all options documented and exit
    #[arg(long)]
    gen_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    let config = match &cli.config {
        Some(path) => config::read_config(path)?,
        None => config::load_config(&cwd)?,
    };

    let (templates, descriptions) = load_includes(&config, &cwd);
    tracing::debug!("{} descriptions loaded", descriptions.len());

    let options = RenderOptions {
        filter: cli.filter,
        output_file: cli.output_file,
        recursive: cli.recursive,
        verbose: cli.verbose,
    };
    let ctx = IndexContext {
        options: &options,
        config: &config,
        templates: &templates,
        descriptions: &descriptions,
        custom_entries: &config.custom_index,
    };

    let summary = generate::generate(&cli.top_dir, &ctx)?;
    output::print_summary(&summary, &cli.top_dir);

    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the include files once for the whole run.
fn load_includes(
    config: &IndexerConfig,
    cwd: &std::path::Path,
) -> (TemplateContent, DescriptionMap) {
    let includes = config.includes.rooted_at(cwd);
    (
        TemplateContent::load(&includes),
        DescriptionMap::load(&includes.htaccess),
    )
}
