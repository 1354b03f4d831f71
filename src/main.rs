use clap::{Parser, Subcommand};
use product_align::config::{self, AppConfig, Overrides};
use product_align::imaging::RustBackend;
use product_align::{output, process};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; version_string runs a single time at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Flags shared by commands that align images.
#[derive(clap::Args, Clone)]
struct AlignArgs {
    /// Preset name (see `presets`); defaults to `default_preset` from the config
    #[arg(long)]
    preset: Option<String>,

    /// Padding color as #rrggbb or #rrggbbaa
    #[arg(long)]
    fill: Option<String>,

    /// Skip alignment, only resize to the canvas
    #[arg(long)]
    no_align: bool,

    /// Draw edge markers and pad with light gray
    #[arg(long)]
    debug: bool,
}

impl From<&AlignArgs> for Overrides {
    fn from(args: &AlignArgs) -> Self {
        Overrides {
            preset: args.preset.clone(),
            fill: args.fill.clone(),
            no_align: args.no_align,
            debug: args.debug,
        }
    }
}

#[derive(Parser)]
#[command(name = "product-align")]
#[command(about = "Content-aware alignment of product photos")]
#[command(long_about = "\
Content-aware alignment of product photos

Finds the product on a plain background, then trims and pads the photo so the
product sits on the preset's base line with consistent margins, and writes a
JPEG at the configured canvas size.

  top line   ─────────────  minimum free space above the product
               ┌───────┐
               │product│
               └───────┘
  base line  ─────────────  where the product rests

Photos whose content touches the frame edge are resized but not re-aligned.

Run 'product-align gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log detection and margin decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align every image in a directory
    Run {
        /// Directory with source photos (not searched recursively)
        #[arg(long)]
        source: PathBuf,

        /// Directory for aligned JPEGs
        #[arg(long)]
        output: PathBuf,

        #[command(flatten)]
        align: AlignArgs,
    },
    /// Align a single image
    Align {
        input: PathBuf,
        output: PathBuf,

        #[command(flatten)]
        align: AlignArgs,
    },
    /// List the configured presets
    Presets,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            source,
            output: output_dir,
            align,
        } => {
            let config = resolve_config(cli.config.as_deref(), &align)?;
            let request = process::BatchRequest {
                source_dir: source,
                output_dir,
                job: config.job()?,
                threads: config::effective_threads(&config.processing),
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::run(
                &RustBackend::new(),
                &request,
                Some(tx),
                &process::CancelToken::new(),
            );
            let printed = wait_for_printer(printer);
            let summary = result?;
            printed?;

            if !summary.all_succeeded() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Align {
            input,
            output: target,
            align,
        } => {
            let config = resolve_config(cli.config.as_deref(), &align)?;
            let job = config.job()?;
            let status = process::process_file(&RustBackend::new(), &input, &target, &job)?;
            for line in output::format_single_result(&input, &target, status) {
                println!("{}", line);
            }
        }
        Command::Presets => {
            let config = load_config(cli.config.as_deref())?;
            output::print_presets(&config.presets, &config.default_preset, &config.canvas);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Join the progress printer, turning a panic in it into an error.
fn wait_for_printer(printer: std::thread::JoinHandle<()>) -> Result<(), &'static str> {
    printer
        .join()
        .map_err(|_| "progress output failed: printer thread panicked")
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug, default warn.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

fn resolve_config(path: Option<&Path>, args: &AlignArgs) -> Result<AppConfig, config::ConfigError> {
    let mut config = load_config(path)?;
    config.apply_overrides(&Overrides::from(args))?;
    Ok(config)
}
