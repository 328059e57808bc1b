use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use gifbundle::{
    FrameOrder, PackOptions, ProgressCallback, ProgressInfo, Repeat, UnpackOptions, WritePolicy,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  gifbundle unpack cat.gif --output-dir frames\n  gifbundle unpack https://example.com/cat.gif --progress\n  gifbundle pack frames --output-file cat.gif --overwrite\n  gifbundle info cat.gif --json\n  gifbundle completions zsh > _gifbundle";

#[derive(Debug, Parser)]
#[command(
    name = "gifbundle",
    version,
    about = "Unpack a GIF into PNG frames, or pack PNG frames into a GIF",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output (RUST_LOG overrides).
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar.
    #[arg(long, global = true)]
    progress: bool,

    /// Timeout in seconds for sources fetched over http(s).
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Unpack a GIF into one PNG per frame.
    #[command(
        about = "Unpack a gif into its images",
        after_help = "Examples:\n  gifbundle unpack cat.gif\n  gifbundle unpack https://example.com/cat.gif --output-dir frames"
    )]
    Unpack {
        /// Input GIF path or URL.
        input: String,
        /// Directory for the frame files. Defaults to the input's directory,
        /// or `output` for URLs.
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Keep going when a single frame fails to encode.
        #[arg(long)]
        skip_failed_frames: bool,
    },

    /// Pack the PNG files of a directory into a GIF.
    #[command(
        about = "Pack a set of images into a gif",
        after_help = "Examples:\n  gifbundle pack frames --output-file cat.gif\n  gifbundle pack frames --output-file cat.gif --order enumeration --loop-count 3"
    )]
    Pack {
        /// Directory holding only palette-indexed PNG files.
        input: PathBuf,
        /// Output GIF path.
        #[arg(long)]
        output_file: PathBuf,
        /// Frame order: natural | lexicographic | enumeration.
        #[arg(long, default_value = "natural")]
        order: String,
        /// Play the animation this many times instead of forever.
        #[arg(long)]
        loop_count: Option<u16>,
        /// Allow overwriting an existing output file.
        #[arg(long)]
        overwrite: bool,
    },

    /// Print dimensions, frame count, and timing of a GIF.
    #[command(about = "Print gif metadata", visible_alias = "probe")]
    Info {
        /// Input GIF path or URL.
        input: String,
        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Report what an unpack/pack round trip would not preserve.
    #[command(about = "Validate a gif")]
    Validate {
        /// Input GIF path or URL.
        input: String,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_frame_order(value: &str) -> Option<FrameOrder> {
    match value.to_ascii_lowercase().as_str() {
        "natural" | "numeric" => Some(FrameOrder::Natural),
        "lexicographic" | "name" | "sorted" => Some(FrameOrder::Lexicographic),
        "enumeration" | "directory" | "none" => Some(FrameOrder::Enumeration),
        _ => None,
    }
}

fn describe_repeat(repeat: Repeat) -> String {
    match repeat {
        Repeat::Infinite => "infinite".to_string(),
        Repeat::Finite(count) => count.to_string(),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        match info.current_path.as_ref().and_then(|path| path.file_name()) {
            Some(name) => self.bar.set_message(name.to_string_lossy().into_owned()),
            None => self.bar.finish_with_message("done"),
        }
    }
}

fn progress_callback(
    global: &GlobalOptions,
) -> Result<Option<Arc<dyn ProgressCallback>>, Box<dyn std::error::Error>> {
    if global.progress {
        Ok(Some(Arc::new(BarProgress::new()?)))
    } else {
        Ok(None)
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);
    let timeout = Duration::from_secs(cli.global.timeout);

    match cli.command {
        Commands::Unpack {
            input,
            output_dir,
            skip_failed_frames,
        } => {
            let mut options = UnpackOptions::new().with_remote_timeout(timeout);
            if let Some(directory) = output_dir {
                options = options.with_output_directory(directory);
            }
            if skip_failed_frames {
                options = options.with_write_policy(WritePolicy::SkipFailedFrames);
            }
            if let Some(callback) = progress_callback(&cli.global)? {
                options = options.with_progress(callback);
            }

            let report = gifbundle::unpack(&input, &options)?;

            for skipped in &report.skipped {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("skipped frame {}: {}", skipped.index, skipped.reason).yellow()
                );
            }
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Unpacked {}/{} frame(s) ({}x{}) to {}",
                    report.written.len(),
                    report.frame_count,
                    report.width,
                    report.height,
                    report.output_directory.display()
                )
                .green()
            );
        }
        Commands::Pack {
            input,
            output_file,
            order,
            loop_count,
            overwrite,
        } => {
            let order = parse_frame_order(&order).ok_or(format!("unsupported --order: {order}"))?;
            let repeat = loop_count.map_or(Repeat::Infinite, Repeat::Finite);

            let mut options = PackOptions::new()
                .with_order(order)
                .with_repeat(repeat)
                .with_overwrite(overwrite);
            if let Some(callback) = progress_callback(&cli.global)? {
                options = options.with_progress(callback);
            }

            let report = gifbundle::pack(&input, &output_file, &options)?;
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Packed {} frame(s) ({}x{}, {} bytes) into {}",
                    report.frame_count,
                    report.width,
                    report.height,
                    report.bytes_written,
                    report.output_path.display()
                )
                .green()
            );
        }
        Commands::Info { input, json } => {
            let metadata = gifbundle::inspect(&input, timeout)?;
            if json {
                let payload = json!({
                    "origin": format!("{:?}", metadata.origin),
                    "width": metadata.width,
                    "height": metadata.height,
                    "frame_count": metadata.frame_count,
                    "loop": describe_repeat(metadata.repeat),
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "max_palette_entries": metadata.max_palette_len,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Dimensions: {}x{}", metadata.width, metadata.height);
                println!("Frames: {}", metadata.frame_count);
                println!("Loop: {}", describe_repeat(metadata.repeat));
                println!("Duration: {:?}", metadata.duration);
                println!("Largest palette: {} entries", metadata.max_palette_len);
            }
        }
        Commands::Validate { input } => {
            let (container, _) = gifbundle::load_container(&input, timeout)?;
            print!("{}", container.validate());
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "gifbundle", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use gifbundle::{FrameOrder, Repeat};

    use super::{Cli, describe_repeat, parse_frame_order};

    #[test]
    fn parse_frame_order_aliases() {
        assert_eq!(parse_frame_order("natural"), Some(FrameOrder::Natural));
        assert_eq!(parse_frame_order("NAME"), Some(FrameOrder::Lexicographic));
        assert_eq!(parse_frame_order("directory"), Some(FrameOrder::Enumeration));
        assert_eq!(parse_frame_order("random"), None);
    }

    #[test]
    fn describe_repeat_values() {
        assert_eq!(describe_repeat(Repeat::Infinite), "infinite");
        assert_eq!(describe_repeat(Repeat::Finite(3)), "3");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
