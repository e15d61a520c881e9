use clap::Parser;
use srcset_webp::config::{self, ConfigError, JobConfig, Overrides, Settings};
use srcset_webp::process;
use srcset_webp::{logging, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "srcset-webp")]
#[command(version)]
#[command(about = "Convert a folder of images into WebP source sets")]
#[command(long_about = "\
Convert a folder of images into WebP source sets

Every supported image in --folder is written as WebP once per target width,
plus a full-size copy, ready for <img srcset> and <picture>.

Output structure:

  savepath/
  ├── 320/
  │   └── photo.webp           # 320px wide
  ├── 640/
  │   └── photo.webp
  ├── originalsize/
  │   └── photo.webp           # source dimensions
  └── sourceset_info.txt       # what was generated (--no-info to skip)

Supported inputs: bmp, gif, jpeg, jpg, png, tif, tiff, webp

Sources narrower than a target width are written at their own size unless
--upscale is given. Unreadable files are reported and skipped; the run only
fails on configuration problems.")]
struct Cli {
    /// Folder containing the source images
    #[arg(long)]
    folder: PathBuf,

    /// Folder the WebP files are written to
    #[arg(long)]
    savepath: PathBuf,

    /// Target widths in pixels, processed in the given order [default: 320 640 960 1200]
    #[arg(long, num_args = 1.., value_parser = clap::value_parser!(u32).range(1..))]
    widths: Option<Vec<u32>>,

    /// WebP quality, 0-100 [default: 80]
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,

    /// Also convert images in subfolders, mirroring them in the output
    #[arg(long)]
    recursive: bool,

    /// Enlarge images narrower than a target width
    #[arg(long)]
    upscale: bool,

    /// Do not write sourceset_info.txt
    #[arg(long)]
    no_info: bool,

    /// Write sourceset.json listing every generated file
    #[arg(long)]
    manifest: bool,

    /// TOML settings file (values on the command line take precedence)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every written file
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            widths: self.widths.clone(),
            quality: self.quality,
            upscale: self.upscale,
            recursive: self.recursive,
            no_info: self.no_info,
            manifest: self.manifest,
        }
    }
}

/// Exit status for configuration problems. Per-file failures still exit 0.
const CONFIG_ERROR_EXIT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(CONFIG_ERROR_EXIT)
        }
    }
}

fn run(cli: Cli) -> Result<(), ConfigError> {
    let settings = match &cli.config {
        Some(path) => config::load_settings(path)?,
        None => Settings::default(),
    };
    let settings = settings.with_overrides(&cli.overrides());
    let job = JobConfig::from_settings(cli.folder, cli.savepath, &settings)?;

    // The header arrives as the first event, once the folders check out.
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = process::run(&job, Some(tx));
    printer.join().ok();

    let summary = result?;
    output::print_summary(&summary);
    Ok(())
}
