use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use geomask::{
    default_output_path, CompositeOptions, DetectorConfig, GeoMaskEngine, MergeMode,
    ProcessOptions, ProcessResult, DEFAULT_JPEG_QUALITY,
};

#[derive(Parser)]
#[command(
    name = "geomask",
    about = "Replace window-like background regions in photos with a blended substitute",
    version,
    after_help = "Simple usage: geomask <image>  (writes <name>_geomasked.<ext> next to it)\n\n\
                  Without --background a procedural gradient is blended in.\n\
                  Detection is heuristic: not every window is found and other\n\
                  rectangular shapes may be replaced too."
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_geomasked.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// Replacement background image (resized to fit each input)
    #[arg(short, long)]
    background: Option<String>,

    /// Minimum enclosed contour area in pixels
    #[arg(long, default_value = "1000")]
    min_area: f64,

    /// Exclusive lower bound on region width/height
    #[arg(long, default_value = "0.5")]
    min_aspect: f64,

    /// Exclusive upper bound on region width/height
    #[arg(long, default_value = "3.0")]
    max_aspect: f64,

    /// Mask smoothing kernel size (odd)
    #[arg(long, default_value = "15")]
    blur_kernel: u32,

    /// Merge overlapping regions until none overlap
    #[arg(long)]
    strict_merge: bool,

    /// JPEG output quality (1-100)
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.blur_kernel == 0 || cli.blur_kernel % 2 == 0 {
        eprintln!("Error: Blur kernel size must be odd");
        process::exit(1);
    }

    if !(1..=100).contains(&cli.quality) {
        eprintln!("Error: Quality must be between 1 and 100");
        process::exit(1);
    }

    if cli.min_aspect >= cli.max_aspect {
        eprintln!("Error: --min-aspect must be below --max-aspect");
        process::exit(1);
    }

    let engine = GeoMaskEngine::new(
        DetectorConfig {
            min_area: cli.min_area,
            min_aspect: cli.min_aspect,
            max_aspect: cli.max_aspect,
            merge_mode: if cli.strict_merge {
                MergeMode::Strict
            } else {
                MergeMode::Greedy
            },
            ..DetectorConfig::default()
        },
        CompositeOptions {
            blur_kernel_size: cli.blur_kernel,
        },
    );

    let opts = ProcessOptions {
        background: cli.background.map(PathBuf::from),
        jpeg_quality: cli.quality,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if !opts.quiet {
        match &opts.background {
            Some(bg) => eprintln!("Background: {}", bg.display()),
            None => eprintln!("Background: procedural gradient"),
        }
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: geomask <input_dir> -o <output_dir>");
            process::exit(1);
        };
        engine.process_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![engine.process_file(input_path, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        if !opts.quiet {
            eprintln!("[OK] {filename} ({} region(s))", result.regions);
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
