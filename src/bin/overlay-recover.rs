use std::path::Path;
use std::process;

use clap::Parser;

use overlay_recovery::{process_file, ProcessOptions, ProcessSummary, RecoveryConfig, SourceInfo};

#[derive(Parser)]
#[command(
    name = "overlay-recover",
    about = "Recover pixels hidden under a constant-color overlay via reverse alpha blending",
    version,
    after_help = "Pixels whose mask value is exactly black (0,0,0) are copied unchanged;\n\
                  every other pixel is restored with\n\
                  original = (final - overlay * (1 - alpha)) / alpha"
)]
struct Cli {
    /// Composited input image
    #[arg(long)]
    image: String,

    /// Mask image (same dimensions as --image; black = untouched)
    #[arg(long)]
    mask: String,

    /// Output image (.webp or .png, always lossless)
    #[arg(long)]
    output: String,

    /// Weight of the original image in the blend, in (0, 1]
    #[arg(long, allow_negative_numbers = true)]
    alpha: f32,

    /// Overlay color red channel (0-255)
    #[arg(long, allow_negative_numbers = true)]
    r: i32,

    /// Overlay color green channel (0-255)
    #[arg(long, allow_negative_numbers = true)]
    g: i32,

    /// Overlay color blue channel (0-255)
    #[arg(long, allow_negative_numbers = true)]
    b: i32,

    /// Accept alpha values above 1 (amplifies instead of inverting a real blend)
    #[arg(long)]
    allow_amplify: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let opts = ProcessOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let config = match RecoveryConfig::new(
        &cli.image,
        &cli.mask,
        &cli.output,
        cli.alpha,
        [cli.r, cli.g, cli.b],
        cli.allow_amplify,
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if opts.verbose && !opts.quiet {
        eprintln!("alpha={}", config.alpha);
        eprintln!("overlay_color={}", config.overlay);
        eprintln!("using equation original = (final - overlay * (1 - alpha)) / alpha");
        if config.alpha.get() > 1.0 {
            eprintln!("WARNING: alpha above 1 - amplifying rather than inverting a blend");
        }
    }

    match process_file(&config) {
        Ok(summary) => print_summary(&config, &summary, &opts),
        Err(e) => {
            eprintln!("[FAIL] {e}");
            process::exit(1);
        }
    }
}

fn print_summary(config: &RecoveryConfig, summary: &ProcessSummary, opts: &ProcessOptions) {
    if opts.quiet {
        return;
    }

    let output = config.output_path();
    eprintln!("[OK] {}", display_name(output));

    if opts.verbose {
        print_source(&config.image, &summary.image);
        print_source(&config.mask, &summary.mask);
        let report = &summary.report;
        eprintln!(
            "  -> recovered {} pixels, passed through {}",
            report.recovered, report.passed_through
        );
        if report.saturated_channels > 0 {
            eprintln!(
                "  -> {} channel values saturated at 0 or 255",
                report.saturated_channels
            );
        }
        eprintln!("  -> saved {} bytes to {}", summary.output_bytes, output.display());
    }
}

fn print_source(path: &Path, info: &SourceInfo) {
    eprintln!(
        "  -> {}: read {} bytes, width={}, height={}",
        display_name(path),
        info.bytes,
        info.width,
        info.height
    );
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}
