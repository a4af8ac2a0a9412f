//! Recover an overlaid region of a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example recover_region -- image.webp mask.webp out.webp 0.5 100 100 100
//! ```

use std::env;
use std::process;

use overlay_recovery::{process_file, RecoveryConfig};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 8 {
        eprintln!("Usage: {} <image> <mask> <output> <alpha> <r> <g> <b>", args[0]);
        process::exit(1);
    }

    let Ok(alpha) = args[4].parse::<f32>() else {
        eprintln!("Error: alpha must be a number");
        process::exit(1);
    };
    let mut rgb = [0i32; 3];
    for (slot, arg) in rgb.iter_mut().zip(&args[5..8]) {
        let Ok(value) = arg.parse() else {
            eprintln!("Error: r/g/b must be integers");
            process::exit(1);
        };
        *slot = value;
    }

    let result = RecoveryConfig::new(&args[1], &args[2], &args[3], alpha, rgb, false)
        .and_then(|config| process_file(&config));

    match result {
        Ok(summary) => println!(
            "Done: recovered {} pixels ({} saturated channels)",
            summary.report.recovered, summary.report.saturated_channels
        ),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
