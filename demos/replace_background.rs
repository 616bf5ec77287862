//! Replace window-like regions of a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example replace_background -- input.jpg output.jpg [background.jpg]
//! ```

use std::env;
use std::path::PathBuf;
use std::process;

use geomask::{GeoMaskEngine, ProcessOptions};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output> [background]", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];

    let opts = ProcessOptions {
        background: args.get(3).map(PathBuf::from),
        ..ProcessOptions::default()
    };
    let engine = GeoMaskEngine::default();
    let result = engine.process_file(input.as_ref(), output.as_ref(), &opts);

    if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
