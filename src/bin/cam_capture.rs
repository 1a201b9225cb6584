//! cam-capture - grab a single still image with the Pi camera.

use clap::Parser;
use pi_utils::capture;

#[derive(Parser)]
#[command(name = "cam-capture")]
#[command(about = "Capture a still image using the Pi camera (libcamera)")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {}

fn main() {
    let _cli = Cli::parse();

    if let Err(err) = pi_utils::init_diagnostics(false, false) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> pi_utils::Result<()> {
    let out_dir = capture::default_output_dir()?;
    std::fs::create_dir_all(&out_dir)?;

    let path = capture::capture_path(&out_dir);
    println!("Capturing image to {} ...", path.display());

    match capture::capture_to(&path) {
        Ok(()) => {
            println!("Image saved successfully!");
            Ok(())
        }
        Err(err) => {
            tracing::debug!("capture failed: {err}");
            println!("Failed to capture image.");
            std::process::exit(1);
        }
    }
}
