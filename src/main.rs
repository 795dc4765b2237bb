//! # drive-inventory CLI
//!
//! Command-line interface for the drive inventory.
//!
//! ## Usage
//! ```bash
//! drive-inventory scan --volumes H I J --output-root /data/inventory
//! drive-inventory scan --volumes H=/mnt/usb --output json
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
