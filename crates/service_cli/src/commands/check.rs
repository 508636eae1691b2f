//! Check command: reports build and runtime configuration.

use crate::Result;

/// Runs the check command.
pub fn run() -> Result<()> {
    println!("creditlink {}", env!("CARGO_PKG_VERSION"));
    println!("  rayon threads: {}", rayon::current_num_threads());
    println!("  default quadrature points: 25");
    println!("  default grid step: 3 months");
    Ok(())
}
