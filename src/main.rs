//! tokenmap-inspect binary: prints the report, or the error on stderr with exit status 1.

use tokenmap_inspect::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
