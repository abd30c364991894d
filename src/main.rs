//! Binary entry point: delegates immediately to the library's CLI driver
//! (teacher's `fn main` → `run_cli` shape, `src/main.rs`).

fn main() {
    if let Err(e) = declaratio::cli::run_cli() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
