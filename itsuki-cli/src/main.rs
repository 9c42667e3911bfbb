//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = itsuki_cli::run() {
        eprintln!("itsuki: {err}");
        std::process::exit(1);
    }
}
