//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use venuemap_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    if let Err(err) = venuemap_cli::run() {
        if let CliError::ArgumentParsing(clap_err) = &err {
            clap_err.exit();
        }
        eprintln!("venuemap: {err}");
        std::process::exit(1);
    }
}
