use sigmalite::cli::{parse_args, run_cli_command, CliCommand, USAGE};
use sigmalite::logging;

use color_eyre::Result;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Usage errors exit before any runtime or network setup
    if let CliCommand::Invalid(message) = &command {
        eprintln!("Error: {}\n\n{}", message, USAGE);
        std::process::exit(2);
    }

    color_eyre::install()?;
    logging::init();

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(run_cli_command(command)) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
