use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{convert::convert, init::init},
    exit_status::ExitStatus,
};

/// Dispatches to the command handler for the parsed arguments.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Convert(cmd)) => convert(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
