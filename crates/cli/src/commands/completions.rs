//! # CLI Completions Command

use clap::Command;
use clap_complete::Shell;
use error::Result;

/// Writes completions for `shell` to stdout.
pub fn completions(shell: Shell, cmd: &mut Command) -> Result<()> {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut std::io::stdout());
    Ok(())
}
