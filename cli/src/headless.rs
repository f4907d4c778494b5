//! Line oriented mode for driving the calculator from a chat bot or another process.
//!
//! Every line is one command, every command gets exactly one reply. Malformed commands are
//! answered with an error reply instead of ending the session. Input ends at EOF or `quit`.

use modcalc_core::{command::strip_prefix, Command, ExecuteOptions};
use std::io::{BufRead, Write};

use crate::output::{self, Format};

#[derive(Debug, Clone)]
pub(crate) struct Config {
    /// Lines without this prefix are ignored
    pub(crate) prefix: Option<String>,
    pub(crate) format: Format,
    pub(crate) options: ExecuteOptions,
    /// Echo everything read and written to stderr
    pub(crate) trace_io: bool,
}

pub(crate) fn run(
    config: &Config,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    use owo_colors::OwoColorize;

    log::info!(
        "headless session started, prefix = {:?}, format = {:?}",
        config.prefix,
        config.format
    );

    let mut replies = 0usize;
    for line in input.lines() {
        let line = line?;

        if config.trace_io {
            eprintln!("{} {line}", " RX ".black().on_blue());
        }

        let Some(line) = strip_prefix(&line, config.prefix.as_deref()) else {
            continue;
        };
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = match Command::parse(line, None) {
            Ok(Some(cmd)) => cmd.execute(&config.options),
            Ok(None) => continue,
            Err(err) => Err(err),
        };
        if let Err(err) = &reply {
            log::warn!("rejected {line:?}: {err}");
        }

        let mut text = output::render(config.format, &reply)?;
        if config.format == Format::Text {
            // blank line between replies
            text.push('\n');
        }

        if config.trace_io {
            eprint!("{} {}", " TX ".black().on_purple(), text.purple());
        }

        output.write_all(text.as_bytes())?;
        output.flush()?;
        replies += 1;
    }

    log::info!("headless session ended after {replies} replies");
    Ok(())
}
