use crate::cli::parse_line;
use crate::commands::{Outcome, execute_command};
use crate::database::TaskStore;
use crate::dates;
use crate::manager::TaskManager;
use crate::types::TaskError;
use chrono::NaiveDate;
use colored::*;
use std::future::Future;
use std::io::{self, BufRead, Write};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

const PROMPT: &str = "> ";

/// Read-eval-print loop over an owned task collection.
pub struct Console<'a> {
    manager: &'a mut TaskManager,
    store: Option<&'a mut TaskStore>,
    today: fn() -> NaiveDate,
}

impl<'a> Console<'a> {
    pub fn new(manager: &'a mut TaskManager) -> Self {
        Console {
            manager,
            store: None,
            today: dates::today,
        }
    }

    /// Save the collection after every command that changes it.
    pub fn with_store(mut self, store: &'a mut TaskStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Runs until `exit` or end of input. Only failures of the input or
    /// output streams are returned; command errors are printed.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<(), TaskError> {
        print_banner(out)?;

        loop {
            write!(out, "\n{}", PROMPT)?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out, "\nGoodbye!")?;
                return Ok(());
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let today = (self.today)();
            let result = parse_line(&tokens, today)
                .and_then(|command| execute_command(self.manager, command, today, out));

            match result {
                Ok(Outcome::Exit) => {
                    writeln!(out, "Goodbye!")?;
                    return Ok(());
                }
                Ok(Outcome::Changed) => self.persist(out)?,
                Ok(Outcome::Unchanged) => {}
                Err(TaskError::Io(e)) => return Err(TaskError::Io(e)),
                Err(e) => {
                    debug!(command = tokens[0], error = ?e, "command failed");
                    writeln!(out, "{}", e)?;
                }
            }
        }
    }

    fn persist<W: Write>(&mut self, out: &mut W) -> Result<(), TaskError> {
        let Some(store) = self.store.as_deref_mut() else {
            return Ok(());
        };
        if let Err(e) = store.save(self.manager) {
            warn!(error = %e, "failed to save tasks");
            writeln!(out, "{} {}", "Changes were not saved:".bright_red(), e)?;
        }
        Ok(())
    }
}

/// Blocks until `signal` resolves, then says goodbye. A failed signal
/// listener is returned without printing anything.
pub fn wait_for_interrupt<F, W>(runtime: &Runtime, signal: F, out: &mut W) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
    W: Write,
{
    runtime.block_on(signal)?;
    debug!("interrupted");
    writeln!(out, "\nGoodbye!")?;
    out.flush()
}

fn print_banner<W: Write>(out: &mut W) -> Result<(), TaskError> {
    writeln!(out, "{}", "===========================================".dimmed())?;
    writeln!(out, "{}", "              Todo Console".bold())?;
    writeln!(out, "{}", "===========================================".dimmed())?;
    writeln!(out, "Type 'help' for available commands or 'exit' to quit.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Builder;

    fn runtime() -> Runtime {
        Builder::new_current_thread().enable_all().build().unwrap()
    }

    #[test]
    fn interrupt_says_goodbye() {
        let mut out = Vec::new();
        wait_for_interrupt(&runtime(), async { Ok(()) }, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nGoodbye!\n");
    }

    #[test]
    fn failed_listener_prints_nothing() {
        let mut out = Vec::new();
        let signal = async { Err(io::Error::other("no signal handler")) };
        let err = wait_for_interrupt(&runtime(), signal, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "no signal handler");
        assert!(out.is_empty());
    }
}
