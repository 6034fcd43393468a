//! The line-oriented command interpreter.
//!
//! Each line is parsed into a [`Command`], optionally confirmed, run against
//! a [`Database`] and reported. A failing command prints its diagnostic and
//! the loop carries on.

use std::{
    fmt,
    io::{self, BufRead, Write},
    time::Instant,
};

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use tracing::{debug, warn};

use crate::{
    common::error::DbResult,
    config::Config,
    db::database::Database,
    storage::{JsonStorage, Storage},
};

pub mod cache;
pub mod command;
pub mod error;
pub mod keyword;
pub(crate) mod lexer;
pub mod prompt;
pub mod render;

pub use cache::QueryCache;
pub use command::Command;
pub use error::CommandError;
pub use prompt::{AutoConfirm, Confirm, LinePrompt};

pub const PROMPT: &str = "scrawl> ";

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell<R, W, S: Storage = JsonStorage> {
    db: Database<S>,
    config: Config,
    cache: QueryCache,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write, S: Storage> Shell<R, W, S> {
    pub fn new(db: Database<S>, config: Config, input: R, output: W) -> Self {
        Self {
            db,
            config,
            cache: QueryCache::new(),
            input,
            output,
        }
    }

    pub fn database(&self) -> &Database<S> {
        &self.db
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads and runs lines until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Type `help` for a list of commands.")?;

        let mut line = String::new();
        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }

            if self.run_line(&line)? == Flow::Exit {
                break;
            }
        }

        self.output.flush()
    }

    /// Runs a single command line and prints its outcome.
    ///
    /// Only failures to write output are returned; command errors are
    /// printed.
    pub fn run_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                warn!(error = %err, "command rejected");
                self.report(&err)?;
                return Ok(Flow::Continue);
            }
        };

        if command == Command::Exit {
            return Ok(Flow::Exit);
        }

        let name = command.name();
        let started = Instant::now();
        let result = self.execute(command);
        let elapsed = started.elapsed();

        debug!(command = name, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "command finished");

        match result {
            Ok(message) => writeln!(self.output, "{message}")?,
            Err(err) => {
                warn!(command = name, error = %err, "command failed");
                self.report(&err)?;
            }
        }

        if self.config.timing {
            writeln!(self.output, "{name} finished in {:.3}s", elapsed.as_secs_f64())?;
        }

        Ok(Flow::Continue)
    }

    fn execute(&mut self, command: Command) -> DbResult<String> {
        if command.is_mutation() {
            self.cache.invalidate_all();
        }

        let message = match command {
            Command::CreateTable { name, columns } => {
                let schema = self.db.create_table(&name, &columns[..])?;
                format!("Table \"{name}\" created with columns: {schema}")
            }
            Command::DropTable { name } => {
                if !self.confirm(&format!("Drop table \"{name}\"?"))? {
                    return Ok(prompt::CANCELLED.to_string());
                }
                self.db.drop_table(&name)?;
                format!("Table \"{name}\" dropped.")
            }
            Command::ListTables => render::table_list(&self.db.list_tables()),
            Command::Insert { table, values } => {
                let id = self.db.insert(&table, values)?;
                format!("Record with ID={id} added to table \"{table}\".")
            }
            Command::Select { table, filter } => {
                let rows = self.cache.get_or_compute((table.clone(), filter.clone()), || {
                    self.db.select(&table, filter.as_ref())
                })?;
                render::rows_table(self.db.get_schema(&table)?, &rows)
            }
            Command::Update { table, set, filter } => {
                let updated = self.db.update(&table, &set, &filter)?;
                format!("Updated {updated} record(s) in table \"{table}\".")
            }
            Command::Delete { table, filter } => {
                let question = format!("Delete records from \"{table}\" where {filter}?");
                if !self.confirm(&question)? {
                    return Ok(prompt::CANCELLED.to_string());
                }
                let deleted = self.db.delete(&table, &filter)?;
                format!("Deleted {deleted} record(s) from table \"{table}\".")
            }
            Command::Info { table } => self.db.info(&table)?.to_string(),
            Command::Help => render::HELP.to_string(),
            Command::Exit => String::new(),
        };

        Ok(message)
    }

    fn confirm(&mut self, question: &str) -> DbResult<bool> {
        let approved = if self.config.assume_yes {
            AutoConfirm.confirm(question)?
        } else {
            LinePrompt::new(&mut self.input, &mut self.output).confirm(question)?
        };

        if !approved {
            warn!(question, "operation cancelled");
        }
        Ok(approved)
    }

    fn report(&mut self, diagnostic: &dyn Diagnostic) -> io::Result<()> {
        let rendered = render_diagnostic(diagnostic).map_err(io::Error::other)?;
        write!(self.output, "{rendered}")
    }
}

/// Renders a diagnostic without colors so output is the same on any
/// terminal.
pub fn render_diagnostic(diagnostic: &dyn Diagnostic) -> Result<String, fmt::Error> {
    let mut rendered = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_width(80)
        .render_report(&mut rendered, diagnostic)?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn shell(input: &str, config: Config) -> Shell<&[u8], Vec<u8>, MemoryStorage> {
        let db = Database::with_storage(MemoryStorage::new()).unwrap();
        Shell::new(db, config, input.as_bytes(), Vec::new())
    }

    fn yes() -> Config {
        Config {
            assume_yes: true,
            ..Config::default()
        }
    }

    fn output(shell: Shell<&[u8], Vec<u8>, MemoryStorage>) -> String {
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn test_run_line_messages() {
        let mut shell = shell("", yes());
        shell.run_line("create_table users name:str age:int").unwrap();
        shell.run_line("insert into users values (\"Sergei\", 28)").unwrap();
        shell.run_line("update users set age = 29 where ID = 1").unwrap();
        shell.run_line("delete from users where ID = 1").unwrap();
        shell.run_line("drop_table users").unwrap();

        let out = output(shell);
        assert!(out.contains("Table \"users\" created with columns: ID:int, name:str, age:int"));
        assert!(out.contains("Record with ID=1 added to table \"users\"."));
        assert!(out.contains("Updated 1 record(s) in table \"users\"."));
        assert!(out.contains("Deleted 1 record(s) from table \"users\"."));
        assert!(out.contains("Table \"users\" dropped."));
    }

    #[test]
    fn test_errors_do_not_stop_the_shell() {
        let mut shell = shell("", Config::default());

        assert_eq!(shell.run_line("select from nowhere").unwrap(), Flow::Continue);
        assert_eq!(shell.run_line("bogus").unwrap(), Flow::Continue);
        assert_eq!(shell.run_line("exit").unwrap(), Flow::Exit);

        let out = output(shell);
        assert!(out.contains("Table \"nowhere\" does not exist"));
        assert!(out.contains("Unknown command: bogus"));
    }

    #[test]
    fn test_drop_needs_confirmation() {
        let mut shell = shell("n\ny\n", Config::default());
        shell.run_line("create_table users name:str").unwrap();

        shell.run_line("drop_table users").unwrap();
        assert_eq!(shell.database().list_tables(), ["users"]);

        shell.run_line("drop_table users").unwrap();
        assert!(shell.database().list_tables().is_empty());

        let out = output(shell);
        assert!(out.contains("Drop table \"users\"? [y/N] "));
        assert!(out.contains(prompt::CANCELLED));
    }

    #[test]
    fn test_contradictory_delete_removes_nothing() {
        let mut shell = shell("", yes());
        shell.run_line("create_table users name:str age:int").unwrap();
        shell.run_line("insert into users values (Sergei, 28)").unwrap();
        shell.run_line("insert into users values (Ivan, 25)").unwrap();

        shell.run_line("delete from users where age = 28 and age = 25").unwrap();
        assert_eq!(shell.database().info("users").unwrap().row_count, 2);

        assert!(output(shell).contains("No records matched"));
    }

    #[test]
    fn test_cancelled_delete_keeps_rows() {
        let mut shell = shell("no\n", Config::default());
        shell.run_line("create_table users name:str").unwrap();
        shell.run_line("insert into users values (Ivan)").unwrap();

        shell.run_line("delete from users where name = Ivan").unwrap();
        assert_eq!(shell.database().info("users").unwrap().row_count, 1);
    }

    #[test]
    fn test_select_cache_is_cleared_by_mutations() {
        let mut shell = shell("", yes());
        shell.run_line("create_table users name:str").unwrap();
        shell.run_line("insert into users values (Ivan)").unwrap();

        shell.run_line("select from users").unwrap();
        shell.run_line("select from users").unwrap();
        assert_eq!(shell.cache().hits(), 1);
        assert_eq!(shell.cache().len(), 1);

        shell.run_line("insert into users values (Olga)").unwrap();
        assert!(shell.cache().is_empty());

        shell.run_line("select from users").unwrap();
        let out = output(shell);
        assert!(out.contains("Olga"));
    }

    #[test]
    fn test_timing_line() {
        let mut shell = shell(
            "",
            Config {
                timing: true,
                ..Config::default()
            },
        );
        shell.run_line("list_tables").unwrap();

        let out = output(shell);
        assert!(out.contains("No tables."));
        assert!(out.contains("list_tables finished in "));
    }

    #[test]
    fn test_run_until_eof() {
        let mut shell = shell("create_table t a:int\nlist_tables\n", yes());
        shell.run().unwrap();

        let out = output(shell);
        assert!(out.starts_with("Type `help` for a list of commands."));
        assert!(out.contains("- t"));
    }

    #[test]
    fn test_run_stops_at_exit() {
        let mut shell = shell("exit\nlist_tables\n", yes());
        shell.run().unwrap();

        assert!(!output(shell).contains("No tables."));
    }

    #[test]
    fn test_diagnostic_points_at_input() {
        let err = Command::parse("info ../x").unwrap_err();
        let rendered = render_diagnostic(&err).unwrap();

        assert!(rendered.contains("expected a table name"));
        assert!(rendered.contains("info ../x"));
        assert!(rendered.contains("here"));
    }
}
