use prettytable::{format, row};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::command::{self, Statement};
use crate::database::Database;
use crate::table::{Row, TableError};

const PROMPT: &str = "void ~ ";

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Interactive command loop.
///
/// Recoverable conditions (bad input, a full table) are printed and the
/// loop continues; storage failures propagate out so the caller can
/// terminate with a diagnostic. `.exit` and Ctrl-D both close the
/// database before returning.
pub struct Repl {
    db: Database,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new(db: Database) -> Result<Self, ReplError> {
        let editor = DefaultEditor::new()?;
        Ok(Self { db, editor })
    }

    pub fn run(mut self) -> Result<(), ReplError> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with('.') {
                        if !self.meta_command(line) {
                            break;
                        }
                    } else {
                        self.statement(line)?;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        self.db.close()?;
        Ok(())
    }

    /// Handle a leading-dot command; returns false when the loop should
    /// stop
    fn meta_command(&mut self, line: &str) -> bool {
        match line {
            ".exit" => false,
            ".help" => {
                println!("insert <task> <hours>  record a task entry");
                println!("select                 list all entries");
                println!("total <task>           sum hours for a task");
                println!("average [task]         average hours, per task or overall");
                println!(".exit                  save and quit");
                true
            }
            _ => {
                println!("Unrecognized command '{line}'.");
                true
            }
        }
    }

    fn statement(&mut self, line: &str) -> Result<(), ReplError> {
        let statement = match command::prepare(line) {
            Ok(statement) => statement,
            Err(err) => {
                println!("{err}");
                return Ok(());
            }
        };

        match statement {
            Statement::Insert { task, hours } => match self.db.insert(&task, hours) {
                Ok(()) => {}
                Err(TableError::Full) => println!("Error: table full."),
                Err(err) => return Err(err.into()),
            },
            Statement::Select => {
                let rows = self.db.rows()?;
                print_rows(&rows);
            }
            Statement::Total { task } => {
                let total = self.db.total(&task)?;
                println!("> task: {task} - total time: {total:.2}");
            }
            Statement::Average { task } => {
                let average = self.db.average(task.as_deref())?;
                match task {
                    Some(task) => println!("> task: {task} - average time: {average:.2}"),
                    None => println!("> global average: {average:.2}"),
                }
            }
        }

        Ok(())
    }
}

fn print_rows(rows: &[Row]) {
    let mut output = prettytable::Table::new();
    output.set_format(*format::consts::FORMAT_BOX_CHARS);
    output.set_titles(row!["task", "hours", "date"]);
    for r in rows {
        output.add_row(row![r.task, format!("{:.2}", r.hours), r.date]);
    }
    output.printstd();
}
