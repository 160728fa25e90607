use chumsky::{prelude::*, regex::regex};
use thiserror::Error;

use crate::table::TASK_SIZE;

/// A prepared statement, ready for execution against the table
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `insert <task> <hours>` — the date is stamped at execution time
    Insert { task: String, hours: f32 },

    /// `select` — list every row
    Select,

    /// `total <task>` — sum hours over rows with an exactly matching task
    Total { task: String },

    /// `average [task]` — average hours over matching rows, or over all
    /// rows when no task is given
    Average { task: Option<String> },
}

#[derive(Debug, Error, PartialEq)]
pub enum PrepareError {
    #[error("Syntax error, could not parse statement.")]
    Syntax,

    #[error("String is too long.")]
    TaskTooLong,

    #[error("Unrecognized keyword at start of '{0}'.")]
    Unrecognized(String),
}

pub fn parser<'a>() -> impl Parser<'a, &'a str, Statement, extra::Err<Rich<'a, char>>> {
    // Tasks are single whitespace-delimited words; hours accept an
    // optional fraction
    let insert = just("insert")
        .padded()
        .ignore_then(regex(r"\S+").padded())
        .then(
            regex(r"-?\d+(\.\d*)?")
                .map(|s: &str| s.parse::<f32>().unwrap())
                .padded(),
        )
        .map(|(task, hours): (&str, f32)| Statement::Insert {
            task: task.to_string(),
            hours,
        });

    let select = just("select").padded().to(Statement::Select);

    let total = just("total")
        .padded()
        .ignore_then(regex(r"\S+").padded())
        .map(|task: &str| Statement::Total {
            task: task.to_string(),
        });

    let average = just("average")
        .padded()
        .ignore_then(regex(r"\S+").padded().or_not())
        .map(|task: Option<&str>| Statement::Average {
            task: task.map(str::to_string),
        });

    choice((insert, select, total, average)).then_ignore(end())
}

/// Parse and validate one input line into a [`Statement`].
///
/// All failures here are recoverable: the caller reports them and the
/// session continues with nothing mutated.
pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
    let keyword = input.split_whitespace().next().unwrap_or("");
    if !matches!(keyword, "insert" | "select" | "total" | "average") {
        return Err(PrepareError::Unrecognized(input.trim().to_string()));
    }

    let statement = parser()
        .parse(input)
        .into_result()
        .map_err(|_| PrepareError::Syntax)?;

    if let Statement::Insert { task, .. } = &statement
        && task.len() > TASK_SIZE
    {
        return Err(PrepareError::TaskTooLong);
    }

    Ok(statement)
}
