//! Function selector: parse a function name and run it against the document.

use std::fmt;

use super::Document;
use crate::error::{GridsheetError, Result};
use gridsheet_engine::builtins::{Aggregate, TextTransform};
use gridsheet_engine::engine::CellRef;

/// Everything the function selector can execute.
#[derive(Clone, Debug, PartialEq)]
pub enum Function {
    Aggregate(Aggregate),
    Transform(TextTransform),
    RemoveDuplicates,
    FindAndReplace { search: String, replace: String },
}

impl Function {
    /// Names offered by the selector, in menu order.
    pub const NAMES: [&'static str; 10] = [
        "SUM",
        "AVERAGE",
        "MAX",
        "MIN",
        "COUNT",
        "TRIM",
        "UPPER",
        "LOWER",
        "REMOVE_DUPLICATES",
        "FIND_AND_REPLACE",
    ];

    /// Parse a function name (case-insensitive) plus its arguments.
    ///
    /// Only FIND_AND_REPLACE takes arguments: the search text and the
    /// replacement (which may be omitted to delete matches).
    pub fn parse(name: &str, args: &[&str]) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        if let Ok(aggregate) = upper.parse::<Aggregate>() {
            return Ok(Function::Aggregate(aggregate));
        }
        match upper.as_str() {
            "TRIM" => Ok(Function::Transform(TextTransform::Trim)),
            "UPPER" => Ok(Function::Transform(TextTransform::Upper)),
            "LOWER" => Ok(Function::Transform(TextTransform::Lower)),
            "REMOVE_DUPLICATES" => Ok(Function::RemoveDuplicates),
            "FIND_AND_REPLACE" => match args {
                [search] => Ok(Function::FindAndReplace {
                    search: search.to_string(),
                    replace: String::new(),
                }),
                [search, replace] => Ok(Function::FindAndReplace {
                    search: search.to_string(),
                    replace: replace.to_string(),
                }),
                _ => Err(GridsheetError::InvalidInput(
                    "FIND_AND_REPLACE takes <search> [replace]".to_string(),
                )),
            },
            _ => Err(GridsheetError::UnknownFunction(name.trim().to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Aggregate(a) => a.name(),
            Function::Transform(t) => t.name(),
            Function::RemoveDuplicates => "REMOVE_DUPLICATES",
            Function::FindAndReplace { .. } => "FIND_AND_REPLACE",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of running a [`Function`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FunctionOutcome {
    /// An aggregate value
    Value(f64),
    /// A text operation changed (or removed) this many cells
    Applied { cells: usize },
}

impl fmt::Display for FunctionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionOutcome::Value(v) => write!(f, "{}", v),
            FunctionOutcome::Applied { cells: 1 } => write!(f, "1 cell"),
            FunctionOutcome::Applied { cells } => write!(f, "{} cells", cells),
        }
    }
}

impl Document {
    /// Evaluate an aggregate over every populated cell of the active sheet.
    pub fn evaluate(&self, aggregate: Aggregate) -> Result<f64> {
        let store = self.require_store()?;
        let range: Vec<CellRef> = store.keys().copied().collect();
        aggregate
            .evaluate(store, &range)
            .ok_or(GridsheetError::DivisionByZero)
    }

    /// Run a function chosen from the selector.
    ///
    /// Like the toolbar, the selector needs a focused cell even for functions
    /// that work on the whole sheet.
    pub fn run_function(&mut self, function: &Function) -> Result<FunctionOutcome> {
        self.require_store()?;
        self.require_cell()?;
        let outcome = match function {
            Function::Aggregate(aggregate) => FunctionOutcome::Value(self.evaluate(*aggregate)?),
            Function::Transform(transform) => {
                self.transform_active(*transform)?;
                FunctionOutcome::Applied { cells: 1 }
            }
            Function::RemoveDuplicates => FunctionOutcome::Applied {
                cells: self.remove_duplicates()?,
            },
            Function::FindAndReplace { search, replace } => FunctionOutcome::Applied {
                cells: self.find_and_replace(search, replace)?,
            },
        };
        log::debug!("{} -> {}", function, outcome);
        Ok(outcome)
    }
}
