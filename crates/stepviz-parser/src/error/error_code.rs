//! Error codes, grouped by the stage that reports them:
//!
//! - `E0xx` - JSON syntax
//! - `E1xx` - Data shape (wrong types, missing fields)
//! - `E2xx` - Structural checks on well-formed data

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E0xx)
    // =========================================================================
    /// Malformed JSON.
    E001,

    /// The input ended in the middle of a JSON value.
    E002,

    // =========================================================================
    // Data Errors (E1xx)
    // =========================================================================
    /// A value has the wrong type or a required field is missing.
    E100,

    // =========================================================================
    // Structural Errors (E2xx)
    // =========================================================================
    /// A `Parallel` state declares no branches.
    E200,

    /// A `Map` state declares no iterator.
    E201,

    /// A timeline record ends before it starts.
    E202,

    /// Two timeline records share an id.
    E203,

    /// `StartAt` names a state that is not declared.
    E204,

    /// A timeline edge or `parentId` names an unknown record.
    E205,
}

impl ErrorCode {
    /// The code as written in diagnostics, e.g. `"E001"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid JSON syntax",
            ErrorCode::E002 => "unexpected end of input",
            ErrorCode::E100 => "invalid data",
            ErrorCode::E200 => "parallel state without branches",
            ErrorCode::E201 => "map state without iterator",
            ErrorCode::E202 => "record ends before it starts",
            ErrorCode::E203 => "duplicate record id",
            ErrorCode::E204 => "unknown start state",
            ErrorCode::E205 => "unknown record reference",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
