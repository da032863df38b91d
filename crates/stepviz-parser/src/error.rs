//! Diagnostics reported while reading stepviz inputs.
//!
//! Every problem found in an input file becomes a [`Diagnostic`]: a severity,
//! an [`ErrorCode`], one or more labelled [`Span`](crate::Span)s and optional
//! help text. A failed parse returns all of them at once inside a
//! [`ParseError`].
//!
//! ```
//! # use stepviz_parser::error::{Diagnostic, ErrorCode};
//! # use stepviz_parser::Span;
//! let diag = Diagnostic::error("parallel state `Fanout` has no branches")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(40..48), "declared here")
//!     .with_help("add at least one entry to `Branches`");
//!
//! assert_eq!(
//!     diag.to_string(),
//!     "error[E200]: parallel state `Fanout` has no branches"
//! );
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
