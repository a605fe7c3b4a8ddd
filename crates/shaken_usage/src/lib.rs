//! Parsing for chat command arguments.
//!
//! A line is split with [`lex`], then matched against declared [`Usages`] by a
//! [`Parser`]. Usage patterns are made of:
//!
//! | pattern      | meaning                                  |
//! | ------------ | ---------------------------------------- |
//! | `<name>`     | a required argument                      |
//! | `<name...>`  | required, takes the rest of the line     |
//! | `[name]`     | an optional argument                     |
//! | `[name...]`  | optional, takes the rest of the line     |
//! | `-name`      | a flag                                   |
//! | `a\|b\|c`    | one of these words                       |
//! | `...`        | ignore everything else                   |
//!
//! ```
//! # use shaken_usage::{lex, Parser, Usages};
//! let usages = Usages::new()
//!     .with("<name>", "greet")?
//!     .with("<name> <greeting...>", "custom")?;
//!
//! let inv = lex("hello museun good morning").unwrap();
//! let parser = Parser::default();
//! let (handler, greeting) = parser
//!     .parse(&inv.items, inv.text, &usages, |h, m| (*h, m["greeting"].string()), |_| {})
//!     .unwrap();
//!
//! assert_eq!(handler, "custom");
//! assert_eq!(greeting, "good morning");
//! # Ok::<_, shaken_usage::Error>(())
//! ```

mod arg;
pub use arg::Arg;

mod directory;
pub use directory::*;

mod error;
pub use error::Error;

mod lex;
pub use lex::{lex, Invocation};

pub mod model;

mod parse;
pub use parse::{Failure, Kind, Matched, Outcome, Parser, Subkind, Usages};

mod usage;
pub use usage::{Token, Usage};
