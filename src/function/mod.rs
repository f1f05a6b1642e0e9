//! Function expression engine
//!
//! A [`FunctionFactory`] turns a labeled [`ConfigNode`](crate::config::ConfigNode)
//! tree into a [`Function`] graph. Graphs are immutable once built and are
//! evaluated repeatedly against different [`Values`].
//!
//! # Two error channels
//!
//! - Malformed definitions fail at construction with a
//!   [`ConfigError`](crate::config::ConfigError).
//! - Bad runtime data never fails: it evaluates to [`Outcome::Error`],
//!   which propagates through composites and reads as `false`.
//!
//! # Usage
//!
//! ```ignore
//! use docdata::config::ConfigNode;
//! use docdata::function::{FunctionFactory, FunctionLibrary, SimpleValues};
//!
//! let conf = ConfigNode::from_json(r#"{"CAT": [{"VALUE": ["first"]}, " ", {"VALUE": ["last"]}]}"#)?;
//! let lib = FunctionLibrary::new();
//! let full_name = FunctionFactory::new(&lib).parse(&conf)?;
//!
//! let mut values = SimpleValues::new();
//! values.put("first", "Ada");
//! values.put("last", "Lovelace");
//! assert_eq!(full_name.string(&values), "Ada Lovelace");
//! ```

mod errors;
mod external;
mod factory;
mod library;
mod node;
mod number;
mod outcome;
mod parsers;
mod prompt;
mod values;

pub use errors::{ExternError, ExternResult};
pub use external::{ExternEntry, ExternFn, ExternRegistry};
pub use factory::{labels, FunctionFactory};
pub use library::FunctionLibrary;
pub use node::{ArithmeticOp, Bind, CompareOp, Divide, ExternCall, Function, PromptField};
pub use number::NumberFormat;
pub use outcome::{Outcome, ERROR_TEXT};
pub use prompt::{Prompt, PromptContext, PromptLibrary, PromptOutcome};
pub use values::{NoValues, SimpleValues, Values};
