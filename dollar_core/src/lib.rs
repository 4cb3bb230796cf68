//! `dollar_core` is the core library for the dollar statement template
//! engine. Documents contain `$`-introduced statements that expand to
//! computed text against a per-render variable [`Scope`].
//!
//! ## Statement Syntax
//!
//! ```text
//! ${expr}                         insert a value, never rescanned
//! $eval{expr}                     insert a value, rescanned for statements
//! $if(cond){then}else{otherwise}  choose a branch
//! $foreach(name in expr){body}    render body once per element
//! $declare(name){raw text}        bind raw text in the scope
//! $${ literal $text }$$           copy text verbatim
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! Document
//!   → Scanner (finds the next `$`, unwraps literal escapes)
//!   → Parser (keyword, parameters, body and else body via the balanced-region matcher)
//!   → Executor (dispatches on the keyword, evaluates expressions)
//!   → Engine (splices the result back and keeps scanning)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use dollar_core::Engine;
//! use dollar_core::Scope;
//!
//! let mut engine = Engine::new();
//! engine.load_globals("$declare(site){Example}");
//!
//! let scope = Scope::new().with("user", "Alice");
//! let page = engine.render("${user} @ ${site}", &scope);
//! assert_eq!(page, "Alice @ Example");
//! ```

pub use config::*;
pub use diagnostics::*;
pub use engine::*;
pub use error::*;
pub use evaluate::*;
pub use executor::Keyword;
pub use executor::Outcome;
pub use parser::*;
pub use value::*;

pub mod config;
mod diagnostics;
mod engine;
#[allow(unused_assignments)]
mod error;
mod evaluate;
pub(crate) mod executor;
pub mod expression;
pub(crate) mod lexer;
pub mod matcher;
mod parser;
pub mod scanner;
mod value;
