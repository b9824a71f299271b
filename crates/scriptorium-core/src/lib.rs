//! # Scriptorium Core
//!
//! The document-structure engine for rewriting LaTeX articles section by
//! section without losing their mathematics.
//!
//! ## Overview
//!
//! A run moves through four stages:
//!
//! 1. [`flatten`] resolves `\input`/`\include` and strips comments into one
//!    content stream, reporting directives it could not resolve.
//! 2. [`segment`] splits the stream into preamble, body and postamble, and
//!    the body into [`Section`]s with their formulas.
//! 3. [`graph`] orders the sections so each follows the sections it depends
//!    on. Cycles fall back to document order with an observable status.
//! 4. After an external rewriting step has filled
//!    [`Section::rewritten_content`], [`validator`] checks paragraph by
//!    paragraph that every formula survived.
//!
//! [`Document::assemble`] turns the result back into a complete document.
//!
//! ## Examples
//!
//! ```
//! use scriptorium_core::graph::{
//!     apply_dependencies, parse_dependency_response, topological_order,
//! };
//! use scriptorium_core::segment::segment;
//! use scriptorium_core::validator::FormulaValidator;
//!
//! let mut doc = segment(
//!     "paper.tex",
//!     "\\section{Method}\nUse $$x=1$$.\n\\section{Intro}\nDefine $x$.",
//! );
//! let deps = parse_dependency_response(r#"{"dependencies": {"sec_0": ["sec_1"]}}"#);
//! apply_dependencies(&mut doc, &deps);
//!
//! let order = topological_order(&doc);
//! assert_eq!(order.ids, vec!["sec_1", "sec_0"]);
//!
//! doc.sections_mut()[0].record_rewrite("Utiliser $$x=2$$.");
//! let problems = FormulaValidator::default().validate_document(&doc);
//! assert_eq!(problems[0].section_id, "sec_0");
//! ```
//!
//! ## Configuration
//!
//! [`Config`] is read from `scriptorium.toml`; see [`config`] for the keys.

pub mod config;
pub mod document;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod segment;
pub mod validator;

pub use config::Config;
pub use document::{Document, Section};
pub use error::{ConfigError, DependencyResponseError, DocumentError, FlattenError};
pub use flatten::{FlattenReport, Flattener};
pub use scriptorium_math::{Formula, FormulaKind};
pub use segment::{ParsedDocument, parse_document};
