// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # prova-core
//!
//! Core of the natural-deduction proof checker:
//!
//! - [`Formula`] - first-order formulas with substitution and variable sets
//! - [`tokenize`] / [`Parser`] - the proof-language lexer and parser
//! - [`ScopeTree`] - the tree of proof boxes with visibility and freshness
//! - [`Diagnostic`] - the closed set of localized proof-level violations
//! - [`Names`] - interned identifier names
//!
//! Parsing a proof yields a [`parse::Parsed`]: the populated scope tree, the
//! Fitch rendering built alongside, and any line-level diagnostics. Rule
//! soundness lives in the `prova-rules` crate; the Gentzen rendering in
//! `prova-render`.
//!
//! ## Example
//!
//! ```
//! use prova_core::{Names, Parser};
//!
//! let mut names = Names::new();
//! let parsed = Parser::new("1. A pre\n2. A->B pre\n3. B ->e 1,2", &mut names)
//!     .parse_proof()
//!     .unwrap();
//!
//! assert_eq!(parsed.tree.premises().len(), 2);
//! assert!(parsed.diagnostics.is_empty());
//! ```

pub mod diagnostic;
pub mod error;
pub mod formula;
pub mod lexer;
pub mod names;
pub mod parse;
pub mod scope;
pub mod step;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::SyntaxError;
pub use formula::{BinaryOp, Formula, Quantifier};
pub use lexer::{tokenize, Token, TokenKind};
pub use names::{Names, Symbol};
pub use parse::{parse_theorem, Parsed, Parser};
pub use scope::{Scope, ScopeId, ScopeTree};
pub use step::{BoxRef, LineRef, Pos, Step, StepKind};
