// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # prova-render
//!
//! Renderings of a checked proof:
//!
//! - [`render_gentzen`] - the tree-style presentation, one `\infer` node per
//!   rule, produced by recursive descent from the proof's conclusion
//! - [`theorem_text`] / [`theorem_latex`] - the proved sequent
//!
//! The Fitch-style rendering is not here: it is built line by line while
//! parsing and comes out of `prova_core::parse::Parsed`.

mod gentzen;
mod theorem;

pub use gentzen::render_gentzen;
pub use theorem::{theorem_latex, theorem_text};
