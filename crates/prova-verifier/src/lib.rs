// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # prova-verifier
//!
//! The whole-proof verification pipeline: parse the source into the scope
//! tree, evaluate every inference rule, and, when the proof is clean, render
//! the Fitch and Gentzen presentations.
//!
//! ```
//! use prova_verifier::Checker;
//!
//! let mut checker = Checker::new();
//! let verification = checker
//!     .check("1. A pre\n2. A->B pre\n3. B ->e 1,2")
//!     .unwrap();
//!
//! assert!(verification.is_valid());
//! assert_eq!(verification.premises.len(), 2);
//! ```
//!
//! One [`Checker`] owns the name table of one verification session; nothing
//! is shared between sessions and nothing blocks. Proof-level problems come
//! back as data in [`Verification::errors`]; the input-level
//! [`SyntaxError`] is the only `Err` the pipeline produces.

use serde::Serialize;

use prova_core::{parse_theorem, Diagnostic, Formula, Names, Parser, SyntaxError};
use prova_render::{render_gentzen, theorem_latex, theorem_text};
use prova_rules::evaluate;

/// The outcome of checking one proof.
#[derive(Clone, Debug)]
pub struct Verification {
    /// Premise formulas, deduplicated structurally in first-seen order.
    pub premises: Vec<Formula>,
    /// The formula of the proof's last top-level line.
    pub conclusion: Option<Formula>,
    /// Fitch-style LaTeX rendering; empty when any diagnostic was recorded.
    pub fitch: String,
    /// Gentzen-style LaTeX rendering; empty when any diagnostic was recorded.
    pub gentzen: String,
    /// Structured diagnostics, in evaluation order.
    pub diagnostics: Vec<Diagnostic>,
    /// The diagnostics rendered as user-facing strings.
    pub errors: Vec<String>,
}

#[derive(Serialize)]
struct VerificationJson<'a> {
    gentzen: &'a str,
    fitch: &'a str,
    errors: &'a [String],
}

impl Verification {
    /// Whether the proof is a valid derivation (no diagnostics).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The `{gentzen, fitch, errors}` JSON object consumed by front-ends.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&VerificationJson {
            gentzen: &self.gentzen,
            fitch: &self.fitch,
            errors: &self.errors,
        })
    }

    /// Whether the proof establishes exactly the given sequent: equal
    /// premise sets (structural equality, duplicates ignored) and equal
    /// conclusion.
    pub fn matches_theorem(&self, premises: &[Formula], conclusion: &Formula) -> bool {
        let Some(proved) = &self.conclusion else {
            return false;
        };
        if proved != conclusion {
            return false;
        }
        self.premises.iter().all(|p| premises.contains(p))
            && premises.iter().all(|p| self.premises.contains(p))
    }
}

/// A verification session: owns the name table shared by the proof and any
/// theorem statements parsed against it.
#[derive(Debug, Default)]
pub struct Checker {
    names: Names,
}

impl Checker {
    pub fn new() -> Self {
        Self {
            names: Names::new(),
        }
    }

    /// The session's name table (to render formulas of this session).
    pub fn names(&self) -> &Names {
        &self.names
    }

    /// Check a proof. `Err` only for input-level syntax errors; a proof
    /// that parses but violates rules comes back `Ok` with non-empty
    /// [`Verification::errors`] and empty renderings.
    pub fn check(&mut self, source: &str) -> Result<Verification, SyntaxError> {
        let parsed = Parser::new(source, &mut self.names).parse_proof()?;
        let mut diagnostics = parsed.diagnostics;
        evaluate(source, &parsed.tree, &self.names, &mut diagnostics);

        let (fitch, gentzen) = if diagnostics.is_empty() {
            (parsed.fitch, render_gentzen(&parsed.tree, &self.names))
        } else {
            (String::new(), String::new())
        };
        let errors = diagnostics.iter().map(|d| d.render(source)).collect();

        Ok(Verification {
            premises: parsed.tree.premises().into_iter().cloned().collect(),
            conclusion: parsed.tree.conclusion().cloned(),
            fitch,
            gentzen,
            diagnostics,
            errors,
        })
    }

    /// Parse a theorem statement (`F1, ..., Fn |- G`) in this session.
    pub fn parse_theorem(&mut self, source: &str) -> Result<(Vec<Formula>, Formula), SyntaxError> {
        parse_theorem(source, &mut self.names)
    }

    /// The proved sequent as text, once a proof was checked.
    pub fn theorem_text(&self, verification: &Verification) -> Option<String> {
        let conclusion = verification.conclusion.as_ref()?;
        Some(theorem_text(&verification.premises, conclusion, &self.names))
    }

    /// The proved sequent as LaTeX.
    pub fn theorem_latex(&self, verification: &Verification) -> Option<String> {
        let conclusion = verification.conclusion.as_ref()?;
        Some(theorem_latex(&verification.premises, conclusion, &self.names))
    }
}

/// Human-readable summary of one check, in the shape the front-ends print:
/// a success line followed by the requested renderings, or the list of
/// collected errors. Input-level syntax errors surface as a single error.
pub fn report(source: &str, show_fitch: bool, show_gentzen: bool) -> String {
    let mut checker = Checker::new();
    match checker.check(source) {
        Ok(verification) if verification.is_valid() => {
            let mut out = String::from("A demonstração está correta.");
            if show_fitch {
                out.push_str("\n\nCódigo da demonstração no estilo Fitch em LaTeX:\n");
                out.push_str(&verification.fitch);
            }
            if show_gentzen {
                out.push_str("\n\nCódigo da demonstração no estilo Gentzen em LaTeX:\n");
                out.push_str(&verification.gentzen);
            }
            out
        }
        Ok(verification) => {
            let mut out = String::from("Os seguintes erros foram encontrados:\n");
            for error in &verification.errors {
                out.push('\n');
                out.push_str(error);
                out.push('\n');
            }
            out
        }
        Err(error) => {
            format!("Os seguintes erros foram encontrados:\n\n{}\n", error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_proof_renders_both_styles() {
        let mut checker = Checker::new();
        let verification = checker.check("1. A pre\n2. A->B pre\n3. B ->e 1,2").unwrap();

        assert!(verification.is_valid());
        assert!(verification.fitch.starts_with("\\begin{logicproof}{6}"));
        assert!(verification.gentzen.starts_with("\\["));
        assert_eq!(
            checker.theorem_text(&verification),
            Some("A, A->B |- B".to_string())
        );
    }

    #[test]
    fn test_invalid_proof_suppresses_renderings() {
        let mut checker = Checker::new();
        let verification = checker.check("1. A pre\n2. B copie 1").unwrap();

        assert!(!verification.is_valid());
        assert!(verification.fitch.is_empty());
        assert!(verification.gentzen.is_empty());
        assert_eq!(verification.errors.len(), 1);
        assert!(verification.errors[0].starts_with("Erro de sintaxe na linha 2:"));
    }

    #[test]
    fn test_json_shape() {
        let mut checker = Checker::new();
        let verification = checker.check("1. A pre").unwrap();
        let json = verification.to_json().unwrap();

        assert!(json.contains("\"gentzen\""));
        assert!(json.contains("\"fitch\""));
        assert!(json.contains("\"errors\""));
    }

    #[test]
    fn test_theorem_comparison() {
        let mut checker = Checker::new();
        let verification = checker.check("1. A pre\n2. A->B pre\n3. B ->e 1,2").unwrap();

        let (premises, conclusion) = checker.parse_theorem("A, A->B |- B").unwrap();
        assert!(verification.matches_theorem(&premises, &conclusion));

        let (premises, conclusion) = checker.parse_theorem("A |- B").unwrap();
        assert!(!verification.matches_theorem(&premises, &conclusion));
    }

    #[test]
    fn test_report_on_syntax_error() {
        let summary = report("1. A ? pre", true, true);
        assert!(summary.starts_with("Os seguintes erros foram encontrados:"));
        assert!(summary.contains("Símbolo não pertence a linguagem."));
    }
}
