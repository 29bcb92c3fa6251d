// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # prova-rules
//!
//! The evaluation engine of the checker: one soundness check per inference
//! rule, plus the structural discipline every proof must observe
//! (sequential line numbering, references before use and in scope, boxes
//! discharged by the rule that introduced them, eigenvariable freshness).
//!
//! [`evaluate`] walks every recorded step and appends to the diagnostic
//! list; it never aborts. A check that fails records its diagnostic and the
//! walk continues, so the user sees every problem of the proof at once.

mod propositional;
mod quantified;
mod structural;

use prova_core::{Diagnostic, Names, ScopeTree, Step, StepKind};

/// Evaluate every rule of a parsed proof, appending diagnostics in order:
/// line-sequence first, then undischarged boxes, then the per-step checks in
/// source order.
pub fn evaluate(
    source: &str,
    tree: &ScopeTree,
    names: &Names,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut checker = RuleChecker {
        tree,
        names,
        diagnostics,
    };
    checker.run(source);
}

/// Shared context of one evaluation walk.
pub struct RuleChecker<'a> {
    pub(crate) tree: &'a ScopeTree,
    pub(crate) names: &'a Names,
    pub(crate) diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> RuleChecker<'a> {
    fn run(&mut self, source: &str) {
        self.check_line_sequence(source);
        self.check_boxes_discharged();
        let tree = self.tree;
        for step in tree.steps_in_order() {
            self.check_step(step);
        }
    }

    fn check_step(&mut self, step: &Step) {
        match step.kind.clone() {
            StepKind::AndIntro { first, second } => self.check_and_intro(step, first, second),
            StepKind::AndElim { source } => self.check_and_elim(step, source),
            StepKind::OrIntro { source } => self.check_or_intro(step, source),
            StepKind::OrElim {
                source,
                left,
                right,
            } => self.check_or_elim(step, source, left, right),
            StepKind::ImpIntro { body } => self.check_imp_intro(step, body),
            StepKind::ImpElim { first, second } => self.check_imp_elim(step, first, second),
            StepKind::NegIntro { body } => self.check_neg_intro(step, body),
            StepKind::NegElim { first, second } => self.check_neg_elim(step, first, second),
            StepKind::BottomElim { source } => self.check_bottom_elim(step, source),
            StepKind::Raa { body } => self.check_raa(step, body),
            StepKind::Copy { source } => self.check_copy(step, source),
            StepKind::ForAllElim { source } => self.check_forall_elim(step, source),
            StepKind::ForAllIntro { body } => self.check_forall_intro(step, body),
            StepKind::ExistsIntro { source } => self.check_exists_intro(step, source),
            StepKind::ExistsElim { source, body } => self.check_exists_elim(step, source, body),
            StepKind::Premise
            | StepKind::Hypothesis
            | StepKind::HypothesisVar { .. }
            | StepKind::VarOpener { .. }
            | StepKind::Malformed => {}
        }
    }
}
