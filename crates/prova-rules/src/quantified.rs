// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Soundness of the quantifier rules.
//!
//! `∀i` and `∃e` carry the eigenvariable condition: the box variable must
//! not occur free in anything visible before the box, must not be the
//! variable of an enclosing box, and must not escape into the concluded
//! formula.

use prova_core::{BoxRef, DiagnosticKind, Formula, LineRef, Quantifier, Step, StepKind};

use crate::structural::StartBound;
use crate::RuleChecker;

impl<'a> RuleChecker<'a> {
    pub(crate) fn check_forall_elim(&mut self, step: &Step, source: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let Some(referenced) = self.tree.lookup_formula(step.line, source.num) else {
            return;
        };

        let universal = matches!(
            referenced,
            Formula::Quantified {
                quantifier: Quantifier::ForAll,
                ..
            }
        );
        if !universal {
            self.push(source.pos, DiagnosticKind::InvalidUniversalFormula);
        }
        if matches!(referenced, Formula::Quantified { .. })
            && !referenced.valid_substitution(formula)
        {
            self.push(
                step.pos,
                DiagnosticKind::InvalidSubstitutionUniversal {
                    formula: formula.to_text(self.names),
                    reference: source.num,
                },
            );
        }
    }

    pub(crate) fn check_exists_intro(&mut self, step: &Step, source: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let Some(referenced) = self.tree.lookup_formula(step.line, source.num) else {
            return;
        };

        let existential = matches!(
            formula,
            Formula::Quantified {
                quantifier: Quantifier::Exists,
                ..
            }
        );
        if !existential {
            self.push(step.pos, DiagnosticKind::InvalidExistentialFormula);
        }
        if matches!(formula, Formula::Quantified { .. }) && !formula.valid_substitution(referenced)
        {
            self.push(
                step.pos,
                DiagnosticKind::InvalidSubstitutionExists {
                    formula: formula.to_text(self.names),
                    reference: source.num,
                },
            );
        }
    }

    pub(crate) fn check_exists_elim(&mut self, step: &Step, source: LineRef, body: BoxRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        self.check_box_reference(step, &body, StartBound::AtLeast(source.num), true);

        let Some(variable) = self.tree.scope_variable(body.start.num) else {
            self.push(
                body.start.pos,
                DiagnosticKind::BoxMustHaveVariable {
                    reference: body.start.num,
                },
            );
            return;
        };
        if !self.tree.is_fresh_variable(body.start.num) {
            self.push(
                body.start.pos,
                DiagnosticKind::VariableNotFresh {
                    reference: body.start.num,
                },
            );
        }

        let Some(formula) = &step.formula else { return };
        let Some(referenced) = self.tree.lookup_formula(step.line, source.num) else {
            return;
        };
        let (hypothesis, result) = self.tree.box_delimiter(body.start.num, body.end.num);
        let (Some(hypothesis), Some(result)) = (hypothesis, result) else {
            return;
        };

        if formula != result {
            self.push(
                body.end.pos,
                DiagnosticKind::InvalidConclusionExistentialLastRule {
                    reference: body.end.num,
                },
            );
        }
        let existential = matches!(
            referenced,
            Formula::Quantified {
                quantifier: Quantifier::Exists,
                ..
            }
        );
        if !existential {
            self.push(step.pos, DiagnosticKind::InvalidExistentialFormula);
        }
        if let Formula::Quantified {
            variable: bound,
            body: inner,
            ..
        } = referenced
        {
            if inner.substitute(*bound, variable) != *hypothesis {
                self.push(
                    body.start.pos,
                    DiagnosticKind::InvalidSubstitutionExistential {
                        formula: formula.to_text(self.names),
                        reference: source.num,
                    },
                );
            }
        }
        if result.free_variables().contains(&variable) {
            self.push(
                body.start.pos,
                DiagnosticKind::InvalidConclusionExistential {
                    reference: body.start.num,
                },
            );
        }
    }

    pub(crate) fn check_forall_intro(&mut self, step: &Step, body: BoxRef) {
        self.check_references_before(step);
        self.check_box_reference(step, &body, StartBound::Free, true);

        let Some(variable) = self.tree.scope_variable(body.start.num) else {
            self.push(
                body.start.pos,
                DiagnosticKind::BoxMustHaveVariable {
                    reference: body.start.num,
                },
            );
            return;
        };
        // The box must introduce only the variable; a first-order hypothesis
        // makes it an existential-elimination box, not a universal one.
        if let Some(id) = self.tree.find_scope(body.start.num) {
            let first = self.tree.scope(id).steps.first();
            if matches!(first.map(|s| &s.kind), Some(StepKind::HypothesisVar { .. })) {
                self.push(
                    body.start.pos,
                    DiagnosticKind::BoxMustHaveOnlyVariable {
                        reference: body.start.num,
                    },
                );
                return;
            }
        }
        if !self.tree.is_fresh_variable(body.start.num) {
            self.push(
                body.start.pos,
                DiagnosticKind::VariableNotFresh {
                    reference: body.start.num,
                },
            );
        }

        let Some(formula) = &step.formula else { return };
        let (first, result) = self.tree.box_delimiter(body.start.num, body.end.num);
        let (Some(_), Some(result)) = (first, result) else {
            return;
        };

        let universal = matches!(
            formula,
            Formula::Quantified {
                quantifier: Quantifier::ForAll,
                ..
            }
        );
        if !universal {
            self.push(step.pos, DiagnosticKind::InvalidUniversalFormula);
        }
        if let Formula::Quantified {
            variable: bound,
            body: inner,
            ..
        } = formula
        {
            if inner.substitute(*bound, variable) != *result {
                self.push(
                    body.end.pos,
                    DiagnosticKind::InvalidConclusionUniversalLastRule {
                        reference: body.end.num,
                    },
                );
            }
            if formula.free_variables().contains(&variable) {
                self.push(
                    step.pos,
                    DiagnosticKind::InvalidConclusionUniversal {
                        reference: body.start.num,
                    },
                );
            }
        }
    }
}
