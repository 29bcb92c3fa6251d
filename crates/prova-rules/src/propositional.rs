// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Soundness of the propositional rules.
//!
//! Each check first runs the structural passes (references before use, then
//! visibility for line references, then box validity where the rule takes a
//! box), resolves the referenced formulas, and only then tests the rule's
//! own condition. Missing data ends the check for the current step; the
//! structural pass has already reported why it is missing.

use prova_core::{BinaryOp, BoxRef, DiagnosticKind, Formula, LineRef, Step};

use crate::structural::StartBound;
use crate::RuleChecker;

impl<'a> RuleChecker<'a> {
    pub(crate) fn check_and_intro(&mut self, step: &Step, first: LineRef, second: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let (Some(f1), Some(f2)) = (
            self.tree.lookup_formula(step.line, first.num),
            self.tree.lookup_formula(step.line, second.num),
        ) else {
            return;
        };

        match formula {
            Formula::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                if left.as_ref() != f1 && left.as_ref() != f2 {
                    self.push(step.pos, DiagnosticKind::InvalidLeftConjunction);
                }
                if right.as_ref() != f1 && right.as_ref() != f2 {
                    self.push(step.pos, DiagnosticKind::InvalidRightConjunction);
                }
            }
            _ => self.push(
                first.pos,
                DiagnosticKind::NotConjunction {
                    reference: first.num,
                },
            ),
        }
    }

    pub(crate) fn check_and_elim(&mut self, step: &Step, source: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let Some(referenced) = self.tree.lookup_formula(step.line, source.num) else {
            return;
        };

        match referenced {
            Formula::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                if left.as_ref() != formula && right.as_ref() != formula {
                    self.push(
                        source.pos,
                        DiagnosticKind::InvalidLeftOrRightConjunction {
                            reference: source.num,
                        },
                    );
                }
            }
            _ => self.push(
                step.pos,
                DiagnosticKind::NotConjunction {
                    reference: step.line,
                },
            ),
        }
    }

    pub(crate) fn check_or_intro(&mut self, step: &Step, source: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let Some(referenced) = self.tree.lookup_formula(step.line, source.num) else {
            return;
        };

        match formula {
            Formula::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                if left.as_ref() != referenced && right.as_ref() != referenced {
                    self.push(
                        source.pos,
                        DiagnosticKind::InvalidLeftOrRightDisjunction {
                            reference: source.num,
                        },
                    );
                }
            }
            _ => self.push(
                step.pos,
                DiagnosticKind::NotDisjunction {
                    reference: step.line,
                },
            ),
        }
    }

    pub(crate) fn check_or_elim(&mut self, step: &Step, source: LineRef, left: BoxRef, right: BoxRef) {
        let before = self.check_references_before(step);
        self.check_box_reference(step, &left, StartBound::AtLeast(source.num), false);
        self.check_box_reference(step, &right, StartBound::ExactlyAfter(left.end.num), true);
        if before {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let Some(disjunction) = self.tree.lookup_formula(step.line, source.num) else {
            return;
        };
        let (first_left, last_left) = self.tree.box_delimiter(left.start.num, left.end.num);
        let (first_right, last_right) = self.tree.box_delimiter(right.start.num, right.end.num);
        let (Some(first_left), Some(last_left), Some(first_right), Some(last_right)) =
            (first_left, last_left, first_right, last_right)
        else {
            return;
        };

        match disjunction {
            Formula::Binary {
                op: BinaryOp::Or,
                left: case_left,
                right: case_right,
            } => {
                if case_left.as_ref() != first_left {
                    self.push(
                        left.start.pos,
                        DiagnosticKind::InvalidHypothesis {
                            reference: left.start.num,
                        },
                    );
                }
                if case_right.as_ref() != first_right {
                    self.push(
                        right.start.pos,
                        DiagnosticKind::InvalidHypothesis {
                            reference: right.start.num,
                        },
                    );
                }
                if formula != last_left {
                    self.push(
                        left.end.pos,
                        DiagnosticKind::InvalidBoxResult {
                            reference: left.end.num,
                        },
                    );
                }
                if formula != last_right {
                    self.push(
                        right.end.pos,
                        DiagnosticKind::InvalidBoxResult {
                            reference: right.end.num,
                        },
                    );
                }
            }
            _ => self.push(
                source.pos,
                DiagnosticKind::NotDisjunction {
                    reference: source.num,
                },
            ),
        }
    }

    pub(crate) fn check_imp_intro(&mut self, step: &Step, body: BoxRef) {
        self.check_references_before(step);
        self.check_box_reference(step, &body, StartBound::Free, true);
        let Some(formula) = &step.formula else { return };
        let (hypothesis, result) = self.tree.box_delimiter(body.start.num, body.end.num);
        let (Some(hypothesis), Some(result)) = (hypothesis, result) else {
            return;
        };

        match formula {
            Formula::Binary {
                op: BinaryOp::Implies,
                left,
                right,
            } => {
                if left.as_ref() != hypothesis {
                    self.push(
                        body.start.pos,
                        DiagnosticKind::InvalidHypothesis {
                            reference: body.start.num,
                        },
                    );
                }
                if right.as_ref() != result {
                    self.push(
                        body.end.pos,
                        DiagnosticKind::InvalidBoxResult {
                            reference: body.end.num,
                        },
                    );
                }
            }
            _ => self.push(
                step.pos,
                DiagnosticKind::InvalidResult {
                    formula: formula.to_text(self.names),
                },
            ),
        }
    }

    pub(crate) fn check_imp_elim(&mut self, step: &Step, first: LineRef, second: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let (Some(f1), Some(f2)) = (
            self.tree.lookup_formula(step.line, first.num),
            self.tree.lookup_formula(step.line, second.num),
        ) else {
            return;
        };

        // Either reference may be the implication, the other its antecedent.
        let from_first = Formula::binary(BinaryOp::Implies, f1.clone(), formula.clone());
        let from_second = Formula::binary(BinaryOp::Implies, f2.clone(), formula.clone());
        if from_first != *f2 && from_second != *f1 {
            self.push(
                first.pos,
                DiagnosticKind::InvalidResult {
                    formula: formula.to_text(self.names),
                },
            );
        }
    }

    pub(crate) fn check_neg_intro(&mut self, step: &Step, body: BoxRef) {
        self.check_references_before(step);
        self.check_box_reference(step, &body, StartBound::Free, true);
        let Some(formula) = &step.formula else { return };
        let (hypothesis, result) = self.tree.box_delimiter(body.start.num, body.end.num);
        let (Some(hypothesis), Some(result)) = (hypothesis, result) else {
            return;
        };

        match formula {
            Formula::Not(inner) => {
                if inner.as_ref() != hypothesis {
                    self.push(
                        body.start.pos,
                        DiagnosticKind::InvalidHypothesis {
                            reference: body.start.num,
                        },
                    );
                }
                if !matches!(result, Formula::Bottom) {
                    self.push(
                        body.end.pos,
                        DiagnosticKind::InvalidBoxResult {
                            reference: body.end.num,
                        },
                    );
                }
            }
            _ => self.push(
                step.pos,
                DiagnosticKind::InvalidResult {
                    formula: formula.to_text(self.names),
                },
            ),
        }
    }

    pub(crate) fn check_neg_elim(&mut self, step: &Step, first: LineRef, second: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let (Some(f1), Some(f2)) = (
            self.tree.lookup_formula(step.line, first.num),
            self.tree.lookup_formula(step.line, second.num),
        ) else {
            return;
        };

        if !matches!(formula, Formula::Bottom) {
            self.push(
                step.pos,
                DiagnosticKind::InvalidResult {
                    formula: formula.to_text(self.names),
                },
            );
        } else if Formula::not(f2.clone()) != *f1 && Formula::not(f1.clone()) != *f2 {
            self.push(first.pos, DiagnosticKind::InvalidNegation);
        }
    }

    pub(crate) fn check_bottom_elim(&mut self, step: &Step, source: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        if step.formula.is_none() {
            return;
        }
        let Some(referenced) = self.tree.lookup_formula(step.line, source.num) else {
            return;
        };

        if !matches!(referenced, Formula::Bottom) {
            self.push(
                source.pos,
                DiagnosticKind::NotBottom {
                    reference: source.num,
                },
            );
        }
    }

    pub(crate) fn check_raa(&mut self, step: &Step, body: BoxRef) {
        self.check_references_before(step);
        self.check_box_reference(step, &body, StartBound::Free, true);
        let Some(formula) = &step.formula else { return };
        let (hypothesis, result) = self.tree.box_delimiter(body.start.num, body.end.num);
        let (Some(hypothesis), Some(result)) = (hypothesis, result) else {
            return;
        };

        if *hypothesis != Formula::not(formula.clone()) {
            self.push(
                body.start.pos,
                DiagnosticKind::InvalidHypothesis {
                    reference: body.start.num,
                },
            );
        }
        if !matches!(result, Formula::Bottom) {
            self.push(
                body.end.pos,
                DiagnosticKind::InvalidBoxResult {
                    reference: body.end.num,
                },
            );
        }
    }

    pub(crate) fn check_copy(&mut self, step: &Step, source: LineRef) {
        if self.check_references_before(step) {
            self.check_references_visible(step);
        }
        let Some(formula) = &step.formula else { return };
        let Some(referenced) = self.tree.lookup_formula(step.line, source.num) else {
            return;
        };

        if referenced != formula {
            self.push(step.pos, DiagnosticKind::CopyDifferentFormula);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::evaluate;
    use prova_core::{DiagnosticKind, Names, Parser};

    fn kinds(source: &str) -> Vec<DiagnosticKind> {
        let mut names = Names::new();
        let parsed = Parser::new(source, &mut names)
            .parse_proof()
            .expect("proof should parse");
        let mut diagnostics = parsed.diagnostics;
        evaluate(source, &parsed.tree, &names, &mut diagnostics);
        diagnostics.into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_and_intro_accepts_either_order() {
        assert_eq!(kinds("1. A pre\n2. B pre\n3. A&B &i 1,2"), vec![]);
        assert_eq!(kinds("1. A pre\n2. B pre\n3. A&B &i 2,1"), vec![]);
    }

    #[test]
    fn test_and_intro_reports_wrong_sides() {
        assert_eq!(
            kinds("1. A pre\n2. B pre\n3. A&C &i 1,2"),
            vec![DiagnosticKind::InvalidRightConjunction]
        );
        assert_eq!(
            kinds("1. A pre\n2. B pre\n3. A|B &i 1,2"),
            vec![DiagnosticKind::NotConjunction { reference: 1 }]
        );
    }

    #[test]
    fn test_and_elim_takes_either_side() {
        assert_eq!(kinds("1. A&B pre\n2. A &e 1"), vec![]);
        assert_eq!(kinds("1. A&B pre\n2. B &e 1"), vec![]);
        assert_eq!(
            kinds("1. A&B pre\n2. C &e 1"),
            vec![DiagnosticKind::InvalidLeftOrRightConjunction { reference: 1 }]
        );
        assert_eq!(
            kinds("1. A|B pre\n2. A &e 1"),
            vec![DiagnosticKind::NotConjunction { reference: 2 }]
        );
    }

    #[test]
    fn test_or_intro() {
        assert_eq!(kinds("1. A pre\n2. A|B |i 1"), vec![]);
        assert_eq!(
            kinds("1. C pre\n2. A|B |i 1"),
            vec![DiagnosticKind::InvalidLeftOrRightDisjunction { reference: 1 }]
        );
        assert_eq!(
            kinds("1. A pre\n2. A&B |i 1"),
            vec![DiagnosticKind::NotDisjunction { reference: 2 }]
        );
    }

    #[test]
    fn test_imp_elim_modus_ponens() {
        assert_eq!(kinds("1. A pre\n2. A->B pre\n3. B ->e 1,2"), vec![]);
        assert_eq!(kinds("1. A pre\n2. A->B pre\n3. B ->e 2,1"), vec![]);
        assert_eq!(
            kinds("1. A pre\n2. A->B pre\n3. C ->e 1,2"),
            vec![DiagnosticKind::InvalidResult {
                formula: "C".to_string()
            }]
        );
    }

    #[test]
    fn test_imp_intro_checks_hypothesis_and_result() {
        assert_eq!(kinds("1. {A hip\n2. A copie 1\n3. }\n4. A->A ->i 1-2"), vec![]);
        assert_eq!(
            kinds("1. {A hip\n2. A copie 1\n3. }\n4. B->A ->i 1-2"),
            vec![DiagnosticKind::InvalidHypothesis { reference: 1 }]
        );
        assert_eq!(
            kinds("1. {A hip\n2. A copie 1\n3. }\n4. A->B ->i 1-2"),
            vec![DiagnosticKind::InvalidBoxResult { reference: 2 }]
        );
        assert_eq!(
            kinds("1. {A hip\n2. A copie 1\n3. }\n4. A&A ->i 1-2"),
            vec![DiagnosticKind::InvalidResult {
                formula: "A&A".to_string()
            }]
        );
    }

    #[test]
    fn test_neg_intro_and_raa_need_bottom() {
        let source = "1. ~A pre\n2. {A hip\n3. @ ~e 2,1\n4. }\n5. ~A ~i 2-3";
        assert_eq!(kinds(source), vec![]);

        let wrong = "1. ~A pre\n2. {A hip\n3. A copie 2\n4. }\n5. ~A ~i 2-3";
        assert_eq!(
            kinds(wrong),
            vec![DiagnosticKind::InvalidBoxResult { reference: 3 }]
        );

        let raa = "1. ~~A pre\n2. {~A hip\n3. @ ~e 2,1\n4. }\n5. A raa 2-3";
        assert_eq!(kinds(raa), vec![]);
    }

    #[test]
    fn test_neg_elim() {
        assert_eq!(kinds("1. A pre\n2. ~A pre\n3. @ ~e 1,2"), vec![]);
        assert_eq!(
            kinds("1. A pre\n2. ~A pre\n3. B ~e 1,2"),
            vec![DiagnosticKind::InvalidResult {
                formula: "B".to_string()
            }]
        );
        assert_eq!(
            kinds("1. A pre\n2. B pre\n3. @ ~e 1,2"),
            vec![DiagnosticKind::InvalidNegation]
        );
    }

    #[test]
    fn test_bottom_elim() {
        assert_eq!(kinds("1. @ pre\n2. A @e 1"), vec![]);
        assert_eq!(
            kinds("1. B pre\n2. A @e 1"),
            vec![DiagnosticKind::NotBottom { reference: 1 }]
        );
    }

    #[test]
    fn test_or_elim_case_analysis() {
        let source = "1. A|B pre\n2. A->C pre\n3. B->C pre\n4. {A hip\n5. C ->e 4,2\n6. }\n7. {B hip\n8. C ->e 7,3\n9. }\n10. C |e 1,4-6,7-9";
        assert_eq!(kinds(source), vec![]);
    }

    #[test]
    fn test_or_elim_wrong_hypothesis() {
        let source = "1. A|B pre\n2. A->C pre\n3. B->C pre\n4. {A hip\n5. C ->e 4,2\n6. }\n7. {A hip\n8. C pre\n9. }\n10. C |e 1,4-6,7-9";
        let diagnostics = kinds(source);
        assert!(diagnostics.contains(&DiagnosticKind::InvalidHypothesis { reference: 7 }));
    }

    #[test]
    fn test_copy_of_different_formula() {
        assert_eq!(
            kinds("1. A pre\n2. B copie 1"),
            vec![DiagnosticKind::CopyDifferentFormula]
        );
        assert_eq!(kinds("1. A pre\n2. A copie 1"), vec![]);
    }
}
