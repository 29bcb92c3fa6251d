// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural checks shared by every rule: reference ordering and
//! visibility, box-reference validity, box discharge, and the line-number
//! sequence.

use prova_core::{BoxRef, Diagnostic, DiagnosticKind, Pos, Scope, Step, StepKind};

use crate::RuleChecker;

/// Constraint on where a referenced box may start.
pub(crate) enum StartBound {
    /// No constraint beyond being inside the rule's reach.
    Free,
    /// The box must not start before this line (`∃e`: the existential line).
    AtLeast(u32),
    /// The box must start exactly on the line after this one (`∨e`: the
    /// second box follows the first).
    ExactlyAfter(u32),
}

impl<'a> RuleChecker<'a> {
    pub(crate) fn push(&mut self, pos: Pos, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic::new(pos, kind));
    }

    /// Every reference, line or box boundary, must name a line before the
    /// rule's own.
    pub(crate) fn check_references_before(&mut self, step: &Step) -> bool {
        let mut ok = true;
        for reference in step.references() {
            if reference.num >= step.line {
                self.push(
                    reference.pos,
                    DiagnosticKind::ReferencedLineNotDefined {
                        reference: reference.num,
                    },
                );
                ok = false;
            }
        }
        ok
    }

    /// Every line reference must resolve through the ancestor chain; a line
    /// inside a closed sibling box is discarded and unusable.
    pub(crate) fn check_references_visible(&mut self, step: &Step) -> bool {
        let mut ok = true;
        for reference in step.line_references() {
            if self.tree.lookup_formula(step.line, reference.num).is_none() {
                self.push(
                    reference.pos,
                    DiagnosticKind::UsingDiscardedRule {
                        reference: reference.num,
                    },
                );
                ok = false;
            }
        }
        ok
    }

    /// A referenced box must designate a closed scope with matching
    /// boundaries in the expected order; discharging rules must additionally
    /// sit on the line immediately after the close.
    pub(crate) fn check_box_reference(
        &mut self,
        step: &Step,
        body: &BoxRef,
        bound: StartBound,
        require_adjacent: bool,
    ) {
        let Some(scope) = self.tree.find_box(body.start.num, body.end.num) else {
            self.push(body.start.pos, DiagnosticKind::InvalidScopeDelimiter);
            return;
        };
        let start_ok = match bound {
            StartBound::Free => true,
            StartBound::AtLeast(min) => body.start.num >= min,
            StartBound::ExactlyAfter(previous) => body.start.num == previous + 1,
        };
        if !(step.line > body.end.num && body.end.num >= body.start.num && start_ok) {
            self.push(body.start.pos, DiagnosticKind::InvalidScopeDelimiter);
        }
        if require_adjacent && step.line != scope.discharge_line() {
            self.push(body.start.pos, DiagnosticKind::BoxMustBeDisposedByRule);
        }
    }

    /// After the evaluation of individual rules, every closed box must be
    /// discharged by the first parent-scope step after it, and only by a
    /// rule that actually references the box.
    pub(crate) fn check_boxes_discharged(&mut self) {
        let tree = self.tree;
        for scope in tree.scopes().skip(1) {
            let Some(parent) = scope.parent else { continue };
            let next = tree
                .scope(parent)
                .steps
                .iter()
                .find(|s| s.line > scope.end_line);
            let discharged = next.is_some_and(|s| step_discharges(s, scope));
            if !discharged {
                let pos = scope.steps.first().map(|s| s.pos).unwrap_or(Pos {
                    line: scope.start_line,
                    col: 1,
                });
                self.push(pos, DiagnosticKind::BoxMustBeDisposed);
            }
        }
    }

    /// Numbered source lines must read `1, 2, 3, …` top to bottom. Numbered
    /// closing brackets participate; bare brackets, comments and blank lines
    /// do not. The first violation is reported and the check stops.
    pub(crate) fn check_line_sequence(&mut self, source: &str) {
        let mut expected: u32 = 1;
        for (index, raw) in source.lines().enumerate() {
            let head = raw.split('.').next().unwrap_or("");
            if head.is_empty() || !head.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if head.parse::<u32>() != Ok(expected) {
                let found = head.to_string();
                let kind = if expected == 1 {
                    DiagnosticKind::LineOutOfSequenceAtStart { found, expected }
                } else {
                    DiagnosticKind::LineOutOfSequence { found, expected }
                };
                self.push(
                    Pos {
                        line: index as u32 + 1,
                        col: 1,
                    },
                    kind,
                );
                return;
            }
            expected += 1;
        }
    }
}

/// Whether this parent-scope step discharges the given box.
fn step_discharges(step: &Step, scope: &Scope) -> bool {
    let matches_box = |body: &BoxRef| scope.matches_reference(body.start.num, body.end.num);
    match &step.kind {
        StepKind::ImpIntro { body }
        | StepKind::NegIntro { body }
        | StepKind::Raa { body }
        | StepKind::ForAllIntro { body } => matches_box(body),
        StepKind::OrElim { left, right, .. } => matches_box(left) || matches_box(right),
        StepKind::ExistsElim { body, .. } => matches_box(body),
        _ => false,
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
    fn test_reference_must_come_before_rule() {
        let diagnostics = kinds("1. A pre\n2. B ->e 2,3");
        assert_eq!(
            diagnostics,
            vec![
                DiagnosticKind::ReferencedLineNotDefined { reference: 2 },
                DiagnosticKind::ReferencedLineNotDefined { reference: 3 },
            ]
        );
    }

    #[test]
    fn test_reference_into_closed_sibling_box_is_discarded() {
        let source = "1. {A hip\n2. A copie 1\n3. }\n4. A->A ->i 1-2\n5. A copie 2";
        let diagnostics = kinds(source);
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::UsingDiscardedRule { reference: 2 }]
        );
    }

    #[test]
    fn test_undischarged_box_is_reported() {
        let source = "1. {A hip\n2. A copie 1\n3. }\n4. B pre";
        let diagnostics = kinds(source);
        assert!(diagnostics.contains(&DiagnosticKind::BoxMustBeDisposed));
    }

    #[test]
    fn test_discharge_must_reference_the_box() {
        // The rule after the box discharges a different range.
        let source = "1. {A hip\n2. A copie 1\n3. }\n4. A->A ->i 2-2";
        let diagnostics = kinds(source);
        assert!(diagnostics.contains(&DiagnosticKind::BoxMustBeDisposed));
        assert!(diagnostics.contains(&DiagnosticKind::InvalidScopeDelimiter));
    }

    #[test]
    fn test_sequence_must_start_at_one() {
        let diagnostics = kinds("2. A pre");
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::LineOutOfSequenceAtStart {
                found: "2".to_string(),
                expected: 1,
            }]
        );
    }

    #[test]
    fn test_sequence_must_not_skip() {
        let diagnostics = kinds("1. A pre\n3. B pre");
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::LineOutOfSequence {
                found: "3".to_string(),
                expected: 2,
            }]
        );
    }

    #[test]
    fn test_numbered_close_bracket_counts_in_sequence() {
        let source = "1. {A hip\n2. A copie 1\n3. }\n4. A->A ->i 1-2";
        assert_eq!(kinds(source), vec![]);
    }

    #[test]
    fn test_discharge_must_be_adjacent_to_close() {
        let source = "1. {A hip\n2. A copie 1\n3. }\n4. B pre\n5. A->A ->i 1-2";
        let diagnostics = kinds(source);
        assert!(diagnostics.contains(&DiagnosticKind::BoxMustBeDisposedByRule));
        assert!(diagnostics.contains(&DiagnosticKind::BoxMustBeDisposed));
    }
}
