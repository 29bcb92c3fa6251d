// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Proof steps.
//!
//! One [`Step`] per proof line, tagged by its justification. References keep
//! the source position of the number they were written with, so a dangling
//! or ill-scoped reference can be reported exactly where the user wrote it.

use crate::formula::Formula;
use crate::names::Symbol;

/// A 1-based source position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

/// A reference to an earlier proof line, as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineRef {
    pub num: u32,
    pub pos: Pos,
}

/// A reference to an earlier box, written `start-end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxRef {
    pub start: LineRef,
    pub end: LineRef,
}

/// The justification of a proof step, with the references it takes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepKind {
    Premise,
    /// Propositional hypothesis opening a box.
    Hypothesis,
    /// First-order hypothesis opening a box that also introduces a variable.
    HypothesisVar { variable: Symbol },
    /// Opener of a box introducing only a variable (`{ v`); carries no formula.
    VarOpener { variable: Symbol },
    AndIntro { first: LineRef, second: LineRef },
    AndElim { source: LineRef },
    OrIntro { source: LineRef },
    OrElim { source: LineRef, left: BoxRef, right: BoxRef },
    ImpIntro { body: BoxRef },
    ImpElim { first: LineRef, second: LineRef },
    NegIntro { body: BoxRef },
    NegElim { first: LineRef, second: LineRef },
    BottomElim { source: LineRef },
    Raa { body: BoxRef },
    Copy { source: LineRef },
    ForAllElim { source: LineRef },
    ForAllIntro { body: BoxRef },
    ExistsIntro { source: LineRef },
    ExistsElim { source: LineRef, body: BoxRef },
    /// The parser recovered past a rule applied with the wrong reference shape.
    Malformed,
}

/// A proof line as recorded in the scope tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// The user-written line number.
    pub line: u32,
    /// Position of the line-number token in the source.
    pub pos: Pos,
    /// The line's formula; absent for variable-only box openers.
    pub formula: Option<Formula>,
    pub kind: StepKind,
}

impl Step {
    /// Every reference the step takes, line and box boundaries alike, in
    /// written order.
    pub fn references(&self) -> Vec<LineRef> {
        match &self.kind {
            StepKind::AndIntro { first, second }
            | StepKind::ImpElim { first, second }
            | StepKind::NegElim { first, second } => vec![*first, *second],
            StepKind::AndElim { source }
            | StepKind::OrIntro { source }
            | StepKind::BottomElim { source }
            | StepKind::Copy { source }
            | StepKind::ForAllElim { source }
            | StepKind::ExistsIntro { source } => vec![*source],
            StepKind::ImpIntro { body }
            | StepKind::NegIntro { body }
            | StepKind::Raa { body }
            | StepKind::ForAllIntro { body } => vec![body.start, body.end],
            StepKind::OrElim {
                source,
                left,
                right,
            } => vec![*source, left.start, left.end, right.start, right.end],
            StepKind::ExistsElim { source, body } => {
                vec![*source, body.start, body.end]
            }
            StepKind::Premise
            | StepKind::Hypothesis
            | StepKind::HypothesisVar { .. }
            | StepKind::VarOpener { .. }
            | StepKind::Malformed => Vec::new(),
        }
    }

    /// The line references whose formulas the step consumes (box boundaries
    /// excluded); these are the ones subject to the visibility rule.
    pub fn line_references(&self) -> Vec<LineRef> {
        match &self.kind {
            StepKind::AndIntro { first, second }
            | StepKind::ImpElim { first, second }
            | StepKind::NegElim { first, second } => vec![*first, *second],
            StepKind::AndElim { source }
            | StepKind::OrIntro { source }
            | StepKind::BottomElim { source }
            | StepKind::Copy { source }
            | StepKind::ForAllElim { source }
            | StepKind::ExistsIntro { source }
            | StepKind::OrElim { source, .. }
            | StepKind::ExistsElim { source, .. } => vec![*source],
            _ => Vec::new(),
        }
    }
}
