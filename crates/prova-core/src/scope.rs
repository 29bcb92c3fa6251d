// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The scope tree.
//!
//! A proof is a tree of boxes. Each [`Scope`] owns the steps written
//! directly inside it; child boxes are separate scopes pointing to their
//! parent by [`ScopeId`]. Lookups walk from a line's scope toward the root,
//! which is exactly the visibility rule of the calculus: a line may only
//! reference lines of its own box or of enclosing boxes, never of closed
//! sibling boxes.

use std::collections::{HashMap, HashSet};

use crate::formula::Formula;
use crate::names::Symbol;
use crate::step::{Step, StepKind};

/// Stable identifier of a scope, in creation order. The root is always id 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

/// One proof box (or the root).
#[derive(Clone, Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    /// The fresh variable introduced by the box opener, if any.
    pub variable: Option<Symbol>,
    /// Line number of the opening step.
    pub start_line: u32,
    /// Line number of the last step inside the box.
    pub end_line: u32,
    /// Line number written on the closing `}`, when it was numbered.
    pub close_line: Option<u32>,
    pub steps: Vec<Step>,
}

impl Scope {
    /// First step carrying a formula (skips a variable-only opener).
    pub fn first_formula(&self) -> Option<&Formula> {
        self.steps.iter().find_map(|s| s.formula.as_ref())
    }

    /// Last step carrying a formula.
    pub fn last_formula(&self) -> Option<&Formula> {
        self.steps.iter().rev().find_map(|s| s.formula.as_ref())
    }

    /// The line on which a discharging rule must sit: immediately after the
    /// close. A numbered `}` consumes one line number of its own.
    pub fn discharge_line(&self) -> u32 {
        self.close_line.unwrap_or(self.end_line) + 1
    }

    /// Whether a box reference `start-end` designates this scope. The end
    /// may be written either as the last line inside the box or as the
    /// number of the closing `}`.
    pub fn matches_reference(&self, start: u32, end: u32) -> bool {
        self.start_line == start && (self.end_line == end || self.close_line == Some(end))
    }
}

/// The scope tree of one proof, plus the cursor used during parsing.
#[derive(Clone, Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    current: ScopeId,
    /// Steps in insertion (source) order, as (scope, index) pairs.
    order: Vec<(ScopeId, usize)>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId(0),
                parent: None,
                variable: None,
                start_line: 1,
                end_line: 1,
                close_line: None,
                steps: Vec::new(),
            }],
            current: ScopeId(0),
            order: Vec::new(),
        }
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// All scopes, root first, in creation order.
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn current_is_root(&self) -> bool {
        self.current == ScopeId(0)
    }

    /// The innermost open scope.
    pub fn current_scope(&self) -> &Scope {
        &self.scopes[self.current.0]
    }

    /// Line of the last step inserted into the current scope.
    pub fn last_line_in_current(&self) -> Option<u32> {
        self.scopes[self.current.0].steps.last().map(|s| s.line)
    }

    /// Append a step to the current scope.
    pub fn insert(&mut self, step: Step) {
        let scope = &mut self.scopes[self.current.0];
        scope.steps.push(step);
        self.order.push((scope.id, scope.steps.len() - 1));
    }

    /// Open a child box of the current scope and make it current.
    pub fn open_scope(&mut self, start_line: u32, variable: Option<Symbol>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            parent: Some(self.current),
            variable,
            start_line,
            end_line: start_line,
            close_line: None,
            steps: Vec::new(),
        });
        self.current = id;
        id
    }

    /// Close the current box, recording where it ended, and restore its
    /// parent as current. The root is never closed.
    pub fn close_scope(&mut self, end_line: u32, close_line: Option<u32>) {
        let scope = &mut self.scopes[self.current.0];
        scope.end_line = end_line;
        scope.close_line = close_line;
        if let Some(parent) = scope.parent {
            self.current = parent;
        }
    }

    /// The scope containing the step with this line number.
    pub fn find_scope(&self, line: u32) -> Option<ScopeId> {
        self.scopes
            .iter()
            .find(|scope| scope.steps.iter().any(|s| s.line == line))
            .map(|scope| scope.id)
    }

    /// The step with this line number, wherever it lives.
    pub fn step(&self, line: u32) -> Option<&Step> {
        self.scopes
            .iter()
            .find_map(|scope| scope.steps.iter().find(|s| s.line == line))
    }

    /// The box variable of the scope containing this line, if any.
    pub fn scope_variable(&self, line: u32) -> Option<Symbol> {
        let id = self.find_scope(line)?;
        self.scope(id).variable
    }

    /// Resolve a reference from the line `from`: walk from `from`'s scope
    /// toward the root and return the formula recorded at `reference`.
    /// `None` when the reference is not in a visible scope (e.g. inside a
    /// closed sibling box) or carries no formula.
    pub fn lookup_formula(&self, from: u32, reference: u32) -> Option<&Formula> {
        let mut cursor = self.find_scope(from);
        while let Some(id) = cursor {
            let scope = self.scope(id);
            if let Some(step) = scope.steps.iter().find(|s| s.line == reference) {
                return step.formula.as_ref();
            }
            cursor = scope.parent;
        }
        None
    }

    /// The unique closed box designated by the reference `start-end`.
    pub fn find_box(&self, start: u32, end: u32) -> Option<&Scope> {
        self.scopes
            .iter()
            .skip(1)
            .find(|scope| scope.matches_reference(start, end))
    }

    /// First and last formulas of the box `start-end`, when it exists.
    pub fn box_delimiter(&self, start: u32, end: u32) -> (Option<&Formula>, Option<&Formula>) {
        match self.find_box(start, end) {
            Some(scope) => (scope.first_formula(), scope.last_formula()),
            None => (None, None),
        }
    }

    /// The eigenvariable condition: the box variable of `line`'s scope does
    /// not occur free in any step before `line` in a strict ancestor scope
    /// and is not itself the variable of a strict ancestor.
    pub fn is_fresh_variable(&self, line: u32) -> bool {
        let Some(id) = self.find_scope(line) else {
            return true;
        };
        let scope = self.scope(id);
        let Some(variable) = scope.variable else {
            return true;
        };

        let mut used = HashSet::new();
        let mut cursor = scope.parent;
        while let Some(ancestor_id) = cursor {
            let ancestor = self.scope(ancestor_id);
            for step in &ancestor.steps {
                if step.line < line {
                    if let Some(formula) = &step.formula {
                        used.extend(formula.free_variables());
                    }
                }
            }
            if ancestor.start_line < line {
                if let Some(v) = ancestor.variable {
                    used.insert(v);
                }
            }
            cursor = ancestor.parent;
        }
        !used.contains(&variable)
    }

    /// All steps in source order.
    pub fn steps_in_order(&self) -> impl Iterator<Item = &Step> {
        self.order
            .iter()
            .map(|&(scope, index)| &self.scope(scope).steps[index])
    }

    /// Premise formulas, deduplicated structurally in first-seen order.
    pub fn premises(&self) -> Vec<&Formula> {
        let mut seen: Vec<&Formula> = Vec::new();
        for step in self.steps_in_order() {
            if matches!(step.kind, StepKind::Premise) {
                if let Some(formula) = &step.formula {
                    if !seen.contains(&formula) {
                        seen.push(formula);
                    }
                }
            }
        }
        seen
    }

    /// The conclusion: formula of the last step of the root scope.
    pub fn conclusion(&self) -> Option<&Formula> {
        self.root().steps.last().and_then(|s| s.formula.as_ref())
    }

    /// Lines visible from `line`: the earlier lines of its scope and of all
    /// enclosing scopes, in walk order. Diagnostics support.
    pub fn visible_lines(&self, line: u32) -> Vec<u32> {
        let mut lines = Vec::new();
        let mut cursor = self.find_scope(line);
        while let Some(id) = cursor {
            let scope = self.scope(id);
            lines.extend(scope.steps.iter().map(|s| s.line).filter(|&l| l < line));
            cursor = scope.parent;
        }
        lines
    }

    /// Visibility precomputed for every recorded line.
    pub fn visible_lines_map(&self) -> HashMap<u32, Vec<u32>> {
        self.steps_in_order()
            .map(|step| (step.line, self.visible_lines(step.line)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::Names;
    use crate::step::{LineRef, Pos};

    fn step(line: u32, formula: Option<Formula>, kind: StepKind) -> Step {
        Step {
            line,
            pos: Pos { line, col: 1 },
            formula,
            kind,
        }
    }

    fn atom(names: &mut Names, name: &str) -> Formula {
        let symbol = names.intern(name);
        Formula::Atom(symbol)
    }

    /// 1. A pre / 2. {B hip / 3. B copie 2 / (close) / 5. rule...
    fn sample_tree(names: &mut Names) -> ScopeTree {
        let mut tree = ScopeTree::new();
        tree.insert(step(1, Some(atom(names, "A")), StepKind::Premise));
        tree.open_scope(2, None);
        tree.insert(step(2, Some(atom(names, "B")), StepKind::Hypothesis));
        tree.insert(step(
            3,
            Some(atom(names, "B")),
            StepKind::Copy {
                source: LineRef {
                    num: 2,
                    pos: Pos { line: 3, col: 9 },
                },
            },
        ));
        tree.close_scope(3, Some(4));
        tree
    }

    #[test]
    fn test_lookup_walks_ancestors() {
        let mut names = Names::new();
        let tree = sample_tree(&mut names);

        // From inside the box, both the hypothesis and the premise resolve.
        assert_eq!(
            tree.lookup_formula(3, 2),
            Some(&atom(&mut names, "B"))
        );
        assert_eq!(
            tree.lookup_formula(3, 1),
            Some(&atom(&mut names, "A"))
        );
    }

    #[test]
    fn test_closed_sibling_box_is_not_visible() {
        let mut names = Names::new();
        let mut tree = sample_tree(&mut names);
        tree.insert(step(5, Some(atom(&mut names, "C")), StepKind::Malformed));

        // Line 5 sits in the root; line 3 lives in the closed box.
        assert_eq!(tree.lookup_formula(5, 3), None);
        assert_eq!(tree.visible_lines(5), vec![1]);
        assert_eq!(tree.visible_lines_map().get(&5), Some(&vec![1]));
    }

    #[test]
    fn test_box_reference_matches_inside_line_or_close_line() {
        let mut names = Names::new();
        let tree = sample_tree(&mut names);

        assert!(tree.find_box(2, 3).is_some());
        assert!(tree.find_box(2, 4).is_some());
        assert!(tree.find_box(2, 5).is_none());
        assert!(tree.find_box(1, 3).is_none());
        let scope = tree.find_box(2, 3).unwrap();
        assert_eq!(scope.discharge_line(), 5);
    }

    #[test]
    fn test_freshness_rejects_variables_used_before() {
        let mut names = Names::new();
        let a = names.intern("a");
        let p = names.intern("P");
        let mut tree = ScopeTree::new();
        tree.insert(step(
            1,
            Some(Formula::Predicate {
                name: p,
                args: vec![a],
            }),
            StepKind::Premise,
        ));
        tree.open_scope(2, Some(a));
        tree.insert(step(2, None, StepKind::VarOpener { variable: a }));
        tree.close_scope(2, None);

        assert!(!tree.is_fresh_variable(2));

        let b = names.intern("b");
        tree.open_scope(3, Some(b));
        tree.insert(step(3, None, StepKind::VarOpener { variable: b }));
        tree.close_scope(3, None);
        assert!(tree.is_fresh_variable(3));
    }

    #[test]
    fn test_premises_deduplicate_structurally() {
        let mut names = Names::new();
        let mut tree = ScopeTree::new();
        tree.insert(step(1, Some(atom(&mut names, "A")), StepKind::Premise));
        tree.insert(step(2, Some(atom(&mut names, "A")), StepKind::Premise));
        tree.insert(step(3, Some(atom(&mut names, "B")), StepKind::Premise));

        let premises = tree.premises();
        assert_eq!(premises.len(), 2);
        assert_eq!(premises[0], &atom(&mut names, "A"));
        assert_eq!(premises[1], &atom(&mut names, "B"));
        assert_eq!(tree.conclusion(), Some(&atom(&mut names, "B")));
    }
}
