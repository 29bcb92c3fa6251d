// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! First-order formulas.
//!
//! The [`Formula`] enum is the abstract syntax of the proof language:
//! propositional atoms, the absurdity constant, predicate applications,
//! negation, the binary connectives and the two quantifiers. Equality is
//! structural and not up to renaming of bound variables.
//!
//! All operations are pure; substitution is the textual replacement of free
//! occurrences, and [`Formula::is_substitutable`] is the usual capture test.

use std::collections::HashSet;

use crate::names::{Names, Symbol};

/// A binary connective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Implies,
    Iff,
}

impl BinaryOp {
    /// Surface-syntax spelling.
    pub fn text(self) -> &'static str {
        match self {
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Implies => "->",
            BinaryOp::Iff => "<->",
        }
    }

    fn latex(self) -> &'static str {
        match self {
            BinaryOp::And => "\\land ",
            BinaryOp::Or => "\\lor ",
            BinaryOp::Implies => "\\rightarrow ",
            BinaryOp::Iff => "\\leftrightarrow ",
        }
    }
}

/// A quantifier kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantifier {
    ForAll,
    Exists,
}

/// A first-order formula.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Formula {
    /// The absurdity constant, written `@` in the surface syntax.
    Bottom,
    /// A propositional atom.
    Atom(Symbol),
    /// A predicate applied to variables, e.g. `P(a,b)`.
    Predicate { name: Symbol, args: Vec<Symbol> },
    /// Negation.
    Not(Box<Formula>),
    /// A binary connective.
    Binary {
        op: BinaryOp,
        left: Box<Formula>,
        right: Box<Formula>,
    },
    /// A quantified formula.
    Quantified {
        quantifier: Quantifier,
        variable: Symbol,
        body: Box<Formula>,
    },
}

impl Formula {
    pub fn not(inner: Formula) -> Formula {
        Formula::Not(Box::new(inner))
    }

    pub fn binary(op: BinaryOp, left: Formula, right: Formula) -> Formula {
        Formula::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn quantified(quantifier: Quantifier, variable: Symbol, body: Formula) -> Formula {
        Formula::Quantified {
            quantifier,
            variable,
            body: Box::new(body),
        }
    }

    /// Every variable name appearing anywhere in the formula, free or bound.
    pub fn all_variables(&self) -> HashSet<Symbol> {
        match self {
            Formula::Bottom | Formula::Atom(_) => HashSet::new(),
            Formula::Predicate { args, .. } => args.iter().copied().collect(),
            Formula::Not(inner) => inner.all_variables(),
            Formula::Binary { left, right, .. } => {
                let mut vars = left.all_variables();
                vars.extend(right.all_variables());
                vars
            }
            Formula::Quantified { variable, body, .. } => {
                let mut vars = body.all_variables();
                vars.insert(*variable);
                vars
            }
        }
    }

    /// Variables not captured by an enclosing quantifier.
    pub fn free_variables(&self) -> HashSet<Symbol> {
        match self {
            Formula::Bottom | Formula::Atom(_) => HashSet::new(),
            Formula::Predicate { args, .. } => args.iter().copied().collect(),
            Formula::Not(inner) => inner.free_variables(),
            Formula::Binary { left, right, .. } => {
                let mut vars = left.free_variables();
                vars.extend(right.free_variables());
                vars
            }
            Formula::Quantified { variable, body, .. } => {
                let mut vars = body.free_variables();
                vars.remove(variable);
                vars
            }
        }
    }

    /// `all_variables` minus `free_variables`.
    pub fn bound_variables(&self) -> HashSet<Symbol> {
        let free = self.free_variables();
        self.all_variables()
            .into_iter()
            .filter(|v| !free.contains(v))
            .collect()
    }

    /// Replace every free occurrence of `x` by `t`.
    ///
    /// Under a quantifier binding `x` the substitution halts, since `x` is
    /// no longer free below it.
    pub fn substitute(&self, x: Symbol, t: Symbol) -> Formula {
        match self {
            Formula::Bottom => Formula::Bottom,
            Formula::Atom(name) => Formula::Atom(*name),
            Formula::Predicate { name, args } => Formula::Predicate {
                name: *name,
                args: args
                    .iter()
                    .map(|&arg| if arg == x { t } else { arg })
                    .collect(),
            },
            Formula::Not(inner) => Formula::not(inner.substitute(x, t)),
            Formula::Binary { op, left, right } => {
                Formula::binary(*op, left.substitute(x, t), right.substitute(x, t))
            }
            Formula::Quantified {
                quantifier,
                variable,
                body,
            } => {
                if *variable == x {
                    self.clone()
                } else {
                    Formula::quantified(*quantifier, *variable, body.substitute(x, t))
                }
            }
        }
    }

    /// Whether replacing `x` by `t` is capture-free: no quantifier binding
    /// `t` encloses a free occurrence of `x`.
    pub fn is_substitutable(&self, x: Symbol, t: Symbol) -> bool {
        match self {
            Formula::Bottom | Formula::Atom(_) | Formula::Predicate { .. } => true,
            Formula::Not(inner) => inner.is_substitutable(x, t),
            Formula::Binary { left, right, .. } => {
                left.is_substitutable(x, t) && right.is_substitutable(x, t)
            }
            Formula::Quantified { variable, body, .. } => {
                if *variable == t && body.free_variables().contains(&x) {
                    return false;
                }
                body.is_substitutable(x, t)
            }
        }
    }

    /// On a quantified formula `Qx. B`, whether `target` is `B[x := t]` for
    /// some identifier `t`. Always `false` on other variants.
    ///
    /// Any witnessing `t` either occurs free in `target` or is `x` itself
    /// (the degenerate instance where `target` equals the body), so only
    /// those candidates are tried.
    pub fn valid_substitution(&self, target: &Formula) -> bool {
        match self {
            Formula::Quantified { variable, body, .. } => {
                let mut candidates = target.free_variables();
                candidates.insert(*variable);
                candidates
                    .into_iter()
                    .any(|t| body.substitute(*variable, t) == *target)
            }
            _ => false,
        }
    }

    /// Surface-syntax rendering, e.g. `Ax (P(x)->Q)`.
    pub fn to_text(&self, names: &Names) -> String {
        match self {
            Formula::Bottom => "@".to_string(),
            Formula::Atom(name) => names.resolve_unchecked(*name).to_string(),
            Formula::Predicate { name, args } => {
                render_predicate(names.resolve_unchecked(*name), args, names)
            }
            Formula::Not(inner) => {
                if inner.is_binary() {
                    format!("~({})", inner.to_text(names))
                } else {
                    format!("~{}", inner.to_text(names))
                }
            }
            Formula::Binary { op, left, right } => format!(
                "{}{}{}",
                text_child(left, names),
                op.text(),
                text_child(right, names)
            ),
            Formula::Quantified {
                quantifier,
                variable,
                body,
            } => {
                let letter = match quantifier {
                    Quantifier::ForAll => 'A',
                    Quantifier::Exists => 'E',
                };
                let var = names.resolve_unchecked(*variable);
                if body.is_binary() {
                    format!("{}{} ({})", letter, var, body.to_text(names))
                } else {
                    format!("{}{} {}", letter, var, body.to_text(names))
                }
            }
        }
    }

    /// LaTeX rendering, e.g. `\forall x (P(x)\rightarrow Q)`.
    pub fn to_latex(&self, names: &Names) -> String {
        match self {
            Formula::Bottom => "\\bot".to_string(),
            Formula::Atom(name) => names.resolve_unchecked(*name).to_string(),
            Formula::Predicate { name, args } => {
                render_predicate(names.resolve_unchecked(*name), args, names)
            }
            Formula::Not(inner) => {
                if inner.is_binary() {
                    format!("\\lnot({})", inner.to_latex(names))
                } else {
                    format!("\\lnot {}", inner.to_latex(names))
                }
            }
            Formula::Binary { op, left, right } => format!(
                "{}{}{}",
                latex_child(left, names),
                op.latex(),
                latex_child(right, names)
            ),
            Formula::Quantified {
                quantifier,
                variable,
                body,
            } => {
                let symbol = match quantifier {
                    Quantifier::ForAll => "\\forall",
                    Quantifier::Exists => "\\exists",
                };
                let var = names.resolve_unchecked(*variable);
                if body.is_binary() {
                    format!("{} {} ({})", symbol, var, body.to_latex(names))
                } else {
                    format!("{} {} {}", symbol, var, body.to_latex(names))
                }
            }
        }
    }

    fn is_binary(&self) -> bool {
        matches!(self, Formula::Binary { .. })
    }
}

fn render_predicate(name: &str, args: &[Symbol], names: &Names) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let rendered: Vec<&str> = args.iter().map(|&a| names.resolve_unchecked(a)).collect();
    format!("{}({})", name, rendered.join(","))
}

// Binary children are parenthesized so the rendering is unambiguous without
// re-encoding the precedence table.
fn text_child(child: &Formula, names: &Names) -> String {
    if child.is_binary() {
        format!("({})", child.to_text(names))
    } else {
        child.to_text(names)
    }
}

fn latex_child(child: &Formula, names: &Names) -> String {
    if child.is_binary() {
        format!("({})", child.to_latex(names))
    } else {
        child.to_latex(names)
    }
}
