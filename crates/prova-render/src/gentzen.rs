// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gentzen tree rendering.
//!
//! A pure post-pass over the scope tree: recursion starts from the last step
//! of the root scope and renders each step as an `\infer` node whose
//! children are the step's references. Box references recurse on the box's
//! last step. Hypotheses are decorated with a numeric index assigned in the
//! order the recursion first reaches them (through the discharging rule, so
//! rule label and hypothesis bracket always agree); copying a hypothesis
//! reuses the original's index, so the tree stays well-formed.

use std::collections::HashMap;

use prova_core::{BoxRef, LineRef, Names, ScopeTree, Step, StepKind};

/// Render the proof as a Gentzen-style tree, enclosed in display-math
/// delimiters (`\[ … \]`, nested `\infer` nodes).
pub fn render_gentzen(tree: &ScopeTree, names: &Names) -> String {
    let Some(last) = tree.root().steps.last() else {
        return String::new();
    };
    let mut renderer = GentzenRenderer {
        tree,
        names,
        hypotheses: HashMap::new(),
    };
    format!("\\[{}\\]\n", renderer.render_line(last.line))
}

struct GentzenRenderer<'a> {
    tree: &'a ScopeTree,
    names: &'a Names,
    /// Hypothesis line -> index, assigned on first encounter.
    hypotheses: HashMap<u32, usize>,
}

impl<'a> GentzenRenderer<'a> {
    fn render_line(&mut self, line: u32) -> String {
        match self.tree.step(line) {
            Some(step) => self.render_step(step),
            None => String::new(),
        }
    }

    fn render_step(&mut self, step: &Step) -> String {
        match &step.kind {
            StepKind::Premise => braced(&self.latex(step)),
            StepKind::Hypothesis | StepKind::HypothesisVar { .. } => {
                let index = self.hypothesis_index(step.line);
                format!(
                    "\\big[{}\\big]{}",
                    self.latex(step),
                    superscript(&index.to_string())
                )
            }
            StepKind::VarOpener { .. } => String::new(),
            StepKind::AndIntro { first, second } => {
                self.infer2("\\land\\text{i}".into(), step, *first, *second)
            }
            StepKind::AndElim { source } => self.infer1("\\land\\text{e}".into(), step, *source),
            StepKind::OrIntro { source } => self.infer1("\\lor\\text{i}".into(), step, *source),
            StepKind::ImpElim { first, second } => {
                self.infer2("\\rightarrow\\text{e}".into(), step, *first, *second)
            }
            StepKind::NegElim { first, second } => {
                self.infer2("\\lnot\\text{e}".into(), step, *first, *second)
            }
            StepKind::BottomElim { source } => self.infer1("\\bot\\text{e}".into(), step, *source),
            StepKind::ForAllElim { source } => {
                self.infer1("\\forall\\text{e}".into(), step, *source)
            }
            StepKind::ExistsIntro { source } => {
                self.infer1("\\exists\\text{i}".into(), step, *source)
            }
            StepKind::ImpIntro { body } => {
                self.infer_discharging("\\rightarrow\\text{i}", step, body)
            }
            StepKind::NegIntro { body } => self.infer_discharging("\\lnot\\text{i}", step, body),
            StepKind::Raa { body } => self.infer_discharging("\\text{raa}", step, body),
            StepKind::ForAllIntro { body } => {
                let child = self.box_child(body);
                self.infer("\\forall\\text{i}".into(), step, child)
            }
            StepKind::ExistsElim { source, body } => {
                let index = self.hypothesis_index(body.start.num);
                let label = format!("\\exists\\text{{e}}{}", superscript(&index.to_string()));
                let children = format!(
                    "{}&{}",
                    braced(&self.render_line(source.num)),
                    braced(&self.box_child(body))
                );
                self.infer(label, step, children)
            }
            StepKind::OrElim {
                source,
                left,
                right,
            } => {
                let first = self.hypothesis_index(left.start.num);
                let second = self.hypothesis_index(right.start.num);
                let label = format!(
                    "\\lor\\text{{e}}{}",
                    superscript(&format!("{},{}", first, second))
                );
                let children = format!(
                    "{}&{}&{}",
                    braced(&self.render_line(source.num)),
                    braced(&self.box_child(left)),
                    braced(&self.box_child(right))
                );
                self.infer(label, step, children)
            }
            // A copy is transparent: a copied hypothesis keeps its identity
            // (same index as the original line), anything else renders as
            // the source formula.
            StepKind::Copy { source } => match self.tree.step(source.num) {
                Some(original)
                    if matches!(
                        original.kind,
                        StepKind::Hypothesis | StepKind::HypothesisVar { .. }
                    ) =>
                {
                    self.render_step(original)
                }
                Some(original) => braced(&self.latex(original)),
                None => braced(&self.latex(step)),
            },
            StepKind::Malformed => braced(&self.latex(step)),
        }
    }

    fn infer(&self, label: String, step: &Step, children: String) -> String {
        format!(
            "\\infer[\\!\\!{}]{}{}",
            braced(&label),
            braced(&self.latex(step)),
            braced(&children)
        )
    }

    fn infer1(&mut self, label: String, step: &Step, source: LineRef) -> String {
        let child = self.render_line(source.num);
        self.infer(label, step, child)
    }

    fn infer2(&mut self, label: String, step: &Step, first: LineRef, second: LineRef) -> String {
        let children = format!(
            "{}&{}",
            braced(&self.render_line(first.num)),
            braced(&self.render_line(second.num))
        );
        self.infer(label, step, children)
    }

    /// A discharging rule assigns its hypothesis index before rendering the
    /// box, so the bracketed hypothesis below carries the same index.
    fn infer_discharging(&mut self, base: &str, step: &Step, body: &BoxRef) -> String {
        let index = self.hypothesis_index(body.start.num);
        let label = format!("{}{}", base, superscript(&index.to_string()));
        let child = self.box_child(body);
        self.infer(label, step, child)
    }

    fn box_child(&mut self, body: &BoxRef) -> String {
        match self.tree.find_box(body.start.num, body.end.num) {
            Some(scope) => self.render_line(scope.end_line),
            None => String::new(),
        }
    }

    fn hypothesis_index(&mut self, line: u32) -> usize {
        if let Some(&index) = self.hypotheses.get(&line) {
            return index;
        }
        let index = self.hypotheses.len() + 1;
        self.hypotheses.insert(line, index);
        index
    }

    fn latex(&self, step: &Step) -> String {
        step.formula
            .as_ref()
            .map(|f| f.to_latex(self.names))
            .unwrap_or_default()
    }
}

fn braced(content: &str) -> String {
    format!("{{{}}}", content)
}

fn superscript(index: &str) -> String {
    format!("^{{_{{{}}}}}", index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prova_core::{Names, Parser};

    fn render(source: &str) -> String {
        let mut names = Names::new();
        let parsed = Parser::new(source, &mut names)
            .parse_proof()
            .expect("proof should parse");
        render_gentzen(&parsed.tree, &names)
    }

    #[test]
    fn test_modus_ponens_tree() {
        assert_eq!(
            render("1. A pre\n2. A->B pre\n3. B ->e 1,2"),
            "\\[\\infer[\\!\\!{\\rightarrow\\text{e}}]{B}{{{A}}&{{A\\rightarrow B}}}\\]\n"
        );
    }

    #[test]
    fn test_discharged_hypothesis_shares_its_index() {
        assert_eq!(
            render("1. {A hip\n2. A copie 1\n3. }\n4. A->A ->i 1-2"),
            "\\[\\infer[\\!\\!{\\rightarrow\\text{i}^{_{1}}}]{A\\rightarrow A}{\\big[A\\big]^{_{1}}}\\]\n"
        );
    }

    #[test]
    fn test_or_elim_numbers_both_hypotheses() {
        let source = "1. A|B pre\n2. A->C pre\n3. B->C pre\n4. {A hip\n5. C ->e 4,2\n6. }\n7. {B hip\n8. C ->e 7,3\n9. }\n10. C |e 1,4-6,7-9";
        let rendered = render(source);
        assert!(rendered.starts_with("\\[\\infer[\\!\\!{\\lor\\text{e}^{_{1,2}}}]{C}{"));
        assert!(rendered.contains("\\big[A\\big]^{_{1}}"));
        assert!(rendered.contains("\\big[B\\big]^{_{2}}"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let source = "1. {A hip\n2. A copie 1\n3. }\n4. A->A ->i 1-2";
        assert_eq!(render(source), render(source));
    }

    #[test]
    fn test_premise_only_proof() {
        assert_eq!(render("1. A pre"), "\\[{A}\\]\n");
    }
}
