// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sequent rendering: the proved theorem as `P1, ..., Pn |- C`.

use prova_core::{Formula, Names};

/// Surface-syntax sequent, e.g. `A, A->B |- B`.
pub fn theorem_text(premises: &[Formula], conclusion: &Formula, names: &Names) -> String {
    if premises.is_empty() {
        return format!("|- {}", conclusion.to_text(names));
    }
    let rendered: Vec<String> = premises.iter().map(|f| f.to_text(names)).collect();
    format!("{} |- {}", rendered.join(", "), conclusion.to_text(names))
}

/// LaTeX sequent, e.g. `A, A\rightarrow B \vdash B`.
pub fn theorem_latex(premises: &[Formula], conclusion: &Formula, names: &Names) -> String {
    if premises.is_empty() {
        return format!("\\vdash {}", conclusion.to_latex(names));
    }
    let rendered: Vec<String> = premises.iter().map(|f| f.to_latex(names)).collect();
    format!("{} \\vdash {}", rendered.join(", "), conclusion.to_latex(names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prova_core::parse_theorem;

    #[test]
    fn test_sequent_rendering() {
        let mut names = Names::new();
        let (premises, conclusion) = parse_theorem("A, A->B |- B", &mut names).unwrap();

        assert_eq!(theorem_text(&premises, &conclusion, &names), "A, A->B |- B");
        assert_eq!(
            theorem_latex(&premises, &conclusion, &names),
            "A, A\\rightarrow B \\vdash B"
        );
    }

    #[test]
    fn test_sequent_without_premises() {
        let mut names = Names::new();
        let (premises, conclusion) = parse_theorem("|- A->A", &mut names).unwrap();

        assert_eq!(theorem_text(&premises, &conclusion, &names), "|- A->A");
        assert_eq!(
            theorem_latex(&premises, &conclusion, &names),
            "\\vdash A\\rightarrow A"
        );
    }
}
