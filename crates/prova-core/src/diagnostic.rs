// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Proof-level diagnostics.
//!
//! Every violation a proof can exhibit is one of the closed set of
//! [`DiagnosticKind`]s. A [`Diagnostic`] pairs a kind with the source
//! position of the offending token; [`Diagnostic::render`] produces the
//! user-facing three-line form with the caret. Formula strings are rendered
//! into the kind at creation time, so diagnostics do not keep the name table
//! alive.

use thiserror::Error;

use crate::step::Pos;

/// The closed set of proof-level violations, each with its message template.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("A fórmula {formula} não é um resultado válido para esta regra.")]
    InvalidResult { formula: String },

    #[error("A hipótese da linha {reference} não corresponde a hipótese esperada para a fórmula da conclusão desta regra.")]
    InvalidHypothesis { reference: u32 },

    #[error("A fórmula da linha {reference} não corresponde a conclusão esperada desta caixa para esta regra.")]
    InvalidBoxResult { reference: u32 },

    #[error("A fórmula referenciada na linha {reference} não é disjunção.")]
    NotDisjunction { reference: u32 },

    #[error("A fórmula referenciada na linha {reference} não é conjunção.")]
    NotConjunction { reference: u32 },

    #[error("A fórmula referenciada na linha {reference} deveria ser @.")]
    NotBottom { reference: u32 },

    #[error("Nenhuma das fórmulas referenciadas pelas linhas é a negação da outra fórmula.")]
    InvalidNegation,

    #[error("A fórmula à esquerda da fórmula da conclusão não é demonstrada por nenhuma das linhas referenciadas nesta regra.")]
    InvalidLeftConjunction,

    #[error("A fórmula à direita da fórmula da conclusão não é demonstrada por nenhuma das linhas referenciadas nesta regra.")]
    InvalidRightConjunction,

    #[error("A fórmula à direita ou à esquerda da fórmula da conclusão deve ser a mesma da fórmula referenciada na linha {reference}.")]
    InvalidLeftOrRightDisjunction { reference: u32 },

    #[error("A fórmula à direita ou à esquerda da fórmula da linha {reference} deve ser a mesma da fórmula da conclusão da regra.")]
    InvalidLeftOrRightConjunction { reference: u32 },

    #[error("A fórmula referenciada para cópia é diferente da definida para essa regra.")]
    CopyDifferentFormula,

    #[error("a regra {rule} deve ter duas referências separadas por vírgula.")]
    InvalidRule { rule: String },

    #[error("a regra {rule} deve ter uma única referência.")]
    InvalidRuleOneReference { rule: String },

    #[error("a referência a fórmula da linha {reference} não pode ser utilizada, pois esta fórmula já foi descartada.")]
    UsingDiscardedRule { reference: u32 },

    #[error("a referência a fórmula da linha {reference} não pode ser utilizada, pois todas as referências devem ocorrer antes desta regra.")]
    ReferencedLineNotDefined { reference: u32 },

    #[error("esta não é uma caixa (escopo) válida.")]
    InvalidScopeDelimiter,

    #[error("A hipótese definida não está dentro de uma caixa.")]
    HypothesisWithoutBox,

    #[error("Fechamento de caixa sem caixa aberta.")]
    CloseBracketWithoutBox,

    #[error("A hipótese que foi introduzida por essa caixa deve ser descartada pela regra que a introduziu em linha imediatamente posterior ao fechamento desta caixa.")]
    BoxMustBeDisposed,

    #[error("Esta caixa deve ser fechada em linha imediatamente posterior pela regra que a introduziu.")]
    BoxMustBeDisposedByRule,

    #[error("A fórmula {formula} não é uma substituição válida da fórmula universal referenciada na linha {reference}.")]
    InvalidSubstitutionUniversal { formula: String, reference: u32 },

    #[error("A fórmula da conclusão desta regra deve ser a mesma fórmula referenciada na linha {reference}.")]
    InvalidConclusionExistentialLastRule { reference: u32 },

    #[error("A fórmula da conclusão desta regra deve ser a quantificação universal da fórmula referenciada na linha {reference} com a variável definida neste escopo.")]
    InvalidConclusionUniversalLastRule { reference: u32 },

    #[error("A fórmula referenciada na regra do universal não é uma fórmula do tipo universal.")]
    InvalidUniversalFormula,

    #[error("A fórmula referenciada na regra do existencial não é uma fórmula do tipo existencial.")]
    InvalidExistentialFormula,

    #[error("A fórmula da linha {reference} não é uma substituição válida da variável da fórmula existencial {formula}.")]
    InvalidSubstitutionExists { formula: String, reference: u32 },

    #[error("A fórmula {formula} não é uma substituição válida da fórmula existencial referenciada na linha {reference}.")]
    InvalidSubstitutionExistential { formula: String, reference: u32 },

    #[error("A variável utilizada na linha {reference} é uma variável livre de uma fórmula definida anteriormente e, portanto, não pode ser utilizada nesta regra.")]
    VariableNotFresh { reference: u32 },

    #[error("A caixa que inicia na linha {reference} deve iniciar com uma variável para esta regra.")]
    BoxMustHaveVariable { reference: u32 },

    #[error("A caixa que inicia na linha {reference} deve conter apenas uma variável, sem hipótese, para a regra da introdução do universal.")]
    BoxMustHaveOnlyVariable { reference: u32 },

    #[error("A variável utilizada na conclusão dessa regra não pode ser a variável utilizada na caixa que inicia na linha {reference}.")]
    InvalidConclusionExistential { reference: u32 },

    #[error("A variável utilizada na caixa que inicia na linha {reference} não pode ocorrer como variável livre na conclusão da fórmula e, portanto, não pode ser utilizada nesta regra.")]
    InvalidConclusionUniversal { reference: u32 },

    #[error("A numeração da linha {found} deveria ser {expected}, pois a numeração da prova deve ser sequencial e iniciar em 1.")]
    LineOutOfSequenceAtStart { found: String, expected: u32 },

    #[error("A numeração da linha {found} deveria ser {expected}, pois a numeração da prova deve ser sequencial.")]
    LineOutOfSequence { found: String, expected: u32 },
}

/// A localized diagnostic anchored at a source position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: Pos,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(pos: Pos, kind: DiagnosticKind) -> Self {
        Self { pos, kind }
    }

    /// Three-line rendering: header, the raw source line, and a caret at the
    /// offending column followed by the kind's message.
    pub fn render(&self, source: &str) -> String {
        let line_text = source
            .lines()
            .nth(self.pos.line.saturating_sub(1) as usize)
            .unwrap_or("");
        format!(
            "Erro de sintaxe na linha {}:\n{}\n{}^, {}",
            self.pos.line,
            line_text,
            " ".repeat(self.pos.col.saturating_sub(1) as usize),
            self.kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_places_caret_at_column() {
        let source = "1. A pre\n2. B copie 1";
        let diagnostic = Diagnostic::new(
            Pos { line: 2, col: 4 },
            DiagnosticKind::CopyDifferentFormula,
        );

        let rendered = diagnostic.render(source);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Erro de sintaxe na linha 2:");
        assert_eq!(lines[1], "2. B copie 1");
        assert!(lines[2].starts_with("   ^, "));
    }

    #[test]
    fn test_messages_interpolate_references() {
        let kind = DiagnosticKind::UsingDiscardedRule { reference: 7 };
        assert!(kind.to_string().contains("linha 7"));

        let kind = DiagnosticKind::InvalidSubstitutionUniversal {
            formula: "P(a)".to_string(),
            reference: 3,
        };
        let message = kind.to_string();
        assert!(message.contains("P(a)"));
        assert!(message.contains("linha 3"));
    }
}
