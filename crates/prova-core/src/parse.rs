// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for the proof language.
//!
//! A recursive descent parser over the token stream. Formulas are parsed by
//! precedence climbing with every binary connective right-associative,
//! loosest to tightest: `<->`, `->`, `|`, `&`, then the prefix operators
//! (negation and the quantifiers) and primaries.
//!
//! Parsing a proof populates the [`ScopeTree`] with one [`Step`] per line,
//! opens and closes scopes for the boxes, appends one styled line per step
//! to the Fitch rendering buffer and collects line-level diagnostics. The
//! only aborting failure is the input-level [`SyntaxError`]; recoverable
//! problems (a rule applied with the wrong reference shape, a hypothesis
//! outside a box) become diagnostics and the walk continues.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::SyntaxError;
use crate::formula::{BinaryOp, Formula, Quantifier};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::names::Names;
use crate::scope::ScopeTree;
use crate::step::{BoxRef, LineRef, Pos, Step, StepKind};

/// Everything the parse of a proof produces.
#[derive(Debug)]
pub struct Parsed {
    pub tree: ScopeTree,
    /// The complete Fitch rendering, built line by line during the parse.
    pub fitch: String,
    /// Line-level diagnostics recorded while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// A parsed reference item: a single line or a box `start-end`.
#[derive(Clone, Copy, Debug)]
enum RefItem {
    Line(LineRef),
    Box(BoxRef),
}

pub struct Parser<'a> {
    source: &'a str,
    names: &'a mut Names,
    tokens: Vec<Token>,
    pos: usize,
    theorem_mode: bool,
    tree: ScopeTree,
    fitch: String,
    diagnostics: Vec<Diagnostic>,
}

/// Parse a theorem statement `F1, ..., Fn |- G` (or `|- G`), as accepted by
/// the CLI's expected-theorem option.
pub fn parse_theorem(
    source: &str,
    names: &mut Names,
) -> Result<(Vec<Formula>, Formula), SyntaxError> {
    let mut parser = Parser::with_mode(source, names, true);
    parser.theorem()
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, names: &'a mut Names) -> Self {
        Self::with_mode(source, names, false)
    }

    fn with_mode(source: &'a str, names: &'a mut Names, theorem_mode: bool) -> Self {
        Self {
            source,
            names,
            tokens: tokenize(source),
            pos: 0,
            theorem_mode,
            tree: ScopeTree::new(),
            fitch: String::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse a whole proof.
    pub fn parse_proof(mut self) -> Result<Parsed, SyntaxError> {
        if self.tokens.is_empty() {
            return Err(SyntaxError::new(self.empty_input_message()));
        }
        self.fitch.push_str("\\begin{logicproof}{6}\n");
        while self.peek().is_some() {
            self.parse_step()?;
        }
        // Scopes still open at end of input are closed here, so the global
        // discharge check reports them instead of losing them.
        while !self.tree.current_is_root() {
            let end = self
                .tree
                .last_line_in_current()
                .unwrap_or(self.tree.current_scope().start_line);
            self.tree.close_scope(end, None);
        }
        self.finish_fitch();
        Ok(Parsed {
            tree: self.tree,
            fitch: self.fitch,
            diagnostics: self.diagnostics,
        })
    }

    fn theorem(&mut self) -> Result<(Vec<Formula>, Formula), SyntaxError> {
        if self.tokens.is_empty() {
            return Err(SyntaxError::new(self.empty_input_message()));
        }
        let mut premises = Vec::new();
        if self.peek_kind() != Some(TokenKind::Turnstile) {
            loop {
                premises.push(self.parse_formula()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::Turnstile)?;
        let conclusion = self.parse_formula()?;
        if self.peek().is_some() {
            return Err(self.syntax_error());
        }
        Ok((premises, conclusion))
    }

    // ------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------

    fn parse_step(&mut self) -> Result<(), SyntaxError> {
        match self.peek_kind() {
            Some(TokenKind::RBrace) => {
                let token = self.bump_token();
                self.close_box(None, &token);
                Ok(())
            }
            Some(TokenKind::Num) => {
                let num_token = self.bump_token();
                let line = self.number_value(&num_token)?;
                self.expect(TokenKind::Dot)?;
                match self.peek_kind() {
                    Some(TokenKind::RBrace) => {
                        let token = self.bump_token();
                        self.close_box(Some(line), &token);
                        Ok(())
                    }
                    Some(TokenKind::LBrace) => {
                        self.bump();
                        self.parse_box_opener(line, &num_token)
                    }
                    _ => self.parse_derivation(line, &num_token),
                }
            }
            _ => Err(self.syntax_error()),
        }
    }

    /// `{ v`, `{ v F hip` or `{ F hip`, after `N . {` was consumed.
    fn parse_box_opener(&mut self, line: u32, num_token: &Token) -> Result<(), SyntaxError> {
        let pos = pos_of(num_token);
        if self.peek_kind() == Some(TokenKind::Var) {
            let var_token = self.bump_token();
            let variable = self.names.intern(&var_token.text);
            if self.starts_formula() {
                let formula = self.parse_formula()?;
                self.expect(TokenKind::Hypothesis)?;
                self.tree.open_scope(line, Some(variable));
                let latex = formula.to_latex(self.names);
                self.fitch.push_str("\\begin{subproof}\n");
                self.fitch.push_str(&format!(
                    "\\llap{{${}\\quad$}}{} & hipótese\\\\\n",
                    var_token.text, latex
                ));
                self.tree.insert(Step {
                    line,
                    pos,
                    formula: Some(formula),
                    kind: StepKind::HypothesisVar { variable },
                });
            } else {
                self.tree.open_scope(line, Some(variable));
                self.fitch.push_str("\\begin{subproof}\n");
                self.fitch
                    .push_str(&format!("\\llap{{${}\\quad$}} &\\\\\n", var_token.text));
                self.tree.insert(Step {
                    line,
                    pos,
                    formula: None,
                    kind: StepKind::VarOpener { variable },
                });
            }
        } else {
            let formula = self.parse_formula()?;
            self.expect(TokenKind::Hypothesis)?;
            self.tree.open_scope(line, None);
            self.fitch.push_str("\\begin{subproof}\n");
            self.fitch
                .push_str(&format!("{} & hipótese\\\\\n", formula.to_latex(self.names)));
            self.tree.insert(Step {
                line,
                pos,
                formula: Some(formula),
                kind: StepKind::Hypothesis,
            });
        }
        Ok(())
    }

    /// `N . F <justification>` for everything that is not a box opener.
    fn parse_derivation(&mut self, line: u32, num_token: &Token) -> Result<(), SyntaxError> {
        let formula = self.parse_formula()?;
        let pos = pos_of(num_token);
        match self.peek_kind() {
            Some(TokenKind::Premise) => {
                self.bump();
                self.fitch
                    .push_str(&format!("{} & premissa\\\\\n", formula.to_latex(self.names)));
                self.tree.insert(Step {
                    line,
                    pos,
                    formula: Some(formula),
                    kind: StepKind::Premise,
                });
                Ok(())
            }
            Some(TokenKind::Hypothesis) => {
                let hip_token = self.bump_token();
                self.diagnostics.push(Diagnostic::new(
                    pos_of(&hip_token),
                    DiagnosticKind::HypothesisWithoutBox,
                ));
                self.fitch
                    .push_str(&format!("{} & hipótese\\\\\n", formula.to_latex(self.names)));
                self.tree.insert(Step {
                    line,
                    pos,
                    formula: Some(formula),
                    kind: StepKind::Hypothesis,
                });
                Ok(())
            }
            Some(kind) if is_rule(kind) => {
                let rule_token = self.bump_token();
                let refs = self.parse_references()?;
                self.build_rule_step(line, pos, formula, &rule_token, &refs);
                Ok(())
            }
            _ => Err(self.syntax_error()),
        }
    }

    fn parse_references(&mut self) -> Result<Vec<RefItem>, SyntaxError> {
        let mut items = Vec::new();
        loop {
            let start_token = self.expect(TokenKind::Num)?;
            let start = self.line_ref(&start_token)?;
            if self.eat(TokenKind::Dash) {
                let end_token = self.expect(TokenKind::Num)?;
                let end = self.line_ref(&end_token)?;
                items.push(RefItem::Box(BoxRef { start, end }));
            } else {
                items.push(RefItem::Line(start));
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    /// Match the parsed references against the rule's expected shape; a
    /// mismatch collapses to a `Malformed` step plus a diagnostic, never an
    /// abort.
    fn build_rule_step(
        &mut self,
        line: u32,
        pos: Pos,
        formula: Formula,
        rule_token: &Token,
        refs: &[RefItem],
    ) {
        use RefItem::{Box as BoxR, Line};

        let kind = match (rule_token.kind, refs) {
            (TokenKind::AndIntro, [Line(a), Line(b)]) => Some(StepKind::AndIntro {
                first: *a,
                second: *b,
            }),
            (TokenKind::ImpElim, [Line(a), Line(b)]) => Some(StepKind::ImpElim {
                first: *a,
                second: *b,
            }),
            (TokenKind::NegElim, [Line(a), Line(b)]) => Some(StepKind::NegElim {
                first: *a,
                second: *b,
            }),
            (TokenKind::AndElim, [Line(a)]) => Some(StepKind::AndElim { source: *a }),
            (TokenKind::OrIntro, [Line(a)]) => Some(StepKind::OrIntro { source: *a }),
            (TokenKind::BottomElim, [Line(a)]) => Some(StepKind::BottomElim { source: *a }),
            (TokenKind::Copy, [Line(a)]) => Some(StepKind::Copy { source: *a }),
            (TokenKind::ForAllElim, [Line(a)]) => Some(StepKind::ForAllElim { source: *a }),
            (TokenKind::ExistsIntro, [Line(a)]) => Some(StepKind::ExistsIntro { source: *a }),
            (TokenKind::ImpIntro, [BoxR(b)]) => Some(StepKind::ImpIntro { body: *b }),
            (TokenKind::NegIntro, [BoxR(b)]) => Some(StepKind::NegIntro { body: *b }),
            (TokenKind::Raa, [BoxR(b)]) => Some(StepKind::Raa { body: *b }),
            (TokenKind::ForAllIntro, [BoxR(b)]) => Some(StepKind::ForAllIntro { body: *b }),
            (TokenKind::OrElim, [Line(a), BoxR(b), BoxR(c)]) => Some(StepKind::OrElim {
                source: *a,
                left: *b,
                right: *c,
            }),
            (TokenKind::ExistsElim, [Line(a), BoxR(b)]) => Some(StepKind::ExistsElim {
                source: *a,
                body: *b,
            }),
            _ => None,
        };

        match kind {
            Some(kind) => {
                self.fitch.push_str(&format!(
                    "{} & {}\\\\\n",
                    formula.to_latex(self.names),
                    fitch_suffix(&kind)
                ));
                self.tree.insert(Step {
                    line,
                    pos,
                    formula: Some(formula),
                    kind,
                });
            }
            None => {
                let diagnostic = if expects_single_reference(rule_token.kind) {
                    DiagnosticKind::InvalidRuleOneReference {
                        rule: rule_token.text.clone(),
                    }
                } else {
                    DiagnosticKind::InvalidRule {
                        rule: rule_token.text.clone(),
                    }
                };
                self.diagnostics
                    .push(Diagnostic::new(pos_of(rule_token), diagnostic));
                self.tree.insert(Step {
                    line,
                    pos,
                    formula: Some(formula),
                    kind: StepKind::Malformed,
                });
            }
        }
    }

    fn close_box(&mut self, number: Option<u32>, token: &Token) {
        if self.tree.current_is_root() {
            self.diagnostics.push(Diagnostic::new(
                pos_of(token),
                DiagnosticKind::CloseBracketWithoutBox,
            ));
            return;
        }
        match self.tree.last_line_in_current() {
            None => {
                // An empty box cannot be closed; the scope stays open.
                self.diagnostics.push(Diagnostic::new(
                    pos_of(token),
                    DiagnosticKind::BoxMustBeDisposedByRule,
                ));
            }
            Some(end) => {
                self.tree.close_scope(end, number);
                self.strip_pending_break();
                self.fitch.push_str("\\end{subproof}\n");
            }
        }
    }

    fn finish_fitch(&mut self) {
        self.strip_pending_break();
        self.fitch.push_str("\\end{logicproof}");
    }

    /// The last emitted proof line keeps no `\\` before an environment ends.
    fn strip_pending_break(&mut self) {
        if self.fitch.ends_with("\\\\\n") {
            let stripped = self.fitch.len() - 3;
            self.fitch.truncate(stripped);
            self.fitch.push('\n');
        }
    }

    // ------------------------------------------------------------------
    // Formulas
    // ------------------------------------------------------------------

    fn parse_formula(&mut self) -> Result<Formula, SyntaxError> {
        self.parse_iff()
    }

    fn parse_iff(&mut self) -> Result<Formula, SyntaxError> {
        let left = self.parse_implication()?;
        if self.eat(TokenKind::Iff) {
            let right = self.parse_iff()?;
            return Ok(Formula::binary(BinaryOp::Iff, left, right));
        }
        Ok(left)
    }

    fn parse_implication(&mut self) -> Result<Formula, SyntaxError> {
        let left = self.parse_disjunction()?;
        if self.eat(TokenKind::Implies) {
            let right = self.parse_implication()?;
            return Ok(Formula::binary(BinaryOp::Implies, left, right));
        }
        Ok(left)
    }

    fn parse_disjunction(&mut self) -> Result<Formula, SyntaxError> {
        let left = self.parse_conjunction()?;
        if self.eat(TokenKind::Or) {
            let right = self.parse_disjunction()?;
            return Ok(Formula::binary(BinaryOp::Or, left, right));
        }
        Ok(left)
    }

    fn parse_conjunction(&mut self) -> Result<Formula, SyntaxError> {
        let left = self.parse_unary()?;
        if self.eat(TokenKind::And) {
            let right = self.parse_conjunction()?;
            return Ok(Formula::binary(BinaryOp::And, left, right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Formula, SyntaxError> {
        match self.peek_kind() {
            Some(TokenKind::Not) => {
                self.bump();
                Ok(Formula::not(self.parse_unary()?))
            }
            Some(TokenKind::ForAll) => {
                let token = self.bump_token();
                let variable = self.names.intern(&token.text[1..]);
                Ok(Formula::quantified(
                    Quantifier::ForAll,
                    variable,
                    self.parse_unary()?,
                ))
            }
            Some(TokenKind::Exists) => {
                let token = self.bump_token();
                let variable = self.names.intern(&token.text[1..]);
                Ok(Formula::quantified(
                    Quantifier::Exists,
                    variable,
                    self.parse_unary()?,
                ))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Formula, SyntaxError> {
        match self.peek_kind() {
            Some(TokenKind::Atom) => {
                let token = self.bump_token();
                let name = self.names.intern(&token.text);
                if self.eat(TokenKind::LParen) {
                    let args = self.parse_argument_list()?;
                    self.expect(TokenKind::RParen)?;
                    Ok(Formula::Predicate { name, args })
                } else {
                    Ok(Formula::Atom(name))
                }
            }
            Some(TokenKind::Bottom) => {
                self.bump();
                Ok(Formula::Bottom)
            }
            Some(TokenKind::LParen) => {
                self.bump();
                let formula = self.parse_formula()?;
                self.expect(TokenKind::RParen)?;
                Ok(formula)
            }
            _ => Err(self.syntax_error()),
        }
    }

    fn parse_argument_list(&mut self) -> Result<Vec<crate::names::Symbol>, SyntaxError> {
        let mut args = Vec::new();
        let first = self.expect(TokenKind::Var)?;
        args.push(self.names.intern(&first.text));
        while self.eat(TokenKind::Comma) {
            let next = self.expect(TokenKind::Var)?;
            args.push(self.names.intern(&next.text));
        }
        Ok(args)
    }

    fn starts_formula(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(
                TokenKind::Atom
                    | TokenKind::Bottom
                    | TokenKind::Not
                    | TokenKind::ForAll
                    | TokenKind::Exists
                    | TokenKind::LParen
            )
        )
    }

    // ------------------------------------------------------------------
    // Token plumbing and the input-level error
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn bump_token(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.peek_kind() == Some(kind) {
            return Ok(self.bump_token());
        }
        Err(self.syntax_error())
    }

    fn number_value(&self, token: &Token) -> Result<u32, SyntaxError> {
        token
            .text
            .parse()
            .map_err(|_| self.syntax_error_at(Some(token)))
    }

    fn line_ref(&self, token: &Token) -> Result<LineRef, SyntaxError> {
        Ok(LineRef {
            num: self.number_value(token)?,
            pos: pos_of(token),
        })
    }

    fn empty_input_message(&self) -> &'static str {
        if self.theorem_mode {
            "Nenhuma fórmula foi recebida, verifique a entrada."
        } else {
            "Nenhuma demonstração foi recebida, verifique a entrada."
        }
    }

    fn intro_message(&self) -> &'static str {
        if self.theorem_mode {
            "A definição da fórmula não está correta, verifique se todas regras foram aplicadas corretamente.\nLembre-se que uma fórmula é definida pela seguinte BNF:\nF :== P | ~ P | P & Q | P | Q | P -> Q | P <-> Q | (P), onde P,Q são átomos.\n"
        } else {
            "Uma das definições não está completa, verifique se todas regras foram aplicadas corretamente.\nLembre-se que uma regra de inferência sempre inicia com um número seguido de um . (linha de referência), tem uma fórmula e uma justificativa (premissa, hipóteses ou uma das regras de inferência com suas respectivas referências para fórmulas anteriores).\n"
        }
    }

    fn syntax_error(&self) -> SyntaxError {
        self.syntax_error_at(self.peek())
    }

    fn syntax_error_at(&self, token: Option<&Token>) -> SyntaxError {
        let Some(token) = token else {
            // Input ended in the middle of a definition; there is no token
            // to point the caret at.
            return SyntaxError::new(self.intro_message().trim_end());
        };
        let line_text = self
            .source
            .lines()
            .nth(token.line.saturating_sub(1) as usize)
            .unwrap_or("");
        let mut message = format!(
            "{}Erro de sintaxe:\n{}\n{}^",
            self.intro_message(),
            line_text,
            " ".repeat(token.col.saturating_sub(1) as usize)
        );
        if token.kind == TokenKind::Unknown {
            message.push_str(" Símbolo não pertence a linguagem.");
        }
        SyntaxError::new(message)
    }
}

fn pos_of(token: &Token) -> Pos {
    Pos {
        line: token.line,
        col: token.col,
    }
}

fn is_rule(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::AndIntro
            | TokenKind::AndElim
            | TokenKind::OrIntro
            | TokenKind::OrElim
            | TokenKind::ImpIntro
            | TokenKind::ImpElim
            | TokenKind::NegIntro
            | TokenKind::NegElim
            | TokenKind::BottomElim
            | TokenKind::Raa
            | TokenKind::Copy
            | TokenKind::ForAllIntro
            | TokenKind::ForAllElim
            | TokenKind::ExistsIntro
            | TokenKind::ExistsElim
    )
}

fn expects_single_reference(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::AndElim
            | TokenKind::OrIntro
            | TokenKind::BottomElim
            | TokenKind::Copy
            | TokenKind::ForAllElim
            | TokenKind::ExistsIntro
    )
}

/// The Fitch justification suffix of a rule step, e.g. `$\land i$ 1,2`.
fn fitch_suffix(kind: &StepKind) -> String {
    match kind {
        StepKind::AndIntro { first, second } => {
            format!("$\\land i$ {},{}", first.num, second.num)
        }
        StepKind::AndElim { source } => format!("$\\land e$ {}", source.num),
        StepKind::OrIntro { source } => format!("$\\lor i$ {}", source.num),
        StepKind::OrElim {
            source,
            left,
            right,
        } => format!(
            "$\\lor e$ {}, {}-{}, {}-{}",
            source.num, left.start.num, left.end.num, right.start.num, right.end.num
        ),
        StepKind::ImpIntro { body } => {
            format!("$\\rightarrow i$ {}-{}", body.start.num, body.end.num)
        }
        StepKind::ImpElim { first, second } => {
            format!("$\\rightarrow e$ {}, {}", first.num, second.num)
        }
        StepKind::NegIntro { body } => format!("$\\lnot i$ {}-{}", body.start.num, body.end.num),
        StepKind::NegElim { first, second } => {
            format!("$\\lnot e$ {}, {}", first.num, second.num)
        }
        StepKind::BottomElim { source } => format!("$\\bot e$ {}", source.num),
        StepKind::Raa { body } => format!("raa {}-{}", body.start.num, body.end.num),
        StepKind::Copy { source } => format!("copie {}", source.num),
        StepKind::ForAllElim { source } => format!("$\\forall e$ {}", source.num),
        StepKind::ForAllIntro { body } => {
            format!("$\\forall i$ {}-{}", body.start.num, body.end.num)
        }
        StepKind::ExistsIntro { source } => format!("$\\exists i$ {}", source.num),
        StepKind::ExistsElim { source, body } => format!(
            "$\\exists e$ {},{}-{}",
            source.num, body.start.num, body.end.num
        ),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Parsed {
        let mut names = Names::new();
        Parser::new(source, &mut names)
            .parse_proof()
            .expect("proof should parse")
    }

    #[test]
    fn test_modus_ponens_records() {
        let parsed = parse("1. A pre\n2. A->B pre\n3. B ->e 1,2");

        let steps: Vec<_> = parsed.tree.steps_in_order().collect();
        assert_eq!(steps.len(), 3);
        assert!(matches!(steps[0].kind, StepKind::Premise));
        assert!(matches!(steps[1].kind, StepKind::Premise));
        match &steps[2].kind {
            StepKind::ImpElim { first, second } => {
                assert_eq!(first.num, 1);
                assert_eq!(second.num, 2);
            }
            other => panic!("expected ->e, got {:?}", other),
        }
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_fitch_buffer_for_modus_ponens() {
        let parsed = parse("1. A pre\n2. A->B pre\n3. B ->e 1,2");
        assert_eq!(
            parsed.fitch,
            "\\begin{logicproof}{6}\nA & premissa\\\\\nA\\rightarrow B & premissa\\\\\nB & $\\rightarrow e$ 1, 2\n\\end{logicproof}"
        );
    }

    #[test]
    fn test_boxes_open_and_close() {
        let parsed = parse("1. {A hip\n2. A copie 1\n3. }\n4. A->A ->i 1-2");

        let scopes: Vec<_> = parsed.tree.scopes().collect();
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[1].start_line, 1);
        assert_eq!(scopes[1].end_line, 2);
        assert_eq!(scopes[1].close_line, Some(3));
        assert_eq!(scopes[1].discharge_line(), 4);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_bare_close_bracket() {
        let parsed = parse("1. {A hip\n2. A copie 1\n}\n3. A->A ->i 1-2");
        let scopes: Vec<_> = parsed.tree.scopes().collect();
        assert_eq!(scopes[1].close_line, None);
        assert_eq!(scopes[1].discharge_line(), 3);
    }

    #[test]
    fn test_variable_only_opener_has_no_formula() {
        let parsed = parse("1. Ax P(x) pre\n2. {y\n3. P(y) Ae 1\n4. }\n5. Ay P(y) Ai 2-4");

        let opener = parsed.tree.step(2).expect("line 2 recorded");
        assert!(opener.formula.is_none());
        assert!(matches!(opener.kind, StepKind::VarOpener { .. }));
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_hypothesis_outside_box_is_diagnosed() {
        let parsed = parse("1. A hip");
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(
            parsed.diagnostics[0].kind,
            DiagnosticKind::HypothesisWithoutBox
        );
    }

    #[test]
    fn test_close_without_box_is_diagnosed() {
        let parsed = parse("1. A pre\n}");
        assert_eq!(
            parsed.diagnostics[0].kind,
            DiagnosticKind::CloseBracketWithoutBox
        );
    }

    #[test]
    fn test_wrong_reference_shape_collapses_to_malformed() {
        let parsed = parse("1. A pre\n2. A&A &i 1");
        assert!(matches!(
            parsed.tree.step(2).unwrap().kind,
            StepKind::Malformed
        ));
        assert_eq!(
            parsed.diagnostics[0].kind,
            DiagnosticKind::InvalidRule {
                rule: "&i".to_string()
            }
        );

        let parsed = parse("1. A&B pre\n2. A &e 1,1");
        assert_eq!(
            parsed.diagnostics[0].kind,
            DiagnosticKind::InvalidRuleOneReference {
                rule: "&e".to_string()
            }
        );
    }

    #[test]
    fn test_syntax_error_carries_caret() {
        let mut names = Names::new();
        let error = Parser::new("1. A ? pre", &mut names)
            .parse_proof()
            .unwrap_err();
        assert!(error.message.contains("Erro de sintaxe:"));
        assert!(error.message.contains("1. A ? pre"));
        assert!(error.message.contains("     ^ Símbolo não pertence a linguagem."));
    }

    #[test]
    fn test_empty_input_is_an_input_level_error() {
        let mut names = Names::new();
        let error = Parser::new("  \n", &mut names).parse_proof().unwrap_err();
        assert_eq!(
            error.message,
            "Nenhuma demonstração foi recebida, verifique a entrada."
        );
    }

    #[test]
    fn test_connectives_are_right_associative() {
        let mut names = Names::new();
        let (_, conclusion) = parse_theorem("|- A->B->C", &mut names).unwrap();
        let a = Formula::Atom(names.get("A").unwrap());
        let b = Formula::Atom(names.get("B").unwrap());
        let c = Formula::Atom(names.get("C").unwrap());
        assert_eq!(
            conclusion,
            Formula::binary(
                BinaryOp::Implies,
                a,
                Formula::binary(BinaryOp::Implies, b, c)
            )
        );
    }

    #[test]
    fn test_precedence_loosest_to_tightest() {
        let mut names = Names::new();
        let (_, conclusion) = parse_theorem("|- ~A&B|C->D", &mut names).unwrap();
        // ((~A & B) | C) -> D
        let a = Formula::Atom(names.get("A").unwrap());
        let b = Formula::Atom(names.get("B").unwrap());
        let c = Formula::Atom(names.get("C").unwrap());
        let d = Formula::Atom(names.get("D").unwrap());
        let expected = Formula::binary(
            BinaryOp::Implies,
            Formula::binary(
                BinaryOp::Or,
                Formula::binary(BinaryOp::And, Formula::not(a), b),
                c,
            ),
            d,
        );
        assert_eq!(conclusion, expected);
    }

    #[test]
    fn test_quantifier_binds_tighter_than_conjunction() {
        let mut names = Names::new();
        let (_, conclusion) = parse_theorem("|- Ax P(x)&Q", &mut names).unwrap();
        let x = names.get("x").unwrap();
        let p = names.get("P").unwrap();
        let q = Formula::Atom(names.get("Q").unwrap());
        let expected = Formula::binary(
            BinaryOp::And,
            Formula::quantified(
                Quantifier::ForAll,
                x,
                Formula::Predicate {
                    name: p,
                    args: vec![x],
                },
            ),
            q,
        );
        assert_eq!(conclusion, expected);
    }

    #[test]
    fn test_theorem_with_premises() {
        let mut names = Names::new();
        let (premises, conclusion) = parse_theorem("A, A->B |- B", &mut names).unwrap();
        assert_eq!(premises.len(), 2);
        assert_eq!(conclusion, Formula::Atom(names.get("B").unwrap()));
    }

    #[test]
    fn test_theorem_rejects_trailing_input() {
        let mut names = Names::new();
        assert!(parse_theorem("|- B B", &mut names).is_err());
        assert!(parse_theorem("", &mut names).is_err());
    }
}
