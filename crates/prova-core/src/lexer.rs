// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lexer for the proof language.
//!
//! [`tokenize`] converts the source into a flat token stream with 1-based
//! source positions. Lexing never fails: characters outside the language
//! become [`TokenKind::Unknown`] tokens, which the parser reports as the
//! input-level syntax error at that position.
//!
//! Tie-breaks: compound operators win over their prefixes (`->i` and `->e`
//! before `->`, `|i`/`|e`/`|-`/`|=` before `|`, and so on); on an uppercase
//! `A` or `E`, the rule names `Ai`/`Ae`/`Ei`/`Ee` win, then the fused
//! quantifier prefix (`Ax` is one token for `forall x`), then the plain
//! atom; lowercase words are scanned maximally and classified afterwards,
//! reserving `pre`, `hip`, `raa` and `copie`.

/// The kind of a lexed token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// A line number or reference.
    Num,
    Dot,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    /// A bare `-` (box-reference separator).
    Dash,
    /// `|-` or `|=`.
    Turnstile,
    /// `~`
    Not,
    /// `&`
    And,
    /// `|`
    Or,
    /// `->`
    Implies,
    /// `<->`
    Iff,
    /// `@`
    Bottom,
    /// `A<var>`, quantifier letter fused with the variable name.
    ForAll,
    /// `E<var>`, quantifier letter fused with the variable name.
    Exists,
    /// `&i`
    AndIntro,
    /// `&e`
    AndElim,
    /// `|i`
    OrIntro,
    /// `|e`
    OrElim,
    /// `->i`
    ImpIntro,
    /// `->e`
    ImpElim,
    /// `~i`
    NegIntro,
    /// `~e`
    NegElim,
    /// `@e`
    BottomElim,
    /// `raa`
    Raa,
    /// `copie`
    Copy,
    /// `Ai`
    ForAllIntro,
    /// `Ae`
    ForAllElim,
    /// `Ei`
    ExistsIntro,
    /// `Ee`
    ExistsElim,
    /// `pre`
    Premise,
    /// `hip`
    Hypothesis,
    /// `[A-Z][A-Z0-9]*`
    Atom,
    /// `[a-z][a-z0-9]*`, excluding the reserved words.
    Var,
    /// A character outside the language.
    Unknown,
}

/// A token with its source text and 1-based position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub col: u32,
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
}

impl Scanner {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, accept: fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            if !accept(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn skip_comment(&mut self) {
        if self.peek(1) == Some('#') {
            // Block comment: ## ... ##
            self.bump();
            self.bump();
            while let Some(c) = self.peek(0) {
                if c == '#' && self.peek(1) == Some('#') {
                    self.bump();
                    self.bump();
                    return;
                }
                self.bump();
            }
        } else {
            // Line comment: # ... \n
            while let Some(c) = self.peek(0) {
                if c == '\n' {
                    break;
                }
                self.bump();
            }
        }
    }
}

fn is_lower_ident(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

fn is_upper_ident(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit()
}

/// Convert the source text into tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        col: 1,
    };
    let mut tokens = Vec::new();

    while let Some(c) = scanner.peek(0) {
        if c.is_whitespace() {
            scanner.bump();
            continue;
        }
        if c == '#' {
            scanner.skip_comment();
            continue;
        }

        let (line, col) = (scanner.line, scanner.col);
        let mut push = |kind: TokenKind, text: String| {
            tokens.push(Token {
                kind,
                text,
                line,
                col,
            });
        };

        match c {
            '0'..='9' => {
                let text = scanner.take_while(|c| c.is_ascii_digit());
                push(TokenKind::Num, text);
            }
            '.' => {
                scanner.bump();
                push(TokenKind::Dot, ".".into());
            }
            ',' => {
                scanner.bump();
                push(TokenKind::Comma, ",".into());
            }
            '(' => {
                scanner.bump();
                push(TokenKind::LParen, "(".into());
            }
            ')' => {
                scanner.bump();
                push(TokenKind::RParen, ")".into());
            }
            '{' => {
                scanner.bump();
                push(TokenKind::LBrace, "{".into());
            }
            '}' => {
                scanner.bump();
                push(TokenKind::RBrace, "}".into());
            }
            '-' => {
                if scanner.peek(1) == Some('>') {
                    scanner.bump();
                    scanner.bump();
                    match scanner.peek(0) {
                        Some('i') => {
                            scanner.bump();
                            push(TokenKind::ImpIntro, "->i".into());
                        }
                        Some('e') => {
                            scanner.bump();
                            push(TokenKind::ImpElim, "->e".into());
                        }
                        _ => push(TokenKind::Implies, "->".into()),
                    }
                } else {
                    scanner.bump();
                    push(TokenKind::Dash, "-".into());
                }
            }
            '<' => {
                if scanner.peek(1) == Some('-') && scanner.peek(2) == Some('>') {
                    scanner.bump();
                    scanner.bump();
                    scanner.bump();
                    push(TokenKind::Iff, "<->".into());
                } else {
                    scanner.bump();
                    push(TokenKind::Unknown, "<".into());
                }
            }
            '~' => {
                scanner.bump();
                match scanner.peek(0) {
                    Some('i') => {
                        scanner.bump();
                        push(TokenKind::NegIntro, "~i".into());
                    }
                    Some('e') => {
                        scanner.bump();
                        push(TokenKind::NegElim, "~e".into());
                    }
                    _ => push(TokenKind::Not, "~".into()),
                }
            }
            '&' => {
                scanner.bump();
                match scanner.peek(0) {
                    Some('i') => {
                        scanner.bump();
                        push(TokenKind::AndIntro, "&i".into());
                    }
                    Some('e') => {
                        scanner.bump();
                        push(TokenKind::AndElim, "&e".into());
                    }
                    _ => push(TokenKind::And, "&".into()),
                }
            }
            '|' => {
                scanner.bump();
                match scanner.peek(0) {
                    Some('-') => {
                        scanner.bump();
                        push(TokenKind::Turnstile, "|-".into());
                    }
                    Some('=') => {
                        scanner.bump();
                        push(TokenKind::Turnstile, "|=".into());
                    }
                    Some('i') => {
                        scanner.bump();
                        push(TokenKind::OrIntro, "|i".into());
                    }
                    Some('e') => {
                        scanner.bump();
                        push(TokenKind::OrElim, "|e".into());
                    }
                    _ => push(TokenKind::Or, "|".into()),
                }
            }
            '@' => {
                scanner.bump();
                if scanner.peek(0) == Some('e') {
                    scanner.bump();
                    push(TokenKind::BottomElim, "@e".into());
                } else {
                    push(TokenKind::Bottom, "@".into());
                }
            }
            'A' | 'E' => {
                scanner.bump();
                match scanner.peek(0) {
                    Some('i') => {
                        scanner.bump();
                        let (kind, text) = if c == 'A' {
                            (TokenKind::ForAllIntro, "Ai")
                        } else {
                            (TokenKind::ExistsIntro, "Ei")
                        };
                        push(kind, text.into());
                    }
                    Some('e') => {
                        scanner.bump();
                        let (kind, text) = if c == 'A' {
                            (TokenKind::ForAllElim, "Ae")
                        } else {
                            (TokenKind::ExistsElim, "Ee")
                        };
                        push(kind, text.into());
                    }
                    Some(next) if next.is_ascii_lowercase() => {
                        let var = scanner.take_while(is_lower_ident);
                        let kind = if c == 'A' {
                            TokenKind::ForAll
                        } else {
                            TokenKind::Exists
                        };
                        push(kind, format!("{}{}", c, var));
                    }
                    _ => {
                        let rest = scanner.take_while(is_upper_ident);
                        push(TokenKind::Atom, format!("{}{}", c, rest));
                    }
                }
            }
            'B'..='Z' => {
                let text = scanner.take_while(is_upper_ident);
                push(TokenKind::Atom, text);
            }
            'a'..='z' => {
                let text = scanner.take_while(is_lower_ident);
                let kind = match text.as_str() {
                    "pre" => TokenKind::Premise,
                    "hip" => TokenKind::Hypothesis,
                    "raa" => TokenKind::Raa,
                    "copie" => TokenKind::Copy,
                    _ => TokenKind::Var,
                };
                push(kind, text);
            }
            _ => {
                scanner.bump();
                push(TokenKind::Unknown, c.to_string());
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_modus_ponens_line() {
        assert_eq!(
            kinds("3. B ->e 1,2"),
            vec![
                TokenKind::Num,
                TokenKind::Dot,
                TokenKind::Atom,
                TokenKind::ImpElim,
                TokenKind::Num,
                TokenKind::Comma,
                TokenKind::Num,
            ]
        );
    }

    #[test]
    fn test_quantifier_fuses_with_variable() {
        let tokens = tokenize("Ax P(x)");
        assert_eq!(tokens[0].kind, TokenKind::ForAll);
        assert_eq!(tokens[0].text, "Ax");
        assert_eq!(tokens[1].kind, TokenKind::Atom);
        assert_eq!(
            kinds("Ex1 P(x1)"),
            vec![
                TokenKind::Exists,
                TokenKind::Atom,
                TokenKind::LParen,
                TokenKind::Var,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_rule_names_win_over_quantifiers_and_atoms() {
        assert_eq!(kinds("Ai"), vec![TokenKind::ForAllIntro]);
        assert_eq!(kinds("Ae"), vec![TokenKind::ForAllElim]);
        assert_eq!(kinds("Ei"), vec![TokenKind::ExistsIntro]);
        assert_eq!(kinds("Ee"), vec![TokenKind::ExistsElim]);
        assert_eq!(kinds("A"), vec![TokenKind::Atom]);
        assert_eq!(kinds("A1"), vec![TokenKind::Atom]);
        assert_eq!(kinds("AB"), vec![TokenKind::Atom]);
    }

    #[test]
    fn test_reserved_words_are_not_variables() {
        assert_eq!(kinds("pre"), vec![TokenKind::Premise]);
        assert_eq!(kinds("hip"), vec![TokenKind::Hypothesis]);
        assert_eq!(kinds("raa"), vec![TokenKind::Raa]);
        assert_eq!(kinds("copie"), vec![TokenKind::Copy]);
        assert_eq!(kinds("prefixo"), vec![TokenKind::Var]);
        assert_eq!(kinds("copia"), vec![TokenKind::Var]);
    }

    #[test]
    fn test_compound_operators_win_over_prefixes() {
        assert_eq!(kinds("->"), vec![TokenKind::Implies]);
        assert_eq!(kinds("<->"), vec![TokenKind::Iff]);
        assert_eq!(kinds("|-"), vec![TokenKind::Turnstile]);
        assert_eq!(kinds("|="), vec![TokenKind::Turnstile]);
        assert_eq!(kinds("@e"), vec![TokenKind::BottomElim]);
        assert_eq!(kinds("@"), vec![TokenKind::Bottom]);
        assert_eq!(
            kinds("A->B"),
            vec![TokenKind::Atom, TokenKind::Implies, TokenKind::Atom]
        );
    }

    #[test]
    fn test_comments_and_whitespace_are_ignored() {
        assert_eq!(kinds("# linha de comentário\n1. A pre").len(), 4);
        assert_eq!(kinds("## bloco ## 1"), vec![TokenKind::Num]);
        assert_eq!(kinds("   \n\t"), vec![]);
    }

    #[test]
    fn test_positions_are_one_based() {
        let tokens = tokenize("1. A pre\n2. B pre");
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[2].line, tokens[2].col), (1, 4));
        assert_eq!((tokens[4].line, tokens[4].col), (2, 1));
    }

    #[test]
    fn test_unknown_character_becomes_fallback_token() {
        let tokens = tokenize("1. A ? pre");
        assert_eq!(tokens[3].kind, TokenKind::Unknown);
        assert_eq!(tokens[3].col, 6);
    }
}
