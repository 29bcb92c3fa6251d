// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thin command-line driver: read a proof, check it, write the report.
//!
//! The exit code is zero both for valid proofs and for proofs whose
//! diagnostics were successfully written; only I/O failures are non-zero.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use prova_verifier::Checker;

#[derive(Parser)]
#[command(
    name = "prova",
    about = "Verificador de provas em dedução natural (estilo Fitch)."
)]
struct Args {
    /// Arquivo de entrada com a prova.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Arquivo de saída com o resultado da verificação (padrão: stdout).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Teorema esperado, no formato "F1, F2 |- G".
    #[arg(short = 't', long = "theorem")]
    theorem: Option<String>,

    /// Omite a renderização no estilo Fitch.
    #[arg(long)]
    hide_fitch: bool,

    /// Omite a renderização no estilo Gentzen.
    #[arg(long)]
    hide_gentzen: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("erro ao ler {}: {}", args.input.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&source, &args);

    match &args.output {
        Some(path) => {
            if let Err(error) = fs::write(path, result) {
                eprintln!("erro ao escrever {}: {}", path.display(), error);
                return ExitCode::FAILURE;
            }
        }
        None => println!("{}", result),
    }
    ExitCode::SUCCESS
}

fn run(source: &str, args: &Args) -> String {
    let mut checker = Checker::new();
    let verification = match checker.check(source) {
        Ok(verification) => verification,
        Err(error) => {
            return format!("Os seguintes erros foram encontrados:\n\n{}\n", error);
        }
    };

    if !verification.is_valid() {
        let mut out = String::from("Os seguintes erros foram encontrados:\n");
        for error in &verification.errors {
            out.push('\n');
            out.push_str(error);
            out.push('\n');
        }
        return out;
    }

    let mut out = match &args.theorem {
        None => String::from("A demonstração está correta."),
        Some(theorem) => match checker.parse_theorem(theorem) {
            Err(_) => format!("{} não é um teorema válido!", theorem),
            Ok((premises, conclusion)) => {
                let proved = checker
                    .theorem_text(&verification)
                    .unwrap_or_else(|| theorem.clone());
                if verification.matches_theorem(&premises, &conclusion) {
                    format!("A demonstração de {} está correta.", proved)
                } else {
                    format!(
                        "A demonstração de {} é válida, mas é diferente da demonstração solicitada {}.",
                        proved, theorem
                    )
                }
            }
        },
    };

    if !args.hide_fitch {
        out.push_str("\n\nCódigo da demonstração no estilo Fitch em LaTeX:\n");
        out.push_str(&verification.fitch);
    }
    if !args.hide_gentzen {
        out.push_str("\n\nCódigo da demonstração no estilo Gentzen em LaTeX:\n");
        out.push_str(&verification.gentzen);
    }
    out
}
