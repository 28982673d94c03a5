use clap::{Parser, ValueEnum};
use ll1_converter::{Grammar, Recognizer};
use std::{fs, io::Read, path::PathBuf, process::ExitCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Eliminate left recursion
    Elf,
    /// One round of left factoring
    Lf,
    /// Eliminate left recursion, left factor, compute FIRST and FOLLOW
    Convert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Productions
    Prod,
    /// FIRST and FOLLOW sets
    Ff,
    /// LL(1) parsing table
    Ll1,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Plain,
    Latex,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transformations to apply, in order
    #[arg(short, long, value_enum)]
    action: Vec<Action>,

    /// What to print after the transformations
    #[arg(short, long, value_enum)]
    output: Vec<Output>,

    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Whitespace-separated tokens to run through the LL(1) table
    #[arg(short, long)]
    tokens: Option<String>,

    /// Grammar file; stdin when absent
    grammar: Option<PathBuf>,
}

fn read_input(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().lock().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let input = match read_input(args.grammar.as_ref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("error: failed to read grammar: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut g = match Grammar::parse(&input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for action in &args.action {
        match action {
            Action::Elf => g.eliminate_left_recursion(),
            Action::Lf => g.left_factoring(),
            Action::Convert => g.convert_grammar(),
        }
    }
    if !g.is_first_follow_valid() {
        g.calculate_first_follow();
    }

    for output in &args.output {
        let text = match output {
            Output::Prod => {
                let t = g.to_production_output_vec();
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            }
            Output::Ff => {
                let t = g.to_first_follow_output_vec();
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            }
            Output::Ll1 => {
                let t = g.build_table();
                for (left, terminal, productions) in t.conflicts() {
                    eprintln!(
                        "warning: not LL(1), cell ({}, {}) has {} productions",
                        left,
                        terminal,
                        productions.len()
                    );
                }
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json(),
                }
            }
        };
        println!("{}", text);
    }

    if let Some(tokens) = &args.tokens {
        let table = g.build_table();
        if !table.is_ll1() {
            eprintln!("warning: the grammar is not LL(1), the result is unreliable");
        }
        let accepted = Recognizer::new(g.start_symbol(), table).run(tokens.split_whitespace());
        println!("{}", if accepted { "accept" } else { "reject" });
        if !accepted {
            return ExitCode::from(2);
        }
    }

    ExitCode::SUCCESS
}
