use std::collections::BTreeSet;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{Grammar, EPSILON};

fn symbol_to_latex(s: &str, terminal_set: &BTreeSet<&str>) -> String {
    if s == EPSILON {
        "\\epsilon".to_string()
    } else if terminal_set.contains(s) {
        format!("\\text{{{}}}", escape::tex(s))
    } else {
        escape::tex(s).to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool, terminal_set: &BTreeSet<&str>) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| symbol_to_latex(s, terminal_set))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        left + &right
    }
}

#[derive(Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
    #[serde(skip)]
    terminals: BTreeSet<&'a str>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(
                self.productions
                    .iter()
                    .map(|s| s.to_latex(true, &self.terminals)),
            )
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("productions serialize to JSON")
    }
}

impl Grammar {
    /// Productions grouped by head, start symbol first.
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let start = self.start_symbol();
        let ordered = self
            .get_non_terminal(start)
            .into_iter()
            .chain(self.non_terminal_iter().filter(|nt| nt.name != start));

        let productions = ordered
            .map(|nt| ProductionOutput {
                left: nt.name.as_str(),
                rights: nt
                    .productions
                    .iter()
                    .map(|production| production.iter().map(String::as_str).collect())
                    .collect(),
            })
            .collect();
        ProductionOutputVec {
            productions,
            terminals: self.terminal_iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Serialize)]
struct FirstFollowOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl FirstFollowOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|&s| {
                    if s == EPSILON {
                        r"$\epsilon$".to_string()
                    } else {
                        escape::tex(s).to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(r"\ ")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct FirstFollowOutputVec<'a> {
    data: Vec<FirstFollowOutput<'a>>,
}

impl FirstFollowOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("FIRST and FOLLOW sets serialize to JSON")
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    /// FIRST and FOLLOW of every non-terminal. The sets are read as they are;
    /// call `calculate_first_follow` beforehand if they may be stale.
    pub fn to_first_follow_output_vec(&self) -> FirstFollowOutputVec {
        let data = self
            .non_terminal_iter()
            .map(|nt| FirstFollowOutput {
                name: nt.name.as_str(),
                nullable: nt.nullable,
                first: nt.first.iter().map(String::as_str).collect(),
                follow: nt.follow.iter().map(String::as_str).collect(),
            })
            .collect();
        FirstFollowOutputVec { data }
    }
}
