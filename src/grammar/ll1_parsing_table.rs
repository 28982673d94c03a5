use crowbook_text_processing::escape::tex as escape_tex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::Grammar;

use super::{grammar::Body, pretty_print::ProductionOutput, END_MARK, EPSILON};

/// LL(1) parsing table. A cell lists every distinct body written to it, in
/// write order; more than one body means the grammar is not LL(1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTable {
    terminals: Vec<String>,
    rows: BTreeMap<String, BTreeMap<String, Vec<Body>>>,
}

impl ParseTable {
    fn new(terminals: Vec<String>) -> Self {
        Self {
            terminals,
            rows: BTreeMap::new(),
        }
    }

    fn insert(&mut self, left: &str, terminal: &str, production: &Body) {
        let cell = self
            .rows
            .entry(left.to_string())
            .or_default()
            .entry(terminal.to_string())
            .or_default();
        if !cell.contains(production) {
            cell.push(production.clone());
        }
    }

    /// Column labels: the terminals followed by the end marker.
    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &String> {
        self.rows.keys()
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.rows.contains_key(name)
    }

    /// The body to expand `left` with on lookahead `terminal`. When a cell
    /// holds several bodies the last one written wins.
    pub fn get(&self, left: &str, terminal: &str) -> Option<&Body> {
        self.entries(left, terminal).last()
    }

    pub fn entries(&self, left: &str, terminal: &str) -> &[Body] {
        self.rows
            .get(left)
            .and_then(|row| row.get(terminal))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts().next().is_none()
    }

    /// Cells that received more than one body.
    pub fn conflicts(&self) -> impl Iterator<Item = (&str, &str, &[Body])> {
        self.rows.iter().flat_map(|(left, row)| {
            row.iter()
                .filter(|(_, cell)| cell.len() > 1)
                .map(move |(terminal, cell)| (left.as_str(), terminal.as_str(), cell.as_slice()))
        })
    }

    fn cell_output<'a>(&'a self, left: &'a str, terminal: &str) -> ProductionOutput<'a> {
        ProductionOutput {
            left,
            rights: self
                .entries(left, terminal)
                .iter()
                .map(|body| body.iter().map(String::as_str).collect())
                .collect(),
        }
    }

    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().cloned());
        let mut output: Vec<Vec<String>> = vec![header];
        for left in self.rows.keys() {
            let mut line: Vec<String> = vec![left.clone()];
            line.extend(self.terminals.iter().map(|terminal| {
                self.cell_output(left, terminal)
                    .to_plaintext(left.len(), false)
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| output.iter().map(|line| line[j].len()).max().unwrap_or(0))
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape_tex(t.as_str()))),
        );
        let header = header.join(" & ");

        let terminal_set: BTreeSet<&str> = self.terminals.iter().map(String::as_str).collect();
        let mut output: Vec<String> = Vec::new();
        for left in self.rows.keys() {
            let mut line: Vec<String> = vec![escape_tex(left.as_str()).to_string()];
            line.extend(self.terminals.iter().map(|terminal| {
                let cell = self.cell_output(left, terminal);
                if cell.rights.len() > 1 {
                    format!("{{\\color{{red}}{}}}", cell.to_latex(false, &terminal_set))
                } else {
                    cell.to_latex(false, &terminal_set)
                }
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("parse table serializes to JSON")
    }
}

impl Grammar {
    /// Rewrites the grammar towards LL(1) form: left recursion elimination,
    /// one round of left factoring, then FIRST and FOLLOW.
    pub fn convert_grammar(&mut self) {
        self.eliminate_left_recursion();
        self.left_factoring();
        self.calculate_first_follow();
    }

    /// Builds the LL(1) table from the current productions. The table is
    /// returned even when cells conflict; check `ParseTable::is_ll1`.
    pub fn build_table(&self) -> ParseTable {
        if !self.is_first_follow_valid() {
            let mut g = self.clone();
            g.calculate_first_follow();
            return g.build_table();
        }

        let terminals: Vec<String> = self
            .terminal_iter()
            .cloned()
            .chain(std::iter::once(END_MARK.to_string()))
            .collect();
        let mut table = ParseTable::new(terminals);

        for nt in self.non_terminal_iter() {
            table.rows.entry(nt.name.clone()).or_default();
            for production in &nt.productions {
                let mut first = self.first_of_body(production);
                let nullable = first.remove(EPSILON);

                for terminal in &first {
                    table.insert(&nt.name, terminal, production);
                }
                if nullable {
                    for terminal in &nt.follow {
                        table.insert(&nt.name, terminal, production);
                    }
                }
            }
        }

        table
    }

    pub fn is_ll1(&self) -> bool {
        self.build_table().is_ll1()
    }
}
