use crate::Grammar;

use super::{grammar::join_bodies, GrammarError, END_MARK, EPSILON};

impl Grammar {
    /// Reads grammar text, one `Head -> s1 s2 ... sn` production per line.
    ///
    /// `|` separates alternatives, and a line starting with `|` continues the
    /// previous head. The head of the first production is the start symbol.
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut raw_productions: Vec<(usize, &str, &str)> = Vec::new();

        let mut previous_left: Option<&str> = None;
        for (i, line) in grammar.lines().enumerate() {
            let line_no = i + 1;
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split("->").collect();
            if parts.len() > 2 {
                return Err(GrammarError::TooManyArrows(line_no));
            }
            let (left, rights): (&str, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(GrammarError::EmptyLeft(line_no));
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(GrammarError::LeftContainsWhitespace(line_no));
                } else if left_str == EPSILON || left_str == END_MARK {
                    return Err(GrammarError::ReservedSymbol(line_no, left_str.to_string()));
                }
                (left_str, parts[1].trim())
            } else if let Some(rest) = parts[0].trim().strip_prefix('|') {
                match previous_left {
                    Some(left) => (left, rest.trim()),
                    None => return Err(GrammarError::NoPreviousLeft(line_no)),
                }
            } else {
                return Err(GrammarError::MissingArrow(line_no));
            };

            previous_left = Some(left);
            raw_productions.push((line_no, left, rights));
        }

        let start = match raw_productions.first() {
            Some((_, left, _)) => left.to_string(),
            None => return Err(GrammarError::Empty),
        };
        let mut g = Self::new(start);

        for (_, left, _) in &raw_productions {
            g.add_non_terminal(left);
        }

        for (line_no, left, rights) in raw_productions {
            for right in rights.split('|') {
                let symbols: Vec<String> = right.split_whitespace().map(str::to_string).collect();
                if symbols.is_empty() {
                    return Err(GrammarError::EmptyAlternative(line_no));
                }
                if symbols.iter().any(|s| s == END_MARK) {
                    return Err(GrammarError::ReservedSymbol(line_no, END_MARK.to_string()));
                }
                for s in &symbols {
                    if s != EPSILON && !g.is_non_terminal(s) {
                        g.terminals.insert(s.clone());
                    }
                }
                g.add_production(left, join_bodies(&symbols, &[]));
            }
        }

        Ok(g)
    }
}
