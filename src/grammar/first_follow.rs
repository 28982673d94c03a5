use std::collections::BTreeSet;

use super::{Grammar, END_MARK, EPSILON};

impl Grammar {
    pub fn calculate_first_follow(&mut self) {
        self.reset_first_follow();
        self.calculate_first();
        self.calculate_follow();
        self.first_follow_valid = true;
    }

    pub fn reset_first_follow(&mut self) {
        for nt in self.non_terminal_iter_mut() {
            nt.nullable = false;
            nt.first = BTreeSet::new();
            nt.follow = BTreeSet::new();
        }
        self.first_follow_valid = false;
    }

    /// Whether FIRST and FOLLOW describe the current productions.
    pub fn is_first_follow_valid(&self) -> bool {
        self.first_follow_valid
    }

    pub fn first(&self, nt: &str) -> Option<&BTreeSet<String>> {
        self.get_non_terminal(nt).map(|nt| &nt.first)
    }

    pub fn follow(&self, nt: &str) -> Option<&BTreeSet<String>> {
        self.get_non_terminal(nt).map(|nt| &nt.follow)
    }

    /// FIRST of a symbol sequence. Contains `EPSILON` when every symbol of
    /// `body` can derive the empty string, including when `body` is empty.
    pub fn first_of_body(&self, body: &[String]) -> BTreeSet<String> {
        let mut first = BTreeSet::new();
        for symbol in body {
            if symbol == EPSILON {
                continue;
            }
            match self.non_terminals.get(symbol) {
                Some(nt) => {
                    first.extend(nt.first.iter().filter(|s| *s != EPSILON).cloned());
                    if !nt.first.contains(EPSILON) {
                        return first;
                    }
                }
                None if self.terminals.contains(symbol) => {
                    first.insert(symbol.clone());
                    return first;
                }
                None => panic!("symbol `{}` is neither a terminal nor a non-terminal", symbol),
            }
        }
        first.insert(EPSILON.to_string());
        first
    }

    fn calculate_first(&mut self) {
        let names = self.non_terminal_names();
        let mut changed = true;
        while changed {
            changed = false;
            for name in &names {
                let first = self
                    .productions(name)
                    .iter()
                    .fold(BTreeSet::new(), |mut first, production| {
                        first.extend(self.first_of_body(production));
                        first
                    });

                let nt = self
                    .non_terminals
                    .get_mut(name)
                    .expect("names come from the grammar");
                if nt.first != first {
                    nt.nullable = first.contains(EPSILON);
                    nt.first = first;
                    changed = true;
                }
            }
        }
    }

    /// FOLLOW sets, iterated until no set grows.
    fn calculate_follow(&mut self) {
        let start = self.start_symbol.clone();
        if let Some(nt) = self.non_terminals.get_mut(&start) {
            nt.follow.insert(END_MARK.to_string());
        }

        let productions = self.production_set();
        let mut changed = true;
        while changed {
            changed = false;
            for (left, production) in &productions {
                for (i, symbol) in production.iter().enumerate() {
                    if !self.is_non_terminal(symbol) {
                        continue;
                    }

                    let mut follow = self.first_of_body(&production[i + 1..]);
                    if follow.remove(EPSILON) && symbol != left {
                        follow.extend(self.non_terminals[left].follow.iter().cloned());
                    }

                    let nt = self
                        .non_terminals
                        .get_mut(symbol)
                        .expect("checked by is_non_terminal");
                    let before = nt.follow.len();
                    nt.follow.extend(follow);
                    changed |= nt.follow.len() != before;
                }
            }
        }
    }
}
