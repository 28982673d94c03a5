use std::collections::{BTreeMap, BTreeSet};

use super::EPSILON;

/// Right-hand side of a production. `[EPSILON]` is the empty body.
pub type Body = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub name: String,
    pub first: BTreeSet<String>,
    pub follow: BTreeSet<String>,
    pub nullable: bool,
    pub productions: BTreeSet<Body>,
}

impl NonTerminal {
    pub fn new(name: String) -> Self {
        Self {
            name,
            first: BTreeSet::new(),
            follow: BTreeSet::new(),
            nullable: false,
            productions: BTreeSet::new(),
        }
    }
}

/// A context-free grammar whose productions are rewritten in place by the
/// transformation passes.
///
/// Non-terminals and their productions live in ordered collections, so every
/// pass that walks them does so in lexicographic order and produces the same
/// output on every run.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) non_terminals: BTreeMap<String, NonTerminal>,
    pub(crate) terminals: BTreeSet<String>,
    pub(crate) start_symbol: String,
    pub(crate) first_follow_valid: bool,
}

impl Grammar {
    pub(crate) fn new(start_symbol: String) -> Self {
        Self {
            non_terminals: BTreeMap::new(),
            terminals: BTreeSet::new(),
            start_symbol,
            first_follow_valid: false,
        }
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.non_terminals.values()
    }

    pub fn non_terminal_iter_mut(&mut self) -> impl Iterator<Item = &mut NonTerminal> {
        self.non_terminals.values_mut()
    }

    /// Names of all non-terminals, sorted. Passes that add non-terminals
    /// iterate over this snapshot rather than the live map.
    pub fn non_terminal_names(&self) -> Vec<String> {
        self.non_terminals.keys().cloned().collect()
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = &String> {
        self.terminals.iter()
    }

    pub fn get_non_terminal(&self, name: &str) -> Option<&NonTerminal> {
        self.non_terminals.get(name)
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.non_terminals.contains_key(name)
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminals.contains(name)
    }

    /// Productions of `head`.
    ///
    /// Panics if `head` is not a non-terminal of this grammar.
    pub fn productions(&self, head: &str) -> &BTreeSet<Body> {
        match self.non_terminals.get(head) {
            Some(nt) => &nt.productions,
            None => panic!("`{}` is not a non-terminal of this grammar", head),
        }
    }

    /// Every production as a `(head, body)` pair.
    pub fn production_set(&self) -> BTreeSet<(String, Body)> {
        self.non_terminals
            .values()
            .flat_map(|nt| {
                nt.productions
                    .iter()
                    .map(move |body| (nt.name.clone(), body.clone()))
            })
            .collect()
    }

    pub fn has_immediate_left_recursion(&self, head: &str) -> bool {
        self.productions(head)
            .iter()
            .any(|body| body.first().map(String::as_str) == Some(head))
    }

    pub(crate) fn add_non_terminal(&mut self, name: &str) {
        if !self.non_terminals.contains_key(name) {
            self.non_terminals
                .insert(name.to_string(), NonTerminal::new(name.to_string()));
            self.first_follow_valid = false;
        }
    }

    pub(crate) fn add_production(&mut self, head: &str, body: Body) -> bool {
        self.first_follow_valid = false;
        self.non_terminals
            .get_mut(head)
            .unwrap_or_else(|| panic!("`{}` is not a non-terminal of this grammar", head))
            .productions
            .insert(body)
    }

    pub(crate) fn remove_production(&mut self, head: &str, body: &[String]) -> bool {
        self.first_follow_valid = false;
        self.non_terminals
            .get_mut(head)
            .map_or(false, |nt| nt.productions.remove(body))
    }

    /// `name` followed by as many primes as it takes to be unused.
    pub fn get_symbol_prime_name(&self, mut name: String) -> String {
        name.push('\'');
        while self.non_terminals.contains_key(&name) || self.terminals.contains(&name) {
            name.push('\'');
        }
        name
    }

    /// Registers a fresh non-terminal derived from `origin` and returns its name.
    pub(crate) fn add_prime_non_terminal(&mut self, origin: &str) -> String {
        let name = self.get_symbol_prime_name(origin.to_string());
        self.add_non_terminal(&name);
        name
    }
}

pub fn is_epsilon_body(body: &[String]) -> bool {
    body.len() == 1 && body[0] == EPSILON
}

/// Concatenates two bodies, dropping epsilon markers; an empty result is
/// the epsilon body.
pub fn join_bodies(prefix: &[String], suffix: &[String]) -> Body {
    let body: Body = prefix
        .iter()
        .chain(suffix.iter())
        .filter(|s| s.as_str() != EPSILON)
        .cloned()
        .collect();
    if body.is_empty() {
        vec![EPSILON.to_string()]
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(s: &str) -> Body {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn join_drops_epsilon() {
        assert_eq!(join_bodies(&body("&"), &body("a B")), body("a B"));
        assert_eq!(join_bodies(&body("a"), &body("&")), body("a"));
        assert_eq!(join_bodies(&body("&"), &[]), body("&"));
    }

    #[test]
    fn prime_names_never_collide() {
        let g = Grammar::parse("S -> S' a\nS' -> b").unwrap();
        assert_eq!(g.get_symbol_prime_name("S".to_string()), "S''");
        assert_eq!(g.get_symbol_prime_name("A".to_string()), "A'");
    }

    #[test]
    fn immediate_left_recursion() {
        let g = Grammar::parse("E -> E + T | T\nT -> id").unwrap();
        assert!(g.has_immediate_left_recursion("E"));
        assert!(!g.has_immediate_left_recursion("T"));
    }
}
