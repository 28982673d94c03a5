use super::{
    grammar::{join_bodies, Body},
    Grammar, EPSILON,
};

impl Grammar {
    /// Removes direct and indirect left recursion by ordered substitution.
    ///
    /// Non-terminals are visited in lexicographic order. Bodies of `A_i`
    /// starting with an earlier `A_j` are expanded with every body of `A_j`,
    /// then immediate left recursion on `A_i` is removed with a fresh
    /// primed non-terminal.
    pub fn eliminate_left_recursion(&mut self) {
        let non_terminals = self.non_terminal_names();

        for i in 0..non_terminals.len() {
            let (replace, rest) = non_terminals.split_at(i);
            let nt = &rest[0];

            for earlier in replace {
                let starting_with: Vec<Body> = self
                    .productions(nt)
                    .iter()
                    .filter(|body| body.first() == Some(earlier))
                    .cloned()
                    .collect();
                if starting_with.is_empty() {
                    continue;
                }

                let prefixes: Vec<Body> = self.productions(earlier).iter().cloned().collect();
                for production in starting_with {
                    self.remove_production(nt, &production);
                    for prefix in &prefixes {
                        self.add_production(nt, join_bodies(prefix, &production[1..]));
                    }
                }
            }

            self.eliminate_immediate_left_recursion(nt);
        }
    }

    /// Rewrites `A -> A a | b` as `A -> b A'`, `A' -> a A' | &`.
    ///
    /// `A -> A` alternatives are dropped. A non-terminal with no
    /// non-recursive alternative is left as it is.
    pub fn eliminate_immediate_left_recursion(&mut self, nt: &str) {
        if !self.has_immediate_left_recursion(nt) {
            return;
        }

        let (recursive_productions, productions): (Vec<Body>, Vec<Body>) = self
            .productions(nt)
            .iter()
            .cloned()
            .partition(|body| body.first().map(String::as_str) == Some(nt));
        // without a non-recursive alternative `nt` derives no sentence, and
        // rewriting would leave it without productions
        if productions.is_empty() {
            return;
        }

        for production in &recursive_productions {
            self.remove_production(nt, production);
        }
        // `A -> A` derives nothing new
        let recursive_productions: Vec<Body> = recursive_productions
            .into_iter()
            .filter(|production| production.len() > 1)
            .collect();
        if recursive_productions.is_empty() {
            return;
        }

        let nt_prime = self.add_prime_non_terminal(nt);
        let prime = [nt_prime.clone()];

        for production in productions {
            self.remove_production(nt, &production);
            self.add_production(nt, join_bodies(&production, &prime));
        }
        for production in recursive_productions {
            self.add_production(&nt_prime, join_bodies(&production[1..], &prime));
        }
        self.add_production(&nt_prime, vec![EPSILON.to_string()]);
    }
}
