use std::collections::{BTreeMap, BTreeSet};

use super::{
    grammar::{is_epsilon_body, join_bodies, Body},
    Grammar,
};

/// Length of the longest common positional prefix of `a` and `b`.
pub fn common_prefix_size<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Longest sequence that prefixes at least two of `productions`.
///
/// All pairs are compared in order; on a tie the first pair found wins.
pub fn find_longest_common_prefix<T: PartialEq + Clone>(productions: &[Vec<T>]) -> Vec<T> {
    let mut prefix: &[T] = &[];
    for i in 0..productions.len() {
        for j in i + 1..productions.len() {
            let size = common_prefix_size(&productions[i], &productions[j]);
            if size > prefix.len() {
                prefix = &productions[i][..size];
            }
        }
    }
    prefix.to_vec()
}

impl Grammar {
    /// One round of left factoring: ambiguity hidden behind non-terminals is
    /// inlined first, then the longest shared prefix of each non-terminal is
    /// moved into a fresh primed non-terminal.
    pub fn left_factoring(&mut self) {
        self.replace_indirect_with_direct_non_determinism();
        self.remove_direct_non_determinism();
    }

    /// Groups of two or more non-terminals that have bodies starting with the
    /// same terminal. A group reached through several terminals appears once.
    fn colliding_non_terminals(&self) -> BTreeSet<BTreeSet<String>> {
        let mut ways_to_terminal: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for nt in self.non_terminal_iter() {
            for production in &nt.productions {
                if let Some(first) = production.first() {
                    if self.is_terminal(first) {
                        ways_to_terminal
                            .entry(first.as_str())
                            .or_default()
                            .insert(nt.name.clone());
                    }
                }
            }
        }

        ways_to_terminal
            .into_values()
            .filter(|nts| nts.len() > 1)
            .collect()
    }

    fn replace_indirect_with_direct_non_determinism(&mut self) {
        for colliding in self.colliding_non_terminals() {
            for nt in self.non_terminal_names() {
                let referencing = self
                    .productions(&nt)
                    .iter()
                    .filter(|body| colliding.iter().any(|c| body.contains(c)))
                    .count();
                if referencing < 2 {
                    continue;
                }

                for nt_to_replace in &colliding {
                    if *nt_to_replace != nt {
                        self.inline_non_terminal(&nt, nt_to_replace);
                    }
                }
            }
        }
    }

    /// Substitutes every body of `nt_to_replace` for its first occurrence in
    /// each body of `nt`.
    ///
    /// Nothing is inlined when a body of `nt_to_replace` mentions `nt` or
    /// `nt_to_replace` itself, as such bodies would be copied again by every
    /// later inlining.
    fn inline_non_terminal(&mut self, nt: &str, nt_to_replace: &str) {
        let replacements: Vec<Body> = self.productions(nt_to_replace).iter().cloned().collect();
        if replacements
            .iter()
            .any(|body| body.iter().any(|s| s == nt || s == nt_to_replace))
        {
            return;
        }

        let targets: Vec<(Body, usize)> = self
            .productions(nt)
            .iter()
            .filter_map(|body| {
                body.iter()
                    .position(|s| s == nt_to_replace)
                    .map(|index| (body.clone(), index))
            })
            .collect();

        for (target, index) in targets {
            self.remove_production(nt, &target);
            for replacement in &replacements {
                let head = join_bodies(&target[..index], replacement);
                self.add_production(nt, join_bodies(&head, &target[index + 1..]));
            }
        }
    }

    fn remove_direct_non_determinism(&mut self) {
        for nt in self.non_terminal_names() {
            let productions: Vec<Body> = self
                .productions(&nt)
                .iter()
                .filter(|body| !is_epsilon_body(body))
                .cloned()
                .collect();
            let prefix = find_longest_common_prefix(&productions);
            if prefix.is_empty() {
                continue;
            }

            let nt_prime = self.add_prime_non_terminal(&nt);
            self.add_production(&nt, join_bodies(&prefix, &[nt_prime.clone()]));

            // an alternative is factored when it holds every prefix symbol,
            // wherever they appear in it
            let prefix_symbols: BTreeSet<&String> = prefix.iter().collect();
            for production in productions {
                let symbols: BTreeSet<&String> = production.iter().collect();
                if !prefix_symbols.is_subset(&symbols) {
                    continue;
                }
                self.remove_production(&nt, &production);
                let rest: Body = production.iter().skip(prefix.len()).cloned().collect();
                self.add_production(&nt_prime, join_bodies(&rest, &[]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn productions(text: &str) -> BTreeSet<(String, Body)> {
        text.lines()
            .map(|line| {
                let mut it = line.split_whitespace();
                let head = it.next().unwrap().to_string();
                it.next();
                (head, it.map(str::to_string).collect())
            })
            .collect()
    }

    #[test]
    fn prefix_size() {
        assert_eq!(
            common_prefix_size(&["i", "E", "t", "S"], &["i", "E", "t", "S", "e", "S"]),
            4
        );
        assert_eq!(common_prefix_size(&["c", "C"], &["a", "D"]), 0);
        assert_eq!(common_prefix_size(&["e", "C"], &["e", "A"]), 1);
    }

    #[test]
    fn longest_prefix() {
        let productions = vec![
            vec!["a"],
            vec!["i", "E", "t", "S", "e", "S"],
            vec!["i", "E", "t", "S"],
        ];
        assert_eq!(
            find_longest_common_prefix(&productions),
            vec!["i", "E", "t", "S"]
        );

        let productions = vec![vec!["a", "D"], vec!["c", "C"]];
        assert!(find_longest_common_prefix(&productions).is_empty());

        let productions = vec![vec!["e", "A"], vec!["e", "C"]];
        assert_eq!(find_longest_common_prefix(&productions), vec!["e"]);

        let productions = vec![
            vec!["f", "o", "o"],
            vec!["f", "o", "o", "b", "a", "r"],
            vec!["f", "o", "o", "t", "b", "a", "l", "l"],
            vec!["f", "o", "o", "t", "b", "a", "g"],
            vec!["b", "a", "r"],
        ];
        assert_eq!(
            find_longest_common_prefix(&productions),
            vec!["f", "o", "o", "t", "b", "a"]
        );
    }

    #[test]
    fn dangling_else() {
        let mut g = Grammar::parse("S -> i E t S | i E t S e S | a\nE -> b").unwrap();
        g.left_factoring();
        assert_eq!(
            g.production_set(),
            productions(
                "S -> i E t S S'\n\
                 S -> a\n\
                 S' -> e S\n\
                 S' -> &\n\
                 E -> b"
            )
        );
    }

    #[test]
    fn indirect_ambiguity_is_inlined() {
        let mut g = Grammar::parse("S -> A | B\nA -> a x\nB -> a y").unwrap();
        g.left_factoring();
        assert_eq!(
            g.production_set(),
            productions(
                "S -> a S'\n\
                 S' -> x\n\
                 S' -> y\n\
                 A -> a x\n\
                 B -> a y"
            )
        );
    }

    #[test]
    fn inlining_keeps_surrounding_symbols() {
        let mut g = Grammar::parse("S -> c A d | c B\nA -> a | &\nB -> a b").unwrap();
        g.replace_indirect_with_direct_non_determinism();
        assert_eq!(
            g.productions("S").iter().cloned().collect::<BTreeSet<_>>(),
            productions("S -> c a d\nS -> c d\nS -> c a b")
                .into_iter()
                .map(|(_, body)| body)
                .collect()
        );
    }

    #[test]
    fn self_referential_bodies_are_not_inlined() {
        let mut g = Grammar::parse("S -> A | B\nA -> a A\nB -> a").unwrap();
        g.replace_indirect_with_direct_non_determinism();
        assert_eq!(
            g.production_set(),
            productions(
                "S -> A\n\
                 S -> a\n\
                 A -> a A\n\
                 B -> a"
            )
        );
    }

    #[test]
    fn mutually_referencing_groups_stay_bounded() {
        // {B, S} collides on both `b` and `c`, and B's bodies mention S
        let mut g =
            Grammar::parse("S -> a A B | B A | B\nA -> a | B b | A\nB -> b S b | c b S").unwrap();
        g.eliminate_left_recursion();
        g.left_factoring();
        assert_eq!(g.productions("B").len(), 2);
        assert!(g.production_set().len() < 32);

        let mut g = Grammar::parse("S -> B b\nA -> c S B | a b A | a\nB -> A b | A S A | B a")
            .unwrap();
        g.eliminate_left_recursion();
        g.left_factoring();
        assert!(g.production_set().len() < 32);
    }

    #[test]
    fn subset_rule_selects_reordered_alternatives() {
        let mut g = Grammar::parse("N -> a b c | a b d | b a").unwrap();
        g.left_factoring();
        assert_eq!(
            g.production_set(),
            productions(
                "N -> a b N'\n\
                 N' -> c\n\
                 N' -> d\n\
                 N' -> &"
            )
        );
    }

    #[test]
    fn epsilon_alternative_is_kept() {
        let mut g = Grammar::parse("N -> a b | a c | &").unwrap();
        g.left_factoring();
        assert_eq!(
            g.production_set(),
            productions(
                "N -> a N'\n\
                 N -> &\n\
                 N' -> b\n\
                 N' -> c"
            )
        );
    }

    #[test]
    fn repeated_rounds_use_fresh_names() {
        let mut g = Grammar::parse("N -> a b c | a b d | a e").unwrap();
        g.left_factoring();
        assert_eq!(
            g.production_set(),
            productions(
                "N -> a b N'\n\
                 N -> a e\n\
                 N' -> c\n\
                 N' -> d"
            )
        );

        g.left_factoring();
        assert_eq!(
            g.production_set(),
            productions(
                "N -> a N''\n\
                 N'' -> b N'\n\
                 N'' -> e\n\
                 N' -> c\n\
                 N' -> d"
            )
        );
    }

    #[test]
    fn single_alternative_is_unchanged() {
        let mut g = Grammar::parse("S -> a S b\nS -> c").unwrap();
        let before = g.production_set();
        g.left_factoring();
        assert_eq!(g.production_set(), before);
    }
}
