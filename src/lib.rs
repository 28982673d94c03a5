extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub mod recognizer;
pub use grammar::{ll1_parsing_table::ParseTable, Grammar, GrammarError};
pub use recognizer::Recognizer;

fn error_to_json(e: GrammarError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(mut g) => {
            g.convert_grammar();
            g.to_first_follow_output_vec().to_json()
        }
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(mut g) => {
            g.convert_grammar();
            let table = g.build_table();
            serde_json::json!({
                "ll1": table.is_ll1(),
                "productions": g.to_production_output_vec(),
                "table": table,
            })
            .to_string()
        }
        Err(e) => error_to_json(e),
    }
}

/// Converts `grammar` and runs the whitespace-separated `tokens` through the
/// resulting table. Returns false for a malformed grammar.
#[wasm_bindgen]
pub fn recognize(grammar: &str, tokens: &str) -> bool {
    match crate::Grammar::parse(grammar) {
        Ok(mut g) => {
            g.convert_grammar();
            Recognizer::new(g.start_symbol(), g.build_table()).run(tokens.split_whitespace())
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod parse_tests {
    use crate::grammar::EPSILON;
    use crate::GrammarError;

    fn body(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn simple_parse() {
        let g = crate::Grammar::parse("S -> a").unwrap();

        assert_eq!(g.start_symbol(), "S");
        assert!(g.is_non_terminal("S"));
        assert!(g.is_terminal("a"));
        assert_eq!(g.productions("S").iter().next().unwrap(), &body("a"));
    }

    #[test]
    fn simple_parse_with_space() {
        let g = crate::Grammar::parse("  S -> a ").unwrap();

        assert_eq!(g.start_symbol(), "S");
        assert_eq!(g.productions("S").len(), 1);
        assert!(g.productions("S").contains(&body("a")));
    }

    #[test]
    fn simple_parse_with_space_and_newline() {
        let g = crate::Grammar::parse("  S -> a \n | b c").unwrap();

        assert!(g.is_terminal("a"));
        assert!(g.is_terminal("b"));
        assert!(g.is_terminal("c"));
        assert_eq!(g.productions("S").len(), 2);
        assert!(g.productions("S").contains(&body("a")));
        assert!(g.productions("S").contains(&body("b c")));
    }

    #[test]
    fn one_production_per_line() {
        let g = crate::Grammar::parse(
            "P -> K V C\n\
             K -> c K\n\
             K -> &\n\
             V -> v V\n\
             V -> F\n\
             F -> f P ; F\n\
             F -> &\n\
             C -> b V C e\n\
             C -> com ; C\n\
             C -> &",
        )
        .unwrap();

        assert_eq!(g.start_symbol(), "P");
        assert_eq!(g.non_terminal_names(), body("C F K P V"));
        assert_eq!(
            g.terminal_iter().cloned().collect::<Vec<_>>(),
            body("; b c com e f v")
        );
        assert_eq!(g.production_set().len(), 10);
        assert!(g.productions("K").contains(&body(EPSILON)));
    }

    #[test]
    fn duplicates_collapse() {
        let g = crate::Grammar::parse("S -> a\nS -> a | a").unwrap();
        assert_eq!(g.productions("S").len(), 1);
    }

    #[test]
    fn epsilon_inside_body_is_dropped() {
        let g = crate::Grammar::parse("S -> & a &\nS -> & &").unwrap();
        assert!(g.productions("S").contains(&body("a")));
        assert!(g.productions("S").contains(&body("&")));
        assert!(!g.is_terminal(EPSILON));
    }

    #[test]
    fn empty_parse() {
        assert_eq!(
            crate::Grammar::parse("  \n  ").unwrap_err(),
            GrammarError::Empty
        );
    }

    #[test]
    fn two_rightarrows_parse() {
        assert_eq!(
            crate::Grammar::parse("S -> a -> b").unwrap_err(),
            GrammarError::TooManyArrows(1)
        );
    }

    #[test]
    fn no_left_parse() {
        assert_eq!(
            crate::Grammar::parse("S -> a\n-> a").unwrap_err(),
            GrammarError::EmptyLeft(2)
        );
    }

    #[test]
    fn no_previous_left_parse() {
        assert_eq!(
            crate::Grammar::parse("| a b\n S -> a").unwrap_err(),
            GrammarError::NoPreviousLeft(1)
        );
    }

    #[test]
    fn left_contain_space() {
        assert_eq!(
            crate::Grammar::parse("S a S -> x").unwrap_err(),
            GrammarError::LeftContainsWhitespace(1)
        );
    }

    #[test]
    fn missing_arrow() {
        assert_eq!(
            crate::Grammar::parse("S -> a\nA b c").unwrap_err(),
            GrammarError::MissingArrow(2)
        );
    }

    #[test]
    fn empty_alternative() {
        assert_eq!(
            crate::Grammar::parse("S -> a |").unwrap_err(),
            GrammarError::EmptyAlternative(1)
        );
        assert_eq!(
            crate::Grammar::parse("S ->").unwrap_err(),
            GrammarError::EmptyAlternative(1)
        );
    }

    #[test]
    fn reserved_symbols() {
        assert_eq!(
            crate::Grammar::parse("S -> a $").unwrap_err(),
            GrammarError::ReservedSymbol(1, "$".to_string())
        );
        assert_eq!(
            crate::Grammar::parse("& -> a").unwrap_err(),
            GrammarError::ReservedSymbol(1, "&".to_string())
        );
    }
}
