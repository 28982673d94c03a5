pub mod eliminate_left_recursion;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod left_factoring;
pub mod ll1_parsing_table;
pub mod parse;
pub mod pretty_print;
pub use error::GrammarError;
pub use grammar::Grammar;

pub const EPSILON: &str = "&";
pub const END_MARK: &str = "$";
