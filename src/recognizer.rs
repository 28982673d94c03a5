use crate::grammar::{ll1_parsing_table::ParseTable, END_MARK, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Accept,
    Reject,
}

/// Table-driven pushdown recognizer for an LL(1) table.
#[derive(Debug, Clone)]
pub struct Recognizer {
    start_symbol: String,
    table: ParseTable,
}

impl Recognizer {
    pub fn new<S: Into<String>>(start_symbol: S, table: ParseTable) -> Self {
        Self {
            start_symbol: start_symbol.into(),
            table,
        }
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Whether `tokens` is a sentence of the table's grammar.
    ///
    /// Every call starts from the stack `[$, start]`. The end marker is
    /// appended to the input here and must not appear among `tokens`.
    pub fn run<I, S>(&self, tokens: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut input: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            if token == END_MARK {
                return false;
            }
            input.push(token.to_string());
        }
        input.push(END_MARK.to_string());

        let mut run = Run::new(&self.start_symbol);
        let mut state = State::Running;
        while state == State::Running {
            state = run.step(&self.table, &input);
        }
        state == State::Accept
    }
}

struct Run {
    stack: Vec<String>,
    cursor: usize,
    // (non-terminal, stack index) expanded since the last match
    expanded: Vec<(String, usize)>,
}

impl Run {
    fn new(start_symbol: &str) -> Self {
        Self {
            stack: vec![END_MARK.to_string(), start_symbol.to_string()],
            cursor: 0,
            expanded: Vec::new(),
        }
    }

    fn step(&mut self, table: &ParseTable, input: &[String]) -> State {
        let (top, symbol) = match (self.stack.last(), input.get(self.cursor)) {
            (Some(top), Some(symbol)) => (top.clone(), symbol.as_str()),
            _ => return State::Reject,
        };

        if top == END_MARK && symbol == END_MARK {
            return State::Accept;
        }
        if top == symbol {
            self.stack.pop();
            self.cursor += 1;
            self.expanded.clear();
            return State::Running;
        }
        if !table.is_non_terminal(&top) {
            return State::Reject;
        }

        let production = match table.get(&top, symbol) {
            Some(production) => production,
            None => return State::Reject,
        };

        // expanding the same non-terminal again on the same lookahead, with
        // everything below its first expansion untouched, never terminates
        let depth = self.stack.len() - 1;
        if self
            .expanded
            .iter()
            .any(|(nt, d)| *nt == top && *d <= depth)
        {
            return State::Reject;
        }
        self.expanded.push((top, depth));

        self.stack.pop();
        self.expanded.retain(|(_, d)| *d <= self.stack.len());
        self.stack.extend(
            production
                .iter()
                .rev()
                .filter(|s| s.as_str() != EPSILON)
                .cloned(),
        );
        State::Running
    }
}
