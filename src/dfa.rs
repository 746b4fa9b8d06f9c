use std::collections::HashMap;

use crate::error::LearnError;
use crate::symbol::{display_word, Symbol};
use crate::table::ObservationTable;

/// An opaque DFA state name, assigned in first-seen order over S (spec
/// §4.6 "Name assignment").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// (Q, q0, F, δ) — a dense, total transition table over Σ. Transitions are
/// stored as `Vec<Vec<StateId>>` indexed `[state][symbol index]` rather
/// than as a graph of pointers (spec §9: "cyclic reachability... is not a
/// data-structure cycle").
#[derive(Debug, Clone)]
pub struct Dfa<S: Symbol> {
    alphabet: Vec<S>,
    symbol_index: HashMap<S, usize>,
    initial: StateId,
    accepting: Vec<bool>,
    delta: Vec<Vec<StateId>>,
}

impl<S: Symbol> Dfa<S> {
    pub fn new(
        alphabet: Vec<S>,
        initial: StateId,
        accepting: Vec<bool>,
        delta: Vec<Vec<StateId>>,
    ) -> Self {
        let symbol_index = alphabet
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Dfa {
            alphabet,
            symbol_index,
            initial,
            accepting,
            delta,
        }
    }

    pub fn alphabet(&self) -> &[S] {
        &self.alphabet
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn states_size(&self) -> usize {
        self.accepting.len()
    }

    pub fn is_accepting(&self, q: StateId) -> bool {
        self.accepting[q.0]
    }

    pub fn delta(&self, q: StateId, sigma: &S) -> Result<StateId, LearnError> {
        let idx = self.symbol_index.get(sigma).ok_or_else(|| LearnError::UnknownSymbol {
            symbol: sigma.to_string(),
        })?;
        Ok(self.delta[q.0][*idx])
    }

    /// Runs the DFA over a word starting at the initial state, returning
    /// whether the resulting state accepts.
    pub fn run(&self, w: &[S]) -> Result<bool, LearnError> {
        let mut state = self.initial;
        for sigma in w {
            state = self.delta(state, sigma)?;
        }
        Ok(self.is_accepting(state))
    }

    /// Renders the DFA as Graphviz dot, in the style of the teacher's
    /// `to_dot` — a debugging aid, not part of the protocol.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph DFA {\n    rankdir=LR;\n    size=\"8,5\";\n");
        out.push_str("    node [shape = doublecircle]; ");
        for (i, accepting) in self.accepting.iter().enumerate() {
            if *accepting {
                out.push_str(&format!("{} ", StateId(i)));
            }
        }
        out.push_str(";\n    node [shape = circle];\n");
        out.push_str(&format!("    start [shape = point];\n    start -> {}\n", self.initial));

        for (i, row) in self.delta.iter().enumerate() {
            for (sym_idx, target) in row.iter().enumerate() {
                out.push_str(&format!(
                    "    {} -> {} [label=\"{}\"];\n",
                    StateId(i),
                    target,
                    self.alphabet[sym_idx]
                ));
            }
        }
        out.push('}');
        out
    }
}

/// Derives (Q, q0, F, δ) from a closed, consistent table by quotienting
/// rows (spec §4.6). The row bitvector is the equality key; the public
/// state name is just the order in which a distinct bitvector was first
/// seen while scanning S.
pub fn extract<S: Symbol>(table: &ObservationTable<S>) -> Result<Dfa<S>, LearnError> {
    let mut class_of_row: Vec<Vec<bool>> = Vec::new();
    let mut name_of_s: HashMap<Vec<S>, StateId> = HashMap::new();

    for s in table.s_rows() {
        let row = table.row(s)?;
        let id = match class_of_row.iter().position(|r| r == &row) {
            Some(idx) => StateId(idx),
            None => {
                class_of_row.push(row);
                StateId(class_of_row.len() - 1)
            }
        };
        name_of_s.insert(s.clone(), id);
    }

    let epsilon: Vec<S> = Vec::new();
    let initial = *name_of_s.get(&epsilon).ok_or_else(|| {
        LearnError::TableInvariantViolation("ε not found in S when extracting DFA".to_string())
    })?;

    let mut accepting = vec![false; class_of_row.len()];
    for (id, row) in class_of_row.iter().enumerate() {
        // row(s, ε) is the first column by I1 — assert the invariant the
        // teacher's extractor relied on implicitly.
        accepting[id] = *row.first().ok_or_else(|| {
            LearnError::TableInvariantViolation("table has no columns; ε ∉ E".to_string())
        })?;
    }

    let alphabet = table.alphabet().to_vec();
    let mut delta = vec![vec![StateId(0); alphabet.len()]; class_of_row.len()];
    for s in table.s_rows() {
        let from = *name_of_s.get(s).expect("s was just named above");
        for (sym_idx, sigma) in alphabet.iter().enumerate() {
            let successor = crate::symbol::concat(s, std::slice::from_ref(sigma));
            // s·σ is normally a boundary (R) row, not an access (S) row, so
            // it is resolved by its row vector rather than by word identity
            // — matching the teacher's `get_value_as_state` — and closedness
            // guarantees some S-row shares that vector.
            let successor_row = table.row(&successor)?;
            let to = class_of_row
                .iter()
                .position(|r| r == &successor_row)
                .map(StateId)
                .ok_or_else(|| {
                    LearnError::TableInvariantViolation(format!(
                        "'{}' has no S-representative; table is not closed",
                        display_word(&successor)
                    ))
                })?;
            delta[from.0][sym_idx] = to;
        }
    }

    Ok(Dfa::new(alphabet, initial, accepting, delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_even_zeros() -> Dfa<char> {
        // q0 accepting (even #0s, initial); q1 non-accepting.
        Dfa::new(
            vec!['0', '1'],
            StateId(0),
            vec![true, false],
            vec![vec![StateId(1), StateId(0)], vec![StateId(0), StateId(1)]],
        )
    }

    #[test]
    fn run_matches_language() {
        let dfa = build_even_zeros();
        assert!(dfa.run(&[]).unwrap());
        assert!(!dfa.run(&['0']).unwrap());
        assert!(dfa.run(&['0', '0']).unwrap());
        assert!(dfa.run(&['1', '1', '1']).unwrap());
    }

    #[test]
    fn delta_rejects_unknown_symbol() {
        let dfa = build_even_zeros();
        let err = dfa.delta(StateId(0), &'x').unwrap_err();
        assert!(matches!(err, LearnError::UnknownSymbol { .. }));
    }
}
