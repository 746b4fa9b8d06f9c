use std::collections::{HashSet, VecDeque};
use std::io::{self, BufRead, Write};

use crate::dfa::Dfa;
use crate::error::LearnError;
use crate::symbol::{concat, Symbol, Word};

pub enum EquivalenceResult<S: Symbol> {
    Ok,
    Counterexample(Word<S>),
}

/// `check(hypothesis) -> Ok | Counterexample(w)` (spec §4.7 / §6).
pub trait EquivalenceOracle<S: Symbol> {
    fn check(&mut self, hypothesis: &Dfa<S>) -> Result<EquivalenceResult<S>, LearnError>;
}

/// Compares the hypothesis against a known reference DFA by breadth-first
/// enumeration of words up to `target.states_size() + 1` symbols —
/// sufficient to expose any behavioral difference between two DFAs with
/// at most that many states. Grounded verbatim on the teacher's
/// `equivalence_query` (bounded BFS via `VecDeque`).
pub struct ReferenceOracle<S: Symbol> {
    target: Dfa<S>,
}

impl<S: Symbol> ReferenceOracle<S> {
    pub fn new(target: Dfa<S>) -> Self {
        ReferenceOracle { target }
    }
}

impl<S: Symbol> EquivalenceOracle<S> for ReferenceOracle<S> {
    fn check(&mut self, hypothesis: &Dfa<S>) -> Result<EquivalenceResult<S>, LearnError> {
        let max_length = self.target.states_size() + 1;
        let mut queue: VecDeque<Word<S>> = VecDeque::new();
        queue.push_back(Vec::new());

        while let Some(word) = queue.pop_front() {
            if self.target.run(&word)? != hypothesis.run(&word)? {
                return Ok(EquivalenceResult::Counterexample(word));
            }
            if word.len() < max_length {
                for sigma in self.target.alphabet() {
                    queue.push_back(concat(&word, std::slice::from_ref(sigma)));
                }
            }
        }
        Ok(EquivalenceResult::Ok)
    }
}

/// One-sided: runs the hypothesis over every string in a finite sample and
/// returns the first one it rejects. Sufficient when the sample equals
/// L restricted to a finite set (spec §4.7 "Log-backed").
pub struct LogSampleEquivalenceOracle<S: Symbol> {
    sample: Vec<Word<S>>,
}

impl<S: Symbol> LogSampleEquivalenceOracle<S> {
    pub fn new(sample: impl IntoIterator<Item = Word<S>>) -> Self {
        LogSampleEquivalenceOracle {
            sample: sample.into_iter().collect(),
        }
    }
}

impl<S: Symbol> EquivalenceOracle<S> for LogSampleEquivalenceOracle<S> {
    fn check(&mut self, hypothesis: &Dfa<S>) -> Result<EquivalenceResult<S>, LearnError> {
        for w in &self.sample {
            if !hypothesis.run(w)? {
                return Ok(EquivalenceResult::Counterexample(w.clone()));
            }
        }
        Ok(EquivalenceResult::Ok)
    }
}

/// Shows the hypothesis as a dot diagram and asks a human whether it's
/// correct; on 'n' reads a counterexample string. Grounded on
/// `correct_automaton` / `deal_counterexample` in `lstart.py`.
pub struct InteractiveEquivalenceOracle<R, W> {
    reader: R,
    writer: W,
}

impl InteractiveEquivalenceOracle<io::BufReader<io::Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        InteractiveEquivalenceOracle {
            reader: io::BufReader::new(io::stdin()),
            writer: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write, S: Symbol> EquivalenceOracle<S> for InteractiveEquivalenceOracle<R, W> {
    fn check(&mut self, hypothesis: &Dfa<S>) -> Result<EquivalenceResult<S>, LearnError> {
        writeln!(self.writer, "{}", hypothesis.to_dot())?;
        write!(self.writer, "Is this automaton correct? y/n ")?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        if line.trim_start().chars().next().map(|c| c.eq_ignore_ascii_case(&'y')).unwrap_or(false) {
            return Ok(EquivalenceResult::Ok);
        }

        write!(self.writer, "Give a counterexample: ")?;
        self.writer.flush()?;
        let mut ce = String::new();
        self.reader.read_line(&mut ce)?;
        let word = parse_counterexample(ce.trim(), hypothesis.alphabet())?;
        Ok(EquivalenceResult::Counterexample(word))
    }
}

fn parse_counterexample<S: Symbol>(text: &str, alphabet: &[S]) -> Result<Word<S>, LearnError> {
    let known: HashSet<String> = alphabet.iter().map(|s| s.to_string()).collect();
    let mut word = Vec::new();
    for tok in text.split_whitespace() {
        if tok == "\\epsilon" || tok == "ε" {
            continue;
        }
        if !known.contains(tok) {
            return Err(LearnError::InvalidCounterexample {
                word: text.to_string(),
                symbol: tok.to_string(),
            });
        }
        let idx = alphabet.iter().position(|s| s.to_string() == tok).expect("just checked membership");
        word.push(alphabet[idx].clone());
    }
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::StateId;

    fn sink(accepting: bool) -> Dfa<char> {
        Dfa::new(vec!['a', 'b'], StateId(0), vec![accepting], vec![vec![StateId(0), StateId(0)]])
    }

    #[test]
    fn reference_oracle_detects_mismatch() {
        let mut oracle = ReferenceOracle::new(sink(true));
        match oracle.check(&sink(false)).unwrap() {
            EquivalenceResult::Counterexample(w) => assert!(w.is_empty()),
            EquivalenceResult::Ok => panic!("expected a counterexample"),
        }
    }

    #[test]
    fn reference_oracle_agrees_on_identical_dfas() {
        let mut oracle = ReferenceOracle::new(sink(true));
        assert!(matches!(oracle.check(&sink(true)).unwrap(), EquivalenceResult::Ok));
    }

    #[test]
    fn log_sample_oracle_flags_first_rejected_member() {
        let sample = vec![vec!['a'], vec!['a', 'a']];
        let mut oracle = LogSampleEquivalenceOracle::new(sample);
        match oracle.check(&sink(false)).unwrap() {
            EquivalenceResult::Counterexample(w) => assert_eq!(w, vec!['a']),
            EquivalenceResult::Ok => panic!("expected a counterexample"),
        }
    }
}
