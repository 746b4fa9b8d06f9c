use std::collections::HashMap;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Deserialize;

use crate::error::LearnError;
use crate::symbol::Word;

/// `ask(w) -> {0,1}`, deterministic and total per session (spec §4.1 /
/// §6). Implementations may block on I/O; the table engine never calls
/// this trait directly — always through a [`CachingOracle`].
pub trait MembershipOracle<S> {
    fn ask(&mut self, w: &[S]) -> Result<bool, LearnError>;
}

/// Memoises oracle answers keyed on the exact string, including ε. Cache
/// hits short-circuit before any I/O — mandatory per spec §4.1. Grounded
/// on `self.cache_accepted_strings` in both `lstart.py` variants.
pub struct CachingOracle<S, O> {
    inner: O,
    cache: HashMap<Word<S>, bool>,
}

impl<S: Clone + Eq + std::hash::Hash, O> CachingOracle<S, O> {
    pub fn new(inner: O) -> Self {
        CachingOracle {
            inner,
            cache: HashMap::new(),
        }
    }
}

impl<S, O> MembershipOracle<S> for CachingOracle<S, O>
where
    S: Clone + Eq + std::hash::Hash,
    O: MembershipOracle<S>,
{
    fn ask(&mut self, w: &[S]) -> Result<bool, LearnError> {
        if let Some(answer) = self.cache.get(w) {
            return Ok(*answer);
        }
        let answer = self.inner.ask(w)?;
        self.cache.insert(w.to_vec(), answer);
        Ok(answer)
    }
}

/// Prompts a human on stdin/stdout. First byte `'y'`/`'Y'` ↦ true,
/// anything else ↦ false. Grounded on `ask_if_string_belongs_language` in
/// `lstart.py` (`input(...)`, `response_in[0] == 'y'`).
pub struct InteractiveOracle<R, W> {
    reader: R,
    writer: W,
}

impl InteractiveOracle<io::BufReader<io::Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        InteractiveOracle {
            reader: io::BufReader::new(io::stdin()),
            writer: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write, S: crate::symbol::Symbol> MembershipOracle<S> for InteractiveOracle<R, W> {
    fn ask(&mut self, w: &[S]) -> Result<bool, LearnError> {
        write!(self.writer, "Does the language accept '{}'? y/n ", crate::symbol::display_word(w))?;
        self.writer.flush()?;
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        let accepted = line
            .trim_start()
            .chars()
            .next()
            .map(|c| c.eq_ignore_ascii_case(&'y'))
            .unwrap_or(false);
        Ok(accepted)
    }
}

/// Answers from a finite sample L_sample; unlisted strings answer false.
/// Grounded on `lstart_from_logs.py`'s `int(str_to_ask in self.language)`.
pub struct LogSampleOracle<S> {
    sample: HashSet<Word<S>>,
}

impl<S: Clone + Eq + std::hash::Hash> LogSampleOracle<S> {
    pub fn new(sample: HashSet<Word<S>>) -> Self {
        LogSampleOracle { sample }
    }

    pub fn into_sample(self) -> HashSet<Word<S>> {
        self.sample
    }
}

impl LogSampleOracle<String> {
    /// The alphabet implied by the sample: every distinct token that
    /// appears in it, sorted. Grounded on `get_alphabet_from_language` in
    /// `lstart_from_logs.py`.
    pub fn alphabet(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .sample
            .iter()
            .flatten()
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        symbols.sort();
        symbols
    }
}

impl<S: Clone + Eq + std::hash::Hash> MembershipOracle<S> for LogSampleOracle<S> {
    fn ask(&mut self, w: &[S]) -> Result<bool, LearnError> {
        Ok(self.sample.contains(w))
    }
}

#[derive(Debug, Deserialize)]
struct LogRow {
    output: String,
}

/// Loads the log-file format of spec §6: a CSV with an `output` column,
/// each cell a space-separated token sequence, the literal `\epsilon`
/// denoting ε. Duplicates are deduplicated on load (via the `HashSet`
/// backing `LogSampleOracle`). Grounded on `lstart_from_logs.py`
/// (`pd.read_csv`, `drop_duplicates`, `replace('\\epsilon', EPSILON)`).
pub fn load_token_sample(path: impl AsRef<Path>) -> Result<LogSampleOracle<String>, LearnError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut sample = HashSet::new();
    for result in reader.deserialize() {
        let row: LogRow = result?;
        sample.insert(parse_token_word(&row.output));
    }
    Ok(LogSampleOracle::new(sample))
}

fn parse_token_word(cell: &str) -> Word<String> {
    cell.split_whitespace()
        .filter(|tok| *tok != "\\epsilon")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingOracle {
        calls: usize,
    }
    impl MembershipOracle<char> for CountingOracle {
        fn ask(&mut self, w: &[char]) -> Result<bool, LearnError> {
            self.calls += 1;
            Ok(w.len() % 2 == 0)
        }
    }

    #[test]
    fn cache_short_circuits_before_io() {
        let mut oracle = CachingOracle::new(CountingOracle { calls: 0 });
        assert_eq!(oracle.ask(&['a', 'b']).unwrap(), true);
        assert_eq!(oracle.ask(&['a', 'b']).unwrap(), true);
        assert_eq!(oracle.inner.calls, 1);
    }

    #[test]
    fn log_sample_defaults_to_false() {
        let mut sample = HashSet::new();
        sample.insert(vec!["a".to_string()]);
        let mut oracle = LogSampleOracle::new(sample);
        assert!(oracle.ask(&["a".to_string()]).unwrap());
        assert!(!oracle.ask(&["b".to_string()]).unwrap());
    }

    #[test]
    fn parse_token_word_treats_epsilon_as_empty() {
        assert_eq!(parse_token_word("\\epsilon"), Vec::<String>::new());
        assert_eq!(parse_token_word("0 1 1"), vec!["0", "1", "1"]);
    }
}
