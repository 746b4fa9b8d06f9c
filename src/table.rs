use std::collections::{HashMap, HashSet};

pub mod check;

use crate::error::LearnError;
use crate::oracle::membership::MembershipOracle;
use crate::symbol::{concat, Symbol, Word};

/// The observation table T = (S, R, E, f) of spec §3.
///
/// S and R are kept as insertion-ordered vectors (so extraction and the
/// tie-breaking rules in spec §4.4 are deterministic) backed by hash sets
/// for O(1) membership checks — the "typed table instead of dataframe"
/// redesign flag in spec §9.
pub struct ObservationTable<S: Symbol> {
    alphabet: Vec<S>,
    s_rows: Vec<Word<S>>,
    s_index: HashSet<Word<S>>,
    r_rows: Vec<Word<S>>,
    r_index: HashSet<Word<S>>,
    columns: Vec<Word<S>>,
    column_index: HashSet<Word<S>>,
    cells: HashMap<(Word<S>, Word<S>), bool>,
}

impl<S: Symbol> ObservationTable<S> {
    /// S ← {ε}, E ← {ε}, R ← {σ : σ ∈ Σ}. Cells are left unfilled; call
    /// [`ObservationTable::init`] to fill them via the membership oracle.
    pub fn new(alphabet: &[S]) -> Self {
        let epsilon: Word<S> = Vec::new();
        let mut r_rows = Vec::with_capacity(alphabet.len());
        let mut r_index = HashSet::with_capacity(alphabet.len());
        for sigma in alphabet {
            let w = vec![sigma.clone()];
            r_index.insert(w.clone());
            r_rows.push(w);
        }

        let mut s_index = HashSet::new();
        s_index.insert(epsilon.clone());

        let mut column_index = HashSet::new();
        column_index.insert(epsilon.clone());

        ObservationTable {
            alphabet: alphabet.to_vec(),
            s_rows: vec![epsilon],
            s_index,
            r_rows,
            r_index,
            columns: vec![Vec::new()],
            column_index,
            cells: HashMap::new(),
        }
    }

    pub fn alphabet(&self) -> &[S] {
        &self.alphabet
    }

    pub fn s_rows(&self) -> &[Word<S>] {
        &self.s_rows
    }

    pub fn r_rows(&self) -> &[Word<S>] {
        &self.r_rows
    }

    pub fn columns(&self) -> &[Word<S>] {
        &self.columns
    }

    /// Fills every currently-unfilled cell of (S ∪ R) × E. Called after
    /// `init`, `add_column`, `promote`, and `add_prefix` to restore I4.
    pub fn init(&mut self, oracle: &mut dyn MembershipOracle<S>) -> Result<(), LearnError> {
        self.fill_missing(oracle)
    }

    fn fill_missing(&mut self, oracle: &mut dyn MembershipOracle<S>) -> Result<(), LearnError> {
        let mut to_fill = Vec::new();
        for row in self.s_rows.iter().chain(self.r_rows.iter()) {
            for column in &self.columns {
                let key = (row.clone(), column.clone());
                if !self.cells.contains_key(&key) {
                    to_fill.push(key);
                }
            }
        }
        for (row, column) in to_fill {
            let answer = oracle.ask(&concat(&row, &column))?;
            self.cells.insert((row, column), answer);
        }
        Ok(())
    }

    pub fn has_row(&self, w: &[S]) -> bool {
        self.s_index.contains(w) || self.r_index.contains(w)
    }

    /// Lookup; fails with `TableInvariantViolation` if `w` has no row or a
    /// cell is missing — both indicate a bug in the engine, not user error.
    pub fn row(&self, w: &[S]) -> Result<Vec<bool>, LearnError> {
        if !self.has_row(w) {
            return Err(LearnError::TableInvariantViolation(format!(
                "row requested for '{}' which is not in S ∪ R",
                crate::symbol::display_word(w)
            )));
        }
        let mut v = Vec::with_capacity(self.columns.len());
        for e in &self.columns {
            let value = self.cells.get(&(w.to_vec(), e.clone())).ok_or_else(|| {
                LearnError::TableInvariantViolation(format!(
                    "cell ('{}', '{}') undefined",
                    crate::symbol::display_word(w),
                    crate::symbol::display_word(e)
                ))
            })?;
            v.push(*value);
        }
        Ok(v)
    }

    /// Appends `e` to E (no-op if already present) and fills the new column
    /// for every row in S ∪ R.
    pub fn add_column(&mut self, e: Word<S>, oracle: &mut dyn MembershipOracle<S>) -> Result<(), LearnError> {
        if self.column_index.insert(e.clone()) {
            self.columns.push(e);
            self.fill_missing(oracle)?;
        }
        Ok(())
    }

    /// Precondition: `w ∈ R`. Moves `w` into S; for every σ such that
    /// `w·σ ∉ S ∪ R`, adds `w·σ` to R and fills its row.
    pub fn promote(&mut self, w: &[S], oracle: &mut dyn MembershipOracle<S>) -> Result<(), LearnError> {
        if self.s_index.contains(w) {
            return Ok(()); // idempotent: already promoted
        }
        if !self.r_index.remove(w) {
            return Err(LearnError::TableInvariantViolation(format!(
                "promote called on '{}' which is not in R",
                crate::symbol::display_word(w)
            )));
        }
        self.r_rows.retain(|r| r != w);
        self.s_index.insert(w.to_vec());
        self.s_rows.push(w.to_vec());

        for sigma in self.alphabet.clone() {
            let successor = concat(w, std::slice::from_ref(&sigma));
            if !self.s_index.contains(&successor) && self.r_index.insert(successor.clone()) {
                self.r_rows.push(successor);
            }
        }
        self.fill_missing(oracle)
    }

    /// Ensures `w ∈ S ∪ R`: if `w` is already present as a boundary row it
    /// is promoted; if absent entirely it is inserted directly into S (used
    /// by the counterexample processor for internal, non-leaf prefixes).
    pub fn add_prefix(&mut self, w: Word<S>, oracle: &mut dyn MembershipOracle<S>) -> Result<(), LearnError> {
        if self.s_index.contains(&w) {
            return Ok(());
        }
        if self.r_index.contains(&w) {
            return self.promote(&w, oracle);
        }

        self.s_index.insert(w.clone());
        self.s_rows.push(w.clone());

        for sigma in self.alphabet.clone() {
            let successor = concat(&w, std::slice::from_ref(&sigma));
            if !self.s_index.contains(&successor) && self.r_index.insert(successor.clone()) {
                self.r_rows.push(successor);
            }
        }
        self.fill_missing(oracle)
    }

    /// Serialises the table as the debugging CSV of spec §6: rows indexed
    /// by (UPPER/LOWER, state-string), columns the experiments. Grounded
    /// on `lstart_from_logs.py`'s `self.table.to_csv(f"table_{iteration}.csv")`.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), LearnError> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["type_table".to_string(), "state".to_string()];
        header.extend(self.columns.iter().map(|e| crate::symbol::display_word(e)));
        wtr.write_record(&header)?;

        for (label, rows) in [("UPPER", &self.s_rows), ("LOWER", &self.r_rows)] {
            for w in rows {
                let mut record = vec![label.to_string(), crate::symbol::display_word(w)];
                let row = self.row(w)?;
                record.extend(row.iter().map(|bit| if *bit { "1" } else { "0" }.to_string()));
                wtr.write_record(&record)?;
            }
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), LearnError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::membership::CachingOracle;

    struct EndsInA;
    impl MembershipOracle<char> for EndsInA {
        fn ask(&mut self, w: &[char]) -> Result<bool, LearnError> {
            Ok(w.last() == Some(&'a'))
        }
    }

    #[test]
    fn init_establishes_p1() {
        let alphabet = ['a', 'b'];
        let mut table = ObservationTable::new(&alphabet);
        let mut oracle = CachingOracle::new(EndsInA);
        table.init(&mut oracle).unwrap();

        assert_eq!(table.s_rows(), &[Vec::<char>::new()]);
        assert_eq!(table.r_rows().len(), 2);
        assert_eq!(table.columns(), &[Vec::<char>::new()]);
        for row in table.s_rows().iter().chain(table.r_rows().iter()) {
            assert!(table.row(row).is_ok());
        }
    }

    #[test]
    fn promote_moves_row_and_extends_boundary() {
        let alphabet = ['a', 'b'];
        let mut table = ObservationTable::new(&alphabet);
        let mut oracle = CachingOracle::new(EndsInA);
        table.init(&mut oracle).unwrap();

        table.promote(&['a'], &mut oracle).unwrap();
        assert!(table.s_rows().contains(&vec!['a']));
        assert!(!table.r_rows().contains(&vec!['a']));
        assert!(table.r_rows().contains(&vec!['a', 'a']));
        assert!(table.r_rows().contains(&vec!['a', 'b']));
    }

    #[test]
    fn add_column_grows_e_and_fills_cells() {
        let alphabet = ['a', 'b'];
        let mut table = ObservationTable::new(&alphabet);
        let mut oracle = CachingOracle::new(EndsInA);
        table.init(&mut oracle).unwrap();

        table.add_column(vec!['a'], &mut oracle).unwrap();
        assert_eq!(table.columns().len(), 2);
        for row in table.s_rows().iter().chain(table.r_rows().iter()) {
            assert_eq!(table.row(row).unwrap().len(), 2);
        }
    }

    #[test]
    fn mutators_are_idempotent() {
        let alphabet = ['a', 'b'];
        let mut table = ObservationTable::new(&alphabet);
        let mut oracle = CachingOracle::new(EndsInA);
        table.init(&mut oracle).unwrap();

        table.add_column(vec!['a'], &mut oracle).unwrap();
        table.add_column(vec!['a'], &mut oracle).unwrap();
        assert_eq!(table.columns().len(), 2);

        table.promote(&['a'], &mut oracle).unwrap();
        let s_len = table.s_rows().len();
        table.add_prefix(vec!['a'], &mut oracle).unwrap();
        assert_eq!(table.s_rows().len(), s_len);
    }

    #[test]
    fn write_csv_emits_a_row_per_upper_and_lower_string() {
        let alphabet = ['a', 'b'];
        let mut table = ObservationTable::new(&alphabet);
        let mut oracle = CachingOracle::new(EndsInA);
        table.init(&mut oracle).unwrap();

        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "type_table,state,ε");
        assert_eq!(lines.len(), 1 + table.s_rows().len() + table.r_rows().len());
        assert!(lines.iter().any(|l| l.starts_with("UPPER,ε,")));
        assert!(lines.iter().any(|l| l.starts_with("LOWER,a,")));
    }
}
