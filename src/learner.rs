use std::path::Path;

use tracing::{debug, info};

use crate::counterexample;
use crate::dfa::{self, Dfa};
use crate::error::LearnError;
use crate::oracle::{EquivalenceOracle, EquivalenceResult, MembershipOracle};
use crate::symbol::{display_word, Symbol};
use crate::table::check::{find_closedness_witness, find_consistency_violation};
use crate::table::ObservationTable;

/// Runs the fixed-point closure of spec §4.5 to a stable table, then
/// extracts the candidate hypothesis.
fn close_and_extract<S: Symbol>(
    table: &mut ObservationTable<S>,
    oracle: &mut dyn MembershipOracle<S>,
) -> Result<Dfa<S>, LearnError> {
    loop {
        let mut repaired_anything = false;

        while let Some(new_column) = find_consistency_violation(table)? {
            debug!(column = %display_word(&new_column), "repairing consistency");
            table.add_column(new_column, oracle)?;
            repaired_anything = true;
        }

        while let Some(witness) = find_closedness_witness(table)? {
            debug!(row = %display_word(&witness), "repairing closedness");
            table.promote(&witness, oracle)?;
            repaired_anything = true;
        }

        if !repaired_anything {
            break;
        }
    }
    dfa::extract(table)
}

/// The learner driver of spec §4.9: builds the observation table, repairs
/// it to closed-and-consistent, asks the equivalence oracle, and either
/// returns the hypothesis or processes a counterexample and repeats.
pub fn learn<S: Symbol>(
    alphabet: &[S],
    membership: &mut dyn MembershipOracle<S>,
    equivalence: &mut dyn EquivalenceOracle<S>,
) -> Result<(Dfa<S>, ObservationTable<S>), LearnError> {
    learn_with_trace(alphabet, membership, equivalence, None)
}

/// Same as [`learn`], but when `trace_dir` is set, dumps the table as
/// `table_<iteration>.csv` at the start of every outer-loop iteration —
/// the debugging artefact of spec §6, grounded on
/// `lstart_from_logs.py::run`'s `self.table.to_csv(f"table_{iteration}.csv")`.
pub fn learn_with_trace<S: Symbol>(
    alphabet: &[S],
    membership: &mut dyn MembershipOracle<S>,
    equivalence: &mut dyn EquivalenceOracle<S>,
    trace_dir: Option<&Path>,
) -> Result<(Dfa<S>, ObservationTable<S>), LearnError> {
    let mut table = ObservationTable::new(alphabet);
    table.init(membership)?;

    let mut iteration = 0usize;
    loop {
        if let Some(dir) = trace_dir {
            table.write_csv_file(dir.join(format!("table_{iteration}.csv")))?;
        }
        iteration += 1;

        let hypothesis = close_and_extract(&mut table, membership)?;
        info!(states = hypothesis.states_size(), "hypothesis built, querying equivalence oracle");

        match equivalence.check(&hypothesis)? {
            EquivalenceResult::Ok => return Ok((hypothesis, table)),
            EquivalenceResult::Counterexample(ce) => {
                info!(counterexample = %display_word(&ce), "counterexample received");
                counterexample::process(&mut table, &ce, membership)?;
            }
        }
    }
}
