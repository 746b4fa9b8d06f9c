use tracing::warn;

use crate::error::LearnError;
use crate::oracle::membership::MembershipOracle;
use crate::symbol::{display_word, Symbol, Word};
use crate::table::ObservationTable;

/// For every non-empty prefix p_i of the counterexample, in order:
/// promote it if it's a boundary row, insert it into S if it's absent
/// entirely, or do nothing if it's already an access string. This is the
/// canonical Angluin policy (spec §4.8 / §9) — the only one of the
/// source's several variants implementations should follow.
///
/// Returns `true` if the table actually grew (new S row or, via the
/// driver's subsequent consistency pass, a new column). If it returns
/// `false` the oracle supplied a counterexample the hypothesis already
/// agrees with — an `OracleContract` violation per spec §7, which is
/// logged and treated as a no-op rather than propagated as an error.
pub fn process<S: Symbol>(
    table: &mut ObservationTable<S>,
    counterexample: &[S],
    oracle: &mut dyn MembershipOracle<S>,
) -> Result<bool, LearnError> {
    for sigma in counterexample {
        if !table.alphabet().contains(sigma) {
            return Err(LearnError::InvalidCounterexample {
                word: display_word(counterexample),
                symbol: sigma.to_string(),
            });
        }
    }

    let mut grew = false;
    let mut prefix: Word<S> = Vec::with_capacity(counterexample.len());
    for sigma in counterexample {
        prefix.push(sigma.clone());
        if table.has_row(&prefix) {
            // still promotes boundary rows into S; a no-op if already in S
            let was_in_s = table_contains_in_s(table, &prefix);
            if !was_in_s {
                table.promote(&prefix, oracle)?;
                grew = true;
            }
        } else {
            table.add_prefix(prefix.clone(), oracle)?;
            grew = true;
        }
    }

    if !grew {
        warn!(
            counterexample = %display_word(counterexample),
            "equivalence oracle returned a counterexample with no new prefixes; \
             treating as OracleContract no-op"
        );
    }
    Ok(grew)
}

fn table_contains_in_s<S: Symbol>(table: &ObservationTable<S>, w: &[S]) -> bool {
    table.s_rows().iter().any(|s| s == w)
}
