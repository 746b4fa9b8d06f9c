/// Error kinds from spec §7. `OracleContract` is deliberately not
/// fail-fast: the driver logs it and continues (re-adding prefixes already
/// present is a no-op, so the table cannot be corrupted by it). The other
/// three indicate either a malformed counterexample, a hypothesis asked to
/// read an unknown symbol, or an internal bug, and are propagated to the
/// caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum LearnError {
    #[error("equivalence oracle returned a counterexample '{word}' the hypothesis already agrees with L on; treating as no-op")]
    OracleContract { word: String },

    #[error("counterexample '{word}' contains symbol '{symbol}' not in the alphabet")]
    InvalidCounterexample { word: String, symbol: String },

    #[error("hypothesis was asked to read symbol '{symbol}', which is not in the alphabet")]
    UnknownSymbol { symbol: String },

    #[error("table invariant violation: {0}")]
    TableInvariantViolation(String),

    #[error("I/O error reading oracle data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed log-file CSV: {0}")]
    Csv(#[from] csv::Error),
}
