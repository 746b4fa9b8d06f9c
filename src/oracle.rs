pub mod equivalence;
pub mod membership;

pub use equivalence::{EquivalenceOracle, EquivalenceResult};
pub use membership::MembershipOracle;
