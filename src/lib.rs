//! An implementation of Angluin's L* algorithm: infers a minimal DFA
//! recognising an unknown regular language by interacting with a
//! membership oracle and an equivalence oracle (the two external
//! collaborators defined in [`oracle`]). The observation table engine —
//! closedness/consistency repair, DFA extraction, counterexample
//! handling, and the driver loop tying them together — is the crate's
//! sole concern; rendering and persistence are debugging aids only.

pub mod counterexample;
pub mod dfa;
pub mod error;
pub mod learner;
pub mod oracle;
pub mod symbol;
pub mod table;

pub use dfa::{Dfa, StateId};
pub use error::LearnError;
pub use learner::{learn, learn_with_trace};
pub use symbol::{Symbol, Word};
pub use table::ObservationTable;
