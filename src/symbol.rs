use std::fmt;
use std::hash::Hash;

/// A symbol from a finite alphabet Σ. Blanket-implemented for any type cheap
/// enough to clone, compare, and hash — `char` for the single-character
/// sources, `String` for the space-separated-token sources.
pub trait Symbol: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display> Symbol for T {}

/// A string over Σ. ε is simply the empty vector — no sentinel value is
/// needed because concatenation with an empty sequence is already the
/// identity.
pub type Word<S> = Vec<S>;

pub fn concat<S: Symbol>(a: &[S], b: &[S]) -> Word<S> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// Renders a word the way the log-backed oracles and the dot output expect:
/// the literal `ε` for the empty word, symbols separated by spaces otherwise.
pub fn display_word<S: Symbol>(w: &[S]) -> String {
    if w.is_empty() {
        "ε".to_string()
    } else {
        w.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_with_empty_is_identity() {
        let a: Word<char> = vec!['a', 'b'];
        let e: Word<char> = vec![];
        assert_eq!(concat(&a, &e), a);
        assert_eq!(concat(&e, &a), a);
    }

    #[test]
    fn display_word_renders_epsilon() {
        let e: Word<char> = vec![];
        assert_eq!(display_word(&e), "ε");
        assert_eq!(display_word(&['a', 'b']), "a b");
    }
}
