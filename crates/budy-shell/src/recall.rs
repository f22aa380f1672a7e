//! `!`-style history recall.
//!
//! Supported forms, counted back from the most recent entry:
//! `!!` (most recent), `!N` and `!-N` with a single digit `N` in `1..=9`.
//! Anything else is returned untouched.

use budy_core::CommandEntry;

/// Resolve a recall token against `context` (oldest first). Returns `input`
/// unchanged when no rule matches or the depth is out of range.
pub fn expand(input: &str, context: &[CommandEntry]) -> String {
    match resolve(input, context) {
        Some(entry) => entry.command.clone(),
        None => input.to_string(),
    }
}

/// The entry a recall token refers to, if any.
pub fn resolve<'a>(input: &str, context: &'a [CommandEntry]) -> Option<&'a CommandEntry> {
    let n = recall_depth(input)?;
    context.len().checked_sub(n).map(|i| &context[i])
}

/// 1-based depth named by a recall token.
fn recall_depth(input: &str) -> Option<usize> {
    match input.as_bytes() {
        b"!!" => Some(1),
        [b'!', d @ b'1'..=b'9'] | [b'!', b'-', d @ b'1'..=b'9'] => Some(usize::from(*d - b'0')),
        _ => None,
    }
}
