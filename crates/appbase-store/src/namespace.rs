//! Deterministic namespace-id derivation.
//!
//! Namespaces follow `udb_{ownerShort}_{nameShort}_{timeShort}` so that the
//! ids stay within the length limits of storage engines that inherit them
//! (35 characters at most) while remaining readable: owner tail, slugged
//! database name, millisecond tail for uniqueness.

use appbase_commons::{NamespaceId, OwnerId};
use chrono::Utc;

const PREFIX: &str = "udb";
const NAME_MAX: usize = 15;
const OWNER_TAIL: usize = 8;

/// Derives the namespace id for a new Database using the current time.
pub fn derive_namespace_id(owner: &OwnerId, name: &str) -> NamespaceId {
    derive_namespace_id_at(owner, name, Utc::now().timestamp_millis())
}

/// Deterministic variant: same inputs, same id. `now_millis` is the Unix
/// millisecond timestamp whose last 6 digits become the tail.
pub fn derive_namespace_id_at(owner: &OwnerId, name: &str, now_millis: i64) -> NamespaceId {
    let name_short: String = slug(name).chars().take(NAME_MAX).collect();
    let owner_short = char_tail(owner.as_str(), OWNER_TAIL);
    let time_short = format!("{:06}", now_millis.rem_euclid(1_000_000));
    NamespaceId::new(format!(
        "{}_{}_{}_{}",
        PREFIX, owner_short, name_short, time_short
    ))
}

/// Lower-cases, maps every char outside `[a-z0-9]` to `_`, collapses runs
/// of `_`, trims leading/trailing `_`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}

fn char_tail(s: &str, n: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    let start = chars.len().saturating_sub(n);
    chars[start..].iter().collect()
}
