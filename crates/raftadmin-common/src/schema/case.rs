//! Conversions between the operator spelling of a command (`add_voter`) and
//! the canonical method name (`AddVoter`).

/// `add_voter` → `AddVoter`.
///
/// Surrounding whitespace is trimmed. `_`, `-`, `.` and spaces separate words
/// and are dropped; the letter after a separator or a digit is upper-cased.
/// A capital that directly follows another capital is lower-cased, so
/// `ADD_VOTER` also becomes `AddVoter`. Anything else outside ASCII
/// letters and digits is dropped.
pub fn to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut cap_next = true;
    let mut prev_is_cap = false;
    for ch in name.trim().chars() {
        let is_cap = ch.is_ascii_uppercase();
        let is_low = ch.is_ascii_lowercase();
        let mapped = if cap_next {
            ch.to_ascii_uppercase()
        } else if prev_is_cap && is_cap {
            ch.to_ascii_lowercase()
        } else {
            ch
        };
        prev_is_cap = is_cap;
        if is_cap || is_low {
            out.push(mapped);
            cap_next = false;
        } else if ch.is_ascii_digit() {
            out.push(ch);
            cap_next = true;
        } else {
            cap_next = matches!(ch, '_' | '-' | '.' | ' ');
        }
    }
    out
}

/// `AddVoter` → `add_voter`.
pub fn to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
