//! # Canonical Pascal Casing
//!
//! Variant schema names are `to_pascal(type_name) + to_pascal(function_name)`.
//! The rule is fixed so that the same type and factory always produce the
//! same identifier:
//!
//! 1. Title-case: an alphabetic character that starts the string or follows a
//!    non-alphabetic character is upper-cased; every other alphabetic
//!    character is lower-cased.
//! 2. An underscore is dropped when it sits between an alphanumeric character
//!    and a digit or upper-case letter.
//!
//! ```
//! use forma_core::to_pascal;
//!
//! assert_eq!(to_pascal("from_role"), "FromRole");
//! assert_eq!(to_pascal("Weapon"), "Weapon");
//! assert_eq!(to_pascal("init"), "Init");
//! ```

/// Convert an identifier to canonical pascal casing.
pub fn to_pascal(name: &str) -> String {
    let titled = title_case(name);
    let chars: Vec<char> = titled.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' && i > 0 {
            let prev = chars[i - 1];
            let joins = chars
                .get(i + 1)
                .is_some_and(|next| next.is_ascii_digit() || next.is_uppercase());
            if prev.is_alphanumeric() && joins {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
