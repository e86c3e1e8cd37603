//! Root-locale style string ordering for concept ids.
//!
//! Strings are compared level by level: base characters first, then accents,
//! then case, and finally code points so distinct strings never tie. At the
//! base level whitespace sorts before punctuation, punctuation before other
//! symbols, symbols before digits and digits before letters. Accented Latin
//! letters sort with their base letter.

use std::cmp::Ordering;

/// ASCII punctuation and symbols in root collation order.
const ASCII_PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Space,
    Punctuation,
    Symbol,
    Digit,
    Latin,
    Letter,
}

#[derive(Debug, Clone, Copy)]
struct CollationKey {
    primary: (Group, u32),
    accent: u8,
    upper: bool,
}

pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let a_keys: Vec<CollationKey> = a.chars().map(collation_key).collect();
    let b_keys: Vec<CollationKey> = b.chars().map(collation_key).collect();

    a_keys
        .iter()
        .map(|key| key.primary)
        .cmp(b_keys.iter().map(|key| key.primary))
        .then_with(|| {
            a_keys
                .iter()
                .map(|key| key.accent)
                .cmp(b_keys.iter().map(|key| key.accent))
        })
        .then_with(|| {
            a_keys
                .iter()
                .map(|key| key.upper)
                .cmp(b_keys.iter().map(|key| key.upper))
        })
        .then_with(|| a.cmp(b))
}

fn collation_key(c: char) -> CollationKey {
    let upper = c.is_uppercase();
    let lower = c.to_lowercase().next().unwrap_or(c);

    let (primary, accent) = if let Some((base, accent)) = latin_base(lower) {
        ((Group::Latin, base as u32), accent)
    } else if let Some(digit) = c.to_digit(10) {
        ((Group::Digit, digit), 0)
    } else if c.is_numeric() {
        ((Group::Digit, 10 + c as u32), 0)
    } else if c.is_alphabetic() {
        ((Group::Letter, lower as u32), 0)
    } else if c.is_whitespace() || c.is_control() {
        ((Group::Space, c as u32), 0)
    } else if let Some(index) = ASCII_PUNCTUATION.find(c) {
        ((Group::Punctuation, index as u32), 0)
    } else {
        ((Group::Symbol, c as u32), 0)
    };

    CollationKey {
        primary,
        accent,
        upper,
    }
}

/// Maps a lowercase Latin letter to its base letter and an accent rank
/// (0 for the unaccented letter).
fn latin_base(c: char) -> Option<(char, u8)> {
    const ACUTE: u8 = 1;
    const GRAVE: u8 = 2;
    const CIRCUMFLEX: u8 = 3;
    const RING: u8 = 4;
    const DIAERESIS: u8 = 5;
    const TILDE: u8 = 6;
    const CEDILLA: u8 = 7;
    const STROKE: u8 = 8;

    let folded = match c {
        'a'..='z' => (c, 0),
        'á' => ('a', ACUTE),
        'à' => ('a', GRAVE),
        'â' => ('a', CIRCUMFLEX),
        'å' => ('a', RING),
        'ä' => ('a', DIAERESIS),
        'ã' => ('a', TILDE),
        'ç' => ('c', CEDILLA),
        'é' => ('e', ACUTE),
        'è' => ('e', GRAVE),
        'ê' => ('e', CIRCUMFLEX),
        'ë' => ('e', DIAERESIS),
        'í' => ('i', ACUTE),
        'ì' => ('i', GRAVE),
        'î' => ('i', CIRCUMFLEX),
        'ï' => ('i', DIAERESIS),
        'ñ' => ('n', TILDE),
        'ó' => ('o', ACUTE),
        'ò' => ('o', GRAVE),
        'ô' => ('o', CIRCUMFLEX),
        'ö' => ('o', DIAERESIS),
        'õ' => ('o', TILDE),
        'ø' => ('o', STROKE),
        'ú' => ('u', ACUTE),
        'ù' => ('u', GRAVE),
        'û' => ('u', CIRCUMFLEX),
        'ü' => ('u', DIAERESIS),
        'ý' => ('y', ACUTE),
        'ÿ' => ('y', DIAERESIS),
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_compare_case_insensitively_first() {
        assert_eq!(locale_cmp("a", "B"), Ordering::Less);
        assert_eq!(locale_cmp("B", "a"), Ordering::Greater);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn digit_runs_are_not_numeric() {
        assert_eq!(locale_cmp("C10", "C2"), Ordering::Less);
        assert_eq!(locale_cmp("C1", "C10"), Ordering::Less);
    }

    #[test]
    fn punctuation_sorts_before_digits_and_letters() {
        assert_eq!(locale_cmp("C_1", "C1"), Ordering::Less);
        assert_eq!(locale_cmp("C:1", "C1"), Ordering::Less);
        assert_eq!(locale_cmp("C@1", "C1"), Ordering::Less);
        assert_eq!(locale_cmp("C_1", "C-1"), Ordering::Less);
        assert_eq!(locale_cmp("C 1", "C_1"), Ordering::Less);
        assert_eq!(locale_cmp("C9", "Ca"), Ordering::Less);
    }

    #[test]
    fn accented_letters_sort_beside_their_base() {
        assert_eq!(locale_cmp("Cé", "Cf"), Ordering::Less);
        assert_eq!(locale_cmp("Ce", "Cé"), Ordering::Less);
        assert_eq!(locale_cmp("CE", "Cé"), Ordering::Less);
        assert_eq!(locale_cmp("Cé", "CÉ"), Ordering::Less);
        assert_eq!(locale_cmp("Ñ1", "O1"), Ordering::Less);
    }

    #[test]
    fn sorting_mixed_ids() {
        let mut ids = vec!["Cf", "C1", "Cé", "C-1", "c1", "C_1"];
        ids.sort_by(|a, b| locale_cmp(a, b));
        assert_eq!(ids, ["C_1", "C-1", "c1", "C1", "Cé", "Cf"]);
    }
}
