use lazy_static::lazy_static;
use nom::{error::ErrorKind, IResult};
use std::collections::HashMap;

/// Chain-length stems: the part of a name that says how many carbons a chain has.
static NUMERAL_PREFIXES: &[(&str, usize)] = &[
    ("meth", 1),
    ("eth", 2),
    ("prop", 3),
    ("but", 4),
    ("pent", 5),
    ("hex", 6),
    ("hept", 7),
    ("oct", 8),
    ("non", 9),
    ("dec", 10),
    ("undec", 11),
    ("dodec", 12),
    ("tridec", 13),
    ("tetradec", 14),
    ("pentadec", 15),
    ("hexadec", 16),
    ("heptadec", 17),
    ("octadec", 18),
    ("nonadec", 19),
    ("icos", 20),
];

/// Multiplying prefixes. The empty prefix means "one".
static GREEK_PREFIXES: &[(&str, usize)] = &[
    ("", 1),
    ("di", 2),
    ("tri", 3),
    ("tetra", 4),
    ("penta", 5),
    ("hexa", 6),
    ("hepta", 7),
    ("octa", 8),
    ("nona", 9),
    ("deca", 10),
    ("undeca", 11),
    ("dodeca", 12),
    ("trideca", 13),
    ("tetradeca", 14),
    ("pentadeca", 15),
    ("hexadeca", 16),
    ("heptadeca", 17),
    ("octadeca", 18),
    ("nonadeca", 19),
    ("icosa", 20),
];

static HALOGEN_NAMES: &[(&str, &str)] = &[
    ("fluoro", "F"),
    ("chloro", "Cl"),
    ("bromo", "Br"),
    ("iodo", "I"),
    ("astato", "At"),
    ("tennesso", "Ts"),
];

lazy_static! {
    static ref CHAIN_LENGTHS: HashMap<&'static str, usize> =
        NUMERAL_PREFIXES.iter().copied().collect();
    static ref MULTIPLIERS: HashMap<&'static str, usize> =
        GREEK_PREFIXES.iter().copied().collect();
    /// Stems ordered longest first, so the first hit is the longest match.
    static ref STEMS_LONGEST_FIRST: Vec<(&'static str, usize)> = {
        let mut stems = NUMERAL_PREFIXES.to_vec();
        stems.sort_by_key(|(stem, _)| std::cmp::Reverse(stem.len()));
        stems
    };
}

/// Carbon count of a stem that must match exactly, e.g. `"but"` -> 4.
pub fn chain_length(stem: &str) -> Option<usize> {
    CHAIN_LENGTHS.get(stem).copied()
}

/// Count named by a Greek multiplier that must match exactly; `""` is 1.
pub fn multiplier(prefix: &str) -> Option<usize> {
    MULTIPLIERS.get(prefix).copied()
}

pub fn numeral_prefixes() -> impl Iterator<Item = (&'static str, usize)> {
    NUMERAL_PREFIXES.iter().copied()
}

pub fn greek_prefixes() -> impl Iterator<Item = (&'static str, usize)> {
    GREEK_PREFIXES.iter().copied()
}

/// `(name, element symbol)` pairs for the halogen substituents.
pub fn halogens() -> impl Iterator<Item = (&'static str, &'static str)> {
    HALOGEN_NAMES.iter().copied()
}

/// Parse the longest numeral stem at the front of `input`, returning the stem and its
/// carbon count.
pub fn numeral_stem(input: &str) -> IResult<&str, (&'static str, usize)> {
    for &(stem, length) in STEMS_LONGEST_FIRST.iter() {
        if let Some(rest) = input.strip_prefix(stem) {
            return Ok((rest, (stem, length)));
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::Tag)))
}

pub fn starts_with_numeral_stem(input: &str) -> bool {
    numeral_stem(input).is_ok()
}
