//! Splits a name into its substituent prefixes and the core chain name.
//!
//! `2,2-dimethyl-1-chloropropane` becomes two methyl branches at 2, a chlorine stacked
//! on position 1 and the core `propane`. The core keeps any locants that belong to it
//! (`pent-1-en-3-yne` -> `pent1en3yne`) for the chain builder to resolve.

use super::{tables, ParseOptions};
use crate::ParseError;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{alpha1, char, digit1},
    combinator::{all_consuming, map, map_res, verify},
    multi::separated_list1,
    IResult,
};
use std::collections::{BTreeMap, VecDeque};
use tracing::*;

/// An alkyl branch request: `length` carbons hanging off main-chain `locant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchSpec {
    pub locant: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Affixes {
    /// The parent chain name with hyphens removed, e.g. `but2ene`.
    pub core: String,
    /// Halogen symbols waiting to be attached, keyed by 0-based chain position. The
    /// last one pushed is attached first.
    pub halogens: BTreeMap<usize, Vec<&'static str>>,
    /// Halogens named without locants, handed out along the main chain in order.
    pub unplaced_halogens: VecDeque<&'static str>,
    pub branches: Vec<BranchSpec>,
    /// Carbons contributed by alkyl branches.
    pub extra_carbons: usize,
}

impl Affixes {
    pub fn pop_halogen(&mut self, position: usize) -> Option<&'static str> {
        self.halogens.get_mut(&position).and_then(Vec::pop)
    }

    pub fn pop_unplaced_halogen(&mut self) -> Option<&'static str> {
        self.unplaced_halogens.pop_front()
    }

    /// The first position that still has halogens waiting, if any.
    pub fn leftover_halogen(&self) -> Option<usize> {
        self.halogens
            .iter()
            .find(|(_, stack)| !stack.is_empty())
            .map(|(&position, _)| position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Locants(&'a str),
    Word(&'a str),
}

impl<'a> Segment<'a> {
    fn text(&self) -> &'a str {
        match *self {
            Segment::Locants(text) | Segment::Word(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubstituentKind {
    Halogen(&'static str),
    Alkyl(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Substituent<'a> {
    text: &'a str,
    multiplier: usize,
    kind: SubstituentKind,
}

/// Anything that starts with a digit or contains a comma is meant as a locant list,
/// even when it is malformed (`a,b`), so the error can say so.
fn locant_text(input: &str) -> IResult<&str, &str> {
    verify(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == ','),
        |text: &str| text.contains(',') || text.starts_with(|c: char| c.is_ascii_digit()),
    )(input)
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(locant_text, Segment::Locants),
        map(alpha1, Segment::Word),
    ))(input)
}

fn segments(input: &str) -> IResult<&str, Vec<Segment<'_>>> {
    all_consuming(separated_list1(char('-'), segment))(input)
}

fn locant_list(input: &str) -> IResult<&str, Vec<usize>> {
    all_consuming(separated_list1(
        char(','),
        map_res(digit1, |digits: &str| digits.parse::<usize>()),
    ))(input)
}

/// Parse `2,3` into `[2, 3]`. Every entry must be a positive integer.
pub fn parse_locants(text: &str) -> Result<Vec<usize>, ParseError> {
    let locants = match locant_list(text) {
        Ok((_, locants)) => locants,
        Err(_) => {
            let reason = match text
                .split(',')
                .find(|entry| entry.is_empty() || !entry.chars().all(|c| c.is_ascii_digit()))
            {
                Some("") => "empty entry".to_string(),
                Some(entry) => format!("'{entry}' is not a number"),
                None => "number out of range".to_string(),
            };
            return Err(ParseError::ambiguous_locant(text, reason));
        }
    };
    if locants.contains(&0) {
        return Err(ParseError::ambiguous_locant(text, "locants start at 1"));
    }
    Ok(locants)
}

/// Every way the front of `word` reads as `greek? (halogen | stem "yl")`.
fn substituent_candidates(word: &str) -> Vec<Substituent<'_>> {
    let mut found = Vec::new();
    for (greek, multiplier) in tables::greek_prefixes() {
        let Some(rest) = word.strip_prefix(greek) else {
            continue;
        };
        for (name, symbol) in tables::halogens() {
            if rest.starts_with(name) {
                found.push(Substituent {
                    text: &word[..greek.len() + name.len()],
                    multiplier,
                    kind: SubstituentKind::Halogen(symbol),
                });
            }
        }
        for (stem, length) in tables::numeral_prefixes() {
            let is_alkyl = rest
                .strip_prefix(stem)
                .is_some_and(|after| after.starts_with("yl"));
            if is_alkyl {
                found.push(Substituent {
                    text: &word[..greek.len() + stem.len() + 2],
                    multiplier,
                    kind: SubstituentKind::Alkyl(length),
                });
            }
        }
    }
    found
}

/// Picks the reading of the front of `word` that agrees with the number of locants
/// given, then the longest, then the one with the smaller multiplier.
fn leading_substituent(word: &str, locant_count: Option<usize>) -> Option<Substituent<'_>> {
    substituent_candidates(word).into_iter().max_by_key(|sub| {
        (
            Some(sub.multiplier) == locant_count,
            sub.text.len(),
            std::cmp::Reverse(sub.multiplier),
        )
    })
}

fn apply_substituent(
    affixes: &mut Affixes,
    substituent: Substituent<'_>,
    locants: Option<(&str, Vec<usize>)>,
    options: &ParseOptions,
) -> Result<(), ParseError> {
    let locants = match (locants, substituent.kind) {
        (Some((text, locants)), _) => {
            if locants.len() != substituent.multiplier {
                let reason = format!(
                    "'{}' names {} but {} locants are given",
                    substituent.text,
                    substituent.multiplier,
                    locants.len()
                );
                if options.strict_multipliers {
                    return Err(ParseError::ambiguous_locant(text, reason));
                }
                warn!("{reason}, using the locants");
            }
            locants
        }
        (None, SubstituentKind::Halogen(symbol)) => {
            debug!(substituent = substituent.text, "found substituent without locants");
            affixes
                .unplaced_halogens
                .extend(std::iter::repeat(symbol).take(substituent.multiplier));
            return Ok(());
        }
        (None, SubstituentKind::Alkyl(_)) => {
            return Err(ParseError::ambiguous_locant(
                substituent.text,
                "an alkyl branch needs locants",
            ))
        }
    };

    debug!(substituent = substituent.text, ?locants, "found substituent");
    match substituent.kind {
        SubstituentKind::Halogen(symbol) => {
            for locant in locants {
                affixes.halogens.entry(locant - 1).or_default().push(symbol);
            }
        }
        SubstituentKind::Alkyl(length) => {
            for locant in locants {
                affixes.branches.push(BranchSpec { locant, length });
                affixes.extra_carbons += length;
            }
        }
    }
    Ok(())
}

/// Strip the substituent prefixes off `name` and collect them.
pub fn extract_affixes(name: &str, options: &ParseOptions) -> Result<Affixes, ParseError> {
    let normalized = name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(ParseError::lexical(name));
    }
    let segments = match segments(&normalized) {
        Ok((_, segments)) => segments,
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => {
            return Err(ParseError::lexical(err.input))
        }
        Err(nom::Err::Incomplete(_)) => return Err(ParseError::lexical(normalized.as_str())),
    };

    let mut affixes = Affixes::default();
    let mut pending: Option<(&str, Vec<usize>)> = None;
    let mut core: Option<String> = None;

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            Segment::Locants(text) => {
                if let Some((previous, _)) = pending {
                    return Err(ParseError::ambiguous_locant(
                        previous,
                        "not followed by a substituent or chain name",
                    ));
                }
                pending = Some((text, parse_locants(text)?));
            }
            Segment::Word(word) => {
                let mut rest = word;
                while !rest.is_empty() {
                    let locant_count = pending.as_ref().map(|(_, locants)| locants.len());
                    let Some(substituent) = leading_substituent(rest, locant_count) else {
                        break;
                    };
                    apply_substituent(&mut affixes, substituent, pending.take(), options)?;
                    rest = &rest[substituent.text.len()..];
                }
                if rest.is_empty() {
                    continue;
                }

                let mut text = String::new();
                if let Some((locants, _)) = pending.take() {
                    if !tables::starts_with_numeral_stem(rest) {
                        return Err(ParseError::lexical(rest));
                    }
                    text.push_str(locants);
                }
                text.push_str(rest);
                for later in &segments[i + 1..] {
                    text.push_str(later.text());
                }
                core = Some(text);
                break;
            }
        }
    }

    affixes.core = core.ok_or_else(|| ParseError::lexical(normalized.as_str()))?;
    debug!(
        core = %affixes.core,
        branches = affixes.branches.len(),
        halogens = affixes.halogens.values().map(Vec::len).sum::<usize>(),
        unplaced = affixes.unplaced_halogens.len(),
        "split name"
    );
    Ok(affixes)
}
