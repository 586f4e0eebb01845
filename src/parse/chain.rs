//! Turns a core name plus its affixes into a saturated molecule.

use super::affix::{parse_locants, Affixes, BranchSpec};
use super::tables;
use crate::{BondOrder, BondSet, Branch, Molecule, ParseError};
use nom::{
    branch::alt,
    character::complete::{alpha1, char, digit1},
    combinator::{all_consuming, map, recognize},
    multi::{many1, separated_list1},
    IResult,
};
use tracing::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suffix {
    Ane,
    Ene,
    Yne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CorePiece<'a> {
    Locants(&'a str),
    Letters(&'a str),
}

/// The resolved main chain: carbon count and 1-based bond locants per order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skeleton {
    pub length: usize,
    pub double: Vec<usize>,
    pub triple: Vec<usize>,
}

impl Skeleton {
    /// Order of the bond between chain carbons `locant` and `locant + 1`.
    pub fn order_at(&self, locant: usize) -> BondOrder {
        if self.triple.contains(&locant) {
            BondOrder::Triple
        } else if self.double.contains(&locant) {
            BondOrder::Double
        } else {
            BondOrder::Single
        }
    }
}

fn core_pieces(input: &str) -> IResult<&str, Vec<CorePiece<'_>>> {
    all_consuming(many1(alt((
        map(
            recognize(separated_list1(char(','), digit1)),
            CorePiece::Locants,
        ),
        map(alpha1, CorePiece::Letters),
    ))))(input)
}

/// One family of unsaturation (all the double bonds, or all the triple bonds).
struct Family {
    order: BondOrder,
    count: usize,
}

fn strip_euphonic_a(text: &str) -> &str {
    text.strip_prefix('a').unwrap_or(text)
}

fn greek_count(text: &str) -> Result<usize, ParseError> {
    tables::multiplier(text).ok_or_else(|| ParseError::unknown_stem(text))
}

/// `1, 3, 5, ...`: where bonds go when the name gives no locants.
fn canonical_locants(count: usize) -> Vec<usize> {
    (0..count).map(|i| 2 * i + 1).collect()
}

fn join_locants(locants: &[usize]) -> String {
    locants
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Resolve the core name (`hexa1,3dien5yne`) into chain length and bond positions.
pub fn resolve_skeleton(core: &str) -> Result<Skeleton, ParseError> {
    let pieces = match core_pieces(core) {
        Ok((_, pieces)) => pieces,
        Err(_) => return Err(ParseError::lexical(core)),
    };
    let mut letters = String::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    for piece in pieces {
        match piece {
            CorePiece::Letters(text) => letters.push_str(text),
            CorePiece::Locants(text) => groups.push((text, parse_locants(text)?)),
        }
    }

    let suffix = if letters.ends_with("ane") {
        Suffix::Ane
    } else if letters.ends_with("ene") {
        Suffix::Ene
    } else if letters.ends_with("yne") {
        Suffix::Yne
    } else {
        return Err(ParseError::lexical(letters));
    };
    let body = &letters[..letters.len() - 3];

    if suffix == Suffix::Ane {
        if let Some((text, _)) = groups.first() {
            return Err(ParseError::ambiguous_locant(
                *text,
                "a saturated chain takes no bond locants",
            ));
        }
        let length = tables::chain_length(body).ok_or_else(|| ParseError::unknown_stem(body))?;
        debug!(stem = body, length, "resolved alkane");
        return Ok(Skeleton {
            length,
            ..Skeleton::default()
        });
    }

    let (rest, length) = match tables::numeral_stem(body) {
        Ok((rest, (_, length))) => (rest, length),
        Err(_) => {
            warn!(body, "no numeral stem, assuming a single carbon");
            (body, 1)
        }
    };

    let families = match suffix {
        Suffix::Ene => vec![Family {
            order: BondOrder::Double,
            count: greek_count(strip_euphonic_a(rest))?,
        }],
        _ => match rest.rfind("en") {
            Some(at) => {
                let enes = strip_euphonic_a(&rest[..at]);
                let after = &rest[at + 2..];
                let ynes = after.strip_prefix('e').unwrap_or(after);
                vec![
                    Family {
                        order: BondOrder::Double,
                        count: greek_count(enes)?,
                    },
                    Family {
                        order: BondOrder::Triple,
                        count: greek_count(ynes)?,
                    },
                ]
            }
            None => vec![Family {
                order: BondOrder::Triple,
                count: greek_count(strip_euphonic_a(rest))?,
            }],
        },
    };

    if groups.len() > families.len() {
        return Err(ParseError::ambiguous_locant(
            groups[0].0,
            "more locant lists than kinds of multiple bond",
        ));
    }
    // The locant list nearest the suffix belongs to the last family.
    let offset = families.len() - groups.len();
    let mut skeleton = Skeleton {
        length,
        ..Skeleton::default()
    };
    for (i, family) in families.iter().enumerate() {
        let locants = match i.checked_sub(offset) {
            Some(g) => groups[g].1.clone(),
            None => canonical_locants(family.count),
        };
        if locants.len() != family.count {
            warn!(
                ?locants,
                count = family.count,
                "locant count disagrees with multiplier, using the locants"
            );
        }
        match family.order {
            BondOrder::Triple => skeleton.triple = locants,
            _ => skeleton.double = locants,
        }
    }

    if skeleton.double == [1] && skeleton.triple == [1] {
        skeleton.double = vec![3];
    }

    for locants in [&skeleton.double, &skeleton.triple] {
        if let Some(&bad) = locants.iter().find(|&&k| k == 0 || k >= length) {
            return Err(ParseError::ambiguous_locant(
                join_locants(locants),
                format!("bond locant {bad} does not fit a {length}-carbon chain"),
            ));
        }
    }

    debug!(
        length,
        double = ?skeleton.double,
        triple = ?skeleton.triple,
        "resolved unsaturated chain"
    );
    Ok(skeleton)
}

fn build_main_chain(molecule: &mut Molecule, skeleton: &Skeleton) -> Result<(), ParseError> {
    molecule.append_atom("C", &BondSet::new(), true)?;
    for position in 1..skeleton.length {
        let order = skeleton.order_at(position);
        molecule.append_atom("C", &BondSet::new().with(order, position - 1), true)?;
    }
    Ok(())
}

/// Attach one alkyl branch. If the requested carbon has no room left, the branch
/// moves one carbon along the main chain.
fn attach_branch(
    molecule: &mut Molecule,
    chain_length: usize,
    spec: BranchSpec,
) -> Result<(), ParseError> {
    if spec.locant == 0 || spec.locant > chain_length {
        return Err(ParseError::ambiguous_locant(
            spec.locant.to_string(),
            format!("branch position outside the {chain_length}-carbon chain"),
        ));
    }
    let requested = spec.locant - 1;
    let anchor = match molecule.append_atom("C", &BondSet::single(requested), false) {
        Ok(_) => requested,
        Err(err @ ParseError::ValenceExceeded { .. }) => {
            let next = requested + 1;
            if next >= chain_length {
                return Err(err);
            }
            molecule
                .append_atom("C", &BondSet::single(next), false)
                .map_err(|_| err)?;
            warn!(
                locant = spec.locant,
                anchor = next + 1,
                "carbon is full, branch moved along the chain"
            );
            next
        }
        Err(err) => return Err(err),
    };

    let mut previous = molecule.atom_count() - 1;
    for _ in 1..spec.length {
        previous = molecule.append_atom("C", &BondSet::single(previous), false)?;
    }
    debug!(locant = spec.locant, anchor, length = spec.length, "attached branch");
    molecule.record_branch(Branch {
        locant: spec.locant,
        anchor,
        length: spec.length,
    });
    Ok(())
}

/// Fill every remaining valence slot of the skeleton. A carbon takes its own halogens
/// first, then main-chain carbons take halogens named without locants, then hydrogen.
fn saturate(molecule: &mut Molecule, affixes: &mut Affixes) -> Result<(), ParseError> {
    molecule.mark_skeleton();
    let mut last_main_chain = 0;
    for index in 0..molecule.skeleton_len() {
        let atom = molecule
            .atom(index)
            .ok_or(ParseError::MissingAtom { index })?;
        let capacity = u32::from(atom.element().valence());
        let main_chain = atom.is_main_chain();
        if main_chain {
            last_main_chain = index;
        }
        while molecule.bond_order_sum(index) < capacity {
            let symbol = affixes
                .pop_halogen(index)
                .or_else(|| main_chain.then(|| affixes.pop_unplaced_halogen()).flatten())
                .unwrap_or("H");
            molecule.append_atom(symbol, &BondSet::single(index), false)?;
        }
    }

    let leftover = affixes.leftover_halogen().or_else(|| {
        (!affixes.unplaced_halogens.is_empty()).then_some(last_main_chain)
    });
    if let Some(position) = leftover {
        let atom = molecule
            .atom(position)
            .ok_or(ParseError::MissingAtom { index: position })?;
        return Err(ParseError::ValenceExceeded {
            element: atom.symbol().to_string(),
            position,
            valence: atom.element().valence(),
        });
    }
    Ok(())
}

/// Build the full molecule for a split name.
pub fn build_molecule(mut affixes: Affixes) -> Result<Molecule, ParseError> {
    let skeleton = resolve_skeleton(&affixes.core)?;
    if let Some(&position) = affixes.halogens.keys().find(|&&p| p >= skeleton.length) {
        return Err(ParseError::ambiguous_locant(
            (position + 1).to_string(),
            format!("halogen position outside the {}-carbon chain", skeleton.length),
        ));
    }

    let mut molecule = Molecule::new();
    build_main_chain(&mut molecule, &skeleton)?;
    for &spec in &affixes.branches {
        attach_branch(&mut molecule, skeleton.length, spec)?;
    }
    saturate(&mut molecule, &mut affixes)?;
    molecule.validate()?;
    Ok(molecule)
}
