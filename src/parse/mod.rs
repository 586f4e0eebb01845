mod tables;
pub use tables::{
    chain_length, greek_prefixes, halogens, multiplier, numeral_prefixes, numeral_stem,
};

mod affix;
pub use affix::{extract_affixes, parse_locants, Affixes, BranchSpec};

mod chain;
pub use chain::{build_molecule, resolve_skeleton, Skeleton};

use crate::{Molecule, ParseError};
use tracing::*;

/// Switches for the lenient corners of name parsing. Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept joke names such as `fortune` and return a two-carbon placeholder.
    pub novelty_names: bool,
    /// Reject a multiplier that disagrees with its locant count (`2,3-methylbutane`)
    /// instead of warning about it.
    pub strict_multipliers: bool,
}

/// Parse a name with the default options.
pub fn parse(name: &str) -> Result<Molecule, ParseError> {
    parse_with(name, &ParseOptions::default())
}

pub fn parse_with(name: &str, options: &ParseOptions) -> Result<Molecule, ParseError> {
    if options.novelty_names && is_novelty_name(name) {
        info!(name, "novelty name, returning placeholder");
        return Ok(Molecule::novelty());
    }
    let affixes = extract_affixes(name, options)?;
    let molecule = build_molecule(affixes)?;
    debug!(name, atoms = molecule.atom_count(), "parsed");
    Ok(molecule)
}

/// Names where "une" follows at least one word character.
fn is_novelty_name(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    name.match_indices("une").any(|(at, _)| {
        name[..at]
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
    })
}

impl Molecule {
    pub fn from_name(name: &str) -> Result<Self, ParseError> {
        parse(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_novelty_names_are_opt_in() {
        assert!(is_novelty_name("Fortune"));
        assert!(!is_novelty_name("une"));
        assert!(!is_novelty_name("butane"));

        assert!(parse("fortune").is_err());
        let options = ParseOptions {
            novelty_names: true,
            ..ParseOptions::default()
        };
        let molecule = parse_with("fortune", &options).unwrap();
        assert!(molecule.is_novelty());
        assert_eq!(molecule.formula(), "C2");

        // ordinary names are unaffected by the switch
        assert_eq!(parse_with("ethane", &options).unwrap().formula(), "C2H6");
    }

    #[test]
    fn test_from_name() {
        let molecule = Molecule::from_name("2-methylpropane").unwrap();
        assert_eq!(molecule.formula(), "C4H10");
        assert_eq!(molecule.branches().len(), 1);
    }
}
