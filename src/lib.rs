//! Condensed and molecular formulas from simple organic names.
//!
//! ```
//! let molecule = molname::parse("2,2-dimethylpropane").unwrap();
//! assert_eq!(molname::formula(&molecule), "C5H12");
//! assert_eq!(molname::condensed_formula(&molecule), "C(CH3)4");
//! ```

mod element;
pub use element::*;

mod error;
pub use error::*;

mod molecule;
pub use molecule::*;

mod formula;
pub use formula::*;

mod parse;
pub use parse::*;

use tracing::Level;

/// Install a stderr log subscriber at `level` (`"trace"` through `"error"`).
/// Unknown levels fall back to info; a second call is a no-op.
pub fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formulas(name: &str) -> (String, String) {
        let molecule = parse(name).unwrap();
        (formula(&molecule), condensed_formula(&molecule))
    }

    fn stem(n: usize) -> &'static str {
        numeral_prefixes()
            .find(|&(_, length)| length == n)
            .map(|(stem, _)| stem)
            .unwrap()
    }

    /// Every skeleton atom exactly saturated, everything else bonded within valence.
    fn assert_saturated(molecule: &Molecule) {
        assert_eq!(molecule.validate(), Ok(()));
        for (index, atom) in molecule.atoms() {
            let bonds = molecule.bond_order_sum(index);
            if molecule.is_skeleton(index) {
                assert_eq!(bonds, u32::from(atom.element().valence()), "atom {index}");
            } else {
                assert!(bonds >= 1, "atom {index} is unbonded");
            }
        }
    }

    #[test]
    fn test_alkane_family() {
        init_logging("warn");
        for n in 1..=20 {
            let name = format!("{}ane", stem(n));
            let molecule = parse(&name).unwrap();
            assert_eq!(molecule.element_counts().get("C"), n, "{name}");
            assert_eq!(molecule.element_counts().get("H"), 2 * n + 2, "{name}");
            assert_saturated(&molecule);
        }
    }

    #[test]
    fn test_alkene_and_alkyne_families() {
        for n in 2..=20 {
            let ene = parse(&format!("{}-1-ene", stem(n))).unwrap();
            assert_eq!(ene.element_counts().get("H"), 2 * n, "{n}-ene");
            assert_saturated(&ene);

            let yne = parse(&format!("{}-1-yne", stem(n))).unwrap();
            assert_eq!(yne.element_counts().get("H"), 2 * n - 2, "{n}-yne");
            assert_saturated(&yne);
        }
    }

    #[test]
    fn test_known_formulas() {
        assert_eq!(formulas("methane"), ("CH4".into(), "CH4".into()));
        assert_eq!(formulas("ethyne"), ("C2H2".into(), "CH≡CH".into()));
        assert_eq!(formulas("ethene"), ("C2H4".into(), "CH2=CH2".into()));
        assert_eq!(
            formulas("pentane"),
            ("C5H12".into(), "CH3-(CH2)3-CH3".into())
        );
        assert_eq!(
            formulas("2-methylpropane"),
            ("C4H10".into(), "CH(CH3)3".into())
        );
        assert_eq!(
            formulas("but-2-ene"),
            ("C4H8".into(), "CH3-CH=CH-CH3".into())
        );
        assert_eq!(
            formulas("buta-1,3-diene"),
            ("C4H6".into(), "CH2=CH-CH=CH2".into())
        );
        assert_eq!(
            formulas("pent-1-en-3-yne"),
            ("C5H6".into(), "CH2=CH-C≡C-CH3".into())
        );
    }

    #[test]
    fn test_cumulenes_are_not_compressed() {
        assert_eq!(
            formulas("propa-1,2-diene"),
            ("C3H4".into(), "CH2=C=CH2".into())
        );
        assert_eq!(
            formulas("penta-2,3-diene"),
            ("C5H8".into(), "CH3-CH=C=CH-CH3".into())
        );
        assert_eq!(
            formulas("buta-1,2,3-triene"),
            ("C4H4".into(), "CH2=C=C=CH2".into())
        );
    }

    #[test]
    fn test_repeated_groups() {
        assert_eq!(
            formulas("2,3,4,5-tetramethylhexane"),
            ("C10H22".into(), "CH(CH3)2-(CH(CH3))2-CH(CH3)2".into())
        );
        assert_eq!(
            formulas("2,3-dimethylbutane"),
            ("C6H14".into(), "CH(CH3)2-CH(CH3)2".into())
        );
        assert_eq!(
            formulas("hept-1-en-6-yne"),
            ("C7H10".into(), "CH2=CH-(CH2)3-C≡CH".into())
        );
    }

    #[test]
    fn test_neopentane() {
        let (flat, condensed) = formulas("2,2-dimethylpropane");
        assert_eq!(flat, "C5H12");
        assert!(condensed.contains("(CH3)4"), "{condensed}");
    }

    #[test]
    fn test_halogenated() {
        assert_eq!(
            formulas("1,1-dichloroethane"),
            ("C2H4Cl2".into(), "CHCl2-CH3".into())
        );
        assert_eq!(formulas("chloromethane").0, "CH3Cl");
        assert_eq!(formulas("tetrachloromethane").0, "CCl4");
        assert_eq!(formulas("hexafluoroethane"), ("C2F6".into(), "CF3-CF3".into()));
        assert_eq!(formulas("dichloroethane").1, "CHCl2-CH3");
        assert_eq!(formulas("1-bromo-2-fluoroethane").0, "C2H4BrF");
        assert_eq!(formulas("1-astatopropane").0, "C3H7At");
    }

    #[test]
    fn test_saturation_after_branches() {
        for name in [
            "2,3-dimethylbutane",
            "3-ethyl-2-methylhexane",
            "2,2,3,3-tetramethylbutane",
            "4-propylhept-2-yne",
            "1,2-dichloroethene",
        ] {
            let molecule = parse(name).unwrap();
            assert_saturated(&molecule);
            let condensed = condensed_formula(&molecule);
            assert_eq!(compress_runs(&condensed), condensed, "{name}");
        }
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("a,b-dimethylbutane"),
            Err(ParseError::AmbiguousLocant { .. })
        ));
        assert!(matches!(parse("xyzane"), Err(ParseError::UnknownStem { .. })));
        assert!(matches!(parse("butanol"), Err(ParseError::Lexical { .. })));
        assert!(matches!(
            parse("pentachloromethane"),
            Err(ParseError::ValenceExceeded { position: 0, .. })
        ));
        assert!(matches!(
            parse("propa-1,2-diyne"),
            Err(ParseError::ValenceExceeded { position: 1, .. })
        ));
    }

    #[test]
    fn test_parses_on_many_threads() {
        let names = ["hexane", "2-methylpentane", "1,2-dibromoethane", "hex-3-yne"];
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let name = names[i % names.len()];
                std::thread::spawn(move || {
                    let molecule = parse(name).unwrap();
                    (name, formula(&molecule), condensed_formula(&molecule))
                })
            })
            .collect();
        for handle in handles {
            let (name, flat, condensed) = handle.join().unwrap();
            let molecule = parse(name).unwrap();
            assert_eq!(flat, formula(&molecule));
            assert_eq!(condensed, condensed_formula(&molecule));
        }
    }
}
