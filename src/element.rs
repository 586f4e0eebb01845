//! The element table: symbol -> outer shell occupancy.
//!
//! Valence here is the number of electrons in the outermost shell, used as the
//! bond-order capacity of an atom.

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use lazy_static::lazy_static;

/// Electron shell occupancy, innermost first.
static SHELL_DATA: &[(&str, &[u8])] = &[
    ("H", &[1]),
    ("He", &[2]),
    ("Li", &[2, 1]),
    ("Be", &[2, 2]),
    ("B", &[2, 3]),
    ("C", &[2, 4]),
    ("N", &[2, 5]),
    ("O", &[2, 6]),
    ("F", &[2, 7]),
    ("Ne", &[2, 8]),
    ("Na", &[2, 8, 1]),
    ("Mg", &[2, 8, 2]),
    ("Al", &[2, 8, 3]),
    ("Si", &[2, 8, 4]),
    ("P", &[2, 8, 5]),
    ("S", &[2, 8, 6]),
    ("Cl", &[2, 8, 7]),
    ("Ar", &[2, 8, 8]),
    ("K", &[2, 8, 8, 1]),
    ("Ca", &[2, 8, 8, 2]),
    ("Sc", &[2, 8, 9, 2]),
    ("Ti", &[2, 8, 10, 2]),
    ("V", &[2, 8, 11, 2]),
    ("Cr", &[2, 8, 13, 1]),
    ("Mn", &[2, 8, 13, 2]),
    ("Fe", &[2, 8, 14, 2]),
    ("Co", &[2, 8, 15, 2]),
    ("Ni", &[2, 8, 16, 2]),
    ("Cu", &[2, 8, 18, 1]),
    ("Zn", &[2, 8, 18, 2]),
    ("Ga", &[2, 8, 18, 3]),
    ("Ge", &[2, 8, 18, 4]),
    ("As", &[2, 8, 18, 5]),
    ("Se", &[2, 8, 18, 6]),
    ("Br", &[2, 8, 18, 7]),
    ("Kr", &[2, 8, 18, 8]),
    ("Rb", &[2, 8, 18, 8, 1]),
    ("Sr", &[2, 8, 18, 8, 2]),
    ("Y", &[2, 8, 18, 9, 2]),
    ("Zr", &[2, 8, 18, 10, 2]),
    ("Nb", &[2, 8, 18, 12, 1]),
    ("Mo", &[2, 8, 18, 13, 1]),
    ("Tc", &[2, 8, 18, 13, 2]),
    ("Ru", &[2, 8, 18, 15, 1]),
    ("Rh", &[2, 8, 18, 16, 1]),
    ("Pd", &[2, 8, 18, 18]),
    ("Ag", &[2, 8, 18, 18, 1]),
    ("Cd", &[2, 8, 18, 18, 2]),
    ("In", &[2, 8, 18, 18, 3]),
    ("Sn", &[2, 8, 18, 18, 4]),
    ("Sb", &[2, 8, 18, 18, 5]),
    ("Te", &[2, 8, 18, 18, 6]),
    ("I", &[2, 8, 18, 18, 7]),
    ("Xe", &[2, 8, 18, 18, 8]),
    ("Cs", &[2, 8, 18, 18, 8, 1]),
    ("Ba", &[2, 8, 18, 18, 8, 2]),
    ("La", &[2, 8, 18, 18, 9, 2]),
    ("Ce", &[2, 8, 18, 19, 9, 2]),
    ("Pr", &[2, 8, 18, 21, 8, 2]),
    ("Nd", &[2, 8, 18, 22, 8, 2]),
    ("Pm", &[2, 8, 18, 23, 8, 2]),
    ("Sm", &[2, 8, 18, 24, 8, 2]),
    ("Eu", &[2, 8, 18, 25, 8, 2]),
    ("Gd", &[2, 8, 18, 25, 9, 2]),
    ("Tb", &[2, 8, 18, 27, 8, 2]),
    ("Dy", &[2, 8, 18, 28, 8, 2]),
    ("Ho", &[2, 8, 18, 29, 8, 2]),
    ("Er", &[2, 8, 18, 30, 8, 2]),
    ("Tm", &[2, 8, 18, 31, 8, 2]),
    ("Yb", &[2, 8, 18, 32, 8, 2]),
    ("Lu", &[2, 8, 18, 32, 9, 2]),
    ("Hf", &[2, 8, 18, 32, 10, 2]),
    ("Ta", &[2, 8, 18, 32, 11, 2]),
    ("W", &[2, 8, 18, 32, 12, 2]),
    ("Re", &[2, 8, 18, 32, 13, 2]),
    ("Os", &[2, 8, 18, 32, 14, 2]),
    ("Ir", &[2, 8, 18, 32, 15, 2]),
    ("Pt", &[2, 8, 18, 32, 17, 1]),
    ("Au", &[2, 8, 18, 32, 18, 1]),
    ("Hg", &[2, 8, 18, 32, 18, 2]),
    ("Tl", &[2, 8, 18, 32, 18, 3]),
    ("Pb", &[2, 8, 18, 32, 18, 4]),
    ("Bi", &[2, 8, 18, 32, 18, 5]),
    ("Po", &[2, 8, 18, 32, 18, 6]),
    ("At", &[2, 8, 18, 32, 18, 7]),
    ("Rn", &[2, 8, 18, 32, 18, 8]),
    ("Fr", &[2, 8, 18, 32, 18, 8, 1]),
    ("Ra", &[2, 8, 18, 32, 18, 8, 2]),
    ("Ac", &[2, 8, 18, 32, 18, 9, 2]),
    ("Th", &[2, 8, 18, 32, 18, 10, 2]),
    ("Pa", &[2, 8, 18, 32, 20, 9, 2]),
    ("U", &[2, 8, 18, 32, 21, 9, 2]),
    ("Np", &[2, 8, 18, 32, 22, 9, 2]),
    ("Pu", &[2, 8, 18, 32, 24, 8, 2]),
    ("Am", &[2, 8, 18, 32, 25, 8, 2]),
    ("Cm", &[2, 8, 18, 32, 25, 9, 2]),
    ("Bk", &[2, 8, 18, 32, 27, 8, 2]),
    ("Cf", &[2, 8, 18, 32, 28, 8, 2]),
    ("Es", &[2, 8, 18, 32, 29, 8, 2]),
    ("Fm", &[2, 8, 18, 32, 30, 8, 2]),
    ("Md", &[2, 8, 18, 32, 31, 8, 2]),
    ("No", &[2, 8, 18, 32, 32, 8, 2]),
    ("Lr", &[2, 8, 18, 32, 32, 8, 3]),
    ("Rf", &[2, 8, 18, 32, 32, 10, 2]),
    ("Db", &[2, 8, 18, 32, 32, 11, 2]),
    ("Sg", &[2, 8, 18, 32, 32, 12, 2]),
    ("Bh", &[2, 8, 18, 32, 32, 13, 2]),
    ("Hs", &[2, 8, 18, 32, 32, 14, 2]),
    ("Mt", &[2, 8, 18, 32, 32, 15, 2]),
    ("Ds", &[2, 8, 18, 32, 32, 16, 2]),
    ("Rg", &[2, 8, 18, 32, 32, 17, 2]),
    ("Cn", &[2, 8, 18, 32, 32, 18, 2]),
    ("Nh", &[2, 8, 18, 32, 32, 18, 3]),
    ("Fl", &[2, 8, 18, 32, 32, 18, 4]),
    ("Mc", &[2, 8, 18, 32, 32, 18, 5]),
    ("Lv", &[2, 8, 18, 32, 32, 18, 6]),
    ("Ts", &[2, 8, 18, 32, 32, 18, 7]),
    ("Og", &[2, 8, 18, 32, 32, 18, 8]),
    ("Uue", &[2, 8, 18, 32, 32, 18, 8, 1]),
];

lazy_static! {
    static ref ELEMENTS: HashMap<&'static str, Element> = SHELL_DATA
        .iter()
        .map(|&(symbol, shells)| (symbol, Element { symbol, shells }))
        .collect();
}

/// Carbon, for callers that need it without a table lookup.
pub static CARBON: &Element = &Element {
    symbol: "C",
    shells: &[2, 4],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    symbol: &'static str,
    shells: &'static [u8],
}

impl Element {
    /// Look up an element by its symbol, e.g. `"Cl"`.
    pub fn from_symbol(symbol: &str) -> Option<&'static Element> {
        ELEMENTS.get(symbol)
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn shells(&self) -> &'static [u8] {
        self.shells
    }

    /// Occupancy of the outermost shell.
    pub fn valence(&self) -> u8 {
        self.shells.last().copied().unwrap_or(0)
    }

    pub fn is_carbon(&self) -> bool {
        self.symbol == "C"
    }

    pub fn is_hydrogen(&self) -> bool {
        self.symbol == "H"
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.symbol)
    }
}

/// Valence of the element with the given symbol.
pub fn valence(symbol: &str) -> Option<u8> {
    Element::from_symbol(symbol).map(Element::valence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valence_is_outer_shell() {
        assert_eq!(valence("H"), Some(1));
        assert_eq!(valence("C"), Some(4));
        assert_eq!(valence("F"), Some(7));
        assert_eq!(valence("Cl"), Some(7));
        assert_eq!(valence("Br"), Some(7));
        assert_eq!(valence("I"), Some(7));
        assert_eq!(valence("At"), Some(7));
        assert_eq!(valence("Ts"), Some(7));
        assert_eq!(valence("Xx"), None);
    }

    #[test]
    fn test_lookup() {
        let carbon = Element::from_symbol("C").unwrap();
        assert!(carbon.is_carbon());
        assert_eq!(carbon.shells(), &[2, 4]);
        assert_eq!(carbon.to_string(), "C");
        assert_eq!(ELEMENTS.len(), 119);
        assert_eq!(Element::from_symbol("C"), Some(CARBON));
    }
}
