//! Flat and condensed formula rendering.
//!
//! The flat formula is a plain element count. The condensed formula walks the main
//! chain, writes one group per chain carbon with its hydrogens, halogens and alkyl
//! branches, joins the groups with the bond between them and finally collapses
//! repeated units into `(unit)k`.

use crate::{BondOrder, Molecule};
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::*;

const NOVELTY_FORMULA: &str = "C2";
const NOVELTY_CONDENSED: &str = "C≣C";

/// Upper bound on compression passes over one formula.
pub const MAX_COMPRESSION_PASSES: usize = 10;

/// Element counts that print carbon first, hydrogen second and everything else in
/// the order it was first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<(&'static str, usize)>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: &'static str) {
        match self.counts.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((symbol, 1)),
        }
    }

    pub fn get(&self, symbol: &str) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Entries in print order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        let rank = |symbol: &str| match symbol {
            "C" => 0,
            "H" => 1,
            _ => 2,
        };
        let mut ordered: Vec<_> = self.counts.clone();
        // stable, so the rest keep insertion order
        ordered.sort_by_key(|&(symbol, _)| rank(symbol));
        ordered.into_iter()
    }
}

impl FromIterator<&'static str> for Histogram {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for symbol in iter {
            histogram.add(symbol);
        }
        histogram
    }
}

impl Display for Histogram {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (symbol, count) in self.iter() {
            write!(f, "{symbol}")?;
            if count > 1 {
                write!(f, "{count}")?;
            }
        }
        Ok(())
    }
}

/// Element counts of the whole molecule, e.g. `C2H4Cl2`.
pub fn formula(molecule: &Molecule) -> String {
    if molecule.is_novelty() {
        return NOVELTY_FORMULA.to_string();
    }
    molecule.element_counts().to_string()
}

/// Chain-walking formula with repeats collapsed, e.g. `CH3-(CH2)3-CH3`.
pub fn condensed_formula(molecule: &Molecule) -> String {
    if molecule.is_novelty() {
        return NOVELTY_CONDENSED.to_string();
    }

    let folded = folded_methyls(molecule);
    let mut visited = vec![false; molecule.atom_count()];
    let mut heads: Vec<(usize, String)> = Vec::new();
    for index in 0..molecule.atom_count() {
        if visited[index] || folded.contains_key(&index) {
            continue;
        }
        let group = render_head(molecule, index, &folded, &mut visited);
        heads.push((index, group));
    }

    let mut joined = String::new();
    let mut previous: Option<usize> = None;
    for (index, group) in &heads {
        if let Some(previous) = previous {
            let bond = molecule
                .bond_between(previous, *index)
                .unwrap_or(BondOrder::Single);
            joined.push(bond.symbol());
        }
        joined.push_str(group);
        previous = Some(*index);
    }
    debug!(uncompressed = %joined, "rendered condensed groups");
    compress_runs(&joined)
}

/// Terminal main-chain methyls that are drawn as a branch of their neighbour, so that
/// `CH3-C(CH3)2-CH3` reads `C(CH3)4`. A chain end folds only when its neighbour already
/// carries a bare methyl branch. Maps the folded end to the carbon it folds into.
fn folded_methyls(molecule: &Molecule) -> HashMap<usize, usize> {
    let mut folded = HashMap::new();
    for (index, atom) in molecule.atoms() {
        if !atom.is_main_chain() || !atom.element().is_carbon() {
            continue;
        }
        let Some(head) = lone_carbon_neighbor(molecule, index) else {
            continue;
        };
        if !molecule.at(head).is_main_chain()
            || molecule.bond_between(index, head) != Some(BondOrder::Single)
        {
            continue;
        }
        let has_methyl_branch = molecule
            .partners(head, BondOrder::Single)
            .into_iter()
            .any(|p| !molecule.at(p).is_main_chain() && is_bare_methyl(molecule, p));
        if has_methyl_branch && is_bare_methyl(molecule, index) {
            folded.insert(index, head);
        }
    }
    folded
}

fn lone_carbon_neighbor(molecule: &Molecule, index: usize) -> Option<usize> {
    let carbons: Vec<usize> = molecule
        .neighbors(index)
        .into_iter()
        .filter(|(partner, _)| molecule.at(*partner).element().is_carbon())
        .map(|(partner, _)| partner)
        .collect();
    match carbons.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

fn is_bare_methyl(molecule: &Molecule, index: usize) -> bool {
    let atom = molecule.at(index);
    atom.element().is_carbon()
        && lone_carbon_neighbor(molecule, index).is_some()
        && molecule
            .neighbors(index)
            .iter()
            .filter(|(partner, _)| !molecule.at(*partner).element().is_carbon())
            .all(|(partner, _)| molecule.at(*partner).element().is_hydrogen())
}

fn render_head(
    molecule: &Molecule,
    head: usize,
    folded: &HashMap<usize, usize>,
    visited: &mut [bool],
) -> String {
    visited[head] = true;
    let mut local = Histogram::new();
    let mut branches = String::new();
    for partner in molecule.partners(head, BondOrder::Single) {
        if visited[partner] {
            continue;
        }
        let atom = molecule.at(partner);
        if folded.get(&partner) == Some(&head) {
            branches.push_str(&format!("({})", render_branch(molecule, partner, visited)));
        } else if atom.is_main_chain() {
            continue;
        } else if atom.element().is_carbon() {
            branches.push_str(&format!("({})", render_branch(molecule, partner, visited)));
        } else {
            visited[partner] = true;
            local.add(atom.symbol());
        }
    }
    format!("{}{local}{branches}", molecule.at(head).symbol())
}

/// Renders a branch carbon with its own substituents. A nested branch is attached
/// as `-X`, or as `-(X)` when there are several.
fn render_branch(molecule: &Molecule, index: usize, visited: &mut [bool]) -> String {
    visited[index] = true;
    let mut local = Histogram::new();
    local.add(molecule.at(index).symbol());
    let mut nested = Vec::new();
    for partner in molecule.partners(index, BondOrder::Single) {
        if visited[partner] {
            continue;
        }
        let atom = molecule.at(partner);
        if atom.is_main_chain() {
            continue;
        }
        if atom.element().is_carbon() {
            nested.push(render_branch(molecule, partner, visited));
        } else {
            visited[partner] = true;
            local.add(atom.symbol());
        }
    }

    let mut rendered = local.to_string();
    for group in &nested {
        if nested.len() > 1 {
            rendered.push_str(&format!("-({group})"));
        } else {
            rendered.push('-');
            rendered.push_str(group);
        }
    }
    rendered
}

/// Collapses contiguous repeats of a unit into `(unit)k`, shortest unit first.
///
/// Units line up with groups: a unit starts with a single bond or an opening
/// parenthesis, never ends on a bond and keeps its parentheses balanced. A run has to
/// stop at a bond, a parenthesis or the end, so `CH2=C=CH2` is left alone and element
/// symbols and counts are never split. Applying this twice gives the same result as
/// applying it once.
pub fn compress_runs(formula: &str) -> String {
    let mut current: Vec<char> = formula.chars().collect();
    for pass in 0..MAX_COMPRESSION_PASSES {
        let Some(unit) = find_repeating_unit(&current) else {
            break;
        };
        let next = move_bonds_out(&collapse_runs(&current, &unit));
        if next == current {
            break;
        }
        let unit: String = unit.into_iter().collect();
        trace!(pass, %unit, "collapsed repeated unit");
        current = next;
    }
    current.into_iter().collect()
}

fn is_bond(c: char) -> bool {
    matches!(c, '-' | '=' | '≡')
}

fn is_valid_unit(unit: &[char]) -> bool {
    match (unit.first(), unit.last()) {
        (Some('-' | '('), Some(&last)) if !is_bond(last) => {}
        _ => return false,
    }
    let mut depth = 0i32;
    for &c in unit {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn is_group_boundary(chars: &[char], at: usize) -> bool {
    match chars.get(at) {
        Some(&c) => is_bond(c) || c == '(' || c == ')',
        None => true,
    }
}

/// Longest run of back-to-back copies of `unit` at `start` that ends on a group
/// boundary, or 0 when fewer than two copies qualify.
fn run_at(chars: &[char], start: usize, unit: &[char]) -> usize {
    let mut copies = 0;
    while chars.get(start + copies * unit.len()..start + (copies + 1) * unit.len()) == Some(unit)
    {
        copies += 1;
    }
    while copies >= 2 && !is_group_boundary(chars, start + copies * unit.len()) {
        copies -= 1;
    }
    if copies >= 2 {
        copies
    } else {
        0
    }
}

fn find_repeating_unit(chars: &[char]) -> Option<Vec<char>> {
    let n = chars.len();
    for len in 2..=n / 2 {
        for start in 0..=n - 2 * len {
            let unit = &chars[start..start + len];
            if is_valid_unit(unit) && run_at(chars, start, unit) > 0 {
                return Some(unit.to_vec());
            }
        }
    }
    None
}

/// True when the unit is exactly one parenthesised group like `(CH3)`.
fn is_single_group(unit: &[char]) -> bool {
    if unit.first() != Some(&'(') || unit.last() != Some(&')') {
        return false;
    }
    let mut depth = 0;
    for (i, &c) in unit.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && i + 1 < unit.len() {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

fn collapse_runs(chars: &[char], unit: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let copies = run_at(chars, i, unit);
        if copies > 0 {
            if is_single_group(unit) {
                out.extend_from_slice(unit);
            } else {
                out.push('(');
                out.extend_from_slice(unit);
                out.push(')');
            }
            out.extend(copies.to_string().chars());
            i += copies * unit.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// `(-CH2)3` reads better as `-(CH2)3`.
fn move_bonds_out(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        match (chars[i], chars.get(i + 1)) {
            ('(', Some(&bond)) if is_bond(bond) => {
                out.push(bond);
                out.push('(');
                i += 2;
            }
            (c, _) => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

impl Molecule {
    pub fn formula(&self) -> String {
        formula(self)
    }

    pub fn condensed_formula(&self) -> String {
        condensed_formula(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BondSet;

    fn saturate(molecule: &mut Molecule) {
        molecule.mark_skeleton();
        for index in 0..molecule.skeleton_len() {
            while molecule.bond_order_sum(index) < 4 {
                molecule
                    .append_atom("H", &BondSet::single(index), false)
                    .unwrap();
            }
        }
    }

    fn chain(orders: &[BondOrder]) -> Molecule {
        let mut molecule = Molecule::new();
        molecule.append_atom("C", &BondSet::new(), true).unwrap();
        for (i, &order) in orders.iter().enumerate() {
            molecule
                .append_atom("C", &BondSet::new().with(order, i), true)
                .unwrap();
        }
        molecule
    }

    #[test]
    fn test_histogram_puts_carbon_and_hydrogen_first() {
        let histogram: Histogram = ["Cl", "H", "C", "Br", "C", "Cl"].into_iter().collect();
        assert_eq!(histogram.to_string(), "C2HCl2Br");
        assert_eq!(histogram.get("Cl"), 2);
        assert_eq!(histogram.get("F"), 0);
        assert_eq!(histogram.total(), 6);
    }

    #[test]
    fn test_ethyne() {
        let mut molecule = chain(&[BondOrder::Triple]);
        saturate(&mut molecule);
        assert_eq!(formula(&molecule), "C2H2");
        assert_eq!(condensed_formula(&molecule), "CH≡CH");
    }

    #[test]
    fn test_pentane_collapses_middle() {
        let mut molecule = chain(&[BondOrder::Single; 4]);
        saturate(&mut molecule);
        assert_eq!(formula(&molecule), "C5H12");
        assert_eq!(condensed_formula(&molecule), "CH3-(CH2)3-CH3");
    }

    #[test]
    fn test_terminal_methyls_fold_into_branched_carbon() {
        let mut molecule = chain(&[BondOrder::Single; 2]);
        molecule.append_atom("C", &BondSet::single(1), false).unwrap();
        molecule.append_atom("C", &BondSet::single(1), false).unwrap();
        saturate(&mut molecule);
        assert_eq!(formula(&molecule), "C5H12");
        assert_eq!(condensed_formula(&molecule), "C(CH3)4");
    }

    #[test]
    fn test_nested_branches() {
        let mut molecule = chain(&[BondOrder::Single; 2]);
        let ethyl = molecule.append_atom("C", &BondSet::single(1), false).unwrap();
        molecule
            .append_atom("C", &BondSet::single(ethyl), false)
            .unwrap();
        saturate(&mut molecule);
        assert_eq!(condensed_formula(&molecule), "CH3-CH(CH2-CH3)-CH3");
    }

    #[test]
    fn test_compress_rules() {
        assert_eq!(compress_runs("CH3-CH2-CH2-CH3"), "CH3-(CH2)2-CH3");
        assert_eq!(compress_runs("C(CH3)(CH3)"), "C(CH3)2");
        assert_eq!(compress_runs("CCl"), "CCl");
        assert_eq!(compress_runs("CH4"), "CH4");
        assert_eq!(compress_runs(""), "");
    }

    #[test]
    fn test_compress_leaves_cumulenes_alone() {
        assert_eq!(compress_runs("CH2=C=CH2"), "CH2=C=CH2");
        assert_eq!(compress_runs("CH3-CH=C=CH-CH3"), "CH3-CH=C=CH-CH3");
        assert_eq!(compress_runs("CH2=C=C=CH2"), "CH2=C=C=CH2");
    }

    #[test]
    fn test_compress_runs_stop_at_group_boundaries() {
        // the third copy of "-CH(CH3)" runs into the count of the last head
        assert_eq!(
            compress_runs("CH(CH3)(CH3)-CH(CH3)-CH(CH3)-CH(CH3)(CH3)"),
            "CH(CH3)2-(CH(CH3))2-CH(CH3)2"
        );
        assert_eq!(
            compress_runs("CH2=CH-CH2-CH2-CH2-C≡CH"),
            "CH2=CH-(CH2)3-C≡CH"
        );
        assert_eq!(compress_runs("CH2Cl-CH2Cl"), "CH2Cl-CH2Cl");
    }

    #[test]
    fn test_compress_is_idempotent() {
        for input in [
            "CH3-CH2-CH2-CH2-CH3",
            "CH2=CH-CH2-CH2-CH3",
            "CH3-CH(CH3)-CH(CH3)-CH3",
            "CH(CH3)(CH3)(CH3)",
            "CH2Cl-CH2Cl",
        ] {
            let once = compress_runs(input);
            assert_eq!(compress_runs(&once), once, "{input}");
        }
    }

    #[test]
    fn test_novelty_rendering() {
        let molecule = Molecule::novelty();
        assert_eq!(formula(&molecule), "C2");
        assert_eq!(condensed_formula(&molecule), "C≣C");
    }
}
