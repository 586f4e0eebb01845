use crate::{Element, Histogram, ParseError};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;
use tracing::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
}

impl BondOrder {
    pub const ALL: [BondOrder; 3] = [BondOrder::Single, BondOrder::Double, BondOrder::Triple];

    /// How many valence slots the bond takes up on each endpoint.
    pub fn order(self) -> u32 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    /// The separator used between chain carbons in a condensed formula.
    pub fn symbol(self) -> char {
        match self {
            BondOrder::Single => '-',
            BondOrder::Double => '=',
            BondOrder::Triple => '≡',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    element: &'static Element,
    main_chain: bool,
}

impl Atom {
    pub fn element(&self) -> &'static Element {
        self.element
    }

    pub fn symbol(&self) -> &'static str {
        self.element.symbol()
    }

    pub fn is_main_chain(&self) -> bool {
        self.main_chain
    }
}

pub type MoleculeGraph = UnGraph<Atom, BondOrder>;

/// The partners a new atom bonds to, grouped by bond order.
///
/// A partner listed twice contributes twice to both endpoints' bond sums.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondSet {
    single: Vec<usize>,
    double: Vec<usize>,
    triple: Vec<usize>,
}

impl BondSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(partner: usize) -> Self {
        Self::new().with(BondOrder::Single, partner)
    }

    pub fn with(mut self, order: BondOrder, partner: usize) -> Self {
        match order {
            BondOrder::Single => self.single.push(partner),
            BondOrder::Double => self.double.push(partner),
            BondOrder::Triple => self.triple.push(partner),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.double.is_empty() && self.triple.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
        let single = self.single.iter().map(|&p| (p, BondOrder::Single));
        let double = self.double.iter().map(|&p| (p, BondOrder::Double));
        let triple = self.triple.iter().map(|&p| (p, BondOrder::Triple));
        single.chain(double).chain(triple)
    }
}

/// Where an alkyl branch ended up. `anchor` differs from `locant - 1` when the
/// requested carbon was already full and the branch moved one carbon along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    pub locant: usize,
    pub anchor: usize,
    pub length: usize,
}

/// An atom-bond graph grown one atom at a time.
///
/// Atoms are identified by their insertion index and are never removed. Every bond is
/// stored once as an undirected edge, so both endpoints see it and its order is
/// counted against both valences.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    graph: MoleculeGraph,
    skeleton: usize,
    branches: Vec<Branch>,
    novelty: bool,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder returned for the joke "-une" names. It is never validated.
    pub(crate) fn novelty() -> Self {
        let carbon = Atom {
            element: crate::CARBON,
            main_chain: true,
        };
        let mut graph = MoleculeGraph::default();
        let a = graph.add_node(carbon);
        let b = graph.add_node(carbon);
        graph.add_edge(a, b, BondOrder::Triple);
        Self {
            graph,
            skeleton: 0,
            branches: Vec::new(),
            novelty: true,
        }
    }

    pub fn is_novelty(&self) -> bool {
        self.novelty
    }

    pub fn graph(&self) -> &MoleculeGraph {
        &self.graph
    }

    /// Adds an atom bonded to already-present partners and returns its index.
    ///
    /// Either every bond is formed or nothing changes: all partners and the new atom
    /// itself are checked against their valences before the graph is touched.
    pub fn append_atom(
        &mut self,
        symbol: &str,
        bonds: &BondSet,
        main_chain: bool,
    ) -> Result<usize, ParseError> {
        let element = Element::from_symbol(symbol).ok_or_else(|| ParseError::UnknownElement {
            symbol: symbol.to_string(),
        })?;
        let index = self.atom_count();

        let mut load: BTreeMap<usize, u32> = BTreeMap::new();
        for (partner, order) in bonds.iter() {
            if partner >= index {
                return Err(ParseError::MissingAtom { index: partner });
            }
            *load.entry(partner).or_default() += order.order();
        }

        let own: u32 = load.values().sum();
        if own > u32::from(element.valence()) {
            return Err(ParseError::ValenceExceeded {
                element: element.symbol().to_string(),
                position: index,
                valence: element.valence(),
            });
        }
        for (&partner, &extra) in &load {
            let existing = self.at(partner).element;
            if self.bond_order_sum(partner) + extra > u32::from(existing.valence()) {
                return Err(ParseError::ValenceExceeded {
                    element: existing.symbol().to_string(),
                    position: partner,
                    valence: existing.valence(),
                });
            }
        }

        let node = self.graph.add_node(Atom { element, main_chain });
        for (partner, order) in bonds.iter() {
            self.graph.add_edge(NodeIndex::new(partner), node, order);
        }
        trace!(symbol, index, main_chain, "appended atom");
        Ok(node.index())
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.graph.node_weight(NodeIndex::new(index))
    }

    pub fn atoms(&self) -> impl Iterator<Item = (usize, &Atom)> + '_ {
        self.graph
            .node_indices()
            .map(move |node| (node.index(), &self.graph[node]))
    }

    pub(crate) fn at(&self, index: usize) -> &Atom {
        &self.graph[NodeIndex::new(index)]
    }

    /// Every bond touching `index` as `(partner, order)`, oldest bond first.
    pub fn neighbors(&self, index: usize) -> Vec<(usize, BondOrder)> {
        let node = NodeIndex::new(index);
        if node.index() >= self.atom_count() {
            return Vec::new();
        }
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .map(|edge| {
                let other = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                (edge.id(), other.index(), *edge.weight())
            })
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges
            .into_iter()
            .map(|(_, other, order)| (other, order))
            .collect()
    }

    /// Partners bonded to `index` with the given order, in insertion order.
    pub fn partners(&self, index: usize, order: BondOrder) -> Vec<usize> {
        self.neighbors(index)
            .into_iter()
            .filter(|(_, o)| *o == order)
            .map(|(partner, _)| partner)
            .collect()
    }

    pub fn bond_order_sum(&self, index: usize) -> u32 {
        self.neighbors(index)
            .iter()
            .map(|(_, order)| order.order())
            .sum()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<BondOrder> {
        self.neighbors(a)
            .into_iter()
            .find(|(partner, _)| *partner == b)
            .map(|(_, order)| order)
    }

    /// Number of atoms of each element, in formula order.
    pub fn element_counts(&self) -> Histogram {
        self.atoms().map(|(_, atom)| atom.symbol()).collect()
    }

    /// The carbons of the main chain and its alkyl branches. Hydrogens and halogens
    /// added during saturation come after these.
    pub fn skeleton_len(&self) -> usize {
        self.skeleton
    }

    pub fn is_skeleton(&self, index: usize) -> bool {
        index < self.skeleton
    }

    pub(crate) fn mark_skeleton(&mut self) {
        self.skeleton = self.atom_count();
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub(crate) fn record_branch(&mut self, branch: Branch) {
        self.branches.push(branch);
    }

    /// Checks that every skeleton atom is exactly saturated and every other atom has
    /// at least one bond without exceeding its valence.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.novelty {
            return Ok(());
        }
        for (index, atom) in self.atoms() {
            let bonds = self.bond_order_sum(index);
            let valence = atom.element().valence();
            let saturated = if self.is_skeleton(index) {
                bonds == u32::from(valence)
            } else {
                bonds >= 1 && bonds <= u32::from(valence)
            };
            if !saturated {
                return Err(ParseError::ValenceMismatch {
                    element: atom.symbol().to_string(),
                    position: index,
                    bonds,
                    valence,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethyne() -> Molecule {
        let mut molecule = Molecule::new();
        molecule.append_atom("C", &BondSet::new(), true).unwrap();
        molecule
            .append_atom("C", &BondSet::new().with(BondOrder::Triple, 0), true)
            .unwrap();
        molecule
    }

    #[test]
    fn test_append_reports_index_and_both_sides_see_bond() {
        let molecule = ethyne();
        assert_eq!(molecule.atom_count(), 2);
        assert_eq!(molecule.partners(0, BondOrder::Triple), vec![1]);
        assert_eq!(molecule.partners(1, BondOrder::Triple), vec![0]);
        assert_eq!(molecule.bond_order_sum(0), 3);
        assert_eq!(molecule.bond_between(1, 0), Some(BondOrder::Triple));
        assert_eq!(molecule.bond_between(0, 0), None);
    }

    #[test]
    fn test_failed_append_leaves_graph_untouched() {
        let mut molecule = ethyne();
        let err = molecule
            .append_atom("C", &BondSet::new().with(BondOrder::Double, 1), true)
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::ValenceExceeded {
                element: "C".to_string(),
                position: 1,
                valence: 4,
            }
        );
        assert_eq!(molecule.atom_count(), 2);
        assert_eq!(molecule.bond_order_sum(1), 3);
    }

    #[test]
    fn test_repeated_partner_counts_twice() {
        let mut molecule = ethyne();
        let bonds = BondSet::single(0).with(BondOrder::Single, 0);
        assert!(matches!(
            molecule.append_atom("H", &bonds, false),
            Err(ParseError::ValenceExceeded { position: 2, .. })
        ));
        assert_eq!(molecule.atom_count(), 2);
    }

    #[test]
    fn test_missing_partner_and_unknown_element() {
        let mut molecule = Molecule::new();
        assert_eq!(
            molecule.append_atom("C", &BondSet::single(0), true),
            Err(ParseError::MissingAtom { index: 0 })
        );
        assert!(matches!(
            molecule.append_atom("Xx", &BondSet::new(), true),
            Err(ParseError::UnknownElement { .. })
        ));
        assert_eq!(molecule.atom_count(), 0);
    }

    #[test]
    fn test_partners_keep_insertion_order() {
        let mut molecule = Molecule::new();
        molecule.append_atom("C", &BondSet::new(), true).unwrap();
        for _ in 0..3 {
            molecule.append_atom("H", &BondSet::single(0), false).unwrap();
        }
        molecule.append_atom("Cl", &BondSet::single(0), false).unwrap();
        assert_eq!(molecule.partners(0, BondOrder::Single), vec![1, 2, 3, 4]);
        assert_eq!(molecule.neighbors(4), vec![(0, BondOrder::Single)]);
    }

    #[test]
    fn test_validate_checks_skeleton_saturation() {
        let mut molecule = ethyne();
        molecule.mark_skeleton();
        assert!(matches!(
            molecule.validate(),
            Err(ParseError::ValenceMismatch {
                position: 0,
                bonds: 3,
                valence: 4,
                ..
            })
        ));
        molecule.append_atom("H", &BondSet::single(0), false).unwrap();
        molecule.append_atom("H", &BondSet::single(1), false).unwrap();
        assert_eq!(molecule.validate(), Ok(()));
    }

    #[test]
    fn test_novelty_placeholder_skips_validation() {
        let molecule = Molecule::novelty();
        assert!(molecule.is_novelty());
        assert_eq!(molecule.bond_between(0, 1), Some(BondOrder::Triple));
        assert_eq!(molecule.validate(), Ok(()));
    }
}
