//! The live virtual→physical qubit mapping: a bijection array updated in place as SWAPs are inserted,
//! replacing ad-hoc mutation through shared qubit objects.

use rustc_hash::FxHashMap;

use crate::qubit::QubitIndex;

/// `virt_to_phys: [Q]int`, installed by a mapper and updated in place by a
/// router. Also tracks the inverse so routers can ask "which virtual qubit
/// currently sits at physical position p" in O(1).
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    virt_to_phys: Vec<u32>,
    phys_to_virt: FxHashMap<u32, QubitIndex>,
}

impl Mapping {
    /// `f(i) = i`: the identity mapping (requires `Q ≤ P`).
    pub fn trivial(num_logical: u32) -> Self {
        let virt_to_phys: Vec<u32> = (0..num_logical).collect();
        let phys_to_virt = virt_to_phys
            .iter()
            .enumerate()
            .map(|(v, &p)| (p, QubitIndex(v as u32)))
            .collect();
        Mapping { virt_to_phys, phys_to_virt }
    }

    /// Builds a mapping from caller-supplied data (the `Hardcoded` mapper).
    pub fn from_assignment(virt_to_phys: Vec<u32>) -> Self {
        let phys_to_virt = virt_to_phys
            .iter()
            .enumerate()
            .map(|(v, &p)| (p, QubitIndex(v as u32)))
            .collect();
        Mapping { virt_to_phys, phys_to_virt }
    }

    pub fn num_logical(&self) -> u32 {
        self.virt_to_phys.len() as u32
    }

    pub fn physical_of(&self, virt: QubitIndex) -> u32 {
        self.virt_to_phys[virt.index()]
    }

    pub fn virtual_at(&self, phys: u32) -> Option<QubitIndex> {
        self.phys_to_virt.get(&phys).copied()
    }

    /// Swaps the virtual qubits currently assigned to physical positions
    /// `p1` and `p2`, as emitted by a router's SWAP insertion.
    pub fn swap_physical(&mut self, p1: u32, p2: u32) {
        let v1 = self.phys_to_virt.get(&p1).copied();
        let v2 = self.phys_to_virt.get(&p2).copied();
        if let Some(v1) = v1 {
            self.virt_to_phys[v1.index()] = p2;
            self.phys_to_virt.insert(p2, v1);
        } else {
            self.phys_to_virt.remove(&p2);
        }
        if let Some(v2) = v2 {
            self.virt_to_phys[v2.index()] = p1;
            self.phys_to_virt.insert(p1, v2);
        } else {
            self.phys_to_virt.remove(&p1);
        }
    }

    /// Closure form handed to `Statement::map_qubits`/`Gate::map_operands`.
    pub fn as_fn(&self) -> impl Fn(QubitIndex) -> QubitIndex + '_ {
        move |virt| QubitIndex(self.physical_of(virt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_mapping_is_identity() {
        let m = Mapping::trivial(3);
        assert_eq!(m.physical_of(QubitIndex(0)), 0);
        assert_eq!(m.physical_of(QubitIndex(2)), 2);
    }

    #[test]
    fn swap_physical_updates_both_directions() {
        let mut m = Mapping::trivial(3);
        m.swap_physical(0, 1);
        assert_eq!(m.physical_of(QubitIndex(0)), 1);
        assert_eq!(m.physical_of(QubitIndex(1)), 0);
        assert_eq!(m.virtual_at(1), Some(QubitIndex(0)));
        assert_eq!(m.virtual_at(0), Some(QubitIndex(1)));
    }

    #[test]
    fn double_swap_is_identity() {
        let mut m = Mapping::trivial(4);
        m.swap_physical(1, 2);
        m.swap_physical(1, 2);
        assert_eq!(m, Mapping::trivial(4));
    }
}
