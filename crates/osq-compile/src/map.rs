//! Initial virtual-to-physical qubit mapping.

use rand::seq::SliceRandom;
use rand::SeedableRng;

use osq_ir::{IrError, IrResult, Mapper, Mapping};

/// `f(i) = i`: the identity mapping. Requires at least as many physical
/// qubits as logical ones.
pub struct IdentityMapper;

impl Mapper for IdentityMapper {
    fn initial_mapping(&self, num_logical: u32, num_physical: u32) -> IrResult<Mapping> {
        if num_logical > num_physical {
            return Err(IrError::Domain(format!(
                "identity mapping needs at least {num_logical} physical qubits, got {num_physical}"
            )));
        }
        Ok(Mapping::trivial(num_logical))
    }
}

/// A caller-provided virtual→physical assignment.
pub struct HardcodedMapper {
    pub virt_to_phys: Vec<u32>,
}

impl HardcodedMapper {
    pub fn new(virt_to_phys: Vec<u32>) -> Self {
        HardcodedMapper { virt_to_phys }
    }
}

impl Mapper for HardcodedMapper {
    fn initial_mapping(&self, num_logical: u32, num_physical: u32) -> IrResult<Mapping> {
        if self.virt_to_phys.len() != num_logical as usize {
            return Err(IrError::Domain(format!(
                "hardcoded mapping has {} entries, expected {num_logical}",
                self.virt_to_phys.len()
            )));
        }
        if self.virt_to_phys.iter().any(|&p| p >= num_physical) {
            return Err(IrError::Domain(
                "hardcoded mapping assigns a physical qubit outside the device".into(),
            ));
        }
        Ok(Mapping::from_assignment(self.virt_to_phys.clone()))
    }
}

/// A uniformly random permutation of the physical qubits, optionally seeded
/// for reproducibility.
pub struct RandomMapper {
    pub seed: Option<u64>,
}

impl RandomMapper {
    pub fn new() -> Self {
        RandomMapper { seed: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomMapper { seed: Some(seed) }
    }
}

impl Default for RandomMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper for RandomMapper {
    fn initial_mapping(&self, num_logical: u32, num_physical: u32) -> IrResult<Mapping> {
        if num_logical > num_physical {
            return Err(IrError::Domain(format!(
                "random mapping needs at least {num_logical} physical qubits, got {num_physical}"
            )));
        }
        let mut physical: Vec<u32> = (0..num_physical).collect();
        match self.seed {
            Some(seed) => {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                physical.shuffle(&mut rng);
            }
            None => {
                let mut rng = rand::thread_rng();
                physical.shuffle(&mut rng);
            }
        }
        physical.truncate(num_logical as usize);
        Ok(Mapping::from_assignment(physical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mapper_maps_each_qubit_to_itself() {
        let mapping = IdentityMapper.initial_mapping(3, 5).unwrap();
        assert_eq!(mapping.physical_of(0u32.into()), 0);
        assert_eq!(mapping.physical_of(2u32.into()), 2);
    }

    #[test]
    fn identity_mapper_rejects_insufficient_physical_qubits() {
        assert!(IdentityMapper.initial_mapping(5, 3).is_err());
    }

    #[test]
    fn hardcoded_mapper_uses_the_given_assignment() {
        let mapper = HardcodedMapper::new(vec![2, 0, 1]);
        let mapping = mapper.initial_mapping(3, 3).unwrap();
        assert_eq!(mapping.physical_of(0u32.into()), 2);
        assert_eq!(mapping.physical_of(1u32.into()), 0);
    }

    #[test]
    fn random_mapper_is_reproducible_with_a_fixed_seed() {
        let a = RandomMapper::with_seed(42).initial_mapping(4, 8).unwrap();
        let b = RandomMapper::with_seed(42).initial_mapping(4, 8).unwrap();
        for v in 0..4u32 {
            assert_eq!(a.physical_of(v.into()), b.physical_of(v.into()));
        }
    }

    #[test]
    fn random_mapper_produces_a_permutation_of_distinct_physical_qubits() {
        let mapping = RandomMapper::with_seed(7).initial_mapping(4, 4).unwrap();
        let mut assigned: Vec<u32> = (0..4u32).map(|v| mapping.physical_of(v.into())).collect();
        assigned.sort();
        assert_eq!(assigned, vec![0, 1, 2, 3]);
    }
}
