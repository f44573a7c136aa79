//! Covers: ordered collections of flagged cubes
//!
//! A cover is a disjunction of cubes. Each cube carries bookkeeping flags
//! ([`CubeFlags`]) next to its part bits, and the cover caches the number of
//! `ACTIVE` cubes so the expansion loops can test "anything left?" in O(1).
//! Every flip of the `ACTIVE` flag goes through [`Cover::set_active`], which
//! keeps the cache honest.

use log::debug;

use crate::cube::{Cube, CubeGeometry};

/// Per-cube bookkeeping flags
///
/// The flags are independent of the semantic part bits:
/// - `PRIME`: the cube is a prime implicant (or is being expanded and must
///   not absorb itself)
/// - `COVERED`: the cube was absorbed by the expansion of an earlier cube
///   and will be removed on compaction
/// - `ACTIVE`: the cube belongs to the current working sub-selection
/// - `INESSENTIAL`: the cube expanded without absorbing anything and without
///   reaching its over-expanded cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CubeFlags(u8);

impl CubeFlags {
    /// Prime implicant marker
    pub const PRIME: CubeFlags = CubeFlags(1 << 0);
    /// Absorbed by an earlier expansion
    pub const COVERED: CubeFlags = CubeFlags(1 << 1);
    /// Member of the current working sub-selection
    pub const ACTIVE: CubeFlags = CubeFlags(1 << 2);
    /// Expanded to an inessential prime
    pub const INESSENTIAL: CubeFlags = CubeFlags(1 << 3);

    /// Test whether all bits of `other` are set
    pub fn contains(self, other: CubeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    fn insert(&mut self, other: CubeFlags) {
        self.0 |= other.0;
    }

    fn remove(&mut self, other: CubeFlags) {
        self.0 &= !other.0;
    }
}

/// One element of a cover: part bits plus flags
#[derive(Debug, Clone)]
pub struct CoverCube {
    pub(crate) parts: Cube,
    pub(crate) flags: CubeFlags,
}

impl CoverCube {
    /// Part bits of this cube
    pub fn parts(&self) -> &Cube {
        &self.parts
    }

    /// Flags of this cube
    pub fn flags(&self) -> CubeFlags {
        self.flags
    }
}

/// An ordered collection of flagged cubes with a cached active count
#[derive(Debug, Clone, Default)]
pub struct Cover {
    cubes: Vec<CoverCube>,
    active_count: usize,
}

impl Cover {
    /// Create an empty cover
    pub fn new() -> Self {
        Cover::default()
    }

    /// Create an empty cover with room for `n` cubes
    pub fn with_capacity(n: usize) -> Self {
        Cover {
            cubes: Vec::with_capacity(n),
            active_count: 0,
        }
    }

    /// Build a cover from cubes; every cube starts `ACTIVE`
    pub fn from_cubes(cubes: impl IntoIterator<Item = Cube>) -> Self {
        let mut cover = Cover::new();
        for cube in cubes {
            cover.push(cube);
        }
        cover
    }

    /// Append a cube, flagged `ACTIVE`
    pub fn push(&mut self, parts: Cube) {
        self.cubes.push(CoverCube {
            parts,
            flags: CubeFlags::ACTIVE,
        });
        self.active_count += 1;
    }

    /// Number of cubes (active or not)
    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    /// True iff the cover holds no cubes at all
    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Number of `ACTIVE` cubes
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Part bits of cube `i`
    pub fn cube(&self, i: usize) -> &Cube {
        &self.cubes[i].parts
    }

    /// Mutable part bits of cube `i`
    pub fn cube_mut(&mut self, i: usize) -> &mut Cube {
        &mut self.cubes[i].parts
    }

    /// Test a flag on cube `i`
    pub fn test(&self, i: usize, flag: CubeFlags) -> bool {
        self.cubes[i].flags.contains(flag)
    }

    /// True iff cube `i` is `ACTIVE`
    pub fn is_active(&self, i: usize) -> bool {
        self.test(i, CubeFlags::ACTIVE)
    }

    /// Set a non-`ACTIVE` flag on cube `i`
    ///
    /// `ACTIVE` must go through [`set_active`](Self::set_active) so the
    /// cached count stays consistent.
    pub fn set_flag(&mut self, i: usize, flag: CubeFlags) {
        debug_assert!(!flag.contains(CubeFlags::ACTIVE));
        self.cubes[i].flags.insert(flag);
    }

    /// Clear a non-`ACTIVE` flag on cube `i`
    pub fn clear_flag(&mut self, i: usize, flag: CubeFlags) {
        debug_assert!(!flag.contains(CubeFlags::ACTIVE));
        self.cubes[i].flags.remove(flag);
    }

    /// Flip the `ACTIVE` flag on cube `i`, keeping the cached count in step
    pub fn set_active(&mut self, i: usize, active: bool) {
        let was = self.cubes[i].flags.contains(CubeFlags::ACTIVE);
        if active && !was {
            self.cubes[i].flags.insert(CubeFlags::ACTIVE);
            self.active_count += 1;
        } else if !active && was {
            self.cubes[i].flags.remove(CubeFlags::ACTIVE);
            self.active_count -= 1;
        }
    }

    /// Mark every cube `ACTIVE`
    pub fn activate_all(&mut self) {
        for c in &mut self.cubes {
            c.flags.insert(CubeFlags::ACTIVE);
        }
        self.active_count = self.cubes.len();
    }

    /// Mark every cube inactive
    pub fn deactivate_all(&mut self) {
        for c in &mut self.cubes {
            c.flags.remove(CubeFlags::ACTIVE);
        }
        self.active_count = 0;
    }

    /// Recompute the cached active count from the flags
    pub fn recount_active(&mut self) {
        self.active_count = self
            .cubes
            .iter()
            .filter(|c| c.flags.contains(CubeFlags::ACTIVE))
            .count();
    }

    /// Physically remove every inactive cube
    pub fn compact(&mut self) {
        let before = self.cubes.len();
        self.cubes.retain(|c| c.flags.contains(CubeFlags::ACTIVE));
        self.active_count = self.cubes.len();
        if self.cubes.len() != before {
            debug!("compacted cover: {} -> {} cubes", before, self.cubes.len());
        }
    }

    /// Iterate the indices of `ACTIVE` cubes
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cubes.len()).filter(move |&i| self.is_active(i))
    }

    /// Iterate all elements
    pub fn iter(&self) -> impl Iterator<Item = &CoverCube> {
        self.cubes.iter()
    }

    /// Reorder the cubes so that cubes made of rare parts come first
    ///
    /// Each cube is weighted by the summed occurrence counts of its parts
    /// across the whole cover; the sort is stable and ascending, so cubes at
    /// the thinly covered "edges" of the function are expanded before the
    /// cubes buried in dense regions.
    pub fn mini_sort(&mut self, geom: &CubeGeometry) {
        let mut counts = vec![0usize; geom.num_parts()];
        for c in &self.cubes {
            c.parts.add_part_counts(&mut counts);
        }
        self.cubes
            .sort_by_key(|c| c.parts.ones().map(|part| counts[part]).sum::<usize>());
    }
}

/// Literal-count accounting for a cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
    /// Number of cubes
    pub cubes: usize,
    /// Input literals: one per cube per input variable not raised to the
    /// full part mask
    pub input_literals: usize,
    /// Output parts: one per set output bit
    pub output_parts: usize,
    /// Sum of input literals and output parts
    pub total: usize,
}

/// Compute the literal cost of a cover
pub fn cover_cost(geom: &CubeGeometry, cover: &Cover) -> Cost {
    let mut input_literals = 0usize;
    let mut output_parts = 0usize;
    for c in cover.iter() {
        for var in 0..geom.num_vars() {
            if var == geom.output_var() {
                continue;
            }
            let mask = geom.var_mask(var);
            if c.parts.intersect_count(mask) < mask.count_ones() {
                input_literals += 1;
            }
        }
        output_parts += c.parts.intersect_count(geom.output_mask());
    }
    Cost {
        cubes: cover.len(),
        input_literals,
        output_parts,
        total: input_literals + output_parts,
    }
}
