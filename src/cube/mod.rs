//! Multi-valued cubes and the cube geometry
//!
//! A cube is a bit vector over the *parts* of a problem: each multi-valued
//! variable owns a contiguous range of part indices, and a set bit means
//! "this part is permitted". A cube therefore represents the Cartesian
//! product of, per variable, the subset of parts whose bits are set.
//!
//! The [`CubeGeometry`] describes how parts are grouped into variables and
//! which variable is the output. It is an explicit context object threaded
//! through every operation, so several geometries can coexist in one
//! process.

use std::fmt;

use crate::error::GeometryError;

/// A bit vector over the parts of a cube geometry
///
/// Unused high bits of the last word are kept zero, so word-wise equality
/// and emptiness checks are exact.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cube {
    words: Box<[u64]>,
}

impl Cube {
    const BITS: usize = u64::BITS as usize;

    /// Create an all-zeros cube able to hold `num_parts` parts
    pub fn new_empty(num_parts: usize) -> Self {
        Cube {
            words: vec![0u64; num_parts.div_ceil(Self::BITS)].into_boxed_slice(),
        }
    }

    /// Test whether a part is permitted
    pub fn contains(&self, part: usize) -> bool {
        self.words[part / Self::BITS] >> (part % Self::BITS) & 1 == 1
    }

    /// Permit a part
    pub fn insert(&mut self, part: usize) {
        self.words[part / Self::BITS] |= 1 << (part % Self::BITS);
    }

    /// Forbid a part
    pub fn remove(&mut self, part: usize) {
        self.words[part / Self::BITS] &= !(1 << (part % Self::BITS));
    }

    /// True iff no part is permitted
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of permitted parts
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Forbid every part
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Replace this cube's parts with another's
    pub fn copy_from(&mut self, other: &Cube) {
        debug_assert_eq!(self.words.len(), other.words.len());
        self.words.copy_from_slice(&other.words);
    }

    /// Set union, in place
    pub fn union_with(&mut self, other: &Cube) {
        debug_assert_eq!(self.words.len(), other.words.len());
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w |= o;
        }
    }

    /// Set intersection, in place
    pub fn intersect_with(&mut self, other: &Cube) {
        debug_assert_eq!(self.words.len(), other.words.len());
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w &= o;
        }
    }

    /// Set difference, in place
    pub fn subtract(&mut self, other: &Cube) {
        debug_assert_eq!(self.words.len(), other.words.len());
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w &= !o;
        }
    }

    /// True iff every permitted part of `self` is also permitted in `other`
    pub fn implies(&self, other: &Cube) -> bool {
        debug_assert_eq!(self.words.len(), other.words.len());
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(w, o)| w & !o == 0)
    }

    /// True iff the two cubes share no permitted part
    pub fn disjoint(&self, other: &Cube) -> bool {
        debug_assert_eq!(self.words.len(), other.words.len());
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(w, o)| w & o == 0)
    }

    /// Number of parts permitted by both cubes
    pub fn intersect_count(&self, other: &Cube) -> usize {
        debug_assert_eq!(self.words.len(), other.words.len());
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(w, o)| (w & o).count_ones() as usize)
            .sum()
    }

    /// Add one to `counts[i]` for every permitted part `i`
    pub fn add_part_counts(&self, counts: &mut [usize]) {
        for part in self.ones() {
            counts[part] += 1;
        }
    }

    /// Iterate the permitted parts in ascending order
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..Self::BITS)
                .filter(move |b| word >> b & 1 == 1)
                .map(move |b| i * Self::BITS + b)
        })
    }
}

impl fmt::Debug for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ones()).finish()
    }
}

/// Part layout of a multi-valued cube space
///
/// The geometry records, for each variable, its contiguous part range and a
/// precomputed part mask, plus the all-ones cube and the index of the
/// distinguished output variable. All expansion routines take a geometry by
/// reference; nothing here is mutated after construction.
///
/// # Examples
///
/// ```
/// use espresso_expand::CubeGeometry;
///
/// // Three binary inputs and two outputs: 3 * 2 + 2 = 8 parts.
/// let geom = CubeGeometry::binary(3, 2).unwrap();
/// assert_eq!(geom.num_parts(), 8);
/// assert_eq!(geom.num_vars(), 4);
/// assert_eq!(geom.output_var(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct CubeGeometry {
    size: usize,
    first_part: Vec<usize>,
    last_part: Vec<usize>,
    var_masks: Vec<Cube>,
    fullset: Cube,
    output: usize,
}

impl CubeGeometry {
    /// Create a geometry from explicit per-variable part counts
    ///
    /// `output` names the distinguished output variable.
    pub fn new(parts_per_var: &[usize], output: usize) -> Result<Self, GeometryError> {
        if parts_per_var.is_empty() {
            return Err(GeometryError::NoVariables);
        }
        if output >= parts_per_var.len() {
            return Err(GeometryError::OutputOutOfRange {
                output,
                num_vars: parts_per_var.len(),
            });
        }

        let mut first_part = Vec::with_capacity(parts_per_var.len());
        let mut last_part = Vec::with_capacity(parts_per_var.len());
        let mut size = 0usize;
        for (var, &count) in parts_per_var.iter().enumerate() {
            if count == 0 {
                return Err(GeometryError::EmptyVariable { var });
            }
            first_part.push(size);
            size += count;
            last_part.push(size - 1);
        }

        let mut fullset = Cube::new_empty(size);
        for part in 0..size {
            fullset.insert(part);
        }

        let mut var_masks = Vec::with_capacity(parts_per_var.len());
        for var in 0..parts_per_var.len() {
            let mut mask = Cube::new_empty(size);
            for part in first_part[var]..=last_part[var] {
                mask.insert(part);
            }
            var_masks.push(mask);
        }

        Ok(CubeGeometry {
            size,
            first_part,
            last_part,
            var_masks,
            fullset,
            output,
        })
    }

    /// Create the standard PLA layout: binary input variables (two parts
    /// each) followed by a single multi-valued output variable with one part
    /// per output function
    pub fn binary(num_inputs: usize, num_outputs: usize) -> Result<Self, GeometryError> {
        let mut parts = vec![2; num_inputs];
        parts.push(num_outputs);
        let output = parts.len() - 1;
        Self::new(&parts, output)
    }

    /// Total number of parts
    pub fn num_parts(&self) -> usize {
        self.size
    }

    /// Number of variables (the output variable included)
    pub fn num_vars(&self) -> usize {
        self.first_part.len()
    }

    /// Part index range of a variable
    pub fn var_parts(&self, var: usize) -> std::ops::RangeInclusive<usize> {
        self.first_part[var]..=self.last_part[var]
    }

    /// Mask of all parts of a variable
    pub fn var_mask(&self, var: usize) -> &Cube {
        &self.var_masks[var]
    }

    /// Index of the output variable
    pub fn output_var(&self) -> usize {
        self.output
    }

    /// Mask of all parts of the output variable
    pub fn output_mask(&self) -> &Cube {
        &self.var_masks[self.output]
    }

    /// The all-ones cube
    pub fn fullset(&self) -> &Cube {
        &self.fullset
    }

    /// A fresh all-zeros cube of this geometry's width
    pub fn empty_cube(&self) -> Cube {
        Cube::new_empty(self.size)
    }

    /// A fresh all-ones cube of this geometry's width
    pub fn full_cube(&self) -> Cube {
        self.fullset.clone()
    }

    fn var_intersects(&self, a: &Cube, b: &Cube, var: usize) -> bool {
        self.var_parts(var)
            .any(|part| a.contains(part) && b.contains(part))
    }

    /// Distance-0 test: true iff the cubes intersect in every variable,
    /// i.e. their intersection is a non-empty cube
    pub fn cdist0(&self, a: &Cube, b: &Cube) -> bool {
        (0..self.num_vars()).all(|var| self.var_intersects(a, b, var))
    }

    /// Count the variables separating two cubes, saturating at 2
    ///
    /// Returns 0 when the cubes intersect, 1 when exactly one variable has
    /// an empty intersection, and 2 for two or more.
    pub fn cdist01(&self, a: &Cube, b: &Cube) -> usize {
        let mut dist = 0;
        for var in 0..self.num_vars() {
            if !self.var_intersects(a, b, var) {
                dist += 1;
                if dist == 2 {
                    break;
                }
            }
        }
        dist
    }

    /// Accumulate into `dst` the parts of `off` in every variable where
    /// `off` and `raise` are disjoint
    ///
    /// Those are the parts which can never be raised while keeping the
    /// expansion orthogonal to `off`: once one of them joins the raising
    /// set, the variable no longer separates the two cubes.
    pub fn force_lower(&self, dst: &mut Cube, off: &Cube, raise: &Cube) {
        for var in 0..self.num_vars() {
            if !self.var_intersects(off, raise, var) {
                for part in self.var_parts(var) {
                    if off.contains(part) {
                        dst.insert(part);
                    }
                }
            }
        }
    }

    /// Build a cube from a list of permitted parts
    ///
    /// Convenience for tests and cover construction.
    pub fn cube_from_parts(&self, parts: &[usize]) -> Cube {
        let mut cube = self.empty_cube();
        for &part in parts {
            cube.insert(part);
        }
        cube
    }
}
