//! Irredundancy marking for covers
//!
//! `mark_irredundant` decides, cube by cube, whether a cover element is
//! covered by the union of the don't-care set and the other kept cubes. The
//! covering oracle is the classic cofactor-and-tautology test: a cube is
//! covered by a cover iff the cover cofactored against the cube is a
//! tautology over the whole space.
//!
//! The marking is greedy and sequential (first kept cube wins), which is
//! enough for the per-output-part cleanup in
//! [`mv_reduce`](crate::sparse::mv_reduce) and fully deterministic.

use crate::cover::Cover;
use crate::cube::{Cube, CubeGeometry};

/// Mark redundant cubes of `f` inactive
///
/// On return, a cube of `f` is `ACTIVE` iff it is kept: a kept cube is not
/// covered by the union of `d` and the other kept cubes. Cubes are examined
/// in cover order, so earlier cubes win ties between mutually redundant
/// cubes.
pub(crate) fn mark_irredundant(geom: &CubeGeometry, f: &mut Cover, d: &Cover) {
    f.activate_all();
    for i in 0..f.len() {
        let others: Vec<&Cube> = f
            .active_indices()
            .filter(|&j| j != i)
            .map(|j| f.cube(j))
            .chain(d.iter().map(|c| c.parts()))
            .collect();
        if cube_is_covered(geom, f.cube(i), &others) {
            f.set_active(i, false);
        }
    }
}

/// Test whether `cube` is covered by the union of `cover`
pub(crate) fn cube_is_covered(geom: &CubeGeometry, cube: &Cube, cover: &[&Cube]) -> bool {
    let cofactored: Vec<Cube> = cover
        .iter()
        .filter_map(|c| cofactor(geom, c, cube))
        .collect();
    is_tautology(geom, &cofactored)
}

/// Cofactor `c` against `against`
///
/// Returns `None` when the cubes do not intersect (the cofactor is empty).
/// Otherwise the result frees every part outside `against`, mapping the
/// subspace of `against` onto the whole space.
pub(crate) fn cofactor(geom: &CubeGeometry, c: &Cube, against: &Cube) -> Option<Cube> {
    if !geom.cdist0(c, against) {
        return None;
    }
    let mut out = geom.full_cube();
    out.subtract(against);
    out.union_with(c);
    Some(out)
}

/// Tautology test over the full cube space
///
/// Recursive single-part Shannon expansion: pick the variable that is
/// constrained in the most cubes, cofactor against each of its parts, and
/// require every branch to be tautological. The unate shortcuts (a full
/// cube present, or a part of some variable appearing in no cube) resolve
/// most branches without recursion.
pub(crate) fn is_tautology(geom: &CubeGeometry, cubes: &[Cube]) -> bool {
    if cubes.is_empty() {
        return false;
    }
    if cubes.iter().any(|c| c == geom.fullset()) {
        return true;
    }

    // A part appearing in no cube leaves its minterms uncovered.
    let mut union = geom.empty_cube();
    for c in cubes {
        union.union_with(c);
    }
    if &union != geom.fullset() {
        return false;
    }

    // Split on the variable constrained in the most cubes.
    let mut split_var = None;
    let mut best_bound = 0usize;
    for var in 0..geom.num_vars() {
        let mask = geom.var_mask(var);
        let full = mask.count_ones();
        let bound = cubes
            .iter()
            .filter(|c| c.intersect_count(mask) < full)
            .count();
        if bound > best_bound {
            best_bound = bound;
            split_var = Some(var);
        }
    }
    let var = match split_var {
        Some(var) => var,
        // Every cube is full in every variable, i.e. every cube is the
        // full cube; handled above.
        None => return true,
    };

    let mask = geom.var_mask(var);
    for part in geom.var_parts(var) {
        let branch: Vec<Cube> = cubes
            .iter()
            .filter(|c| c.contains(part))
            .map(|c| {
                let mut freed = c.clone();
                freed.union_with(mask);
                freed
            })
            .collect();
        if !is_tautology(geom, &branch) {
            return false;
        }
    }
    true
}
