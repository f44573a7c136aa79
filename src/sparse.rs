//! Sparse-variable cleanup: trade output parts against input literals
//!
//! `make_sparse` is a last-step cleanup that lowers the total literal count
//! of a cover. It alternates two passes until neither improves the cost:
//! [`mv_reduce`] strips redundant output parts (per output part, a cube
//! that is not needed for that output loses the part), and a restricted
//! [`expand`](crate::expand::expand) re-grows the input parts with the
//! output variable frozen.

use log::debug;

use crate::cover::{cover_cost, Cover, CubeFlags};
use crate::cube::CubeGeometry;
use crate::error::ExpandError;
use crate::expand::expand;
use crate::irredundant::mark_irredundant;

/// Alternate output reduction and non-sparse expansion to a cost fixpoint
///
/// `d` is the don't-care set consulted by the irredundancy marking, `r` the
/// OFF-set for the re-expansion. The cost is recomputed after every pass
/// and compared against the best seen so far; the loop terminates as soon
/// as a pass fails to improve it, so the result never costs more than the
/// input.
pub fn make_sparse(
    geom: &CubeGeometry,
    f: &mut Cover,
    d: &Cover,
    r: &mut Cover,
) -> Result<(), ExpandError> {
    let mut best_cost = cover_cost(geom, f);
    debug!("make_sparse: initial cost {}", best_cost.total);

    loop {
        mv_reduce(geom, f, d);
        let cost = cover_cost(geom, f);
        if cost.total >= best_cost.total {
            break;
        }
        best_cost = cost;

        expand(geom, f, r, true)?;
        let cost = cover_cost(geom, f);
        if cost.total >= best_cost.total {
            break;
        }
        best_cost = cost;
    }

    debug!("make_sparse: final cost {}", cover_cost(geom, f).total);
    Ok(())
}

/// Reduce the output variable of every cube to its essential parts
///
/// For each part `i` of the output variable, the cover is cofactored by
/// restricting the output to `i`, the cofactor is marked for irredundancy,
/// and every cube found redundant there loses part `i` (and its `PRIME`
/// flag, since a reduced cube is no longer prime). Cubes whose output
/// variable empties out vanish from the cover.
pub fn mv_reduce(geom: &CubeGeometry, f: &mut Cover, d: &Cover) {
    let output_mask = geom.output_mask();

    for i in geom.var_parts(geom.output_var()) {
        // Cofactor F against output part i, remembering the originals.
        let mut f1 = Cover::with_capacity(f.len());
        let mut origin = Vec::with_capacity(f.len());
        for j in 0..f.len() {
            if f.cube(j).contains(i) {
                let mut p1 = f.cube(j).clone();
                p1.subtract(output_mask);
                p1.insert(i);
                f1.push(p1);
                origin.push(j);
            }
        }

        let mut d1 = Cover::with_capacity(d.len());
        for c in d.iter() {
            if c.parts().contains(i) {
                let mut p1 = c.parts().clone();
                p1.subtract(output_mask);
                p1.insert(i);
                d1.push(p1);
            }
        }

        mark_irredundant(geom, &mut f1, &d1);

        // Cubes redundant for this output lose the part.
        for (k, &j) in origin.iter().enumerate() {
            if !f1.is_active(k) {
                f.cube_mut(j).remove(i);
                f.clear_flag(j, CubeFlags::PRIME);
            }
        }
    }

    // Drop cubes whose output variable became empty.
    f.activate_all();
    let mut changed = false;
    for j in 0..f.len() {
        if f.cube(j).disjoint(output_mask) {
            f.set_active(j, false);
            changed = true;
        }
    }
    if changed {
        f.compact();
    }
}
