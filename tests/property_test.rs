//! Property tests over random truth tables
//!
//! Each case builds a complete truth table over a few binary inputs, puts
//! the ON minterms in `F` and the OFF minterms in `R` (no don't-cares), and
//! checks the expansion invariants: orthogonality, primality, coverage
//! preservation, idempotence, and determinism.

mod common;

use common::{cube_sets, minterm_cube, minterms};
use espresso_expand::{
    cover_cost, expand, make_sparse, Cover, CubeFlags, CubeGeometry,
};
use proptest::prelude::*;

const NUM_INPUTS: usize = 3;
const NUM_OUTPUTS: usize = 2;

/// Split a truth table into ON and OFF covers of minterm cubes
fn covers_from_table(geom: &CubeGeometry, table: &[bool]) -> (Cover, Cover) {
    let mut f = Cover::new();
    let mut r = Cover::new();
    for bits in 0..1usize << NUM_INPUTS {
        let inputs: Vec<bool> = (0..NUM_INPUTS).map(|i| bits >> i & 1 == 1).collect();
        for output in 0..NUM_OUTPUTS {
            let cube = minterm_cube(geom, &inputs, output);
            if table[bits * NUM_OUTPUTS + output] {
                f.push(cube);
            } else {
                r.push(cube);
            }
        }
    }
    (f, r)
}

proptest! {
    #[test]
    fn expansion_invariants(table in proptest::collection::vec(
        any::<bool>(),
        (1 << NUM_INPUTS) * NUM_OUTPUTS,
    )) {
        prop_assume!(table.iter().any(|&on| on));

        let geom = CubeGeometry::binary(NUM_INPUTS, NUM_OUTPUTS).unwrap();
        let (mut f, mut r) = covers_from_table(&geom, &table);
        let (f0, r0) = covers_from_table(&geom, &table);
        let before = minterms(&geom, &f, NUM_INPUTS, NUM_OUTPUTS);

        expand(&geom, &mut f, &mut r, false).unwrap();

        // Orthogonality: no expanded cube touches the OFF-set.
        for fc in f.iter() {
            for rc in r0.iter() {
                prop_assert!(!geom.cdist0(fc.parts(), rc.parts()));
            }
        }

        // Primality: every cube is flagged, and no absent part can be
        // added without hitting the OFF-set.
        for i in 0..f.len() {
            prop_assert!(f.test(i, CubeFlags::PRIME));
            for part in 0..geom.num_parts() {
                if f.cube(i).contains(part) {
                    continue;
                }
                let mut grown = f.cube(i).clone();
                grown.insert(part);
                prop_assert!(
                    r0.iter().any(|rc| geom.cdist0(&grown, rc.parts())),
                    "part {} of cube {:?} is still raisable",
                    part,
                    f.cube(i)
                );
            }
        }

        // Coverage: with no don't-cares, the function is unchanged.
        let after = minterms(&geom, &f, NUM_INPUTS, NUM_OUTPUTS);
        prop_assert_eq!(&before, &after);

        // Idempotence: a second expansion changes nothing.
        let once = cube_sets(&f);
        expand(&geom, &mut f, &mut r, false).unwrap();
        prop_assert_eq!(once, cube_sets(&f));

        // Determinism: a fresh run reproduces the same cover exactly.
        let (mut f2, mut r2) = (f0, r0);
        expand(&geom, &mut f2, &mut r2, false).unwrap();
        let replay: Vec<Vec<usize>> =
            (0..f2.len()).map(|i| f2.cube(i).ones().collect()).collect();
        let original: Vec<Vec<usize>> =
            (0..f.len()).map(|i| f.cube(i).ones().collect()).collect();
        prop_assert_eq!(original, replay);
    }

    #[test]
    fn nonsparse_expansion_fixes_outputs(table in proptest::collection::vec(
        any::<bool>(),
        (1 << NUM_INPUTS) * NUM_OUTPUTS,
    )) {
        prop_assume!(table.iter().any(|&on| on));

        let geom = CubeGeometry::binary(NUM_INPUTS, NUM_OUTPUTS).unwrap();
        let (mut f, mut r) = covers_from_table(&geom, &table);
        let originals: Vec<_> = (0..f.len()).map(|i| f.cube(i).clone()).collect();

        expand(&geom, &mut f, &mut r, true).unwrap();

        // Every surviving cube's output projection matches some input
        // cube's projection that it grew out of.
        for fc in f.iter() {
            let mut out_proj = fc.parts().clone();
            out_proj.intersect_with(geom.output_mask());
            let matches_an_original = originals.iter().any(|orig| {
                let mut orig_proj = orig.clone();
                orig_proj.intersect_with(geom.output_mask());
                orig.implies(fc.parts()) && orig_proj == out_proj
            });
            prop_assert!(matches_an_original);
        }
    }

    #[test]
    fn make_sparse_monotone_and_sound(table in proptest::collection::vec(
        any::<bool>(),
        (1 << NUM_INPUTS) * NUM_OUTPUTS,
    )) {
        prop_assume!(table.iter().any(|&on| on));

        let geom = CubeGeometry::binary(NUM_INPUTS, NUM_OUTPUTS).unwrap();
        let (mut f, mut r) = covers_from_table(&geom, &table);
        // Start from primes, as the cleanup is normally run last.
        expand(&geom, &mut f, &mut r, false).unwrap();

        let d = Cover::new();
        let before_cost = cover_cost(&geom, &f);
        let before_fn = minterms(&geom, &f, NUM_INPUTS, NUM_OUTPUTS);

        make_sparse(&geom, &mut f, &d, &mut r).unwrap();

        let after_cost = cover_cost(&geom, &f);
        let after_fn = minterms(&geom, &f, NUM_INPUTS, NUM_OUTPUTS);
        prop_assert!(after_cost.total <= before_cost.total);
        prop_assert_eq!(before_fn, after_fn);
    }
}
