//! Shared helpers for the integration tests
#![allow(dead_code)]

use espresso_expand::{Cover, Cube, CubeGeometry};

/// Build the minterm cube for the given input assignment and output index
/// in a binary geometry
pub fn minterm_cube(geom: &CubeGeometry, inputs: &[bool], output: usize) -> Cube {
    let mut cube = geom.empty_cube();
    for (i, &bit) in inputs.iter().enumerate() {
        cube.insert(2 * i + usize::from(bit));
    }
    cube.insert(2 * inputs.len() + output);
    cube
}

/// Test whether some cube of the cover contains the minterm
pub fn covers_minterm(geom: &CubeGeometry, cover: &Cover, inputs: &[bool], output: usize) -> bool {
    let m = minterm_cube(geom, inputs, output);
    cover.iter().any(|c| m.implies(c.parts()))
}

/// Enumerate every (input assignment, output index) minterm covered by the
/// cover, as a sorted list of (input bits, output) pairs
pub fn minterms(
    geom: &CubeGeometry,
    cover: &Cover,
    num_inputs: usize,
    num_outputs: usize,
) -> Vec<(u32, usize)> {
    let mut out = Vec::new();
    for bits in 0..(1u32 << num_inputs) {
        let inputs: Vec<bool> = (0..num_inputs).map(|i| bits >> i & 1 == 1).collect();
        for output in 0..num_outputs {
            if covers_minterm(geom, cover, &inputs, output) {
                out.push((bits, output));
            }
        }
    }
    out
}

/// Assert that no cube of `f` intersects any cube of `r`
pub fn assert_orthogonal(geom: &CubeGeometry, f: &Cover, r: &Cover) {
    for fc in f.iter() {
        for rc in r.iter() {
            assert!(
                !geom.cdist0(fc.parts(), rc.parts()),
                "cube {:?} intersects OFF cube {:?}",
                fc.parts(),
                rc.parts()
            );
        }
    }
}

/// Assert that every cube of `f` is prime: adding any single absent part
/// makes it intersect some cube of `r`
pub fn assert_primes(geom: &CubeGeometry, f: &Cover, r: &Cover) {
    for fc in f.iter() {
        for part in 0..geom.num_parts() {
            if fc.parts().contains(part) {
                continue;
            }
            let mut grown = fc.parts().clone();
            grown.insert(part);
            let blocked = r.iter().any(|rc| geom.cdist0(&grown, rc.parts()));
            assert!(
                blocked,
                "cube {:?} is not prime: part {} can still be raised",
                fc.parts(),
                part
            );
        }
    }
}

/// Collect the part lists of a cover as a sorted set for comparison
pub fn cube_sets(cover: &Cover) -> Vec<Vec<usize>> {
    let mut sets: Vec<Vec<usize>> = cover.iter().map(|c| c.parts().ones().collect()).collect();
    sets.sort();
    sets
}
