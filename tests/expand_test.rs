//! End-to-end tests for the expansion step
//!
//! Part numbering follows the binary layout throughout: input variable `k`
//! owns parts `2k` (complemented phase) and `2k + 1` (true phase), and the
//! output variable owns the trailing parts.

mod common;

use common::{assert_orthogonal, assert_primes, cube_sets};
use espresso_expand::{expand, Cover, CubeFlags, CubeGeometry, ExpandError};

#[test]
fn test_single_cube_expands_to_prime() {
    let geom = CubeGeometry::binary(2, 2).unwrap();
    // f = x0 x1 driving output part 5.
    let mut f = Cover::from_cubes([geom.cube_from_parts(&[1, 3, 5])]);
    // The OFF-set pins x1 (first cube) and the output part (second cube),
    // leaving only x0 free to drop.
    let mut r = Cover::from_cubes([
        geom.cube_from_parts(&[0, 1, 2, 4, 5]),
        geom.cube_from_parts(&[0, 1, 2, 3, 4]),
    ]);

    expand(&geom, &mut f, &mut r, false).unwrap();

    assert_eq!(f.len(), 1);
    assert_eq!(f.cube(0).ones().collect::<Vec<_>>(), vec![0, 1, 3, 5]);
    assert!(f.test(0, CubeFlags::PRIME));
    // The expansion reached its over-expanded cube, so it is essential.
    assert!(!f.test(0, CubeFlags::INESSENTIAL));
    assert_orthogonal(&geom, &f, &r);
    assert_primes(&geom, &f, &r);
}

#[test]
fn test_expansion_absorbs_neighbor() {
    let geom = CubeGeometry::binary(2, 2).unwrap();
    let c1 = geom.cube_from_parts(&[1, 3, 5]);
    let c2 = geom.cube_from_parts(&[0, 3, 5]);
    let mut f = Cover::from_cubes([c1.clone(), c2.clone()]);
    // x1' must stay off for output part 4.
    let mut r = Cover::from_cubes([geom.cube_from_parts(&[0, 1, 2, 4])]);

    expand(&geom, &mut f, &mut r, false).unwrap();

    // A single prime absorbs both cubes.
    assert_eq!(f.len(), 1);
    assert!(f.test(0, CubeFlags::PRIME));
    assert!(c1.implies(f.cube(0)));
    assert!(c2.implies(f.cube(0)));
    assert_orthogonal(&geom, &f, &r);
    assert_primes(&geom, &f, &r);
}

#[test]
fn test_expand_with_empty_off_set_reaches_universe() {
    let geom = CubeGeometry::binary(2, 1).unwrap();
    let mut f = Cover::from_cubes([
        geom.cube_from_parts(&[1, 3, 4]),
        geom.cube_from_parts(&[0, 3, 4]),
    ]);
    let mut r = Cover::new();

    expand(&geom, &mut f, &mut r, false).unwrap();

    // Nothing blocks anything: one cube, the whole universe.
    assert_eq!(f.len(), 1);
    assert_eq!(f.cube(0), geom.fullset());
    assert!(f.test(0, CubeFlags::PRIME));
}

#[test]
fn test_inessential_prime_is_flagged() {
    let geom = CubeGeometry::binary(3, 2).unwrap();
    // Three ON cubes; the first expands without absorbing either of the
    // others and stops short of its over-expanded cube, so it comes out
    // flagged inessential.
    let c0 = geom.cube_from_parts(&[1, 3, 5, 7]);
    let blocked_a = geom.cube_from_parts(&[0, 2, 4, 6]);
    let blocked_b = geom.cube_from_parts(&[0, 2, 4, 7]);
    let mut f = Cover::from_cubes([c0, blocked_a, blocked_b]);
    let mut r = Cover::from_cubes([geom.cube_from_parts(&[0, 2, 5, 7])]);

    expand(&geom, &mut f, &mut r, false).unwrap();

    assert_eq!(f.len(), 2);
    let sets = cube_sets(&f);
    assert!(sets.contains(&vec![0, 1, 3, 4, 5, 6, 7]));
    assert!(sets.contains(&vec![0, 1, 2, 3, 4, 6, 7]));

    for i in 0..f.len() {
        assert!(f.test(i, CubeFlags::PRIME));
        let parts: Vec<usize> = f.cube(i).ones().collect();
        let expect_inessential = parts == vec![0, 1, 3, 4, 5, 6, 7];
        assert_eq!(f.test(i, CubeFlags::INESSENTIAL), expect_inessential);
    }
    assert_orthogonal(&geom, &f, &r);
    assert_primes(&geom, &f, &r);
}

#[test]
fn test_overlapping_on_and_off_sets_are_fatal() {
    let geom = CubeGeometry::binary(1, 1).unwrap();
    let cube = geom.cube_from_parts(&[1, 2]);
    let mut f = Cover::from_cubes([cube.clone()]);
    let mut r = Cover::from_cubes([cube]);

    assert_eq!(
        expand(&geom, &mut f, &mut r, false),
        Err(ExpandError::NotOrthogonal)
    );
}

#[test]
fn test_nonsparse_leaves_output_projection_untouched() {
    let geom = CubeGeometry::binary(2, 2).unwrap();
    let mut f = Cover::from_cubes([geom.cube_from_parts(&[1, 3, 5])]);
    let mut r = Cover::from_cubes([geom.cube_from_parts(&[0, 2, 3, 4])]);

    expand(&geom, &mut f, &mut r, true).unwrap();

    assert_eq!(f.len(), 1);
    // Both input variables were raised; the output projection is exactly
    // the input cube's.
    assert_eq!(f.cube(0).ones().collect::<Vec<_>>(), vec![0, 1, 2, 3, 5]);
    let mut output_projection = f.cube(0).clone();
    output_projection.intersect_with(geom.output_mask());
    assert_eq!(output_projection.ones().collect::<Vec<_>>(), vec![5]);
    assert!(f.test(0, CubeFlags::PRIME));
}

#[test]
fn test_minimum_cover_size_guard_falls_back_to_heuristic() {
    // A single OFF cube whose force-lower row holds 550 output parts: the
    // unravelled covering problem would exceed the 500-row limit, so the
    // heuristic branch must run (and raise the smallest free part first).
    let geom = CubeGeometry::binary(1, 1000).unwrap();

    let mut f_parts: Vec<usize> = vec![1];
    f_parts.extend(2..402);
    let mut r_parts: Vec<usize> = vec![0];
    r_parts.extend(452..1002);
    let mut f = Cover::from_cubes([geom.cube_from_parts(&f_parts)]);
    let mut r = Cover::from_cubes([geom.cube_from_parts(&r_parts)]);

    expand(&geom, &mut f, &mut r, false).unwrap();

    assert_eq!(f.len(), 1);
    let mut expected: Vec<usize> = vec![0, 1];
    expected.extend(2..452);
    expected.sort_unstable();
    assert_eq!(f.cube(0).ones().collect::<Vec<_>>(), expected);
    assert!(f.test(0, CubeFlags::PRIME));
    assert_orthogonal(&geom, &f, &r);
    assert_primes(&geom, &f, &r);
}

#[test]
fn test_expansion_is_deterministic() {
    let geom = CubeGeometry::binary(3, 2).unwrap();
    let f_cubes = [
        geom.cube_from_parts(&[1, 3, 5, 7]),
        geom.cube_from_parts(&[0, 2, 4, 6]),
        geom.cube_from_parts(&[0, 2, 4, 7]),
        geom.cube_from_parts(&[1, 2, 5, 6]),
    ];
    let r_cubes = [
        geom.cube_from_parts(&[0, 2, 5, 7]),
        geom.cube_from_parts(&[1, 3, 4, 6]),
    ];

    let mut f1 = Cover::from_cubes(f_cubes.clone());
    let mut r1 = Cover::from_cubes(r_cubes.clone());
    expand(&geom, &mut f1, &mut r1, false).unwrap();

    let mut f2 = Cover::from_cubes(f_cubes);
    let mut r2 = Cover::from_cubes(r_cubes);
    expand(&geom, &mut f2, &mut r2, false).unwrap();

    let first: Vec<Vec<usize>> = (0..f1.len()).map(|i| f1.cube(i).ones().collect()).collect();
    let second: Vec<Vec<usize>> = (0..f2.len()).map(|i| f2.cube(i).ones().collect()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_expansion_is_idempotent() {
    let geom = CubeGeometry::binary(3, 2).unwrap();
    let mut f = Cover::from_cubes([
        geom.cube_from_parts(&[1, 3, 5, 7]),
        geom.cube_from_parts(&[0, 2, 4, 6]),
        geom.cube_from_parts(&[0, 2, 4, 7]),
    ]);
    let mut r = Cover::from_cubes([geom.cube_from_parts(&[0, 2, 5, 7])]);

    expand(&geom, &mut f, &mut r, false).unwrap();
    let once = cube_sets(&f);

    expand(&geom, &mut f, &mut r, false).unwrap();
    let twice = cube_sets(&f);

    assert_eq!(once, twice);
}
