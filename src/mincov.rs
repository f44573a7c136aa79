//! Unate-cover helpers for the minimum-cover fallback
//!
//! The expansion fallback turns the residual blocking constraint into a
//! unate covering problem: pick a minimum set of parts to keep lowered so
//! that every remaining OFF cube stays separated. These helpers unravel the
//! blocking family into single-output-part rows and solve the covering
//! problem greedily.

use crate::cube::{Cube, CubeGeometry};

/// Split every row with more than one output part into one row per part
///
/// Rows without output parts (or with exactly one) pass through unchanged.
/// After unravelling, a row is satisfiable by a single kept-lowered part,
/// which is what lets the covering formulation treat parts independently.
pub(crate) fn unravel_output(geom: &CubeGeometry, rows: Vec<Cube>) -> Vec<Cube> {
    let output_mask = geom.output_mask();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let output_parts: Vec<usize> =
            row.ones().filter(|&p| output_mask.contains(p)).collect();
        if output_parts.len() <= 1 {
            out.push(row);
        } else {
            for part in output_parts {
                let mut split = row.clone();
                split.subtract(output_mask);
                split.insert(part);
                out.push(split);
            }
        }
    }
    out
}

/// Greedy minimum unate cover of `rows`
///
/// Returns a cube whose parts hit every non-empty row. The pick loop takes
/// the part present in the most uncovered rows (ties to the smallest
/// index), then a reverse pass drops any pick whose rows are all hit by
/// another pick. The result is inclusion-minimal, which the expansion step
/// relies on: a redundant pick would leave a raisable part lowered and the
/// expanded cube would not be prime.
pub(crate) fn minimum_cover(num_parts: usize, rows: &[Cube]) -> Cube {
    let mut chosen: Vec<usize> = Vec::new();
    let mut uncovered: Vec<usize> = (0..rows.len()).filter(|&i| !rows[i].is_empty()).collect();

    while !uncovered.is_empty() {
        let mut counts = vec![0usize; num_parts];
        for &i in &uncovered {
            rows[i].add_part_counts(&mut counts);
        }
        let mut best_part = 0;
        let mut best_count = 0;
        for (part, &count) in counts.iter().enumerate() {
            if count > best_count {
                best_part = part;
                best_count = count;
            }
        }
        chosen.push(best_part);
        uncovered.retain(|&i| !rows[i].contains(best_part));
    }

    // Strip redundant picks, newest first.
    let mut keep = vec![true; chosen.len()];
    for k in (0..chosen.len()).rev() {
        let redundant = rows.iter().filter(|row| !row.is_empty()).all(|row| {
            chosen
                .iter()
                .enumerate()
                .any(|(m, &part)| m != k && keep[m] && row.contains(part))
        });
        if redundant {
            keep[k] = false;
        }
    }

    let mut cover = Cube::new_empty(num_parts);
    for (m, &part) in chosen.iter().enumerate() {
        if keep[m] {
            cover.insert(part);
        }
    }
    cover
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> CubeGeometry {
        CubeGeometry::binary(2, 3).unwrap()
    }

    #[test]
    fn test_unravel_splits_multi_output_rows() {
        let geom = geom();
        // Input part 0 plus output parts 4 and 6.
        let row = geom.cube_from_parts(&[0, 4, 6]);
        let rows = unravel_output(&geom, vec![row]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ones().collect::<Vec<_>>(), vec![0, 4]);
        assert_eq!(rows[1].ones().collect::<Vec<_>>(), vec![0, 6]);
    }

    #[test]
    fn test_unravel_passes_single_output_rows() {
        let geom = geom();
        let a = geom.cube_from_parts(&[0, 4]);
        let b = geom.cube_from_parts(&[0, 2]);
        let rows = unravel_output(&geom, vec![a.clone(), b.clone()]);
        assert_eq!(rows, vec![a, b]);
    }

    #[test]
    fn test_minimum_cover_picks_common_part() {
        let geom = geom();
        let rows = vec![
            geom.cube_from_parts(&[0, 4]),
            geom.cube_from_parts(&[0, 6]),
            geom.cube_from_parts(&[0, 2]),
        ];
        let cover = minimum_cover(geom.num_parts(), &rows);
        assert_eq!(cover.ones().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_minimum_cover_ties_break_to_smallest_index() {
        let geom = geom();
        let rows = vec![geom.cube_from_parts(&[2, 5])];
        let cover = minimum_cover(geom.num_parts(), &rows);
        assert_eq!(cover.ones().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_minimum_cover_strips_redundant_picks() {
        let geom = geom();
        // Greedy picks part 0 first (three rows), then must cover the last
        // two rows; any pick order that ends redundant gets stripped.
        let rows = vec![
            geom.cube_from_parts(&[0, 2]),
            geom.cube_from_parts(&[0, 4]),
            geom.cube_from_parts(&[0, 5]),
            geom.cube_from_parts(&[2, 4]),
            geom.cube_from_parts(&[2, 5]),
        ];
        let cover = minimum_cover(geom.num_parts(), &rows);
        // Every row hit.
        for row in &rows {
            assert!(!cover.disjoint(row));
        }
        // Inclusion-minimal: dropping any chosen part leaves a row unhit.
        let parts: Vec<usize> = cover.ones().collect();
        for &p in &parts {
            let mut smaller = cover.clone();
            smaller.remove(p);
            assert!(
                rows.iter().any(|row| smaller.disjoint(row)),
                "part {} is redundant in {:?}",
                p,
                cover
            );
        }
    }

    #[test]
    fn test_minimum_cover_ignores_empty_rows() {
        let geom = geom();
        let rows = vec![geom.empty_cube(), geom.cube_from_parts(&[3])];
        let cover = minimum_cover(geom.num_parts(), &rows);
        assert_eq!(cover.ones().collect::<Vec<_>>(), vec![3]);
    }
}
