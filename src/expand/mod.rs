//! The expansion step: grow each non-prime cube into a prime implicant
//!
//! Expansion works against an explicit OFF-set. For the cube being
//! expanded, parts move between three disjoint sets: the *raising* set
//! (parts committed to the expanded cube), the *free* set (parts not yet
//! decided), and the lowered parts (everything else, permanently excluded).
//! Absorbing another ON cube means raising all of its parts at once, which
//! is worthwhile exactly when the result stays orthogonal to the OFF-set.
//!
//! The strategies are tried in a fixed order for every cube:
//!
//! 1. essential lowering/raising: parts forced out by distance-1 OFF cubes,
//!    parts no OFF cube blocks,
//! 2. greedy absorption of feasibly covered ON cubes with a one-level
//!    lookahead score,
//! 3. the most-frequent-part heuristic once no full cover is feasible,
//! 4. a minimum unate cover over the residual blocking family, guarded by
//!    an unravelling size limit with a most-frequent fallback.

use log::{debug, trace};

use crate::cover::{Cover, CubeFlags};
use crate::cube::{Cube, CubeGeometry};
use crate::error::ExpandError;
#[cfg(not(feature = "random-mincov"))]
use crate::mincov::{minimum_cover, unravel_output};

/// Unravelled-row limit above which the covering formulation is abandoned
/// for the heuristic branch
#[cfg(not(feature = "random-mincov"))]
const UNRAVEL_LIMIT: usize = 500;

/// Expand each non-prime cube of `f` into a prime implicant
///
/// `r` is the OFF-set; the two covers must be orthogonal. Cubes absorbed
/// along the way are removed, and every cube of the result carries the
/// `PRIME` flag. With `nonsparse` set, the output variable is frozen: its
/// parts are committed to the lowering set before each expansion, so every
/// cube keeps its input projection growth but leaves the output parts
/// untouched.
///
/// On error the cover is left in an unspecified (but memory-safe) state.
///
/// # Examples
///
/// ```
/// use espresso_expand::{expand, Cover, CubeGeometry};
///
/// let geom = CubeGeometry::binary(1, 1).unwrap();
/// // f = x0', r is empty: the cube expands to the universe.
/// let mut f = Cover::from_cubes([geom.cube_from_parts(&[0, 2])]);
/// let mut r = Cover::new();
/// expand(&geom, &mut f, &mut r, false).unwrap();
/// assert_eq!(f.cube(0), geom.fullset());
/// ```
pub fn expand(
    geom: &CubeGeometry,
    f: &mut Cover,
    r: &mut Cover,
    nonsparse: bool,
) -> Result<(), ExpandError> {
    // Order the cubes so the ones chewing at the edges of the function are
    // expanded first; they have the most room to grow.
    f.mini_sort(geom);

    // Freezing the output variable realizes the non-sparse mode.
    let mut init_lower = geom.empty_cube();
    if nonsparse {
        init_lower.union_with(geom.output_mask());
    }

    for i in 0..f.len() {
        f.clear_flag(i, CubeFlags::COVERED);
        f.clear_flag(i, CubeFlags::INESSENTIAL);
    }

    for i in 0..f.len() {
        // Earlier expansions may have covered this cube in the meantime.
        if !f.test(i, CubeFlags::PRIME) && !f.test(i, CubeFlags::COVERED) {
            expand_cube(geom, r, f, &init_lower, i)?;
        }
    }

    let mut changed = false;
    for i in 0..f.len() {
        let covered = f.test(i, CubeFlags::COVERED);
        f.set_active(i, !covered);
        if covered {
            changed = true;
        }
    }
    if changed {
        f.compact();
    }
    debug!("expand: {} primes", f.len());
    Ok(())
}

/// Expand the single cube `cc[idx]` against the OFF-set `bb`
///
/// `cc` doubles as the pool of absorption candidates; cubes it absorbs are
/// flagged `COVERED` so the caller skips them.
fn expand_cube(
    geom: &CubeGeometry,
    bb: &mut Cover,
    cc: &mut Cover,
    init_lower: &Cube,
    idx: usize,
) -> Result<(), ExpandError> {
    // Prime immediately so the cube cannot absorb itself.
    cc.set_flag(idx, CubeFlags::PRIME);

    bb.activate_all();
    for j in 0..cc.len() {
        let excluded = cc.test(j, CubeFlags::COVERED) || cc.test(j, CubeFlags::PRIME);
        cc.set_active(j, !excluded);
    }

    let mut x = Expansion::new(geom, cc.cube(idx).clone());

    // Parts pre-committed to the lowering set shrink both families up
    // front.
    if !init_lower.is_empty() {
        x.free.subtract(init_lower);
        x.eliminate_lowered(bb, Some(&mut *cc));
    }

    x.essential_parts(bb, Some(&mut *cc))?;
    x.overexpanded.copy_from(&x.raise);
    x.overexpanded.union_with(&x.free);

    if cc.active_count() > 0 {
        x.select_feasible(bb, cc)?;
    }

    // No feasible cover remains, but the over-expanded cube still covers
    // active ON cubes: raise toward the densest remaining mass.
    while cc.active_count() > 0 {
        let part = x
            .most_frequent_part(Some(&*cc))
            .expect("no free part left while coverable ON cubes remain active");
        trace!("raising most-frequent part {}", part);
        x.raise.insert(part);
        x.free.remove(part);
        x.essential_parts(bb, Some(&mut *cc))?;
    }

    // All absorption is exhausted; choose the largest possible prime. The
    // loop repeats only when the covering formulation is judged too
    // expensive and a single heuristic raise is taken instead.
    while bb.active_count() > 0 {
        x.minimum_cover_step(bb)?;
    }

    // Anything still free is blocked by nothing.
    x.raise.union_with(&x.free);

    let reached_overexpanded = x.raise == x.overexpanded;
    trace!(
        "expanded cube {}: absorbed {}, supercube {:?}",
        idx,
        x.num_covered,
        x.super_cube
    );

    cc.cube_mut(idx).copy_from(&x.raise);
    cc.set_flag(idx, CubeFlags::PRIME);
    cc.clear_flag(idx, CubeFlags::COVERED);

    // A prime that absorbed nothing and fell short of its over-expanded
    // cube is inessential.
    if x.num_covered == 0 && !reached_overexpanded {
        cc.set_flag(idx, CubeFlags::INESSENTIAL);
    }
    Ok(())
}

/// Scratch state for one cube expansion
///
/// The three part sets partition the geometry together with the lowered
/// parts: `raise` holds the committed parts, `free` the undecided ones, and
/// whatever left both is lowered for good.
struct Expansion<'a> {
    geom: &'a CubeGeometry,
    /// Parts committed to the expanded cube
    raise: Cube,
    /// Parts not yet raised or lowered
    free: Cube,
    /// Union of the ON cubes absorbed so far
    super_cube: Cube,
    /// `raise | free` right after the initial essential pass: the farthest
    /// any expansion of this cube can reach
    overexpanded: Cube,
    /// Number of ON cubes absorbed
    num_covered: usize,
}

impl<'a> Expansion<'a> {
    fn new(geom: &'a CubeGeometry, cube: Cube) -> Self {
        let mut free = geom.full_cube();
        free.subtract(&cube);
        Expansion {
            geom,
            super_cube: cube.clone(),
            raise: cube,
            free,
            overexpanded: geom.empty_cube(),
            num_covered: 0,
        }
    }

    /// Lower the parts forced out by distance-1 OFF cubes
    ///
    /// An OFF cube at distance 1 from the raising set pins its separating
    /// variable: every part it holds there can never be raised, and the
    /// cube itself stops blocking. Distance 0 means the caller handed over
    /// intersecting ON- and OFF-sets.
    fn essential_parts(
        &mut self,
        bb: &mut Cover,
        cc: Option<&mut Cover>,
    ) -> Result<(), ExpandError> {
        let mut forced = self.geom.empty_cube();
        for j in 0..bb.len() {
            if !bb.is_active(j) {
                continue;
            }
            match self.geom.cdist01(bb.cube(j), &self.raise) {
                0 => return Err(ExpandError::NotOrthogonal),
                1 => {
                    self.geom.force_lower(&mut forced, bb.cube(j), &self.raise);
                    bb.set_active(j, false);
                }
                _ => {}
            }
        }

        if !forced.is_empty() {
            self.free.subtract(&forced);
            self.eliminate_lowered(bb, cc);
        }
        Ok(())
    }

    /// Raise every free part blocked by no remaining OFF cube
    fn essential_raising(&mut self, bb: &Cover) {
        let mut blocked = self.geom.empty_cube();
        for j in bb.active_indices() {
            blocked.union_with(bb.cube(j));
        }
        let mut freed = self.free.clone();
        freed.subtract(&blocked);
        self.raise.union_with(&freed);
        self.free.subtract(&freed);
    }

    /// Prune both families against the over-expanded cube
    ///
    /// After parts leave the free set, any OFF cube disjoint from
    /// `raise | free` can never block again, and any ON cube not implied by
    /// it can never be absorbed.
    fn eliminate_lowered(&self, bb: &mut Cover, cc: Option<&mut Cover>) {
        let mut reach = self.raise.clone();
        reach.union_with(&self.free);

        for j in 0..bb.len() {
            if bb.is_active(j) && !self.geom.cdist0(bb.cube(j), &reach) {
                bb.set_active(j, false);
            }
        }

        if let Some(cc) = cc {
            for j in 0..cc.len() {
                if cc.is_active(j) && !cc.cube(j).implies(&reach) {
                    cc.set_active(j, false);
                }
            }
        }
    }

    /// Absorb feasibly covered ON cubes, one per round
    ///
    /// The candidate kept is not the one absorbing the most cubes outright;
    /// instead each candidate is scored by how many of its peers would
    /// remain feasibly coverable after committing to it (one-level
    /// lookahead), with ties broken toward fewer newly raised parts.
    fn select_feasible(&mut self, bb: &mut Cover, cc: &mut Cover) -> Result<(), ExpandError> {
        let mut feas: Vec<usize> = cc.active_indices().collect();
        let mut new_lower: Vec<Cube> = (0..feas.len()).map(|_| self.geom.empty_cube()).collect();

        loop {
            // Unblocked parts can only help; they may even cover candidates
            // outright.
            self.essential_raising(bb);

            let prior = std::mem::take(&mut feas);
            for p in prior {
                // An earlier essential pass may have dropped the candidate.
                if !cc.is_active(p) {
                    continue;
                }
                if cc.cube(p).implies(&self.raise) {
                    self.num_covered += 1;
                    self.super_cube.union_with(cc.cube(p));
                    cc.set_active(p, false);
                    cc.set_flag(p, CubeFlags::COVERED);
                } else {
                    let slot = feas.len();
                    if self.feasibly_covered(bb, cc.cube(p), &mut new_lower[slot]) {
                        feas.push(p);
                    }
                }
            }
            if feas.is_empty() {
                return Ok(());
            }

            let mut best = 0usize;
            let mut best_count = 0usize;
            let mut best_size = usize::MAX;
            for i in 0..feas.len() {
                // Newly raised parts if this candidate is chosen.
                let size = cc.cube(feas[i]).intersect_count(&self.free);
                // Peers still feasible after the forced lowerings.
                let count = (0..feas.len())
                    .filter(|&j| new_lower[i].disjoint(cc.cube(feas[j])))
                    .count();
                if count > best_count || (count == best_count && size < best_size) {
                    best = i;
                    best_count = count;
                    best_size = size;
                }
            }

            let chosen = feas[best];
            trace!(
                "absorbing cube {} ({} peers stay feasible, {} new parts)",
                chosen,
                best_count,
                best_size
            );
            self.raise.union_with(cc.cube(chosen));
            self.free.subtract(&self.raise);
            self.essential_parts(bb, Some(&mut *cc))?;
        }
    }

    /// Test whether raising to cover `c` keeps the expansion orthogonal
    ///
    /// On success, `new_lower` holds the parts that would be forced into
    /// the lowering set by that choice. Distance 0 here is not a fault: it
    /// just means this candidate cannot be absorbed.
    fn feasibly_covered(&self, bb: &Cover, c: &Cube, new_lower: &mut Cube) -> bool {
        let mut reach = self.raise.clone();
        reach.union_with(c);

        new_lower.clear();
        for j in 0..bb.len() {
            if !bb.is_active(j) {
                continue;
            }
            match self.geom.cdist01(bb.cube(j), &reach) {
                0 => return false,
                1 => self.geom.force_lower(new_lower, bb.cube(j), &reach),
                _ => {}
            }
        }
        true
    }

    /// The free part occurring in the most active cubes of `cc`
    ///
    /// With no cover given, all counts are zero and the smallest-indexed
    /// free part wins; ties always break toward the smallest index.
    fn most_frequent_part(&self, cc: Option<&Cover>) -> Option<usize> {
        let mut counts = vec![0usize; self.geom.num_parts()];
        if let Some(cc) = cc {
            for j in cc.active_indices() {
                cc.cube(j).add_part_counts(&mut counts);
            }
        }

        let mut best: Option<(usize, usize)> = None;
        for part in self.free.ones() {
            match best {
                Some((_, count)) if counts[part] <= count => {}
                _ => best = Some((part, counts[part])),
            }
        }
        best.map(|(part, _)| part)
    }

    /// Resolve the residual blocking family through a minimum unate cover
    ///
    /// Every remaining active OFF cube contributes a row of parts that must
    /// stay lowered to keep it separated; a minimum cover of those rows is
    /// kept lowered and everything else is raised. When unravelling the
    /// output variable would blow the family past [`UNRAVEL_LIMIT`] rows,
    /// fall back to raising a single free part and let the caller iterate.
    #[cfg(not(feature = "random-mincov"))]
    fn minimum_cover_step(&mut self, bb: &mut Cover) -> Result<(), ExpandError> {
        let mut rows = Vec::with_capacity(bb.active_count());
        for j in bb.active_indices() {
            let mut row = self.geom.empty_cube();
            self.geom.force_lower(&mut row, bb.cube(j), &self.raise);
            rows.push(row);
        }

        // Estimate the unravelled size before paying for it.
        let mut nset = 0usize;
        for row in &rows {
            let mut expansion = 1usize;
            let d = row.intersect_count(self.geom.output_mask());
            if d > 1 {
                expansion *= d;
                if expansion > UNRAVEL_LIMIT {
                    return self.heuristic_mincov(bb);
                }
            }
            nset += expansion;
            if nset > UNRAVEL_LIMIT {
                return self.heuristic_mincov(bb);
            }
        }

        let rows = unravel_output(self.geom, rows);
        let keep_lowered = minimum_cover(self.geom.num_parts(), &rows);
        debug!(
            "minimum cover over {} rows keeps {:?} lowered",
            rows.len(),
            keep_lowered
        );

        let mut gained = self.free.clone();
        gained.subtract(&keep_lowered);
        self.raise.union_with(&gained);
        self.free = self.geom.empty_cube();
        bb.deactivate_all();
        Ok(())
    }

    /// Raise a uniformly random free part instead of solving the covering
    /// problem
    #[cfg(feature = "random-mincov")]
    fn minimum_cover_step(&mut self, bb: &mut Cover) -> Result<(), ExpandError> {
        use rand::Rng;

        let free_parts: Vec<usize> = self.free.ones().collect();
        let part = free_parts[rand::thread_rng().gen_range(0..free_parts.len())];
        self.raise.insert(part);
        self.free.remove(part);
        self.essential_parts(bb, None)
    }

    /// Single heuristic raise when the covering formulation is too large
    #[cfg(not(feature = "random-mincov"))]
    fn heuristic_mincov(&mut self, bb: &mut Cover) -> Result<(), ExpandError> {
        let part = self
            .most_frequent_part(None)
            .expect("free set exhausted while OFF cubes remain active");
        debug!("unravelling too expensive, raising part {}", part);
        self.raise.insert(part);
        self.free.remove(part);
        self.essential_parts(bb, None)
    }
}
