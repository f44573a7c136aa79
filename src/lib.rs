//! # Espresso expansion core
//!
//! A native Rust implementation of the expansion step of a two-level logic
//! minimizer in the Espresso-II tradition, plus the sparse-variable
//! cleanup that trades output parts against input literals.
//!
//! Given a Boolean function as an ON-set cover `F` and an OFF-set cover
//! `R`, [`expand`] enlarges every non-prime cube of `F` into a prime
//! implicant while opportunistically absorbing other cubes of `F`. The
//! companion [`make_sparse`] alternates a per-output-part reduction with a
//! restricted re-expansion to lower the total literal count.
//!
//! ## Data model
//!
//! Functions are represented positionally: every variable owns a
//! contiguous range of *parts*, and a [`Cube`] is a bit vector over all
//! parts, with a set bit meaning "this part is permitted". A [`Cover`] is
//! a list of flagged cubes. The part layout lives in an explicit
//! [`CubeGeometry`] passed to every operation, so multiple layouts can be
//! used side by side.
//!
//! ## Example
//!
//! ```
//! use espresso_expand::{expand, Cover, CubeFlags, CubeGeometry};
//!
//! // Two binary inputs, one output: parts 0/1 for x0, 2/3 for x1, 4 for y.
//! let geom = CubeGeometry::binary(2, 1).unwrap();
//!
//! // f = x0 x1; the OFF-set pins x1', leaving x0 free to drop.
//! let mut f = Cover::from_cubes([geom.cube_from_parts(&[1, 3, 4])]);
//! let mut r = Cover::from_cubes([geom.cube_from_parts(&[0, 1, 2, 4])]);
//!
//! expand(&geom, &mut f, &mut r, false).unwrap();
//!
//! assert_eq!(f.len(), 1);
//! assert!(f.test(0, CubeFlags::PRIME));
//! assert_eq!(f.cube(0).ones().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
//! ```
//!
//! ## PLA input
//!
//! The [`Pla`] type reads and writes the classic PLA text format and wires
//! the parsed covers straight into the core:
//!
//! ```
//! use espresso_expand::Pla;
//!
//! let mut pla = Pla::from_pla_string(".i 2\n.o 1\n.type fr\n11 1\n-0 0\n.e\n").unwrap();
//! pla.run_expand(false).unwrap();
//! assert_eq!(pla.on_set().len(), 1);
//! ```

pub mod cover;
pub mod cube;
pub mod error;
pub mod expand;
mod irredundant;
mod mincov;
pub mod pla;
pub mod sparse;

pub use cover::{cover_cost, Cost, Cover, CoverCube, CubeFlags};
pub use cube::{Cube, CubeGeometry};
pub use error::{ExpandError, GeometryError, PlaError, PlaReadError, PlaWriteError};
pub use expand::expand;
pub use pla::{CoverType, Pla};
pub use sparse::{make_sparse, mv_reduce};
