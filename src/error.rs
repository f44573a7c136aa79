//! Error types for the expansion core
//!
//! Errors are organized by source and operation. Each error source has its
//! own enum with specific variants, and operations have wrapper enums that
//! combine only the errors they can produce.

use std::fmt;
use std::io;

// ============================================================================
// Source-Level Error Enums
// ============================================================================

/// Errors related to cube geometry construction
///
/// These errors occur when a part layout cannot describe a valid
/// multi-valued cube space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The geometry has no variables at all
    NoVariables,
    /// A variable was declared with zero parts
    EmptyVariable {
        /// Index of the offending variable
        var: usize,
    },
    /// The output variable index does not name a variable
    OutputOutOfRange {
        /// The requested output variable index
        output: usize,
        /// The number of variables in the geometry
        num_vars: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::NoVariables => {
                write!(f, "Cube geometry must have at least one variable")
            }
            GeometryError::EmptyVariable { var } => {
                write!(f, "Variable {} has zero parts", var)
            }
            GeometryError::OutputOutOfRange { output, num_vars } => write!(
                f,
                "Output variable index {} out of range (geometry has {} variables)",
                output, num_vars
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

impl From<GeometryError> for io::Error {
    fn from(err: GeometryError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}

/// Errors related to PLA format parsing and validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaError {
    /// PLA input is missing the .i (inputs) directive
    MissingInputDirective,
    /// PLA input is missing the .o (outputs) directive
    MissingOutputDirective,
    /// Invalid value in .i directive
    InvalidInputDirective {
        /// The invalid value string
        value: String,
    },
    /// Invalid value in .o directive
    InvalidOutputDirective {
        /// The invalid value string
        value: String,
    },
    /// Invalid character in the input portion of a cube line
    InvalidInputCharacter {
        /// The invalid character
        character: char,
        /// Position in the input string
        position: usize,
    },
    /// Invalid character in the output portion of a cube line
    InvalidOutputCharacter {
        /// The invalid character
        character: char,
        /// Position in the output string
        position: usize,
    },
    /// A cube line does not match the declared dimensions
    CubeWidthMismatch {
        /// Expected line width (inputs + outputs)
        expected: usize,
        /// Actual line width
        actual: usize,
    },
    /// Label count doesn't match dimension count
    LabelCountMismatch {
        /// Type of label ("input" or "output")
        label_type: String,
        /// Expected number of labels
        expected: usize,
        /// Actual number of labels provided
        actual: usize,
    },
}

impl fmt::Display for PlaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaError::MissingInputDirective => {
                write!(f, "PLA input missing .i directive")
            }
            PlaError::MissingOutputDirective => {
                write!(f, "PLA input missing .o directive")
            }
            PlaError::InvalidInputDirective { value } => {
                write!(f, "Invalid .i directive value: '{}'", value)
            }
            PlaError::InvalidOutputDirective { value } => {
                write!(f, "Invalid .o directive value: '{}'", value)
            }
            PlaError::InvalidInputCharacter {
                character,
                position,
            } => {
                write!(
                    f,
                    "Invalid input character '{}' at position {}",
                    character, position
                )
            }
            PlaError::InvalidOutputCharacter {
                character,
                position,
            } => {
                write!(
                    f,
                    "Invalid output character '{}' at position {}",
                    character, position
                )
            }
            PlaError::CubeWidthMismatch { expected, actual } => write!(
                f,
                "Cube line width {} doesn't match declared width {}",
                actual, expected
            ),
            PlaError::LabelCountMismatch {
                label_type,
                expected,
                actual,
            } => write!(
                f,
                "{} label count ({}) doesn't match {} count ({})",
                label_type, actual, label_type, expected
            ),
        }
    }
}

impl std::error::Error for PlaError {}

impl From<PlaError> for io::Error {
    fn from(err: PlaError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

// ============================================================================
// Operation-Level Error Enums
// ============================================================================

/// Errors that can occur during expansion
///
/// This error type is returned by [`expand`](crate::expand::expand) and
/// [`make_sparse`](crate::sparse::make_sparse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// The ON-set and OFF-set intersect
    ///
    /// Expansion requires the two covers to be orthogonal; an intersecting
    /// pair means the problem instance is malformed and no recovery is
    /// meaningful.
    NotOrthogonal,
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::NotOrthogonal => {
                write!(f, "ON-set and OFF-set are not orthogonal")
            }
        }
    }
}

impl std::error::Error for ExpandError {}

impl From<ExpandError> for io::Error {
    fn from(err: ExpandError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// Errors that can occur when reading PLA format data
#[derive(Debug)]
pub enum PlaReadError {
    /// PLA format error
    Pla(PlaError),
    /// Geometry construction error
    Geometry(GeometryError),
    /// IO error during reading
    Io(io::Error),
}

impl fmt::Display for PlaReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaReadError::Pla(e) => write!(f, "PLA format error: {}", e),
            PlaReadError::Geometry(e) => write!(f, "Geometry error: {}", e),
            PlaReadError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PlaReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaReadError::Pla(e) => Some(e),
            PlaReadError::Geometry(e) => Some(e),
            PlaReadError::Io(e) => Some(e),
        }
    }
}

impl From<PlaError> for PlaReadError {
    fn from(err: PlaError) -> Self {
        PlaReadError::Pla(err)
    }
}

impl From<GeometryError> for PlaReadError {
    fn from(err: GeometryError) -> Self {
        PlaReadError::Geometry(err)
    }
}

impl From<io::Error> for PlaReadError {
    fn from(err: io::Error) -> Self {
        PlaReadError::Io(err)
    }
}

impl From<PlaReadError> for io::Error {
    fn from(err: PlaReadError) -> Self {
        match err {
            // If it's already an IO error, return it directly
            PlaReadError::Io(e) => e,
            PlaReadError::Pla(e) => io::Error::new(io::ErrorKind::InvalidData, e),
            PlaReadError::Geometry(e) => io::Error::new(io::ErrorKind::InvalidInput, e),
        }
    }
}

/// Errors that can occur when writing PLA format data
#[derive(Debug)]
pub enum PlaWriteError {
    /// IO error during writing
    Io(io::Error),
}

impl fmt::Display for PlaWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaWriteError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PlaWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaWriteError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for PlaWriteError {
    fn from(err: io::Error) -> Self {
        PlaWriteError::Io(err)
    }
}

impl From<PlaWriteError> for io::Error {
    fn from(err: PlaWriteError) -> Self {
        match err {
            // PlaWriteError only contains IO errors, so return it directly
            PlaWriteError::Io(e) => e,
        }
    }
}
