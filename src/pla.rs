//! PLA (Programmable Logic Array) format support
//!
//! Reads and writes the PLA subset needed to drive the expansion core end
//! to end: `.i`, `.o`, `.p`, `.type`, `.ilb`, `.ob`, comment lines, and
//! one-cube-per-line bodies. Output characters are routed to the F/D/R
//! covers according to the cover type, the way the classic front end does
//! it: `1` sets a bit in the ON cube, `0` in the OFF cube (when the type
//! carries R), `-` in the don't-care cube (when the type carries D), and
//! `~` sets nothing at all.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use log::warn;

use crate::cover::{cover_cost, Cost, Cover};
use crate::cube::{Cube, CubeGeometry};
use crate::error::{ExpandError, PlaError, PlaReadError, PlaWriteError};
use crate::expand::expand;
use crate::sparse::make_sparse;

/// Which sets a PLA carries (and which output characters mean what)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverType {
    /// ON-set only
    F,
    /// ON-set and don't-care set
    FD,
    /// ON-set and OFF-set
    FR,
    /// ON-set, don't-care set, and OFF-set
    FDR,
}

impl CoverType {
    /// Check if this type includes D (don't-care set)
    pub fn has_d(&self) -> bool {
        matches!(self, CoverType::FD | CoverType::FDR)
    }

    /// Check if this type includes R (OFF-set)
    pub fn has_r(&self) -> bool {
        matches!(self, CoverType::FR | CoverType::FDR)
    }
}

/// A PLA problem: geometry, the three covers, and variable labels
///
/// # Examples
///
/// ```
/// use espresso_expand::{CoverType, Pla};
///
/// let text = ".i 2\n.o 1\n.type fr\n11 1\n00 0\n.e\n";
/// let mut pla = Pla::from_pla_string(text).unwrap();
/// assert_eq!(pla.num_inputs(), 2);
/// assert_eq!(pla.num_outputs(), 1);
/// pla.run_expand(false).unwrap();
/// let out = pla.to_pla_string(CoverType::F).unwrap();
/// assert!(out.contains(".i 2"));
/// ```
#[derive(Debug, Clone)]
pub struct Pla {
    geometry: CubeGeometry,
    f: Cover,
    d: Cover,
    r: Cover,
    input_labels: Vec<Arc<str>>,
    output_labels: Vec<Arc<str>>,
    cover_type: CoverType,
}

impl Pla {
    /// Number of input variables
    pub fn num_inputs(&self) -> usize {
        self.geometry.num_vars() - 1
    }

    /// Number of output functions
    pub fn num_outputs(&self) -> usize {
        self.geometry.output_mask().count_ones()
    }

    /// The cube geometry backing this PLA
    pub fn geometry(&self) -> &CubeGeometry {
        &self.geometry
    }

    /// The ON-set
    pub fn on_set(&self) -> &Cover {
        &self.f
    }

    /// The don't-care set
    pub fn dc_set(&self) -> &Cover {
        &self.d
    }

    /// The OFF-set
    pub fn off_set(&self) -> &Cover {
        &self.r
    }

    /// The cover type declared (or defaulted) by the source
    pub fn cover_type(&self) -> CoverType {
        self.cover_type
    }

    /// Literal cost of the ON-set
    pub fn cost(&self) -> Cost {
        cover_cost(&self.geometry, &self.f)
    }

    /// Expand every non-prime ON cube into a prime implicant
    ///
    /// With no OFF-set in the source, every cube expands to the universe;
    /// that is correct but rarely what the caller wants, so it is worth a
    /// warning.
    pub fn run_expand(&mut self, nonsparse: bool) -> Result<(), ExpandError> {
        if self.r.is_empty() && !self.f.is_empty() {
            warn!("expanding with an empty OFF-set: every cube becomes the universe");
        }
        expand(&self.geometry, &mut self.f, &mut self.r, nonsparse)
    }

    /// Run the sparse-variable cleanup on the ON-set
    pub fn run_make_sparse(&mut self) -> Result<(), ExpandError> {
        make_sparse(&self.geometry, &mut self.f, &self.d, &mut self.r)
    }

    /// Parse a PLA from a reader
    pub fn from_pla_reader<R: BufRead>(reader: R) -> Result<Self, PlaReadError> {
        let mut num_inputs: Option<usize> = None;
        let mut num_outputs: Option<usize> = None;
        // The classic front end defaults to FD when no .type is given.
        let mut cover_type = CoverType::FD;
        let mut input_labels: Option<Vec<Arc<str>>> = None;
        let mut output_labels: Option<Vec<Arc<str>>> = None;
        let mut geometry: Option<CubeGeometry> = None;
        let mut f = Cover::new();
        let mut d = Cover::new();
        let mut r = Cover::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('.') {
                let parts: Vec<&str> = line.split_whitespace().collect();
                match parts.first().copied() {
                    Some(".i") => {
                        let value: usize =
                            parts.get(1).and_then(|s| s.parse().ok()).ok_or_else(|| {
                                PlaError::InvalidInputDirective {
                                    value: parts.get(1).unwrap_or(&"").to_string(),
                                }
                            })?;
                        num_inputs = Some(value);
                    }
                    Some(".o") => {
                        let value: usize =
                            parts.get(1).and_then(|s| s.parse().ok()).ok_or_else(|| {
                                PlaError::InvalidOutputDirective {
                                    value: parts.get(1).unwrap_or(&"").to_string(),
                                }
                            })?;
                        num_outputs = Some(value);
                    }
                    Some(".type") => {
                        cover_type = match parts.get(1).copied() {
                            Some("f") => CoverType::F,
                            Some("fd") => CoverType::FD,
                            Some("fr") => CoverType::FR,
                            Some("fdr") => CoverType::FDR,
                            _ => CoverType::F,
                        };
                    }
                    Some(".ilb") => {
                        let labels: Vec<Arc<str>> =
                            parts.iter().skip(1).map(|s| Arc::from(*s)).collect();
                        if !labels.is_empty() {
                            input_labels = Some(labels);
                        }
                    }
                    Some(".ob") => {
                        let labels: Vec<Arc<str>> =
                            parts.iter().skip(1).map(|s| Arc::from(*s)).collect();
                        if !labels.is_empty() {
                            output_labels = Some(labels);
                        }
                    }
                    Some(".e") | Some(".end") => break,
                    // .p (cube count) is advisory; anything else is ignored.
                    _ => {}
                }
                continue;
            }

            // Cube line. Dimensions must be known by now.
            let ni = num_inputs.ok_or(PlaError::MissingInputDirective)?;
            let no = num_outputs.ok_or(PlaError::MissingOutputDirective)?;
            if geometry.is_none() {
                geometry = Some(CubeGeometry::binary(ni, no)?);
            }
            let geom = geometry.as_ref().unwrap();

            let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            if compact.len() != ni + no {
                return Err(PlaError::CubeWidthMismatch {
                    expected: ni + no,
                    actual: compact.len(),
                }
                .into());
            }
            let (input_str, output_str) = compact.split_at(ni);

            let mut inputs = geom.empty_cube();
            for (pos, ch) in input_str.chars().enumerate() {
                match ch {
                    '0' => inputs.insert(2 * pos),
                    '1' => inputs.insert(2 * pos + 1),
                    '-' | '~' | 'x' | 'X' => {
                        inputs.insert(2 * pos);
                        inputs.insert(2 * pos + 1);
                    }
                    _ => {
                        return Err(PlaError::InvalidInputCharacter {
                            character: ch,
                            position: pos,
                        }
                        .into())
                    }
                }
            }

            let output_base = 2 * ni;
            let mut f_cube: Option<Cube> = None;
            let mut d_cube: Option<Cube> = None;
            let mut r_cube: Option<Cube> = None;
            for (pos, ch) in output_str.chars().enumerate() {
                let target = match ch {
                    '1' | '4' => Some(&mut f_cube),
                    '0' | '3' => {
                        if cover_type.has_r() {
                            Some(&mut r_cube)
                        } else {
                            None
                        }
                    }
                    '-' | '2' => {
                        if cover_type.has_d() {
                            Some(&mut d_cube)
                        } else {
                            None
                        }
                    }
                    '~' => None,
                    _ => {
                        return Err(PlaError::InvalidOutputCharacter {
                            character: ch,
                            position: pos,
                        }
                        .into())
                    }
                };
                if let Some(slot) = target {
                    slot.get_or_insert_with(|| inputs.clone())
                        .insert(output_base + pos);
                }
            }

            if let Some(cube) = f_cube {
                f.push(cube);
            }
            if let Some(cube) = d_cube {
                d.push(cube);
            }
            if let Some(cube) = r_cube {
                r.push(cube);
            }
        }

        let num_inputs = num_inputs.ok_or(PlaError::MissingInputDirective)?;
        let num_outputs = num_outputs.ok_or(PlaError::MissingOutputDirective)?;
        let geometry = match geometry {
            Some(geometry) => geometry,
            None => CubeGeometry::binary(num_inputs, num_outputs)?,
        };

        if let Some(labels) = &input_labels {
            if labels.len() != num_inputs {
                return Err(PlaError::LabelCountMismatch {
                    label_type: "input".to_string(),
                    expected: num_inputs,
                    actual: labels.len(),
                }
                .into());
            }
        }
        if let Some(labels) = &output_labels {
            if labels.len() != num_outputs {
                return Err(PlaError::LabelCountMismatch {
                    label_type: "output".to_string(),
                    expected: num_outputs,
                    actual: labels.len(),
                }
                .into());
            }
        }

        let input_labels = input_labels.unwrap_or_else(|| {
            (0..num_inputs)
                .map(|i| Arc::from(format!("x{}", i).as_str()))
                .collect()
        });
        let output_labels = output_labels.unwrap_or_else(|| {
            (0..num_outputs)
                .map(|i| Arc::from(format!("y{}", i).as_str()))
                .collect()
        });

        Ok(Pla {
            geometry,
            f,
            d,
            r,
            input_labels,
            output_labels,
            cover_type,
        })
    }

    /// Parse a PLA from a string
    pub fn from_pla_string(s: &str) -> Result<Self, PlaReadError> {
        Self::from_pla_reader(io::Cursor::new(s.as_bytes()))
    }

    /// Load a PLA from a file
    pub fn from_pla_file<P: AsRef<Path>>(path: P) -> Result<Self, PlaReadError> {
        let file = File::open(path)?;
        Self::from_pla_reader(BufReader::new(file))
    }

    /// Write this PLA using a writer
    pub fn write_pla<W: Write>(
        &self,
        writer: &mut W,
        pla_type: CoverType,
    ) -> Result<(), PlaWriteError> {
        match pla_type {
            CoverType::FD => writeln!(writer, ".type fd")?,
            CoverType::FR => writeln!(writer, ".type fr")?,
            CoverType::FDR => writeln!(writer, ".type fdr")?,
            CoverType::F => {}
        }

        writeln!(writer, ".i {}", self.num_inputs())?;
        write!(writer, ".ilb")?;
        for label in &self.input_labels {
            write!(writer, " {}", label)?;
        }
        writeln!(writer)?;

        writeln!(writer, ".o {}", self.num_outputs())?;
        write!(writer, ".ob")?;
        for label in &self.output_labels {
            write!(writer, " {}", label)?;
        }
        writeln!(writer)?;

        let sections: Vec<(&Cover, char)> = match pla_type {
            CoverType::F => vec![(&self.f, '1')],
            CoverType::FD => vec![(&self.f, '1'), (&self.d, '2')],
            CoverType::FR => vec![(&self.f, '1'), (&self.r, '0')],
            CoverType::FDR => vec![(&self.f, '1'), (&self.d, '2'), (&self.r, '0')],
        };

        let count: usize = sections.iter().map(|(cover, _)| cover.len()).sum();
        writeln!(writer, ".p {}", count)?;

        for (cover, set_char) in sections {
            // With only the ON-set printed, unset output bits print as '0'
            // (the single-section form); otherwise '~' keeps the sets
            // distinguishable.
            let unset_char = if pla_type == CoverType::F { '0' } else { '~' };
            for c in cover.iter() {
                self.write_cube_line(writer, c.parts(), set_char, unset_char)?;
            }
        }

        match pla_type {
            CoverType::F => writeln!(writer, ".e")?,
            _ => writeln!(writer, ".end")?,
        }
        Ok(())
    }

    fn write_cube_line<W: Write>(
        &self,
        writer: &mut W,
        cube: &Cube,
        set_char: char,
        unset_char: char,
    ) -> Result<(), PlaWriteError> {
        for var in 0..self.num_inputs() {
            let low = cube.contains(2 * var);
            let high = cube.contains(2 * var + 1);
            let ch = match (low, high) {
                (true, true) => '-',
                (false, true) => '1',
                (true, false) => '0',
                // An empty input variable means the empty cube; it never
                // survives into a cover, but keep the output well-formed.
                (false, false) => '?',
            };
            write!(writer, "{}", ch)?;
        }
        write!(writer, " ")?;
        let output_base = 2 * self.num_inputs();
        for pos in 0..self.num_outputs() {
            let ch = if cube.contains(output_base + pos) {
                set_char
            } else {
                unset_char
            };
            write!(writer, "{}", ch)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    /// Render this PLA to a string
    pub fn to_pla_string(&self, pla_type: CoverType) -> Result<String, PlaWriteError> {
        let mut buffer = Vec::new();
        self.write_pla(&mut buffer, pla_type)?;
        // PLA format is ASCII, so this conversion is safe
        Ok(String::from_utf8(buffer).unwrap())
    }

    /// Write this PLA to a file
    pub fn to_pla_file<P: AsRef<Path>>(
        &self,
        path: P,
        pla_type: CoverType,
    ) -> Result<(), PlaWriteError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_pla(&mut writer, pla_type)?;
        writer.flush()?;
        Ok(())
    }
}
