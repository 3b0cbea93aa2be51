//! ITK "Insight Transform File V1.0" affine transform text files.
//!
//! The consuming tool expects the x and y components of both the translation
//! and the rotation center negated relative to our convention. [`format_transform`]
//! applies that flip and [`parse_transform`] undoes it. Only the rotation
//! matrix is written; the scaling part of a fitted transform is not.


use std::fmt::Write as _;
use std::path::Path;

use glam::DVec3;

use crate::math::DMat3;
use crate::registration::result::{FittedTransform, RegistrationError};

const FILE_HEADER: &str = "#Insight Transform File V1.0";
const TRANSFORM_HEADER: &str = "#Transform 0";
const TRANSFORM_KIND: &str = "AffineTransform_double_3_3";

const PARAMETERS_KEY: &str = "Parameters:";
const FIXED_PARAMETERS_KEY: &str = "FixedParameters:";

/// Flip between internal coordinates and the external tool's convention.
#[inline]
fn flip_xy(v: DVec3) -> DVec3 {
    DVec3::new(-v.x, -v.y, v.z)
}

/// Affine transform as stored in an ITK text file, in internal coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItkAffineTransform {
    pub rotation: DMat3,
    pub translation: DVec3,
    pub center: DVec3,
}

impl ItkAffineTransform {
    pub fn new(rotation: DMat3, translation: DVec3, center: DVec3) -> Self {
        Self {
            rotation,
            translation,
            center,
        }
    }
}

impl From<&FittedTransform> for ItkAffineTransform {
    fn from(fitted: &FittedTransform) -> Self {
        Self::new(fitted.rotation, fitted.translation, fitted.centroid)
    }
}

/// Render the transform file text, one trailing newline included.
pub fn format_affine(transform: &ItkAffineTransform) -> String {
    let translation = flip_xy(transform.translation);
    let center = flip_xy(transform.center);

    let mut out = String::with_capacity(256);
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{FILE_HEADER}");
    let _ = writeln!(out, "{TRANSFORM_HEADER}");
    let _ = writeln!(out, "Transform: {TRANSFORM_KIND}");

    out.push_str(PARAMETERS_KEY);
    for value in transform.rotation.as_array() {
        let _ = write!(out, " {:.9}", value);
    }
    for value in translation.to_array() {
        let _ = write!(out, " {:.9}", value);
    }
    out.push('\n');

    out.push_str(FIXED_PARAMETERS_KEY);
    for value in center.to_array() {
        let _ = write!(out, " {:.9}", value);
    }
    out.push('\n');

    out
}

/// Render a fitted transform in the ITK affine text layout.
pub fn format_transform(fitted: &FittedTransform) -> String {
    format_affine(&ItkAffineTransform::from(fitted))
}

/// Write a fitted transform to `path`, replacing any existing file.
pub fn write_transform_file(
    path: impl AsRef<Path>,
    fitted: &FittedTransform,
) -> Result<(), RegistrationError> {
    let path = path.as_ref();
    std::fs::write(path, format_transform(fitted)).map_err(|source| RegistrationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote transform file {}", path.display());
    Ok(())
}

/// Parse ITK affine transform text back into internal coordinates.
///
/// Expects the two header comments, the transform kind line, then the
/// `Parameters:` (12 values) and `FixedParameters:` (3 values) lines.
/// Blank lines are ignored.
pub fn parse_transform(text: &str) -> Result<ItkAffineTransform, RegistrationError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let mut next_line = |expected: &str| {
        lines
            .next()
            .ok_or_else(|| malformed(0, format!("unexpected end of file, expected {expected}")))
    };

    let (line_no, line) = next_line(FILE_HEADER)?;
    if line != FILE_HEADER {
        return Err(malformed(line_no, format!("expected '{FILE_HEADER}'")));
    }

    let (line_no, line) = next_line(TRANSFORM_HEADER)?;
    if line != TRANSFORM_HEADER {
        return Err(malformed(line_no, format!("expected '{TRANSFORM_HEADER}'")));
    }

    let (line_no, line) = next_line("transform kind")?;
    let kind = line
        .strip_prefix("Transform:")
        .map(str::trim)
        .ok_or_else(|| malformed(line_no, "expected 'Transform:' line".to_string()))?;
    if kind != TRANSFORM_KIND {
        return Err(malformed(
            line_no,
            format!("unsupported transform kind '{kind}', expected '{TRANSFORM_KIND}'"),
        ));
    }

    let (line_no, line) = next_line(PARAMETERS_KEY)?;
    let params: [f64; 12] = parse_values(line_no, line, PARAMETERS_KEY)?;

    let (line_no, line) = next_line(FIXED_PARAMETERS_KEY)?;
    let fixed: [f64; 3] = parse_values(line_no, line, FIXED_PARAMETERS_KEY)?;

    if let Some((line_no, _)) = lines.next() {
        return Err(malformed(line_no, "unexpected trailing content".to_string()));
    }

    let mut rotation = [0.0; 9];
    rotation.copy_from_slice(&params[..9]);

    Ok(ItkAffineTransform {
        rotation: DMat3::from_array(rotation),
        translation: flip_xy(DVec3::new(params[9], params[10], params[11])),
        center: flip_xy(DVec3::from_array(fixed)),
    })
}

/// Read and parse an ITK affine transform file.
pub fn read_transform_file(path: impl AsRef<Path>) -> Result<ItkAffineTransform, RegistrationError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| RegistrationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_transform(&text)
}

fn malformed(line: usize, reason: String) -> RegistrationError {
    RegistrationError::MalformedTransformFile { line, reason }
}

/// Parse `key v0 v1 ...` into exactly `N` finite values.
fn parse_values<const N: usize>(
    line_no: usize,
    line: &str,
    key: &str,
) -> Result<[f64; N], RegistrationError> {
    let rest = line
        .strip_prefix(key)
        .ok_or_else(|| malformed(line_no, format!("expected '{key}' line")))?;

    let mut values = [0.0; N];
    let mut count = 0;
    for token in rest.split_whitespace() {
        if count == N {
            return Err(malformed(
                line_no,
                format!("{key} has more than {N} values"),
            ));
        }
        let value: f64 = token
            .parse()
            .map_err(|_| malformed(line_no, format!("invalid number '{token}'")))?;
        if !value.is_finite() {
            return Err(malformed(line_no, format!("non-finite value '{token}'")));
        }
        values[count] = value;
        count += 1;
    }
    if count != N {
        return Err(malformed(
            line_no,
            format!("{key} has {count} values, expected {N}"),
        ));
    }
    Ok(values)
}
