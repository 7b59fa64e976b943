//! PLY import.
//!
//! Reads the `vertex` element of ASCII or binary PLY files into a
//! [`PointCloud`]. Positions may be stored as float or double,
//! colors as uchar (0–255) or float (0–1); anything else on a vertex
//! is ignored. Face elements are skipped — Cumulus renders points.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use ply_rs::parser::Parser;
use ply_rs::ply::{Property, PropertyAccess};
use thiserror::Error;

use crate::{Point, PointCloud};

#[derive(Error, Debug)]
pub enum PlyError {
    #[error("Failed to read PLY data: {0}")]
    Io(#[from] std::io::Error),
    #[error("PLY file has no 'vertex' element")]
    NoVertexElement,
}

/// Load the points of a PLY file.
pub fn load_ply(path: &Path) -> Result<PointCloud, PlyError> {
    let file = File::open(path)?;
    let cloud = read_ply(&mut BufReader::new(file))?;
    debug!("Loaded {} points from {}", cloud.len(), path.display());
    Ok(cloud)
}

/// Parse PLY data from any buffered reader.
///
/// Split out from [`load_ply`] so tests can parse in-memory documents.
pub fn read_ply<R: BufRead>(reader: &mut R) -> Result<PointCloud, PlyError> {
    let parser = Parser::<PlyPoint>::new();
    let header = parser.read_header(reader)?;

    let mut vertices: Option<Vec<PlyPoint>> = None;
    for (_, element) in &header.elements {
        if element.name == "vertex" {
            vertices = Some(parser.read_payload_for_element(reader, element, &header)?);
        } else {
            // Faces (and anything else) still occupy the payload in
            // binary files, so they must be consumed to keep the
            // reader positioned correctly.
            let _ = parser.read_payload_for_element(reader, element, &header)?;
        }
    }

    let vertices = vertices.ok_or(PlyError::NoVertexElement)?;
    Ok(vertices.into_iter().map(PlyPoint::into_point).collect())
}

/// Accumulator for one PLY vertex record.
#[derive(Clone, Copy, Debug, Default)]
struct PlyPoint {
    position: [f32; 3],
    color: [f32; 3],
}

impl PlyPoint {
    fn into_point(self) -> Point {
        Point::new(self.position, self.color)
    }

    fn scalar(property: &Property) -> Option<f32> {
        match *property {
            Property::Float(v) => Some(v),
            Property::Double(v) => Some(v as f32),
            _ => None,
        }
    }

    fn channel(property: &Property) -> Option<f32> {
        match *property {
            Property::UChar(v) => Some(v as f32 / 255.0),
            Property::Float(v) => Some(v),
            Property::Double(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl PropertyAccess for PlyPoint {
    fn new() -> Self {
        Self::default()
    }

    fn set_property(&mut self, key: String, property: Property) {
        let stored = match key.as_str() {
            "x" => Self::scalar(&property).map(|v| self.position[0] = v),
            "y" => Self::scalar(&property).map(|v| self.position[1] = v),
            "z" => Self::scalar(&property).map(|v| self.position[2] = v),
            "red" => Self::channel(&property).map(|v| self.color[0] = v),
            "green" => Self::channel(&property).map(|v| self.color[1] = v),
            "blue" => Self::channel(&property).map(|v| self.color[2] = v),
            _ => return, // normals, alpha, scalar fields: not ours
        };
        if stored.is_none() {
            warn!("Ignoring vertex property '{key}' with unsupported type");
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
