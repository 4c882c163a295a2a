//! Line-oriented instance loading and tour export.
//!
//! The input format is the coordinate subset of TSPLIB: everything before a
//! `NODE_COORD_SECTION` marker is header (only a `NAME:` line is kept), each
//! line after it is `<id> <x> <y>` with the id ignored and nodes numbered in
//! file order, and parsing stops at `EOF` or end of input. Coordinates are
//! floating-point in the file and fixed-point (×10 000, truncated) in
//! memory.

use crate::error::{TspError, TspResult};
use crate::instance::{Instance, Point, COORD_SCALE};
use crate::tour::Tour;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Loads an instance from a coordinate file.
///
/// Fails with [`TspError::Io`] if the file cannot be opened or read, and
/// with [`TspError::NoCoordinates`] if the coordinate section yields zero
/// parsable lines. No partial instance is ever returned.
pub fn load_instance<P: AsRef<Path>>(path: P) -> TspResult<Instance> {
    let path = path.as_ref();
    let io_err = |source| TspError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let reader = BufReader::new(file);

    let mut name = String::new();
    let mut in_coords = false;
    let mut points = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if !in_coords {
            if line.starts_with("NAME") {
                if let Some((_, rest)) = line.split_once(':') {
                    name = rest.trim().to_string();
                }
            }
            if line == "NODE_COORD_SECTION" {
                in_coords = true;
            }
            continue;
        }

        if line == "EOF" {
            break;
        }

        if let Some(point) = parse_coord_line(line) {
            points.push(point);
        }
    }

    if points.is_empty() {
        return Err(TspError::NoCoordinates {
            path: path.to_path_buf(),
        });
    }

    // Non-empty by the check above, so construction cannot fail.
    Ok(Instance::new(points)
        .expect("non-empty point set")
        .with_name(name))
}

/// Parses one `<id> <x> <y>` coordinate line. Malformed lines are skipped by
/// the caller rather than treated as errors.
fn parse_coord_line(line: &str) -> Option<Point> {
    let mut parts = line.split_whitespace();
    let _id: i64 = parts.next()?.parse().ok()?;
    let x: f64 = parts.next()?.parse().ok()?;
    let y: f64 = parts.next()?.parse().ok()?;
    Some(Point::from_coords(x, y))
}

/// Writes a tour to `path`: one line per position with the 1-based position
/// index and the point's unscaled coordinates, space-separated.
pub fn save_tour<P: AsRef<Path>>(path: P, tour: &Tour) -> TspResult<()> {
    let path = path.as_ref();
    let io_err = |source| TspError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_tour(&mut writer, tour).map_err(io_err)?;
    writer.flush().map_err(io_err)
}

/// Writes a tour to any [`Write`] sink in the export format.
pub fn write_tour<W: Write>(mut writer: W, tour: &Tour) -> std::io::Result<()> {
    let instance = tour.instance();
    for (i, &id) in tour.order().iter().enumerate() {
        let p = instance.point(id);
        writeln!(
            writer,
            "{} {} {}",
            i + 1,
            p.x as f64 / COORD_SCALE,
            p.y as f64 / COORD_SCALE
        )?;
    }
    Ok(())
}
