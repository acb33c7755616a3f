//! Camera path through the track section graph
//!
//! The path is two walks from section 0 placed end to end: one that always
//! follows `next`, and one that takes a junction whenever the branch starts
//! there. Each walked section contributes the center of its drivable faces.
//! Points on jump sections are pushed forward along the incoming direction
//! so the spline does not snap across the gap.

use glam::DVec3;
use serde::Serialize;

use super::{FaceFlags, SectionFlags, TrackFace, TrackSection, TrackVertex};
use crate::FormatError;

/// Spline tension for the path consumer
pub const DEFAULT_TENSION: f32 = 0.5;

/// Spline bias for the path consumer
pub const DEFAULT_BIAS: f32 = 0.0;

/// Jump points move this fraction of the distance to the next point
const JUMP_EXTENSION: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathPoint {
    pub position: DVec3,
    /// Section the point was taken from
    pub section: usize,
    /// The section is a jump and `position` has been extended
    pub jump: bool,
}

/// Closed sequence of control points plus the spline settings to evaluate
/// them with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraPath {
    pub points: Vec<PathPoint>,
    pub tension: f32,
    pub bias: f32,
}

impl CameraPath {
    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.points.iter().map(|point| point.position)
    }

    pub fn with_spline(mut self, tension: f32, bias: f32) -> Self {
        self.tension = tension;
        self.bias = bias;
        self
    }
}

/// Average of every vertex used by the section's TRACK faces.
///
/// A section without TRACK faces has no center; the result is NaN in every
/// component.
pub fn section_center(
    index: usize,
    sections: &[TrackSection],
    faces: &[TrackFace],
    vertices: &[TrackVertex],
) -> Result<DVec3, FormatError> {
    let section = &sections[index];
    let first = section.first_face as usize;
    let end = first + usize::from(section.num_faces);
    let range = faces.get(first..end).ok_or(FormatError::FaceOutOfRange {
        section: index,
        first,
        end,
        count: faces.len(),
    })?;

    let mut sum = DVec3::ZERO;
    let mut count = 0u32;
    for (offset, face) in range.iter().enumerate() {
        if !face.flags.contains(FaceFlags::TRACK) {
            continue;
        }
        for &vertex in &face.indices {
            let vertex = usize::from(vertex);
            let TrackVertex(position) =
                *vertices.get(vertex).ok_or(FormatError::VertexOutOfRange {
                    face: first + offset,
                    vertex,
                    count: vertices.len(),
                })?;
            sum += position.as_dvec3();
            count += 1;
        }
    }

    if count == 0 {
        tracing::warn!(section = index, "section has no track faces");
    }
    Ok(sum / f64::from(count))
}

/// Section after `index`, or `None` when the walk is over
fn step(sections: &[TrackSection], index: usize, take_junctions: bool) -> Option<usize> {
    let section = &sections[index];
    let junction = usize::try_from(section.next_junction)
        .ok()
        .filter(|&j| {
            sections
                .get(j)
                .is_some_and(|target| target.flags.contains(SectionFlags::JUNCTION_START))
        });

    let next = match junction {
        Some(j) if take_junctions => j,
        _ => usize::try_from(section.next).ok()?,
    };
    // Returning to section 0 closes the loop
    (next > 0 && next < sections.len()).then_some(next)
}

/// Section indices visited from section 0
fn walk(sections: &[TrackSection], take_junctions: bool) -> Result<Vec<usize>, FormatError> {
    let mut order = vec![0];
    let mut index = 0;
    while let Some(next) = step(sections, index, take_junctions) {
        // Transitions are fixed, so a walk longer than the list repeats forever
        if order.len() >= sections.len() {
            return Err(FormatError::TopologyCycle(sections.len()));
        }
        order.push(next);
        index = next;
    }
    Ok(order)
}

/// Build the camera path for a track
pub fn build_path(
    sections: &[TrackSection],
    faces: &[TrackFace],
    vertices: &[TrackVertex],
) -> Result<CameraPath, FormatError> {
    if sections.is_empty() {
        return Err(FormatError::NoSections);
    }

    let mut order = walk(sections, false)?;
    let main_len = order.len();
    order.extend(walk(sections, true)?);

    let mut points = order
        .into_iter()
        .map(|section| {
            Ok(PathPoint {
                position: section_center(section, sections, faces, vertices)?,
                section,
                jump: sections[section].flags.contains(SectionFlags::JUMP),
            })
        })
        .collect::<Result<Vec<_>, FormatError>>()?;

    let len = points.len();
    for i in 0..len {
        if !points[i].jump {
            continue;
        }
        let point = points[i].position;
        let previous = points[(i + len - 1) % len].position;
        let next = points[(i + 1) % len].position;

        let tangent = (point - previous).normalize_or_zero();
        points[i].position += tangent * (next - point).length() * JUMP_EXTENSION;
    }

    tracing::debug!(
        main = main_len,
        branch = len - main_len,
        jumps = points.iter().filter(|p| p.jump).count(),
        "built camera path"
    );

    Ok(CameraPath {
        points,
        tension: DEFAULT_TENSION,
        bias: DEFAULT_BIAS,
    })
}
