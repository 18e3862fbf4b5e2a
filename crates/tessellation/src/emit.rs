use crate::geom::JoinArc;
use crate::geometry_builder::{GeometryBuilderError, StrokeGeometryBuilder};
use crate::math::Point;
use crate::segment::Segment;
use crate::{Color, LineJoin, StrokeOptions, VertexId};

/// Value of the anti-aliasing parameters when the corresponding fade is disabled.
pub const AA_DISABLED: f32 = -1.0;

/// Texture coordinates of the four corners of a segment.
const CORNER_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

/// What part of the stroke a vertex belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum StrokeVertexKind {
    /// One of the four corners of a segment's quad.
    SegmentCorner,
    /// A vertex of a bevel triangle or of a round join's fan.
    Join,
}

/// Vertex information from the `StrokeTessellator` accessible when building vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StrokeVertex {
    pub(crate) position: Point,
    pub(crate) position_on_path: Point,
    pub(crate) color: Color,
    pub(crate) tex_coord: [f32; 2],
    pub(crate) aa_params: [f32; 2],
    pub(crate) hard_edge: bool,
    pub(crate) kind: StrokeVertexKind,
}

impl StrokeVertex {
    /// The vertex position.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Position of the corresponding point on the path, unaffected by the line width.
    #[inline]
    pub fn position_on_path(&self) -> Point {
        self.position_on_path
    }

    /// The color that was current when the vertex was emitted.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Texture coordinates in `[0, 1]`.
    ///
    /// `u` goes along the segment from its start (0) to its end (1), `v` goes across it
    /// from the positive side of the normal (0) to the negative side (1).
    #[inline]
    pub fn tex_coord(&self) -> [f32; 2] {
        self.tex_coord
    }

    /// The `[e0, e1]` anti-aliasing parameters.
    ///
    /// A negative value means the corresponding fade is disabled.
    #[inline]
    pub fn aa_params(&self) -> [f32; 2] {
        self.aa_params
    }

    /// Whether the vertex is on an edge that touches a join.
    #[inline]
    pub fn is_hard_edge(&self) -> bool {
        self.hard_edge
    }

    #[inline]
    pub fn kind(&self) -> StrokeVertexKind {
        self.kind
    }
}

/// Anti-aliasing parameters of an edge of `segment`.
pub(crate) fn aa_params(segment: &Segment, hard: bool, options: &StrokeOptions) -> [f32; 2] {
    if segment.snapped {
        return [AA_DISABLED, AA_DISABLED];
    }

    let e0 = if hard {
        AA_DISABLED
    } else {
        segment.to_line_segment().square_length() * options.smoothing.length
    };
    let e1 = options.line_width * 0.5 * options.smoothing.thickness;

    [e0, e1]
}

/// Writes the quad of a segment: four vertices and the triangles `(c0, c1, c2)` and
/// `(c2, c3, c0)`.
#[cfg_attr(feature = "profiling", inline(never))]
pub(crate) fn emit_segment(
    segment: &Segment,
    hard_start: bool,
    hard_end: bool,
    options: &StrokeOptions,
    color: Color,
    output: &mut dyn StrokeGeometryBuilder,
) -> Result<(), GeometryBuilderError> {
    let start_params = aa_params(segment, hard_start, options);
    let end_params = aa_params(segment, hard_end, options);

    let mut ids = [VertexId::INVALID; 4];
    for (i, id) in ids.iter_mut().enumerate() {
        let at_start = i < 2;
        *id = output.add_stroke_vertex(StrokeVertex {
            position: segment.corners[i],
            position_on_path: if at_start { segment.start } else { segment.end },
            color,
            tex_coord: CORNER_TEX_COORDS[i],
            aa_params: if at_start { start_params } else { end_params },
            hard_edge: if at_start { hard_start } else { hard_end },
            kind: StrokeVertexKind::SegmentCorner,
        })?;
    }

    output.add_triangle(ids[0], ids[1], ids[2]);
    output.add_triangle(ids[2], ids[3], ids[0]);

    Ok(())
}

/// Writes the geometry of the join at the start of `segment`, if its join type has any.
///
/// The bevel triangle goes from the pivot to the two outer tips. Round joins add a fan
/// centered on the shared vertex covering the arc between the two tips.
///
/// Returns the number of triangles added.
#[cfg_attr(feature = "profiling", inline(never))]
pub(crate) fn emit_join(
    segment: &Segment,
    options: &StrokeOptions,
    color: Color,
    output: &mut dyn StrokeGeometryBuilder,
) -> Result<u32, GeometryBuilderError> {
    if !segment.join.has_geometry() {
        return Ok(0);
    }

    let [pivot, tip_last, tip_current] = segment.join_vertices;
    let center = segment.start;
    let positive = segment.dot > 0.0;

    // The pivot is on the inner side of the turn, which flips with the turn direction.
    let (outer_v, inner_v) = if positive { (0.0, 1.0) } else { (1.0, 0.0) };

    let aa = [AA_DISABLED, aa_params(segment, true, options)[1]];

    let mut vertex = StrokeVertex {
        position: pivot,
        position_on_path: center,
        color,
        tex_coord: [1.0, inner_v],
        aa_params: aa,
        hard_edge: true,
        kind: StrokeVertexKind::Join,
    };

    let pivot_id = output.add_stroke_vertex(vertex)?;

    vertex.position = tip_last;
    vertex.tex_coord = [1.0, outer_v];
    let last_id = output.add_stroke_vertex(vertex)?;

    vertex.position = tip_current;
    vertex.tex_coord = [0.0, outer_v];
    let current_id = output.add_stroke_vertex(vertex)?;

    if positive {
        output.add_triangle(pivot_id, current_id, last_id);
    } else {
        output.add_triangle(pivot_id, last_id, current_id);
    }

    if segment.join != LineJoin::Round {
        return Ok(1);
    }

    let arc = match JoinArc::between(center, tip_last, tip_current) {
        Some(arc) => arc,
        None => return Ok(1),
    };

    let num_steps = arc.num_steps(options.round_join_step);
    if num_steps == 0 {
        return Ok(1);
    }

    vertex.position = center;
    vertex.tex_coord = [0.5, 0.5];
    let center_id = output.add_stroke_vertex(vertex)?;

    let counter_clockwise = arc.is_positive();
    let mut result: Result<(), GeometryBuilderError> = Ok(());
    let mut prev_id = last_id;
    let mut remaining = num_steps;

    arc.for_each_fan_triangle(options.round_join_step, &mut |_, next| {
        if result.is_err() {
            return;
        }

        remaining -= 1;
        let next_id = if remaining == 0 {
            current_id
        } else {
            vertex.position = next;
            vertex.tex_coord = [0.5, outer_v];
            match output.add_stroke_vertex(vertex) {
                Ok(id) => id,
                Err(e) => {
                    result = Err(e);
                    return;
                }
            }
        };

        if counter_clockwise {
            output.add_triangle(center_id, prev_id, next_id);
        } else {
            output.add_triangle(center_id, next_id, prev_id);
        }

        prev_id = next_id;
    });

    result?;

    Ok(1 + num_steps)
}
