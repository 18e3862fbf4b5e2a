use crate::geometry_builder::*;
use crate::math::*;
use crate::*;

use std::vec::Vec;

/// Records everything the tessellator does, and checks the winding of every triangle.
struct Recorder {
    vertices: Vec<StrokeVertex>,
    triangles: Vec<[VertexId; 3]>,
    max_vertices: usize,
    check_winding: bool,
    begin_count: u32,
    end_count: u32,
    abort_count: u32,
    projection: Option<Projection>,
}

impl Recorder {
    fn new() -> Self {
        Recorder {
            vertices: Vec::new(),
            triangles: Vec::new(),
            max_vertices: usize::MAX,
            check_winding: true,
            begin_count: 0,
            end_count: 0,
            abort_count: 0,
            projection: None,
        }
    }

    fn position(&self, id: VertexId) -> Point {
        self.vertices[id.to_usize()].position()
    }

    fn join_vertices(&self) -> Vec<StrokeVertex> {
        self.vertices
            .iter()
            .filter(|v| v.kind() == StrokeVertexKind::Join)
            .cloned()
            .collect()
    }
}

impl GeometryBuilder for Recorder {
    fn begin_geometry(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.begin_count += 1;
    }

    fn end_geometry(&mut self) {
        self.end_count += 1;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        assert!(a != b && b != c && a != c);
        assert!(a.to_usize() < self.vertices.len());
        assert!(b.to_usize() < self.vertices.len());
        assert!(c.to_usize() < self.vertices.len());

        if self.check_winding {
            let pa = self.position(a);
            let pb = self.position(b);
            let pc = self.position(c);
            let area = (pb - pa).cross(pc - pa);
            if area < -0.0001 {
                panic!("bad winding: {:?} {:?} {:?} (area {})", pa, pb, pc, area);
            }
        }

        self.triangles.push([a, b, c]);
    }

    fn abort_geometry(&mut self) {
        self.abort_count += 1;
        self.vertices.clear();
        self.triangles.clear();
    }

    fn set_projection(&mut self, projection: &Projection) {
        self.projection = Some(*projection);
    }
}

impl StrokeGeometryBuilder for Recorder {
    fn add_stroke_vertex(
        &mut self,
        vertex: StrokeVertex,
    ) -> Result<VertexId, GeometryBuilderError> {
        if self.vertices.len() >= self.max_vertices {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.vertices.push(vertex);
        Ok(VertexId::from_usize(self.vertices.len() - 1))
    }
}

fn stroke(options: StrokeOptions, points: &[Point]) -> Recorder {
    let mut tess = StrokeTessellator::with_options(options, Recorder::new());
    tess.tessellate_polyline(points, false).unwrap();
    tess.into_output()
}

fn assert_almost_eq(a: Point, b: Point) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

fn contains_point(vertices: &[StrokeVertex], p: Point) -> bool {
    vertices
        .iter()
        .any(|v| (v.position() - p).square_length() < 0.00001)
}

#[test]
fn single_horizontal_segment() {
    let options = StrokeOptions::default().with_line_width(2.0);
    let out = stroke(options, &[point(0.0, 0.0), point(10.0, 0.0)]);

    assert_eq!(out.vertices.len(), 4);
    assert_eq!(out.triangles.len(), 2);

    for p in &[
        point(0.0, 1.0),
        point(0.0, -1.0),
        point(10.0, 1.0),
        point(10.0, -1.0),
    ] {
        assert!(contains_point(&out.vertices, *p), "missing corner {:?}", p);
    }

    for v in &out.vertices {
        assert_eq!(v.kind(), StrokeVertexKind::SegmentCorner);
        assert!(!v.is_hard_edge());
        // Horizontal segments are snapped.
        assert_eq!(v.aa_params(), [AA_DISABLED, AA_DISABLED]);
        assert_eq!(v.color(), Color::WHITE);
    }

    assert_eq!(out.vertices[0].position_on_path(), point(0.0, 0.0));
    assert_eq!(out.vertices[1].position_on_path(), point(0.0, 0.0));
    assert_eq!(out.vertices[2].position_on_path(), point(10.0, 0.0));
    assert_eq!(out.vertices[3].position_on_path(), point(10.0, 0.0));

    assert_eq!(out.vertices[0].tex_coord(), [0.0, 0.0]);
    assert_eq!(out.vertices[1].tex_coord(), [0.0, 1.0]);
    assert_eq!(out.vertices[2].tex_coord(), [1.0, 1.0]);
    assert_eq!(out.vertices[3].tex_coord(), [1.0, 0.0]);

    assert_eq!(out.begin_count, 1);
    assert_eq!(out.end_count, 1);
    assert_eq!(out.abort_count, 0);
}

#[test]
fn diagonal_segment_is_widened_and_anti_aliased() {
    let options = StrokeOptions::default().with_line_width(2.0);
    let out = stroke(options, &[point(0.0, 0.0), point(3.0, 4.0)]);

    assert_eq!(out.vertices.len(), 4);

    // ceil(2 + sqrt(2) + 0.5) = 4
    for v in &out.vertices {
        let distance = (v.position() - v.position_on_path()).length();
        assert!((distance - 2.0).abs() < 0.0001, "distance {}", distance);

        let [e0, e1] = v.aa_params();
        assert!((e0 - 25.0).abs() < 0.0001);
        assert!((e1 - 0.9).abs() < 0.0001);
        assert!(!v.is_hard_edge());
    }
}

#[test]
fn axis_snap_disabled() {
    let options = StrokeOptions::default()
        .with_line_width(4.0)
        .with_axis_snap(false);
    let out = stroke(options, &[point(0.0, 5.0), point(10.0, 5.0)]);

    // ceil(4 + sqrt(2) + 0.5) = 6
    assert!(contains_point(&out.vertices, point(0.0, 8.0)));
    assert!(contains_point(&out.vertices, point(10.0, 2.0)));

    for v in &out.vertices {
        let [e0, e1] = v.aa_params();
        assert!((e0 - 100.0).abs() < 0.0001);
        assert!((e1 - 1.8).abs() < 0.0001);
    }
}

#[test]
fn axis_aligned_segment_keeps_its_width() {
    let options = StrokeOptions::default().with_line_width(4.0);
    let out = stroke(options, &[point(0.0, 5.0), point(0.0, -5.0)]);

    for v in &out.vertices {
        let distance = (v.position() - v.position_on_path()).length();
        assert_eq!(distance, 2.0);
        assert_eq!(v.aa_params(), [AA_DISABLED, AA_DISABLED]);
    }
}

#[test]
fn right_angle_miter() {
    let options = StrokeOptions::default()
        .with_line_width(2.0)
        .with_line_join(LineJoin::Miter)
        .with_miter_limit(0.75);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
    );

    assert_eq!(out.vertices.len(), 8);
    assert_eq!(out.triangles.len(), 4);
    assert!(out.join_vertices().is_empty());

    // The corners of both segments meet at the miter points.
    assert_eq!(out.vertices[3].position(), out.vertices[4].position());
    assert_eq!(out.vertices[2].position(), out.vertices[5].position());
    assert_almost_eq(out.vertices[3].position(), point(9.0, 1.0));
    assert_almost_eq(out.vertices[2].position(), point(11.0, -1.0));

    // Edges touching the join are hard.
    assert!(!out.vertices[0].is_hard_edge());
    assert!(out.vertices[2].is_hard_edge());
    assert!(out.vertices[4].is_hard_edge());
    assert!(!out.vertices[6].is_hard_edge());
}

#[test]
fn sharp_turn_falls_back_to_bevel() {
    let options = StrokeOptions::default()
        .with_line_width(2.0)
        .with_line_join(LineJoin::Miter)
        .with_miter_limit(0.9);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(100.0, 0.0), point(0.0, 10.0)],
    );

    assert_eq!(out.vertices.len(), 11);
    assert_eq!(out.triangles.len(), 5);

    let join = out.join_vertices();
    assert_eq!(join.len(), 3);
    for v in &join {
        assert!(v.is_hard_edge());
        assert_eq!(v.aa_params()[0], AA_DISABLED);
        assert_eq!(v.position_on_path(), point(100.0, 0.0));
    }

    // The second segment is diagonal: its far end fades along its length.
    let last = out.vertices[10];
    assert_eq!(last.kind(), StrokeVertexKind::SegmentCorner);
    assert!((last.aa_params()[0] - 10100.0).abs() < 0.01);
}

#[test]
fn miter_limit_is_a_dot_product_threshold() {
    let options = StrokeOptions::default()
        .with_line_join(LineJoin::Miter)
        .with_miter_limit(0.9);

    for &(turn_cos, num_triangles) in &[(-0.89f32, 4), (-0.91f32, 5)] {
        let sin = (1.0 - turn_cos * turn_cos).sqrt();
        let out = stroke(
            options,
            &[
                point(0.0, 0.0),
                point(10.0, 0.0),
                point(10.0 + turn_cos * 10.0, sin * 10.0),
            ],
        );
        assert_eq!(out.triangles.len(), num_triangles, "turn cos {}", turn_cos);
    }
}

#[test]
fn bevel_join() {
    let options = StrokeOptions::default()
        .with_line_width(2.0)
        .with_line_join(LineJoin::Bevel);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
    );

    // Quad, bevel, quad.
    assert_eq!(out.vertices.len(), 11);
    assert_eq!(out.triangles.len(), 5);
    assert_eq!(out.triangles[2], [VertexId(4), VertexId(5), VertexId(6)]);

    let join = out.join_vertices();
    assert_almost_eq(join[0].position(), point(9.0, 1.0));
    assert_eq!(join[1].position(), point(10.0, -1.0));
    assert_eq!(join[2].position(), point(11.0, 0.0));

    // Turning left, the outer side is the negative side of the normal.
    assert_eq!(join[0].tex_coord(), [1.0, 0.0]);
    assert_eq!(join[1].tex_coord(), [1.0, 1.0]);
    assert_eq!(join[2].tex_coord(), [0.0, 1.0]);

    // The inner corners are pulled to the pivot, the outer ones stay on the segments.
    assert_almost_eq(out.vertices[3].position(), point(9.0, 1.0));
    assert_almost_eq(out.vertices[7].position(), point(9.0, 1.0));
    assert_eq!(out.vertices[2].position(), point(10.0, -1.0));
    assert_eq!(out.vertices[8].position(), point(11.0, 0.0));
}

#[test]
fn bevel_join_turning_right() {
    let options = StrokeOptions::default()
        .with_line_width(2.0)
        .with_line_join(LineJoin::Bevel);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, -10.0)],
    );

    assert_eq!(out.triangles.len(), 5);
    assert_eq!(out.triangles[2], [VertexId(4), VertexId(6), VertexId(5)]);

    let join = out.join_vertices();
    assert_almost_eq(join[0].position(), point(9.0, -1.0));
    assert_eq!(join[0].tex_coord(), [1.0, 1.0]);
    assert_eq!(join[1].tex_coord(), [1.0, 0.0]);
    assert_eq!(join[2].tex_coord(), [0.0, 0.0]);
}

#[test]
fn round_join_step() {
    let path = [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
    let options = StrokeOptions::default()
        .with_line_width(2.0)
        .with_line_join(LineJoin::Round);

    // Two quads, the bevel triangle and a fan over a quarter turn.
    let fine = stroke(options.with_round_join_step(core::f32::consts::PI / 18.0), &path);
    assert_eq!(fine.triangles.len(), 4 + 1 + 9);
    assert_eq!(fine.vertices.len(), 8 + 3 + 1 + 8);

    let coarse = stroke(options.with_round_join_step(core::f32::consts::PI / 4.0), &path);
    assert_eq!(coarse.triangles.len(), 4 + 1 + 2);
    assert_eq!(coarse.vertices.len(), 8 + 3 + 1 + 1);

    // The fan vertices are on the circle of radius half the line width.
    for v in fine.join_vertices().iter().skip(3) {
        if v.tex_coord() == [0.5, 0.5] {
            assert_eq!(v.position(), point(10.0, 0.0));
        } else {
            let r = (v.position() - point(10.0, 0.0)).length();
            assert!((r - 1.0).abs() < 0.0001);
        }
    }
}

#[test]
fn round_join_without_visible_turn() {
    let options = StrokeOptions::default().with_line_join(LineJoin::Round);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(20.0, 0.0001)],
    );

    // The sweep is too small for the fan, only the bevel triangle remains.
    assert_eq!(out.triangles.len(), 5);
    assert_eq!(out.join_vertices().len(), 3);
}

#[test]
fn no_join() {
    let options = StrokeOptions::default()
        .with_line_width(2.0)
        .with_line_join(LineJoin::None);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
    );

    assert_eq!(out.vertices.len(), 8);
    assert_eq!(out.triangles.len(), 4);
    assert!(out.join_vertices().is_empty());
}

#[test]
fn collinear_segments_share_corners() {
    let options = StrokeOptions::default().with_line_width(3.0);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(20.0, 0.0)],
    );

    assert_eq!(out.triangles.len(), 4);
    assert_eq!(out.vertices[3].position(), out.vertices[4].position());
    assert_eq!(out.vertices[2].position(), out.vertices[5].position());
}

#[test]
fn reversal_has_no_join() {
    let options = StrokeOptions::default()
        .with_line_width(2.0)
        .with_line_join(LineJoin::Round);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(5.0, 0.0)],
    );

    assert_eq!(out.vertices.len(), 8);
    assert!(out.join_vertices().is_empty());
}

#[test]
fn diagonal_corner_distance() {
    let options = StrokeOptions::default()
        .with_line_width(4.0)
        .with_line_join(LineJoin::None);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(12.0, 16.0), point(24.0, 0.0)],
    );

    // ceil(4 + sqrt(2) + 0.5) = 6, half of it on each side. Only the inner corners at
    // the join are moved.
    let mut on_join = 0;
    for v in &out.vertices {
        let distance = (v.position() - v.position_on_path()).length();
        if v.position_on_path() == point(12.0, 16.0) && (distance - 3.0).abs() > 0.0001 {
            assert!(distance > 3.0);
            on_join += 1;
            continue;
        }
        assert!((distance - 3.0).abs() < 0.0001, "distance {}", distance);
    }
    assert_eq!(on_join, 2);
}

#[test]
fn identical_output() {
    let options = StrokeOptions::default()
        .with_line_width(3.0)
        .with_line_join(LineJoin::Round);
    let path = [
        point(0.0, 0.0),
        point(12.5, 3.0),
        point(20.0, 20.0),
        point(5.0, 22.0),
        point(-4.0, 9.0),
    ];

    let mut tess = StrokeTessellator::with_options(options, Recorder::new());
    tess.tessellate_polyline(&path, true).unwrap();
    let first_vertices = tess.output().vertices.clone();
    let first_triangles = tess.output().triangles.clone();

    tess.tessellate_polyline(&path, true).unwrap();
    let out = tess.output();

    assert_eq!(first_triangles, out.triangles);
    assert_eq!(first_vertices.len(), out.vertices.len());
    for (a, b) in first_vertices.iter().zip(out.vertices.iter()) {
        assert_eq!(a.position().x.to_bits(), b.position().x.to_bits());
        assert_eq!(a.position().y.to_bits(), b.position().y.to_bits());
        assert_eq!(a.aa_params()[0].to_bits(), b.aa_params()[0].to_bits());
        assert_eq!(a.aa_params()[1].to_bits(), b.aa_params()[1].to_bits());
        assert_eq!(a, b);
    }
}

#[test]
fn zero_length_segments_are_skipped() {
    let options = StrokeOptions::default().with_line_width(2.0);
    let reference = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
    );
    let out = stroke(
        options,
        &[
            point(0.0, 0.0),
            point(0.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
        ],
    );

    assert_eq!(reference.vertices, out.vertices);
    assert_eq!(reference.triangles, out.triangles);
}

#[test]
fn first_line_to_acts_as_move_to() {
    let mut tess = StrokeTessellator::new(Recorder::new());
    tess.begin().unwrap();
    tess.line_to(point(0.0, 0.0)).unwrap();
    tess.line_to(point(10.0, 0.0)).unwrap();
    tess.end().unwrap();

    let out = tess.output();
    assert_eq!(out.vertices.len(), 4);
    assert_eq!(out.vertices[0].position_on_path(), point(0.0, 0.0));
}

#[test]
fn move_to_breaks_the_path() {
    let options = StrokeOptions::default().with_line_width(2.0);
    let mut tess = StrokeTessellator::with_options(options, Recorder::new());
    tess.begin().unwrap();
    tess.move_to(point(0.0, 0.0)).unwrap();
    tess.line_to(point(10.0, 0.0)).unwrap();
    tess.move_to(point(10.0, 5.0)).unwrap();
    tess.line_to(point(10.0, 15.0)).unwrap();
    tess.end().unwrap();

    let out = tess.output();
    assert_eq!(out.vertices.len(), 8);
    assert_eq!(out.triangles.len(), 4);
    assert!(out.vertices.iter().all(|v| !v.is_hard_edge()));
}

#[test]
fn move_to_the_pen_position_keeps_the_path() {
    let options = StrokeOptions::default().with_line_width(2.0);
    let mut tess = StrokeTessellator::with_options(options, Recorder::new());
    tess.begin().unwrap();
    tess.move_to(point(0.0, 0.0)).unwrap();
    tess.move_to(point(0.0, 0.0)).unwrap();
    tess.line_to(point(10.0, 0.0)).unwrap();
    tess.line_to(point(10.0, 10.0)).unwrap();
    tess.end().unwrap();

    assert_eq!(tess.output().triangles.len(), 4);
    assert!(tess.output().vertices[2].is_hard_edge());
}

#[test]
fn closed_square() {
    let options = StrokeOptions::default().with_line_width(2.0);
    let mut tess = StrokeTessellator::with_options(options, Recorder::new());
    tess.tessellate(std::vec![
        PathEvent::MoveTo(point(0.0, 0.0)),
        PathEvent::LineTo(point(10.0, 0.0)),
        PathEvent::LineTo(point(10.0, 10.0)),
        PathEvent::LineTo(point(0.0, 10.0)),
        PathEvent::Close,
    ])
    .unwrap();

    let out = tess.output();
    // Four segments, three miter joins. The start point is not joined.
    assert_eq!(out.vertices.len(), 16);
    assert_eq!(out.triangles.len(), 8);
    assert_eq!(out.vertices[15].position_on_path(), point(0.0, 0.0));
    assert!(!out.vertices[15].is_hard_edge());
}

#[test]
fn zero_line_width() {
    let options = StrokeOptions::default().with_line_width(0.0);
    let out = stroke(
        options,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
    );

    assert!(out.vertices.is_empty());
    assert!(out.triangles.is_empty());
    assert_eq!(out.begin_count, 1);
    assert_eq!(out.end_count, 1);
}

#[test]
fn color_applies_to_emitted_geometry() {
    let red = Color::rgb(255, 0, 0);
    let blue = Color::rgb(0, 0, 255);

    let mut tess = StrokeTessellator::new(Recorder::new());
    tess.set_color(red);
    tess.begin().unwrap();
    tess.move_to(point(0.0, 0.0)).unwrap();
    tess.line_to(point(10.0, 0.0)).unwrap();
    tess.move_to(point(0.0, 5.0)).unwrap();
    tess.set_color(blue);
    tess.line_to(point(10.0, 5.0)).unwrap();
    tess.end().unwrap();

    let out = tess.output();
    assert!(out.vertices[0..4].iter().all(|v| v.color() == red));
    assert!(out.vertices[4..8].iter().all(|v| v.color() == blue));
    assert_eq!(blue.packed(), u32::from_le_bytes([0, 0, 255, 255]));
}

#[test]
fn projection_is_forwarded() {
    let projection = Projection::ortho(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);

    let mut buffers: VertexBuffers<StrokeVertex, u16> = VertexBuffers::new();
    {
        let builder = BuffersBuilder::new(&mut buffers, |v: StrokeVertex| v);
        let mut tess = StrokeTessellator::new(builder);
        tess.set_projection(&projection);
        assert_eq!(*tess.projection(), projection);
        tess.tessellate_polyline(&[point(0.0, 0.0), point(10.0, 0.0)], false)
            .unwrap();
    }

    assert_eq!(buffers.projection, projection);
    assert_eq!(buffers.vertices.len(), 4);
    assert_eq!(buffers.indices, std::vec![0, 1, 2, 2, 3, 0]);
    // The projection is not applied to the vertices.
    assert_eq!(buffers.vertices[2].position(), point(10.0, -0.5));
}

#[test]
fn inverted_winding() {
    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    {
        let builder = BuffersBuilder::new(&mut buffers, Positions).with_inverted_winding();
        let mut tess = StrokeTessellator::new(builder);
        tess.tessellate_polyline(&[point(0.0, 0.0), point(10.0, 0.0)], false)
            .unwrap();
    }

    assert_eq!(buffers.indices, std::vec![0, 2, 1, 2, 0, 3]);
}

#[test]
fn usage_errors() {
    let mut tess = StrokeTessellator::new(NoOutput::new());

    assert_eq!(
        tess.end(),
        Err(TessellationError::Usage(UsageError::EndWithoutBegin))
    );
    assert_eq!(
        tess.move_to(point(0.0, 0.0)),
        Err(TessellationError::Usage(UsageError::CommandOutsideOfBatch))
    );
    assert_eq!(
        tess.line_to(point(1.0, 0.0)),
        Err(TessellationError::Usage(UsageError::CommandOutsideOfBatch))
    );

    tess.begin().unwrap();
    assert_eq!(
        tess.begin(),
        Err(TessellationError::Usage(UsageError::BeginWhileDrawing))
    );
    assert!(tess.is_drawing());

    assert_eq!(
        tess.line_to(point(f32::NAN, 0.0)),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::PositionIsNaN
        ))
    );

    // The batch is still usable.
    tess.move_to(point(0.0, 0.0)).unwrap();
    tess.line_to(point(10.0, 0.0)).unwrap();
    tess.end().unwrap();
    assert!(!tess.is_drawing());
    assert_eq!(tess.output().num_vertices(), 4);
    assert_eq!(tess.output().num_triangles(), 2);
}

#[test]
fn invalid_options() {
    let mut tess = StrokeTessellator::new(NoOutput::new());

    assert_eq!(
        tess.set_line_width(-1.0),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::LineWidth
        ))
    );
    assert_eq!(
        tess.set_miter_limit(1.5),
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::MiterLimit
        ))
    );
    assert_eq!(*tess.options(), StrokeOptions::DEFAULT);

    tess.set_line_width(5.0).unwrap();
    tess.set_line_join(LineJoin::Round);
    assert_eq!(tess.options().line_width, 5.0);
    assert_eq!(tess.options().line_join, LineJoin::Round);
}

#[test]
fn nan_in_tessellate_aborts() {
    let mut tess = StrokeTessellator::new(Recorder::new());
    let result = tess.tessellate_polyline(&[point(0.0, 0.0), point(f32::NAN, 1.0)], false);

    assert_eq!(
        result,
        Err(TessellationError::UnsupportedParameter(
            UnsupportedParameter::PositionIsNaN
        ))
    );
    assert!(!tess.is_drawing());
    assert_eq!(tess.output().abort_count, 1);
    assert_eq!(tess.output().end_count, 0);
}

#[test]
fn too_many_vertices() {
    let mut recorder = Recorder::new();
    recorder.max_vertices = 6;

    let mut tess = StrokeTessellator::new(recorder);
    let result = tess.tessellate_polyline(
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
        false,
    );

    assert_eq!(
        result,
        Err(TessellationError::GeometryBuilder(
            GeometryBuilderError::TooManyVertices
        ))
    );
    assert!(!tess.is_drawing());
    assert_eq!(tess.output().abort_count, 1);
    assert_eq!(tess.output().end_count, 0);

    // The tessellator can start over.
    tess.output_mut().max_vertices = usize::MAX;
    tess.tessellate_polyline(&[point(0.0, 0.0), point(10.0, 0.0)], false)
        .unwrap();
    assert_eq!(tess.output().vertices.len(), 4);
}

#[test]
fn u16_buffers_overflow() {
    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    let mut points = Vec::new();
    for i in 0..20_000 {
        points.push(point(i as f32, (i % 2) as f32 * 10.0));
    }

    let result = StrokeTessellator::new(simple_builder(&mut buffers))
        .tessellate_polyline(&points, false);

    assert_eq!(
        result,
        Err(TessellationError::GeometryBuilder(
            GeometryBuilderError::TooManyVertices
        ))
    );
    // The aborted geometry was discarded.
    assert!(buffers.vertices.is_empty());
    assert!(buffers.indices.is_empty());
}

#[test]
fn pixel_snap() {
    let options = StrokeOptions::default().with_pixel_snap(true);
    let out = stroke(options, &[point(0.3, 0.2), point(10.4, 0.2)]);

    assert!(contains_point(&out.vertices, point(0.5, 0.0)));
    assert!(contains_point(&out.vertices, point(0.5, 1.0)));
    assert!(contains_point(&out.vertices, point(10.5, 0.0)));
    assert!(contains_point(&out.vertices, point(10.5, 1.0)));
}

#[test]
fn winding_of_random_polylines() {
    // Moderate turns, segments much longer than the line width. See
    // sharp_turns_stay_close_to_the_path for the sharp ones.
    let path = [
        point(0.0, 0.0),
        point(40.0, 5.0),
        point(70.0, 40.0),
        point(50.0, 80.0),
        point(0.0, 90.0),
        point(-30.0, 60.0),
        point(-20.0, 20.0),
    ];

    for &join in &[LineJoin::None, LineJoin::Miter, LineJoin::Bevel, LineJoin::Round] {
        for &width in &[1.0, 2.0, 5.0] {
            let options = StrokeOptions::default()
                .with_line_width(width)
                .with_line_join(join);
            let out = stroke(options, &path);
            assert!(!out.triangles.is_empty());
        }
    }
}

fn distance_to_polyline(p: Point, path: &[Point], closed: bool) -> f32 {
    let mut edges: Vec<(Point, Point)> = path.windows(2).map(|w| (w[0], w[1])).collect();
    if closed {
        edges.push((path[path.len() - 1], path[0]));
    }

    let mut min = f32::MAX;
    for (a, b) in edges {
        let ab = b - a;
        let t = ((p - a).dot(ab) / ab.square_length()).max(0.0).min(1.0);
        min = min.min((p - a.lerp(b, t)).length());
    }

    min
}

#[test]
fn sharp_turns_stay_close_to_the_path() {
    let paths: &[(&[Point], bool)] = &[
        (&[point(0.0, 0.0), point(50.0, 0.0), point(0.0, 1.0)], false),
        (&[point(0.0, 0.0), point(10.0, 0.0), point(0.0, 0.05)], false),
        (&[point(0.0, 0.0), point(100.0, 0.0), point(100.0, 0.5), point(0.0, 0.5)], false),
        (
            &[
                point(0.0, 0.0),
                point(10.0, 0.0),
                point(9.0, 0.3),
                point(20.0, 0.5),
                point(0.0, 40.0),
                point(1.0, -3.0),
            ],
            false,
        ),
        (
            &[
                point(0.0, 0.0),
                point(3.0, 0.2),
                point(0.0, 0.4),
                point(3.0, 0.6),
                point(0.0, 0.8),
            ],
            true,
        ),
    ];

    for &(path, closed) in paths {
        for &join in &[LineJoin::None, LineJoin::Miter, LineJoin::Bevel, LineJoin::Round] {
            for &width in &[1.0f32, 2.0, 5.0] {
                for &miter_limit in &[0.9f32, 1.0] {
                    let options = StrokeOptions::default()
                        .with_line_width(width)
                        .with_line_join(join)
                        .with_miter_limit(miter_limit);

                    // The recorder checks the winding of every triangle.
                    let mut tess = StrokeTessellator::with_options(options, Recorder::new());
                    tess.tessellate_polyline(path, closed).unwrap();
                    let out = tess.output();
                    assert!(!out.triangles.is_empty());

                    let half = (width + core::f32::consts::SQRT_2 + 0.5).ceil() * 0.5;
                    let longest = path
                        .windows(2)
                        .map(|w| (w[1] - w[0]).length())
                        .fold(0.0, f32::max);
                    let max_distance = match join {
                        // A turn within the miter limit of 0.9 has a miter of at most 4.5
                        // times the half width.
                        LineJoin::Miter if miter_limit < 1.0 => half * 4.5,
                        LineJoin::Miter => half + longest / 3.0,
                        _ => half,
                    };

                    for v in &out.vertices {
                        let p = v.position();
                        let d = distance_to_polyline(p, path, closed);
                        assert!(
                            d <= max_distance + 0.001,
                            "{:?} is {} away from the path ({:?}, width {})",
                            p,
                            d,
                            join,
                            width,
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn tiny_offsets_are_stroked() {
    let mut tess = StrokeTessellator::new(Recorder::new());
    tess.begin().unwrap();
    tess.move_to(point(0.0, 0.0)).unwrap();
    tess.line_to(point(10.0, 0.0)).unwrap();
    tess.line_to(point(10.0, 1e-30)).unwrap();
    tess.end().unwrap();

    let out = tess.output();
    // Two quads and the bevel triangle: the second segment is too short for a miter.
    assert_eq!(out.vertices.len(), 11);
    assert_eq!(out.triangles.len(), 5);
    for v in &out.vertices {
        let p = v.position();
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!((p - point(5.0, 0.0)).length() <= 5.6, "{:?}", p);
    }
    assert_eq!(out.vertices[4].position_on_path(), point(10.0, 0.0));
    assert_eq!(out.vertices[10].position_on_path(), point(10.0, 1e-30));
}

#[test]
fn huge_offsets_are_stroked() {
    let mut tess = StrokeTessellator::new(Recorder::new());
    tess.begin().unwrap();
    tess.move_to(point(-3e19, 0.0)).unwrap();
    tess.line_to(point(3e19, 1e19)).unwrap();
    tess.end().unwrap();

    let out = tess.output();
    assert_eq!(out.vertices.len(), 4);
    assert_eq!(out.triangles.len(), 2);
    for v in &out.vertices {
        let on_path = v.position_on_path();
        assert!(on_path == point(-3e19, 0.0) || on_path == point(3e19, 1e19));
        // The offset is far below the precision of the coordinates.
        assert!((v.position() - on_path).length() <= 1.0);
    }
}

#[test]
fn segments_without_direction_are_skipped() {
    // The difference between these points overflows.
    let mut tess = StrokeTessellator::new(Recorder::new());
    tess.begin().unwrap();
    tess.move_to(point(-3e38, 0.0)).unwrap();
    tess.line_to(point(3e38, 0.0)).unwrap();
    assert!(tess.is_drawing());
    tess.line_to(point(-3e38, 10.0)).unwrap();
    tess.end().unwrap();

    // Only the second segment is drawn, from the pen position that didn't move.
    let out = tess.output();
    assert_eq!(out.vertices.len(), 4);
    assert_eq!(out.vertices[0].position_on_path(), point(-3e38, 0.0));
    assert_eq!(out.vertices[2].position_on_path(), point(-3e38, 10.0));
    assert_eq!(out.abort_count, 0);
}

#[test]
fn no_output_counts() {
    let options = StrokeOptions::default().with_line_join(LineJoin::Bevel);
    let mut tess = StrokeTessellator::with_options(options, NoOutput::new());
    tess.tessellate_polyline(
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)],
        false,
    )
    .unwrap();

    assert_eq!(tess.output().num_vertices(), 11);
    assert_eq!(tess.output().num_triangles(), 5);
}
