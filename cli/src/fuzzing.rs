use crate::commands::FuzzCmd;
use aaline::extra::debugging::find_reduced_test_case;
use aaline::math::*;
use aaline::tessellation::geometry_builder::{GeometryBuilder, NoOutput, StrokeGeometryBuilder};
use aaline::tessellation::{
    GeometryBuilderError, PathEvent, StrokeOptions, StrokeTessellator, StrokeVertex, VertexId,
};
use std::cmp::{max, min};

fn random_point() -> Point {
    point(
        rand::random::<f32>() * 1000.0,
        rand::random::<f32>() * 1000.0,
    )
}

fn generate_path(cmd: &FuzzCmd, iteration: u64) -> Vec<PathEvent> {
    let mut path = Vec::new();

    let min_points = cmd.min_points.unwrap_or(5);
    let max_points = max(min_points, cmd.max_points.unwrap_or(5_000));
    let diff = max_points - min_points;

    let target = min_points + min(diff, (iteration / 5000) as u32);

    let mut num_points = 0;
    loop {
        let num_cmds = 3 + rand::random::<u32>() % (target - num_points + 1);

        path.push(PathEvent::MoveTo(random_point()));
        num_points += 1;
        for _ in 0..num_cmds {
            path.push(PathEvent::LineTo(random_point()));
            num_points += 1;
        }
        if rand::random::<bool>() {
            path.push(PathEvent::Close);
        }

        if num_points >= target {
            break;
        }
    }

    path
}

/// Checks that the output only references vertices of the current batch, and rejects
/// vertices that aren't finite.
struct CheckOutput {
    num_vertices: u32,
}

impl GeometryBuilder for CheckOutput {
    fn begin_geometry(&mut self) {
        self.num_vertices = 0;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        assert!(a != b && b != c && a != c);
        for id in &[a, b, c] {
            assert!(id.0 < self.num_vertices);
        }
    }
}

impl StrokeGeometryBuilder for CheckOutput {
    fn add_stroke_vertex(
        &mut self,
        vertex: StrokeVertex,
    ) -> Result<VertexId, GeometryBuilderError> {
        let p = vertex.position();
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(GeometryBuilderError::InvalidVertex);
        }
        self.num_vertices += 1;
        Ok(VertexId(self.num_vertices - 1))
    }
}

fn stroke_fails(options: &StrokeOptions, path: Vec<PathEvent>) -> bool {
    StrokeTessellator::with_options(*options, CheckOutput { num_vertices: 0 })
        .tessellate(path)
        .is_err()
}

pub fn run(cmd: FuzzCmd) -> bool {
    let mut i: u64 = 0;
    println!("----");
    println!("Fuzzing stroke tessellation: {:?}", cmd.options);
    if let Some(num) = cmd.min_points {
        println!("minimum number of points per path: {num}");
    }
    if let Some(num) = cmd.max_points {
        println!("maximum number of points per path: {num}");
    }
    println!("----");

    let options = cmd.options;
    loop {
        if cmd.iterations.map_or(false, |n| i >= n) {
            break;
        }

        let path = generate_path(&cmd, i);

        let status = ::std::panic::catch_unwind(|| stroke_fails(&options, path.clone()));

        if status.unwrap_or(true) {
            println!(" !! Error while tessellating");
            println!("    Path #{i}");
            find_reduced_test_case(&path, &|path: Vec<PathEvent>| {
                stroke_fails(&options, path)
            });

            return false;
        }

        let mut counter = StrokeTessellator::with_options(options, NoOutput::new());
        if counter.tessellate(path).is_err() {
            return false;
        }
        log::debug!(
            "path #{} -> {} vertices {} triangles",
            i,
            counter.output().num_vertices(),
            counter.output().num_triangles()
        );

        i += 1;
        if i % 500 == 0 {
            println!(" -- tested {i} paths");
        }
    }

    true
}

#[test]
fn non_finite_vertices_are_rejected() {
    use aaline::tessellation::LineJoin;

    let options = StrokeOptions::default().with_line_join(LineJoin::Round);
    let path = vec![
        PathEvent::MoveTo(point(0.0, 0.0)),
        PathEvent::LineTo(point(100.0, 0.0)),
        PathEvent::LineTo(point(100.0, 50.0)),
    ];
    assert!(!stroke_fails(&options, path));

    // Each point is representable but the corners are not.
    let path = vec![
        PathEvent::MoveTo(point(0.0, f32::MAX)),
        PathEvent::LineTo(point(1e30, f32::MAX)),
    ];
    let options = StrokeOptions::default().with_line_width(f32::MAX);
    assert!(stroke_fails(&options, path));
}
