extern crate aaline;
#[macro_use]
extern crate bencher;

use aaline::extra::parser::parse_path;
use aaline::math::{point, Point};
use aaline::tessellation::geometry_builder::{simple_builder, NoOutput, VertexBuffers};
use aaline::tessellation::{LineJoin, PathEvent, StrokeOptions, StrokeTessellator, StrokeVertex};
use aaline::tessellation::BuffersBuilder;

use bencher::Bencher;

const N: usize = 100;

fn zigzag(num_points: usize) -> Vec<Point> {
    (0..num_points)
        .map(|i| {
            let x = i as f32 * 7.0;
            let y = if i % 2 == 0 { 0.0 } else { 30.0 + (i % 7) as f32 * 3.0 };
            point(x, y)
        })
        .collect()
}

fn star_path() -> String {
    let mut src = String::new();
    let n = 200;
    for i in 0..n {
        let angle = i as f32 * std::f32::consts::PI * 2.0 / n as f32;
        let radius = if i % 2 == 0 { 300.0 } else { 120.0 };
        let cmd = if i == 0 { 'M' } else { 'L' };
        src.push_str(&format!("{} {} {} ", cmd, angle.cos() * radius, angle.sin() * radius));
    }
    src.push('Z');

    src
}

fn stroke_zigzag(bench: &mut Bencher, join: LineJoin) {
    let points = zigzag(1000);
    let options = StrokeOptions::default()
        .with_line_width(5.0)
        .with_line_join(join);

    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::with_capacity(10_000, 20_000);

    bench.iter(|| {
        for _ in 0..N {
            buffers.clear();
            let mut builder = BuffersBuilder::new(&mut buffers, |v: StrokeVertex| v.position());
            StrokeTessellator::with_options(options, &mut builder)
                .tessellate_polyline(&points, false)
                .unwrap();
        }
    })
}

fn stroke_zigzag_miter(bench: &mut Bencher) {
    stroke_zigzag(bench, LineJoin::Miter)
}

fn stroke_zigzag_bevel(bench: &mut Bencher) {
    stroke_zigzag(bench, LineJoin::Bevel)
}

fn stroke_zigzag_round(bench: &mut Bencher) {
    stroke_zigzag(bench, LineJoin::Round)
}

fn stroke_zigzag_no_output(bench: &mut Bencher) {
    let points = zigzag(1000);
    let options = StrokeOptions::default()
        .with_line_width(5.0)
        .with_line_join(LineJoin::Round);
    let mut tess = StrokeTessellator::with_options(options, NoOutput::new());

    bench.iter(|| {
        for _ in 0..N {
            tess.tessellate_polyline(&points, false).unwrap();
        }
    })
}

fn stroke_star_thin_lines(bench: &mut Bencher) {
    let events: Vec<PathEvent> = parse_path(&star_path()).unwrap();
    let options = StrokeOptions::default().with_line_width(1.0);

    bench.iter(|| {
        for _ in 0..N {
            let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::with_capacity(1024, 2048);
            StrokeTessellator::with_options(options, simple_builder(&mut buffers))
                .tessellate(events.iter().cloned())
                .unwrap();
        }
    })
}

fn parse_star(bench: &mut Bencher) {
    let src = star_path();

    bench.iter(|| {
        for _ in 0..N {
            let events = parse_path(&src).unwrap();
            bencher::black_box(events);
        }
    })
}

benchmark_group!(stroke_tess,
  stroke_zigzag_miter,
  stroke_zigzag_bevel,
  stroke_zigzag_round,
  stroke_zigzag_no_output,
  stroke_star_thin_lines
);

benchmark_group!(parsing,
  parse_star
);

benchmark_main!(stroke_tess, parsing);
