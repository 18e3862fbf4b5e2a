//! Helpers to look at the output of the stroke tessellator and to reduce failing inputs.

use crate::math::{Box2D, Point};
use crate::tessellation::{PathEvent, StrokeVertex, VertexId};

use std::io;
use std::panic;

#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

pub type Polylines = Vec<Polyline>;

/// Splits a sequence of path events into its sub-paths.
///
/// A close event ends the current sub-path, a line-to after it starts a new one from
/// the closed sub-path's first point.
pub fn events_to_polylines<Iter>(events: Iter) -> Polylines
where
    Iter: IntoIterator<Item = PathEvent>,
{
    let mut polylines = Vec::new();
    let mut points: Vec<Point> = Vec::new();
    let mut first = None;

    for event in events {
        match event {
            PathEvent::MoveTo(at) => {
                if points.len() > 1 {
                    polylines.push(Polyline { points, closed: false });
                }
                points = vec![at];
                first = Some(at);
            }
            PathEvent::LineTo(to) => {
                if points.is_empty() {
                    points.push(first.unwrap_or(to));
                }
                points.push(to);
            }
            PathEvent::Close => {
                if points.len() > 1 {
                    polylines.push(Polyline { points, closed: true });
                }
                points = Vec::new();
            }
        }
    }

    if points.len() > 1 {
        polylines.push(Polyline { points, closed: false });
    }

    polylines
}

pub fn polylines_to_events(polylines: &[Polyline]) -> Vec<PathEvent> {
    let mut events = Vec::new();
    for polyline in polylines {
        let mut iter = polyline.points.iter();
        if let Some(first) = iter.next() {
            events.push(PathEvent::MoveTo(*first));
        }
        for p in iter {
            events.push(PathEvent::LineTo(*p));
        }
        if polyline.closed {
            events.push(PathEvent::Close);
        }
    }

    events
}

/// Removes sub-paths and points from the input as long as the callback keeps failing,
/// and prints the reduced input as a test case.
///
/// The callback fails if it returns true or panics.
pub fn find_reduced_test_case<F>(events: &[PathEvent], cb: &F) -> Polylines
where
    F: Fn(Vec<PathEvent>) -> bool + panic::UnwindSafe + panic::RefUnwindSafe,
{
    let mut polylines = events_to_polylines(events.iter().cloned());

    println!(" -- removing sub-paths...");

    polylines = find_reduced_test_case_sp(polylines, cb);

    println!(" -- removing vertices...");

    for p in 0..polylines.len() {
        let mut v = 0;
        loop {
            if v >= polylines[p].points.len() || polylines[p].points.len() <= 2 {
                break;
            }

            let mut cloned = polylines.clone();
            cloned[p].points.remove(v);

            if fails(&cloned, cb) {
                polylines = cloned;
                continue;
            }

            v += 1;
        }
    }

    println!(" ----------- reduced test case: -----------\n\n");
    println!("#[test]");
    println!("fn reduced_test_case() {{");
    println!("    let mut tess = StrokeTessellator::new(NoOutput::new());");
    println!("    tess.begin().unwrap();");
    for polyline in &polylines {
        let mut iter = polyline.points.iter();
        if let Some(p) = iter.next() {
            println!("    tess.move_to(point({}, {})).unwrap();", p.x, p.y);
        }
        for p in iter {
            println!("    tess.line_to(point({}, {})).unwrap();", p.x, p.y);
        }
        if polyline.closed {
            println!("    tess.close().unwrap();");
        }
    }
    println!("    tess.end().unwrap();");
    println!("}}\n\n");

    polylines
}

fn fails<F>(polylines: &[Polyline], cb: &F) -> bool
where
    F: Fn(Vec<PathEvent>) -> bool + panic::UnwindSafe + panic::RefUnwindSafe,
{
    let events = polylines_to_events(polylines);
    panic::catch_unwind(|| cb(events)).unwrap_or(true)
}

fn find_reduced_test_case_sp<F>(mut polylines: Polylines, cb: &F) -> Polylines
where
    F: Fn(Vec<PathEvent>) -> bool + panic::UnwindSafe + panic::RefUnwindSafe,
{
    let mut i = 0;
    loop {
        if i >= polylines.len() {
            return polylines;
        }

        let mut cloned = polylines.clone();
        cloned.remove(i);

        if fails(&cloned, cb) {
            polylines = cloned;
            continue;
        }

        i += 1;
    }
}

/// Parameters of the SVG dump.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SvgOptions {
    /// Draw the edges of each triangle on top of the fill.
    pub wireframe: bool,
    /// Empty space around the geometry, in the geometry's units.
    pub margin: f32,
}

impl SvgOptions {
    pub const DEFAULT: Self = SvgOptions {
        wireframe: false,
        margin: 5.0,
    };
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Writes the triangles as an SVG document, each filled with the color of its first vertex.
pub fn write_svg<Index, Output>(
    vertices: &[StrokeVertex],
    indices: &[Index],
    options: &SvgOptions,
    output: &mut Output,
) -> io::Result<()>
where
    Index: Copy,
    VertexId: From<Index>,
    Output: io::Write + ?Sized,
{
    let bounds = Box2D::from_points(vertices.iter().map(|v| v.position()))
        .inflate(options.margin, options.margin);
    let size = bounds.size();

    writeln!(
        output,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\">",
        bounds.min.x, bounds.min.y, size.width, size.height,
    )?;

    for triangle in indices.chunks_exact(3) {
        let v: Vec<&StrokeVertex> = triangle
            .iter()
            .map(|&i| &vertices[VertexId::from(i).to_usize()])
            .collect();

        write!(
            output,
            "  <path d=\"M {} {} L {} {} L {} {} Z\"",
            v[0].position().x,
            v[0].position().y,
            v[1].position().x,
            v[1].position().y,
            v[2].position().x,
            v[2].position().y,
        )?;

        let [r, g, b, a] = v[0].color().to_rgba();
        write!(
            output,
            " fill=\"#{:02x}{:02x}{:02x}\" fill-opacity=\"{}\"",
            r,
            g,
            b,
            a as f32 / 255.0,
        )?;

        if options.wireframe {
            write!(output, " stroke=\"black\" stroke-width=\"0.05\"")?;
        }

        writeln!(output, "/>")?;
    }

    writeln!(output, "</svg>")
}

#[cfg(test)]
use crate::math::point;

#[test]
fn polylines_round_trip() {
    let events = vec![
        PathEvent::MoveTo(point(0.0, 0.0)),
        PathEvent::LineTo(point(1.0, 0.0)),
        PathEvent::LineTo(point(1.0, 1.0)),
        PathEvent::Close,
        PathEvent::MoveTo(point(5.0, 5.0)),
        PathEvent::LineTo(point(6.0, 5.0)),
    ];

    let polylines = events_to_polylines(events.iter().cloned());
    assert_eq!(polylines.len(), 2);
    assert!(polylines[0].closed);
    assert!(!polylines[1].closed);
    assert_eq!(polylines_to_events(&polylines), events);
}

#[test]
fn line_to_after_close() {
    let polylines = events_to_polylines(vec![
        PathEvent::MoveTo(point(0.0, 0.0)),
        PathEvent::LineTo(point(1.0, 0.0)),
        PathEvent::Close,
        PathEvent::LineTo(point(0.0, 3.0)),
        PathEvent::MoveTo(point(9.0, 9.0)),
    ]);

    assert_eq!(polylines.len(), 2);
    assert_eq!(polylines[1].points, vec![point(0.0, 0.0), point(0.0, 3.0)]);
}

#[test]
fn reduce_test_case() {
    let events = vec![
        PathEvent::MoveTo(point(0.0, 0.0)),
        PathEvent::LineTo(point(1.0, 0.0)),
        PathEvent::LineTo(point(2.0, 0.0)),
        PathEvent::LineTo(point(-3.0, 7.0)),
        PathEvent::LineTo(point(3.0, 0.0)),
        PathEvent::MoveTo(point(10.0, 10.0)),
        PathEvent::LineTo(point(20.0, 10.0)),
    ];

    // Fails as soon as any point has a negative x coordinate.
    let reduced = find_reduced_test_case(&events, &|events: Vec<PathEvent>| {
        events.iter().any(|e| match e {
            PathEvent::MoveTo(p) | PathEvent::LineTo(p) => p.x < 0.0,
            PathEvent::Close => false,
        })
    });

    assert_eq!(reduced.len(), 1);
    assert_eq!(reduced[0].points.len(), 2);
    assert!(reduced[0].points.contains(&point(-3.0, 7.0)));
}

#[test]
fn svg_dump() {
    use crate::tessellation::geometry_builder::{BuffersBuilder, VertexBuffers};
    use crate::tessellation::{Color, StrokeTessellator};

    let mut buffers: VertexBuffers<StrokeVertex, u16> = VertexBuffers::new();
    {
        let builder = BuffersBuilder::new(&mut buffers, |v: StrokeVertex| v);
        let mut tess = StrokeTessellator::new(builder);
        tess.set_color(Color::rgb(255, 0, 128));
        tess.tessellate_polyline(&[point(0.0, 0.0), point(10.0, 0.0)], false)
            .unwrap();
    }

    let mut svg = Vec::new();
    write_svg(
        &buffers.vertices,
        &buffers.indices,
        &SvgOptions::DEFAULT,
        &mut svg,
    )
    .unwrap();
    let svg = String::from_utf8(svg).unwrap();

    assert!(svg.starts_with(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"-5 -5.5 20 11\">"
    ));
    assert_eq!(svg.matches("<path").count(), 2);
    assert!(svg.contains("fill=\"#ff0080\""));
    assert!(!svg.contains("stroke="));
    assert!(svg.ends_with("</svg>\n"));
}
