use crate::emit::{emit_join, emit_segment};
use crate::join::{join_segments, JoinStatus};
use crate::math::*;
use crate::segment::Segment;
use crate::{
    Color, LineJoin, PathEvent, StrokeGeometryBuilder, StrokeOptions, TessellationError,
    TessellationResult, UnsupportedParameter, UsageError,
};

use core::mem;

#[cfg(not(feature = "std"))]
use num_traits::Float;

macro_rules! tess_log {
    ($obj:ident, $fmt:expr) => (
        if $obj.log {
            log::debug!($fmt);
        }
    );
    ($obj:ident, $fmt:expr, $($arg:tt)*) => (
        if $obj.log {
            log::debug!($fmt, $($arg)*);
        }
    );
}

#[cfg(all(debug_assertions, feature = "std"))]
fn logging_is_forced() -> bool {
    std::env::var("AALINE_FORCE_LOGGING").is_ok()
}

#[cfg(not(all(debug_assertions, feature = "std")))]
fn logging_is_forced() -> bool {
    false
}

/// A stateful pen that tessellates thick, anti-aliased polylines.
///
/// ## Overview
///
/// The tessellator is driven like a canvas: a batch is opened with [`begin`](#method.begin),
/// the path is described with [`move_to`](#method.move_to) and [`line_to`](#method.line_to),
/// and [`end`](#method.end) writes what is left and closes the batch. Consecutive `line_to`
/// commands are joined according to the current [`LineJoin`](enum.LineJoin.html); a `move_to`
/// to a new position breaks the path.
///
/// Each segment is written as a quad of four vertices and two triangles, plus the triangles
/// of its join if any. A segment is written to the output one command late, once the join at
/// its far end is known.
///
/// The output is a [`StrokeGeometryBuilder`](geometry_builder/trait.StrokeGeometryBuilder.html)
/// owned by the tessellator. `&mut B` implements the builder traits, so the tessellator can also
/// borrow an existing builder.
///
/// All of the per-path state lives in the tessellator and is reset by `begin`, so tessellating
/// the same commands twice produces identical output. The tessellator does not allocate.
///
/// # Examples
///
/// ```
/// # extern crate aaline_tessellation as tess;
/// # use tess::math::*;
/// # use tess::geometry_builder::{VertexBuffers, simple_builder};
/// # use tess::*;
/// # fn main() {
/// // Create the destination vertex and index buffers.
/// let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
///
/// {
///     // Create the tessellator, writing into the buffers.
///     let options = StrokeOptions::default()
///         .with_line_width(3.0)
///         .with_line_join(LineJoin::Round);
///     let mut tessellator = StrokeTessellator::with_options(options, simple_builder(&mut buffers));
///
///     // Compute the tessellation.
///     tessellator.begin().unwrap();
///     tessellator.move_to(point(0.0, 0.0)).unwrap();
///     tessellator.line_to(point(10.0, 20.0)).unwrap();
///     tessellator.line_to(point(20.0, 0.0)).unwrap();
///     tessellator.end().unwrap();
/// }
///
/// println!("The generated vertices are: {:?}.", &buffers.vertices[..]);
/// println!("The generated indices are: {:?}.", &buffers.indices[..]);
///
/// # }
/// ```
pub struct StrokeTessellator<Output> {
    output: Output,
    options: StrokeOptions,
    color: Color,
    projection: Projection,

    drawing: bool,
    pen: Point,
    last_move_to: Point,
    continuous: bool,
    placed_first_point: bool,
    has_pending_segment: bool,

    // The segment waiting for the next join before it can be written.
    last: Segment,
    // Scratch slot for the segment being built, swapped with `last` once joined.
    current: Segment,

    log: bool,
}

impl<Output: StrokeGeometryBuilder> StrokeTessellator<Output> {
    pub fn new(output: Output) -> Self {
        Self::with_options(StrokeOptions::DEFAULT, output)
    }

    pub fn with_options(options: StrokeOptions, output: Output) -> Self {
        StrokeTessellator {
            output,
            options,
            color: Color::WHITE,
            projection: Projection::identity(),
            drawing: false,
            pen: Point::origin(),
            last_move_to: Point::origin(),
            continuous: false,
            placed_first_point: false,
            has_pending_segment: false,
            last: Segment::new(),
            current: Segment::new(),
            log: logging_is_forced(),
        }
    }

    /// Enable/disable some verbose logging during the tessellation, for
    /// debugging purposes.
    ///
    /// In debug builds the `AALINE_FORCE_LOGGING` environment variable forces it on.
    pub fn set_logging(&mut self, is_enabled: bool) {
        self.log = is_enabled || logging_is_forced();
    }

    #[inline]
    pub fn options(&self) -> &StrokeOptions {
        &self.options
    }

    /// Replaces all of the stroke options.
    ///
    /// The options are left unchanged if they are not valid. Changes apply to the
    /// segments built after this call.
    pub fn set_options(&mut self, options: &StrokeOptions) -> TessellationResult {
        options.validate()?;
        self.options = *options;

        Ok(())
    }

    pub fn set_line_width(&mut self, width: f32) -> TessellationResult {
        let options = self.options.with_line_width(width);
        self.set_options(&options)
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.options.line_join = join;
    }

    /// See [`StrokeOptions::miter_limit`](struct.StrokeOptions.html#structfield.miter_limit).
    pub fn set_miter_limit(&mut self, limit: f32) -> TessellationResult {
        let mut options = self.options;
        options.miter_limit = limit;
        self.set_options(&options)
    }

    /// The color of the geometry emitted from now on.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Stores the projection and forwards it to the output.
    pub fn set_projection(&mut self, projection: &Projection) {
        self.projection = *projection;
        self.output.set_projection(projection);
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Whether we are between `begin` and `end`.
    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    #[inline]
    pub fn output(&self) -> &Output {
        &self.output
    }

    #[inline]
    pub fn output_mut(&mut self) -> &mut Output {
        &mut self.output
    }

    pub fn into_output(self) -> Output {
        self.output
    }

    /// Starts a batch.
    ///
    /// Fails if a batch is already in progress or if the options are not valid.
    pub fn begin(&mut self) -> TessellationResult {
        if self.drawing {
            return Err(UsageError::BeginWhileDrawing.into());
        }

        self.options.validate()?;

        self.drawing = true;
        self.continuous = false;
        self.placed_first_point = false;
        self.has_pending_segment = false;
        self.pen = Point::origin();
        self.last_move_to = Point::origin();
        self.last = Segment::new();
        self.current = Segment::new();

        tess_log!(self, "begin {:?}", self.options);

        self.output.begin_geometry();
        self.output.set_projection(&self.projection);

        Ok(())
    }

    /// Ends the batch, writing the pending segment if any.
    pub fn end(&mut self) -> TessellationResult {
        if !self.drawing {
            return Err(UsageError::EndWithoutBegin.into());
        }

        if let Err(e) = self.flush_pending_segment() {
            return Err(self.abort(e));
        }

        self.drawing = false;
        self.output.end_geometry();

        tess_log!(self, "end");

        Ok(())
    }

    /// Moves the pen.
    ///
    /// Moving somewhere else than the current position breaks the path: the pending segment
    /// is written without a join at its end and the next `line_to` starts a new sub-path.
    pub fn move_to(&mut self, to: Point) -> TessellationResult {
        let to = self.prepare_point(to)?;

        if to != self.last_move_to || to != self.pen {
            tess_log!(self, "break at {:?}", to);
            self.continuous = false;
            if let Err(e) = self.flush_pending_segment() {
                return Err(self.abort(e));
            }
        }

        self.placed_first_point = true;
        self.pen = to;
        self.last_move_to = to;

        Ok(())
    }

    /// Draws a line from the pen to `to` and moves the pen.
    ///
    /// The first `line_to` of a batch without a preceding `move_to` acts as a `move_to`.
    /// Zero-length segments are skipped, and so are segments whose direction can't be
    /// computed in `f32` (for example between two points near opposite ends of the range).
    pub fn line_to(&mut self, to: Point) -> TessellationResult {
        let to = self.prepare_point(to)?;

        if !self.placed_first_point {
            self.placed_first_point = true;
            self.pen = to;
            self.last_move_to = to;
            return Ok(());
        }

        if to == self.pen {
            tess_log!(self, "skipping zero-length segment at {:?}", to);
            return Ok(());
        }

        let width = self.options.line_width;
        let snap = self.options.axis_snap;
        if !self.current.set(self.pen, to, width, snap) {
            tess_log!(self, "skipping degenerate segment from {:?} to {:?}", self.pen, to);
            return Ok(());
        }

        if self.continuous && self.has_pending_segment {
            if let Err(e) = self.join_current() {
                return Err(self.abort(e));
            }
        } else {
            self.current.has_previous = false;
            mem::swap(&mut self.last, &mut self.current);
        }

        self.has_pending_segment = true;
        self.pen = to;
        self.continuous = true;

        Ok(())
    }

    /// Draws a line back to the last `move_to` position.
    pub fn close(&mut self) -> TessellationResult {
        let first = self.last_move_to;
        self.line_to(first)
    }

    /// Tessellates a sequence of path events in its own batch.
    pub fn tessellate<Iter>(&mut self, events: Iter) -> TessellationResult
    where
        Iter: IntoIterator<Item = PathEvent>,
    {
        self.begin()?;

        for event in events {
            match event {
                PathEvent::MoveTo(to) => self.move_to(to),
                PathEvent::LineTo(to) => self.line_to(to),
                PathEvent::Close => self.close(),
            }
            .map_err(|e| self.cancel(e))?;
        }

        self.end()
    }

    /// Tessellates a polyline in its own batch.
    pub fn tessellate_polyline(&mut self, points: &[Point], closed: bool) -> TessellationResult {
        let events = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 {
                    PathEvent::MoveTo(*p)
                } else {
                    PathEvent::LineTo(*p)
                }
            })
            .chain(if closed && !points.is_empty() {
                Some(PathEvent::Close)
            } else {
                None
            });

        self.tessellate(events)
    }

    fn prepare_point(&self, p: Point) -> Result<Point, TessellationError> {
        if !self.drawing {
            return Err(UsageError::CommandOutsideOfBatch.into());
        }
        if p.x.is_nan() || p.y.is_nan() {
            return Err(UnsupportedParameter::PositionIsNaN.into());
        }

        if self.options.pixel_snap {
            return Ok(snap_to_pixel_grid(p, self.options.line_width));
        }

        Ok(p)
    }

    /// Joins the segment that was just built with the pending segment and writes the latter.
    #[cfg_attr(feature = "profiling", inline(never))]
    fn join_current(&mut self) -> TessellationResult {
        self.current.has_previous = true;

        let status = join_segments(
            &mut self.last,
            &mut self.current,
            self.options.line_join,
            self.options.miter_limit,
        );

        match status {
            JoinStatus::MiterFallback => {
                tess_log!(self, "no miter at {:?}, using a bevel join", self.last.end);
            }
            JoinStatus::Reversal => {
                tess_log!(self, "path turns back on itself at {:?}", self.last.end);
            }
            _ => {}
        }

        if self.options.line_width > 0.0 {
            let hard_start = self.last.has_previous;
            emit_segment(
                &self.last,
                hard_start,
                true,
                &self.options,
                self.color,
                &mut self.output,
            )?;
            emit_join(&self.current, &self.options, self.color, &mut self.output)?;
        }

        mem::swap(&mut self.last, &mut self.current);

        Ok(())
    }

    #[cfg_attr(feature = "profiling", inline(never))]
    fn flush_pending_segment(&mut self) -> TessellationResult {
        if !self.has_pending_segment {
            return Ok(());
        }

        self.has_pending_segment = false;

        if self.options.line_width > 0.0 {
            let hard_start = self.last.has_previous;
            emit_segment(
                &self.last,
                hard_start,
                false,
                &self.options,
                self.color,
                &mut self.output,
            )?;
        }

        Ok(())
    }

    /// Discards the batch after an output error.
    fn abort(&mut self, e: TessellationError) -> TessellationError {
        tess_log!(self, "Tessellation failed with error: {:?}.", e);
        self.output.abort_geometry();
        self.drawing = false;
        self.has_pending_segment = false;

        e
    }

    /// Leaves the batch opened by `tessellate` if a command failed before the output did.
    fn cancel(&mut self, e: TessellationError) -> TessellationError {
        if self.drawing {
            return self.abort(e);
        }

        e
    }
}

impl<Output: StrokeGeometryBuilder + Default> Default for StrokeTessellator<Output> {
    fn default() -> Self {
        Self::new(Output::default())
    }
}

/// Moves a point onto integer coordinates for even line widths, and onto pixel centers
/// for odd line widths, so that the edges of snapped lines fall on pixel boundaries.
pub fn snap_to_pixel_grid(p: Point, line_width: f32) -> Point {
    let odd = (line_width.round() as i64) % 2 != 0;
    if odd {
        point(p.x.floor() + 0.5, p.y.floor() + 0.5)
    } else {
        point(p.x.round(), p.y.round())
    }
}

#[test]
fn test_snap_to_pixel_grid() {
    assert_eq!(snap_to_pixel_grid(point(1.3, 2.7), 2.0), point(1.0, 3.0));
    assert_eq!(snap_to_pixel_grid(point(1.3, 2.7), 1.0), point(1.5, 2.5));
    assert_eq!(snap_to_pixel_grid(point(-0.2, 4.0), 3.0), point(-0.5, 4.5));
    assert_eq!(snap_to_pixel_grid(point(-0.2, 4.0), 4.0), point(0.0, 4.0));
}
