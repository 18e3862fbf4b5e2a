use crate::commands::{OutputFormat, StrokeCmd};
use aaline::extra::debugging::{write_svg, SvgOptions};
use aaline::extra::parser::{parse_path, ParseError};
use aaline::tessellation::geometry_builder::*;
use aaline::tessellation::{StrokeTessellator, StrokeVertex, TessellationError};
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum StrokeError {
    Io(io::Error),
    Parse(ParseError),
    Tessellation(TessellationError),
}

impl fmt::Display for StrokeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StrokeError::Io(e) => write!(f, "I/O error: {e}"),
            StrokeError::Parse(e) => write!(f, "Invalid path: {e}"),
            StrokeError::Tessellation(e) => write!(f, "Tessellation failed: {e}"),
        }
    }
}

impl std::error::Error for StrokeError {}

impl From<io::Error> for StrokeError {
    fn from(err: io::Error) -> Self {
        StrokeError::Io(err)
    }
}

impl From<ParseError> for StrokeError {
    fn from(err: ParseError) -> Self {
        StrokeError::Parse(err)
    }
}

impl From<TessellationError> for StrokeError {
    fn from(err: TessellationError) -> Self {
        StrokeError::Tessellation(err)
    }
}

pub fn stroke_path(cmd: &StrokeCmd) -> Result<VertexBuffers<StrokeVertex, u32>, StrokeError> {
    let events = parse_path(&cmd.input)?;
    log::info!("{} path events, {:?}", events.len(), cmd.options);

    let mut buffers: VertexBuffers<StrokeVertex, u32> = VertexBuffers::new();
    {
        let mut tessellator = StrokeTessellator::with_options(
            cmd.options,
            BuffersBuilder::new(&mut buffers, |vertex: StrokeVertex| vertex),
        );
        tessellator.set_color(cmd.color);
        tessellator.tessellate(events)?;
    }

    log::info!(
        "{} vertices, {} triangles",
        buffers.vertices.len(),
        buffers.indices.len() / 3
    );

    Ok(buffers)
}

pub fn stroke(mut cmd: StrokeCmd) -> Result<(), StrokeError> {
    let buffers = stroke_path(&cmd)?;
    write_output(&buffers, cmd.output_format, &mut *cmd.output)?;

    Ok(())
}

pub fn write_output(
    buffers: &VertexBuffers<StrokeVertex, u32>,
    format: OutputFormat,
    output: &mut dyn io::Write,
) -> Result<(), io::Error> {
    match format {
        OutputFormat::Count => {
            writeln!(output, "vertices: {}", buffers.vertices.len())?;
            writeln!(output, "indices: {}", buffers.indices.len())?;
            writeln!(output, "triangles: {}", buffers.indices.len() / 3)?;
        }
        OutputFormat::Svg { wireframe } => {
            let options = SvgOptions {
                wireframe,
                ..SvgOptions::DEFAULT
            };
            write_svg(&buffers.vertices, &buffers.indices, &options, output)?;
        }
        OutputFormat::Buffers => {
            write!(output, "vertices: [")?;
            let mut is_first = true;
            for vertex in &buffers.vertices {
                if !is_first {
                    write!(output, ", ")?;
                }
                let p = vertex.position();
                let [e0, e1] = vertex.aa_params();
                write!(output, "({}, {}; {}, {})", p.x, p.y, e0, e1)?;
                is_first = false;
            }
            writeln!(output, "]")?;

            write!(output, "indices: [")?;
            let mut is_first = true;
            for index in &buffers.indices {
                if !is_first {
                    write!(output, ", ")?;
                }
                write!(output, "{index}")?;
                is_first = false;
            }
            writeln!(output, "]")?;
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_to_string(input: &str, format: OutputFormat) -> String {
    use aaline::tessellation::{Color, StrokeOptions};

    let cmd = StrokeCmd {
        input: input.to_string(),
        output: Box::new(io::sink()),
        options: StrokeOptions::default().with_line_width(2.0),
        color: Color::WHITE,
        output_format: format,
    };

    let buffers = stroke_path(&cmd).unwrap();
    let mut out = Vec::new();
    write_output(&buffers, format, &mut out).unwrap();

    String::from_utf8(out).unwrap()
}

#[test]
fn count_output() {
    assert_eq!(
        run_to_string("M 0 0 L 10 0", OutputFormat::Count),
        "vertices: 4\nindices: 6\ntriangles: 2\n"
    );
}

#[test]
fn buffers_output() {
    assert_eq!(
        run_to_string("M 0 0 L 10 0", OutputFormat::Buffers),
        "vertices: [(0, 1; -1, -1), (0, -1; -1, -1), (10, -1; -1, -1), (10, 1; -1, -1)]\n\
         indices: [0, 1, 2, 2, 3, 0]\n"
    );
}

#[test]
fn parse_errors_are_reported() {
    use aaline::tessellation::{Color, StrokeOptions};

    let cmd = StrokeCmd {
        input: "M 0 0 Q 1 1 2 2".to_string(),
        output: Box::new(io::sink()),
        options: StrokeOptions::default(),
        color: Color::WHITE,
        output_format: OutputFormat::Count,
    };

    match stroke_path(&cmd) {
        Err(StrokeError::Parse(ParseError::UnsupportedCommand { command: 'Q', .. })) => {}
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("curves must be rejected"),
    }
}
