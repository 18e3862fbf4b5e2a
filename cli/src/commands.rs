use aaline::tessellation::{Color, LineJoin, StrokeOptions};
use std::io;

pub struct StrokeCmd {
    pub input: String,
    pub output: Box<dyn io::Write>,
    pub options: StrokeOptions,
    pub color: Color,
    pub output_format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Vertex positions and indices.
    Buffers,
    /// Number of vertices, indices and triangles.
    Count,
    Svg { wireframe: bool },
}

pub struct FuzzCmd {
    pub options: StrokeOptions,
    pub min_points: Option<u32>,
    pub max_points: Option<u32>,
    pub iterations: Option<u64>,
}

pub fn parse_line_join(src: &str) -> Option<LineJoin> {
    match src {
        "none" => Some(LineJoin::None),
        "miter" => Some(LineJoin::Miter),
        "bevel" => Some(LineJoin::Bevel),
        "round" => Some(LineJoin::Round),
        _ => None,
    }
}

/// Parses `#rrggbb` or `#rrggbbaa`, the `#` being optional.
pub fn parse_color(src: &str) -> Option<Color> {
    let hex = src.strip_prefix('#').unwrap_or(src);
    if !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok();

    match hex.len() {
        6 => Some(Color::rgb(channel(0)?, channel(1)?, channel(2)?)),
        8 => Some(Color::rgba(channel(0)?, channel(1)?, channel(2)?, channel(3)?)),
        _ => None,
    }
}

#[test]
fn line_joins() {
    assert_eq!(parse_line_join("round"), Some(LineJoin::Round));
    assert_eq!(parse_line_join("none"), Some(LineJoin::None));
    assert_eq!(parse_line_join("Round"), None);
    assert_eq!(parse_line_join("square"), None);
}

#[test]
fn colors() {
    assert_eq!(parse_color("#ff0000"), Some(Color::rgb(255, 0, 0)));
    assert_eq!(parse_color("00ff0080"), Some(Color::rgba(0, 255, 0, 128)));
    assert_eq!(parse_color("#FFFFFF"), Some(Color::WHITE));
    assert_eq!(parse_color("#fff"), None);
    assert_eq!(parse_color("#gg0000"), None);
    assert_eq!(parse_color("#ff00é"), None);
}
