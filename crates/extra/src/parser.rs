//! A parser for the straight-line subset of the SVG path syntax.
//!
//! Supported commands are `M`, `L`, `H`, `V` and `Z` and their relative variants.
//! Curves and arcs are recognized but rejected since the stroke tessellator only
//! handles polylines.

use crate::math::{point, Point};
use crate::tessellation::PathEvent;

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Line {line} Column {column}: Expected number, got {src:?}.")]
    Number { src: String, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Invalid command {command:?}.")]
    Command {
        command: char,
        line: i32,
        column: i32,
    },
    #[error("Line {line} Column {column}: Unsupported command {command:?}, only straight lines can be stroked.")]
    UnsupportedCommand {
        command: char,
        line: i32,
        column: i32,
    },
    #[error("Line {line} Column {column}: Expected move-to command, got {command:?}.")]
    MissingMoveTo {
        command: char,
        line: i32,
        column: i32,
    },
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct ParserOptions {
    /// Optionally stop parsing when encountering a provided special character.
    pub stop_at: Option<char>,
}

impl ParserOptions {
    pub const DEFAULT: ParserOptions = ParserOptions { stop_at: None };

    pub const fn with_stop_at(mut self, stop_at: char) -> Self {
        self.stop_at = Some(stop_at);
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// A buffered iterator of characters keeping track of line and column.
pub struct Source<Iter> {
    src: Iter,
    current: char,
    line: i32,
    col: i32,
    finished: bool,
}

impl<Iter: Iterator<Item = char>> Source<Iter> {
    pub fn new<IntoIter>(src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        let mut src = src.into_iter();

        let (current, finished) = match src.next() {
            Some(c) => (c, false),
            None => (' ', true),
        };

        Source {
            current,
            finished,
            src,
            line: if current == '\n' { 1 } else { 0 },
            col: 0,
        }
    }

    /// Line and column of the current character, starting at zero.
    pub fn position(&self) -> (i32, i32) {
        (self.line, self.col)
    }

    fn skip_whitespace(&mut self) {
        while !self.finished && (self.current.is_whitespace() || self.current == ',') {
            self.advance_one();
        }
    }

    fn advance_one(&mut self) {
        if self.finished {
            return;
        }
        match self.src.next() {
            Some('\n') => {
                self.current = '\n';
                self.line += 1;
                self.col = -1;
            }
            Some(c) => {
                self.current = c;
                self.col += 1;
            }
            None => {
                self.current = '~';
                self.finished = true;
            }
        }
    }

    fn take_digits(&mut self, buffer: &mut String) {
        while self.current.is_ascii_digit() {
            buffer.push(self.current);
            self.advance_one();
        }
    }
}

/// A context object for parsing polylines written in the SVG path syntax.
///
/// Numbers following a command without a new command letter repeat the command,
/// except after a move-to where they are line-to commands, as in SVG. A close
/// command moves the pen back to the start of the sub-path, the next command
/// can continue from there without a move-to.
#[derive(Debug, Default)]
pub struct PathParser {
    float_buffer: String,
    stop_at: Option<char>,
    current_position: Point,
    first_position: Point,
}

impl PathParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the source and calls `output` for each event.
    ///
    /// The events produced before an error are not rolled back.
    pub fn parse<Iter, F>(
        &mut self,
        options: &ParserOptions,
        src: &mut Source<Iter>,
        output: &mut F,
    ) -> Result<(), ParseError>
    where
        Iter: Iterator<Item = char>,
        F: FnMut(PathEvent),
    {
        self.stop_at = options.stop_at;
        // A relative move-to at the beginning of the path is relative to the origin.
        self.current_position = point(0.0, 0.0);
        self.first_position = point(0.0, 0.0);

        let mut need_start = true;
        let mut implicit_cmd = 'M';

        src.skip_whitespace();

        while !src.finished {
            let mut cmd = src.current;
            let cmd_line = src.line;
            let cmd_col = src.col;

            if self.stop_at == Some(cmd) {
                break;
            }

            if cmd.is_ascii_alphabetic() {
                src.advance_one();
            } else {
                cmd = implicit_cmd;
            }

            match cmd {
                'm' | 'M' | 'l' | 'L' | 'h' | 'H' | 'v' | 'V' | 'z' | 'Z' => {}
                'q' | 'Q' | 't' | 'T' | 'c' | 'C' | 's' | 'S' | 'a' | 'A' => {
                    return Err(ParseError::UnsupportedCommand {
                        command: cmd,
                        line: cmd_line,
                        column: cmd_col,
                    });
                }
                _ => {
                    return Err(ParseError::Command {
                        command: cmd,
                        line: cmd_line,
                        column: cmd_col,
                    });
                }
            }

            if need_start && cmd != 'm' && cmd != 'M' {
                return Err(ParseError::MissingMoveTo {
                    command: cmd,
                    line: cmd_line,
                    column: cmd_col,
                });
            }

            let is_relative = cmd.is_ascii_lowercase();

            let event = match cmd.to_ascii_uppercase() {
                'M' => {
                    let to = self.parse_point(is_relative, src)?;
                    self.current_position = to;
                    self.first_position = to;
                    need_start = false;
                    PathEvent::MoveTo(to)
                }
                'L' => {
                    let to = self.parse_point(is_relative, src)?;
                    self.current_position = to;
                    PathEvent::LineTo(to)
                }
                'H' => {
                    let mut x = self.parse_number(src)?;
                    if is_relative {
                        x += self.current_position.x;
                    }
                    self.current_position.x = x;
                    PathEvent::LineTo(self.current_position)
                }
                'V' => {
                    let mut y = self.parse_number(src)?;
                    if is_relative {
                        y += self.current_position.y;
                    }
                    self.current_position.y = y;
                    PathEvent::LineTo(self.current_position)
                }
                _ => {
                    self.current_position = self.first_position;
                    PathEvent::Close
                }
            };

            output(event);

            implicit_cmd = match cmd {
                'm' => 'l',
                'M' => 'L',
                'z' => 'm',
                'Z' => 'M',
                c => c,
            };

            src.skip_whitespace();
        }

        Ok(())
    }

    fn parse_point(
        &mut self,
        is_relative: bool,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let mut x = self.parse_number(src)?;
        let mut y = self.parse_number(src)?;

        if is_relative {
            x += self.current_position.x;
            y += self.current_position.y;
        }

        Ok(point(x, y))
    }

    fn parse_number(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<f32, ParseError> {
        self.float_buffer.clear();

        src.skip_whitespace();

        let line = src.line;
        let column = src.col;

        if src.current == '-' || src.current == '+' {
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        src.take_digits(&mut self.float_buffer);

        if src.current == '.' {
            self.float_buffer.push('.');
            src.advance_one();
            src.take_digits(&mut self.float_buffer);
        }

        if src.current == 'e' || src.current == 'E' {
            self.float_buffer.push(src.current);
            src.advance_one();

            if src.current == '-' {
                self.float_buffer.push('-');
                src.advance_one();
            }

            src.take_digits(&mut self.float_buffer);
        }

        match self.float_buffer.parse::<f32>() {
            Ok(val) if val.is_finite() => Ok(val),
            _ => Err(ParseError::Number {
                src: std::mem::take(&mut self.float_buffer),
                line,
                column,
            }),
        }
    }
}

/// Parses a whole string into a list of path events.
pub fn parse_path(src: &str) -> Result<Vec<PathEvent>, ParseError> {
    let mut events = Vec::new();
    PathParser::new().parse(
        &ParserOptions::DEFAULT,
        &mut Source::new(src.chars()),
        &mut |event| events.push(event),
    )?;

    Ok(events)
}

#[cfg(test)]
use crate::tessellation::PathEvent::*;

#[test]
fn empty() {
    assert_eq!(parse_path(""), Ok(Vec::new()));
    assert_eq!(parse_path("  \n "), Ok(Vec::new()));
}

#[test]
fn simple_square() {
    assert_eq!(
        parse_path("M 0 0 L 1 0 L 1 1 L 0 1 Z"),
        Ok(vec![
            MoveTo(point(0.0, 0.0)),
            LineTo(point(1.0, 0.0)),
            LineTo(point(1.0, 1.0)),
            LineTo(point(0.0, 1.0)),
            Close,
        ])
    );
}

#[test]
fn relative_commands() {
    assert_eq!(
        parse_path("m 10 10 l 5 0 v 5 h -5 z l 0 -3"),
        Ok(vec![
            MoveTo(point(10.0, 10.0)),
            LineTo(point(15.0, 10.0)),
            LineTo(point(15.0, 15.0)),
            LineTo(point(10.0, 15.0)),
            Close,
            LineTo(point(10.0, 7.0)),
        ])
    );
}

#[test]
fn horizontal_and_vertical() {
    assert_eq!(
        parse_path("M 1 2 H 5 V 7 H 1"),
        Ok(vec![
            MoveTo(point(1.0, 2.0)),
            LineTo(point(5.0, 2.0)),
            LineTo(point(5.0, 7.0)),
            LineTo(point(1.0, 7.0)),
        ])
    );
}

#[test]
fn implicit_polyline() {
    assert_eq!(
        parse_path("0,0 1,1 2,2 3,3"),
        Ok(vec![
            MoveTo(point(0.0, 0.0)),
            LineTo(point(1.0, 1.0)),
            LineTo(point(2.0, 2.0)),
            LineTo(point(3.0, 3.0)),
        ])
    );

    // Repeated relative line-to after a relative move-to.
    assert_eq!(
        parse_path("m 1 1 2 0 0 2"),
        Ok(vec![
            MoveTo(point(1.0, 1.0)),
            LineTo(point(3.0, 1.0)),
            LineTo(point(3.0, 3.0)),
        ])
    );
}

#[test]
fn invalid_cmd() {
    assert_eq!(
        parse_path("x 0 0"),
        Err(ParseError::Command {
            command: 'x',
            line: 0,
            column: 0
        })
    );

    assert_eq!(
        parse_path("M 0 0\n  L 1 1 k 2 2"),
        Err(ParseError::Command {
            command: 'k',
            line: 1,
            column: 8
        })
    );
}

#[test]
fn curves_are_not_supported() {
    assert_eq!(
        parse_path("M 0 0\nL 10 0\n  q 1 1 2 2"),
        Err(ParseError::UnsupportedCommand {
            command: 'q',
            line: 2,
            column: 2
        })
    );

    for src in &["M 0 0 C 1 1 2 2 3 3", "M 0 0 A 1 1 0 0 1 2 2", "M 0 0 s 1 1 2 2"] {
        match parse_path(src) {
            Err(ParseError::UnsupportedCommand { .. }) => {}
            other => panic!("{:?} -> {:?}", src, other),
        }
    }
}

#[test]
fn missing_move_to() {
    assert_eq!(
        parse_path("L 1 1"),
        Err(ParseError::MissingMoveTo {
            command: 'L',
            line: 0,
            column: 0
        })
    );
}

#[test]
fn events_before_an_error_are_kept() {
    let mut events = Vec::new();
    let result = PathParser::new().parse(
        &ParserOptions::DEFAULT,
        &mut Source::new("M 0 0 L 1 0 L 2".chars()),
        &mut |event| events.push(event),
    );

    assert!(result.is_err());
    assert_eq!(events, vec![MoveTo(point(0.0, 0.0)), LineTo(point(1.0, 0.0))]);
}

#[test]
fn number_01() {
    // Per SVG spec, this is equivalent to "M 0.6 0.5".
    assert_eq!(parse_path("M 0.6.5"), Ok(vec![MoveTo(point(0.6, 0.5))]));
}

#[test]
fn number_scientific_notation() {
    assert_eq!(
        parse_path("M 1e-2 -1E3 L +2 1.5e1"),
        Ok(vec![MoveTo(point(0.01, -1000.0)), LineTo(point(2.0, 15.0))])
    );
}

#[test]
fn bad_numbers() {
    let bad_number = |src: &str| match parse_path(src) {
        Err(ParseError::Number { .. }) => true,
        r => {
            println!("{r:?}");
            false
        }
    };

    assert!(bad_number("M 0 --1"));
    assert!(bad_number("M 0 1ee2"));
    assert!(bad_number("M 0 1e--1"));
    assert!(bad_number("M 0 *2"));
    assert!(bad_number("M 0 e"));
    assert!(bad_number("M 0 1e"));
    assert!(bad_number("M 0 1e99"));
    assert!(bad_number("M 0 0 L 1"));
}

#[test]
fn stop() {
    let options = ParserOptions::DEFAULT.with_stop_at('|');
    let mut parser = PathParser::new();

    let mut parse = |src: &str| {
        let mut events = Vec::new();
        let mut source = Source::new(src.chars());
        let result = parser.parse(&options, &mut source, &mut |event| events.push(event));

        result.map(|_| (events, source.position()))
    };

    assert_eq!(
        parse("M 0 0 | xxxxxx"),
        Ok((vec![MoveTo(point(0.0, 0.0))], (0, 6)))
    );
    assert_eq!(
        parse("M 0 0| xxxxxx"),
        Ok((vec![MoveTo(point(0.0, 0.0))], (0, 5)))
    );
    assert_eq!(parse("| xxxxxx"), Ok((Vec::new(), (0, 0))));
    assert_eq!(parse("    | xxxxxx"), Ok((Vec::new(), (0, 4))));
}
