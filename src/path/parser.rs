//! Parser for the SVG path-data mini-language.
//!
//! Produces absolute [`PathCommand`]s. Arcs are kept as [`ArcTo`] and only
//! expanded by [`PathData::canonicalize`].

use crate::error::{Result, ShapeError};
use crate::geometry::point::Point2;
use crate::path::{ArcTo, PathData};

const SUPPORTED_COMMANDS: &[u8] = b"MmLlHhVvCcSsQqTtAaZz";

pub fn parse_path_data(data: &str) -> Result<PathData> {
    PathParser::new(data).parse()
}

/// Leading number of an attribute value. Trailing text such as a unit suffix
/// is ignored; `None` if no finite number starts the value.
pub fn leading_number(value: &str) -> Option<f64> {
    let mut cursor = Cursor::new(value);
    cursor.number().ok().filter(|v| v.is_finite())
}

/// Coordinate pairs of a `points` attribute.
pub fn parse_points(value: &str) -> Result<Vec<Point2>> {
    let mut cursor = Cursor::new(value);
    let mut points = Vec::new();
    loop {
        cursor.skip_separators();
        if cursor.at_end() {
            break;
        }
        let x = cursor.number()?;
        let y = cursor.number()?;
        points.push(Point2::new(x, y));
    }
    Ok(points)
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn skip_separators(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n' | b',') = self.peek() {
            self.pos += 1;
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// True if the next token after separators can begin a number.
    fn at_number(&mut self) -> bool {
        self.skip_separators();
        matches!(self.peek(), Some(b'0'..=b'9' | b'-' | b'+' | b'.'))
    }

    /// `[sign] digits [. digits] [e [sign] digits]`, with separators before it.
    fn number(&mut self) -> Result<f64> {
        self.skip_separators();
        let start = self.pos;
        if let Some(b'-' | b'+') = self.peek() {
            self.pos += 1;
        }
        let mut digits = self.skip_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            digits += self.skip_digits();
        }
        if digits == 0 {
            self.pos = start;
            return Err(self.expected("a number"));
        }
        if let Some(b'e' | b'E') = self.peek() {
            let mark = self.pos;
            self.pos += 1;
            if let Some(b'-' | b'+') = self.peek() {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                // Not an exponent; leave the letter for the caller.
                self.pos = mark;
            }
        }
        self.text[start..self.pos]
            .parse::<f64>()
            .map_err(|e| ShapeError::malformed(start, e.to_string()))
    }

    /// Arc flags are a single `0` or `1` and need no separator after them.
    fn flag(&mut self) -> Result<bool> {
        self.skip_separators();
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.expected("an arc flag (0 or 1)")),
        }
    }

    fn point(&mut self, base: Point2) -> Result<Point2> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point2::new(base.x + x, base.y + y))
    }

    fn expected(&self, what: &str) -> ShapeError {
        let found = match self.text[self.pos..].chars().next() {
            Some(c) => format!("'{c}'"),
            None => "end of data".to_string(),
        };
        ShapeError::malformed(self.pos, format!("expected {what}, found {found}"))
    }
}

#[derive(Default)]
struct State {
    start: Point2,
    curr: Point2,
    /// Second control point of the previous C/S command.
    last_cubic: Option<Point2>,
    /// Control point of the previous Q/T command.
    last_quad: Option<Point2>,
    /// Set after Z; the next drawing command restarts at `start`.
    needs_move: bool,
}

struct PathParser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> PathParser<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    fn parse(mut self) -> Result<PathData> {
        let mut path = PathData::new();
        let mut state = State::default();
        let mut prev: Option<u8> = None;

        loop {
            self.cursor.skip_separators();
            let Some(b) = self.cursor.peek() else {
                break;
            };
            let offset = self.cursor.pos;

            let command = if b.is_ascii_alphabetic() {
                if !SUPPORTED_COMMANDS.contains(&b) {
                    return Err(ShapeError::UnsupportedCommand {
                        command: b as char,
                        offset,
                    });
                }
                self.cursor.pos += 1;
                b
            } else if self.cursor.at_number() {
                // Implicit repetition of the previous command.
                match prev {
                    Some(b'M') => b'L',
                    Some(b'm') => b'l',
                    Some(c) if !matches!(c, b'Z' | b'z') => c,
                    _ => return Err(self.cursor.expected("a path command")),
                }
            } else {
                return Err(self.cursor.expected("a path command"));
            };

            if prev.is_none() && !matches!(command, b'M' | b'm') {
                return Err(ShapeError::malformed(
                    offset,
                    "path data must begin with a moveto",
                ));
            }

            self.command(command, &mut path, &mut state)?;
            prev = Some(command);
        }

        Ok(path)
    }

    fn command(&mut self, command: u8, path: &mut PathData, state: &mut State) -> Result<()> {
        let relative = command.is_ascii_lowercase();
        let base = if relative { state.curr } else { Point2::ZERO };
        let upper = command.to_ascii_uppercase();

        if !matches!(upper, b'M' | b'Z') && state.needs_move {
            path.move_to(state.start);
            state.needs_move = false;
        }

        let mut last_cubic = None;
        let mut last_quad = None;

        match upper {
            b'M' => {
                let p = self.cursor.point(base)?;
                path.move_to(p);
                state.start = p;
                state.curr = p;
                state.needs_move = false;
            }
            b'L' => {
                let p = self.cursor.point(base)?;
                path.line_to(p);
                state.curr = p;
            }
            b'H' => {
                let x = self.cursor.number()? + base.x;
                let p = Point2::new(x, state.curr.y);
                path.line_to(p);
                state.curr = p;
            }
            b'V' => {
                let y = self.cursor.number()? + base.y;
                let p = Point2::new(state.curr.x, y);
                path.line_to(p);
                state.curr = p;
            }
            b'C' => {
                let c1 = self.cursor.point(base)?;
                let c2 = self.cursor.point(base)?;
                let p = self.cursor.point(base)?;
                path.cubic_to(c1, c2, p);
                state.curr = p;
                last_cubic = Some(c2);
            }
            b'S' => {
                let c1 = reflect(state.last_cubic, state.curr);
                let c2 = self.cursor.point(base)?;
                let p = self.cursor.point(base)?;
                path.cubic_to(c1, c2, p);
                state.curr = p;
                last_cubic = Some(c2);
            }
            b'Q' => {
                let c = self.cursor.point(base)?;
                let p = self.cursor.point(base)?;
                path.quad_to(c, p);
                state.curr = p;
                last_quad = Some(c);
            }
            b'T' => {
                let c = reflect(state.last_quad, state.curr);
                let p = self.cursor.point(base)?;
                path.quad_to(c, p);
                state.curr = p;
                last_quad = Some(c);
            }
            b'A' => {
                let rx = self.cursor.number()?;
                let ry = self.cursor.number()?;
                let rotation = self.cursor.number()?;
                let large_arc = self.cursor.flag()?;
                let sweep = self.cursor.flag()?;
                let end = self.cursor.point(base)?;
                path.arc_to(ArcTo {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    end,
                });
                state.curr = end;
            }
            b'Z' => {
                path.close();
                state.curr = state.start;
                state.needs_move = true;
            }
            _ => {
                return Err(ShapeError::UnsupportedCommand {
                    command: command as char,
                    offset: self.cursor.pos,
                });
            }
        }

        state.last_cubic = last_cubic;
        state.last_quad = last_quad;
        Ok(())
    }
}

/// Mirror of the previous control point about the current point, or the
/// current point itself when the previous command was of another kind.
fn reflect(control: Option<Point2>, curr: Point2) -> Point2 {
    match control {
        Some(c) => curr * 2.0 - c,
        None => curr,
    }
}
