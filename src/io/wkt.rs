// src/io/wkt.rs

use crate::labeling::normalizer::RiverGeometry;
use crate::math::error::{MathError, MathResult};
use crate::math::types::*;
use geo::{Coord, LineString, MultiPolygon, Polygon};
use std::path::Path;

/// Liest Flussgeometrie aus WKT-Text.
///
/// Unterstützt `POLYGON`, `MULTIPOLYGON` sowie mehrere hintereinander stehende
/// Datensätze (getrennt durch Leerraum, Zeilenumbrüche oder `;`). Mehrere Datensätze
/// werden zu einem Multipolygon zusammengefasst. Z- und M-Koordinaten werden verworfen.
pub fn parse_river_wkt(input: &str) -> MathResult<RiverGeometry> {
    let mut reader = WktReader::new(input);
    let mut records: Vec<RiverGeometry> = Vec::new();

    reader.skip_separators();
    while !reader.at_end() {
        records.push(reader.geometry()?);
        reader.skip_separators();
    }

    match records.len() {
        0 => Err(reader.error("no geometry found")),
        1 => Ok(records.remove(0)),
        _ => {
            let parts: Vec<Polygon2D> = records
                .iter()
                .flat_map(|record| record.parts().iter().cloned())
                .collect();
            Ok(MultiPolygon::new(parts).into())
        }
    }
}

/// Wie [`parse_river_wkt`], liest aber aus einer Datei.
pub fn read_river_wkt(path: impl AsRef<Path>) -> MathResult<RiverGeometry> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| MathError::ParseError {
        offset: 0,
        message: format!("cannot read '{}': {}", path.display(), e),
    })?;
    parse_river_wkt(&text)
}

struct WktReader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> WktReader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> MathError {
        MathError::ParseError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn skip_separators(&mut self) {
        loop {
            self.skip_whitespace();
            if self.rest().starts_with(';') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.rest().chars().next()
    }

    fn expect(&mut self, expected: char) -> MathResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    /// Ein Schlüsselwort aus Buchstaben, in Großbuchstaben
    fn keyword(&mut self) -> MathResult<String> {
        self.skip_whitespace();
        let word: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        if word.is_empty() {
            return Err(self.error("expected geometry keyword"));
        }
        self.pos += word.len();
        Ok(word.to_ascii_uppercase())
    }

    /// Überspringt optionale Dimensionsangaben (`Z`, `M`, `ZM`) und erkennt `EMPTY`.
    /// Liefert `true`, wenn die Geometrie leer ist.
    fn dimension_and_empty(&mut self) -> MathResult<bool> {
        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            let word = self.keyword()?;
            match word.as_str() {
                "EMPTY" => return Ok(true),
                "Z" | "M" | "ZM" => {}
                other => return Err(self.error(format!("unexpected keyword '{}'", other))),
            }
            if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
                let word = self.keyword()?;
                if word == "EMPTY" {
                    return Ok(true);
                }
                return Err(self.error(format!("unexpected keyword '{}'", word)));
            }
        }
        Ok(false)
    }

    fn geometry(&mut self) -> MathResult<RiverGeometry> {
        let start = self.pos;
        let kind = self.keyword()?;
        match kind.as_str() {
            "POLYGON" => {
                if self.dimension_and_empty()? {
                    return Ok(MultiPolygon::<f64>::new(Vec::new()).into());
                }
                Ok(self.polygon()?.into())
            }
            "MULTIPOLYGON" => {
                if self.dimension_and_empty()? {
                    return Ok(MultiPolygon::<f64>::new(Vec::new()).into());
                }
                let polygons = self.list(Self::polygon)?;
                Ok(MultiPolygon::new(polygons).into())
            }
            other => Err(MathError::UnsupportedGeometry {
                kind: format!("{} (at offset {})", other, start),
            }),
        }
    }

    /// `( item, item, ... )`
    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> MathResult<T>) -> MathResult<Vec<T>> {
        self.expect('(')?;
        let mut items = vec![item(self)?];
        loop {
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    items.push(item(self)?);
                }
                Some(')') => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.error("expected ',' or ')'")),
            }
        }
    }

    fn polygon(&mut self) -> MathResult<Polygon2D> {
        let mut rings = self.list(Self::ring)?.into_iter();
        let exterior = rings
            .next()
            .ok_or_else(|| self.error("polygon without exterior ring"))?;
        Ok(Polygon::new(exterior, rings.collect()))
    }

    fn ring(&mut self) -> MathResult<LineString<f64>> {
        let coords = self.list(Self::coordinate)?;
        if coords.len() < 3 {
            return Err(self.error(format!("ring needs at least 3 coordinates, got {}", coords.len())));
        }
        Ok(LineString::new(coords))
    }

    /// `x y [z [m]]`, zusätzliche Ordinaten werden ignoriert
    fn coordinate(&mut self) -> MathResult<Coord<f64>> {
        let x = self.number()?;
        let y = self.number()?;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
        {
            self.number()?;
        }
        Ok(Coord { x, y })
    }

    fn number(&mut self) -> MathResult<f64> {
        self.skip_whitespace();
        let token: &str = {
            let rest = self.rest();
            let end = rest
                .find(|c: char| c.is_whitespace() || c == ',' || c == ')' || c == '(')
                .unwrap_or(rest.len());
            &rest[..end]
        };
        let value: f64 = token
            .parse()
            .map_err(|_| self.error(format!("invalid number '{}'", token)))?;
        if !value.is_finite() {
            return Err(self.error(format!("non-finite coordinate '{}'", token)));
        }
        self.pos += token.len();
        Ok(value)
    }
}
