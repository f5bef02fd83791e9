use std::io;
use std::io::{ BufWriter, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// Rendered pixels, stored row-major with row 0 at the top.
///
/// Colors are kept unclamped. They are only clamped and quantized when the
/// canvas is written out as a PPM image.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    pixels: Vec<Color>,
}

/// Longest line allowed in a plain PPM file.
const PPM_LINE_WIDTH: usize = 70;

impl Canvas {
    /// Creates a black canvas.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Wraps already rendered pixels. Returns `None` unless there are exactly
    /// `width * height` of them.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>)
        -> Option<Canvas> {
        if pixels.len() != width * height {
            return None;
        }

        Some(Canvas { width, height, pixels })
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }

    /// Writes the canvas as a plain (P3) PPM image.
    ///
    /// Channels are clamped to `[0, 1]` and scaled to `[0, 255]`. No line
    /// is longer than 70 columns; a value which would cross that mark starts
    /// a new line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        for row in self.pixels.chunks(self.width.max(1)) {
            let mut col = 0;
            for pixel in row.iter() {
                let c = pixel.clamped();
                for channel in [c.r, c.g, c.b].iter() {
                    let value = ((channel * 255.0).round() as u8).to_string();

                    if col == 0 {
                        col = value.len();
                    } else if col + 1 + value.len() > PPM_LINE_WIDTH {
                        writeln!(out)?;
                        col = value.len();
                    } else {
                        write!(out, " ")?;
                        col += 1 + value.len();
                    }

                    write!(out, "{}", value)?;
                }
            }

            writeln!(out)?;
        }

        Ok(())
    }

    /// Saves the canvas to a PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in column-row
    /// order, where `y` is the row of the pixel, and `x` is the column.
    ///
    /// # Examples
    ///
    /// ```
    /// # use phong_tracer::color::Color;
    /// # use phong_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, purple);
    /// assert_eq!(canvas.read_pixel(4, 2), Some(purple));
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel;
    }

    /// Reads a color from a location on the `Canvas`, if it is in bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }
}

#[cfg(test)]
fn ppm_string(canvas: &Canvas) -> String {
    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn ppm_header() {
    let ppm = ppm_string(&Canvas::new(5, 3));
    let lines: Vec<&str> = ppm.lines().collect();

    assert_eq!(lines[0], "P3");
    assert_eq!(lines[1], "5 3");
    assert_eq!(lines[2], "255");
    assert_eq!(lines.len(), 6);
}

#[test]
fn ppm_pixels_are_clamped() {
    let mut c = Canvas::new(3, 1);
    c.write_pixel(0, 0, Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(1, 0, Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(2, 0, Color::rgb(-0.5, 0.0, 1.0));

    let ppm = ppm_string(&c);
    assert_eq!(ppm.lines().nth(3), Some("255 0 0 0 128 0 0 0 255"));
}

#[test]
fn ppm_lines_stay_short() {
    let c = Canvas::from_pixels(10, 2, vec![Color::rgb(1.0, 0.8, 0.6); 20]).unwrap();
    let ppm = ppm_string(&c);
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines[0], "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert_eq!(lines[1], "153 255 204 153 255 204 153 255 204 153 255 204 153");
    assert!(lines.iter().all(|l| l.len() <= 70));
    assert_eq!(lines.len(), 4);
    assert!(ppm.ends_with('\n'));
}

#[test]
fn from_pixels_checks_length() {
    assert!(Canvas::from_pixels(2, 2, vec![Color::black(); 3]).is_none());

    let c = Canvas::from_pixels(2, 1, vec![Color::white(), Color::black()]).unwrap();
    assert_eq!(c.read_pixel(0, 0), Some(Color::white()));
    assert_eq!(c.read_pixel(2, 0), None);
    assert_eq!(c.into_pixels().len(), 2);
}
