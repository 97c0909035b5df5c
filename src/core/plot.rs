use image::{Rgb, RgbImage};
use more_asserts::assert_gt;
use serde::{Deserialize, Serialize};

use crate::errors::{ApproximationError, Result};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([215, 215, 215]);
const AXES: Rgb<u8> = Rgb([0, 0, 0]);

/// Largest image width or height that a plot may request.
pub const MAX_RESOLUTION: u32 = 16_384;

fn default_resolution() -> [u32; 2] {
    [800, 500]
}

fn default_y_limits() -> [f64; 2] {
    [0.0, 10.0]
}

fn default_grid_spacing() -> [f64; 2] {
    [10.0, 1.0]
}

fn default_margin() -> u32 {
    24
}

/// Size and axis settings for a line plot. Every field has a default, so an
/// empty JSON object is a valid specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlotSpecification {
    #[serde(default = "default_resolution")]
    pub resolution: [u32; 2],
    #[serde(default = "default_y_limits")]
    pub y_limits: [f64; 2],
    /// Distance between grid lines along each axis, in data units.
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: [f64; 2],
    #[serde(default = "default_margin")]
    pub margin: u32,
}

impl Default for PlotSpecification {
    fn default() -> Self {
        PlotSpecification {
            resolution: default_resolution(),
            y_limits: default_y_limits(),
            grid_spacing: default_grid_spacing(),
            margin: default_margin(),
        }
    }
}

/**
 * Linear map between pixel indices and data values along one axis.
 */
#[derive(Clone, Debug)]
pub struct LinearPixelMap {
    offset: f64,
    slope: f64,
}

impl LinearPixelMap {
    /**
     * @param n: number of pixels spanned by [x0,x1]
     * @param x0: output of the map at 0
     * @param x1: output of the map at n-1
     */
    pub fn new(n: u32, x0: f64, x1: f64) -> LinearPixelMap {
        assert_gt!(n, 1);
        let offset = x0;
        let slope = (x1 - x0) / ((n - 1) as f64);
        LinearPixelMap { offset, slope }
    }

    // Map from pixel (integer) to point (float)
    pub fn map(&self, index: u32) -> f64 {
        self.offset + self.slope * (index as f64)
    }

    // Map from point to the nearest pixel. May be negative or past the end.
    pub fn inverse_map(&self, point: f64) -> i64 {
        ((point - self.offset) / self.slope).round() as i64
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlotSeries {
    pub points: Vec<[f64; 2]>,
    pub color_rgb: [u8; 3],
}

/**
 * Rasterizes line series onto a white canvas with a light grid and a black
 * frame around the plot area. Values outside of `y_limits` (including
 * infinities) are clamped onto the frame; NaN is drawn at the bottom.
 */
pub struct LinePlot {
    spec: PlotSpecification,
    x_limits: [f64; 2],
    width_map: LinearPixelMap,
    height_map: LinearPixelMap,
}

impl LinePlot {
    /**
     * Checks the specification against the x-range of the data. Both ranges
     * must be finite and increasing, the plot area must be at least two
     * pixels wide and tall once the margin is removed, and there may be at
     * most one grid line per pixel.
     */
    pub fn new(spec: &PlotSpecification, x_limits: [f64; 2]) -> Result<LinePlot> {
        let [width, height] = spec.resolution;
        let plot_width = plot_area_size(width, spec.margin)?;
        let plot_height = plot_area_size(height, spec.margin)?;
        check_limits("x", x_limits)?;
        check_limits("y", spec.y_limits)?;
        check_grid_spacing("x", x_limits, spec.grid_spacing[0], plot_width)?;
        check_grid_spacing("y", spec.y_limits, spec.grid_spacing[1], plot_height)?;

        Ok(LinePlot {
            spec: spec.clone(),
            x_limits,
            width_map: LinearPixelMap::new(plot_width, x_limits[0], x_limits[1]),
            // Image coordinates are upside down.
            height_map: LinearPixelMap::new(plot_height, spec.y_limits[1], spec.y_limits[0]),
        })
    }

    /// Pixel location of a data point, with `y` clamped to the plot range.
    pub fn to_pixel(&self, point: &[f64; 2]) -> (i64, i64) {
        let [y_min, y_max] = self.spec.y_limits;
        let y = if point[1].is_nan() {
            y_min
        } else {
            point[1].clamp(y_min, y_max)
        };
        let margin = self.spec.margin as i64;
        (
            margin + self.width_map.inverse_map(point[0]),
            margin + self.height_map.inverse_map(y),
        )
    }

    pub fn render(&self, series: &[PlotSeries]) -> RgbImage {
        let [width, height] = self.spec.resolution;
        let mut image = RgbImage::from_pixel(width, height, BACKGROUND);

        self.draw_grid(&mut image);
        self.draw_frame(&mut image);

        for line in series {
            let color = Rgb(line.color_rgb);
            let pixels: Vec<(i64, i64)> = line.points.iter().map(|p| self.to_pixel(p)).collect();
            match pixels.as_slice() {
                [] => {}
                [single] => put_pixel_checked(&mut image, *single, color),
                _ => {
                    for pair in pixels.windows(2) {
                        draw_line(&mut image, pair[0], pair[1], color);
                    }
                }
            }
        }
        image
    }

    fn draw_grid(&self, image: &mut RgbImage) {
        let [x_step, y_step] = self.spec.grid_spacing;
        let [y_min, y_max] = self.spec.y_limits;
        let top = self.to_pixel(&[self.x_limits[0], y_max]);
        let bottom = self.to_pixel(&[self.x_limits[1], y_min]);

        for x in grid_values(self.x_limits, x_step) {
            let (px, _) = self.to_pixel(&[x, y_min]);
            draw_line(image, (px, top.1), (px, bottom.1), GRID);
        }
        for y in grid_values(self.spec.y_limits, y_step) {
            let (_, py) = self.to_pixel(&[self.x_limits[0], y]);
            draw_line(image, (top.0, py), (bottom.0, py), GRID);
        }
    }

    fn draw_frame(&self, image: &mut RgbImage) {
        let [y_min, y_max] = self.spec.y_limits;
        let (left, top) = self.to_pixel(&[self.x_limits[0], y_max]);
        let (right, bottom) = self.to_pixel(&[self.x_limits[1], y_min]);
        draw_line(image, (left, top), (right, top), AXES);
        draw_line(image, (right, top), (right, bottom), AXES);
        draw_line(image, (right, bottom), (left, bottom), AXES);
        draw_line(image, (left, bottom), (left, top), AXES);
    }
}

/// Pixels left along one axis once the margin is removed on both sides.
fn plot_area_size(size: u32, margin: u32) -> Result<u32> {
    if size > MAX_RESOLUTION {
        return Err(ApproximationError::InvalidPlot(format!(
            "resolution {} exceeds the maximum of {}",
            size, MAX_RESOLUTION
        )));
    }
    match margin.checked_mul(2).and_then(|m| size.checked_sub(m)) {
        Some(inner) if inner >= 2 => Ok(inner),
        _ => Err(ApproximationError::InvalidPlot(format!(
            "resolution {} leaves no room for a plot inside a margin of {}",
            size, margin
        ))),
    }
}

fn check_limits(axis: &str, limits: [f64; 2]) -> Result<()> {
    if limits[0].is_finite() && limits[1].is_finite() && limits[0] < limits[1] {
        Ok(())
    } else {
        Err(ApproximationError::InvalidPlot(format!(
            "{} limits must be finite and increasing, got [{}, {}]",
            axis, limits[0], limits[1]
        )))
    }
}

/// A spacing of zero turns the grid off for that axis.
fn check_grid_spacing(axis: &str, limits: [f64; 2], step: f64, pixels: u32) -> Result<()> {
    let valid = step == 0.0
        || (step > 0.0 && step.is_finite() && (limits[1] - limits[0]) / step <= pixels as f64);
    if valid {
        Ok(())
    } else {
        Err(ApproximationError::InvalidPlot(format!(
            "{} grid spacing {} is not zero or too fine for {} pixels",
            axis, step, pixels
        )))
    }
}

/// Multiples of `step` that fall inside `limits`.
fn grid_values(limits: [f64; 2], step: f64) -> Vec<f64> {
    if !(step > 0.0) {
        return Vec::new();
    }
    let first = (limits[0] / step).ceil() as i64;
    let last = (limits[1] / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

fn put_pixel_checked(image: &mut RgbImage, pixel: (i64, i64), color: Rgb<u8>) {
    let (x, y) = pixel;
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line between two pixels, silently clipped to the image.
fn draw_line(image: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel_checked(image, (x, y), color);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
