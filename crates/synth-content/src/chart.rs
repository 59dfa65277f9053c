//! Procedural charts
//!
//! The asset layout mirrors the regions the layout engine annotates: a
//! caption strip along the bottom, and inside the graphic a y-axis strip on
//! the left and an x-axis strip along the bottom, each `axis_fraction` of the
//! graphic's width or height. Axes, ticks and tick labels stay inside those
//! strips; the plotted data stays outside them.

use crate::corpus::Corpus;
use crate::text::draw_caption;
use crate::typeface::{TextStyle, Typeface, INK};
use image::{ImageBuffer, Rgb};
use layout::FigureKind;
use page_canvas::{draw, Asset, WHITE};
use rand::Rng;

const PALETTE: [Rgb<u8>; 6] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
];

const GRID: Rgb<u8> = Rgb([225, 225, 225]);

/// Geometry of one chart asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSpec {
    pub width: u32,
    pub height: u32,
    pub kind: FigureKind,
    /// Height of the caption strip, zero for none
    pub caption_height: u32,
    /// Axis strip size as a fraction of the graphic
    pub axis_fraction: f64,
}

/// Pixel rectangles of the chart's parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    graphic_h: u32,
    y_strip_w: u32,
    x_strip_h: u32,
    /// Plot area `(x0, y0, x1, y1)`, exclusive ends
    plot: (u32, u32, u32, u32),
}

impl Frame {
    fn new(spec: &ChartSpec) -> Self {
        let graphic_h = if spec.caption_height > 0 && spec.height > spec.caption_height {
            spec.height - spec.caption_height
        } else {
            spec.height
        };
        let y_strip_w = (spec.width as f64 * spec.axis_fraction).floor() as u32;
        let x_strip_h = (graphic_h as f64 * spec.axis_fraction).floor() as u32;
        let pad = (spec.width.min(graphic_h) / 25).max(1);
        let plot = (
            y_strip_w + pad,
            pad,
            spec.width.saturating_sub(pad),
            graphic_h.saturating_sub(x_strip_h + pad),
        );
        Self {
            graphic_h,
            y_strip_w,
            x_strip_h,
            plot,
        }
    }

    fn plot_is_usable(&self) -> bool {
        let (x0, y0, x1, y1) = self.plot;
        x1 > x0 + 2 && y1 > y0 + 2
    }
}

/// Render a chart of the requested kind at exactly `spec.width` x `spec.height`
pub fn render_chart<R: Rng + ?Sized>(
    face: &Typeface,
    corpus: &Corpus,
    rng: &mut R,
    spec: &ChartSpec,
) -> Asset {
    let mut image: Asset = ImageBuffer::from_pixel(spec.width, spec.height, WHITE);
    let frame = Frame::new(spec);

    draw_axes(&mut image, face, rng, &frame, spec.width);
    if frame.plot_is_usable() {
        match spec.kind {
            FigureKind::Line => draw_lines(&mut image, rng, &frame),
            FigureKind::Bar => draw_bars(&mut image, rng, &frame),
            FigureKind::Scatter => draw_scatter(&mut image, rng, &frame),
            FigureKind::Blank => draw_empty_plot(&mut image, &frame),
        }
    }

    if frame.graphic_h < spec.height {
        draw_caption(
            &mut image,
            face,
            corpus,
            rng,
            frame.graphic_h,
            spec.height - frame.graphic_h,
        );
    }
    image
}

fn draw_axes<R: Rng + ?Sized>(
    image: &mut Asset,
    face: &Typeface,
    rng: &mut R,
    frame: &Frame,
    width: u32,
) {
    if frame.y_strip_w < 2 || frame.x_strip_h < 2 {
        return;
    }
    let axis_x = frame.y_strip_w - 1;
    let axis_y = frame.graphic_h - frame.x_strip_h;

    // Y axis runs down the inner edge of its strip, X axis along the top of its strip
    draw::fill_rect(image, axis_x, 0, 1, axis_y + 1, INK);
    draw::fill_rect(image, axis_x, axis_y, width - axis_x, 1, INK);

    let ticks = rng.gen_range(3..=6u32);
    let tick_len = (frame.x_strip_h / 6).clamp(1, 6);
    let label_size = (frame.x_strip_h / 3).clamp(4, 14);
    let style = TextStyle::new(label_size, false);

    let (px0, py0, px1, py1) = frame.plot;
    for i in 0..=ticks {
        // X ticks and labels below the axis line
        let x = px0 + (px1.saturating_sub(px0)) * i / ticks;
        if x < width {
            draw::fill_rect(image, x, axis_y, 1, tick_len + 1, INK);
            let label = format!("{}", i * rng.gen_range(1..=20u32));
            let lw = face.measure(&label, label_size, false);
            let lx = x.saturating_sub(lw / 2).max(frame.y_strip_w);
            let ly = axis_y + tick_len + 2;
            if ly + label_size <= frame.graphic_h && lx + lw <= width {
                face.draw_word(image, lx, ly, &label, &style);
            }
        }

        // Y ticks and labels left of the axis line
        let y = py1.saturating_sub((py1.saturating_sub(py0)) * i / ticks);
        if y < axis_y {
            draw::fill_rect(image, axis_x.saturating_sub(tick_len), y, tick_len, 1, INK);
            let label = format!("{}", i * rng.gen_range(1..=50u32));
            let lw = face.measure(&label, label_size, false);
            let right = axis_x.saturating_sub(tick_len + 2);
            if lw <= right {
                let ly = y.saturating_sub(label_size / 2);
                face.draw_word(image, right - lw, ly, &label, &style);
            }
        }
    }
}

fn draw_grid(image: &mut Asset, frame: &Frame) {
    let (x0, y0, x1, y1) = frame.plot;
    let rows = 4;
    for i in 0..=rows {
        let y = y0 + (y1 - y0 - 1) * i / rows;
        draw::fill_rect(image, x0, y, x1 - x0, 1, GRID);
    }
}

/// Gridlines inside a boxed plot area, no data
fn draw_empty_plot(image: &mut Asset, frame: &Frame) {
    let (x0, y0, x1, y1) = frame.plot;
    draw_grid(image, frame);
    draw::stroke_rect(image, x0, y0, x1 - x0, y1 - y0, GRID);
}

fn draw_lines<R: Rng + ?Sized>(image: &mut Asset, rng: &mut R, frame: &Frame) {
    draw_grid(image, frame);
    let (x0, y0, x1, y1) = frame.plot;
    let series = rng.gen_range(1..=3);
    let points = rng.gen_range(5..=20u32);
    let span = (y1 - y0 - 1) as f64;

    for s in 0..series {
        let color = PALETTE[s % PALETTE.len()];
        let mut value: f64 = rng.gen_range(0.2..0.8);
        let mut prev: Option<(i64, i64)> = None;
        for i in 0..points {
            value = (value + rng.gen_range(-0.15..0.15)).clamp(0.0, 1.0);
            let x = x0 + (x1 - x0 - 1) * i / (points - 1);
            let y = y0 + ((1.0 - value) * span).round() as u32;
            let point = (x as i64, y as i64);
            if let Some(p) = prev {
                draw::draw_line(image, p, point, 2, color);
            }
            prev = Some(point);
        }
    }
}

fn draw_bars<R: Rng + ?Sized>(image: &mut Asset, rng: &mut R, frame: &Frame) {
    let (x0, y0, x1, y1) = frame.plot;
    let bars = rng.gen_range(3..=12u32);
    let slot = (x1 - x0) / bars;
    if slot < 2 {
        return;
    }
    let bar_w = (slot * 2 / 3).max(1);
    let color = PALETTE[rng.gen_range(0..PALETTE.len())];

    for i in 0..bars {
        let h = ((y1 - y0) as f64 * rng.gen_range(0.1..1.0)) as u32;
        let x = x0 + i * slot + (slot - bar_w) / 2;
        draw::fill_rect(image, x, y1 - h, bar_w, h, color);
    }
}

fn draw_scatter<R: Rng + ?Sized>(image: &mut Asset, rng: &mut R, frame: &Frame) {
    let (x0, y0, x1, y1) = frame.plot;
    let count = rng.gen_range(20..=120);
    let size = ((x1 - x0).min(y1 - y0) / 60).clamp(2, 5);
    let color = PALETTE[rng.gen_range(0..PALETTE.len())];
    let slope: f64 = rng.gen_range(-1.0..1.0);

    for _ in 0..count {
        let t: f64 = rng.gen_range(0.0..1.0);
        let v = (0.5 + slope * (t - 0.5) + rng.gen_range(-0.2..0.2)).clamp(0.0, 1.0);
        let x = x0 + (t * (x1 - x0 - size) as f64) as u32;
        let y = y0 + ((1.0 - v) * (y1 - y0 - size) as f64) as u32;
        draw::fill_rect(image, x, y, size, size, color);
    }
}
