//! Presentation sinks: colormaps, hillshading, PNG images, a globe view and
//! raw array export.
//!
//! Fields are stored with row 0 at the south pole; every image is flipped so
//! north is at the top.

use std::f64::consts::PI;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;
use tracing::debug;

use crate::altitude::AltitudeMap;
use crate::biomes::Biome;
use crate::config::PlanetConfig;
use crate::error::ExportError;
use crate::hydro::WaterClass;
use crate::normalize::min_max_normalize;
use crate::tilemap::Tilemap;

// =============================================================================
// COLORMAPS
// =============================================================================

/// Deep ocean, ocean, plains, hills, plateaus, mountains, summits.
const TERRAIN_PALETTE: [[u8; 3]; 7] = [
    [0x07, 0x28, 0x4a],
    [0x14, 0x4a, 0x74],
    [0x1e, 0x7f, 0x3f],
    [0x88, 0xa6, 0x3a],
    [0xc2, 0xb2, 0x80],
    [0x8b, 0x5a, 0x2b],
    [0xff, 0xff, 0xff],
];

/// Inferno sampled at nine evenly spaced points.
const INFERNO_STOPS: [[u8; 3]; 9] = [
    [0, 0, 4],
    [31, 12, 72],
    [85, 15, 109],
    [136, 34, 106],
    [186, 54, 85],
    [227, 89, 51],
    [249, 140, 10],
    [249, 201, 50],
    [252, 255, 164],
];

/// Discrete terrain palette: `[0, 1]` split into seven equal bands.
pub fn terrain_color(t: f32) -> [u8; 3] {
    let n = TERRAIN_PALETTE.len();
    let idx = ((t.clamp(0.0, 1.0) * n as f32) as usize).min(n - 1);
    TERRAIN_PALETTE[idx]
}

pub fn inferno(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (INFERNO_STOPS.len() - 1) as f32;
    let idx = (scaled as usize).min(INFERNO_STOPS.len() - 2);
    lerp_color(INFERNO_STOPS[idx], INFERNO_STOPS[idx + 1], scaled - idx as f32)
}

pub fn grayscale(t: f32) -> [u8; 3] {
    let v = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
    [v, v, v]
}

fn lerp_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
    ]
}

// =============================================================================
// HILLSHADE
// =============================================================================

/// Illumination of a height field in `[0, 1]` for a light at `azimuth` and
/// `altitude` (degrees). A flat field gives `(sin(altitude) + 1) / 2`.
pub fn hillshade(field: &Tilemap<f32>, azimuth: f32, altitude: f32) -> Tilemap<f32> {
    let (d_row, d_col) = field.gradient();
    let azimuth = azimuth.to_radians();
    let altitude = altitude.to_radians();

    d_row.zip_map(&d_col, |&x, &y| {
        let slope = std::f32::consts::FRAC_PI_2 - (x * x + y * y).sqrt().atan();
        let aspect = (-x).atan2(y);
        let shaded = altitude.sin() * slope.sin()
            + altitude.cos() * slope.cos() * (azimuth - aspect).cos();
        ((shaded + 1.0) / 2.0).clamp(0.0, 1.0)
    })
}

/// Soft-light blend of a base color with an intensity in `[0, 1]`.
fn soft_light(base: [u8; 3], intensity: f32) -> [u8; 3] {
    let blend = |c: u8| {
        let c = c as f32 / 255.0;
        let out = 2.0 * intensity * c + (1.0 - 2.0 * intensity) * c * c;
        (out.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    [blend(base[0]), blend(base[1]), blend(base[2])]
}

// =============================================================================
// MAP RENDERERS
// =============================================================================

/// Paint every cell, flipping rows so north is at the top.
fn render_map<T, F>(map: &Tilemap<T>, color: F) -> RgbImage
where
    T: Clone,
    F: Fn(&T) -> [u8; 3],
{
    let mut img: RgbImage = ImageBuffer::new(map.width as u32, map.height as u32);
    for (x, y, value) in map.iter() {
        let py = map.height - 1 - y;
        img.put_pixel(x as u32, py as u32, Rgb(color(value)));
    }
    img
}

/// Altitude as grayscale, black at 0 and white at 1.
pub fn render_grayscale(altitude: &Tilemap<f32>) -> RgbImage {
    render_map(altitude, |&v| grayscale(v))
}

/// Terrain palette modulated by a hillshade from the north-west.
/// `vertical_exaggeration` scales the field before shading.
pub fn render_shaded_relief(altitude: &Tilemap<f32>, vertical_exaggeration: f32) -> RgbImage {
    let exaggerated = altitude.map(|&v| v * vertical_exaggeration);
    let shade = hillshade(&exaggerated, 315.0, 45.0);
    let colored = altitude.zip_map(&shade, |&a, &s| soft_light(terrain_color(a), s));
    render_map(&colored, |&c| c)
}

pub fn render_biomes(biomes: &Tilemap<Biome>) -> RgbImage {
    render_map(biomes, |b| b.color())
}

pub fn render_water(water: &Tilemap<WaterClass>) -> RgbImage {
    render_map(water, |w| w.color())
}

/// Wind speed on the inferno scale, stretched to the field's own range.
pub fn render_wind_speed(speed: &Tilemap<f32>) -> RgbImage {
    let normalized = min_max_normalize(speed);
    render_map(&normalized.field, |&v| inferno(v))
}

/// Latitude temperature profile (south to north) repeated across `width`
/// columns, on the inferno scale.
pub fn render_thermal_texture(profile: &[f64], width: usize) -> RgbImage {
    let values: Vec<f32> = profile.iter().map(|&t| t as f32).collect();
    let column = match Tilemap::from_vec(1, values.len(), values) {
        Some(column) => min_max_normalize(&column).field,
        None => return RgbImage::new(width as u32, 0),
    };

    let mut img: RgbImage = ImageBuffer::new(width as u32, column.height as u32);
    for y in 0..column.height {
        let color = Rgb(inferno(*column.get(0, y)));
        let py = (column.height - 1 - y) as u32;
        for x in 0..width as u32 {
            img.put_pixel(x, py, color);
        }
    }
    img
}

/// Line chart of temperature against latitude on a white background,
/// latitude on the horizontal axis and the temperature range filling the
/// plot height. Grid lines every 30° of latitude.
pub fn render_profile_chart(latitudes: &[f64], temperatures: &[f64], width: u32, height: u32) -> RgbImage {
    const MARGIN: u32 = 40;
    const GRID: Rgb<u8> = Rgb([220, 220, 220]);
    const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
    const LINE: Rgb<u8> = Rgb([31, 119, 180]);

    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, Rgb([255, 255, 255]));
    if width <= 2 * MARGIN + 1 || height <= 2 * MARGIN + 1 {
        return img;
    }

    let left = MARGIN as f64;
    let top = MARGIN as f64;
    let plot_w = (width - 1 - 2 * MARGIN) as f64;
    let plot_h = (height - 1 - 2 * MARGIN) as f64;
    let right = left + plot_w;
    let bottom = top + plot_h;

    let lat_x = |lat: f64| left + (lat + 90.0) / 180.0 * plot_w;
    for step in 0..=6 {
        let x = lat_x(-90.0 + 30.0 * step as f64);
        draw_line(&mut img, (x, top), (x, bottom), GRID);
    }
    for step in 0..=4 {
        let y = top + plot_h * step as f64 / 4.0;
        draw_line(&mut img, (left, y), (right, y), GRID);
    }
    draw_line(&mut img, (left, bottom), (right, bottom), AXIS);
    draw_line(&mut img, (left, top), (left, bottom), AXIS);

    let values: Vec<f32> = temperatures.iter().map(|&t| t as f32).collect();
    let scaled = match Tilemap::from_vec(1, values.len(), values) {
        Some(column) => min_max_normalize(&column).field,
        None => return img,
    };

    let points: Vec<(f64, f64)> = latitudes
        .iter()
        .zip(scaled.values())
        .map(|(&lat, &t)| (lat_x(lat.clamp(-90.0, 90.0)), bottom - t as f64 * plot_h))
        .collect();
    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], LINE);
    }

    img
}

/// Straight segment between two pixel positions, endpoints included.
fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let (w, h) = img.dimensions();
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = (from.0 + (to.0 - from.0) * t).round();
        let y = (from.1 + (to.1 - from.1) * t).round();
        if x >= 0.0 && y >= 0.0 && (x as u32) < w && (y as u32) < h {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

// =============================================================================
// GLOBE
// =============================================================================

/// Orthographic view of an equirectangular texture (north at the top)
/// wrapped on a sphere, lit from the upper right. `rotation` turns the
/// globe in longitude (radians).
pub fn render_globe(texture: &RgbImage, size: u32, rotation: f64) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::from_pixel(size, size, Rgb([5, 5, 15]));
    let (tex_w, tex_h) = texture.dimensions();
    if tex_w == 0 || tex_h == 0 || size == 0 {
        return img;
    }

    let radius = size as f64 / 2.0 * 0.95;
    let center = size as f64 / 2.0;
    let light = normalize_vec(1.0, 1.0, 0.8);

    for py in 0..size {
        for px in 0..size {
            let x = (px as f64 + 0.5 - center) / radius;
            let y = (center - py as f64 - 0.5) / radius;

            let r_squared = x * x + y * y;
            if r_squared > 1.0 {
                continue;
            }
            let z = (1.0 - r_squared).sqrt();

            let lat = y.asin();
            let lon = (x.atan2(z) + rotation).rem_euclid(2.0 * PI);

            let tx = ((lon / (2.0 * PI) * tex_w as f64) as u32).min(tex_w - 1);
            let ty = (((0.5 - lat / PI) * tex_h as f64) as u32).min(tex_h - 1);
            let base = texture.get_pixel(tx, ty).0;

            let diffuse = (x * light.0 + y * light.1 + z * light.2).max(0.0);
            let ambient = 0.3;
            let intensity = ambient + (1.0 - ambient) * diffuse;

            let shade = |c: u8| (c as f64 * intensity).clamp(0.0, 255.0) as u8;
            img.put_pixel(px, py, Rgb([shade(base[0]), shade(base[1]), shade(base[2])]));
        }
    }

    img
}

fn normalize_vec(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let len = (x * x + y * y + z * z).sqrt();
    (x / len, y / len, z / len)
}

// =============================================================================
// FILE OUTPUT
// =============================================================================

/// Save an image as PNG, creating the parent directory.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    img.save(path)?;
    debug!(path = %path.display(), "image written");
    Ok(())
}

#[derive(Serialize)]
struct RawSidecar<'a> {
    width: usize,
    height: usize,
    dtype: &'static str,
    row_order: &'static str,
    degenerate: bool,
    config: &'a PlanetConfig,
}

/// Write the heights as row-major little-endian `f32` to `dir/name.f32`
/// plus a `dir/name.json` sidecar describing the layout and the config.
/// Returns the path of the array file.
pub fn export_raw(
    altitude: &AltitudeMap,
    config: &PlanetConfig,
    dir: &Path,
    name: &str,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;

    let data_path = dir.join(format!("{name}.f32"));
    let mut writer = BufWriter::new(File::create(&data_path)?);
    for &v in altitude.heights.values() {
        writer.write_all(&v.to_le_bytes())?;
    }
    writer.flush()?;

    let sidecar = RawSidecar {
        width: altitude.width(),
        height: altitude.height(),
        dtype: "float32_le",
        row_order: "south_to_north",
        degenerate: altitude.degenerate,
        config,
    };
    let json = BufWriter::new(File::create(dir.join(format!("{name}.json")))?);
    serde_json::to_writer_pretty(json, &sidecar)?;

    Ok(data_path)
}
