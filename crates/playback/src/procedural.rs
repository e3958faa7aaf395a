//! Generated animations and diagnostic fills.
//!
//! `Animation` holds the per-run state of one [`ProceduralKind`]. Each call
//! to [`Animation::draw_frame`] renders exactly one frame and ends with
//! `show()`; pacing is the caller's job via [`frame_interval_ms`].
//!
//! Positions inside the snowfall are kept in hundredths of a pixel so the
//! drift stays smooth without floating point.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use library::{ProceduralKind, SnowfallStyle, TestPattern};
use platform::{Color, DisplaySurface, MatrixId};

/// Sub-pixel units per pixel.
const SUB: i32 = 100;

const SNOW_WHITE: Color = Rgb888::new(220, 240, 255);

const CHASE_COLORS: [Color; 4] = [Rgb888::RED, Rgb888::GREEN, Rgb888::CYAN, Rgb888::WHITE];
const CHASE_LINES: i32 = 3;
const CHASE_SPACING: i32 = 8;

const STAR_ARM: i32 = 8;
const STAR_DIAGONAL: i32 = 6;
const SPARKLES_PER_MATRIX: usize = 20;

const WAVE_STEP: u8 = 4;
const WAVE_COLUMN_SHIFT: u8 = 12;

/// Colours used by the Matrix ID pattern, indexed by matrix.
pub const MATRIX_ID_COLORS: [Color; 3] = [Rgb888::RED, Rgb888::GREEN, Rgb888::BLUE];

/// Milliseconds between frames for `kind`.
pub const fn frame_interval_ms(kind: ProceduralKind) -> u32 {
    match kind {
        ProceduralKind::Chase | ProceduralKind::Snowfall(SnowfallStyle::Standard) => 50,
        ProceduralKind::Snowfall(SnowfallStyle::Gentle) => 80,
        ProceduralKind::Snowfall(SnowfallStyle::Heavy) => 30,
        ProceduralKind::SparklingStars => 100,
        ProceduralKind::ColorWave => 40,
    }
}

/// Flake count and motion ranges (hundredths of a pixel per frame).
struct SnowParams {
    flakes: usize,
    drift: i32,
    fall_min: i32,
    fall_span: i32,
}

const fn snow_params(style: SnowfallStyle) -> SnowParams {
    match style {
        SnowfallStyle::Standard => SnowParams { flakes: 50, drift: 100, fall_min: 50, fall_span: 50 },
        SnowfallStyle::Gentle => SnowParams { flakes: 30, drift: 50, fall_min: 20, fall_span: 30 },
        SnowfallStyle::Heavy => SnowParams { flakes: 80, drift: 150, fall_min: 80, fall_span: 80 },
    }
}

#[derive(Debug, Clone, Copy)]
struct Flake {
    matrix: MatrixId,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

#[derive(Debug)]
enum State {
    Chase {
        position: i32,
        direction: i32,
        color_index: usize,
    },
    Snow(Vec<Flake>),
    Stars,
    Wave {
        phase: u8,
    },
}

/// Running state of one procedural animation.
#[derive(Debug)]
pub struct Animation {
    kind: ProceduralKind,
    state: State,
    rng: SmallRng,
    /// Set once the snowfall has been seeded for the surface dimensions.
    seeded: bool,
}

impl Animation {
    /// Start `kind` with a deterministic random stream.
    pub fn new(kind: ProceduralKind, seed: u64) -> Self {
        let state = match kind {
            ProceduralKind::Chase => State::Chase {
                position: 0,
                direction: 1,
                color_index: 0,
            },
            ProceduralKind::Snowfall(_) => State::Snow(Vec::new()),
            ProceduralKind::SparklingStars => State::Stars,
            ProceduralKind::ColorWave => State::Wave { phase: 0 },
        };
        Self {
            kind,
            state,
            rng: SmallRng::seed_from_u64(seed),
            seeded: false,
        }
    }

    /// Which animation this is.
    pub fn kind(&self) -> ProceduralKind {
        self.kind
    }

    /// Milliseconds between frames.
    pub fn frame_interval_ms(&self) -> u32 {
        frame_interval_ms(self.kind)
    }

    /// Clear, draw one frame on every matrix, and show it.
    pub fn draw_frame<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) {
        let (width, height) = dimensions(surface);
        let matrices = surface.matrix_count();
        surface.clear();
        match &mut self.state {
            State::Chase {
                position,
                direction,
                color_index,
            } => {
                chase_frame(surface, matrices, width, height, *position, *color_index);
                advance_chase(position, direction, color_index, width, height);
            }
            State::Snow(flakes) => {
                if !self.seeded {
                    if let ProceduralKind::Snowfall(style) = self.kind {
                        *flakes = seed_flakes(&mut self.rng, style, matrices, width, height);
                    }
                    self.seeded = true;
                }
                snow_frame(surface, flakes, &mut self.rng, width, height);
            }
            State::Stars => stars_frame(surface, &mut self.rng, matrices, width, height),
            State::Wave { phase } => {
                wave_frame(surface, matrices, width, height, *phase);
                *phase = phase.wrapping_add(WAVE_STEP);
            }
        }
        surface.show();
    }
}

fn dimensions<S: DisplaySurface + ?Sized>(surface: &S) -> (i32, i32) {
    let size = surface.size();
    (
        i32::try_from(size.width).unwrap_or(0),
        i32::try_from(size.height).unwrap_or(0),
    )
}

/// Set a pixel given signed coordinates, ignoring anything off the matrix.
fn plot<S: DisplaySurface + ?Sized>(surface: &mut S, matrix: MatrixId, x: i32, y: i32, color: Color) {
    if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) {
        surface.set_pixel(matrix, x, y, color);
    }
}

// ---------------------------------------------------------------------------
// Chase
// ---------------------------------------------------------------------------

#[allow(clippy::arithmetic_side_effects)] // Safety: all operands are bounded by matrix dimensions (< 100)
fn chase_frame<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    matrices: u8,
    width: i32,
    height: i32,
    position: i32,
    color_index: usize,
) {
    for matrix in 0..matrices {
        for line in 0..CHASE_LINES {
            let start = position + line * CHASE_SPACING;
            if start < -height || start >= width {
                continue;
            }
            let color = CHASE_COLORS
                .get((color_index + line.unsigned_abs() as usize) % CHASE_COLORS.len())
                .copied()
                .unwrap_or(Rgb888::WHITE);
            for i in 0..height {
                let x = start + i;
                if (0..width).contains(&x) {
                    plot(surface, matrix, x, i, color);
                }
            }
        }
    }
}

/// Move the lead line one column and bounce off either edge, changing colour.
#[allow(clippy::arithmetic_side_effects)] // Safety: position stays within [-(height-1), width-1]
fn advance_chase(
    position: &mut i32,
    direction: &mut i32,
    color_index: &mut usize,
    width: i32,
    height: i32,
) {
    *position += *direction;
    if *position >= width - 1 {
        *position = width - 1;
        *direction = -1;
        *color_index = color_index.wrapping_add(1);
    } else if *position <= -(height - 1) {
        *position = -(height - 1);
        *direction = 1;
        *color_index = color_index.wrapping_add(1);
    }
}

// ---------------------------------------------------------------------------
// Snowfall
// ---------------------------------------------------------------------------

#[allow(clippy::arithmetic_side_effects)] // Safety: ranges are small positive constants times matrix dimensions
fn seed_flakes(
    rng: &mut SmallRng,
    style: SnowfallStyle,
    matrices: u8,
    width: i32,
    height: i32,
) -> Vec<Flake> {
    let params = snow_params(style);
    let mut flakes = Vec::with_capacity(params.flakes * usize::from(matrices));
    if width <= 0 || height <= 0 {
        return flakes;
    }
    for matrix in 0..matrices {
        for _ in 0..params.flakes {
            flakes.push(Flake {
                matrix,
                x: rng.gen_range(0..width) * SUB,
                y: rng.gen_range(0..height) * SUB,
                dx: rng.gen_range(-params.drift..params.drift),
                dy: rng.gen_range(params.fall_min..params.fall_min + params.fall_span),
            });
        }
    }
    flakes
}

#[allow(clippy::arithmetic_side_effects)] // Safety: flake coordinates are re-wrapped into the matrix every frame
fn snow_frame<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    flakes: &mut [Flake],
    rng: &mut SmallRng,
    width: i32,
    height: i32,
) {
    if width <= 0 || height <= 0 {
        return;
    }
    for flake in flakes.iter_mut() {
        flake.x += flake.dx;
        flake.y -= flake.dy;
        if flake.x < 0 {
            flake.x = (width - 1) * SUB;
        }
        if flake.x >= width * SUB {
            flake.x = 0;
        }
        if flake.y < 0 {
            flake.y = (height - 1) * SUB;
            flake.x = rng.gen_range(0..width) * SUB;
        }
        plot(surface, flake.matrix, flake.x / SUB, flake.y / SUB, SNOW_WHITE);
    }
}

// ---------------------------------------------------------------------------
// Sparkling stars
// ---------------------------------------------------------------------------

#[allow(clippy::arithmetic_side_effects)] // Safety: offsets are small constants around the matrix centre
fn stars_frame<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    rng: &mut SmallRng,
    matrices: u8,
    width: i32,
    height: i32,
) {
    if width <= 0 || height <= 0 {
        return;
    }
    let (cx, cy) = (width / 2, height / 2);
    for matrix in 0..matrices {
        for i in -STAR_ARM..=STAR_ARM {
            if (0..width).contains(&(cx + i)) {
                plot(surface, matrix, cx + i, cy, Rgb888::YELLOW);
            }
            if (0..height).contains(&(cy + i)) {
                plot(surface, matrix, cx, cy + i, Rgb888::YELLOW);
            }
        }
        for i in -STAR_DIAGONAL..=STAR_DIAGONAL {
            if (0..width).contains(&(cx + i)) && (0..height).contains(&(cy + i)) {
                plot(surface, matrix, cx + i, cy + i, Rgb888::YELLOW);
                plot(surface, matrix, cx + i, cy - i, Rgb888::YELLOW);
            }
        }
        for _ in 0..SPARKLES_PER_MATRIX {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            if rng.gen_bool(0.5) {
                plot(surface, matrix, x, y, Rgb888::WHITE);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Color wave
// ---------------------------------------------------------------------------

/// Map a hue on a 0..=255 wheel to a fully saturated colour.
pub fn hue_to_rgb(hue: u8) -> Color {
    let ramp = |h: u8| h.saturating_mul(3);
    match hue {
        0..=84 => Rgb888::new(255u8.saturating_sub(ramp(hue)), ramp(hue), 0),
        85..=169 => {
            let h = hue.saturating_sub(85);
            Rgb888::new(0, 255u8.saturating_sub(ramp(h)), ramp(h))
        }
        _ => {
            let h = hue.saturating_sub(170);
            Rgb888::new(ramp(h), 0, 255u8.saturating_sub(ramp(h)))
        }
    }
}

fn wave_frame<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    matrices: u8,
    width: i32,
    height: i32,
    phase: u8,
) {
    for matrix in 0..matrices {
        // Opposite halves of the wheel on neighbouring matrices.
        let base = phase.wrapping_add(matrix.wrapping_mul(128));
        let mut hue = base;
        for x in 0..width {
            let color = hue_to_rgb(hue);
            for y in 0..height {
                plot(surface, matrix, x, y, color);
            }
            hue = hue.wrapping_add(WAVE_COLUMN_SHIFT);
        }
    }
}

// ---------------------------------------------------------------------------
// Test patterns
// ---------------------------------------------------------------------------

/// Colour of `pattern` on `matrix`.
pub fn test_pattern_color(pattern: TestPattern, matrix: MatrixId) -> Color {
    match pattern {
        TestPattern::ColorTest => Rgb888::RED,
        TestPattern::AllPixels => Rgb888::WHITE,
        TestPattern::MatrixId => MATRIX_ID_COLORS
            .get(usize::from(matrix))
            .copied()
            .unwrap_or(Rgb888::WHITE),
    }
}

/// Fill every matrix with its `pattern` colour and show it.
pub fn draw_test_pattern<S: DisplaySurface + ?Sized>(pattern: TestPattern, surface: &mut S) {
    surface.clear();
    for matrix in 0..surface.matrix_count() {
        surface.fill_matrix(matrix, test_pattern_color(pattern, matrix));
    }
    surface.show();
}
