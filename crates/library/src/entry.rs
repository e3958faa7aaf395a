//! ContentEntry: one playable row of the catalog.

use alloc::string::String;

use platform::config::{DEFAULT_DURATION_MS, MATRIX_SLOTS};

/// Snowfall density/speed variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SnowfallStyle {
    /// 50 flakes, 50 ms frames
    Standard,
    /// 30 flakes, 80 ms frames
    Gentle,
    /// 80 flakes, 30 ms frames
    Heavy,
}

/// Built-in generated animation, chosen when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProceduralKind {
    /// Diagonal bouncing lines
    Chase,
    /// Falling snow
    Snowfall(SnowfallStyle),
    /// Twinkling stars
    SparklingStars,
    /// Hue sweep
    ColorWave,
}

impl ProceduralKind {
    /// Every built-in animation, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Chase,
        Self::Snowfall(SnowfallStyle::Standard),
        Self::Snowfall(SnowfallStyle::Gentle),
        Self::Snowfall(SnowfallStyle::Heavy),
        Self::SparklingStars,
        Self::ColorWave,
    ];

    /// Display label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chase => "Chase",
            Self::Snowfall(SnowfallStyle::Standard) => "Snowfall",
            Self::Snowfall(SnowfallStyle::Gentle) => "Snowfall Gentle",
            Self::Snowfall(SnowfallStyle::Heavy) => "Snowfall Heavy",
            Self::SparklingStars => "Sparkling Stars",
            Self::ColorWave => "Color Wave",
        }
    }

    /// Theme tag.
    pub const fn theme(self) -> &'static str {
        match self {
            Self::ColorWave => "osu",
            _ => "christmas",
        }
    }
}

/// Built-in diagnostic fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TestPattern {
    /// Solid red on every matrix
    ColorTest,
    /// Solid white on every matrix
    AllPixels,
    /// A distinct solid colour per matrix
    MatrixId,
}

impl TestPattern {
    /// Every test pattern, in catalog order.
    pub const ALL: [Self; 3] = [Self::ColorTest, Self::AllPixels, Self::MatrixId];

    /// Theme tag shared by all test patterns.
    pub const THEME: &'static str = "test";

    /// Display label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ColorTest => "Color Test",
            Self::AllPixels => "All Pixels",
            Self::MatrixId => "Matrix ID",
        }
    }
}

/// What an entry is and how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContentKind {
    /// Static per-matrix scene (`scenes/…/*.json`)
    Scene,
    /// Frame timeline (`…/*_timeline.json`)
    Animation,
    /// Scrolling text (`scroll/…/*.json`)
    Scroll,
    /// Countdown to a target date (`countdown/…/*.json`)
    Countdown,
    /// Generated at render time
    Procedural(ProceduralKind),
    /// Diagnostic fill, never chosen at random
    Test(TestPattern),
}

impl ContentKind {
    /// Lower-case label used in logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Animation => "animation",
            Self::Scroll => "scroll",
            Self::Countdown => "countdown",
            Self::Procedural(_) => "procedural",
            Self::Test(_) => "test",
        }
    }

    /// `true` for diagnostic entries.
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Test(_))
    }

    /// `true` for kinds whose payload lives in flash.
    pub const fn reads_flash(self) -> bool {
        matches!(
            self,
            Self::Scene | Self::Animation | Self::Scroll | Self::Countdown
        )
    }
}

/// Per-matrix scene references. Slot 2 is reserved and usually empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixAssignment(pub [String; MATRIX_SLOTS]);

impl MatrixAssignment {
    /// Build from the three slots.
    pub fn new(m0: String, m1: String, m2: String) -> Self {
        Self([m0, m1, m2])
    }

    /// Scene for `matrix`; empty when the slot is unused or out of range.
    pub fn scene(&self, matrix: usize) -> &str {
        self.0.get(matrix).map_or("", String::as_str)
    }
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Unique id, assigned from 1 in catalog order
    pub id: u16,
    /// Display label
    pub name: String,
    /// Grouping tag, `"unknown"` when the path does not carry one
    pub theme: String,
    /// Kind and renderer selector
    pub kind: ContentKind,
    /// Index path of the payload; empty for built-ins
    pub source_path: String,
    /// Hold time when scheduled
    pub duration_ms: u32,
    /// Per-matrix scene references
    pub matrix: MatrixAssignment,
}

impl ContentEntry {
    /// A built-in entry with no payload.
    pub(crate) fn builtin(id: u16, name: &str, theme: &str, kind: ContentKind) -> Self {
        Self {
            id,
            name: name.into(),
            theme: theme.into(),
            kind,
            source_path: String::new(),
            duration_ms: DEFAULT_DURATION_MS,
            matrix: MatrixAssignment::default(),
        }
    }
}
