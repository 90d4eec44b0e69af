//! Full-viewport weather overlays.
//!
//! Overlays are described as plain shapes in viewport pixels (origin top
//! left, +Y down). Randomised parameters come from the caller's RNG so a
//! seeded generator reproduces the same scene.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

pub const RAIN_DROP_COUNT: usize = 60;
pub const THUNDER_DROP_COUNT: usize = 120;
pub const SNOW_FLAKE_COUNT: usize = 40;

/// Thunder flash cycle length in seconds.
pub const FLASH_PERIOD_S: f64 = 3.7;

/// `(cycle phase, opacity)` stops of the thunder flash: three strikes, then
/// dark for the rest of the cycle. Opacity is linear between stops.
const FLASH_KEYFRAMES: [(f64, f64); 7] = [
    (0.0, 1.0),
    (0.05, 0.0),
    (0.08, 1.0),
    (0.13, 0.0),
    (0.16, 1.0),
    (0.22, 0.0),
    (1.0, 0.0),
];

/// Falling particles fade out over the last tenth of each fall.
const FALL_FADE_START: f64 = 0.9;

const BOLT_SHAPE: [[f64; 2]; 7] = [
    [100.0, 0.0],
    [120.0, 60.0],
    [110.0, 60.0],
    [130.0, 120.0],
    [90.0, 80.0],
    [100.0, 80.0],
    [80.0, 0.0],
];
const BOLT_SCALE: f64 = 3.0;
const BOLT_OFFSET_Y: f64 = 60.0;

const SUN_CENTER_Y: f64 = 120.0;
const SUN_RADIUS: f64 = 70.0;
const SUN_RAY_COUNT: usize = 16;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Rain,
    Thunder,
    Dusty,
    Snow,
    Sunny,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 5] = [
        OverlayKind::Rain,
        OverlayKind::Thunder,
        OverlayKind::Dusty,
        OverlayKind::Snow,
        OverlayKind::Sunny,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OverlayKind::Rain => "rain",
            OverlayKind::Thunder => "thunder",
            OverlayKind::Dusty => "dusty",
            OverlayKind::Snow => "snow",
            OverlayKind::Sunny => "sunny",
        }
    }

    /// Uniform pick over [`OverlayKind::ALL`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOverlay(pub String);

impl fmt::Display for UnknownOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown overlay kind: {:?}", self.0)
    }
}

impl std::error::Error for UnknownOverlay {}

impl FromStr for OverlayKind {
    type Err = UnknownOverlay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| UnknownOverlay(s.to_string()))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One falling particle. It starts at `(x, y)` and drops `fall_distance`
/// pixels every `duration_s`, looping forever after `delay_s`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Droplet {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub delay_s: f64,
    pub duration_s: f64,
    pub fall_distance: f64,
    pub opacity: f64,
}

impl Droplet {
    fn fall_phase(&self, elapsed_s: f64) -> Option<f64> {
        let t = elapsed_s - self.delay_s;
        if t < 0.0 || self.duration_s <= 0.0 {
            return None;
        }
        Some((t % self.duration_s) / self.duration_s)
    }

    /// Vertical position `elapsed_s` seconds after the overlay appeared, or
    /// `None` while the droplet is still waiting out its delay.
    pub fn y_at(&self, elapsed_s: f64) -> Option<f64> {
        self.fall_phase(elapsed_s).map(|phase| self.y + phase * self.fall_distance)
    }

    /// Opacity at `elapsed_s`: the base `opacity` for most of the fall, then
    /// a linear fade to zero at the bottom.
    pub fn opacity_at(&self, elapsed_s: f64) -> Option<f64> {
        let phase = self.fall_phase(elapsed_s)?;
        if phase < FALL_FADE_START {
            return Some(self.opacity);
        }
        Some(self.opacity * (1.0 - (phase - FALL_FADE_START) / (1.0 - FALL_FADE_START)))
    }
}

/// Flash curve value `elapsed_s` into a looping cycle of `period_s`.
fn flash_opacity(elapsed_s: f64, period_s: f64) -> f64 {
    if period_s <= 0.0 {
        return 0.0;
    }
    let phase = (elapsed_s.max(0.0) % period_s) / period_s;
    FLASH_KEYFRAMES
        .windows(2)
        .find(|pair| phase < pair[1].0)
        .map(|pair| {
            let ((p0, o0), (p1, o1)) = (pair[0], pair[1]);
            o0 + (o1 - o0) * (phase - p0) / (p1 - p0)
        })
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bolt {
    pub points: Vec<[f64; 2]>,
    pub flash_period_s: f64,
}

impl Bolt {
    fn for_viewport(viewport: Viewport) -> Self {
        let offset_x = viewport.width / 2.0 - 390.0;
        let points = BOLT_SHAPE
            .iter()
            .map(|[x, y]| [x * BOLT_SCALE + offset_x, y * BOLT_SCALE + BOLT_OFFSET_Y])
            .collect();
        Self {
            points,
            flash_period_s: FLASH_PERIOD_S,
        }
    }

    pub fn opacity_at(&self, elapsed_s: f64) -> f64 {
        flash_opacity(elapsed_s, self.flash_period_s)
    }
}

/// Full-viewport wash that strobes in step with the bolt.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Flash {
    pub tint: Tint,
    pub period_s: f64,
}

impl Flash {
    pub fn opacity_at(&self, elapsed_s: f64) -> f64 {
        flash_opacity(elapsed_s, self.period_s)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SunRay {
    pub from: [f64; 2],
    pub to: [f64; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    pub center: [f64; 2],
    pub radius: f64,
    pub glow_radius: f64,
    pub rays: Vec<SunRay>,
}

impl Sun {
    fn for_viewport(viewport: Viewport) -> Self {
        let center = [viewport.width / 2.0, SUN_CENTER_Y];
        let inner = SUN_RADIUS + 10.0;
        let outer = SUN_RADIUS + 40.0;
        let rays = (0..SUN_RAY_COUNT)
            .map(|i| {
                let angle = (i as f64) * std::f64::consts::TAU / SUN_RAY_COUNT as f64;
                let (sin, cos) = angle.sin_cos();
                SunRay {
                    from: [center[0] + cos * inner, center[1] + sin * inner],
                    to: [center[0] + cos * outer, center[1] + sin * outer],
                }
            })
            .collect();
        Self {
            center,
            radius: SUN_RADIUS,
            glow_radius: SUN_RADIUS + 40.0,
            rays,
        }
    }
}

/// Straight RGBA colour wash over the whole viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tint {
    pub rgba: [f64; 4],
}

pub const DUST_TINT: Tint = Tint {
    rgba: [194.0, 178.0, 128.0, 0.35],
};

pub const FLASH_TINT: Tint = Tint {
    rgba: [255.0, 255.0, 200.0, 0.2],
};

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Rain { drops: Vec<Droplet> },
    Thunder {
        drops: Vec<Droplet>,
        bolt: Bolt,
        flash: Flash,
    },
    Dusty { tint: Tint },
    Snow { flakes: Vec<Droplet> },
    Sunny { sun: Sun },
}

impl Overlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Rain { .. } => OverlayKind::Rain,
            Overlay::Thunder { .. } => OverlayKind::Thunder,
            Overlay::Dusty { .. } => OverlayKind::Dusty,
            Overlay::Snow { .. } => OverlayKind::Snow,
            Overlay::Sunny { .. } => OverlayKind::Sunny,
        }
    }

    /// Particles for rain, thunder and snow; empty otherwise.
    pub fn particles(&self) -> &[Droplet] {
        match self {
            Overlay::Rain { drops } | Overlay::Thunder { drops, .. } => drops,
            Overlay::Snow { flakes } => flakes,
            Overlay::Dusty { .. } | Overlay::Sunny { .. } => &[],
        }
    }
}

/// Unit sample in `[0, 1)`.
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

fn rain_drops<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    count: usize,
    radius: f64,
    base_duration_s: f64,
) -> Vec<Droplet> {
    (0..count)
        .map(|_| Droplet {
            x: unit(rng) * viewport.width,
            y: -20.0,
            radius,
            delay_s: unit(rng) * 2.0,
            duration_s: base_duration_s + unit(rng),
            fall_distance: viewport.height + 40.0,
            opacity: 1.0,
        })
        .collect()
}

fn snow_flakes<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Vec<Droplet> {
    (0..SNOW_FLAKE_COUNT)
        .map(|_| Droplet {
            x: unit(rng) * viewport.width,
            y: -30.0,
            radius: 12.0 + unit(rng) * 8.0,
            delay_s: unit(rng) * 2.0,
            duration_s: 2.0 + unit(rng) * 1.5,
            fall_distance: viewport.height + 60.0,
            opacity: 0.85,
        })
        .collect()
}

/// Lay out the overlay for `kind` over a `viewport`-sized surface.
pub fn build_overlay<R: Rng + ?Sized>(
    kind: OverlayKind,
    viewport: Viewport,
    rng: &mut R,
) -> Overlay {
    match kind {
        OverlayKind::Rain => Overlay::Rain {
            drops: rain_drops(rng, viewport, RAIN_DROP_COUNT, 6.0, 1.5),
        },
        OverlayKind::Thunder => Overlay::Thunder {
            drops: rain_drops(rng, viewport, THUNDER_DROP_COUNT, 7.0, 1.0),
            bolt: Bolt::for_viewport(viewport),
            flash: Flash {
                tint: FLASH_TINT,
                period_s: FLASH_PERIOD_S,
            },
        },
        OverlayKind::Dusty => Overlay::Dusty { tint: DUST_TINT },
        OverlayKind::Snow => Overlay::Snow {
            flakes: snow_flakes(rng, viewport),
        },
        OverlayKind::Sunny => Overlay::Sunny {
            sun: Sun::for_viewport(viewport),
        },
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{Overlay, OverlayKind, Viewport, build_overlay};

    const VIEW: Viewport = Viewport::new(1280.0, 720.0);

    #[test]
    fn kind_names_round_trip_through_from_str() {
        for kind in OverlayKind::ALL {
            assert_eq!(kind.name().parse::<OverlayKind>(), Ok(kind));
        }
        assert_eq!(" Snow ".parse::<OverlayKind>(), Ok(OverlayKind::Snow));
        assert!("hail".parse::<OverlayKind>().is_err());
    }

    #[test]
    fn rain_has_sixty_drops_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let overlay = build_overlay(OverlayKind::Rain, VIEW, &mut rng);
        let drops = overlay.particles();
        assert_eq!(drops.len(), 60);
        for d in drops {
            assert!((0.0..1280.0).contains(&d.x));
            assert_eq!(d.y, -20.0);
            assert_eq!(d.radius, 6.0);
            assert!((0.0..2.0).contains(&d.delay_s));
            assert!((1.5..2.5).contains(&d.duration_s));
            assert_eq!(d.fall_distance, 760.0);
        }
    }

    #[test]
    fn thunder_is_denser_rain_with_a_bolt() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let Overlay::Thunder { drops, bolt, .. } =
            build_overlay(OverlayKind::Thunder, VIEW, &mut rng)
        else {
            panic!("expected thunder overlay");
        };
        assert_eq!(drops.len(), 120);
        assert!(drops.iter().all(|d| d.radius == 7.0 && (1.0..2.0).contains(&d.duration_s)));

        assert_eq!(bolt.points.len(), 7);
        // First vertex (100, 0) scaled by 3 and shifted to the centre.
        assert_eq!(bolt.points[0], [300.0 + 640.0 - 390.0, 60.0]);
        assert_eq!(bolt.points[3], [390.0 + 250.0, 420.0]);
    }

    #[test]
    fn bolt_and_wash_strike_three_times_per_cycle() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let Overlay::Thunder { bolt, flash, .. } =
            build_overlay(OverlayKind::Thunder, VIEW, &mut rng)
        else {
            panic!("expected thunder overlay");
        };
        assert_eq!(flash.tint.rgba, [255.0, 255.0, 200.0, 0.2]);
        assert_eq!(flash.period_s, 3.7);

        let stops = [(0.0, 1.0), (0.05, 0.0), (0.08, 1.0), (0.13, 0.0), (0.16, 1.0), (0.22, 0.0)];
        for (phase, expected) in stops {
            let t = phase * 3.7;
            assert!((bolt.opacity_at(t) - expected).abs() < 1e-9, "bolt at {phase}");
            assert!((flash.opacity_at(t) - expected).abs() < 1e-9, "wash at {phase}");
            // Next cycle repeats.
            assert!((bolt.opacity_at(t + 3.7) - expected).abs() < 1e-9, "bolt at 1+{phase}");
        }

        // Linear between stops, dark after the last strike.
        assert!((bolt.opacity_at(0.025 * 3.7) - 0.5).abs() < 1e-9);
        assert!((bolt.opacity_at(0.19 * 3.7) - 0.5).abs() < 1e-9);
        assert_eq!(bolt.opacity_at(0.6 * 3.7), 0.0);
        assert_eq!(bolt.opacity_at(0.999 * 3.7), 0.0);
    }

    #[test]
    fn snow_flakes_are_large_and_translucent() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let overlay = build_overlay(OverlayKind::Snow, VIEW, &mut rng);
        let flakes = overlay.particles();
        assert_eq!(flakes.len(), 40);
        for f in flakes {
            assert_eq!(f.y, -30.0);
            assert!((12.0..20.0).contains(&f.radius));
            assert!((2.0..3.5).contains(&f.duration_s));
            assert_eq!(f.opacity, 0.85);
            assert_eq!(f.fall_distance, 780.0);
        }
    }

    #[test]
    fn sun_sits_top_centre_with_sixteen_rays() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let Overlay::Sunny { sun } = build_overlay(OverlayKind::Sunny, VIEW, &mut rng) else {
            panic!("expected sunny overlay");
        };
        assert_eq!(sun.center, [640.0, 120.0]);
        assert_eq!(sun.radius, 70.0);
        assert_eq!(sun.glow_radius, 110.0);
        assert_eq!(sun.rays.len(), 16);

        let first = sun.rays[0];
        assert_eq!(first.from, [720.0, 120.0]);
        assert_eq!(first.to, [750.0, 120.0]);
    }

    #[test]
    fn dusty_is_a_flat_tint() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let overlay = build_overlay(OverlayKind::Dusty, VIEW, &mut rng);
        assert_eq!(overlay.kind(), OverlayKind::Dusty);
        assert!(overlay.particles().is_empty());
        let Overlay::Dusty { tint } = overlay else {
            panic!("expected dusty overlay");
        };
        assert_eq!(tint.rgba, [194.0, 178.0, 128.0, 0.35]);
    }

    #[test]
    fn same_seed_same_layout() {
        let a = build_overlay(OverlayKind::Rain, VIEW, &mut ChaCha8Rng::seed_from_u64(42));
        let b = build_overlay(OverlayKind::Rain, VIEW, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_sized_viewport_is_fine() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let overlay = build_overlay(OverlayKind::Snow, Viewport::new(0.0, 0.0), &mut rng);
        assert!(overlay.particles().iter().all(|f| f.x == 0.0));
    }

    #[test]
    fn droplet_waits_out_its_delay_then_loops() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let overlay = build_overlay(OverlayKind::Rain, VIEW, &mut rng);
        let d = overlay.particles()[0];
        assert_eq!(d.y_at(d.delay_s - 0.01), None);
        assert_eq!(d.y_at(d.delay_s), Some(d.y));
        let half = d.y_at(d.delay_s + d.duration_s * 0.5).unwrap_or_default();
        assert!((half - (d.y + d.fall_distance * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn droplet_fades_over_the_last_tenth_of_its_fall() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let overlay = build_overlay(OverlayKind::Snow, VIEW, &mut rng);
        let f = overlay.particles()[0];
        let at = |phase: f64| f.opacity_at(f.delay_s + f.duration_s * phase);

        assert_eq!(f.opacity_at(f.delay_s - 0.01), None);
        assert_eq!(at(0.0), Some(0.85));
        assert_eq!(at(0.5), Some(0.85));
        let mid_fade = at(0.95).unwrap_or_default();
        assert!((mid_fade - 0.425).abs() < 1e-6, "got {mid_fade}");
        let end = at(0.999).unwrap_or_default();
        assert!(end < 0.01, "got {end}");
    }

    #[test]
    fn random_kind_covers_every_variant() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(OverlayKind::random(&mut rng));
        }
        assert_eq!(seen.len(), OverlayKind::ALL.len());
    }
}
