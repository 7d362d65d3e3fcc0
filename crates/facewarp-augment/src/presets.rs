//! Discrete parameter catalogs sampled when a method is chosen by name.
//!
//! Pincushion strengths stay below 1 so the distortion factor remains
//! positive across the unit radius.

use facewarp_imgproc::{
    distortion::DistortionMode,
    transform::{TransformKind, TransformParameters},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Rotation angles in degrees.
pub const ROTATION_ANGLES: [f64; 6] = [-15.0, -10.0, -5.0, 5.0, 10.0, 15.0];

/// Head-pose tilts as `(pitch, yaw, roll)` in degrees.
pub const PERSPECTIVE_TILTS: [(f64, f64, f64); 8] = [
    (10.0, 0.0, 0.0),
    (-10.0, 0.0, 0.0),
    (0.0, 10.0, 0.0),
    (0.0, -10.0, 0.0),
    (10.0, -5.0, 0.0),
    (-10.0, 5.0, 0.0),
    (5.0, 5.0, 5.0),
    (-5.0, -5.0, -5.0),
];

/// Lighting as `(angle in degrees, intensity)`.
pub const LIGHTING_PRESETS: [(f64, f64); 8] = [
    (0.0, 0.3),
    (45.0, 0.3),
    (90.0, 0.3),
    (135.0, 0.3),
    (180.0, 0.4),
    (225.0, 0.4),
    (270.0, 0.4),
    (315.0, 0.4),
];

/// Lens distortion as `(strength, mode)`.
pub const DISTORTION_PRESETS: [(f64, DistortionMode); 6] = [
    (0.1, DistortionMode::Barrel),
    (0.15, DistortionMode::Barrel),
    (0.2, DistortionMode::Barrel),
    (0.1, DistortionMode::Pincushion),
    (0.15, DistortionMode::Pincushion),
    (0.2, DistortionMode::Pincushion),
];

/// All presets of one transform kind.
pub fn catalog(kind: TransformKind) -> Vec<TransformParameters> {
    match kind {
        TransformKind::Rotation => ROTATION_ANGLES
            .iter()
            .map(|&angle_degrees| TransformParameters::Rotation { angle_degrees })
            .collect(),
        TransformKind::Perspective => PERSPECTIVE_TILTS
            .iter()
            .map(|&(pitch, yaw, roll)| TransformParameters::Perspective { pitch, yaw, roll })
            .collect(),
        TransformKind::LensDistortion => DISTORTION_PRESETS
            .iter()
            .map(|&(strength, mode)| TransformParameters::LensDistortion { strength, mode })
            .collect(),
        TransformKind::Lighting => LIGHTING_PRESETS
            .iter()
            .map(|&(angle_degrees, intensity)| TransformParameters::Lighting {
                angle_degrees,
                intensity,
            })
            .collect(),
    }
}

/// Picks a transform kind uniformly at random.
pub fn choose_kind<R: Rng>(rng: &mut R) -> TransformKind {
    TransformKind::ALL[rng.random_range(0..TransformKind::ALL.len())]
}

/// Picks a preset of `kind` uniformly at random.
pub fn choose_preset<R: Rng>(kind: TransformKind, rng: &mut R) -> TransformParameters {
    let presets = catalog(kind);
    presets[rng.random_range(0..presets.len())]
}

/// A generator seeded from `seed` and the identity name.
///
/// Each identity gets its own stream, so the presets drawn for one identity
/// do not depend on which identities were processed before it in the same
/// process. The name is folded in with FNV-1a, which is stable across builds.
pub fn identity_rng(seed: u64, identity: &str) -> StdRng {
    let hash = identity
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
        });
    StdRng::seed_from_u64(seed ^ hash)
}
