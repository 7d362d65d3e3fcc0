use std::str::FromStr;

use facewarp_imgproc::transform::{TransformKind, TransformParameters};
use rand::Rng;

use crate::error::AugmentError;
use crate::presets;

/// How the transform of each variant is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MethodSelector {
    /// A random preset of one transform kind.
    Kind(TransformKind),
    /// A random kind, then a random preset of that kind.
    Random,
    /// The same explicit parameters for every variant.
    Fixed(TransformParameters),
}

impl MethodSelector {
    /// The method name recorded in the session metadata.
    pub fn name(&self) -> &'static str {
        match self {
            MethodSelector::Kind(kind) => kind.name(),
            MethodSelector::Random => "random",
            MethodSelector::Fixed(params) => params.kind().name(),
        }
    }

    /// Resolves an optional method name and an optional fixed rotation angle.
    ///
    /// With neither given the selector is [`MethodSelector::Random`].
    ///
    /// # Errors
    ///
    /// Fails if both are given or the name is unknown.
    pub fn from_options(
        method: Option<&str>,
        angle_degrees: Option<f64>,
    ) -> Result<Self, AugmentError> {
        match (method, angle_degrees) {
            (Some(name), Some(_)) => Err(AugmentError::ConflictingMethod(name.to_string())),
            (None, Some(angle_degrees)) => Ok(MethodSelector::Fixed(
                TransformParameters::Rotation { angle_degrees },
            )),
            (Some(name), None) => name.parse(),
            (None, None) => Ok(MethodSelector::Random),
        }
    }

    /// Picks the parameters for the next variant.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> TransformParameters {
        match *self {
            MethodSelector::Kind(kind) => presets::choose_preset(kind, rng),
            MethodSelector::Random => {
                let kind = presets::choose_kind(rng);
                presets::choose_preset(kind, rng)
            }
            MethodSelector::Fixed(params) => params,
        }
    }
}

impl FromStr for MethodSelector {
    type Err = AugmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rotation" => Ok(MethodSelector::Kind(TransformKind::Rotation)),
            "perspective" => Ok(MethodSelector::Kind(TransformKind::Perspective)),
            "distortion" | "lens" => Ok(MethodSelector::Kind(TransformKind::LensDistortion)),
            "lighting" => Ok(MethodSelector::Kind(TransformKind::Lighting)),
            "random" => Ok(MethodSelector::Random),
            _ => Err(AugmentError::UnknownMethod(s.to_string())),
        }
    }
}

impl From<TransformParameters> for MethodSelector {
    fn from(params: TransformParameters) -> Self {
        MethodSelector::Fixed(params)
    }
}
