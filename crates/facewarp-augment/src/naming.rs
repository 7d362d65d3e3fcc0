use std::path::Path;

use facewarp_imgproc::transform::TransformParameters;

use crate::config::AugmentConfig;

fn quantize(value: f64) -> i64 {
    value.round() as i64
}

/// Short tag naming a transform and its rounded parameters.
///
/// Intensities and strengths are expressed in hundredths.
///
/// # Example
///
/// ```
/// use facewarp_augment::naming::method_tag;
/// use facewarp_imgproc::{distortion::DistortionMode, transform::TransformParameters};
///
/// let tag = method_tag(&TransformParameters::LensDistortion {
///     strength: 0.15,
///     mode: DistortionMode::Barrel,
/// });
/// assert_eq!(tag, "dist_barrel_15");
/// ```
pub fn method_tag(params: &TransformParameters) -> String {
    match *params {
        TransformParameters::Rotation { angle_degrees } => format!("rot{}", quantize(angle_degrees)),
        TransformParameters::Perspective { pitch, yaw, roll } => format!(
            "persp{}_{}_{}",
            quantize(pitch),
            quantize(yaw),
            quantize(roll)
        ),
        TransformParameters::Lighting {
            angle_degrees,
            intensity,
        } => format!(
            "light{}_{}",
            quantize(angle_degrees),
            quantize(intensity * 100.0)
        ),
        TransformParameters::LensDistortion { strength, mode } => {
            format!("dist_{}_{}", mode, quantize(strength * 100.0))
        }
    }
}

/// The base name of a source image: its stem without the source suffix.
///
/// Returns `None` if the path has no valid UTF-8 stem.
pub fn source_base_name(path: &Path, config: &AugmentConfig) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let base = stem.strip_suffix(config.source_suffix.as_str()).unwrap_or(stem);
    Some(base.to_string())
}

/// True if `path` looks like a source image under `config`.
pub fn is_source_image(path: &Path, config: &AugmentConfig) -> bool {
    let stem_matches = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(config.source_suffix.as_str()));

    let ext_matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            config
                .source_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        });

    stem_matches && ext_matches
}

/// File name of one generated variant.
///
/// `variant` is the 1-based variant index; pass `None` for single-variant
/// runs to omit it.
pub fn output_file_name(
    base: &str,
    params: &TransformParameters,
    variant: Option<usize>,
    config: &AugmentConfig,
) -> String {
    let tag = method_tag(params);
    match variant {
        Some(index) => format!(
            "{base}_{tag}_{index}{}.{}",
            config.output_suffix, config.output_extension
        ),
        None => format!(
            "{base}_{tag}{}.{}",
            config.output_suffix, config.output_extension
        ),
    }
}
