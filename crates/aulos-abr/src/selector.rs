use crate::{
    error::{AbrError, AbrResult},
    types::RepresentationSource,
};

/// Pick the representation the estimated bandwidth can sustain.
///
/// Scans `source` in declared order and returns the index of the highest-
/// bandwidth representation whose requirement, scaled by `safety_margin`,
/// fits under `estimate_bps`. Ties on bandwidth keep the earliest index, so
/// repeated calls with identical input always agree.
///
/// `safety_margin` multiplies each representation's requirement (1.0 = none;
/// production drivers typically run 1.1–1.3 to absorb estimation noise).
/// Multiplying the requirement rather than discounting the estimate keeps the
/// margin proportional across tiers of very different bitrate.
///
/// Returns `Ok(None)` when no representation qualifies — an expected outcome
/// (the estimate sits below the cheapest tier), left to the driver's fallback
/// policy.
///
/// # Errors
///
/// Returns [`AbrError::EmptyManifest`] when `source` declares no
/// representations at all.
#[expect(clippy::cast_precision_loss)] // bitrate precision loss is negligible for ABR
pub fn select<S: RepresentationSource + ?Sized>(
    source: &S,
    estimate_bps: u64,
    safety_margin: f64,
) -> AbrResult<Option<usize>> {
    let count = source.representation_count();
    if count == 0 {
        return Err(AbrError::EmptyManifest);
    }

    let mut best: Option<(usize, u64)> = None;
    for index in 0..count {
        let Some(bandwidth) = source.representation_bandwidth(index) else {
            continue;
        };
        let required_bps = (bandwidth as f64) * safety_margin;
        if required_bps > estimate_bps as f64 {
            continue;
        }
        // Strictly-greater keeps the earliest index on equal bandwidth.
        if best.is_none_or(|(_, best_bw)| bandwidth > best_bw) {
            best = Some((index, bandwidth));
        }
    }

    tracing::debug!(
        estimate_bps,
        safety_margin,
        representations = count,
        selected = ?best,
        "representation selection"
    );
    Ok(best.map(|(index, _)| index))
}
