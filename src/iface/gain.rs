//! Gain composition.

use super::model::{ControlPoint, Gain};
use crate::core::Rational;
use crate::util::{Error, Result};

/// Scale `gain` by a constant `offset`.
///
/// Variable offsets are rejected. Without a gain, the offset is returned as
/// is. Each point value becomes `(g.num * o.num) / o.den` over
/// `(g.den * o.den) / o.den`, computed in 64 bits.
pub fn apply_gain_offset(gain: Option<&Gain>, offset: &Gain) -> Result<Gain> {
    if !offset.is_constant() {
        return Err(Error::UnsupportedAutomation);
    }
    let Some(gain) = gain else {
        return Ok(offset.clone());
    };
    let Some(o) = offset.value() else {
        return Ok(gain.clone());
    };
    if o.denominator == 0 {
        tracing::debug!("gain offset {} has no value, ignoring", o);
        return Ok(gain.clone());
    }

    let on = o.numerator as i64;
    let od = o.denominator as i64;
    let points = gain
        .points
        .iter()
        .map(|p| {
            let num = (p.value.numerator as i64 * on) / od;
            let den = (p.value.denominator as i64 * od) / od;
            ControlPoint::new(p.time, Rational::new(saturate(num), saturate(den)))
        })
        .collect();

    Ok(Gain { kind: gain.kind, interpolation: gain.interpolation, points })
}

#[inline]
fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
