//! Canonical scaling law shared by every multi-resolution value.

/// NaN maps to the lower bound.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
  if value.is_nan() {
    0.0
  } else {
    value.clamp(0.0, 1.0)
  }
}

#[inline]
pub fn unit_to_scale(value: f64, max: u64) -> u64 {
  (clamp_unit(value) * max as f64).round() as u64
}

#[inline]
pub fn scale_to_unit(value: u64, max: u64) -> f64 {
  value as f64 / max as f64
}

/// `round(value * to_max / from_max)` in integer arithmetic, halves rounding up.
#[inline]
pub fn rescale(value: u64, from_max: u64, to_max: u64) -> u64 {
  let numerator = 2 * value as u128 * to_max as u128 + from_max as u128;
  (numerator / (2 * from_max as u128)) as u64
}
