//! Parameter helpers shared by block configs and the terminal front-end.

/// Lowest level shown in dB; anything at or below is treated as silence.
pub const MIN_DB: f32 = -60.0;

#[inline]
pub fn clamp(val: f32, min: f32, max: f32) -> f32 {
    val.max(min).min(max)
}

/// Decibels to linear gain. At or below `min_db` returns exactly 0.0.
#[inline]
pub fn db_to_lin(db: f32, min_db: f32) -> f32 {
    if db <= min_db {
        return 0.0;
    }
    10.0_f32.powf(db / 20.0)
}

/// Linear gain to decibels, floored at `min_db`.
#[inline]
pub fn lin_to_db(lin: f32, min_db: f32) -> f32 {
    if lin < db_to_lin(min_db, f32::NEG_INFINITY) {
        return min_db;
    }
    20.0 * lin.log10()
}

/// Compact frequency label: "440Hz", "12kHz".
pub fn small_hz_format(hz: f32) -> String {
    if hz >= 1000.0 {
        format!("{:.0}kHz", hz / 1000.0)
    } else {
        format!("{:.0}Hz", hz)
    }
}
