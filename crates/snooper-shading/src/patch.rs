//! Allow-listed text patches applied to sources before compilation.
//!
//! These are literal string operations, not a preprocessor.

use crate::config::PatchRules;

const VERSION_PRAGMA: &str = "#version";

/// Replace the multi-UV macro with its single-UV fallback.
pub fn downgrade_uv_count(source: &str, rules: &PatchRules) -> String {
    source.replace(&rules.uv_macro, &rules.uv_macro_fallback)
}

/// Prepend the spline stage to `stage`.
///
/// `stage`'s own `#version` line is blanked (not removed, so compiler line
/// numbers in the body stay meaningful); the spline source supplies the
/// pragma for the composed text.
pub fn compose_spline(spline: &str, stage: &str) -> String {
    let mut composed = String::with_capacity(spline.len() + stage.len() + 1);
    composed.push_str(spline);
    if !spline.ends_with('\n') {
        composed.push('\n');
    }

    for line in stage.lines() {
        if !line.trim_start().starts_with(VERSION_PRAGMA) {
            composed.push_str(line);
        }
        composed.push('\n');
    }

    composed
}
