//! Knobs for how sources are patched and how compile logs are judged.

/// Which sources get which compatibility patch.
///
/// Both patches are plain text operations on exact literals. A source that
/// is not listed is compiled as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRules {
    /// Fragment sources whose UV-count macro is downgraded when the context
    /// reports no multi-texture-coordinate support.
    pub uv_fallback: Vec<String>,
    /// Line replaced on downgrade.
    pub uv_macro: String,
    /// Replacement for [`uv_macro`](Self::uv_macro).
    pub uv_macro_fallback: String,
    /// Vertex sources that get the spline stage prepended.
    pub spline_targets: Vec<String>,
    /// Source key of the spline stage.
    pub spline_key: String,
}

impl Default for PatchRules {
    fn default() -> Self {
        Self {
            uv_fallback: vec!["default.frag".to_owned()],
            uv_macro: "#define MAX_UV_COUNT 8".to_owned(),
            uv_macro_fallback: "#define MAX_UV_COUNT 1".to_owned(),
            spline_targets: ["default.vert", "outline.vert", "picking.vert"]
                .map(str::to_owned)
                .to_vec(),
            spline_key: "spline.vert".to_owned(),
        }
    }
}

impl PatchRules {
    pub fn wants_uv_fallback(&self, key: &str) -> bool {
        self.uv_fallback.iter().any(|k| k == key)
    }

    pub fn wants_spline(&self, key: &str) -> bool {
        self.spline_targets.iter().any(|k| k == key)
    }
}

/// How a non-empty compiler info log is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogPolicy {
    /// Any info log with non-whitespace content fails the compile, even when
    /// the backend reports success.
    #[default]
    Strict,
    /// Only a failed compile status fails; other logs are reported as
    /// warnings.
    StatusOnly,
}

#[derive(Debug, Clone, Default)]
pub struct ShaderOptions {
    pub rules: PatchRules,
    pub log_policy: LogPolicy,
}
