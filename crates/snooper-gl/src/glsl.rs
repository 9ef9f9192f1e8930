//! GLSL version detection utilities.

use std::fmt;

use crate::GlContext;

/// A GLSL language version as reported by `GL_SHADING_LANGUAGE_VERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GlslVersion {
    pub major: u32,
    /// Two-digit minor version, so `4.6` and `4.60` both read as `60`.
    pub minor: u32,
    pub es: bool,
}

impl GlslVersion {
    /// The version the packaged shader sources are written against
    /// (`#version 460 core`).
    pub const CORE_460: GlslVersion = GlslVersion {
        major: 4,
        minor: 60,
        es: false,
    };

    /// Parse a `GL_SHADING_LANGUAGE_VERSION` string such as `"4.60 NVIDIA"`
    /// or `"OpenGL ES GLSL ES 3.20"`.
    pub fn parse(text: &str) -> Option<Self> {
        let es = text.contains(" ES");
        let token = text
            .split_whitespace()
            .find(|t| t.starts_with(|c: char| c.is_ascii_digit()) && t.contains('.'))?;

        let (major, minor) = token.split_once('.')?;
        let minor: String = minor.chars().take_while(char::is_ascii_digit).collect();
        let major = major.parse().ok()?;
        let minor = match minor.len() {
            0 => 0,
            1 => minor.parse::<u32>().ok()? * 10,
            _ => minor[..2].parse().ok()?,
        };

        Some(Self { major, minor, es })
    }

    /// The number used in a `#version` pragma, e.g. `460`.
    pub fn pragma_number(&self) -> u32 {
        self.major * 100 + self.minor
    }

    /// Whether a desktop context of this version can compile sources written
    /// for `required`.
    pub fn satisfies(&self, required: GlslVersion) -> bool {
        self.es == required.es && self.pragma_number() >= required.pragma_number()
    }
}

impl fmt::Display for GlslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pragma_number())?;
        if self.es {
            f.write_str(" es")?;
        }
        Ok(())
    }
}

/// Identification strings of the current context.
#[derive(Debug, Clone, Default)]
pub struct ContextInfo {
    pub vendor: Option<String>,
    pub renderer: Option<String>,
    pub version: Option<String>,
    pub glsl: Option<GlslVersion>,
}

impl ContextInfo {
    pub fn query(gl: &dyn GlContext) -> Self {
        Self {
            vendor: gl.get_string(gl::VENDOR),
            renderer: gl.get_string(gl::RENDERER),
            version: gl.get_string(gl::VERSION),
            glsl: gl
                .get_string(gl::SHADING_LANGUAGE_VERSION)
                .as_deref()
                .and_then(GlslVersion::parse),
        }
    }
}
