//! Programmable pipeline stages.

use std::fmt;

use gl::types::GLenum;

/// One of the two stages a [`ShaderProgram`](crate::ShaderProgram) is linked
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub fn gl_enum(self) -> GLenum {
        match self {
            StageKind::Vertex => gl::VERTEX_SHADER,
            StageKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    /// File extension used by the packaged sources.
    pub fn extension(self) -> &'static str {
        match self {
            StageKind::Vertex => "vert",
            StageKind::Fragment => "frag",
        }
    }

    /// Source key for the logical shader `name`, e.g. `outline.vert`.
    pub fn source_key(self, name: &str) -> String {
        format!("{name}.{}", self.extension())
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        })
    }
}
