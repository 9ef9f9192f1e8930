//! Hardware limits that decide source patching.

use gl::types::{GLenum, GLint};
use snooper_gl::{validate_gl, GlContext};
use tracing::{debug, warn};

/// `GL_MAX_TEXTURE_COORDS`. Compatibility-profile only, so the `gl` crate's
/// core bindings don't carry it.
pub const MAX_TEXTURE_COORDS: GLenum = 0x8871;

/// Queries the current context for the limits the patcher cares about.
pub struct CapabilityProbe<'a> {
    gl: &'a dyn GlContext,
}

impl<'a> CapabilityProbe<'a> {
    pub fn new(gl: &'a dyn GlContext) -> Self {
        Self { gl }
    }

    /// Maximum number of texture-coordinate sets.
    ///
    /// A core-profile context rejects the query with `GL_INVALID_ENUM` and
    /// the answer stays `0`.
    pub fn max_texture_coords(&self) -> GLint {
        self.query_integer(MAX_TEXTURE_COORDS).value.max(0)
    }

    /// `glGetIntegerv(pname)` with the errors it raised.
    ///
    /// Errors already pending when the query starts are logged and cleared
    /// first, so they are never charged to the query; errors the query raises
    /// are returned instead of left on the context.
    pub fn query_integer(&self, pname: GLenum) -> Probed {
        let stale = validate_gl::drain_errors(self.gl);
        if !stale.is_empty() {
            warn!(count = stale.len(), "GL errors were pending before the capability probe");
        }

        let value = self.gl.get_integer(pname);
        let raised = validate_gl::take_errors(self.gl);
        debug!(
            pname,
            value,
            raised = ?raised.iter().map(|&e| validate_gl::error_name(e)).collect::<Vec<_>>(),
            "probed GL integer"
        );
        Probed { value, raised }
    }
}

/// Result of [`CapabilityProbe::query_integer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probed {
    pub value: GLint,
    pub raised: Vec<GLenum>,
}
