//! Inspect and clear the error state of the OpenGL context.

use gl::types::GLenum;
use tracing::warn;

use crate::GlContext;

/// Upper bound on errors popped in one drain. A lost context can keep
/// reporting `GL_CONTEXT_LOST` forever.
const MAX_DRAINED_ERRORS: usize = 32;

/// Symbolic name for a `glGetError` code.
pub fn error_name(code: GLenum) -> &'static str {
    match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        gl::CONTEXT_LOST => "GL_CONTEXT_LOST",
        _ => "GL_UNKNOWN_ERROR",
    }
}

/// Pop every pending error off the context, logging each one.
///
/// Returns the drained codes in the order the context reported them.
pub fn drain_errors(gl: &dyn GlContext) -> Vec<GLenum> {
    let errors = take_errors(gl);
    for &code in &errors {
        warn!(code, name = error_name(code), "drained pending GL error");
    }
    errors
}

/// [`drain_errors`] without logging, for callers that expect the errors.
pub fn take_errors(gl: &dyn GlContext) -> Vec<GLenum> {
    take_with(|| gl.get_error())
}

fn take_with(mut next: impl FnMut() -> GLenum) -> Vec<GLenum> {
    let mut errors = Vec::new();
    while errors.len() < MAX_DRAINED_ERRORS {
        let code = next();
        if code == gl::NO_ERROR {
            break;
        }
        errors.push(code);
    }
    errors
}
