//! Linking a vertex/fragment pair into a program object.

use gl::types::GLuint;
use snooper_gl::GlContext;
use tracing::debug;

use crate::compiler::CompiledStage;
use crate::error::{Result, ShaderError};

/// Attach both stages to a new program and link it.
///
/// The stages are consumed: once linked the program holds the compiled code,
/// so they are detached and their objects deleted before this returns. On
/// failure the half-built program is deleted as well.
pub fn link(gl: &dyn GlContext, vertex: CompiledStage, fragment: CompiledStage) -> Result<GLuint> {
    let program = gl.create_program();
    gl.attach_shader(program, vertex.id());
    gl.attach_shader(program, fragment.id());
    gl.link_program(program);

    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program);
        gl.delete_program(program);
        return Err(ShaderError::ProgramLink { log });
    }

    gl.detach_shader(program, vertex.id());
    gl.detach_shader(program, fragment.id());
    debug!(
        program,
        vertex = vertex.key(),
        fragment = fragment.key(),
        "linked shader program"
    );

    Ok(program)
}
