//! OpenGL plumbing for the Snooper preview pane.
//!
//! Everything above this crate talks to the graphics context through the
//! [`GlContext`] trait. [`RawGl`] implements it on top of the `gl` crate for
//! a context that the windowing layer has already made current; tests swap in
//! their own implementation.
//!
//! ### Warning
//!
//! OpenGL is not thread-safe across contexts. Every call must happen on the
//! thread that owns the current context, which is why [`RawGl`] is `!Send`.

use gl::types::{GLenum, GLint, GLuint};

mod gl_backend;
pub mod glsl;
pub mod logging;
pub mod validate_gl;

pub use gl_backend::RawGl;
pub use glsl::{ContextInfo, GlslVersion};

/// The subset of the OpenGL API used to build and drive shader programs.
///
/// Object names are the raw GL names (`0` is never a valid object). Uniform
/// locations follow GL conventions: `-1` means "not found".
pub trait GlContext {
    /// `glCreateShader`.
    fn create_shader(&self, kind: GLenum) -> GLuint;
    /// `glShaderSource` with a single string.
    fn shader_source(&self, shader: GLuint, source: &str);
    /// `glCompileShader`.
    fn compile_shader(&self, shader: GLuint);
    /// `GL_COMPILE_STATUS` as a bool.
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    /// `glGetShaderInfoLog`, empty when the backend reported nothing.
    fn shader_info_log(&self, shader: GLuint) -> String;
    /// `glDeleteShader`.
    fn delete_shader(&self, shader: GLuint);

    /// `glCreateProgram`.
    fn create_program(&self) -> GLuint;
    /// `glAttachShader`.
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    /// `glDetachShader`.
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    /// `glLinkProgram`.
    fn link_program(&self, program: GLuint);
    /// `GL_LINK_STATUS` as a bool.
    fn program_link_status(&self, program: GLuint) -> bool;
    /// `glGetProgramInfoLog`.
    fn program_info_log(&self, program: GLuint) -> String;
    /// `glDeleteProgram`.
    fn delete_program(&self, program: GLuint);
    /// `glUseProgram`. Pass `0` to unbind.
    fn use_program(&self, program: GLuint);

    /// `glGetUniformLocation`.
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
    fn uniform_1i(&self, location: GLint, value: i32);
    fn uniform_1ui(&self, location: GLint, value: u32);
    fn uniform_1f(&self, location: GLint, value: f32);
    fn uniform_2f(&self, location: GLint, x: f32, y: f32);
    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32);
    fn uniform_4f(&self, location: GLint, x: f32, y: f32, z: f32, w: f32);
    /// `glUniformMatrix4fv` for a single column-major matrix.
    fn uniform_matrix_4f(&self, location: GLint, transpose: bool, value: &[f32; 16]);

    /// `glGetIntegerv` for a single value.
    fn get_integer(&self, pname: GLenum) -> GLint;
    /// `glGetString`, `None` when the context returns a null pointer.
    fn get_string(&self, name: GLenum) -> Option<String>;
    /// `glGetError`.
    fn get_error(&self) -> GLenum;
}
