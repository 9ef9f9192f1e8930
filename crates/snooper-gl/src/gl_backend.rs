//! Raw OpenGL backend, wrapping a context made current by the windowing layer.

use std::ffi::{c_void, CStr, CString};
use std::marker::PhantomData;
use std::sync::Once;

use gl::types::{GLchar, GLenum, GLint, GLuint};

use crate::GlContext;

pub(crate) static GL_INIT_ONCE: Once = Once::new();

/// [`GlContext`] over the global `gl` function pointers.
#[derive(Debug)]
pub struct RawGl {
    // Pins the backend to the thread that owns the current context.
    _not_send: PhantomData<*const ()>,
}

impl RawGl {
    /// Load GL function pointers through `gl_loader` and wrap the current
    /// context.
    ///
    /// Function pointers are loaded exactly once per process.
    ///
    /// # Safety
    ///
    /// A valid OpenGL context must be current on the calling thread, and every
    /// later use of the returned backend must happen on that thread while the
    /// context is still alive.
    pub unsafe fn load() -> Self {
        GL_INIT_ONCE.call_once(|| {
            gl_loader::init_gl();
            gl::load_with(|s| gl_loader::get_proc_address(s).cast());
        });

        Self {
            _not_send: PhantomData,
        }
    }

    /// Same as [`RawGl::load`], but resolves symbols with a loader supplied by
    /// the windowing layer (e.g. a surface's `get_proc_address`).
    ///
    /// # Safety
    ///
    /// Same contract as [`RawGl::load`].
    pub unsafe fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        GL_INIT_ONCE.call_once(|| gl::load_with(loader));

        Self {
            _not_send: PhantomData,
        }
    }
}

/// Read an info log of `len` bytes (including the terminating NUL) with the
/// given `glGet*InfoLog` call.
unsafe fn read_info_log(len: GLint, fill: impl FnOnce(GLint, *mut GLint, *mut GLchar)) -> String {
    if len <= 0 {
        return String::new();
    }

    let mut buf = vec![0u8; len as usize];
    let mut written: GLint = 0;
    fill(len, &mut written, buf.as_mut_ptr().cast());
    buf.truncate(written.clamp(0, len) as usize);
    while buf.last() == Some(&0) {
        buf.pop();
    }

    String::from_utf8_lossy(&buf).into_owned()
}

impl GlContext for RawGl {
    fn create_shader(&self, kind: GLenum) -> GLuint {
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len) }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut status = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        unsafe {
            let mut len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            read_info_log(len, |cap, written, buf| {
                gl::GetShaderInfoLog(shader, cap, written, buf)
            })
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut status = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        unsafe {
            let mut len = 0;
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            read_info_log(len, |cap, written, buf| {
                gl::GetProgramInfoLog(program, cap, written, buf)
            })
        }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        // A name with an interior NUL can't exist in GLSL.
        let Ok(name) = CString::new(name) else {
            return -1;
        };
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_1ui(&self, location: GLint, value: u32) {
        unsafe { gl::Uniform1ui(location, value) }
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn uniform_2f(&self, location: GLint, x: f32, y: f32) {
        unsafe { gl::Uniform2f(location, x, y) }
    }

    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32) {
        unsafe { gl::Uniform3f(location, x, y, z) }
    }

    fn uniform_4f(&self, location: GLint, x: f32, y: f32, z: f32, w: f32) {
        unsafe { gl::Uniform4f(location, x, y, z, w) }
    }

    fn uniform_matrix_4f(&self, location: GLint, transpose: bool, value: &[f32; 16]) {
        let transpose = if transpose { gl::TRUE } else { gl::FALSE };
        unsafe { gl::UniformMatrix4fv(location, 1, transpose, value.as_ptr()) }
    }

    fn get_integer(&self, pname: GLenum) -> GLint {
        let mut value = 0;
        unsafe { gl::GetIntegerv(pname, &mut value) };
        value
    }

    fn get_string(&self, name: GLenum) -> Option<String> {
        unsafe {
            let ptr = gl::GetString(name);
            if ptr.is_null() {
                return None;
            }
            Some(CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
        }
    }

    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }
}
