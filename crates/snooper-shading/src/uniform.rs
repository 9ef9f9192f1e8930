//! Uniform location lookup and typed uploads.

use std::collections::HashMap;

use gl::types::{GLint, GLuint};
use glam::{Mat4, Vec2, Vec3, Vec4};
use snooper_gl::GlContext;
use tracing::trace;

use crate::error::{Result, ShaderError};

/// Per-program map from uniform name to location.
///
/// Each name is queried from the context at most once; "not found" answers
/// are remembered too, so a bad name fails fast on every later call without
/// another round trip.
#[derive(Debug, Default)]
pub struct UniformCache {
    locations: HashMap<String, GLint>,
}

impl UniformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location of `name` in `program`.
    pub fn resolve(&mut self, gl: &dyn GlContext, program: GLuint, name: &str) -> Result<GLint> {
        let location = match self.locations.get(name) {
            Some(&location) => location,
            None => {
                let location = gl.uniform_location(program, name);
                trace!(program, name, location, "resolved uniform location");
                self.locations.insert(name.to_owned(), location);
                location
            }
        };

        if location < 0 {
            return Err(ShaderError::UnknownUniform {
                name: name.to_owned(),
            });
        }
        Ok(location)
    }

    /// Cached location of `name`, including `-1` for names known to be absent.
    pub fn get(&self, name: &str) -> Option<GLint> {
        self.locations.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// A value that can be uploaded to a uniform location of the bound program.
pub trait Uniform {
    fn upload(&self, gl: &dyn GlContext, location: GLint);
}

impl Uniform for i32 {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        gl.uniform_1i(location, *self);
    }
}

impl Uniform for u32 {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        gl.uniform_1ui(location, *self);
    }
}

/// Uploaded as an unsigned integer, `0` or `1`.
impl Uniform for bool {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        gl.uniform_1ui(location, u32::from(*self));
    }
}

impl Uniform for f32 {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        gl.uniform_1f(location, *self);
    }
}

impl Uniform for Vec2 {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        gl.uniform_2f(location, self.x, self.y);
    }
}

impl Uniform for Vec3 {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        gl.uniform_3f(location, self.x, self.y, self.z);
    }
}

impl Uniform for Vec4 {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        gl.uniform_4f(location, self.x, self.y, self.z, self.w);
    }
}

impl Uniform for Mat4 {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        gl.uniform_matrix_4f(location, false, &self.to_cols_array());
    }
}

impl<T: Uniform + ?Sized> Uniform for &T {
    fn upload(&self, gl: &dyn GlContext, location: GLint) {
        (**self).upload(gl, location);
    }
}
