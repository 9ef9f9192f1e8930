//! The program facade the renderer holds on to.

use std::fmt;
use std::rc::Rc;

use gl::types::GLuint;
use glam::{Mat4, Vec3};
use snooper_gl::{ContextInfo, GlContext, GlslVersion};
use tracing::{debug, warn};

use crate::assets::{self, ShaderAssets};
use crate::compiler::ShaderCompiler;
use crate::config::ShaderOptions;
use crate::error::{Result, ShaderError};
use crate::linker;
use crate::stage::StageKind;
use crate::uniform::{Uniform, UniformCache};

/// Builds [`ShaderProgram`]s from named sources against one context.
pub struct ShaderLoader {
    gl: Rc<dyn GlContext>,
    assets: Box<dyn ShaderAssets>,
    options: ShaderOptions,
}

impl ShaderLoader {
    pub fn new(gl: Rc<dyn GlContext>, assets: Box<dyn ShaderAssets>, options: ShaderOptions) -> Self {
        let info = ContextInfo::query(gl.as_ref());
        debug!(
            vendor = info.vendor.as_deref().unwrap_or("?"),
            renderer = info.renderer.as_deref().unwrap_or("?"),
            version = info.version.as_deref().unwrap_or("?"),
            "shader loader attached to context"
        );
        match info.glsl {
            Some(glsl) if !glsl.satisfies(GlslVersion::CORE_460) => warn!(
                %glsl,
                required = %GlslVersion::CORE_460,
                "context GLSL version is older than the packaged shaders"
            ),
            None => warn!("context did not report a GLSL version"),
            Some(_) => {}
        }

        Self {
            gl,
            assets,
            options,
        }
    }

    /// Loader using [`assets::from_env`] and default options.
    pub fn from_env(gl: Rc<dyn GlContext>) -> Self {
        Self::new(gl, assets::from_env(), ShaderOptions::default())
    }

    pub fn gl(&self) -> &Rc<dyn GlContext> {
        &self.gl
    }

    pub fn options(&self) -> &ShaderOptions {
        &self.options
    }

    pub fn compiler(&self) -> ShaderCompiler<'_> {
        ShaderCompiler::new(&self.gl, self.assets.as_ref(), &self.options)
    }

    /// Compile and link `{vertex}.vert` with `{fragment}.frag`, where
    /// `fragment` defaults to `vertex`.
    pub fn load(&self, vertex: &str, fragment: Option<&str>) -> Result<ShaderProgram> {
        let fragment = fragment.unwrap_or(vertex);
        let compiler = self.compiler();

        let vertex_stage = compiler.compile(StageKind::Vertex, &StageKind::Vertex.source_key(vertex))?;
        let fragment_stage =
            compiler.compile(StageKind::Fragment, &StageKind::Fragment.source_key(fragment))?;
        let handle = linker::link(self.gl.as_ref(), vertex_stage, fragment_stage)?;

        let name = if fragment == vertex {
            vertex.to_owned()
        } else {
            format!("{vertex}/{fragment}")
        };

        Ok(ShaderProgram {
            gl: Rc::clone(&self.gl),
            handle,
            name,
            uniforms: UniformCache::new(),
        })
    }

    /// The mesh program, `default.vert` + `default.frag`.
    pub fn load_default(&self) -> Result<ShaderProgram> {
        self.load(ShaderProgram::DEFAULT_NAME, None)
    }
}

impl fmt::Debug for ShaderLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderLoader")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A linked GPU program, exclusively owned by the renderer that loaded it.
///
/// Uniform setters assume [`use_program`](Self::use_program) (or one of the
/// `render*` helpers) was called first in the current draw; render loops
/// write many uniforms per bind.
pub struct ShaderProgram {
    gl: Rc<dyn GlContext>,
    /// `0` once released.
    handle: GLuint,
    name: String,
    uniforms: UniformCache,
}

impl ShaderProgram {
    pub const DEFAULT_NAME: &'static str = "default";

    pub fn handle(&self) -> GLuint {
        self.handle
    }

    /// `vertex` or `vertex/fragment` as passed to [`ShaderLoader::load`].
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_released(&self) -> bool {
        self.handle == 0
    }

    pub fn uniform_cache(&self) -> &UniformCache {
        &self.uniforms
    }

    fn live_handle(&self) -> Result<GLuint> {
        if self.is_released() {
            return Err(ShaderError::Released {
                name: self.name.clone(),
            });
        }
        Ok(self.handle)
    }

    /// Bind this program.
    pub fn use_program(&self) -> Result<()> {
        self.gl.use_program(self.live_handle()?);
        Ok(())
    }

    pub fn set_uniform(&mut self, name: &str, value: impl Uniform) -> Result<()> {
        self.live_handle()?;
        let location = self.uniforms.resolve(self.gl.as_ref(), self.handle, name)?;
        value.upload(self.gl.as_ref(), location);
        Ok(())
    }

    /// Bind and upload `uView` and `uProjection`.
    pub fn render(&mut self, view: &Mat4, projection: &Mat4) -> Result<()> {
        self.use_program()?;
        self.set_uniform("uView", view)?;
        self.set_uniform("uProjection", projection)
    }

    /// [`render`](Self::render) plus the camera position as `uViewPos`.
    pub fn render_with_view_pos(&mut self, view: &Mat4, view_pos: Vec3, projection: &Mat4) -> Result<()> {
        self.render(view, projection)?;
        self.set_uniform("uViewPos", view_pos)
    }

    /// Delete the GL program. Calling this again is a no-op.
    pub fn release(&mut self) {
        if self.handle == 0 {
            return;
        }
        self.gl.delete_program(self.handle);
        debug!(program = self.handle, name = %self.name, "released shader program");
        self.handle = 0;
        self.uniforms = UniformCache::new();
    }

    /// Release and consume.
    pub fn dispose(mut self) {
        self.release();
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("handle", &self.handle)
            .field("name", &self.name)
            .field("uniforms", &self.uniforms)
            .finish_non_exhaustive()
    }
}
