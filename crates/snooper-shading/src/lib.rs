//! Shader programs for the Snooper 3D preview pane.
//!
//! A [`ShaderProgram`] is built from one or two logical names: the vertex
//! stage comes from `{name}.vert` and the fragment stage from
//! `{fragment or name}.frag`. Loading goes through these steps:
//!
//! - [`assets`] resolves the source text.
//! - [`patch`] applies the allow-listed compatibility edits: a single-UV
//!   fallback for `default.frag` when [`probe`] finds no multi-UV support,
//!   and the shared spline stage prepended to the mesh vertex shaders.
//! - [`compiler`] compiles each stage.
//! - [`linker`] links the pair and deletes the stage objects.
//!
//! After that the program is ready for `use_program` and uniform uploads,
//! whose locations are cached per program in a [`UniformCache`].
//!
//! Everything here runs on the render thread that owns the GL context.
//!
//! ```rust,ignore
//! let gl: Rc<dyn GlContext> = Rc::new(unsafe { snooper_gl::RawGl::load() });
//! let loader = ShaderLoader::from_env(gl);
//! let mut shaders = ShaderSet::load(&loader)?;
//!
//! let mesh = shaders.begin_pass(Pass::Mesh, &view, camera_pos, &projection)?;
//! mesh.set_uniform("uHasDiffuse", true)?;
//! ```

pub mod assets;
pub mod compiler;
pub mod config;
pub mod error;
pub mod linker;
pub mod patch;
pub mod probe;
pub mod program;
pub mod set;
pub mod stage;
pub mod uniform;

#[cfg(test)]
mod fake_gl;

pub use assets::{DirectoryAssets, EmbeddedAssets, MemoryAssets, ShaderAssets};
pub use config::{LogPolicy, PatchRules, ShaderOptions};
pub use error::ShaderError;
pub use program::{ShaderLoader, ShaderProgram};
pub use set::{Pass, ShaderSet};
pub use stage::StageKind;
pub use uniform::{Uniform, UniformCache};
