//! Single-stage compilation, including the source patches.

use std::rc::Rc;

use gl::types::GLuint;
use snooper_gl::GlContext;
use tracing::{debug, warn};

use crate::assets::{read_source, ShaderAssets};
use crate::config::{LogPolicy, ShaderOptions};
use crate::error::{Result, ShaderError};
use crate::patch;
use crate::probe::CapabilityProbe;
use crate::stage::StageKind;

/// A compiled shader object. The GL object is deleted on drop, so a stage
/// that never makes it into a linked program can't leak.
pub struct CompiledStage {
    gl: Rc<dyn GlContext>,
    id: GLuint,
    kind: StageKind,
    key: String,
}

impl CompiledStage {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for CompiledStage {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

impl std::fmt::Debug for CompiledStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledStage")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("key", &self.key)
            .finish()
    }
}

/// Turns source keys into [`CompiledStage`]s.
pub struct ShaderCompiler<'a> {
    gl: &'a Rc<dyn GlContext>,
    assets: &'a dyn ShaderAssets,
    options: &'a ShaderOptions,
}

impl<'a> ShaderCompiler<'a> {
    pub fn new(
        gl: &'a Rc<dyn GlContext>,
        assets: &'a dyn ShaderAssets,
        options: &'a ShaderOptions,
    ) -> Self {
        Self {
            gl,
            assets,
            options,
        }
    }

    /// Resolve `key` and apply whichever allow-listed patches apply to it.
    pub fn prepare_source(&self, kind: StageKind, key: &str) -> Result<String> {
        let rules = &self.options.rules;
        let mut source = read_source(self.assets, key)?;

        if kind == StageKind::Fragment && rules.wants_uv_fallback(key) {
            let coords = CapabilityProbe::new(self.gl.as_ref()).max_texture_coords();
            if coords == 0 {
                debug!(key, "no multi-UV support, downgrading UV count");
                source = patch::downgrade_uv_count(&source, rules);
            }
        }

        if kind == StageKind::Vertex && rules.wants_spline(key) {
            let spline = read_source(self.assets, &rules.spline_key)?;
            source = patch::compose_spline(&spline, &source);
        }

        Ok(source)
    }

    pub fn compile(&self, kind: StageKind, key: &str) -> Result<CompiledStage> {
        let source = self.prepare_source(kind, key)?;

        let stage = CompiledStage {
            gl: Rc::clone(self.gl),
            id: self.gl.create_shader(kind.gl_enum()),
            kind,
            key: key.to_owned(),
        };
        self.gl.shader_source(stage.id, &source);
        self.gl.compile_shader(stage.id);

        let compiled = self.gl.shader_compile_status(stage.id);
        let log = self.gl.shader_info_log(stage.id);
        let has_log = !log.trim().is_empty();

        let failed = match self.options.log_policy {
            LogPolicy::Strict => !compiled || has_log,
            LogPolicy::StatusOnly => !compiled,
        };
        if failed {
            let log = if has_log {
                log
            } else {
                "compile status reported failure without a diagnostic".to_owned()
            };
            return Err(ShaderError::ShaderCompile {
                stage: kind,
                key: key.to_owned(),
                log,
            });
        }
        if has_log {
            warn!(key, stage = %kind, log = log.trim(), "shader compiled with diagnostics");
        }

        debug!(key, stage = %kind, id = stage.id, "compiled shader stage");
        Ok(stage)
    }
}
