//! The programs the preview pane draws with.

use anyhow::Context;
use glam::{Mat4, Vec3};
use tracing::debug;

use crate::program::{ShaderLoader, ShaderProgram};

/// Which program a draw pass binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Lit, textured meshes.
    Mesh,
    /// Selection outline drawn behind the selected mesh.
    Outline,
    /// Object/section ids into the picking framebuffer.
    Picking,
    /// Ground grid.
    Grid,
}

impl Pass {
    pub const ALL: [Pass; 4] = [Pass::Mesh, Pass::Outline, Pass::Picking, Pass::Grid];

    /// Logical shader name loaded for this pass.
    pub fn shader_name(self) -> &'static str {
        match self {
            Pass::Mesh => ShaderProgram::DEFAULT_NAME,
            Pass::Outline => "outline",
            Pass::Picking => "picking",
            Pass::Grid => "grid",
        }
    }

    fn wants_view_pos(self) -> bool {
        !matches!(self, Pass::Picking)
    }
}

/// One program per [`Pass`], owned by the renderer for the lifetime of its
/// context.
#[derive(Debug)]
pub struct ShaderSet {
    mesh: ShaderProgram,
    outline: ShaderProgram,
    picking: ShaderProgram,
    grid: ShaderProgram,
}

impl ShaderSet {
    pub fn load(loader: &ShaderLoader) -> anyhow::Result<Self> {
        let load = |pass: Pass| {
            loader
                .load(pass.shader_name(), None)
                .with_context(|| format!("Failed to load {pass:?} shader program"))
        };

        let set = Self {
            mesh: load(Pass::Mesh)?,
            outline: load(Pass::Outline)?,
            picking: load(Pass::Picking)?,
            grid: load(Pass::Grid)?,
        };
        debug!("shader set loaded");
        Ok(set)
    }

    pub fn program(&self, pass: Pass) -> &ShaderProgram {
        match pass {
            Pass::Mesh => &self.mesh,
            Pass::Outline => &self.outline,
            Pass::Picking => &self.picking,
            Pass::Grid => &self.grid,
        }
    }

    pub fn program_mut(&mut self, pass: Pass) -> &mut ShaderProgram {
        match pass {
            Pass::Mesh => &mut self.mesh,
            Pass::Outline => &mut self.outline,
            Pass::Picking => &mut self.picking,
            Pass::Grid => &mut self.grid,
        }
    }

    /// Bind the pass's program with this frame's camera and hand it back for
    /// per-draw uniforms.
    pub fn begin_pass(
        &mut self,
        pass: Pass,
        view: &Mat4,
        view_pos: Vec3,
        projection: &Mat4,
    ) -> anyhow::Result<&mut ShaderProgram> {
        let program = self.program_mut(pass);
        let bound = if pass.wants_view_pos() {
            program.render_with_view_pos(view, view_pos, projection)
        } else {
            program.render(view, projection)
        };
        bound.with_context(|| format!("Failed to bind {pass:?} pass"))?;
        Ok(program)
    }

    /// Release every program.
    pub fn release(self) {
        let Self {
            mesh,
            outline,
            picking,
            grid,
        } = self;
        for program in [mesh, outline, picking, grid] {
            program.dispose();
        }
    }
}
