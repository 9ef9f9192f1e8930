//! Where shader source text comes from.
//!
//! Sources are addressed by file name (`default.vert`, `outline.frag`, ...).
//! The preview pane normally uses the copies compiled into the binary;
//! pointing `SNOOPER_SHADER_DIR` at a directory swaps in files read from disk
//! so shaders can be edited without a rebuild.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, ShaderError};

/// Environment variable naming a directory to load shader sources from.
pub const SHADER_DIR_ENV: &str = "SNOOPER_SHADER_DIR";

/// A store of shader sources keyed by file name. Content is immutable for the
/// lifetime of the store.
pub trait ShaderAssets {
    fn get(&self, key: &str) -> Result<Cow<'_, [u8]>>;
}

/// Resolve `key` to UTF-8 source text.
pub fn read_source(assets: &dyn ShaderAssets, key: &str) -> Result<String> {
    let bytes = assets.get(key)?;
    std::str::from_utf8(&bytes)
        .map(str::to_owned)
        .map_err(|source| ShaderError::SourceEncoding {
            key: key.to_owned(),
            source,
        })
}

/// Pick the asset store for this process: a [`DirectoryAssets`] when
/// [`SHADER_DIR_ENV`] is set, the compiled-in sources otherwise.
pub fn from_env() -> Box<dyn ShaderAssets> {
    match std::env::var_os(SHADER_DIR_ENV) {
        Some(dir) => {
            debug!(dir = ?dir, "loading shader sources from directory");
            Box::new(DirectoryAssets::new(dir))
        }
        None => Box::new(EmbeddedAssets),
    }
}

macro_rules! embedded_shader {
    ($file:literal) => {
        ($file, include_str!(concat!("../resources/", $file)))
    };
}

const EMBEDDED: &[(&str, &str)] = &[
    embedded_shader!("default.vert"),
    embedded_shader!("default.frag"),
    embedded_shader!("outline.vert"),
    embedded_shader!("outline.frag"),
    embedded_shader!("picking.vert"),
    embedded_shader!("picking.frag"),
    embedded_shader!("spline.vert"),
    embedded_shader!("grid.vert"),
    embedded_shader!("grid.frag"),
];

/// Shader sources compiled into the binary from `resources/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAssets;

impl EmbeddedAssets {
    /// Keys of every packaged source.
    pub fn keys() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(key, _)| *key)
    }
}

impl ShaderAssets for EmbeddedAssets {
    fn get(&self, key: &str) -> Result<Cow<'_, [u8]>> {
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, text)| Cow::Borrowed(text.as_bytes()))
            .ok_or_else(|| ShaderError::ResourceNotFound {
                key: key.to_owned(),
            })
    }
}

/// Shader sources read from a directory on every lookup.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ShaderAssets for DirectoryAssets {
    fn get(&self, key: &str) -> Result<Cow<'_, [u8]>> {
        match std::fs::read(self.root.join(key)) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ShaderError::ResourceNotFound {
                    key: key.to_owned(),
                })
            }
            Err(source) => Err(ShaderError::SourceIo {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

/// Shader sources held in memory, for tools and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    sources: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, source: impl Into<Vec<u8>>) {
        self.sources.insert(key.into(), source.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, source: impl Into<Vec<u8>>) -> Self {
        self.insert(key, source);
        self
    }
}

impl ShaderAssets for MemoryAssets {
    fn get(&self, key: &str) -> Result<Cow<'_, [u8]>> {
        self.sources
            .get(key)
            .map(|bytes| Cow::Borrowed(bytes.as_slice()))
            .ok_or_else(|| ShaderError::ResourceNotFound {
                key: key.to_owned(),
            })
    }
}
