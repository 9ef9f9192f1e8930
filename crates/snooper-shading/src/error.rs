//! Failures of the shader pipeline.

use crate::stage::StageKind;

/// Every way loading or driving a [`ShaderProgram`](crate::ShaderProgram) can
/// fail. None of these are retried; the owning renderer decides what the user
/// sees.
#[derive(thiserror::Error, Debug)]
pub enum ShaderError {
    #[error("shader source `{key}` not found")]
    ResourceNotFound { key: String },

    #[error("shader source `{key}` is not valid UTF-8")]
    SourceEncoding {
        key: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("failed to read shader source `{key}`")]
    SourceIo {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error compiling {stage} shader `{key}`: {log}")]
    ShaderCompile {
        stage: StageKind,
        key: String,
        log: String,
    },

    #[error("program failed to link: {log}")]
    ProgramLink { log: String },

    #[error("uniform `{name}` not found on shader")]
    UnknownUniform { name: String },

    #[error("shader program `{name}` was already released")]
    Released { name: String },
}

pub type Result<T, E = ShaderError> = std::result::Result<T, E>;
