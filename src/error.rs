use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Compile,
    Link,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Compile => f.write_str("compile"),
            ShaderStage::Link => f.write_str("link"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("GPU rendering is not supported on this system: {0}")]
    Initialization(String),

    #[error("shader {stage} error: {log}")]
    ShaderBuild { stage: ShaderStage, log: String },

    #[error("vertex data length {len} is not a whole number of xyz triples")]
    InvalidMeshData { len: usize },

    #[error("{vertices} vertices exceed the {} a single draw can address", u32::MAX)]
    MeshTooLarge { vertices: usize },

    #[error("out of GPU memory while acquiring the next frame")]
    SurfaceOutOfMemory,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
