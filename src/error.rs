use std::path::{Path, PathBuf};

pub type Result<T, E = AssetError> = std::result::Result<T, E>;

/// Every way a generation run, or a single variant inside it, can fail.
///
/// `InvalidRequest` and `InvalidSourceImage` reject a whole run before any
/// file is touched. The remaining kinds are recorded per variant (or per
/// platform folder) and never abort sibling work. `Serialization` only comes
/// from writing a run report.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid source image: {0}")]
    InvalidSourceImage(String),

    #[error("unsupported source format: {0}")]
    UnsupportedSourceFormat(String),

    #[error("encode failure: {0}")]
    EncodeFailure(String),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssetError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSourceImage(msg.into())
    }

    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedSourceFormat(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeFailure(msg.into())
    }

    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
