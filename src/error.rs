use std::path::PathBuf;


/// Everything that can go wrong while turning a mask into a distance field.
#[derive(Debug, thiserror::Error)]
pub enum SdfError {

    /// A parameter was outside of its accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("i/o failure at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source] source: std::io::Error,
    },

    /// The input could not be decoded or the output could not be encoded.
    #[error("image failure at {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source] source: image::ImageError,
    },

    #[error("invalid options file: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SdfError>;

impl SdfError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SdfError::InvalidArgument(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SdfError::Io { path: path.into(), source }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        // decoders report missing files as image errors, keep those in the i/o category
        match source {
            image::ImageError::IoError(source) => SdfError::Io { path: path.into(), source },
            source => SdfError::Image { path: path.into(), source },
        }
    }
}
