/// The main error type for the retropunker crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error occurred while reading or decoding an image
    #[error("Image decode error: {0}")]
    ImageDecode(#[source] image::ImageError),

    /// Error occurred while writing or encoding an image
    #[error("Image encode error: {0}")]
    ImageEncode(#[source] image::ImageError),

    /// Error occurred during I/O operations (file read/write)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON
    #[error("Config syntax error: {0}")]
    Json(#[from] json::Error),

    /// Configuration is valid JSON but misses or mistypes a field
    #[error("Config error: {0}")]
    Config(String),

    /// A selector or numeric parameter is outside its declared range.
    ///
    /// Always raised before any raster mutation.
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: impl ToString) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

// Distinguish between decode and encode errors based on the error kind
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match &err {
            image::ImageError::Encoding(_) => Error::ImageEncode(err),
            _ => Error::ImageDecode(err),
        }
    }
}

// Convenience type alias for Results using Error
pub type Result<T = ()> = std::result::Result<T, Error>;
