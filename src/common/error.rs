use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CodecError {
    // Configuration
    #[error("Invalid base {0}, expected a value between 2 and 16")]
    InvalidBase(u32),
    #[error("Invalid block geometry {width}x{height}, both sides must be positive")]
    InvalidGeometry { width: u32, height: u32 },
    #[error("Invalid max width, must be positive")]
    InvalidMaxWidth,

    // Builder
    #[error("Empty data")]
    EmptyData,
    #[error(
        "Image of {width}x{height} = {pixels} pixels exceeds the limit of {limit} pixels; \
         shorten the payload or enlarge the blocks"
    )]
    PixelLimitExceeded { width: u32, height: u32, pixels: u64, limit: u64 },

    // File record
    #[error("File of {size} bytes exceeds the limit of {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("Invalid file record: {0}")]
    InvalidFormat(&'static str),
    #[error("Base64 decoding failed: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    // Storage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type CodecResult<T> = Result<T, CodecError>;
