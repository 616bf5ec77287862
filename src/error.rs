//! Error types for the geomask crate.

/// Errors that can occur during region detection, compositing and file processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An image with a zero dimension reached a component.
    #[error("invalid image ({width}x{height}): both dimensions must be non-zero")]
    InvalidImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The background image does not match the original's dimensions.
    #[error(
        "background is {}x{} but original is {}x{}",
        actual.0, actual.1, expected.0, expected.1
    )]
    DimensionMismatch {
        /// Dimensions of the original image `(width, height)`.
        expected: (u32, u32),
        /// Dimensions of the supplied background `(width, height)`.
        actual: (u32, u32),
    },

    /// The blur kernel size is even or zero.
    #[error("blur kernel size must be odd and at least 1, got {0}")]
    InvalidKernelSize(u32),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Reject images with a zero dimension.
pub(crate) fn ensure_non_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidImage { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tga".to_string());
        assert!(unsupported.to_string().contains("tga"));

        let invalid = Error::InvalidImage {
            width: 0,
            height: 20,
        };
        assert!(invalid.to_string().contains("0x20"));

        let mismatch = Error::DimensionMismatch {
            expected: (100, 80),
            actual: (64, 64),
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("64x64"));
        assert!(msg.contains("100x80"));

        assert!(Error::InvalidKernelSize(4).to_string().contains('4'));
    }

    #[test]
    fn ensure_non_empty_rejects_zero_dimensions() {
        assert!(ensure_non_empty(1, 1).is_ok());
        assert!(matches!(
            ensure_non_empty(0, 5),
            Err(Error::InvalidImage { width: 0, height: 5 })
        ));
        assert!(ensure_non_empty(5, 0).is_err());
    }
}
