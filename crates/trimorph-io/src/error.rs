/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open, create or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] trimorph_image::ImageError),

    /// Error from the image codecs.
    #[error("Failed to encode or decode the image. {0}")]
    ImageCodecError(#[from] image::ImageError),

    /// The image dimensions do not fit the encoder.
    #[error("Image of size {0} is too large to encode")]
    ImageTooLarge(trimorph_image::ImageSize),

    /// An animation needs at least one frame.
    #[error("Cannot encode an animation without frames")]
    EmptySequence,
}
