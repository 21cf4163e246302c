use std::io;

#[derive(thiserror::Error, Debug)]
pub enum PageFileError {
    #[error("Failed to allocate page buffers")]
    AllocationFailure,

    #[error("Page file could not be opened: {0}")]
    ResourceUnavailable(io::Error),

    #[error("Wrong file format: magic {found:#010x}")]
    WrongFormat { found: u32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("No page is resident")]
    InvalidState,

    #[error("Metadata access out of range: offset {offset}, width {width}")]
    OutOfRange { offset: usize, width: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PageFileError>;
