use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Most of these only surface from the binary decoders (debug symbol blobs, CIL method bodies)
/// and from the batch layer around them (configuration, rule sets, report output). Resolving a
/// diagnostic back to its original source location never fails with an error: a location that
/// cannot be mapped simply resolves to `None`.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::Malformed`] - Corrupted or invalid binary structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of the input
/// - [`Error::NotSupported`] - Input is not a .NET assembly, or uses an unsupported feature
/// - [`Error::Empty`] - Empty input provided
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Json`] - Report serialization errors
/// - [`Error::Xml`] - Rule set parsing errors
///
/// ## Batch Errors
/// - [`Error::Config`] - Invalid or incomplete analyzer configuration
///
/// # Examples
///
/// ```rust
/// use peeker::{Error, metadata::sequencepoints::parse_sequence_points};
///
/// match parse_sequence_points(&[0x00, 0x80], 0, 8, &[]) {
///     Ok(points) => println!("{} points", points.len()),
///     Err(Error::OutOfBounds) => eprintln!("blob is truncated"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed blob: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Frontends return this for inputs that are not .NET assemblies; the batch
    /// controller reports such inputs without counting them as failures.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// A rule set file could not be parsed.
    #[error("Invalid rule set - {0}")]
    Xml(String),

    /// The analyzer configuration is invalid or incomplete.
    #[error("Invalid configuration - {0}")]
    Config(String),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories, typically reported
    /// by external collaborators (decompiler frontends, analysis engines).
    #[error("{0}")]
    Error(String),
}

impl From<quick_xml::Error> for Error {
    fn from(error: quick_xml::Error) -> Self {
        Error::Xml(error.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(error.to_string())
    }
}
