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

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Metadata Errors
/// - [`Error::Malformed`] - The metadata tree (or a persisted image) does not have the expected shape
///
/// ## Image Errors
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of a persisted image
/// - [`Error::Empty`] - Empty input provided
///
/// # Examples
///
/// ```rust
/// use dxilmd::{Container, Error};
///
/// match Container::from_bytes(&[]) {
///     Ok(_) => println!("Loaded container"),
///     Err(Error::Empty) => println!("Nothing to load"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed image: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The container metadata is malformed and could not be loaded or emitted.
    ///
    /// Raised for every shape problem: a missing or duplicated named entry, an operand count that
    /// does not match the record's fixed arity, a node of the wrong kind or scalar width, an odd
    /// tag-value list, an unknown tag, or a symbol reference that resolves to the wrong kind of
    /// symbol. The error includes the source location where the problem was detected.
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

    /// An out of bound access was attempted while reading a persisted image.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,
}
