/// Error taxonomy for parsing and auditing
///
/// Soft fetch failures never show up here: the fetch layer logs them and
/// hands back `None`. Everything in this enum terminates the current mode.

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
    /// An expected element is missing from the page
    #[error("Tag not found: {criteria}")]
    TagNotFound { criteria: String },

    /// An element lacks an attribute the extraction relies on
    #[error("<{tag}> has no {attribute} attribute")]
    MissingAttribute { tag: String, attribute: String },

    /// A link target cannot be resolved against the page URL
    #[error("Invalid link {href:?}: {reason}")]
    InvalidLink { href: String, reason: String },

    /// A status code from the index has no entry in the expected status table
    #[error("Unknown PEP status code: {code:?}")]
    UnknownStatusCode { code: String },

    /// The docs sidebar no longer carries the "All versions" list
    #[error("Text {text:?} does not contain `All versions`")]
    AllVersionsNotFound { text: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ParserError {
    /// True for errors that mean the site markup or the status table drifted
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ParserError::TagNotFound { .. }
                | ParserError::MissingAttribute { .. }
                | ParserError::InvalidLink { .. }
                | ParserError::UnknownStatusCode { .. }
                | ParserError::AllVersionsNotFound { .. }
        )
    }
}

pub type ParserResult<T> = Result<T, ParserError>;
