/*!
 * Error types for the docxlate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised while reading or writing a `.docx` package
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The bytes are not a readable ZIP package
    #[error("Invalid document package: {0}")]
    Archive(String),

    /// A required package part is absent
    #[error("Document part not found: {0}")]
    MissingPart(String),

    /// The main document part is not well-formed XML
    #[error("Invalid document XML: {0}")]
    Xml(String),

    /// The main document part has no `w:body`
    #[error("Document has no body")]
    MissingBody,

    /// I/O failure while reading or writing the package
    #[error("Document I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking task handling the document did not finish
    #[error("Document worker failed: {0}")]
    Worker(String),
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::Archive(error.to_string())
    }
}

impl From<quick_xml::Error> for DocumentError {
    fn from(error: quick_xml::Error) -> Self {
        Self::Xml(error.to_string())
    }
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered without any usable text
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// The translation capability cannot be invoked at all
    #[error("Translation service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Fatal errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The upload is not a valid document
    #[error("Malformed input document: {0}")]
    MalformedInput(#[source] DocumentError),

    /// The translation capability cannot be invoked
    #[error("Translation service unavailable: {0}")]
    TranslationServiceUnavailable(String),

    /// The stored template could not be reopened
    #[error("Template not found: {reference}")]
    TemplateNotFound {
        /// Template reference that failed to load
        reference: String,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Writing an artifact failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The template reopened but the final document could not be produced
    #[error("Failed to produce output document: {0}")]
    Output(#[source] DocumentError),
}

impl PipelineError {
    /// HTTP-style status code for the upload boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedInput(_) => 400,
            Self::TranslationServiceUnavailable(_) => 503,
            Self::TemplateNotFound { .. } => 404,
            Self::Storage(_) | Self::Output(_) => 500,
        }
    }
}

impl From<TranslationError> for PipelineError {
    fn from(error: TranslationError) -> Self {
        match error {
            TranslationError::ServiceUnavailable(reason) => Self::TranslationServiceUnavailable(reason),
            other => Self::TranslationServiceUnavailable(other.to_string()),
        }
    }
}
