/*!
 * Document model for a single translation run.
 */

pub mod model;

pub use model::{DocumentEntity, DocumentItem, TranslationOutcome};
