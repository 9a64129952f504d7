/*!
 * WordprocessingML (`.docx`) document model.
 *
 * - `package`: opening, walking and saving a `.docx` package
 * - `paragraph`: paragraph text and run manipulation
 * - `style`: run style capture and re-application
 * - `xml`: owned XML tree used for the main document part
 */

pub use self::package::DocxPackage;
pub use self::style::{RgbColor, RunStyle};
pub use self::xml::{XmlElement, XmlNode, XmlTree};

pub mod package;
pub mod paragraph;
pub mod style;
pub mod xml;
