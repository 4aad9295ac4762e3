//! Language detection from lexical signatures
//!
//! The [`SignatureCatalog`] holds one ordered list of regex signatures per
//! language plus a fixed precedence order. The [`Detector`] marks every
//! language with at least one matching signature as a candidate and picks the
//! first candidate in precedence order.
//!
//! ```
//! use polyrun::language::{Detector, LanguageTag};
//!
//! let detector = Detector::default();
//! let result = detector.detect("print(\"hi\")").unwrap();
//! assert_eq!(result.language, LanguageTag::Python);
//! ```

mod catalog;
mod detector;
mod tag;

pub use catalog::{CatalogError, LanguageSignatures, Signature, SignatureCatalog};
pub use detector::{DetectionError, DetectionResult, Detector};
pub use tag::LanguageTag;
