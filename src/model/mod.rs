//! The canonical interaction model, native artifacts, and locale
//! resolution.

pub mod artifact;
pub mod canonical;
pub mod locale;

pub use artifact::NativeArtifact;
pub use canonical::CanonicalModel;
pub use locale::LocaleMap;
