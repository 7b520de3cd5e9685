//! Pipeline error taxonomy.
//!
//! Every fatal error carries a short message, a diagnostic code naming the
//! originating component, and an actionable hint where one exists. Detailed
//! reports (source chains) are only rendered when the user asked for
//! verbose output; the default presentation is the one-line message plus
//! the hint.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by the build/reverse-build/deploy pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    /// The project configuration could not be located or parsed.
    ///
    /// Fatal, never retried.
    #[error("failed to load project configuration from {path}: {reason}")]
    #[diagnostic(
        code(parley::config::load),
        help("check that parley.json exists and is valid JSON")
    )]
    ConfigLoad { path: PathBuf, reason: String },

    /// The requested locale set cannot be satisfied by the platform.
    ///
    /// Raised both for locales outside the platform's supported set and for
    /// multi-locale requests against a single-locale platform. Fatal; the
    /// user must narrow the request.
    #[error("unsupported locale request for platform `{platform}`: {reason}")]
    #[diagnostic(
        code(parley::locale::unsupported),
        help("narrow the request with --locale or adjust the locale map in parley.json")
    )]
    UnsupportedLocale { platform: String, reason: String },

    /// No canonical model file exists for a requested locale.
    ///
    /// Fatal for that locale only; sibling locales continue.
    #[error("no model found for locale `{locale}` (expected {path})")]
    #[diagnostic(
        code(parley::model::not_found),
        help("create the model file or drop the locale from the request")
    )]
    ModelNotFound { locale: String, path: PathBuf },

    /// A model file parsed but violates a structural invariant.
    #[error("model for locale `{locale}` is invalid: {reason}")]
    #[diagnostic(code(parley::model::invalid))]
    InvalidModel { locale: String, reason: String },

    /// An exporter or importer produced nothing or failed outright.
    ///
    /// Fatal for that locale only.
    #[error("platform `{platform}` export failed for locale `{locale}`: {reason}")]
    #[diagnostic(code(parley::transform::export))]
    ArtifactExport {
        platform: String,
        locale: String,
        reason: String,
    },

    /// A remote artifact changed between read and write.
    ///
    /// The deploy orchestrator re-fetches the remote revision and retries
    /// exactly once; a second conflict surfaces this error.
    #[error("remote `{resource}` was modified since last read (had {expected}, found {found})")]
    #[diagnostic(
        code(parley::deploy::precondition),
        help("the upload was already retried once; re-run `parley deploy` to pick up the new remote revision")
    )]
    PreconditionConflict {
        resource: String,
        expected: String,
        found: String,
    },

    /// The user cancelled at a prompt. A clean abort, not a failure.
    #[error("cancelled by user")]
    #[diagnostic(code(parley::cancelled))]
    Cancelled,

    /// A plugin handler failed during a lifecycle phase.
    #[error("plugin `{plugin}` failed during `{phase}`: {reason}")]
    #[diagnostic(code(parley::pipeline::handler))]
    Handler {
        plugin: String,
        phase: String,
        reason: String,
    },

    /// Filesystem failure with the offending path.
    #[error("{context}: {path}")]
    #[diagnostic(code(parley::io))]
    Io {
        context: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failure.
    #[error("{context}")]
    #[diagnostic(code(parley::json))]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PipelineError {
    /// Wrap an I/O error with the path it concerned.
    pub fn io(context: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            context: context.into(),
            path: path.into(),
            source,
        }
    }

    /// Wrap a serde_json error with context.
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        PipelineError::Json {
            context: context.into(),
            source,
        }
    }

    /// Whether this error aborts a single locale's task rather than the
    /// whole invocation. Sibling locales continue past these.
    pub fn is_locale_scoped(&self) -> bool {
        matches!(
            self,
            PipelineError::ModelNotFound { .. }
                | PipelineError::InvalidModel { .. }
                | PipelineError::ArtifactExport { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_scoped_classification() {
        let err = PipelineError::ModelNotFound {
            locale: "en".to_string(),
            path: PathBuf::from("models/en.json"),
        };
        assert!(err.is_locale_scoped());

        let err = PipelineError::ConfigLoad {
            path: PathBuf::from("parley.json"),
            reason: "missing".to_string(),
        };
        assert!(!err.is_locale_scoped());

        assert!(!PipelineError::Cancelled.is_locale_scoped());
    }

    #[test]
    fn test_messages_name_the_subject() {
        let err = PipelineError::UnsupportedLocale {
            platform: "generic".to_string(),
            reason: "resolves to 2 locales but the platform is single-locale".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("generic"));
        assert!(msg.contains("single-locale"));
    }
}
