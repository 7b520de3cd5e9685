//! Reverse build: native artifact set -> canonical model.

use std::path::PathBuf;

use crate::model::locale::{self, LocaleMap};
use crate::transform::Platform;
use crate::util::errors::PipelineError;
use crate::util::fs::{ArtifactStore, ModelStore};
use crate::util::prompt::{Prompt, ReverseBuildChoice};

/// Result of one reverse build.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseOutcome {
    /// The native locale the artifacts were read from.
    pub native_locale: String,
    /// The canonical locale the model was written under.
    pub canonical_locale: String,
    /// Backup path, if the user chose to back up the previous model.
    pub backup: Option<PathBuf>,
}

/// Reconstruct the canonical model from a platform's build output.
///
/// More than one native locale in the build directory is fatal unless the
/// caller disambiguates with an explicit locale or the locale map claims
/// exactly one of the candidates. An existing canonical
/// model triggers the overwrite/backup/cancel prompt unless `clean` was
/// requested; cancelling aborts with no side effects.
pub fn reverse_locale(
    platform: &dyn Platform,
    models: &dyn ModelStore,
    artifacts: &dyn ArtifactStore,
    locale_map: &LocaleMap,
    prompt: &dyn Prompt,
    requested_locale: Option<&str>,
    clean: bool,
) -> Result<ReverseOutcome, PipelineError> {
    let all = artifacts.read_all()?;
    let natives = platform.native_locales(&all);

    if natives.is_empty() {
        return Err(PipelineError::ArtifactExport {
            platform: platform.id().to_string(),
            locale: requested_locale.unwrap_or("*").to_string(),
            reason: "no native locale files in the build directory; run `parley build` first"
                .to_string(),
        });
    }

    let native = match requested_locale {
        Some(requested) => {
            if !natives.iter().any(|n| n == requested) {
                return Err(PipelineError::UnsupportedLocale {
                    platform: platform.id().to_string(),
                    reason: format!(
                        "no native artifacts for locale `{requested}` (found: {})",
                        natives.join(", ")
                    ),
                });
            }
            requested.to_string()
        }
        None if natives.len() == 1 => natives[0].clone(),
        None => {
            // The locale map can still narrow the field: when exactly one
            // of the native locales has a canonical owner, it wins.
            let mut claimed = natives
                .iter()
                .filter(|native| locale::claimant(native, locale_map).is_some());
            match (claimed.next(), claimed.next()) {
                (Some(only), None) => only.clone(),
                _ => {
                    return Err(PipelineError::UnsupportedLocale {
                        platform: platform.id().to_string(),
                        reason: format!(
                            "build directory contains {} native locales ({}); disambiguate with --locale",
                            natives.len(),
                            natives.join(", ")
                        ),
                    });
                }
            }
        }
    };

    let canonical = locale::canonical_for(&native, locale_map);

    let mut backup = None;
    if models.model_exists(&canonical) && !clean {
        match prompt.reverse_build()? {
            ReverseBuildChoice::Overwrite => {}
            ReverseBuildChoice::Backup => {
                backup = Some(models.backup_model(&canonical)?);
            }
            ReverseBuildChoice::Cancel => return Err(PipelineError::Cancelled),
        }
    }

    let model = platform.import(&native, &all)?;
    model.validate(&canonical)?;
    models.write_model(&canonical, &model)?;

    tracing::debug!(native = %native, canonical = %canonical, "reverse build complete");
    Ok(ReverseOutcome {
        native_locale: native,
        canonical_locale: canonical,
        backup,
    })
}
