//! Required-type validation
//!
//! Individuals and classifiers must carry at least one external type
//! statement besides their internal classification; embedded objects are
//! exempt. Runs after classification so every subject already carries an
//! internal type.

use crate::error::{IngestError, Result};
use crate::types::{classification_of, external_types, Classification};
use sigil_core::Fragment;
use tracing::warn;

/// Verify that every individual and classifier carries an external type.
pub fn check_required_types(fragment: &Fragment) -> Result<()> {
    for subject in fragment.subjects() {
        match classification_of(fragment, &subject) {
            Some(Classification::Individual) | Some(Classification::Classifier) => {
                if external_types(fragment, &subject).is_empty() {
                    warn!(subject = %subject, "subject is missing an external type definition");
                    return Err(IngestError::MissingType {
                        subject: subject.lexical().to_string(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}
