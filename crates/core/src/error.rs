use crate::types::{DbId, ENTITY_PROJECT, ENTITY_TASK};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// A project id that does not resolve.
    pub fn project_not_found(id: DbId) -> Self {
        Self::NotFound {
            entity: ENTITY_PROJECT,
            id,
        }
    }

    /// A task id that does not resolve.
    pub fn task_not_found(id: DbId) -> Self {
        Self::NotFound {
            entity: ENTITY_TASK,
            id,
        }
    }

    /// True for `NotFound` errors about projects.
    pub fn is_project_not_found(&self) -> bool {
        matches!(self, Self::NotFound { entity, .. } if *entity == ENTITY_PROJECT)
    }

    /// True for `NotFound` errors about tasks.
    pub fn is_task_not_found(&self) -> bool {
        matches!(self, Self::NotFound { entity, .. } if *entity == ENTITY_TASK)
    }
}

/// Flatten derive-based field errors into a single readable message.
///
/// Fields are reported in alphabetical order so the message is stable.
impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let parts: Vec<String> = fields
            .into_iter()
            .map(|(field, errs)| {
                let reasons: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{field}: {}", reasons.join(", "))
            })
            .collect();

        Self::Validation(parts.join("; "))
    }
}
