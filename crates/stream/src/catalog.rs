use rand::Rng;
use runner_common::TemplateId;

use crate::error::ConfigError;

/// Immutable set of interchangeable segment templates.
///
/// Non-empty by construction, so [`SegmentCatalog::pick`] never has to
/// handle the empty case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentCatalog {
    templates: Vec<TemplateId>,
}

impl SegmentCatalog {
    pub fn new(templates: Vec<TemplateId>) -> Result<Self, ConfigError> {
        if templates.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self { templates })
    }

    /// Uniform random template.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> TemplateId {
        self.templates[rng.random_range(0..self.templates.len())]
    }

    pub fn templates(&self) -> &[TemplateId] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
