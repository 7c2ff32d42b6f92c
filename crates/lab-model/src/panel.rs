#![deny(unsafe_code)]

use std::fmt;
use std::sync::OnceLock;

use crate::aliquot_type::AliquotType;
use crate::error::{ProfileError, Result};
use crate::model_ref::{ModelRef, RecordType, SharedResolver};
use crate::processing::ProcessingProfile;

/// A named request for one aliquot type, optionally processed further.
#[derive(Debug, Clone)]
pub struct RequisitionPanel {
    name: String,
    abbreviation: Option<String>,
    verbose_name: Option<String>,
    aliquot_type: AliquotType,
    model: Option<ModelRef>,
    processing_profile: Option<ProcessingProfile>,
    resolver: SharedResolver,
    resolved: OnceLock<RecordType>,
}

impl RequisitionPanel {
    pub fn builder(name: impl Into<String>) -> RequisitionPanelBuilder {
        RequisitionPanelBuilder {
            name: name.into(),
            ..RequisitionPanelBuilder::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> Option<&str> {
        self.abbreviation.as_deref()
    }

    /// Display name, falling back to the panel name.
    pub fn verbose_name(&self) -> &str {
        self.verbose_name.as_deref().unwrap_or(&self.name)
    }

    pub fn aliquot_type(&self) -> &AliquotType {
        &self.aliquot_type
    }

    pub fn processing_profile(&self) -> Option<&ProcessingProfile> {
        self.processing_profile.as_ref()
    }

    pub fn model_ref(&self) -> Option<&ModelRef> {
        self.model.as_ref()
    }

    /// The requisition record type, resolved on first access and cached.
    pub fn model(&self) -> Result<&RecordType> {
        if let Some(record_type) = self.resolved.get() {
            return Ok(record_type);
        }
        let model = self
            .model
            .as_ref()
            .ok_or(ProfileError::GetModel { reference: None })?;
        let record_type = self.resolver.resolve(model)?;
        Ok(self.resolved.get_or_init(|| record_type))
    }
}

impl fmt::Display for RequisitionPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.verbose_name(), self.aliquot_type.alpha_code())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequisitionPanelBuilder {
    name: String,
    abbreviation: Option<String>,
    verbose_name: Option<String>,
    aliquot_type: Option<AliquotType>,
    model: Option<ModelRef>,
    processing_profile: Option<ProcessingProfile>,
}

impl RequisitionPanelBuilder {
    #[must_use]
    pub fn aliquot_type(mut self, aliquot_type: AliquotType) -> Self {
        self.aliquot_type = Some(aliquot_type);
        self
    }

    #[must_use]
    pub fn maybe_aliquot_type(mut self, aliquot_type: Option<AliquotType>) -> Self {
        self.aliquot_type = aliquot_type;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<ModelRef>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn processing_profile(mut self, profile: ProcessingProfile) -> Self {
        self.processing_profile = Some(profile);
        self
    }

    #[must_use]
    pub fn abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }

    #[must_use]
    pub fn verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
        self.verbose_name = Some(verbose_name.into());
        self
    }

    /// Validate the panel. The model reference is not resolved here.
    pub fn build(self, resolver: SharedResolver) -> Result<RequisitionPanel> {
        let aliquot_type = self
            .aliquot_type
            .ok_or_else(|| ProfileError::RequisitionPanel {
                panel: self.name.clone(),
            })?;
        if let Some(profile) = &self.processing_profile
            && profile.aliquot_type() != &aliquot_type
        {
            return Err(ProfileError::InvalidProcessingProfile {
                panel: self.name,
                profile: profile.name().to_string(),
                panel_type: aliquot_type.name().to_string(),
                profile_type: profile.aliquot_type().name().to_string(),
            });
        }
        Ok(RequisitionPanel {
            name: self.name,
            abbreviation: self.abbreviation,
            verbose_name: self.verbose_name,
            aliquot_type,
            model: self.model,
            processing_profile: self.processing_profile,
            resolver,
            resolved: OnceLock::new(),
        })
    }
}
