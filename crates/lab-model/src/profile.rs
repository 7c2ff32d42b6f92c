#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{ProfileError, Result};
use crate::model_ref::{ModelRef, RecordType, SharedResolver};
use crate::panel::RequisitionPanel;

/// A named collection of panels that share one requisition record type.
#[derive(Debug, Clone)]
pub struct LabProfile {
    name: String,
    requisition_model: Option<ModelRef>,
    resolver: SharedResolver,
    panels: BTreeMap<String, RequisitionPanel>,
}

impl LabProfile {
    pub fn new(name: impl Into<String>, resolver: SharedResolver) -> Self {
        Self {
            name: name.into(),
            requisition_model: None,
            resolver,
            panels: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_requisition_model(mut self, model: impl Into<ModelRef>) -> Self {
        self.requisition_model = Some(model.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requisition_model(&self) -> Result<RecordType> {
        let model =
            self.requisition_model
                .as_ref()
                .ok_or_else(|| ProfileError::LabProfileRequisitionModel {
                    profile: self.name.clone(),
                    message: "requisition model is not set".to_string(),
                })?;
        self.resolver
            .resolve(model)
            .map_err(|_| ProfileError::LabProfileRequisitionModel {
                profile: self.name.clone(),
                message: format!("cannot resolve requisition model '{model}'"),
            })
    }

    pub fn add_panel(&mut self, panel: RequisitionPanel) -> Result<()> {
        let requisition_model = self.requisition_model()?;
        let panel_model = panel.model()?;
        if panel_model != &requisition_model {
            return Err(ProfileError::LabProfileRequisitionModel {
                profile: self.name.clone(),
                message: format!(
                    "panel '{}' uses '{}', expected '{}'",
                    panel.name(),
                    panel_model,
                    requisition_model
                ),
            });
        }
        if self.panels.contains_key(panel.name()) {
            return Err(ProfileError::PanelAlreadyRegistered {
                profile: self.name.clone(),
                panel: panel.name().to_string(),
            });
        }
        debug!(profile = %self.name, panel = %panel.name(), "added panel");
        self.panels.insert(panel.name().to_string(), panel);
        Ok(())
    }

    pub fn get_panel(&self, name: &str) -> Result<&RequisitionPanel> {
        self.panels
            .get(name)
            .ok_or_else(|| ProfileError::PanelNotFound {
                profile: self.name.clone(),
                panel: name.to_string(),
            })
    }

    /// Panels ordered by name.
    pub fn panels(&self) -> impl Iterator<Item = &RequisitionPanel> {
        self.panels.values()
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }
}

impl fmt::Display for LabProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliquot_type::AliquotType;
    use crate::model_ref::RecordTypes;
    use crate::processing::{Process, ProcessingProfile};

    fn resolver() -> SharedResolver {
        RecordTypes::new()
            .with(RecordType::new("edc_lab", "subjectrequisition"))
            .with(RecordType::new("auth", "user"))
            .into_shared()
    }

    fn viral_load(resolver: SharedResolver) -> RequisitionPanel {
        let mut a = AliquotType::new("aliquot_a", "55", "AA");
        let b = AliquotType::new("aliquot_b", "66", "BB");
        a.add_derivatives(&[&b]);
        let mut processing = ProcessingProfile::new("process", a.clone());
        processing
            .add_processes([Process::new(b, 3).expect("process")])
            .expect("add processes");
        RequisitionPanel::builder("Viral Load")
            .aliquot_type(a)
            .model("edc_lab.subjectrequisition")
            .processing_profile(processing)
            .build(resolver)
            .expect("panel")
    }

    #[test]
    fn display_and_debug() {
        let profile = LabProfile::new("profile", resolver());
        assert_eq!(profile.to_string(), "profile");
        assert!(!format!("{profile:?}").is_empty());
    }

    #[test]
    fn missing_requisition_model() {
        let profile = LabProfile::new("profile", resolver());
        let err = profile.requisition_model().unwrap_err();
        assert!(matches!(
            err,
            ProfileError::LabProfileRequisitionModel { .. }
        ));
    }

    #[test]
    fn add_panel_then_duplicate() {
        let resolver = resolver();
        let mut profile = LabProfile::new("profile", resolver.clone())
            .with_requisition_model("edc_lab.subjectrequisition");
        profile
            .add_panel(viral_load(resolver.clone()))
            .expect("first add");
        let err = profile.add_panel(viral_load(resolver)).unwrap_err();
        assert_eq!(
            err,
            ProfileError::PanelAlreadyRegistered {
                profile: "profile".to_string(),
                panel: "Viral Load".to_string(),
            }
        );
        assert_eq!(profile.panel_count(), 1);
        assert!(profile.get_panel("Viral Load").is_ok());
    }

    #[test]
    fn panel_model_must_match() {
        let resolver = resolver();
        let mut profile =
            LabProfile::new("profile", resolver.clone()).with_requisition_model("auth.user");
        let err = profile.add_panel(viral_load(resolver)).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::LabProfileRequisitionModel { .. }
        ));
    }

    #[test]
    fn add_panel_without_requisition_model() {
        let resolver = resolver();
        let mut profile = LabProfile::new("profile", resolver.clone());
        let err = profile.add_panel(viral_load(resolver)).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::LabProfileRequisitionModel { .. }
        ));
    }

    #[test]
    fn unknown_panel() {
        let profile = LabProfile::new("profile", resolver());
        assert_eq!(
            profile.get_panel("CD4").unwrap_err(),
            ProfileError::PanelNotFound {
                profile: "profile".to_string(),
                panel: "CD4".to_string(),
            }
        );
    }
}
