//! Lab profiles declared in TOML.
//!
//! ```toml
//! [[aliquot_types]]
//! name = "whole_blood"
//! numeric_code = "02"
//! alpha_code = "WB"
//! derivatives = ["buffy_coat", "plasma"]
//!
//! [[processing_profiles]]
//! name = "wb_to_bc"
//! aliquot_type = "whole_blood"
//! processes = [{ aliquot_type = "buffy_coat", count = 2 }]
//!
//! [[lab_profiles]]
//! name = "subject"
//! requisition_model = "edc_lab.subjectrequisition"
//!
//! [[lab_profiles.panels]]
//! name = "Viral Load"
//! aliquot_type = "whole_blood"
//! processing_profile = "wb_to_bc"
//! ```
//!
//! Panels without a `model` use their lab profile's `requisition_model`.

#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aliquot_type::AliquotType;
use crate::error::DiscoveryError;
use crate::model_ref::SharedResolver;
use crate::panel::RequisitionPanel;
use crate::processing::{Process, ProcessingProfile};
use crate::profile::LabProfile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabProfilesFile {
    #[serde(default)]
    pub aliquot_types: Vec<AliquotTypeConfig>,
    #[serde(default)]
    pub processing_profiles: Vec<ProcessingProfileConfig>,
    #[serde(default)]
    pub lab_profiles: Vec<LabProfileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AliquotTypeConfig {
    pub name: String,
    pub numeric_code: String,
    pub alpha_code: String,
    #[serde(default)]
    pub derivatives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessingProfileConfig {
    pub name: String,
    pub aliquot_type: String,
    #[serde(default)]
    pub processes: Vec<ProcessConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessConfig {
    pub aliquot_type: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabProfileConfig {
    pub name: String,
    #[serde(default)]
    pub requisition_model: Option<String>,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    pub name: String,
    #[serde(default)]
    pub aliquot_type: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub processing_profile: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub verbose_name: Option<String>,
}

impl LabProfilesFile {
    pub fn load(path: &Path) -> Result<Self, DiscoveryError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| DiscoveryError::io(path, e))?;
        toml::from_str(&contents).map_err(|e| DiscoveryError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Build the declared lab profiles, in file order.
    pub fn build(&self, resolver: &SharedResolver) -> Result<Vec<LabProfile>, DiscoveryError> {
        let types = self.build_aliquot_types()?;
        let processing = self.build_processing_profiles(&types)?;

        let mut profiles = Vec::with_capacity(self.lab_profiles.len());
        for config in &self.lab_profiles {
            let mut profile = LabProfile::new(&config.name, resolver.clone());
            if let Some(model) = &config.requisition_model {
                profile = profile.with_requisition_model(model.as_str());
            }
            for panel_config in &config.panels {
                let context = format!("panel '{}'", panel_config.name);
                let aliquot_type = panel_config
                    .aliquot_type
                    .as_deref()
                    .map(|name| lookup_type(&types, name, &context))
                    .transpose()?;
                let mut builder = RequisitionPanel::builder(&panel_config.name)
                    .maybe_aliquot_type(aliquot_type);
                if let Some(model) = panel_config
                    .model
                    .as_ref()
                    .or(config.requisition_model.as_ref())
                {
                    builder = builder.model(model.as_str());
                }
                if let Some(name) = &panel_config.processing_profile {
                    let profile = processing.get(name).cloned().ok_or_else(|| {
                        DiscoveryError::UnknownProcessingProfile {
                            name: name.clone(),
                            context: context.clone(),
                        }
                    })?;
                    builder = builder.processing_profile(profile);
                }
                if let Some(abbreviation) = &panel_config.abbreviation {
                    builder = builder.abbreviation(abbreviation);
                }
                if let Some(verbose_name) = &panel_config.verbose_name {
                    builder = builder.verbose_name(verbose_name);
                }
                profile.add_panel(builder.build(resolver.clone())?)?;
            }
            profiles.push(profile);
        }
        Ok(profiles)
    }

    fn build_aliquot_types(&self) -> Result<BTreeMap<String, AliquotType>, DiscoveryError> {
        let mut types: BTreeMap<String, AliquotType> = self
            .aliquot_types
            .iter()
            .map(|config| {
                (
                    config.name.clone(),
                    AliquotType::new(&config.name, &config.numeric_code, &config.alpha_code),
                )
            })
            .collect();

        for config in &self.aliquot_types {
            let context = format!("aliquot type '{}'", config.name);
            let derivatives = config
                .derivatives
                .iter()
                .map(|name| lookup_type(&types, name, &context))
                .collect::<Result<Vec<_>, _>>()?;
            let refs: Vec<&AliquotType> = derivatives.iter().collect();
            if let Some(aliquot_type) = types.get_mut(&config.name) {
                aliquot_type.add_derivatives(&refs);
            }
        }
        Ok(types)
    }

    fn build_processing_profiles(
        &self,
        types: &BTreeMap<String, AliquotType>,
    ) -> Result<BTreeMap<String, ProcessingProfile>, DiscoveryError> {
        let mut profiles = BTreeMap::new();
        for config in &self.processing_profiles {
            let context = format!("processing profile '{}'", config.name);
            let source = lookup_type(types, &config.aliquot_type, &context)?;
            let processes = config
                .processes
                .iter()
                .map(|process| -> Result<Process, DiscoveryError> {
                    let aliquot_type = lookup_type(types, &process.aliquot_type, &context)?;
                    Ok(Process::new(aliquot_type, process.count)?)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mut profile = ProcessingProfile::new(&config.name, source);
            profile.add_processes(processes)?;
            profiles.insert(config.name.clone(), profile);
        }
        Ok(profiles)
    }
}

fn lookup_type(
    types: &BTreeMap<String, AliquotType>,
    name: &str,
    context: &str,
) -> Result<AliquotType, DiscoveryError> {
    types
        .get(name)
        .cloned()
        .ok_or_else(|| DiscoveryError::UnknownAliquotType {
            name: name.to_string(),
            context: context.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use crate::model_ref::{RecordType, RecordTypes};

    const PROFILES: &str = r#"
[[aliquot_types]]
name = "whole_blood"
numeric_code = "02"
alpha_code = "WB"
derivatives = ["buffy_coat", "plasma"]

[[aliquot_types]]
name = "buffy_coat"
numeric_code = "12"
alpha_code = "BC"

[[aliquot_types]]
name = "plasma"
numeric_code = "32"
alpha_code = "PL"

[[processing_profiles]]
name = "wb_processing"
aliquot_type = "whole_blood"
processes = [
    { aliquot_type = "buffy_coat", count = 2 },
    { aliquot_type = "plasma", count = 4 },
]

[[lab_profiles]]
name = "subject"
requisition_model = "edc_lab.subjectrequisition"

[[lab_profiles.panels]]
name = "Viral Load"
aliquot_type = "whole_blood"
processing_profile = "wb_processing"
abbreviation = "VL"

[[lab_profiles.panels]]
name = "CD4"
aliquot_type = "whole_blood"
verbose_name = "CD4 count"
"#;

    fn resolver() -> SharedResolver {
        RecordTypes::new()
            .with(RecordType::new("edc_lab", "subjectrequisition"))
            .into_shared()
    }

    #[test]
    fn builds_profiles_from_toml() {
        let file: LabProfilesFile = toml::from_str(PROFILES).expect("parse");
        let profiles = file.build(&resolver()).expect("build");
        assert_eq!(profiles.len(), 1);

        let subject = &profiles[0];
        assert_eq!(subject.name(), "subject");
        assert_eq!(subject.panel_count(), 2);

        let viral_load = subject.get_panel("Viral Load").expect("panel");
        assert_eq!(viral_load.abbreviation(), Some("VL"));
        let processing = viral_load.processing_profile().expect("processing");
        assert_eq!(processing.processes().len(), 2);
        assert_eq!(processing.aliquot_count(), 6);

        let cd4 = subject.get_panel("CD4").expect("panel");
        assert_eq!(cd4.verbose_name(), "CD4 count");
        assert_eq!(
            cd4.model().expect("model").label(),
            "edc_lab.subjectrequisition"
        );
    }

    #[test]
    fn unknown_derivative_is_reported() {
        let file: LabProfilesFile = toml::from_str(
            r#"
[[aliquot_types]]
name = "whole_blood"
numeric_code = "02"
alpha_code = "WB"
derivatives = ["serum"]
"#,
        )
        .expect("parse");
        let err = file.build(&resolver()).unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::UnknownAliquotType { ref name, .. } if name == "serum"
        ));
    }

    #[test]
    fn invalid_derivative_process_is_a_profile_error() {
        let file: LabProfilesFile = toml::from_str(
            r#"
[[aliquot_types]]
name = "whole_blood"
numeric_code = "02"
alpha_code = "WB"

[[aliquot_types]]
name = "plasma"
numeric_code = "32"
alpha_code = "PL"

[[processing_profiles]]
name = "bad"
aliquot_type = "whole_blood"
processes = [{ aliquot_type = "plasma", count = 1 }]
"#,
        )
        .expect("parse");
        let err = file.build(&resolver()).unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::Profile(ProfileError::ProcessingProfileInvalidDerivative { .. })
        ));
    }

    #[test]
    fn panel_without_aliquot_type_is_rejected() {
        let file: LabProfilesFile = toml::from_str(
            r#"
[[lab_profiles]]
name = "subject"
requisition_model = "edc_lab.subjectrequisition"

[[lab_profiles.panels]]
name = "Viral Load"
"#,
        )
        .expect("parse");
        let err = file.build(&resolver()).unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::Profile(ProfileError::RequisitionPanel { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<LabProfilesFile, _> = toml::from_str(
            r#"
[[aliquot_types]]
name = "whole_blood"
numeric_code = "02"
alpha_code = "WB"
colour = "red"
"#,
        );
        assert!(result.is_err());
    }
}
