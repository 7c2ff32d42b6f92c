#![deny(unsafe_code)]

use serde::Serialize;
use tracing::debug;

use crate::aliquot_type::AliquotType;
use crate::error::{ProfileError, Result};

/// Derive `aliquot_count` aliquots of `aliquot_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    aliquot_type: AliquotType,
    aliquot_count: u32,
}

impl Process {
    pub fn new(aliquot_type: AliquotType, aliquot_count: u32) -> Result<Self> {
        if aliquot_count == 0 {
            return Err(ProfileError::InvalidAliquotCount {
                aliquot_type: aliquot_type.name().to_string(),
            });
        }
        Ok(Self {
            aliquot_type,
            aliquot_count,
        })
    }

    pub fn aliquot_type(&self) -> &AliquotType {
        &self.aliquot_type
    }

    pub fn aliquot_count(&self) -> u32 {
        self.aliquot_count
    }
}

/// The processes applied to one source aliquot type.
///
/// The profile keeps its own copy of the source type, so derivatives must be
/// declared on the type before the profile is created.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingProfile {
    name: String,
    aliquot_type: AliquotType,
    processes: Vec<Process>,
}

impl ProcessingProfile {
    pub fn new(name: impl Into<String>, aliquot_type: AliquotType) -> Self {
        Self {
            name: name.into(),
            aliquot_type,
            processes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source aliquot type.
    pub fn aliquot_type(&self) -> &AliquotType {
        &self.aliquot_type
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Append processes. All are validated before any is added.
    pub fn add_processes(&mut self, processes: impl IntoIterator<Item = Process>) -> Result<()> {
        let processes: Vec<Process> = processes.into_iter().collect();
        for process in &processes {
            if !self.aliquot_type.can_derive(process.aliquot_type()) {
                return Err(ProfileError::ProcessingProfileInvalidDerivative {
                    source_type: self.aliquot_type.name().to_string(),
                    derivative: process.aliquot_type().name().to_string(),
                });
            }
        }
        debug!(
            profile = %self.name,
            added = processes.len(),
            "added processes"
        );
        self.processes.extend(processes);
        Ok(())
    }

    /// Total number of aliquots the profile derives from one source aliquot.
    pub fn aliquot_count(&self) -> u64 {
        self.processes
            .iter()
            .map(|process| u64::from(process.aliquot_count()))
            .sum()
    }
}
