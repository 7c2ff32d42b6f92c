use std::path::PathBuf;

use lab_model::DiscoverySummary;
use lab_receive::{Manifest, ManifestDescription};
use serde::Serialize;

/// Inputs for rendering one aliquot identifier.
#[derive(Debug, Clone)]
pub struct IdentifierRequest {
    pub template: String,
    pub fields: Vec<(String, String)>,
    pub prefix_length: Option<usize>,
    pub numeric_code: String,
    pub parent_segment: Option<String>,
    pub count: Option<u32>,
    pub count_padding: usize,
    pub identifier_length: usize,
    pub primary_segment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentifierReport {
    pub prefix: String,
    pub identifier: String,
    pub human_readable: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone)]
pub struct ProfilesRequest {
    pub root: PathBuf,
    /// Restrict discovery to these namespaces. Empty means every subdirectory.
    pub namespaces: Vec<String>,
    /// Known requisition record types, as `app_label.model_name`.
    pub record_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilesReport {
    pub discovery: DiscoverySummary,
    pub profiles: Vec<ProfileRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileRow {
    pub name: String,
    pub requisition_model: String,
    pub panels: Vec<PanelRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelRow {
    pub name: String,
    pub abbreviation: Option<String>,
    pub aliquot_type: String,
    pub processing_profile: Option<String>,
    pub derived_aliquots: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeReport {
    pub manifest: Manifest,
    pub box_identifiers: Vec<String>,
    pub description: ManifestDescription,
}
