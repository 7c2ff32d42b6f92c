use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use lab_identifier::{AliquotIdentifier, Prefix, human_aliquot_identifier};
use lab_model::{
    DirectoryModule, LabProfile, ProcessingProfile, ProfileRegistry, RecordType, RecordTypes,
    SharedResolver, autodiscover,
};
use lab_receive::{
    InMemoryStore, Manifest, ManifestDescription, ManifestItem, ReceiveAliquot, Receiver,
    ReceivingStore,
};

use crate::types::{
    DescribeReport, IdentifierReport, IdentifierRequest, PanelRow, ProfileRow, ProfilesReport,
    ProfilesRequest,
};

pub fn run_identifier(request: &IdentifierRequest) -> Result<IdentifierReport> {
    let prefix = Prefix::new(
        &request.template,
        request.prefix_length,
        request.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )
    .context("render prefix")?;

    let mut builder = AliquotIdentifier::builder()
        .prefix(prefix.as_str())
        .numeric_code(&request.numeric_code)
        .count_padding(request.count_padding)
        .identifier_length(request.identifier_length)
        .primary_segment(&request.primary_segment);
    if let Some(parent_segment) = &request.parent_segment {
        builder = builder.parent_segment(parent_segment);
    }
    if let Some(count) = request.count {
        builder = builder.count(count);
    }
    let identifier = builder.build().context("build aliquot identifier")?;

    Ok(IdentifierReport {
        prefix: prefix.to_string(),
        identifier: identifier.identifier().to_string(),
        human_readable: human_aliquot_identifier(identifier.identifier()),
        is_primary: identifier.is_primary(),
    })
}

pub fn run_profiles(request: &ProfilesRequest) -> Result<ProfilesReport> {
    let span = info_span!("profiles", root = %request.root.display());
    let _guard = span.enter();

    let resolver = record_type_resolver(&request.record_types)?;
    let modules = if request.namespaces.is_empty() {
        DirectoryModule::scan(&request.root, &resolver)
            .with_context(|| format!("scan {}", request.root.display()))?
    } else {
        request
            .namespaces
            .iter()
            .map(|namespace| DirectoryModule::new(&request.root, namespace, resolver.clone()))
            .collect()
    };

    let mut registry = ProfileRegistry::new();
    let discovery = autodiscover(&mut registry, &modules).context("discover lab profiles")?;
    info!(
        namespaces = discovery.namespaces.len(),
        profiles = discovery.profiles.len(),
        "discovery finished"
    );

    let profiles = if registry.is_loaded() {
        registry
            .profiles()?
            .map(|(_, profile)| profile_row(profile))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };
    Ok(ProfilesReport {
        discovery,
        profiles,
    })
}

fn record_type_resolver(labels: &[String]) -> Result<SharedResolver> {
    let types = RecordTypes::new();
    for label in labels {
        let record_type = RecordType::parse(label)
            .ok_or_else(|| anyhow!("record type '{label}' is not app_label.model_name"))?;
        types.register(record_type);
    }
    Ok(types.into_shared())
}

fn profile_row(profile: &LabProfile) -> Result<ProfileRow> {
    let requisition_model = profile
        .requisition_model()
        .with_context(|| format!("lab profile '{profile}'"))?;
    let panels = profile
        .panels()
        .map(|panel| {
            let processing = panel.processing_profile();
            PanelRow {
                name: panel.name().to_string(),
                abbreviation: panel.abbreviation().map(str::to_string),
                aliquot_type: panel.aliquot_type().to_string(),
                processing_profile: processing.map(|p| p.name().to_string()),
                derived_aliquots: processing.map_or(0, ProcessingProfile::aliquot_count),
            }
        })
        .collect();
    Ok(ProfileRow {
        name: profile.name().to_string(),
        requisition_model: requisition_model.label(),
        panels,
    })
}

fn load_store(path: &Path) -> Result<InMemoryStore> {
    InMemoryStore::load(path).with_context(|| format!("load store {}", path.display()))
}

pub fn run_receive(
    store_path: &Path,
    manifest_identifier: &str,
    box_identifier: &str,
    aliquot_identifier: &str,
) -> Result<ReceiveAliquot> {
    let store = load_store(store_path)?;
    let aliquot = store
        .find_aliquot(aliquot_identifier)?
        .ok_or_else(|| anyhow!("aliquot {aliquot_identifier} is not on record"))?;
    let manifest_item = ManifestItem::new(manifest_identifier, box_identifier);
    let mut manifest = Manifest::new(manifest_identifier);

    Receiver::new(&store)
        .receive_aliquot(aliquot, &manifest_item, &mut manifest)
        .with_context(|| format!("receive {aliquot_identifier} on manifest {manifest_identifier}"))
}

pub fn run_describe(store_path: &Path, manifest_identifier: &str) -> Result<DescribeReport> {
    let store = load_store(store_path)?;
    let mut manifest = Manifest::new(manifest_identifier);
    Receiver::new(&store).check_manifest_presence(&mut manifest)?;

    let items = store.manifest_items(manifest_identifier)?;
    let description = ManifestDescription::from_store(&store, &items)
        .with_context(|| format!("describe manifest {manifest_identifier}"))?;
    Ok(DescribeReport {
        manifest,
        box_identifiers: items.into_iter().map(|item| item.identifier).collect(),
        description,
    })
}
