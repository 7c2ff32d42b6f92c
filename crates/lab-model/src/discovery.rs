//! Startup discovery of lab profiles.
//!
//! Every application namespace may provide a `lab_profiles` module. Discovery
//! visits each namespace once; a namespace without the module is skipped, and
//! a namespace whose module fails has all of its registrations removed before
//! the error is returned.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LabProfilesFile;
use crate::error::DiscoveryError;
use crate::model_ref::SharedResolver;
use crate::registry::ProfileRegistry;

pub const LAB_PROFILES_MODULE: &str = "lab_profiles";

/// A namespace's source of lab profiles.
pub trait LabProfileModule {
    fn namespace(&self) -> &str;

    /// Register this namespace's profiles.
    ///
    /// Return [`DiscoveryError::ModuleNotFound`] when the namespace has no
    /// lab profiles module at all.
    fn register(&self, registry: &mut ProfileRegistry) -> Result<(), DiscoveryError>;
}

impl<T: LabProfileModule + ?Sized> LabProfileModule for &T {
    fn namespace(&self) -> &str {
        (**self).namespace()
    }

    fn register(&self, registry: &mut ProfileRegistry) -> Result<(), DiscoveryError> {
        (**self).register(registry)
    }
}

impl<T: LabProfileModule + ?Sized> LabProfileModule for Box<T> {
    fn namespace(&self) -> &str {
        (**self).namespace()
    }

    fn register(&self, registry: &mut ProfileRegistry) -> Result<(), DiscoveryError> {
        (**self).register(registry)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoverySummary {
    /// Namespaces whose module registered successfully.
    pub namespaces: Vec<String>,
    /// Namespaces without a lab profiles module.
    pub skipped: Vec<String>,
    /// Registered profile names, in registration order.
    pub profiles: Vec<String>,
}

pub fn autodiscover<I>(
    registry: &mut ProfileRegistry,
    modules: I,
) -> Result<DiscoverySummary, DiscoveryError>
where
    I: IntoIterator,
    I::Item: LabProfileModule,
{
    let mut summary = DiscoverySummary::default();
    for module in modules {
        let namespace = module.namespace().to_string();
        let checkpoint = registry.checkpoint();
        match module.register(registry) {
            Ok(()) => {
                let added = registry.added_since(&checkpoint);
                info!(
                    namespace = %namespace,
                    profiles = added.len(),
                    "registered lab profiles from namespace"
                );
                summary.profiles.extend(added);
                summary.namespaces.push(namespace);
            }
            Err(err) if err.is_module_not_found() => {
                registry.rollback(checkpoint);
                debug!(namespace = %namespace, "no {LAB_PROFILES_MODULE} module");
                summary.skipped.push(namespace);
            }
            Err(err) => {
                let removed = registry.rollback(checkpoint);
                warn!(
                    namespace = %namespace,
                    removed = ?removed,
                    error = %err,
                    "lab profile discovery failed; namespace rolled back"
                );
                return Err(err);
            }
        }
    }
    Ok(summary)
}

/// Lab profiles read from `<root>/<namespace>/lab_profiles.toml`.
#[derive(Debug, Clone)]
pub struct DirectoryModule {
    root: PathBuf,
    namespace: String,
    resolver: SharedResolver,
}

impl DirectoryModule {
    pub fn new(
        root: impl Into<PathBuf>,
        namespace: impl Into<String>,
        resolver: SharedResolver,
    ) -> Self {
        Self {
            root: root.into(),
            namespace: namespace.into(),
            resolver,
        }
    }

    /// One module per subdirectory of `root`, sorted by name.
    pub fn scan(root: &Path, resolver: &SharedResolver) -> Result<Vec<Self>, DiscoveryError> {
        let entries = std::fs::read_dir(root).map_err(|e| DiscoveryError::io(root, e))?;
        let mut namespaces = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DiscoveryError::io(root, e))?;
            if entry.path().is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                namespaces.push(name.to_string());
            }
        }
        namespaces.sort();
        Ok(namespaces
            .into_iter()
            .map(|namespace| Self::new(root, namespace, resolver.clone()))
            .collect())
    }

    pub fn path(&self) -> PathBuf {
        self.root
            .join(&self.namespace)
            .join(format!("{LAB_PROFILES_MODULE}.toml"))
    }
}

impl LabProfileModule for DirectoryModule {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn register(&self, registry: &mut ProfileRegistry) -> Result<(), DiscoveryError> {
        let path = self.path();
        if !path.is_file() {
            return Err(DiscoveryError::ModuleNotFound {
                namespace: self.namespace.clone(),
                module: LAB_PROFILES_MODULE.to_string(),
            });
        }
        let file = LabProfilesFile::load(&path)?;
        for profile in file.build(&self.resolver)? {
            registry.register(profile.name().to_string(), profile)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::model_ref::RecordTypes;
    use crate::profile::LabProfile;

    /// Registers the named profiles, then optionally fails.
    struct StaticModule {
        namespace: &'static str,
        profiles: &'static [&'static str],
        outcome: Outcome,
    }

    enum Outcome {
        Ok,
        Missing,
        Fail,
    }

    impl LabProfileModule for StaticModule {
        fn namespace(&self) -> &str {
            self.namespace
        }

        fn register(&self, registry: &mut ProfileRegistry) -> Result<(), DiscoveryError> {
            if matches!(self.outcome, Outcome::Missing) {
                return Err(DiscoveryError::ModuleNotFound {
                    namespace: self.namespace.to_string(),
                    module: LAB_PROFILES_MODULE.to_string(),
                });
            }
            for name in self.profiles {
                let profile = LabProfile::new(*name, RecordTypes::new().into_shared());
                registry.register(*name, profile)?;
            }
            match self.outcome {
                Outcome::Fail => Err(DiscoveryError::Io {
                    path: PathBuf::from("broken"),
                    source: std::io::Error::other("broken module"),
                }),
                _ => Ok(()),
            }
        }
    }

    #[test]
    fn missing_modules_are_skipped() {
        let mut registry = ProfileRegistry::new();
        let modules = [
            StaticModule {
                namespace: "ambition",
                profiles: &["ambition"],
                outcome: Outcome::Ok,
            },
            StaticModule {
                namespace: "edc_base",
                profiles: &[],
                outcome: Outcome::Missing,
            },
        ];
        let summary = autodiscover(&mut registry, &modules).expect("discover");
        assert_eq!(summary.namespaces, vec!["ambition"]);
        assert_eq!(summary.skipped, vec!["edc_base"]);
        assert_eq!(summary.profiles, vec!["ambition"]);
        assert!(registry.get("ambition").is_ok());
    }

    #[test]
    fn failing_namespace_is_rolled_back() {
        let mut registry = ProfileRegistry::new();
        let modules = [
            StaticModule {
                namespace: "first",
                profiles: &["first"],
                outcome: Outcome::Ok,
            },
            StaticModule {
                namespace: "broken",
                profiles: &["partial_a", "partial_b"],
                outcome: Outcome::Fail,
            },
            StaticModule {
                namespace: "never",
                profiles: &["never"],
                outcome: Outcome::Ok,
            },
        ];
        let err = autodiscover(&mut registry, &modules).unwrap_err();
        assert!(matches!(err, DiscoveryError::Io { .. }));
        assert!(registry.get("first").is_ok());
        for name in ["partial_a", "partial_b", "never"] {
            assert_eq!(
                registry.get(name).unwrap_err(),
                RegistryError::NotRegistered {
                    name: name.to_string()
                }
            );
        }
    }

    #[test]
    fn rollback_of_only_namespace_unloads_registry() {
        let mut registry = ProfileRegistry::new();
        let modules: Vec<Box<dyn LabProfileModule>> = vec![Box::new(StaticModule {
            namespace: "broken",
            profiles: &["partial"],
            outcome: Outcome::Fail,
        })];
        assert!(autodiscover(&mut registry, modules).is_err());
        assert!(!registry.is_loaded());
    }

    #[test]
    fn duplicate_profile_across_namespaces_fails() {
        let mut registry = ProfileRegistry::new();
        let modules = [
            StaticModule {
                namespace: "one",
                profiles: &["subject"],
                outcome: Outcome::Ok,
            },
            StaticModule {
                namespace: "two",
                profiles: &["other", "subject"],
                outcome: Outcome::Ok,
            },
        ];
        let err = autodiscover(&mut registry, &modules).unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::Registry(RegistryError::AlreadyRegistered { .. })
        ));
        assert!(registry.get("other").is_err());
        assert!(registry.get("subject").is_ok());
    }
}
