//! Dependency Service - applies a resolved acquisition strategy.
//!
//! The resolver decides; this service hands copy-plan entries to the source
//! tree and weaves the descriptor's code dependencies. Package-manager
//! commands are produced, never executed.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ports::SourceTree, services::CodeWeaver},
    domain::{
        DependencyContext, DependencyDescriptor, DependencyPolicy, DependencyResolver,
        InsertPosition, OutcomeMessages, ReferenceCopy, Resolution, Strategy, WeaveOutcome,
        WeaveTarget,
    },
    error::WeftResult,
};

/// What processing a descriptor did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySetup {
    pub strategy: Strategy,
    /// Policy asked for a package that the descriptor does not declare.
    pub unsatisfiable: bool,
    pub install_command: Option<String>,
    /// References handed to the source tree, in order.
    pub references_added: Vec<ReferenceCopy>,
    pub bootstrap_file: String,
}

pub struct DependencyService {
    tree: Box<dyn SourceTree>,
}

impl DependencyService {
    pub fn new(tree: Box<dyn SourceTree>) -> Self {
        Self { tree }
    }

    /// Resolve and apply the acquisition strategy for one descriptor.
    ///
    /// An unsatisfiable request is flagged and falls back to the local copy;
    /// refusing it is the caller's decision.
    #[instrument(skip_all, fields(project = %context.project, friendly_name = %friendly_name))]
    pub fn process(
        &self,
        descriptor: &DependencyDescriptor,
        policy: &DependencyPolicy,
        context: &DependencyContext,
        friendly_name: &str,
    ) -> WeftResult<DependencySetup> {
        descriptor.validate()?;
        if policy.use_package_manager {
            policy.install_command.validate()?;
        }

        let unsatisfiable = DependencyResolver::is_unsatisfiable(descriptor, policy.use_package_manager);
        if unsatisfiable {
            warn!("Package manager requested but the descriptor declares no package");
        }

        let bootstrap_file = DependencyResolver::bootstrap_file_name(descriptor, friendly_name);
        let resolution = DependencyResolver::resolve(descriptor, policy, context);
        let strategy = resolution.strategy();

        let (install_command, references_added) = match resolution {
            Resolution::PackageInstall { command } => {
                info!(%command, "Package install selected");
                (Some(command), Vec::new())
            }
            Resolution::LocalCopy(plan) => {
                for reference in &plan.entries {
                    debug!(
                        source = %reference.source.display(),
                        destination = %reference.destination.display(),
                        "Adding reference"
                    );
                    self.tree.add_reference(reference)?;
                }
                info!(references = plan.len(), "Local copy applied");
                (None, plan.entries)
            }
        };

        Ok(DependencySetup {
            strategy,
            unsatisfiable,
            install_command,
            references_added,
            bootstrap_file,
        })
    }

    /// Weave each code dependency into its project; inserted snippets are reported.
    #[instrument(skip_all, fields(count = descriptor.code_dependencies.len()))]
    pub fn apply_code_dependencies(
        &self,
        descriptor: &DependencyDescriptor,
        position: InsertPosition,
    ) -> WeftResult<OutcomeMessages> {
        let mut messages = OutcomeMessages::new();

        for dependency in &descriptor.code_dependencies {
            let artifact = self
                .tree
                .find_artifact_by_suffix(&dependency.project_suffix, &dependency.class)?;
            let project = artifact.as_ref().map(|a| a.project.clone());

            let target = WeaveTarget::new(
                dependency.class.as_str(),
                dependency.method.as_str(),
                dependency.code.as_str(),
            );

            match (
                CodeWeaver::weave_resolved(self.tree.as_ref(), artifact, &target, position)?,
                project,
            ) {
                (WeaveOutcome::Inserted, Some(project)) => messages.push(format!(
                    "Code added to project {} class {} method {}.",
                    project, dependency.class, dependency.method
                )),
                (outcome, _) => debug!(
                    class = %dependency.class,
                    method = %dependency.method,
                    %outcome,
                    "Code dependency not inserted"
                ),
            }
        }

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockSourceTree;
    use crate::domain::{ArtifactHandle, CodeDependency, InstallCommandTemplate, MemberHandle};
    use crate::error::WeftError;
    use std::path::PathBuf;

    fn descriptor(package: Option<&str>) -> DependencyDescriptor {
        DependencyDescriptor {
            package: package.map(String::from),
            references: vec!["Foo.dll".into(), "Bar.dll".into()],
            ..Default::default()
        }
    }

    fn context() -> DependencyContext {
        DependencyContext::new("App.Core", "/ext/plugins", "/solution/lib")
    }

    #[test]
    fn local_copy_adds_every_reference_in_order() {
        let mut tree = MockSourceTree::new();
        let mut seq = mockall::Sequence::new();
        for name in ["Foo.dll", "Bar.dll"] {
            tree.expect_add_reference()
                .withf(move |r| r.destination == PathBuf::from("/solution/lib").join(name))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let setup = DependencyService::new(Box::new(tree))
            .process(&descriptor(Some("Acme.Lib")), &DependencyPolicy::default(), &context(), "File")
            .unwrap();

        assert_eq!(setup.strategy, Strategy::LocalCopy);
        assert!(!setup.unsatisfiable);
        assert_eq!(setup.install_command, None);
        assert_eq!(setup.references_added.len(), 2);
        assert_eq!(setup.bootstrap_file, "FilePluginBootstrap.cs");
    }

    #[test]
    fn package_install_touches_no_references() {
        let mut tree = MockSourceTree::new();
        tree.expect_add_reference().never();

        let policy = DependencyPolicy {
            use_package_manager: true,
            install_command: InstallCommandTemplate::new("Set-%PKG%", "%PKG%"),
            ..Default::default()
        };
        let setup = DependencyService::new(Box::new(tree))
            .process(&descriptor(Some("Acme.Lib")), &policy, &context(), "File")
            .unwrap();

        assert_eq!(setup.strategy, Strategy::PackageInstall);
        assert_eq!(setup.install_command.as_deref(), Some("Set-Acme.Lib App.Core"));
        assert!(setup.references_added.is_empty());
    }

    #[test]
    fn unsatisfiable_request_is_flagged_not_blocked() {
        let mut tree = MockSourceTree::new();
        tree.expect_add_reference().times(2).returning(|_| Ok(()));

        let policy = DependencyPolicy {
            use_package_manager: true,
            ..Default::default()
        };
        let setup = DependencyService::new(Box::new(tree))
            .process(&descriptor(None), &policy, &context(), "File")
            .unwrap();

        assert!(setup.unsatisfiable);
        assert_eq!(setup.strategy, Strategy::LocalCopy);
    }

    #[test]
    fn broken_install_template_is_rejected_when_used() {
        let tree = MockSourceTree::new();
        let policy = DependencyPolicy {
            use_package_manager: true,
            install_command: InstallCommandTemplate::new("Install-Package", "%s"),
            ..Default::default()
        };

        let err = DependencyService::new(Box::new(tree))
            .process(&descriptor(Some("Acme.Lib")), &policy, &context(), "File")
            .unwrap_err();
        assert!(matches!(err, WeftError::Domain(_)));
    }

    #[test]
    fn code_dependencies_report_inserted_only() {
        let mut tree = MockSourceTree::new();
        tree.expect_find_artifact_by_suffix().returning(|suffix, class| {
            Ok((suffix == ".Core").then(|| ArtifactHandle::new("App.Core", class)))
        });
        tree.expect_get_member()
            .returning(|a, m| Ok(Some(MemberHandle::new(a.clone(), m))));
        tree.expect_read_body().returning(|m| {
            Ok(if m.name == "Initialize" {
                "{\n    Already();\n}".to_string()
            } else {
                "{\n}".to_string()
            })
        });
        tree.expect_insert_code().times(1).returning(|_, _, _| Ok(()));

        let descriptor = DependencyDescriptor {
            code_dependencies: vec![
                CodeDependency {
                    project_suffix: ".Core".into(),
                    class: "App".into(),
                    method: "Initialize".into(),
                    code: "Already();".into(),
                },
                CodeDependency {
                    project_suffix: ".Core".into(),
                    class: "App".into(),
                    method: "Start".into(),
                    code: "Mvx.RegisterType();".into(),
                },
                CodeDependency {
                    project_suffix: ".Droid".into(),
                    class: "Setup".into(),
                    method: "Start".into(),
                    code: "Droid();".into(),
                },
            ],
            ..Default::default()
        };

        let messages = DependencyService::new(Box::new(tree))
            .apply_code_dependencies(&descriptor, InsertPosition::End)
            .unwrap();

        assert_eq!(
            messages.into_vec(),
            ["Code added to project App.Core class App method Start."]
        );
    }
}
