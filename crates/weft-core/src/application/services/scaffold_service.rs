//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates one generation run:
//! 1. Announce the run and subscribe to item-created notifications
//! 2. Create the declared artifacts
//! 3. Adapt the test counterpart
//! 4. Weave navigation snippets in both directions
//! 5. Unsubscribe and announce completion
//!
//! Steps run strictly in order. The subscription is held by a guard, so it
//! is released on every exit path.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ItemCreated, ItemCreatedHandler, SnippetSource, SourceTree, StatusSink, SubscriptionId},
        services::CodeWeaver,
    },
    domain::{
        GenerationOutcome, GenerationRequest, InsertPosition, NameDeriver, OutcomeMessages,
        PlaceholderSyntax, ReplacementVariables, SnippetRenderer, TestAdaptation, TestFramework,
        WeaveOutcome, WeaveTarget, naming::DEFAULT_SUFFIX, snippet::variables,
        testing::DEFAULT_TEST_PLACEHOLDER,
    },
    error::WeftResult,
};

pub const STATUS_RUNNING: &str = "Weft is running...";
pub const STATUS_UPDATING: &str = "Updating files...";
pub const STATUS_COMPLETED: &str = "View model and views completed.";

pub const DEFAULT_NAVIGATION_SNIPPET: &str = "ViewModelNavigation";
pub const DEFAULT_NAVIGATION_MEMBER: &str = "InitializeCommands";
pub const DEFAULT_TEST_PROJECT_SUFFIX: &str = ".Tests";
pub const DEFAULT_TEST_ARTIFACT_PREFIX: &str = "Test";

/// Explicit settings for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaveSettings {
    /// Suffix token stripped to derive command names.
    pub suffix: String,
    /// Snippet loaded for navigation weaving.
    pub navigation_snippet: String,
    /// Member that receives navigation snippets.
    pub navigation_member: String,
    pub insert_position: InsertPosition,
    pub placeholder_syntax: PlaceholderSyntax,
    pub test_framework: TestFramework,
    /// Suffix identifying the test project.
    pub test_project_suffix: String,
    /// Prefix of test artifacts, prepended to the view model name.
    pub test_artifact_prefix: String,
    /// Placeholder view model used by test item templates.
    pub test_placeholder: String,
}

impl Default for WeaveSettings {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.into(),
            navigation_snippet: DEFAULT_NAVIGATION_SNIPPET.into(),
            navigation_member: DEFAULT_NAVIGATION_MEMBER.into(),
            insert_position: InsertPosition::default(),
            placeholder_syntax: PlaceholderSyntax::default(),
            test_framework: TestFramework::default(),
            test_project_suffix: DEFAULT_TEST_PROJECT_SUFFIX.into(),
            test_artifact_prefix: DEFAULT_TEST_ARTIFACT_PREFIX.into(),
            test_placeholder: DEFAULT_TEST_PLACEHOLDER.into(),
        }
    }
}

/// Item-created subscription scoped to one run.
///
/// Dropping the guard unsubscribes; [`SubscriptionGuard::release`] does the
/// same at a chosen point.
struct SubscriptionGuard<'a> {
    tree: &'a dyn SourceTree,
    id: Option<SubscriptionId>,
}

impl<'a> SubscriptionGuard<'a> {
    fn subscribe(tree: &'a dyn SourceTree, handler: ItemCreatedHandler) -> Self {
        let id = tree.subscribe_item_created(handler);
        debug!(subscription = %id, "Subscribed to item-created notifications");
        Self { tree, id: Some(id) }
    }

    fn release(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(id) = self.id.take() {
            self.tree.unsubscribe_item_created(id);
            debug!(subscription = %id, "Unsubscribed from item-created notifications");
        }
    }
}

impl Drop for SubscriptionGuard<'_> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Main generation service.
///
/// Orchestrates artifact creation, test adaptation and navigation weaving.
pub struct ScaffoldService {
    tree: Box<dyn SourceTree>,
    snippets: Box<dyn SnippetSource>,
    status: Box<dyn StatusSink>,
    settings: WeaveSettings,
    deriver: NameDeriver,
    renderer: SnippetRenderer,
    tests: TestAdaptation,
}

impl ScaffoldService {
    /// Create a new service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use weft_core::application::{ScaffoldService, WeaveSettings};
    ///
    /// let service = ScaffoldService::new(
    ///     tree,     // impl SourceTree
    ///     snippets, // impl SnippetSource
    ///     status,   // impl StatusSink
    ///     WeaveSettings::default(),
    /// );
    /// ```
    pub fn new(
        tree: Box<dyn SourceTree>,
        snippets: Box<dyn SnippetSource>,
        status: Box<dyn StatusSink>,
        settings: WeaveSettings,
    ) -> Self {
        let deriver = NameDeriver::new(settings.suffix.clone());
        let renderer = SnippetRenderer::new(settings.placeholder_syntax.clone());
        let tests = TestAdaptation::new(settings.test_framework, settings.test_placeholder.clone());

        Self {
            tree,
            snippets,
            status,
            settings,
            deriver,
            renderer,
            tests,
        }
    }

    pub fn settings(&self) -> &WeaveSettings {
        &self.settings
    }

    /// Run one generation request.
    #[instrument(
        skip_all,
        fields(
            view_model = %request.view_model,
            artifacts = request.artifacts.len(),
            adapt_tests = request.adapt_tests
        )
    )]
    pub fn generate(&self, request: &GenerationRequest) -> WeftResult<GenerationOutcome> {
        request.validate()?;
        info!("Generating {}", request.view_model);

        self.status.write_status(STATUS_RUNNING);

        let created = Arc::new(Mutex::new(Vec::new()));
        let guard = SubscriptionGuard::subscribe(self.tree.as_ref(), record_created(&created));

        let mut messages = OutcomeMessages::new();
        messages.extend(self.tree.create_artifacts(&request.artifacts)?);

        if request.adapt_tests {
            let created_now = created
                .lock()
                .map_err(|_| ApplicationError::LockPoisoned)?
                .clone();
            if let Some(message) = self.adapt_test_artifact(&request.view_model, &created_now)? {
                messages.push(message);
            }
        }

        if let Some(from) = request.initiated_from_name() {
            let snippet = self.navigation_snippet(&request.view_model)?;
            self.weave_navigation(from, snippet, &mut messages)?;
        }

        if let Some(to) = request.navigate_to_name() {
            let snippet = self.navigation_snippet(to)?;
            self.weave_navigation(&request.view_model, snippet, &mut messages)?;
        }

        guard.release();

        self.status.write_status(STATUS_UPDATING);
        self.status.write_status(STATUS_COMPLETED);

        let created_artifacts = created
            .lock()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .clone();

        info!(
            messages = messages.len(),
            created = created_artifacts.len(),
            "Generation completed"
        );

        Ok(GenerationOutcome {
            messages,
            created_artifacts,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Render the navigation snippet with `view_model`'s derived identifiers.
    fn navigation_snippet(&self, view_model: &str) -> WeftResult<String> {
        let template = self.snippets.load(&self.settings.navigation_snippet)?;

        let vars = ReplacementVariables::new()
            .with(variables::VIEW_MODEL_NAME, view_model)
            .with(
                variables::COMMAND_NAME,
                self.deriver.derive_command_name(view_model),
            )
            .with(
                variables::COMMAND_NAME_INSTANCE,
                self.deriver.derive_instance_command_name(view_model),
            );

        Ok(self.renderer.render_template(&template, &vars))
    }

    fn weave_navigation(
        &self,
        artifact: &str,
        snippet: String,
        messages: &mut OutcomeMessages,
    ) -> WeftResult<()> {
        let target = WeaveTarget::new(artifact, self.settings.navigation_member.as_str(), snippet);
        let outcome =
            CodeWeaver::weave(self.tree.as_ref(), &target, self.settings.insert_position)?;

        match outcome {
            WeaveOutcome::Inserted => messages.push(format!(
                "Code added to artifact {} member {}.",
                target.artifact, target.member
            )),
            WeaveOutcome::AlreadyPresent => {
                debug!(artifact = %target.artifact, "Navigation already present")
            }
            skipped => warn!(artifact = %target.artifact, %skipped, "Navigation step skipped"),
        }

        Ok(())
    }

    /// Rewrite the test counterpart created by this run.
    ///
    /// A test artifact that already existed is left alone: the placeholder
    /// swap is only correct on the untouched item template.
    fn adapt_test_artifact(
        &self,
        view_model: &str,
        created: &[String],
    ) -> WeftResult<Option<String>> {
        let name = format!("{}{}", self.settings.test_artifact_prefix, view_model);
        if !created.contains(&name) {
            debug!(artifact = %name, "Test artifact not created by this run, leaving it untouched");
            return Ok(None);
        }

        let Some(artifact) = self
            .tree
            .find_artifact_by_suffix(&self.settings.test_project_suffix, &name)?
        else {
            warn!(artifact = %name, "Test artifact not found, skipping adaptation");
            return Ok(None);
        };

        let text = self.tree.read_artifact(&artifact)?;
        let adapted = self.tests.adapt(&text, view_model);
        if adapted == text {
            return Ok(None);
        }
        self.tree.write_artifact(&artifact, &adapted)?;

        Ok(Some(format!(
            "Test artifact {} adapted for {}.",
            name,
            self.tests.framework()
        )))
    }
}

fn record_created(created: &Arc<Mutex<Vec<String>>>) -> ItemCreatedHandler {
    let created = Arc::clone(created);
    Arc::new(move |item: &ItemCreated| {
        info!(project = %item.project, artifact = %item.name, "Artifact created");
        if let Ok(mut names) = created.lock() {
            names.push(item.name.clone());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockSourceTree;
    use crate::domain::{ArtifactHandle, ArtifactRequest, MemberHandle, SnippetTemplate};
    use crate::error::WeftError;
    use mockall::Sequence;
    use mockall::predicate::*;

    const NAV: &str = "this.{{CommandNameInstance}} = new MvxCommand(() => ShowViewModel<{{ViewModelName}}>());";

    #[derive(Clone, Default)]
    struct Statuses(Arc<Mutex<Vec<String>>>);

    impl Statuses {
        fn taken(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl StatusSink for Statuses {
        fn write_status(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    struct FixedSnippet(&'static str);

    impl SnippetSource for FixedSnippet {
        fn load(&self, name: &str) -> WeftResult<SnippetTemplate> {
            Ok(SnippetTemplate::new(name, self.0))
        }
    }

    fn service(tree: MockSourceTree, statuses: &Statuses) -> ScaffoldService {
        ScaffoldService::new(
            Box::new(tree),
            Box::new(FixedSnippet(NAV)),
            Box::new(statuses.clone()),
            WeaveSettings::default(),
        )
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("OrdersViewModel")
            .with_artifact(ArtifactRequest::new("App.Core", "OrdersViewModel", "ViewModel"))
    }

    fn subscription(tree: &mut MockSourceTree, seq: &mut Sequence) {
        tree.expect_subscribe_item_created()
            .times(1)
            .in_sequence(seq)
            .returning(|_| SubscriptionId::new());
    }

    #[test]
    fn plain_run_creates_and_reports_in_order() {
        let mut seq = Sequence::new();
        let mut tree = MockSourceTree::new();
        subscription(&mut tree, &mut seq);
        tree.expect_create_artifacts()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|reqs| Ok(reqs.iter().map(|r| format!("{} created.", r.name)).collect()));
        tree.expect_unsubscribe_item_created()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let statuses = Statuses::default();
        let outcome = service(tree, &statuses).generate(&request()).unwrap();

        assert_eq!(outcome.messages.into_vec(), ["OrdersViewModel created."]);
        assert_eq!(
            statuses.taken(),
            [STATUS_RUNNING, STATUS_UPDATING, STATUS_COMPLETED]
        );
    }

    #[test]
    fn creation_failure_still_unsubscribes() {
        let mut tree = MockSourceTree::new();
        tree.expect_subscribe_item_created()
            .times(1)
            .returning(|_| SubscriptionId::new());
        tree.expect_create_artifacts().returning(|_| {
            Err(ApplicationError::ArtifactCreation {
                name: "OrdersViewModel".into(),
                reason: "disk full".into(),
            }
            .into())
        });
        tree.expect_unsubscribe_item_created()
            .times(1)
            .return_const(());

        let statuses = Statuses::default();
        let err = service(tree, &statuses).generate(&request()).unwrap_err();

        assert!(matches!(
            err,
            WeftError::Application(ApplicationError::ArtifactCreation { .. })
        ));
        assert_eq!(statuses.taken(), [STATUS_RUNNING]);
    }

    #[test]
    fn invalid_request_never_subscribes() {
        let mut tree = MockSourceTree::new();
        tree.expect_subscribe_item_created().never();

        let statuses = Statuses::default();
        let err = service(tree, &statuses)
            .generate(&GenerationRequest::new(""))
            .unwrap_err();

        assert!(matches!(err, WeftError::Domain(_)));
        assert!(statuses.taken().is_empty());
    }

    #[test]
    fn created_items_are_recorded_through_subscription() {
        let outcome = service(notifying_tree(), &Statuses::default())
            .generate(&request())
            .unwrap();

        assert_eq!(outcome.created_artifacts, ["OrdersViewModel"]);
        assert!(outcome.messages.is_empty());
    }

    #[test]
    fn initiated_from_weaves_new_view_model_into_caller() {
        let mut tree = MockSourceTree::new();
        tree.expect_subscribe_item_created()
            .returning(|_| SubscriptionId::new());
        tree.expect_create_artifacts().returning(|_| Ok(Vec::new()));
        tree.expect_find_artifact_by_name()
            .with(eq("HomeViewModel"))
            .returning(|n| Ok(Some(ArtifactHandle::new("App.Core", n))));
        tree.expect_get_member()
            .with(always(), eq(DEFAULT_NAVIGATION_MEMBER))
            .returning(|a, m| Ok(Some(MemberHandle::new(a.clone(), m))));
        tree.expect_read_body().returning(|_| Ok("{\n}".into()));
        tree.expect_insert_code()
            .withf(|m, code, _| {
                m.artifact.name == "HomeViewModel"
                    && code == "this.ordersCommand = new MvxCommand(() => ShowViewModel<OrdersViewModel>());"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        tree.expect_unsubscribe_item_created().return_const(());

        let outcome = service(tree, &Statuses::default())
            .generate(&request().initiated_from("HomeViewModel"))
            .unwrap();

        assert_eq!(
            outcome.messages.into_vec(),
            ["Code added to artifact HomeViewModel member InitializeCommands."]
        );
    }

    #[test]
    fn navigate_to_weaves_target_into_new_view_model() {
        let mut tree = MockSourceTree::new();
        tree.expect_subscribe_item_created()
            .returning(|_| SubscriptionId::new());
        tree.expect_create_artifacts().returning(|_| Ok(Vec::new()));
        tree.expect_find_artifact_by_name()
            .with(eq("OrdersViewModel"))
            .returning(|n| Ok(Some(ArtifactHandle::new("App.Core", n))));
        tree.expect_get_member()
            .returning(|a, m| Ok(Some(MemberHandle::new(a.clone(), m))));
        tree.expect_read_body().returning(|_| Ok("{\n}".into()));
        tree.expect_insert_code()
            .withf(|m, code, _| {
                m.artifact.name == "OrdersViewModel" && code.contains("ShowViewModel<DetailViewModel>")
                    && code.contains("this.detailCommand")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        tree.expect_unsubscribe_item_created().return_const(());

        let outcome = service(tree, &Statuses::default())
            .generate(&request().navigate_to("DetailViewModel"))
            .unwrap();

        assert_eq!(outcome.messages.len(), 1);
    }

    #[test]
    fn missing_targets_degrade_to_skipped_steps() {
        let mut tree = MockSourceTree::new();
        tree.expect_subscribe_item_created()
            .returning(|_| SubscriptionId::new());
        tree.expect_create_artifacts()
            .returning(|_| Ok(vec!["created".to_string()]));
        tree.expect_find_artifact_by_suffix()
            .returning(|_, _| Ok(None));
        tree.expect_find_artifact_by_name().returning(|_| Ok(None));
        tree.expect_insert_code().never();
        tree.expect_write_artifact().never();
        tree.expect_unsubscribe_item_created()
            .times(1)
            .return_const(());

        let statuses = Statuses::default();
        let outcome = service(tree, &statuses)
            .generate(
                &request()
                    .adapt_tests(true)
                    .initiated_from("HomeViewModel")
                    .navigate_to("DetailViewModel"),
            )
            .unwrap();

        assert_eq!(outcome.messages.into_vec(), ["created"]);
        assert_eq!(statuses.taken().last().map(String::as_str), Some(STATUS_COMPLETED));
    }

    /// Mock tree whose `create_artifacts` announces every request to the
    /// subscribed handler.
    fn notifying_tree() -> MockSourceTree {
        let handler: Arc<Mutex<Option<ItemCreatedHandler>>> = Arc::default();
        let mut tree = MockSourceTree::new();

        let slot = Arc::clone(&handler);
        tree.expect_subscribe_item_created().returning(move |h| {
            *slot.lock().unwrap() = Some(h);
            SubscriptionId::new()
        });
        let slot = Arc::clone(&handler);
        tree.expect_create_artifacts().returning(move |reqs| {
            let notify = slot.lock().unwrap().clone().unwrap();
            for r in reqs {
                notify(&ItemCreated {
                    project: r.project.clone(),
                    name: r.name.clone(),
                });
            }
            Ok(Vec::new())
        });
        tree.expect_unsubscribe_item_created().return_const(());
        tree
    }

    fn request_with_test() -> GenerationRequest {
        request()
            .with_artifact(ArtifactRequest::new("App.Core.Tests", "TestOrdersViewModel", "Test"))
            .adapt_tests(true)
    }

    #[test]
    fn test_artifact_is_adapted_in_test_project() {
        let mut tree = notifying_tree();
        tree.expect_find_artifact_by_suffix()
            .with(eq(DEFAULT_TEST_PROJECT_SUFFIX), eq("TestOrdersViewModel"))
            .returning(|_, n| Ok(Some(ArtifactHandle::new("App.Core.Tests", n))));
        tree.expect_read_artifact().returning(|_| {
            Ok("public class TestFirstViewModel { private FirstViewModel firstViewModel; }".into())
        });
        tree.expect_write_artifact()
            .withf(|_, text| {
                text == "public class TestOrdersViewModel { private OrdersViewModel ordersViewModel; }"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = service(tree, &Statuses::default())
            .generate(&request_with_test())
            .unwrap();

        assert_eq!(
            outcome.messages.into_vec(),
            ["Test artifact TestOrdersViewModel adapted for nunit."]
        );
    }

    #[test]
    fn pre_existing_test_artifact_is_left_alone() {
        let mut tree = MockSourceTree::new();
        tree.expect_subscribe_item_created()
            .returning(|_| SubscriptionId::new());
        tree.expect_create_artifacts()
            .returning(|_| Ok(vec!["TestOrdersViewModel already exists in project App.Core.Tests.".into()]));
        tree.expect_find_artifact_by_suffix().never();
        tree.expect_read_artifact().never();
        tree.expect_write_artifact().never();
        tree.expect_unsubscribe_item_created().return_const(());

        let outcome = service(tree, &Statuses::default())
            .generate(&request_with_test())
            .unwrap();

        assert_eq!(
            outcome.messages.into_vec(),
            ["TestOrdersViewModel already exists in project App.Core.Tests."]
        );
    }

    #[test]
    fn unchanged_test_artifact_is_not_reported() {
        let mut tree = notifying_tree();
        tree.expect_find_artifact_by_suffix()
            .returning(|_, n| Ok(Some(ArtifactHandle::new("App.Core.Tests", n))));
        tree.expect_read_artifact()
            .returning(|_| Ok("public class TestOrdersViewModel {}".into()));
        tree.expect_write_artifact().never();

        let outcome = service(tree, &Statuses::default())
            .generate(&request_with_test())
            .unwrap();

        assert!(outcome.messages.is_empty());
    }

    #[test]
    fn weave_failure_mid_run_still_unsubscribes() {
        let mut tree = MockSourceTree::new();
        tree.expect_subscribe_item_created()
            .returning(|_| SubscriptionId::new());
        tree.expect_create_artifacts().returning(|_| Ok(Vec::new()));
        tree.expect_find_artifact_by_name().returning(|_| {
            Err(ApplicationError::SourceTree {
                operation: "find_artifact_by_name",
                reason: "locked".into(),
            }
            .into())
        });
        tree.expect_unsubscribe_item_created()
            .times(1)
            .return_const(());

        let result = service(tree, &Statuses::default())
            .generate(&request().initiated_from("HomeViewModel"));
        assert!(result.is_err());
    }
}
