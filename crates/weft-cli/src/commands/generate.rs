//! Implementation of the `weft generate` command.
//!
//! Responsibility: pick the projects, render the item templates into
//! artifact requests, call the core scaffold service and display the
//! outcome.  Creation, test adaptation and weaving happen in the core.

use std::io::IsTerminal as _;
use std::path::Path;

use tracing::{debug, info, instrument};

use weft_adapters::{FileSnippetSource, LocalSourceTree, MemorySnippetSource, builtin_snippets};
use weft_core::{
    application::{ScaffoldService, WeaveSettings, ports::SnippetSource},
    domain::{
        ArtifactRequest, GenerationRequest, NameDeriver, ReplacementVariables, SnippetRenderer,
        snippet::variables,
    },
};

use crate::{
    cli::{GenerateArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Suffix appended to the view model stem to name its views.
const VIEW_SUFFIX: &str = "View";

/// Execute the `weft generate` command.
///
/// Dispatch sequence:
/// 1. Resolve the solution root and the target projects
/// 2. Render the item templates into artifact requests
/// 3. Show the plan; stop here on `--dry-run`
/// 4. Confirm unless `--yes`, `--quiet` or non-interactive
/// 5. Run the scaffold service and print its messages
#[instrument(skip_all, fields(view_model = %args.name))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let settings = config.weave_settings()?;

    // 1. Projects
    if !args.root.is_dir() {
        return Err(CliError::RootNotFound { path: args.root });
    }
    let tree = LocalSourceTree::new(&args.root);
    let projects = tree.projects()?;
    let targets = ProjectTargets::resolve(&projects, &args, &config, &args.root)?;

    debug!(
        core = %targets.core,
        views = ?targets.views,
        tests = targets.tests.as_deref().unwrap_or("none"),
        "Projects resolved"
    );

    // 2. Artifact requests
    let snippets = snippet_source(&config);
    let artifacts = plan_artifacts(&args.name, &targets, &settings, snippets.as_ref())?;

    let mut request = GenerationRequest::new(args.name.as_str())
        .with_artifacts(artifacts)
        .adapt_tests(targets.tests.is_some());
    if let Some(from) = &args.from {
        request = request.initiated_from(from.as_str());
    }
    if let Some(to) = &args.to {
        request = request.navigate_to(to.as_str());
    }
    request
        .validate()
        .map_err(|e| CliError::Core(e.into()))?;

    // 3. Plan
    show_plan(&request, &args.root, &output)?;
    if args.dry_run {
        output.info("Dry run: nothing was written.")?;
        return Ok(());
    }

    // 4. Confirm
    let interactive = !global.quiet && !args.yes && !output.is_json() && std::io::stdin().is_terminal();
    if interactive && !confirm("Generate these artifacts?")? {
        return Err(CliError::Cancelled);
    }

    // 5. Run
    let status = output.status_sink();
    let service = ScaffoldService::new(
        Box::new(tree),
        snippet_source(&config),
        Box::new(status.clone()),
        settings,
    );

    info!(root = %args.root.display(), "Generation started");
    let result = service.generate(&request);
    status.finish();
    let outcome = result?;
    info!(created = outcome.created_artifacts.len(), "Generation completed");

    if output.is_json() {
        return output.json(&outcome);
    }

    for message in outcome.messages.iter() {
        output.print(message)?;
    }
    output.success(&format!("{} ready.", args.name))?;
    Ok(())
}

// ── Project resolution ────────────────────────────────────────────────────────

/// Projects one run writes into.
#[derive(Debug, PartialEq, Eq)]
struct ProjectTargets {
    core: String,
    views: Vec<String>,
    tests: Option<String>,
}

impl ProjectTargets {
    fn resolve(
        projects: &[String],
        args: &GenerateArgs,
        config: &AppConfig,
        root: &Path,
    ) -> CliResult<Self> {
        let not_found = |pattern: String| CliError::ProjectNotFound {
            pattern,
            root: root.to_path_buf(),
        };

        let core = match &args.project {
            Some(name) => find_exact(projects, name).ok_or_else(|| not_found(name.clone()))?,
            None => find_by_suffix(projects, &config.weave.core_project_suffix)
                .ok_or_else(|| not_found(format!("*{}", config.weave.core_project_suffix)))?,
        };

        let views = args
            .views
            .iter()
            .map(|name| find_exact(projects, name).ok_or_else(|| not_found(name.clone())))
            .collect::<CliResult<Vec<_>>>()?;

        let tests = if args.tests {
            let suffix = &config.weave.test_project_suffix;
            Some(find_by_suffix(projects, suffix).ok_or_else(|| not_found(format!("*{suffix}")))?)
        } else {
            None
        };

        Ok(Self { core, views, tests })
    }
}

fn find_exact(projects: &[String], name: &str) -> Option<String> {
    projects.iter().find(|p| *p == name).cloned()
}

fn find_by_suffix(projects: &[String], suffix: &str) -> Option<String> {
    projects.iter().find(|p| p.ends_with(suffix)).cloned()
}

// ── Artifact planning ─────────────────────────────────────────────────────────

/// Built-in snippets unless `weave.snippet_dir` points elsewhere.
fn snippet_source(config: &AppConfig) -> Box<dyn SnippetSource> {
    match &config.weave.snippet_dir {
        Some(dir) => Box::new(FileSnippetSource::new(dir)),
        None => Box::new(MemorySnippetSource::with_builtin()),
    }
}

/// Render the item templates for the view model, its views and its test.
///
/// The test item keeps its placeholder view model; the scaffold service
/// adapts it once it exists.
fn plan_artifacts(
    view_model: &str,
    targets: &ProjectTargets,
    settings: &WeaveSettings,
    snippets: &dyn SnippetSource,
) -> CliResult<Vec<ArtifactRequest>> {
    let renderer = SnippetRenderer::new(settings.placeholder_syntax.clone());
    let deriver = NameDeriver::new(settings.suffix.as_str());
    let view_name = format!("{}{VIEW_SUFFIX}", stem(view_model, &settings.suffix));

    let vars = ReplacementVariables::new()
        .with(builtin_snippets::keys::NAMESPACE, targets.core.as_str())
        .with(variables::VIEW_MODEL_NAME, view_model)
        .with(variables::COMMAND_NAME, deriver.derive_command_name(view_model))
        .with(
            variables::COMMAND_NAME_INSTANCE,
            deriver.derive_instance_command_name(view_model),
        )
        .with(builtin_snippets::keys::VIEW_NAME, view_name.as_str());

    let render = |item: &str| -> CliResult<String> {
        let template = snippets
            .load(item)
            .with_cli_context(|| format!("loading item template {item}"))?;
        Ok(renderer.render_template(&template, &vars))
    };

    let mut artifacts = vec![ArtifactRequest::new(
        targets.core.as_str(),
        view_model,
        render(builtin_snippets::VIEW_MODEL_ITEM)?,
    )];

    if !targets.views.is_empty() {
        let view = render(builtin_snippets::VIEW_ITEM)?;
        for project in &targets.views {
            artifacts.push(ArtifactRequest::new(
                project.as_str(),
                view_name.as_str(),
                view.as_str(),
            ));
        }
    }

    if let Some(project) = &targets.tests {
        artifacts.push(ArtifactRequest::new(
            project.as_str(),
            format!("{}{view_model}", settings.test_artifact_prefix),
            render(builtin_snippets::TEST_ITEM)?,
        ));
    }

    Ok(artifacts)
}

/// Text before the suffix, or the whole name when it is absent.
fn stem<'a>(name: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        return name;
    }
    match name.find(suffix) {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_plan(request: &GenerationRequest, root: &Path, out: &OutputManager) -> CliResult<()> {
    if out.is_json() {
        return Ok(());
    }
    out.header("Plan")?;
    out.print(&format!("  Solution:   {}", root.display()))?;
    for artifact in &request.artifacts {
        out.print(&format!("  Create:     {} in {}", artifact.name, artifact.project))?;
    }
    if let Some(from) = request.initiated_from_name() {
        out.print(&format!("  Wire from:  {from}"))?;
    }
    if let Some(to) = request.navigate_to_name() {
        out.print(&format!("  Wire to:    {to}"))?;
    }
    out.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_prompt: &str) -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
