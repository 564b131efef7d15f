//! Adapting a generated test artifact to the chosen test framework.
//!
//! Test item templates are authored against NUnit and against a placeholder
//! view model (`FirstViewModel`). Adaptation rewrites the framework markers
//! and then swaps the placeholder pair for the new view model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    naming::lower_first,
    render::SnippetRenderer,
    snippet::ReplacementVariables,
};

/// Placeholder view model used by test item templates.
pub const DEFAULT_TEST_PLACEHOLDER: &str = "FirstViewModel";

/// Supported unit-test frameworks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    #[default]
    NUnit,
    MsTest,
    XUnit,
}

impl TestFramework {
    pub const ALL: [TestFramework; 3] = [Self::NUnit, Self::MsTest, Self::XUnit];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NUnit => "nunit",
            Self::MsTest => "mstest",
            Self::XUnit => "xunit",
        }
    }

    /// Marker rewrites from the NUnit-authored template to this framework.
    ///
    /// xUnit has no class or set-up attributes; those markers are removed.
    pub fn marker_rewrites(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::NUnit => &[],
            Self::MsTest => &[
                ("[TestFixture]", "[TestClass]"),
                ("[Test]", "[TestMethod]"),
                ("[SetUp]", "[TestInitialize]"),
                ("[TearDown]", "[TestCleanup]"),
                (
                    "using NUnit.Framework;",
                    "using Microsoft.VisualStudio.TestTools.UnitTesting;",
                ),
            ],
            Self::XUnit => &[
                ("[TestFixture]", ""),
                ("[Test]", "[Fact]"),
                ("[SetUp]", ""),
                ("[TearDown]", ""),
                ("using NUnit.Framework;", "using Xunit;"),
            ],
        }
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nunit" => Ok(Self::NUnit),
            "mstest" | "ms-test" => Ok(Self::MsTest),
            "xunit" => Ok(Self::XUnit),
            other => Err(DomainError::InvalidDescriptor(format!(
                "unknown test framework '{other}'"
            ))),
        }
    }
}

/// Rewrites a test artifact for a framework and a new view model.
#[derive(Debug, Clone)]
pub struct TestAdaptation {
    framework: TestFramework,
    placeholder: String,
    renderer: SnippetRenderer,
}

impl TestAdaptation {
    pub fn new(framework: TestFramework, placeholder: impl Into<String>) -> Self {
        Self {
            framework,
            placeholder: placeholder.into(),
            renderer: SnippetRenderer::literal(),
        }
    }

    pub fn framework(&self) -> TestFramework {
        self.framework
    }

    /// Marker rewrite followed by the paired name replacement.
    ///
    /// Meant for a freshly created item template: a second pass renames
    /// again whenever `view_model` itself contains the placeholder.
    pub fn adapt(&self, text: &str, view_model: &str) -> String {
        let markers: ReplacementVariables =
            self.framework.marker_rewrites().iter().copied().collect();
        let rewritten = self.renderer.render(text, &markers);

        let names = ReplacementVariables::new()
            .with(self.placeholder.as_str(), view_model)
            .with(lower_first(&self.placeholder), lower_first(view_model));
        self.renderer.render(&rewritten, &names)
    }
}

impl Default for TestAdaptation {
    fn default() -> Self {
        Self::new(TestFramework::default(), DEFAULT_TEST_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "using NUnit.Framework;\n\
        [TestFixture]\n\
        public class TestFirstViewModel : BaseTest\n\
        {\n\
            private FirstViewModel firstViewModel;\n\
            [SetUp]\n\
            public void Init() { this.firstViewModel = new FirstViewModel(); }\n\
            [Test]\n\
            public void TestFirstViewModelCreated() { }\n\
        }";

    #[test]
    fn nunit_only_renames() {
        let out = TestAdaptation::default().adapt(TEMPLATE, "OrdersViewModel");
        assert!(out.contains("[TestFixture]"));
        assert!(out.contains("public class TestOrdersViewModel"));
        assert!(out.contains("private OrdersViewModel ordersViewModel;"));
        assert!(out.contains("this.ordersViewModel = new OrdersViewModel();"));
        assert!(!out.contains("FirstViewModel"));
        assert!(!out.contains("firstViewModel"));
    }

    #[test]
    fn mstest_rewrites_markers() {
        let out = TestAdaptation::new(TestFramework::MsTest, DEFAULT_TEST_PLACEHOLDER)
            .adapt(TEMPLATE, "OrdersViewModel");
        assert!(out.contains("[TestClass]"));
        assert!(out.contains("[TestMethod]"));
        assert!(out.contains("[TestInitialize]"));
        assert!(out.contains("using Microsoft.VisualStudio.TestTools.UnitTesting;"));
        assert!(!out.contains("[TestFixture]"));
        assert!(!out.contains("[Test]\n"));
    }

    #[test]
    fn xunit_drops_class_markers() {
        let out = TestAdaptation::new(TestFramework::XUnit, DEFAULT_TEST_PLACEHOLDER)
            .adapt(TEMPLATE, "OrdersViewModel");
        assert!(out.contains("[Fact]"));
        assert!(out.contains("using Xunit;"));
        assert!(!out.contains("[TestFixture]"));
        assert!(!out.contains("[SetUp]"));
    }

    #[test]
    fn framework_parsing() {
        assert_eq!("MSTest".parse::<TestFramework>().unwrap(), TestFramework::MsTest);
        assert_eq!("xunit".parse::<TestFramework>().unwrap(), TestFramework::XUnit);
        assert!("jest".parse::<TestFramework>().is_err());
    }
}
