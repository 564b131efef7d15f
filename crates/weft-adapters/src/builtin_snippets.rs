//! Snippets and item templates that ship with Weft.
//!
//! Item templates use the `{{KEY}}` placeholder syntax. The test item
//! template is authored against NUnit and the `FirstViewModel` placeholder;
//! the generation service adapts it after creation.

use weft_core::domain::SnippetTemplate;

/// Navigation command wiring, woven into `InitializeCommands`.
pub const NAVIGATION: &str = "ViewModelNavigation";
/// View model item template.
pub const VIEW_MODEL_ITEM: &str = "ViewModel";
/// View item template.
pub const VIEW_ITEM: &str = "View";
/// Unit test item template.
pub const TEST_ITEM: &str = "TestViewModel";

/// Placeholder keys used by the item templates, in addition to the
/// navigation variables.
pub mod keys {
    pub const NAMESPACE: &str = "Namespace";
    pub const VIEW_NAME: &str = "ViewName";
}

const NAVIGATION_TEXT: &str =
    "this.{{CommandNameInstance}} = new MvxCommand(() => this.ShowViewModel<{{ViewModelName}}>());";

const VIEW_MODEL_TEXT: &str = r#"namespace {{Namespace}}.ViewModels
{
    using Cirrious.MvvmCross.ViewModels;

    public class {{ViewModelName}} : BaseViewModel
    {
        public {{ViewModelName}}()
        {
            this.InitializeCommands();
        }

        public void InitializeCommands()
        {
        }
    }
}
"#;

const VIEW_TEXT: &str = r#"namespace {{Namespace}}.Views
{
    using Cirrious.MvvmCross.Views;

    public class {{ViewName}} : MvxView
    {
        public new {{ViewModelName}} ViewModel
        {
            get { return ({{ViewModelName}})base.ViewModel; }
        }
    }
}
"#;

const TEST_TEXT: &str = r#"namespace {{Namespace}}.Tests.ViewModels
{
    using NUnit.Framework;

    using {{Namespace}}.ViewModels;

    [TestFixture]
    public class TestFirstViewModel : BaseTest
    {
        private FirstViewModel firstViewModel;

        [SetUp]
        public override void SetUp()
        {
            base.SetUp();
            this.firstViewModel = new FirstViewModel();
        }

        [Test]
        public void TestConstructor()
        {
            Assert.IsNotNull(this.firstViewModel);
        }

        [TearDown]
        public override void TearDown()
        {
            base.TearDown();
        }
    }
}
"#;

/// All built-in templates.
pub fn all() -> Vec<SnippetTemplate> {
    vec![
        SnippetTemplate::new(NAVIGATION, NAVIGATION_TEXT),
        SnippetTemplate::new(VIEW_MODEL_ITEM, VIEW_MODEL_TEXT),
        SnippetTemplate::new(VIEW_ITEM, VIEW_TEXT),
        SnippetTemplate::new(TEST_ITEM, TEST_TEXT),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::domain::{TestAdaptation, TestFramework};

    #[test]
    fn names_are_unique() {
        let templates = all();
        let mut names: Vec<_> = templates.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), templates.len());
    }

    #[test]
    fn test_item_adapts_to_xunit() {
        let adapted = TestAdaptation::new(TestFramework::XUnit, "FirstViewModel")
            .adapt(TEST_TEXT, "OrdersViewModel");
        assert!(adapted.contains("using Xunit;"));
        assert!(adapted.contains("[Fact]"));
        assert!(adapted.contains("private OrdersViewModel ordersViewModel;"));
        assert!(!adapted.contains("FirstViewModel"));
    }
}
