//! Placeholder substitution.
//!
//! Rendering is a single left-to-right pass over the *original* template.
//! At every position the earliest token match wins (longest token on a tie)
//! and the substituted value is copied to the output without being scanned
//! again, so one variable's value can never trigger another substitution.
//!
//! # Edge Cases
//!
//! - `{{UNKNOWN}}` → remains as literal `{{UNKNOWN}}` (no error)
//! - `{{A}}{{A}}` → both replaced
//! - `{{A}}` bound to `"{{B}}"` → output contains the literal `{{B}}`

use crate::domain::snippet::{PlaceholderSyntax, ReplacementVariables, SnippetTemplate};

/// Binds replacement variables into templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetRenderer {
    syntax: PlaceholderSyntax,
}

impl SnippetRenderer {
    pub fn new(syntax: PlaceholderSyntax) -> Self {
        Self { syntax }
    }

    /// Renderer for literal token replacement (no delimiters).
    pub fn literal() -> Self {
        Self::new(PlaceholderSyntax::bare())
    }

    pub fn syntax(&self) -> &PlaceholderSyntax {
        &self.syntax
    }

    /// Render a loaded template.
    pub fn render_template(&self, template: &SnippetTemplate, vars: &ReplacementVariables) -> String {
        self.render(template.text(), vars)
    }

    /// Render raw template text.
    pub fn render(&self, template: &str, vars: &ReplacementVariables) -> String {
        let substitutions: Vec<(String, &str)> = vars
            .iter()
            .filter_map(|v| self.syntax.token(&v.key).map(|t| (t, v.value.as_str())))
            .collect();

        if substitutions.is_empty() {
            return template.to_string();
        }

        let mut output = String::with_capacity(template.len());
        let mut cursor = 0;
        let mut next: Vec<Option<usize>> = substitutions
            .iter()
            .map(|(token, _)| template.find(token.as_str()))
            .collect();

        while let Some((index, start)) = earliest(&next, &substitutions) {
            let (token, value) = &substitutions[index];

            output.push_str(&template[cursor..start]);
            output.push_str(value);
            cursor = start + token.len();

            // Only tokens overtaken by the cursor are searched again.
            for (slot, (token, _)) in next.iter_mut().zip(&substitutions) {
                if matches!(*slot, Some(position) if position < cursor) {
                    *slot = template[cursor..]
                        .find(token.as_str())
                        .map(|offset| cursor + offset);
                }
            }
        }
        output.push_str(&template[cursor..]);

        output
    }
}

/// `(substitution index, position)` of the earliest pending match; the
/// longest token wins a tie.
fn earliest(next: &[Option<usize>], substitutions: &[(String, &str)]) -> Option<(usize, usize)> {
    next.iter()
        .enumerate()
        .filter_map(|(index, position)| position.map(|p| (index, p)))
        .min_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| substitutions[b.0].0.len().cmp(&substitutions[a.0].0.len()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> ReplacementVariables {
        pairs.iter().copied().collect()
    }

    #[test]
    fn replaces_every_occurrence() {
        let r = SnippetRenderer::default();
        let out = r.render(
            "{{CommandName}} / {{CommandName}}",
            &vars(&[("CommandName", "OrdersCommand")]),
        );
        assert_eq!(out, "OrdersCommand / OrdersCommand");
    }

    #[test]
    fn unresolved_placeholders_pass_through() {
        let r = SnippetRenderer::default();
        let out = r.render("{{Known}} {{Unknown}}", &vars(&[("Known", "k")]));
        assert_eq!(out, "k {{Unknown}}");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let r = SnippetRenderer::default();
        let out = r.render("{{A}}-{{B}}", &vars(&[("A", "{{B}}"), ("B", "b")]));
        assert_eq!(out, "{{B}}-b");
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let r = SnippetRenderer::default();
        let template = "{{ViewModelName}} uses {{CommandName}} as {{CommandNameInstance}}";
        let a = vars(&[
            ("ViewModelName", "OrdersViewModel"),
            ("CommandName", "OrdersCommand"),
            ("CommandNameInstance", "ordersCommand"),
        ]);
        let b = vars(&[
            ("CommandNameInstance", "ordersCommand"),
            ("CommandName", "OrdersCommand"),
            ("ViewModelName", "OrdersViewModel"),
        ]);
        assert_eq!(r.render(template, &a), r.render(template, &b));
        assert_eq!(
            r.render(template, &a),
            "OrdersViewModel uses OrdersCommand as ordersCommand"
        );
    }

    #[test]
    fn rerender_is_stable() {
        let r = SnippetRenderer::default();
        let v = vars(&[("Name", "Orders")]);
        let once = r.render("x {{Name}} {{Other}}", &v);
        assert_eq!(r.render(&once, &v), once);
    }

    #[test]
    fn literal_tokens_prefer_longest_match() {
        let r = SnippetRenderer::literal();
        let out = r.render(
            "Command CommandName",
            &vars(&[("Command", "C"), ("CommandName", "N")]),
        );
        assert_eq!(out, "C N");
    }

    #[test]
    fn literal_paired_case_tokens() {
        let r = SnippetRenderer::literal();
        let out = r.render(
            "FirstViewModel firstViewModel = new FirstViewModel();",
            &vars(&[
                ("FirstViewModel", "OrdersViewModel"),
                ("firstViewModel", "ordersViewModel"),
            ]),
        );
        assert_eq!(out, "OrdersViewModel ordersViewModel = new OrdersViewModel();");
    }

    #[test]
    fn empty_variables_return_template() {
        let r = SnippetRenderer::default();
        assert_eq!(r.render("{{A}}", &ReplacementVariables::new()), "{{A}}");
    }

    #[test]
    fn renders_loaded_template() {
        let r = SnippetRenderer::default();
        let t = SnippetTemplate::new("nav", "Show{{ViewModelName}}");
        assert_eq!(
            r.render_template(&t, &vars(&[("ViewModelName", "Orders")])),
            "ShowOrders"
        );
    }

    #[test]
    fn long_templates_render_every_token() {
        let r = SnippetRenderer::default();
        let template = "{{A}}.{{B}};".repeat(5_000);
        let out = r.render(&template, &vars(&[("A", "a"), ("B", "{{A}}")]));
        assert_eq!(out, "a.{{A}};".repeat(5_000));
    }
}
