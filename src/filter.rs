//! Flavor list filtering and the dough/filling combo suggestion.

/// Visible items and the count label for a filter query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult<'a> {
    pub visible: Vec<&'a str>,
    /// `"<n> resultados"`, or `None` when the query is blank.
    pub label: Option<String>,
}

/// Case-insensitive substring filter over flavor names.
///
/// The query is trimmed first; a blank query shows everything.
pub fn filter_flavors<'a, S: AsRef<str>>(items: &'a [S], query: &str) -> FilterResult<'a> {
    let query = query.trim().to_lowercase();
    let mut visible = Vec::new();
    for item in items {
        let name: &str = item.as_ref();
        if query.is_empty() || name.to_lowercase().contains(&query) {
            visible.push(name);
        }
    }
    let label = (!query.is_empty()).then(|| format!("{} resultados", visible.len()));
    FilterResult { visible, label }
}

pub fn combo_preview(dough: &str, filling: &str) -> String {
    format!(
        "Sugestão, massa {} com recheio de {}.",
        dough.to_lowercase(),
        filling.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAVORS: &[&str] = &["Brigadeiro", "Ninho com Nutella", "Doce de Leite", "Morango"];

    #[test]
    fn blank_query_shows_all_without_label() {
        let result = filter_flavors(FLAVORS, "   ");
        assert_eq!(result.visible.len(), 4);
        assert_eq!(result.label, None);
    }

    #[test]
    fn query_matches_case_insensitively() {
        let result = filter_flavors(FLAVORS, " NINHO ");
        assert_eq!(result.visible, vec!["Ninho com Nutella"]);
        assert_eq!(result.label.as_deref(), Some("1 resultados"));
    }

    #[test]
    fn query_matches_substrings() {
        let result = filter_flavors(FLAVORS, "de");
        assert_eq!(result.visible, vec!["Brigadeiro", "Doce de Leite"]);
        assert_eq!(result.label.as_deref(), Some("2 resultados"));
    }

    #[test]
    fn no_match_reports_zero() {
        let result = filter_flavors(FLAVORS, "pistache");
        assert!(result.visible.is_empty());
        assert_eq!(result.label.as_deref(), Some("0 resultados"));
    }

    #[test]
    fn combo_preview_lowercases_choices() {
        assert_eq!(
            combo_preview("Chocolate", "Doce de Leite"),
            "Sugestão, massa chocolate com recheio de doce de leite."
        );
    }
}
