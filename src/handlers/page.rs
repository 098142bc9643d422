//! The screening form page
//!
//! One numeric input per schema feature, pre-filled with the training-data
//! defaults. Age comes first; the remaining task metrics sit in a
//! collapsible section. Submission posts the fields as JSON and renders
//! the outcome (or the validation error) inline.

use axum::{extract::State, response::Html};

use crate::AppState;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut age_field = String::new();
    let mut task_fields = String::new();

    for name in state.artifact.schema.names() {
        let default = state.artifact.defaults.value_for(name);
        let field = render_field(name, default);
        if name.eq_ignore_ascii_case("age") {
            age_field.push_str(&field);
        } else {
            task_fields.push_str(&field);
        }
    }

    Html(
        PAGE_TEMPLATE
            .replace("<!--AGE_FIELD-->", &age_field)
            .replace("<!--TASK_FIELDS-->", &task_fields),
    )
}

const PAGE_TEMPLATE: &str = include_str!("page.html");

fn render_field(name: &str, default: f64) -> String {
    let escaped = escape(name);
    format!(
        r#"<label>{escaped}
  <input type="number" step="any" data-feature="{escaped}" value="{default}">
</label>
"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_field() {
        let field = render_field("Clicks", 50.0);
        assert!(field.contains(r#"data-feature="Clicks""#));
        assert!(field.contains(r#"value="50""#));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>"c"&d"#), "a&lt;b&gt;&quot;c&quot;&amp;d");
    }
}
