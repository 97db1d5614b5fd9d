//! Shared utilities and helper functions for web UI.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tera::Context;

use crate::web_ui::templates;

/// Helper to render a template
pub fn render_template(name: &str, context: &Context) -> Response {
    match templates::render(name, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e),
            )
                .into_response()
        }
    }
}

/// Redirect carrying a transient status message in the query string,
/// rendered as an alert banner by the next page.
pub fn redirect_flash(path: &str, kind: &str, message: &str) -> Response {
    let sep = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{}{}{}={}",
        path,
        sep,
        kind,
        urlencoding::encode(message)
    ))
    .into_response()
}

/// Transient status messages passed back through the redirect query string.
#[derive(serde::Deserialize, Default)]
pub struct StatusQuery {
    pub success: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub info: Option<String>,
}

impl StatusQuery {
    pub fn apply(&self, context: &mut Context) {
        if let Some(success) = &self.success {
            context.insert("success", success);
        }
        if let Some(warning) = &self.warning {
            context.insert("warning", warning);
        }
        if let Some(error) = &self.error {
            context.insert("error", error);
        }
        if let Some(info) = &self.info {
            context.insert("info", info);
        }
    }
}

/// Trim a form field; empty-after-trim means the field is missing.
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an optional owner reference. Empty string means "no owner";
/// non-numeric input is treated the same rather than failing the request.
pub fn parse_owner(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse().ok()
    }
}

/// Current unix timestamp in seconds
pub fn now_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Format seconds ago as a human-readable Portuguese string
pub fn format_time_ago(seconds: i64) -> String {
    if seconds < 60 {
        return "agora mesmo".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("há {} min", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("há {} h", hours);
    }
    let days = hours / 24;
    if days < 30 {
        return format!("há {} dia{}", days, if days == 1 { "" } else { "s" });
    }
    let months = days / 30;
    if months < 12 {
        return format!("há {} mês{}", months, if months == 1 { "" } else { "es" });
    }
    let years = months / 12;
    format!("há {} ano{}", years, if years == 1 { "" } else { "s" })
}

/// Format a unix timestamp as a relative time string
pub fn format_relative_time(timestamp: i64) -> String {
    format_time_ago(now_timestamp() - timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_whitespace() {
        assert_eq!(non_empty("  Ana Silva "), Some("Ana Silva".to_string()));
        assert_eq!(non_empty("ana"), Some("ana".to_string()));
    }

    #[test]
    fn non_empty_rejects_blank_fields() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty("\t\n"), None);
    }

    #[test]
    fn parse_owner_handles_empty_and_garbage() {
        assert_eq!(parse_owner(""), None);
        assert_eq!(parse_owner("  "), None);
        assert_eq!(parse_owner("abc"), None);
        assert_eq!(parse_owner("7"), Some(7));
        assert_eq!(parse_owner(" 12 "), Some(12));
    }

    #[test]
    fn time_ago_buckets() {
        assert_eq!(format_time_ago(10), "agora mesmo");
        assert_eq!(format_time_ago(120), "há 2 min");
        assert_eq!(format_time_ago(3 * 3600), "há 3 h");
        assert_eq!(format_time_ago(86_400), "há 1 dia");
    }
}
