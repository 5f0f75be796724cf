//! Errors for loading form descriptions and configuration

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::layout::LayoutError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {}", .0.message())]
    Toml(#[from] toml::de::Error),

    #[error("unknown control '{name}'")]
    UnknownControl {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    #[error("duplicate control '{name}'")]
    DuplicateControl { name: String, span: Span },

    #[error("{kind} constraint is missing '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
        span: Span,
    },

    #[error("{source}")]
    Layout { source: LayoutError, span: Span },
}

impl DescriptionError {
    /// Source range the error points at, when there is one
    pub fn span(&self) -> Option<Span> {
        match self {
            DescriptionError::Io(_) => None,
            DescriptionError::Toml(err) => err.span(),
            DescriptionError::UnknownControl { span, .. }
            | DescriptionError::DuplicateControl { span, .. }
            | DescriptionError::MissingField { span, .. }
            | DescriptionError::Layout { span, .. } => Some(span.clone()),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("Error: {}", self);
        };

        let note = match self {
            DescriptionError::UnknownControl { suggestions, .. } if !suggestions.is_empty() => {
                Some(format!("did you mean: {}?", suggestions.join(", ")))
            }
            DescriptionError::UnknownControl { .. } => {
                Some("controls must be declared before they are referenced".to_string())
            }
            _ => None,
        };

        let message = self.to_string();
        let mut report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            );
        if let Some(note) = note {
            report = report.with_note(note);
        }

        let mut buf = Vec::new();
        if report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .is_err()
        {
            return format!("Error: {}", self);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_points_at_span() {
        let source = "[[control]]\nname = \"a\"\nparent = \"pnael\"\n";
        let err = DescriptionError::UnknownControl {
            name: "pnael".to_string(),
            span: 32..39,
            suggestions: vec!["panel".to_string()],
        };
        let report = err.format(source, "form.toml");
        assert!(report.contains("unknown control 'pnael'"));
        assert!(report.contains("did you mean: panel?"));
        assert!(report.contains("form.toml"));
    }

    #[test]
    fn test_format_without_span() {
        let err = DescriptionError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.format("", "form.toml"), "Error: failed to read file: gone");
    }

    #[test]
    fn test_layout_error_is_transparent() {
        let err = DescriptionError::Layout {
            source: LayoutError::DetachRoot,
            span: 0..1,
        };
        assert_eq!(err.to_string(), LayoutError::DetachRoot.to_string());
    }
}
