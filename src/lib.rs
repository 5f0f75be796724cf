//! Formwork - constraint-based layout for trees of controls
//!
//! Controls are positioned by declaring relationships between their edges
//! and sizes rather than absolute rectangles. A container owns the
//! constraints between its children and resolves them with an iterative
//! fixed point: static values, edge alignment, proportional fill, and
//! sizing to content.
//!
//! # Example
//!
//! ```rust
//! use formwork::render;
//!
//! let svg = render(r#"
//! [form]
//! width = 200
//! height = 100
//!
//! [[control]]
//! name = "button"
//!
//! [[constraint]]
//! kind = "static"
//! target = "button.x2"
//! value = 10
//! "#).unwrap();
//! assert!(svg.contains(r#"id="button""#));
//! ```

pub mod description;
pub mod error;
pub mod layout;
pub mod renderer;

pub use description::FormDescription;
pub use error::DescriptionError;
pub use layout::{
    Axis, ControlId, ControlTree, Coord, Form, LayoutConfig, LayoutError, LayoutSnapshot, Rect,
};
pub use renderer::{render_svg, render_text, SvgConfig};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// The description could not be read or built
    #[error(transparent)]
    Description(#[from] DescriptionError),

    /// The layout pass failed
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Enable or disable control name labels
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.svg.debug = debug;
        self
    }
}

/// Build a form from a TOML description and lay it out once
///
/// # Example
///
/// ```rust
/// use formwork::{layout_description, render_text, LayoutConfig};
///
/// let form = layout_description(r#"
/// [form]
/// width = 300
///
/// [[control]]
/// name = "a"
///
/// [[control]]
/// name = "b"
///
/// [[constraint]]
/// kind = "fill"
/// controls = ["a", "b"]
/// coord = "w"
///
/// [[constraint]]
/// kind = "static"
/// target = "a.x"
/// value = 0
///
/// [[constraint]]
/// kind = "align"
/// target = "b.x"
/// source = "a.xw"
///
/// [[constraint]]
/// kind = "static"
/// target = "b.x2"
/// value = 0
/// "#, &LayoutConfig::default()).unwrap();
///
/// let b = form.tree().find("b").unwrap();
/// assert_eq!(form.snapshot().bounds(b).map(|r| (r.x, r.width)), Some((150, 150)));
/// ```
pub fn layout_description(source: &str, config: &LayoutConfig) -> Result<Form, RenderError> {
    let description = FormDescription::from_str(source)?;
    let mut form = description.build(config.clone())?;
    form.layout()?;
    Ok(form)
}

/// Render a TOML form description to SVG with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a TOML form description to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use formwork::{render_with_config, LayoutConfig, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::default().with_default_size(40, 20))
///     .with_svg(SvgConfig::default().with_viewbox_padding(0.0));
///
/// let svg = render_with_config("[[control]]\nname = \"a\"\n", config).unwrap();
/// assert!(svg.contains(r#"viewBox="0 0 40 20""#));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let form = layout_description(source, &config.layout)?;
    Ok(render_svg(&form, &config.svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_form() {
        let svg = render("[[control]]\nname = \"server\"\n").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains(r#"id="server""#));
    }

    #[test]
    fn test_render_description_error() {
        let err = render("[[control]]\nparent = \"nowhere\"\nname = \"a\"\n").unwrap_err();
        assert!(matches!(
            err,
            RenderError::Description(DescriptionError::UnknownControl { .. })
        ));
    }

    #[test]
    fn test_render_layout_error() {
        let source = r#"
[[control]]
name = "a"

[[constraint]]
kind = "static"
target = "a.x"
value = 10

[[constraint]]
kind = "static"
target = "a.w"
value = 20

[[constraint]]
kind = "static"
target = "a.xw"
value = 40
"#;
        let err = render(source).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Layout(LayoutError::Overspecified { .. })
        ));
    }

    #[test]
    fn test_render_with_debug_labels() {
        let config = RenderConfig::new().with_debug(true);
        let svg = render_with_config("[[control]]\nname = \"a\"\n", config).unwrap();
        assert!(svg.contains(">a</text>"));
    }
}
