//! Renderers for laid-out forms
//!
//! Both renderers read the form's last layout snapshot; they never trigger
//! a layout pass themselves.

pub mod config;
pub mod svg;
pub mod text;

pub use config::SvgConfig;
pub use svg::render_svg;
pub use text::render_text;
