//! SVG outline of a laid-out form

use crate::layout::{ControlId, ControlTree, Form, LayoutSnapshot, Rect};

use super::SvgConfig;

/// Writes the SVG body line by line, tracking group nesting
pub struct SvgBuilder {
    config: SvgConfig,
    prefix: String,
    body: String,
    depth: usize,
}

impl SvgBuilder {
    pub fn new(config: SvgConfig) -> Self {
        let prefix = config.class_prefix.clone().unwrap_or_default();
        Self {
            config,
            prefix,
            body: String::new(),
            depth: 1,
        }
    }

    /// Class name with the configured prefix
    fn class(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn line(&mut self, text: &str) {
        if self.config.pretty_print {
            self.body.push_str(&"  ".repeat(self.depth));
        }
        self.body.push_str(text);
        if self.config.pretty_print {
            self.body.push('\n');
        }
    }

    pub fn add_outline(&mut self, bounds: Rect) {
        let text = format!(
            r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.class("outline"),
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        );
        self.line(&text);
    }

    /// Add a text label anchored at its top-left corner
    pub fn add_label(&mut self, text: &str, x: i32, y: i32) {
        let text = format!(
            r#"<text class="{}" x="{}" y="{}" dominant-baseline="hanging">{}</text>"#,
            self.class("label"),
            x,
            y,
            escape_xml(text)
        );
        self.line(&text);
    }

    /// Open a `<g>` for one control; closed by [`SvgBuilder::close_group`]
    pub fn open_group(&mut self, id: Option<&str>, classes: &[String]) {
        let mut text = String::from("<g");
        if let Some(id) = id {
            text.push_str(&format!(r#" id="{}""#, escape_xml(id)));
        }
        if !classes.is_empty() {
            text.push_str(&format!(r#" class="{}""#, classes.join(" ")));
        }
        text.push('>');
        self.line(&text);
        self.depth += 1;
    }

    pub fn close_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("</g>");
    }

    /// Wrap the body in an `<svg>` element whose viewBox is `viewbox` plus padding
    pub fn finish(self, viewbox: Rect) -> String {
        let padding = self.config.viewbox_padding;
        let nl = if self.config.pretty_print { "\n" } else { "" };

        let mut svg = String::new();
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">{}"#,
            f64::from(viewbox.x) - padding,
            f64::from(viewbox.y) - padding,
            f64::from(viewbox.width) + 2.0 * padding,
            f64::from(viewbox.height) + 2.0 * padding,
            nl
        ));
        svg.push_str(&format!(
            "<style>.{p}outline {{ fill: none; stroke: #333333; stroke-width: 1; }} \
             .{p}label {{ font-family: monospace; font-size: 10px; fill: #999999; }}</style>{nl}",
            p = self.prefix,
            nl = nl
        ));
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

/// Render the form's last layout as nested outlined rectangles
///
/// Each placed control becomes a `<g>` (with `id` set to the control's
/// name) holding its outline followed by its children's groups. Helper
/// controls and controls that could not be fully placed are left out.
pub fn render_svg(form: &Form, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());

    let tree = form.tree();
    let snapshot = form.snapshot();
    render_control(tree, snapshot, tree.root(), config.debug, &mut builder);

    let viewbox = snapshot.bounds(tree.root()).unwrap_or_default();
    builder.finish(viewbox)
}

fn render_control(
    tree: &ControlTree,
    snapshot: &LayoutSnapshot,
    id: ControlId,
    debug: bool,
    builder: &mut SvgBuilder,
) {
    let (Some(control), Some(bounds)) = (tree.control(id), snapshot.bounds(id)) else {
        return;
    };

    let mut classes = vec![builder.class("control")];
    if !tree.controls().content_children(id).is_empty() {
        classes.push(builder.class("container"));
    }

    builder.open_group(control.name(), &classes);
    builder.add_outline(bounds);
    if debug {
        if let Some(name) = control.name() {
            builder.add_label(name, bounds.x.saturating_add(2), bounds.y.saturating_add(2));
        }
    }
    for child in control.children() {
        render_control(tree, snapshot, *child, debug, builder);
    }
    builder.close_group();
}

fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
