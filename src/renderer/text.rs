//! Plain-text dump of a laid-out form

use crate::layout::{ControlId, ControlTree, Form};

/// One line per placed control, parents first: `path x,y wxh`.
///
/// Positions are absolute. The path joins the names from the root down
/// with `/`.
pub fn render_text(form: &Form) -> String {
    let tree = form.tree();
    form.snapshot()
        .iter()
        .map(|(id, placement)| {
            let bounds = placement.bounds;
            format!(
                "{} {},{} {}x{}",
                control_path(tree, id),
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn control_path(tree: &ControlTree, id: ControlId) -> String {
    let mut segments = Vec::new();
    let mut current = Some(id);
    while let Some(id) = current {
        segments.push(tree.label(id));
        current = tree.control(id).and_then(|control| control.parent());
    }
    segments.reverse();
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Coord;

    #[test]
    fn test_render_text() {
        let mut form = Form::default();
        form.resize(300, 100);
        let root = form.root();
        let tree = form.tree_mut();
        let panel = tree.add_control(root, "panel").unwrap();
        let ok = tree.add_control(panel, "ok").unwrap();
        tree.fix(panel, Coord::X2, 0.0).unwrap();
        tree.fix(ok, Coord::W, 40.0).unwrap();
        form.layout().unwrap();

        assert_eq!(
            render_text(&form),
            "root 0,0 300x100\nroot/panel 260,0 40x30\nroot/panel/ok 260,0 40x30"
        );
    }

    #[test]
    fn test_empty_before_first_layout() {
        assert_eq!(render_text(&Form::default()), "");
    }
}
