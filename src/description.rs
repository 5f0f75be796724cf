//! Declarative form descriptions
//!
//! A description is a TOML document listing controls (parents first) and
//! the constraints between them. [`FormDescription::build`] turns it into a
//! [`Form`] ready for layout. Every name reference keeps its source span so
//! problems can be reported against the document.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use toml::Spanned;

use crate::error::{DescriptionError, Span};
use crate::layout::{Axis, Coord, ControlId, Form, LayoutConfig, LayoutError, UnknownCoord};

/// A parsed form description
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormDescription {
    #[serde(default)]
    pub form: FormSection,
    #[serde(default, rename = "control")]
    pub controls: Vec<ControlDecl>,
    #[serde(default, rename = "constraint")]
    pub constraints: Vec<ConstraintDecl>,
}

/// Viewport of the form; a missing axis is fitted to the content
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSection {
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlDecl {
    pub name: Spanned<String>,
    pub parent: Option<Spanned<String>>,
    /// Measured width
    pub width: Option<i32>,
    /// Measured height
    pub height: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Static,
    Align,
    Fill,
    Content,
    Center,
}

impl DeclKind {
    fn as_str(self) -> &'static str {
        match self {
            DeclKind::Static => "static",
            DeclKind::Align => "align",
            DeclKind::Fill => "fill",
            DeclKind::Content => "content",
            DeclKind::Center => "center",
        }
    }
}

/// One `[[constraint]]` table. Which fields are read depends on `kind`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintDecl {
    pub kind: Spanned<DeclKind>,
    pub target: Option<Spanned<CoordRef>>,
    pub value: Option<f64>,
    pub source: Option<Spanned<CoordRef>>,
    #[serde(default)]
    pub offset: i32,
    #[serde(default)]
    pub controls: Vec<Spanned<String>>,
    pub coord: Option<Coord>,
    pub ratios: Option<Vec<f64>>,
    #[serde(default)]
    pub padding: i32,
    #[serde(default)]
    pub minimum: i32,
    pub control: Option<Spanned<String>>,
    pub axis: Option<Axis>,
}

/// A `name.coord` reference such as `button.xw`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CoordRef {
    pub control: String,
    pub coord: Coord,
}

#[derive(Debug, Error)]
pub enum CoordRefError {
    #[error("expected 'control.coord', found '{0}'")]
    Malformed(String),
    #[error(transparent)]
    Coord(#[from] UnknownCoord),
}

impl FromStr for CoordRef {
    type Err = CoordRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (control, coord) = s
            .rsplit_once('.')
            .filter(|(control, _)| !control.is_empty())
            .ok_or_else(|| CoordRefError::Malformed(s.to_string()))?;
        Ok(Self {
            control: control.to_string(),
            coord: coord.parse()?,
        })
    }
}

impl TryFrom<String> for CoordRef {
    type Error = CoordRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FormDescription {
    pub fn from_str(content: &str) -> Result<Self, DescriptionError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, DescriptionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Create the described controls and constraints on a new form
    pub fn build(&self, config: LayoutConfig) -> Result<Form, DescriptionError> {
        let mut form = Form::new(config);
        if self.form.width.is_some() || self.form.height.is_some() {
            let root = form.root();
            form.tree_mut()
                .set_measured_size(root, self.form.width, self.form.height)
                .map_err(|source| DescriptionError::Layout { source, span: 0..0 })?;
        }

        let mut names = Names::new(form.root());
        for decl in &self.controls {
            names.ensure_new(&decl.name)?;
            let parent = match &decl.parent {
                Some(parent) => names.resolve(parent)?,
                None => form.root(),
            };
            let span = decl.name.span();
            let id = form
                .tree_mut()
                .add_control(parent, decl.name.get_ref().clone())
                .map_err(|source| DescriptionError::Layout {
                    source,
                    span: span.clone(),
                })?;
            if decl.width.is_some() || decl.height.is_some() {
                form.tree_mut()
                    .set_measured_size(id, decl.width, decl.height)
                    .map_err(|source| DescriptionError::Layout {
                        source,
                        span: span.clone(),
                    })?;
            }
            names.define(&decl.name, id);
        }

        for decl in &self.constraints {
            add_constraint(&mut form, &names, decl)?;
        }

        tracing::debug!(
            controls = self.controls.len(),
            constraints = form.tree().constraint_count(),
            "form description built"
        );
        Ok(form)
    }
}

/// Control names seen so far
struct Names {
    ids: HashMap<String, ControlId>,
}

impl Names {
    fn new(root: ControlId) -> Self {
        let mut ids = HashMap::new();
        ids.insert("root".to_string(), root);
        Self { ids }
    }

    fn ensure_new(&self, name: &Spanned<String>) -> Result<(), DescriptionError> {
        if self.ids.contains_key(name.get_ref()) {
            return Err(DescriptionError::DuplicateControl {
                name: name.get_ref().clone(),
                span: name.span(),
            });
        }
        Ok(())
    }

    fn define(&mut self, name: &Spanned<String>, id: ControlId) {
        self.ids.insert(name.get_ref().clone(), id);
    }

    fn lookup(&self, name: &str, span: Span) -> Result<ControlId, DescriptionError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| DescriptionError::UnknownControl {
                name: name.to_string(),
                span,
                suggestions: find_similar(self.ids.keys(), name, 2),
            })
    }

    fn resolve(&self, name: &Spanned<String>) -> Result<ControlId, DescriptionError> {
        self.lookup(name.get_ref(), name.span())
    }

    fn resolve_coord(&self, target: &Spanned<CoordRef>) -> Result<(ControlId, Coord), DescriptionError> {
        let id = self.lookup(&target.get_ref().control, target.span())?;
        Ok((id, target.get_ref().coord))
    }
}

fn add_constraint(form: &mut Form, names: &Names, decl: &ConstraintDecl) -> Result<(), DescriptionError> {
    let kind = *decl.kind.get_ref();
    let span = decl.kind.span();
    let missing = |field: &'static str| DescriptionError::MissingField {
        kind: kind.as_str(),
        field,
        span: span.clone(),
    };
    let layout_error = |source: LayoutError| DescriptionError::Layout {
        source,
        span: span.clone(),
    };

    let tree = form.tree_mut();
    match kind {
        DeclKind::Static => {
            let target = decl.target.as_ref().ok_or_else(|| missing("target"))?;
            let value = decl.value.ok_or_else(|| missing("value"))?;
            let (control, coord) = names.resolve_coord(target)?;
            tree.fix(control, coord, value).map_err(layout_error)?;
        }
        DeclKind::Align => {
            let target = decl.target.as_ref().ok_or_else(|| missing("target"))?;
            let source = decl.source.as_ref().ok_or_else(|| missing("source"))?;
            let (control, coord) = names.resolve_coord(target)?;
            let (source, source_coord) = names.resolve_coord(source)?;
            tree.align(control, coord, source, source_coord, decl.offset)
                .map_err(layout_error)?;
        }
        DeclKind::Fill => {
            let coord = decl.coord.ok_or_else(|| missing("coord"))?;
            let controls = decl
                .controls
                .iter()
                .map(|name| names.resolve(name))
                .collect::<Result<Vec<_>, _>>()?;
            let added = match &decl.ratios {
                Some(ratios) => tree.fill_with_ratios(&controls, coord, ratios),
                None => tree.fill(&controls, coord),
            };
            added.map_err(layout_error)?;
        }
        DeclKind::Content => {
            let target = decl.target.as_ref().ok_or_else(|| missing("target"))?;
            let (control, coord) = names.resolve_coord(target)?;
            tree.fit_content(control, coord, decl.padding, decl.minimum)
                .map_err(layout_error)?;
        }
        DeclKind::Center => {
            let control = decl.control.as_ref().ok_or_else(|| missing("control"))?;
            let axis = decl.axis.ok_or_else(|| missing("axis"))?;
            let control = names.resolve(control)?;
            tree.center(control, axis).map_err(layout_error)?;
        }
    }
    Ok(())
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Names within a small edit distance of `target`, closest first
fn find_similar<'a>(
    defined: impl Iterator<Item = &'a String>,
    target: &str,
    max_distance: usize,
) -> Vec<String> {
    let mut candidates: Vec<(String, usize)> = defined
        .filter_map(|name| {
            let distance = levenshtein_distance(name, target);
            (distance > 0 && distance <= max_distance).then(|| (name.clone(), distance))
        })
        .collect();
    candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    candidates.into_iter().map(|(name, _)| name).take(3).collect()
}
