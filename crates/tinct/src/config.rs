use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, NameKind};
use crate::primaries::Primaries;
use crate::processor::Processor;
use crate::transfer::Transfer;

/// Role that names the canonical scene-referred working space.
pub const SCENE_LINEAR: &str = "scene_linear";

const SUPPORTED_VERSION: u32 = 1;

/// An immutable, parsed color-management configuration.
///
/// Loading validates the whole document up front; a `Config` in hand is
/// always fully valid. It is never mutated after load, so shared
/// references may be used freely across threads.
#[derive(Debug)]
pub struct Config {
    doc: Document,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    version: u32,
    #[serde(default)]
    roles: BTreeMap<String, String>,
    #[serde(default)]
    colorspaces: Vec<ColorSpaceDef>,
    #[serde(default)]
    displays: Vec<DisplayDef>,
}

/// A declared color space: a primary set plus a transfer characteristic.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ColorSpaceDef {
    pub(crate) name: String,
    pub(crate) primaries: Primaries,
    #[serde(default)]
    pub(crate) transfer: Transfer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct DisplayDef {
    name: String,
    views: Vec<ViewDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewDef {
    name: String,
    colorspace: String,
}

impl Config {
    /// Load and validate a configuration document from a file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration document held in memory.
    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        let doc: Document = serde_yaml::from_str(text)?;
        validate(&doc)?;
        Ok(Self { doc })
    }

    /// Names of every declared color space, in declaration order.
    pub fn color_space_names(&self) -> Vec<&str> {
        self.doc.colorspaces.iter().map(|c| c.name.as_str()).collect()
    }

    /// Declared displays, in declaration order. Empty if none declared.
    pub fn displays(&self) -> Vec<&str> {
        self.doc.displays.iter().map(|d| d.name.as_str()).collect()
    }

    /// The first declared display, if any.
    pub fn default_display(&self) -> Option<&str> {
        self.doc.displays.first().map(|d| d.name.as_str())
    }

    /// Declared views for `display`, in declaration order.
    ///
    /// Unlike an empty display list, an unknown display name is an
    /// error rather than an empty sequence.
    pub fn views(&self, display: &str) -> Result<Vec<&str>, Error> {
        let display = self.display(display)?;
        Ok(display.views.iter().map(|v| v.name.as_str()).collect())
    }

    /// The first declared view for `display`.
    pub fn default_view(&self, display: &str) -> Result<&str, Error> {
        // validate() guarantees every display declares at least one view
        let display = self.display(display)?;
        Ok(&display.views[0].name)
    }

    /// Resolve a role to the color-space name it is bound to.
    pub fn role(&self, role: &str) -> Result<&str, Error> {
        self.doc
            .roles
            .get(role)
            .map(String::as_str)
            .ok_or_else(|| Error::unknown(NameKind::Role, role))
    }

    /// Build the forward processor between two color-space names.
    ///
    /// Potentially expensive; build once and reuse, never per pixel.
    pub fn processor(&self, src: &str, dst: &str) -> Result<Processor, Error> {
        let src_def = self.color_space(src)?;
        let dst_def = self.color_space(dst)?;
        let processor = Processor::build(src_def, dst_def)?;
        tracing::debug!("built processor {src} -> {dst}");
        Ok(processor)
    }

    /// Build the forward processor from the `scene_linear` role to the
    /// named display and view.
    pub fn display_view_processor(&self, display: &str, view: &str) -> Result<Processor, Error> {
        let src = self.role(SCENE_LINEAR)?;
        let display_def = self.display(display)?;
        let view_def = display_def
            .views
            .iter()
            .find(|v| v.name == view)
            .ok_or_else(|| Error::unknown(NameKind::View, view))?;
        self.processor(src, &view_def.colorspace)
    }

    fn display(&self, name: &str) -> Result<&DisplayDef, Error> {
        self.doc
            .displays
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::unknown(NameKind::Display, name))
    }

    fn color_space(&self, name: &str) -> Result<&ColorSpaceDef, Error> {
        self.doc
            .colorspaces
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::unknown(NameKind::ColorSpace, name))
    }
}

/// Reject structurally broken documents so that a constructed `Config`
/// never needs re-checking at query time.
fn validate(doc: &Document) -> Result<(), Error> {
    if doc.version != SUPPORTED_VERSION {
        return Err(Error::Invalid(format!(
            "unsupported config version {}",
            doc.version
        )));
    }

    let mut seen: Vec<&str> = Vec::with_capacity(doc.colorspaces.len());
    for cs in &doc.colorspaces {
        if seen.contains(&cs.name.as_str()) {
            return Err(Error::Invalid(format!(
                "duplicate color space `{}`",
                cs.name
            )));
        }
        seen.push(&cs.name);
    }

    for (role, target) in &doc.roles {
        if !seen.contains(&target.as_str()) {
            return Err(Error::Invalid(format!(
                "role `{role}` refers to undeclared color space `{target}`"
            )));
        }
    }

    let mut display_names: Vec<&str> = Vec::with_capacity(doc.displays.len());
    for display in &doc.displays {
        if display_names.contains(&display.name.as_str()) {
            return Err(Error::Invalid(format!(
                "duplicate display `{}`",
                display.name
            )));
        }
        display_names.push(&display.name);

        if display.views.is_empty() {
            return Err(Error::Invalid(format!(
                "display `{}` declares no views",
                display.name
            )));
        }
        for view in &display.views {
            if !seen.contains(&view.colorspace.as_str()) {
                return Err(Error::Invalid(format!(
                    "view `{}` of display `{}` refers to undeclared color space `{}`",
                    view.name, display.name, view.colorspace
                )));
            }
        }
    }

    Ok(())
}
