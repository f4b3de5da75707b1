//! Core types for the reconciliation layer
//!
//! This module defines the wire contract shared with the parsing backend
//! (current and legacy component shapes, the parse response envelope) and
//! the editable records the store hands out to the UI.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// Unique identifier for an editable component, stable for the session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub String);

impl ComponentId {
    /// Identity for the `index`-th record of an ingested payload
    pub fn ingested(index: usize) -> Self {
        Self(format!("comp-{}-{}", index, Uuid::new_v4().simple()))
    }

    /// Identity for a record created locally by the user
    pub fn fresh() -> Self {
        Self(format!("comp-new-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Classification of a component's material match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    /// Drawing material matches the order data
    Equal,
    /// Drawing material differs from the order data
    NotEqual,
    /// Component has no counterpart in the order data
    #[default]
    New,
}

impl Status {
    /// Wire name of the status
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Equal => "equal",
            Status::NotEqual => "notEqual",
            Status::New => "new",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(Status::Equal),
            "notEqual" | "not-equal" | "not_equal" => Ok(Status::NotEqual),
            "new" => Ok(Status::New),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// One reconciled component line (current wire shape)
///
/// Every field decodes leniently: a value of the wrong type reads as empty
/// and an unknown status as [`Status::New`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Component {
    /// Position label from the drawing's bill of materials
    #[serde(default, deserialize_with = "crate::lenient::text", skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::string")]
    pub description: String,
    /// Material as read from the PDF (authoritative)
    #[serde(default, deserialize_with = "crate::lenient::string")]
    pub material: String,
    /// Material from the BOM spreadsheet
    #[serde(default, deserialize_with = "crate::lenient::text")]
    pub bom_material: Option<String>,
    /// Material from the manager/order spreadsheet
    #[serde(default, deserialize_with = "crate::lenient::text")]
    pub order_material: Option<String>,
    /// Quantity from the BOM spreadsheet
    #[serde(default, deserialize_with = "crate::lenient::number")]
    pub quantity: Option<f64>,
    /// Quantity from the manager/order spreadsheet
    #[serde(default, deserialize_with = "crate::lenient::number")]
    pub manager_quantity: Option<f64>,
    #[serde(default, deserialize_with = "crate::lenient::status")]
    pub status: Status,
    #[serde(default, deserialize_with = "crate::lenient::text", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Component {
    /// A record with every data field empty, classified as new
    pub fn blank() -> Self {
        Self {
            pos: Some(String::new()),
            note: Some(String::new()),
            ..Self::default()
        }
    }
}

/// Material block of the legacy wire shape
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegacyMaterial {
    #[serde(default, deserialize_with = "crate::lenient::text")]
    pub value: Option<String>,
    #[serde(rename = "isEqual", default, deserialize_with = "crate::lenient::flag")]
    pub is_equal: Option<bool>,
    #[serde(default, deserialize_with = "crate::lenient::text", skip_serializing_if = "Option::is_none")]
    pub from_manager_data: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub new_item: Option<bool>,
}

/// Quantity block of the legacy wire shape
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegacyQuantity {
    #[serde(default, deserialize_with = "crate::lenient::number")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "crate::lenient::flag")]
    pub from_bom: Option<bool>,
}

/// A component in the older nested encoding
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegacyComponent {
    #[serde(default, deserialize_with = "crate::lenient::text", skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default, deserialize_with = "crate::lenient::string")]
    pub description: String,
    pub material: LegacyMaterial,
    #[serde(default, deserialize_with = "crate::lenient::optional", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<LegacyQuantity>,
    #[serde(default, deserialize_with = "crate::lenient::text", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A component as it arrives from the backend, in either encoding
///
/// The encoding is decided once, structurally, when the record is
/// deserialized (see [`crate::normalizer::is_legacy`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireComponent {
    Current(Component),
    Legacy(LegacyComponent),
}

impl WireComponent {
    /// Translate an untyped record into its typed encoding
    ///
    /// A record that is not a JSON object decodes as an empty current record.
    pub fn from_value(value: serde_json::Value) -> Self {
        let decoded = if crate::normalizer::is_legacy(&value) {
            serde_json::from_value(value).map(WireComponent::Legacy)
        } else {
            serde_json::from_value(value).map(WireComponent::Current)
        };
        decoded.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "unreadable component record, keeping it empty");
            WireComponent::Current(Component::default())
        })
    }
}

impl<'de> Deserialize<'de> for WireComponent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(WireComponent::from_value)
    }
}

impl From<Component> for WireComponent {
    fn from(component: Component) -> Self {
        WireComponent::Current(component)
    }
}

/// A `{field, value}` row of the technical parameter table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table1Field {
    #[serde(default, deserialize_with = "crate::lenient::string")]
    pub field: String,
    #[serde(default, deserialize_with = "crate::lenient::string")]
    pub value: String,
}

/// A row of the drawing's information block
pub type Table3Row = BTreeMap<String, String>;

/// The three tables extracted from a drawing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedData {
    /// Dimensions and technical parameters
    #[serde(default, deserialize_with = "crate::lenient::rows")]
    pub table1: Vec<Table1Field>,
    /// Bill of materials
    #[serde(default, deserialize_with = "crate::lenient::rows")]
    pub table2: Vec<WireComponent>,
    /// Title/information block
    #[serde(default, deserialize_with = "crate::lenient::cells")]
    pub table3: Vec<Table3Row>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BomValidation {
    #[serde(default, deserialize_with = "crate::lenient::bool_or_false")]
    pub valid: bool,
    #[serde(default, deserialize_with = "crate::lenient::rows")]
    pub errors: Vec<String>,
}

/// Backend report on how the spreadsheets were matched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationInfo {
    #[serde(default, deserialize_with = "crate::lenient::object_or_default")]
    pub bom_validation: BomValidation,
    #[serde(default, deserialize_with = "crate::lenient::bool_or_false")]
    pub bom_valid: bool,
    #[serde(default, deserialize_with = "crate::lenient::count_or_zero")]
    pub bom_sheet: u32,
    #[serde(default, deserialize_with = "crate::lenient::count_or_zero")]
    pub bom_components: u32,
    #[serde(default, deserialize_with = "crate::lenient::bool_or_false")]
    pub manager_found: bool,
    #[serde(default, deserialize_with = "crate::lenient::count", skip_serializing_if = "Option::is_none")]
    pub manager_row: Option<u32>,
    #[serde(default, deserialize_with = "crate::lenient::count", skip_serializing_if = "Option::is_none")]
    pub manager_materials: Option<u32>,
}

/// Response envelope of the parse endpoint, also used as the export body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParseResponse {
    #[serde(default, deserialize_with = "crate::lenient::bool_or_false")]
    pub success: bool,
    #[serde(default, deserialize_with = "crate::lenient::optional", skip_serializing_if = "Option::is_none")]
    pub data: Option<ParsedData>,
    #[serde(default, deserialize_with = "crate::lenient::optional", skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationInfo>,
    #[serde(default, deserialize_with = "crate::lenient::text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A component held by the store, with session identity and UI flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableComponent {
    #[serde(default = "ComponentId::fresh", deserialize_with = "crate::lenient::component_id")]
    pub id: ComponentId,
    #[serde(flatten)]
    pub component: Component,
    #[serde(rename = "isEditing", default, deserialize_with = "crate::lenient::bool_or_false")]
    pub is_editing: bool,
    #[serde(rename = "isSelected", default, deserialize_with = "crate::lenient::bool_or_false")]
    pub is_selected: bool,
}

impl EditableComponent {
    /// Wrap the `index`-th record of a parse payload
    pub fn ingested(index: usize, component: Component) -> Self {
        Self {
            id: ComponentId::ingested(index),
            component,
            is_editing: false,
            is_selected: false,
        }
    }

    /// A blank record, opened for editing
    pub fn blank() -> Self {
        Self {
            id: ComponentId::fresh(),
            component: Component::blank(),
            is_editing: true,
            is_selected: false,
        }
    }
}

/// Partial update for an [`EditableComponent`]
///
/// `None` leaves a field untouched. Nullable fields take `Some(None)` to
/// clear them. The identity is never part of a patch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentPatch {
    pub pos: Option<Option<String>>,
    pub description: Option<String>,
    pub material: Option<String>,
    pub bom_material: Option<Option<String>>,
    pub order_material: Option<Option<String>>,
    pub quantity: Option<Option<f64>>,
    pub manager_quantity: Option<Option<f64>>,
    pub status: Option<Status>,
    pub note: Option<Option<String>>,
    pub is_editing: Option<bool>,
    pub is_selected: Option<bool>,
}

impl ComponentPatch {
    /// True when applying the patch would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the patch into `target`
    pub fn apply(self, target: &mut EditableComponent) {
        let c = &mut target.component;
        if let Some(pos) = self.pos {
            c.pos = pos;
        }
        if let Some(description) = self.description {
            c.description = description;
        }
        if let Some(material) = self.material {
            c.material = material;
        }
        if let Some(bom_material) = self.bom_material {
            c.bom_material = bom_material;
        }
        if let Some(order_material) = self.order_material {
            c.order_material = order_material;
        }
        if let Some(quantity) = self.quantity {
            c.quantity = quantity;
        }
        if let Some(manager_quantity) = self.manager_quantity {
            c.manager_quantity = manager_quantity;
        }
        if let Some(status) = self.status {
            c.status = status;
        }
        if let Some(note) = self.note {
            c.note = note;
        }
        if let Some(is_editing) = self.is_editing {
            target.is_editing = is_editing;
        }
        if let Some(is_selected) = self.is_selected {
            target.is_selected = is_selected;
        }
    }
}

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping its file name for the upload
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { name, bytes })
    }
}

/// Inputs required to invoke the parse operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadBundle {
    /// Drawing PDF
    pub pdf: Option<UploadFile>,
    /// BOM spreadsheet
    pub bom: Option<UploadFile>,
    /// Manager/order spreadsheet
    pub manager: Option<UploadFile>,
    /// Zero-based sheet index inside the BOM spreadsheet
    pub bom_sheet_index: u32,
}

impl UploadBundle {
    /// All three files are present
    pub fn is_complete(&self) -> bool {
        self.pdf.is_some() && self.bom.is_some() && self.manager.is_some()
    }

    /// Merge the provided fields of `patch` into the bundle
    pub fn merge(&mut self, patch: UploadPatch) {
        if let Some(pdf) = patch.pdf {
            self.pdf = Some(pdf);
        }
        if let Some(bom) = patch.bom {
            self.bom = Some(bom);
        }
        if let Some(manager) = patch.manager {
            self.manager = Some(manager);
        }
        if let Some(index) = patch.bom_sheet_index {
            self.bom_sheet_index = index;
        }
    }
}

/// Partial [`UploadBundle`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadPatch {
    pub pdf: Option<UploadFile>,
    pub bom: Option<UploadFile>,
    pub manager: Option<UploadFile>,
    pub bom_sheet_index: Option<u32>,
}
