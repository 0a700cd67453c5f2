//! Design payload normalization, sanitization, and merge-field validation.
//!
//! A card template version stores its visual design as JSONB. Stored
//! payloads may predate the current editor and carry missing ids, bogus
//! geometry, or unknown element kinds, so [`normalize`] is deliberately
//! permissive and never fails: it drops what it cannot interpret and
//! coerces the rest. [`sanitize`] is the inverse direction and produces
//! the minimal canonical form that goes back into storage.
//!
//! The one strict gate is [`collect_unknown_merge_fields`]: a payload that
//! references a merge-field key missing from the registry must not be
//! saved.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::CoreError;
use crate::geometry::{
    clamp_rect_to_canvas, round_mm, to_finite_number, RectMm, DEFAULT_ELEMENT_HEIGHT_MM,
    DEFAULT_ELEMENT_WIDTH_MM, MIN_ELEMENT_SIZE_MM,
};

/// Regex matching `{{token}}` occurrences in element text.
///
/// Tokens are trimmed, contain no whitespace and no nested braces.
static MERGE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("valid regex"));

// ---------------------------------------------------------------------------
// Element model
// ---------------------------------------------------------------------------

/// The five recognised design element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
    Qr,
    Barcode,
}

impl ElementKind {
    /// Parse a payload `type` string; unknown kinds yield `None` and the
    /// element is dropped during normalization.
    /// The payload `type` string for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Shape => "shape",
            Self::Qr => "qr",
            Self::Barcode => "barcode",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "shape" => Some(Self::Shape),
            "qr" => Some(Self::Qr),
            "barcode" => Some(Self::Barcode),
            _ => None,
        }
    }
}

/// One visual element of a card design.
///
/// Geometry is always millimetres. `style` and `metadata` are free-form
/// string-keyed bags the core never interprets, only preserves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    pub rotation_deg: Option<f64>,
    pub opacity: Option<f64>,
    pub z_index: Option<i64>,
    /// Literal or `{{token}}`-templated content (text elements).
    pub text: Option<String>,
    /// Registry key resolved against the subject context
    /// (image/qr/barcode elements).
    pub merge_field: Option<String>,
    /// Literal source used when no merge field is set.
    pub source: Option<String>,
    pub style: Map<String, Value>,
    pub metadata: Map<String, Value>,
}

impl DesignElement {
    /// The element's geometry as a rectangle.
    pub fn rect(&self) -> RectMm {
        RectMm {
            x_mm: self.x_mm,
            y_mm: self.y_mm,
            width_mm: self.width_mm,
            height_mm: self.height_mm,
        }
    }
}

/// The in-memory form of one version's design.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignPayload {
    pub elements: Vec<DesignElement>,
    pub background: Option<String>,
    pub metadata: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Normalization (storage -> strict model, permissive, never fails)
// ---------------------------------------------------------------------------

/// Normalize an arbitrary stored payload into a strict [`DesignPayload`].
///
/// Accepts `null` and missing fields. Elements with an unknown `type` are
/// dropped, missing ids are generated, geometry is coerced through
/// [`to_finite_number`] with per-field defaults (x/y 0, width 20mm,
/// height 8mm, sizes floored at 0.5mm), and `style`/`metadata` survive
/// only when they are JSON objects. Lossy by design; this is defensive
/// legacy-data handling, not an error path.
pub fn normalize(raw: &Value) -> DesignPayload {
    let Some(obj) = raw.as_object() else {
        return DesignPayload::default();
    };

    let elements = obj
        .get("elements")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(normalize_element).collect())
        .unwrap_or_default();

    DesignPayload {
        elements,
        background: obj
            .get("background")
            .and_then(Value::as_str)
            .map(str::to_string),
        metadata: plain_map(obj.get("metadata")),
    }
}

fn normalize_element(raw: &Value) -> Option<DesignElement> {
    let obj = raw.as_object()?;
    let kind = ElementKind::parse(obj.get("type")?.as_str()?)?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let width = to_finite_number(obj.get("width_mm"), DEFAULT_ELEMENT_WIDTH_MM);
    let height = to_finite_number(obj.get("height_mm"), DEFAULT_ELEMENT_HEIGHT_MM);

    Some(DesignElement {
        id,
        kind,
        x_mm: to_finite_number(obj.get("x_mm"), 0.0),
        y_mm: to_finite_number(obj.get("y_mm"), 0.0),
        width_mm: width.max(MIN_ELEMENT_SIZE_MM),
        height_mm: height.max(MIN_ELEMENT_SIZE_MM),
        rotation_deg: finite_opt(obj.get("rotation_deg")),
        opacity: finite_opt(obj.get("opacity")),
        z_index: obj.get("z_index").and_then(Value::as_i64),
        text: string_opt(obj.get("text")),
        merge_field: string_opt(obj.get("merge_field")),
        source: string_opt(obj.get("source")),
        style: plain_map(obj.get("style")),
        metadata: plain_map(obj.get("metadata")),
    })
}

fn finite_opt(v: Option<&Value>) -> Option<f64> {
    v.and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn string_opt(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str).map(str::to_string)
}

/// Keep a free-form bag only when it actually is a plain key-value map.
/// Arrays and other shapes are discarded silently.
fn plain_map(v: Option<&Value>) -> Map<String, Value> {
    v.and_then(Value::as_object).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Clamping against the card format
// ---------------------------------------------------------------------------

/// Clamp every element's geometry into the owning card format's bounding
/// box. Applied after every edit; out-of-bounds geometry is corrected,
/// never rejected.
pub fn clamp_to_card(payload: &mut DesignPayload, card_width_mm: f64, card_height_mm: f64) {
    for element in &mut payload.elements {
        let clamped = clamp_rect_to_canvas(element.rect(), card_width_mm, card_height_mm);
        element.x_mm = clamped.x_mm;
        element.y_mm = clamped.y_mm;
        element.width_mm = clamped.width_mm;
        element.height_mm = clamped.height_mm;
    }
}

// ---------------------------------------------------------------------------
// Sanitization (strict model -> minimal persisted form)
// ---------------------------------------------------------------------------

/// Serialize a [`DesignPayload`] into its minimal persisted JSON form.
///
/// Geometry is re-rounded to two decimals, empty-string `text`/
/// `merge_field`/`source` fields are omitted entirely (absence is the
/// canonical "unset"), empty bags are omitted, and the payload metadata
/// always carries the `unit = "mm"` marker.
pub fn sanitize(payload: &DesignPayload) -> Value {
    let elements: Vec<Value> = payload.elements.iter().map(sanitize_element).collect();

    let mut metadata = payload.metadata.clone();
    metadata.insert("unit".into(), json!("mm"));

    let mut out = Map::new();
    out.insert("elements".into(), Value::Array(elements));
    if let Some(background) = &payload.background {
        if !background.is_empty() {
            out.insert("background".into(), json!(background));
        }
    }
    out.insert("metadata".into(), Value::Object(metadata));
    Value::Object(out)
}

fn sanitize_element(element: &DesignElement) -> Value {
    let mut out = Map::new();
    out.insert("id".into(), json!(element.id));
    out.insert("type".into(), json!(element.kind.as_str()));
    out.insert("x_mm".into(), json!(round_mm(element.x_mm)));
    out.insert("y_mm".into(), json!(round_mm(element.y_mm)));
    out.insert("width_mm".into(), json!(round_mm(element.width_mm)));
    out.insert("height_mm".into(), json!(round_mm(element.height_mm)));

    if let Some(rotation) = element.rotation_deg {
        out.insert("rotation_deg".into(), json!(rotation));
    }
    if let Some(opacity) = element.opacity {
        out.insert("opacity".into(), json!(opacity));
    }
    if let Some(z) = element.z_index {
        out.insert("z_index".into(), json!(z));
    }
    for (key, value) in [
        ("text", &element.text),
        ("merge_field", &element.merge_field),
        ("source", &element.source),
    ] {
        if let Some(s) = value {
            if !s.is_empty() {
                out.insert(key.into(), json!(s));
            }
        }
    }
    if !element.style.is_empty() {
        out.insert("style".into(), Value::Object(element.style.clone()));
    }
    if !element.metadata.is_empty() {
        out.insert("metadata".into(), Value::Object(element.metadata.clone()));
    }
    Value::Object(out)
}

// ---------------------------------------------------------------------------
// Merge-field validation
// ---------------------------------------------------------------------------

/// Extract every `{{token}}` key from a text string, trimmed.
pub fn extract_tokens(text: &str) -> Vec<String> {
    MERGE_TOKEN_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Replace every `{{token}}` occurrence using `repl`. Returning `None`
/// keeps the occurrence literal.
pub fn replace_tokens(text: &str, mut repl: impl FnMut(&str) -> Option<String>) -> String {
    MERGE_TOKEN_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            repl(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Collect every merge-field key referenced by the payload that is not
/// present in the registry. Scans `merge_field` attributes and `{{token}}`
/// occurrences in text content. Returns a sorted, de-duplicated list.
pub fn collect_unknown_merge_fields(payload: &DesignPayload, known_keys: &[String]) -> Vec<String> {
    let mut unknown = BTreeSet::new();

    for element in &payload.elements {
        if let Some(field) = &element.merge_field {
            if !field.is_empty() && !known_keys.iter().any(|k| k == field) {
                unknown.insert(field.clone());
            }
        }
        if let Some(text) = &element.text {
            for token in extract_tokens(text) {
                if !known_keys.iter().any(|k| *k == token) {
                    unknown.insert(token);
                }
            }
        }
    }

    unknown.into_iter().collect()
}

/// The save-time correctness gate: fail with a [`CoreError::Validation`]
/// naming the offending keys when the payload references any merge field
/// missing from the registry.
pub fn validate_merge_fields(payload: &DesignPayload, known_keys: &[String]) -> Result<(), CoreError> {
    let unknown = collect_unknown_merge_fields(payload, known_keys);
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown merge fields: {}",
            unknown.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        vec![
            "member.full_name".to_string(),
            "qr.validation_url".to_string(),
        ]
    }

    // -- normalize --

    #[test]
    fn null_payload_normalizes_to_empty() {
        let payload = normalize(&Value::Null);
        assert!(payload.elements.is_empty());
        assert!(payload.background.is_none());
    }

    #[test]
    fn unknown_element_kind_is_dropped() {
        let raw = json!({
            "elements": [
                { "type": "text", "text": "hello" },
                { "type": "hologram" },
            ]
        });
        let payload = normalize(&raw);
        assert_eq!(payload.elements.len(), 1);
        assert_eq!(payload.elements[0].kind, ElementKind::Text);
    }

    #[test]
    fn missing_id_is_generated() {
        let raw = json!({ "elements": [{ "type": "shape" }] });
        let payload = normalize(&raw);
        assert!(!payload.elements[0].id.is_empty());
    }

    #[test]
    fn bogus_geometry_gets_defaults() {
        let raw = json!({
            "elements": [{
                "type": "text",
                "id": "e1",
                "x_mm": "garbage",
                "width_mm": null,
                "height_mm": 0.1
            }]
        });
        let element = &normalize(&raw).elements[0];
        assert_eq!(element.x_mm, 0.0);
        assert_eq!(element.y_mm, 0.0);
        assert_eq!(element.width_mm, DEFAULT_ELEMENT_WIDTH_MM);
        assert_eq!(element.height_mm, MIN_ELEMENT_SIZE_MM);
    }

    #[test]
    fn non_map_style_is_discarded() {
        let raw = json!({
            "elements": [{
                "type": "text",
                "id": "e1",
                "style": ["not", "a", "map"],
                "metadata": { "kept": true }
            }]
        });
        let element = &normalize(&raw).elements[0];
        assert!(element.style.is_empty());
        assert_eq!(element.metadata.get("kept"), Some(&json!(true)));
    }

    // -- sanitize --

    #[test]
    fn sanitize_omits_empty_strings_and_sets_unit() {
        let mut payload = normalize(&json!({
            "elements": [{ "type": "text", "id": "e1", "text": "" }]
        }));
        payload.elements[0].merge_field = Some(String::new());

        let stored = sanitize(&payload);
        let element = &stored["elements"][0];
        assert!(element.get("text").is_none());
        assert!(element.get("merge_field").is_none());
        assert_eq!(stored["metadata"]["unit"], "mm");
    }

    #[test]
    fn sanitize_rounds_geometry() {
        let raw = json!({
            "elements": [{ "type": "qr", "id": "e1", "x_mm": 1.2345, "y_mm": 2.005 }]
        });
        let stored = sanitize(&normalize(&raw));
        assert_eq!(stored["elements"][0]["x_mm"], json!(1.23));
        assert_eq!(stored["elements"][0]["y_mm"], json!(2.01));
    }

    #[test]
    fn canonical_payload_round_trips() {
        let canonical = json!({
            "elements": [{
                "id": "e1",
                "type": "text",
                "x_mm": 2.0,
                "y_mm": 2.0,
                "width_mm": 30.0,
                "height_mm": 8.0,
                "text": "{{member.full_name}}"
            }],
            "metadata": { "unit": "mm" }
        });
        assert_eq!(sanitize(&normalize(&canonical)), canonical);
    }

    // -- clamp_to_card --

    #[test]
    fn elements_are_clamped_into_card_bounds() {
        let mut payload = normalize(&json!({
            "elements": [{
                "type": "text", "id": "e1",
                "x_mm": 80.0, "y_mm": 50.0, "width_mm": 20.0, "height_mm": 10.0
            }]
        }));
        clamp_to_card(&mut payload, 85.6, 53.98);
        let element = &payload.elements[0];
        assert_eq!(element.x_mm, 65.6);
        assert_eq!(element.y_mm, 43.98);
    }

    // -- merge-field collection --

    #[test]
    fn extracts_tokens_with_whitespace() {
        let tokens = extract_tokens("Hi {{ member.full_name }} ({{club.name}})");
        assert_eq!(tokens, vec!["member.full_name", "club.name"]);
    }

    #[test]
    fn nested_braces_are_not_tokens() {
        assert!(extract_tokens("{{a{b}}").is_empty());
        assert!(extract_tokens("{{ two words }}").is_empty());
    }

    #[test]
    fn unknown_fields_are_reported_sorted() {
        let payload = normalize(&json!({
            "elements": [{
                "type": "text", "id": "e1",
                "text": "{{member.full_name}} - {{qr.bogus}}"
            }]
        }));
        assert_eq!(
            collect_unknown_merge_fields(&payload, &known()),
            vec!["qr.bogus"]
        );
    }

    #[test]
    fn merge_field_attribute_is_checked_too() {
        let payload = normalize(&json!({
            "elements": [
                { "type": "qr", "id": "q1", "merge_field": "qr.validation_url" },
                { "type": "barcode", "id": "b1", "merge_field": "barcode.number" },
            ]
        }));
        assert_eq!(
            collect_unknown_merge_fields(&payload, &known()),
            vec!["barcode.number"]
        );
    }

    #[test]
    fn closed_payload_passes_validation() {
        let payload = normalize(&json!({
            "elements": [{ "type": "text", "id": "e1", "text": "{{member.full_name}}" }]
        }));
        assert!(validate_merge_fields(&payload, &known()).is_ok());
    }

    #[test]
    fn open_payload_fails_validation_naming_keys() {
        let payload = normalize(&json!({
            "elements": [{ "type": "text", "id": "e1", "text": "{{nope.nope}}" }]
        }));
        let err = validate_merge_fields(&payload, &known()).unwrap_err();
        assert!(err.to_string().contains("nope.nope"));
    }
}
