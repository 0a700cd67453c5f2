//! Merge-field registry definitions and element resolution.
//!
//! The registry is the source of truth for valid token keys and is
//! injected into every call rather than read from shared state, so tests
//! can substitute fixed registries. Resolution is deliberately lenient:
//! a subject may legitimately lack a value (no license year yet), so an
//! absent context key leaves the token literal instead of failing.
//! Unknown-key validation happened earlier, at save time, against the
//! registry (see [`crate::design::validate_merge_fields`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::design::{DesignElement, DesignPayload, ElementKind};

/// Placeholder emitted for an image/qr/barcode element with neither a
/// resolvable merge field nor a literal source.
pub const UNRESOLVED_SOURCE: &str = "-";

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A merge-field registry entry. Global, read-only, not template-scoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeFieldDef {
    /// Dotted namespaced key, e.g. `member.full_name`.
    pub key: String,
    pub label: String,
    pub description: String,
}

/// The built-in registry entries shipped with the portal.
///
/// Mirrors the seed migration in `carddesk-db`; used by tests and as the
/// fallback when the registry service is unavailable.
pub fn builtin_merge_fields() -> Vec<MergeFieldDef> {
    fn def(key: &str, label: &str, description: &str) -> MergeFieldDef {
        MergeFieldDef {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    vec![
        def("member.full_name", "Member name", "Full name of the member"),
        def("member.first_name", "First name", "Given name of the member"),
        def("member.last_name", "Last name", "Family name of the member"),
        def("member.birth_date", "Birth date", "Date of birth, formatted per locale"),
        def("member.photo_url", "Member photo", "URL of the member's portrait photo"),
        def("license.number", "License number", "Federation license number"),
        def("license.year", "License year", "Season/year the license is valid for"),
        def("license.category", "License category", "Category or discipline of the license"),
        def("license.valid_until", "Valid until", "Expiry date of the license"),
        def("club.name", "Club name", "Name of the member's club"),
        def("club.code", "Club code", "Federation code of the club"),
        def("club.logo_url", "Club logo", "URL of the club's logo image"),
        def("qr.validation_url", "Validation QR", "URL encoded in the validation QR code"),
        def("barcode.number", "Barcode number", "Number encoded in the card barcode"),
    ]
}

/// Convenience view of a registry as a list of keys.
pub fn registry_keys(registry: &[MergeFieldDef]) -> Vec<String> {
    registry.iter().map(|f| f.key.clone()).collect()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// One element of a design with its merge fields resolved against a
/// subject context, annotated with its paint position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedElement {
    /// The element as designed (geometry, style, literal content).
    #[serde(flatten)]
    pub element: DesignElement,
    /// Position in paint order, 0-based.
    pub render_order: usize,
    /// Text content with `{{token}}`s substituted (text elements only).
    pub resolved_text: Option<String>,
    /// Resolved source for image/qr/barcode elements.
    pub resolved_source: Option<String>,
}

/// Resolve every element of a payload against a flat subject context.
///
/// Paint order: explicit `z_index` ascending; elements without a declared
/// z-index keep their array position and sort as if their index were the
/// z-key, stably, so a mixed payload falls back to array order for the
/// undeclared part.
pub fn resolve_elements(
    payload: &DesignPayload,
    context: &HashMap<String, String>,
) -> Vec<ResolvedElement> {
    let mut order: Vec<usize> = (0..payload.elements.len()).collect();
    order.sort_by_key(|&i| payload.elements[i].z_index.unwrap_or(i as i64));

    order
        .into_iter()
        .enumerate()
        .map(|(render_order, i)| resolve_element(&payload.elements[i], render_order, context))
        .collect()
}

fn resolve_element(
    element: &DesignElement,
    render_order: usize,
    context: &HashMap<String, String>,
) -> ResolvedElement {
    let resolved_text = match element.kind {
        ElementKind::Text => element.text.as_deref().map(|t| substitute_tokens(t, context)),
        _ => None,
    };

    let resolved_source = match element.kind {
        ElementKind::Image | ElementKind::Qr | ElementKind::Barcode => {
            Some(resolve_source(element, context))
        }
        _ => None,
    };

    ResolvedElement {
        element: element.clone(),
        render_order,
        resolved_text,
        resolved_source,
    }
}

/// Substitute every `{{key}}` occurrence with its context value. Keys
/// absent from the context are left as the literal token.
pub fn substitute_tokens(text: &str, context: &HashMap<String, String>) -> String {
    crate::design::replace_tokens(text, |key| context.get(key).cloned())
}

fn resolve_source(element: &DesignElement, context: &HashMap<String, String>) -> String {
    if let Some(field) = element.merge_field.as_deref().filter(|f| !f.is_empty()) {
        if let Some(value) = context.get(field) {
            return value.clone();
        }
    }
    match element.source.as_deref().filter(|s| !s.is_empty()) {
        Some(source) => source.to_string(),
        None => UNRESOLVED_SOURCE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::normalize;
    use serde_json::json;

    fn context(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -- substitute_tokens --

    #[test]
    fn substitutes_known_tokens() {
        let ctx = context(&[("member.full_name", "Jane Doe")]);
        assert_eq!(
            substitute_tokens("Name: {{member.full_name}}", &ctx),
            "Name: Jane Doe"
        );
    }

    #[test]
    fn unknown_tokens_stay_literal() {
        let ctx = context(&[("member.full_name", "Jane Doe")]);
        assert_eq!(
            substitute_tokens("{{member.full_name}} / {{license.year}}", &ctx),
            "Jane Doe / {{license.year}}"
        );
    }

    #[test]
    fn spaced_tokens_are_substituted() {
        let ctx = context(&[("club.name", "BC Example")]);
        assert_eq!(substitute_tokens("{{ club.name }}", &ctx), "BC Example");
    }

    // -- resolve_elements --

    #[test]
    fn text_element_resolves_and_gets_render_order() {
        let payload = normalize(&json!({
            "elements": [{
                "type": "text", "id": "e1",
                "x_mm": 2.0, "y_mm": 2.0, "width_mm": 30.0, "height_mm": 8.0,
                "text": "{{member.full_name}}"
            }]
        }));
        let ctx = context(&[("member.full_name", "Jane Doe")]);

        let resolved = resolve_elements(&payload, &ctx);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].render_order, 0);
        assert_eq!(resolved[0].resolved_text.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn qr_element_prefers_merge_field_over_source() {
        let payload = normalize(&json!({
            "elements": [{
                "type": "qr", "id": "q1",
                "merge_field": "qr.validation_url",
                "source": "https://fallback.example"
            }]
        }));
        let ctx = context(&[("qr.validation_url", "https://verify.example/123")]);

        let resolved = resolve_elements(&payload, &ctx);
        assert_eq!(
            resolved[0].resolved_source.as_deref(),
            Some("https://verify.example/123")
        );
    }

    #[test]
    fn image_falls_back_to_literal_source_then_placeholder() {
        let payload = normalize(&json!({
            "elements": [
                { "type": "image", "id": "i1", "source": "logo.png" },
                { "type": "image", "id": "i2" },
            ]
        }));
        let resolved = resolve_elements(&payload, &HashMap::new());
        assert_eq!(resolved[0].resolved_source.as_deref(), Some("logo.png"));
        assert_eq!(resolved[1].resolved_source.as_deref(), Some(UNRESOLVED_SOURCE));
    }

    #[test]
    fn explicit_z_index_orders_paint() {
        let payload = normalize(&json!({
            "elements": [
                { "type": "text", "id": "top", "text": "a", "z_index": 10 },
                { "type": "text", "id": "bottom", "text": "b", "z_index": -5 },
            ]
        }));
        let resolved = resolve_elements(&payload, &HashMap::new());
        assert_eq!(resolved[0].element.id, "bottom");
        assert_eq!(resolved[0].render_order, 0);
        assert_eq!(resolved[1].element.id, "top");
        assert_eq!(resolved[1].render_order, 1);
    }

    #[test]
    fn mixed_z_index_is_stable_for_undeclared() {
        let payload = normalize(&json!({
            "elements": [
                { "type": "shape", "id": "a" },
                { "type": "shape", "id": "b", "z_index": 0 },
                { "type": "shape", "id": "c" },
            ]
        }));
        let resolved = resolve_elements(&payload, &HashMap::new());
        let ids: Vec<&str> = resolved.iter().map(|r| r.element.id.as_str()).collect();
        // "a" (implicit 0) and "b" (explicit 0) tie; stable sort keeps
        // array order. "c" keeps its array position.
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    // -- registry --

    #[test]
    fn builtin_registry_keys_are_unique_and_namespaced() {
        let registry = builtin_merge_fields();
        let keys = registry_keys(&registry);
        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
        assert!(keys.iter().all(|k| k.contains('.')));
    }
}
