//! A single stop within a trip plan.
//!
//! Plan items arrive from the outside world as untyped JSON bags;
//! [`PlanItem::sanitise`] is the explicit parse step that turns one into a
//! typed record or rejects it.

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geographic hint attached to a plan item.
///
/// Latitude and longitude are individually optional; a location carrying
/// only a street address is valid. Coordinates are decimal degrees.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude in decimal degrees, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Free-form street address, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Resolved coordinate, present only when both axes are known and finite.
    ///
    /// Follows the crate convention `x = longitude`, `y = latitude`.
    #[must_use]
    pub fn coord(&self) -> Option<Coord<f64>> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coord { x: lng, y: lat })
            }
            _ => None,
        }
    }

    fn sanitise(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;
        let lat = object.get("lat").and_then(coerce_finite);
        let lng = object.get("lng").and_then(coerce_finite);
        let address = object
            .get("address")
            .and_then(Value::as_str)
            .map(str::to_owned);
        if lat.is_none() && lng.is_none() && address.is_none() {
            return None;
        }
        Some(Self { lat, lng, address })
    }
}

/// One stop within a [`Plan`](crate::Plan).
///
/// # Examples
/// ```
/// use itsuki_core::PlanItem;
/// use serde_json::json;
///
/// let raw = json!({ "id": 42, "title": "Kinkaku-ji",
///                   "location": { "lat": 35.039, "lng": 135.729 } });
/// let item = PlanItem::sanitise(&raw).expect("id present");
/// assert_eq!(item.id, "42");
/// assert!(item.coord().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    /// Identifier of the referenced place. Unique within a plan.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Geographic hint, when any part of it is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Opaque caller metadata, passed through unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl PlanItem {
    /// Construct an item with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            location: None,
            meta: None,
        }
    }

    /// Resolved coordinate of this stop, when both axes are known.
    #[must_use]
    pub fn coord(&self) -> Option<Coord<f64>> {
        self.location.as_ref().and_then(Location::coord)
    }

    /// Parse an untyped JSON bag into a typed item.
    ///
    /// The required `id` is coerced to a string from a JSON string or
    /// number; anything else rejects the whole item with `None`, which the
    /// caller treats as a silent drop, not a request failure. Optional
    /// fields are dropped field-wise when malformed: `lat`/`lng` must
    /// coerce to finite numbers, `address` must be a string, and `meta`
    /// passes through verbatim only when it is an object.
    #[must_use]
    pub fn sanitise(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;
        let id = match object.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return None,
        };
        let title = object
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let location = object.get("location").and_then(Location::sanitise);
        let meta = object.get("meta").and_then(Value::as_object).cloned();
        Some(Self {
            id,
            title,
            location,
            meta,
        })
    }
}

/// Coerce a JSON value to a finite `f64`, accepting numbers and numeric
/// strings, as the lenient write boundary always has.
fn coerce_finite(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    number.filter(|candidate| candidate.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn sanitise_accepts_string_and_numeric_ids() {
        let from_string = PlanItem::sanitise(&json!({ "id": "a1" })).unwrap();
        let from_number = PlanItem::sanitise(&json!({ "id": 7 })).unwrap();
        assert_eq!(from_string.id, "a1");
        assert_eq!(from_number.id, "7");
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "id": null }))]
    #[case(json!({ "id": true }))]
    #[case(json!({ "id": "" }))]
    #[case(json!({ "id": ["x"] }))]
    #[case(json!("not an object"))]
    fn sanitise_rejects_items_without_usable_id(#[case] raw: Value) {
        assert_eq!(PlanItem::sanitise(&raw), None);
    }

    #[rstest]
    fn sanitise_drops_non_finite_coordinates_field_wise() {
        let raw = json!({
            "id": "a",
            "location": { "lat": "NaN", "lng": 139.0, "address": "Ginza" }
        });
        let item = PlanItem::sanitise(&raw).unwrap();
        let location = item.location.unwrap();
        assert_eq!(location.lat, None);
        assert_eq!(location.lng, Some(139.0));
        assert_eq!(location.address.as_deref(), Some("Ginza"));
    }

    #[rstest]
    fn sanitise_accepts_numeric_string_coordinates() {
        let raw = json!({ "id": "a", "location": { "lat": "35.0", "lng": "139.0" } });
        let item = PlanItem::sanitise(&raw).unwrap();
        assert!(item.coord().is_some());
    }

    #[rstest]
    fn address_only_location_is_kept_but_has_no_coord() {
        let raw = json!({ "id": "a", "location": { "address": "1-1 Chiyoda" } });
        let item = PlanItem::sanitise(&raw).unwrap();
        assert!(item.location.is_some());
        assert_eq!(item.coord(), None);
    }

    #[rstest]
    fn empty_location_object_is_dropped() {
        let raw = json!({ "id": "a", "location": {} });
        let item = PlanItem::sanitise(&raw).unwrap();
        assert_eq!(item.location, None);
    }

    #[rstest]
    fn meta_passes_through_only_when_object() {
        let kept = PlanItem::sanitise(&json!({ "id": "a", "meta": { "note": "sakura" } })).unwrap();
        assert_eq!(kept.meta.unwrap().get("note"), Some(&json!("sakura")));

        let dropped = PlanItem::sanitise(&json!({ "id": "a", "meta": "free text" })).unwrap();
        assert_eq!(dropped.meta, None);
    }

    #[rstest]
    fn partial_coordinate_yields_no_coord() {
        let raw = json!({ "id": "a", "location": { "lat": 35.0 } });
        let item = PlanItem::sanitise(&raw).unwrap();
        assert_eq!(item.coord(), None);
    }
}
