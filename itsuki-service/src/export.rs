//! Bulk plan exports for administrators.
//!
//! JSON preserves item payloads verbatim; CSV flattens to one row per
//! plan item (or one placeholder row for an empty plan) with `meta`
//! serialized and newline/comma-sanitised so rows stay one line each.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};

use itsuki_core::{Plan, PlanItem};

use crate::directory::{OwnerDirectory, OwnerProfile};

const CSV_HEADER: &str = "owner_id,owner_email,owner_name,plan_updated_at,\
item_index,item_id,item_title,item_lat,item_lng,item_address,item_meta";

fn epoch_seconds(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

fn profile_for(plan: &Plan, directory: &dyn OwnerDirectory) -> OwnerProfile {
    directory
        .lookup(&plan.owner)
        .unwrap_or_else(|| OwnerProfile::bare(plan.owner.clone()))
}

/// Render `plans` as a pretty-printed JSON document.
///
/// Owner contact details come from `directory`; unknown owners export
/// with a bare id.
pub fn plans_to_json(
    plans: &[Plan],
    directory: &dyn OwnerDirectory,
) -> Result<String, serde_json::Error> {
    let documents: Vec<Value> = plans
        .iter()
        .map(|plan| {
            let profile = profile_for(plan, directory);
            Ok(json!({
                "owner": {
                    "id": profile.id.as_str(),
                    "email": profile.email,
                    "name": profile.name,
                },
                "updated_at": epoch_seconds(plan.updated_at),
                "items": serde_json::to_value(&plan.items)?,
            }))
        })
        .collect::<Result<_, serde_json::Error>>()?;
    serde_json::to_string_pretty(&documents)
}

/// Render `plans` as CSV, one row per plan item.
///
/// An empty plan still exports as a single placeholder row so every plan
/// is visible in the sheet.
pub fn plans_to_csv(plans: &[Plan], directory: &dyn OwnerDirectory) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for plan in plans {
        let profile = profile_for(plan, directory);
        let owner_fields = [
            csv_field(profile.id.as_str()),
            csv_field(profile.email.as_deref().unwrap_or("")),
            csv_field(profile.name.as_deref().unwrap_or("")),
            epoch_seconds(plan.updated_at).to_string(),
        ];
        if plan.items.is_empty() {
            push_row(&mut out, &owner_fields, None);
        } else {
            for (index, item) in plan.items.iter().enumerate() {
                push_row(&mut out, &owner_fields, Some((index, item)));
            }
        }
    }
    out
}

fn push_row(out: &mut String, owner_fields: &[String; 4], item: Option<(usize, &PlanItem)>) {
    let item_fields = match item {
        Some((index, item)) => {
            let location = item.location.as_ref();
            [
                index.to_string(),
                csv_field(&item.id),
                csv_field(item.title.as_deref().unwrap_or("")),
                location
                    .and_then(|l| l.lat)
                    .map(|lat| lat.to_string())
                    .unwrap_or_default(),
                location
                    .and_then(|l| l.lng)
                    .map(|lng| lng.to_string())
                    .unwrap_or_default(),
                csv_field(location.and_then(|l| l.address.as_deref()).unwrap_or("")),
                item.meta
                    .as_ref()
                    .map(|meta| csv_field(&serde_json::to_string(meta).unwrap_or_default()))
                    .unwrap_or_default(),
            ]
        }
        None => std::array::from_fn(|_| String::new()),
    };
    let row: Vec<&str> = owner_fields
        .iter()
        .chain(item_fields.iter())
        .map(String::as_str)
        .collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Sanitise a raw value into a single CSV field: newlines collapse to
/// spaces, and fields containing separators or quotes are quoted with
/// doubled inner quotes.
fn csv_field(raw: &str) -> String {
    let flattened = raw.replace(['\n', '\r'], " ");
    if flattened.contains(',') || flattened.contains('"') {
        format!("\"{}\"", flattened.replace('"', "\"\""))
    } else {
        flattened
    }
}
