//! Deterministic ids for scenario items.
//!
//! A scenario has a random v4 UUID. Every item that belongs to it (areas,
//! solar assets, settings, uploaded files) carries a scenario-local integer
//! `internal_id`; its primary key is the v5 UUID of that integer in the
//! scenario's namespace. Ids can therefore be computed anywhere without a
//! database round-trip, and copying a scenario only needs the new scenario
//! id: every child id is re-derived from it.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::CoreError;

/// Derive the id of the item `internal_id` inside `scenario_id`.
pub fn generate_id(scenario_id: Uuid, internal_id: i32) -> Uuid {
    Uuid::new_v5(&scenario_id, internal_id.to_string().as_bytes())
}

/// Return the id an item must be stored under.
///
/// A caller may pre-compute the id; it is accepted only when it equals the
/// derived one. Anything else means the caller built the item against the
/// wrong scenario or internal id.
pub fn resolve_item_id(
    scenario_id: Uuid,
    internal_id: i32,
    supplied: Option<Uuid>,
) -> Result<Uuid, CoreError> {
    let expected = generate_id(scenario_id, internal_id);
    match supplied {
        Some(found) if found != expected => Err(CoreError::IdMismatch { expected, found }),
        _ => Ok(expected),
    }
}

/// Identity of a scenario item, derived from its scenario and internal id.
///
/// Keys are only built by [`ItemKey::new`] and [`ItemKey::derive`], so a key
/// always satisfies `id == generate_id(scenario_id, internal_id)`.
/// Repositories take an `ItemKey` instead of a raw id when inserting items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    id: Uuid,
    scenario_id: Uuid,
    internal_id: i32,
}

impl ItemKey {
    /// Derive the key, checking a caller-supplied id if there is one.
    pub fn derive(
        scenario_id: Uuid,
        internal_id: i32,
        supplied: Option<Uuid>,
    ) -> Result<Self, CoreError> {
        let id = resolve_item_id(scenario_id, internal_id, supplied)?;
        Ok(Self {
            id,
            scenario_id,
            internal_id,
        })
    }

    /// Key of item `internal_id` inside `scenario_id`.
    pub fn new(scenario_id: Uuid, internal_id: i32) -> Self {
        Self {
            id: generate_id(scenario_id, internal_id),
            scenario_id,
            internal_id,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scenario_id(&self) -> Uuid {
        self.scenario_id
    }

    pub fn internal_id(&self) -> i32 {
        self.internal_id
    }

    /// Key of the same item inside another scenario.
    pub fn rebase(&self, scenario_id: Uuid) -> Self {
        Self::new(scenario_id, self.internal_id)
    }
}

/// Build the old-id -> new-id table used when copying a scenario.
///
/// Contains the scenario itself plus every item, keyed by the item's current
/// id. `internal_ids` are the internal ids of all items in the source
/// scenario, across every item table. Items of different tables may share an
/// internal id and therefore an id; they map to the same target id.
pub fn remap_ids(
    source_scenario: Uuid,
    target_scenario: Uuid,
    internal_ids: impl IntoIterator<Item = i32>,
) -> HashMap<Uuid, Uuid> {
    let mut map: HashMap<Uuid, Uuid> = internal_ids
        .into_iter()
        .map(|internal_id| {
            (
                generate_id(source_scenario, internal_id),
                generate_id(target_scenario, internal_id),
            )
        })
        .collect();
    map.insert(source_scenario, target_scenario);
    map
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn scenario_a() -> Uuid {
        Uuid::parse_str("6f1c2b7e-0d4a-4f39-9a57-3b1e2c8d9f01").unwrap()
    }

    fn scenario_b() -> Uuid {
        Uuid::parse_str("0a9e8d7c-6b5a-4f32-8e10-fedcba987654").unwrap()
    }

    #[test]
    fn derivation_is_repeatable() {
        assert_eq!(generate_id(scenario_a(), 1), generate_id(scenario_a(), 1));
    }

    #[test]
    fn derived_id_is_version_5() {
        assert_eq!(generate_id(scenario_a(), 1).get_version_num(), 5);
    }

    #[test]
    fn derivation_uses_decimal_string_name() {
        let expected = Uuid::new_v5(&scenario_a(), b"42");
        assert_eq!(generate_id(scenario_a(), 42), expected);
    }

    #[test]
    fn namespaces_are_disjoint() {
        for n in 0..50 {
            assert_ne!(generate_id(scenario_a(), n), generate_id(scenario_b(), n));
        }
    }

    #[test]
    fn local_ids_are_distinct_within_a_scenario() {
        let ids: std::collections::HashSet<Uuid> =
            (0..200).map(|n| generate_id(scenario_a(), n)).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn negative_internal_ids_are_allowed() {
        assert_ne!(generate_id(scenario_a(), -1), generate_id(scenario_a(), 1));
    }

    #[test]
    fn resolve_fills_missing_id() {
        let id = resolve_item_id(scenario_a(), 3, None).unwrap();
        assert_eq!(id, generate_id(scenario_a(), 3));
    }

    #[test]
    fn resolve_accepts_matching_id() {
        let supplied = generate_id(scenario_a(), 3);
        assert_eq!(
            resolve_item_id(scenario_a(), 3, Some(supplied)).unwrap(),
            supplied
        );
    }

    #[test]
    fn resolve_rejects_id_from_other_scenario() {
        let supplied = generate_id(scenario_b(), 3);
        assert_matches!(
            resolve_item_id(scenario_a(), 3, Some(supplied)),
            Err(CoreError::IdMismatch { found, .. }) if found == supplied
        );
    }

    #[test]
    fn item_key_matches_generated_id() {
        let key = ItemKey::derive(scenario_a(), 5, None).unwrap();
        assert_eq!(key.id(), generate_id(scenario_a(), 5));
        assert_eq!(key.scenario_id(), scenario_a());
        assert_eq!(key.internal_id(), 5);
    }

    #[test]
    fn item_key_rejects_mismatched_id() {
        let wrong = generate_id(scenario_a(), 6);
        assert_matches!(
            ItemKey::derive(scenario_a(), 5, Some(wrong)),
            Err(CoreError::IdMismatch { .. })
        );
    }

    #[test]
    fn rebased_key_lives_in_target_namespace() {
        let key = ItemKey::derive(scenario_a(), 5, None).unwrap();
        let copy = key.rebase(scenario_b());
        assert_eq!(copy, ItemKey::derive(scenario_b(), 5, None).unwrap());
        assert_ne!(copy.id(), key.id());
    }

    #[test]
    fn remap_covers_items_and_scenario() {
        let map = remap_ids(scenario_a(), scenario_b(), [1, 2, 7]);
        assert_eq!(map.len(), 4);
        assert_eq!(map[&scenario_a()], scenario_b());
        for n in [1, 2, 7] {
            assert_eq!(
                map[&generate_id(scenario_a(), n)],
                generate_id(scenario_b(), n)
            );
        }
    }
}
