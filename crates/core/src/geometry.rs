//! Area geometry validation.
//!
//! Areas store their outline as a GeoJSON `Polygon` object in a JSONB column.

use crate::error::CoreError;

/// Minimum positions of a closed linear ring (triangle plus closing point).
pub const MIN_RING_POSITIONS: usize = 4;

/// Validate that `geom` is a GeoJSON `Polygon`.
///
/// Requirements: `"type": "Polygon"`, at least one ring, every ring has at
/// least [`MIN_RING_POSITIONS`] positions and ends where it starts, every
/// position has two or three finite coordinates.
pub fn validate_polygon(geom: &serde_json::Value) -> Result<(), CoreError> {
    let obj = geom
        .as_object()
        .ok_or_else(|| invalid("geometry must be a JSON object"))?;

    match obj.get("type").and_then(|t| t.as_str()) {
        Some("Polygon") => {}
        Some(other) => return Err(invalid(&format!("expected type Polygon, got {other}"))),
        None => return Err(invalid("missing 'type'")),
    }

    let rings = obj
        .get("coordinates")
        .and_then(|c| c.as_array())
        .ok_or_else(|| invalid("'coordinates' must be an array of rings"))?;
    if rings.is_empty() {
        return Err(invalid("polygon needs at least one ring"));
    }

    for (ring_idx, ring) in rings.iter().enumerate() {
        let positions = ring
            .as_array()
            .ok_or_else(|| invalid(&format!("ring {ring_idx} must be an array")))?;
        if positions.len() < MIN_RING_POSITIONS {
            return Err(invalid(&format!(
                "ring {ring_idx} has {} positions, at least {MIN_RING_POSITIONS} required",
                positions.len()
            )));
        }
        let parsed = positions
            .iter()
            .map(parse_position)
            .collect::<Result<Vec<_>, _>>()?;
        if parsed.first() != parsed.last() {
            return Err(invalid(&format!("ring {ring_idx} is not closed")));
        }
    }

    Ok(())
}

fn parse_position(value: &serde_json::Value) -> Result<Vec<f64>, CoreError> {
    let coords = value
        .as_array()
        .ok_or_else(|| invalid("position must be an array"))?;
    if !(2..=3).contains(&coords.len()) {
        return Err(invalid("position must have 2 or 3 coordinates"));
    }
    coords
        .iter()
        .map(|c| {
            c.as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid("coordinates must be finite numbers"))
        })
        .collect()
}

fn invalid(reason: &str) -> CoreError {
    CoreError::Validation(format!("Invalid polygon: {reason}"))
}
