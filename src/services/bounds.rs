//! Viewport rectangle and the geographic bounds filter.

use serde::Deserialize;

use crate::models::Bus;

/// Rectangular lat/lon window, typically the visible map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLngBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl LatLngBounds {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Inclusive containment on both axes.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Minimal rectangle covering all points. None for an empty slice.
    pub fn around(points: &[(f64, f64)]) -> Option<Self> {
        let (&(first_lat, first_lon), rest) = points.split_first()?;
        let mut bounds = Self::new(first_lat, first_lat, first_lon, first_lon);
        for &(lat, lon) in rest {
            bounds.min_lat = bounds.min_lat.min(lat);
            bounds.max_lat = bounds.max_lat.max(lat);
            bounds.min_lon = bounds.min_lon.min(lon);
            bounds.max_lon = bounds.max_lon.max(lon);
        }
        Some(bounds)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Buses inside the window, in input order. No window means nothing is
/// visible, which is a valid state before the first viewport is known.
pub fn filter_within_bounds(buses: &[Bus], window: Option<&LatLngBounds>) -> Vec<Bus> {
    let Some(window) = window else {
        return Vec::new();
    };
    buses
        .iter()
        .filter(|b| window.contains(b.lat, b.lon))
        .cloned()
        .collect()
}

/// Buses of exactly this line, in input order.
pub fn filter_by_line(buses: &[Bus], line: &str) -> Vec<Bus> {
    buses.iter().filter(|b| b.lines == line).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus(vehicle: &str, line: &str, lat: f64, lon: f64) -> Bus {
        Bus {
            lines: line.to_string(),
            lon,
            lat,
            time: String::new(),
            vehicle_number: vehicle.to_string(),
            brigade: String::new(),
        }
    }

    fn warsaw_window() -> LatLngBounds {
        LatLngBounds::new(52.20, 52.30, 21.00, 21.10)
    }

    #[test]
    fn keeps_only_buses_inside_window_in_order() {
        let buses = vec![
            bus("a", "1", 52.25, 21.05),
            bus("b", "1", 53.00, 21.05),
            bus("c", "1", 52.21, 21.01),
        ];
        let visible = filter_within_bounds(&buses, Some(&warsaw_window()));
        let ids: Vec<&str> = visible.iter().map(|b| b.vehicle_number.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        for b in &visible {
            assert!(warsaw_window().contains(b.lat, b.lon));
        }
    }

    #[test]
    fn window_covering_known_points_returns_all_records() {
        let buses = vec![
            bus("a", "1", 52.2297, 21.0122),
            bus("b", "2", 52.2297, 21.0122),
            bus("c", "3", 52.2397, 21.0222),
        ];
        let window = LatLngBounds::new(52.22, 52.24, 21.01, 21.03);
        assert_eq!(filter_within_bounds(&buses, Some(&window)).len(), 3);
    }

    #[test]
    fn absent_window_yields_empty_result() {
        let buses = vec![bus("a", "1", 52.25, 21.05)];
        assert!(filter_within_bounds(&buses, None).is_empty());
    }

    #[test]
    fn boundary_is_inclusive() {
        let window = warsaw_window();
        let buses = vec![
            bus("low", "1", window.min_lat, window.min_lon),
            bus("high", "1", window.max_lat, window.max_lon),
        ];
        assert_eq!(filter_within_bounds(&buses, Some(&window)).len(), 2);
    }

    #[test]
    fn line_filter_matches_exactly_and_preserves_order() {
        let buses = vec![
            bus("a", "180", 52.25, 21.05),
            bus("b", "N61", 52.26, 21.06),
            bus("c", "180", 52.27, 21.07),
        ];
        let filtered = filter_by_line(&buses, "180");
        let ids: Vec<&str> = filtered.iter().map(|b| b.vehicle_number.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(filter_by_line(&buses, "520").is_empty());
    }

    #[test]
    fn around_covers_all_points() {
        let bounds =
            LatLngBounds::around(&[(52.25, 21.05), (52.20, 21.10), (52.30, 21.00)]).unwrap();
        assert_eq!(bounds.min_lat, 52.20);
        assert_eq!(bounds.max_lat, 52.30);
        assert_eq!(bounds.min_lon, 21.00);
        assert_eq!(bounds.max_lon, 21.10);
        assert!(LatLngBounds::around(&[]).is_none());
    }

    #[test]
    fn center_is_the_midpoint() {
        let (lat, lon) = warsaw_window().center();
        assert!((lat - 52.25).abs() < 1e-9);
        assert!((lon - 21.05).abs() < 1e-9);
    }
}
