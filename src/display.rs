//! Capability interfaces of the display layer.
//!
//! The real map widget and the line-picker sheet live outside this core; the
//! controller only talks to these traits. The `Log*` implementations back the
//! headless binary.

use crate::services::bounds::LatLngBounds;

/// Everything the map collaborator needs to draw one vehicle marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Marker key, stable per physical vehicle within a snapshot
    pub vehicle_number: String,
    pub lat: f64,
    pub lon: f64,
    /// Callout title, e.g. "Linia: 180 | Nr pojazdu: 1000"
    pub title: String,
    /// Callout detail text; carries the vehicle number for tap reporting
    pub snippet: String,
}

impl MarkerSpec {
    pub fn for_bus(bus: &crate::models::Bus) -> Self {
        Self {
            vehicle_number: bus.vehicle_number.clone(),
            lat: bus.lat,
            lon: bus.lon,
            title: format!("Linia: {} | Nr pojazdu: {}", bus.lines, bus.vehicle_number),
            snippet: bus.vehicle_number.clone(),
        }
    }
}

/// Why the display is showing old (or no) data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// Well-formed response with an empty result list
    NoData,
    /// Non-2xx status or malformed body
    Api,
    /// Could not reach the service
    Network,
}

/// User-facing outcomes the controller surfaces; a UI would typically show
/// these as toasts.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Keeping the previous snapshot; `as_of` is the formatted time of the
    /// last successful fetch
    StaleData { cause: FetchFailure, as_of: String },
    /// Fetch failed and there is no previous snapshot to fall back on
    NoDataAvailable { cause: FetchFailure },
    LineChosen(String),
    ShowingAllLines,
    NoBusesForLine(String),
}

/// Outbound surface of the map collaborator. Calls happen on the controller
/// task; implementations forward to the real widget.
pub trait MapPresenter: Send {
    /// Replace all markers. `selected` names the marker whose callout should
    /// reopen if it is still present.
    fn render(&mut self, markers: &[MarkerSpec], selected: Option<&str>);
    /// Remove every marker.
    fn clear(&mut self);
    /// Frame the camera on a rectangle.
    fn frame_bounds(&mut self, bounds: &LatLngBounds);
    /// Frame the camera on a point at a zoom level.
    fn frame_point(&mut self, lat: f64, lon: f64, zoom: f32);
    /// Surface a user-facing notice.
    fn notify(&mut self, notice: Notice);
}

/// Outbound surface of the line-picker collaborator.
pub trait LinePicker: Send {
    /// Present the ordered label list; the first entry is the show-all
    /// sentinel.
    fn show_lines(&mut self, entries: Vec<String>);
}

/// Presenter that logs what a map widget would draw.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl MapPresenter for LogPresenter {
    fn render(&mut self, markers: &[MarkerSpec], selected: Option<&str>) {
        tracing::info!(markers = markers.len(), selected, "Rendering markers");
        for marker in markers {
            tracing::debug!(
                vehicle = %marker.vehicle_number,
                lat = marker.lat,
                lon = marker.lon,
                title = %marker.title,
                "Marker"
            );
        }
    }

    fn clear(&mut self) {
        tracing::info!("Clearing all markers");
    }

    fn frame_bounds(&mut self, bounds: &LatLngBounds) {
        tracing::info!(?bounds, "Framing camera to bounds");
    }

    fn frame_point(&mut self, lat: f64, lon: f64, zoom: f32) {
        tracing::info!(lat, lon, zoom, "Framing camera to point");
    }

    fn notify(&mut self, notice: Notice) {
        tracing::warn!(?notice, "Notice");
    }
}

/// Picker that logs the label list it would present.
#[derive(Debug, Default)]
pub struct LogPicker;

impl LinePicker for LogPicker {
    fn show_lines(&mut self, entries: Vec<String>) {
        tracing::info!(lines = entries.len(), "Line picker entries");
        for entry in entries {
            tracing::debug!(line = %entry, "Picker entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bus;

    #[test]
    fn marker_title_matches_callout_format() {
        let bus = Bus {
            lines: "180".into(),
            lon: 21.01,
            lat: 52.23,
            time: String::new(),
            vehicle_number: "1000".into(),
            brigade: "5".into(),
        };
        let marker = MarkerSpec::for_bus(&bus);
        assert_eq!(marker.title, "Linia: 180 | Nr pojazdu: 1000");
        assert_eq!(marker.snippet, "1000");
        assert_eq!(marker.vehicle_number, "1000");
    }
}
