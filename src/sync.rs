//! The bus-data synchronization core.
//!
//! `SyncController` is a single-task state machine fed by discrete
//! [`MapEvent`] messages from the map and picker collaborators. It owns the
//! polling cadence, the fetch throttle, the last-known-good snapshot and the
//! viewport/line filtering, and pushes marker sets out through the
//! [`MapPresenter`] trait. The only work that leaves the task is the HTTP
//! fetch itself, awaited inline so requests can never overlap.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::display::{FetchFailure, LinePicker, MapPresenter, MarkerSpec, Notice};
use crate::models::Bus;
use crate::providers::{ApiError, VehicleSource};
use crate::services::bounds::{filter_by_line, filter_within_bounds, LatLngBounds};
use crate::services::lines::{line_picker_entries, SHOW_ALL_LABEL};

/// Zoom the camera returns to after "show all".
const SHOW_ALL_ZOOM: f32 = 15.0;

/// Inbound events from the map and picker collaborators.
#[derive(Debug, Clone)]
pub enum MapEvent {
    /// The map widget finished initializing with its first viewport.
    MapReady { viewport: LatLngBounds, zoom: f32 },
    /// Camera movement stopped; the viewport settled.
    CameraIdle { viewport: LatLngBounds, zoom: f32 },
    /// The user tapped a vehicle marker.
    MarkerTapped { vehicle_number: String },
    /// The user picked an entry in the line list.
    LineSelected(Selection),
    /// The user opened the line picker.
    LinePickerRequested,
    /// Explicit refresh request; subject to the usual throttle.
    RefreshRequested,
    Shutdown,
}

/// A line-picker choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The show-all sentinel entry
    All,
    Line(String),
}

impl Selection {
    /// Map a picker label back to a selection.
    pub fn from_label(label: &str) -> Self {
        if label == SHOW_ALL_LABEL {
            Selection::All
        } else {
            Selection::Line(label.to_string())
        }
    }
}

/// Coordinates fetching, filtering and rendering of live bus positions.
pub struct SyncController {
    source: Arc<dyn VehicleSource>,
    presenter: Box<dyn MapPresenter>,
    picker: Box<dyn LinePicker>,
    config: SyncConfig,

    /// Full last successful fetch, already ingest-filtered
    all_buses: Vec<Bus>,
    /// Monotonic time of the last successful fetch, drives the throttle
    last_fetch: Option<Instant>,
    /// Wall-clock twin of `last_fetch`, only for notice text
    last_fetch_wall: Option<DateTime<Utc>>,
    /// Forces one unconditional fetch at startup
    is_first_load: bool,
    selected_line: Option<String>,
    visible_bounds: Option<LatLngBounds>,
    zoom: f32,
    /// Marker whose callout reopens after a refresh
    selected_bus_id: Option<String>,
    /// Mirror of what is currently drawn
    active_markers: HashSet<String>,

    /// Deadline of the next periodic tick; None until the map is ready
    next_tick: Option<Instant>,
    /// Deadline of the pending debounced viewport refresh
    debounce_at: Option<Instant>,
}

impl SyncController {
    pub fn new(
        source: Arc<dyn VehicleSource>,
        presenter: Box<dyn MapPresenter>,
        picker: Box<dyn LinePicker>,
        config: SyncConfig,
    ) -> Self {
        Self {
            source,
            presenter,
            picker,
            config,
            all_buses: Vec::new(),
            last_fetch: None,
            last_fetch_wall: None,
            is_first_load: true,
            selected_line: None,
            visible_bounds: None,
            zoom: 0.0,
            selected_bus_id: None,
            active_markers: HashSet::new(),
            next_tick: None,
            debounce_at: None,
        }
    }

    /// Drive the controller until `Shutdown` arrives or all senders are
    /// dropped. Timers die with this task; an in-flight fetch is simply
    /// abandoned.
    pub async fn run(mut self, mut events: mpsc::Receiver<MapEvent>) {
        info!("Sync controller started");
        loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        None | Some(MapEvent::Shutdown) => break,
                        Some(event) => self.handle_event(event).await,
                    }
                }
                _ = sleep_until(self.next_tick.unwrap_or_else(Instant::now)),
                        if self.next_tick.is_some() => {
                    self.on_tick().await;
                }
                _ = sleep_until(self.debounce_at.unwrap_or_else(Instant::now)),
                        if self.debounce_at.is_some() => {
                    self.debounce_at = None;
                    self.on_viewport_settled().await;
                }
            }
        }
        info!("Sync controller stopped");
    }

    pub(crate) async fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::MapReady { viewport, zoom } => self.on_map_ready(viewport, zoom).await,
            MapEvent::CameraIdle { viewport, zoom } => self.on_camera_idle(viewport, zoom),
            MapEvent::MarkerTapped { vehicle_number } => {
                self.selected_bus_id = Some(vehicle_number);
            }
            MapEvent::LineSelected(selection) => self.on_line_selected(selection),
            MapEvent::LinePickerRequested => {
                self.picker.show_lines(line_picker_entries(&self.all_buses));
            }
            MapEvent::RefreshRequested => self.load_bus_data(false).await,
            MapEvent::Shutdown => {}
        }
    }

    async fn on_map_ready(&mut self, viewport: LatLngBounds, zoom: f32) {
        self.visible_bounds = Some(viewport);
        self.zoom = zoom;
        self.load_bus_data(true).await;
        // First scheduled tick fires a full high-zoom interval after map-ready.
        self.next_tick = Some(Instant::now() + Duration::from_millis(self.config.high_zoom_interval_ms));
    }

    fn on_camera_idle(&mut self, viewport: LatLngBounds, zoom: f32) {
        self.visible_bounds = Some(viewport);
        self.zoom = zoom;
        // Restart the debounce; only the last settle in a burst does work.
        self.debounce_at = Some(Instant::now() + Duration::from_millis(self.config.map_update_delay_ms));
    }

    /// Periodic refresh. High zoom fetches (forced past the throttle) and
    /// re-arms at the fast cadence; low zoom only re-arms at the slow one.
    async fn on_tick(&mut self) {
        let interval = if self.zoom >= self.config.min_zoom_level {
            self.load_bus_data(true).await;
            Duration::from_millis(self.config.high_zoom_interval_ms)
        } else {
            Duration::from_millis(self.config.low_zoom_interval_ms)
        };
        self.next_tick = Some(Instant::now() + interval);
    }

    /// Debounced viewport-settle handler.
    async fn on_viewport_settled(&mut self) {
        // A line view owns the display; panning does not re-filter it.
        if self.selected_line.is_some() {
            return;
        }

        debug!(zoom = self.zoom, "Viewport settled");

        if self.zoom < self.config.min_zoom_level {
            self.presenter.clear();
            self.active_markers.clear();
            return;
        }

        // Local re-filter of the current snapshot against the new viewport.
        if !self.all_buses.is_empty() {
            let visible = filter_within_bounds(&self.all_buses, self.visible_bounds.as_ref());
            self.render(&visible);
        }

        self.load_bus_data(false).await;
    }

    /// Fetch the full vehicle set, subject to the throttle. `forced` bypasses
    /// the interval check but never the viewport precondition.
    async fn load_bus_data(&mut self, forced: bool) {
        if !forced && !self.is_first_load {
            let elapsed_enough = self.last_fetch.is_none_or(|last| {
                last.elapsed() >= Duration::from_millis(self.config.min_api_call_interval_ms)
            });
            if !elapsed_enough {
                debug!("Fetch throttled");
                return;
            }
        }

        // Never fetch before the first viewport is known.
        if self.visible_bounds.is_none() {
            return;
        }
        self.is_first_load = false;

        match self.source.fetch_all().await {
            Ok(envelope) => {
                let buses = envelope.into_displayable();
                if buses.is_empty() {
                    self.fall_back(FetchFailure::NoData);
                } else {
                    info!(buses = buses.len(), "Fetched bus positions");
                    self.all_buses = buses;
                    self.last_fetch = Some(Instant::now());
                    self.last_fetch_wall = Some(Utc::now());
                    self.render_current();
                }
            }
            Err(e) => {
                let cause = match e {
                    ApiError::Network(_) => FetchFailure::Network,
                    ApiError::Api(_) | ApiError::Parse(_) => FetchFailure::Api,
                };
                warn!(error = %e, "Bus fetch failed, keeping previous snapshot");
                self.fall_back(cause);
            }
        }
    }

    /// Failed or empty fetch: keep the previous snapshot if there is one.
    fn fall_back(&mut self, cause: FetchFailure) {
        if self.all_buses.is_empty() {
            self.presenter.notify(Notice::NoDataAvailable { cause });
            return;
        }
        let as_of = self
            .last_fetch_wall
            .map(format_timestamp)
            .unwrap_or_default();
        self.presenter.notify(Notice::StaleData { cause, as_of });
        self.render_current();
    }

    fn on_line_selected(&mut self, selection: Selection) {
        match selection {
            Selection::All => {
                self.selected_line = None;
                self.presenter.notify(Notice::ShowingAllLines);
                if let Some(bounds) = self.visible_bounds {
                    let (lat, lon) = bounds.center();
                    self.presenter.frame_point(lat, lon, SHOW_ALL_ZOOM);
                }
                let all = self.all_buses.clone();
                self.render(&all);
            }
            Selection::Line(line) => {
                self.selected_line = Some(line.clone());
                let matching = filter_by_line(&self.all_buses, &line);
                if matching.is_empty() {
                    self.presenter.notify(Notice::NoBusesForLine(line));
                    return;
                }
                self.presenter.notify(Notice::LineChosen(line));
                self.render(&matching);
                let points: Vec<(f64, f64)> = matching.iter().map(|b| (b.lat, b.lon)).collect();
                if let Some(rect) = LatLngBounds::around(&points) {
                    self.presenter.frame_bounds(&rect);
                }
            }
        }
    }

    /// Snapshot view for the current mode: line filter when a line is
    /// selected, viewport filter otherwise.
    fn render_current(&mut self) {
        let buses = match &self.selected_line {
            Some(line) => filter_by_line(&self.all_buses, line),
            None => filter_within_bounds(&self.all_buses, self.visible_bounds.as_ref()),
        };
        self.render(&buses);
    }

    fn render(&mut self, buses: &[Bus]) {
        let markers: Vec<MarkerSpec> = buses.iter().map(MarkerSpec::for_bus).collect();
        self.active_markers = markers.iter().map(|m| m.vehicle_number.clone()).collect();
        let selected = self
            .selected_bus_id
            .as_deref()
            .filter(|id| self.active_markers.contains(*id));
        self.presenter.render(&markers, selected);
    }
}

/// Render an instant as `YYYY-MM-DD HH:MM:SS`, the format the stale-data
/// notice uses.
pub fn format_timestamp<Tz: TimeZone>(t: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}
