//! UI state of the globe explorer.
//!
//! `GlobeSession` owns the flight director and the event bus and reacts to
//! user input. It never performs I/O: weather fetches are queued as
//! [`WeatherRequest`]s for the host to run, and their outcome is fed back
//! through [`GlobeSession::apply_weather`].

use std::cell::RefCell;
use std::rc::Rc;

use catalog::City;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use foundation::math::{clamp_latitude, clamp_longitude, GeoCoordinate};
use rand::Rng;
use runtime::{EventBus, Frame, GlobeEvent};
use scene::overlay::OverlayKind;
use scene::pins::{visible_labels, visible_pins, CityLabel, CityPin, PinKey, Visible};
use scene::{needs_fly, CameraRig, FlightDirector, FlightPolicy, FlightRequest};
use tracing::{debug, info, warn};
use weather::{classify, DateWindow, WeatherError, WeatherRequest, WeatherResponse, WeatherSummary};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Name,
    Coords,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    NoLocation,
    DateOutOfRange { date: NaiveDate, window: DateWindow },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoLocation => write!(f, "select a location first"),
            SessionError::DateOutOfRange { date, window } => write!(
                f,
                "{date} is outside the selectable range {} to {}",
                window.min, window.max
            ),
        }
    }
}

impl std::error::Error for SessionError {}

/// What to do once a flight lands.
#[derive(Debug, Clone)]
enum Arrival {
    /// The coordinate panel's "Go".
    ZoomedIn,
    /// "Check weather" for a location at a given time.
    Weather {
        location: GeoCoordinate,
        at: NaiveDateTime,
    },
}

/// Pins and labels for every catalog city.
pub fn city_pins(cities: &[City]) -> (Vec<CityPin>, Vec<CityLabel>) {
    let pins: Vec<CityPin> = cities
        .iter()
        .map(|c| CityPin::new(c.name.clone(), c.coordinate, c.population))
        .collect();
    let labels = pins.iter().map(CityLabel::for_pin).collect();
    (pins, labels)
}

pub struct GlobeSession<R> {
    director: FlightDirector<R>,
    bus: EventBus,
    arrivals: Rc<RefCell<Vec<Arrival>>>,
    frame: Frame,

    selected: Option<GeoCoordinate>,
    animated_pin: Option<PinKey>,
    overlay: Option<OverlayKind>,
    zoomed_in: bool,
    loading: bool,
    summary: WeatherSummary,
    date_time: NaiveDateTime,
    today: NaiveDate,
    search_mode: SearchMode,
    years_back: u32,
    fetches: Vec<WeatherRequest>,
}

impl<R: CameraRig> GlobeSession<R> {
    /// A session whose selectable dates are centred on `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self::with_policy(now, FlightPolicy::default())
    }

    pub fn with_policy(now: NaiveDateTime, policy: FlightPolicy) -> Self {
        Self {
            director: FlightDirector::new(policy),
            bus: EventBus::new(),
            arrivals: Rc::new(RefCell::new(Vec::new())),
            frame: Frame::new(0, 0.0),
            selected: None,
            animated_pin: None,
            overlay: None,
            zoomed_in: false,
            loading: false,
            summary: WeatherSummary::default(),
            date_time: now,
            today: now.date(),
            search_mode: SearchMode::default(),
            years_back: weather::DEFAULT_YEARS_BACK,
            fetches: Vec::new(),
        }
    }

    pub fn with_years_back(mut self, years_back: u32) -> Self {
        self.years_back = years_back;
        self
    }

    pub fn selected_location(&self) -> Option<GeoCoordinate> {
        self.selected
    }

    pub fn animated_pin(&self) -> Option<&PinKey> {
        self.animated_pin.as_ref()
    }

    pub fn overlay(&self) -> Option<OverlayKind> {
        self.overlay
    }

    pub fn is_zoomed_in(&self) -> bool {
        self.zoomed_in
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Orbit controls accept user rotation only while nothing is loading.
    pub fn rotate_enabled(&self) -> bool {
        !self.loading
    }

    pub fn summary(&self) -> &WeatherSummary {
        &self.summary
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.date_time
    }

    pub fn date_window(&self) -> DateWindow {
        DateWindow::around(self.today)
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    pub fn is_flying(&self) -> bool {
        self.director.is_flying()
    }

    /// Bus for flight events. Its log only holds events since the last
    /// [`GlobeSession::tick`].
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Weather requests queued since the last call, oldest first.
    pub fn take_fetches(&mut self) -> Vec<WeatherRequest> {
        std::mem::take(&mut self.fetches)
    }

    pub fn visible_pins<'a>(&self, pins: &'a [CityPin]) -> Vec<Visible<'a, CityPin>> {
        visible_pins(pins, self.animated_pin.as_ref())
    }

    pub fn visible_labels<'a>(&self, labels: &'a [CityLabel]) -> Vec<Visible<'a, CityLabel>> {
        visible_labels(labels, self.animated_pin.as_ref())
    }

    pub fn select_city(&mut self, city: &City) -> FlightRequest {
        info!(city = %city.name, country = %city.country, "city selected");
        self.select_location(city.coordinate)
    }

    pub fn select_pin(&mut self, pin: &CityPin) -> FlightRequest {
        info!(city = %pin.name, "pin selected");
        self.select_location(pin.coordinate)
    }

    /// Fly to the location without fetching; the user asks for weather
    /// separately.
    fn select_location(&mut self, location: GeoCoordinate) -> FlightRequest {
        self.selected = Some(location);
        self.animated_pin = None;
        self.overlay = None;
        self.director.fly_to(location, self.frame, &mut self.bus)
    }

    /// The coordinate panel's "Go": fetch at once and fly.
    pub fn go_to_coordinates(&mut self, latitude: f64, longitude: f64) -> FlightRequest {
        let location = GeoCoordinate::new(clamp_latitude(latitude), clamp_longitude(longitude));
        info!(
            lat = location.latitude,
            lng = location.longitude,
            "go to coordinates"
        );
        self.animated_pin = None;
        self.selected = Some(location);
        self.overlay = None;
        self.request_fetch(location, self.date_time);
        self.fly_then(location, Arrival::ZoomedIn)
    }

    /// Zoom onto the selected location (flying only if the camera is far
    /// away), then fetch its weather.
    pub fn check_weather(&mut self, camera_distance: f64) -> Result<(), SessionError> {
        let location = self.selected.ok_or(SessionError::NoLocation)?;
        let window = self.date_window();
        let date = self.date_time.date();
        if !window.contains(date) {
            return Err(SessionError::DateOutOfRange { date, window });
        }

        let arrival = Arrival::Weather {
            location,
            at: self.date_time,
        };
        if needs_fly(camera_distance) {
            debug!(camera_distance, "camera too far, flying before fetch");
            self.fly_then(location, arrival);
        } else {
            self.arrive(arrival);
        }
        Ok(())
    }

    /// Advance camera flights by one frame and react to whatever landed.
    pub fn tick(&mut self, frame: Frame, rig: &mut R) {
        self.frame = frame;
        self.director.tick(frame, rig, &mut self.bus);

        // Subscribers already saw these at emit time.
        for event in self.bus.drain() {
            if let GlobeEvent::PinAnimated(coord) = event.kind {
                self.on_pin_animated(coord);
            }
        }

        let arrivals = std::mem::take(&mut *self.arrivals.borrow_mut());
        for arrival in arrivals {
            self.arrive(arrival);
        }
    }

    pub fn on_pin_animated(&mut self, coord: GeoCoordinate) {
        self.animated_pin = Some(PinKey::from_coordinate(coord));
    }

    /// The user started dragging the globe.
    pub fn on_orbit_start(&mut self) {
        self.animated_pin = None;
        self.overlay = None;
        self.zoomed_in = false;
    }

    /// Store a finished fetch. Errors leave the previous summary in place and
    /// are handed back for the host to report.
    pub fn apply_weather(
        &mut self,
        result: Result<WeatherResponse, WeatherError>,
    ) -> Result<(), WeatherError> {
        self.loading = false;
        match result {
            Ok(resp) => {
                self.summary = WeatherSummary::from_response(&resp);
                self.overlay = classify(&resp);
                info!(
                    overlay = self.overlay.map(OverlayKind::name).unwrap_or("none"),
                    rain = self.summary.rain_percentage,
                    "weather applied"
                );
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "weather fetch failed");
                Err(err)
            }
        }
    }

    /// Change the day, keeping the hour.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date_time = date.and_time(self.date_time.time());
    }

    /// Change the hour (clamped to 23), keeping the day.
    pub fn set_hour(&mut self, hour: u32) {
        if let Some(dt) = self.date_time.with_hour(hour.min(23)) {
            self.date_time = dt;
        }
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search_mode = mode;
    }

    pub fn show_overlay(&mut self, kind: OverlayKind) {
        self.overlay = Some(kind);
    }

    pub fn hide_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn show_random_overlay<G: Rng + ?Sized>(&mut self, rng: &mut G) -> OverlayKind {
        let kind = OverlayKind::random(rng);
        self.overlay = Some(kind);
        kind
    }

    /// Stats panel rows, shown once data is in and the camera has settled.
    pub fn stats_panel(&self) -> Option<Vec<String>> {
        if self.loading || self.selected.is_none() || !self.zoomed_in {
            return None;
        }
        Some(self.summary.panel_lines())
    }

    fn fly_then(&mut self, location: GeoCoordinate, arrival: Arrival) -> FlightRequest {
        let inbox = Rc::clone(&self.arrivals);
        self.director.fly_to_then(
            location,
            move || inbox.borrow_mut().push(arrival),
            self.frame,
            &mut self.bus,
        )
    }

    fn arrive(&mut self, arrival: Arrival) {
        match arrival {
            Arrival::ZoomedIn => self.zoomed_in = true,
            Arrival::Weather { location, at } => {
                self.animated_pin = Some(PinKey::from_coordinate(location));
                self.zoomed_in = true;
                self.request_fetch(location, at);
            }
        }
    }

    fn request_fetch(&mut self, location: GeoCoordinate, at: NaiveDateTime) {
        self.loading = true;
        self.fetches
            .push(WeatherRequest::new(location, at).with_years_back(self.years_back));
    }
}
