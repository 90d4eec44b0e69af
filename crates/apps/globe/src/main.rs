use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use foundation::math::{project, GeoCoordinate, Vec3, GLOBE_RADIUS};
use globe::config::GlobeConfig;
use globe::session::{GlobeSession, SessionError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use runtime::{EventBus, Frame, GlobeEvent};
use scene::overlay::{build_overlay, Overlay, OverlayKind, Viewport};
use scene::{CameraRig, FlightDirector, FlightPlan, OrbitCamera};
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather::WeatherClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless globe weather explorer")]
struct Args {
    /// Populated-places GeoJSON (default: $GLOBE_PLACES_PATH)
    #[arg(long)]
    places: Option<String>,

    /// Weather backend base URL (default: $WEATHER_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search cities by name or country
    Search { query: String },

    /// Project a coordinate onto the globe
    Project {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long, default_value_t = GLOBE_RADIUS)]
        radius: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        height: f64,
    },

    /// Simulate a camera fly-to and print each phase
    Fly {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Starting camera position: x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        from: Option<Vec3>,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    },

    /// Fly to a coordinate and fetch its historical weather
    Weather {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Target day, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Target hour, 0-23 (default: now)
        #[arg(long)]
        hour: Option<u32>,
        /// Seed for the overlay particle layout
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Describe a weather overlay for a viewport
    Overlay {
        kind: OverlayKind,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = GlobeConfig::from_env()?;
    if let Some(places) = args.places {
        config.places_path = places.into();
    }
    if let Some(url) = args.api_url {
        config.weather_api_url = url;
    }

    match args.command {
        Command::Search { query } => search(&config, &query)?,
        Command::Project {
            lat,
            lng,
            radius,
            height,
        } => {
            let p = project(GeoCoordinate::new(lat, lng), radius, height);
            println!("{:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        Command::Fly { lat, lng, from, fps } => fly(GeoCoordinate::new(lat, lng), from, fps)?,
        Command::Weather {
            lat,
            lng,
            date,
            hour,
            seed,
        } => fetch_weather(&config, lat, lng, date, hour, seed).await?,
        Command::Overlay {
            kind,
            width,
            height,
            seed,
        } => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            describe_overlay(&build_overlay(kind, Viewport::new(width, height), &mut rng));
        }
    }

    Ok(())
}

fn search(config: &GlobeConfig, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = catalog::Catalog::load(&config.places_path)?;
    info!(cities = catalog.len(), path = %config.places_path.display(), "catalog loaded");
    for city in catalog.search(query) {
        println!(
            "{}, {} ({:.3}, {:.3}) pop {}",
            city.name,
            city.country,
            city.coordinate.latitude,
            city.coordinate.longitude,
            city.population
        );
    }
    Ok(())
}

fn fly(
    target: GeoCoordinate,
    from: Option<Vec3>,
    fps: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("--fps must be positive, got {fps}").into());
    }
    let dt = 1.0 / fps;

    let mut cam = OrbitCamera::new();
    if let Some(from) = from {
        cam.set_camera_position(from);
    }

    let plan = FlightPlan::new(cam.camera_position(), target);
    println!(
        "plan: zoom-out {:.0} ms, rotate {:.0} ms, zoom-in {:.0} ms (total {:.0} ms)",
        plan.zoom_out_ms,
        plan.rotate_ms,
        plan.zoom_in_ms,
        plan.total_ms()
    );

    let mut bus = EventBus::new();
    bus.subscribe(move |event| match &event.kind {
        GlobeEvent::PhaseEntered { phase, .. } => {
            let ms = event.frame_index as f64 * dt * 1000.0;
            println!("frame {:>5} ({ms:>7.1} ms): {phase}", event.frame_index);
        }
        GlobeEvent::PinAnimated(coord) => {
            println!("pin animated at {},{}", coord.latitude, coord.longitude);
        }
        _ => {}
    });

    let mut director: FlightDirector<OrbitCamera> = FlightDirector::default();
    let mut frame = Frame::new(0, dt);
    director.fly_to(target, frame, &mut bus);
    while director.is_flying() {
        director.tick(frame, &mut cam, &mut bus);
        frame = frame.next();
    }

    let p = cam.camera_position();
    let t = cam.look_at();
    println!("camera {:.3} {:.3} {:.3}", p.x, p.y, p.z);
    println!("look-at {:.3} {:.3} {:.3}", t.x, t.y, t.z);
    Ok(())
}

async fn fetch_weather(
    config: &GlobeConfig,
    lat: f64,
    lng: f64,
    date: Option<NaiveDate>,
    hour: Option<u32>,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = chrono::Local::now().naive_local();
    let mut session: GlobeSession<OrbitCamera> =
        GlobeSession::new(now).with_years_back(config.years_back);
    if let Some(date) = date {
        session.set_date(date);
    }
    if let Some(hour) = hour {
        session.set_hour(hour);
    }

    let window = session.date_window();
    let day = session.date_time().date();
    if !window.contains(day) {
        return Err(SessionError::DateOutOfRange { date: day, window }.into());
    }

    let mut cam = OrbitCamera::new();
    session.go_to_coordinates(lat, lng);
    let mut frame = Frame::new(1, 1.0 / 60.0);
    while session.is_flying() {
        session.tick(frame, &mut cam);
        frame = frame.next();
    }

    let client = WeatherClient::new(config.weather_api_url.clone());
    for request in session.take_fetches() {
        let result = client.fetch(&request).await;
        session.apply_weather(result)?;
    }

    match session.stats_panel() {
        Some(lines) => lines.iter().for_each(|line| println!("{line}")),
        None => println!("no weather to show"),
    }
    if let Some(kind) = session.overlay() {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        describe_overlay(&build_overlay(kind, Viewport::new(1280.0, 720.0), &mut rng));
    }
    Ok(())
}

fn describe_overlay(overlay: &Overlay) {
    match overlay {
        Overlay::Rain { drops } => println!("rain: {} drops", drops.len()),
        Overlay::Thunder { drops, bolt, flash } => {
            let [r, g, b, a] = flash.tint.rgba;
            println!(
                "thunder: {} drops, bolt of {} points, rgba({r}, {g}, {b}, {a}) wash \
                 flashing every {} s",
                drops.len(),
                bolt.points.len(),
                flash.period_s
            );
        }
        Overlay::Snow { flakes } => println!("snow: {} flakes", flakes.len()),
        Overlay::Sunny { sun } => println!(
            "sunny: sun at ({}, {}) with {} rays",
            sun.center[0],
            sun.center[1],
            sun.rays.len()
        ),
        Overlay::Dusty { tint } => {
            let [r, g, b, a] = tint.rgba;
            println!("dusty: rgba({r}, {g}, {b}, {a})");
        }
    }
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {s:?}")),
    }
}
