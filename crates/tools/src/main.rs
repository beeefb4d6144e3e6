use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use formats::AssetHandle;
use foundation::math::{LngLat, Mat4, lifted_position, project, render_scale};
use layers::host::{MapEvent, MarkerKind, RecordingMap};
use layers::pins::{FileAssetSource, PinsLayer};
use layers::route::RouteSegmentMeta;
use layers::LayerId;
use route_view::{RouteMapView, ViewConfig};
use runtime::LocationEvent;
use scene::{ObjectKind, Pin, PinId};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless tools for the 3D route map overlay")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a coordinate and show where a pin of the given height lands
    Project {
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Real-world pin height in meters
        #[arg(long, default_value_t = 35.0)]
        height_m: f64,

        /// Native height of the model being placed
        #[arg(long, default_value_t = 1.2)]
        native_height: f64,
    },
    /// Parse a glTF/GLB pin model and report its bounds
    InspectAsset { path: PathBuf },
    /// Run a scenario against an in-memory map and print the resulting overlay state
    Preview {
        scenario: PathBuf,

        /// View config JSON (defaults apply to missing fields)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory asset URLs are resolved against
        #[arg(long, default_value = ".")]
        assets: PathBuf,

        /// Host frames to render after the scenario
        #[arg(long, default_value_t = 1)]
        frames: u32,
    },
}

/// Inputs a hosting screen would hand to the map.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Scenario {
    pins: Vec<Pin>,
    route: Vec<[f64; 2]>,
    segments: Vec<RouteSegmentMeta>,
    photos: HashMap<String, String>,
    location: Option<LngLat>,
    /// Pin ids clicked in order, after the style has loaded.
    clicks: Vec<PinId>,
}

#[derive(Debug, Serialize)]
struct MarkerSummary {
    text: Option<String>,
    image: Option<String>,
    position: [f64; 2],
}

#[derive(Debug, Serialize)]
struct ObjectSummary {
    pin: PinId,
    fallback: bool,
    world_min: [f64; 3],
    world_max: [f64; 3],
}

#[derive(Debug, Serialize)]
struct FlySummary {
    center: [f64; 2],
    zoom: f64,
}

#[derive(Debug, Serialize)]
struct PreviewSummary {
    layers: Vec<String>,
    markers: BTreeMap<String, Vec<MarkerSummary>>,
    scene: Vec<ObjectSummary>,
    fly_tos: Vec<FlySummary>,
    selected: Vec<PinId>,
    frames_drawn: usize,
    host_errors: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Project {
            lng,
            lat,
            height_m,
            native_height,
        } => cmd_project(LngLat::new(lng, lat), height_m, native_height),
        Command::InspectAsset { path } => cmd_inspect_asset(&path),
        Command::Preview {
            scenario,
            config,
            assets,
            frames,
        } => cmd_preview(&scenario, config.as_deref(), assets, frames),
    }
}

fn cmd_project(at: LngLat, height_m: f64, native_height: f64) -> Result<()> {
    if !at.is_valid() {
        bail!("coordinate {:?} is outside the projectable range", at.as_array());
    }
    if !(native_height > 0.0) {
        bail!("native height must be positive");
    }
    let point = project(at.lng, at.lat);
    let scale = render_scale(height_m, point.meters_to_world_unit, native_height);
    let lifted = lifted_position(&point, native_height, scale);
    let out = serde_json::json!({
        "world": point.world.as_array(),
        "metersToWorldUnit": point.meters_to_world_unit,
        "scale": scale,
        "lifted": lifted.as_array(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_inspect_asset(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let asset = AssetHandle::from_slice(path.display().to_string(), &bytes)
        .with_context(|| format!("parse {}", path.display()))?;
    let bounds = asset.bounds();
    let out = serde_json::json!({
        "meshes": asset.meshes().len(),
        "triangles": asset.meshes().iter().map(|m| m.triangle_count()).sum::<usize>(),
        "empty": bounds.is_empty(),
        "min": bounds.min.as_array(),
        "max": bounds.max.as_array(),
        "size": bounds.size().as_array(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_preview(scenario_path: &Path, config: Option<&Path>, assets: PathBuf, frames: u32) -> Result<()> {
    let json = fs::read_to_string(scenario_path)
        .with_context(|| format!("read {}", scenario_path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .with_context(|| format!("parse scenario {}", scenario_path.display()))?;
    let config = match config {
        Some(path) => ViewConfig::from_path(path)?,
        None => ViewConfig::default(),
    };
    let pins_layer_id = LayerId::new(config.pins.layer_id.clone());

    let mut view = RouteMapView::mount(
        RecordingMap::dark_style(),
        config,
        Rc::new(FileAssetSource::new(assets)),
    );
    let selected = Rc::new(RefCell::new(Vec::new()));
    let sink = selected.clone();
    view.set_on_pin_click(move |pin| sink.borrow_mut().push(pin));

    view.set_pins(scenario.pins.clone());
    view.set_route(scenario.route.iter().copied().map(LngLat::from).collect());
    view.set_segments(scenario.segments);
    view.set_photos(scenario.photos);
    if let Some(at) = scenario.location {
        view.on_location_event(LocationEvent::Position(at));
    }
    view.handle_event(MapEvent::StyleLoaded);

    for pin in &scenario.clicks {
        let Some(at) = scenario.pins.iter().find(|p| &p.id == pin).map(Pin::lng_lat) else {
            bail!("scenario clicks unknown pin {pin}");
        };
        let target = view
            .host()
            .markers_of(MarkerKind::ClickTarget)
            .into_iter()
            .find(|(_, spec)| spec.position == at)
            .map(|(id, _)| id);
        let Some(target) = target else {
            bail!("pin {pin} has no click target (invalid coordinates?)");
        };
        view.handle_event(MapEvent::MarkerClicked(target));
    }

    for _ in 0..frames {
        view.host_mut().render_frame(&Mat4::IDENTITY);
    }

    let summary = summarize(view.host(), &pins_layer_id, selected.borrow().clone())?;
    info!(
        layers = summary.layers.len(),
        objects = summary.scene.len(),
        "preview complete"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn summarize(map: &RecordingMap, pins_layer_id: &LayerId, selected: Vec<PinId>) -> Result<PreviewSummary> {
    let mut markers: BTreeMap<String, Vec<MarkerSummary>> = BTreeMap::new();
    for (_, spec) in map.markers() {
        let kind = serde_json::to_value(spec.element.kind)?;
        let kind = kind.as_str().unwrap_or("unknown").to_string();
        markers.entry(kind).or_default().push(MarkerSummary {
            text: spec.element.text.clone(),
            image: spec.element.image_url.clone(),
            position: spec.position.as_array(),
        });
    }

    let scene = map
        .custom_layer::<PinsLayer>(pins_layer_id)
        .map(|layer| {
            layer
                .scene()
                .objects()
                .map(|object| {
                    let bounds = object.world_bounds();
                    ObjectSummary {
                        pin: object.pin_id.clone(),
                        fallback: object.kind == ObjectKind::FallbackCone,
                        world_min: bounds.min.as_array(),
                        world_max: bounds.max.as_array(),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(PreviewSummary {
        layers: map.layer_ids().into_iter().map(|id| id.0).collect(),
        markers,
        scene,
        fly_tos: map
            .fly_tos()
            .iter()
            .map(|f| FlySummary {
                center: f.center.as_array(),
                zoom: f.zoom,
            })
            .collect(),
        selected,
        frames_drawn: map
            .render_logs()
            .iter()
            .map(|log| log.borrow().frames.len())
            .sum(),
        host_errors: map.errors().to_vec(),
    })
}
