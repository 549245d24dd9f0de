// Headless Runtime - drives a VR character through a scripted session
//
// Builds a small room with rapier colliders and a nav mesh, plays back a
// synthetic headset/controller recording and logs every teleport the
// character makes. Useful for checking tunables without a headset.

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context;
use cgmath::{vec2, vec3, Deg, InnerSpace, Quaternion, Rotation, Rotation3, Vector2, Vector3};
use clap::{Parser, ValueEnum};
use engine::logging::{init_logging, DEFAULT_LOG_ENV};
use tracing::{debug, info, trace};
use vr_explorer::{
    AimSource, BeginPlayContext, CameraFadeRequest, GameLoopActor, InputComponent,
    MaterialParameters, NavCell, NavMesh, PhysicsWorld, PlayerController, Pose, TeleportEvent,
    TickContext, TrackingState, VrCharacter, VrCharacterConfig,
};

const VIEWPORT_WIDTH: f32 = 1832.0;
const VIEWPORT_HEIGHT: f32 = 1920.0;
const VERTICAL_FOV_DEGREES: f32 = 90.0;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Aim {
    Head,
    Left,
    Right,
}

impl From<Aim> for AimSource {
    fn from(aim: Aim) -> Self {
        match aim {
            Aim::Head => AimSource::Head,
            Aim::Left => AimSource::LeftHand,
            Aim::Right => AimSource::RightHand,
        }
    }
}

#[derive(Parser)]
#[command(name = "headless_runtime")]
#[command(about = "Scripted VR character session without a headset")]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value = "540")]
    ticks: u32,

    /// Frames per second
    #[arg(long, default_value = "90")]
    tick_rate: f32,

    /// Character config (JSON). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device used to aim the teleport, overriding the config
    #[arg(short, long, value_enum)]
    aim: Option<Aim>,

    /// Pull and release the teleport trigger every N frames
    #[arg(long, default_value = "120")]
    teleport_every: u32,
}

/// Pinhole projection from a camera pose shared with the session loop
struct HeadlessController {
    camera: Rc<RefCell<Pose>>,
}

impl PlayerController for HeadlessController {
    fn start_camera_fade(&mut self, request: CameraFadeRequest) {
        debug!(
            "camera fade {:.1} -> {:.1} over {:.2}s (hold: {})",
            request.from_alpha, request.to_alpha, request.duration, request.hold_when_finished
        );
    }

    fn project_world_to_screen(&self, world_location: Vector3<f32>) -> Option<Vector2<f32>> {
        let camera = *self.camera.borrow();
        let inverse = camera.rotation.invert();
        let local = inverse.rotate_vector(world_location - camera.position);

        // Camera looks down -Z
        if local.z >= 0.0 {
            return None;
        }

        let focal = 1.0 / (VERTICAL_FOV_DEGREES.to_radians() / 2.0).tan();
        let aspect = VIEWPORT_WIDTH / VIEWPORT_HEIGHT;
        let ndc_x = focal / aspect * local.x / -local.z;
        let ndc_y = focal * local.y / -local.z;

        Some(vec2(
            (ndc_x + 1.0) * 0.5 * VIEWPORT_WIDTH,
            (1.0 - ndc_y) * 0.5 * VIEWPORT_HEIGHT,
        ))
    }

    fn viewport_size(&self) -> Vector2<f32> {
        vec2(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }
}

struct LoggingMaterial;

impl MaterialParameters for LoggingMaterial {
    fn set_scalar_parameter(&mut self, name: &str, value: f32) {
        trace!("blinker {} = {:.3}", name, value);
    }

    fn set_vector_parameter(&mut self, name: &str, value: cgmath::Vector4<f32>) {
        trace!("blinker {} = ({:.3}, {:.3})", name, value.x, value.y);
    }
}

/// 20m x 20m floor, a raised platform and a pillar in front of the spawn
fn build_room() -> anyhow::Result<(PhysicsWorld, NavMesh)> {
    let identity = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    let mut world = PhysicsWorld::new();
    world.add_ground(0.0, 10.0);
    world.add_static_box(vec3(2.0, 0.25, 2.0), vec3(0.0, 0.25, -8.0), identity);
    world.add_static_box(vec3(0.5, 1.5, 0.5), vec3(1.5, 1.5, -3.0), identity);

    let nav = NavMesh::new(vec![
        NavCell::rect(-10.0, -6.0, 10.0, 10.0, 0.0),
        NavCell::rect(-10.0, -10.0, -2.0, -6.0, 0.0),
        NavCell::rect(2.0, -10.0, 10.0, -6.0, 0.0),
        NavCell::rect(-2.0, -10.0, 2.0, -6.0, 0.5),
    ])
    .context("building nav mesh")?;

    Ok((world, nav))
}

/// Player standing in the middle of the play area, slowly sweeping the
/// aiming hand left and right
fn scripted_tracking(time: f32) -> TrackingState {
    let sway = (time * 0.7).sin();
    let head = Pose::new(
        vec3(0.2 * sway, 1.7, 0.1 * (time * 0.3).cos()),
        Quaternion::from_angle_y(Deg(10.0 * sway)),
    );

    let hand_rotation =
        Quaternion::from_angle_y(Deg(35.0 * sway)) * Quaternion::from_angle_x(Deg(-15.0));
    let right_hand = Pose::new(head.position + vec3(0.25, -0.45, -0.3), hand_rotation);
    let left_hand = Pose::new(head.position + vec3(-0.25, -0.45, -0.3), hand_rotation);

    TrackingState {
        head,
        left_hand: Some(left_hand),
        right_hand: Some(right_hand),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(DEFAULT_LOG_ENV);

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VrCharacterConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => VrCharacterConfig::default(),
    };
    if let Some(aim) = args.aim {
        config.aim_source = aim.into();
    }
    config.validate()?;

    if args.tick_rate <= 0.0 {
        anyhow::bail!("tick rate must be positive, got {}", args.tick_rate);
    }
    let delta_time = 1.0 / args.tick_rate;

    let (world, nav) = build_room()?;
    info!(
        "room ready: {} colliders, {} nav cells",
        world.collider_count(),
        nav.cells().len()
    );

    let camera = Rc::new(RefCell::new(Pose::at(vec3(0.0, 1.7, 0.0))));
    let mut character = VrCharacter::new(config);
    character.begin_play(BeginPlayContext {
        controller: Some(Box::new(HeadlessController {
            camera: camera.clone(),
        })),
        blinker_material: Some(Box::new(LoggingMaterial)),
    });

    let mut input = InputComponent::new();
    character.setup_player_input(&mut input);
    let teleport_action = character.config().bindings.teleport_action.clone();

    let mut previous_location = character.actor_location();
    let mut teleports = 0;

    for tick in 0..args.ticks {
        let time = tick as f32 * delta_time;

        // Trigger held for a few frames, then released
        if args.teleport_every > 0 {
            let phase = tick % args.teleport_every;
            let trigger = if phase + 5 >= args.teleport_every { 1.0 } else { 0.0 };
            if let Some(command) = input.feed_trigger(&teleport_action, trigger) {
                character.handle_command(command);
            }
        }

        let location = character.actor_location();
        let velocity = (location - previous_location) / delta_time;
        previous_location = location;

        character.tick(&TickContext {
            delta_time,
            tracking: scripted_tracking(time),
            velocity,
            collision: &world,
            navigation: &nav,
        });
        *camera.borrow_mut() = character.camera_world_pose();

        for event in character.take_events() {
            match event {
                TeleportEvent::Began { destination } => {
                    info!("[{:>4}] teleport toward {:?}", tick, destination)
                }
                TeleportEvent::Relocated { location } => {
                    teleports += 1;
                    info!("[{:>4}] relocated to {:?}", tick, location)
                }
                TeleportEvent::FadeInStarted => debug!("[{:>4}] fading back in", tick),
                TeleportEvent::Completed => debug!("[{:>4}] teleport complete", tick),
            }
        }
    }

    character.end_play();

    let final_location = character.actor_location();
    info!(
        "finished {} ticks: {} teleports, final location {:?} ({:.2}m from spawn)",
        args.ticks,
        teleports,
        final_location,
        vec3(final_location.x, 0.0, final_location.z).magnitude()
    );

    Ok(())
}
