use cgmath::{Matrix4, Vector3, vec3};
use engine::{input_log, scene::SceneObject, teleport_log};
use tracing::info;

use crate::{
    blinkers::Blinkers,
    config::{AimSource, VrCharacterConfig},
    host::{
        BeginPlayContext, GameLoopActor, PlayerController, Pose, TickContext, TrackingState,
    },
    input_context::{
        ActionCommand, AxisCommand, ButtonState, CharacterCommand, InputComponent, InputEvent,
    },
    locomotion::{MovementInput, apply_recenter},
    teleport::{
        ArcRenderer, DestinationMarker, TeleportEvent, TeleportSystem, find_teleport_destination,
    },
};

/// Undrained teleport events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 64;

/// Room-scale VR player: recentering, teleport locomotion with an arc
/// preview, smooth movement axes and a comfort vignette.
///
/// World positions are `actor_location + vr_root_offset + tracked pose`.
pub struct VrCharacter {
    config: VrCharacterConfig,
    actor_location: Vector3<f32>,
    vr_root_offset: Vector3<f32>,
    tracking: TrackingState,

    marker: DestinationMarker,
    marker_object: SceneObject,
    arc: ArcRenderer,
    teleport: TeleportSystem,
    blinkers: Blinkers,
    movement: MovementInput,

    controller: Option<Box<dyn PlayerController>>,
    events: Vec<TeleportEvent>,
}

impl VrCharacter {
    /// Spawn standing at the origin, with the VR root on the floor
    pub fn new(config: VrCharacterConfig) -> Self {
        let half_height = config.capsule_half_height;
        let marker_object =
            SceneObject::new(config.arc.marker_mesh.clone(), config.arc.marker_material.clone());
        let arc = ArcRenderer::new(config.arc.clone());
        let blinkers = Blinkers::new(config.blinkers.clone());

        VrCharacter {
            actor_location: vec3(0.0, half_height, 0.0),
            vr_root_offset: vec3(0.0, -half_height, 0.0),
            tracking: TrackingState::head_only(Pose::at(vec3(0.0, 0.0, 0.0))),
            marker: DestinationMarker::new(),
            marker_object,
            arc,
            teleport: TeleportSystem::new(),
            blinkers,
            movement: MovementInput::new(),
            controller: None,
            events: Vec::new(),
            config,
        }
    }

    /// Place the capsule so its base rests on `floor_location`
    pub fn set_floor_location(&mut self, floor_location: Vector3<f32>) {
        self.actor_location = floor_location + vec3(0.0, self.config.capsule_half_height, 0.0);
    }

    pub fn config(&self) -> &VrCharacterConfig {
        &self.config
    }

    pub fn actor_location(&self) -> Vector3<f32> {
        self.actor_location
    }

    pub fn vr_root_offset(&self) -> Vector3<f32> {
        self.vr_root_offset
    }

    pub fn marker(&self) -> &DestinationMarker {
        &self.marker
    }

    pub fn marker_object(&self) -> &SceneObject {
        &self.marker_object
    }

    pub fn arc_renderer(&self) -> &ArcRenderer {
        &self.arc
    }

    pub fn teleport(&self) -> &TeleportSystem {
        &self.teleport
    }

    pub fn is_teleporting(&self) -> bool {
        self.teleport.is_teleporting()
    }

    pub fn has_controller(&self) -> bool {
        self.controller.is_some()
    }

    fn vr_root_location(&self) -> Vector3<f32> {
        self.actor_location + self.vr_root_offset
    }

    fn to_world(&self, pose: Pose) -> Pose {
        Pose::new(self.vr_root_location() + pose.position, pose.rotation)
    }

    pub fn camera_world_pose(&self) -> Pose {
        self.to_world(self.tracking.head)
    }

    /// World pose of the configured aim device, None while that hand is untracked
    pub fn aim_pose(&self) -> Option<Pose> {
        let local = match self.config.aim_source {
            AimSource::Head => Some(self.tracking.head),
            AimSource::LeftHand => self.tracking.left_hand,
            AimSource::RightHand => self.tracking.right_hand,
        };
        local.map(|pose| self.to_world(pose))
    }

    /// Teleport events raised since the last call. Hosts are expected to
    /// drain this every frame; at most `MAX_PENDING_EVENTS` are kept.
    pub fn take_events(&mut self) -> Vec<TeleportEvent> {
        std::mem::take(&mut self.events)
    }

    fn record_event(&mut self, event: TeleportEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let dropped = self.events.remove(0);
            teleport_log!(WARN, "event queue full, dropping {:?}", dropped);
        }
        self.events.push(event);
    }

    /// Movement requested through the locomotion axes since the last call
    pub fn consume_movement_input(&mut self) -> Vector3<f32> {
        self.movement.consume()
    }

    pub fn handle_command(&mut self, command: CharacterCommand) {
        match command {
            CharacterCommand::MoveForward(throttle) => self.move_forward(throttle),
            CharacterCommand::MoveRight(throttle) => self.move_right(throttle),
            CharacterCommand::BeginTeleport => {
                self.begin_teleport();
            }
        }
    }

    /// Resolve `event` against `input` and run the bound command, if any
    pub fn handle_input(&mut self, input: &InputComponent, event: &InputEvent) {
        if let Some(command) = input.dispatch(event) {
            self.handle_command(command);
        }
    }

    pub fn move_forward(&mut self, throttle: f32) {
        let forward = self.camera_world_pose().forward();
        self.movement.add(forward, throttle);
    }

    pub fn move_right(&mut self, throttle: f32) {
        let right = self.camera_world_pose().right();
        self.movement.add(right, throttle);
    }

    /// Returns true when a teleport actually started
    pub fn begin_teleport(&mut self) -> bool {
        let event = self
            .teleport
            .begin(&self.config, &self.marker, self.controller.as_deref_mut());
        match event {
            Some(event) => {
                self.record_event(event);
                true
            }
            None => false,
        }
    }

    fn update_destination_marker(&mut self, context: &TickContext) {
        let target = self.aim_pose().and_then(|aim| {
            find_teleport_destination(&self.config, &aim, context.collision, context.navigation)
        });

        let pinned = self.teleport.pinned_marker_location();
        self.marker.update(target.as_ref().map(|t| t.location), pinned);

        self.marker_object.set_visibility(self.marker.visible);
        if self.marker.visible {
            self.marker_object.set_world_position(self.marker.location);
        }

        let component_transform = Matrix4::from_translation(self.vr_root_location());
        match target {
            Some(target) if pinned.is_none() => {
                self.arc.draw_teleport_path(&target.path, component_transform)
            }
            _ => self.arc.draw_teleport_path(&[], component_transform),
        }
    }
}

impl GameLoopActor for VrCharacter {
    fn begin_play(&mut self, context: BeginPlayContext) {
        self.controller = context.controller;
        self.blinkers.set_material(context.blinker_material);
        self.marker_object.set_visibility(true);

        if self.controller.is_none() {
            teleport_log!(WARN, "character spawned without a player controller");
        }
        info!("vr character ready at {:?}", self.actor_location);
    }

    fn tick(&mut self, context: &TickContext) {
        self.tracking = context.tracking;

        let camera = self.camera_world_pose();
        apply_recenter(&mut self.actor_location, &mut self.vr_root_offset, camera.position);

        let events = self.teleport.advance(
            context.delta_time,
            &self.config,
            &mut self.actor_location,
            self.controller.as_deref_mut(),
        );
        for event in events {
            self.record_event(event);
        }

        self.update_destination_marker(context);

        let camera = self.camera_world_pose();
        self.blinkers.update(
            context.velocity,
            camera.position,
            camera.forward(),
            self.controller.as_deref(),
        );
    }

    fn setup_player_input(&self, input: &mut InputComponent) {
        let bindings = &self.config.bindings;
        input.bind_axis(&bindings.forward_axis, AxisCommand::MoveForward);
        input.bind_axis(&bindings.right_axis, AxisCommand::MoveRight);
        input.bind_action(
            &bindings.teleport_action,
            ButtonState::Released,
            ActionCommand::BeginTeleport,
        );
        input.set_trigger_threshold(bindings.trigger_threshold);

        input_log!(
            DEBUG,
            "bound {}, {} and {}",
            bindings.forward_axis,
            bindings.right_axis,
            bindings.teleport_action
        );
    }

    fn end_play(&mut self) {
        self.teleport.teardown();
        self.controller = None;
        self.blinkers.set_material(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        host::{CollisionWorld, NavigationQuery},
        navigation::{NavCell, NavMesh},
        teleport::TeleportPhase,
        test_support::{
            AcceptAllNavigation, FlatWorld, RecordingController, RecordingMaterial,
            RejectAllNavigation,
        },
    };
    use cgmath::{Deg, Quaternion, Rotation3, vec4};

    const DT: f32 = 1.0 / 90.0;

    fn aiming_down(angle: f32) -> TrackingState {
        TrackingState {
            head: Pose::at(vec3(0.0, 1.7, 0.0)),
            left_hand: None,
            right_hand: Some(Pose::new(
                vec3(0.2, 1.2, -0.3),
                Quaternion::from_angle_x(Deg(-angle)),
            )),
        }
    }

    fn tick_context<'a>(
        tracking: TrackingState,
        delta_time: f32,
        collision: &'a dyn CollisionWorld,
        navigation: &'a dyn NavigationQuery,
    ) -> TickContext<'a> {
        TickContext {
            delta_time,
            tracking,
            velocity: vec3(0.0, 0.0, 0.0),
            collision,
            navigation,
        }
    }

    fn spawned(controller: &RecordingController) -> VrCharacter {
        let mut character = VrCharacter::new(VrCharacterConfig::default());
        character.begin_play(BeginPlayContext {
            controller: Some(Box::new(controller.clone())),
            blinker_material: None,
        });
        character
    }

    fn floor() -> NavMesh {
        NavMesh::new(vec![NavCell::rect(-50.0, -50.0, 50.0, 50.0, 0.0)]).unwrap()
    }

    #[test]
    fn test_marker_tracks_valid_target() {
        let controller = RecordingController::default();
        let mut character = spawned(&controller);
        let world = FlatWorld::new(0.0);
        let nav = floor();

        character.tick(&tick_context(aiming_down(20.0), DT, &world, &nav));

        assert!(character.marker().visible);
        assert!(character.marker_object().visible);
        assert_eq!(character.marker_object().get_world_position(), character.marker().location);
        assert!(character.marker().location.z < -1.0);
        assert!(character.arc_renderer().pool().visible_count() > 0);
    }

    #[test]
    fn test_unprojectable_hit_hides_marker() {
        let controller = RecordingController::default();
        let mut character = spawned(&controller);
        let world = FlatWorld::new(0.0);

        character.tick(&tick_context(aiming_down(20.0), DT, &world, &RejectAllNavigation));

        assert!(!character.marker().visible);
        assert!(!character.marker_object().visible);
        assert_eq!(character.arc_renderer().pool().visible_count(), 0);
        assert!(!character.begin_teleport());
    }

    #[test]
    fn test_untracked_hand_hides_marker() {
        let controller = RecordingController::default();
        let mut character = spawned(&controller);
        let world = FlatWorld::new(0.0);

        let tracking = TrackingState::head_only(Pose::at(vec3(0.0, 1.7, 0.0)));
        character.tick(&tick_context(tracking, DT, &world, &AcceptAllNavigation));
        assert!(!character.marker().visible);
    }

    #[test]
    fn test_teleport_lands_on_snapshot() {
        let controller = RecordingController::default();
        let mut character = spawned(&controller);
        let world = FlatWorld::new(0.0);
        let nav = floor();

        character.tick(&tick_context(aiming_down(20.0), DT, &world, &nav));
        let snapshot = character.marker().location;
        assert!(character.begin_teleport());
        assert!(!character.begin_teleport());

        // aim somewhere else while the screen is fading out
        character.tick(&tick_context(aiming_down(60.0), 0.3, &world, &nav));
        assert_eq!(character.marker().location, snapshot);
        assert!(character.marker().visible);
        assert_eq!(character.arc_renderer().pool().visible_count(), 0);

        character.tick(&tick_context(aiming_down(60.0), 0.35, &world, &nav));
        let expected = snapshot + vec3(0.0, character.config().capsule_half_height, 0.0);
        assert_eq!(
            character.take_events(),
            vec![
                TeleportEvent::Began {
                    destination: snapshot
                },
                TeleportEvent::Relocated { location: expected },
            ]
        );
        assert!(character.is_teleporting());

        character.tick(&tick_context(aiming_down(60.0), 0.25, &world, &nav));
        assert!(!character.is_teleporting());
        character.tick(&tick_context(aiming_down(60.0), 0.7, &world, &nav));
        assert_eq!(character.teleport().phase(), TeleportPhase::Idle);
        assert_eq!(
            character.take_events(),
            vec![TeleportEvent::FadeInStarted, TeleportEvent::Completed]
        );
        assert_eq!(controller.fades.borrow().len(), 2);
    }

    #[test]
    fn test_undrained_events_are_bounded() {
        let mut character = VrCharacter::new(VrCharacterConfig::default());
        let overflow = MAX_PENDING_EVENTS + 3;
        for i in 0..overflow {
            character.record_event(TeleportEvent::Began {
                destination: vec3(i as f32, 0.0, 0.0),
            });
        }

        let events = character.take_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(
            events[0],
            TeleportEvent::Began {
                destination: vec3(3.0, 0.0, 0.0)
            }
        );
        assert!(character.take_events().is_empty());
    }

    #[test]
    fn test_recentering_keeps_camera_in_world() {
        let controller = RecordingController::default();
        let mut character = spawned(&controller);
        let world = FlatWorld::new(0.0);

        let mut tracking = aiming_down(20.0);
        tracking.head.position = vec3(0.5, 1.7, -0.25);
        let camera_before = character.vr_root_location() + tracking.head.position;

        character.tick(&tick_context(tracking, DT, &world, &RejectAllNavigation));

        assert_eq!(character.camera_world_pose().position, camera_before);
        assert_eq!(character.actor_location().x, 0.5);
        assert_eq!(character.actor_location().z, -0.25);
    }

    #[test]
    fn test_no_controller_disables_teleport() {
        let mut character = VrCharacter::new(VrCharacterConfig::default());
        character.begin_play(BeginPlayContext::default());
        let world = FlatWorld::new(0.0);
        let nav = floor();

        character.tick(&tick_context(aiming_down(20.0), DT, &world, &nav));
        assert!(character.marker().visible);
        assert!(!character.begin_teleport());
        assert!(character.take_events().is_empty());
    }

    #[test]
    fn test_end_play_cancels_pending_teleport() {
        let controller = RecordingController::default();
        let mut character = spawned(&controller);
        let world = FlatWorld::new(0.0);
        let nav = floor();

        character.tick(&tick_context(aiming_down(20.0), DT, &world, &nav));
        let start = character.actor_location();
        assert!(character.begin_teleport());
        character.end_play();

        character.tick(&tick_context(aiming_down(20.0), 5.0, &world, &nav));
        assert_eq!(character.actor_location(), start);
        assert_eq!(character.teleport().pending_timers(), 0);
    }

    #[test]
    fn test_input_bindings_drive_character() {
        let controller = RecordingController::default();
        let mut character = spawned(&controller);
        let mut input = InputComponent::new();
        character.setup_player_input(&mut input);

        character.handle_input(&input, &InputEvent::axis("Forward", 1.0));
        character.handle_input(&input, &InputEvent::axis("Right", 0.5));
        assert_eq!(character.consume_movement_input(), vec3(0.5, 0.0, -1.0));
        assert_eq!(character.consume_movement_input(), vec3(0.0, 0.0, 0.0));

        let world = FlatWorld::new(0.0);
        let nav = floor();
        character.tick(&tick_context(aiming_down(20.0), DT, &world, &nav));

        character.handle_input(&input, &InputEvent::action("Teleport", ButtonState::Pressed));
        assert!(!character.is_teleporting());
        character.handle_input(&input, &InputEvent::action("Teleport", ButtonState::Released));
        assert!(character.is_teleporting());
    }

    #[test]
    fn test_blinkers_centre_when_stationary() {
        let controller = RecordingController::default();
        let material = RecordingMaterial::default();
        let mut character = VrCharacter::new(VrCharacterConfig::default());
        character.begin_play(BeginPlayContext {
            controller: Some(Box::new(controller)),
            blinker_material: Some(Box::new(material.clone())),
        });

        let world = FlatWorld::new(0.0);
        character.tick(&tick_context(aiming_down(20.0), DT, &world, &RejectAllNavigation));

        assert_eq!(material.vector("Centre"), Some(vec4(0.5, 0.5, 0.0, 0.0)));
        assert_eq!(material.scalar("Radius"), Some(1.0));
    }
}
