pub mod blinkers;
pub mod character;
pub mod config;
pub mod curve;
pub mod error;
pub mod host;
pub mod input_context;
pub mod locomotion;
pub mod navigation;
pub mod physics;
pub mod teleport;

#[cfg(test)]
pub(crate) mod test_support;

pub use character::VrCharacter;
pub use config::{AimSource, TargetingMode, VrCharacterConfig};
pub use error::{VrError, VrResult};
pub use host::{
    BeginPlayContext, CameraFadeRequest, CollisionWorld, GameLoopActor, MaterialParameters,
    NavigationQuery, PlayerController, Pose, TickContext, TraceHit, TrackingState,
};
pub use input_context::{ButtonState, CharacterCommand, InputComponent, InputEvent};
pub use navigation::{NavCell, NavMesh};
pub use physics::PhysicsWorld;
pub use teleport::{TeleportEvent, TeleportPhase};
