// Teleport locomotion
//
// The player aims with a tracked device, the arc (or a straight trace) is
// projected onto the nav mesh, and releasing the teleport button fades the
// camera out, moves the character, holds, then fades back in.

pub mod arc_renderer;
pub mod targeting;
pub mod teleport_system;
pub mod trajectory;

pub use arc_renderer::{ArcMeshPool, ArcRenderer, SplinePoint, TeleportSpline};
pub use targeting::{DestinationMarker, TeleportTarget, find_teleport_destination};
pub use teleport_system::{TeleportEvent, TeleportPhase, TeleportSystem, TeleportTimer};
pub use trajectory::{ArcTrajectory, ProjectileParams};
