use cgmath::{Vector3, vec3};
use engine::{TimerHandle, TimerQueue, teleport_log};

use crate::{
    config::VrCharacterConfig,
    host::{CameraFadeRequest, PlayerController},
};

use super::DestinationMarker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeleportPhase {
    Idle,
    /// Screen fading to black; the marker is pinned to the snapshot
    FadingOut,
    /// Relocated, holding black for `pause_time`
    Teleported,
    /// Fading back in. A new teleport may already begin.
    FadingIn,
}

/// Continuation tags for the deferred steps of a teleport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeleportTimer {
    FadeOutComplete,
    PauseComplete,
    FadeInComplete,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TeleportEvent {
    Began { destination: Vector3<f32> },
    Relocated { location: Vector3<f32> },
    FadeInStarted,
    Completed,
}

/// Fade -> relocate -> pause -> fade back sequence for one character
pub struct TeleportSystem {
    phase: TeleportPhase,
    is_teleporting: bool,
    is_fading: bool,
    pending_destination: Option<Vector3<f32>>,
    timers: TimerQueue<TeleportTimer>,
    fade_in_timer: Option<TimerHandle>,
}

impl TeleportSystem {
    pub fn new() -> Self {
        TeleportSystem {
            phase: TeleportPhase::Idle,
            is_teleporting: false,
            is_fading: false,
            pending_destination: None,
            timers: TimerQueue::new(),
            fade_in_timer: None,
        }
    }

    pub fn phase(&self) -> TeleportPhase {
        self.phase
    }

    pub fn is_teleporting(&self) -> bool {
        self.is_teleporting
    }

    pub fn is_fading(&self) -> bool {
        self.is_fading
    }

    pub fn pending_destination(&self) -> Option<Vector3<f32>> {
        self.pending_destination
    }

    /// Location the destination marker must stay on this tick, if any
    pub fn pinned_marker_location(&self) -> Option<Vector3<f32>> {
        match self.phase {
            TeleportPhase::FadingOut => self.pending_destination,
            _ => None,
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Start a teleport toward the marker. Refused while one is in progress,
    /// without a controller, or while the marker is hidden.
    pub fn begin(
        &mut self,
        config: &VrCharacterConfig,
        marker: &DestinationMarker,
        controller: Option<&mut (dyn PlayerController + '_)>,
    ) -> Option<TeleportEvent> {
        if self.is_teleporting {
            teleport_log!(DEBUG, "teleport already in progress, ignoring trigger");
            return None;
        }

        let Some(controller) = controller else {
            teleport_log!(DEBUG, "no player controller, teleport unavailable");
            return None;
        };

        let Some(destination) = marker.destination() else {
            teleport_log!(DEBUG, "no valid destination, ignoring trigger");
            return None;
        };

        if let Some(handle) = self.fade_in_timer.take() {
            self.timers.cancel(handle);
        }

        self.is_teleporting = true;
        self.pending_destination = Some(destination);
        self.phase = TeleportPhase::FadingOut;

        self.camera_fade(config, Some(controller), 0.0, 1.0, true);
        self.timers.schedule(config.fade_time, TeleportTimer::FadeOutComplete);

        teleport_log!(INFO, "teleport started toward {:?}", destination);
        Some(TeleportEvent::Began { destination })
    }

    /// Advance the sequence clock and run any steps that came due.
    /// `actor_location` is moved when the fade-out completes.
    pub fn advance(
        &mut self,
        delta_time: f32,
        config: &VrCharacterConfig,
        actor_location: &mut Vector3<f32>,
        mut controller: Option<&mut (dyn PlayerController + '_)>,
    ) -> Vec<TeleportEvent> {
        self.timers.advance(delta_time);

        let mut events = Vec::new();
        while let Some(timer) = self.timers.pop_due() {
            match timer {
                TeleportTimer::FadeOutComplete => {
                    if let Some(event) = self.do_teleport(config, actor_location) {
                        events.push(event);
                    }
                }
                TeleportTimer::PauseComplete => {
                    events.push(self.end_teleport(config, controller.as_deref_mut()));
                }
                TeleportTimer::FadeInComplete => {
                    self.fade_in_timer = None;
                    self.is_fading = false;
                    self.phase = TeleportPhase::Idle;
                    events.push(TeleportEvent::Completed);
                }
            }
        }
        events
    }

    fn do_teleport(
        &mut self,
        config: &VrCharacterConfig,
        actor_location: &mut Vector3<f32>,
    ) -> Option<TeleportEvent> {
        let destination = self.pending_destination?;

        // Marker sits on the floor; the actor origin is the capsule center
        let location = destination + vec3(0.0, 1.0, 0.0) * config.capsule_half_height;
        *actor_location = location;

        self.phase = TeleportPhase::Teleported;
        self.timers.schedule(config.pause_time, TeleportTimer::PauseComplete);

        teleport_log!(DEBUG, "relocated to {:?}", location);
        Some(TeleportEvent::Relocated { location })
    }

    fn end_teleport(
        &mut self,
        config: &VrCharacterConfig,
        controller: Option<&mut (dyn PlayerController + '_)>,
    ) -> TeleportEvent {
        self.camera_fade(config, controller, 1.0, 0.0, false);

        // Input is re-enabled as soon as the fade-in starts
        self.is_teleporting = false;
        self.pending_destination = None;
        self.phase = TeleportPhase::FadingIn;
        self.fade_in_timer = Some(
            self.timers.schedule(config.fade_time, TeleportTimer::FadeInComplete),
        );

        TeleportEvent::FadeInStarted
    }

    fn camera_fade(
        &mut self,
        config: &VrCharacterConfig,
        controller: Option<&mut (dyn PlayerController + '_)>,
        from_alpha: f32,
        to_alpha: f32,
        hold_when_finished: bool,
    ) {
        let Some(controller) = controller else {
            return;
        };

        self.is_fading = true;
        controller.start_camera_fade(CameraFadeRequest {
            from_alpha,
            to_alpha,
            duration: config.fade_time,
            color: config.fade_color,
            fade_audio: true,
            hold_when_finished,
        });
    }

    /// Drop every pending step. Called when the owner is torn down.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.fade_in_timer = None;
        self.phase = TeleportPhase::Idle;
        self.is_teleporting = false;
        self.is_fading = false;
        self.pending_destination = None;
    }
}

impl Default for TeleportSystem {
    fn default() -> Self {
        Self::new()
    }
}
