use std::collections::HashMap;

use engine::input_log;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Raw input delivered by the host
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Axis { name: String, value: f32 },
    Action { name: String, state: ButtonState },
}

impl InputEvent {
    pub fn axis(name: &str, value: f32) -> Self {
        InputEvent::Axis {
            name: name.to_owned(),
            value,
        }
    }

    pub fn action(name: &str, state: ButtonState) -> Self {
        InputEvent::Action {
            name: name.to_owned(),
            state,
        }
    }
}

/// What the character does in response to bound input
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CharacterCommand {
    MoveForward(f32),
    MoveRight(f32),
    BeginTeleport,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisCommand {
    MoveForward,
    MoveRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionCommand {
    BeginTeleport,
}

/// Names of the input mappings the character binds to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBindings {
    pub forward_axis: String,
    pub right_axis: String,
    pub teleport_action: String,
    /// Analog trigger value at which the teleport button counts as held
    pub trigger_threshold: f32,
}

impl Default for InputBindings {
    fn default() -> Self {
        InputBindings {
            forward_axis: "Forward".to_owned(),
            right_axis: "Right".to_owned(),
            teleport_action: "Teleport".to_owned(),
            trigger_threshold: 0.5,
        }
    }
}

/// Turns an analog value into press/release edges
#[derive(Clone, Debug, Default)]
pub struct ButtonEdge {
    was_pressed: bool,
}

impl ButtonEdge {
    pub fn update(&mut self, value: f32, threshold: f32) -> Option<ButtonState> {
        let is_pressed = value >= threshold;
        let edge = match (self.was_pressed, is_pressed) {
            (false, true) => Some(ButtonState::Pressed),
            (true, false) => Some(ButtonState::Released),
            _ => None,
        };
        self.was_pressed = is_pressed;
        edge
    }

    pub fn is_pressed(&self) -> bool {
        self.was_pressed
    }
}

/// Binding table filled in by `GameLoopActor::setup_player_input`
#[derive(Default)]
pub struct InputComponent {
    axis_bindings: HashMap<String, AxisCommand>,
    action_bindings: HashMap<(String, ButtonState), ActionCommand>,
    trigger_edges: HashMap<String, ButtonEdge>,
    trigger_threshold: Option<f32>,
}

impl InputComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_axis(&mut self, name: &str, command: AxisCommand) {
        self.axis_bindings.insert(name.to_owned(), command);
    }

    pub fn bind_action(&mut self, name: &str, state: ButtonState, command: ActionCommand) {
        self.action_bindings.insert((name.to_owned(), state), command);
    }

    pub fn set_trigger_threshold(&mut self, threshold: f32) {
        self.trigger_threshold = Some(threshold);
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.axis_bindings.contains_key(name)
            || self.action_bindings.keys().any(|(n, _)| n == name)
    }

    /// Resolve an event against the bindings. Unbound input is ignored.
    pub fn dispatch(&self, event: &InputEvent) -> Option<CharacterCommand> {
        let command = match event {
            InputEvent::Axis { name, value } => {
                self.axis_bindings.get(name).map(|axis| match axis {
                    AxisCommand::MoveForward => CharacterCommand::MoveForward(*value),
                    AxisCommand::MoveRight => CharacterCommand::MoveRight(*value),
                })
            }
            InputEvent::Action { name, state } => self
                .action_bindings
                .get(&(name.clone(), *state))
                .map(|action| match action {
                    ActionCommand::BeginTeleport => CharacterCommand::BeginTeleport,
                }),
        };

        if let (Some(command), InputEvent::Action { name, state }) = (&command, event) {
            input_log!(DEBUG, "{} {:?} -> {:?}", name, state, command);
        }
        command
    }

    /// Feed an analog trigger for the action `name`; a threshold crossing is
    /// dispatched as the matching press or release action.
    pub fn feed_trigger(&mut self, name: &str, value: f32) -> Option<CharacterCommand> {
        let threshold = self.trigger_threshold.unwrap_or(0.5);
        let state = self
            .trigger_edges
            .entry(name.to_owned())
            .or_default()
            .update(value, threshold)?;

        self.dispatch(&InputEvent::action(name, state))
    }
}
