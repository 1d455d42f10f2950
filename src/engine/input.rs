use glam::Vec2;

/// Axis magnitude below which input reads as neutral.
const AXIS_DEADZONE: f32 = 0.5;

/// Device-level input for one frame, before normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    pub move_axis: Vec2,
    pub jump: bool,
    pub grab: bool,
    pub dash: bool,
    pub attack: bool,
}

/// Polled once per logic update by the host.
pub trait InputProvider {
    fn poll(&mut self, now: f32) -> RawInput;
}

/// Timeline of held inputs, each active from its start time until the next.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<(f32, RawInput)>,
}

impl ScriptedInput {
    pub fn new(mut steps: Vec<(f32, RawInput)>) -> Self {
        steps.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { steps }
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self, now: f32) -> RawInput {
        self.steps
            .iter()
            .take_while(|(at, _)| *at <= now)
            .last()
            .map(|(_, input)| *input)
            .unwrap_or_default()
    }
}

/// Normalized input as states read it.
///
/// Axes are -1, 0 or 1. `jump` and `dash` are edge-triggered presses that
/// stay set until a state consumes them; a jump press also expires after the
/// configured hold time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub x: i32,
    pub y: i32,
    pub jump: bool,
    /// The jump button is up.
    pub jump_stop: bool,
    pub grab: bool,
    pub dash: bool,
    pub attack: bool,
    jump_held: bool,
    dash_held: bool,
    jump_pressed_at: f32,
}

impl InputSnapshot {
    pub fn refresh(&mut self, raw: &RawInput, now: f32, jump_hold_time: f32) {
        self.x = normalize_axis(raw.move_axis.x);
        self.y = normalize_axis(raw.move_axis.y);

        if raw.jump && !self.jump_held {
            self.jump = true;
            self.jump_pressed_at = now;
        }
        self.jump_stop = !raw.jump;
        self.jump_held = raw.jump;
        if self.jump && now >= self.jump_pressed_at + jump_hold_time {
            self.jump = false;
        }

        if raw.dash && !self.dash_held {
            self.dash = true;
        } else if !raw.dash {
            self.dash = false;
        }
        self.dash_held = raw.dash;

        self.grab = raw.grab;
        self.attack = raw.attack;
    }

    pub fn use_jump(&mut self) {
        self.jump = false;
    }

    pub fn use_dash(&mut self) {
        self.dash = false;
    }
}

fn normalize_axis(value: f32) -> i32 {
    if value.abs() < AXIS_DEADZONE {
        0
    } else {
        value.signum() as i32
    }
}
