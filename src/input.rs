use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::entities::GameState;

/// Normalized per-step view of the keyboard that entities read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controller {
    /// Accumulated horizontal axis; pressing left and right together cancels out.
    pub move_x: i32,
    /// Accumulated vertical axis, positive is down.
    pub move_y: i32,
    pub action_1: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Action1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    MoveX,
    MoveY,
}

/// What a bound key does to the controller while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Button(Button),
    /// Adds `modifier` to the axis.
    Axis(Axis, i32),
}

/// Key code to controller effect table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(KeyCode, Binding)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (KeyCode::Char(' '), Binding::Button(Button::Action1)),
                (KeyCode::Char('d'), Binding::Axis(Axis::MoveX, 1)),
                (KeyCode::Char('a'), Binding::Axis(Axis::MoveX, -1)),
                (KeyCode::Char('w'), Binding::Axis(Axis::MoveY, -1)),
                (KeyCode::Char('s'), Binding::Axis(Axis::MoveY, 1)),
                (KeyCode::Right, Binding::Axis(Axis::MoveX, 1)),
                (KeyCode::Left, Binding::Axis(Axis::MoveX, -1)),
                (KeyCode::Up, Binding::Axis(Axis::MoveY, -1)),
                (KeyCode::Down, Binding::Axis(Axis::MoveY, 1)),
            ],
        }
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, code: KeyCode, binding: Binding) -> Self {
        self.bindings.push((normalize(code), binding));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &(KeyCode, Binding)> {
        self.bindings.iter()
    }
}

/// Letter keys are matched case-insensitively so Shift or Caps Lock do not
/// leave a key stuck down.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Raw key state plus the bindings that turn it into a [`Controller`].
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Held keys and when they were last seen pressed.
    raw_input: HashMap<KeyCode, Instant>,
    bindings: KeyBindings,
    /// Set when the terminal cannot report releases.
    hold_timeout: Option<Duration>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputHandler {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            raw_input: HashMap::new(),
            bindings,
            hold_timeout: None,
        }
    }

    /// Treat keys as released `timeout` after their last press or repeat.
    pub fn with_hold_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.hold_timeout = timeout;
        self
    }

    pub fn press(&mut self, code: KeyCode, now: Instant) {
        self.raw_input.insert(normalize(code), now);
    }

    pub fn release(&mut self, code: KeyCode) {
        self.raw_input.remove(&normalize(code));
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.raw_input.contains_key(&normalize(code))
    }

    pub fn release_all(&mut self) {
        self.raw_input.clear();
    }

    /// Drops keys whose hold window has run out. No-op when releases are reported.
    pub fn expire_stale(&mut self, now: Instant) {
        if let Some(timeout) = self.hold_timeout {
            self.raw_input
                .retain(|_, pressed_at| now.saturating_duration_since(*pressed_at) < timeout);
        }
    }

    /// Resets every button and axis the bindings touch.
    pub fn reset_controller(&self, controller: &mut Controller) {
        for (_, binding) in self.bindings.iter() {
            match binding {
                Binding::Button(Button::Action1) => controller.action_1 = false,
                Binding::Axis(Axis::MoveX, _) => controller.move_x = 0,
                Binding::Axis(Axis::MoveY, _) => controller.move_y = 0,
            }
        }
    }

    /// Reset, then accumulate every held key into the controller.
    pub fn poll_controller(&self, controller: &mut Controller) {
        self.reset_controller(controller);

        for (code, binding) in self.bindings.iter() {
            if !self.raw_input.contains_key(code) {
                continue;
            }
            match *binding {
                Binding::Button(Button::Action1) => controller.action_1 = true,
                Binding::Axis(Axis::MoveX, modifier) => controller.move_x += modifier,
                Binding::Axis(Axis::MoveY, modifier) => controller.move_y += modifier,
            }
        }
    }
}

/// Application-level actions triggered by a single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Pause,
    Resume,
    Quit,
}

/// Drains terminal events, turning them into one-shot actions and raw key state
#[derive(Default)]
pub struct InputManager {
    oneshot_actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls for all pending events without blocking.
    /// Should be called once per frame before `take_actions`.
    pub fn poll_events(
        &mut self,
        game_state: GameState,
        input: &mut InputHandler,
    ) -> color_eyre::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => {
                    self.handle_key_event(key_event, game_state, input, Instant::now());
                }
                Event::FocusLost => {
                    // Releases that happen while unfocused never arrive
                    input.release_all();
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn handle_key_event(
        &mut self,
        key_event: KeyEvent,
        game_state: GameState,
        input: &mut InputHandler,
        now: Instant,
    ) {
        match key_event.kind {
            KeyEventKind::Press => {
                if let Some(action) = oneshot_action(key_event, game_state) {
                    tracing::debug!(?action, ?game_state, "input action");
                    self.oneshot_actions.push(action);
                } else if game_state != GameState::Paused {
                    input.press(key_event.code, now);
                }
            }
            KeyEventKind::Repeat => {
                if game_state != GameState::Paused {
                    input.press(key_event.code, now);
                }
            }
            KeyEventKind::Release => input.release(key_event.code),
        }
    }

    /// Returns and clears the one-shot actions collected since the last call.
    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.oneshot_actions)
    }
}

fn oneshot_action(key_event: KeyEvent, game_state: GameState) -> Option<InputAction> {
    // Quit works in any state
    if matches!(
        key_event.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key_event.code == KeyCode::Char('c')
        && key_event.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(InputAction::Quit);
    }

    if matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P')) {
        return match game_state {
            GameState::Playing => Some(InputAction::Pause),
            GameState::Paused => Some(InputAction::Resume),
            GameState::GameOver => None,
        };
    }

    None
}
