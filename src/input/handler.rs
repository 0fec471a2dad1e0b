use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Playback speed requested from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedSetting {
    Slow,
    Normal,
    Fast,
    VeryFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    Restart,
    SetSpeed(SpeedSetting),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            KeyCode::Char('1') => KeyAction::SetSpeed(SpeedSetting::Slow),
            KeyCode::Char('2') => KeyAction::SetSpeed(SpeedSetting::Normal),
            KeyCode::Char('3') => KeyAction::SetSpeed(SpeedSetting::Fast),
            KeyCode::Char('4') => KeyAction::SetSpeed(SpeedSetting::VeryFast),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
