use crate::render_state::Command;
use winit::keyboard::{KeyCode, PhysicalKey};

/// The keyboard binding for each [Command]
pub fn command_for_key(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::KeyL => Some(Command::ToggleLighting),
        KeyCode::KeyT => Some(Command::ToggleTexturing),
        KeyCode::KeyD => Some(Command::ToggleDynamicUpdate),
        KeyCode::Escape => Some(Command::Exit),
        _ => None,
    }
}

pub fn command_for_physical_key(key: PhysicalKey) -> Option<Command> {
    match key {
        PhysicalKey::Code(code) => command_for_key(code),
        PhysicalKey::Unidentified(_) => None,
    }
}
