use std::fmt::{Display, Formatter};

/// Which supplementary vertex stream is in play this frame.  Also picks how the
/// position buffer gets updated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderMode {
    /// normals feed the light; positions are re-uploaded in full
    Lit,
    /// texture coordinates feed the sampler; only the first half of the positions is re-uploaded
    Textured,
    /// vertex colors only; positions are edited through a buffer mapping
    Plain,
}

/// Discrete user commands
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    ToggleLighting,
    ToggleTexturing,
    ToggleDynamicUpdate,
    Exit,
}

/// What the next `Command` asks of the main loop
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The toggles that the update and draw steps read once per frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RenderState {
    pub lighting: bool,
    pub texturing: bool,
    pub dynamic_update: bool,
}

impl Default for RenderState {
    /// everything on, like the demo starts
    fn default() -> Self {
        Self {
            lighting: true,
            texturing: true,
            dynamic_update: true,
        }
    }
}

impl RenderState {
    /// Lighting wins over texturing; with neither we are `Plain`.
    pub fn render_mode(&self) -> RenderMode {
        if self.lighting {
            RenderMode::Lit
        } else if self.texturing {
            RenderMode::Textured
        } else {
            RenderMode::Plain
        }
    }

    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::ToggleLighting => self.lighting = !self.lighting,
            Command::ToggleTexturing => self.texturing = !self.texturing,
            Command::ToggleDynamicUpdate => self.dynamic_update = !self.dynamic_update,
            Command::Exit => return Flow::Exit,
        }
        log::info!("{:?} -> {}", command, self);
        Flow::Continue
    }
}

impl Display for RenderState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let on_off = |b: bool| if b { "on" } else { "off" };
        write!(
            f,
            "lighting {}, texturing {}, dynamic update {} ({:?})",
            on_off(self.lighting),
            on_off(self.texturing),
            on_off(self.dynamic_update),
            self.render_mode()
        )
    }
}
