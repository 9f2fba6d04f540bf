use serde::Serialize;
use tracing::warn;

use crate::context::{
    DeviceCaps, DrawCall, GraphicsContext, ProgramHandle, TextureHandle, UniformValue,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum GpuCommand {
    UseProgram {
        program: ProgramHandle,
    },
    Uniform {
        program: ProgramHandle,
        name: &'static str,
        value: UniformValue,
    },
    DepthRange {
        near: f32,
        far: f32,
    },
    PointSize {
        size: f32,
    },
    BindTexture {
        unit: u32,
        texture: TextureHandle,
    },
    Draw(DrawCall),
}

/// Graphics backend that records every state change instead of talking to a
/// device. Used for tests and for tracing the command stream of a frame.
#[derive(Debug, Default)]
pub struct RecordingContext {
    caps: DeviceCaps,
    current: Option<ProgramHandle>,
    commands: Vec<GpuCommand>,
    unbound_uniform_writes: u32,
}

impl RecordingContext {
    pub fn new(caps: DeviceCaps) -> Self {
        Self {
            caps,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[GpuCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<GpuCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|c| match c {
            GpuCommand::Draw(call) => Some(call),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draw_calls().count()
    }

    /// Last value written to `name` on `program`, if any.
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<UniformValue> {
        self.commands.iter().rev().find_map(|c| match c {
            GpuCommand::Uniform {
                program: p,
                name: n,
                value,
            } if *p == program && *n == name => Some(*value),
            _ => None,
        })
    }

    /// Number of uniform writes issued while a different program was bound.
    pub fn unbound_uniform_writes(&self) -> u32 {
        self.unbound_uniform_writes
    }
}

impl GraphicsContext for RecordingContext {
    fn caps(&self) -> DeviceCaps {
        self.caps
    }

    fn current_program(&self) -> Option<ProgramHandle> {
        self.current
    }

    fn bind_program(&mut self, program: ProgramHandle) {
        self.current = Some(program);
        self.commands.push(GpuCommand::UseProgram { program });
    }

    fn set_uniform(&mut self, program: ProgramHandle, name: &'static str, value: UniformValue) {
        if self.current != Some(program) {
            warn!(
                "uniform {name} written to program {} while {:?} is bound",
                program.0, self.current
            );
            self.unbound_uniform_writes += 1;
        }
        self.commands.push(GpuCommand::Uniform {
            program,
            name,
            value,
        });
    }

    fn set_depth_range(&mut self, near: f32, far: f32) {
        self.commands.push(GpuCommand::DepthRange { near, far });
    }

    fn set_point_size(&mut self, size: f32) {
        self.commands.push(GpuCommand::PointSize { size });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.commands.push(GpuCommand::BindTexture { unit, texture });
    }

    fn draw(&mut self, call: DrawCall) {
        self.commands.push(GpuCommand::Draw(call));
    }
}
