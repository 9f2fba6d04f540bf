//! Typed wrappers around the line-family shader programs.
//!
//! Programs are compiled and linked elsewhere; this module only resolves
//! their handles and exposes named, typed uniform setters. Every setter
//! assumes the program is currently bound (see
//! [`GraphicsContext::use_program`]).

use std::collections::BTreeMap;
use std::fmt;

use foundation::math::Mat4;

use crate::context::{GraphicsContext, ProgramHandle, UniformValue};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProgramKind {
    Line,
    LineSdf,
    Linejoin,
}

impl ProgramKind {
    pub const ALL: [ProgramKind; 3] = [
        ProgramKind::Line,
        ProgramKind::LineSdf,
        ProgramKind::Linejoin,
    ];

    /// Name the program was registered under at link time.
    pub fn name(self) -> &'static str {
        match self {
            ProgramKind::Line => "line",
            ProgramKind::LineSdf => "linesdf",
            ProgramKind::Linejoin => "linejoin",
        }
    }
}

/// Source of linked programs, looked up by name.
pub trait ProgramRegistry {
    fn program(&self, name: &str) -> Option<ProgramHandle>;
}

impl ProgramRegistry for BTreeMap<String, ProgramHandle> {
    fn program(&self, name: &str) -> Option<ProgramHandle> {
        self.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    Missing(ProgramKind),
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Missing(kind) => {
                write!(f, "shader program {:?} is not linked", kind.name())
            }
        }
    }
}

impl std::error::Error for ProgramError {}

fn set(
    ctx: &mut dyn GraphicsContext,
    program: ProgramHandle,
    name: &'static str,
    value: UniformValue,
) {
    ctx.set_uniform(program, name, value);
}

/// Plain anti-aliased line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineShader {
    pub program: ProgramHandle,
}

impl LineShader {
    pub fn set_matrix(&self, ctx: &mut dyn GraphicsContext, matrix: &Mat4) {
        set(ctx, self.program, "u_matrix", UniformValue::Mat4(matrix.0));
    }

    pub fn set_extrude_matrix(&self, ctx: &mut dyn GraphicsContext, matrix: &Mat4) {
        set(ctx, self.program, "u_exmatrix", UniformValue::Mat4(matrix.0));
    }

    pub fn set_line_width(&self, ctx: &mut dyn GraphicsContext, outset_inset: [f32; 2]) {
        set(ctx, self.program, "u_linewidth", UniformValue::Vec2(outset_inset));
    }

    pub fn set_blur(&self, ctx: &mut dyn GraphicsContext, blur: f32) {
        set(ctx, self.program, "u_blur", UniformValue::Float(blur));
    }

    pub fn set_color(&self, ctx: &mut dyn GraphicsContext, color: [f32; 4]) {
        set(ctx, self.program, "u_color", UniformValue::Vec4(color));
    }
}

/// Dashed line sampling a signed-distance-field pattern from the line atlas.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineSdfShader {
    pub program: ProgramHandle,
}

impl LineSdfShader {
    pub fn set_matrix(&self, ctx: &mut dyn GraphicsContext, matrix: &Mat4) {
        set(ctx, self.program, "u_matrix", UniformValue::Mat4(matrix.0));
    }

    pub fn set_extrude_matrix(&self, ctx: &mut dyn GraphicsContext, matrix: &Mat4) {
        set(ctx, self.program, "u_exmatrix", UniformValue::Mat4(matrix.0));
    }

    pub fn set_line_width(&self, ctx: &mut dyn GraphicsContext, outset_inset: [f32; 2]) {
        set(ctx, self.program, "u_linewidth", UniformValue::Vec2(outset_inset));
    }

    pub fn set_blur(&self, ctx: &mut dyn GraphicsContext, blur: f32) {
        set(ctx, self.program, "u_blur", UniformValue::Float(blur));
    }

    pub fn set_color(&self, ctx: &mut dyn GraphicsContext, color: [f32; 4]) {
        set(ctx, self.program, "u_color", UniformValue::Vec4(color));
    }

    pub fn set_fade(&self, ctx: &mut dyn GraphicsContext, t: f32) {
        set(ctx, self.program, "u_fade", UniformValue::Float(t));
    }

    pub fn set_pattern_scale_a(&self, ctx: &mut dyn GraphicsContext, scale: [f32; 2]) {
        set(ctx, self.program, "u_patternscale_a", UniformValue::Vec2(scale));
    }

    pub fn set_pattern_scale_b(&self, ctx: &mut dyn GraphicsContext, scale: [f32; 2]) {
        set(ctx, self.program, "u_patternscale_b", UniformValue::Vec2(scale));
    }

    pub fn set_tex_y_a(&self, ctx: &mut dyn GraphicsContext, y: f32) {
        set(ctx, self.program, "u_tex_y_a", UniformValue::Float(y));
    }

    pub fn set_tex_y_b(&self, ctx: &mut dyn GraphicsContext, y: f32) {
        set(ctx, self.program, "u_tex_y_b", UniformValue::Float(y));
    }

    pub fn set_gamma(&self, ctx: &mut dyn GraphicsContext, gamma: f32) {
        set(ctx, self.program, "u_gamma", UniformValue::Float(gamma));
    }
}

/// Round caps and joins drawn as point sprites.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LinejoinShader {
    pub program: ProgramHandle,
}

impl LinejoinShader {
    pub fn set_matrix(&self, ctx: &mut dyn GraphicsContext, matrix: &Mat4) {
        set(ctx, self.program, "u_matrix", UniformValue::Mat4(matrix.0));
    }

    pub fn set_color(&self, ctx: &mut dyn GraphicsContext, color: [f32; 4]) {
        set(ctx, self.program, "u_color", UniformValue::Vec4(color));
    }

    /// Half the framebuffer size in pixels.
    pub fn set_world(&self, ctx: &mut dyn GraphicsContext, half_size: [f32; 2]) {
        set(ctx, self.program, "u_world", UniformValue::Vec2(half_size));
    }

    pub fn set_line_width(&self, ctx: &mut dyn GraphicsContext, outset_inset: [f32; 2]) {
        set(ctx, self.program, "u_linewidth", UniformValue::Vec2(outset_inset));
    }

    pub fn set_size(&self, ctx: &mut dyn GraphicsContext, size: f32) {
        set(ctx, self.program, "u_size", UniformValue::Float(size));
    }
}

/// The three programs the line layer draws with, resolved once before the
/// first frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LinePrograms {
    pub line: LineShader,
    pub sdf: LineSdfShader,
    pub linejoin: LinejoinShader,
}

impl LinePrograms {
    pub fn from_registry(registry: &dyn ProgramRegistry) -> Result<Self, ProgramError> {
        let lookup = |kind: ProgramKind| {
            registry
                .program(kind.name())
                .ok_or(ProgramError::Missing(kind))
        };
        Ok(Self {
            line: LineShader {
                program: lookup(ProgramKind::Line)?,
            },
            sdf: LineSdfShader {
                program: lookup(ProgramKind::LineSdf)?,
            },
            linejoin: LinejoinShader {
                program: lookup(ProgramKind::Linejoin)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{LinePrograms, ProgramError, ProgramKind};
    use crate::context::{DeviceCaps, GraphicsContext, ProgramHandle, UniformValue};
    use crate::recorder::RecordingContext;
    use foundation::math::Mat4;

    fn registry() -> BTreeMap<String, ProgramHandle> {
        ProgramKind::ALL
            .iter()
            .enumerate()
            .map(|(i, k)| (k.name().to_string(), ProgramHandle(i as u32 + 1)))
            .collect()
    }

    #[test]
    fn resolves_all_programs() {
        let programs = LinePrograms::from_registry(&registry()).expect("programs");
        assert_eq!(programs.line.program, ProgramHandle(1));
        assert_eq!(programs.sdf.program, ProgramHandle(2));
        assert_eq!(programs.linejoin.program, ProgramHandle(3));
    }

    #[test]
    fn missing_program_is_fatal() {
        let mut reg = registry();
        reg.remove("linesdf");
        let err = LinePrograms::from_registry(&reg).unwrap_err();
        assert_eq!(err, ProgramError::Missing(ProgramKind::LineSdf));
        assert_eq!(err.to_string(), "shader program \"linesdf\" is not linked");
    }

    #[test]
    fn setters_write_named_uniforms() {
        let programs = LinePrograms::from_registry(&registry()).expect("programs");
        let mut ctx = RecordingContext::new(DeviceCaps::default());
        let sdf = programs.sdf;
        ctx.use_program(sdf.program);
        sdf.set_matrix(&mut ctx, &Mat4::IDENTITY);
        sdf.set_tex_y_a(&mut ctx, 0.25);
        sdf.set_gamma(&mut ctx, 1.5);

        assert_eq!(
            ctx.uniform(sdf.program, "u_matrix"),
            Some(UniformValue::Mat4(Mat4::IDENTITY.0))
        );
        assert_eq!(ctx.uniform(sdf.program, "u_tex_y_a"), Some(UniformValue::Float(0.25)));
        assert_eq!(ctx.uniform(sdf.program, "u_gamma"), Some(UniformValue::Float(1.5)));
        assert_eq!(ctx.unbound_uniform_writes(), 0);
    }
}
