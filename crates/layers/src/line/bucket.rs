use gpu::{BufferHandle, DrawCall, GraphicsContext, Primitive, ProgramHandle};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pre-tessellated line geometry for one (tile, layer).
///
/// Produced off the render thread; immutable for the frame.
pub trait LineBucket {
    fn has_line_data(&self) -> bool;

    fn has_point_data(&self) -> bool;

    fn has_data(&self) -> bool {
        self.has_line_data() || self.has_point_data()
    }

    /// Submits the line triangles against the bound `program`.
    fn draw_lines(&self, ctx: &mut dyn GraphicsContext, program: ProgramHandle);

    /// Submits the join/cap points against the bound `program`.
    fn draw_points(&self, ctx: &mut dyn GraphicsContext, program: ProgramHandle);
}

/// Contiguous range of elements inside an uploaded buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementRange {
    pub first: u32,
    pub count: u32,
}

/// Bucket backed by buffers that were already uploaded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufferedLineBucket {
    pub buffer: BufferHandle,
    pub triangles: ElementRange,
    pub points: ElementRange,
}

impl BufferedLineBucket {
    fn submit(
        &self,
        ctx: &mut dyn GraphicsContext,
        program: ProgramHandle,
        primitive: Primitive,
        range: ElementRange,
    ) {
        if range.count == 0 {
            return;
        }
        if ctx.current_program() != Some(program) {
            warn!(
                "line bucket drawn with program {} while {:?} is bound",
                program.0,
                ctx.current_program()
            );
        }
        ctx.draw(DrawCall {
            primitive,
            buffer: self.buffer,
            first: range.first,
            count: range.count,
        });
    }
}

impl LineBucket for BufferedLineBucket {
    fn has_line_data(&self) -> bool {
        self.triangles.count > 0
    }

    fn has_point_data(&self) -> bool {
        self.points.count > 0
    }

    fn draw_lines(&self, ctx: &mut dyn GraphicsContext, program: ProgramHandle) {
        self.submit(ctx, program, Primitive::Triangles, self.triangles);
    }

    fn draw_points(&self, ctx: &mut dyn GraphicsContext, program: ProgramHandle) {
        self.submit(ctx, program, Primitive::Points, self.points);
    }
}
