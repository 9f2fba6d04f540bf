use foundation::math::Mat4;
use gpu::{GraphicsContext, LinejoinShader};
use runtime::TransformState;
use tracing::trace;

use crate::line::bucket::LineBucket;
use crate::line::stroke::StrokeGeometry;

/// Joins narrower than this are sub-pixel and indistinguishable from none.
pub const MIN_JOIN_OUTSET: f32 = 1.0;

pub fn should_draw_point_joins(bucket: &dyn LineBucket, stroke: &StrokeGeometry) -> bool {
    bucket.has_point_data() && stroke.outset > MIN_JOIN_OUTSET
}

/// Point-sprite diameter in device pixels.
pub fn join_point_size(stroke: &StrokeGeometry, pixel_ratio: f32) -> f32 {
    (pixel_ratio * stroke.outset * 2.0).ceil()
}

/// Draws round caps and joins as point sprites.
///
/// Returns whether anything was submitted.
pub fn draw_point_joins(
    ctx: &mut dyn GraphicsContext,
    shader: &LinejoinShader,
    bucket: &dyn LineBucket,
    stroke: &StrokeGeometry,
    matrix: &Mat4,
    transform: &TransformState,
) -> bool {
    if !should_draw_point_joins(bucket, stroke) {
        trace!(outset = stroke.outset, "point joins skipped");
        return false;
    }

    let ratio = transform.pixel_ratio;
    ctx.use_program(shader.program);
    shader.set_matrix(ctx, matrix);
    shader.set_color(ctx, stroke.color);
    shader.set_world(ctx, transform.half_framebuffer());
    shader.set_line_width(
        ctx,
        [(stroke.outset - 0.25) * ratio, (stroke.inset - 0.25) * ratio],
    );

    let point_size = join_point_size(stroke, ratio);
    if ctx.caps().supports_shader_point_size {
        shader.set_size(ctx, point_size);
    } else {
        ctx.set_point_size(point_size);
    }

    bucket.draw_points(ctx, shader.program);
    true
}

#[cfg(test)]
mod tests {
    use super::{draw_point_joins, join_point_size, should_draw_point_joins};
    use crate::line::bucket::{BufferedLineBucket, ElementRange};
    use crate::line::stroke::StrokeGeometry;
    use foundation::math::Mat4;
    use gpu::{
        BufferHandle, DeviceCaps, GpuCommand, LinejoinShader, ProgramHandle, RecordingContext,
        UniformValue,
    };
    use runtime::TransformState;

    const SHADER: LinejoinShader = LinejoinShader {
        program: ProgramHandle(7),
    };

    fn stroke(outset: f32, inset: f32) -> StrokeGeometry {
        StrokeGeometry {
            antialiasing: 0.5,
            inset,
            outset,
            blur: 0.5,
            color: [1.0, 0.0, 0.0, 1.0],
        }
    }

    fn bucket(points: u32) -> BufferedLineBucket {
        BufferedLineBucket {
            buffer: BufferHandle(1),
            triangles: ElementRange { first: 0, count: 12 },
            points: ElementRange { first: 0, count: points },
        }
    }

    #[test]
    fn threshold_excludes_exactly_one_pixel() {
        assert!(!should_draw_point_joins(&bucket(4), &stroke(1.0, 0.0)));
        assert!(should_draw_point_joins(&bucket(4), &stroke(1.0001, 0.0)));
        assert!(!should_draw_point_joins(&bucket(0), &stroke(5.0, 0.0)));
    }

    #[test]
    fn point_size_rounds_up() {
        assert_eq!(join_point_size(&stroke(1.25, 0.0), 2.0), 5.0);
        assert_eq!(join_point_size(&stroke(16.0, 0.0), 2.0), 64.0);
        assert_eq!(join_point_size(&stroke(1.1, 0.0), 1.0), 3.0);
    }

    #[test]
    fn fixed_function_point_size_without_shader_support() {
        let mut ctx = RecordingContext::new(DeviceCaps {
            supports_shader_point_size: false,
        });
        let transform = TransformState::new(4.0, 2.0, 800, 600);
        let drew = draw_point_joins(
            &mut ctx,
            &SHADER,
            &bucket(4),
            &stroke(1.25, 0.0),
            &Mat4::IDENTITY,
            &transform,
        );
        assert!(drew);
        assert!(ctx.commands().contains(&GpuCommand::PointSize { size: 5.0 }));
        assert_eq!(ctx.uniform(SHADER.program, "u_size"), None);
        assert_eq!(
            ctx.uniform(SHADER.program, "u_world"),
            Some(UniformValue::Vec2([400.0, 300.0]))
        );
        assert_eq!(
            ctx.uniform(SHADER.program, "u_linewidth"),
            Some(UniformValue::Vec2([2.0, -0.5]))
        );
        assert_eq!(ctx.draw_count(), 1);
    }

    #[test]
    fn shader_point_size_when_supported() {
        let mut ctx = RecordingContext::new(DeviceCaps {
            supports_shader_point_size: true,
        });
        let transform = TransformState::new(4.0, 2.0, 800, 600);
        draw_point_joins(
            &mut ctx,
            &SHADER,
            &bucket(4),
            &stroke(1.25, 0.0),
            &Mat4::IDENTITY,
            &transform,
        );
        assert_eq!(
            ctx.uniform(SHADER.program, "u_size"),
            Some(UniformValue::Float(5.0))
        );
        assert!(
            !ctx.commands()
                .iter()
                .any(|c| matches!(c, GpuCommand::PointSize { .. }))
        );
    }
}
