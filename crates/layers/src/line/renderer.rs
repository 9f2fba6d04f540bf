use foundation::TileId;
use foundation::math::{Mat4, Vec2};
use gpu::{GraphicsContext, LinePrograms};
use runtime::{RenderPass, Stratum, TransformState};
use tracing::trace;

use crate::line::atlas::LinePatternAtlas;
use crate::line::bucket::LineBucket;
use crate::line::dash::DashParams;
use crate::line::joins::draw_point_joins;
use crate::line::strategy::{
    DrawStrategy, ImagePatternParams, LineDrawError, StrategyKind, select_strategy,
};
use crate::line::stroke::StrokeGeometry;
use crate::symbology::{ResolvedLineStyle, TranslateAnchor};

/// Tile extent in tile units divided by tile size in pixels.
const EXTENT_PER_TILE_PIXEL: f32 = 4096.0 / 512.0;

/// Per-tile inputs supplied by the painter. Read-only.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawContext {
    pub tile: TileId,
    /// Tile-local to clip space.
    pub matrix: Mat4,
    pub extrude_matrix: Mat4,
    pub transform: TransformState,
    pub stratum: Stratum,
    pub pass: RenderPass,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    OpaquePass,
    EmptyBucket,
}

impl SkipReason {
    pub fn name(self) -> &'static str {
        match self {
            SkipReason::OpaquePass => "opaque-pass",
            SkipReason::EmptyBucket => "empty-bucket",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Skipped(SkipReason),
    Drawn {
        strategy: StrategyKind,
        point_joins: bool,
        program_switches: u32,
    },
}

/// Applies `line-translate` to the tile matrix.
///
/// The translation is given in pixels and converted to tile units at the
/// current zoom. Viewport-anchored offsets are counter-rotated by the map
/// bearing so they stay fixed on screen.
pub fn translated_matrix(
    matrix: &Mat4,
    translate: Vec2,
    anchor: TranslateAnchor,
    tile: TileId,
    transform: &TransformState,
) -> Mat4 {
    if translate.is_zero() {
        return *matrix;
    }
    let factor = tile.world_tiles() / transform.scale * EXTENT_PER_TILE_PIXEL;
    let offset = match anchor {
        TranslateAnchor::Map => translate,
        TranslateAnchor::Viewport => translate.rotate(-transform.angle),
    }
    .scale(factor);
    matrix.translate(offset.x, offset.y, 0.0)
}

/// Renders one line layer for one tile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineRenderer {
    programs: LinePrograms,
}

impl LineRenderer {
    pub fn new(programs: LinePrograms) -> Self {
        Self { programs }
    }

    pub fn render(
        &self,
        ctx: &mut dyn GraphicsContext,
        dc: &DrawContext,
        style: &ResolvedLineStyle,
        bucket: &dyn LineBucket,
        atlas: &dyn LinePatternAtlas,
    ) -> Result<DrawOutcome, LineDrawError> {
        // Lines are always blended for anti-aliasing.
        if dc.pass == RenderPass::Opaque {
            trace!(tile = %dc.tile, pass = dc.pass.name(), "line skipped");
            return Ok(DrawOutcome::Skipped(SkipReason::OpaquePass));
        }
        if !bucket.has_data() {
            trace!(tile = %dc.tile, "line bucket empty");
            return Ok(DrawOutcome::Skipped(SkipReason::EmptyBucket));
        }

        let stroke = StrokeGeometry::compute(style, dc.transform.pixel_ratio);
        let matrix = translated_matrix(
            &dc.matrix,
            style.translate,
            style.translate_anchor,
            dc.tile,
            &dc.transform,
        );
        let strategy = select_strategy(style, atlas, dc.tile, &dc.transform)?;

        let (near, far) = dc.stratum.depth_range();
        ctx.set_depth_range(near, far);

        let before = ctx.current_program();
        let mut program_switches = 0;
        let point_joins = draw_point_joins(
            ctx,
            &self.programs.linejoin,
            bucket,
            &stroke,
            &matrix,
            &dc.transform,
        );
        if point_joins && before != ctx.current_program() {
            program_switches += 1;
        }

        let before = ctx.current_program();
        self.dispatch(ctx, dc, &strategy, &stroke, &matrix, bucket, atlas)?;
        if before != ctx.current_program() {
            program_switches += 1;
        }

        Ok(DrawOutcome::Drawn {
            strategy: strategy.kind(),
            point_joins,
            program_switches,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch(
        &self,
        ctx: &mut dyn GraphicsContext,
        dc: &DrawContext,
        strategy: &DrawStrategy,
        stroke: &StrokeGeometry,
        matrix: &Mat4,
        bucket: &dyn LineBucket,
        atlas: &dyn LinePatternAtlas,
    ) -> Result<(), LineDrawError> {
        match strategy {
            DrawStrategy::Plain => {
                self.draw_plain(ctx, dc, stroke, matrix, bucket);
                Ok(())
            }
            DrawStrategy::Dashed(params) => {
                self.draw_dashed(ctx, dc, params, stroke, matrix, bucket, atlas);
                Ok(())
            }
            DrawStrategy::Patterned(params) => self.draw_patterned(params),
        }
    }

    fn draw_plain(
        &self,
        ctx: &mut dyn GraphicsContext,
        dc: &DrawContext,
        stroke: &StrokeGeometry,
        matrix: &Mat4,
        bucket: &dyn LineBucket,
    ) {
        let shader = &self.programs.line;
        ctx.use_program(shader.program);
        shader.set_matrix(ctx, matrix);
        shader.set_extrude_matrix(ctx, &dc.extrude_matrix);
        shader.set_line_width(ctx, stroke.line_width());
        shader.set_blur(ctx, stroke.blur);
        shader.set_color(ctx, stroke.color);
        bucket.draw_lines(ctx, shader.program);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_dashed(
        &self,
        ctx: &mut dyn GraphicsContext,
        dc: &DrawContext,
        params: &DashParams,
        stroke: &StrokeGeometry,
        matrix: &Mat4,
        bucket: &dyn LineBucket,
        atlas: &dyn LinePatternAtlas,
    ) {
        let shader = &self.programs.sdf;
        ctx.use_program(shader.program);
        shader.set_matrix(ctx, matrix);
        shader.set_extrude_matrix(ctx, &dc.extrude_matrix);
        shader.set_line_width(ctx, stroke.line_width());
        shader.set_blur(ctx, stroke.blur);
        shader.set_color(ctx, stroke.color);
        shader.set_fade(ctx, params.fade);
        shader.set_pattern_scale_a(ctx, params.pattern_scale_a());
        shader.set_pattern_scale_b(ctx, params.pattern_scale_b());
        shader.set_tex_y_a(ctx, params.tex_y_a());
        shader.set_tex_y_b(ctx, params.tex_y_b());
        shader.set_gamma(ctx, params.gamma);
        atlas.bind(ctx);
        bucket.draw_lines(ctx, shader.program);
    }

    // TODO: draw through a line-pattern program once sprite positions are
    // available to the renderer.
    fn draw_patterned(&self, _params: &ImagePatternParams) -> Result<(), LineDrawError> {
        Err(LineDrawError::ImagePatternUnsupported)
    }
}
