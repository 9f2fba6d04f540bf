use std::collections::BTreeMap;

use foundation::TileId;
use foundation::math::Mat4;
use gpu::GraphicsContext;
use runtime::{Frame, FrameMetrics, FrameMetricsSnapshot, RenderPass, Stratum, TransformState};
use tracing::{debug, warn};

use crate::layer::{Layer, LayerId};
use crate::line::{
    DrawContext, DrawOutcome, LineBucket, LineDrawError, LinePatternAtlas, LineRenderer,
};
use crate::style::{LineLayerStyle, LineStyleDocument, ZoomHistory};
use crate::symbology::ResolvedLineStyle;

/// A line style layer placed in the frame's layer stack.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    pub id: LayerId,
    pub style: LineLayerStyle,
}

impl LineLayer {
    /// Layers in document order (bottom first), numbered from 0.
    pub fn from_document(doc: &LineStyleDocument) -> Vec<LineLayer> {
        doc.layers
            .iter()
            .enumerate()
            .map(|(i, style)| LineLayer {
                id: LayerId(i as u64),
                style: style.clone(),
            })
            .collect()
    }
}

impl Layer for LineLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn is_visible_at(&self, zoom: f32) -> bool {
        self.style.is_visible_at(zoom)
    }
}

/// A loaded tile and the line buckets it holds per layer.
pub struct RenderTile<'a> {
    pub id: TileId,
    /// Tile-local to clip space.
    pub matrix: Mat4,
    pub buckets: BTreeMap<LayerId, &'a dyn LineBucket>,
}

/// Drives every line layer over every tile for one frame.
pub struct Painter {
    renderer: LineRenderer,
    zoom_history: ZoomHistory,
    metrics: FrameMetrics,
}

impl Painter {
    pub fn new(renderer: LineRenderer, zoom_history: ZoomHistory) -> Self {
        Self {
            renderer,
            zoom_history,
            metrics: FrameMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn zoom_history(&self) -> &ZoomHistory {
        &self.zoom_history
    }

    /// Resolves styles once, then runs the passes in order. Within the
    /// opaque pass layers go top to bottom, within the translucent pass
    /// bottom to top.
    #[allow(clippy::too_many_arguments)]
    pub fn render_frame(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        frame: &Frame,
        transform: &TransformState,
        extrude_matrix: &Mat4,
        layers: &[LineLayer],
        tiles: &[RenderTile<'_>],
        atlas: &dyn LinePatternAtlas,
    ) -> FrameMetricsSnapshot {
        self.metrics.clear();
        self.zoom_history.update(transform.zoom, frame.time);

        let resolved: Vec<Option<ResolvedLineStyle>> = layers
            .iter()
            .map(|layer| self.resolve_layer(layer, transform.zoom, frame))
            .collect();
        let layer_count = layers.len() as u32;

        for pass in RenderPass::ORDER {
            let order: Vec<usize> = match pass {
                RenderPass::Opaque => (0..layers.len()).rev().collect(),
                RenderPass::Translucent => (0..layers.len()).collect(),
            };
            for index in order {
                let Some(style) = &resolved[index] else {
                    continue;
                };
                let layer = &layers[index];
                let stratum = Stratum::for_layer(index as u32, layer_count);
                for tile in tiles {
                    let Some(bucket) = tile.buckets.get(&layer.id) else {
                        continue;
                    };
                    let dc = DrawContext {
                        tile: tile.id,
                        matrix: tile.matrix,
                        extrude_matrix: *extrude_matrix,
                        transform: *transform,
                        stratum,
                        pass,
                    };
                    let result = self.renderer.render(ctx, &dc, style, *bucket, atlas);
                    self.record(&layer.style.id, tile.id, result);
                }
            }
        }

        let snapshot = self.metrics.snapshot();
        debug!(
            frame = frame.index,
            draws = self.metrics.total_draw_calls(),
            program_switches = self.metrics.program_switches(),
            "line frame rendered"
        );
        snapshot
    }

    fn resolve_layer(
        &self,
        layer: &LineLayer,
        zoom: f32,
        frame: &Frame,
    ) -> Option<ResolvedLineStyle> {
        if !layer.is_visible_at(zoom) {
            return None;
        }
        let style = layer.style.resolve(zoom, &self.zoom_history, frame.time);
        // Fully transparent layers issue no GPU work.
        (style.opacity > 0.0).then_some(style)
    }

    fn record(&mut self, layer: &str, tile: TileId, result: Result<DrawOutcome, LineDrawError>) {
        match result {
            Ok(DrawOutcome::Skipped(reason)) => self.metrics.record_skip(reason.name()),
            Ok(DrawOutcome::Drawn {
                strategy,
                point_joins,
                program_switches,
            }) => {
                if point_joins {
                    self.metrics.record_draw("points");
                }
                self.metrics.record_draw(format!("lines:{}", strategy.name()));
                for _ in 0..program_switches {
                    self.metrics.record_program_switch();
                }
            }
            Err(err) => {
                warn!(layer, tile = %tile, "line draw failed: {err}");
                let reason = match err {
                    LineDrawError::MissingPattern { .. } => "missing-pattern",
                    LineDrawError::ImagePatternUnsupported => "image-pattern",
                };
                self.metrics.record_skip(reason);
            }
        }
    }
}
