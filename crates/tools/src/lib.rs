//! Offline tracing of the line renderer: runs one frame against a recording
//! graphics context and reports the command stream.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use foundation::TileId;
use foundation::math::Mat4;
use foundation::time::Time;
use gpu::{
    BufferHandle, DeviceCaps, GpuCommand, LinePrograms, ProgramError, ProgramHandle, ProgramKind,
    RecordingContext, TextureHandle, UniformValue,
};
use layers::line::{
    BufferedLineBucket, ElementRange, LineBucket, LineRenderer, PatternPlacement,
    StaticPatternAtlas,
};
use layers::{DashArrayValue, LineLayer, LineStyleDocument, Painter, RenderTile, StyleError};
use runtime::{Frame, FrameMetricsSnapshot, TransformState};

/// Viewport used for the traced frame.
pub const TRACE_VIEWPORT: (u32, u32) = (1024, 768);

#[derive(Debug)]
pub enum TraceError {
    Style(StyleError),
    Program(ProgramError),
    Encode(serde_json::Error),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Style(err) => write!(f, "{err}"),
            TraceError::Program(err) => write!(f, "{err}"),
            TraceError::Encode(err) => write!(f, "encode trace: {err}"),
        }
    }
}

impl std::error::Error for TraceError {}

impl From<StyleError> for TraceError {
    fn from(err: StyleError) -> Self {
        TraceError::Style(err)
    }
}

impl From<ProgramError> for TraceError {
    fn from(err: ProgramError) -> Self {
        TraceError::Program(err)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TraceOptions {
    pub zoom: f32,
    pub pixel_ratio: f32,
    pub tile: TileId,
    pub point_size_uniform: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            zoom: 14.0,
            pixel_ratio: 1.0,
            tile: TileId::new(14, 0, 0),
            point_size_uniform: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub commands: Vec<GpuCommand>,
    pub metrics: FrameMetricsSnapshot,
}

fn program_registry() -> BTreeMap<String, ProgramHandle> {
    ProgramKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| (kind.name().to_string(), ProgramHandle(i as u32 + 1)))
        .collect()
}

/// Packs one atlas row per dash array the document can produce.
pub fn pack_atlas(doc: &LineStyleDocument) -> StaticPatternAtlas {
    let mut patterns: Vec<Vec<f32>> = Vec::new();
    for layer in &doc.layers {
        match &layer.paint.dasharray {
            Some(DashArrayValue::Constant(stops)) => patterns.push(stops.clone()),
            Some(DashArrayValue::Function(f)) => {
                patterns.extend(f.stops.iter().map(|(_, stops)| stops.clone()))
            }
            None => {}
        }
    }

    let mut atlas = StaticPatternAtlas::new(TextureHandle(1));
    let rows = patterns.len().max(1) as f32;
    for (row, stops) in patterns.iter().enumerate() {
        let length: f32 = stops.iter().sum();
        atlas.insert(
            stops,
            PatternPlacement {
                tex_y: (row as f32 + 0.5) / rows,
                width: if length > 0.0 { length } else { 1.0 },
                height: 1.0 / rows,
            },
        );
    }
    atlas
}

/// Renders `doc` for a single synthetic tile through every pass.
pub fn trace_style(doc: &LineStyleDocument, options: &TraceOptions) -> Result<Trace, TraceError> {
    let programs = LinePrograms::from_registry(&program_registry())?;
    let mut painter = Painter::new(LineRenderer::new(programs), doc.zoom_history());
    let mut ctx = RecordingContext::new(DeviceCaps {
        supports_shader_point_size: options.point_size_uniform,
    });

    let layers = LineLayer::from_document(doc);
    let bucket = BufferedLineBucket {
        buffer: BufferHandle(1),
        triangles: ElementRange { first: 0, count: 96 },
        points: ElementRange { first: 0, count: 16 },
    };
    let tile = RenderTile {
        id: options.tile,
        matrix: Mat4::IDENTITY,
        buckets: layers
            .iter()
            .map(|layer| (layer.id, &bucket as &dyn LineBucket))
            .collect(),
    };
    let transform = TransformState::new(
        options.zoom,
        options.pixel_ratio,
        TRACE_VIEWPORT.0,
        TRACE_VIEWPORT.1,
    );

    // Pixel offsets to clip space, y pointing down.
    let extrude_matrix = Mat4::IDENTITY.scale(
        2.0 / TRACE_VIEWPORT.0 as f32,
        -2.0 / TRACE_VIEWPORT.1 as f32,
        1.0,
    );

    let metrics = painter.render_frame(
        &mut ctx,
        &Frame::new(0, Time(0.0)),
        &transform,
        &extrude_matrix,
        &layers,
        &[tile],
        &pack_atlas(doc),
    );
    Ok(Trace {
        commands: ctx.take_commands(),
        metrics,
    })
}

pub fn trace_json(payload: &str, options: &TraceOptions) -> Result<Trace, TraceError> {
    let doc = LineStyleDocument::from_json(payload)?;
    trace_style(&doc, options)
}

pub fn to_json(trace: &Trace) -> Result<String, TraceError> {
    serde_json::to_string_pretty(&trace.commands).map_err(TraceError::Encode)
}

fn describe_value(value: &UniformValue) -> String {
    match value {
        UniformValue::Float(v) => format!("{v}"),
        UniformValue::Vec2(v) => format!("{v:?}"),
        UniformValue::Vec4(v) => format!("{v:?}"),
        UniformValue::Mat4(_) => "mat4".to_string(),
    }
}

/// One command per line followed by the frame counters.
pub fn to_text(trace: &Trace) -> String {
    let mut out = String::new();
    for cmd in &trace.commands {
        let _ = match cmd {
            GpuCommand::UseProgram { program } => writeln!(out, "use_program {}", program.0),
            GpuCommand::Uniform { name, value, .. } => {
                writeln!(out, "  {name} = {}", describe_value(value))
            }
            GpuCommand::DepthRange { near, far } => writeln!(out, "depth_range {near} {far}"),
            GpuCommand::PointSize { size } => writeln!(out, "point_size {size}"),
            GpuCommand::BindTexture { unit, texture } => {
                writeln!(out, "bind_texture unit={unit} texture={}", texture.0)
            }
            GpuCommand::Draw(call) => writeln!(
                out,
                "draw {:?} buffer={} first={} count={}",
                call.primitive, call.buffer.0, call.first, call.count
            ),
        };
    }
    for (kind, count) in &trace.metrics.draw_calls {
        let _ = writeln!(out, "# draws {kind}: {count}");
    }
    for (reason, count) in &trace.metrics.skips {
        let _ = writeln!(out, "# skips {reason}: {count}");
    }
    let _ = writeln!(out, "# program switches: {}", trace.metrics.program_switches);
    out
}
