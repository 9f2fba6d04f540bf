use serde::Serialize;

/// Opaque handle to a linked shader program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProgramHandle(pub u32);

/// Opaque handle to an uploaded texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TextureHandle(pub u32);

/// Opaque handle to an uploaded vertex/element buffer pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BufferHandle(pub u32);

/// Device capabilities, resolved once when the context is created.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeviceCaps {
    /// Point size is written by the vertex shader (`u_size` uniform) rather
    /// than being fixed-function draw state.
    pub supports_shader_point_size: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Triangles,
    Points,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub buffer: BufferHandle,
    pub first: u32,
    pub count: u32,
}

/// The single-threaded graphics state owned by the render thread.
///
/// Passed by `&mut` to every draw operation. Uniform setters are only valid
/// for the currently bound program.
pub trait GraphicsContext {
    fn caps(&self) -> DeviceCaps;

    fn current_program(&self) -> Option<ProgramHandle>;

    /// Unconditionally binds `program`. Callers go through [`use_program`].
    ///
    /// [`use_program`]: GraphicsContext::use_program
    fn bind_program(&mut self, program: ProgramHandle);

    fn set_uniform(&mut self, program: ProgramHandle, name: &'static str, value: UniformValue);

    fn set_depth_range(&mut self, near: f32, far: f32);

    /// Fixed-function point size. Only meaningful when
    /// `caps().supports_shader_point_size` is false.
    fn set_point_size(&mut self, size: f32);

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    fn draw(&mut self, call: DrawCall);

    /// Binds `program` unless it is already bound.
    ///
    /// Returns `true` when the bound program changed.
    fn use_program(&mut self, program: ProgramHandle) -> bool {
        if self.current_program() == Some(program) {
            return false;
        }
        self.bind_program(program);
        true
    }
}
