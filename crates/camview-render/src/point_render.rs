//! GPU-side data for rendering point sets.

/// Per-point-set GPU resources.
pub struct PointRenderData {
    /// Position storage buffer (vec4 per point).
    pub position_buffer: wgpu::Buffer,
    /// Uniform buffer for point-specific settings.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group for this point set.
    pub bind_group: wgpu::BindGroup,
    /// Number of points.
    pub num_points: u32,
}

/// Uniforms for point rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct PointUniforms {
    /// Base color (RGBA).
    pub base_color: [f32; 4],
    /// Point radius in world units.
    pub point_radius: f32,
    pub _padding: [f32; 3],
}

impl Default for PointUniforms {
    fn default() -> Self {
        Self {
            base_color: [0.2, 0.5, 0.8, 1.0],
            point_radius: 0.01,
            _padding: [0.0; 3],
        }
    }
}
