use glam::{Mat4, Vec3, Vec4};

/// Rotation of `angle` radians around `axis` (Rodrigues' formula).
///
/// `axis` must be unit length. It is not normalized here; a non-unit axis
/// produces a matrix that also scales and shears.
pub fn rotation(angle: f32, axis: Vec3) -> Mat4 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let Vec3 { x, y, z } = axis;

    Mat4::from_cols(
        Vec4::new(t * x * x + c, t * x * y - z * s, t * x * z + y * s, 0.0),
        Vec4::new(t * x * y + z * s, t * y * y + c, t * y * z - x * s, 0.0),
        Vec4::new(t * x * z - y * s, t * y * z + x * s, t * z * z + c, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Right-handed perspective projection.
///
/// Maps view-space depth `-near` to NDC z `-1` and `-far` to `+1`; clip-space
/// w is `-z`.
///
/// Preconditions (not checked): `0 < near < far` and `0 < fov_y < π`.
/// Violating them yields infinities or NaN.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let y_scale = 1.0 / (fov_y * 0.5).tan();
    let x_scale = y_scale / aspect;
    let z_range = far - near;
    let z_scale = -(far + near) / z_range;
    let wz_scale = -2.0 * far * near / z_range;

    Mat4::from_cols(
        Vec4::new(x_scale, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y_scale, 0.0, 0.0),
        Vec4::new(0.0, 0.0, z_scale, -1.0),
        Vec4::new(0.0, 0.0, wz_scale, 0.0),
    )
}

/// Translation by `(x, y, z)`, stored in the last column.
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(x, y, z, 1.0),
    )
}

#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// `projection * view * model`. The order is fixed.
#[inline]
pub fn model_view_projection(projection: Mat4, view: Mat4, model: Mat4) -> Mat4 {
    projection * view * model
}
