//! Column-major 4x4 matrices (`m[column][row]`), as WGSL `mat4x4<f32>` expects.

pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Orthographic projection mapping the given box to clip space (depth `0..1`).
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rl = right - left;
    let tb = top - bottom;
    let fnr = far - near;
    [
        [2.0 / rl, 0.0, 0.0, 0.0],
        [0.0, 2.0 / tb, 0.0, 0.0],
        [0.0, 0.0, -1.0 / fnr, 0.0],
        [-(right + left) / rl, -(top + bottom) / tb, -near / fnr, 1.0],
    ]
}

/// `m * T(x, y, z)`.
pub fn translate(m: &Mat4, x: f32, y: f32, z: f32) -> Mat4 {
    let mut out = *m;
    for row in 0..4 {
        out[3][row] = m[0][row] * x + m[1][row] * y + m[2][row] * z + m[3][row];
    }
    out
}

/// `m * S(x, y, z)`.
pub fn scale(m: &Mat4, x: f32, y: f32, z: f32) -> Mat4 {
    let mut out = *m;
    for row in 0..4 {
        out[0][row] = m[0][row] * x;
        out[1][row] = m[1][row] * y;
        out[2][row] = m[2][row] * z;
    }
    out
}

/// Transforms a point (`w = 1`).
pub fn transform(m: &Mat4, p: [f32; 3]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (row, v) in out.iter_mut().enumerate() {
        *v = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    out
}
