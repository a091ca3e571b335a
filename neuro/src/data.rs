// A full-viewport quad in clip space, as two triangles.
#[rustfmt::skip]
pub static PLANE_VERTICES: [f32; 12] = [
     1.0, -1.0,
     1.0,  1.0,
    -1.0,  1.0,
    -1.0,  1.0,
    -1.0, -1.0,
     1.0, -1.0,
];

pub const PLANE_VERTEX_COUNT: i32 = 6;
