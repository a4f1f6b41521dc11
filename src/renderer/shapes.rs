//! Shape generation for the demo scenes
//!
//! Everything is produced CPU-side as plain vertex lists: the static roster
//! geometry (tug quads, cube, pyramid), the shaded polygon fan, the star
//! outline and brush-point quads.

use std::f32::consts::PI;

use super::draw::Primitive;
use super::vertex::Vertex;
use crate::consts::{MIN_SIDES, STAR_POINTS};
use crate::sim::state::GeometryId;

/// A static vertex list plus the primitive it draws with
#[derive(Debug, Clone)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub primitive: Primitive,
}

/// Point `n` (1-indexed) of a circle divided into `k` parts, at radius `r`:
/// `(r sin(2πn/k), r cos(2πn/k))`
pub fn divide_circle(n: u32, k: u32, r: f32) -> (f32, f32) {
    let theta = 2.0 * n as f32 * PI / k as f32;
    (r * theta.sin(), r * theta.cos())
}

/// How the polygon fan is anchored and shaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeStyle {
    /// Fan from the center; shade step = intensity / sides
    Mid,
    /// Fan from vertex 1; shade step = intensity / (sides - 2)
    Top,
}

/// One fan slice: three vertices and the fill color for its own draw call
#[derive(Debug, Clone)]
pub struct FanSlice {
    pub color: [f32; 4],
    pub vertices: [Vertex; 3],
}

/// Shape-generation validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// The polygon fan needs at least three sides
    TooFewSides(u32),
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::TooFewSides(sides) => {
                write!(f, "polygon needs at least {} sides, got {}", MIN_SIDES, sides)
            }
        }
    }
}

/// Build the slices of a regular `sides`-gon at `radius`, each with a
/// progressively darkened red fill. Every slice is its own draw call.
pub fn fan_slices(
    sides: u32,
    radius: f32,
    intensity: f32,
    style: ShadeStyle,
) -> Result<Vec<FanSlice>, ShapeError> {
    if sides < MIN_SIDES {
        return Err(ShapeError::TooFewSides(sides));
    }

    let mut slices = Vec::with_capacity(sides as usize);
    let mut red = 1.0_f32;

    match style {
        ShadeStyle::Mid => {
            let step = intensity / sides as f32;
            for i in 1..=sides {
                let (ax, ay) = divide_circle(i, sides, radius);
                let (bx, by) = divide_circle(i + 1, sides, radius);
                slices.push(FanSlice {
                    color: [red, 0.0, 0.0, 1.0],
                    vertices: [Vertex::flat(0.0, 0.0), Vertex::flat(ax, ay), Vertex::flat(bx, by)],
                });
                red -= step;
            }
        }
        ShadeStyle::Top => {
            let step = intensity / (sides - 2) as f32;
            let (anchor_x, anchor_y) = divide_circle(1, sides, radius);
            for i in 2..=sides {
                let (ax, ay) = divide_circle(i, sides, radius);
                let (bx, by) = divide_circle(i + 1, sides, radius);
                slices.push(FanSlice {
                    color: [red, 0.0, 0.0, 1.0],
                    vertices: [
                        Vertex::flat(anchor_x, anchor_y),
                        Vertex::flat(ax, ay),
                        Vertex::flat(bx, by),
                    ],
                });
                red -= step;
            }
        }
    }

    Ok(slices)
}

/// The ten-point star outline
pub fn star_vertices() -> [Vertex; STAR_POINTS as usize] {
    [
        Vertex::flat(0.0, -0.35),
        Vertex::flat(-0.32, -0.5),
        Vertex::flat(-0.26, -0.15),
        Vertex::flat(-0.5, 0.11),
        Vertex::flat(-0.16, 0.18),
        Vertex::flat(0.0, 0.5),
        Vertex::flat(0.16, 0.18),
        Vertex::flat(0.5, 0.11),
        Vertex::flat(0.26, -0.15),
        Vertex::flat(0.32, -0.5),
    ]
}

/// A brush point as a filled quad (two triangles), `size` across
pub fn point_quad(x: f32, y: f32, size: f32, color: [f32; 4]) -> [Vertex; 6] {
    let h = size / 2.0;
    let tl = Vertex::flat_colored(x - h, y + h, color);
    let tr = Vertex::flat_colored(x + h, y + h, color);
    let bl = Vertex::flat_colored(x - h, y - h, color);
    let br = Vertex::flat_colored(x + h, y - h, color);
    [tl, bl, tr, tr, bl, br]
}

/// Build the static geometry for a roster handle
pub fn build(id: GeometryId) -> Geometry {
    match id {
        GeometryId::Floor => Geometry {
            vertices: vec![
                Vertex::flat_uv(-1.0, -0.47, 0.0, 1.0),
                Vertex::flat_uv(1.0, -0.47, 8.0, 1.0),
                Vertex::flat_uv(-1.0, -1.0, 0.0, 0.0),
                Vertex::flat_uv(1.0, -1.0, 8.0, 0.0),
            ],
            primitive: Primitive::TriangleStrip,
        },
        GeometryId::Mud => Geometry {
            vertices: vec![
                Vertex::flat_uv(-0.8, -0.47, 0.1, 1.0),
                Vertex::flat_uv(-0.47, -0.6, 0.27, 0.35),
                Vertex::flat_uv(-0.13, -0.67, 0.44, 0.0),
                Vertex::flat_uv(0.13, -0.67, 0.57, 0.0),
                Vertex::flat_uv(0.47, -0.6, 0.74, 0.35),
                Vertex::flat_uv(0.8, -0.47, 0.9, 1.0),
            ],
            primitive: Primitive::TriangleFan,
        },
        GeometryId::Rope => Geometry {
            vertices: vec![
                Vertex::flat_uv(-0.26, 0.015, 0.0, 1.0),
                Vertex::flat_uv(0.26, 0.015, 4.0, 1.0),
                Vertex::flat_uv(-0.26, -0.015, 0.0, 0.0),
                Vertex::flat_uv(0.26, -0.015, 4.0, 0.0),
            ],
            primitive: Primitive::TriangleStrip,
        },
        GeometryId::Person => Geometry {
            vertices: vec![
                Vertex::flat_uv(-0.05, 0.13, 0.0, 1.0),
                Vertex::flat_uv(0.05, 0.13, 1.0, 1.0),
                Vertex::flat_uv(-0.05, -0.13, 0.0, 0.0),
                Vertex::flat_uv(0.05, -0.13, 1.0, 0.0),
            ],
            primitive: Primitive::TriangleStrip,
        },
        GeometryId::Cube => Geometry {
            vertices: expand_quads(&CUBE_FACES),
            primitive: Primitive::Triangles,
        },
        GeometryId::Pyramid => Geometry {
            vertices: expand_quads(&PYRAMID_FACES),
            primitive: Primitive::Triangles,
        },
    }
}

/// One quad face: four corners, a normal, four texture coordinates, a color
struct QuadFace {
    corners: [[f32; 3]; 4],
    normal: [f32; 3],
    uvs: [[f32; 2]; 4],
    color: [f32; 4],
}

/// Expand quad faces into a triangle list (two triangles per face)
fn expand_quads(faces: &[QuadFace]) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(faces.len() * 6);
    for face in faces {
        for &i in &[0usize, 1, 2, 0, 2, 3] {
            out.push(Vertex::new(face.corners[i], face.normal, face.uvs[i], face.color));
        }
    }
    out
}

//    v6----- v5
//   /|      /|
//  v1------v0|
//  | |     | |
//  | |v7---|-|v4
//  |/      |/
//  v2------v3
const CUBE_FACES: [QuadFace; 6] = [
    // front
    QuadFace {
        corners: [[1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0]],
        normal: [0.0, 0.0, 1.0],
        uvs: [[50.0, 50.0], [0.0, 50.0], [0.0, 0.0], [50.0, 0.0]],
        color: [1.0, 0.0, 0.0, 1.0],
    },
    // right
    QuadFace {
        corners: [[1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0]],
        normal: [1.0, 0.0, 0.0],
        uvs: [[0.0, 50.0], [0.0, 0.0], [50.0, 0.0], [50.0, 50.0]],
        color: [1.0, 1.0, 0.0, 1.0],
    },
    // up
    QuadFace {
        corners: [[1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0]],
        normal: [0.0, 1.0, 0.0],
        uvs: [[50.0, 0.0], [50.0, 50.0], [0.0, 50.0], [0.0, 0.0]],
        color: [1.0, 0.5, 0.0, 1.0],
    },
    // left
    QuadFace {
        corners: [[-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0]],
        normal: [-1.0, 0.0, 0.0],
        uvs: [[50.0, 50.0], [0.0, 50.0], [0.0, 0.0], [50.0, 0.0]],
        color: [0.0, 1.0, 0.0, 1.0],
    },
    // down
    QuadFace {
        corners: [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
        normal: [0.0, -1.0, 0.0],
        uvs: [[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [0.0, 50.0]],
        color: [0.0, 1.0, 1.0, 1.0],
    },
    // back
    QuadFace {
        corners: [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
        normal: [0.0, 0.0, -1.0],
        uvs: [[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [0.0, 50.0]],
        color: [0.0, 0.0, 1.0, 1.0],
    },
];

// Apex at (0, 1, 0); the "up" face degenerates to the apex
const PYRAMID_FACES: [QuadFace; 6] = [
    QuadFace {
        corners: [[0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0]],
        normal: [0.0, 0.5, 1.0],
        uvs: [[50.0, 50.0], [0.0, 50.0], [0.0, 0.0], [50.0, 0.0]],
        color: [1.0, 1.0, 1.0, 1.0],
    },
    QuadFace {
        corners: [[0.0, 1.0, 0.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [0.0, 1.0, 0.0]],
        normal: [1.0, 0.5, 0.0],
        uvs: [[0.0, 50.0], [0.0, 0.0], [50.0, 0.0], [50.0, 50.0]],
        color: [1.0, 1.0, 1.0, 1.0],
    },
    QuadFace {
        corners: [[0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        normal: [0.0, 1.0, 0.0],
        uvs: [[50.0, 0.0], [50.0, 50.0], [0.0, 50.0], [0.0, 0.0]],
        color: [1.0, 1.0, 1.0, 1.0],
    },
    QuadFace {
        corners: [[0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0]],
        normal: [-1.0, 0.5, 0.0],
        uvs: [[50.0, 50.0], [0.0, 50.0], [0.0, 0.0], [50.0, 0.0]],
        color: [1.0, 1.0, 1.0, 1.0],
    },
    QuadFace {
        corners: [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
        normal: [0.0, -1.0, 0.0],
        uvs: [[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [0.0, 50.0]],
        color: [1.0, 1.0, 1.0, 1.0],
    },
    QuadFace {
        corners: [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        normal: [0.0, 0.5, -1.0],
        uvs: [[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [0.0, 50.0]],
        color: [1.0, 1.0, 1.0, 1.0],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_circle_hexagon_vertex_three() {
        // Vertex 3 of 6 at radius 1 lands at (sin pi, cos pi) = (0, -1)
        let (x, y) = divide_circle(3, 6, 1.0);
        assert!(x.abs() < 1e-6);
        assert!((y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_divide_circle_wraps_past_full_turn() {
        let (x0, y0) = divide_circle(1, 5, 0.5);
        let (x1, y1) = divide_circle(6, 5, 0.5);
        assert!((x0 - x1).abs() < 1e-5);
        assert!((y0 - y1).abs() < 1e-5);
    }

    #[test]
    fn test_fan_rejects_degenerate_polygons() {
        assert!(matches!(
            fan_slices(2, 0.5, 1.0, ShadeStyle::Mid),
            Err(ShapeError::TooFewSides(2))
        ));
        assert!(matches!(
            fan_slices(0, 0.5, 1.0, ShadeStyle::Top),
            Err(ShapeError::TooFewSides(0))
        ));
    }

    #[test]
    fn test_mid_shading_darkens_per_slice() {
        let sides = 8;
        let intensity = 0.8;
        let slices = fan_slices(sides, 0.5, intensity, ShadeStyle::Mid).unwrap();
        assert_eq!(slices.len(), sides as usize);
        let step = intensity / sides as f32;
        for (i, slice) in slices.iter().enumerate() {
            let expected = 1.0 - i as f32 * step;
            assert!((slice.color[0] - expected).abs() < 1e-5);
            // Every mid slice fans from the center
            assert_eq!(slice.vertices[0].position[0], 0.0);
            assert_eq!(slice.vertices[0].position[1], 0.0);
        }
    }

    #[test]
    fn test_top_shading_anchors_at_vertex_one() {
        let sides = 6;
        let slices = fan_slices(sides, 1.0, 0.6, ShadeStyle::Top).unwrap();
        assert_eq!(slices.len(), (sides - 1) as usize);
        let (ax, ay) = divide_circle(1, sides, 1.0);
        let step = 0.6 / (sides - 2) as f32;
        for (i, slice) in slices.iter().enumerate() {
            assert!((slice.vertices[0].position[0] - ax).abs() < 1e-6);
            assert!((slice.vertices[0].position[1] - ay).abs() < 1e-6);
            assert!((slice.color[0] - (1.0 - i as f32 * step)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_point_quad_centered() {
        let quad = point_quad(0.25, -0.5, 0.1, [1.0, 0.0, 0.0, 1.0]);
        let cx: f32 = quad.iter().map(|v| v.position[0]).sum::<f32>() / 6.0;
        let cy: f32 = quad.iter().map(|v| v.position[1]).sum::<f32>() / 6.0;
        assert!((cx - 0.25).abs() < 1e-6);
        assert!((cy + 0.5).abs() < 1e-6);
        for v in &quad {
            assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_cube_expands_to_triangle_list() {
        let cube = build(GeometryId::Cube);
        assert_eq!(cube.vertices.len(), 36);
        assert_eq!(cube.primitive, Primitive::Triangles);
        // Six distinct face colors
        let mut colors: Vec<[u8; 3]> = cube
            .vertices
            .iter()
            .map(|v| [
                (v.color[0] * 255.0) as u8,
                (v.color[1] * 255.0) as u8,
                (v.color[2] * 255.0) as u8,
            ])
            .collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 6);
    }

    #[test]
    fn test_star_has_ten_points() {
        assert_eq!(star_vertices().len(), STAR_POINTS as usize);
    }
}
