use crate::mesh::Mesh;

/// Pack 8-bit channels into one RGBA32 value with red in the low byte,
/// the order the color stream reads as four normalized bytes.
pub fn color_to_rgba32(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32
}

const DARK_RED: (u8, u8, u8, u8) = (0x8b, 0x00, 0x00, 0xff);
const GOLD: (u8, u8, u8, u8) = (0xff, 0xd7, 0x00, 0xff);

/// A cube spanning -1..1 on every axis, with its eight corners shared between faces.
/// Normals point out through the corners.
pub fn cube() -> Mesh {
    let positions = vec![
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
    ];

    #[rustfmt::skip]
    let indices = vec![
        // front
        0, 1, 2, 2, 3, 0,
        // top
        3, 2, 6, 6, 7, 3,
        // back
        7, 6, 5, 5, 4, 7,
        // left
        4, 0, 3, 3, 7, 4,
        // bottom
        0, 1, 5, 5, 4, 0,
        // right
        1, 5, 6, 6, 2, 1,
    ];

    let normals = positions.clone();

    let tex_coords = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]
        .into_iter()
        .cycle()
        .take(positions.len())
        .collect();

    let colors = [DARK_RED, DARK_RED, GOLD, GOLD]
        .into_iter()
        .cycle()
        .take(positions.len())
        .map(|(r, g, b, a)| color_to_rgba32(r, g, b, a))
        .collect();

    Mesh {
        positions: Some(positions),
        normals: Some(normals),
        tex_coords: Some(tex_coords),
        colors: Some(colors),
        indices: Some(indices),
    }
}
