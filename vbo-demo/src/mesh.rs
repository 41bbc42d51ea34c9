use crate::error::GeometryError;
use std::fmt::{Display, Formatter};
use std::mem::size_of;

pub type Vector3 = [f32; 3];
pub type TexCoord = [f32; 2];

/// Source geometry.  Every array except `indices` is one entry per vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Option<Vec<Vector3>>,
    pub normals: Option<Vec<Vector3>>,
    pub tex_coords: Option<Vec<TexCoord>>,
    /// RGBA32, red in the low byte
    pub colors: Option<Vec<u32>>,
    pub indices: Option<Vec<u32>>,
}

/// Which GPU buffer of a [crate::geometry_buffers::GeometryBuffers] we are talking about
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttributeKind {
    Position,
    Normal,
    TexCoord,
    Color,
    Index,
}

impl AttributeKind {
    /// bytes per element
    pub fn stride(self) -> usize {
        match self {
            AttributeKind::Position | AttributeKind::Normal => size_of::<Vector3>(),
            AttributeKind::TexCoord => size_of::<TexCoord>(),
            AttributeKind::Color | AttributeKind::Index => size_of::<u32>(),
        }
    }
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttributeKind::Position => "Vertex",
            AttributeKind::Normal => "Normal",
            AttributeKind::TexCoord => "TexCoord",
            AttributeKind::Color => "Color",
            AttributeKind::Index => "Element",
        };
        f.write_str(name)
    }
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.as_ref().map_or(0, Vec::len)
    }

    /// Check that the parallel arrays line up and the indices describe whole,
    /// in-range triangles.  Missing positions or indices are not an error here.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let vertex_count = self.vertex_count();

        let lengths = [
            (AttributeKind::Normal, self.normals.as_ref().map(Vec::len)),
            (AttributeKind::TexCoord, self.tex_coords.as_ref().map(Vec::len)),
            (AttributeKind::Color, self.colors.as_ref().map(Vec::len)),
        ];
        if self.positions.is_some() {
            for (attribute, len) in lengths {
                match len {
                    Some(actual) if actual != vertex_count => {
                        return Err(GeometryError::AttributeLength {
                            attribute,
                            expected: vertex_count,
                            actual,
                        });
                    }
                    _ => {}
                }
            }
        }

        if let (Some(_), Some(indices)) = (&self.positions, &self.indices) {
            if indices.len() % 3 != 0 {
                return Err(GeometryError::IndexCount(indices.len()));
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeometryError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh {
            positions: Some(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            normals: Some(vec![[0.0, 0.0, 1.0]; 3]),
            tex_coords: Some(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            colors: Some(vec![0xff0000ff; 3]),
            indices: Some(vec![0, 1, 2]),
        }
    }

    #[test]
    fn strides_match_element_sizes() {
        assert_eq!(12, AttributeKind::Position.stride());
        assert_eq!(12, AttributeKind::Normal.stride());
        assert_eq!(8, AttributeKind::TexCoord.stride());
        assert_eq!(4, AttributeKind::Color.stride());
        assert_eq!(4, AttributeKind::Index.stride());
    }

    #[test]
    fn well_formed_mesh_validates() {
        triangle().validate().unwrap();
        Mesh::default().validate().unwrap();
    }

    #[test]
    fn short_attribute_array_is_named() {
        let mut mesh = triangle();
        mesh.tex_coords = Some(vec![[0.0, 0.0]; 2]);
        match mesh.validate() {
            Err(GeometryError::AttributeLength {
                attribute,
                expected,
                actual,
            }) => {
                assert_eq!(AttributeKind::TexCoord, attribute);
                assert_eq!(3, expected);
                assert_eq!(2, actual);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn indices_must_form_triangles() {
        let mut mesh = triangle();
        mesh.indices = Some(vec![0, 1]);
        assert!(matches!(mesh.validate(), Err(GeometryError::IndexCount(2))));
    }

    #[test]
    fn indices_must_be_in_range() {
        let mut mesh = triangle();
        mesh.indices = Some(vec![0, 1, 3]);
        assert!(matches!(
            mesh.validate(),
            Err(GeometryError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn error_message_names_the_attribute() {
        let err = GeometryError::SizeMismatch {
            attribute: AttributeKind::Normal,
            expected: 96,
            actual: 92,
        };
        assert_eq!(
            "Normal buffer not uploaded correctly: expected 96 bytes, driver reports 92",
            err.to_string()
        );
    }
}
