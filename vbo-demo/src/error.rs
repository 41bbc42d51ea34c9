use crate::mesh::AttributeKind;
use gl_thin::gl_helper::GLErrorWrapper;

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("{attribute} buffer not uploaded correctly: expected {expected} bytes, driver reports {actual}")]
    SizeMismatch {
        attribute: AttributeKind,
        expected: usize,
        actual: usize,
    },
    #[error("{attribute} array has {actual} entries but there are {expected} positions")]
    AttributeLength {
        attribute: AttributeKind,
        expected: usize,
        actual: usize,
    },
    #[error("{0} indices do not form whole triangles")]
    IndexCount(usize),
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error(transparent)]
    Gl(#[from] GLErrorWrapper),
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture file")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("failed to decode PNG")]
    Png(#[from] png::DecodingError),
    #[error("unsupported PNG layout {0}")]
    UnsupportedLayout(String),
    #[error("built without PNG support")]
    DecoderDisabled,
}
