use crate::context::GraphicsContext;
use crate::error::GeometryError;
use crate::mesh::{AttributeKind, Mesh};
use gl_thin::gl_helper::{ArrayBufferType, BufferTarget, BufferUsage, ElementArrayBufferType};

/// GPU-side copies of a [Mesh]: one buffer per attribute array the mesh has, plus the indices.
///
/// The buffers are owned here and released when this is dropped.
pub struct GeometryBuffers<C: GraphicsContext> {
    position_buffer: Option<C::Buffer>,
    normal_buffer: Option<C::Buffer>,
    tex_coord_buffer: Option<C::Buffer>,
    color_buffer: Option<C::Buffer>,
    index_buffer: Option<C::Buffer>,
    index_count: usize,
}

impl<C: GraphicsContext> GeometryBuffers<C> {
    /// A geometry with nothing allocated.  Drawing it does nothing.
    pub fn empty() -> Self {
        Self {
            position_buffer: None,
            normal_buffer: None,
            tex_coord_buffer: None,
            color_buffer: None,
            index_buffer: None,
            index_count: 0,
        }
    }

    /// Upload every array `mesh` has.  Positions go in a `DynamicDraw` buffer because
    /// they get rewritten every frame; everything else is `StaticDraw`.
    ///
    /// A mesh without positions or without indices yields [GeometryBuffers::empty].
    /// If the driver reports a buffer size that differs from what was sent, the whole
    /// construction fails and any buffers made so far are released.
    pub fn new(ctx: &mut C, mesh: &Mesh) -> Result<Self, GeometryError> {
        let (Some(positions), Some(indices)) = (&mesh.positions, &mesh.indices) else {
            log::debug!("mesh has no positions or no indices, nothing to upload");
            return Ok(Self::empty());
        };

        mesh.validate()?;

        let color_buffer = match &mesh.colors {
            Some(colors) => Some(upload::<C, ArrayBufferType>(
                ctx,
                AttributeKind::Color,
                bytemuck::cast_slice(colors),
                BufferUsage::StaticDraw,
            )?),
            None => None,
        };

        let normal_buffer = match &mesh.normals {
            Some(normals) => Some(upload::<C, ArrayBufferType>(
                ctx,
                AttributeKind::Normal,
                bytemuck::cast_slice(normals),
                BufferUsage::StaticDraw,
            )?),
            None => None,
        };

        let tex_coord_buffer = match &mesh.tex_coords {
            Some(tex_coords) => Some(upload::<C, ArrayBufferType>(
                ctx,
                AttributeKind::TexCoord,
                bytemuck::cast_slice(tex_coords),
                BufferUsage::StaticDraw,
            )?),
            None => None,
        };

        let position_buffer = upload::<C, ArrayBufferType>(
            ctx,
            AttributeKind::Position,
            bytemuck::cast_slice(positions),
            BufferUsage::DynamicDraw,
        )?;

        let index_buffer = upload::<C, ElementArrayBufferType>(
            ctx,
            AttributeKind::Index,
            bytemuck::cast_slice(indices),
            BufferUsage::StaticDraw,
        )?;

        Ok(Self {
            position_buffer: Some(position_buffer),
            normal_buffer,
            tex_coord_buffer,
            color_buffer,
            index_buffer: Some(index_buffer),
            index_count: indices.len(),
        })
    }

    /// true when there is something for a draw call to read
    pub fn is_drawable(&self) -> bool {
        self.position_buffer.is_some() && self.index_buffer.is_some()
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn buffer(&self, attribute: AttributeKind) -> Option<&C::Buffer> {
        match attribute {
            AttributeKind::Position => self.position_buffer.as_ref(),
            AttributeKind::Normal => self.normal_buffer.as_ref(),
            AttributeKind::TexCoord => self.tex_coord_buffer.as_ref(),
            AttributeKind::Color => self.color_buffer.as_ref(),
            AttributeKind::Index => self.index_buffer.as_ref(),
        }
    }
}

/// Create a buffer, fill it in one transfer and check the driver kept every byte.
/// The target is unbound again before returning, whatever the outcome.
fn upload<C: GraphicsContext, B: BufferTarget>(
    ctx: &mut C,
    attribute: AttributeKind,
    bytes: &[u8],
    usage: BufferUsage,
) -> Result<C::Buffer, GeometryError> {
    let buffer = ctx.create_buffer()?;

    ctx.bind_buffer::<B>(Some(&buffer))?;
    let checked = fill_and_check::<C, B>(ctx, attribute, bytes, usage);
    let unbound = ctx.bind_buffer::<B>(None);
    // the upload failure is the one worth reporting
    checked?;
    unbound?;

    log::debug!("{} buffer holds {} bytes", attribute, bytes.len());
    Ok(buffer)
}

fn fill_and_check<C: GraphicsContext, B: BufferTarget>(
    ctx: &mut C,
    attribute: AttributeKind,
    bytes: &[u8],
    usage: BufferUsage,
) -> Result<(), GeometryError> {
    ctx.buffer_data::<B>(bytes, usage)?;

    let actual = ctx.buffer_size::<B>()?;
    if actual != bytes.len() {
        return Err(GeometryError::SizeMismatch {
            attribute,
            expected: bytes.len(),
            actual,
        });
    }
    Ok(())
}
