use crate::context::GraphicsContext;
use crate::geometry_buffers::GeometryBuffers;
use crate::mesh::AttributeKind;
use crate::render_state::RenderState;
use gl::types::GLuint;
use gl_thin::gl_fancy::{AttributeLayout, VertexStreams};
use gl_thin::gl_helper::{ArrayBufferType, ElementArrayBufferType, GLErrorWrapper};
use std::ops::{Deref, DerefMut};

/// Remembers which vertex attribute arrays were enabled and puts them back when dropped.
pub struct AttribArrayScope<'a, C: GraphicsContext> {
    ctx: &'a mut C,
    saved: Vec<(GLuint, bool)>,
}

impl<'a, C: GraphicsContext> AttribArrayScope<'a, C> {
    pub fn push(ctx: &'a mut C, locations: &[GLuint]) -> Result<Self, GLErrorWrapper> {
        let mut saved = Vec::with_capacity(locations.len());
        for &location in locations {
            saved.push((location, ctx.is_attrib_array_enabled(location)?));
        }
        Ok(Self { ctx, saved })
    }
}

impl<C: GraphicsContext> Deref for AttribArrayScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: GraphicsContext> DerefMut for AttribArrayScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.ctx
    }
}

impl<C: GraphicsContext> Drop for AttribArrayScope<'_, C> {
    fn drop(&mut self) {
        for &(location, enabled) in &self.saved {
            if let Err(e) = self.ctx.set_attrib_array_enabled(location, enabled) {
                log::warn!(
                    "failed to restore attribute array {} to {}: {}",
                    location,
                    enabled,
                    e
                );
            }
        }
    }
}

//

/// Draw `geometry` as indexed triangles, feeding the attribute streams `state` asks for.
///
/// Positions always flow.  Lighting swaps the vertex colors for normals, texturing
/// adds texture coordinates.  Streams whose buffer was never allocated stay disabled
/// and the program sees its constant default instead.  The enabled state of every
/// stream is restored before returning.
pub fn draw<C: GraphicsContext>(
    ctx: &mut C,
    geometry: &GeometryBuffers<C>,
    state: &RenderState,
    streams: &VertexStreams,
) -> Result<(), GLErrorWrapper> {
    let (Some(position_buffer), Some(index_buffer)) = (
        geometry.buffer(AttributeKind::Position),
        geometry.buffer(AttributeKind::Index),
    ) else {
        return Ok(());
    };

    let mut wanted = vec![(
        streams.position,
        position_buffer,
        AttributeLayout::floats(3),
    )];
    let shading = if state.lighting {
        geometry
            .buffer(AttributeKind::Normal)
            .map(|b| (streams.normal, b, AttributeLayout::floats(3)))
    } else {
        geometry
            .buffer(AttributeKind::Color)
            .map(|b| (streams.color, b, AttributeLayout::normalized_bytes(4)))
    };
    wanted.extend(shading);
    if state.texturing {
        wanted.extend(
            geometry
                .buffer(AttributeKind::TexCoord)
                .map(|b| (streams.tex_coord, b, AttributeLayout::floats(2))),
        );
    }

    let mut scope = AttribArrayScope::push(ctx, &streams.all())?;

    for location in streams.all() {
        let enabled = wanted.iter().any(|(l, _, _)| *l == location);
        scope.set_attrib_array_enabled(location, enabled)?;
    }

    for (location, buffer, layout) in wanted {
        scope.bind_buffer::<ArrayBufferType>(Some(buffer))?;
        scope.attrib_pointer(location, layout)?;
    }

    scope.bind_buffer::<ElementArrayBufferType>(Some(index_buffer))?;
    scope.draw_triangles(geometry.index_count())?;

    scope.bind_buffer::<ArrayBufferType>(None)?;
    scope.bind_buffer::<ElementArrayBufferType>(None)?;
    Ok(())
}
