//! A [GraphicsContext] that keeps buffer contents in host memory and records
//! every binding, attribute and draw so tests can inspect them.

use crate::context::GraphicsContext;
use crate::mesh::Vector3;
use gl::types::{GLenum, GLuint};
use gl_thin::gl_fancy::AttributeLayout;
use gl_thin::gl_helper::{BufferTarget, BufferUsage, GLErrorWrapper};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub index_count: usize,
    pub element_buffer: Option<u32>,
    /// enabled attribute locations and the buffer each one reads from
    pub streams: BTreeMap<GLuint, (u32, AttributeLayout)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Upload {
    Full { buffer: u32, len: usize, usage: BufferUsage },
    Partial { buffer: u32, offset: usize, len: usize },
}

#[derive(Debug, Default)]
pub struct FakeGpu {
    next_id: u32,
    pub stores: BTreeMap<u32, Vec<u8>>,
    pub deleted: Vec<u32>,
    pub array_binding: Option<u32>,
    pub element_binding: Option<u32>,
    pub enabled: BTreeSet<GLuint>,
    pub pointers: BTreeMap<GLuint, (u32, AttributeLayout)>,
    pub uploads: Vec<Upload>,
    pub draws: Vec<DrawCall>,
    pub map_attempts: usize,
    pub maps: usize,
    pub unmaps: usize,
    /// pretend the driver can't map anything
    pub refuse_mapping: bool,
    /// pretend the driver silently drops the last 4 bytes uploaded to this buffer id
    pub truncate_buffer: Option<u32>,
    /// pretend unbinding raises a GL error
    pub fail_unbind: bool,
}

impl FakeGpu {
    fn binding(&self, target: GLenum) -> Option<u32> {
        match target {
            gl::ARRAY_BUFFER => self.array_binding,
            gl::ELEMENT_ARRAY_BUFFER => self.element_binding,
            _ => None,
        }
    }

    fn binding_mut(&mut self, target: GLenum) -> &mut Option<u32> {
        match target {
            gl::ELEMENT_ARRAY_BUFFER => &mut self.element_binding,
            _ => &mut self.array_binding,
        }
    }

    fn bound_id(&self, target: GLenum) -> Result<u32, GLErrorWrapper> {
        self.binding(target)
            .ok_or_else(|| GLErrorWrapper::new(gl::INVALID_OPERATION))
    }

    pub fn live_buffers(&self) -> usize {
        self.stores.len()
    }
}

pub struct FakeBuffer {
    id: u32,
    gpu: Rc<RefCell<FakeGpu>>,
}

impl FakeBuffer {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for FakeBuffer {
    fn drop(&mut self) {
        let mut gpu = self.gpu.borrow_mut();
        gpu.stores.remove(&self.id);
        gpu.deleted.push(self.id);
    }
}

/// Bytes lent out by [RecordingContext::map_buffer].  Put back on drop, even when the
/// closure holding them panics.
struct MappedStore {
    id: u32,
    bytes: Vec<u8>,
    gpu: Rc<RefCell<FakeGpu>>,
}

impl Drop for MappedStore {
    fn drop(&mut self) {
        let mut gpu = self.gpu.borrow_mut();
        gpu.stores.insert(self.id, std::mem::take(&mut self.bytes));
        gpu.unmaps += 1;
    }
}

#[derive(Default)]
pub struct RecordingContext {
    gpu: Rc<RefCell<FakeGpu>>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gpu(&self) -> Ref<'_, FakeGpu> {
        self.gpu.borrow()
    }

    pub fn gpu_mut(&self) -> RefMut<'_, FakeGpu> {
        self.gpu.borrow_mut()
    }

    pub fn store(&self, id: u32) -> Vec<u8> {
        self.gpu().stores.get(&id).cloned().unwrap_or_default()
    }

    /// the buffer's bytes read back as vertex positions
    pub fn positions(&self, id: u32) -> Vec<Vector3> {
        self.store(id)
            .chunks_exact(std::mem::size_of::<Vector3>())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }
}

impl GraphicsContext for RecordingContext {
    type Buffer = FakeBuffer;

    fn create_buffer(&mut self) -> Result<FakeBuffer, GLErrorWrapper> {
        let mut gpu = self.gpu.borrow_mut();
        gpu.next_id += 1;
        let id = gpu.next_id;
        gpu.stores.insert(id, Vec::new());
        Ok(FakeBuffer {
            id,
            gpu: self.gpu.clone(),
        })
    }

    fn bind_buffer<B: BufferTarget>(
        &mut self,
        buffer: Option<&FakeBuffer>,
    ) -> Result<(), GLErrorWrapper> {
        let mut gpu = self.gpu.borrow_mut();
        if buffer.is_none() && gpu.fail_unbind {
            return Err(GLErrorWrapper::new(gl::INVALID_OPERATION));
        }
        *gpu.binding_mut(B::TARGET) = buffer.map(FakeBuffer::id);
        Ok(())
    }

    fn buffer_data<B: BufferTarget>(
        &mut self,
        bytes: &[u8],
        usage: BufferUsage,
    ) -> Result<(), GLErrorWrapper> {
        let mut gpu = self.gpu.borrow_mut();
        let id = gpu.bound_id(B::TARGET)?;
        let mut data = bytes.to_vec();
        if gpu.truncate_buffer == Some(id) {
            data.truncate(data.len().saturating_sub(4));
        }
        gpu.stores.insert(id, data);
        gpu.uploads.push(Upload::Full {
            buffer: id,
            len: bytes.len(),
            usage,
        });
        Ok(())
    }

    fn buffer_sub_data<B: BufferTarget>(
        &mut self,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), GLErrorWrapper> {
        let mut gpu = self.gpu.borrow_mut();
        let id = gpu.bound_id(B::TARGET)?;
        let store = gpu
            .stores
            .get_mut(&id)
            .ok_or_else(|| GLErrorWrapper::new(gl::INVALID_OPERATION))?;
        if offset + bytes.len() > store.len() {
            return Err(GLErrorWrapper::new(gl::INVALID_VALUE));
        }
        store[offset..offset + bytes.len()].copy_from_slice(bytes);
        gpu.uploads.push(Upload::Partial {
            buffer: id,
            offset,
            len: bytes.len(),
        });
        Ok(())
    }

    fn buffer_size<B: BufferTarget>(&mut self) -> Result<usize, GLErrorWrapper> {
        let gpu = self.gpu.borrow();
        let id = gpu.bound_id(B::TARGET)?;
        Ok(gpu.stores.get(&id).map_or(0, Vec::len))
    }

    fn map_buffer<B: BufferTarget, R>(
        &mut self,
        mutate: impl FnOnce(&mut [u8]) -> R,
    ) -> Result<Option<R>, GLErrorWrapper> {
        let mut mapped = {
            let mut gpu = self.gpu.borrow_mut();
            gpu.map_attempts += 1;
            if gpu.refuse_mapping {
                return Ok(None);
            }
            let id = gpu.bound_id(B::TARGET)?;
            gpu.maps += 1;
            let bytes = std::mem::take(gpu.stores.get_mut(&id).expect("bound buffer exists"));
            MappedStore {
                id,
                bytes,
                gpu: self.gpu.clone(),
            }
        };

        Ok(Some(mutate(&mut mapped.bytes)))
    }

    fn is_attrib_array_enabled(&mut self, location: GLuint) -> Result<bool, GLErrorWrapper> {
        Ok(self.gpu.borrow().enabled.contains(&location))
    }

    fn set_attrib_array_enabled(
        &mut self,
        location: GLuint,
        enabled: bool,
    ) -> Result<(), GLErrorWrapper> {
        let mut gpu = self.gpu.borrow_mut();
        if enabled {
            gpu.enabled.insert(location);
        } else {
            gpu.enabled.remove(&location);
        }
        Ok(())
    }

    fn attrib_pointer(
        &mut self,
        location: GLuint,
        layout: AttributeLayout,
    ) -> Result<(), GLErrorWrapper> {
        let mut gpu = self.gpu.borrow_mut();
        let id = gpu.bound_id(gl::ARRAY_BUFFER)?;
        gpu.pointers.insert(location, (id, layout));
        Ok(())
    }

    fn draw_triangles(&mut self, index_count: usize) -> Result<(), GLErrorWrapper> {
        let mut gpu = self.gpu.borrow_mut();
        let streams = gpu
            .enabled
            .iter()
            .filter_map(|location| gpu.pointers.get(location).map(|p| (*location, *p)))
            .collect();
        let call = DrawCall {
            index_count,
            element_buffer: gpu.element_binding,
            streams,
        };
        gpu.draws.push(call);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gl_thin::gl_helper::ArrayBufferType;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn panicking_closure_still_unmaps() {
        let mut ctx = RecordingContext::new();
        let buffer = ctx.create_buffer().unwrap();
        ctx.bind_buffer::<ArrayBufferType>(Some(&buffer)).unwrap();
        ctx.buffer_data::<ArrayBufferType>(&[1, 2, 3, 4, 5, 6, 7, 8], BufferUsage::DynamicDraw)
            .unwrap();

        let result = catch_unwind(AssertUnwindSafe(|| {
            ctx.map_buffer::<ArrayBufferType, ()>(|bytes| {
                bytes[0] = 0xab;
                panic!("closure gave up halfway");
            })
        }));
        assert!(result.is_err());

        let gpu = ctx.gpu();
        assert_eq!(1, gpu.maps);
        assert_eq!(1, gpu.unmaps);
        assert_eq!(Some(buffer.id()), gpu.array_binding);
        drop(gpu);
        assert_eq!(vec![0xab, 2, 3, 4, 5, 6, 7, 8], ctx.store(buffer.id()));
    }

    #[test]
    fn refused_mapping_never_runs_the_closure() {
        let mut ctx = RecordingContext::new();
        let buffer = ctx.create_buffer().unwrap();
        ctx.bind_buffer::<ArrayBufferType>(Some(&buffer)).unwrap();
        ctx.gpu_mut().refuse_mapping = true;

        let rval = ctx
            .map_buffer::<ArrayBufferType, ()>(|_| panic!("mapped anyway"))
            .unwrap();
        assert_eq!(None, rval);
        assert_eq!((1, 0, 0), {
            let gpu = ctx.gpu();
            (gpu.map_attempts, gpu.maps, gpu.unmaps)
        });
    }
}
