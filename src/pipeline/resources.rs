use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use crate::core::Vertex;
use crate::error::{RenderError, Result};

/// Opaque buffer identifier. Zero is reserved for "nothing bound".
///
/// Vertex and index buffers draw from the same counter, so a handle is unique
/// across both kinds for the lifetime of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(u32);

impl Handle {
    pub const NULL: Handle = Handle(0);

    /// Wraps a raw id. Any value is accepted; unknown ids simply resolve to
    /// [`RenderError::InvalidHandle`] on lookup.
    pub const fn from_raw(raw: u32) -> Self {
        Handle(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Owns every uploaded vertex and index buffer. Entries live as long as the store.
#[derive(Debug, Default)]
pub struct ResourceStore {
    last_handle: u32,
    vertex_buffers: HashMap<Handle, Vec<Vertex>>,
    index_buffers: HashMap<Handle, Vec<u16>>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_handle(&mut self) -> Result<Handle> {
        self.last_handle = self
            .last_handle
            .checked_add(1)
            .ok_or(RenderError::HandlesExhausted)?;
        Ok(Handle(self.last_handle))
    }

    pub fn insert_vertices(&mut self, vertices: Vec<Vertex>) -> Result<Handle> {
        let handle = self.generate_handle()?;
        self.vertex_buffers.insert(handle, vertices);
        Ok(handle)
    }

    /// Rejects index lists that do not describe whole triangles.
    pub fn insert_indices(&mut self, indices: Vec<u16>) -> Result<Handle> {
        if indices.len() % 3 != 0 {
            return Err(RenderError::MalformedIndexBuffer { len: indices.len() });
        }
        let handle = self.generate_handle()?;
        self.index_buffers.insert(handle, indices);
        Ok(handle)
    }

    pub fn vertices(&self, handle: Handle) -> Result<&[Vertex]> {
        self.vertex_buffers
            .get(&handle)
            .map(Vec::as_slice)
            .ok_or(RenderError::InvalidHandle(handle))
    }

    pub fn indices(&self, handle: Handle) -> Result<&[u16]> {
        self.index_buffers
            .get(&handle)
            .map(Vec::as_slice)
            .ok_or(RenderError::InvalidHandle(handle))
    }

    pub fn len(&self) -> usize {
        self.vertex_buffers.len() + self.index_buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The single "current" slot per buffer kind. Not a stack: binding overwrites.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    vertex: Handle,
    index: Handle,
}

impl Bindings {
    /// No existence check; an unknown handle is only noticed at draw time.
    pub fn bind(&mut self, kind: BufferKind, handle: Handle) {
        *self.slot_mut(kind) = handle;
    }

    pub fn unbind(&mut self, kind: BufferKind) {
        *self.slot_mut(kind) = Handle::NULL;
    }

    pub fn current(&self, kind: BufferKind) -> Handle {
        match kind {
            BufferKind::Vertex => self.vertex,
            BufferKind::Index => self.index,
        }
    }

    fn slot_mut(&mut self, kind: BufferKind) -> &mut Handle {
        match kind {
            BufferKind::Vertex => &mut self.vertex,
            BufferKind::Index => &mut self.index,
        }
    }
}
