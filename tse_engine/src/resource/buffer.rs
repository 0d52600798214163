/// Fixed-slot GPU storage buffer.
///
/// A Buffer is a block of bytes bound to one binding point, read by shaders as
/// a storage block. Its size is fixed at creation: `update` only rewrites
/// bytes, clamping every write to the allocated range.

use bytemuck::Pod;

use crate::error::Result;
use crate::engine_warn;
use crate::graphics_device::{BufferHandle, GraphicsDevice};
use super::resource_manager::Resource;

pub struct Buffer {
    handle: BufferHandle,
    slot: u32,
    size: usize,
}

impl Buffer {
    /// Allocate `size` bytes bound to `slot`, optionally filled from `data`
    ///
    /// A zero size leaves the buffer unallocated (every later call is a no-op).
    pub fn create(
        device: &mut dyn GraphicsDevice,
        slot: u32,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<Self> {
        let mut buffer = Self { handle: BufferHandle::INVALID, slot, size: 0 };
        buffer.recreate(device, slot, size, data)?;
        Ok(buffer)
    }

    /// Buffer sized for one `T`
    pub fn create_for<T: Pod>(device: &mut dyn GraphicsDevice, slot: u32, value: Option<&T>) -> Result<Self> {
        Self::create(
            device,
            slot,
            std::mem::size_of::<T>(),
            value.map(|v| bytemuck::bytes_of(v)),
        )
    }

    /// Buffer sized for `count` elements of `T`
    pub fn create_array<T: Pod>(
        device: &mut dyn GraphicsDevice,
        slot: u32,
        count: usize,
        data: Option<&[T]>,
    ) -> Result<Self> {
        Self::create(
            device,
            slot,
            std::mem::size_of::<T>() * count,
            data.map(|d| bytemuck::cast_slice(d)),
        )
    }

    /// Free the current allocation, then allocate again and bind
    pub fn recreate(
        &mut self,
        device: &mut dyn GraphicsDevice,
        slot: u32,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<()> {
        self.free(device);
        self.slot = slot;
        if size == 0 {
            return Ok(());
        }

        if let Some(bytes) = data {
            if bytes.len() < size {
                engine_warn!("tse::Buffer",
                    "Initial data ({} bytes) shorter than buffer ({} bytes), tail left uninitialized",
                    bytes.len(), size);
            }
        }
        self.handle = device.create_storage_buffer(size, data.map(|d| &d[..d.len().min(size)]))?;
        self.size = size;
        device.bind_storage_buffer(self.handle, self.slot);
        Ok(())
    }

    /// Overwrite part of the buffer
    ///
    /// `start` is clamped to 0, a negative `size` means "up to the end", and
    /// the written range is truncated to the allocation (and to `data`).
    /// Returns the number of bytes written.
    pub fn update(&mut self, device: &mut dyn GraphicsDevice, data: &[u8], start: i64, size: i64) -> usize {
        if !self.handle.is_valid() {
            return 0;
        }

        let start = start.max(0) as usize;
        if start >= self.size {
            return 0;
        }
        let remaining = self.size - start;
        let requested = if size < 0 { remaining } else { (size as usize).min(remaining) };
        let count = requested.min(data.len());
        if count == 0 {
            return 0;
        }

        device.update_buffer(self.handle, start, &data[..count]);
        count
    }

    /// Overwrite the buffer from offset 0 with the bytes of `value`
    pub fn update_with<T: Pod>(&mut self, device: &mut dyn GraphicsDevice, value: &T) -> usize {
        self.update(device, bytemuck::bytes_of(value), 0, -1)
    }

    /// Re-bind to the binding slot
    pub fn apply(&self, device: &mut dyn GraphicsDevice) {
        if self.handle.is_valid() {
            device.bind_storage_buffer(self.handle, self.slot);
        }
    }

    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Allocated size in bytes (0 when unallocated)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_allocated(&self) -> bool {
        self.handle.is_valid()
    }
}

impl Resource for Buffer {
    fn name(&self) -> &str {
        "buffer"
    }

    fn free(&mut self, device: &mut dyn GraphicsDevice) {
        if self.handle.is_valid() {
            device.delete_buffer(self.handle);
        }
        self.handle = BufferHandle::INVALID;
        self.size = 0;
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
