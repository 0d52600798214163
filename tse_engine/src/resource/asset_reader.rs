/// Bounds-checked little-endian reader over an in-memory asset file

use bytemuck::Pod;

use crate::error::{Error, Result};

/// Length of fixed-size name fields in binary containers
pub const NAME_LENGTH: usize = 300;

pub struct AssetReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> AssetReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read position
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Take the next `len` bytes
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::AssetError(format!(
                "unexpected end of data: need {} byte(s) at offset {}, {} left",
                len,
                self.offset,
                self.remaining()
            )));
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    /// Check a 4-byte magic tag
    pub fn expect_magic(&mut self, magic: &[u8; 4]) -> Result<()> {
        let found = self.array::<4>()?;
        if &found != magic {
            return Err(Error::AssetError(format!(
                "bad signature {:?}, expected {:?}",
                String::from_utf8_lossy(&found),
                String::from_utf8_lossy(magic)
            )));
        }
        Ok(())
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    pub fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    /// Zero-terminated string stored in a fixed-size field
    pub fn fixed_string(&mut self, len: usize) -> Result<String> {
        let raw = self.bytes(len)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Read `count` plain-data records (unaligned copy)
    pub fn pod_vec<T: Pod>(&mut self, count: usize) -> Result<Vec<T>> {
        let size = std::mem::size_of::<T>();
        let total = count.checked_mul(size).ok_or(Error::OutOfMemory)?;
        let raw = self.bytes(total)?;
        Ok(raw.chunks_exact(size).map(bytemuck::pod_read_unaligned).collect())
    }
}

#[cfg(test)]
#[path = "asset_reader_tests.rs"]
mod tests;
