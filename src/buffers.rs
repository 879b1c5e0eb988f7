//! Growable binary buffers for streaming generated geometry to a rendering backend.
//!
//! A buffer owns one zero filled byte region (its capacity) and a write cursor (its size).
//! Values are appended little-endian and tightly packed; the caller defines any stride.
//! Writes never grow the region: `reserve_and_clear` must be called with a large enough
//! byte count before each encoding pass, and growing throws the old content away.

use std::fmt;
use std::marker::PhantomData;
use std::mem;

use log::debug;

/// A fixed width value that can be stored in a buffer.
pub trait Element: Copy + 'static {
    const WIDTH: usize;

    /// Decode from the first `WIDTH` bytes, little-endian.
    fn read_le(bytes: &[u8]) -> Self;

    /// Encode into the first `WIDTH` bytes, little-endian.
    fn write_le(self, out: &mut [u8]);
}

macro_rules! le_element {
    ($t:ty) => {
        impl Element for $t {
            const WIDTH: usize = mem::size_of::<$t>();

            #[inline]
            fn read_le(bytes: &[u8]) -> $t {
                let mut raw = [0u8; mem::size_of::<$t>()];
                raw.copy_from_slice(&bytes[..Self::WIDTH]);
                <$t>::from_le_bytes(raw)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                out[..Self::WIDTH].copy_from_slice(&self.to_le_bytes());
            }
        }
    }
}

le_element!(u8);
le_element!(u16);
le_element!(f32);

/// Read only typed window onto part of a buffer. Elements are decoded on access so the
/// underlying bytes need no particular alignment and are never copied.
#[derive(Clone, Copy)]
pub struct TypedView<'a, T: Element> {
    bytes: &'a [u8],
    element: PhantomData<T>,
}

impl<'a, T: Element> TypedView<'a, T> {
    fn new(bytes: &'a [u8]) -> TypedView<'a, T> {
        TypedView {
            bytes,
            element: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / T::WIDTH
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<T> {
        if index < self.len() {
            let start = index * T::WIDTH;
            Some(T::read_le(&self.bytes[start..start + T::WIDTH]))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        self.bytes.chunks_exact(T::WIDTH).map(T::read_le)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// The viewed bytes, ready for upload.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a, T: Element + fmt::Debug> fmt::Debug for TypedView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// The shared growth, clear and typed write logic of `DataBuffer` and `IndexBuffer`.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Vec<u8>,
    size: usize,
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ByteBuffer :: size: {}, capacity: {}", self.size, self.data.len())
    }
}

impl ByteBuffer {
    pub fn new(bytes: usize) -> ByteBuffer {
        ByteBuffer {
            data: vec![0; bytes],
            size: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Reallocate to exactly `min_bytes` zeroed bytes if the capacity is smaller, then clear.
    pub fn reserve_and_clear(&mut self, min_bytes: usize) {
        if min_bytes > self.data.len() {
            debug!("growing buffer from {} to {} bytes", self.data.len(), min_bytes);
            self.data = vec![0; min_bytes];
        }
        self.clear();
    }

    /// Bytes written since the last clear.
    #[inline]
    pub fn bytes(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The whole allocation, including anything past the write cursor.
    #[inline]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn written_bytes(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Append one value at the cursor.
    ///
    /// # Panics
    /// If the value does not fit in the remaining capacity.
    #[inline]
    pub fn write<T: Element>(&mut self, value: T) {
        let end = self.size + T::WIDTH;
        if end > self.data.len() {
            panic!("buffer overflow: writing {} bytes at offset {} exceeds capacity {}",
                   T::WIDTH, self.size, self.data.len());
        }
        value.write_le(&mut self.data[self.size..end]);
        self.size = end;
    }

    /// Typed view starting `start` bytes in (default 0) of `length` elements (default: as
    /// many whole elements as were written after `start`).
    ///
    /// # Panics
    /// If `start` is not a multiple of the element width or the view would extend past the
    /// capacity.
    pub fn slice<T: Element>(&self, start: Option<usize>, length: Option<usize>) -> TypedView<T> {
        let start = start.unwrap_or(0);
        let length = length.unwrap_or_else(|| self.size.saturating_sub(start) / T::WIDTH);
        if start % T::WIDTH != 0 {
            panic!("slice start {} is not a multiple of the element width {}", start, T::WIDTH);
        }
        let end = start + length * T::WIDTH;
        if end > self.data.len() {
            panic!("slice of {} elements at offset {} exceeds capacity {}",
                   length, start, self.data.len());
        }
        TypedView::new(&self.data[start..end])
    }
}

/// Vertex and instance attribute data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBuffer {
    buffer: ByteBuffer,
}

impl DataBuffer {
    pub fn new(bytes: usize) -> DataBuffer {
        DataBuffer { buffer: ByteBuffer::new(bytes) }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn reserve_and_clear(&mut self, min_bytes: usize) {
        self.buffer.reserve_and_clear(min_bytes);
    }

    #[inline]
    pub fn bytes(&self) -> usize {
        self.buffer.bytes()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn raw_bytes(&self) -> &[u8] {
        self.buffer.raw_bytes()
    }

    #[inline]
    pub fn written_bytes(&self) -> &[u8] {
        self.buffer.written_bytes()
    }

    pub fn write_float32_triple(&mut self, x: f32, y: f32, z: f32) {
        self.buffer.write(x);
        self.buffer.write(y);
        self.buffer.write(z);
    }

    pub fn write_uint8_quad(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.buffer.write(r);
        self.buffer.write(g);
        self.buffer.write(b);
        self.buffer.write(a);
    }

    pub fn write_uint16_pair(&mut self, x: u16, y: u16) {
        self.buffer.write(x);
        self.buffer.write(y);
    }

    pub fn write_uint8_pair(&mut self, x: u8, y: u8) {
        self.buffer.write(x);
        self.buffer.write(y);
    }

    pub fn write_uint8(&mut self, value: u8) {
        self.buffer.write(value);
    }

    pub fn slice_f32(&self, start: Option<usize>, length: Option<usize>) -> TypedView<f32> {
        self.buffer.slice(start, length)
    }

    pub fn slice_u16(&self, start: Option<usize>, length: Option<usize>) -> TypedView<u16> {
        self.buffer.slice(start, length)
    }

    pub fn slice_u8(&self, start: Option<usize>, length: Option<usize>) -> TypedView<u8> {
        self.buffer.slice(start, length)
    }
}

/// Triangle and line indices. Remembers the largest index written since the last clear
/// so a batch of vertices can be appended without tracking offsets by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuffer {
    buffer: ByteBuffer,
    last_index: Option<u32>,
}

impl IndexBuffer {
    pub fn new(bytes: usize) -> IndexBuffer {
        IndexBuffer {
            buffer: ByteBuffer::new(bytes),
            last_index: None,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_index = None;
    }

    pub fn reserve_and_clear(&mut self, min_bytes: usize) {
        self.buffer.reserve_and_clear(min_bytes);
        self.last_index = None;
    }

    #[inline]
    pub fn bytes(&self) -> usize {
        self.buffer.bytes()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn raw_bytes(&self) -> &[u8] {
        self.buffer.raw_bytes()
    }

    #[inline]
    pub fn written_bytes(&self) -> &[u8] {
        self.buffer.written_bytes()
    }

    /// One past the largest index written since the last clear, 0 if none was.
    #[inline]
    pub fn next_index(&self) -> u32 {
        self.last_index.map_or(0, |last| last + 1)
    }

    fn seen(&mut self, index: u32) {
        self.last_index = Some(self.last_index.map_or(index, |last| last.max(index)));
    }

    pub fn write_uint16_triple(&mut self, i1: u16, i2: u16, i3: u16) {
        for &i in &[i1, i2, i3] {
            self.buffer.write(i);
            self.seen(u32::from(i));
        }
    }

    pub fn write_uint16_pair(&mut self, i1: u16, i2: u16) {
        for &i in &[i1, i2] {
            self.buffer.write(i);
            self.seen(u32::from(i));
        }
    }

    pub fn write_uint16_single(&mut self, i1: u16) {
        self.buffer.write(i1);
        self.seen(u32::from(i1));
    }

    pub fn write_uint8_triple(&mut self, i1: u8, i2: u8, i3: u8) {
        for &i in &[i1, i2, i3] {
            self.buffer.write(i);
            self.seen(u32::from(i));
        }
    }

    pub fn slice_u8(&self, start: Option<usize>, length: Option<usize>) -> TypedView<u8> {
        self.buffer.slice(start, length)
    }

    pub fn slice_u16(&self, start: Option<usize>, length: Option<usize>) -> TypedView<u16> {
        self.buffer.slice(start, length)
    }
}
