use crate::error::ConfigError;

/// Width of a virtual address in bits
pub const ADDRESS_BITS: u32 = u32::BITS;

/// How addresses are split into a page number and an offset, and how many frames physical memory
/// holds
///
/// The frame size is a power of two, so the split is two bit operations. The masks are worked out
/// once on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    memory_size: u32,
    frame_size: u32,
    offset_bits: u32,
    offset_bit_mask: u32,
    max_frames: u32,
}

impl PageGeometry {
    /// Validates the memory and frame sizes and derives the geometry from them
    ///
    /// # Arguments
    ///
    /// * `memory_size`: Physical memory size in bytes
    /// * `frame_size`: Frame (and page) size in bytes. Must be a power of two which evenly divides
    /// `memory_size`
    ///
    /// returns: Result<PageGeometry, ConfigError>
    ///
    /// # Examples
    ///
    /// ```
    /// use mmulib::address::PageGeometry;
    /// let geometry = PageGeometry::new(65536, 4096).unwrap();
    /// assert_eq!(geometry.max_frames(), 16);
    /// assert_eq!(geometry.offset_bits(), 12);
    /// assert_eq!(geometry.page_number(0x1234), 1);
    /// assert_eq!(geometry.offset(0x1234), 0x234);
    /// ```
    pub fn new(memory_size: u32, frame_size: u32) -> Result<Self, ConfigError> {
        if !frame_size.is_power_of_two() {
            return Err(ConfigError::FrameSizeNotPowerOfTwo(frame_size));
        }
        if memory_size % frame_size != 0 {
            return Err(ConfigError::FrameSizeMismatch { memory_size, frame_size });
        }
        let max_frames = memory_size / frame_size;
        if max_frames == 0 {
            return Err(ConfigError::NoFrames(memory_size));
        }
        let offset_bits = frame_size.trailing_zeros();
        Ok(Self {
            memory_size,
            frame_size,
            offset_bits,
            offset_bit_mask: frame_size - 1,
            max_frames,
        })
    }

    pub fn page_number(&self, address: u32) -> u32 {
        address >> self.offset_bits
    }

    pub fn offset(&self, address: u32) -> u32 {
        address & self.offset_bit_mask
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn page_bits(&self) -> u32 {
        ADDRESS_BITS - self.offset_bits
    }

    /// Number of distinct virtual pages a single process can address
    pub fn max_pages(&self) -> u64 {
        1u64 << self.page_bits()
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    pub fn memory_size(&self) -> u32 {
        self.memory_size
    }

    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }
}
