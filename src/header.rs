//! Layout of page 0.
//!
//! | offset | width | field                        |
//! |--------|-------|------------------------------|
//! | 0      | 4     | magic signature              |
//! | 4      | 4     | page count                   |
//! | 8      | 4     | free list head (0 = empty)   |
//! | 12     | 20    | reserved, zero               |
//! | 32     | 4064  | caller metadata              |
//!
//! All integers are stored little-endian.

use std::ops::Range;

use crate::{error::{PageFileError, Result}, page::{Page, PageNumber, PAGE_SIZE}};

pub const MAGIC: u32 = 0x7071_6580;
pub const HEADER_SIZE: usize = 32;
pub const META_SIZE: usize = PAGE_SIZE - HEADER_SIZE;

const MAGIC_OFFSET: usize = 0;
const PAGE_COUNT_OFFSET: usize = 4;
const FREE_HEAD_OFFSET: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: u32,
    /// Number of pages ever allocated, header page included.
    pub page_count: u32,
    pub free_head: PageNumber,
}

impl Default for FileHeader {
    fn default() -> Self {
        FileHeader {
            magic: MAGIC,
            page_count: 1,
            free_head: 0,
        }
    }
}

impl FileHeader {
    pub fn decode(page: &Page) -> Self {
        FileHeader {
            magic: read_u32(page, MAGIC_OFFSET),
            page_count: read_u32(page, PAGE_COUNT_OFFSET),
            free_head: read_u32(page, FREE_HEAD_OFFSET),
        }
    }

    pub fn encode(&self, page: &mut Page) {
        page[MAGIC_OFFSET..MAGIC_OFFSET + 4].copy_from_slice(&self.magic.to_le_bytes());
        page[PAGE_COUNT_OFFSET..PAGE_COUNT_OFFSET + 4].copy_from_slice(&self.page_count.to_le_bytes());
        page[FREE_HEAD_OFFSET..FREE_HEAD_OFFSET + 4].copy_from_slice(&self.free_head.to_le_bytes());
    }
}

fn read_u32(page: &Page, offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&page[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

/// Fixed width integers storable in the metadata region.
pub trait MetaValue: Copy {
    const WIDTH: usize;

    fn decode(bytes: &[u8]) -> Self;
    fn encode(self, bytes: &mut [u8]);
}

macro_rules! impl_meta_value {
    ($($ty:ty),*) => {
        $(
            impl MetaValue for $ty {
                const WIDTH: usize = size_of::<$ty>();

                fn decode(bytes: &[u8]) -> Self {
                    let mut buffer = [0u8; size_of::<$ty>()];
                    buffer.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buffer)
                }

                fn encode(self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_meta_value!(u8, u16, u32, u64);

/// The resident header page: a decoded control block plus the raw page
/// holding the metadata region.
pub struct HeaderPage {
    header: FileHeader,
    page: Page,
}

impl HeaderPage {
    pub fn new(page: Page) -> Self {
        let mut header_page = HeaderPage {
            header: FileHeader::default(),
            page,
        };
        header_page.page.clear();
        header_page.sync_control_block();
        header_page
    }

    /// Interprets a page read from disk, rejecting it unless the magic matches.
    pub fn load(page: Page) -> Result<Self> {
        let header = FileHeader::decode(&page);
        if header.magic != MAGIC {
            return Err(PageFileError::WrongFormat { found: header.magic });
        }
        Ok(HeaderPage { header, page })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn set_page_count(&mut self, page_count: u32) {
        self.header.page_count = page_count;
        self.sync_control_block();
    }

    pub fn set_free_head(&mut self, free_head: PageNumber) {
        self.header.free_head = free_head;
        self.sync_control_block();
    }

    /// The encoded page, ready to be written as page 0.
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn metadata(&self) -> &[u8] {
        &self.page[HEADER_SIZE..]
    }

    pub fn get<T: MetaValue>(&self, offset: usize) -> Result<T> {
        let range = meta_range::<T>(offset)?;
        Ok(T::decode(&self.page[range]))
    }

    /// Stores `value` in the in-memory page only; the caller persists it.
    pub fn set<T: MetaValue>(&mut self, offset: usize, value: T) -> Result<()> {
        let range = meta_range::<T>(offset)?;
        value.encode(&mut self.page[range]);
        Ok(())
    }

    fn sync_control_block(&mut self) {
        self.header.encode(&mut self.page);
    }
}

fn meta_range<T: MetaValue>(offset: usize) -> Result<Range<usize>> {
    let out_of_range = || PageFileError::OutOfRange { offset, width: T::WIDTH };
    let start = HEADER_SIZE.checked_add(offset).ok_or_else(out_of_range)?;
    let end = start.checked_add(T::WIDTH).ok_or_else(out_of_range)?;
    if end > PAGE_SIZE {
        return Err(out_of_range());
    }
    Ok(start..end)
}
