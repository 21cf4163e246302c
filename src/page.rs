use std::{collections::TryReserveError, ops::{Deref, DerefMut}};

/// Size of every page in the file, header page included.
pub const PAGE_SIZE: usize = 4096;

/// Page numbers are 1-based for data pages; 0 addresses the header page.
pub type PageNumber = u32;

/// A heap allocated, page sized byte buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    data: Box<[u8; PAGE_SIZE]>,
}

impl Page {
    pub fn zeroed() -> Self {
        Page { data: Box::new([0u8; PAGE_SIZE]) }
    }

    /// Like [`Page::zeroed`], but reports allocation failure instead of aborting.
    pub fn try_zeroed() -> Result<Self, TryReserveError> {
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(PAGE_SIZE)?;
        buffer.resize(PAGE_SIZE, 0u8);
        let data = buffer
            .into_boxed_slice()
            .try_into()
            .unwrap_or_else(|_| unreachable!("buffer length is PAGE_SIZE"));
        Ok(Page { data })
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn as_array(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    pub fn as_mut_array(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }
}

impl Deref for Page {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data[..]
    }
}

impl DerefMut for Page {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.data.iter().rposition(|&byte| byte != 0).map_or(0, |i| i + 1);
        f.debug_struct("Page").field("used", &used).finish()
    }
}
