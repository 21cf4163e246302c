use crate::page::{Page, PageNumber};

/// Link stored in the first four bytes of a freed page, pointing at the page
/// freed before it. Only meaningful for pages on the free list; for any other
/// page those bytes are caller data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreePageLink {
    pub next: PageNumber,
}

impl FreePageLink {
    pub const SIZE: usize = size_of::<PageNumber>();

    /// Marks the end of the free list.
    pub const END: FreePageLink = FreePageLink { next: 0 };

    pub fn read_from(page: &Page) -> Self {
        let mut bytes = [0u8; Self::SIZE];
        bytes.copy_from_slice(&page[..Self::SIZE]);
        FreePageLink { next: PageNumber::from_le_bytes(bytes) }
    }

    pub fn write_to(&self, page: &mut Page) {
        page[..Self::SIZE].copy_from_slice(&self.next.to_le_bytes());
    }

    pub fn is_end(&self) -> bool {
        self.next == 0
    }
}
