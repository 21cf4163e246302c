use std::io;

use crate::page::{PageNumber, PAGE_SIZE};

pub mod fs;
pub mod memory;

/// Page granular access to the bytes backing a page file.
pub trait PageStorage {
    /// Returns the size of the underlying storage in bytes.
    fn len(&self) -> io::Result<u64>;

    fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Fills `buffer` with page `page_number`. Bytes past the end of the
    /// storage read as zero.
    fn read_page(&mut self, page_number: PageNumber, buffer: &mut [u8; PAGE_SIZE]) -> io::Result<()>;

    fn write_page(&mut self, page_number: PageNumber, buffer: &[u8; PAGE_SIZE]) -> io::Result<()>;

    /// Makes previously written pages durable.
    fn sync(&mut self) -> io::Result<()>;
}

/// Byte offset of a page inside the storage.
pub fn page_offset(page_number: PageNumber) -> io::Result<u64> {
    (page_number as u64)
        .checked_mul(PAGE_SIZE as u64)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Page offset overflow"))
}

impl<S: PageStorage + ?Sized> PageStorage for &mut S {
    fn len(&self) -> io::Result<u64> {
        (**self).len()
    }

    fn read_page(&mut self, page_number: PageNumber, buffer: &mut [u8; PAGE_SIZE]) -> io::Result<()> {
        (**self).read_page(page_number, buffer)
    }

    fn write_page(&mut self, page_number: PageNumber, buffer: &[u8; PAGE_SIZE]) -> io::Result<()> {
        (**self).write_page(page_number, buffer)
    }

    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }
}
