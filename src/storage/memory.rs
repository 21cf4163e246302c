use std::io;

use crate::page::{PageNumber, PAGE_SIZE};

use super::{page_offset, PageStorage};

/// Page storage kept entirely in memory, grown on write.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    buffer: Vec<u8>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage { buffer: Vec::new() }
    }

    pub fn from_buffer(buffer: Vec<u8>) -> Self {
        MemoryStorage { buffer }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    fn page_range(page_number: PageNumber) -> io::Result<(usize, usize)> {
        let start = usize::try_from(page_offset(page_number)?)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Page offset overflow"))?;
        let end = start
            .checked_add(PAGE_SIZE)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Page offset overflow"))?;
        Ok((start, end))
    }
}

impl PageStorage for MemoryStorage {
    fn len(&self) -> io::Result<u64> {
        Ok(self.buffer.len() as u64)
    }

    fn read_page(&mut self, page_number: PageNumber, buffer: &mut [u8; PAGE_SIZE]) -> io::Result<()> {
        let (start, end) = Self::page_range(page_number)?;
        let available = self.buffer.len().min(end).saturating_sub(start);
        if available > 0 {
            buffer[..available].copy_from_slice(&self.buffer[start..start + available]);
        }
        buffer[available..].fill(0);
        Ok(())
    }

    fn write_page(&mut self, page_number: PageNumber, buffer: &[u8; PAGE_SIZE]) -> io::Result<()> {
        let (start, end) = Self::page_range(page_number)?;
        if self.buffer.len() < end {
            self.buffer.resize(end, 0);
        }
        self.buffer[start..end].copy_from_slice(buffer);
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() -> io::Result<()> {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty()?);

        let page: [u8; PAGE_SIZE] = std::array::from_fn(|i| i as u8);
        storage.write_page(1, &page)?;
        assert_eq!(storage.len()?, 2 * PAGE_SIZE as u64);
        assert!(storage.as_bytes()[..PAGE_SIZE].iter().all(|&byte| byte == 0));

        let mut buffer = [0u8; PAGE_SIZE];
        storage.read_page(1, &mut buffer)?;
        assert_eq!(buffer, page);

        // unwritten page reads as zeros
        buffer.fill(9);
        storage.read_page(4, &mut buffer)?;
        assert_eq!(buffer, [0u8; PAGE_SIZE]);
        Ok(())
    }

    #[test]
    fn test_memory_storage_partial_page() -> io::Result<()> {
        let mut storage = MemoryStorage::from_buffer(vec![7u8; 10]);
        let mut buffer = [1u8; PAGE_SIZE];
        storage.read_page(0, &mut buffer)?;
        assert_eq!(&buffer[..10], &[7u8; 10]);
        assert!(buffer[10..].iter().all(|&byte| byte == 0));

        storage.write_page(0, &[2u8; PAGE_SIZE])?;
        assert_eq!(storage.into_buffer(), vec![2u8; PAGE_SIZE]);
        Ok(())
    }
}
