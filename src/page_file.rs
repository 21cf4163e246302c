use std::{io, path::Path};

use log::{debug, warn};

use crate::{
    config::PageFileConfig,
    error::{PageFileError, Result},
    free_list::FreePageLink,
    header::{HeaderPage, MetaValue},
    page::{Page, PageNumber},
    storage::{fs::FileStorage, PageStorage},
};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageFileStats {
    pub page_count: u32,
    pub free_head: PageNumber,
    pub current_page: Option<PageNumber>,
    pub storage_len: u64,
}

/// An open page file.
///
/// The handle owns exactly two page buffers: the header page and a single
/// resident data page. [`PageFile::read`] and [`PageFile::allocate`] replace
/// the resident page, so changes made through the returned buffer must be
/// persisted with [`PageFile::write`] before another page is loaded.
/// [`PageFile::free`] reclaims the resident page and leaves no page resident.
///
/// Every operation that changes the header writes page 0 before returning.
/// Nothing is rolled back when a write fails.
pub struct PageFile<S: PageStorage = FileStorage> {
    storage: S,
    header: HeaderPage,
    page: Page,
    /// Page number held in `page`, 0 when no page is resident.
    current: PageNumber,
}

impl PageFile<FileStorage> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &PageFileConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: &PageFileConfig) -> Result<Self> {
        let path = path.as_ref();
        let storage = FileStorage::open(path, config).map_err(PageFileError::ResourceUnavailable)?;
        debug!("opened page file {}", path.display());
        Self::with_storage(storage)
    }
}

impl<S: PageStorage> PageFile<S> {
    /// Opens a page file over `storage`. Empty storage is initialized with a
    /// fresh header; otherwise page 0 is loaded and its magic validated.
    pub fn with_storage(mut storage: S) -> Result<Self> {
        let mut header_page = Page::try_zeroed().map_err(|_| PageFileError::AllocationFailure)?;
        let page = Page::try_zeroed().map_err(|_| PageFileError::AllocationFailure)?;

        let header = if storage.is_empty()? {
            let header = HeaderPage::new(header_page);
            storage.write_page(0, header.page().as_array())?;
            debug!("initialized new page file");
            header
        } else {
            storage.read_page(0, header_page.as_mut_array())?;
            HeaderPage::load(header_page).inspect_err(|err| warn!("rejected page file header: {}", err))?
        };

        Ok(PageFile {
            storage,
            header,
            page,
            current: 0,
        })
    }

    /// Flushes the storage and releases it.
    pub fn close(mut self) -> Result<()> {
        self.storage.sync()?;
        Ok(())
    }

    pub fn sync(&mut self) -> Result<()> {
        self.storage.sync()?;
        Ok(())
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn page_count(&self) -> u32 {
        self.header.header().page_count
    }

    pub fn free_head(&self) -> PageNumber {
        self.header.header().free_head
    }

    pub fn current_page_number(&self) -> Option<PageNumber> {
        (self.current != 0).then_some(self.current)
    }

    pub fn page(&self) -> Option<&Page> {
        (self.current != 0).then_some(&self.page)
    }

    pub fn page_mut(&mut self) -> Option<&mut Page> {
        (self.current != 0).then_some(&mut self.page)
    }

    pub fn stats(&self) -> Result<PageFileStats> {
        Ok(PageFileStats {
            page_count: self.page_count(),
            free_head: self.free_head(),
            current_page: self.current_page_number(),
            storage_len: self.storage.len()?,
        })
    }

    /// Allocates a zero-filled page, reusing the most recently freed page
    /// when there is one. The new page becomes the resident page.
    pub fn allocate(&mut self) -> Result<(PageNumber, &mut Page)> {
        let free_head = self.free_head();
        let page_number = if free_head != 0 {
            self.load(free_head)?;
            let link = FreePageLink::read_from(&self.page);
            self.header.set_free_head(link.next);
            free_head
        } else {
            // files written with a zero page count still keep page 0 reserved
            let page_number = self.page_count().max(1);
            let page_count = page_number
                .checked_add(1)
                .ok_or_else(|| io::Error::other("Page file is full"))?;
            self.header.set_page_count(page_count);
            page_number
        };
        self.write_header()?;

        self.page.clear();
        self.current = page_number;
        self.write_current()?;
        debug!("allocated page {}", page_number);
        Ok((page_number, &mut self.page))
    }

    /// Pushes the resident page onto the free list. Its first four bytes are
    /// overwritten with the link to the previously freed page.
    ///
    /// The page is no longer resident afterwards, even when a write fails.
    /// Freeing the page at the head of the free list is rejected.
    pub fn free(&mut self) -> Result<()> {
        let page_number = self.resident()?;
        if page_number == self.free_head() {
            return Err(PageFileError::InvalidState);
        }
        FreePageLink { next: self.free_head() }.write_to(&mut self.page);
        // the buffer now holds the link, not the caller's data
        self.current = 0;
        self.storage.write_page(page_number, self.page.as_array())?;
        self.header.set_free_head(page_number);
        self.write_header()?;
        debug!("freed page {}", page_number);
        Ok(())
    }

    /// Makes `page_number` the resident page and returns its buffer. Reading
    /// the page that is already resident returns the buffer as is.
    pub fn read(&mut self, page_number: PageNumber) -> Result<&mut Page> {
        if page_number == 0 {
            return Err(PageFileError::InvalidArgument("page 0 is the header page"));
        }
        if page_number != self.current {
            self.load(page_number)?;
        }
        Ok(&mut self.page)
    }

    /// Persists the resident page.
    pub fn write(&mut self) -> Result<()> {
        self.resident()?;
        self.write_current()
    }

    pub fn get_meta<T: MetaValue>(&self, offset: usize) -> Result<T> {
        self.header.get(offset)
    }

    /// Stores `value` in the metadata region and persists the header. When
    /// the write fails the in-memory header keeps the new value.
    pub fn set_meta<T: MetaValue>(&mut self, offset: usize, value: T) -> Result<()> {
        self.header.set(offset, value)?;
        self.write_header()
    }

    pub fn get_u8(&self, offset: usize) -> Result<u8> {
        self.get_meta(offset)
    }

    pub fn get_u16(&self, offset: usize) -> Result<u16> {
        self.get_meta(offset)
    }

    pub fn get_u32(&self, offset: usize) -> Result<u32> {
        self.get_meta(offset)
    }

    pub fn get_u64(&self, offset: usize) -> Result<u64> {
        self.get_meta(offset)
    }

    pub fn set_u8(&mut self, offset: usize, value: u8) -> Result<()> {
        self.set_meta(offset, value)
    }

    pub fn set_u16(&mut self, offset: usize, value: u16) -> Result<()> {
        self.set_meta(offset, value)
    }

    pub fn set_u32(&mut self, offset: usize, value: u32) -> Result<()> {
        self.set_meta(offset, value)
    }

    pub fn set_u64(&mut self, offset: usize, value: u64) -> Result<()> {
        self.set_meta(offset, value)
    }

    fn resident(&self) -> Result<PageNumber> {
        self.current_page_number().ok_or(PageFileError::InvalidState)
    }

    fn load(&mut self, page_number: PageNumber) -> Result<()> {
        // a failed read leaves the buffer undefined, so nothing stays resident
        self.current = 0;
        self.storage.read_page(page_number, self.page.as_mut_array())?;
        self.current = page_number;
        Ok(())
    }

    fn write_current(&mut self) -> Result<()> {
        self.storage.write_page(self.current, self.page.as_array())?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.storage.write_page(0, self.header.page().as_array())?;
        Ok(())
    }
}
