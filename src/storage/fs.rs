use std::{fs::{File, OpenOptions}, io::{self, Read, Seek, SeekFrom, Write}, path::Path};

use log::trace;

use crate::{config::PageFileConfig, page::{PageNumber, PAGE_SIZE}};

use super::{page_offset, PageStorage};

pub struct FileStorage {
    file: File,
    sync_writes: bool,
}

impl FileStorage {
    /// Opens `path` for reading and writing, creating it with `config.mode`
    /// if it does not exist.
    pub fn open(path: impl AsRef<Path>, config: &PageFileConfig) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(config.mode);
        }
        let file = options.open(path)?;
        Ok(Self::new(file, config))
    }

    pub fn new(file: File, config: &PageFileConfig) -> Self {
        FileStorage {
            file,
            sync_writes: config.sync_writes,
        }
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl PageStorage for FileStorage {
    fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn read_page(&mut self, page_number: PageNumber, buffer: &mut [u8; PAGE_SIZE]) -> io::Result<()> {
        trace!("read page {}", page_number);
        self.file.seek(SeekFrom::Start(page_offset(page_number)?))?;
        let mut filled = 0;
        while filled < PAGE_SIZE {
            match self.file.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(read_size) => filled += read_size,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        buffer[filled..].fill(0);
        Ok(())
    }

    fn write_page(&mut self, page_number: PageNumber, buffer: &[u8; PAGE_SIZE]) -> io::Result<()> {
        trace!("write page {}", page_number);
        self.file.seek(SeekFrom::Start(page_offset(page_number)?))?;
        self.file.write_all(buffer)?;
        if self.sync_writes {
            self.file.sync_data()?;
        }
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}
