pub mod config;
pub mod error;
pub mod free_list;
pub mod header;
pub mod page;
pub mod page_file;
pub mod storage;

pub use config::PageFileConfig;
pub use error::PageFileError;
pub use page::{Page, PageNumber, PAGE_SIZE};
pub use page_file::{PageFile, PageFileStats};
pub use storage::{fs::FileStorage, memory::MemoryStorage, PageStorage};
