use std::{fs, io::Write};

use pagefile::{
    header::{MAGIC, META_SIZE},
    PageFile, PageFileConfig, PageFileError, PAGE_SIZE,
};
use tempfile::{tempdir, NamedTempFile};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_new_file_layout() -> Result<(), PageFileError> {
    init_logger();
    let dir = tempdir()?;
    let path = dir.path().join("new.pf");

    let page_file = PageFile::open(&path)?;
    assert_eq!(page_file.page_count(), 1);
    page_file.close()?;

    let bytes = fs::read(&path)?;
    assert_eq!(bytes.len(), PAGE_SIZE);
    assert_eq!(&bytes[0..4], &MAGIC.to_le_bytes());
    assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &0u32.to_le_bytes());
    Ok(())
}

#[test]
fn test_persistence_across_reopen() -> Result<(), PageFileError> {
    init_logger();
    let dir = tempdir()?;
    let path = dir.path().join("data.pf");
    let config = PageFileConfig::default().with_sync_writes(true);

    {
        let mut page_file = PageFile::open_with_config(&path, &config)?;
        for n in 1..=4u8 {
            let (page_number, page) = page_file.allocate()?;
            assert_eq!(page_number, n as u32);
            page.fill(n);
            page_file.write()?;
        }
        page_file.read(2)?;
        page_file.free()?;
        page_file.read(4)?;
        page_file.free()?;

        page_file.set_u8(0, 0xaa)?;
        page_file.set_u16(2, 0xbbcc)?;
        page_file.set_u32(8, 0xdead_beef)?;
        page_file.set_u64(META_SIZE - 8, u64::MAX)?;
        page_file.close()?;
    }

    let mut page_file = PageFile::open_with_config(&path, &config)?;
    assert_eq!(page_file.page_count(), 5);
    assert_eq!(page_file.free_head(), 4);
    assert_eq!(page_file.current_page_number(), None);

    assert_eq!(page_file.get_u8(0)?, 0xaa);
    assert_eq!(page_file.get_u16(2)?, 0xbbcc);
    assert_eq!(page_file.get_u32(8)?, 0xdead_beef);
    assert_eq!(page_file.get_u64(META_SIZE - 8)?, u64::MAX);

    assert!(page_file.read(1)?.iter().all(|&byte| byte == 1));
    assert!(page_file.read(3)?.iter().all(|&byte| byte == 3));

    // freed pages keep everything but the link
    let page = page_file.read(4)?;
    assert_eq!(&page[..4], &2u32.to_le_bytes());
    assert!(page[4..].iter().all(|&byte| byte == 4));

    assert_eq!(page_file.allocate()?.0, 4);
    assert_eq!(page_file.allocate()?.0, 2);
    assert_eq!(page_file.allocate()?.0, 5);
    Ok(())
}

#[test]
fn test_open_rejects_foreign_file() -> Result<(), PageFileError> {
    init_logger();
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(b"not a page file, just some text")?;
    temp_file.flush()?;

    let result = PageFile::open(temp_file.path());
    assert!(matches!(result, Err(PageFileError::WrongFormat { .. })));

    // the file is left untouched
    assert_eq!(fs::read(temp_file.path())?, b"not a page file, just some text");
    Ok(())
}

#[test]
fn test_open_missing_directory() {
    init_logger();
    let dir = tempdir().unwrap();
    let result = PageFile::open(dir.path().join("missing").join("data.pf"));
    assert!(matches!(result, Err(PageFileError::ResourceUnavailable(_))));
}

#[cfg(unix)]
#[test]
fn test_create_mode() -> Result<(), PageFileError> {
    use std::os::unix::fs::PermissionsExt;

    init_logger();
    let dir = tempdir()?;
    let path = dir.path().join("private.pf");
    PageFile::open_with_config(&path, &PageFileConfig::default().with_mode(0o600))?.close()?;

    let mode = fs::metadata(&path)?.permissions().mode();
    assert_eq!(mode & 0o777 & !0o600, 0);
    Ok(())
}

#[test]
fn test_many_pages_round_trip() -> Result<(), PageFileError> {
    init_logger();
    let dir = tempdir()?;
    let path = dir.path().join("many.pf");

    let mut page_file = PageFile::open(&path)?;
    let mut numbers = Vec::new();
    for i in 0..64u32 {
        let (page_number, page) = page_file.allocate()?;
        page[..4].copy_from_slice(&i.to_le_bytes());
        page[PAGE_SIZE - 4..].copy_from_slice(&page_number.to_le_bytes());
        page_file.write()?;
        numbers.push(page_number);
    }
    assert_eq!(numbers, (1..=64).collect::<Vec<_>>());
    page_file.close()?;

    let mut page_file = PageFile::open(&path)?;
    for (i, page_number) in numbers.into_iter().enumerate().rev() {
        let page = page_file.read(page_number)?;
        assert_eq!(&page[..4], &(i as u32).to_le_bytes());
        assert_eq!(&page[PAGE_SIZE - 4..], &page_number.to_le_bytes());
    }
    assert_eq!(fs::metadata(&path)?.len(), 65 * PAGE_SIZE as u64);
    Ok(())
}
