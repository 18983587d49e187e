use std::{collections::HashMap, error::Error, fs, io, path::Path};

use tempfile::tempdir;

use crate::input::locator::{name_from_buffer, DeviceLocator, NameQuery};

/// Name query answering from a table keyed by file name
pub struct TableQuery(pub HashMap<String, String>);

impl TableQuery {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        let table = entries
            .iter()
            .map(|(event, name)| (event.to_string(), name.to_string()))
            .collect();
        Self(table)
    }
}

impl NameQuery for TableQuery {
    fn device_name(&self, path: &Path) -> io::Result<String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.0
            .get(&file_name)
            .cloned()
            .ok_or_else(|| io::Error::from_raw_os_error(nix::libc::ENOTTY))
    }
}

#[test]
fn test_find_case_insensitive() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    for name in ["event0", "event1", "event2", "mice"] {
        fs::write(dir.path().join(name), "")?;
    }
    let query = TableQuery::new(&[
        ("event0", "Power Button"),
        ("event1", "MMA845x"),
        ("event2", "mag3110"),
    ]);
    let locator = DeviceLocator::with_query(dir.path(), query);

    assert_eq!(locator.find("mma845x"), Some("event1".to_string()));
    assert_eq!(locator.find("MAG3110"), Some("event2".to_string()));
    assert_eq!(locator.find("fxos8700"), None);

    Ok(())
}

#[test]
fn test_find_skips_directories() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("by-path"))?;
    let query = TableQuery::new(&[("by-path", "mma845x")]);
    let locator = DeviceLocator::with_query(dir.path(), query);

    assert_eq!(locator.find("mma845x"), None);

    Ok(())
}

#[test]
fn test_find_empty_name() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("event0"), "")?;
    let query = TableQuery::new(&[("event0", "")]);
    let locator = DeviceLocator::with_query(dir.path(), query);

    assert_eq!(locator.find(""), None);

    Ok(())
}

#[test]
fn test_find_missing_directory() {
    let locator = DeviceLocator::new("/nonexistent/input");
    assert_eq!(locator.find("mma845x"), None);
}

#[test]
fn test_evdev_query_rejects_regular_files() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("event0"), "mma845x")?;
    let locator = DeviceLocator::new(dir.path());

    assert_eq!(locator.find("mma845x"), None);
    assert!(locator.scan()?.is_empty());

    Ok(())
}

#[test]
fn test_scan() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    for name in ["event0", "event1", "js0"] {
        fs::write(dir.path().join(name), "")?;
    }
    let query = TableQuery::new(&[("event0", "mma845x"), ("event1", "mag3110")]);
    let locator = DeviceLocator::with_query(dir.path(), query);

    let mut devices = locator.scan()?;
    devices.sort();
    assert_eq!(
        devices,
        vec![
            ("event0".to_string(), "mma845x".to_string()),
            ("event1".to_string(), "mag3110".to_string()),
        ]
    );

    Ok(())
}

#[test]
fn test_name_from_buffer() {
    let mut buffer = [0u8; 64];
    buffer[..7].copy_from_slice(b"mag3110");
    assert_eq!(name_from_buffer(&buffer), "mag3110");

    // Names filling the whole buffer are truncated at its length
    let full = [b'a'; 64];
    assert_eq!(name_from_buffer(&full).len(), 64);
}
