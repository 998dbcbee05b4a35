//! JSON and CSV writers for scraped heritage records.
//!
//! Both writers serialize fully in memory, then write through a temp file
//! and rename so a failed run never leaves a half-written output behind.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use heritage_shared::{HeritageError, HeritageSite, Result};

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 5] = [
    "Tên di tích",
    "Địa điểm",
    "Loại di tích",
    "Đường dẫn hình ảnh",
    "Mô tả",
];

/// One CSV line. Coordinates, events and the architecture/festival texts
/// are not part of the tabular view.
#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    location: &'a str,
    types: &'a str,
    image_url: &'a str,
    description: &'a str,
}

impl<'a> From<&'a HeritageSite> for CsvRow<'a> {
    fn from(site: &'a HeritageSite) -> Self {
        Self {
            name: &site.name,
            location: &site.location,
            types: &site.types,
            image_url: site.image_url.as_deref().unwrap_or_default(),
            description: &site.description,
        }
    }
}

/// Write `sites` as a pretty-printed JSON array (2-space indent).
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_json<'a>(
    path: &Path,
    sites: impl IntoIterator<Item = &'a HeritageSite>,
) -> Result<usize> {
    let sites: Vec<&HeritageSite> = sites.into_iter().collect();
    let json = serde_json::to_string_pretty(&sites)
        .map_err(|e| HeritageError::Export(format!("JSON serialization failed: {e}")))?;

    write_atomic(path, json.as_bytes())?;
    info!(records = sites.len(), "wrote JSON");
    Ok(sites.len())
}

/// Write `sites` as UTF-8 CSV (no BOM) under [`CSV_HEADER`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn write_csv<'a>(
    path: &Path,
    sites: impl IntoIterator<Item = &'a HeritageSite>,
) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    let mut records = 0;
    for site in sites {
        writer.serialize(CsvRow::from(site)).map_err(csv_error)?;
        records += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| HeritageError::Export(format!("CSV flush failed: {e}")))?;

    write_atomic(path, &bytes)?;
    info!(records, "wrote CSV");
    Ok(records)
}

fn csv_error(e: csv::Error) -> HeritageError {
    HeritageError::Export(format!("CSV serialization failed: {e}"))
}

/// Write `content` to `path`, creating the parent directory if needed.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HeritageError::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| HeritageError::Export(format!("not a file path: {}", path.display())))?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    let temp = path.with_file_name(temp_name);

    std::fs::write(&temp, content).map_err(|e| HeritageError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| HeritageError::io(path, e))?;

    debug!(bytes = content.len(), "file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use heritage_shared::{Coordinates, HistoryEvent};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("heritage-export-test-{}", uuid::Uuid::now_v7()))
    }

    fn sites() -> Vec<HeritageSite> {
        vec![
            HeritageSite {
                name: "Văn Miếu – Quốc Tử Giám".into(),
                location: "Đống Đa, Hà Nội".into(),
                coordinates: Some(Coordinates {
                    latitude: "21.0289°B".into(),
                    longitude: "105.8358°Đ".into(),
                }),
                types: "Di tích lịch sử".into(),
                image_url: Some("https://upload.wikimedia.org/vm.jpg".into()),
                description: "Trường đại học đầu tiên, \"Quốc Tử Giám\".".into(),
                events: vec![HistoryEvent {
                    title: "Thời Lý".into(),
                    description: "Xây năm 1070.".into(),
                }],
                ..Default::default()
            },
            HeritageSite {
                name: "Vịnh Hạ Long".into(),
                location: "Quảng Ninh".into(),
                types: "Danh lam thắng cảnh".into(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn json_round_trips_and_creates_directory() {
        let dir = temp_dir();
        let path = dir.join("nested").join("sites.json");
        let sites = sites();

        let written = write_json(&path, &sites).unwrap();
        assert_eq!(written, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {"), "expected 2-space indent: {text}");
        assert!(text.contains("Văn Miếu"), "non-ASCII kept verbatim");

        let back: Vec<HeritageSite> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, sites);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_accepts_borrowed_subset() {
        let dir = temp_dir();
        let path = dir.join("subset.json");
        let sites = sites();
        let subset: Vec<&HeritageSite> = sites.iter().filter(|s| s.coordinates.is_some()).collect();

        write_json(&path, subset.iter().copied()).unwrap();
        let back: Vec<HeritageSite> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].name, "Văn Miếu – Quốc Tử Giám");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_set_writes_empty_array() {
        let dir = temp_dir();
        let path = dir.join("empty.json");
        let none: Vec<HeritageSite> = Vec::new();
        write_json(&path, &none).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn csv_has_header_and_five_columns() {
        let dir = temp_dir();
        let path = dir.join("sites.csv");
        let written = write_csv(&path, &sites()).unwrap();
        assert_eq!(written, 2);

        let bytes = std::fs::read(&path).unwrap();
        assert!(!bytes.starts_with(&[0xEF, 0xBB, 0xBF]), "no BOM");

        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Tên di tích,Địa điểm,Loại di tích,Đường dẫn hình ảnh,Mô tả")
        );
        assert_eq!(
            lines.next(),
            Some(
                "Văn Miếu – Quốc Tử Giám,\"Đống Đa, Hà Nội\",Di tích lịch sử,\
                 https://upload.wikimedia.org/vm.jpg,\"Trường đại học đầu tiên, \"\"Quốc Tử Giám\"\".\""
            )
        );
        assert_eq!(lines.next(), Some("Vịnh Hạ Long,Quảng Ninh,Danh lam thắng cảnh,,"));
        assert_eq!(lines.next(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn csv_reads_back_with_csv_reader() {
        let dir = temp_dir();
        let path = dir.join("sites.csv");
        write_csv(&path, &sites()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_HEADER);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Đống Đa, Hà Nội");
        assert_eq!(&rows[1][3], "");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rewrites_existing_file() {
        let dir = temp_dir();
        let path = dir.join("sites.json");
        let sites = sites();

        write_json(&path, &sites).unwrap();
        write_json(&path, &sites[1..]).unwrap();

        let back: Vec<HeritageSite> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert!(!dir.join(".sites.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
