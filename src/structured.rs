//! JSON and CSV files.
//!
//! JSON goes through `serde_json`; writes are pretty-printed and end with a
//! newline. CSV rows are string maps keyed by the header row, in the
//! dict-reader/dict-writer tradition: reading zips cells with headers,
//! writing takes an explicit ordered field list, fills missing cells with
//! the empty string and refuses rows carrying unknown keys.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::dir::ensure_parent_dir;
use crate::error::{FsError, Result};

/// Formatting knobs for [`write_json`].
#[derive(Debug, Clone, Copy)]
pub struct JsonOptions {
    /// Spaces per indentation level. 0 keeps the line breaks but no
    /// indentation.
    pub indent: usize,
    /// Serialize object keys in sorted order.
    pub sort_keys: bool,
    /// Create missing parent directories before writing.
    pub parents: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            indent: 2,
            sort_keys: true,
            parents: true,
        }
    }
}

/// Parse a JSON file into a dynamic [`Value`].
pub fn read_json(path: impl AsRef<Path>) -> Result<Value> {
    read_json_as(path)
}

/// Parse a JSON file directly into a deserializable type.
pub fn read_json_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let p = path.as_ref();
    let bytes = fs::read(p).map_err(|e| FsError::io(p, e))?;
    serde_json::from_slice(&bytes).map_err(|e| FsError::Json {
        path: p.to_path_buf(),
        source: e,
    })
}

/// Serialize `value` to a JSON file, pretty-printed, with a trailing
/// newline.
///
/// With `sort_keys` the value is routed through [`Value`] first, whose map
/// keeps keys ordered; otherwise the type's own field order stands.
pub fn write_json<T: Serialize>(
    path: impl AsRef<Path>,
    value: &T,
    options: &JsonOptions,
) -> Result<()> {
    let p = path.as_ref();
    if options.parents {
        ensure_parent_dir(p)?;
    }
    let json_err = |e| FsError::Json {
        path: p.to_path_buf(),
        source: e,
    };
    let indent = " ".repeat(options.indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if options.sort_keys {
        let sorted = serde_json::to_value(value).map_err(json_err)?;
        sorted.serialize(&mut ser).map_err(json_err)?;
    } else {
        value.serialize(&mut ser).map_err(json_err)?;
    }
    buf.push(b'\n');
    fs::write(p, buf).map_err(|e| FsError::io(p, e))
}

/// Parsing and formatting knobs for the CSV helpers.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Create missing parent directories before writing.
    pub parents: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            parents: true,
        }
    }
}

/// Read a CSV file with a header row into one string map per record.
///
/// Cells beyond the header row's width are dropped; short records simply
/// produce maps with fewer keys.
pub fn read_csv(
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> Result<Vec<HashMap<String, String>>> {
    let p = path.as_ref();
    let csv_err = |e| FsError::Csv {
        path: p.to_path_buf(),
        source: e,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Ragged records are data, not errors; the header zip below drops
        // extra cells and leaves short rows short.
        .flexible(true)
        .from_path(p)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let mut row = HashMap::with_capacity(headers.len());
        for (name, value) in headers.iter().zip(record.iter()) {
            row.insert(name.to_string(), value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Write string-map rows as CSV under an explicit, ordered field list.
///
/// The header row always comes first. A row missing a field writes an
/// empty cell; a row with a key outside `field_names` is a hard error
/// ([`FsError::CsvField`]) so typos do not silently drop data.
pub fn write_csv(
    path: impl AsRef<Path>,
    rows: &[HashMap<String, String>],
    field_names: &[&str],
    options: &CsvOptions,
) -> Result<()> {
    let p = path.as_ref();
    if options.parents {
        ensure_parent_dir(p)?;
    }
    let csv_err = |e| FsError::Csv {
        path: p.to_path_buf(),
        source: e,
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_path(p)
        .map_err(csv_err)?;
    writer.write_record(field_names).map_err(csv_err)?;
    for row in rows {
        for key in row.keys() {
            if !field_names.contains(&key.as_str()) {
                return Err(FsError::CsvField {
                    path: p.to_path_buf(),
                    field: key.clone(),
                });
            }
        }
        let record = field_names
            .iter()
            .map(|name| row.get(*name).map(String::as_str).unwrap_or(""));
        writer.write_record(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| FsError::io(p, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tempfile::tempdir;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        zebra: u32,
        apple: u32,
    }

    #[test]
    fn json_sorts_keys_and_ends_with_newline() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("out/sample.json");
        write_json(&p, &Sample { zebra: 1, apple: 2 }, &JsonOptions::default()).unwrap();

        let text = fs::read_to_string(&p).unwrap();
        assert!(text.ends_with('\n'));
        assert!(text.contains("  \"apple\": 2"));
        let apple = text.find("apple").unwrap();
        let zebra = text.find("zebra").unwrap();
        assert!(apple < zebra, "keys should be sorted");
    }

    #[test]
    fn json_unsorted_keeps_field_order() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("sample.json");
        let options = JsonOptions {
            sort_keys: false,
            ..JsonOptions::default()
        };
        write_json(&p, &Sample { zebra: 1, apple: 2 }, &options).unwrap();

        let text = fs::read_to_string(&p).unwrap();
        assert!(text.find("zebra").unwrap() < text.find("apple").unwrap());
    }

    #[test]
    fn json_round_trip_typed_and_dynamic() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("sample.json");
        let sample = Sample { zebra: 9, apple: 3 };
        write_json(&p, &sample, &JsonOptions::default()).unwrap();

        assert_eq!(read_json_as::<Sample>(&p).unwrap(), sample);
        assert_eq!(read_json(&p).unwrap(), json!({"apple": 3, "zebra": 9}));
    }

    #[test]
    fn malformed_json_is_a_hard_error() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("broken.json");
        fs::write(&p, b"{not json").unwrap();
        assert!(matches!(read_json(&p).unwrap_err(), FsError::Json { .. }));
    }

    #[test]
    fn csv_round_trip_with_missing_fields() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("table.csv");
        let rows = vec![
            row(&[("name", "ada"), ("note", "first")]),
            row(&[("name", "brian")]),
        ];
        write_csv(&p, &rows, &["name", "note"], &CsvOptions::default()).unwrap();

        let got = read_csv(&p, &CsvOptions::default()).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0]["name"], "ada");
        assert_eq!(got[0]["note"], "first");
        // The missing field came back as an empty cell.
        assert_eq!(got[1]["note"], "");
    }

    #[test]
    fn csv_tolerates_ragged_records() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("ragged.csv");
        fs::write(&p, "name,size\nalpha,10,stray\nbeta\n").unwrap();

        let got = read_csv(&p, &CsvOptions::default()).unwrap();
        assert_eq!(got.len(), 2);
        // The cell beyond the header width is dropped.
        assert_eq!(got[0]["size"], "10");
        assert_eq!(got[0].len(), 2);
        // The short record keeps only the keys it has cells for.
        assert_eq!(got[1]["name"], "beta");
        assert_eq!(got[1].get("size"), None);
    }

    #[test]
    fn csv_quotes_cells_containing_the_delimiter() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("quoted.csv");
        let rows = vec![row(&[("text", "a, with comma")])];
        write_csv(&p, &rows, &["text"], &CsvOptions::default()).unwrap();

        let got = read_csv(&p, &CsvOptions::default()).unwrap();
        assert_eq!(got[0]["text"], "a, with comma");
    }

    #[test]
    fn csv_rejects_unknown_row_keys() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("table.csv");
        let rows = vec![row(&[("name", "ada"), ("typo", "oops")])];
        let err = write_csv(&p, &rows, &["name"], &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, FsError::CsvField { field, .. } if field == "typo"));
    }

    #[test]
    fn csv_custom_delimiter() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("semi.csv");
        let options = CsvOptions {
            delimiter: b';',
            ..CsvOptions::default()
        };
        write_csv(&p, &[row(&[("a", "1"), ("b", "2")])], &["a", "b"], &options).unwrap();

        let text = fs::read_to_string(&p).unwrap();
        assert!(text.starts_with("a;b"));
        assert_eq!(read_csv(&p, &options).unwrap()[0]["b"], "2");
    }
}
