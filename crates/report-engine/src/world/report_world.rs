//! Single-file Typst world
//!
//! The report template is the only source. Everything else the template
//! needs arrives through `sys.inputs`, so no file access is ever granted.

use chrono::{Datelike, Local, Timelike};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Array, Bytes, Datetime, Dict, Value};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use super::fonts::{global_font_cache, FontCache};
use crate::error::ReportError;

const MAIN_PATH: &str = "/main.typ";

pub struct ReportWorld {
    main: Source,
    font_cache: &'static FontCache,
    inputs: Dict,
    library: LazyHash<Library>,
    time: chrono::DateTime<Local>,
}

impl ReportWorld {
    /// Create a world around `source` with the given `sys.inputs`
    pub fn new(
        source: impl Into<String>,
        inputs: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, ReportError> {
        let id = FileId::new(None, VirtualPath::new(MAIN_PATH));
        let main = Source::new(id, source.into());

        let mut dict = Dict::new();
        for (key, value) in &inputs {
            dict.insert(key.as_str().into(), json_to_value(value)?);
        }
        let library = Library::builder().with_inputs(dict.clone()).build();

        Ok(Self {
            main,
            font_cache: global_font_cache(),
            inputs: dict,
            library: LazyHash::new(library),
            time: Local::now(),
        })
    }

    pub fn inputs(&self) -> &Dict {
        &self.inputs
    }

    fn not_found(id: FileId) -> FileError {
        FileError::NotFound(id.vpath().as_rootless_path().into())
    }
}

/// Convert a JSON value into the equivalent Typst value
fn json_to_value(json: &serde_json::Value) -> Result<Value, ReportError> {
    match json {
        serde_json::Value::Null => Ok(Value::None),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(ReportError::Internal(format!("Invalid number: {}", n)))
            }
        }
        serde_json::Value::String(s) => Ok(Value::Str(s.as_str().into())),
        serde_json::Value::Array(items) => {
            let values = items
                .iter()
                .map(json_to_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(Array::from(values.as_slice())))
        }
        serde_json::Value::Object(map) => {
            let mut dict = Dict::new();
            for (k, v) in map {
                dict.insert(k.as_str().into(), json_to_value(v)?);
            }
            Ok(Value::Dict(dict))
        }
    }
}

impl World for ReportWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.font_cache.book()
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(Self::not_found(id))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        if id == self.main.id() {
            Ok(Bytes::from(self.main.text().as_bytes().to_vec()))
        } else {
            Err(Self::not_found(id))
        }
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.font_cache.font(index)
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let now = match offset {
            Some(hours) => self.time.naive_utc() + chrono::Duration::hours(hours),
            None => self.time.naive_local(),
        };

        Datetime::from_ymd_hms(
            now.year(),
            now.month() as u8,
            now.day() as u8,
            now.hour() as u8,
            now.minute() as u8,
            now.second() as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("inputs must be an object"),
        }
    }

    #[test]
    fn test_main_source_is_served() {
        let world = ReportWorld::new("Hello", serde_json::Map::new()).unwrap();
        let source = world.source(world.main()).unwrap();
        assert_eq!(source.text(), "Hello");
    }

    #[test]
    fn test_other_files_are_not_found() {
        let world = ReportWorld::new("Hello", serde_json::Map::new()).unwrap();
        let other = FileId::new(None, VirtualPath::new("/etc/passwd"));
        assert!(world.source(other).is_err());
        assert!(world.file(other).is_err());
    }

    #[test]
    fn test_nested_inputs_are_converted() {
        let world = ReportWorld::new(
            "test",
            inputs(json!({
                "analysis": { "risk_score": 40, "parties": ["A", "B"], "ratio": 0.5 },
                "filename": "lease.pdf",
                "missing": null
            })),
        )
        .unwrap();

        assert!(world.inputs().contains("analysis"));
        assert!(world.inputs().contains("filename"));
        assert!(world.inputs().contains("missing"));
    }

    #[test]
    fn test_today() {
        let world = ReportWorld::new("test", serde_json::Map::new()).unwrap();
        assert!(world.today(None).is_some());
        assert!(world.today(Some(5)).is_some());
    }
}
