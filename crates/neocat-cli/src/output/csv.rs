//! CSV dataset sink, one row per normalized record.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use neocat_core::{NeoRecord, RecordSink, SinkError};

const HEADER: &str = "id,name,absolute_magnitude,diameter_min_km,diameter_max_km,\
diameter_avg_km,is_hazardous,orbit_id,semi_major_axis,eccentricity";

/// Writes the header eagerly so an empty catalog still produces a valid file.
pub struct CsvSink<W: Write> {
    writer: W,
    rows: u64,
}

impl CsvSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)
            .map_err(|err| SinkError::new(format!("cannot create {}: {err}", path.display())))?;
        Self::from_writer(BufWriter::new(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(mut writer: W) -> Result<Self, SinkError> {
        writeln!(writer, "{HEADER}").map_err(io_error)?;
        Ok(Self { writer, rows: 0 })
    }

    /// Flushes and returns the number of data rows written.
    pub fn finish(mut self) -> Result<u64, SinkError> {
        self.writer.flush().map_err(io_error)?;
        Ok(self.rows)
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append(&mut self, record: NeoRecord) -> Result<(), SinkError> {
        writeln!(
            self.writer,
            "{},{},{},{},{},{},{},{},{},{}",
            quote(&record.id),
            quote(&record.name),
            number(record.absolute_magnitude),
            number(record.diameter_min_km),
            number(record.diameter_max_km),
            number(record.diameter_avg_km),
            record.is_hazardous,
            record.orbit_id.as_deref().map_or_else(String::new, quote),
            number(record.semi_major_axis),
            number(record.eccentricity),
        )
        .map_err(io_error)?;
        self.rows += 1;
        Ok(())
    }
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

fn io_error(err: std::io::Error) -> SinkError {
    SinkError::new(format!("write failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NeoRecord {
        NeoRecord {
            id: String::from("2021277"),
            name: String::from("21277 (1996 TO5)"),
            absolute_magnitude: Some(16.1),
            diameter_min_km: Some(1.5),
            diameter_max_km: Some(3.5),
            diameter_avg_km: Some(2.5),
            is_hazardous: false,
            orbit_id: Some(String::from("611")),
            semi_major_axis: Some(2.25),
            eccentricity: Some(0.5),
        }
    }

    fn rendered(records: Vec<NeoRecord>) -> String {
        let mut sink = CsvSink::from_writer(Vec::new()).expect("header");
        for record in records {
            sink.append(record).expect("append");
        }
        String::from_utf8(sink.writer).expect("utf-8")
    }

    #[test]
    fn writes_header_then_one_row_per_record() {
        let out = rendered(vec![sample()]);
        let mut lines = out.lines();

        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(
            lines.next(),
            Some("2021277,21277 (1996 TO5),16.1,1.5,3.5,2.5,false,611,2.25,0.5")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn absent_optionals_render_as_empty_cells() {
        let record = NeoRecord {
            absolute_magnitude: None,
            diameter_min_km: None,
            diameter_max_km: None,
            diameter_avg_km: None,
            orbit_id: None,
            semi_major_axis: None,
            eccentricity: None,
            ..sample()
        };

        let out = rendered(vec![record]);
        assert!(out.ends_with("2021277,21277 (1996 TO5),,,,,false,,,\n"));
    }

    #[test]
    fn fields_containing_the_delimiter_are_quoted() {
        let record = NeoRecord {
            name: String::from("365756 (2011 UK10, \"ISON twin\")"),
            ..sample()
        };

        let out = rendered(vec![record]);
        assert!(out.contains("\"365756 (2011 UK10, \"\"ISON twin\"\")\""));
    }

    #[test]
    fn create_writes_a_readable_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.csv");

        let mut sink = CsvSink::create(&path).expect("create");
        sink.append(sample()).expect("append");
        assert_eq!(sink.finish().expect("flush"), 1);

        let contents = std::fs::read_to_string(&path).expect("readable");
        assert!(contents.starts_with("id,name,"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn finish_reports_the_row_count() {
        let mut sink = CsvSink::from_writer(Vec::new()).expect("header");
        sink.append(sample()).expect("append");
        sink.append(sample()).expect("append");

        assert_eq!(sink.finish().expect("flush"), 2);
    }
}
