use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::path::Path;

use log::info;
use serde_jsonlines::JsonLinesReader;

use super::{LapRecord, LapTable};
use crate::LapChartError;

/// Loads a lap table exported as JSON lines, one lap record per line.
pub fn load_laps_jsonl(source_file: &Path) -> Result<LapTable, LapChartError> {
    let file = File::open(source_file).map_err(|e| LapChartError::LapFileRead { source: e })?;
    let laps = read_laps_jsonl(BufReader::new(file))?;
    info!(
        "Loaded {:?}, found {} laps from {} drivers",
        source_file,
        laps.len(),
        laps.drivers().len()
    );
    Ok(laps)
}

/// Reads JSON-lines lap records from any buffered reader. Blank lines are
/// skipped, errors report the line number in the input.
pub fn read_laps_jsonl<R: BufRead>(reader: R) -> Result<LapTable, LapChartError> {
    let mut laps = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| lap_error(line_no, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let lap = JsonLinesReader::new(line.as_bytes())
            .read::<LapRecord>()
            .and_then(|lap| lap.ok_or_else(|| io::Error::from(ErrorKind::UnexpectedEof)))
            .map_err(|e| lap_error(line_no, e))?;
        laps.push(lap);
    }
    Ok(LapTable::new(laps))
}

fn lap_error(line: usize, e: io::Error) -> LapChartError {
    match e.kind() {
        // serde errors and bad UTF-8 surface as InvalidData, truncated lines as UnexpectedEof
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
            LapChartError::InvalidLapRecord { line, source: e }
        }
        _ => LapChartError::LapFileRead { source: e },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_laps_jsonl() {
        let mut lap_file = NamedTempFile::new().unwrap();
        writeln!(
            lap_file,
            r#"{{"driver":"VER","team":"Red Bull Racing","lap_number":1,"lap_time_s":97.284,"compound":"MEDIUM","stint":1,"position":1}}"#
        )
        .unwrap();
        writeln!(
            lap_file,
            r#"{{"driver":"VER","team":"Red Bull Racing","lap_number":2,"lap_time_s":96.912,"compound":"MEDIUM","stint":1,"position":1}}"#
        )
        .unwrap();
        writeln!(
            lap_file,
            r#"{{"driver":"HAM","team":"Mercedes","lap_number":1,"lap_time_s":98.01,"compound":"HARD","stint":1,"position":7}}"#
        )
        .unwrap();
        lap_file.flush().unwrap();

        let laps = load_laps_jsonl(lap_file.path()).unwrap();
        assert_eq!(laps.len(), 3);
        assert_eq!(laps.drivers(), vec!["VER", "HAM"]);
    }

    #[test]
    fn test_invalid_record_reports_line_number() {
        let mut lap_file = NamedTempFile::new().unwrap();
        writeln!(lap_file, r#"{{"driver":"VER","lap_number":1}}"#).unwrap();
        writeln!(lap_file, r#"{{"team":"Mercedes","lap_number":2}}"#).unwrap();
        lap_file.flush().unwrap();

        match load_laps_jsonl(lap_file.path()) {
            Err(LapChartError::InvalidLapRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected InvalidLapRecord error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_laps_jsonl(&dir.path().join("no_such_session.jsonl"));
        assert!(matches!(result, Err(LapChartError::LapFileRead { .. })));
    }

    #[test]
    fn test_read_laps_from_memory() {
        let input = concat!(
            r#"{"Driver":"LEC","LapNumber":1.0,"LapTime (s)":95.5,"Compound":"SOFT"}"#,
            "\n",
            r#"{"Driver":"LEC","LapNumber":2.0,"LapTime (s)":94.75,"Compound":"SOFT"}"#,
            "\n"
        );
        let laps = read_laps_jsonl(input.as_bytes()).unwrap();
        assert_eq!(laps.len(), 2);
        assert_eq!(laps.records()[1].lap_time_s(), Some(94.75));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = concat!(
            r#"{"driver":"A","lap_number":1}"#,
            "\n",
            "\n",
            "   \n",
            r#"{"driver":"A","lap_number":2}"#,
            "\n",
            "\n"
        );
        let laps = read_laps_jsonl(input.as_bytes()).unwrap();
        assert_eq!(laps.len(), 2);
        assert_eq!(laps.records()[1].lap_number, 2);
    }

    #[test]
    fn test_line_numbers_count_blank_lines() {
        let input = concat!(
            r#"{"driver":"A","lap_number":1}"#,
            "\n",
            "\n",
            r#"{"driver":"A","lap_number":"#,
            "\n"
        );
        match read_laps_jsonl(input.as_bytes()) {
            Err(LapChartError::InvalidLapRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("Expected InvalidLapRecord error, got {:?}", other),
        }
    }
}
