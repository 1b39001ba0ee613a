//! Workbook and delimited-text decoding.

use calamine::{Data, Reader, open_workbook_auto};
use docsift_core::format::FormatTag;
use docsift_core::{ExtractorError, FormatExtractor, RawText, StagedInput};

/// Flattens `.xlsx`/`.xls` workbooks into lines of tab-separated cells.
///
/// Every sheet contributes its name followed by its populated rows;
/// sheets are separated by a blank line. The auto opener serves both
/// container formats from one code path.
pub struct SpreadsheetExtractor;

impl FormatExtractor for SpreadsheetExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::Spreadsheet
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let mut workbook = open_workbook_auto(input.path())
            .map_err(|err| ExtractorError::Malformed(format!("unreadable workbook: {err}")))?;

        let mut out = String::new();
        for sheet in workbook.sheet_names().to_owned() {
            let range = workbook.worksheet_range(&sheet).map_err(|err| {
                ExtractorError::Malformed(format!("unreadable sheet `{sheet}`: {err}"))
            })?;
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&sheet);
            out.push('\n');
            for row in range.rows() {
                let cells: Vec<String> = row
                    .iter()
                    .filter(|cell| !matches!(cell, Data::Empty))
                    .map(|cell| cell.to_string())
                    .collect();
                if !cells.is_empty() {
                    out.push_str(&cells.join("\t"));
                    out.push('\n');
                }
            }
        }
        Ok(RawText::Text(out))
    }
}

/// Decodes `.csv` with a flexible reader: no header handling, ragged
/// rows allowed, quoted fields unwrapped. Cells are re-joined with tabs
/// to match the workbook output shape.
pub struct DelimitedTextExtractor;

impl FormatExtractor for DelimitedTextExtractor {
    fn format(&self) -> FormatTag {
        FormatTag::DelimitedText
    }

    fn extract(&self, input: &StagedInput) -> Result<RawText, ExtractorError> {
        let bytes = input.read()?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut out = String::new();
        for record in reader.records() {
            let record = record
                .map_err(|err| ExtractorError::Malformed(format!("invalid CSV: {err}")))?;
            out.push_str(&record.iter().collect::<Vec<_>>().join("\t"));
            out.push('\n');
        }
        Ok(RawText::Text(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::staged;

    fn extract_csv(bytes: &[u8]) -> String {
        let (_guard, input) = staged(bytes, ".csv");
        match DelimitedTextExtractor.extract(&input).unwrap() {
            RawText::Text(text) => text,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn csv_rows_become_tab_separated_lines() {
        let text = extract_csv(b"name,age\nAda,36\nGrace,38\n");
        assert_eq!(text, "name\tage\nAda\t36\nGrace\t38\n");
    }

    #[test]
    fn csv_quoted_fields_are_unwrapped() {
        let text = extract_csv(b"a,\"b, c\",d\n");
        assert_eq!(text, "a\tb, c\td\n");
    }

    #[test]
    fn csv_ragged_rows_are_accepted() {
        let text = extract_csv(b"one\ntwo,three\n");
        assert_eq!(text, "one\ntwo\tthree\n");
    }

    #[test]
    fn workbook_decoder_rejects_non_spreadsheet_bytes() {
        let (_guard, input) = staged(b"not a workbook of any kind", ".xlsx");
        let err = SpreadsheetExtractor.extract(&input).unwrap_err();
        assert!(matches!(err, ExtractorError::Malformed(_)));
    }
}
