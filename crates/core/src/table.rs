//! In-memory CSV table

use crate::error::{CoreError, Result};

/// A header plus rows of optional cells. Empty CSV fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Empty table with the given header
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Parse CSV bytes. The first record is the header.
    ///
    /// Records shorter than the header are padded with empty cells; longer
    /// ones are rejected.
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
            return Err(CoreError::InvalidCsv("No columns to parse from file".to_string()));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > columns.len() {
                let line = record.position().map_or(0, |p| p.line());
                return Err(CoreError::InvalidCsv(format!(
                    "Expected {} fields in line {}, saw {}",
                    columns.len(),
                    line,
                    record.len()
                )));
            }
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                .collect();
            row.resize(columns.len(), None);
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Serialize with a header row; `None` cells are written empty
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CoreError::Serialize(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CoreError::Serialize(e.to_string()))
    }

    /// Index of a column by name
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell at `row`, `column`
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = Table::from_csv(b"disease,age,link\nFlu,30,\nCold,,http://x\n").unwrap();
        assert_eq!(table.columns, vec!["disease", "age", "link"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, "age"), Some("30"));
        assert_eq!(table.cell(0, "link"), None);
        assert_eq!(table.cell(1, "age"), None);
        assert_eq!(table.cell(1, "link"), Some("http://x"));
    }

    #[test]
    fn header_only_is_zero_rows() {
        let table = Table::from_csv(b"disease,age\n").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        assert!(matches!(Table::from_csv(b""), Err(CoreError::InvalidCsv(_))));
        assert!(matches!(
            Table::from_csv(b"a,b\n1,2,3\n"),
            Err(CoreError::InvalidCsv(_))
        ));
        assert!(matches!(
            Table::from_csv(b"a,b\n\xff\xfe,1\n"),
            Err(CoreError::InvalidCsv(_))
        ));
    }

    #[test]
    fn short_records_are_padded() {
        let table = Table::from_csv(b"disease,age,link\nFlu\nCold,12\n").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec![Some("Flu".to_string()), None, None]);
        assert_eq!(table.cell(1, "age"), Some("12"));
        assert_eq!(table.cell(1, "link"), None);
    }

    #[test]
    fn serializes_with_quoting() {
        let mut table = Table::with_columns(["disease", "pre_existing_conditions"]);
        table.rows.push(vec![
            Some("Flu".to_string()),
            Some("Asthma, Obesity".to_string()),
        ]);
        table.rows.push(vec![None, Some("None".to_string())]);
        let csv = table.to_csv().unwrap();
        assert_eq!(
            csv,
            "disease,pre_existing_conditions\nFlu,\"Asthma, Obesity\"\n,None\n"
        );
        assert_eq!(Table::from_csv(csv.as_bytes()).unwrap(), table);
    }
}
