//! Delimited-text table parsing and serialization
//!
//! A deliberately small tabular model for batch uploads: a header row naming
//! columns and string cells underneath. Cells are plain fields split on the
//! delimiter; quoting and escaping are not supported.

use crate::error::PipelineError;

/// An in-memory table: named columns over rows of string cells
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from headers and rows
    ///
    /// # Errors
    ///
    /// [`PipelineError::MalformedInputFile`] when any row's width differs
    /// from the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, PipelineError> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(PipelineError::MalformedInputFile(format!(
                    "row {} has {} cells, expected {}",
                    idx + 1,
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Parse delimited text into a table
    ///
    /// The first non-empty line is the header; trailing blank lines are
    /// ignored. Ragged rows make the whole input malformed.
    ///
    /// # Arguments
    ///
    /// * `text` - Raw file content
    /// * `delimiter` - Field separator (typically `,`)
    pub fn parse_delimited(text: &str, delimiter: char) -> Result<Self, PipelineError> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let header_line = lines.next().ok_or_else(|| {
            PipelineError::MalformedInputFile("input contains no header row".to_string())
        })?;
        let headers: Vec<String> = header_line
            .split(delimiter)
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, line) in lines.enumerate() {
            let cells: Vec<String> = line.split(delimiter).map(|c| c.trim().to_string()).collect();
            if cells.len() != headers.len() {
                return Err(PipelineError::MalformedInputFile(format!(
                    "row {} has {} cells, expected {} (header: {})",
                    idx + 1,
                    cells.len(),
                    headers.len(),
                    headers.join(", ")
                )));
            }
            rows.push(cells);
        }

        log::debug!(
            "Parsed table: {} columns, {} rows",
            headers.len(),
            rows.len()
        );
        Ok(Self { headers, rows })
    }

    /// Column names, in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one row
    pub fn row(&self, idx: usize) -> &[String] {
        &self.rows[idx]
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Serialize to delimited text (header row first, `\n` line endings)
    pub fn to_delimited(&self, delimiter: char) -> String {
        let delim = delimiter.to_string();
        let mut out = self.headers.join(&delim);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join(&delim));
            out.push('\n');
        }
        out
    }
}
