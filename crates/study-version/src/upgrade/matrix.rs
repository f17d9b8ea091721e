//! Tab-separated numeric matrices
//!
//! Time series and link parameters are stored as plain text grids, one row
//! per line, cells separated by tabs. Values are written with six decimals.

use crate::error::{UpgradeError, UpgradeResult};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader};
use std::path::Path;

/// In-memory matrix, row-major
pub type Matrix = Vec<Vec<f64>>;

/// Rows of an hourly time series
pub const HOURS_PER_YEAR: usize = 8760;

/// Rows of a daily time series
pub const DAYS_PER_YEAR: usize = 365;

/// Matrix of `rows` × `cols` cells all equal to `value`
#[must_use]
pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
    vec![vec![value; cols]; rows]
}

/// Matrix repeating `row` `count` times
#[must_use]
pub fn tiled(row: &[f64], count: usize) -> Matrix {
    vec![row.to_vec(); count]
}

/// Columns `range` of every row
#[must_use]
pub fn columns(matrix: &[Vec<f64>], range: std::ops::Range<usize>) -> Matrix {
    matrix
        .iter()
        .map(|row| {
            let end = range.end.min(row.len());
            let start = range.start.min(end);
            row[start..end].to_vec()
        })
        .collect()
}

fn tab_reader<R: io::Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn tab_writer<W: io::Write>(output: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(output)
}

/// Rows as `%.6f` cells separated by tabs
fn write_rows<W: io::Write>(output: W, matrix: &[Vec<f64>]) -> csv::Result<()> {
    let mut writer = tab_writer(output);
    for row in matrix {
        writer.write_record(row.iter().map(|x| format!("{x:.6}")))?;
    }
    writer.flush()?;
    Ok(())
}

fn matrix_error(path: &Path, err: csv::Error) -> UpgradeError {
    let line = err.position().map_or(0, csv::Position::line);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => UpgradeError::io_error(path, source),
        _ => UpgradeError::InvalidMatrix {
            path: path.to_path_buf(),
            line,
        },
    }
}

/// Write a matrix to `path`, six decimals per cell
///
/// # Errors
/// Returns [`UpgradeError::Io`] if the file cannot be written.
pub fn write(path: &Path, matrix: &[Vec<f64>]) -> UpgradeResult<()> {
    let file = File::create(path).map_err(|e| UpgradeError::io_error(path, e))?;
    write_rows(file, matrix).map_err(|e| matrix_error(path, e))?;
    tracing::debug!(
        "wrote {}x{} matrix to {}",
        matrix.len(),
        matrix.first().map_or(0, Vec::len),
        path.display()
    );
    Ok(())
}

/// Read a matrix; blank lines and empty cells are skipped
///
/// # Errors
/// Returns [`UpgradeError::InvalidMatrix`] on a non-numeric cell.
pub fn read(path: &Path) -> UpgradeResult<Matrix> {
    let file = File::open(path).map_err(|e| UpgradeError::io_error(path, e))?;
    parse(BufReader::new(file), path)
}

fn parse<R: io::Read>(input: R, path: &Path) -> UpgradeResult<Matrix> {
    let mut matrix = Matrix::new();
    for record in tab_reader(input).records() {
        let record = record.map_err(|e| matrix_error(path, e))?;
        let row = record
            .iter()
            .filter(|cell| !cell.is_empty())
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| UpgradeError::InvalidMatrix {
                path: path.to_path_buf(),
                line: record.position().map_or(0, csv::Position::line),
            })?;
        if !row.is_empty() {
            matrix.push(row);
        }
    }
    Ok(matrix)
}

/// Create `path` empty if absent, leaving an existing file untouched
///
/// # Errors
/// Returns [`UpgradeError::Io`] if the file cannot be created.
pub fn touch(path: &Path) -> UpgradeResult<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| UpgradeError::io_error(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(matrix: &[Vec<f64>]) -> String {
        let mut out = Vec::new();
        write_rows(&mut out, matrix).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn parse_text(text: &str) -> UpgradeResult<Matrix> {
        parse(text.as_bytes(), Path::new("series.txt"))
    }

    #[test]
    fn render_six_decimals() {
        assert_eq!(
            render(&[vec![1.0, 0.5], vec![-2.0, 0.0]]),
            "1.000000\t0.500000\n-2.000000\t0.000000\n"
        );
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn parse_skips_blank_lines_and_trailing_tabs() {
        let m = parse_text("1\t2\t3\n\n4\t5\t6\t\n").unwrap();
        assert_eq!(m, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert!(parse_text("").unwrap().is_empty());
    }

    #[test]
    fn parse_reports_bad_line() {
        let err = parse_text("1\t2\nx\t3\n").unwrap_err();
        assert!(matches!(err, UpgradeError::InvalidMatrix { line: 2, .. }));
    }

    #[test]
    fn column_slices() {
        let m = vec![vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]];
        assert_eq!(columns(&m, 2..8), vec![vec![2.0, 3.0], vec![6.0, 7.0]]);
        assert_eq!(columns(&m, 0..1), vec![vec![0.0], vec![4.0]]);
        assert_eq!(columns(&m, 5..6), vec![Vec::<f64>::new(), Vec::new()]);
    }

    #[test]
    fn touch_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cost.txt");
        touch(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        write(&path, &filled(2, 1, 1.0)).unwrap();
        touch(&path).unwrap();
        assert_eq!(read(&path).unwrap(), filled(2, 1, 1.0));
        assert_eq!(tiled(&[1.0, 0.0], 3).len(), 3);
    }
}
