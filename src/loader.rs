//! Reads bids out of delimited text such as the eBid monthly sales export.

use std::{
    borrow::Cow,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, info, warn};

use crate::{Bid, BidStore, IndexError, bid::parse_amount};

/// Byte-order mark some spreadsheet exports put in front of the header.
const BOM: char = '\u{feff}';

/// Which column holds which bid field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Column holding the bid id.
    pub id: usize,
    /// Column holding the title.
    pub title: usize,
    /// Column holding the fund.
    pub fund: usize,
    /// Column holding the amount.
    pub amount: usize,
    /// Currency symbol stripped from the amount.
    pub currency_symbol: char,
    /// Field separator.
    pub delimiter: char,
}

impl Default for ColumnLayout {
    /// The eBid monthly sales layout.
    fn default() -> Self {
        Self { id: 1, title: 0, fund: 8, amount: 4, currency_symbol: '$', delimiter: ',' }
    }
}

impl ColumnLayout {
    /// Number of columns a row needs for this layout.
    #[must_use]
    pub fn min_columns(&self) -> usize {
        self.id.max(self.title).max(self.fund).max(self.amount).saturating_add(1)
    }

    /// Builds a bid from the fields of one row. `line` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::MalformedRow`] when a column is missing and
    /// [`IndexError::InvalidAmount`] when the amount does not parse.
    pub fn bid_from_fields(&self, fields: &[String], line: usize) -> Result<Bid, IndexError> {
        let column = |index: usize| {
            fields.get(index).map(|field| field.trim()).ok_or_else(|| IndexError::MalformedRow {
                line,
                found: fields.len(),
                expected: self.min_columns(),
            })
        };

        Ok(Bid {
            id: column(self.id)?.to_string(),
            title: column(self.title)?.to_string(),
            fund: column(self.fund)?.to_string(),
            amount: parse_amount(column(self.amount)?, self.currency_symbol)?,
        })
    }
}

/// Counts of what a load did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows turned into bids.
    pub loaded: usize,
    /// Rows skipped because they could not be parsed.
    pub skipped: usize,
}

/// Splits one line into fields.
///
/// Double quotes group a field so it may contain the delimiter; a doubled
/// quote inside a quoted field is a literal quote.
#[must_use]
pub fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            c if c == delimiter && !quoted => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);

    fields
}

/// Parses every data row of `reader`. The first line is the header and is skipped.
///
/// Rows that do not parse are logged and counted as skipped; blank lines are
/// ignored. Bytes that are not UTF-8 (Latin-1 exports) are replaced with
/// `U+FFFD` and the row is still read.
///
/// # Errors
///
/// Returns [`IndexError::Io`] when reading fails.
pub fn read_bids<R: BufRead>(
    mut reader: R,
    layout: &ColumnLayout,
) -> Result<(Vec<Bid>, LoadReport), IndexError> {
    let mut bids = Vec::new();
    let mut report = LoadReport::default();
    let mut buf = Vec::new();
    let mut line_number: usize = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number = line_number.saturating_add(1);

        let raw = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);
        if matches!(line, Cow::Owned(_)) {
            warn!("line {line_number} is not valid UTF-8, reading it lossily");
        }

        if line_number == 1 {
            let header = split_row(line.trim_start_matches(BOM), layout.delimiter);
            debug!("bid header: {}", header.join(" | "));
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_row(&line, layout.delimiter);
        match layout.bid_from_fields(&fields, line_number) {
            Ok(bid) => {
                bids.push(bid);
                report.loaded = report.loaded.saturating_add(1);
            }
            Err(err) => {
                warn!("skipping line {line_number}: {err}");
                report.skipped = report.skipped.saturating_add(1);
            }
        }
    }

    Ok((bids, report))
}

/// Parses `reader` and inserts every bid into `store`.
///
/// # Errors
///
/// Returns [`IndexError::Io`] when reading fails, or the store's error when it
/// rejects a bid. Bids inserted before the failure stay in the store.
pub fn load_bids<R, S>(
    reader: R,
    layout: &ColumnLayout,
    store: &mut S,
) -> Result<LoadReport, IndexError>
where
    R: BufRead,
    S: BidStore + ?Sized,
{
    let (bids, report) = read_bids(reader, layout)?;
    for bid in bids {
        store.insert_bid(bid)?;
    }
    info!("loaded {} bids, skipped {} rows", report.loaded, report.skipped);
    Ok(report)
}

/// Opens the file at `path` and loads it into `store`.
///
/// # Errors
///
/// Same as [`load_bids`], plus failure to open the file.
pub fn load_bids_from_path<P, S>(
    path: P,
    layout: &ColumnLayout,
    store: &mut S,
) -> Result<LoadReport, IndexError>
where
    P: AsRef<Path>,
    S: BidStore + ?Sized,
{
    info!("loading bids from {}", path.as_ref().display());
    let file = File::open(path)?;
    load_bids(BufReader::new(file), layout, store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{ChainedHashTable, OrderedTree, utils::collect_ids};

    const SAMPLE: &str = "\u{feff}ArticleTitle,ArticleID,Department,CloseDate,WinningBid,InventoryID,VehicleID,ReceiptNumber,Fund
Table,98109,Enterprise,11/24/2016,$27.00,,,123,General Fund
\"Chair, Office\",98112,Enterprise,11/24/2016,\"$1,250.50\",,,124,Enterprise

Lamp,98001,Enterprise,11/24/2016,$5.00,,,125,General Fund
Broken,98002,Enterprise
Stool,98003,Enterprise,11/24/2016,free,,,126,General Fund
";

    #[test]
    fn test_split_row() {
        assert_eq!(split_row("a,b,,c", ','), vec!["a", "b", "", "c"]);
        assert_eq!(split_row("\"a,b\",c", ','), vec!["a,b", "c"]);
        assert_eq!(split_row("\"say \"\"hi\"\"\",x", ','), vec!["say \"hi\"", "x"]);
        assert_eq!(split_row("a;b", ';'), vec!["a", "b"]);
        assert_eq!(split_row("", ','), vec![""]);
    }

    #[test]
    fn test_read_bids() {
        let (bids, report) = read_bids(Cursor::new(SAMPLE), &ColumnLayout::default()).unwrap();

        assert_eq!(report, LoadReport { loaded: 3, skipped: 2 });
        assert_eq!(bids.len(), 3);

        let chair = bids.get(1).unwrap();
        assert_eq!(chair.id, "98112");
        assert_eq!(chair.title, "Chair, Office");
        assert_eq!(chair.fund, "Enterprise");
        assert!((chair.amount - 1250.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_into_both_indexes() {
        let layout = ColumnLayout::default();

        let mut tree = OrderedTree::new();
        let report = load_bids(Cursor::new(SAMPLE), &layout, &mut tree).unwrap();
        assert_eq!(report.loaded, 3);
        assert_eq!(collect_ids(&tree), vec!["98001", "98109", "98112"]);

        let mut table = ChainedHashTable::new();
        load_bids(Cursor::new(SAMPLE), &layout, &mut table).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.search("98109").map(|bid| bid.title), Some("Table".to_string()));
    }

    #[test]
    fn test_latin1_row_is_still_read() {
        let mut input = b"Title,Id,Dept,Close,Amount,Inv,Veh,Receipt,Fund\r\n".to_vec();
        input.extend_from_slice(b"Desk,98001,Ent,1/1/2016,$12.50,,,1,General Fund\r\n");
        input.extend_from_slice(b"Caf\xe9 Table,98002,Ent,1/1/2016,$40.00,,,2,General Fund\r\n");
        input.extend_from_slice(b"Lamp,98003,Ent,1/1/2016,$5.00,,,3,Enterprise");

        let (bids, report) = read_bids(Cursor::new(input), &ColumnLayout::default()).unwrap();

        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        let ids: Vec<&str> = bids.iter().map(|bid| bid.id.as_str()).collect();
        assert_eq!(ids, vec!["98001", "98002", "98003"]);
        assert_eq!(bids.get(1).map(|bid| bid.title.as_str()), Some("Caf\u{fffd} Table"));
        assert_eq!(bids.get(2).map(|bid| bid.fund.as_str()), Some("Enterprise"));
    }

    #[test]
    fn test_bid_from_fields_reports_missing_column() {
        let layout = ColumnLayout::default();
        let fields = split_row("Broken,98002,Enterprise", ',');

        match layout.bid_from_fields(&fields, 7) {
            Err(IndexError::MalformedRow { line, found, expected }) => {
                assert_eq!((line, found, expected), (7, 3, 9));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let mut tree = OrderedTree::new();
        let result =
            load_bids_from_path("/nonexistent/bids.csv", &ColumnLayout::default(), &mut tree);
        assert!(matches!(result, Err(IndexError::Io(_))));
        assert!(tree.is_empty());
    }
}
