use std::fmt::Formatter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Notation(pub String);

impl std::fmt::Display for A1Notation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<A1Notation> for String {
    fn from(a1_notation: A1Notation) -> Self {
        a1_notation.0
    }
}

impl AsRef<str> for A1Notation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub trait ToA1Notation {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation;
}

/// Quotes a sheet title for use in a range. Embedded single quotes are doubled.
fn quote_sheet_title(sheet_name: &str) -> String {
    format!(
        "'{}'",
        sheet_name
            .trim_start_matches('\'')
            .trim_end_matches('\'')
            .replace('\'', "''")
    )
}

/// Range covering every cell of a sheet.
///
/// # Examples
/// ```
/// use promo_sheet_sync::domain::sheets::a1_notation::whole_sheet;
/// assert_eq!(whole_sheet("Sheet1").as_ref(), "'Sheet1'");
/// ```
pub fn whole_sheet(sheet_name: &str) -> A1Notation {
    A1Notation(quote_sheet_title(sheet_name))
}

/// Zero-based cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row: u32,
    pub col: u32,
}

impl CellPosition {
    pub const ORIGIN: CellPosition = CellPosition { row: 0, col: 0 };

    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Column letters, `0 -> A`, `25 -> Z`, `26 -> AA`.
    pub fn column_letters(&self) -> String {
        let mut remaining = self.col as u64 + 1;
        let mut letters = Vec::new();
        while remaining > 0 {
            remaining -= 1;
            letters.push(char::from(b'A' + (remaining % 26) as u8));
            remaining /= 26;
        }
        letters.iter().rev().collect()
    }
}

impl ToA1Notation for CellPosition {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation {
        let local = format!("{}{}", self.column_letters(), self.row as u64 + 1);
        match sheet_name {
            Some(sheet_name) => A1Notation(format!("{}!{}", quote_sheet_title(sheet_name), local)),
            None => A1Notation(local),
        }
    }
}
