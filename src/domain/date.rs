/// Converts an 8-digit `YYYYMMDD` date (the CYMD encoding used by the mix tables) into
/// `MM/DD/YYYY`. Returns `None` when the input is not exactly eight ASCII digits, which is
/// how the tables encode "no date" (`0`).
///
/// No calendar validation is done, the digits are only rearranged.
///
/// # Examples
/// ```
/// use promo_sheet_sync::domain::date::cymd_to_mdy;
/// assert_eq!(cymd_to_mdy("20250115").as_deref(), Some("01/15/2025"));
/// assert_eq!(cymd_to_mdy("0"), None);
/// ```
pub fn cymd_to_mdy(cymd: &str) -> Option<String> {
    if cymd.len() != 8 || !cymd.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let (year, rest) = cymd.split_at(4);
    let (month, day) = rest.split_at(2);
    Some(format!("{}/{}/{}", month, day, year))
}
