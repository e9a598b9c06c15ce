pub mod factory;
pub mod promo_sheet_sync;

#[cfg(test)]
pub(crate) mod test_doubles;
