use std::fmt::Debug;

/// Active "C" type mixes joined to the PLUs they apply to, with the CYMD begin/end dates
/// reassembled as MM/DD/YYYY on the server. Mix 5096 is excluded.
pub const DEFAULT_PROMO_QUERY: &str = r#"
  SELECT
    b.pluplu as SKU,
    b.pludesc,
    a.mixmloy as Insider,
    a.mixid,
    a.MIXDESC,
    substring(a.MIXBCYMD, 5, 2) concat '/' concat substring(a.MIXBCYMD, 7, 2) concat '/' concat substring(a.MIXBCYMD, 1, 4) as begin,
    substring(a.MIXECYMD, 5, 2) concat '/' concat substring(a.MIXECYMD, 7, 2) concat '/' concat substring(a.MIXECYMD, 1, 4) as end,
    b.plurtl,
    a.mixcmin as MinimumPurchase,
    a.mixcpct2 as PctValue,
    a.MIXCMAX as MaxAmount
  FROM ghmix2 a, ghplu b
  WHERE
    right(cast((mixid+10000) as char(5)),4) = B.pluucls
    AND a.mixecymd >= Cast(VarChar_Format(curdate(), 'YYYYMMDD') as dec(8, 0))
    AND a.mixtype = 'C'
    AND a.mixid <> 5096
  ORDER BY b.pluplu
"#;

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseConfig {
    /// ODBC connection string, e.g. `DSN=Paragon;UID=...;PWD=...`. Prefer setting it through
    /// `PROMO_SYNC__DATABASE__CONNECTION_STRING` so the password stays out of the config file.
    pub connection_string: String,
    #[serde(default = "default_query")]
    pub query: String,
    /// Rows fetched per ODBC round trip.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Upper bound in bytes for a single text cell.
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
    /// Columns holding raw `YYYYMMDD` values to be rewritten as `MM/DD/YYYY`.
    #[serde(default)]
    pub cymd_columns: Vec<String>,
}

fn default_query() -> String {
    DEFAULT_PROMO_QUERY.to_string()
}

fn default_batch_size() -> usize {
    500
}

fn default_max_text_len() -> usize {
    4096
}

impl DatabaseConfig {
    /// The connection string with password attributes masked, safe to log.
    pub fn redacted_connection_string(&self) -> String {
        redact_connection_string(&self.connection_string)
    }
}

impl Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("connection_string", &self.redacted_connection_string())
            .field("query", &self.query.trim())
            .field("batch_size", &self.batch_size)
            .field("max_text_len", &self.max_text_len)
            .field("cymd_columns", &self.cymd_columns)
            .finish()
    }
}

pub fn redact_connection_string(connection_string: &str) -> String {
    connection_string
        .split(';')
        .map(|attribute| match attribute.split_once('=') {
            Some((key, _))
                if key.trim().eq_ignore_ascii_case("pwd")
                    || key.trim().eq_ignore_ascii_case("password") =>
            {
                format!("{}=***", key)
            }
            _ => attribute.to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_connection_string() {
        assert_eq!(
            redact_connection_string("DSN=Paragon;UID=reader;PWD=hunter2"),
            "DSN=Paragon;UID=reader;PWD=***"
        );
        assert_eq!(
            redact_connection_string("Driver={IBM i Access ODBC Driver};System=as400;Password=x;"),
            "Driver={IBM i Access ODBC Driver};System=as400;Password=***;"
        );
    }

    #[test]
    fn test_debug_does_not_leak_password() {
        let config = DatabaseConfig {
            connection_string: "DSN=Paragon;UID=reader;PWD=hunter2".to_string(),
            query: default_query(),
            batch_size: default_batch_size(),
            max_text_len: default_max_text_len(),
            cymd_columns: vec![],
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("PWD=***"));
    }

    #[test]
    fn test_default_query_shape() {
        assert!(DEFAULT_PROMO_QUERY.contains("ORDER BY b.pluplu"));
        assert!(DEFAULT_PROMO_QUERY.contains("a.mixid <> 5096"));
    }
}
