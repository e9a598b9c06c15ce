pub mod odbc_record_source;
