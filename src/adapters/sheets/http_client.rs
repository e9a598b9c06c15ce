use error_stack::ResultExt;
use google_sheets4::{
    hyper,
    hyper_rustls::{self, builderstates::WantsSchemes, HttpsConnectorBuilder},
};

use crate::ports::sheet_sink::SheetError;

pub type HttpsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;

/// HTTPS-only client trusting the platform's root certificates.
pub fn http_client() -> error_stack::Result<hyper::Client<HttpsConnector>, SheetError> {
    build_client(HttpsConnectorBuilder::new().with_native_roots())
}

fn build_client(
    builder: std::io::Result<HttpsConnectorBuilder<WantsSchemes>>,
) -> error_stack::Result<hyper::Client<HttpsConnector>, SheetError> {
    let connector = builder
        .change_context(SheetError::Authorization)
        .attach_printable("Could not load native root certificates")?
        .https_only()
        .enable_http1()
        .build();

    Ok(hyper::Client::builder().build(connector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_certificates_is_authorization_error() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no CA certificates found");

        let report = build_client(Err(missing)).unwrap_err();

        assert_eq!(report.current_context(), &SheetError::Authorization);
        assert!(format!("{:?}", report).contains("native root certificates"));
    }
}
