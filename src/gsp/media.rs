//! Writable media type selection.
//!
//! Callers may pin the response serialization with the `accept` query
//! parameter; export tooling uses this to request an exact format no matter
//! what the Accept header negotiates.

use mime::Mime;

use crate::gsp::backend::GspError;

/// Query parameter that overrides negotiated response media types.
pub const ACCEPT_PARAM: &str = "accept";

/// Compute the media types offered to the delegate for a read.
///
/// When the override parameter is present it wins unconditionally: the list
/// is exactly one entry, the requested type pinned to UTF-8. Otherwise the
/// caller's Accept header is passed through for the delegate to negotiate.
pub fn writable_media_types(
    override_param: Option<&str>,
    accept_header: Option<&str>,
) -> Result<Vec<Mime>, GspError> {
    if let Some(requested) = override_param {
        let mime: Mime = requested
            .parse()
            .map_err(|_| GspError::BadRequest(format!("invalid media type: {requested}")))?;
        let pinned: Mime = format!("{}; charset=utf-8", mime.essence_str())
            .parse()
            .map_err(|_| GspError::BadRequest(format!("invalid media type: {requested}")))?;
        return Ok(vec![pinned]);
    }

    Ok(parse_accept(accept_header.unwrap_or_default()))
}

/// Parse an Accept header into its media types, ignoring malformed entries.
fn parse_accept(accept: &str) -> Vec<Mime> {
    accept
        .split(',')
        .filter_map(|part| part.trim().parse::<Mime>().ok())
        .collect()
}
