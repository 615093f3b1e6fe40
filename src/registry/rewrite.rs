//! Proxy URL rewriting.
//!
//! Forwarded requests keep the original path, query, and fragment; only
//! scheme, host, and port are taken from the proxy origin.

use url::Url;

use crate::registry::RegistryError;

/// Rewrite `request` to target the origin of `proxy`.
pub fn proxied_uri(proxy: &Url, request: &Url) -> Result<Url, RegistryError> {
    let rewrite_err = || RegistryError::Rewrite {
        proxy: proxy.to_string(),
        request: request.to_string(),
    };

    let mut target = request.clone();
    target.set_scheme(proxy.scheme()).map_err(|_| rewrite_err())?;
    target.set_host(proxy.host_str()).map_err(|_| rewrite_err())?;
    // None clears an explicit port, falling back to the scheme default
    target.set_port(proxy.port()).map_err(|_| rewrite_err())?;

    Ok(target)
}
