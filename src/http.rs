//! HTTP client construction for gateway requests.

use reqwest::{Client, RequestBuilder};

use crate::options::GatewayOptions;

/// Build a configured HTTP client from gateway options.
///
/// This applies common configuration like timeouts and proxies.
pub fn build_http_client(options: &GatewayOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &options.proxy {
        if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
            builder = builder.proxy(proxy);
        }
    }

    builder.build()
}

/// Add extra headers to a request if specified in the options.
pub fn add_extra_headers(mut request: RequestBuilder, options: &GatewayOptions) -> RequestBuilder {
    if let Some(headers) = &options.extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}
