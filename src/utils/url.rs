//! Base-URL normalization for endpoint construction.

/// Join a backend base URL and an endpoint path without producing double
/// slashes, whatever trailing/leading slashes the inputs carry.
///
/// # Examples
///
/// ```
/// use ragdesk::utils::url::join_endpoint;
///
/// assert_eq!(join_endpoint("http://localhost:8000", "auth"), "http://localhost:8000/auth");
/// assert_eq!(join_endpoint("http://localhost:8000/", "/rag"), "http://localhost:8000/rag");
/// ```
pub fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
