// ── Fetch target construction ──
//
// A filter selection becomes a concrete URL: the bare resource for `all`,
// otherwise the resource with a single `contentType` parameter. Always
// recomputed, never cached across filter changes.

use url::Url;

use crate::filter::{ALL_FILTER, FilterValue};

/// Query parameter carrying the filter value.
pub const FILTER_PARAM: &str = "contentType";

/// Build the fetch URL for a raw filter value.
pub fn build_url(resource: &Url, filter: &str) -> Url {
    let mut url = resource.clone();
    if filter != ALL_FILTER {
        url.query_pairs_mut().append_pair(FILTER_PARAM, filter);
    }
    url
}

/// Build the fetch URL for a typed filter value.
pub fn build_filtered<F: FilterValue>(resource: &Url, filter: F) -> Url {
    build_url(resource, filter.as_str())
}
