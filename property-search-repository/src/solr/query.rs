//! Query translation.
//!
//! Builds the Solr `select` parameters from a normalized search request:
//! text query, filter clauses, pagination, and sort.

use property_search_shared::SearchRequest;

/// Name of the nightly price field in the engine schema. The same field is
/// used on the write path, the range filter, and the sort whitelist.
pub(crate) const PRICE_FIELD: &str = "price";

/// Upper bound substituted when a price range has no explicit maximum.
const MAX_PRICE_SENTINEL: f64 = 999_999.0;

/// Characters Solr treats as query syntax.
const RESERVED: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
];

/// Escape the Solr reserved character set by prefixing each occurrence
/// with a backslash, so user input matches literally.
pub(crate) fn escape_query(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the full `select` parameter list for a request.
///
/// Expects a normalized request (`page >= 1`, `page_size >= 1`, sort
/// fields already validated against the whitelist).
pub(crate) fn build_select_params(request: &SearchRequest) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();

    // Text query across title, city and country, or match-all.
    if !request.query.is_empty() {
        let term = escape_query(&request.query);
        params.push((
            "q".to_string(),
            format!("(title:*{term}* OR city:*{term}* OR country:*{term}*)"),
        ));
    } else {
        params.push(("q".to_string(), "*:*".to_string()));
    }

    // Additive filter clauses.
    if !request.city.is_empty() {
        params.push((
            "fq".to_string(),
            format!("city:\"{}\"", escape_query(&request.city)),
        ));
    }
    if !request.country.is_empty() {
        params.push((
            "fq".to_string(),
            format!("country:\"{}\"", escape_query(&request.country)),
        ));
    }
    if request.min_price > 0.0 || request.max_price > 0.0 {
        let max_price = if request.max_price > 0.0 {
            request.max_price
        } else {
            MAX_PRICE_SENTINEL
        };
        params.push((
            "fq".to_string(),
            format!("{}:[{} TO {}]", PRICE_FIELD, request.min_price, max_price),
        ));
    }
    if request.bedrooms > 0 {
        params.push(("fq".to_string(), format!("bedrooms:{}", request.bedrooms)));
    }
    if request.bathrooms > 0 {
        params.push(("fq".to_string(), format!("bathrooms:{}", request.bathrooms)));
    }
    if request.min_guests > 0 {
        params.push((
            "fq".to_string(),
            format!("max_guests:[{} TO *]", request.min_guests),
        ));
    }

    // Pagination. Computed in u64: page is unbounded above, so the
    // product can exceed u32.
    let start = (request.page as u64 - 1) * request.page_size as u64;
    params.push(("start".to_string(), start.to_string()));
    params.push(("rows".to_string(), request.page_size.to_string()));

    // Sort only when the caller asked for one; empty means engine default.
    if !request.sort_by.is_empty() {
        params.push((
            "sort".to_string(),
            format!("{} {}", request.sort_by, request.sort_order),
        ));
    }

    params.push(("wt".to_string(), "json".to_string()));
    params
}
