//! Plain-text rendering of search results for the tool response.

use std::fmt::Write;

use crate::search::{Hit, SearchResponse};

pub const RETRIEVAL_ERROR: &str = "Error: Failed to retrieve search results.";
pub const NO_RESULTS: &str = "No results found.";
pub const SEPARATOR: &str = "----------";

/// Renders `results`, or the fixed error line when the search failed.
pub fn format_results(results: Option<&SearchResponse>) -> String {
    let Some(results) = results else {
        return RETRIEVAL_ERROR.to_string();
    };

    let query = results
        .request_params
        .as_ref()
        .and_then(|params| params.q.as_deref())
        .filter(|q| !q.is_empty())
        .unwrap_or("unknown query");
    let mut output = format!(
        "Found {} results for \"{}\"\n\n",
        results.found.unwrap_or(0),
        query
    );

    let hits = results.hits.as_deref().unwrap_or_default();
    if hits.is_empty() {
        output.push_str(NO_RESULTS);
        return output;
    }

    for (index, hit) in hits.iter().enumerate() {
        write_hit(&mut output, index + 1, hit);
    }
    output
}

fn write_hit(output: &mut String, number: usize, hit: &Hit) {
    let doc = &hit.document;
    // Writing into a String cannot fail.
    let _ = writeln!(output, "{}. {} [{}]", number, doc.title, doc.package);
    let _ = writeln!(output, "   Ref: {}", doc.reference);
    let _ = writeln!(output, "   Type: {}\n", doc.kind);

    if let Some(body) = doc.doc.as_deref().filter(|body| !body.is_empty()) {
        let _ = writeln!(output, "{body}");
    }

    let _ = write!(output, "\n{SEPARATOR}\n\n");
}
