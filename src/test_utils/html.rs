use scraper::{Html, Selector};

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The text of the first element matching `selector`.
#[track_caller]
pub(crate) fn text_of(html: &Html, selector: &str) -> String {
    let parsed = Selector::parse(selector).unwrap();

    html.select(&parsed)
        .next()
        .unwrap_or_else(|| panic!("could not find {selector}"))
        .text()
        .collect()
}
