use parliament_opensearch::{
    OpenSearchError, OpenSearchParameter, SearchParameters, TemplateEntry, TemplateSet,
    build_query_url, camelize,
};

fn templates() -> TemplateSet {
    TemplateSet::new(vec![
        TemplateEntry::new(
            "application/atom+xml",
            "http://x/search?q={searchTerms}&start={startPage?}",
        ),
        TemplateEntry::new("application/rss+xml", "B?q={searchTerms}"),
        TemplateEntry::new("application/rss+xml", "C?q={searchTerms}"),
    ])
    .unwrap()
}

// =============================================================================
// Substitution
// =============================================================================

#[test]
fn supplied_start_page_is_substituted() {
    let params = SearchParameters::new("banana").start_page(10);
    let url = build_query_url(&templates(), &params, None).unwrap();
    assert_eq!(url, "http://x/search?q=banana&start=10");
}

#[test]
fn missing_start_page_uses_default() {
    let url = build_query_url(&templates(), &SearchParameters::new("banana"), None).unwrap();
    assert_eq!(url, "http://x/search?q=banana&start=1");
}

#[test]
fn snake_case_names_reach_camel_case_placeholders() {
    let params = SearchParameters::new("banana").param("start_page", "7");
    assert_eq!(params.get(&OpenSearchParameter::StartPage), Some("7"));

    let url = build_query_url(&templates(), &params, None).unwrap();
    assert_eq!(url, "http://x/search?q=banana&start=7");
}

#[test]
fn parliament_template_fills_every_placeholder() {
    let templates = [TemplateEntry::new(
        "text/html",
        "http://beta.parliament.uk/search?q={searchTerms}&start_index={startIndex?}&count={count?}",
    )];
    let params = SearchParameters::new("banana").count(25);

    let url = build_query_url(&templates, &params, Some("text/html")).unwrap();
    assert_eq!(
        url,
        "http://beta.parliament.uk/search?q=banana&start_index=1&count=25"
    );
}

#[test]
fn unknown_placeholders_survive() {
    let templates = [TemplateEntry::new(
        "application/atom+xml",
        "http://x/?q={searchTerms}&geo={geo:box?}",
    )];
    let url = build_query_url(&templates, &SearchParameters::new("a"), None).unwrap();
    assert_eq!(url, "http://x/?q=a&geo={geo:box?}");
}

#[test]
fn building_is_deterministic() {
    let params = SearchParameters::new("banana").count(5).language("en");
    let a = build_query_url(&templates(), &params, None).unwrap();
    let b = build_query_url(&templates(), &params, None).unwrap();
    assert_eq!(a, b);
}

// =============================================================================
// Type selection
// =============================================================================

#[test]
fn requested_type_selects_its_template() {
    let url = build_query_url(
        &templates(),
        &SearchParameters::new("q"),
        Some("application/rss+xml"),
    )
    .unwrap();
    assert_eq!(url, "B?q=q");
}

#[test]
fn first_template_of_a_duplicated_type_wins() {
    let set = templates();
    assert_eq!(set.find("application/rss+xml").unwrap().template(), "B?q={searchTerms}");
}

#[test]
fn type_match_is_exact() {
    let err = build_query_url(
        &templates(),
        &SearchParameters::new("q"),
        Some("Application/Atom+XML"),
    )
    .unwrap_err();
    assert!(matches!(err, OpenSearchError::UnknownRequestedType { .. }));
}

#[test]
fn unknown_type_names_the_type() {
    let err = build_query_url(
        &templates(),
        &SearchParameters::new("q"),
        Some("application/ntriple"),
    )
    .unwrap_err();

    assert!(err.to_string().contains("application/ntriple"));
    assert!(err.is_description_error());
}

// =============================================================================
// Names
// =============================================================================

#[test]
fn camelize_matches_canonical_placeholders() {
    for param in OpenSearchParameter::CANONICAL {
        assert_eq!(
            param.placeholder(),
            format!("{{{}?}}", camelize(param.as_str()))
        );
    }
}
