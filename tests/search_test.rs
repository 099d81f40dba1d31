mod common;

use std::time::Duration;

use common::{FakeContext, FakeSite, result_links};
use kodegen_tools_websearch::captcha::CaptchaCoordinator;
use kodegen_tools_websearch::web_search::{SearchOptions, WebSearchError, find_engine, search};

const BING_RESULTS: &str = "li.b_algo h2 a";
const DDG_RESULTS: &str = "a[data-testid='result-title-a']";

fn options(top_k_each: usize) -> SearchOptions {
    SearchOptions {
        top_k_each,
        tab_concurrency: 3,
        navigation_timeout: Duration::from_secs(25),
    }
}

fn engines(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

fn two_engine_context(bing: Vec<(String, String)>, ddg: Vec<(String, String)>) -> FakeContext {
    FakeContext::new()
        .site("https://www.bing.com/search", FakeSite::new().results(BING_RESULTS, bing))
        .site("https://duckduckgo.com/", FakeSite::new().results(DDG_RESULTS, ddg))
}

#[test]
fn result_selectors_match_the_registry() {
    assert_eq!(find_engine("bing").unwrap().result_selector, BING_RESULTS);
    assert_eq!(find_engine("DuckDuckGo").unwrap().result_selector, DDG_RESULTS);
}

#[tokio::test(start_paused = true)]
async fn two_engines_with_top_five_yield_ten_hits() {
    let context = two_engine_context(result_links("bing.example", 7), result_links("ddg.example", 7));
    let coordinator = CaptchaCoordinator::default();

    let hits = search(
        &context,
        "tokio runtime",
        &engines(&["bing", "duckduckgo"]),
        options(5),
        None,
        &coordinator,
    )
    .await
    .unwrap();

    assert_eq!(hits.len(), 10);
    assert!(hits[..5].iter().all(|h| h.engine == "bing"));
    assert!(hits[5..].iter().all(|h| h.engine == "duckduckgo"));
    assert_eq!(hits[0].url, "https://bing.example/page-0");
    assert_eq!(hits[9].url, "https://ddg.example/page-4");

    let navigations = context.navigations();
    assert!(navigations.contains(&"https://www.bing.com/search?q=tokio%20runtime".to_string()));
    assert!(navigations.contains(&"https://duckduckgo.com/?q=tokio%20runtime&ia=web".to_string()));
    // Result tabs stay open for the operator.
    assert_eq!(context.open_pages(), 2);
}

#[tokio::test(start_paused = true)]
async fn shared_urls_keep_the_earlier_engine() {
    let shared = ("Tokio".to_string(), "https://tokio.rs/".to_string());
    let context = two_engine_context(
        vec![shared.clone(), ("Docs".into(), "https://docs.rs/tokio".into())],
        vec![shared, ("Crate".into(), "https://crates.io/crates/tokio".into())],
    );

    // Request order does not change dispatch order.
    let hits = search(
        &context,
        "tokio",
        &engines(&["duckduckgo", "bing"]),
        options(10),
        None,
        &CaptchaCoordinator::default(),
    )
    .await
    .unwrap();

    let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
    assert_eq!(urls, ["https://tokio.rs/", "https://docs.rs/tokio", "https://crates.io/crates/tokio"]);
    assert_eq!(hits[0].engine, "bing");
}

#[tokio::test(start_paused = true)]
async fn incomplete_anchors_are_skipped_and_titles_cleaned() {
    let context = FakeContext::new().site(
        "https://www.bing.com/search",
        FakeSite::new().results(
            BING_RESULTS,
            vec![
                ("  The   Rust\n Book ".into(), "https://doc.rust-lang.org/book/".into()),
                (String::new(), "https://untitled.example/".into()),
                ("No target".into(), String::new()),
                ("Async Book".into(), "https://rust-lang.github.io/async-book/".into()),
            ],
        ),
    );

    let hits = search(&context, "rust", &engines(&["bing"]), options(10), None, &CaptchaCoordinator::default())
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "The Rust Book");
    assert_eq!(hits[1].url, "https://rust-lang.github.io/async-book/");
}

#[tokio::test(start_paused = true)]
async fn failed_engine_contributes_nothing() {
    let context = FakeContext::new()
        .site(
            "https://www.bing.com/search",
            FakeSite::new().results(BING_RESULTS, result_links("bing.example", 3)),
        )
        .site("https://duckduckgo.com/", FakeSite::new().failing());

    let hits = search(
        &context,
        "tokio",
        &engines(&["bing", "duckduckgo"]),
        options(5),
        None,
        &CaptchaCoordinator::default(),
    )
    .await
    .unwrap();

    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.engine == "bing"));
}

#[tokio::test(start_paused = true)]
async fn unknown_engines_fail_before_any_navigation() {
    let context = FakeContext::new();
    let outcome = search(
        &context,
        "tokio",
        &engines(&["altavista"]),
        options(5),
        None,
        &CaptchaCoordinator::default(),
    )
    .await;

    assert!(matches!(outcome, Err(WebSearchError::NoEnginesSelected { .. })));
    assert!(context.events().is_empty());
}
