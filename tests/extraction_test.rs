mod common;

use serde_json::json;
use tokio::sync::Semaphore;

use common::{FakeContext, FakeSite, article_text};
use kodegen_tools_websearch::crawl_engine::crawl_hits;
use kodegen_tools_websearch::page_extractor::site_selectors::GITHUB_DISCUSSION_READY;
use kodegen_tools_websearch::page_extractor::{ExtractOptions, ExtractionMethod, extract_page};
use kodegen_tools_websearch::web_search::SearchHit;

fn hit(url: &str) -> SearchHit {
    SearchHit::new("bing", "Anchor text from the engine", url)
}

async fn extract(context: &FakeContext, url: &str) -> kodegen_tools_websearch::PageResult {
    let semaphore = Semaphore::new(1);
    extract_page(context, &semaphore, &hit(url), &ExtractOptions::default()).await
}

#[tokio::test(start_paused = true)]
async fn site_selector_text_wins_on_generic_hosts() {
    let text = article_text("work stealing", 6);
    let context = FakeContext::new().site("https://blog.example/", FakeSite::new().element("article", text.clone()));

    let result = extract(&context, "https://blog.example/posts/scheduler").await;

    assert_eq!(result.error, None);
    assert_eq!(result.method, Some(ExtractionMethod::Selectors));
    assert_eq!(result.final_url.as_deref(), Some("https://blog.example/posts/scheduler"));
    assert!(result.text.starts_with("Section 0 on work stealing"));
    assert_eq!(result.candidates.len(), 1);
    assert!(result.is_good());
    assert_eq!(context.open_pages(), 0);
}

#[tokio::test(start_paused = true)]
async fn equal_text_prefers_the_more_trusted_method() {
    let text = article_text("cooperative scheduling", 6);
    let context = FakeContext::new().site(
        "https://blog.example/",
        FakeSite::new().element("main", text.clone()).block(text, 0.0),
    );

    let result = extract(&context, "https://blog.example/coop").await;

    let methods: Vec<_> = result.candidates.iter().map(|c| c.method).collect();
    assert_eq!(methods, [ExtractionMethod::Selectors, ExtractionMethod::MainBlock]);
    assert!(result.candidates[0].score > result.candidates[1].score);
    assert_eq!(result.method, Some(ExtractionMethod::Selectors));
}

#[tokio::test(start_paused = true)]
async fn main_block_skips_link_heavy_containers() {
    let nav = (0..40).map(|i| format!("Link {i}")).collect::<Vec<_>>().join("\n");
    let text = article_text("blocking pools", 5);
    let context = FakeContext::new().site(
        "https://news.example/",
        FakeSite::new().block(nav, 0.95).block(text, 0.08),
    );

    let result = extract(&context, "https://news.example/a/1").await;

    assert_eq!(result.method, Some(ExtractionMethod::MainBlock));
    assert!(result.text.contains("blocking pools"));
    assert!(!result.text.contains("Link 3"));
}

#[tokio::test(start_paused = true)]
async fn readability_supplies_text_and_page_title() {
    let para = "Ownership rules are checked at compile time by the borrow checker. ".repeat(8);
    let html = format!(
        "<html><head><title>Borrowing</title></head><body>\
         <div id='sidebar'><a href='/'>Home</a></div>\
         <div class='story'><p>{para}</p><p>{para}</p><p>{para}</p></div></body></html>"
    );
    let context = FakeContext::new().site("https://docs.example/", FakeSite::new().html(html));

    let result = extract(&context, "https://docs.example/borrowing").await;

    assert_eq!(result.method, Some(ExtractionMethod::Readability));
    assert!(result.text.contains("borrow checker"));
    assert_eq!(result.display_title(), "Borrowing");
}

#[tokio::test(start_paused = true)]
async fn body_text_is_the_last_resort() {
    let body = article_text("io drivers", 4);
    let context = FakeContext::new().site("https://plain.example/", FakeSite::new().body(body));

    let result = extract(&context, "https://plain.example/").await;

    assert_eq!(result.method, Some(ExtractionMethod::Body));
    assert!(result.text.contains("io drivers"));
}

#[tokio::test(start_paused = true)]
async fn github_threads_use_the_dedicated_extractor() {
    let main_body = article_text("a deadlock in block_in_place", 2);
    let thread = json!({
        "title": "Deadlock when calling block_in_place from a current-thread runtime",
        "mainBody": main_body,
        "comments": [
            "This reproduces on 1.38 as well when the runtime is built with enable_all.",
            "+1",
        ],
    });
    let context = FakeContext::new().site(
        "https://github.com/",
        FakeSite::new().element(GITHUB_DISCUSSION_READY, "").github(thread),
    );

    let result = extract(&context, "https://github.com/tokio-rs/tokio/issues/4242").await;

    assert_eq!(result.method, Some(ExtractionMethod::GithubIssue));
    assert!(result.text.starts_with("Deadlock when calling block_in_place"));
    assert!(result.text.contains("--- Comment 1 ---\nThis reproduces on 1.38"));
    assert!(!result.text.contains("Comment 2"));
}

#[tokio::test(start_paused = true)]
async fn redirects_are_reported_as_final_url() {
    let context = FakeContext::new()
        .site(
            "https://www.bing.com/ck/a",
            FakeSite::new().redirect("https://blog.example/landing"),
        )
        .site("https://blog.example/", FakeSite::new().element("article", article_text("redirects", 5)));

    let result = extract(&context, "https://www.bing.com/ck/a?u=a1aHR0cHM6").await;

    assert_eq!(result.url, "https://www.bing.com/ck/a?u=a1aHR0cHM6");
    assert_eq!(result.effective_url(), "https://blog.example/landing");
    assert_eq!(result.method, Some(ExtractionMethod::Selectors));
}

#[tokio::test(start_paused = true)]
async fn failures_become_error_results() {
    let context = FakeContext::new()
        .site("https://down.example/", FakeSite::new().failing())
        .site("https://empty.example/", FakeSite::new());

    let down = extract(&context, "https://down.example/").await;
    assert!(down.error.as_deref().unwrap().contains("Failed to navigate"));
    assert_eq!(down.title, "Anchor text from the engine");
    assert!(down.text.is_empty());

    let empty = extract(&context, "https://empty.example/").await;
    assert!(empty.error.as_deref().unwrap().contains("no extraction strategy"));
    assert!(!empty.is_good());

    assert_eq!(context.open_pages(), 0);
}

#[tokio::test(start_paused = true)]
async fn crawl_returns_one_result_per_hit_in_order() {
    let mut context = FakeContext::new();
    let mut hits = Vec::new();
    for i in 0..10 {
        let url = format!("https://site{i}.example/");
        context = context.site(&url, FakeSite::new().element("article", article_text(&format!("topic {i}"), 5)));
        hits.push(SearchHit::new(if i < 5 { "bing" } else { "duckduckgo" }, format!("Hit {i}"), url));
    }
    // One hit that cannot be reached still gets a slot.
    hits[3].url = "https://unreachable.example/".into();
    context = context.site("https://unreachable.example/", FakeSite::new().failing());

    let results = crawl_hits(&context, &hits, 3, &ExtractOptions::default()).await;

    assert_eq!(results.len(), 10);
    for (hit, result) in hits.iter().zip(&results) {
        assert_eq!(result.url, hit.url);
        assert_eq!(result.engine, hit.engine);
    }
    assert!(results[3].error.is_some());
    assert_eq!(results.iter().filter(|r| r.is_good()).count(), 9);
    assert!(context.max_open_pages() <= 3);
    assert_eq!(context.open_pages(), 0);
}
