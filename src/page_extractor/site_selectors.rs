//! Per-site content selectors and hydration waits
//!
//! Hosts are matched by domain suffix. The longest matching suffix wins so that
//! `discuss.huggingface.co` is not served the `huggingface.co` list.

/// Selectors tried when no site entry matches
pub const GENERIC_SELECTORS: &[&str] = &["article", "main", "#content", ".content"];

/// `(domain suffix, selectors in priority order)`
pub const SITE_SELECTORS: &[(&str, &[&str])] = &[
    (
        "github.com",
        &[
            "h1 bdi",
            "h1.gh-header-title",
            "h1",
            "#discussion_bucket .js-comment-body",
            "#discussion_bucket .comment-body",
            "#discussion_bucket .markdown-body",
            "#discussion_bucket",
            "div.js-discussion .js-comment-body",
            "div.js-discussion .comment-body",
            "div.js-discussion .markdown-body",
            "div.TimelineItem-body .js-comment-body",
            "div.TimelineItem-body .comment-body",
            "div.TimelineItem-body .markdown-body",
            "article.markdown-body",
            "#readme article",
            "#readme",
            "main",
        ],
    ),
    ("stackoverflow.com", &["#question .s-prose", "#answers .s-prose", "main"]),
    ("linux.do", &[".topic-body .cooked", ".cooked", "article", "main"]),
    ("discuss.huggingface.co", &[".topic-body .cooked", ".cooked", "article", "main"]),
    ("huggingface.co", &["article", "main"]),
    ("medium.com", &["article", "main"]),
    ("dev.to", &["article", ".crayons-article__main", "main"]),
    ("reddit.com", &["shreddit-post", "article", "main"]),
    ("readthedocs.io", &["div.document", "article", "main"]),
    ("docs.google.com", &["body"]),
    ("csdn.net", &["article", "#article_content", ".article_content", "main"]),
    ("cnblogs.com", &["#cnblogs_post_body", "article", "main"]),
    ("juejin.cn", &["article", ".article-content", "main"]),
    ("jianshu.com", &["article", ".note", "main"]),
    ("wikipedia.org", &["#mw-content-text", "#content", "main"]),
    ("arxiv.org", &["#abs", "article", "main"]),
];

/// Selector list for a lowercase host
#[must_use]
pub fn match_site_selectors(host: &str) -> &'static [&'static str] {
    SITE_SELECTORS
        .iter()
        .filter(|(suffix, _)| host.ends_with(suffix))
        .max_by_key(|(suffix, _)| suffix.len())
        .map_or(GENERIC_SELECTORS, |(_, selectors)| selectors)
}

/// Selector that signals a GitHub issue/PR discussion has rendered
pub const GITHUB_DISCUSSION_READY: &str =
    "#discussion_bucket .js-comment-body, #discussion_bucket, h1 bdi, div.js-discussion";

/// `true` for GitHub issue and pull-request pages
#[must_use]
pub fn is_github_thread(host: &str, path: &str) -> bool {
    host.ends_with("github.com") && (path.contains("/issues/") || path.contains("/pull/"))
}

/// Element to wait for before reading a page, with its unscaled timeout in ms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTarget {
    pub selector: &'static str,
    pub timeout_ms: u64,
}

/// Hydration wait for a page, chosen from its lowercase host and path
#[must_use]
pub fn settle_target(host: &str, path: &str) -> SettleTarget {
    let (selector, timeout_ms) = if host.ends_with("github.com")
        && (path.contains("/issues/") || path.contains("/pull/") || path.contains("/discussions/"))
    {
        (GITHUB_DISCUSSION_READY, 9000)
    } else if host.ends_with("stackoverflow.com") {
        ("#question .s-prose, #answers .s-prose, main", 7000)
    } else if host.ends_with("linux.do") || host.ends_with("discuss.huggingface.co") {
        (".cooked, .topic-body .cooked, article, main", 7000)
    } else if ["medium.com", "dev.to", "readthedocs.io"]
        .iter()
        .any(|s| host.ends_with(s))
    {
        ("article, main", 7000)
    } else if host.ends_with("reddit.com") {
        ("shreddit-post, article, main", 7000)
    } else {
        ("article, main, #content, .content, body", 5000)
    };
    SettleTarget { selector, timeout_ms }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_suffix_wins() {
        assert_eq!(match_site_selectors("discuss.huggingface.co")[0], ".topic-body .cooked");
        assert_eq!(match_site_selectors("huggingface.co"), &["article", "main"]);
        assert_eq!(match_site_selectors("en.wikipedia.org")[0], "#mw-content-text");
    }

    #[test]
    fn unknown_hosts_get_generic_list() {
        assert_eq!(match_site_selectors("blog.example.com"), GENERIC_SELECTORS);
        assert_eq!(match_site_selectors(""), GENERIC_SELECTORS);
    }

    #[test]
    fn github_threads_only_for_issues_and_pulls() {
        assert!(is_github_thread("github.com", "/rust-lang/rust/issues/1"));
        assert!(is_github_thread("github.com", "/tokio-rs/tokio/pull/42"));
        assert!(!is_github_thread("github.com", "/tokio-rs/tokio"));
        assert!(!is_github_thread("gitlab.com", "/a/b/issues/1"));
    }

    #[test]
    fn settle_targets_follow_host_family() {
        let gh = settle_target("github.com", "/o/r/discussions/3");
        assert_eq!(gh, SettleTarget { selector: GITHUB_DISCUSSION_READY, timeout_ms: 9000 });
        assert_eq!(settle_target("www.reddit.com", "/r/rust").selector, "shreddit-post, article, main");
        assert_eq!(settle_target("dev.to", "/x").timeout_ms, 7000);
        assert_eq!(settle_target("example.org", "/").timeout_ms, 5000);
    }
}
