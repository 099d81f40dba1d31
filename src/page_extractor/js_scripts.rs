//! JavaScript evaluation scripts
//!
//! Every in-page procedure the crawler runs. Each one is a function expression
//! taking a single JSON argument; see [`PageScript`].

use crate::browser::PageScript;

/// `{selector}` -> number of matching elements
pub const SELECTOR_COUNT: PageScript = PageScript::new(
    "selector_count",
    r#"
    (args) => document.querySelectorAll(args.selector).length
"#,
);

/// `{selector}` -> innerText of the first match, or null
pub const SELECTOR_INNER_TEXT: PageScript = PageScript::new(
    "selector_inner_text",
    r#"
    (args) => {
        const el = document.querySelector(args.selector);
        return el ? (el.innerText || "") : null;
    }
"#,
);

/// `{}` -> document.readyState
pub const DOCUMENT_READY_STATE: PageScript = PageScript::new(
    "document_ready_state",
    r#"
    () => document.readyState
"#,
);

/// `{}` -> visible body text
pub const BODY_TEXT: PageScript = PageScript::new(
    "body_text",
    r#"
    () => (document.body && document.body.innerText) || ""
"#,
);

/// `{selector, index}` -> `{title, href}` of the index-th result anchor, or null
///
/// `href` is the resolved absolute URL.
pub const NTH_RESULT_LINK: PageScript = PageScript::new(
    "nth_result_link",
    r#"
    (args) => {
        const el = document.querySelectorAll(args.selector)[args.index];
        if (!el) return null;
        const title = (el.textContent || "").trim();
        const href = el.href || el.getAttribute("href") || "";
        return { title: title || null, href: href || null };
    }
"#,
);

/// `{dy}` -> scroll the viewport down by dy pixels
pub const MICRO_SCROLL: PageScript = PageScript::new(
    "micro_scroll",
    r#"
    (args) => { window.scrollBy(0, args.dy); return true; }
"#,
);

/// `{}` -> scroll 5-10 random steps to trigger lazy content, then back to top
///
/// Stops early once the document height stops growing.
pub const AUTO_SCROLL: PageScript = PageScript::new(
    "auto_scroll",
    r#"
    async () => {
        const sleep = ms => new Promise(r => setTimeout(r, ms));
        const r = (a, b) => Math.floor(a + Math.random() * (b - a + 1));
        let last = 0;
        const steps = r(5, 10);
        for (let i = 0; i < steps; i++) {
            window.scrollBy(0, r(600, Math.max(900, innerHeight)));
            await sleep(r(350, 800));
            const h = document.body ? document.body.scrollHeight : 0;
            if (h === last) break;
            last = h;
        }
        await sleep(r(250, 500));
        window.scrollTo(0, 0);
        return true;
    }
"#,
);

/// `{}` -> `[{text, len, ld}]` for every structural content container
///
/// Elements are deduplicated by tag/id/class. `ld` is the link density
/// (anchor text length / total text length). Falls back to `<body>` when no
/// container matches.
pub const MAIN_BLOCK_CANDIDATES: PageScript = PageScript::new(
    "main_block_candidates",
    r##"
    () => {
        const sels = [
            "article", "main", "#content", ".content", ".article", ".post",
            ".markdown-body", ".entry-content", ".post-content",
            ".prose", ".s-prose", ".cooked",
            "#article_content", "#cnblogs_post_body",
            "#discussion_bucket", ".TimelineItem-body"
        ];
        const seen = new Set();
        const els = [];
        for (const sel of sels) {
            document.querySelectorAll(sel).forEach(el => {
                const key = el.tagName + "|" + (el.id || "") + "|" + (el.className || "");
                if (!seen.has(key)) {
                    seen.add(key);
                    els.push(el);
                }
            });
        }
        if (els.length === 0 && document.body) els.push(document.body);

        const linkDensity = (el) => {
            const total = (el.innerText || "").length || 1;
            let links = 0;
            el.querySelectorAll("a").forEach(a => links += (a.innerText || "").length);
            return links / total;
        };

        return els.map(el => {
            const text = (el.innerText || "").trim();
            return { text, len: text.length, ld: linkDensity(el) };
        });
    }
"##,
);

/// `{maxComments}` -> `{title, mainBody, comments[]}` of a GitHub issue / PR
pub const GITHUB_ISSUE: PageScript = PageScript::new(
    "github_issue",
    r##"
    (args) => {
        const q = (sel) => document.querySelector(sel);
        const title = ((q("h1 bdi") && q("h1 bdi").innerText)
            || (q("h1.gh-header-title") && q("h1.gh-header-title").innerText)
            || (q("h1") && q("h1").innerText)
            || "").trim();
        const root = q("#discussion_bucket") || document;
        const bodies = Array.from(root.querySelectorAll(".js-comment-body, .comment-body, .markdown-body"))
            .map(el => (el.innerText || "").trim())
            .filter(t => t.length > 0);
        const mainBody = bodies[0] || "";
        const comments = bodies.slice(1).slice(0, args.maxComments);
        return { title, mainBody, comments };
    }
"##,
);

/// `{}` -> `{origin, localStorage: [{name, value}]}` of the current document
pub const LOCAL_STORAGE_SNAPSHOT: PageScript = PageScript::new(
    "local_storage_snapshot",
    r#"
    () => {
        const items = [];
        try {
            for (let i = 0; i < localStorage.length; i++) {
                const name = localStorage.key(i);
                items.push({ name, value: localStorage.getItem(name) || "" });
            }
        } catch (e) {}
        return { origin: location.origin, localStorage: items };
    }
"#,
);

/// Masks the most commonly probed automation flag. Runs on every new document.
pub const WEBDRIVER_MASK: &str = r#"
    Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
"#;
