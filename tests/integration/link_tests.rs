//! Link-following mode

use crate::support::{test_config, MockSite};
use crawl_bench::strategy::{build_strategy, Strategy};
use crawl_bench::StrategyKind;
use std::collections::BTreeSet;

/// `/` links to `/a` and `/b`; both link back and to each other
fn linked_site() -> MockSite {
    let site = MockSite::start();
    site.page(
        "/",
        r#"<title>Home</title>
           <a href="/a">A</a> <a href="/b">B</a> <a href="/a#top">A again</a>
           <a href="mailto:someone@a.test">mail</a> <a href="javascript:void(0)">js</a>"#,
    );
    site.page("/a", r#"<title>A</title><a href="/">home</a> <a href="/b">B</a>"#);
    site.page("/b", r#"<title>B</title><a href="/a">A</a> <a href="./">home</a>"#);
    site
}

#[test]
fn test_follow_links_fetches_each_url_once() {
    for kind in StrategyKind::ALL {
        let site = linked_site();
        let seed = site.url("/");
        let mut config = test_config(vec![seed.clone()]);
        config.crawl.follow_links = true;
        config.crawl.max_pages = 50;

        let run = build_strategy(kind, &config)
            .run(&[seed.clone()], None)
            .unwrap();

        let urls: Vec<String> = run.outcomes.iter().map(|o| o.url().to_string()).collect();
        let unique: BTreeSet<String> = urls.iter().cloned().collect();
        let expected: BTreeSet<String> = [seed.clone(), site.url("/a"), site.url("/b")]
            .into_iter()
            .collect();
        assert_eq!(urls.len(), unique.len(), "{} fetched a URL twice", kind);
        assert_eq!(unique, expected, "{}", kind);
        assert_eq!(run.succeeded(), 3);

        for route in ["/", "/a", "/b"] {
            assert_eq!(site.hits(route), 1, "{} hit {} more than once", kind, route);
        }
    }
}

#[test]
fn test_follow_links_respects_max_pages() {
    let site = MockSite::start();
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    site.page("/", &format!("<title>Index</title>{}", links));
    for i in 0..10 {
        site.page(&format!("/p{}", i), "<title>Leaf</title>");
    }

    let seed = site.url("/");
    for kind in StrategyKind::ALL {
        let mut config = test_config(vec![seed.clone()]);
        config.crawl.follow_links = true;
        config.crawl.max_pages = 4;

        let run = build_strategy(kind, &config)
            .run(&[seed.clone()], None)
            .unwrap();
        assert_eq!(run.total(), 4, "{}", kind);
        assert_eq!(run.succeeded(), 4, "{}", kind);
    }
}

#[test]
fn test_links_ignored_by_default() {
    let site = linked_site();
    let seed = site.url("/");
    let config = test_config(vec![seed.clone()]);

    for kind in StrategyKind::ALL {
        let run = build_strategy(kind, &config)
            .run(&[seed.clone()], None)
            .unwrap();
        assert_eq!(run.total(), 1, "{}", kind);
    }
    assert_eq!(site.hits("/a"), 0);
}
