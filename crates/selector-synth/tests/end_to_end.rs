//! End-to-end behavior of the synthesis engine over parsed HTML
#![cfg(feature = "html")]

use pretty_assertions::assert_eq;
use scraper::ElementRef;
use selector_synth::html::{HtmlDocument, HtmlTree};
use selector_synth::{Candidate, DomTree, SelectorPath, SelectorSynth, SynthOptions};

const SUBMIT_FORM: &str = r#"<html><body>
    <div id="app">
        <section class="css-x7z2a1">
            <button data-testid="submit-btn">Submit</button>
        </section>
    </div>
</body></html>"#;

const QUEUE: &str = r#"<html><body>
    <ul>
        <li class="item">First track</li>
        <li class="item">Second track</li>
    </ul>
</body></html>"#;

fn parse(html: &str) -> HtmlDocument {
    HtmlDocument::parse_document(html)
}

/// Positional candidates resolving to exactly `target`.
fn positional_for<'a>(
    tree: &HtmlTree<'a>,
    list: &[Candidate],
    target: ElementRef<'a>,
) -> Vec<String> {
    list.iter()
        .filter(|c| c.expression.contains(":nth-"))
        .filter(|c| tree.query(&c.expression).unwrap() == vec![target])
        .map(|c| c.expression.clone())
        .collect()
}

#[test]
fn test_attribute_leads_and_hashed_class_never_leaks() {
    let doc = parse(SUBMIT_FORM);
    let tree = HtmlTree::new(&doc);
    let button = tree.select_first("button").unwrap().unwrap();

    let ranked = SelectorSynth::default().suggest(&tree, button);

    assert_eq!(ranked[0].expression, r#"[data-testid="submit-btn"]"#);
    assert!(ranked[0].score >= 90, "top score {}", ranked[0].score);
    assert!(ranked.iter().all(|r| !r.expression.contains("css-x7z2a1")));

    let numeric = ranked
        .iter()
        .position(|r| r.expression == "div#app > section:nth-child(1) > button:nth-child(1)")
        .expect("positional candidate present");
    assert!(numeric > 0);
    assert!(ranked[numeric].score < ranked[0].score);
}

#[test]
fn usable_unique_id_scores_high() {
    let doc = parse(
        r#"<html><body><form><button id="checkout-button" class="btn mt-4">Pay</button></form></body></html>"#,
    );
    let tree = HtmlTree::new(&doc);
    let button = tree.select_first("button").unwrap().unwrap();

    let ranked = SelectorSynth::default().suggest(&tree, button);
    let id = ranked
        .iter()
        .find(|r| r.expression == "#checkout-button")
        .expect("id candidate");
    assert!(id.score >= 85);
    assert_eq!(ranked[0].expression, "#checkout-button");
}

#[test]
fn hash_like_unique_id_is_still_offered() {
    let doc = parse(r#"<html><body><main><button id="a8f3b2c9d1">Go</button></main></body></html>"#);
    let tree = HtmlTree::new(&doc);
    let button = tree.select_first("button").unwrap().unwrap();

    let ranked = SelectorSynth::default().suggest(&tree, button);
    assert_eq!(ranked[0].expression, "#a8f3b2c9d1");
    assert!(ranked[0].score >= 85, "top score {}", ranked[0].score);
}

#[test]
fn hashed_classes_never_appear() {
    let doc = parse(
        r#"<html><body><div class="css-a1b2c3 player"><span class="css-a1b2c3 title">x</span></div></body></html>"#,
    );
    let tree = HtmlTree::new(&doc);
    let synth = SelectorSynth::default();
    for target in ["div", "span"] {
        let node = tree.select_first(target).unwrap().unwrap();
        let candidates = synth.generate(&tree, node);
        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| !c.expression.contains("css-a1b2c3")));
    }
}

#[test]
fn generation_is_idempotent() {
    let doc = parse(SUBMIT_FORM);
    let tree = HtmlTree::new(&doc);
    let synth = SelectorSynth::default();
    for target in ["button", "section", "#app"] {
        let node = tree.select_first(target).unwrap().unwrap();
        assert_eq!(synth.generate(&tree, node), synth.generate(&tree, node));
    }
}

#[test]
fn every_candidate_resolves_to_the_target() {
    let doc = parse(
        r#"<html><body>
        <header id="top"><nav class="menu"><a class="menu-link" data-role="home">Home</a><a class="menu-link">About</a></nav></header>
        <main><article class="card card--featured"><h2 class="card__title">News</h2><p>Body</p></article>
        <article class="card"><h2 class="card__title">Other</h2><p>Body</p></article></main>
        </body></html>"#,
    );
    let tree = HtmlTree::new(&doc);
    let synth = SelectorSynth::default();

    let targets = tree.query("a, h2, p, article").unwrap();
    for target in targets {
        for candidate in synth.generate(&tree, target) {
            assert!(candidate.is_unique);
            assert!(candidate.score <= 100);
            let matches = tree.query(&candidate.expression).unwrap();
            assert_eq!(
                matches.first(),
                Some(&target),
                "{} does not lead with its target",
                candidate.expression
            );
            if matches.len() > 1 {
                // only the relaxed rule may admit several matches, and never
                // for a bare tag
                let path = SelectorPath::parse(&candidate.expression).unwrap();
                assert!(!path.is_bare_tag(), "{}", candidate.expression);
            }
        }
    }
}

#[test]
fn identical_node_sets_keep_only_protected_pairs() {
    let doc = parse(
        r#"<html><body><div><span id="track-title" class="track-title">Song</span></div></body></html>"#,
    );
    let tree = HtmlTree::new(&doc);
    let span = tree.select_first("span").unwrap().unwrap();
    let candidates = SelectorSynth::default().generate(&tree, span);

    for (i, a) in candidates.iter().enumerate() {
        for b in candidates.iter().skip(i + 1) {
            let left = tree.query(&a.expression).unwrap();
            let right = tree.query(&b.expression).unwrap();
            if left == right {
                assert!(
                    a.tags.is_protected() && b.tags.is_protected(),
                    "{} and {} resolve identically",
                    a.expression,
                    b.expression
                );
            }
        }
    }
    assert!(candidates
        .iter()
        .any(|c| c.expression == "#track-title"));
}

#[test]
fn bare_markup_still_gets_a_unique_numeric_path() {
    let doc = parse(
        r#"<html><body><div><div><span>a</span><span>b</span></div><div><span>c</span></div></div></body></html>"#,
    );
    let tree = HtmlTree::new(&doc);
    let target = tree.select_nth("span", 1).unwrap().unwrap();

    let ranked = SelectorSynth::default().suggest(&tree, target);
    assert!(!ranked.is_empty());
    let fallback = ranked
        .iter()
        .find(|r| r.expression == "body > div:nth-child(1) > div:nth-child(1) > span:nth-child(2)")
        .expect("numeric fallback");
    assert_eq!(tree.query(&fallback.expression).unwrap(), vec![target]);
}

#[test]
fn positional_paths_carry_the_chain_flag() {
    let doc = parse(
        r#"<html><body><div><div><span>a</span><span>b</span></div><div><span>c</span></div></div></body></html>"#,
    );
    let tree = HtmlTree::new(&doc);
    let target = tree.select_nth("span", 1).unwrap().unwrap();

    let list = SelectorSynth::default().generate(&tree, target);
    let fallback = list
        .iter()
        .find(|c| c.expression == "body > div:nth-child(1) > div:nth-child(1) > span:nth-child(2)")
        .expect("numeric fallback");
    assert!(fallback.tags.is_smart_chain);
    assert!(fallback.tags.is_protected());
}

#[test]
fn lookalike_siblings_get_distinct_positional_selectors() {
    let doc = parse(QUEUE);
    let tree = HtmlTree::new(&doc);
    let synth = SelectorSynth::default();
    let items = tree.query("li").unwrap();
    assert_eq!(items.len(), 2);

    let first = synth.generate(&tree, items[0]);
    let second = synth.generate(&tree, items[1]);

    let first_positional = positional_for(&tree, &first, items[0]);
    let second_positional = positional_for(&tree, &second, items[1]);
    assert!(first_positional.contains(&".item:nth-child(1)".to_string()));
    assert!(second_positional.contains(&".item:nth-child(2)".to_string()));

    for candidate in &second {
        assert!(
            first.iter().all(|c| c.expression != candidate.expression),
            "{} returned for both items",
            candidate.expression
        );
    }
}

#[test]
fn relaxed_uniqueness_is_pinned() {
    // `.item` matches both entries; it is still reported for the first one
    // because the first match is the target.
    let doc = parse(QUEUE);
    let tree = HtmlTree::new(&doc);
    let items = tree.query("li").unwrap();
    let synth = SelectorSynth::default();

    let first = synth.evaluate(&tree, ".item", items[0]);
    assert!(first.is_unique);
    assert_eq!(first.matches.len(), 2);

    let second = synth.evaluate(&tree, ".item", items[1]);
    assert!(!second.is_unique);
    assert_eq!(second.score, 0);

    assert!(!synth.evaluate(&tree, "li", items[0]).is_unique);
    assert!(synth
        .generate(&tree, items[0])
        .iter()
        .any(|c| c.expression == ".item"));
}

#[test]
fn max_candidates_caps_the_list() {
    let doc = parse(
        r#"<html><body><div id="player" data-role="player">
            <span id="now" class="track-title song-name now-playing" data-testid="title" data-qa="title" data-field="title">x</span>
        </div></body></html>"#,
    );
    let tree = HtmlTree::new(&doc);
    let span = tree.select_first("span").unwrap().unwrap();

    let synth = SelectorSynth::new(SynthOptions {
        max_candidates: 3,
        ..SynthOptions::default()
    });
    let ranked = synth.suggest(&tree, span);
    assert_eq!(ranked.len(), 3);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn detached_or_foreign_targets_yield_nothing() {
    let doc = parse(SUBMIT_FORM);
    let other = parse(SUBMIT_FORM);
    let tree = HtmlTree::new(&doc);
    let foreign = HtmlTree::new(&other).select_first("button").unwrap().unwrap();

    assert!(!tree.is_attached(foreign));
    assert!(SelectorSynth::default().suggest(&tree, foreign).is_empty());
}
