//! Scenario-driven rubric tests.
//!
//! Pure functions, no network. A realistic Turkish guide page is scored as-is
//! and with single fields broken.
//!
//! Run with: cargo test -p contentrank-rubric --test rubric_scenarios_test

use contentrank_rubric::{analyze, extract, measure, AnalysisResult, CheckKind, ContentDocument, FocusKeyword};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const FILLER: &[&str] = &["zemin", "beton", "drenaj", "temel", "yapı", "eğim", "taş", "proje"];
const TITLE_BASE: &str = "İstinat Duvarı Rehberi: Yapımı ve Maliyeti";
const DESCRIPTION_BASE: &str = "İstinat duvarı nedir, nasıl yapılır ve maliyeti ne kadar? ";
const PADDING: &str = " Uzman önerileri, malzeme seçimi ve uygulama adımları";

/// `base` extended with padding text to exactly `len` characters.
fn fit(base: &str, len: usize) -> String {
    base.chars().chain(PADDING.chars().cycle()).take(len).collect()
}

/// 1802 words, the phrase 32 times, 5 headings carrying the phrase.
fn guide_body() -> String {
    let mut body = String::new();
    for p in 0..27 {
        if p < 5 {
            body.push_str("<h2>İstinat Duvarı Uygulama Notları</h2>");
        }
        let words: Vec<&str> = (0..64).map(|i| FILLER[(p + i) % FILLER.len()]).collect();
        body.push_str(&format!("<p>{} istinat duvarı</p>\n", words.join(" ")));
    }
    body
}

fn guide_document() -> ContentDocument {
    ContentDocument {
        title: "İstinat Duvarı Rehberi".into(),
        body_markup: guide_body(),
        meta_title: fit(TITLE_BASE, 55),
        meta_description: fit(DESCRIPTION_BASE, 140),
        slug: "istinat-duvari-rehberi".into(),
        has_external_media: true,
    }
}

fn keyword() -> FocusKeyword {
    FocusKeyword::new("istinat duvarı")
}

fn passed_weight_sum(analysis: &AnalysisResult) -> u32 {
    analysis.checks.iter().filter(|c| c.passed).map(|c| c.weight).sum()
}

// ===========================================================================
// Complete guide page
// ===========================================================================

#[test]
fn complete_guide_scores_one_hundred() {
    let doc = guide_document();
    assert_eq!(doc.meta_title.chars().count(), 55);
    assert_eq!(doc.meta_description.chars().count(), 140);

    let analysis = analyze(&doc, &keyword());

    let failing: Vec<String> = analysis.failing_checks().map(|c| c.summary()).collect();
    assert!(failing.is_empty(), "unexpected failures: {failing:?}");
    assert_eq!(analysis.score, 100);
    assert_eq!(analysis.checks.len(), 10);
    assert_eq!(analysis.keyword_occurrences, 32);
    assert_eq!(analysis.word_count, 1802);
    assert!(analysis.keyword_density >= 1.0 && analysis.keyword_density <= 3.0);
    assert_eq!(
        analysis.check(CheckKind::KeywordInHeading).unwrap().detail,
        "\"istinat duvarı\" in 5 of 5 headings"
    );
}

#[test]
fn top_terms_are_diagnostic_only() {
    let analysis = analyze(&guide_document(), &keyword());
    assert!(!analysis.top_terms.is_empty());
    assert!(analysis.top_terms.len() <= 5);
    assert!(analysis
        .top_terms
        .windows(2)
        .all(|pair| pair[0].count >= pair[1].count));
    assert_eq!(analysis.score, passed_weight_sum(&analysis));
}

// ===========================================================================
// Short meta title
// ===========================================================================

#[test]
fn short_meta_title_fails_only_the_length_check() {
    let mut doc = guide_document();
    doc.meta_title = fit(TITLE_BASE, 30);

    let analysis = analyze(&doc, &keyword());

    let failing: Vec<CheckKind> = analysis.failing_checks().map(|c| c.kind).collect();
    assert_eq!(failing, vec![CheckKind::MetaTitleLength]);
    assert_eq!(
        analysis.check(CheckKind::MetaTitleLength).unwrap().detail,
        "30/60 characters — too short"
    );
    assert_eq!(analysis.score, 100 - CheckKind::MetaTitleLength.weight());
    assert_eq!(analysis.score, 90);
}

#[test]
fn each_broken_field_costs_exactly_its_weight() {
    let broken = [
        CheckKind::KeywordInTitle,
        CheckKind::KeywordInSlug,
        CheckKind::MetaDescriptionLength,
        CheckKind::HasMedia,
    ];

    for kind in broken {
        let mut doc = guide_document();
        match kind {
            CheckKind::KeywordInTitle => doc.title = "Bahçe Rehberi".into(),
            CheckKind::KeywordInSlug => doc.slug = "bahce-rehberi".into(),
            CheckKind::MetaDescriptionLength => doc.meta_description = fit(DESCRIPTION_BASE, 170),
            CheckKind::HasMedia => doc.has_external_media = false,
            _ => unreachable!(),
        }
        let analysis = analyze(&doc, &keyword());
        let failing: Vec<CheckKind> = analysis.failing_checks().map(|c| c.kind).collect();
        assert_eq!(failing, vec![kind], "breaking {kind:?}");
        assert_eq!(analysis.score, 100 - kind.weight());
        assert_eq!(analysis.score, passed_weight_sum(&analysis));
    }
}

#[test]
fn stuffed_body_fails_density_high() {
    let mut doc = guide_document();
    doc.body_markup
        .push_str(&format!("<p>{}</p>", "istinat duvarı ".repeat(40)));
    let analysis = analyze(&doc, &keyword());
    let density = analysis.check(CheckKind::KeywordDensity).unwrap();
    assert!(!density.passed);
    assert!(density.detail.ends_with("too high"), "{}", density.detail);
}

#[test]
fn thin_body_fails_word_count_and_headings() {
    let mut doc = guide_document();
    doc.body_markup = "<p>istinat duvarı kısa metin burada</p>".into();
    let analysis = analyze(&doc, &keyword());
    assert!(!analysis.check(CheckKind::BodyWordCount).unwrap().passed);
    assert_eq!(
        analysis.check(CheckKind::KeywordInHeading).unwrap().detail,
        "no headings in body"
    );
    assert!(analysis.score <= 100 - 5 - 10);
}

#[test]
fn keyword_inside_attributes_is_not_counted() {
    let mut doc = guide_document();
    doc.body_markup = r#"<p title="x > istinat duvarı istinat duvarı">word word</p>"#.into();
    let analysis = analyze(&doc, &keyword());
    assert_eq!(analysis.keyword_occurrences, 0);
    assert_eq!(analysis.word_count, 2);
    assert!(!analysis.check(CheckKind::KeywordDensity).unwrap().passed);
}

#[test]
fn image_alt_text_does_not_pad_the_body() {
    let mut doc = guide_document();
    doc.has_external_media = false;
    let alt = "istinat duvarı ".repeat(40);
    doc.body_markup
        .push_str(&format!(r#"<p><img alt="> {alt}" src="duvar.png"></p>"#));

    let analysis = analyze(&doc, &keyword());
    assert_eq!(analysis.keyword_occurrences, 32);
    assert_eq!(analysis.word_count, 1802);
    assert!(analysis.check(CheckKind::HasMedia).unwrap().passed);
    assert_eq!(analysis.score, 100);
}

// ===========================================================================
// Blank keyword
// ===========================================================================

#[test]
fn blank_keyword_yields_zero_analysis() {
    for raw in ["", "   ", "\n\t"] {
        let analysis = analyze(&guide_document(), &FocusKeyword::new(raw));
        assert_eq!(analysis, AnalysisResult::zero());
    }
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn scoring_is_deterministic() {
    let doc = guide_document();
    let first = analyze(&doc, &keyword());
    let second = analyze(&doc, &keyword());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn single_word_density_round_trips() {
    for (k, n) in [(1usize, 1usize), (3, 10), (7, 250), (0, 12)] {
        let mut tokens = vec!["beton"; k];
        tokens.extend(std::iter::repeat("zemin").take(n - k));
        let text = tokens.join(" ");
        let stats = measure(&text, &FocusKeyword::new("beton"));
        assert_eq!(stats.occurrences, k);
        let expected = k as f64 / n as f64 * 100.0;
        assert!((stats.density - expected).abs() < 1e-9, "k={k} n={n}");
    }
}

#[test]
fn single_word_keyword_counts_longer_words() {
    let text = extract(&guide_body()).text;
    // "duvar" is a substring of every "duvarı".
    let stats = measure(&text, &FocusKeyword::new("duvar"));
    assert_eq!(stats.occurrences, 32);
}

#[test]
fn score_stays_within_bounds_for_degenerate_documents() {
    let docs = [
        ContentDocument::default(),
        ContentDocument {
            body_markup: "<h1><p><img".into(),
            ..Default::default()
        },
        guide_document(),
    ];
    for doc in &docs {
        let analysis = analyze(doc, &keyword());
        assert!(analysis.score <= 100);
        assert_eq!(analysis.score, passed_weight_sum(&analysis));
        assert_eq!(analysis.checks.len(), 10);
    }
}
