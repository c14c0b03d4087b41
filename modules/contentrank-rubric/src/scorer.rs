//! The weighted rubric: ten fixed checks summed into a 0-100 score.

use serde::{Deserialize, Serialize};

use contentrank_common::{
    fold_case, AnalysisResult, CheckKind, CheckResult, ContentDocument, FocusKeyword,
};

use crate::extract::{contains_image, extract};
use crate::keyword::{measure, KeywordStats};
use crate::terms::top_terms;

/// Pass ranges for the measured checks. All bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricThresholds {
    pub density_min: f64,
    pub density_max: f64,
    pub meta_title_min: usize,
    pub meta_title_max: usize,
    pub meta_description_min: usize,
    pub meta_description_max: usize,
    pub min_word_count: usize,
}

impl Default for RubricThresholds {
    fn default() -> Self {
        Self {
            density_min: 1.0,
            density_max: 3.0,
            meta_title_min: 50,
            meta_title_max: 60,
            meta_description_min: 120,
            meta_description_max: 160,
            min_word_count: 300,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RubricScorer {
    thresholds: RubricThresholds,
}

/// Score with the default thresholds.
pub fn analyze(document: &ContentDocument, keyword: &FocusKeyword) -> AnalysisResult {
    RubricScorer::default().analyze(document, keyword)
}

impl RubricScorer {
    pub fn new(thresholds: RubricThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RubricThresholds {
        &self.thresholds
    }

    pub fn analyze(&self, document: &ContentDocument, keyword: &FocusKeyword) -> AnalysisResult {
        if keyword.is_empty() {
            return AnalysisResult::zero();
        }

        let extracted = extract(&document.body_markup);
        let stats = measure(&extracted.text, keyword);
        let t = &self.thresholds;

        let checks = vec![
            contains_check(CheckKind::KeywordInTitle, "title", &document.title, keyword),
            contains_check(CheckKind::KeywordInMetaTitle, "meta title", &document.meta_title, keyword),
            contains_check(
                CheckKind::KeywordInMetaDescription,
                "meta description",
                &document.meta_description,
                keyword,
            ),
            slug_check(&document.slug, keyword),
            density_check(&stats, t),
            length_check(
                CheckKind::MetaTitleLength,
                &document.meta_title,
                t.meta_title_min,
                t.meta_title_max,
            ),
            length_check(
                CheckKind::MetaDescriptionLength,
                &document.meta_description,
                t.meta_description_min,
                t.meta_description_max,
            ),
            word_count_check(stats.word_count, t.min_word_count),
            heading_check(&extracted.headings, keyword),
            media_check(document),
        ];

        let score = checks.iter().filter(|c| c.passed).map(|c| c.weight).sum();

        AnalysisResult {
            score,
            checks,
            keyword_density: stats.density,
            keyword_occurrences: stats.occurrences,
            word_count: stats.word_count,
            top_terms: top_terms(&extracted.text),
        }
    }
}

fn contains_check(kind: CheckKind, field: &str, value: &str, keyword: &FocusKeyword) -> CheckResult {
    if fold_case(value).contains(keyword.as_str()) {
        CheckResult::new(kind, true, format!("\"{keyword}\" found in {field}"))
    } else if value.trim().is_empty() {
        CheckResult::new(kind, false, format!("{field} is empty"))
    } else {
        CheckResult::new(kind, false, format!("\"{keyword}\" missing from {field} \"{value}\""))
    }
}

fn slug_check(slug: &str, keyword: &FocusKeyword) -> CheckResult {
    let wanted = slugify(keyword.as_str());
    let actual = slugify(slug);
    let passed = !wanted.is_empty() && actual.contains(&wanted);
    let detail = if passed {
        format!("\"{wanted}\" found in slug")
    } else if slug.trim().is_empty() {
        "slug is empty".to_string()
    } else {
        format!("\"{wanted}\" missing from slug \"{slug}\"")
    };
    CheckResult::new(CheckKind::KeywordInSlug, passed, detail)
}

fn density_check(stats: &KeywordStats, t: &RubricThresholds) -> CheckResult {
    let density = stats.density;
    let measured = format!(
        "{density:.2}% ({} of {} words, target {}-{}%)",
        stats.occurrences, stats.word_count, t.density_min, t.density_max
    );
    let (passed, detail) = if density < t.density_min {
        (false, format!("{measured} — too low"))
    } else if density > t.density_max {
        (false, format!("{measured} — too high"))
    } else {
        (true, measured)
    };
    CheckResult::new(CheckKind::KeywordDensity, passed, detail)
}

fn length_check(kind: CheckKind, value: &str, min: usize, max: usize) -> CheckResult {
    let len = value.chars().count();
    let measured = format!("{len}/{max} characters");
    let (passed, detail) = if len < min {
        (false, format!("{measured} — too short"))
    } else if len > max {
        (false, format!("{measured} — too long"))
    } else {
        (true, measured)
    };
    CheckResult::new(kind, passed, detail)
}

fn word_count_check(words: usize, min: usize) -> CheckResult {
    let measured = format!("{words} words (minimum {min})");
    if words >= min {
        CheckResult::new(CheckKind::BodyWordCount, true, measured)
    } else {
        CheckResult::new(CheckKind::BodyWordCount, false, format!("{measured} — too short"))
    }
}

fn heading_check(headings: &[String], keyword: &FocusKeyword) -> CheckResult {
    let hits = headings
        .iter()
        .filter(|h| fold_case(h).contains(keyword.as_str()))
        .count();
    let detail = if headings.is_empty() {
        "no headings in body".to_string()
    } else if hits == 0 {
        format!("\"{keyword}\" in none of {} headings", headings.len())
    } else {
        format!("\"{keyword}\" in {hits} of {} headings", headings.len())
    };
    CheckResult::new(CheckKind::KeywordInHeading, hits > 0, detail)
}

fn media_check(document: &ContentDocument) -> CheckResult {
    let (passed, detail) = if document.has_external_media {
        (true, "cover image set")
    } else if contains_image(&document.body_markup) {
        (true, "image in body")
    } else {
        (false, "no cover image and no image in body")
    };
    CheckResult::new(CheckKind::HasMedia, passed, detail)
}

/// URL slug form: case-folded, Turkish letters transliterated to ASCII, every
/// run of other non-alphanumerics collapsed to a single hyphen.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_hyphen = false;
    for c in fold_case(s).chars() {
        let mapped = match c {
            'ı' | 'î' => 'i',
            'ş' => 's',
            'ğ' => 'g',
            'ü' | 'û' => 'u',
            'ö' => 'o',
            'ç' => 'c',
            'â' => 'a',
            other => other,
        };
        if mapped.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(mapped);
        } else {
            pending_hyphen = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(s: &str) -> FocusKeyword {
        FocusKeyword::new(s)
    }

    fn padded(base: &str, len: usize) -> String {
        let have = base.chars().count();
        format!("{base}{}", "x".repeat(len.saturating_sub(have)))
    }

    fn sample_document() -> ContentDocument {
        let paragraph = format!("<p>beton duvar {}</p>", "zemin ".repeat(98));
        ContentDocument {
            title: "Beton Rehberi".into(),
            body_markup: format!("<h2>Beton nedir</h2>{}", paragraph.repeat(3)),
            meta_title: padded("Beton ", 55),
            meta_description: padded("Beton ", 140),
            slug: "beton-rehberi".into(),
            has_external_media: false,
        }
    }

    #[test]
    fn checks_run_in_fixed_order_with_fixed_weights() {
        let analysis = analyze(&sample_document(), &kw("beton"));
        let kinds: Vec<CheckKind> = analysis.checks.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, CheckKind::ALL.to_vec());
        let weights: Vec<u32> = analysis.checks.iter().map(|c| c.weight).collect();
        assert_eq!(weights, vec![15, 10, 10, 10, 10, 10, 10, 5, 10, 10]);
    }

    #[test]
    fn score_is_sum_of_passed_weights() {
        let analysis = analyze(&sample_document(), &kw("beton"));
        let expected: u32 = analysis.checks.iter().filter(|c| c.passed).map(|c| c.weight).sum();
        assert_eq!(analysis.score, expected);
        // Only media is missing; density is 4 of 302 words.
        assert!(!analysis.check(CheckKind::HasMedia).unwrap().passed);
        assert_eq!(analysis.score, 90);
    }

    #[test]
    fn body_image_satisfies_media_check() {
        let mut doc = sample_document();
        doc.body_markup.push_str("<img src=\"wall.jpg\" alt=\"\">");
        let analysis = analyze(&doc, &kw("beton"));
        let media = analysis.check(CheckKind::HasMedia).unwrap();
        assert!(media.passed);
        assert_eq!(media.detail, "image in body");
        assert_eq!(analysis.score, 100);
    }

    #[test]
    fn length_details_report_measured_value() {
        let short = length_check(CheckKind::MetaTitleLength, &"a".repeat(47), 50, 60);
        assert!(!short.passed);
        assert_eq!(short.detail, "47/60 characters — too short");

        let long = length_check(CheckKind::MetaTitleLength, &"a".repeat(61), 50, 60);
        assert_eq!(long.detail, "61/60 characters — too long");

        let edge = length_check(CheckKind::MetaDescriptionLength, &"a".repeat(120), 120, 160);
        assert!(edge.passed);
        assert_eq!(edge.detail, "120/160 characters");
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let turkish = "ğ".repeat(55);
        assert!(turkish.len() > 60);
        assert!(length_check(CheckKind::MetaTitleLength, &turkish, 50, 60).passed);
    }

    #[test]
    fn density_bounds_are_inclusive() {
        let t = RubricThresholds::default();
        let at = |density| KeywordStats {
            occurrences: 1,
            word_count: 100,
            density,
        };
        assert!(density_check(&at(1.0), &t).passed);
        assert!(density_check(&at(3.0), &t).passed);
        let low = density_check(&at(0.99), &t);
        assert!(!low.passed);
        assert!(low.detail.ends_with("too low"), "{}", low.detail);
        let high = density_check(&at(3.01), &t);
        assert!(high.detail.ends_with("too high"), "{}", high.detail);
    }

    #[test]
    fn slug_check_transliterates_turkish_keyword() {
        assert_eq!(slugify("istinat duvarı"), "istinat-duvari");
        assert_eq!(slugify("  Çift -- Şerit!  "), "cift-serit");
        assert!(slug_check("istinat-duvari-rehberi", &kw("istinat duvarı")).passed);
        assert!(!slug_check("duvar-rehberi", &kw("istinat duvarı")).passed);
    }

    #[test]
    fn heading_check_reports_hits() {
        let headings = vec!["Beton nedir".to_string(), "Maliyet".to_string()];
        let check = heading_check(&headings, &kw("beton"));
        assert!(check.passed);
        assert_eq!(check.detail, "\"beton\" in 1 of 2 headings");
        assert!(!heading_check(&[], &kw("beton")).passed);
    }

    #[test]
    fn custom_thresholds_change_pass_ranges() {
        let strict = RubricScorer::new(RubricThresholds {
            min_word_count: 1000,
            ..RubricThresholds::default()
        });
        let analysis = strict.analyze(&sample_document(), &kw("beton"));
        assert!(!analysis.check(CheckKind::BodyWordCount).unwrap().passed);
    }

    #[test]
    fn blank_keyword_yields_zero_analysis() {
        assert_eq!(analyze(&sample_document(), &kw("   ")), AnalysisResult::zero());
    }
}
