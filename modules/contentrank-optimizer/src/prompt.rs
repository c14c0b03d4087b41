//! Prompt templates for the Claude-backed reviser.

use contentrank_rubric::RubricThresholds;

use crate::traits::RevisionRequest;

pub fn revision_system(t: &RubricThresholds) -> String {
    format!(
        "You are an SEO editor revising web content so it passes a fixed on-page rubric. \
         Content may be Turkish or English; always answer in the language of the content.\n\n\
         The rubric checks, for the focus keyword:\n\
         - the keyword appears in the title, meta title, meta description and slug\n\
         - keyword density in the body text is between {density_min}% and {density_max}%\n\
         - meta title is {mt_min}-{mt_max} characters\n\
         - meta description is {md_min}-{md_max} characters\n\
         - body has at least {words} words\n\
         - the keyword appears in at least one heading (h1-h6)\n\
         - the document has an image\n\n\
         Fix ONLY the failing checks you are given. Return only the fields you change; \
         omit fields that are already fine. Never return an empty field. \
         Keep body markup as HTML with the existing structure. \
         Slugs are lowercase ASCII words joined by hyphens.",
        density_min = t.density_min,
        density_max = t.density_max,
        mt_min = t.meta_title_min,
        mt_max = t.meta_title_max,
        md_min = t.meta_description_min,
        md_max = t.meta_description_max,
        words = t.min_word_count,
    )
}

pub fn revision_user(request: &RevisionRequest) -> String {
    let failing = if request.failing_checks.is_empty() {
        "- (none)".to_string()
    } else {
        request
            .failing_checks
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "## Focus keyword\n{keyword}\n\n\
         ## Failing checks\n{failing}\n\n\
         ## Title\n{title}\n\n\
         ## Meta title\n{meta_title}\n\n\
         ## Meta description\n{meta_description}\n\n\
         ## Slug\n{slug}\n\n\
         ## Body markup\n{body}\n\n\
         Return JSON with any subset of: \
         {{\"title\": \"string\", \"bodyMarkup\": \"string\", \"metaTitle\": \"string\", \
         \"metaDescription\": \"string\", \"slug\": \"string\"}}",
        keyword = request.focus_keyword,
        title = request.title,
        meta_title = request.meta_title,
        meta_description = request.meta_description,
        slug = request.slug,
        body = request.body_markup,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_reflects_thresholds() {
        let system = revision_system(&RubricThresholds::default());
        assert!(system.contains("between 1% and 3%"));
        assert!(system.contains("50-60 characters"));
        assert!(system.contains("120-160 characters"));
        assert!(system.contains("at least 300 words"));
    }

    #[test]
    fn user_prompt_lists_failing_checks() {
        let request = RevisionRequest {
            title: "T".into(),
            body_markup: "<p>b</p>".into(),
            focus_keyword: "beton".into(),
            meta_title: "M".into(),
            meta_description: "D".into(),
            slug: "s".into(),
            failing_checks: vec![
                "Meta title length: 1/60 characters — too short".into(),
                "Has media: no cover image and no image in body".into(),
            ],
            thresholds: RubricThresholds::default(),
        };
        let user = revision_user(&request);
        assert!(user.contains("## Focus keyword\nbeton"));
        assert!(user.contains("- Meta title length: 1/60 characters — too short\n- Has media"));
        assert!(user.contains("\"metaDescription\""));
    }
}
