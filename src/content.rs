use serde::{Deserialize, Serialize};

use crate::constants::PURPOSE_RULES;

/// Benefit template selected for a purpose label. Classification is driven
/// by the `PURPOSE_RULES` table rather than inline string tests, so adding a
/// purpose category means adding a rule and a template, nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurposeKind {
    GstRegistration,
    CompanyIncorporation,
}

impl PurposeKind {
    /// Classify a free-text purpose label. Returns `None` for labels no rule
    /// matches; those pages get an empty benefits section.
    pub fn classify(label: &str) -> Option<Self> {
        let normalized = label.to_lowercase();
        PURPOSE_RULES
            .iter()
            .find(|(pattern, _)| normalized.contains(pattern))
            .map(|(_, kind)| *kind)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhyUsItem {
    pub title: String,
    pub description: String,
}

/// Everything the template engine derives for one (area, city, purpose)
/// combination. Pure data, ready to submit as a page candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageContent {
    pub slug: String,
    pub overview: String,
    pub benefits: Vec<String>,
    pub why_us: Vec<WhyUsItem>,
}

/// Lower-cases the input and collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen. Never produces leading, trailing, or
/// doubled hyphens. Idempotent.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut gap = false;
    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(ch);
        } else {
            gap = true;
        }
    }
    slug
}

/// Routable slug for an area/purpose pair. Degenerate (empty) inputs still
/// yield a valid slug with no hyphen artifacts.
pub fn page_slug(area: &str, purpose: &str) -> String {
    let parts = [slugify(area), slugify(purpose)];
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("-")
}

pub fn compose(area: &str, city: &str, purpose: &str) -> PageContent {
    PageContent {
        slug: page_slug(area, purpose),
        overview: overview_paragraph(area, city, purpose),
        benefits: benefit_list(area, city, purpose),
        why_us: why_us_list(area, city, purpose),
    }
}

pub fn overview_paragraph(area: &str, city: &str, purpose: &str) -> String {
    format!(
        "Looking for a virtual office in {area}, {city} for {purpose}? Deskhaven gives your \
         business a prestigious {area} address without the cost of a physical workspace. Our \
         {city} centre handles the paperwork end to end — address proof, agreements, and the \
         supporting documents {purpose} requires — so you can get compliant in days, not weeks, \
         while your mail and couriers are received professionally at the centre."
    )
}

pub fn benefit_list(area: &str, city: &str, purpose: &str) -> Vec<String> {
    match PurposeKind::classify(purpose) {
        Some(PurposeKind::GstRegistration) => gst_benefits(area, city),
        Some(PurposeKind::CompanyIncorporation) => incorporation_benefits(area, city, purpose),
        None => Vec::new(),
    }
}

fn gst_benefits(area: &str, city: &str) -> Vec<String> {
    vec![
        format!("Premium business address in {area}, {city} accepted by GST authorities"),
        "Complete documentation kit — rent agreement, NOC, and utility bill for your application"
            .to_string(),
        "Expert assistance with GST filing and responses to officer queries".to_string(),
        format!("Mail and courier handling at your {area} address with same-day alerts"),
        "Re-submission support if the GST officer raises objections on your documents".to_string(),
        format!("Save up to 90% over renting a physical office in {city}"),
        "Registration documents issued within 3-5 working days".to_string(),
        "Dedicated compliance desk for amendments and additional place of business".to_string(),
    ]
}

fn incorporation_benefits(area: &str, city: &str, purpose: &str) -> Vec<String> {
    vec![
        format!("MCA-compliant registered office address in {area}, {city}"),
        "End-to-end incorporation support including DSC and DIN assistance".to_string(),
        "MOA and AOA drafting reviewed by experienced professionals".to_string(),
        format!("ROC filing support for the {city} jurisdiction"),
        format!("Use your {area} address on letterheads, invoices, and bank accounts"),
        format!("Step-by-step guidance through {purpose} with a named advisor"),
        "Incorporation certificate support within 7-10 working days".to_string(),
        "Post-incorporation compliance calendar for your first year".to_string(),
    ]
}

/// The why-us block is the same eight cards on every page, only the
/// interpolated names change.
pub fn why_us_list(area: &str, city: &str, purpose: &str) -> Vec<WhyUsItem> {
    let item = |title: &str, description: String| WhyUsItem {
        title: title.to_string(),
        description,
    };
    vec![
        item(
            "Prime Location",
            format!("Our {area} centre sits in one of {city}'s best known commercial hubs."),
        ),
        item(
            "Compliance First",
            format!("Every document we issue is vetted for {purpose} acceptance before it reaches you."),
        ),
        item(
            "Full-Service Desk",
            "Address, mail handling, meeting rooms, and registration support under one plan."
                .to_string(),
        ),
        item(
            "Proven Track Record",
            format!("Thousands of businesses registered from our {city} centres."),
        ),
        item(
            "Transparent Pricing",
            "Flat plans with no lock-in and no surprise charges at renewal.".to_string(),
        ),
        item(
            "Fast Turnaround",
            format!("Documents for {purpose} are typically ready within a week."),
        ),
        item(
            "Flexible Plans",
            "Upgrade, downgrade, or add cities to your plan at any point.".to_string(),
        ),
        item(
            "Pan-India Presence",
            format!("Centres across major metros, so expanding beyond {city} takes one call."),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Koramangala 5th Block"), "koramangala-5th-block");
        assert_eq!(slugify("GST Registration"), "gst-registration");
    }

    #[test]
    fn slugify_collapses_symbol_runs() {
        assert_eq!(slugify("  Baner -- West!  "), "baner-west");
        assert_eq!(slugify("A&B (Phase-2)"), "a-b-phase-2");
    }

    #[test]
    fn slugify_is_idempotent() {
        let once = slugify("HSR Layout, Sector 7");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn page_slug_matches_expected_shape() {
        assert_eq!(
            page_slug("Koramangala 5th Block", "GST Registration"),
            "koramangala-5th-block-gst-registration"
        );
    }

    #[test]
    fn page_slug_is_deterministic_and_clean() {
        let a = page_slug("Viman Nagar", "Company Registration");
        let b = page_slug("Viman Nagar", "Company Registration");
        assert_eq!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!a.starts_with('-') && !a.ends_with('-'));
        assert!(!a.contains("--"));
    }

    #[test]
    fn page_slug_tolerates_empty_inputs() {
        assert_eq!(page_slug("", "GST Registration"), "gst-registration");
        assert_eq!(page_slug("Baner", ""), "baner");
        assert_eq!(page_slug("", ""), "");
    }

    #[test]
    fn gst_purposes_get_eight_benefits() {
        for label in ["GST Registration", "gst registration", "New GST Number"] {
            assert_eq!(benefit_list("Baner", "Pune", label).len(), 8, "{label}");
        }
    }

    #[test]
    fn incorporation_purposes_get_a_distinct_eight() {
        let gst = benefit_list("Baner", "Pune", "GST Registration");
        let inc = benefit_list("Baner", "Pune", "Company Registration");
        assert_eq!(inc.len(), 8);
        assert_ne!(gst, inc);
    }

    #[test]
    fn unknown_purpose_yields_empty_benefits() {
        assert!(benefit_list("Baner", "Pune", "Mail Handling").is_empty());
        assert!(benefit_list("Baner", "Pune", "").is_empty());
    }

    #[test]
    fn why_us_is_always_eight_titled_cards() {
        let cards = why_us_list("Hinjewadi", "Pune", "Business Address");
        assert_eq!(cards.len(), 8);
        assert!(cards.iter().all(|card| !card.title.is_empty()));
    }

    #[test]
    fn classify_reads_the_rule_table_case_insensitively() {
        assert_eq!(
            PurposeKind::classify("GST REGISTRATION"),
            Some(PurposeKind::GstRegistration)
        );
        assert_eq!(
            PurposeKind::classify("Private Company Registration"),
            Some(PurposeKind::CompanyIncorporation)
        );
        assert_eq!(PurposeKind::classify("Coworking Desk"), None);
    }

    #[test]
    fn compose_assembles_all_sections() {
        let content = compose("Baner", "Pune", "GST Registration");
        assert_eq!(content.slug, "baner-gst-registration");
        assert!(content.overview.contains("Baner"));
        assert!(content.overview.contains("Pune"));
        assert_eq!(content.benefits.len(), 8);
        assert_eq!(content.why_us.len(), 8);
    }
}
