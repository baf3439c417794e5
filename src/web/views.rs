use v_htmlescape::escape;

use crate::catalog::{Area, Location};
use crate::store::{BulkOutcome, DynamicPage};

#[derive(Clone, Debug)]
pub struct PricingPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
    pub ideal_for: &'static str,
    pub highlight: bool,
    pub monthly_inr: u32,
    pub yearly_inr: u32,
    pub features: &'static [&'static str],
}

pub fn standard_plans() -> Vec<PricingPlan> {
    vec![
        PricingPlan {
            id: "mail-address",
            name: "Mail Address",
            summary: "A professional business address with mail and courier handling.",
            ideal_for: "Freelancers & online sellers",
            highlight: false,
            monthly_inr: 999,
            yearly_inr: 9_999,
            features: &[
                "Premium business address on your letterheads",
                "Mail and courier receipt with same-day alerts",
                "Mail forwarding on request",
                "Meeting room access at member rates",
            ],
        },
        PricingPlan {
            id: "gst-suite",
            name: "GST Suite",
            summary: "Everything GST officers ask for, issued and re-issued until approval.",
            ideal_for: "Businesses registering for GST",
            highlight: true,
            monthly_inr: 1_499,
            yearly_inr: 14_999,
            features: &[
                "Everything in Mail Address",
                "Rent agreement, NOC, and utility bill kit",
                "GST application and officer-query support",
                "Document re-issue on objection at no charge",
            ],
        },
        PricingPlan {
            id: "registration-pro",
            name: "Registration Pro",
            summary: "Registered office plus incorporation support, end to end.",
            ideal_for: "New companies & expanding teams",
            highlight: false,
            monthly_inr: 1_999,
            yearly_inr: 19_999,
            features: &[
                "Everything in GST Suite",
                "MCA-compliant registered office documentation",
                "DSC, DIN, MOA, and AOA assistance",
                "Dedicated compliance desk for your first year",
            ],
        },
    ]
}

const PAGE_STYLE: &str = r#"
        :root {
            color-scheme: light;
        }
        body {
            margin: 0;
            font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
            background: #f8fafc;
            color: #0f172a;
        }
        main {
            width: min(1080px, 94vw);
            margin: 0 auto 4rem;
            padding: 0 1rem;
        }
        .hero {
            padding: 4rem 0 2.5rem;
        }
        .hero h1 {
            margin: 0;
            font-size: clamp(1.9rem, 4vw, 2.8rem);
            font-weight: 700;
        }
        .hero p {
            margin: 0.75rem 0 1.5rem;
            color: #475569;
            max-width: 52rem;
        }
        .cta {
            border: none;
            border-radius: 10px;
            padding: 0.85rem 1.6rem;
            font-size: 1rem;
            font-weight: 600;
            cursor: pointer;
            background: linear-gradient(135deg, #2563eb, #1d4ed8);
            color: #ffffff;
        }
        section {
            margin-top: 2.5rem;
        }
        section h2 {
            font-size: 1.4rem;
            margin-bottom: 1rem;
        }
        .benefits li {
            margin: 0.5rem 0;
            color: #1e293b;
        }
        .cards {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(230px, 1fr));
            gap: 1rem;
        }
        .card {
            background: #ffffff;
            border: 1px solid #e2e8f0;
            border-radius: 12px;
            padding: 1.1rem 1.25rem;
        }
        .card h3 {
            margin: 0 0 0.4rem;
            font-size: 1.02rem;
        }
        .card p {
            margin: 0;
            color: #475569;
            font-size: 0.92rem;
        }
        table {
            width: 100%;
            border-collapse: collapse;
            background: #ffffff;
            border: 1px solid #e2e8f0;
            border-radius: 12px;
            overflow: hidden;
        }
        th, td {
            text-align: left;
            padding: 0.85rem 1rem;
            border-top: 1px solid #e2e8f0;
            vertical-align: top;
        }
        thead th {
            border-top: none;
            background: #f1f5f9;
            font-size: 0.95rem;
        }
        th.plan-highlight, td.plan-highlight {
            background: #eff6ff;
        }
        .plan-price {
            font-size: 1.2rem;
            font-weight: 700;
        }
        .plan-features {
            margin: 0;
            padding-left: 1.1rem;
            font-size: 0.9rem;
            color: #334155;
        }
        dialog {
            border: 1px solid #e2e8f0;
            border-radius: 14px;
            padding: 1.5rem 1.75rem;
            width: min(420px, 90vw);
        }
        dialog::backdrop {
            background: rgba(15, 23, 42, 0.45);
        }
        dialog label {
            display: flex;
            flex-direction: column;
            gap: 0.4rem;
            margin: 0.9rem 0;
            font-size: 0.95rem;
        }
        dialog input {
            border: 1px solid #cbd5e1;
            border-radius: 8px;
            padding: 0.6rem 0.75rem;
            font-size: 1rem;
        }
        footer {
            margin-top: 3.5rem;
            padding-top: 1.5rem;
            border-top: 1px solid #e2e8f0;
            color: #64748b;
            font-size: 0.9rem;
        }
        footer a {
            color: #2563eb;
        }
        .notice {
            border-radius: 10px;
            padding: 0.8rem 1rem;
            margin: 1rem 0;
            font-size: 0.95rem;
        }
        .notice-success {
            background: #ecfdf5;
            color: #047857;
            border: 1px solid #a7f3d0;
        }
        .notice-error {
            background: #fef2f2;
            color: #b91c1c;
            border: 1px solid #fecaca;
        }
        .badge {
            display: inline-block;
            padding: 0.25rem 0.7rem;
            border-radius: 999px;
            font-size: 0.8rem;
        }
        .badge-active {
            background: #ecfdf5;
            color: #047857;
        }
        .badge-hidden {
            background: #f1f5f9;
            color: #64748b;
        }
        fieldset {
            border: 1px solid #e2e8f0;
            border-radius: 12px;
            margin: 1rem 0;
            padding: 1rem 1.25rem;
            background: #ffffff;
        }
        fieldset legend {
            font-weight: 600;
            padding: 0 0.4rem;
        }
        fieldset label {
            display: inline-flex;
            align-items: center;
            gap: 0.45rem;
            margin: 0.3rem 1.2rem 0.3rem 0;
        }
        .hint {
            color: #64748b;
            font-size: 0.92rem;
        }
        .pending {
            font-weight: 600;
        }
        .row-actions button {
            border: 1px solid #cbd5e1;
            border-radius: 8px;
            background: #ffffff;
            padding: 0.35rem 0.8rem;
            margin-right: 0.4rem;
            cursor: pointer;
            font-size: 0.85rem;
        }
        .chips a, .chips span {
            display: inline-block;
            margin: 0.25rem 0.5rem 0.25rem 0;
            padding: 0.4rem 0.9rem;
            border-radius: 999px;
            background: #ffffff;
            border: 1px solid #e2e8f0;
            color: #1d4ed8;
            text-decoration: none;
        }
"#;

const PENDING_COUNT_SCRIPT: &str = r#"
        document.addEventListener('change', function () {
            var areas = document.querySelectorAll('input[name="areas"]:checked').length;
            var purposes = document.querySelectorAll('input[name="purposes"]:checked').length;
            var pending = document.getElementById('pending-count');
            if (pending) { pending.textContent = areas * purposes; }
        });
"#;

/// Public landing page for a published dynamic page: overview, benefits,
/// why-us cards, the pricing comparison table, and the lead-capture modal.
pub fn render_public_page(page: &DynamicPage, plans: &[PricingPlan]) -> String {
    let area = escape(&page.area_name).to_string();
    let city = escape(&page.city_name).to_string();
    let purpose = escape(&page.purpose).to_string();

    let benefits_section = if page.benefits.is_empty() {
        String::new()
    } else {
        let items: String = page
            .benefits
            .iter()
            .map(|benefit| format!("<li>{}</li>", escape(benefit)))
            .collect();
        format!(
            r#"<section><h2>Why take a virtual office in {area} for {purpose}?</h2><ul class="benefits">{items}</ul></section>"#
        )
    };

    let why_us_cards: String = page
        .why_us
        .iter()
        .map(|item| {
            let title = escape(&item.title).to_string();
            if item.description.is_empty() {
                format!(r#"<div class="card"><h3>{title}</h3></div>"#)
            } else {
                format!(
                    r#"<div class="card"><h3>{title}</h3><p>{}</p></div>"#,
                    escape(&item.description)
                )
            }
        })
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Virtual Office in {area}, {city} for {purpose} | Deskhaven</title>
    <meta name="description" content="{overview}">
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
    <style>{style}</style>
</head>
<body>
<main>
    <div class="hero">
        <h1>Virtual Office in {area}, {city}</h1>
        <p>{overview}</p>
        <button class="cta" onclick="document.getElementById('lead-modal').showModal()">Talk to an expert</button>
    </div>
    {benefits_section}
    <section>
        <h2>Why businesses choose Deskhaven in {city}</h2>
        <div class="cards">{why_us_cards}</div>
    </section>
    <section>
        <h2>Plans at our {area} centre</h2>
        {pricing_table}
    </section>
    <dialog id="lead-modal">
        <h2>Get a callback</h2>
        <p class="hint">Share your work email and our {city} team will reach out within one business day.</p>
        <form hx-post="/api/leads" hx-target="#lead-result" hx-swap="innerHTML">
            <input type="hidden" name="slug" value="{slug}">
            <label>
                Work email
                <input type="email" name="email" required placeholder="you@company.com" autocomplete="email">
            </label>
            <button class="cta" type="submit">Request callback</button>
            <button type="button" onclick="document.getElementById('lead-modal').close()">Close</button>
        </form>
        <div id="lead-result"></div>
    </dialog>
    <footer>
        Deskhaven — virtual offices across India. <a href="/">Browse all locations</a>
    </footer>
</main>
</body>
</html>"##,
        area = area,
        city = city,
        purpose = purpose,
        overview = escape(&page.overview),
        slug = escape(&page.slug),
        benefits_section = benefits_section,
        why_us_cards = why_us_cards,
        pricing_table = render_pricing_table(plans),
        style = PAGE_STYLE,
    )
}

fn render_pricing_table(plans: &[PricingPlan]) -> String {
    let header: String = plans
        .iter()
        .map(|plan| {
            let class = if plan.highlight { " class=\"plan-highlight\"" } else { "" };
            format!("<th{class}>{}</th>", escape(plan.name))
        })
        .collect();
    let cell = |plan: &PricingPlan, inner: String| {
        let class = if plan.highlight { " class=\"plan-highlight\"" } else { "" };
        format!("<td{class}>{inner}</td>")
    };
    let monthly: String = plans
        .iter()
        .map(|plan| cell(plan, format!(r#"<span class="plan-price">₹{}</span>/month"#, plan.monthly_inr)))
        .collect();
    let yearly: String = plans
        .iter()
        .map(|plan| cell(plan, format!("₹{}/year", plan.yearly_inr)))
        .collect();
    let ideal: String = plans
        .iter()
        .map(|plan| cell(plan, escape(plan.ideal_for).to_string()))
        .collect();
    let features: String = plans
        .iter()
        .map(|plan| {
            let items: String = plan
                .features
                .iter()
                .map(|feature| format!("<li>{}</li>", escape(feature)))
                .collect();
            cell(plan, format!(r#"<ul class="plan-features">{items}</ul>"#))
        })
        .collect();

    format!(
        r#"<table><thead><tr><th></th>{header}</tr></thead><tbody>
<tr><th>Price</th>{monthly}</tr>
<tr><th>Billed yearly</th>{yearly}</tr>
<tr><th>Ideal for</th>{ideal}</tr>
<tr><th>Included</th>{features}</tr>
</tbody></table>"#
    )
}

/// Distinct user-facing not-found document with a path back home. Never
/// conflated with an error page: the slug simply is not published.
pub fn render_not_found(slug: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Page not found | Deskhaven</title>
    <style>{style}</style>
</head>
<body>
<main>
    <div class="hero">
        <h1>We could not find that page</h1>
        <p>No virtual-office page is published at <strong>{slug}</strong>. It may have been unpublished, or the link may be out of date.</p>
        <a class="cta" style="text-decoration:none" href="/">Browse all locations</a>
    </div>
</main>
</body>
</html>"##,
        slug = escape(slug),
        style = PAGE_STYLE,
    )
}

pub fn render_home(locations: &[Location], pages: &[DynamicPage]) -> String {
    let city_chips: String = locations
        .iter()
        .map(|location| format!("<span>{}</span>", escape(&location.name)))
        .collect();
    let page_links: String = pages
        .iter()
        .filter(|page| page.is_active)
        .map(|page| {
            format!(
                r#"<a href="/virtual-office/{slug}">{area} — {purpose}</a>"#,
                slug = escape(&page.slug),
                area = escape(&page.area_name),
                purpose = escape(&page.purpose),
            )
        })
        .collect();
    let page_section = if page_links.is_empty() {
        String::from(r#"<p class="hint">No pages published yet.</p>"#)
    } else {
        format!(r#"<div class="chips">{page_links}</div>"#)
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Deskhaven — Virtual Offices Across India</title>
    <style>{style}</style>
</head>
<body>
<main>
    <div class="hero">
        <h1>Your business address, without the office</h1>
        <p>GST registration, company incorporation, and professional mail handling from premium addresses in every major metro.</p>
    </div>
    <section>
        <h2>Cities we operate in</h2>
        <div class="chips">{city_chips}</div>
    </section>
    <section>
        <h2>Popular virtual-office locations</h2>
        {page_section}
    </section>
    <footer>Deskhaven — virtual offices across India.</footer>
</main>
</body>
</html>"##,
        city_chips = city_chips,
        page_section = page_section,
        style = PAGE_STYLE,
    )
}

/// Operator-facing bulk generator: city checkboxes drive an HTMX refresh of
/// the area list, the pending count updates as selections change, and the
/// generate button stays disabled while a submit is in flight.
pub fn render_admin_generator(
    locations: &[Location],
    purposes: &[&str],
    pages: &[DynamicPage],
) -> String {
    let city_boxes: String = locations
        .iter()
        .map(|location| {
            format!(
                r##"<label><input type="checkbox" name="cities" value="{id}" hx-get="/admin/pages/areas" hx-include="[name='cities']" hx-target="#area-options" hx-swap="innerHTML">{name}</label>"##,
                id = location.id,
                name = escape(&location.name),
            )
        })
        .collect();
    let purpose_boxes: String = purposes
        .iter()
        .enumerate()
        .map(|(index, purpose)| {
            format!(
                r#"<label><input type="checkbox" name="purposes" value="{index}">{}</label>"#,
                escape(purpose)
            )
        })
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Bulk page generator | Deskhaven</title>
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
    <style>{style}</style>
</head>
<body>
<main>
    <div class="hero">
        <h1>Bulk page generator</h1>
        <p>Pick cities, areas, and purposes; one page is generated per area-purpose pair. Existing slugs are skipped, never overwritten.</p>
    </div>
    <fieldset>
        <legend>Cities</legend>
        {city_boxes}
    </fieldset>
    <fieldset>
        <legend>Areas</legend>
        <div id="area-options"><p class="hint">Select a city to load its areas.</p></div>
    </fieldset>
    <fieldset>
        <legend>Purposes</legend>
        {purpose_boxes}
    </fieldset>
    <p class="pending"><span id="pending-count">0</span> pages will be generated.</p>
    <button class="cta"
            hx-post="/admin/pages/generate"
            hx-include="[name='areas'],[name='purposes']"
            hx-target="#generate-result"
            hx-swap="innerHTML"
            hx-disabled-elt="this">Generate pages</button>
    <div id="generate-result"></div>
    <section>
        <h2>Existing pages</h2>
        <table>
            <thead>
                <tr><th>Slug</th><th>City</th><th>Purpose</th><th>Status</th><th>Actions</th></tr>
            </thead>
            <tbody id="pages-body">{rows}</tbody>
        </table>
    </section>
</main>
<script>{script}</script>
</body>
</html>"##,
        city_boxes = city_boxes,
        purpose_boxes = purpose_boxes,
        rows = render_page_rows(pages),
        style = PAGE_STYLE,
        script = PENDING_COUNT_SCRIPT,
    )
}

/// Area checkbox fragment for the currently selected cities.
pub fn render_area_options(areas: &[Area]) -> String {
    if areas.is_empty() {
        return String::from(r#"<p class="hint">Select a city to load its areas.</p>"#);
    }
    let boxes: String = areas
        .iter()
        .map(|area| {
            format!(
                r#"<label><input type="checkbox" name="areas" value="{id}">{name}</label>"#,
                id = area.id,
                name = escape(&area.name),
            )
        })
        .collect();
    format!(
        r#"{boxes}<div>
<button type="button" onclick="document.querySelectorAll('#area-options input').forEach(function (el) {{ el.checked = true; }}); document.dispatchEvent(new Event('change'));">Select all</button>
<button type="button" onclick="document.querySelectorAll('#area-options input').forEach(function (el) {{ el.checked = false; }}); document.dispatchEvent(new Event('change'));">Clear</button>
</div>"#
    )
}

pub fn render_page_rows(pages: &[DynamicPage]) -> String {
    pages.iter().map(render_page_row).collect()
}

pub fn render_page_row(page: &DynamicPage) -> String {
    let (badge_class, badge_label) = if page.is_active {
        ("badge badge-active", "Active")
    } else {
        ("badge badge-hidden", "Hidden")
    };
    format!(
        r#"<tr id="page-{id}"><td><a href="/virtual-office/{slug}" target="_blank">{slug}</a></td><td>{city}</td><td>{purpose}</td><td><span class="{badge_class}">{badge_label}</span></td><td class="row-actions"><button hx-post="/admin/pages/{id}/toggle" hx-target="closest tr" hx-swap="outerHTML">Toggle</button><button hx-delete="/api/admin/dynamic-pages/{id}" hx-target="closest tr" hx-swap="outerHTML" hx-confirm="Delete this page?">Delete</button></td></tr>"#,
        id = page.id,
        slug = escape(&page.slug),
        city = escape(&page.city_name),
        purpose = escape(&page.purpose),
        badge_class = badge_class,
        badge_label = badge_label,
    )
}

/// Outcome fragment for a generate submit: the created/skipped notice plus an
/// out-of-band refresh of the pages table.
pub fn render_generate_outcome(outcome: &BulkOutcome, pages: &[DynamicPage]) -> String {
    format!(
        r#"<div class="notice notice-success">{message}</div>
<tbody id="pages-body" hx-swap-oob="innerHTML">{rows}</tbody>"#,
        message = escape(&outcome.message),
        rows = render_page_rows(pages),
    )
}

/// Blocking validation notice shown in place of a generate outcome.
pub fn render_notice(message: &str) -> String {
    format!(r#"<div class="notice notice-error">{}</div>"#, escape(message))
}

pub fn render_lead_thanks() -> String {
    String::from(r#"<div class="notice notice-success">Thanks — our team will call you within one business day.</div>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{self, WhyUsItem};
    use crate::store::PageCandidate;

    fn sample_page() -> DynamicPage {
        let content = content::compose("Baner", "Pune", "GST Registration");
        let candidate = PageCandidate {
            area_name: "Baner".to_string(),
            city_name: "Pune".to_string(),
            purpose: "GST Registration".to_string(),
            slug: content.slug,
            overview: content.overview,
            benefits: content.benefits,
            why_us: content.why_us,
            is_active: true,
        };
        DynamicPage {
            id: 1,
            area_name: candidate.area_name,
            city_name: candidate.city_name,
            purpose: candidate.purpose,
            slug: candidate.slug,
            overview: candidate.overview,
            benefits: candidate.benefits,
            why_us: candidate.why_us,
            is_active: candidate.is_active,
        }
    }

    #[test]
    fn public_page_includes_copy_plans_and_lead_form() {
        let html = render_public_page(&sample_page(), &standard_plans());
        assert!(html.contains("Virtual Office in Baner, Pune"));
        assert!(html.contains("GST Suite"));
        assert!(html.contains(r#"hx-post="/api/leads""#));
        assert!(html.contains("baner-gst-registration"));
    }

    #[test]
    fn empty_benefits_drop_the_section_entirely() {
        let mut page = sample_page();
        page.benefits.clear();
        let html = render_public_page(&page, &standard_plans());
        assert!(!html.contains(r#"<ul class="benefits">"#));
    }

    #[test]
    fn why_us_without_description_renders_title_only() {
        let mut page = sample_page();
        page.why_us = vec![WhyUsItem {
            title: "Prime Location".to_string(),
            description: String::new(),
        }];
        let html = render_public_page(&page, &standard_plans());
        assert!(html.contains("<h3>Prime Location</h3></div>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut page = sample_page();
        page.area_name = "<script>alert(1)</script>".to_string();
        let html = render_public_page(&page, &standard_plans());
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn not_found_links_back_home() {
        let html = render_not_found("missing-slug");
        assert!(html.contains("missing-slug"));
        assert!(html.contains(r#"href="/""#));
    }

    #[test]
    fn generator_lists_cities_and_purposes() {
        let locations = vec![Location {
            id: 1,
            name: "Pune".to_string(),
            slug: "pune".to_string(),
        }];
        let html = render_admin_generator(&locations, &["GST Registration"], &[]);
        assert!(html.contains("Pune"));
        assert!(html.contains("GST Registration"));
        assert!(html.contains("pending-count"));
    }
}
