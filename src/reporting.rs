use std::fs;
use std::path::Path;

use csv::Writer;
use itertools::Itertools;

use crate::error::Result;
use crate::store::DynamicPage;

/// Writes the stored pages as a JSON report keyed by slug and a flat CSV
/// table, both sorted by slug.
pub fn write_outputs(pages: &[DynamicPage], output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    let mut json_obj = serde_json::Map::new();
    for page in pages.iter().sorted_by(|a, b| a.slug.cmp(&b.slug)) {
        let mut entry = serde_json::Map::new();
        entry.insert("area".to_string(), serde_json::json!(page.area_name));
        entry.insert("city".to_string(), serde_json::json!(page.city_name));
        entry.insert("purpose".to_string(), serde_json::json!(page.purpose));
        entry.insert("active".to_string(), serde_json::json!(page.is_active));
        entry.insert("benefits".to_string(), serde_json::json!(page.benefits));
        entry.insert(
            "why_us".to_string(),
            serde_json::json!(page
                .why_us
                .iter()
                .map(|item| serde_json::json!({"title": item.title, "description": item.description}))
                .collect::<Vec<_>>()),
        );
        json_obj.insert(page.slug.clone(), serde_json::Value::Object(entry));
    }
    fs::write(
        output_dir.join("pages_report.json"),
        serde_json::to_string_pretty(&serde_json::Value::Object(json_obj))?,
    )?;

    let mut wtr = Writer::from_path(output_dir.join("pages_report.csv"))?;
    wtr.write_record(["slug", "area", "city", "purpose", "active", "benefit_count"])?;
    for page in pages.iter().sorted_by(|a, b| a.slug.cmp(&b.slug)) {
        let active = page.is_active.to_string();
        let benefit_count = page.benefits.len().to_string();
        wtr.write_record([
            page.slug.as_str(),
            page.area_name.as_str(),
            page.city_name.as_str(),
            page.purpose.as_str(),
            active.as_str(),
            benefit_count.as_str(),
        ])?;
    }
    wtr.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::store::PageCandidate;

    fn page(id: i64, area: &str, city: &str, purpose: &str) -> DynamicPage {
        let content = content::compose(area, city, purpose);
        let candidate = PageCandidate {
            area_name: area.to_string(),
            city_name: city.to_string(),
            purpose: purpose.to_string(),
            slug: content.slug,
            overview: content.overview,
            benefits: content.benefits,
            why_us: content.why_us,
            is_active: true,
        };
        DynamicPage {
            id,
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
    fn writes_both_report_files() {
        let output_dir = std::env::temp_dir().join(format!(
            "deskhaven_report_test_{}",
            std::process::id()
        ));
        let pages = vec![
            page(1, "Baner", "Pune", "GST Registration"),
            page(2, "Hinjewadi", "Pune", "Company Registration"),
        ];

        write_outputs(&pages, &output_dir).expect("reports written");

        let json = fs::read_to_string(output_dir.join("pages_report.json")).expect("json file");
        assert!(json.contains("baner-gst-registration"));
        let csv = fs::read_to_string(output_dir.join("pages_report.csv")).expect("csv file");
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.lines().nth(1).expect("first row").starts_with("baner-gst-registration"));

        fs::remove_dir_all(output_dir).ok();
    }
}
