use std::fs;
use std::path::Path;

use anyhow::Result;
use deskhaven::content;
use deskhaven::store::DynamicPage;
use deskhaven::web::{render_public_page, standard_plans};

/// Renders one representative public page to a static file, for design
/// review without a running server.
fn main() -> Result<()> {
    let composed = content::compose("Baner", "Pune", "GST Registration");
    let page = DynamicPage {
        id: 0,
        area_name: "Baner".to_string(),
        city_name: "Pune".to_string(),
        purpose: "GST Registration".to_string(),
        slug: composed.slug,
        overview: composed.overview,
        benefits: composed.benefits,
        why_us: composed.why_us,
        is_active: true,
    };

    let html = render_public_page(&page, &standard_plans());
    let output_dir = Path::new("landing-page");
    fs::create_dir_all(output_dir)?;
    fs::write(output_dir.join("index.html"), html)?;
    println!("Wrote {}", output_dir.join("index.html").display());

    Ok(())
}
