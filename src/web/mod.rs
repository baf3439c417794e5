pub mod state;
pub mod views;

pub use state::AppState;
pub use views::{
    render_admin_generator, render_area_options, render_generate_outcome, render_home,
    render_lead_thanks, render_not_found, render_notice, render_page_row, render_page_rows,
    render_public_page, standard_plans, PricingPlan,
};
