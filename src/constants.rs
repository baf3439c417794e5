use crate::content::PurposeKind;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://deskhaven.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// How long a fetched area list stays fresh in the client-side cache.
pub const AREA_CACHE_TTL_SECS: i64 = 300;

/// Maps free-text purpose labels to a benefit template. Patterns are matched
/// case-insensitively as substrings, first match wins. A label matching no
/// rule gets an empty benefits section.
pub const PURPOSE_RULES: &[(&str, PurposeKind)] = &[
    ("gst", PurposeKind::GstRegistration),
    ("company registration", PurposeKind::CompanyIncorporation),
    ("company incorporation", PurposeKind::CompanyIncorporation),
];

/// Purposes offered in the bulk generator UI. The generator form submits
/// indexes into this table.
pub const PURPOSE_OPTIONS: &[&str] = &[
    "GST Registration",
    "Company Registration",
    "Business Address",
    "Mail Handling",
];
