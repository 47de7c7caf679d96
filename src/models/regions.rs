//! US state and Canadian province names used for display.

use hashbrown::HashMap;
use std::sync::LazyLock;

/// US states, territories and the federal district, keyed by GeoNames admin1 code.
const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District Of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("GU", "Guam"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VI", "Virgin Islands"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Canadian provinces and territories by postal abbreviation.
const CA_PROVINCES: &[(&str, &str)] = &[
    ("AB", "Alberta"),
    ("BC", "British Columbia"),
    ("MB", "Manitoba"),
    ("NB", "New Brunswick"),
    ("NF", "Newfoundland"),
    ("NT", "Northwest Territories"),
    ("NS", "Nova Scotia"),
    ("NU", "Nunavut"),
    ("ON", "Ontario"),
    ("PE", "Prince Edward Island"),
    ("QC", "Quebec"),
    ("SK", "Saskatchewan"),
    ("YT", "Yukon Territory"),
];

/// GeoNames admin1 codes for Canada are numeric.
const CA_ADMIN1_CODES: &[(&str, &str)] = &[
    ("01", "AB"),
    ("02", "BC"),
    ("03", "MB"),
    ("04", "NB"),
    ("05", "NF"),
    ("07", "NS"),
    ("08", "ON"),
    ("09", "PE"),
    ("10", "QC"),
    ("11", "SK"),
    ("12", "YT"),
    ("13", "NT"),
    ("14", "NU"),
];

static US_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| US_STATES.iter().copied().collect());

static CA_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let by_abbr: HashMap<&'static str, &'static str> = CA_PROVINCES.iter().copied().collect();
    let mut map = by_abbr.clone();
    for &(numeric, abbr) in CA_ADMIN1_CODES {
        if let Some(&name) = by_abbr.get(abbr) {
            map.insert(numeric, name);
        }
    }
    map
});

/// Full name of a region given its country and admin1 code.
///
/// Only US and Canadian regions are known; any other country, or an unknown
/// code, gives `None`. Canadian regions accept both the GeoNames numeric code
/// and the postal abbreviation.
pub fn region_name(country_code: &str, admin1_code: &str) -> Option<&'static str> {
    let map = match country_code.to_ascii_uppercase().as_str() {
        "US" => &US_MAP,
        "CA" => &CA_MAP,
        _ => return None,
    };
    map.get(admin1_code.trim().to_ascii_uppercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_states() {
        assert_eq!(region_name("US", "KS"), Some("Kansas"));
        assert_eq!(region_name("US", "DC"), Some("District Of Columbia"));
        assert_eq!(region_name("us", "ny"), Some("New York"));
    }

    #[test]
    fn test_canadian_numeric_codes() {
        assert_eq!(region_name("CA", "08"), Some("Ontario"));
        assert_eq!(region_name("CA", "10"), Some("Quebec"));
        assert_eq!(region_name("CA", "14"), Some("Nunavut"));
        assert_eq!(region_name("CA", "06"), None);
    }

    #[test]
    fn test_canadian_abbreviations() {
        assert_eq!(region_name("CA", "BC"), Some("British Columbia"));
        assert_eq!(region_name("CA", "KS"), None);
    }

    #[test]
    fn test_other_countries_never_match() {
        // Swiss cantons Neuchatel and Appenzell Ausserrhoden
        assert_eq!(region_name("CH", "NE"), None);
        assert_eq!(region_name("CH", "AR"), None);
        assert_eq!(region_name("FR", "11"), None);
        assert_eq!(region_name("", "KS"), None);
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(region_name("US", "ZZ"), None);
        assert_eq!(region_name("US", ""), None);
        assert_eq!(region_name("US", "08"), None);
        assert_eq!(region_name("US", "ON"), None);
    }

    #[test]
    fn test_tables_have_no_duplicates() {
        assert_eq!(US_MAP.len(), US_STATES.len());
        assert_eq!(CA_MAP.len(), CA_PROVINCES.len() + CA_ADMIN1_CODES.len());
    }
}
