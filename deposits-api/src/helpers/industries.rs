//! Industry templates used at signup to seed an org's service/source
//! vocabulary. Unknown industries fall back to the general template.

pub struct IndustryTemplate {
    pub id: &'static str,
    pub services: &'static [&'static str],
    pub sources: &'static [&'static str],
}

const COMMON_SOURCES: &[&str] = &[
    "Google Ads",
    "Facebook Ads",
    "Direct Call",
    "Referral",
    "Website",
    "Yelp",
];

pub const INDUSTRY_TEMPLATES: &[IndustryTemplate] = &[
    IndustryTemplate {
        id: "hvac",
        services: &[
            "AC Installation",
            "AC Repair",
            "Heating Installation",
            "Heating Repair",
            "Maintenance",
            "Ductwork",
            "Thermostat Installation",
        ],
        sources: COMMON_SOURCES,
    },
    IndustryTemplate {
        id: "plumbing",
        services: &[
            "Leak Repair",
            "Pipe Installation",
            "Water Heater",
            "Drain Cleaning",
            "Fixture Installation",
            "Toilet Repair",
            "Sump Pump",
        ],
        sources: COMMON_SOURCES,
    },
    IndustryTemplate {
        id: "electrical",
        services: &[
            "Panel Upgrade",
            "Wiring",
            "Lighting Installation",
            "Outlet Repair",
            "EV Charger Installation",
            "Inspection",
        ],
        sources: COMMON_SOURCES,
    },
    IndustryTemplate {
        id: "roofing",
        services: &[
            "Roof Replacement",
            "Roof Repair",
            "Inspection",
            "Gutter Installation",
            "Storm Damage",
        ],
        sources: COMMON_SOURCES,
    },
    IndustryTemplate {
        id: "cleaning",
        services: &[
            "Residential Cleaning",
            "Commercial Cleaning",
            "Deep Cleaning",
            "Move-Out Cleaning",
            "Carpet Cleaning",
        ],
        sources: COMMON_SOURCES,
    },
    IndustryTemplate {
        id: "general",
        services: &["Consultation", "Service Call", "Installation", "Repair"],
        sources: COMMON_SOURCES,
    },
];

pub fn get_industry_template(industry: &str) -> &'static IndustryTemplate {
    INDUSTRY_TEMPLATES
        .iter()
        .find(|t| t.id == industry)
        .unwrap_or_else(|| {
            INDUSTRY_TEMPLATES
                .iter()
                .find(|t| t.id == "general")
                .expect("general template exists")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_industry() {
        let template = get_industry_template("hvac");
        assert_eq!(template.id, "hvac");
        assert!(template.services.contains(&"AC Repair"));
    }

    #[test]
    fn test_unknown_industry_falls_back_to_general() {
        assert_eq!(get_industry_template("underwater basket weaving").id, "general");
    }
}
