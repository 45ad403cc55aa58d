use crate::helpers::tags;
use anyhow::Result;
use shared_types::Lead;

/// CSV column order mirrors the spreadsheet layout; the trailing Company
/// Tag column can be toggled off for exports that leave the org context.
pub fn leads_to_csv(
    leads: &[Lead],
    company_tag: Option<&str>,
    include_company_tag: bool,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut headers = vec![
        "Contact Name",
        "Email",
        "Phone",
        "Service",
        "Source",
        "Estimate Amount",
        "Estimate Status",
        "Close Status",
        "Revenue",
        "Notes",
        "Tags",
        "Date Created",
    ];
    if include_company_tag {
        headers.push("Company Tag");
    }
    writer.write_record(&headers)?;

    for lead in leads {
        let tag_list = tags::parse_tags(lead.tags.as_deref()).join("; ");
        let created = chrono::DateTime::from_timestamp(lead.created_at, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let mut record = vec![
            lead.contact_name.clone().unwrap_or_default(),
            lead.email.clone().unwrap_or_default(),
            lead.phone.clone().unwrap_or_default(),
            lead.service.clone(),
            lead.source.clone(),
            lead
                .estimate_amount
                .map(|a| a.to_string())
                .unwrap_or_default(),
            lead.estimate_status.as_str().to_string(),
            lead.close_status.as_str().to_string(),
            lead.revenue.map(|r| r.to_string()).unwrap_or_default(),
            lead.notes.clone().unwrap_or_default(),
            tag_list,
            created,
        ];
        if include_company_tag {
            record.push(company_tag.unwrap_or_default().to_string());
        }
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{CloseStatus, EstimateStatus};

    fn sample_lead() -> Lead {
        Lead {
            id: "lead-1".to_string(),
            org_id: "org-1".to_string(),
            service: "AC Repair".to_string(),
            source: "Google Ads".to_string(),
            contact_name: Some("Jane, Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: None,
            estimate_amount: Some(1200.0),
            estimate_status: EstimateStatus::Completed,
            close_status: CloseStatus::Won,
            revenue: Some(1150.0),
            notes: Some("said \"call back\"".to_string()),
            tags: Some("[\"ac guys\"]".to_string()),
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_header_only_for_empty_export() {
        let out = leads_to_csv(&[], None, true).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("Contact Name,"));
        assert!(out.trim_end().ends_with("Company Tag"));
    }

    #[test]
    fn test_company_tag_column_toggle() {
        let with = leads_to_csv(&[sample_lead()], Some("ac guys"), true).unwrap();
        assert!(with.lines().next().unwrap().contains("Company Tag"));
        assert!(with.lines().nth(1).unwrap().ends_with("ac guys"));

        let without = leads_to_csv(&[sample_lead()], Some("ac guys"), false).unwrap();
        assert!(!without.lines().next().unwrap().contains("Company Tag"));
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_escaped() {
        let out = leads_to_csv(&[sample_lead()], None, false).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert!(row.contains("\"Jane, Doe\""));
        assert!(row.contains("\"said \"\"call back\"\"\""));
    }

    #[test]
    fn test_statuses_and_date_format() {
        let out = leads_to_csv(&[sample_lead()], None, false).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert!(row.contains("COMPLETED"));
        assert!(row.contains("WON"));
        assert!(row.contains("2023-11-14"));
    }
}
