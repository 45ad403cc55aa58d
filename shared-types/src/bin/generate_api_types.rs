use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Lead types
    types.push(clean_type(EstimateStatus::export_to_string()?));
    types.push(clean_type(CloseStatus::export_to_string()?));
    types.push(clean_type(Lead::export_to_string()?));
    types.push(clean_type(CreateLeadRequest::export_to_string()?));
    types.push(clean_type(LeadPatch::export_to_string()?));
    types.push(clean_type(UpdateLeadStatusRequest::export_to_string()?));
    types.push(clean_type(LeadsResponse::export_to_string()?));

    // Org types
    types.push(clean_type(Org::export_to_string()?));
    types.push(clean_type(CreateOrgRequest::export_to_string()?));
    types.push(clean_type(UpdateWebhookRequest::export_to_string()?));
    types.push(clean_type(UpdateCompanyTagRequest::export_to_string()?));
    types.push(clean_type(UpdateSpreadsheetRequest::export_to_string()?));
    types.push(clean_type(OrgsResponse::export_to_string()?));

    // Taxonomy types
    types.push(clean_type(Service::export_to_string()?));
    types.push(clean_type(Source::export_to_string()?));
    types.push(clean_type(CreateServiceRequest::export_to_string()?));
    types.push(clean_type(CreateSourceRequest::export_to_string()?));
    types.push(clean_type(ServicesResponse::export_to_string()?));
    types.push(clean_type(SourcesResponse::export_to_string()?));

    // User types
    types.push(clean_type(UserType::export_to_string()?));
    types.push(clean_type(User::export_to_string()?));
    types.push(clean_type(SignupRequest::export_to_string()?));
    types.push(clean_type(LoginRequest::export_to_string()?));
    types.push(clean_type(SignupResponse::export_to_string()?));
    types.push(clean_type(CurrentUserResponse::export_to_string()?));

    // Metrics types
    types.push(clean_type(MetricTotals::export_to_string()?));
    types.push(clean_type(SourceRevenue::export_to_string()?));
    types.push(clean_type(SourceCloseRate::export_to_string()?));
    types.push(clean_type(DashboardMetrics::export_to_string()?));

    let output = format!(
        "// Auto-generated API types - do not edit manually\n\n{}",
        types.join("\n\n")
    );

    let out_path = Path::new("bindings/api-types.ts");
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_path, output)?;

    println!("Wrote {} type definitions to {}", types.len(), out_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    filtered.join("\n").trim().to_string()
}
