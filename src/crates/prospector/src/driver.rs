//! Batch driver: lead list in, one report row per lead out.
//!
//! Leads are processed strictly sequentially: one in-flight record at a
//! time keeps external API rate limits manageable, and each record stays
//! private to its run. A failed lead is recorded and skipped, never allowed
//! to take down the batch.

use std::path::Path;

use leadgraph_core::CompiledPipeline;
use serde::Serialize;
use tracing::{error, info};

use crate::error::{DriverError, Result};
use crate::record::LeadRecord;

/// Sender identity, supplied once per batch.
#[derive(Debug, Clone)]
pub struct SenderProfile {
    /// Name used in the email sign-off.
    pub name: String,
    /// Company making the outreach.
    pub company: String,
    /// Value proposition being pitched.
    pub value_proposition: String,
}

/// One lead read from the input file.
#[derive(Debug, Clone)]
pub struct LeadInput {
    pub name: String,
    pub company: String,
}

/// One output row per lead.
#[derive(Debug, Clone, Serialize)]
pub struct LeadReport {
    pub name: String,
    pub company: String,
    pub is_qualified: bool,
    pub reason: String,
    /// Final draft; empty when the lead was disqualified or the run failed.
    pub draft_email: String,
}

/// Build the starting record for one lead.
pub fn initial_record(sender: &SenderProfile, lead: &LeadInput) -> LeadRecord {
    LeadRecord {
        sender_name: sender.name.clone(),
        sender_company: sender.company.clone(),
        sender_product: sender.value_proposition.clone(),
        lead_name: lead.name.clone(),
        company: lead.company.clone(),
        ..Default::default()
    }
}

/// Run one lead through the pipeline, isolating any failure into the report.
pub async fn process_lead(
    pipeline: &CompiledPipeline<LeadRecord>,
    sender: &SenderProfile,
    lead: &LeadInput,
) -> LeadReport {
    info!(lead = %lead.name, company = %lead.company, "processing lead");

    match pipeline.run(initial_record(sender, lead)).await {
        Ok(record) => LeadReport {
            name: lead.name.clone(),
            company: lead.company.clone(),
            is_qualified: record.is_qualified,
            reason: record.qualification_reason,
            draft_email: if record.is_qualified {
                record.draft_email
            } else {
                String::new()
            },
        },
        Err(e) => {
            error!(lead = %lead.name, error = %e, "pipeline run failed");
            LeadReport {
                name: lead.name.clone(),
                company: lead.company.clone(),
                is_qualified: false,
                reason: format!("Pipeline failed: {e}"),
                draft_email: String::new(),
            }
        }
    }
}

/// Process a whole batch sequentially. Always returns one report per lead.
pub async fn run_batch(
    pipeline: &CompiledPipeline<LeadRecord>,
    sender: &SenderProfile,
    leads: &[LeadInput],
) -> Vec<LeadReport> {
    let mut reports = Vec::with_capacity(leads.len());
    for lead in leads {
        reports.push(process_lead(pipeline, sender, lead).await);
    }
    reports
}

/// Read leads from a CSV file with configurable column names.
pub fn read_leads(path: &Path, name_column: &str, company_column: &str) -> Result<Vec<LeadInput>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let name_idx = headers
        .iter()
        .position(|h| h == name_column)
        .ok_or_else(|| DriverError::MissingColumn(name_column.to_string()))?;
    let company_idx = headers
        .iter()
        .position(|h| h == company_column)
        .ok_or_else(|| DriverError::MissingColumn(company_column.to_string()))?;

    let mut leads = Vec::new();
    for row in reader.records() {
        let row = row?;
        leads.push(LeadInput {
            name: row.get(name_idx).unwrap_or("").trim().to_string(),
            company: row.get(company_idx).unwrap_or("").trim().to_string(),
        });
    }
    Ok(leads)
}

/// Write the report rows as CSV.
pub fn write_reports(path: &Path, reports: &[LeadReport]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for report in reports {
        writer.serialize(report)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_leads_with_custom_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "full_name,employer,notes").unwrap();
        writeln!(file, "Ada Lovelace,Acme, first").unwrap();
        writeln!(file, "Grace Hopper,Navy,second").unwrap();

        let leads = read_leads(file.path(), "full_name", "employer").unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].name, "Ada Lovelace");
        assert_eq!(leads[0].company, "Acme");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,employer").unwrap();
        writeln!(file, "Ada,Acme").unwrap();

        let err = read_leads(file.path(), "name", "company").unwrap_err();
        assert!(matches!(err, DriverError::MissingColumn(col) if col == "company"));
    }

    #[test]
    fn reports_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.csv");
        let reports = vec![LeadReport {
            name: "Ada".to_string(),
            company: "Acme".to_string(),
            is_qualified: true,
            reason: "tech funding news".to_string(),
            draft_email: "Hi Ada, ...".to_string(),
        }];

        write_reports(&path, &reports).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Ada"));
        assert!(written.contains("tech funding news"));
    }
}
