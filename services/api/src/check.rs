use crate::infra::{InMemoryEmployeeDirectory, InMemoryVerificationRepository};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Args;
use fnf_verify::config::AppConfig;
use fnf_verify::error::AppError;
use fnf_verify::telemetry;
use fnf_verify::verification::{
    EmployeeRosterImporter, VerificationReport, VerificationRequest, VerificationService,
    VerifierId,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const CLI_VERIFIER: &str = "cli";

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// CSV roster holding the authoritative employee records
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Employee identifier to verify
    #[arg(long)]
    pub(crate) employee_id: String,
    /// Claimed full name
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Claimed employing entity
    #[arg(long)]
    pub(crate) entity_name: Option<String>,
    /// Claimed designation
    #[arg(long)]
    pub(crate) designation: Option<String>,
    /// Claimed exit reason
    #[arg(long)]
    pub(crate) exit_reason: Option<String>,
    /// Claimed date of joining (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date_of_joining: Option<NaiveDate>,
    /// Claimed date of leaving (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date_of_leaving: Option<NaiveDate>,
    /// Evaluation date for the settlement status (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl CheckArgs {
    fn request(&self) -> VerificationRequest {
        VerificationRequest {
            employee_id: Some(self.employee_id.clone()),
            name: self.name.clone(),
            entity_name: self.entity_name.clone(),
            date_of_joining: self.date_of_joining.map(|date| date.to_string()),
            date_of_leaving: self.date_of_leaving.map(|date| date.to_string()),
            designation: self.designation.clone(),
            exit_reason: self.exit_reason.clone(),
            consent_given: Some(true),
        }
    }

    fn evaluated_at(&self) -> DateTime<Utc> {
        self.as_of
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or_else(Utc::now)
    }
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_cli(&config.telemetry)?;

    let report = check(&args, &config)?;
    if args.json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

fn check(args: &CheckArgs, config: &AppConfig) -> Result<VerificationReport, AppError> {
    let directory = Arc::new(InMemoryEmployeeDirectory::default());
    let records = EmployeeRosterImporter::from_path(&args.roster)?;
    let seeded = EmployeeRosterImporter::seed(directory.as_ref(), records)?;
    info!(seeded, roster = %args.roster.display(), "roster loaded");

    let service = VerificationService::new(
        directory,
        Arc::new(InMemoryVerificationRepository::default()),
        config.verification,
    );
    let report = service.verify(
        &VerifierId(CLI_VERIFIER.to_string()),
        args.request(),
        args.evaluated_at(),
    )?;
    Ok(report)
}

fn render_report(report: &VerificationReport) -> String {
    let employee = &report.employee_data;
    let mut out = format!(
        "F&F verification {}\n\
         Employee: {} {} ({})\n\
         Settlement status: {}\n\
         Match score: {}% ({})\n\
         {}\n",
        report.verification_id.0,
        employee.employee_id,
        employee.name,
        employee.entity_name,
        report.fnf_status.label(),
        report.match_score,
        report.overall_status.label(),
        report.summary,
    );

    if report.comparison_results.is_empty() {
        return out;
    }

    out.push_str("\nFields\n");
    for result in &report.comparison_results {
        let on_record = result
            .company_value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  [{}] {}: submitted '{}', on record '{}' ({})\n",
            if result.is_match { "ok" } else { "!!" },
            result.label,
            result.verifier_value,
            on_record,
            result.match_type.label()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnf_verify::config::{AppEnvironment, ServerConfig, TelemetryConfig};
    use fnf_verify::verification::{FnfStatus, OverallStatus, VerificationConfig};
    use std::io::Write as _;

    const ROSTER: &str = "Employee ID,Name,Entity Name,Designation,Department,Date of Joining,Date of Leaving,Exit Reason\n\
E001,Jane Doe,Acme Technologies Pvt. Ltd.,Engineer,Platform,2019-04-01,2023-01-15,Resignation\n\
E002,Arun Rao,Acme Technologies Pvt. Ltd.,Analyst,,2021-07-12,,\n";

    fn roster_file(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "fnf-check-{tag}-{}.csv",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).expect("create roster");
        file.write_all(ROSTER.as_bytes()).expect("write roster");
        path
    }

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            verification: VerificationConfig::default(),
            roster_path: None,
        }
    }

    fn args(roster: PathBuf, employee_id: &str) -> CheckArgs {
        CheckArgs {
            roster,
            employee_id: employee_id.to_string(),
            name: Some("JANE DOE".to_string()),
            entity_name: None,
            designation: Some("Senior Engineer".to_string()),
            exit_reason: None,
            date_of_joining: NaiveDate::from_ymd_opt(2019, 4, 1),
            date_of_leaving: None,
            as_of: NaiveDate::from_ymd_opt(2023, 2, 1),
            json: false,
        }
    }

    #[test]
    fn check_compares_claims_against_the_roster() {
        let roster = roster_file("compare");

        let report = check(&args(roster.clone(), "e001"), &config()).expect("check runs");
        std::fs::remove_file(roster).ok();

        assert_eq!(report.match_score, 67);
        assert_eq!(report.overall_status, OverallStatus::SignificantMismatch);
        assert_eq!(report.fnf_status, FnfStatus::Pending);
        assert_eq!(report.verification_id.0, "VER-000001");

        let rendered = render_report(&report);
        assert!(rendered.starts_with("F&F verification VER-000001\nEmployee: E001 Jane Doe"));
        assert!(rendered.contains("\nFields\n  [ok] Full Name"));
        assert!(rendered.contains("Employee: E001 Jane Doe"));
        assert!(rendered.contains("Settlement status: Pending"));
        assert!(rendered.contains("[!!] Designation: submitted 'Senior Engineer', on record 'Engineer' (mismatch)"));
        assert!(rendered.contains("[ok] Date of Joining: submitted '2019-04-01'"));
    }

    #[test]
    fn check_reports_unknown_employees() {
        let roster = roster_file("unknown");

        let err = check(&args(roster.clone(), "E404"), &config()).expect_err("unknown employee");
        std::fs::remove_file(roster).ok();

        assert!(err.to_string().contains("E404"));
    }

    #[test]
    fn request_carries_consent_and_iso_dates() {
        let mut args = args(PathBuf::from("unused.csv"), "E002");
        args.date_of_leaving = NaiveDate::from_ymd_opt(2024, 2, 29);

        let request = args.request();

        assert_eq!(request.consent_given, Some(true));
        assert_eq!(request.date_of_leaving.as_deref(), Some("2024-02-29"));
        assert_eq!(
            args.evaluated_at().to_rfc3339(),
            "2023-02-01T00:00:00+00:00"
        );
    }
}
