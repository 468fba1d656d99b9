use std::io::{self, Write};

use crate::abuseipdb::{ReputationLookup, ReputationRecord};
use crate::core::RateGovernor;
use crate::rdap::{ProviderLookup, ProviderName};
use crate::utils::IntelError;

/// Counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// IPs taken from the input (blank lines excluded)
    pub processed: usize,
    /// IPs rendered as a full report
    pub succeeded: usize,
    /// IPs rendered as an error line
    pub failed: usize,
}

/// Sequential enrichment of a list of IPs
///
/// Every IP is reported, in input order, either as a report block or as an
/// error line. A failed lookup never stops the batch.
pub struct EnrichmentDriver<R, P> {
    reputation: R,
    provider: P,
    governor: RateGovernor,
}

impl<R, P> EnrichmentDriver<R, P>
where
    R: ReputationLookup,
    P: ProviderLookup,
{
    pub fn new(reputation: R, provider: P, governor: RateGovernor) -> Self {
        Self {
            reputation,
            provider,
            governor,
        }
    }

    /// Enrich every non-blank line of `lines` and write one block per IP to `out`
    ///
    /// Only write errors on `out` abort the run.
    pub async fn run<I, S, W>(&self, lines: I, out: &mut W) -> io::Result<BatchSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        W: Write,
    {
        let mut summary = BatchSummary::default();

        for line in lines {
            let ip = line.as_ref().trim();
            if ip.is_empty() {
                continue;
            }

            // Only the reputation API is quota-limited.
            self.governor.wait().await;
            summary.processed += 1;

            match self.reputation.check(ip).await {
                Ok(record) => {
                    let provider = self.provider.resolve_provider(ip).await;
                    write_report(out, &record, &provider)?;
                    summary.succeeded += 1;
                }
                Err(e) => {
                    tracing::error!(ip = %ip, error = %e, "reputation lookup failed");
                    write_failure(out, ip, &e)?;
                    summary.failed += 1;
                }
            }
            out.flush()?;
        }

        tracing::info!(
            processed = summary.processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "enrichment batch finished"
        );
        Ok(summary)
    }
}

/// Render a report block for one IP
pub fn write_report<W: Write>(
    out: &mut W,
    record: &ReputationRecord,
    provider: &ProviderName,
) -> io::Result<()> {
    let last_reported = record
        .last_reported_at
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());

    writeln!(out)?;
    writeln!(out, "IP: {}", record.ip)?;
    writeln!(out, "  Provider: {}", provider)?;
    writeln!(out, "  Score: {}%", record.abuse_score)?;
    writeln!(out, "  Country: {}", record.country_code.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "  Total Reports: {}", record.total_reports)?;
    writeln!(out, "  Last Reported: {}", last_reported)
}

/// Render the error line for an IP whose lookup failed
pub fn write_failure<W: Write>(out: &mut W, ip: &str, error: &IntelError) -> io::Result<()> {
    match error {
        IntelError::Service { status, body } => {
            writeln!(out, "[!] Error ({}) querying {}: {}", status, ip, body)
        }
        other => writeln!(out, "[!] Exception querying {}: {}", ip, other),
    }
}
