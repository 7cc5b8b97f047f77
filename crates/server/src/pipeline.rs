//! End-to-end processing of one upload: scrape, generate, normalize, merge

use medgen_core::{Table, merge_rows, normalize_profiles};

use crate::ai::ProfileSource;
use crate::error::AppError;
use crate::scrape::PageFetcher;

/// Inputs of one `/process` call
#[derive(Debug)]
pub struct ProcessRequest {
    pub disease_name: String,
    pub url: String,
    pub filename: String,
    pub csv: Vec<u8>,
}

/// Outcome of a successful run
#[derive(Debug)]
pub struct ProcessOutput {
    pub csv: String,
    pub base_rows: usize,
    pub new_rows: usize,
}

/// Run the pipeline. Nothing is produced unless every stage succeeds.
pub async fn synthesize_dataset(
    fetcher: &dyn PageFetcher,
    generator: &dyn ProfileSource,
    request: &ProcessRequest,
) -> Result<ProcessOutput, AppError> {
    if !request.filename.ends_with(".csv") {
        return Err(AppError::InvalidInput(
            "Invalid file type. Please upload a CSV.".to_string(),
        ));
    }

    let base = Table::from_csv(&request.csv)?;
    let base_rows = base.rows.len();

    let context = fetcher.fetch_text(&request.url).await?;
    if context.trim().is_empty() {
        return Err(AppError::ScrapeFailure(
            "Could not extract text from the URL.".to_string(),
        ));
    }
    tracing::debug!(url = %request.url, chars = context.chars().count(), "Scraped reference page");

    let profiles = generator.generate(&request.disease_name, &context).await?;
    metrics::counter!("profiles_generated_total").increment(profiles.len() as u64);

    let rows = normalize_profiles(&profiles, &request.url);
    let new_rows = rows.len();
    let merged = merge_rows(base, &rows);

    Ok(ProcessOutput {
        csv: merged.to_csv()?,
        base_rows,
        new_rows,
    })
}
