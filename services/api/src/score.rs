use crate::infra::build_engine;
use clap::Args;
use lead_qualifier::config::AppConfig;
use lead_qualifier::error::AppError;
use lead_qualifier::leads::LeadCsvImporter;
use lead_qualifier::scoring::{write_results_csv, Offer, ScoreResult};
use lead_qualifier::telemetry;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Lead CSV with name, role, company, industry, location and linkedin_bio columns
    #[arg(long)]
    pub(crate) leads: PathBuf,
    /// Offer JSON document (requires a `name`)
    #[arg(long)]
    pub(crate) offer: PathBuf,
    /// Write the CSV export to this path instead of only printing the ranking
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Classification calls allowed in flight (defaults to SCORING_CONCURRENCY)
    #[arg(long)]
    pub(crate) concurrency: Option<usize>,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        leads,
        offer,
        output,
        concurrency,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let offer = load_offer(&offer)?;
    let leads = LeadCsvImporter::from_path(&leads)?;
    let engine = build_engine(&config, concurrency)?;

    let run = engine.run(&leads, &offer).await?;

    println!("Lead qualification for offer \"{}\"", offer.name);
    println!(
        "Scored {} lead(s) in {} ms",
        run.count,
        (run.finished_at - run.started_at).num_milliseconds()
    );
    render_ranking(&run.results);

    if let Some(path) = output {
        let file = File::create(&path)?;
        write_results_csv(BufWriter::new(file), &run.results)?;
        println!("\nCSV export written to {}", path.display());
    }

    Ok(())
}

fn load_offer(path: &Path) -> Result<Offer, AppError> {
    let raw = std::fs::read(path)?;
    let offer: Offer =
        serde_json::from_slice(&raw).map_err(|err| AppError::InvalidOffer(err.to_string()))?;
    if !offer.has_name() {
        return Err(AppError::InvalidOffer("offer.name is required".to_string()));
    }
    Ok(offer)
}

/// Highest score first; ties keep input order.
pub(crate) fn ranked(results: &[ScoreResult]) -> Vec<&ScoreResult> {
    let mut ranked: Vec<&ScoreResult> = results.iter().collect();
    ranked.sort_by(|left, right| right.score.cmp(&left.score));
    ranked
}

fn render_ranking(results: &[ScoreResult]) {
    println!("\nRanking");
    for (position, result) in ranked(results).into_iter().enumerate() {
        println!(
            "{:>3}. {:>3} [{}] {} ({}, {})",
            position + 1,
            result.score,
            result.intent,
            result.name.as_deref().unwrap_or("<unnamed>"),
            result.role.as_deref().unwrap_or("-"),
            result.company.as_deref().unwrap_or("-"),
        );
        println!("     {}", result.reasoning);
    }
}
