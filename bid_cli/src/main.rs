//! # FenceBid CLI
//!
//! Interactive bid wizard for fence proposals: job form, fence details,
//! then the cost-estimation screen with crew/margin projections and
//! proposal download. All state lives in a `bid_core::BidSession`; this
//! binary only prompts, calls the pricing API, and renders tables.

mod api;
mod config;
mod tables;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing_subscriber::{fmt, EnvFilter};

use bid_core::file_io::{load_session_with_lock_check, save_session, FileLock};
use bid_core::forms::{
    DirtComplexity, FenceDetails, FenceSpec, JobDetails, PricingStrategy, WoodStyle,
};
use bid_core::session::{BidSession, SessionEvent};

use crate::api::{ApiResult, ProposalClient};
use crate::config::Config;
use crate::tables::{format_number, render_duration_options, render_margins, render_materials, render_summary};

const PROPOSAL_FILE: &str = "AFC_Job_Proposal.pdf";

fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return String::new();
    }
    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

fn prompt_nonempty(prompt: &str) -> String {
    loop {
        let value = prompt_line(prompt);
        if !value.is_empty() {
            return value;
        }
        println!("  (required)");
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt).parse().unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    prompt_line(prompt).parse().unwrap_or(default)
}

fn prompt_yes_no(prompt: &str, default: bool) -> bool {
    let value = prompt_line(prompt).to_lowercase();
    match value.as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}

/// Numbered pick from a fixed list; defaults to the first entry.
fn prompt_choice(label: &str, options: &[&str]) -> usize {
    println!("{}", label);
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    let picked = prompt_u32(&format!("Choice [1-{}]: ", options.len()), 1);
    if picked >= 1 && (picked as usize) <= options.len() {
        picked as usize - 1
    } else {
        0
    }
}

fn collect_job_details() -> JobDetails {
    loop {
        let job = JobDetails {
            proposal_to: prompt_nonempty("Proposal to: "),
            phone: prompt_nonempty("Phone: "),
            email: prompt_nonempty("Email: "),
            job_address: prompt_nonempty("Job address: "),
            job_name: prompt_nonempty("Job name: "),
            notes: prompt_line("Notes (optional): "),
        };
        match job.validate() {
            Ok(()) => return job,
            Err(e) => println!("  {}", e),
        }
    }
}

fn collect_fence_details() -> FenceDetails {
    loop {
        let fence_type = prompt_choice(
            "Fence type:",
            &["Chain Link", "SP Wrought Iron", "Vinyl", "Wood"],
        );
        let height = prompt_u32("Height (4/5/6 ft) [6]: ", 6);
        let linear_feet = prompt_f64("Linear feet: ", 0.0);

        let spec = match fence_type {
            0 => FenceSpec::ChainLink {
                top_rail: prompt_yes_no("Top rail? [Y/n]: ", true),
                corner_posts: prompt_u32("Corner posts [0]: ", 0),
                end_posts: prompt_u32("End posts [0]: ", 0),
            },
            1 => FenceSpec::SpWroughtIron,
            2 => FenceSpec::Vinyl {
                with_chain_link: prompt_yes_no("With chain link? [Y/n]: ", true),
                corner_posts: prompt_u32("Corner posts [0]: ", 0),
                end_posts: prompt_u32("End posts [0]: ", 0),
            },
            _ => {
                let style = match prompt_choice("Style:", &["Good Neighbor", "Dogeared"]) {
                    0 => WoodStyle::GoodNeighbor,
                    _ => WoodStyle::Dogeared,
                };
                let bob = match style {
                    WoodStyle::GoodNeighbor => {
                        Some(prompt_yes_no("Board-on-board? [y/N]: ", false))
                    }
                    WoodStyle::Dogeared => None,
                };
                FenceSpec::Wood { style, bob }
            }
        };

        let fence = FenceDetails {
            linear_feet,
            height,
            spec,
        };
        match fence.validate() {
            Ok(()) => return fence,
            Err(e) => println!("  {}", e),
        }
    }
}

/// Run an API call; on failure, ask whether to try again.
async fn with_retry_prompt<T, F, Fut>(mut call: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = ApiResult<T>>,
{
    loop {
        match call().await {
            Ok(value) => return Some(value),
            Err(e) => {
                eprintln!("Error: {}", e);
                if !prompt_yes_no("Try again? [y/N]: ", false) {
                    return None;
                }
            }
        }
    }
}

fn print_estimation_help() {
    println!("Commands:");
    println!("  e  estimate cost          r  set daily rate");
    println!("  p  switch pricing         t  set dirt complexity");
    println!("  s  set slope grade (%)    o  set productivity");
    println!("  c  toggle crew row        k  custom crew size");
    println!("  d  additional labor days  m  apply custom margin");
    println!("  x  clear custom margin    g  generate proposal PDF");
    println!("  w  save draft             v  view tables");
    println!("  h  help                   q  quit");
}

fn render_screen(session: &BidSession) {
    if let Some(materials) = &session.materials {
        println!();
        println!(
            "{}",
            render_materials(&materials.detailed_costs, materials.material_total)
        );
        println!("Pricing: {}", session.estimation.pricing_strategy);
    }
    if let Some(estimate) = &session.estimate {
        println!();
        println!(
            "{}",
            render_duration_options(
                &estimate.costs.labor_duration_options,
                &session.crew_selection
            )
        );
        if let Some(days) = session.custom_days {
            println!(
                "Custom crew of {}: estimated completion {} days",
                session.custom_crew_text,
                format_number(days)
            );
        }
        println!();
        let custom_row = match (&session.custom_projection, session.custom_margin_label()) {
            (Some(projection), Some(label)) => Some((label, projection)),
            _ => None,
        };
        println!(
            "{}",
            render_margins(
                &estimate.costs.profit_margins,
                &session.margin_selection,
                custom_row.as_ref().map(|(label, p)| (label.as_str(), *p)),
            )
        );
        println!();
        println!("{}", render_summary(session, estimate));
    }
}

fn save_draft(session: &BidSession) {
    let default_name = session
        .job_id
        .as_deref()
        .map(|id| format!("{}.afb", id))
        .unwrap_or_else(|| "draft.afb".to_string());
    let name = prompt_line(&format!("Save as [{}]: ", default_name));
    let path = PathBuf::from(if name.is_empty() { default_name } else { name });

    match FileLock::acquire(&path, whoami::username()) {
        Ok(_lock) => match save_session(session, &path) {
            Ok(()) => println!("Saved {}", path.display()),
            Err(e) => eprintln!("Error: {}", e),
        },
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn write_proposal(bytes: &[u8]) {
    let name = prompt_line(&format!("Write proposal to [{}]: ", PROPOSAL_FILE));
    let path = if name.is_empty() {
        Path::new(PROPOSAL_FILE).to_path_buf()
    } else {
        PathBuf::from(name)
    };
    match std::fs::write(&path, bytes) {
        Ok(()) => println!("Wrote {} ({} bytes)", path.display(), bytes.len()),
        Err(e) => eprintln!("Error: failed to write {}: {}", path.display(), e),
    }
}

async fn refresh_materials(
    client: &ProposalClient,
    session: BidSession,
) -> BidSession {
    let Some(job_id) = session.job_id.clone() else {
        return session;
    };
    let strategy = session.estimation.pricing_strategy;
    match with_retry_prompt(|| client.fetch_material_costs(&job_id, strategy)).await {
        Some(materials) => session.apply(SessionEvent::MaterialCostsReceived(materials)),
        None => session,
    }
}

async fn estimation_screen(client: &ProposalClient, mut session: BidSession) {
    print_estimation_help();

    loop {
        let command = prompt_line("> ");
        match command.as_str() {
            "e" => {
                let Some(job_id) = session.job_id.clone() else {
                    println!("Submit job details first.");
                    continue;
                };
                if let Err(e) = session.estimation.validate() {
                    println!("  {}", e);
                    continue;
                }
                let form = session.estimation.clone();
                if let Some(estimate) =
                    with_retry_prompt(|| client.estimate_cost(&job_id, &form)).await
                {
                    session = session.apply(SessionEvent::EstimateReceived(estimate));
                    render_screen(&session);
                }
            }
            "r" => {
                let rate = prompt_f64(
                    &format!("Daily rate [{}]: ", session.estimation.daily_rate),
                    session.estimation.daily_rate,
                );
                session = session.apply(SessionEvent::DailyRateChanged(rate));
            }
            "p" => {
                let picked = prompt_choice(
                    "Pricing strategy:",
                    &["Master Halco Pricing", "Fence Specialties Pricing"],
                );
                let strategy = PricingStrategy::ALL[picked];
                session = session.apply(SessionEvent::PricingStrategyChanged(strategy));
                // Reprice the bill of materials under the new book
                session = refresh_materials(client, session).await;
                render_screen(&session);
            }
            "t" => {
                let picked = prompt_choice(
                    "Dirt complexity:",
                    &["Soft", "Hard", "Core Drill", "Jack Hammer"],
                );
                let dirt = [
                    DirtComplexity::Soft,
                    DirtComplexity::Hard,
                    DirtComplexity::CoreDrill,
                    DirtComplexity::JackHammer,
                ][picked];
                session = session.apply(SessionEvent::DirtComplexityChanged(dirt));
            }
            "s" => {
                let grade = prompt_f64("Slope grade (%) [0]: ", 0.0);
                session = session.apply(SessionEvent::SlopeGradeChanged(grade));
            }
            "o" => {
                let productivity = prompt_f64("Productivity (0.01-1.00) [1.0]: ", 1.0);
                session = session.apply(SessionEvent::ProductivityChanged(productivity));
            }
            "c" => {
                let crew = prompt_u32("Crew size row to toggle: ", 0);
                if crew == 0 {
                    println!("  (enter a crew size from the table)");
                    continue;
                }
                session = session.apply(SessionEvent::CrewOptionToggled(crew));
                render_screen(&session);
            }
            "k" => {
                let text = prompt_line("Custom crew size: ");
                session = session.apply(SessionEvent::CustomCrewChanged(text));
                match session.custom_days {
                    Some(days) => println!(
                        "Estimated completion time: {} days",
                        format_number(days)
                    ),
                    None => println!("  (no estimate for that crew size)"),
                }
            }
            "d" => {
                let days = prompt_f64("Additional labor days [0]: ", 0.0);
                session = session.apply(SessionEvent::AdditionalDaysChanged(days));
                println!(
                    "Additional labor cost: ${}",
                    format_number(session.additional_labor_cost())
                );
            }
            "m" => {
                let text = prompt_line("Custom margin (%): ");
                match text.parse::<f64>() {
                    Ok(percent) => {
                        session = session.apply(SessionEvent::CustomMarginApplied(percent));
                        if session.custom_projection.is_some() {
                            render_screen(&session);
                        } else {
                            println!("  (margin must be a number below 100, with an estimate loaded)");
                        }
                    }
                    Err(_) => println!("  (not a number)"),
                }
            }
            "x" => {
                session = session.apply(SessionEvent::CustomMarginCleared);
                render_screen(&session);
            }
            "g" => {
                let Some(job_id) = session.job_id.clone() else {
                    println!("Submit job details first.");
                    continue;
                };
                if session.estimate.is_none() {
                    println!("Estimate the cost before generating a proposal.");
                    continue;
                }
                if let Some(bytes) = with_retry_prompt(|| client.generate_proposal(&job_id)).await
                {
                    write_proposal(&bytes);
                }
            }
            "w" => save_draft(&session),
            "v" => render_screen(&session),
            "h" => print_estimation_help(),
            "q" => return,
            "" => {}
            other => println!("Unknown command '{}'; h for help.", other),
        }
    }
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();
    let client = match ProposalClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("FenceBid - Fence Proposal Wizard");
    println!("================================");
    println!();

    // Resume a saved draft, or start fresh
    let mut session = BidSession::new();
    let resume = prompt_line("Resume a saved draft? (path or blank): ");
    if !resume.is_empty() {
        match load_session_with_lock_check(Path::new(&resume)) {
            Ok((loaded, lock)) => {
                if let Some(lock) = lock {
                    println!(
                        "Note: draft is locked by {} since {}; your edits may be lost.",
                        lock.user_id, lock.locked_at
                    );
                }
                session = loaded;
                println!("Resumed session {}", session.meta.session_id);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    if session.job_id.is_none() {
        // Screen 1: job form
        println!();
        println!("-- New Job --");
        loop {
            let job = collect_job_details();
            let submitted = with_retry_prompt(|| client.submit_job_details(&job)).await;
            match submitted {
                Some(job_id) => {
                    println!("Job registered: {}", job_id);
                    session = session.apply(SessionEvent::JobRegistered {
                        job_id,
                        details: job,
                    });
                    break;
                }
                None => {
                    if !prompt_yes_no("Re-enter job details? [y/N]: ", false) {
                        return;
                    }
                }
            }
        }
    }

    if session.fence.is_none() {
        // Screen 2: fence details
        println!();
        println!("-- Fence Details --");
        let job_id = match session.job_id.clone() {
            Some(id) => id,
            None => return,
        };
        loop {
            let fence = collect_fence_details();
            let submitted = with_retry_prompt(|| client.submit_fence_details(&job_id, &fence)).await;
            match submitted {
                Some(()) => {
                    session = session.apply(SessionEvent::FenceRecorded(fence));
                    break;
                }
                None => {
                    if !prompt_yes_no("Re-enter fence details? [y/N]: ", false) {
                        return;
                    }
                }
            }
        }
        session = refresh_materials(&client, session).await;
    }

    // Screen 3: cost estimation
    println!();
    println!("-- Cost Estimation --");
    render_screen(&session);
    estimation_screen(&client, session).await;
}
