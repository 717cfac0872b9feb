//! Human-readable text output

use crate::coordinator::{SweepPlan, SweepReport};
use crate::dataset::Dataset;
use crate::worker::JobStatus;

/// Print the per-record overview of an extracted dataset
///
/// One line per query label with the number of configurations where the
/// record is defined and the dataset-wide mean of the global means.
pub fn print_extract_summary(dataset: &Dataset) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                 COORDINATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Configurations: {}", dataset.len());
    println!();

    let Some(first) = dataset.iter().next() else {
        return;
    };

    println!("  {:<24} {:>8} {:>12} {:>10}", "Record", "Defined", "Mean (Å)", "Sites");
    for label in first.bonds.keys() {
        let records: Vec<_> = dataset.iter().filter_map(|e| e.bonds.get(label)).collect();
        let means: Vec<f64> = records.iter().filter_map(|r| r.summary.global_mean).collect();
        let sites: usize = records.iter().map(|r| r.sites.len()).sum();

        let mean = crate::stats::mean(&means)
            .map(|m| format!("{:.4}", m))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:>8} {:>12} {:>10}",
            label,
            format!("{}/{}", means.len(), records.len()),
            mean,
            sites
        );
    }
}

/// Print the job directories of a plan, one worker per block
pub fn print_plan(plan: &SweepPlan) {
    println!("Sweep plan: {} jobs on {} workers", plan.num_jobs(), plan.num_workers());
    for assignment in &plan.assignments {
        let names: Vec<String> = assignment.jobs().iter().map(|job| job.dir_name()).collect();
        println!("  rank {} ({} jobs):", assignment.rank, names.len());
        for chunk in names.chunks(8) {
            println!("    {}", chunk.join(" "));
        }
    }
}

/// Print the outcome of a sweep
pub fn print_sweep_summary(report: &SweepReport) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                    SWEEP RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Elapsed Time: {:.3}s", report.elapsed.as_secs_f64());
    println!();
    println!("Jobs:");
    println!("  Total:          {}", report.total());
    println!("  Succeeded:      {}", report.succeeded());
    println!("  Non-zero exit:  {}", report.nonzero_exits());
    println!("  Skipped:        {}", report.skipped());
    println!("  Launch failed:  {}", report.launch_failures());

    let problems: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| !o.succeeded() && o.status != JobStatus::Skipped)
        .collect();
    if !problems.is_empty() {
        println!();
        println!("Failed jobs:");
        for outcome in problems {
            let detail = match &outcome.status {
                JobStatus::Completed { exit_code: Some(code) } => format!("exit code {}", code),
                JobStatus::Completed { exit_code: None } => "terminated by signal".to_string(),
                JobStatus::LaunchFailed { message } => message.clone(),
                JobStatus::Skipped => continue,
            };
            println!("  {} (rank {}): {}", outcome.dir.display(), outcome.rank, detail);
        }
    }
}
