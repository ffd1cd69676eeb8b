use colored::Colorize;
use surf_engine::disk::DiskUsage;
use surf_engine::model::{
    CleanResult, DirectoryReport, DuplicateReport, FileRecord, JunkReport, ScanSummary,
};
use surf_engine::utils::format_size;

fn print_file_table(header: &str, files: &[FileRecord]) {
    if files.is_empty() {
        return;
    }
    println!("{}", format!("=== {header} ===").bold().white());
    for file in files {
        println!(
            "  {}  {}",
            file.path.display().to_string().dimmed(),
            format_size(file.size_bytes).yellow()
        );
    }
    println!();
}

fn print_summary(summary: &ScanSummary) {
    println!("{}", "=== Summary ===".bold().white());
    println!(
        "  {} files, {} in {} ms",
        summary.total_files,
        format_size(summary.total_bytes).green(),
        summary.elapsed_ms
    );
    if summary.errors_skipped > 0 {
        println!(
            "  {} {} unreadable entries skipped",
            "Warning:".red().bold(),
            summary.errors_skipped
        );
    }
    if summary.cancelled {
        println!("{}", "  Scan cancelled — results are partial.".yellow().bold());
    }
    println!();
}

pub fn print_directory_report(report: &DirectoryReport) {
    println!(
        "{}\n",
        format!("Scanned {}", report.root.display()).bold().cyan()
    );
    print_file_table("Largest files", &report.top_files);
    print_file_table("Stale files", &report.stale_files);

    if !report.by_extension.is_empty() {
        println!("{}", "=== By file type ===".bold().white());
        for stat in report.by_extension.iter().take(15) {
            let label = if stat.extension.is_empty() {
                "(no extension)".to_string()
            } else {
                format!(".{}", stat.extension)
            };
            println!(
                "  {:<16} {:>8} files  {}",
                label,
                stat.file_count,
                format_size(stat.total_size_bytes).yellow()
            );
        }
        println!();
    }
    print_summary(&report.summary);
}

pub fn print_junk_report(report: &JunkReport, selected: &[String]) {
    let mut reclaimable = 0u64;
    for category in &report.categories {
        let marker = if selected.contains(&category.id) {
            "[x]".green()
        } else {
            "[ ]".dimmed()
        };
        println!(
            "{} {} ({}) — {} files, {}",
            marker,
            category.name.bold(),
            category.id.dimmed(),
            category.file_count,
            format_size(category.total_bytes).yellow()
        );
        if selected.contains(&category.id) {
            reclaimable += category.total_bytes;
        }
    }
    println!(
        "\n  {} {}\n",
        "Selected reclaimable:".bold(),
        format_size(reclaimable).green().bold()
    );
    print_summary(&report.summary);
}

pub fn print_duplicate_report(report: &DuplicateReport) {
    println!(
        "{}\n",
        format!(
            "{} duplicate groups, {} wasted",
            report.total_groups,
            format_size(report.total_wasted_bytes)
        )
        .bold()
        .cyan()
    );
    for group in &report.groups {
        println!(
            "{}  {} × {} copies  (wasting {})",
            group.hash[..16].dimmed(),
            format_size(group.size_bytes).yellow(),
            group.members.len(),
            format_size(group.wasted_bytes()).red()
        );
        for member in &group.members {
            println!("    {}", member.display().to_string().dimmed());
        }
    }
    println!();
    print_summary(&report.summary);
}

pub fn print_clean_result(result: &CleanResult) {
    println!(
        "{} {} freed, {} items removed.",
        "Cleaned!".green().bold(),
        format_size(result.freed_bytes).green(),
        result.deleted_count
    );
    for failure in &result.errors {
        println!(
            "  {} {} — {}",
            "Failed".red().bold(),
            failure.path.display().to_string().dimmed(),
            failure.reason.red()
        );
    }
}

pub fn print_disk_usage(usage: &DiskUsage) {
    println!(
        "  {:<10} {}",
        "Total:".bold(),
        format_size(usage.total_bytes)
    );
    println!(
        "  {:<10} {} ({:.1}%)",
        "Used:".bold(),
        format_size(usage.used_bytes).yellow(),
        usage.usage_percent
    );
    println!(
        "  {:<10} {}",
        "Free:".bold(),
        format_size(usage.free_bytes).green()
    );
}

pub fn print_dry_run_footer() {
    println!(
        "{}",
        "This was a preview. Re-run with --confirm to delete."
            .yellow()
            .bold()
    );
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg.red());
}
