use console::Style;

use crate::rules::{Issue, RuleId};
use crate::sensor::Analysis;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

pub fn print_analysis(analysis: &Analysis) {
    if analysis.metrics.is_empty() {
        print_success("No mutations to analyze.");
        return;
    }

    for (file, metrics) in &analysis.metrics {
        let ratio = metrics
            .kill_ratio()
            .map(|r| format!("{r}%"))
            .unwrap_or_else(|| "n/a".to_string());
        let has_issues = analysis.issues.iter().any(|i| &i.file == file);

        if has_issues {
            let style = Style::new().yellow().bold();
            println!(
                "{} {}: {} survived / {} generated ({} killed)",
                style.apply_to("!"),
                file,
                metrics.survived,
                metrics.generated,
                ratio,
            );
        } else {
            let style = Style::new().green().bold();
            println!(
                "{} {}: {} generated ({} killed)",
                style.apply_to("✓"),
                file,
                metrics.generated,
                ratio,
            );
        }

        let dim = Style::new().dim();
        if metrics.not_covered > 0 {
            println!("  {} {} not covered", dim.apply_to("·"), metrics.not_covered);
        }
        if metrics.error > 0 {
            println!("  {} {} errored or timed out", dim.apply_to("·"), metrics.error);
        }
        if metrics.unknown > 0 {
            println!("  {} {} unknown", dim.apply_to("·"), metrics.unknown);
        }
    }

    if !analysis.issues.is_empty() {
        println!();
        for issue in &analysis.issues {
            print_issue(issue);
        }
    }

    let totals = analysis.totals();
    println!();
    println!(
        "{} files, {} mutants, {} killed, {} survived, {} issues",
        analysis.metrics.len(),
        totals.generated,
        totals.killed,
        totals.survived,
        analysis.issues.len(),
    );
}

fn print_issue(issue: &Issue) {
    let rule_style = Style::new().cyan().bold();
    let loc_style = Style::new().dim();

    let location = match issue.line {
        Some(line) => format!("{}:{}", issue.file, line),
        None => issue.file.clone(),
    };
    println!(
        "  {} {} {}",
        rule_style.apply_to(format!("[{}]", issue.rule.key())),
        loc_style.apply_to(location),
        issue.message,
    );
}

pub fn print_rules() {
    for rule in RuleId::ALL {
        let key_style = Style::new().cyan().bold();
        println!("{} {}", key_style.apply_to(rule.key()), rule.description());
        for (name, default) in rule.parameters() {
            let dim = Style::new().dim();
            println!("  {} {} (default {})", dim.apply_to("·"), name, default);
        }
    }
}
