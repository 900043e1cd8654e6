//! Console rendering of plans and reports

use console::{style, Emoji, StyledObject};
use pattern_forge::scaffold::{FileAction, GenerationPlan, GenerationReport, WriteMode};
use similar::{ChangeTag, TextDiff};

/// Success mark
pub static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");

/// Warning mark
pub static WARN: Emoji<'_, '_> = Emoji("⚠ ", "! ");

fn styled_action(action: FileAction) -> StyledObject<String> {
    let label = format!("{:>9}", action.to_string());
    match action {
        FileAction::Created => style(label).green(),
        FileAction::Updated => style(label).cyan(),
        FileAction::Unchanged | FileAction::Skipped => style(label).dim(),
    }
}

/// One line per written file
pub fn print_report(report: &GenerationReport) {
    for entry in report.entries() {
        println!(
            "  {} {}",
            styled_action(entry.action),
            entry.path.display()
        );
    }
}

/// Describe what applying `plan` would do, with diffs for patched files
pub fn print_plan(plan: &GenerationPlan) {
    for write in plan.writes() {
        let action = write.action();
        println!(
            "  {} {} {}",
            styled_action(action),
            write.path.display(),
            style(format!("({})", write.description)).dim()
        );

        if let WriteMode::Patch { original } = &write.mode {
            if action == FileAction::Updated {
                print!("{}", render_diff(original, &write.content));
            }
        }
    }
}

/// Line diff in unified style, changed lines only
#[must_use]
pub fn render_diff(before: &str, after: &str) -> String {
    TextDiff::from_lines(before, after)
        .iter_all_changes()
        .filter_map(|change| match change.tag() {
            ChangeTag::Delete => Some(style(format!("      -{change}")).red().to_string()),
            ChangeTag::Insert => Some(style(format!("      +{change}")).green().to_string()),
            ChangeTag::Equal => None,
        })
        .collect()
}

/// Provider registration reminder shown after a pattern run
pub fn print_next_steps(providers: &[String]) {
    println!();
    println!("{}", style("Next steps:").bold());
    println!();
    println!(
        "  {} Register the providers in {}:",
        style("1.").cyan(),
        style("config/app.php").cyan()
    );
    for provider in providers {
        println!("     {}", style(format!("{provider}::class,")).cyan());
    }
    println!();
    println!("  {} Inject the service interface where you need it.", style("2.").cyan());
}
