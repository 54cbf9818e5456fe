//! Plain stdout rendering of the view models.

use std::io::{self, Write};

use ui::vm::{IntroVm, QuestionScreenVm, ResultsVm};

const RULE: &str = "────────────────────────────────────────────────────────";

/// Seconds-remaining marks at which a warning line is printed.
pub const TIMER_WARNINGS: [u32; 3] = [60, 30, 10];

pub fn render_intro(vm: &IntroVm) {
    println!("{RULE}");
    println!("{}", vm.title);
    println!("{RULE}");
    println!("Quiz Information:");
    for line in vm.info_lines() {
        println!("  • {line}");
    }
    println!();
    prompt("Press Enter to start the quiz...");
}

pub fn render_question(vm: &QuestionScreenVm) {
    println!();
    println!("{RULE}");
    println!("{}", vm.topic);
    println!(
        "⏱ {}    {}    {}",
        vm.timer_label, vm.score_label, vm.position_label
    );
    println!("{}", progress_bar(vm.progress_percent));
    println!();
    println!("{}", vm.prompt);
    println!();
    for option in &vm.options {
        println!("  [{}] {}", option.number, option.label);
    }
    prompt("Your answer: ");
}

pub fn render_timer_warning(vm: &QuestionScreenVm) {
    println!();
    println!("⚠ {} remaining", vm.timer_label);
    prompt("Your answer: ");
}

pub fn render_invalid_choice(option_count: usize) {
    prompt(&format!("Please enter a number between 1 and {option_count}: "));
}

pub fn render_rejected() {
    prompt("That option does not belong to this question, try again: ");
}

pub fn render_results(vm: &ResultsVm) {
    println!();
    println!("{RULE}");
    println!("{}", vm.heading);
    println!("{RULE}");
    println!("{}", vm.reason_label);
    println!("{}", vm.final_score_label);
    println!("{}", vm.correct_label);
    println!("{}", vm.elapsed_label);
    println!("Completed: {}", vm.completed_at_str);

    for (index, row) in vm.rows.iter().enumerate() {
        println!();
        let mark = if row.is_correct { "✔" } else { "✘" };
        println!("{mark} {}. {}", index + 1, row.question);
        println!("   Your answer: {}", row.your_answer);
        if let Some(solution) = &row.solution {
            println!("   Solution:");
            for line in solution.lines() {
                println!("     {line}");
            }
        }
    }
    println!();
}

pub fn render_load_error() {
    eprintln!("Failed to load quiz");
    eprintln!("Please try again later.");
}

pub fn prompt(text: &str) {
    print!("{text}");
    let _ = io::stdout().flush();
}

fn progress_bar(percent: u8) -> String {
    const WIDTH: usize = 40;
    let filled = usize::from(percent.min(100)) * WIDTH / 100;
    format!("[{}{}] {percent}%", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0), format!("[{}] 0%", "-".repeat(40)));
        assert_eq!(progress_bar(50), format!("[{}{}] 50%", "#".repeat(20), "-".repeat(20)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "#".repeat(40)));
    }
}
