//! Plain-text run report.

use hunter::HuntResult;

/// Print the result of a hunt
pub fn print_summary(result: &HuntResult) {
    println!("\n=== Hunt Summary ===\n");
    println!("{result}");
    println!(
        "Success rate: {:.2}% ({} processed) in {:.3}s",
        result.success_rate(),
        result.processed_count(),
        result.execution_time().as_secs_f64()
    );

    if result.has_errors() {
        println!("\nFailed records:");
        for (id, message) in result.errors() {
            println!("  - {id}: {message}");
        }
    }

    if result.has_skip_reasons() {
        println!("\nSkip reasons:");
        for (reason, count) in result.skip_reason_counts() {
            println!("  - {reason}: {count}");
        }
    }

    println!();
}
