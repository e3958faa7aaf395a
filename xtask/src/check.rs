use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Device target for the no_std crates.
const DEVICE_TARGET: &str = "thumbv7em-none-eabihf";

/// One `cargo` invocation and how to report it.
struct Step {
    label: &'static str,
    args: &'static [&'static str],
    /// Failure aborts the run (otherwise it is only reported)
    required: bool,
}

const STEPS: &[Step] = &[
    Step {
        label: "platform (no_std)",
        args: &["check", "-p", "platform", "--target", DEVICE_TARGET, "--no-default-features"],
        required: true,
    },
    Step {
        label: "library (no_std)",
        args: &["check", "-p", "library", "--target", DEVICE_TARGET, "--no-default-features"],
        required: true,
    },
    Step {
        label: "playback (no_std)",
        args: &["check", "-p", "playback", "--target", DEVICE_TARGET, "--no-default-features"],
        required: true,
    },
    Step {
        label: "firmware (no_std, defmt)",
        args: &["check", "-p", "firmware", "--target", DEVICE_TARGET, "--features", "defmt"],
        required: true,
    },
    Step {
        label: "host driver (emulator)",
        args: &["check", "-p", "firmware", "--features", "emulator"],
        required: true,
    },
    Step {
        label: "clippy",
        args: &["clippy", "--workspace", "--all-targets", "--features", "firmware/emulator", "--", "-D", "warnings"],
        required: false,
    },
    Step {
        label: "formatting",
        args: &["fmt", "--all", "--", "--check"],
        required: false,
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking workspace builds...".cyan().bold());
    println!();

    let total_start = Instant::now();
    for step in STEPS {
        println!("{}", format!("  Checking {}...", step.label).cyan());
        let start = Instant::now();
        let output = Command::new("cargo")
            .args(step.args)
            .output()
            .with_context(|| format!("Failed to run cargo for {}", step.label))?;

        if output.status.success() {
            println!(
                "{}",
                format!("  ✓ {} passed in {:.2}s", step.label, start.elapsed().as_secs_f64()).green()
            );
        } else if step.required {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} check failed", step.label);
        } else {
            eprintln!("{}", format!("  ⚠ {} reported problems", step.label).yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        }
        println!();
    }

    println!(
        "{}",
        format!("✓ All checks completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();
    Ok(())
}
