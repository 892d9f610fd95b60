use console::Style;
use maps_core::config::AnalysisConfig;
use maps_core::cutoff::{CutoffDecision, Threshold};
use maps_core::pearson::{ChiSquareResult, FitStatus};
use maps_core::ptc::PtcDataset;
use maps_core::run::Calibration;
use ndarray::{Array2, Axis};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    pass: Style,
    fail: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            pass: Style::new().green(),
            fail: Style::new().red(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

pub fn print_calibration_summary(calibration: &Calibration) {
    let s = Styles::new();
    print_title(&s, "Calibration");

    let (rows, cols) = calibration.resolution();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Resolution"),
        s.value.apply_to(format!("{rows}x{cols}"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Mean offset"),
        s.value.apply_to(format!("{:.3}", mean(calibration.offset.iter().copied())))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Mean noise"),
        s.value.apply_to(format!("{:.3}", mean(calibration.read_noise.iter().copied())))
    );
}

pub fn print_ptc_summary(dataset: &PtcDataset) {
    let s = Styles::new();
    print_title(&s, "Photon Transfer");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Runs"),
        s.value.apply_to(dataset.run_count())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Resolution"),
        s.value.apply_to(dataset.resolution())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Sorted"),
        s.value.apply_to(if dataset.is_sorted() { "per pixel" } else { "no" })
    );
    println!();

    // Sorted curves mix exposures within a run index, so the averages are
    // per rank rather than per exposure.
    println!(
        "    {:>5}  {:>12}  {:>12}  {:>12}",
        s.label.apply_to("Run"),
        s.label.apply_to("Signal"),
        s.label.apply_to("Noise"),
        s.label.apply_to("Shot")
    );
    let signal = dataset.signal_mean().axis_iter(Axis(0));
    let noise = dataset.noise_total().axis_iter(Axis(0));
    let shot = dataset.shot_noise().axis_iter(Axis(0));
    for (k, ((sig, noi), sho)) in signal.zip(noise).zip(shot).enumerate() {
        println!(
            "    {:>5}  {:>12.3}  {:>12.3}  {:>12.3}",
            k,
            mean(sig.iter().copied()),
            mean(noi.iter().copied()),
            mean(sho.iter().copied())
        );
    }
}

pub fn print_fit_summary(result: &ChiSquareResult, config: &AnalysisConfig) {
    let s = Styles::new();
    print_title(&s, "Chi-Square Test");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(config.pearson.scale)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Bin width"),
        s.value.apply_to(config.pearson.points_per_bin)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Fitted"),
        s.pass.apply_to(result.fitted_count())
    );

    let count = |status: FitStatus| result.status.iter().filter(|&&st| st == status).count();
    for (label, status) in [
        ("Flat", FitStatus::InsufficientVariance),
        ("Few bins", FitStatus::InsufficientBins),
        ("Invalid", FitStatus::Invalid),
    ] {
        let n = count(status);
        if n == 0 {
            println!("  {:<14}{}", s.label.apply_to(label), s.disabled.apply_to("none"));
        } else {
            println!("  {:<14}{}", s.label.apply_to(label), s.fail.apply_to(n));
        }
    }
}

/// Min, median and max of the finite p-values.
pub fn print_p_value_summary(p_value: &Array2<f64>) {
    let s = Styles::new();
    let mut finite: Vec<f64> = p_value.iter().copied().filter(|p| p.is_finite()).collect();
    println!();
    if finite.is_empty() {
        println!("  {:<14}{}", s.label.apply_to("p-value"), s.disabled.apply_to("no finite values"));
        return;
    }
    finite.sort_by(f64::total_cmp);
    let median = finite[finite.len() / 2];
    println!(
        "  {:<14}{}",
        s.label.apply_to("p-value"),
        s.value.apply_to(format!(
            "min {:.3e}  median {:.3e}  max {:.3e}",
            finite[0],
            median,
            finite[finite.len() - 1]
        ))
    );
}

pub fn print_cutoff_summary(decision: &CutoffDecision, threshold: Threshold) {
    let s = Styles::new();
    print_title(&s, "Cutoff");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(threshold.value())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Passed"),
        s.pass.apply_to(decision.passed_count)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Failed"),
        s.fail.apply_to(decision.failed_count)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Cut fraction"),
        s.value.apply_to(format!("{:.2}%", decision.failed_fraction * 100.0))
    );
}
