use fourier_series::{
    display::coefficient_label,
    expr::{Expr, Symbol},
    plotting::{animate, demo, AnimationOptions},
    plot_filename,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: fourier_demo [function=<expr>] [period=<expr>] [order=<N>] [samples=<n>] [static] [help]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    //
    // Defaults reproduce the classic example: -2t² over [-π, π], 6 harmonics, animated
    let mut function = "-2*t^2".to_string();
    let mut period = "2*pi".to_string();
    let mut order = 6usize;
    let mut options = AnimationOptions::default();
    let mut animated = true;

    for arg in std::env::args().skip(1) {
        if let Some(option) = arg.strip_prefix("function=") {
            function = option.to_string();
        } else if let Some(option) = arg.strip_prefix("period=") {
            period = option.to_string();
        } else if let Some(option) = arg.strip_prefix("order=") {
            order = match option.parse::<i64>().map(fourier_series::series::checked_order) {
                Ok(Ok(order)) => order,
                Ok(Err(e)) => fail(&e),
                Err(_) => fail(&format!("Invalid order value: {option}")),
            };
        } else if let Some(option) = arg.strip_prefix("samples=") {
            match option.parse::<usize>() {
                Ok(value) => options.sample_count = value,
                Err(_) => fail(&format!("Invalid samples value: {option}")),
            }
        } else if arg == "static" {
            animated = false;
        } else if arg == "help" || arg == "--help" || arg == "-h" {
            eprintln!("{USAGE}");
            std::process::exit(0);
        } else {
            eprintln!("Unknown argument: {arg}");
            fail(&USAGE);
        }
    }

    let t = Symbol::new("t");
    let function: Expr = function.parse().unwrap_or_else(|e| fail(&e));
    let period: f64 = match period.parse::<Expr>() {
        Ok(expr) => expr
            .constant_value()
            .unwrap_or_else(|| fail(&format!("Period `{expr}` is not a finite constant"))),
        Err(e) => fail(&e),
    };

    tracing::info!(%function, period, order, animated, "computing series");

    let result = if animated {
        let path = plot_filename!(Some("fourier"), "gif");
        animate(&function, &t, period, order, &path, &options).map(|series| (series, path))
    } else {
        let path = plot_filename!(Some("fourier"));
        demo(&function, &t, period, order, &path, &options).map(|series| (series, path))
    };

    let (series, path) = result.unwrap_or_else(|e| fail(&e));

    println!("{series}");
    println!();
    for term in series.terms() {
        println!("{:>6} = {:+.6}", coefficient_label(term.kind, term.harmonic), term.coefficient);
    }
    println!();
    println!("Wrote {}", path.display());
}

fn fail(message: &dyn std::fmt::Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
