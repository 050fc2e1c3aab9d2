use clap::Parser;
use computor::{Options, ParseError};
use std::process::ExitCode;

/// Solve a polynomial equation of degree 2 or less.
#[derive(Debug, Parser)]
#[command(name = "computor")]
struct Args {
    /// The equation to solve (e.g. "5 * x^0 + 4 * x^1 = 4 * x^0").
    equation: String,
    /// Explain each step of the solution.
    #[arg(short, long)]
    verbose: bool,
    /// Decimal places shown for non-integral values.
    #[arg(long, default_value_t = computor::fraction::DEFAULT_PRECISION)]
    precision: usize,
    /// The largest denominator used when showing a value as a fraction.
    #[arg(
        long,
        default_value_t = computor::fraction::DEFAULT_MAX_DENOMINATOR,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    max_denominator: i64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default())
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let args = Args::parse();
    let options = Options {
        verbose: args.verbose,
        precision: args.precision,
        max_denominator: args.max_denominator,
    };

    let mut equation = match computor::parse(&args.equation) {
        Ok(equation) => equation,
        Err(e @ ParseError::InvalidExpression { .. }) => {
            eprintln!("InvalidExpression - {}", e);
            return ExitCode::FAILURE;
        },
    };

    equation.reduce();
    println!("Reduced form: {}", equation);
    println!();
    println!("{}", equation.solve(&options));

    ExitCode::SUCCESS
}
