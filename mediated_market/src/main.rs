//! Walk through a single small market step by step

use clap::Parser;
use mediated_market::generator::create_market;
use mediated_market::report::MarketReport;
use mediated_market::sampler::break_market;
use mediated_market::social_value::{better_social_value, max_social_value, true_social_value};
use mediated_market::{Mediator, SeededSource};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Demonstrate one sampled, mediated clearing pass")]
struct Args {
    /// Seller/buyer pairs
    #[arg(long, default_value_t = 10)]
    pairs: usize,

    /// Valuations are drawn from [0, max-value]
    #[arg(long, default_value_t = 100.0)]
    max_value: f64,

    /// Probability that a pair joins the sample
    #[arg(long, default_value_t = 0.3)]
    probability: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), mediated_market::MarketError> {
    let mut source = SeededSource::new(args.seed);

    let market = create_market(&mut source, args.pairs, args.max_value)?;
    println!("The market:");
    print!("{}", market);

    let (sample, ready) = break_market(&mut source, &market, args.probability)?;
    println!();

    println!("The sample market:");
    print!("{}", sample);
    let mut mediator = Mediator::from_sample(&sample, args.max_value);
    let prices = mediator.prices();
    println!("Seller average price = {:.2}", prices.seller);
    println!("Buyer average price = {:.2}", prices.buyer);
    println!();

    let clearing = mediator.clear(&ready);
    println!("The ready market after the run:");
    print!(
        "{}",
        MarketReport::with_stock(&clearing.market, &clearing.stock)
    );
    println!();

    println!("Best social value: {:.2}", max_social_value(&ready));
    println!("Social value got: {:.2}", true_social_value(&clearing.market));
    println!(
        "Social value with stock returned: {:.2}",
        better_social_value(&clearing.market, &clearing.stock)
    );

    Ok(())
}
