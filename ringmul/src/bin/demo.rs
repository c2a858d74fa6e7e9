//! ringmul-demo: multiplies random elements of Z_Q[X,Y]/(X^N0 + 1, Phi_M1(Y)) and
//! cross-checks the squaring and pre-transformed paths.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use eyre::{ensure, Context, Result};
use num_bigint::BigInt;
use num_traits::One;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ringmul::{NttPolyRNS, Parameters, RingRNS};
use sampling::distributions::Distributions;
use sampling::source::Source;

#[derive(Parser)]
#[command(name = "ringmul-demo")]
#[command(about = "Bivariate RNS ring multiplication")]
#[command(version)]
struct Args {
    /// JSON parameter file (log_n0, log_n1, primes); overrides the generated primes
    #[arg(long)]
    params: Option<PathBuf>,

    /// log2 of N0
    #[arg(long, default_value = "4")]
    log_n0: usize,

    /// log2 of N1, with N1 + 1 prime
    #[arg(long, default_value = "8")]
    log_n1: usize,

    /// Bit size of the generated primes
    #[arg(long, default_value = "55")]
    prime_bits: u32,

    /// Number of RNS primes
    #[arg(long, default_value = "4")]
    limbs: usize,

    /// log2 of the working modulus Q
    #[arg(long, default_value = "100")]
    log_q: usize,

    /// Random seed for the sampled elements (optional)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let params: Parameters = match &args.params {
        Some(path) => {
            let json: String = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Parameters::generate(args.log_n0, args.log_n1, args.prime_bits, args.limbs)?,
    };

    info!("N0={} N1={} M1={}", params.n0(), params.n1(), params.m1());
    info!("primes: {:?}", params.primes);

    let start = Instant::now();
    let ring: RingRNS = RingRNS::try_new(&params)?;
    info!("tables built in {:.2?}", start.elapsed());

    let seed: [u8; 32] = match args.seed {
        Some(s) => {
            let mut seed: [u8; 32] = [0u8; 32];
            seed[..8].copy_from_slice(&s.to_le_bytes());
            seed
        }
        None => rand::random(),
    };
    let mut source: Source = Source::new(seed);

    let q: BigInt = BigInt::one() << args.log_q;
    let np: usize = ring.max_limbs();
    ensure!(
        ring.crt().level(np).modulus() > &(&q * &q * ring.n()),
        "{} primes cannot hold products mod 2^{}",
        np,
        args.log_q
    );

    let dist: Distributions = Distributions::Uniform(1 << 20);
    let mut sample = |n: usize| -> Vec<BigInt> {
        let mut coeffs: Vec<i64> = vec![0; n];
        dist.fill(&mut source, &mut coeffs);
        coeffs.into_iter().map(BigInt::from).collect()
    };
    let a: Vec<BigInt> = sample(ring.n());
    let b: Vec<BigInt> = sample(ring.n());

    let start = Instant::now();
    let ab: Vec<BigInt> = ring.mul(&a, &b, np, &q);
    info!("mul: {:.2?}", start.elapsed());

    let start = Instant::now();
    let aa: Vec<BigInt> = ring.square(&a, np, &q);
    info!("square: {:.2?}", start.elapsed());
    ensure!(aa == ring.mul(&a, &a, np, &q), "square(a) != mul(a, a)");

    let rb: NttPolyRNS = ring.to_ntt(&b, np);
    let start = Instant::now();
    let ab_ntt: Vec<BigInt> = ring.mul_ntt(&a, &rb, np, &q);
    info!("mul_ntt: {:.2?}", start.elapsed());
    ensure!(ab == ab_ntt, "mul_ntt(a, ntt(b)) != mul(a, b)");

    info!("all checks passed");
    Ok(())
}
